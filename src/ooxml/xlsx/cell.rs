//! Cell values of a decoded worksheet.
//!
//! A cell stores its display text and style index, plus a shared handle to
//! the workbook's string and style tables. Styles are resolved on demand
//! through that handle; a cell never copies table data.

use std::fmt;
use std::sync::Arc;

use crate::ooxml::xlsx::address::cell_reference;
use crate::ooxml::xlsx::shared_strings::SharedStrings;
use crate::ooxml::xlsx::styles::{Style, StyleInheritance, Styles};

/// Immutable lookup tables shared by every cell of a workbook.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub shared_strings: SharedStrings,
    pub styles: Styles,
    pub inheritance: StyleInheritance,
}

/// How the cell's value was encoded in the worksheet (`t` attribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellType {
    /// No value (gap filler or a cell carrying only a style)
    #[default]
    Empty,
    /// Index into the shared string table (`t="s"`), already resolved
    SharedString,
    /// Text stored in the cell itself (`t="inlineStr"`)
    InlineString,
    /// Numeric value (`t="n"` or no type)
    Number,
    /// `t="b"`, displayed as TRUE/FALSE
    Boolean,
    /// Error value such as `#DIV/0!` (`t="e"`)
    Error,
    /// Cached text result of a formula (`t="str"`)
    FormulaString,
    /// ISO 8601 date text (`t="d"`)
    Date,
}

/// A single worksheet cell.
#[derive(Clone)]
pub struct Cell {
    /// Display text
    value: String,
    cell_type: CellType,
    /// Formula source, never evaluated
    formula: Option<String>,
    /// Index into cellXfs; 0 is the default style
    style_index: usize,
    /// 0-based row
    row: usize,
    /// 0-based column
    col: usize,
    tables: Arc<Tables>,
}

impl Cell {
    pub(crate) fn new(
        row: usize,
        col: usize,
        value: String,
        cell_type: CellType,
        tables: Arc<Tables>,
    ) -> Self {
        Self {
            value,
            cell_type,
            formula: None,
            style_index: 0,
            row,
            col,
            tables,
        }
    }

    /// An empty, unstyled cell at the given coordinate.
    pub(crate) fn empty(row: usize, col: usize, tables: Arc<Tables>) -> Self {
        Self::new(row, col, String::new(), CellType::Empty, tables)
    }

    pub(crate) fn with_style_index(mut self, style_index: usize) -> Self {
        self.style_index = style_index;
        self
    }

    pub(crate) fn with_formula(mut self, formula: Option<String>) -> Self {
        self.formula = formula;
        self
    }

    /// The resolved display text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.value
    }

    #[inline]
    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    /// Formula text, if the cell was computed by one.
    #[inline]
    pub fn formula(&self) -> Option<&str> {
        self.formula.as_deref()
    }

    /// Raw style index (position in cellXfs).
    #[inline]
    pub fn style_index(&self) -> usize {
        self.style_index
    }

    /// Resolve this cell's style against the workbook tables.
    pub fn style(&self) -> Style {
        self.tables
            .styles
            .resolve(self.style_index, self.tables.inheritance)
    }

    /// 0-based row index.
    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    /// 0-based column index.
    #[inline]
    pub fn col(&self) -> usize {
        self.col
    }

    /// A1 reference of this cell (e.g. "B3").
    pub fn reference(&self) -> String {
        cell_reference(self.col, self.row)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cell_type == CellType::Empty
    }

    /// Numeric value of a number cell.
    pub fn as_f64(&self) -> Option<f64> {
        match self.cell_type {
            CellType::Number => fast_float2::parse::<f64, _>(self.value.trim()).ok(),
            _ => None,
        }
    }

    /// Value of a boolean cell.
    pub fn as_bool(&self) -> Option<bool> {
        match self.cell_type {
            CellType::Boolean => Some(self.value == "TRUE"),
            _ => None,
        }
    }

    /// Check whether the cell holds a date: either an ISO date cell or a
    /// number displayed through a date format.
    pub fn is_date(&self) -> bool {
        match self.cell_type {
            CellType::Date => true,
            CellType::Number => self.style().number_format.is_date_format(),
            _ => false,
        }
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("reference", &self.reference())
            .field("value", &self.value)
            .field("cell_type", &self.cell_type)
            .field("formula", &self.formula)
            .field("style_index", &self.style_index)
            .finish()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
