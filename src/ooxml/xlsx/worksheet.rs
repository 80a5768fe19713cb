//! Decoded worksheets: ordered rows of positionally indexed cells.
//!
//! Rows run contiguously from the first declared row to the last one; rows
//! the markup skipped in between are present and empty. Inside a row, cells
//! are indexed by 0-based column and gaps hold empty cells.

use std::fmt;
use std::str::FromStr;

use crate::ooxml::xlsx::address::CellRange;
use crate::ooxml::xlsx::cell::Cell;

/// Visibility of a sheet tab (`state` attribute in the workbook manifest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SheetState {
    #[default]
    Visible,
    Hidden,
    VeryHidden,
}

impl FromStr for SheetState {
    type Err = std::convert::Infallible;

    /// Unknown values read as visible.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "hidden" => SheetState::Hidden,
            "veryHidden" => SheetState::VeryHidden,
            _ => SheetState::Visible,
        })
    }
}

impl fmt::Display for SheetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SheetState::Visible => "visible",
            SheetState::Hidden => "hidden",
            SheetState::VeryHidden => "veryHidden",
        })
    }
}

/// One worksheet row.
#[derive(Debug, Clone, Default)]
pub struct Row {
    /// 0-based row index within the sheet
    index: usize,
    cells: Vec<Cell>,
}

impl Row {
    pub(crate) fn new(index: usize, cells: Vec<Cell>) -> Self {
        Self { index, cells }
    }

    /// 0-based row index within the sheet.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Cells in column order; position equals the 0-based column.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Get the cell at a 0-based column.
    #[inline]
    pub fn cell(&self, col: usize) -> Option<&Cell> {
        self.cells.get(col)
    }

    /// Number of cell slots, including empty ones.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// A decoded worksheet.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub(crate) name: String,
    pub(crate) state: SheetState,
    pub(crate) rows: Vec<Row>,
    /// 0-based index of `rows[0]`
    pub(crate) first_row: usize,
    /// Highest declared 1-based row number
    pub(crate) max_row: usize,
    /// Highest 1-based column number of any present cell
    pub(crate) max_col: usize,
    pub(crate) dimension: Option<CellRange>,
    pub(crate) merged_ranges: Vec<CellRange>,
}

impl Sheet {
    /// Sheet name as shown on its tab.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn state(&self) -> SheetState {
        self.state
    }

    /// Rows from the first declared row to the last, without gaps.
    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// 0-based sheet row index of the first stored row.
    #[inline]
    pub fn first_row(&self) -> usize {
        self.first_row
    }

    /// Highest declared 1-based row number (0 for a sheet without rows).
    #[inline]
    pub fn max_row(&self) -> usize {
        self.max_row
    }

    /// Highest 1-based column number of any cell present in the markup.
    #[inline]
    pub fn max_col(&self) -> usize {
        self.max_col
    }

    /// The used range declared by the sheet, if any.
    ///
    /// Advisory only; [`max_row`](Self::max_row) and [`max_col`](Self::max_col)
    /// reflect the cells actually present.
    #[inline]
    pub fn dimension(&self) -> Option<CellRange> {
        self.dimension
    }

    /// Merged cell ranges, in document order.
    #[inline]
    pub fn merged_ranges(&self) -> &[CellRange] {
        &self.merged_ranges
    }

    /// Get a row by its 0-based sheet row index.
    pub fn row_at(&self, index: usize) -> Option<&Row> {
        index
            .checked_sub(self.first_row)
            .and_then(|offset| self.rows.get(offset))
    }

    /// Get a cell by 0-based sheet coordinates.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.row_at(row).and_then(|r| r.cell(col))
    }

    /// Number of stored rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::xlsx::cell::{CellType, Tables};
    use std::sync::Arc;

    #[test]
    fn test_sheet_state() {
        assert_eq!("hidden".parse::<SheetState>(), Ok(SheetState::Hidden));
        assert_eq!("veryHidden".parse::<SheetState>(), Ok(SheetState::VeryHidden));
        assert_eq!("whatever".parse::<SheetState>(), Ok(SheetState::Visible));
        assert_eq!(SheetState::VeryHidden.to_string(), "veryHidden");
    }

    #[test]
    fn test_row_at_offsets_by_first_row() {
        let tables = Arc::new(Tables::default());
        let cells = vec![Cell::new(3, 0, "x".to_string(), CellType::Number, tables)];
        let sheet = Sheet {
            name: "Data".to_string(),
            rows: vec![Row::new(3, cells), Row::new(4, Vec::new())],
            first_row: 3,
            max_row: 5,
            max_col: 1,
            ..Sheet::default()
        };

        assert!(sheet.row_at(0).is_none());
        assert_eq!(sheet.row_at(3).map(Row::index), Some(3));
        assert_eq!(sheet.cell(3, 0).map(Cell::text), Some("x"));
        assert!(sheet.cell(4, 0).is_none());
        assert!(sheet.row_at(5).is_none());
    }
}
