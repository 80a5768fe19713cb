//! Quince - A Rust library for decoding Excel spreadsheets (.xlsx)
//!
//! This library reads Office Open XML workbooks into an in-memory model of
//! sheets, rows and cells with resolved display text and lazily resolved
//! formatting.
//!
//! # Features
//!
//! - **Relationship-driven traversal**: Worksheet parts are located through the
//!   package relationships, never by naming convention
//! - **Dense grids**: Sparse worksheet markup is rebuilt into positional rows
//! - **Shared tables**: Styles and shared strings are parsed once and shared by
//!   every cell
//! - **Parallel sheets**: Worksheets decode concurrently once the shared tables
//!   are loaded
//!
//! # Example - Reading a workbook
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let workbook = quince::load("report.xlsx")?;
//!
//! for sheet in workbook.sheets() {
//!     println!("Sheet: {}", sheet.name());
//!     for row in sheet.rows() {
//!         for cell in row {
//!             print!("{}\t", cell.text());
//!         }
//!         println!();
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Formatting
//!
//! ```no_run
//! use quince::{LoadOptions, StyleInheritance};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = LoadOptions::new().with_style_inheritance(StyleInheritance::Named);
//! let workbook = quince::load_with_options("report.xlsx", &options)?;
//!
//! if let Some(cell) = workbook.sheet(0).and_then(|s| s.cell(0, 0)) {
//!     let style = cell.style();
//!     println!("{} bold={} format={}", cell.text(), style.font.bold, style.number_format.code);
//! }
//! # Ok(())
//! # }
//! ```

use std::io::{Read, Seek};
use std::path::Path;

/// Shared utilities and the crate error type
pub mod common;

/// OOXML (Office Open XML) packaging and spreadsheet decoding
pub mod ooxml;

pub use common::{Error, ErrorKind, Result};
pub use ooxml::xlsx::{
    Alignment, Border, BorderLine, Cell, CellRange, CellType, Color, Fill, Font, LoadOptions,
    NumberFormat, Row, SharedStrings, Sheet, SheetState, Style, StyleInheritance, Styles,
    Workbook,
};

/// Load a workbook from a file path with default options.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Workbook> {
    Workbook::open(path)
}

/// Load a workbook from a file path.
pub fn load_with_options<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Workbook> {
    Workbook::open_with_options(path, options)
}

/// Load a workbook from an in-memory or otherwise seekable source.
pub fn load_from_reader<R: Read + Seek>(reader: R, options: &LoadOptions) -> Result<Workbook> {
    Workbook::from_reader(reader, options)
}
