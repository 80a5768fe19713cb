//! Excel (.xlsx) spreadsheet decoding.
//!
//! A workbook is decoded into its sheets, each a grid of rows and cells with
//! resolved display text. Styles and the shared string table are parsed once
//! and shared by every cell.
//!
//! The module is organized as follows:
//!
//! - `address`: A1 references, column letters, ranges and row spans
//! - `shared_strings`: The shared string table
//! - `styles`: Fonts, fills, borders, number formats and cell formats
//! - `parsers`: Workbook manifest and worksheet decoders
//! - `workbook`: Package traversal and sheet assembly
//!
//! # Example
//!
//! ```rust,no_run
//! use quince::ooxml::xlsx::{LoadOptions, Workbook};
//!
//! let options = LoadOptions::new().with_parallel_sheets(false);
//! let workbook = Workbook::open_with_options("data.xlsx", &options)?;
//!
//! if let Some(sheet) = workbook.sheet_by_name("Summary") {
//!     for row in sheet.rows() {
//!         let values: Vec<&str> = row.iter().map(|c| c.text()).collect();
//!         println!("{}", values.join("\t"));
//!     }
//! }
//! # Ok::<(), quince::Error>(())
//! ```

pub mod address;
pub mod cell;
pub mod options;
pub mod parsers;
pub mod shared_strings;
pub mod styles;
pub mod workbook;
pub mod worksheet;


pub use address::{
    CellRange, cell_reference, column_letters_to_index, index_to_column_letters,
    parse_cell_address, parse_range, parse_span,
};
pub use cell::{Cell, CellType};
pub use options::{DEFAULT_MAX_PART_SIZE, LoadOptions};
pub use shared_strings::SharedStrings;
pub use styles::{
    Alignment, Border, BorderLine, CellFormat, Color, Fill, Font, NumberFormat, Style,
    StyleInheritance, Styles,
};
pub use workbook::Workbook;
pub use worksheet::{Row, Sheet, SheetState};
