//! XML parsing modules for Excel files.
//!
//! This module contains specialized parsers for the workbook manifest and
//! worksheet parts of an Excel workbook (.xlsx).

pub mod workbook_parser;
pub mod worksheet_parser;
