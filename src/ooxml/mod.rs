//! Office Open XML (OOXML) format implementation.
//!
//! The implementation is layered on the Open Packaging Conventions (OPC):
//!
//! 1. **OPC Layer** (`opc`): Part names, relationships and the ZIP container
//! 2. **Spreadsheet Layer** (`xlsx`): Workbook, worksheet, style and string decoding
pub mod opc;
pub mod xlsx;
