//! Unified error types for quince.
//!
//! Errors from the archive reader, the markup decoder and the spreadsheet
//! decode pipeline are presented through one consistent enum.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, ErrorKind, Result};
