//! Common utilities shared by the packaging layer and the spreadsheet parsers.

pub mod error;
pub(crate) mod xml;

pub use error::{Error, ErrorKind, Result};
