//! Error types for workbook loading.
//!
//! Every failure aborts the whole load, so a caller either gets a complete
//! [`Workbook`](crate::Workbook) or exactly one of these errors.
use thiserror::Error;

/// Main error type for quince operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A required part is absent from the container
    #[error("Missing part: {part}")]
    MissingPart { part: String },

    /// A sheet's relationship ID has no entry in the relationship map
    #[error("Sheet '{sheet}' references relationship '{r_id}' which does not exist")]
    UnresolvedRelationship { sheet: String, r_id: String },

    /// Cell reference text does not match the letters-then-digits grammar
    #[error("Malformed cell address: '{0}'")]
    MalformedAddress(String),

    /// Range or span text does not match the bounded-range grammar
    #[error("Malformed range: '{0}'")]
    MalformedRange(String),

    /// Markup could not be decoded
    #[error("Malformed markup: {0}")]
    MalformedMarkup(String),

    /// A cell points outside the shared string table
    #[error("Shared string index {index} is out of range (table has {len} entries)")]
    InvalidSharedString { index: String, len: usize },

    /// A shared-string cell holds text that is not an index
    #[error("Shared string index '{0}' is not a number")]
    NonNumericSharedString(String),

    /// Part name is not a valid package URI
    #[error("Invalid pack URI: {0}")]
    InvalidPackUri(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(String),

    /// A part exceeds the configured uncompressed size ceiling
    #[error("Part {part} is {size} bytes, which exceeds the {limit} byte limit")]
    PartTooLarge { part: String, size: u64, limit: u64 },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure raised while decoding a specific part
    #[error("{part}: {source}")]
    InPart {
        part: String,
        #[source]
        source: Box<Error>,
    },
}

/// Flat classification of an [`Error`], independent of part context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingPart,
    UnresolvedRelationship,
    MalformedAddress,
    MalformedRange,
    MalformedMarkup,
    InvalidSharedString,
    Container,
    Io,
}

impl Error {
    /// Classify this error, looking through any part-context wrappers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingPart { .. } => ErrorKind::MissingPart,
            Error::UnresolvedRelationship { .. } => ErrorKind::UnresolvedRelationship,
            Error::MalformedAddress(_) => ErrorKind::MalformedAddress,
            Error::MalformedRange(_) => ErrorKind::MalformedRange,
            Error::MalformedMarkup(_) => ErrorKind::MalformedMarkup,
            Error::InvalidSharedString { .. } | Error::NonNumericSharedString(_) => {
                ErrorKind::InvalidSharedString
            },
            Error::InvalidPackUri(_) | Error::Zip(_) | Error::PartTooLarge { .. } => {
                ErrorKind::Container
            },
            Error::Io(_) => ErrorKind::Io,
            Error::InPart { source, .. } => source.kind(),
        }
    }

    /// Name of the part this error was raised in, if known.
    pub fn part(&self) -> Option<&str> {
        match self {
            Error::InPart { part, .. } | Error::MissingPart { part } => Some(part),
            Error::PartTooLarge { part, .. } => Some(part),
            _ => None,
        }
    }

    /// Attach the name of the part being decoded.
    ///
    /// Errors that already name their part are returned unchanged.
    pub(crate) fn in_part(self, part: &str) -> Self {
        match self {
            err @ (Error::InPart { .. } | Error::MissingPart { .. } | Error::PartTooLarge { .. }) => {
                err
            },
            err => Error::InPart {
                part: part.to_string(),
                source: Box::new(err),
            },
        }
    }
}

/// Result type for quince operations.
pub type Result<T> = std::result::Result<T, Error>;
