//! Shared strings table for Excel files.
//!
//! Cells of type `s` store an index into this table instead of their text.
//! Each `<si>` entry is either a single `<t>` element or a sequence of
//! formatted runs (`<r><t>..</t></r>`); run formatting is dropped and the
//! run texts are concatenated. Phonetic hints (`<rPh>`) are not part of the
//! displayed value and are skipped.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::common::error::{Error, Result};
use crate::common::xml::{attr_value, read_text, skip_element};

/// Upper bound on the capacity reserved from the `uniqueCount` attribute.
const MAX_PREALLOCATED_STRINGS: usize = 1 << 16;

/// Ordered table of shared strings.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SharedStrings {
    strings: Vec<String>,
}

impl SharedStrings {
    /// Create a new empty shared strings table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse shared strings from xl/sharedStrings.xml content.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        let mut strings = Vec::new();
        let mut buf = Vec::with_capacity(1024);

        loop {
            buf.clear();
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => match e.local_name().as_ref() {
                    b"sst" => {
                        let unique = attr_value(e, reader.decoder(), b"uniqueCount")?
                            .and_then(|v| v.parse::<usize>().ok())
                            .unwrap_or(0);
                        strings.reserve(unique.min(MAX_PREALLOCATED_STRINGS));
                    },
                    b"si" => strings.push(read_rich_text(&mut reader, b"si")?),
                    _ => {},
                },
                Event::Empty(ref e) if e.local_name().as_ref() == b"si" => {
                    strings.push(String::new());
                },
                Event::Eof => break,
                _ => {},
            }
        }

        Ok(Self { strings })
    }

    /// Get a string by its index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    /// Resolve the textual index stored in a shared-string cell.
    pub fn lookup(&self, index: &str) -> Result<&str> {
        let position: usize = atoi_simd::parse(index.trim().as_bytes())
            .map_err(|_| Error::NonNumericSharedString(index.to_string()))?;
        self.get(position).ok_or_else(|| Error::InvalidSharedString {
            index: index.to_string(),
            len: self.strings.len(),
        })
    }

    /// Get the number of strings in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Get all strings.
    pub fn strings(&self) -> &[String] {
        &self.strings
    }
}

/// Read the displayed text of a string item (`<si>` or an inline `<is>`)
/// whose start tag was just consumed, up to the end tag named `end`.
pub(crate) fn read_rich_text(reader: &mut Reader<&[u8]>, end: &[u8]) -> Result<String> {
    let mut text = String::new();
    let mut buf = Vec::with_capacity(256);

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"t" => text.push_str(&read_text(reader)?),
                // Runs are transparent: descend and keep collecting <t>
                b"r" => {},
                _ => skip_element(reader)?,
            },
            Event::End(ref e) if e.local_name().as_ref() == end => break,
            Event::Eof => {
                return Err(Error::MalformedMarkup(format!(
                    "unterminated <{}> string item",
                    String::from_utf8_lossy(end)
                )));
            },
            _ => {},
        }
    }

    Ok(text)
}

impl From<Vec<String>> for SharedStrings {
    fn from(strings: Vec<String>) -> Self {
        Self { strings }
    }
}
