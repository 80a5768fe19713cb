//! Provides a general interface to a physical OPC package (ZIP file).
//!
//! The decode pipeline only ever asks the container for the bytes of a named
//! part; [`PartReader`] is that seam. [`ZipPackage`] implements it over a ZIP
//! archive, and tests can substitute an in-memory map.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use zip::ZipArchive;
use zip::result::ZipError;

use crate::common::error::{Error, Result};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::rel::Relationships;

/// Access to the named parts of a package.
pub trait PartReader {
    /// Read the full content of a part, or `None` if the package has no such part.
    fn read_part(&mut self, uri: &PackURI) -> Result<Option<Vec<u8>>>;

    /// Read a part that must exist.
    fn require_part(&mut self, uri: &PackURI) -> Result<Vec<u8>> {
        self.read_part(uri)?.ok_or_else(|| Error::MissingPart {
            part: uri.to_string(),
        })
    }

    /// Read and parse the relationships of `source`.
    ///
    /// A source without a `.rels` part has no relationships.
    fn relationships(&mut self, source: &PackURI) -> Result<Relationships> {
        let rels_uri = source.rels_uri()?;
        match self.read_part(&rels_uri)? {
            Some(xml) => {
                Relationships::parse(&xml, source).map_err(|e| e.in_part(rels_uri.as_str()))
            },
            None => Ok(Relationships::new(source.base_uri())),
        }
    }
}

/// Physical package reader over a ZIP archive.
pub struct ZipPackage<R: Read + Seek> {
    /// The underlying ZIP archive
    archive: ZipArchive<R>,
    /// Ceiling on the uncompressed size of any single part
    max_part_size: Option<u64>,
}

impl ZipPackage<BufReader<File>> {
    /// Open a package from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> ZipPackage<R> {
    /// Create a package reader from any seekable byte source.
    pub fn new(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)?;
        Ok(Self {
            archive,
            max_part_size: None,
        })
    }

    /// Limit the uncompressed size of parts this reader will return.
    pub fn with_max_part_size(mut self, limit: Option<u64>) -> Self {
        self.max_part_size = limit;
        self
    }

    /// Number of members in the archive.
    #[inline]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Check if the archive has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }
}

impl<R: Read + Seek> PartReader for ZipPackage<R> {
    fn read_part(&mut self, uri: &PackURI) -> Result<Option<Vec<u8>>> {
        let mut entry = match self.archive.by_name(uri.membername()) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let size = entry.size();
        if let Some(limit) = self.max_part_size
            && size > limit
        {
            return Err(Error::PartTooLarge {
                part: uri.to_string(),
                size,
                limit,
            });
        }

        let capacity = usize::try_from(size).unwrap_or(0);
        let mut data = Vec::with_capacity(capacity);
        match self.max_part_size {
            // The declared size comes from the archive directory; never read past the limit
            Some(limit) => {
                (&mut entry).take(limit.saturating_add(1)).read_to_end(&mut data)?;
                if data.len() as u64 > limit {
                    return Err(Error::PartTooLarge {
                        part: uri.to_string(),
                        size: data.len() as u64,
                        limit,
                    });
                }
            },
            None => {
                entry.read_to_end(&mut data)?;
            },
        }
        Ok(Some(data))
    }
}

/// In-memory package keyed by part name.
#[derive(Debug, Default, Clone)]
pub struct MemoryPackage {
    parts: HashMap<String, Vec<u8>>,
}

impl MemoryPackage {
    /// Create an empty package.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a part. `name` is an absolute part name such as "/xl/workbook.xml".
    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.parts.insert(name.into(), data.into());
    }

    /// Builder form of [`MemoryPackage::insert`].
    pub fn with_part(mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(name, data);
        self
    }
}

impl PartReader for MemoryPackage {
    fn read_part(&mut self, uri: &PackURI) -> Result<Option<Vec<u8>>> {
        Ok(self.parts.get(uri.as_str()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::ErrorKind;
    use std::io::{Cursor, Write};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn archive(members: &[(&str, &str)]) -> Vec<u8> {
        let mut zip_data = Vec::new();
        {
            let mut writer = ZipWriter::new(Cursor::new(&mut zip_data));
            let options = SimpleFileOptions::default();
            for (name, content) in members {
                writer.start_file(*name, options).unwrap();
                writer.write_all(content.as_bytes()).unwrap();
            }
            writer.finish().unwrap();
        }
        zip_data
    }

    #[test]
    fn test_read_existing_and_missing_parts() {
        let data = archive(&[("xl/workbook.xml", "<workbook/>")]);
        let mut pkg = ZipPackage::new(Cursor::new(data)).unwrap();
        assert_eq!(pkg.len(), 1);

        let uri = PackURI::new("/xl/workbook.xml").unwrap();
        assert_eq!(pkg.read_part(&uri).unwrap().unwrap(), b"<workbook/>");

        let missing = PackURI::new("/xl/styles.xml").unwrap();
        assert!(pkg.read_part(&missing).unwrap().is_none());
        let err = pkg.require_part(&missing).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingPart);
    }

    #[test]
    fn test_part_size_limit() {
        let data = archive(&[("xl/big.xml", "0123456789")]);
        let mut pkg = ZipPackage::new(Cursor::new(data))
            .unwrap()
            .with_max_part_size(Some(4));
        let uri = PackURI::new("/xl/big.xml").unwrap();
        let err = pkg.read_part(&uri).unwrap_err();
        assert!(matches!(err, Error::PartTooLarge { limit: 4, .. }));
    }

    #[test]
    fn test_unbounded_part_size_limit() {
        let data = archive(&[("xl/workbook.xml", "<workbook/>")]);
        let mut pkg = ZipPackage::new(Cursor::new(data))
            .unwrap()
            .with_max_part_size(Some(u64::MAX));
        let uri = PackURI::new("/xl/workbook.xml").unwrap();
        assert_eq!(pkg.read_part(&uri).unwrap().unwrap(), b"<workbook/>");
    }

    #[test]
    fn test_not_a_zip() {
        let result = ZipPackage::new(Cursor::new(b"definitely not a zip".to_vec()));
        let kind = result.err().map(|e| e.kind());
        assert!(matches!(kind, Some(ErrorKind::Container | ErrorKind::Io)));
    }

    #[test]
    fn test_relationships_absent_rels_part() {
        let mut pkg = MemoryPackage::new();
        let source = PackURI::new("/xl/workbook.xml").unwrap();
        let rels = pkg.relationships(&source).unwrap();
        assert!(rels.is_empty());
    }
}
