//! Parser for the workbook manifest (xl/workbook.xml).
//!
//! The manifest lists sheets in tab order, each pointing at its worksheet
//! part through a relationship id. Part names are never derived from the
//! sheet position or the sheet name; only the relationship map decides.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::common::error::{Error, Result};
use crate::common::xml::{attr_value, parse_bool};
use crate::ooxml::opc::{PackURI, Relationships};
use crate::ooxml::xlsx::worksheet::SheetState;

// Pre-allocate typical capacity for sheet entries
const INITIAL_SHEETS_CAPACITY: usize = 16;

/// A `<sheet>` entry of the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetEntry {
    pub name: String,
    pub sheet_id: Option<u32>,
    /// Relationship id (`r:id`) of the worksheet part
    pub r_id: String,
    pub state: SheetState,
}

/// Workbook-level facts read from the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkbookManifest {
    /// Sheets in manifest order
    pub sheets: Vec<SheetEntry>,
    /// Serial dates count from 1904-01-01 instead of 1900-01-01
    pub date1904: bool,
}

/// A sheet entry bound to its worksheet part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSheet {
    pub name: String,
    pub state: SheetState,
    pub part: PackURI,
}

/// Parse workbook.xml content.
pub fn parse_workbook_xml(xml: &[u8]) -> Result<WorkbookManifest> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut manifest = WorkbookManifest {
        sheets: Vec::with_capacity(INITIAL_SHEETS_CAPACITY),
        date1904: false,
    };
    let mut buf = Vec::with_capacity(512);

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let decoder = reader.decoder();
                match e.local_name().as_ref() {
                    b"sheet" => {
                        let name = attr_value(e, decoder, b"name")?.ok_or_else(|| {
                            Error::MalformedMarkup("sheet entry without a name".to_string())
                        })?;
                        let r_id = attr_value(e, decoder, b"id")?.ok_or_else(|| {
                            Error::MalformedMarkup(format!(
                                "sheet '{}' has no relationship id",
                                name
                            ))
                        })?;
                        let sheet_id = attr_value(e, decoder, b"sheetId")?
                            .and_then(|v| atoi_simd::parse::<u32>(v.as_bytes()).ok());
                        let state = attr_value(e, decoder, b"state")?
                            .and_then(|v| v.parse::<SheetState>().ok())
                            .unwrap_or_default();

                        manifest.sheets.push(SheetEntry {
                            name,
                            sheet_id,
                            r_id,
                            state,
                        });
                    },
                    b"workbookPr" => {
                        manifest.date1904 = attr_value(e, decoder, b"date1904")?
                            .is_some_and(|v| parse_bool(&v));
                    },
                    _ => {},
                }
            },
            Event::Eof => break,
            _ => {},
        }
    }

    Ok(manifest)
}

/// Bind every manifest entry to its worksheet part through `rels`.
///
/// Fails with [`Error::UnresolvedRelationship`] when an entry's id has no
/// internal relationship.
pub fn resolve_sheets(manifest: &WorkbookManifest, rels: &Relationships) -> Result<Vec<ResolvedSheet>> {
    manifest
        .sheets
        .iter()
        .map(|entry| {
            let rel = rels
                .get(&entry.r_id)
                .filter(|rel| !rel.is_external())
                .ok_or_else(|| Error::UnresolvedRelationship {
                    sheet: entry.name.clone(),
                    r_id: entry.r_id.clone(),
                })?;
            Ok(ResolvedSheet {
                name: entry.name.clone(),
                state: entry.state,
                part: rels.target_partname(rel)?,
            })
        })
        .collect()
}
