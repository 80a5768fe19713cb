//! Excel Workbook implementation.
//!
//! Loading runs in two phases. The shared tables (styles and the shared
//! string table) and the worksheet parts are read from the package first,
//! one after another, because the archive reader is stateful. Worksheets are
//! then decoded independently, in parallel unless disabled, against a single
//! read-only copy of the tables.

use std::io::{Read, Seek};
use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::common::error::Result;
use crate::ooxml::opc::constants::{default_part, relationship_type as rt};
use crate::ooxml::opc::{PackURI, PartReader, Relationships, ZipPackage};
use crate::ooxml::xlsx::cell::Tables;
use crate::ooxml::xlsx::options::LoadOptions;
use crate::ooxml::xlsx::parsers::workbook_parser::{parse_workbook_xml, resolve_sheets};
use crate::ooxml::xlsx::parsers::worksheet_parser::parse_worksheet_xml;
use crate::ooxml::xlsx::shared_strings::SharedStrings;
use crate::ooxml::xlsx::styles::{StyleInheritance, Styles};
use crate::ooxml::xlsx::worksheet::{Sheet, SheetState};

/// A fully decoded Excel workbook.
///
/// # Examples
///
/// ```rust,no_run
/// use quince::Workbook;
///
/// let workbook = Workbook::open("report.xlsx")?;
/// for sheet in workbook.sheets() {
///     println!("{}: {} rows", sheet.name(), sheet.row_count());
/// }
/// # Ok::<(), quince::Error>(())
/// ```
#[derive(Debug)]
pub struct Workbook {
    /// Worksheets in manifest order
    sheets: Vec<Sheet>,
    /// Tables shared with every cell
    tables: Arc<Tables>,
    date1904: bool,
}

/// A worksheet part waiting to be decoded.
struct PendingSheet {
    name: String,
    state: SheetState,
    part: PackURI,
    xml: Vec<u8>,
}

impl Workbook {
    /// Open and decode a workbook file with default options.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, &LoadOptions::default())
    }

    /// Open and decode a workbook file.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self> {
        let package = ZipPackage::open(path)?.with_max_part_size(options.max_part_size);
        Self::from_package(package, options)
    }

    /// Decode a workbook from any seekable byte source.
    pub fn from_reader<R: Read + Seek>(reader: R, options: &LoadOptions) -> Result<Self> {
        let package = ZipPackage::new(reader)?.with_max_part_size(options.max_part_size);
        Self::from_package(package, options)
    }

    /// Decode a workbook from an already opened package.
    pub fn from_package<P: PartReader>(mut package: P, options: &LoadOptions) -> Result<Self> {
        let workbook_uri = locate_workbook(&mut package)?;
        debug!(part = %workbook_uri, "reading workbook manifest");

        let manifest_xml = package.require_part(&workbook_uri)?;
        let manifest =
            parse_workbook_xml(&manifest_xml).map_err(|e| e.in_part(workbook_uri.as_str()))?;
        let rels = package.relationships(&workbook_uri)?;

        let styles = match read_related(&mut package, &rels, rt::STYLES, default_part::STYLES)? {
            Some((uri, xml)) => Styles::parse(&xml).map_err(|e| e.in_part(uri.as_str()))?,
            None => {
                warn!("workbook has no styles part, using default styles");
                Styles::default()
            },
        };

        let shared_strings = match read_related(
            &mut package,
            &rels,
            rt::SHARED_STRINGS,
            default_part::SHARED_STRINGS,
        )? {
            Some((uri, xml)) => SharedStrings::parse(&xml).map_err(|e| e.in_part(uri.as_str()))?,
            None => {
                warn!("workbook has no shared string table, using an empty one");
                SharedStrings::default()
            },
        };
        debug!(
            strings = shared_strings.len(),
            cell_formats = styles.cell_format_count(),
            "shared tables loaded"
        );

        let resolved =
            resolve_sheets(&manifest, &rels).map_err(|e| e.in_part(workbook_uri.as_str()))?;

        let mut pending = Vec::with_capacity(resolved.len());
        for sheet in resolved {
            let xml = package.require_part(&sheet.part)?;
            pending.push(PendingSheet {
                name: sheet.name,
                state: sheet.state,
                part: sheet.part,
                xml,
            });
        }

        let tables = Arc::new(Tables {
            shared_strings,
            styles,
            inheritance: options.style_inheritance,
        });

        let sheets = if options.parallel_sheets {
            pending
                .par_iter()
                .map(|sheet| build_sheet(sheet, &tables))
                .collect::<Result<Vec<_>>>()?
        } else {
            pending
                .iter()
                .map(|sheet| build_sheet(sheet, &tables))
                .collect::<Result<Vec<_>>>()?
        };

        Ok(Self {
            sheets,
            tables,
            date1904: manifest.date1904,
        })
    }

    /// Worksheets in manifest order.
    #[inline]
    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Get a worksheet by its 0-based position in the manifest.
    #[inline]
    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    /// Get a worksheet by name.
    pub fn sheet_by_name(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name() == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(Sheet::name).collect()
    }

    #[inline]
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// The shared string table.
    #[inline]
    pub fn shared_strings(&self) -> &SharedStrings {
        &self.tables.shared_strings
    }

    /// The style tables.
    #[inline]
    pub fn styles(&self) -> &Styles {
        &self.tables.styles
    }

    /// The inheritance mode used when cells resolve their style.
    #[inline]
    pub fn style_inheritance(&self) -> StyleInheritance {
        self.tables.inheritance
    }

    /// Whether serial dates use the 1904 epoch.
    #[inline]
    pub fn is_date1904(&self) -> bool {
        self.date1904
    }
}

impl<'a> IntoIterator for &'a Workbook {
    type Item = &'a Sheet;
    type IntoIter = std::slice::Iter<'a, Sheet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sheets.iter()
    }
}

/// Find the workbook part through the package relationships.
fn locate_workbook<P: PartReader>(package: &mut P) -> Result<PackURI> {
    let root = PackURI::new("/")?;
    let rels = package.relationships(&root)?;
    let rel = rels
        .by_type(rt::OFFICE_DOCUMENT)
        .or_else(|| rels.by_type(rt::OFFICE_DOCUMENT_STRICT));

    match rel {
        Some(rel) => rels.target_partname(rel),
        None => {
            warn!(
                part = default_part::WORKBOOK,
                "package has no officeDocument relationship, using the conventional part name"
            );
            PackURI::new(default_part::WORKBOOK)
        },
    }
}

/// Read the part related to the workbook by `reltype`, falling back to its
/// conventional name. Returns `None` when neither exists.
fn read_related<P: PartReader>(
    package: &mut P,
    rels: &Relationships,
    reltype: &str,
    fallback: &str,
) -> Result<Option<(PackURI, Vec<u8>)>> {
    let uri = match rels.by_type(reltype) {
        Some(rel) => rels.target_partname(rel)?,
        None => {
            warn!(reltype, part = fallback, "relationship missing, using the conventional part name");
            PackURI::new(fallback)?
        },
    };
    Ok(package.read_part(&uri)?.map(|xml| (uri, xml)))
}

fn build_sheet(pending: &PendingSheet, tables: &Arc<Tables>) -> Result<Sheet> {
    let sheet = parse_worksheet_xml(&pending.xml, &pending.name, pending.state, tables)
        .map_err(|e| e.in_part(pending.part.as_str()))?;
    debug!(
        sheet = %pending.name,
        part = %pending.part,
        rows = sheet.row_count(),
        max_col = sheet.max_col(),
        "worksheet decoded"
    );
    Ok(sheet)
}
