//! Parser for worksheet parts (xl/worksheets/*.xml).
//!
//! Worksheet markup is sparse: empty rows and cells are omitted and cells
//! carry A1 references instead of positions. This parser rebuilds the dense
//! grid:
//!
//! - a row pre-allocates the slots named by the upper bound of its `spans`
//!   attribute (the lower bound does not offset allocation)
//! - a cell past the allocated slots grows its row, so understated spans are
//!   harmless
//! - rows skipped between the first and last declared row become empty rows
//!
//! Shared string references are resolved while parsing; styles are left as
//! indices for [`Cell::style`] to resolve later.

use std::collections::BTreeMap;
use std::sync::Arc;

use quick_xml::Reader;
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use tracing::warn;

use crate::common::error::{Error, Result};
use crate::common::xml::{attr_value, read_text, skip_element};
use crate::ooxml::xlsx::address::{CellRange, MAX_ROW_INDEX, parse_cell_address, parse_span};
use crate::ooxml::xlsx::cell::{Cell, CellType, Tables};
use crate::ooxml::xlsx::shared_strings::read_rich_text;
use crate::ooxml::xlsx::worksheet::{Row, Sheet, SheetState};

/// Running state while the rows of one sheet are read.
struct GridBuilder {
    tables: Arc<Tables>,
    /// Rows by 0-based index; markup may repeat or reorder them
    rows: BTreeMap<usize, Vec<Cell>>,
    /// Index of the row read last, for rows without an `r` attribute
    last_row: Option<usize>,
    /// Highest 1-based column number of any present cell
    max_col: usize,
}

/// Attributes of a `<c>` element.
struct CellAttributes {
    reference: Option<String>,
    cell_type: Option<String>,
    style_index: usize,
}

/// Parse worksheet XML content into a [`Sheet`].
pub fn parse_worksheet_xml(
    xml: &[u8],
    name: &str,
    state: SheetState,
    tables: &Arc<Tables>,
) -> Result<Sheet> {
    let mut reader = Reader::from_reader(xml);
    let mut grid = GridBuilder {
        tables: Arc::clone(tables),
        rows: BTreeMap::new(),
        last_row: None,
        max_col: 0,
    };
    let mut dimension = None;
    let mut merged_ranges = Vec::new();
    let mut buf = Vec::with_capacity(1024);

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"worksheet" | b"sheetData" | b"mergeCells" => {},
                b"row" => grid.parse_row(&mut reader, e, true)?,
                b"dimension" => {
                    dimension = parse_dimension(e, reader.decoder(), name)?;
                    skip_element(&mut reader)?;
                },
                b"mergeCell" => {
                    merged_ranges.push(parse_merge_cell(e, reader.decoder())?);
                    skip_element(&mut reader)?;
                },
                _ => skip_element(&mut reader)?,
            },
            Event::Empty(ref e) => match e.local_name().as_ref() {
                b"row" => grid.parse_row(&mut reader, e, false)?,
                b"dimension" => dimension = parse_dimension(e, reader.decoder(), name)?,
                b"mergeCell" => merged_ranges.push(parse_merge_cell(e, reader.decoder())?),
                _ => {},
            },
            Event::Eof => break,
            _ => {},
        }
    }

    let mut sheet = grid.finish();
    sheet.name = name.to_string();
    sheet.state = state;
    sheet.dimension = dimension;
    sheet.merged_ranges = merged_ranges;
    Ok(sheet)
}

/// Read the advisory `<dimension ref="..">`; an unparsable hint is dropped.
fn parse_dimension(start: &BytesStart<'_>, decoder: Decoder, sheet: &str) -> Result<Option<CellRange>> {
    let Some(reference) = attr_value(start, decoder, b"ref")? else {
        return Ok(None);
    };
    match CellRange::parse(&reference) {
        Ok(range) => Ok(Some(range)),
        Err(e) => {
            warn!(sheet, reference = %reference, error = %e, "Ignoring unparsable sheet dimension");
            Ok(None)
        },
    }
}

fn parse_merge_cell(start: &BytesStart<'_>, decoder: Decoder) -> Result<CellRange> {
    let reference = attr_value(start, decoder, b"ref")?
        .ok_or_else(|| Error::MalformedRange(String::new()))?;
    CellRange::parse(&reference)
}

impl GridBuilder {
    /// Parse one `<row>`; `has_children` is false for a self-closing row.
    fn parse_row(
        &mut self,
        reader: &mut Reader<&[u8]>,
        start: &BytesStart<'_>,
        has_children: bool,
    ) -> Result<()> {
        let decoder = reader.decoder();
        let index = match attr_value(start, decoder, b"r")? {
            Some(r) => {
                let number: usize = atoi_simd::parse(r.trim().as_bytes())
                    .map_err(|_| Error::MalformedAddress(r.clone()))?;
                if number == 0 || number > MAX_ROW_INDEX + 1 {
                    return Err(Error::MalformedAddress(r));
                }
                number - 1
            },
            None => self.last_row.map_or(0, |last| last + 1),
        };
        self.last_row = Some(index);

        let slots = match attr_value(start, decoder, b"spans")? {
            Some(spans) => parse_span(&spans)?.1,
            None => 0,
        };

        let tables = &self.tables;
        let cells = self.rows.entry(index).or_default();
        if cells.len() < slots {
            let filled = cells.len();
            cells.extend((filled..slots).map(|col| Cell::empty(index, col, Arc::clone(tables))));
        }

        if !has_children {
            return Ok(());
        }

        let mut buf = Vec::with_capacity(512);
        loop {
            buf.clear();
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) if e.local_name().as_ref() == b"c" => {
                    let attrs = cell_attributes(e, reader.decoder())?;
                    let cell = read_cell(reader, &attrs, index, tables, true)?;
                    place_cell(cells, &mut self.max_col, cell, tables);
                },
                Event::Empty(ref e) if e.local_name().as_ref() == b"c" => {
                    let attrs = cell_attributes(e, reader.decoder())?;
                    let cell = read_cell(reader, &attrs, index, tables, false)?;
                    place_cell(cells, &mut self.max_col, cell, tables);
                },
                Event::Start(_) => skip_element(reader)?,
                Event::End(ref e) if e.local_name().as_ref() == b"row" => break,
                Event::Eof => {
                    return Err(Error::MalformedMarkup(format!(
                        "unterminated <row> {}",
                        index + 1
                    )));
                },
                _ => {},
            }
        }

        Ok(())
    }

    /// Turn the collected rows into a sheet with contiguous row storage.
    fn finish(self) -> Sheet {
        let (Some(&first_row), Some(&last_row)) =
            (self.rows.keys().next(), self.rows.keys().next_back())
        else {
            return Sheet::default();
        };

        let mut rows = Vec::with_capacity(last_row - first_row + 1);
        let mut declared = self.rows.into_iter().peekable();
        for index in first_row..=last_row {
            match declared.next_if(|(declared_index, _)| *declared_index == index) {
                Some((_, cells)) => rows.push(Row::new(index, cells)),
                None => rows.push(Row::new(index, Vec::new())),
            }
        }

        Sheet {
            rows,
            first_row,
            max_row: last_row + 1,
            max_col: self.max_col,
            ..Sheet::default()
        }
    }
}

/// Store a parsed cell at its column, growing the row when needed.
///
/// Cells without an address are dropped.
fn place_cell(cells: &mut Vec<Cell>, max_col: &mut usize, cell: Option<Cell>, tables: &Arc<Tables>) {
    let Some(cell) = cell else {
        return;
    };
    let col = cell.col();
    if col >= cells.len() {
        let row = cell.row();
        let filled = cells.len();
        cells.extend((filled..=col).map(|c| Cell::empty(row, c, Arc::clone(tables))));
    }
    *max_col = (*max_col).max(col + 1);
    cells[col] = cell;
}

fn cell_attributes(start: &BytesStart<'_>, decoder: Decoder) -> Result<CellAttributes> {
    let mut attrs = CellAttributes {
        reference: None,
        cell_type: None,
        style_index: 0,
    };

    for attr in start.attributes() {
        let attr = attr?;
        match attr.key.local_name().as_ref() {
            b"r" => attrs.reference = Some(attr.decode_and_unescape_value(decoder)?.into_owned()),
            b"t" => attrs.cell_type = Some(attr.decode_and_unescape_value(decoder)?.into_owned()),
            // Formatting is cosmetic; an unreadable index falls back to the default style
            b"s" => attrs.style_index = atoi_simd::parse(attr.value.as_ref()).unwrap_or(0),
            _ => {},
        }
    }

    Ok(attrs)
}

/// Read a `<c>` element whose start tag was just consumed.
///
/// Returns `None` for a cell without an address; its content is still
/// consumed.
fn read_cell(
    reader: &mut Reader<&[u8]>,
    attrs: &CellAttributes,
    row: usize,
    tables: &Arc<Tables>,
    has_children: bool,
) -> Result<Option<Cell>> {
    let mut value = None;
    let mut inline = None;
    let mut formula = None;

    if has_children {
        let mut buf = Vec::with_capacity(256);
        loop {
            buf.clear();
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => match e.local_name().as_ref() {
                    b"v" => value = Some(read_text(reader)?),
                    b"f" => formula = Some(read_text(reader)?).filter(|f| !f.is_empty()),
                    b"is" => inline = Some(read_rich_text(reader, b"is")?),
                    _ => skip_element(reader)?,
                },
                Event::End(ref e) if e.local_name().as_ref() == b"c" => break,
                Event::Eof => {
                    return Err(Error::MalformedMarkup("unterminated <c> element".to_string()));
                },
                _ => {},
            }
        }
    }

    let Some(reference) = attrs.reference.as_deref().filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    let (col, _) = parse_cell_address(reference)?;

    let (text, cell_type) = match (attrs.cell_type.as_deref(), value) {
        (Some("inlineStr"), _) => match inline {
            Some(text) => (text, CellType::InlineString),
            None => (String::new(), CellType::Empty),
        },
        (_, None) => (String::new(), CellType::Empty),
        (Some("s"), Some(v)) if v.trim().is_empty() => (String::new(), CellType::Empty),
        (Some("s"), Some(v)) => (
            tables.shared_strings.lookup(&v)?.to_string(),
            CellType::SharedString,
        ),
        (Some("b"), Some(v)) => {
            let text = if v.trim() == "1" || v.trim().eq_ignore_ascii_case("true") {
                "TRUE"
            } else {
                "FALSE"
            };
            (text.to_string(), CellType::Boolean)
        },
        (Some("e"), Some(v)) => (v, CellType::Error),
        (Some("str"), Some(v)) => (v, CellType::FormulaString),
        (Some("d"), Some(v)) => (v, CellType::Date),
        (_, Some(v)) => (v, CellType::Number),
    };

    Ok(Some(
        Cell::new(row, col, text, cell_type, Arc::clone(tables))
            .with_style_index(attrs.style_index)
            .with_formula(formula),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::ErrorKind;
    use crate::ooxml::xlsx::shared_strings::SharedStrings;

    fn tables() -> Arc<Tables> {
        Arc::new(Tables {
            shared_strings: SharedStrings::from(vec!["Foo".to_string(), "Bar".to_string()]),
            ..Tables::default()
        })
    }

    fn sheet(sheet_data: &str) -> Sheet {
        try_sheet(sheet_data).unwrap()
    }

    fn try_sheet(sheet_data: &str) -> Result<Sheet> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">{}</worksheet>"#,
            sheet_data
        );
        parse_worksheet_xml(xml.as_bytes(), "Sheet1", SheetState::Visible, &tables())
    }

    fn texts(row: &Row) -> Vec<&str> {
        row.iter().map(Cell::text).collect()
    }

    #[test]
    fn test_basic_rows() {
        let sheet = sheet(
            r#"<dimension ref="A1:B2"/>
<sheetData>
  <row r="1" spans="1:2"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
  <row r="2" spans="1:2"><c r="A2"><v>1</v></c><c r="B2" s="3"><v>2.5</v></c></row>
</sheetData>"#,
        );

        assert_eq!(sheet.name(), "Sheet1");
        assert_eq!(sheet.rows().len(), 2);
        assert_eq!(texts(&sheet.rows()[0]), ["Foo", "Bar"]);
        assert_eq!(texts(&sheet.rows()[1]), ["1", "2.5"]);
        assert_eq!(sheet.rows()[0].cells()[0].cell_type(), CellType::SharedString);
        assert_eq!(sheet.cell(1, 1).map(Cell::style_index), Some(3));
        assert_eq!(sheet.max_row(), 2);
        assert_eq!(sheet.max_col(), 2);
        assert_eq!(sheet.first_row(), 0);
        assert_eq!(sheet.dimension().map(|d| d.to_string()).as_deref(), Some("A1:B2"));
    }

    #[test]
    fn test_leading_empty_rows() {
        let sheet = sheet(
            r#"<dimension ref="A1:D9"/>
<sheetData>
  <row r="4" spans="1:1"><c r="A4"><v>1</v></c></row>
  <row r="5" spans="1:1"><c r="A5"><v>2</v></c></row>
</sheetData>"#,
        );

        assert_eq!(sheet.rows().len(), 2);
        assert_eq!(sheet.first_row(), 3);
        assert_eq!(sheet.max_row(), 5);
        assert_eq!(sheet.max_col(), 1);
        assert_eq!(sheet.rows()[0].index(), 3);
        assert_eq!(sheet.cell(4, 0).map(Cell::text), Some("2"));
        assert_eq!(sheet.cell(4, 0).map(Cell::reference).as_deref(), Some("A5"));
        assert!(sheet.row_at(0).is_none());
    }

    #[test]
    fn test_gaps_filled_with_empty_cells() {
        let sheet = sheet(
            r#"<sheetData><row r="1" spans="1:4"><c r="A1" t="s"><v>0</v></c><c r="D1" t="s"><v>1</v></c></row></sheetData>"#,
        );

        let row = &sheet.rows()[0];
        assert_eq!(texts(row), ["Foo", "", "", "Bar"]);
        assert!(row.cells()[1].is_empty());
        assert_eq!(row.cells()[2].col(), 2);
        assert_eq!(sheet.max_col(), 4);
    }

    #[test]
    fn test_trailing_cells_follow_span() {
        let sheet = sheet(
            r#"<sheetData><row r="1" spans="1:3"><c r="A1" s="2"><v>7</v></c></row></sheetData>"#,
        );

        let row = &sheet.rows()[0];
        assert_eq!(row.len(), 3);
        let trailing = &row.cells()[2];
        assert_eq!(trailing.text(), "");
        assert_eq!(trailing.style_index(), 0);
        assert_eq!(trailing.style(), crate::ooxml::xlsx::styles::Style::default());
        assert_eq!(sheet.max_col(), 1);
    }

    #[test]
    fn test_span_lower_bound_does_not_offset() {
        let sheet = sheet(
            r#"<sheetData><row r="1" spans="5:7"><c r="F1"><v>6</v></c></row></sheetData>"#,
        );

        let row = &sheet.rows()[0];
        assert_eq!(row.len(), 7);
        assert_eq!(row.cells()[5].text(), "6");
        assert!(row.cells()[0].is_empty());
    }

    #[test]
    fn test_rows_grow_past_span() {
        let sheet = sheet(
            r#"<sheetData>
  <row r="1" spans="1:1"><c r="C1"><v>3</v></c></row>
  <row r="2"><c r="B2"><v>2</v></c></row>
  <row r="3" spans="1:3 5:6"/>
</sheetData>"#,
        );

        assert_eq!(sheet.rows()[0].len(), 3);
        assert_eq!(sheet.rows()[1].len(), 2);
        assert_eq!(sheet.rows()[2].len(), 6);
        assert_eq!(sheet.max_col(), 3);
        assert_eq!(sheet.max_row(), 3);
    }

    #[test]
    fn test_missing_rows_between_declared_rows() {
        let sheet = sheet(
            r#"<sheetData>
  <row r="2"><c r="A2"><v>1</v></c></row>
  <row r="5"><c r="A5"><v>2</v></c></row>
</sheetData>"#,
        );

        assert_eq!(sheet.rows().len(), 4);
        let indices: Vec<_> = sheet.rows().iter().map(Row::index).collect();
        assert_eq!(indices, [1, 2, 3, 4]);
        assert!(sheet.rows()[1].is_empty());
        assert!(sheet.rows()[2].is_empty());
        assert_eq!(sheet.cell(4, 0).map(Cell::text), Some("2"));
    }

    #[test]
    fn test_rows_without_number_continue() {
        let sheet = sheet(
            r#"<sheetData>
  <row r="3"><c r="A3"><v>1</v></c></row>
  <row><c r="A4"><v>2</v></c></row>
  <row><c r="A5"><v>3</v></c></row>
</sheetData>"#,
        );

        assert_eq!(sheet.first_row(), 2);
        assert_eq!(sheet.max_row(), 5);
        assert_eq!(sheet.cell(4, 0).map(Cell::text), Some("3"));
    }

    #[test]
    fn test_cell_without_address_is_skipped() {
        let sheet = sheet(
            r#"<sheetData><row r="1"><c r="A1"><v>1</v></c><c t="s"><v>1</v></c><c r=""><v>9</v></c></row></sheetData>"#,
        );

        assert_eq!(texts(&sheet.rows()[0]), ["1"]);
        assert_eq!(sheet.max_col(), 1);
    }

    #[test]
    fn test_value_kinds() {
        let sheet = sheet(
            r#"<sheetData><row r="1">
  <c r="A1" t="b"><v>1</v></c>
  <c r="B1" t="b"><v>0</v></c>
  <c r="C1" t="e"><v>#DIV/0!</v></c>
  <c r="D1" t="str"><f>CONCAT("a","b")</f><v>ab</v></c>
  <c r="E1" t="d"><v>2024-03-01T00:00:00</v></c>
  <c r="F1" t="inlineStr"><is><r><t>in</t></r><r><t xml:space="preserve">line </t></r></is></c>
  <c r="G1"><f>SUM(1,2)</f><v>3</v></c>
  <c r="H1" s="4"/>
  <c r="I1" t="n"><v>-1.5E-3</v></c>
  <c r="J1" t="s"/>
</row></sheetData>"#,
        );

        let row = &sheet.rows()[0];
        assert_eq!(
            texts(row),
            ["TRUE", "FALSE", "#DIV/0!", "ab", "2024-03-01T00:00:00", "inline ", "3", "", "-1.5E-3", ""]
        );
        let kinds: Vec<_> = row.iter().map(Cell::cell_type).collect();
        assert_eq!(
            kinds,
            [
                CellType::Boolean,
                CellType::Boolean,
                CellType::Error,
                CellType::FormulaString,
                CellType::Date,
                CellType::InlineString,
                CellType::Number,
                CellType::Empty,
                CellType::Number,
                CellType::Empty,
            ]
        );
        assert_eq!(row.cells()[0].as_bool(), Some(true));
        assert_eq!(row.cells()[3].formula(), Some(r#"CONCAT("a","b")"#));
        assert_eq!(row.cells()[6].formula(), Some("SUM(1,2)"));
        assert_eq!(row.cells()[6].as_f64(), Some(3.0));
        assert_eq!(row.cells()[7].style_index(), 4);
        assert_eq!(row.cells()[8].as_f64(), Some(-0.0015));
        assert_eq!(sheet.max_col(), 10);
    }

    #[test]
    fn test_shared_string_out_of_range() {
        let err = try_sheet(r#"<sheetData><row r="1"><c r="A1" t="s"><v>2</v></c></row></sheetData>"#)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSharedString);
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_shared_string_without_index_is_empty() {
        let sheet = sheet(
            r#"<sheetData><row r="1">
                <c r="A1" t="s"><v></v></c>
                <c r="B1" t="s"><v/></c>
                <c r="C1" t="s"><v>  </v></c>
                <c r="D1" t="s"><v>1</v></c>
            </row></sheetData>"#,
        );
        let row = &sheet.rows()[0];
        assert_eq!(texts(row), ["", "", "", "Bar"]);
        for col in 0..3 {
            assert_eq!(row.cell(col).map(Cell::cell_type), Some(CellType::Empty), "col {}", col);
        }
    }

    #[test]
    fn test_shared_string_index_not_numeric() {
        let err = try_sheet(r#"<sheetData><row r="1"><c r="A1" t="s"><v>abc</v></c></row></sheetData>"#)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSharedString);
        assert!(matches!(err, Error::NonNumericSharedString(ref index) if index == "abc"));
        assert!(err.to_string().contains("not a number"));
    }

    #[test]
    fn test_malformed_references() {
        let err = try_sheet(r#"<sheetData><row r="1"><c r="1A"><v>1</v></c></row></sheetData>"#)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedAddress);

        let err = try_sheet(r#"<sheetData><row r="1" spans="x"/></sheetData>"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRange);

        let err = try_sheet(r#"<sheetData><row r="0"/></sheetData>"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedAddress);
    }

    #[test]
    fn test_merged_ranges_and_bad_dimension() {
        let sheet = sheet(
            r#"<dimension ref="nonsense"/>
<sheetData><row r="1"><c r="A1"><v>1</v></c></row></sheetData>
<mergeCells count="2"><mergeCell ref="A1:B2"/><mergeCell ref="C3:C9"/></mergeCells>"#,
        );

        assert!(sheet.dimension().is_none());
        let merged: Vec<_> = sheet.merged_ranges().iter().map(ToString::to_string).collect();
        assert_eq!(merged, ["A1:B2", "C3:C9"]);

        let err = try_sheet(r#"<sheetData/><mergeCells><mergeCell ref="A1:"/></mergeCells>"#)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRange);
    }

    #[test]
    fn test_empty_sheet() {
        let sheet = sheet("<sheetData/>");
        assert!(sheet.rows().is_empty());
        assert_eq!(sheet.max_row(), 0);
        assert_eq!(sheet.max_col(), 0);
    }

    #[test]
    fn test_unrelated_markup_skipped() {
        let sheet = sheet(
            r#"<sheetPr><tabColor rgb="FF00FF00"/></sheetPr>
<cols><col min="1" max="2" width="12"/></cols>
<sheetData><row r="1"><c r="A1"><v>1</v></c></row></sheetData>
<extLst><ext uri="x"><row r="99"/></ext></extLst>"#,
        );
        assert_eq!(sheet.max_row(), 1);
    }
}
