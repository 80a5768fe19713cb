//! Styles and formatting for Excel files.
//!
//! The styles part holds four component tables (number formats, fonts,
//! fills, borders) and two tables of format records that point into them:
//! `cellStyleXfs` (named cell styles) and `cellXfs` (the records cells refer
//! to through their `s` attribute).
//!
//! # Architecture
//!
//! - `parser`: XML parsing logic for styles.xml
//! - `number_format`: Number format definitions, built-in table and date detection
//! - `font`, `fill`, `border`, `alignment`, `color`: component records
//! - `cell_style`: format records (`<xf>`)
//!
//! A cell's [`Style`] is never stored; [`Styles::resolve`] derives it from the
//! tables when asked.
//!
//! # Example
//!
//! ```rust,no_run
//! use quince::ooxml::xlsx::{StyleInheritance, Styles};
//!
//! let xml = std::fs::read("xl/styles.xml")?;
//! let styles = Styles::parse(&xml)?;
//! let style = styles.resolve(1, StyleInheritance::Direct);
//! println!("Font: {:?} {:?}", style.font.name, style.font.size);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod alignment;
mod border;
mod cell_style;
mod color;
mod fill;
mod font;
mod number_format;
mod parser;

pub use alignment::Alignment;
pub use border::{Border, BorderLine};
pub use cell_style::CellFormat;
pub use color::Color;
pub use fill::Fill;
pub use font::Font;
pub use number_format::{NumberFormat, builtin_format_code, is_date_format};

use std::collections::HashMap;

use serde::Serialize;

use crate::common::error::Result;

/// How far the style cascade reaches when resolving a cell format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StyleInheritance {
    /// Only the cell's own `cellXfs` record contributes
    #[default]
    Direct,
    /// Facets the cell format does not apply fall back to its named style
    /// (`cellStyleXfs[xfId]`)
    Named,
}

/// Styles collection for an Excel workbook.
#[derive(Debug, Default, Clone)]
pub struct Styles {
    /// Custom number formats (ID -> format code)
    pub number_formats: HashMap<u32, NumberFormat>,
    pub fonts: Vec<Font>,
    pub fills: Vec<Fill>,
    pub borders: Vec<Border>,
    /// Named cell style records
    pub cell_style_xfs: Vec<CellFormat>,
    /// Cell format records (the actual styles applied to cells)
    pub cell_xfs: Vec<CellFormat>,
}

/// Fully resolved formatting of one cell.
///
/// Every facet the format record does not apply holds its default value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Style {
    pub font: Font,
    pub fill: Fill,
    pub border: Border,
    pub number_format: NumberFormat,
    pub alignment: Alignment,
}

impl Styles {
    /// Create a new empty styles collection.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse styles from xl/styles.xml content.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        parser::parse_styles(xml)
    }

    /// Get a number format by ID, custom formats first, then built-ins.
    pub fn number_format(&self, id: u32) -> Option<NumberFormat> {
        self.number_formats
            .get(&id)
            .cloned()
            .or_else(|| NumberFormat::builtin(id))
    }

    /// Get the cell format record at a style index.
    #[inline]
    pub fn cell_format(&self, index: usize) -> Option<&CellFormat> {
        self.cell_xfs.get(index)
    }

    /// Resolve a cell's style index into its merged style.
    ///
    /// Index 0 and indices past the end of `cellXfs` give the default style.
    /// A facet contributes only when its apply flag is set on the record; an
    /// id pointing past its component table gives that facet's default.
    pub fn resolve(&self, index: usize, inheritance: StyleInheritance) -> Style {
        if index == 0 {
            return Style::default();
        }
        let Some(xf) = self.cell_xfs.get(index) else {
            return Style::default();
        };

        let named = match inheritance {
            StyleInheritance::Direct => None,
            StyleInheritance::Named => xf
                .xf_id
                .and_then(|id| self.cell_style_xfs.get(id as usize)),
        };
        // Pick the record's id when applied, else the named style's id
        let pick = |applied: bool, own: Option<u32>, inherited: fn(&CellFormat) -> Option<u32>| {
            if applied {
                own
            } else {
                named.and_then(inherited)
            }
        };

        let font = pick(xf.apply_font, xf.font_id, |n| n.font_id)
            .and_then(|id| self.fonts.get(id as usize))
            .cloned()
            .unwrap_or_default();
        let fill = pick(xf.apply_fill, xf.fill_id, |n| n.fill_id)
            .and_then(|id| self.fills.get(id as usize))
            .cloned()
            .unwrap_or_default();
        let border = pick(xf.apply_border, xf.border_id, |n| n.border_id)
            .and_then(|id| self.borders.get(id as usize))
            .cloned()
            .unwrap_or_default();
        let number_format = pick(xf.apply_number_format, xf.num_fmt_id, |n| n.num_fmt_id)
            .and_then(|id| self.number_format(id))
            .unwrap_or_default();
        let alignment = if xf.apply_alignment {
            xf.alignment.clone()
        } else {
            named.and_then(|n| n.alignment.clone())
        }
        .unwrap_or_default();

        Style {
            font,
            fill,
            border,
            number_format,
            alignment,
        }
    }

    /// Check whether the number format resolved at `index` shows a date.
    pub fn is_date_style(&self, index: usize, inheritance: StyleInheritance) -> bool {
        self.resolve(index, inheritance)
            .number_format
            .is_date_format()
    }

    /// Get the number of fonts defined.
    #[inline]
    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    /// Get the number of fills defined.
    #[inline]
    pub fn fill_count(&self) -> usize {
        self.fills.len()
    }

    /// Get the number of borders defined.
    #[inline]
    pub fn border_count(&self) -> usize {
        self.borders.len()
    }

    /// Get the number of cell format records defined.
    #[inline]
    pub fn cell_format_count(&self) -> usize {
        self.cell_xfs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <numFmts count="1">
    <numFmt numFmtId="164" formatCode="yyyy\-mm\-dd"/>
  </numFmts>
  <fonts count="4">
    <font><sz val="11"/><color theme="1"/><name val="Calibri"/><family val="2"/><scheme val="minor"/></font>
    <font><b/><sz val="11"/><color rgb="FFFF0000"/><name val="Calibri"/></font>
    <font><i/><u/><sz val="12.5"/><name val="Arial"/></font>
    <font><b val="0"/><strike/><sz val="8"/><name val="Courier New"/></font>
  </fonts>
  <fills count="3">
    <fill><patternFill patternType="none"/></fill>
    <fill><patternFill patternType="gray125"/></fill>
    <fill><patternFill patternType="solid"><fgColor rgb="FF000000"/><bgColor rgb="00FF0000"/></patternFill></fill>
  </fills>
  <borders count="2">
    <border><left/><right/><top/><bottom/><diagonal/></border>
    <border diagonalUp="1">
      <left style="thin"><color indexed="64"/></left>
      <right style="thin"><color auto="1"/></right>
      <top style="thin"/>
      <bottom style="thin"><color rgb="FF00FF00"/></bottom>
      <diagonal style="dashed"/>
    </border>
  </borders>
  <cellStyleXfs count="2">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
    <xf numFmtId="0" fontId="2" fillId="2" borderId="1" applyFont="1"/>
  </cellStyleXfs>
  <cellXfs count="5">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
    <xf numFmtId="164" fontId="1" fillId="2" borderId="1" xfId="0" applyNumberFormat="1" applyFont="1" applyFill="1" applyBorder="1"/>
    <xf numFmtId="14" fontId="1" fillId="2" borderId="1" xfId="1" applyNumberFormat="1"/>
    <xf numFmtId="0" fontId="9" fillId="9" borderId="9" xfId="0" applyFont="1" applyFill="1" applyBorder="1" applyAlignment="1">
      <alignment horizontal="center" vertical="top" wrapText="1"/>
    </xf>
    <xf numFmtId="4" fontId="3" fillId="0" borderId="0" xfId="0" applyNumberFormat="true" applyFont="true"/>
  </cellXfs>
  <cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>
  <dxfs count="0"/>
</styleSheet>"#;

    fn styles() -> Styles {
        Styles::parse(STYLES_XML.as_bytes()).unwrap()
    }

    #[test]
    fn test_parse_tables() {
        let styles = styles();
        assert_eq!(styles.font_count(), 4);
        assert_eq!(styles.fill_count(), 3);
        assert_eq!(styles.border_count(), 2);
        assert_eq!(styles.cell_style_xfs.len(), 2);
        assert_eq!(styles.cell_format_count(), 5);

        let font = &styles.fonts[0];
        assert_eq!(font.name.as_deref(), Some("Calibri"));
        assert_eq!(font.size, Some(11.0));
        assert_eq!(font.color, Some(Color::Theme { index: 1, tint: 0.0 }));
        assert_eq!(font.scheme.as_deref(), Some("minor"));

        assert!(styles.fonts[1].bold);
        assert!(styles.fonts[2].italic);
        assert_eq!(styles.fonts[2].underline.as_deref(), Some("single"));
        assert_eq!(styles.fonts[2].size, Some(12.5));
        assert!(!styles.fonts[3].bold);
        assert!(styles.fonts[3].strike);

        let fill = &styles.fills[2];
        assert!(fill.is_solid());
        assert_eq!(fill.fg_color.as_ref().and_then(Color::rgb), Some("FF000000"));
        assert_eq!(fill.bg_color.as_ref().and_then(Color::rgb), Some("00FF0000"));
        assert!(styles.fills[0].is_none());

        let border = &styles.borders[1];
        for line in [&border.left, &border.right, &border.top, &border.bottom] {
            assert_eq!(line.style.as_deref(), Some("thin"));
        }
        assert_eq!(border.left.color, Some(Color::Indexed(64)));
        assert_eq!(border.right.color, Some(Color::Auto));
        assert_eq!(border.top.color, None);
        assert_eq!(border.diagonal.style.as_deref(), Some("dashed"));
        assert!(border.diagonal_up);
        assert!(!styles.borders[0].has_borders());

        let xf = &styles.cell_xfs[1];
        assert_eq!(xf.num_fmt_id, Some(164));
        assert_eq!(xf.font_id, Some(1));
        assert!(xf.apply_font && xf.apply_fill && xf.apply_border && xf.apply_number_format);
        assert!(!xf.apply_alignment);
        assert_eq!(
            styles.number_format(164).unwrap().code,
            "yyyy\\-mm\\-dd"
        );
    }

    #[test]
    fn test_resolve_all_facets() {
        let styles = styles();
        let style = styles.resolve(1, StyleInheritance::Direct);

        assert_eq!(style.font.name.as_deref(), Some("Calibri"));
        assert!(style.font.bold);
        assert!(style.fill.is_solid());
        assert_eq!(style.border.bottom.style.as_deref(), Some("thin"));
        assert_eq!(style.number_format.id, 164);
        assert!(style.number_format.is_date_format());
        assert_eq!(style.alignment, Alignment::default());
        assert!(style.font.has_formatting());
        assert!(style.border.has_borders());
        assert!(!style.alignment.has_settings());
    }

    #[test]
    fn test_unapplied_facets_stay_default() {
        let styles = styles();
        // Only the number format is applied; ids for the rest are ignored
        let style = styles.resolve(2, StyleInheritance::Direct);
        assert_eq!(style.font, Font::default());
        assert_eq!(style.fill, Fill::default());
        assert_eq!(style.border, Border::default());
        assert!(!style.font.has_formatting());
        assert!(style.fill.is_none());
        assert!(!style.border.has_borders());
        assert_eq!(style.number_format, NumberFormat::new(14, "mm-dd-yy"));
        assert!(styles.is_date_style(2, StyleInheritance::Direct));
    }

    #[test]
    fn test_named_inheritance() {
        let styles = styles();
        let style = styles.resolve(2, StyleInheritance::Named);
        assert_eq!(style.font.name.as_deref(), Some("Arial"));
        assert!(style.fill.is_solid());
        assert_eq!(style.border.left.style.as_deref(), Some("thin"));
        assert_eq!(style.number_format.id, 14);
    }

    #[test]
    fn test_out_of_range_ids_give_default_facets() {
        let styles = styles();
        let style = styles.resolve(3, StyleInheritance::Direct);
        assert_eq!(style.font, Font::default());
        assert_eq!(style.fill, Fill::default());
        assert_eq!(style.border, Border::default());
        assert_eq!(style.alignment.horizontal.as_deref(), Some("center"));
        assert!(style.alignment.has_settings());
        assert_eq!(style.alignment.vertical.as_deref(), Some("top"));
        assert!(style.alignment.wrap_text);
    }

    #[test]
    fn test_default_indices() {
        let styles = styles();
        assert_eq!(styles.resolve(0, StyleInheritance::Direct), Style::default());
        assert_eq!(styles.resolve(99, StyleInheritance::Named), Style::default());
        assert_eq!(Style::default().number_format.code, "General");
    }

    #[test]
    fn test_apply_flag_gates_font() {
        let font = Font {
            name: Some("Calibra".to_string()),
            size: Some(10.0),
            ..Font::default()
        };
        let applied = CellFormat {
            font_id: Some(0),
            apply_font: true,
            ..CellFormat::default()
        };
        let mut styles = Styles {
            fonts: vec![font.clone()],
            cell_xfs: vec![CellFormat::default(), applied],
            ..Styles::default()
        };

        let style = styles.resolve(1, StyleInheritance::Direct);
        assert_eq!(style.font.name.as_deref(), Some("Calibra"));
        assert_eq!(style.font.size, Some(10.0));

        styles.cell_xfs[1].apply_font = false;
        assert_eq!(styles.resolve(1, StyleInheritance::Direct).font, Font::default());
    }

    #[test]
    fn test_builtin_number_format_lookup() {
        let styles = styles();
        assert_eq!(styles.number_format(4).unwrap().code, "#,##0.00");
        assert!(styles.number_format(163).is_none());
        let style = styles.resolve(4, StyleInheritance::Direct);
        assert_eq!(style.number_format.code, "#,##0.00");
        assert_eq!(style.font.name.as_deref(), Some("Courier New"));
    }

    #[test]
    fn test_style_serializes() {
        let style = styles().resolve(1, StyleInheritance::Direct);
        let json = serde_json::to_value(&style).unwrap();
        assert_eq!(json["font"]["name"], "Calibri");
        assert_eq!(json["fill"]["fg_color"]["rgb"], "FF000000");
        assert_eq!(json["number_format"]["id"], 164);
    }

    #[test]
    fn test_truncated_styles_part() {
        let err = Styles::parse(b"<styleSheet><fonts><font><sz val=\"11\"/>").unwrap_err();
        assert_eq!(err.kind(), crate::common::error::ErrorKind::MalformedMarkup);
    }
}
