//! XML parser for the styles part (xl/styles.xml).
//!
//! Tables are read in document order, so the position of a record is its id.
//! Self-closing records (`<font/>`, `<xf .../>`) still occupy a slot.

use quick_xml::Reader;
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};

use super::{Alignment, Border, CellFormat, Color, Fill, Font, NumberFormat, Styles};
use crate::common::error::{Error, Result};
use crate::common::xml::{attr_value, parse_bool, skip_element};

/// Parse styles from xl/styles.xml content.
pub fn parse_styles(xml: &[u8]) -> Result<Styles> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut styles = Styles::new();
    let mut buf = Vec::with_capacity(1024);

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"numFmts" => parse_number_formats(&mut reader, &mut styles)?,
                b"fonts" => parse_fonts(&mut reader, &mut styles.fonts)?,
                b"fills" => parse_fills(&mut reader, &mut styles.fills)?,
                b"borders" => parse_borders(&mut reader, &mut styles.borders)?,
                b"cellStyleXfs" => {
                    parse_cell_xfs(&mut reader, b"cellStyleXfs", &mut styles.cell_style_xfs)?
                },
                b"cellXfs" => parse_cell_xfs(&mut reader, b"cellXfs", &mut styles.cell_xfs)?,
                b"styleSheet" => {},
                _ => skip_element(&mut reader)?,
            },
            Event::Eof => break,
            _ => {},
        }
    }

    Ok(styles)
}

fn unterminated(section: &str) -> Error {
    Error::MalformedMarkup(format!("unterminated <{}> in styles part", section))
}

/// Read the `val` attribute of a font property.
fn val(start: &BytesStart<'_>, decoder: Decoder) -> Result<Option<String>> {
    attr_value(start, decoder, b"val")
}

/// Toggle properties like `<b/>` are on unless `val` says otherwise.
fn toggle(start: &BytesStart<'_>, decoder: Decoder) -> Result<bool> {
    Ok(val(start, decoder)?.is_none_or(|v| parse_bool(&v)))
}

fn parse_u32(value: Option<String>) -> Option<u32> {
    value.and_then(|v| v.trim().parse::<u32>().ok())
}

/// Parse the number formats section.
fn parse_number_formats(reader: &mut Reader<&[u8]>, styles: &mut Styles) -> Result<()> {
    let mut buf = Vec::with_capacity(512);

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == b"numFmt" => {
                let id = parse_u32(attr_value(e, reader.decoder(), b"numFmtId")?);
                let code = attr_value(e, reader.decoder(), b"formatCode")?;

                if let (Some(id), Some(code)) = (id, code) {
                    styles.number_formats.insert(id, NumberFormat::new(id, code));
                }
            },
            Event::End(ref e) if e.local_name().as_ref() == b"numFmts" => break,
            Event::Eof => return Err(unterminated("numFmts")),
            _ => {},
        }
    }

    Ok(())
}

/// Parse the fonts section.
fn parse_fonts(reader: &mut Reader<&[u8]>, fonts: &mut Vec<Font>) -> Result<()> {
    let mut buf = Vec::with_capacity(512);

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) if e.local_name().as_ref() == b"font" => {
                fonts.push(parse_font(reader)?);
            },
            Event::Empty(ref e) if e.local_name().as_ref() == b"font" => fonts.push(Font::new()),
            Event::End(ref e) if e.local_name().as_ref() == b"fonts" => break,
            Event::Eof => return Err(unterminated("fonts")),
            _ => {},
        }
    }

    Ok(())
}

/// Parse the properties of a `<font>` element whose start tag was just read.
fn parse_font(reader: &mut Reader<&[u8]>) -> Result<Font> {
    let mut font = Font::new();
    let mut buf = Vec::with_capacity(256);

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let decoder = reader.decoder();
                match e.local_name().as_ref() {
                    b"name" => font.name = val(e, decoder)?,
                    b"sz" => {
                        font.size = val(e, decoder)?
                            .and_then(|v| fast_float2::parse::<f64, _>(v.as_bytes()).ok());
                    },
                    b"b" => font.bold = toggle(e, decoder)?,
                    b"i" => font.italic = toggle(e, decoder)?,
                    b"strike" => font.strike = toggle(e, decoder)?,
                    b"u" => {
                        let style = val(e, decoder)?.unwrap_or_else(|| "single".to_string());
                        font.underline = (style != "none").then_some(style);
                    },
                    b"color" => font.color = Color::from_start(e, decoder)?,
                    b"family" => font.family = parse_u32(val(e, decoder)?),
                    b"scheme" => font.scheme = val(e, decoder)?,
                    _ => {},
                }
            },
            Event::End(ref e) if e.local_name().as_ref() == b"font" => break,
            Event::Eof => return Err(unterminated("font")),
            _ => {},
        }
    }

    Ok(font)
}

/// Parse the fills section.
fn parse_fills(reader: &mut Reader<&[u8]>, fills: &mut Vec<Fill>) -> Result<()> {
    let mut buf = Vec::with_capacity(512);

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) if e.local_name().as_ref() == b"fill" => {
                fills.push(parse_fill(reader)?);
            },
            Event::Empty(ref e) if e.local_name().as_ref() == b"fill" => fills.push(Fill::default()),
            Event::End(ref e) if e.local_name().as_ref() == b"fills" => break,
            Event::Eof => return Err(unterminated("fills")),
            _ => {},
        }
    }

    Ok(())
}

/// Parse a single `<fill>`; only pattern fills contribute.
fn parse_fill(reader: &mut Reader<&[u8]>) -> Result<Fill> {
    let mut fill = Fill::default();
    let mut buf = Vec::with_capacity(256);

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let decoder = reader.decoder();
                match e.local_name().as_ref() {
                    b"patternFill" => fill.pattern_type = attr_value(e, decoder, b"patternType")?,
                    b"fgColor" => fill.fg_color = Color::from_start(e, decoder)?,
                    b"bgColor" => fill.bg_color = Color::from_start(e, decoder)?,
                    _ => {},
                }
            },
            Event::End(ref e) if e.local_name().as_ref() == b"fill" => break,
            Event::Eof => return Err(unterminated("fill")),
            _ => {},
        }
    }

    Ok(fill)
}

/// Parse the borders section.
fn parse_borders(reader: &mut Reader<&[u8]>, borders: &mut Vec<Border>) -> Result<()> {
    let mut buf = Vec::with_capacity(512);

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) if e.local_name().as_ref() == b"border" => {
                let mut border = border_attributes(e, reader.decoder())?;
                parse_border_sides(reader, &mut border)?;
                borders.push(border);
            },
            Event::Empty(ref e) if e.local_name().as_ref() == b"border" => {
                borders.push(border_attributes(e, reader.decoder())?);
            },
            Event::End(ref e) if e.local_name().as_ref() == b"borders" => break,
            Event::Eof => return Err(unterminated("borders")),
            _ => {},
        }
    }

    Ok(())
}

fn border_attributes(start: &BytesStart<'_>, decoder: Decoder) -> Result<Border> {
    let mut border = Border::new();
    border.diagonal_up = attr_value(start, decoder, b"diagonalUp")?.is_some_and(|v| parse_bool(&v));
    border.diagonal_down =
        attr_value(start, decoder, b"diagonalDown")?.is_some_and(|v| parse_bool(&v));
    Ok(border)
}

/// Parse the sides of a `<border>` element whose start tag was just read.
fn parse_border_sides(reader: &mut Reader<&[u8]>, border: &mut Border) -> Result<()> {
    let mut buf = Vec::with_capacity(256);

    loop {
        buf.clear();
        let (start, has_children) = match reader.read_event_into(&mut buf)? {
            Event::Start(e) => (e, true),
            Event::Empty(e) => (e, false),
            Event::End(ref e) if e.local_name().as_ref() == b"border" => break,
            Event::Eof => return Err(unterminated("border")),
            _ => continue,
        };

        let side = match start.local_name().as_ref() {
            b"left" | b"start" => &mut border.left,
            b"right" | b"end" => &mut border.right,
            b"top" => &mut border.top,
            b"bottom" => &mut border.bottom,
            b"diagonal" => &mut border.diagonal,
            _ => continue,
        };
        side.style = attr_value(&start, reader.decoder(), b"style")?;
        if has_children {
            side.color = parse_border_color(reader)?;
        }
    }

    Ok(())
}

/// Read the `<color>` inside a border side, consuming the side's end tag.
fn parse_border_color(reader: &mut Reader<&[u8]>) -> Result<Option<Color>> {
    let mut color = None;
    let mut depth = 1usize;
    let mut buf = Vec::with_capacity(128);

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                depth += 1;
                if e.local_name().as_ref() == b"color" {
                    color = Color::from_start(e, reader.decoder())?;
                }
            },
            Event::Empty(ref e) if e.local_name().as_ref() == b"color" => {
                color = Color::from_start(e, reader.decoder())?;
            },
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(color);
                }
            },
            Event::Eof => return Err(unterminated("border")),
            _ => {},
        }
    }
}

/// Parse the format records of `cellXfs` or `cellStyleXfs`.
fn parse_cell_xfs(
    reader: &mut Reader<&[u8]>,
    section: &[u8],
    records: &mut Vec<CellFormat>,
) -> Result<()> {
    let mut buf = Vec::with_capacity(512);

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) if e.local_name().as_ref() == b"xf" => {
                let mut format = xf_attributes(e, reader.decoder())?;
                parse_xf_children(reader, &mut format)?;
                records.push(format);
            },
            Event::Empty(ref e) if e.local_name().as_ref() == b"xf" => {
                records.push(xf_attributes(e, reader.decoder())?);
            },
            Event::End(ref e) if e.local_name().as_ref() == section => break,
            Event::Eof => return Err(unterminated(&String::from_utf8_lossy(section))),
            _ => {},
        }
    }

    Ok(())
}

/// Read the ids and apply flags of an `<xf>` record.
fn xf_attributes(start: &BytesStart<'_>, decoder: Decoder) -> Result<CellFormat> {
    let mut format = CellFormat::new();

    for attr in start.attributes() {
        let attr = attr?;
        let value = attr.decode_and_unescape_value(decoder)?;
        let id = || value.trim().parse::<u32>().ok();
        match attr.key.local_name().as_ref() {
            b"numFmtId" => format.num_fmt_id = id(),
            b"fontId" => format.font_id = id(),
            b"fillId" => format.fill_id = id(),
            b"borderId" => format.border_id = id(),
            b"xfId" => format.xf_id = id(),
            b"applyNumberFormat" => format.apply_number_format = parse_bool(&value),
            b"applyFont" => format.apply_font = parse_bool(&value),
            b"applyFill" => format.apply_fill = parse_bool(&value),
            b"applyBorder" => format.apply_border = parse_bool(&value),
            b"applyAlignment" => format.apply_alignment = parse_bool(&value),
            _ => {},
        }
    }

    Ok(format)
}

/// Parse the children of an `<xf>` element whose start tag was just read.
fn parse_xf_children(reader: &mut Reader<&[u8]>, format: &mut CellFormat) -> Result<()> {
    let mut buf = Vec::with_capacity(256);

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e)
                if e.local_name().as_ref() == b"alignment" =>
            {
                format.alignment = Some(parse_alignment(e, reader.decoder())?);
            },
            Event::End(ref e) if e.local_name().as_ref() == b"xf" => break,
            Event::Eof => return Err(unterminated("xf")),
            _ => {},
        }
    }

    Ok(())
}

/// Read an `<alignment>` element.
fn parse_alignment(start: &BytesStart<'_>, decoder: Decoder) -> Result<Alignment> {
    let mut alignment = Alignment::new();

    for attr in start.attributes() {
        let attr = attr?;
        let value = attr.decode_and_unescape_value(decoder)?;
        match attr.key.local_name().as_ref() {
            b"horizontal" => alignment.horizontal = Some(value.into_owned()),
            b"vertical" => alignment.vertical = Some(value.into_owned()),
            b"textRotation" => alignment.text_rotation = value.parse::<u32>().ok(),
            b"wrapText" => alignment.wrap_text = parse_bool(&value),
            b"indent" => alignment.indent = value.parse::<u32>().ok(),
            b"shrinkToFit" => alignment.shrink_to_fit = parse_bool(&value),
            b"readingOrder" => alignment.reading_order = value.parse::<u32>().ok(),
            _ => {},
        }
    }

    Ok(alignment)
}
