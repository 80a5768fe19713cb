//! Small helpers shared by the quick-xml based part parsers.
//!
//! quick-xml reports entity references (`&amp;`, `&#10;`) as separate events,
//! so text is accumulated through [`push_text`] rather than read from a
//! single `Text` event.

use quick_xml::Reader;
use quick_xml::encoding::Decoder;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};

use crate::common::error::{Error, Result};

/// Return the unescaped value of the attribute with the given local name.
pub(crate) fn attr_value(
    start: &BytesStart<'_>,
    decoder: Decoder,
    local_name: &[u8],
) -> Result<Option<String>> {
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == local_name {
            return Ok(Some(attr.decode_and_unescape_value(decoder)?.into_owned()));
        }
    }
    Ok(None)
}

/// Interpret an xsd:boolean attribute value.
#[inline]
pub(crate) fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Append the character data carried by `event` to `out`.
///
/// Returns `false` when the event carries no character data.
pub(crate) fn push_text(out: &mut String, event: &Event<'_>) -> Result<bool> {
    match event {
        Event::Text(text) => out.push_str(&text.decode()?),
        Event::CData(cdata) => {
            let raw = std::str::from_utf8(cdata.as_ref())
                .map_err(|e| Error::MalformedMarkup(format!("CDATA is not UTF-8: {}", e)))?;
            out.push_str(raw);
        },
        Event::GeneralRef(reference) => {
            if let Some(ch) = reference.resolve_char_ref()? {
                out.push(ch);
            } else {
                let name = reference.decode()?;
                match resolve_predefined_entity(&name) {
                    Some(resolved) => out.push_str(resolved),
                    None => {
                        return Err(Error::MalformedMarkup(format!(
                            "unknown entity reference '&{};'",
                            name
                        )));
                    },
                }
            }
        },
        _ => return Ok(false),
    }
    Ok(true)
}

/// Read all character data up to the end tag matching the element just opened.
///
/// Nested elements are descended into and their text is included.
pub(crate) fn read_text(reader: &mut Reader<&[u8]>) -> Result<String> {
    let mut text = String::new();
    let mut depth = 1usize;
    let mut buf = Vec::with_capacity(64);

    loop {
        buf.clear();
        let event = reader.read_event_into(&mut buf)?;
        match &event {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            },
            Event::Eof => {
                return Err(Error::MalformedMarkup(
                    "unexpected end of document inside element".to_string(),
                ));
            },
            other => {
                push_text(&mut text, other)?;
            },
        }
    }

    Ok(text)
}

/// Skip everything up to the end tag matching the element just opened.
pub(crate) fn skip_element(reader: &mut Reader<&[u8]>) -> Result<()> {
    let mut depth = 1usize;
    let mut buf = Vec::with_capacity(64);

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            },
            Event::Eof => {
                return Err(Error::MalformedMarkup(
                    "unexpected end of document inside element".to_string(),
                ));
            },
            _ => {},
        }
    }
}
