//! Color references used by fonts, fills and borders.

use quick_xml::encoding::Decoder;
use quick_xml::events::BytesStart;
use serde::Serialize;

use crate::common::error::Result;
use crate::common::xml::parse_bool;

/// A color as written in a `<color>`, `<fgColor>` or `<bgColor>` element.
///
/// Theme and indexed colors are kept as references; resolving them needs the
/// theme part and the legacy palette, which the reader does not load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// ARGB hex string, e.g. "FF000000"
    Rgb(String),
    /// Theme color slot with optional tint (-1.0 darkest to 1.0 lightest)
    Theme { index: u32, tint: f64 },
    /// Index into the legacy color palette
    Indexed(u32),
    /// System automatic color
    Auto,
}

impl Color {
    /// Read a color from the attributes of a color element.
    ///
    /// `rgb` wins over `theme`, `theme` over `indexed`. Returns `None` when
    /// the element names no color at all.
    pub(crate) fn from_start(start: &BytesStart<'_>, decoder: Decoder) -> Result<Option<Self>> {
        let mut rgb = None;
        let mut theme = None;
        let mut tint = 0.0;
        let mut indexed = None;
        let mut auto = false;

        for attr in start.attributes() {
            let attr = attr?;
            let value = attr.decode_and_unescape_value(decoder)?;
            match attr.key.local_name().as_ref() {
                b"rgb" => rgb = Some(value.into_owned()),
                b"theme" => theme = value.parse::<u32>().ok(),
                b"tint" => tint = fast_float2::parse::<f64, _>(value.as_bytes()).unwrap_or(0.0),
                b"indexed" => indexed = value.parse::<u32>().ok(),
                b"auto" => auto = parse_bool(&value),
                _ => {},
            }
        }

        Ok(match (rgb, theme, indexed) {
            (Some(rgb), _, _) => Some(Color::Rgb(rgb)),
            (None, Some(index), _) => Some(Color::Theme { index, tint }),
            (None, None, Some(index)) => Some(Color::Indexed(index)),
            (None, None, None) if auto => Some(Color::Auto),
            _ => None,
        })
    }

    /// The ARGB hex string, if this is an explicit RGB color.
    #[inline]
    pub fn rgb(&self) -> Option<&str> {
        match self {
            Color::Rgb(rgb) => Some(rgb),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::Reader;
    use quick_xml::events::Event;

    fn color(xml: &str) -> Option<Color> {
        let mut reader = Reader::from_reader(xml.as_bytes());
        let mut buf = Vec::new();
        let Event::Empty(start) = reader.read_event_into(&mut buf).unwrap() else {
            panic!("expected empty element");
        };
        Color::from_start(&start, reader.decoder()).unwrap()
    }

    #[test]
    fn test_color_kinds() {
        assert_eq!(
            color(r#"<color rgb="FF00FF00"/>"#),
            Some(Color::Rgb("FF00FF00".to_string()))
        );
        assert_eq!(
            color(r#"<color theme="4" tint="-0.249977111117893"/>"#),
            Some(Color::Theme {
                index: 4,
                tint: -0.249977111117893
            })
        );
        assert_eq!(color(r#"<fgColor indexed="64"/>"#), Some(Color::Indexed(64)));
        assert_eq!(color(r#"<color auto="1"/>"#), Some(Color::Auto));
        assert_eq!(color("<color/>"), None);
    }

    #[test]
    fn test_rgb_accessor() {
        assert_eq!(Color::Rgb("FF000000".into()).rgb(), Some("FF000000"));
        assert_eq!(Color::Indexed(8).rgb(), None);
    }
}
