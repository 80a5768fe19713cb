//! Number format definitions and utilities.

use phf::phf_map;
use serde::Serialize;

/// First id available to custom formats; lower ids are reserved for built-ins.
pub const FIRST_CUSTOM_FORMAT_ID: u32 = 164;

/// Format codes of the built-in formats that are not locale dependent.
static BUILTIN_FORMATS: phf::Map<u32, &'static str> = phf_map! {
    0u32 => "General",
    1u32 => "0",
    2u32 => "0.00",
    3u32 => "#,##0",
    4u32 => "#,##0.00",
    9u32 => "0%",
    10u32 => "0.00%",
    11u32 => "0.00E+00",
    12u32 => "# ?/?",
    13u32 => "# ??/??",
    14u32 => "mm-dd-yy",
    15u32 => "d-mmm-yy",
    16u32 => "d-mmm",
    17u32 => "mmm-yy",
    18u32 => "h:mm AM/PM",
    19u32 => "h:mm:ss AM/PM",
    20u32 => "h:mm",
    21u32 => "h:mm:ss",
    22u32 => "m/d/yy h:mm",
    37u32 => "#,##0 ;(#,##0)",
    38u32 => "#,##0 ;[Red](#,##0)",
    39u32 => "#,##0.00;(#,##0.00)",
    40u32 => "#,##0.00;[Red](#,##0.00)",
    45u32 => "mm:ss",
    46u32 => "[h]:mm:ss",
    47u32 => "mmss.0",
    48u32 => "##0.0E+0",
    49u32 => "@",
};

/// Number format information.
///
/// Controls how a numeric cell value would be displayed. The default is the
/// built-in "General" format (id 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberFormat {
    pub id: u32,
    /// Format code (e.g., "General", "0.00", "mm/dd/yyyy")
    pub code: String,
}

impl NumberFormat {
    /// Create a new number format.
    #[inline]
    pub fn new(id: u32, code: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
        }
    }

    /// Look up a built-in format by id.
    pub fn builtin(id: u32) -> Option<Self> {
        builtin_format_code(id).map(|code| Self::new(id, code))
    }

    /// Check if the id is in the built-in range.
    #[inline]
    pub fn is_builtin(&self) -> bool {
        self.id < FIRST_CUSTOM_FORMAT_ID
    }

    /// Check if this format displays a date or time of day.
    pub fn is_date_format(&self) -> bool {
        is_date_format(&self.code)
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::new(0, "General")
    }
}

/// Get the format code for a built-in number format ID.
#[inline]
pub fn builtin_format_code(id: u32) -> Option<&'static str> {
    BUILTIN_FORMATS.get(&id).copied()
}

/// Check if a format code displays a date or time of day.
///
/// Only the first (positive) section is inspected. Quoted literals, escaped
/// characters and bracketed colors/locales are ignored. An elapsed-time
/// bracket such as `[h]` marks a duration, which is not a date.
pub fn is_date_format(code: &str) -> bool {
    let mut chars = code.chars();

    while let Some(c) = chars.next() {
        match c {
            ';' => return false,
            // Escape, padding and repeat take the next character literally
            '\\' | '_' | '*' => {
                chars.next();
            },
            '"' => {
                for quoted in chars.by_ref() {
                    if quoted == '"' {
                        break;
                    }
                }
            },
            '[' => {
                let mut empty = true;
                let mut elapsed = true;
                for inner in chars.by_ref() {
                    if inner == ']' {
                        break;
                    }
                    empty = false;
                    elapsed &= matches!(inner.to_ascii_lowercase(), 'h' | 'm' | 's');
                }
                if elapsed && !empty {
                    return false;
                }
            },
            c if matches!(c.to_ascii_lowercase(), 'd' | 'm' | 'y' | 'h' | 's') => return true,
            _ => {},
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_date_format() {
        assert!(is_date_format("DD/MM/YY"));
        assert!(is_date_format("yyyy-mm-dd"));
        assert!(is_date_format("H:MM:SS;@"));
        assert!(is_date_format("m\"M\"d\"D\";@"));
        assert!(is_date_format("[$-404]e\"年\"m\"月\"d\"日\""));
        assert!(is_date_format("[Red]dd/mm"));

        assert!(!is_date_format("General"));
        assert!(!is_date_format("0.00E+00"));
        assert!(!is_date_format("#,##0\\ [$\u{20bd}-46D]"));
        assert!(!is_date_format("\"Y: \"0.00\"m\";\"Y: \"-0.00\"m\";\"Y: <num>m\";@"));
        assert!(!is_date_format("\"$\"#,##0_);[Red](\"$\"#,##0)"));
        assert!(!is_date_format("0_ ;[Red]\\-0\\ "));
        assert!(!is_date_format("\\Y000000"));
        assert!(!is_date_format("#,##0.0####\" YMD\""));
        assert!(!is_date_format("[h]:mm:ss"));
        assert!(!is_date_format("[ss]"));
        assert!(!is_date_format("[m]"));
    }

    #[test]
    fn test_builtin_formats() {
        assert_eq!(builtin_format_code(0), Some("General"));
        assert_eq!(builtin_format_code(14), Some("mm-dd-yy"));
        assert_eq!(builtin_format_code(22), Some("m/d/yy h:mm"));
        assert_eq!(builtin_format_code(49), Some("@"));
        assert_eq!(builtin_format_code(5), None);
        assert_eq!(builtin_format_code(999), None);

        let date = NumberFormat::builtin(14).unwrap();
        assert!(date.is_builtin());
        assert!(date.is_date_format());
        assert!(!NumberFormat::default().is_date_format());
    }
}
