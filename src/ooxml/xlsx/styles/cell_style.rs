//! Cell format records (`<xf>`) from `cellXfs` and `cellStyleXfs`.

use serde::Serialize;

use super::Alignment;

/// One `<xf>` record.
///
/// Each facet is a component id plus an apply flag; the flag decides whether
/// the id contributes when the record is resolved into a [`Style`](super::Style).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CellFormat {
    /// Number format ID (built-in or custom)
    pub num_fmt_id: Option<u32>,
    /// Index into the fonts table
    pub font_id: Option<u32>,
    /// Index into the fills table
    pub fill_id: Option<u32>,
    /// Index into the borders table
    pub border_id: Option<u32>,
    /// Named cell style (index into cellStyleXfs); only set on cellXfs records
    pub xf_id: Option<u32>,
    pub alignment: Option<Alignment>,
    pub apply_number_format: bool,
    pub apply_font: bool,
    pub apply_fill: bool,
    pub apply_border: bool,
    pub apply_alignment: bool,
}

impl CellFormat {
    /// Create a new empty cell format.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}
