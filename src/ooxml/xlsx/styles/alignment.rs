//! Cell alignment information.

use serde::Serialize;

/// Alignment of cell content, from an `<alignment>` child of a format record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Alignment {
    /// Horizontal alignment (e.g., "left", "center", "right", "fill", "justify")
    pub horizontal: Option<String>,
    /// Vertical alignment (e.g., "top", "center", "bottom", "justify")
    pub vertical: Option<String>,
    /// Text rotation (angle in degrees, 0-180, or 255 for vertical)
    pub text_rotation: Option<u32>,
    pub wrap_text: bool,
    /// Indent level (for horizontal alignment)
    pub indent: Option<u32>,
    pub shrink_to_fit: bool,
    /// Reading order (0=context, 1=LTR, 2=RTL)
    pub reading_order: Option<u32>,
}

impl Alignment {
    /// Create a new default alignment.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if this alignment has any non-default settings.
    #[inline]
    pub fn has_settings(&self) -> bool {
        *self != Self::default()
    }
}
