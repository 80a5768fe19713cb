//! Fill records from the `<fills>` table.

use serde::Serialize;

use super::Color;

/// Pattern fill of a cell background.
///
/// For a `solid` pattern only the foreground color is painted; the background
/// color shows through the holes of the other patterns. Gradient fills are
/// read as an empty fill.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Fill {
    /// Pattern type (e.g., "solid", "gray125", "lightGray"); `None` for no fill
    pub pattern_type: Option<String>,
    pub fg_color: Option<Color>,
    pub bg_color: Option<Color>,
}

impl Fill {
    /// Check if this is a solid fill.
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.pattern_type.as_deref() == Some("solid")
    }

    /// Check if the fill paints nothing.
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self.pattern_type.as_deref(), None | Some("none"))
    }
}
