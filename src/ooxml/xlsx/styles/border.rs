//! Border records from the `<borders>` table.

use serde::Serialize;

use super::Color;

/// Border information for a cell: four edges plus the diagonal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Border {
    pub left: BorderLine,
    pub right: BorderLine,
    pub top: BorderLine,
    pub bottom: BorderLine,
    /// Drawn in the directions enabled by `diagonal_up`/`diagonal_down`
    pub diagonal: BorderLine,
    pub diagonal_up: bool,
    pub diagonal_down: bool,
}

/// One side of a border.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BorderLine {
    /// Line style name (e.g., "thin", "medium", "double"); `None` when undrawn
    pub style: Option<String>,
    pub color: Option<Color>,
}

impl Border {
    /// Create a new empty border (no lines on any side).
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if this border draws any line.
    pub fn has_borders(&self) -> bool {
        [
            &self.left,
            &self.right,
            &self.top,
            &self.bottom,
            &self.diagonal,
        ]
        .iter()
        .any(|line| line.is_drawn())
    }
}

impl BorderLine {
    /// Check whether the line is visible.
    #[inline]
    pub fn is_drawn(&self) -> bool {
        !matches!(self.style.as_deref(), None | Some("none"))
    }
}
