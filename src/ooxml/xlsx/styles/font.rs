//! Font records from the `<fonts>` table.

use serde::Serialize;

use super::Color;

/// Font information.
///
/// Defines the visual appearance of text in cells. The zero value (no name,
/// no size, no decoration) is what an unstyled cell resolves to.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Font {
    /// Font name/family (e.g., "Calibri", "Arial")
    pub name: Option<String>,
    /// Font size in points
    pub size: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    /// Underline style ("single" when `<u/>` carries no value)
    pub underline: Option<String>,
    pub strike: bool,
    pub color: Option<Color>,
    /// Font family (1=Roman, 2=Swiss, 3=Modern, 4=Script, 5=Decorative)
    pub family: Option<u32>,
    /// Font scheme (major, minor, none)
    pub scheme: Option<String>,
}

impl Font {
    /// Create a new default font.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the font has any text decoration.
    #[inline]
    pub fn has_formatting(&self) -> bool {
        self.bold || self.italic || self.strike || self.underline.is_some()
    }
}
