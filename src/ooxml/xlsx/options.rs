//! Options controlling how a workbook is loaded.

pub use crate::ooxml::xlsx::styles::StyleInheritance;

/// Default ceiling on the uncompressed size of a single part (512 MiB).
pub const DEFAULT_MAX_PART_SIZE: u64 = 512 * 1024 * 1024;

/// Configuration for [`Workbook`](super::Workbook) loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Build worksheets in parallel once the shared tables exist
    pub parallel_sheets: bool,
    /// How far style resolution cascades
    pub style_inheritance: StyleInheritance,
    /// Maximum uncompressed size of any part; `None` disables the check
    pub max_part_size: Option<u64>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            parallel_sheets: true,
            style_inheritance: StyleInheritance::Direct,
            max_part_size: Some(DEFAULT_MAX_PART_SIZE),
        }
    }
}

impl LoadOptions {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable parallel worksheet building
    pub fn with_parallel_sheets(mut self, parallel: bool) -> Self {
        self.parallel_sheets = parallel;
        self
    }

    /// Set the style inheritance mode
    pub fn with_style_inheritance(mut self, inheritance: StyleInheritance) -> Self {
        self.style_inheritance = inheritance;
        self
    }

    /// Set the part size ceiling
    pub fn with_max_part_size(mut self, limit: Option<u64>) -> Self {
        self.max_part_size = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_builder() {
        let options = LoadOptions::default();
        assert!(options.parallel_sheets);
        assert_eq!(options.style_inheritance, StyleInheritance::Direct);
        assert_eq!(options.max_part_size, Some(DEFAULT_MAX_PART_SIZE));

        let options = LoadOptions::new()
            .with_parallel_sheets(false)
            .with_style_inheritance(StyleInheritance::Named)
            .with_max_part_size(None);
        assert!(!options.parallel_sheets);
        assert_eq!(options.style_inheritance, StyleInheritance::Named);
        assert_eq!(options.max_part_size, None);
    }
}
