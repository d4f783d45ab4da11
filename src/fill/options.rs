//! Fill options and configuration.

use crate::resolve::LIST_SEPARATOR;

/// Options for filling a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillOptions {
    /// Separator between values flattened from a to-many link
    pub list_separator: String,

    /// Whether a page break is appended before each record after the first
    pub page_break_between_records: bool,
}

impl FillOptions {
    /// Create new fill options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the list separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.list_separator = separator.into();
        self
    }

    /// Enable or disable page breaks between records.
    pub fn with_page_breaks(mut self, enabled: bool) -> Self {
        self.page_break_between_records = enabled;
        self
    }

    /// Disable page breaks between records.
    pub fn without_page_breaks(mut self) -> Self {
        self.page_break_between_records = false;
        self
    }
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            list_separator: LIST_SEPARATOR.to_string(),
            page_break_between_records: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = FillOptions::default();
        assert_eq!(opts.list_separator, ", ");
        assert!(opts.page_break_between_records);
    }

    #[test]
    fn test_builder() {
        let opts = FillOptions::new().with_separator("; ").without_page_breaks();
        assert_eq!(opts.list_separator, "; ");
        assert!(!opts.page_break_between_records);
        assert!(FillOptions::new().with_page_breaks(true).page_break_between_records);
    }
}
