use glob::Pattern;

/// Sheet chosen when no pattern is given, matching the name Excel gives the first sheet.
pub(crate) const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Criteria for selecting which sheet of a workbook is read.
#[derive(Clone, Debug, Default)]
pub struct Criteria {
    /// Sheet name patterns; the first sheet matching any of them is read.
    pub(crate) sheet_name_patterns: Option<Vec<Pattern>>,
}

impl Criteria {
    /// Creates criteria matching sheets by glob pattern.
    pub fn with_patterns(patterns: Vec<Pattern>) -> Self {
        Criteria {
            sheet_name_patterns: Some(patterns),
        }
    }

    /// Checks if a sheet name matches the criteria patterns.
    /// Returns true if no patterns are specified or if name matches any pattern.
    pub(crate) fn accept(&self, sheet_name: &str) -> bool {
        if let Some(patterns) = &self.sheet_name_patterns {
            patterns.iter().any(|pattern| pattern.matches(sheet_name))
        } else {
            true
        }
    }

    /// Picks the index of the sheet to read from the workbook's sheet names.
    /// Without patterns, `Sheet1` wins over position; otherwise the first sheet is used.
    pub(crate) fn select(&self, sheet_names: &[String]) -> Option<usize> {
        if self.sheet_name_patterns.is_some() {
            sheet_names.iter().position(|name| self.accept(name))
        } else {
            sheet_names
                .iter()
                .position(|name| name == DEFAULT_SHEET_NAME)
                .or(if sheet_names.is_empty() { None } else { Some(0) })
        }
    }
}
