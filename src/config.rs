use crate::error::ScrutinySheetError;
use crate::spreadsheet::criteria::DEFAULT_SHEET_NAME;
use crate::spreadsheet::writer::validate_sheet_name;
use crate::spreadsheet::Criteria;
use glob::Pattern;

/// Options shared by the input and output side of a report run.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportConfig {
    /// Glob selecting the input sheet; `Sheet1` or the first sheet when unset
    pub sheet: Option<String>,
    /// Name of the single output sheet
    pub output_sheet_name: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            sheet: None,
            output_sheet_name: DEFAULT_SHEET_NAME.to_owned(),
        }
    }
}

impl ReportConfig {
    /// Rejects settings that would fail later: a malformed sheet pattern or an
    /// output sheet name Excel does not accept.
    pub fn validate(&self) -> Result<(), ScrutinySheetError> {
        self.criteria()?;
        validate_sheet_name(&self.output_sheet_name)
    }

    /// Compiles the sheet pattern into reading criteria.
    pub fn criteria(&self) -> Result<Criteria, ScrutinySheetError> {
        match &self.sheet {
            Some(pattern) => Ok(Criteria::with_patterns(vec![Pattern::new(pattern)?])),
            None => Ok(Criteria::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ReportConfig::default();
        assert_eq!(config.output_sheet_name, "Sheet1");
        assert!(config.criteria().unwrap().sheet_name_patterns.is_none());
    }

    #[test]
    fn sheet_pattern() {
        let config = ReportConfig { sheet: Some("Round*".to_owned()), ..ReportConfig::default() };
        let criteria = config.criteria().unwrap();
        assert!(criteria.accept("Round 1"));
        assert!(!criteria.accept("Sheet1"));
    }

    #[test]
    fn output_sheet_name_is_checked() {
        assert!(ReportConfig::default().validate().is_ok());
        for name in ["", "Marks/2024", "A name that is far too long for Excel"] {
            let config = ReportConfig { output_sheet_name: name.to_owned(), ..ReportConfig::default() };
            let error = config.validate().unwrap_err();
            assert!(error.to_string().starts_with(&format!("Invalid sheet name '{name}'")));
        }
    }

    #[test]
    fn invalid_pattern() {
        let config = ReportConfig { sheet: Some("Round[".to_owned()), ..ReportConfig::default() };
        let error = config.criteria().unwrap_err();
        assert!(matches!(error, ScrutinySheetError::PatternError(_)));
        assert!(error.to_string().starts_with("Invalid sheet pattern"));
    }
}
