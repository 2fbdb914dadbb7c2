use thiserror::Error;

/// Main error type for the Scrutiny Sheet crate.
/// Aggregates errors from the standard library, dependencies, and internal modules.
#[derive(Error, Debug)]
pub enum ScrutinySheetError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("{0}")]
    ParseFloatError(#[from] std::num::ParseFloatError),

    #[error("{0}")]
    StringEncodingError(#[from] std::str::Utf8Error),

    // Third-party library errors
    #[error("Invalid sheet pattern: {0}")]
    PatternError(#[from] glob::PatternError),

    #[error("{0}")]
    RegexError(#[from] regex::Error),

    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),

    // Report module errors
    #[error("{0}")]
    ReportError(#[from] crate::report::ReportError),
}

impl ScrutinySheetError {
    /// Returns the names of the required columns absent from the input, if that is why the build failed.
    pub fn missing_columns(&self) -> Option<&[String]> {
        match self {
            Self::ReportError(crate::report::ReportError::MissingColumns(missing)) => Some(missing),
            _ => None,
        }
    }
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, ScrutinySheetError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| ScrutinySheetError::WithContextError(format!("{}: {}", message, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportError;

    #[test]
    fn missing_columns_exposed() {
        let error = ScrutinySheetError::from(ReportError::MissingColumns(vec!["Stream".to_owned()]));
        assert_eq!(error.missing_columns(), Some(&["Stream".to_owned()][..]));
        assert_eq!(error.to_string(), "Missing columns: Stream");
    }

    #[test]
    fn with_prefix_keeps_message() {
        let result: Result<(), ScrutinySheetError> = Err(ScrutinySheetError::WithContextError("boom".to_owned()));
        let error = result.with_prefix("Read 'input.xlsx'").unwrap_err();
        assert_eq!(error.to_string(), "Read 'input.xlsx': boom");
        assert!(error.missing_columns().is_none());
    }
}
