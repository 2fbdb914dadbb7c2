//! # Spreadsheet Processing Module
//!
//! Reads Excel workbooks (`.xlsx`, `.xlsm`) into positioned, typed cells and
//! writes styled workbooks back out. Parsing works directly on the package's
//! ZIP archive and SpreadsheetML parts.
use crate::error::ScrutinySheetError;
use crate::helpers::reader::UnifiedReader;
use crate::spreadsheet::xlsx::XlsxSpreadsheet;
use std::ffi::OsStr;
use std::path::Path;
use thiserror::Error;

pub(crate) mod cell;
pub mod criteria;
pub(crate) mod excel;
pub(crate) mod reference;
pub mod sheet;
pub mod writer;
pub(crate) mod xlsx;

pub(crate) use cell::Cell;
pub use criteria::Criteria;
pub use sheet::Sheet;

/// Errors raised while opening or reading a workbook.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Missing part '{0}' in spreadsheet package")]
    FileError(String),

    #[error("Spreadsheet '{0}' is password protected")]
    SpreadsheetPasswordProtectedError(String),

    #[error("Spreadsheet '{0}' contains no sheets")]
    SpreadsheetEmptyError(String),

    #[error("No matching sheet found in '{0}'")]
    SheetNotFoundError(String),

    #[error("Unsupported spreadsheet format '{0}', expected .xlsx or .xlsm")]
    UnsupportedFormatError(String),

    #[error("Invalid cell value in '{0}' at {1}: {2}")]
    CellValueError(String, String, String),

    #[error("Invalid sheet name '{0}': {1}")]
    InvalidSheetNameError(String, String),
}

/// Common interface of readable workbook formats.
pub trait Spreadsheet {
    /// Returns the file name of this spreadsheet
    fn name(&self) -> String;

    /// Returns the sheet names in workbook order
    fn sheet_names(&self) -> Vec<String>;

    /// Reads the sheet selected by the criteria
    fn read_sheet(&mut self, criteria: &Criteria) -> Result<Sheet, ScrutinySheetError>;
}

/// Opens a workbook from a local path, detecting the format by extension.
pub fn open_spreadsheet<P: AsRef<Path>>(path: P) -> Result<Box<dyn Spreadsheet>, ScrutinySheetError> {
    let path = path.as_ref();
    let file_name = path.to_string_lossy().to_string();
    let extension = path.extension().and_then(OsStr::to_str).map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("xlsx") | Some("xlsm") => {
            let reader = UnifiedReader::new(path)?;
            Ok(Box::new(XlsxSpreadsheet::open(&file_name, reader)?))
        }
        _ => Err(SpreadsheetError::UnsupportedFormatError(file_name))?,
    }
}

/// Opens a workbook held in memory, such as an uploaded file.
pub fn open_spreadsheet_bytes(name: &str, bytes: Vec<u8>) -> Result<Box<dyn Spreadsheet>, ScrutinySheetError> {
    let reader = UnifiedReader::from_bytes(bytes);
    Ok(Box::new(XlsxSpreadsheet::open(name, reader)?))
}
