//! # Scrutiny Report
//!
//! Builds the per-stream category summary of one institution from a
//! validated scrutiny table, and lays it out as stacked sections of a single
//! worksheet.
use crate::config::ReportConfig;
use crate::error::ScrutinySheetError;
use crate::spreadsheet::writer::Workbook;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use tracing::warn;

mod layout;
pub mod streams;
pub mod summary;
pub mod table;

pub use streams::StreamSelection;
pub use summary::summarize;
pub use summary::CategorySummary;
pub use summary::Matcher;
pub use table::Percentage;
pub use table::Record;
pub use table::ScrutinyTable;
pub use table::REQUIRED_COLUMNS;

/// Errors raised while validating or aggregating scrutiny data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    #[error("Missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Missing percentage at {reference}")]
    MissingPercentage { reference: String },

    #[error("Invalid percentage '{value}' at {reference}")]
    InvalidPercentage { reference: String, value: String },
}

/// Summary block of one stream.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    pub stream: String,
    pub summaries: Vec<CategorySummary>,
}

/// Category summaries of one institution, one section per stream with data.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub institution: String,
    pub sections: Vec<Section>,
}

impl Report {
    /// Summarizes every selected stream of the institution in order.
    /// Streams without matching records are logged and left out.
    pub fn build(table: &ScrutinyTable, institution: &str, selection: &StreamSelection) -> Result<Report, ScrutinySheetError> {
        let college = Matcher::new(institution)?;
        let mut sections = Vec::new();
        for stream in selection.resolve(table) {
            let records = table.select(&college, &Matcher::new(&stream)?);
            if records.is_empty() {
                warn!(institution, stream = stream.as_str(), "No records found, skipping stream");
                continue;
            }
            let summaries = summarize(records)?;
            sections.push(Section { stream, summaries });
        }
        if sections.is_empty() {
            warn!(institution, "No stream produced a section, report is empty");
        }
        Ok(Report {
            institution: institution.to_owned(),
            sections,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Single-sheet workbook holding the laid out report.
    pub fn to_workbook(&self, config: &ReportConfig) -> Workbook {
        Workbook::new(vec![self.layout(&config.output_sheet_name)])
    }

    /// Writes the report workbook to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P, config: &ReportConfig) -> Result<(), ScrutinySheetError> {
        let path = path.as_ref();
        self.to_workbook(config).save(path)?;
        info!(
            institution = self.institution.as_str(),
            sections = self.sections.len(),
            output = %path.display(),
            "Report written"
        );
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::report::ScrutinyTable;
    use crate::spreadsheet::cell::CellType;
    use crate::spreadsheet::Cell;
    use crate::spreadsheet::Sheet;

    pub(crate) fn text(row: usize, col: usize, value: &str) -> Cell {
        Cell { row, col, kind: CellType::String, value: value.to_owned() }
    }

    pub(crate) fn number(row: usize, col: usize, value: f64) -> Cell {
        Cell { row, col, kind: CellType::Number, value: value.to_string() }
    }

    pub(crate) fn sheet(cells: Vec<Cell>) -> Sheet {
        let mut sheet = Sheet::new("scrutiny.xlsx", "Sheet1");
        for cell in cells {
            sheet.push(cell);
        }
        sheet
    }

    /// Standard header followed by one row per `(college, stream, category, percentage)`.
    pub(crate) fn scrutiny_sheet(rows: &[(&str, &str, &str, f64)]) -> Sheet {
        let mut cells = vec![
            text(0, 0, "CollegeName"),
            text(0, 1, "Stream"),
            text(0, 2, "ReservationCategory"),
            text(0, 3, "Percentage"),
        ];
        for (index, (college, stream, category, percentage)) in rows.iter().enumerate() {
            let row = index + 1;
            cells.push(text(row, 0, college));
            cells.push(text(row, 1, stream));
            cells.push(text(row, 2, category));
            cells.push(number(row, 3, *percentage));
        }
        sheet(cells)
    }

    pub(crate) fn table(rows: &[(&str, &str, &str, f64)]) -> ScrutinyTable {
        ScrutinyTable::try_from(&scrutiny_sheet(rows)).unwrap()
    }
}
