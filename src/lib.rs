//! # Scrutiny Sheet
//!
//! Builds admission scrutiny reports from Excel workbooks. For one institution
//! and a list of academic streams, the highest and lowest admission percentage
//! of every reservation category is computed and written to a new workbook,
//! one titled section per stream.
//!
//! ## Features
//!
//! - **Schema validation**: `CollegeName`, `Stream`, `ReservationCategory` and
//!   `Percentage` columns are required; header whitespace is ignored
//! - **Loose matching**: institution and stream filters are case-insensitive
//!   substring matches
//! - **`everything` streams**: report on every stream present in the data
//! - **Self-contained Excel I/O**: `.xlsx` / `.xlsm` read and written directly
//!   from the ZIP package, no external runtime
//! - **Deterministic output**: identical inputs produce identical bytes
//!
//! ## Example
//!
//! ```no_run
//! use scrutiny_sheet::{generate_report, ReportConfig, StreamSelection};
//!
//! let streams = StreamSelection::parse("Science, Arts");
//! let report = generate_report("scrutiny.xlsx", "report.xlsx", "Alpha College", &streams, &ReportConfig::default())?;
//! println!("{} sections", report.sections.len());
//! # Ok::<(), scrutiny_sheet::ScrutinySheetError>(())
//! ```
mod config;
mod error;
mod helpers;
pub mod report;
pub mod spreadsheet;

pub use crate::config::ReportConfig;
pub use crate::error::ScrutinySheetError;
pub use crate::report::Report;
pub use crate::report::ReportError;
pub use crate::report::ScrutinyTable;
pub use crate::report::StreamSelection;

use crate::error::ResultMessage;
use crate::spreadsheet::open_spreadsheet;
use crate::spreadsheet::open_spreadsheet_bytes;
use crate::spreadsheet::Spreadsheet;
use std::path::Path;
use tracing::debug;
use tracing::info;

/// Reads and validates the scrutiny table of a workbook on disk.
pub fn load_table<P: AsRef<Path>>(path: P, config: &ReportConfig) -> Result<ScrutinyTable, ScrutinySheetError> {
    let path = path.as_ref();
    let spreadsheet = open_spreadsheet(path).with_prefix(&format!("Open '{}'", path.display()))?;
    read_table(spreadsheet, config)
}

/// Reads and validates the scrutiny table of an in-memory workbook.
pub fn load_table_from_bytes(name: &str, bytes: Vec<u8>, config: &ReportConfig) -> Result<ScrutinyTable, ScrutinySheetError> {
    let spreadsheet = open_spreadsheet_bytes(name, bytes).with_prefix(&format!("Open '{name}'"))?;
    read_table(spreadsheet, config)
}

fn read_table(mut spreadsheet: Box<dyn Spreadsheet>, config: &ReportConfig) -> Result<ScrutinyTable, ScrutinySheetError> {
    let sheet = spreadsheet.read_sheet(&config.criteria()?)?;
    debug!(file = sheet.file_name.as_str(), sheet = sheet.name(), cells = sheet.cells.len(), "Selected sheet");
    let table = ScrutinyTable::try_from(&sheet)?;
    debug!(records = table.len(), "Validated scrutiny table");
    Ok(table)
}

/// Runs the whole pipeline: load and validate `input`, build the report for
/// `institution` and `streams`, then write it to `output`.
///
/// The output file is only created once every previous step succeeded.
pub fn generate_report<I: AsRef<Path>, O: AsRef<Path>>(
    input: I,
    output: O,
    institution: &str,
    streams: &StreamSelection,
    config: &ReportConfig,
) -> Result<Report, ScrutinySheetError> {
    config.validate()?;
    let table = load_table(input, config)?;
    let report = Report::build(&table, institution, streams)?;
    report.save(output, config)?;
    info!(institution, sections = report.sections.len(), "Scrutiny report generated");
    Ok(report)
}
