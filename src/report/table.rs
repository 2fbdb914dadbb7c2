use crate::report::ReportError;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::Cell;
use crate::spreadsheet::Sheet;
use std::collections::HashMap;
use tracing::debug;

/// Columns every scrutiny sheet must carry, in reporting order.
pub const REQUIRED_COLUMNS: [&str; 4] = ["CollegeName", "Stream", "ReservationCategory", "Percentage"];

/// Admission percentage of one record as found in the sheet.
#[derive(Clone, Debug, PartialEq)]
pub enum Percentage {
    Value(f64),
    Missing { reference: String },
    Invalid { reference: String, value: String },
}

impl Percentage {
    fn from_cell(cell: Option<&Cell>, row: usize, col: usize) -> Self {
        match cell {
            Some(cell) if !cell.value.trim().is_empty() => match cell.to_double() {
                Ok(value) => Percentage::Value(value),
                Err(_) => Percentage::Invalid {
                    reference: cell.reference(),
                    value: cell.to_string(),
                },
            },
            _ => Percentage::Missing {
                reference: index_to_reference(row, col),
            },
        }
    }

    /// Returns the numeric value, or the data-format error describing why there is none.
    pub fn value(&self) -> Result<f64, ReportError> {
        match self {
            Percentage::Value(value) => Ok(*value),
            Percentage::Missing { reference } => Err(ReportError::MissingPercentage {
                reference: reference.clone(),
            }),
            Percentage::Invalid { reference, value } => Err(ReportError::InvalidPercentage {
                reference: reference.clone(),
                value: value.clone(),
            }),
        }
    }
}

/// One data row of a scrutiny sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// Text of the `CollegeName` cell; `None` when empty or not text
    pub college_name: Option<String>,
    /// Text of the `Stream` cell; `None` when empty or not text
    pub stream: Option<String>,
    /// Display value of the `ReservationCategory` cell
    pub category: Option<String>,
    pub percentage: Percentage,
}

/// Validated scrutiny records, in sheet order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrutinyTable {
    records: Vec<Record>,
}

impl ScrutinyTable {
    pub fn new(records: Vec<Record>) -> Self {
        ScrutinyTable { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Positions of the required columns within a dense row.
struct ColumnIndexes {
    college_name: usize,
    stream: usize,
    category: usize,
    percentage: usize,
}

impl ColumnIndexes {
    /// Maps trimmed header names to positions; a repeated header keeps its first position.
    fn from_header(header: &[Option<&Cell>]) -> Result<ColumnIndexes, ReportError> {
        let mut positions = HashMap::<String, usize>::new();
        for (index, cell) in header.iter().enumerate() {
            if let Some(cell) = cell {
                let name = cell.to_string().trim().to_owned();
                if !name.is_empty() {
                    positions.entry(name).or_insert(index);
                }
            }
        }

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| !positions.contains_key(**name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            Err(ReportError::MissingColumns(missing))?;
        }

        Ok(ColumnIndexes {
            college_name: positions["CollegeName"],
            stream: positions["Stream"],
            category: positions["ReservationCategory"],
            percentage: positions["Percentage"],
        })
    }
}

impl TryFrom<&Sheet> for ScrutinyTable {
    type Error = ReportError;

    /// Validates the header row and converts every following row into a [`Record`].
    fn try_from(sheet: &Sheet) -> Result<Self, Self::Error> {
        let rows = sheet.rows();
        let Some(((header_row, header), body)) = rows.split_first() else {
            return Err(ReportError::MissingColumns(REQUIRED_COLUMNS.iter().map(|name| name.to_string()).collect()));
        };
        let columns = ColumnIndexes::from_header(header)?;
        debug!(
            sheet = sheet.name(),
            header_row = header_row + 1,
            college_name = columns.college_name,
            stream = columns.stream,
            category = columns.category,
            percentage = columns.percentage,
            "Mapped scrutiny columns"
        );

        let col_offset = sheet.col_lower_bound.unwrap_or_default();
        let records = body
            .iter()
            .map(|(row, cells)| {
                let cell = |index: usize| cells.get(index).copied().flatten();
                let text = |index: usize| cell(index).and_then(Cell::as_text).map(str::to_owned);
                Record {
                    college_name: text(columns.college_name),
                    stream: text(columns.stream),
                    category: cell(columns.category)
                        .filter(|cell| !cell.is_error() && !cell.value.is_empty())
                        .map(|cell| cell.to_string()),
                    percentage: Percentage::from_cell(
                        cell(columns.percentage),
                        *row,
                        columns.percentage + col_offset,
                    ),
                }
            })
            .collect();
        Ok(ScrutinyTable { records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::number;
    use crate::report::fixtures::scrutiny_sheet;
    use crate::report::fixtures::sheet;
    use crate::report::fixtures::text;
    use crate::spreadsheet::cell::CellType;

    #[test]
    fn header_names_are_trimmed() {
        let sheet = sheet(vec![
            text(0, 0, " CollegeName"),
            text(0, 1, "Stream  "),
            text(0, 2, "\tReservationCategory"),
            text(0, 3, " Percentage "),
            text(1, 0, "Alpha College"),
            text(1, 1, "Science"),
            text(1, 2, "OPEN"),
            number(1, 3, 88.5),
        ]);
        let table = ScrutinyTable::try_from(&sheet).unwrap();
        assert_eq!(
            table.records(),
            &[Record {
                college_name: Some("Alpha College".to_owned()),
                stream: Some("Science".to_owned()),
                category: Some("OPEN".to_owned()),
                percentage: Percentage::Value(88.5),
            }]
        );
    }

    #[test]
    fn reports_exactly_the_missing_columns() {
        let sheet = sheet(vec![text(0, 0, "CollegeName"), text(0, 1, "Percentage"), text(0, 2, "Category")]);
        let error = ScrutinyTable::try_from(&sheet).unwrap_err();
        assert_eq!(
            error,
            ReportError::MissingColumns(vec!["Stream".to_owned(), "ReservationCategory".to_owned()])
        );
        assert_eq!(error.to_string(), "Missing columns: Stream, ReservationCategory");
    }

    #[test]
    fn empty_sheet_misses_every_column() {
        let error = ScrutinyTable::try_from(&sheet(Vec::new())).unwrap_err();
        assert_eq!(error, ReportError::MissingColumns(REQUIRED_COLUMNS.iter().map(|name| name.to_string()).collect()));
    }

    #[test]
    fn first_duplicate_header_wins() {
        let sheet = sheet(vec![
            text(0, 0, "CollegeName"),
            text(0, 1, "Stream"),
            text(0, 2, "ReservationCategory"),
            text(0, 3, "Percentage"),
            text(0, 4, "Percentage"),
            text(1, 0, "Alpha"),
            text(1, 1, "Arts"),
            text(1, 2, "SC"),
            number(1, 3, 61.0),
            number(1, 4, 99.0),
        ]);
        let table = ScrutinyTable::try_from(&sheet).unwrap();
        assert_eq!(table.records()[0].percentage, Percentage::Value(61.0));
    }

    #[test]
    fn header_follows_leading_offset() {
        // Table starting at C3 instead of A1
        let sheet = sheet(vec![
            text(2, 2, "CollegeName"),
            text(2, 3, "Stream"),
            text(2, 4, "ReservationCategory"),
            text(2, 5, "Percentage"),
            text(3, 2, "Alpha"),
            text(3, 3, "Arts"),
            text(3, 4, "SC"),
        ]);
        let table = ScrutinyTable::try_from(&sheet).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].percentage, Percentage::Missing { reference: "F4".to_owned() });
    }

    #[test]
    fn out_of_range_date_category_keeps_raw_value() {
        let mut sheet = scrutiny_sheet(&[("Alpha", "Arts", "SC", 50.0)]);
        sheet.push(text(2, 0, "Alpha"));
        sheet.push(text(2, 1, "Arts"));
        sheet.push(Cell { row: 2, col: 2, kind: CellType::NumberDate1900, value: "1e20".to_owned() });
        sheet.push(number(2, 3, 40.0));

        let table = ScrutinyTable::try_from(&sheet).unwrap();
        assert_eq!(table.records()[1].category.as_deref(), Some("1e20"));
    }

    #[test]
    fn cell_kinds_map_to_fields() {
        let mut sheet = scrutiny_sheet(&[]);
        sheet.push(number(1, 0, 42.0));
        sheet.push(text(1, 1, "Commerce"));
        sheet.push(number(1, 2, 2.0));
        sheet.push(text(1, 3, "n/a"));
        sheet.push(Cell { row: 2, col: 2, kind: CellType::Error, value: "#N/A".to_owned() });
        sheet.push(number(2, 3, 70.0));

        let table = ScrutinyTable::try_from(&sheet).unwrap();
        let first = &table.records()[0];
        assert_eq!(first.college_name, None);
        assert_eq!(first.stream.as_deref(), Some("Commerce"));
        assert_eq!(first.category.as_deref(), Some("2"));
        assert_eq!(
            first.percentage,
            Percentage::Invalid { reference: "D2".to_owned(), value: "n/a".to_owned() }
        );
        assert_eq!(
            first.percentage.value(),
            Err(ReportError::InvalidPercentage { reference: "D2".to_owned(), value: "n/a".to_owned() })
        );
        assert_eq!(table.records()[1].category, None);
        assert_eq!(table.records()[1].percentage.value(), Ok(70.0));
    }
}
