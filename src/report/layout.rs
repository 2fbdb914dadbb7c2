use crate::report::Report;
use crate::spreadsheet::writer::CellStyle;
use crate::spreadsheet::writer::CellValue;
use crate::spreadsheet::writer::MergedRange;
use crate::spreadsheet::writer::Worksheet;

/// Blank rows between the end of one section and the next title.
pub(crate) const SECTION_GAP: usize = 3;

/// Column headers of every section table.
const HEADERS: [&str; 3] = ["Category", "High", "Low"];

impl Report {
    /// Stacks the sections vertically: a merged title row with the stream name,
    /// the header row, one row per category, then [`SECTION_GAP`] blank rows.
    pub fn layout(&self, sheet_name: &str) -> Worksheet {
        let last_col = HEADERS.len() - 1;
        let mut sheet = Worksheet::new(sheet_name);
        let mut row = 0;
        for section in &self.sections {
            sheet.set_styled(row, 0, CellValue::text(&section.stream), CellStyle::Title);
            for col in 1..=last_col {
                sheet.set_styled(row, col, CellValue::Blank, CellStyle::Title);
            }
            sheet.merge(MergedRange::row(row, 0, last_col));
            row += 1;

            for (col, header) in HEADERS.iter().enumerate() {
                sheet.set_styled(row, col, CellValue::text(*header), CellStyle::Header);
            }
            row += 1;

            for summary in &section.summaries {
                sheet.set(row, 0, CellValue::text(&summary.category));
                sheet.set(row, 1, CellValue::number(summary.high));
                sheet.set(row, 2, CellValue::number(summary.low));
                row += 1;
            }
            row += SECTION_GAP;
        }
        sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;
    use crate::report::CategorySummary;
    use crate::report::Section;

    fn report() -> Report {
        Report {
            institution: "Alpha College".to_owned(),
            sections: vec![
                Section {
                    stream: "Science".to_owned(),
                    summaries: vec![
                        CategorySummary { category: "A".to_owned(), high: 30.0, low: 10.0 },
                        CategorySummary { category: "B".to_owned(), high: 15.0, low: 5.0 },
                    ],
                },
                Section {
                    stream: "Arts".to_owned(),
                    summaries: vec![CategorySummary { category: "SC".to_owned(), high: 55.0, low: 41.5 }],
                },
            ],
        }
    }

    fn value(sheet: &Worksheet, row: usize, col: usize) -> Option<&CellValue> {
        sheet.get(row, col).map(|cell| &cell.value)
    }

    #[test]
    fn section_rows() {
        let sheet = report().layout("Sheet1");
        assert_eq!(sheet.name(), "Sheet1");

        assert_eq!(value(&sheet, 0, 0), Some(&CellValue::text("Science")));
        assert_eq!(sheet.get(0, 0).map(|cell| cell.style), Some(CellStyle::Title));
        assert_eq!(sheet.get(0, 2).map(|cell| cell.style), Some(CellStyle::Title));

        assert_eq!(value(&sheet, 1, 0), Some(&CellValue::text("Category")));
        assert_eq!(value(&sheet, 1, 1), Some(&CellValue::text("High")));
        assert_eq!(value(&sheet, 1, 2), Some(&CellValue::text("Low")));
        assert_eq!(sheet.get(1, 1).map(|cell| cell.style), Some(CellStyle::Header));

        assert_eq!(value(&sheet, 2, 0), Some(&CellValue::text("A")));
        assert_eq!(value(&sheet, 2, 1), Some(&CellValue::number(30.0)));
        assert_eq!(value(&sheet, 2, 2), Some(&CellValue::number(10.0)));
        assert_eq!(value(&sheet, 3, 0), Some(&CellValue::text("B")));
        assert_eq!(value(&sheet, 3, 1), Some(&CellValue::number(15.0)));
        assert_eq!(value(&sheet, 3, 2), Some(&CellValue::number(5.0)));
    }

    #[test]
    fn sections_are_three_rows_apart() {
        let sheet = report().layout("Sheet1");
        // Science occupies rows 0..=3, rows 4..=6 stay blank
        assert_eq!(sheet.used_rows(), vec![0, 1, 2, 3, 7, 8, 9]);
        assert_eq!(value(&sheet, 7, 0), Some(&CellValue::text("Arts")));
        assert_eq!(value(&sheet, 9, 2), Some(&CellValue::number(41.5)));
    }

    #[test]
    fn titles_span_all_columns() {
        let sheet = report().layout("Sheet1");
        let merges: Vec<String> = sheet.merges().iter().map(|range| range.reference()).collect();
        assert_eq!(merges, vec!["A1:C1", "A8:C8"]);
    }

    #[test]
    fn empty_report_has_no_cells() {
        let report = Report { institution: "Gamma".to_owned(), sections: Vec::new() };
        let sheet = report.layout("Sheet1");
        assert_eq!(sheet.cells().count(), 0);
        assert!(sheet.merges().is_empty());
    }

    #[test]
    fn workbook_uses_configured_sheet_name() {
        let config = ReportConfig { output_sheet_name: "Marks".to_owned(), ..ReportConfig::default() };
        let workbook = report().to_workbook(&config);
        assert_eq!(workbook.sheets().len(), 1);
        assert_eq!(workbook.sheets()[0].name(), "Marks");
    }
}
