use crate::error::ScrutinySheetError;
use crate::report::Record;
use crate::report::ReportError;
use crate::report::ScrutinyTable;
use regex::Regex;
use regex::RegexBuilder;
use std::collections::BTreeMap;

/// Case-insensitive literal substring matcher for text fields.
#[derive(Clone, Debug)]
pub struct Matcher {
    regex: Regex,
}

impl Matcher {
    pub fn new(needle: &str) -> Result<Self, ScrutinySheetError> {
        let regex = RegexBuilder::new(&regex::escape(needle))
            .case_insensitive(true)
            .build()?;
        Ok(Matcher { regex })
    }

    /// Missing values never match.
    pub fn matches(&self, value: Option<&str>) -> bool {
        value.map(|value| self.regex.is_match(value)).unwrap_or(false)
    }
}

/// Highest and lowest percentage of one reservation category.
#[derive(Clone, Debug, PartialEq)]
pub struct CategorySummary {
    pub category: String,
    pub high: f64,
    pub low: f64,
}

impl ScrutinyTable {
    /// Returns the records whose institution and stream both match.
    pub fn select(&self, institution: &Matcher, stream: &Matcher) -> Vec<&Record> {
        self.records()
            .iter()
            .filter(|record| institution.matches(record.college_name.as_deref()))
            .filter(|record| stream.matches(record.stream.as_deref()))
            .collect()
    }
}

/// Groups records by category and computes the high and low percentage of each,
/// categories in lexicographic order. Records without a category are ignored.
pub fn summarize<'a, I>(records: I) -> Result<Vec<CategorySummary>, ReportError>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut groups = BTreeMap::<&str, (f64, f64)>::new();
    for record in records {
        let Some(category) = record.category.as_deref() else {
            continue;
        };
        let value = record.percentage.value()?;
        groups
            .entry(category)
            .and_modify(|(high, low)| {
                *high = high.max(value);
                *low = low.min(value);
            })
            .or_insert((value, value));
    }
    let summaries = groups
        .into_iter()
        .map(|(category, (high, low))| CategorySummary {
            category: category.to_owned(),
            high,
            low,
        })
        .collect();
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::table;
    use crate::report::Percentage;

    fn summary(category: &str, high: f64, low: f64) -> CategorySummary {
        CategorySummary { category: category.to_owned(), high, low }
    }

    #[test]
    fn matcher_is_case_insensitive_substring() {
        let matcher = Matcher::new("science").unwrap();
        assert!(matcher.matches(Some("Computer Science")));
        assert!(matcher.matches(Some("SCIENCE")));
        assert!(!matcher.matches(Some("Arts")));
        assert!(!matcher.matches(None));
    }

    #[test]
    fn matcher_is_literal() {
        let matcher = Matcher::new("B.Sc (Hons)").unwrap();
        assert!(matcher.matches(Some("b.sc (hons) physics")));
        assert!(!matcher.matches(Some("BxSc (Hons)")));
    }

    #[test]
    fn high_and_low_per_category() {
        let table = table(&[
            ("Alpha College", "Science", "B", 5.0),
            ("Alpha College", "Science", "A", 20.0),
            ("Alpha College", "Science", "A", 10.0),
            ("Alpha College", "Science", "B", 15.0),
            ("Alpha College", "Science", "A", 30.0),
        ]);
        let summaries = summarize(table.records()).unwrap();
        assert_eq!(summaries, vec![summary("A", 30.0, 10.0), summary("B", 15.0, 5.0)]);
    }

    #[test]
    fn select_filters_institution_and_stream() {
        let table = table(&[
            ("Alpha College", "Computer Science", "OPEN", 90.0),
            ("alpha college of arts", "Science", "OPEN", 70.0),
            ("Beta College", "Science", "OPEN", 60.0),
            ("Alpha College", "Arts", "OPEN", 50.0),
        ]);
        let selected = table.select(&Matcher::new("Alpha").unwrap(), &Matcher::new("Science").unwrap());
        let percentages: Vec<_> = selected.iter().map(|record| record.percentage.clone()).collect();
        assert_eq!(percentages, vec![Percentage::Value(90.0), Percentage::Value(70.0)]);
    }

    #[test]
    fn single_row_category() {
        let table = table(&[("Alpha", "Arts", "ST", 42.5)]);
        assert_eq!(summarize(table.records()).unwrap(), vec![summary("ST", 42.5, 42.5)]);
    }

    #[test]
    fn missing_percentage_is_an_error() {
        let mut records = table(&[("Alpha", "Arts", "ST", 42.5)]).records().to_vec();
        records.push(Record {
            college_name: Some("Alpha".to_owned()),
            stream: Some("Arts".to_owned()),
            category: Some("ST".to_owned()),
            percentage: Percentage::Missing { reference: "D3".to_owned() },
        });
        assert_eq!(
            summarize(&records),
            Err(ReportError::MissingPercentage { reference: "D3".to_owned() })
        );
    }

    #[test]
    fn uncategorized_records_are_ignored() {
        let records = vec![Record {
            college_name: Some("Alpha".to_owned()),
            stream: Some("Arts".to_owned()),
            category: None,
            percentage: Percentage::Missing { reference: "D2".to_owned() },
        }];
        assert_eq!(summarize(&records), Ok(Vec::new()));
    }
}
