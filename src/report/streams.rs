use crate::report::ScrutinyTable;
use std::collections::HashSet;

/// Stream name selecting every stream present in the data.
pub const EVERYTHING: &str = "everything";

/// Streams requested for a report.
#[derive(Clone, Debug, PartialEq)]
pub enum StreamSelection {
    /// Every distinct stream of the table, in first-seen order
    Everything,
    /// Caller-supplied streams, order and duplicates preserved
    Listed(Vec<String>),
}

impl StreamSelection {
    /// Builds a selection; any entry equal to [`EVERYTHING`] selects all streams.
    pub fn new<I, S>(streams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let streams: Vec<String> = streams.into_iter().map(Into::into).collect();
        if streams.iter().any(|stream| stream == EVERYTHING) {
            StreamSelection::Everything
        } else {
            StreamSelection::Listed(streams)
        }
    }

    /// Parses a comma-separated list, trimming entries and dropping empty ones.
    pub fn parse(list: &str) -> Self {
        StreamSelection::new(list.split(',').map(str::trim).filter(|stream| !stream.is_empty()))
    }

    /// Resolves the selection into the ordered stream names to report on.
    pub fn resolve(&self, table: &ScrutinyTable) -> Vec<String> {
        match self {
            StreamSelection::Listed(streams) => streams.clone(),
            StreamSelection::Everything => {
                let mut seen = HashSet::new();
                table
                    .records()
                    .iter()
                    .filter_map(|record| record.stream.as_deref())
                    .filter(|stream| seen.insert(*stream))
                    .map(str::to_owned)
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::table;

    #[test]
    fn parse_form_list() {
        assert_eq!(
            StreamSelection::parse(" Science, Arts ,,Science "),
            StreamSelection::Listed(vec!["Science".to_owned(), "Arts".to_owned(), "Science".to_owned()])
        );
        assert_eq!(StreamSelection::parse("Arts,everything"), StreamSelection::Everything);
        assert_eq!(StreamSelection::parse(""), StreamSelection::Listed(Vec::new()));
    }

    #[test]
    fn sentinel_is_case_sensitive() {
        assert_eq!(StreamSelection::new(["Everything"]), StreamSelection::Listed(vec!["Everything".to_owned()]));
    }

    #[test]
    fn everything_yields_distinct_streams_in_order() {
        let table = table(&[
            ("Alpha", "Science", "OPEN", 80.0),
            ("Beta", "Arts", "OPEN", 70.0),
            ("Alpha", "Science", "SC", 60.0),
            ("Gamma", "Commerce", "OPEN", 65.0),
            ("Beta", "Arts", "SC", 55.0),
        ]);
        assert_eq!(StreamSelection::Everything.resolve(&table), vec!["Science", "Arts", "Commerce"]);
    }

    #[test]
    fn listed_streams_are_kept_verbatim() {
        let table = table(&[("Alpha", "Science", "OPEN", 80.0)]);
        let selection = StreamSelection::new(["Physics", "Science"]);
        assert_eq!(selection.resolve(&table), vec!["Physics", "Science"]);
    }
}
