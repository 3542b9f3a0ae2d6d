//! Search and filter layer.
//!
//! Client-side search keeps the rows where any field contains the term.
//! When a caller handles search itself (server-side), the table forwards the
//! term and renders whatever rows it is handed; out-of-band API search
//! results override both until cleared.

use crate::row::TableRow;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// How client-side search matches a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Case-insensitive substring match.
    #[default]
    Substring,
    /// Fuzzy subsequence match (skim scoring).
    Fuzzy,
}

/// Where filtering happens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// The table filters its own rows.
    #[default]
    Client,
    /// The caller receives the term and supplies already-filtered rows.
    Server,
}

/// Rows whose fields match `term`. A blank term returns every row.
///
/// Whitespace around a non-blank term is part of the match.
pub fn filter_rows<T: TableRow>(data: &[T], term: &str, mode: MatchMode) -> Vec<T> {
    if term.trim().is_empty() {
        return data.to_vec();
    }

    match mode {
        MatchMode::Substring => {
            let needle = term.to_lowercase();
            data.iter()
                .filter(|row| {
                    row.field_values()
                        .iter()
                        .any(|v| v.to_string().to_lowercase().contains(&needle))
                })
                .cloned()
                .collect()
        }
        MatchMode::Fuzzy => {
            let matcher = SkimMatcherV2::default().ignore_case();
            data.iter()
                .filter(|row| {
                    row.field_values()
                        .iter()
                        .any(|v| matcher.fuzzy_match(&v.to_string(), term).is_some())
                })
                .cloned()
                .collect()
        }
    }
}

/// Token identifying one server-side search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchToken(u64);

impl SearchToken {
    /// The raw sequence number.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Issues monotonically increasing request tokens and recognises the latest.
///
/// Responses may arrive in any order; only the one carrying the most recently
/// issued token is accepted.
#[derive(Debug, Clone, Default)]
pub struct SearchSequence {
    latest: u64,
}

impl SearchSequence {
    /// Creates a sequence with no outstanding request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new token, superseding every earlier one.
    pub fn issue(&mut self) -> SearchToken {
        self.latest += 1;
        SearchToken(self.latest)
    }

    /// The most recently issued token.
    pub fn latest(&self) -> Option<SearchToken> {
        (self.latest > 0).then_some(SearchToken(self.latest))
    }

    /// Returns true if `token` is the most recently issued one.
    pub fn is_current(&self, token: SearchToken) -> bool {
        token.0 == self.latest && self.latest > 0
    }

    /// Supersedes every outstanding token without issuing a request.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn rows() -> Vec<Value> {
        vec![
            json!({"id": 1, "name": "Swimming Pool", "floor": 1}),
            json!({"id": 2, "name": "Gym", "floor": 2}),
            json!({"id": 3, "name": "Party Hall", "floor": 12}),
        ]
    }

    fn ids(rows: &[Value]) -> Vec<String> {
        rows.iter().map(|r| r.id()).collect()
    }

    #[test]
    fn test_blank_term_returns_everything() {
        assert_eq!(filter_rows(&rows(), "", MatchMode::Substring).len(), 3);
        assert_eq!(filter_rows(&rows(), "   ", MatchMode::Substring).len(), 3);
    }

    #[test]
    fn test_substring_any_field_case_insensitive() {
        assert_eq!(ids(&filter_rows(&rows(), "POOL", MatchMode::Substring)), vec!["1"]);
        assert_eq!(ids(&filter_rows(&rows(), "2", MatchMode::Substring)), vec!["2", "3"]);
        assert!(filter_rows(&rows(), "sauna", MatchMode::Substring).is_empty());
    }

    #[test]
    fn test_surrounding_whitespace_is_matched() {
        assert_eq!(ids(&filter_rows(&rows(), "pool", MatchMode::Substring)), vec!["1"]);
        assert_eq!(ids(&filter_rows(&rows(), " pool", MatchMode::Substring)), vec!["1"]);
        assert!(filter_rows(&rows(), "pool ", MatchMode::Substring).is_empty());
        assert!(filter_rows(&rows(), " gym", MatchMode::Substring).is_empty());
    }

    #[test]
    fn test_fuzzy_match() {
        assert_eq!(ids(&filter_rows(&rows(), "swpl", MatchMode::Fuzzy)), vec!["1"]);
        assert!(filter_rows(&rows(), "swpl", MatchMode::Substring).is_empty());
    }

    #[test]
    fn test_only_latest_token_is_current() {
        let mut seq = SearchSequence::new();
        assert_eq!(seq.latest(), None);

        let first = seq.issue();
        let second = seq.issue();
        assert!(first < second);
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));

        seq.invalidate();
        assert!(!seq.is_current(second));
    }
}
