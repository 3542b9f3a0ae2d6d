//! Sort engine.
//!
//! Header clicks cycle a column through `none → asc → desc → none`; clicking
//! a different column starts it at ascending. Sorting is stable, so rows with
//! equal keys keep their input order in both directions, and null values
//! always sort last.

use crate::row::{CellValue, TableRow};
use std::cmp::Ordering;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

/// Current sort column and direction. `None` means rows keep input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    column: Option<String>,
    direction: Option<SortDirection>,
}

impl SortState {
    /// The unsorted state.
    pub fn none() -> Self {
        Self::default()
    }

    /// Ascending by `column`.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: Some(column.into()),
            direction: Some(SortDirection::Asc),
        }
    }

    /// Descending by `column`.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: Some(column.into()),
            direction: Some(SortDirection::Desc),
        }
    }

    /// The sorted column, if any.
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// The sort direction, if any.
    pub fn direction(&self) -> Option<SortDirection> {
        self.direction
    }

    /// Direction for `column`, or `None` if another column (or nothing) is sorted.
    pub fn direction_for(&self, column: &str) -> Option<SortDirection> {
        if self.column.as_deref() == Some(column) {
            self.direction
        } else {
            None
        }
    }

    /// Returns true when no column is sorted.
    pub fn is_none(&self) -> bool {
        self.column.is_none()
    }

    /// State after the header of `column` is clicked.
    pub fn next(&self, column: &str) -> Self {
        match (self.column.as_deref(), self.direction) {
            (Some(c), Some(SortDirection::Asc)) if c == column => Self::desc(column),
            (Some(c), Some(SortDirection::Desc)) if c == column => Self::none(),
            _ => Self::asc(column),
        }
    }
}

/// How a column holding both numbers and text is ordered.
///
/// Columns whose non-null values all parse as numbers always compare
/// numerically. Mixed columns need a single total order so that the result
/// does not depend on which pairs the sort happens to compare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MixedTypeOrder {
    /// Numbers (in numeric order) before text (in case-insensitive order).
    /// Two numbers always compare numerically.
    #[default]
    NumbersFirst,
    /// Compare every value of a mixed column as case-insensitive text,
    /// numbers included, so `"10"` sorts before `9`.
    AsText,
}

#[derive(Debug)]
enum SortKey {
    Null,
    Number(f64),
    Text(String),
}

fn text_key(value: &CellValue) -> String {
    value.to_string().to_lowercase()
}

fn compare_keys(a: &SortKey, b: &SortKey) -> Ordering {
    match (a, b) {
        (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(y),
        (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
        (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
        (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
        (SortKey::Null, SortKey::Null) => Ordering::Equal,
        (SortKey::Null, _) => Ordering::Greater,
        (_, SortKey::Null) => Ordering::Less,
    }
}

fn build_keys<T: TableRow>(data: &[T], column: &str, mixed: MixedTypeOrder) -> Vec<SortKey> {
    let values: Vec<CellValue> = data.iter().map(|row| row.value(column)).collect();
    let all_numeric = values
        .iter()
        .filter(|v| !v.is_null())
        .all(|v| v.as_number().is_some());

    values
        .iter()
        .map(|v| {
            if v.is_null() {
                return SortKey::Null;
            }
            match (all_numeric, mixed, v.as_number()) {
                (true, _, Some(n)) => SortKey::Number(n),
                (false, MixedTypeOrder::NumbersFirst, Some(n)) => SortKey::Number(n),
                _ => SortKey::Text(text_key(v)),
            }
        })
        .collect()
}

/// Returns `data` ordered by `state`, leaving the input untouched.
pub fn sort_rows<T: TableRow>(data: &[T], state: &SortState, mixed: MixedTypeOrder) -> Vec<T> {
    let (column, direction) = match (state.column(), state.direction()) {
        (Some(c), Some(d)) => (c, d),
        _ => return data.to_vec(),
    };

    let keys = build_keys(data, column, mixed);
    let mut indices: Vec<usize> = (0..data.len()).collect();
    indices.sort_by(|&a, &b| {
        let (ka, kb) = (&keys[a], &keys[b]);
        match (ka, kb) {
            (SortKey::Null, _) | (_, SortKey::Null) => compare_keys(ka, kb),
            _ => match direction {
                SortDirection::Asc => compare_keys(ka, kb),
                SortDirection::Desc => compare_keys(kb, ka),
            },
        }
    });

    indices.into_iter().map(|i| data[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn names(rows: &[Value]) -> Vec<String> {
        rows.iter().map(|r| r["name"].as_str().unwrap_or("").to_string()).collect()
    }

    #[test]
    fn test_sort_state_cycle() {
        let s = SortState::none();
        let s = s.next("age");
        assert_eq!(s, SortState::asc("age"));
        let s = s.next("age");
        assert_eq!(s, SortState::desc("age"));
        let s = s.next("age");
        assert!(s.is_none());
    }

    #[test]
    fn test_other_column_resets_to_asc() {
        assert_eq!(SortState::asc("age").next("name"), SortState::asc("name"));
        assert_eq!(SortState::desc("age").next("name"), SortState::asc("name"));
        assert_eq!(SortState::desc("age").direction_for("name"), None);
        assert_eq!(
            SortState::desc("age").direction_for("age"),
            Some(SortDirection::Desc)
        );
    }

    #[test]
    fn test_numeric_sort() {
        let data = vec![
            json!({"id": 1, "name": "Bob", "age": 30}),
            json!({"id": 2, "name": "Amy", "age": 25}),
            json!({"id": 3, "name": "Cat", "age": 100}),
        ];
        let asc = sort_rows(&data, &SortState::asc("age"), MixedTypeOrder::AsText);
        assert_eq!(names(&asc), vec!["Amy", "Bob", "Cat"]);
        let desc = sort_rows(&data, &SortState::desc("age"), MixedTypeOrder::AsText);
        assert_eq!(names(&desc), vec!["Cat", "Bob", "Amy"]);
        let none = sort_rows(&data, &SortState::none(), MixedTypeOrder::AsText);
        assert_eq!(names(&none), vec!["Bob", "Amy", "Cat"]);
    }

    #[test]
    fn test_numeric_strings_compare_numerically() {
        let data = vec![
            json!({"id": 1, "name": "a", "qty": "10"}),
            json!({"id": 2, "name": "b", "qty": "9"}),
        ];
        let asc = sort_rows(&data, &SortState::asc("qty"), MixedTypeOrder::AsText);
        assert_eq!(names(&asc), vec!["b", "a"]);
    }

    #[test]
    fn test_case_insensitive_text() {
        let data = vec![
            json!({"id": 1, "name": "banana"}),
            json!({"id": 2, "name": "Apple"}),
            json!({"id": 3, "name": "cherry"}),
        ];
        let asc = sort_rows(&data, &SortState::asc("name"), MixedTypeOrder::AsText);
        assert_eq!(names(&asc), vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_nulls_sort_last_both_directions() {
        let data = vec![
            json!({"id": 1, "name": "x", "age": null}),
            json!({"id": 2, "name": "y", "age": 5}),
            json!({"id": 3, "name": "z"}),
            json!({"id": 4, "name": "w", "age": 1}),
        ];
        let asc = sort_rows(&data, &SortState::asc("age"), MixedTypeOrder::AsText);
        assert_eq!(names(&asc), vec!["w", "y", "x", "z"]);
        let desc = sort_rows(&data, &SortState::desc("age"), MixedTypeOrder::AsText);
        assert_eq!(names(&desc), vec!["y", "w", "x", "z"]);
    }

    #[test]
    fn test_mixed_columns() {
        let data = vec![
            json!({"id": 1, "name": "n10", "v": "10"}),
            json!({"id": 2, "name": "nb", "v": "b"}),
            json!({"id": 3, "name": "n9", "v": 9}),
        ];
        let default = sort_rows(&data, &SortState::asc("v"), MixedTypeOrder::default());
        assert_eq!(names(&default), vec!["n9", "n10", "nb"]);
        let desc = sort_rows(&data, &SortState::desc("v"), MixedTypeOrder::default());
        assert_eq!(names(&desc), vec!["nb", "n10", "n9"]);
        let as_text = sort_rows(&data, &SortState::asc("v"), MixedTypeOrder::AsText);
        assert_eq!(names(&as_text), vec!["n10", "n9", "nb"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let data = vec![
            json!({"id": 1, "name": "first", "g": 1}),
            json!({"id": 2, "name": "second", "g": 0}),
            json!({"id": 3, "name": "third", "g": 1}),
            json!({"id": 4, "name": "fourth", "g": 0}),
        ];
        let asc = sort_rows(&data, &SortState::asc("g"), MixedTypeOrder::AsText);
        assert_eq!(names(&asc), vec!["second", "fourth", "first", "third"]);
        let desc = sort_rows(&data, &SortState::desc("g"), MixedTypeOrder::AsText);
        assert_eq!(names(&desc), vec!["first", "third", "second", "fourth"]);
    }

    proptest! {
        #[test]
        fn test_sort_is_stable_and_deterministic(keys in proptest::collection::vec(0i64..5, 0..40)) {
            let data: Vec<Value> = keys
                .iter()
                .enumerate()
                .map(|(i, k)| json!({"id": i, "k": k}))
                .collect();

            for state in [SortState::asc("k"), SortState::desc("k")] {
                let once = sort_rows(&data, &state, MixedTypeOrder::AsText);
                let twice = sort_rows(&data, &state, MixedTypeOrder::AsText);
                prop_assert_eq!(&once, &twice);

                for pair in once.windows(2) {
                    let (a, b) = (&pair[0], &pair[1]);
                    if a["k"] == b["k"] {
                        prop_assert!(a["id"].as_u64() < b["id"].as_u64());
                    }
                }
            }
        }

        #[test]
        fn test_sort_is_permutation(values in proptest::collection::vec(proptest::option::of("[a-c0-9]{0,3}"), 0..30)) {
            let data: Vec<Value> = values
                .iter()
                .enumerate()
                .map(|(i, v)| json!({"id": i, "v": v}))
                .collect();
            for mixed in [MixedTypeOrder::AsText, MixedTypeOrder::NumbersFirst] {
                let sorted = sort_rows(&data, &SortState::asc("v"), mixed);
                let mut ids: Vec<String> = sorted.iter().map(|r| r.id()).collect();
                ids.sort();
                let mut expected: Vec<String> = data.iter().map(|r| r.id()).collect();
                expected.sort();
                prop_assert_eq!(ids, expected);
            }
        }
    }
}
