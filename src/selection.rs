//! Selection manager.
//!
//! Selection is a set of row ids kept independently of pagination, so rows
//! stay selected while the user pages around. A "select all matching" action
//! may capture ids beyond the rows currently shown; that capture belongs to
//! the search that produced it and is dropped when the search changes.

use std::collections::BTreeSet;

/// Set of selected row ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: BTreeSet<String>,
    captured: BTreeSet<String>,
}

impl Selection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a row.
    pub fn select(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.captured.remove(&id);
        self.selected.insert(id);
    }

    /// Deselects a row.
    pub fn deselect(&mut self, id: &str) {
        self.captured.remove(id);
        self.selected.remove(id);
    }

    /// Selects or deselects a row.
    pub fn set(&mut self, id: impl Into<String>, checked: bool) {
        let id = id.into();
        if checked {
            self.select(id);
        } else {
            self.deselect(&id);
        }
    }

    /// Flips a row's selection, returning the new state.
    pub fn toggle(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        let checked = !self.selected.contains(&id);
        self.set(id, checked);
        checked
    }

    /// Header checkbox action.
    ///
    /// `checked == false` clears the whole selection. Otherwise the
    /// caller-supplied `all_matching` ids are preferred over `visible_ids`;
    /// ids added that way are remembered as a capture (see
    /// [`Selection::invalidate_capture`]).
    pub fn select_all(&mut self, checked: bool, visible_ids: &[String], all_matching: Option<&[String]>) {
        if !checked {
            self.clear();
            return;
        }
        match all_matching {
            Some(ids) => {
                for id in ids {
                    if self.selected.insert(id.clone()) {
                        self.captured.insert(id.clone());
                    }
                }
            }
            None => {
                for id in visible_ids {
                    self.select(id.clone());
                }
            }
        }
    }

    /// Removes every id.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.captured.clear();
    }

    /// Drops the ids that were added only by a "select all matching"
    /// capture. Returns how many were removed.
    pub fn invalidate_capture(&mut self) -> usize {
        let removed = self.captured.len();
        for id in std::mem::take(&mut self.captured) {
            self.selected.remove(&id);
        }
        removed
    }

    /// Returns true while a capture is in effect.
    pub fn has_capture(&self) -> bool {
        !self.captured.is_empty()
    }

    /// Returns true if the row is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// True when every visible id is selected. The selection may hold more.
    pub fn is_all_selected(&self, visible_ids: &[String]) -> bool {
        !visible_ids.is_empty() && visible_ids.iter().all(|id| self.selected.contains(id))
    }

    /// True when something is selected but not every visible id.
    pub fn is_indeterminate(&self, visible_ids: &[String]) -> bool {
        !self.selected.is_empty() && !self.is_all_selected(visible_ids)
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_select_and_deselect() {
        let mut s = Selection::new();
        s.select("1");
        s.select("2");
        assert!(s.is_selected("1"));
        s.deselect("1");
        assert!(!s.is_selected("1"));
        assert!(s.toggle("3"));
        assert!(!s.toggle("3"));
        assert_eq!(s.ids().collect::<Vec<_>>(), vec!["2"]);
    }

    #[test]
    fn test_all_and_indeterminate() {
        let visible = ids(&["1", "2"]);
        let mut s = Selection::new();
        assert!(!s.is_all_selected(&visible));
        assert!(!s.is_indeterminate(&visible));

        s.select("1");
        assert!(s.is_indeterminate(&visible));

        s.select("2");
        s.select("99");
        assert!(s.is_all_selected(&visible));
        assert!(!s.is_indeterminate(&visible));

        assert!(!s.is_all_selected(&[]));
    }

    #[test]
    fn test_select_all_prefers_matching_ids() {
        let visible = ids(&["1", "2"]);
        let matching = ids(&["1", "2", "3", "4"]);
        let mut s = Selection::new();
        s.select_all(true, &visible, Some(&matching));
        assert_eq!(s.len(), 4);

        s.select_all(true, &visible, None);
        assert_eq!(s.len(), 4);

        s.select_all(false, &visible, None);
        assert!(s.is_empty());
    }

    #[test]
    fn test_invalidate_capture_keeps_explicit_choices() {
        let mut s = Selection::new();
        s.select("1");
        s.select_all(true, &[], Some(&ids(&["1", "2", "3"])));
        s.select("3");
        assert!(s.has_capture());

        assert_eq!(s.invalidate_capture(), 1);
        assert_eq!(s.ids().collect::<Vec<_>>(), vec!["1", "3"]);
        assert!(!s.has_capture());
    }
}
