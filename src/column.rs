//! Column registry: the static, per-screen description of table columns.

use crate::error::ConfigError;
use std::collections::HashMap;
use tracing::error;

/// Static metadata for one table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Unique key within the table. Also the row field the column shows.
    pub key: String,
    /// Header label.
    pub label: String,
    /// Whether clicking the header sorts by this column.
    pub sortable: bool,
    /// Whether the column may be hidden from the column menu.
    pub hideable: bool,
    /// Whether the column takes part in drag reordering.
    pub draggable: bool,
    /// Optional group tag used by the column menu.
    pub group: Option<String>,
    /// Visibility used when nothing is persisted.
    pub default_visible: bool,
}

impl ColumnDescriptor {
    /// Creates a sortable, hideable, draggable, visible column.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: true,
            hideable: true,
            draggable: true,
            group: None,
            default_visible: true,
        }
    }

    /// Sets whether the column is sortable.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Sets whether the column can be hidden.
    pub fn hideable(mut self, hideable: bool) -> Self {
        self.hideable = hideable;
        self
    }

    /// Sets whether the column can be dragged.
    pub fn draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    /// Places the column in a group.
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Sets the default visibility.
    pub fn default_visible(mut self, visible: bool) -> Self {
        self.default_visible = visible;
        self
    }
}

/// Ordered set of column descriptors with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRegistry {
    columns: Vec<ColumnDescriptor>,
}

impl ColumnRegistry {
    /// Builds a registry, resolving duplicate keys last-wins.
    ///
    /// A duplicate keeps the position of its first occurrence and the
    /// definition of its last. Duplicates and empty registries are caller
    /// contract violations and are logged at error level; use
    /// [`ColumnRegistry::try_new`] to reject them instead.
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        if columns.is_empty() {
            error!("column registry is empty");
        }

        let mut out: Vec<ColumnDescriptor> = Vec::with_capacity(columns.len());
        let mut index: HashMap<String, usize> = HashMap::new();
        for column in columns {
            match index.get(&column.key) {
                Some(&i) => {
                    error!(column = %column.key, "duplicate column key, last definition wins");
                    out[i] = column;
                }
                None => {
                    index.insert(column.key.clone(), out.len());
                    out.push(column);
                }
            }
        }
        Self { columns: out }
    }

    /// Builds a registry, failing on duplicate keys or an empty list.
    pub fn try_new(columns: Vec<ColumnDescriptor>) -> Result<Self, ConfigError> {
        if columns.is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }
        let mut seen = std::collections::HashSet::new();
        for column in &columns {
            if !seen.insert(column.key.as_str()) {
                return Err(ConfigError::DuplicateColumnKey(column.key.clone()));
            }
        }
        Ok(Self { columns })
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Looks up a column by key.
    pub fn get(&self, key: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Returns true if the key is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.key.clone()).collect()
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true when no columns are registered.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Visibility map built from every column's default.
    pub fn default_visibility(&self) -> HashMap<String, bool> {
        self.columns
            .iter()
            .map(|c| (c.key.clone(), c.default_visible))
            .collect()
    }

    /// Group names in order of first appearance.
    pub fn groups(&self) -> Vec<String> {
        let mut groups: Vec<String> = Vec::new();
        for group in self.columns.iter().filter_map(|c| c.group.as_ref()) {
            if !groups.contains(group) {
                groups.push(group.clone());
            }
        }
        groups
    }

    /// Keys of the columns in a group, in declaration order.
    pub fn group_members(&self, group: &str) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.group.as_deref() == Some(group))
            .map(|c| c.key.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_defaults() {
        let c = ColumnDescriptor::new("name", "Name");
        assert!(c.sortable);
        assert!(c.hideable);
        assert!(c.draggable);
        assert!(c.default_visible);
        assert_eq!(c.group, None);
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let registry = ColumnRegistry::new(vec![
            ColumnDescriptor::new("a", "First A"),
            ColumnDescriptor::new("b", "B"),
            ColumnDescriptor::new("a", "Second A").sortable(false),
        ]);
        assert_eq!(registry.keys(), vec!["a", "b"]);
        let a = registry.get("a").unwrap();
        assert_eq!(a.label, "Second A");
        assert!(!a.sortable);
    }

    #[test]
    fn test_try_new_rejects_contract_violations() {
        assert_eq!(ColumnRegistry::try_new(vec![]), Err(ConfigError::EmptyRegistry));
        assert_eq!(
            ColumnRegistry::try_new(vec![
                ColumnDescriptor::new("a", "A"),
                ColumnDescriptor::new("a", "A"),
            ]),
            Err(ConfigError::DuplicateColumnKey("a".to_string()))
        );
        assert!(ColumnRegistry::try_new(vec![ColumnDescriptor::new("a", "A")]).is_ok());
    }

    #[test]
    fn test_groups_and_defaults() {
        let registry = ColumnRegistry::new(vec![
            ColumnDescriptor::new("name", "Name"),
            ColumnDescriptor::new("city", "City").group("address"),
            ColumnDescriptor::new("phone", "Phone").group("contact").default_visible(false),
            ColumnDescriptor::new("zip", "Zip").group("address"),
        ]);
        assert_eq!(registry.groups(), vec!["address", "contact"]);
        assert_eq!(registry.group_members("address"), vec!["city", "zip"]);
        let defaults = registry.default_visibility();
        assert_eq!(defaults["phone"], false);
        assert_eq!(defaults["name"], true);
    }
}
