//! Table state: column registry, visibility, order and sort composed into one
//! observable object.
//!
//! The visibility map and column order are restored once from the layout
//! store when the state is created, and written back after every change.
//! The sorted dataset is re-derived whenever rows or sort state change.

use crate::column::{ColumnDescriptor, ColumnRegistry};
use crate::reorder::move_key;
use crate::row::TableRow;
use crate::sort::{sort_rows, MixedTypeOrder, SortState};
use crate::storage::LayoutPersistence;
use std::collections::HashMap;
use tracing::{debug, warn};

/// What changed in a [`TableState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// The sort state changed.
    Sort(SortState),
    /// Column visibility changed.
    Visibility,
    /// Column order changed.
    Order,
    /// Visibility and order went back to defaults.
    Reset,
    /// Rows were replaced.
    Data,
}

/// Handle returned by [`TableState::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StateChange) + Send>;

/// Reactive table state.
///
/// ```rust
/// use bubbletea_datatable::{ColumnDescriptor, TableState};
/// use serde_json::json;
///
/// let mut state = TableState::new(
///     vec![ColumnDescriptor::new("name", "Name"), ColumnDescriptor::new("age", "Age")],
///     vec![json!({"id": 1, "name": "Bob", "age": 30}), json!({"id": 2, "name": "Amy", "age": 25})],
/// );
/// state.handle_sort("age");
/// assert_eq!(state.sorted_data()[0]["name"], "Amy");
/// ```
pub struct TableState<T: TableRow> {
    registry: ColumnRegistry,
    data: Vec<T>,
    sorted: Vec<T>,
    visibility: HashMap<String, bool>,
    order: Vec<String>,
    sort: SortState,
    mixed_order: MixedTypeOrder,
    persistence: Option<LayoutPersistence>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_listener: u64,
}

impl<T: TableRow + std::fmt::Debug> std::fmt::Debug for TableState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableState")
            .field("registry", &self.registry)
            .field("rows", &self.data.len())
            .field("visibility", &self.visibility)
            .field("order", &self.order)
            .field("sort", &self.sort)
            .field("persistence", &self.persistence)
            .finish_non_exhaustive()
    }
}

impl<T: TableRow> TableState<T> {
    /// Creates in-memory state with default layout.
    pub fn new(columns: Vec<ColumnDescriptor>, data: Vec<T>) -> Self {
        Self::initialize(columns, data, None, None)
    }

    /// Creates state, resolving the layout.
    ///
    /// Visibility comes from `initial_visibility` if given, else from the
    /// store, else from column defaults. Order comes from the store, else
    /// declaration order. Unknown keys are dropped and unlisted columns
    /// appended, so newly added columns always show up.
    pub fn initialize(
        columns: Vec<ColumnDescriptor>,
        data: Vec<T>,
        persistence: Option<LayoutPersistence>,
        initial_visibility: Option<HashMap<String, bool>>,
    ) -> Self {
        let registry = ColumnRegistry::new(columns);
        let mut state = Self {
            visibility: registry.default_visibility(),
            order: registry.keys(),
            registry,
            sorted: data.clone(),
            data,
            sort: SortState::none(),
            mixed_order: MixedTypeOrder::default(),
            persistence,
            listeners: Vec::new(),
            next_listener: 0,
        };
        state.load_layout(initial_visibility);
        state
    }

    /// Sets how mixed number/text columns sort.
    pub fn with_mixed_order(mut self, mixed_order: MixedTypeOrder) -> Self {
        self.mixed_order = mixed_order;
        self.resort();
        self
    }

    /// Re-reads visibility and order from the store.
    ///
    /// Tables sharing a storage key use this to pick up each other's changes.
    pub fn reload_layout(&mut self) {
        self.load_layout(None);
        self.notify(StateChange::Visibility);
        self.notify(StateChange::Order);
    }

    fn load_layout(&mut self, initial_visibility: Option<HashMap<String, bool>>) {
        let stored_visibility = match initial_visibility {
            Some(v) => Some(v),
            None => self.persistence.as_ref().and_then(|p| p.load_visibility()),
        };
        self.visibility = self.normalize_visibility(stored_visibility);

        let stored_order = self.persistence.as_ref().and_then(|p| p.load_order());
        self.order = self.normalize_order(stored_order);
    }

    fn normalize_visibility(&self, stored: Option<HashMap<String, bool>>) -> HashMap<String, bool> {
        let defaults = self.registry.default_visibility();
        let Some(stored) = stored else {
            return self.ensure_one_visible(defaults);
        };

        let merged: HashMap<String, bool> = self
            .registry
            .columns()
            .iter()
            .map(|c| {
                let visible = stored.get(&c.key).copied().unwrap_or(c.default_visible);
                (c.key.clone(), visible)
            })
            .collect();

        if merged.values().any(|v| *v) {
            merged
        } else {
            warn!("stored column visibility hides every column, using defaults");
            self.ensure_one_visible(defaults)
        }
    }

    fn ensure_one_visible(&self, mut visibility: HashMap<String, bool>) -> HashMap<String, bool> {
        if !visibility.values().any(|v| *v) {
            if let Some(first) = self.registry.columns().first() {
                visibility.insert(first.key.clone(), true);
            }
        }
        visibility
    }

    fn normalize_order(&self, stored: Option<Vec<String>>) -> Vec<String> {
        let Some(stored) = stored else {
            return self.registry.keys();
        };
        let mut order: Vec<String> = Vec::with_capacity(self.registry.len());
        for key in stored {
            if self.registry.contains(&key) && !order.contains(&key) {
                order.push(key);
            }
        }
        for key in self.registry.keys() {
            if !order.contains(&key) {
                order.push(key);
            }
        }
        order
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// The column registry.
    pub fn registry(&self) -> &ColumnRegistry {
        &self.registry
    }

    /// Rows in input order.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Rows ordered by the current sort; not filtered or paginated.
    pub fn sorted_data(&self) -> &[T] {
        &self.sorted
    }

    /// The visibility map.
    pub fn column_visibility(&self) -> &HashMap<String, bool> {
        &self.visibility
    }

    /// Returns true if the column is shown.
    pub fn is_visible(&self, key: &str) -> bool {
        self.visibility.get(key).copied().unwrap_or(false)
    }

    /// Number of visible columns.
    pub fn visible_count(&self) -> usize {
        self.visibility.values().filter(|v| **v).count()
    }

    /// Full column order, hidden columns included.
    pub fn column_order(&self) -> &[String] {
        &self.order
    }

    /// Visible columns in display order.
    pub fn visible_columns(&self) -> Vec<&ColumnDescriptor> {
        self.order
            .iter()
            .filter(|key| self.is_visible(key))
            .filter_map(|key| self.registry.get(key))
            .collect()
    }

    /// Current sort state.
    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// The persistence binding, if any.
    pub fn persistence(&self) -> Option<&LayoutPersistence> {
        self.persistence.as_ref()
    }

    // -------------------------------------------------------------------------
    // Mutators
    // -------------------------------------------------------------------------

    /// Header click on `key`: cycles none → asc → desc → none.
    ///
    /// Unknown and non-sortable columns are ignored. Returns true if the
    /// sort state changed.
    pub fn handle_sort(&mut self, key: &str) -> bool {
        match self.registry.get(key) {
            Some(c) if c.sortable => {}
            _ => return false,
        }
        let next = self.sort.next(key);
        self.set_sort(next);
        true
    }

    /// Replaces the sort state.
    pub fn set_sort(&mut self, sort: SortState) {
        if sort == self.sort {
            return;
        }
        debug!(column = ?sort.column(), direction = ?sort.direction(), "sort changed");
        self.sort = sort;
        self.resort();
        self.notify(StateChange::Sort(self.sort.clone()));
    }

    /// Shows or hides one column.
    ///
    /// Rejected (returns false, nothing changes) for unknown keys, for
    /// hiding a non-hideable column, and for hiding the last visible column.
    pub fn toggle_column_visibility(&mut self, key: &str) -> bool {
        let Some(column) = self.registry.get(key) else {
            return false;
        };
        let visible = self.is_visible(key);
        if visible && (!column.hideable || self.visible_count() <= 1) {
            debug!(column = %key, "rejected hiding column");
            return false;
        }
        self.visibility.insert(key.to_string(), !visible);
        self.persist_visibility();
        self.notify(StateChange::Visibility);
        true
    }

    /// Shows or hides several columns at once.
    ///
    /// Non-hideable columns are never hidden. The whole change is rejected if
    /// it would leave no visible column. Returns true if anything changed.
    pub fn set_columns_visible(&mut self, keys: &[String], visible: bool) -> bool {
        let Some(next) = self.visibility_after(keys, visible) else {
            debug!(?keys, visible, "rejected column visibility change");
            return false;
        };
        self.visibility = next;
        self.persist_visibility();
        self.notify(StateChange::Visibility);
        true
    }

    /// Moves `moved_key` to the position of `target_key`.
    ///
    /// Both columns must exist, differ and be draggable; otherwise nothing
    /// happens and false is returned.
    pub fn reorder_columns(&mut self, moved_key: &str, target_key: &str) -> bool {
        let draggable = |key: &str| self.registry.get(key).map(|c| c.draggable).unwrap_or(false);
        if !draggable(moved_key) || !draggable(target_key) {
            return false;
        }
        let Some(order) = move_key(&self.order, moved_key, target_key) else {
            return false;
        };
        debug!(moved = %moved_key, target = %target_key, "columns reordered");
        self.order = order;
        if let Some(p) = &self.persistence {
            p.save_order(&self.order);
        }
        self.notify(StateChange::Order);
        true
    }

    /// Restores default visibility and declaration order, and clears the
    /// persisted layout.
    pub fn reset_to_defaults(&mut self) {
        self.visibility = self.ensure_one_visible(self.registry.default_visibility());
        self.order = self.registry.keys();
        if let Some(p) = &self.persistence {
            p.clear();
        }
        self.notify(StateChange::Reset);
    }

    /// Returns true if [`TableState::set_columns_visible`] with the same
    /// arguments would change anything.
    pub fn can_set_columns_visible(&self, keys: &[String], visible: bool) -> bool {
        self.visibility_after(keys, visible).is_some()
    }

    /// Visibility after showing or hiding `keys`, or `None` when the change
    /// is a no-op or would leave no column visible. Non-hideable columns are
    /// never hidden.
    fn visibility_after(&self, keys: &[String], visible: bool) -> Option<HashMap<String, bool>> {
        let mut next = self.visibility.clone();
        for key in keys {
            match self.registry.get(key) {
                Some(c) if visible || c.hideable => {
                    next.insert(key.clone(), visible);
                }
                _ => {}
            }
        }
        if next == self.visibility {
            return None;
        }
        if !next.values().any(|v| *v) {
            return None;
        }
        Some(next)
    }

    /// Replaces the rows, keeping the sort state.
    pub fn set_data(&mut self, data: Vec<T>) {
        self.data = data;
        self.resort();
        self.notify(StateChange::Data);
    }

    // -------------------------------------------------------------------------
    // Observers
    // -------------------------------------------------------------------------

    /// Registers a listener called after every change.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StateChange) + Send + 'static,
    {
        self.next_listener += 1;
        let id = SubscriptionId(self.next_listener);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        before != self.listeners.len()
    }

    fn notify(&mut self, change: StateChange) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&change);
        }
    }

    fn resort(&mut self) {
        self.sorted = sort_rows(&self.data, &self.sort, self.mixed_order);
    }

    fn persist_visibility(&self) {
        if let Some(p) = &self.persistence {
            p.save_visibility(&self.visibility);
        }
    }
}
