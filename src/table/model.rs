//! The table model and its message handling.

use super::keys::TableKeyMap;
use super::style::TableStyles;
use super::types::{
    ActionsRenderer, BulkAction, CellRenderer, Exporter, ItemIdFn, RowCallback, RowPredicate,
    RowRenderer, SearchHandler, SearchResultsMsg, TableConfig,
};
use crate::column::ColumnDescriptor;
use crate::column_menu::ColumnMenu;
use crate::debounce::{DebounceMsg, Debouncer};
use crate::error::ExportError;
use crate::paginator;
use crate::reorder::{KeyboardDrag, PointerDrag};
use crate::row::TableRow;
use crate::search::{filter_rows, SearchMode, SearchSequence};
use crate::selection::Selection;
use crate::sort::{sort_rows, SortState};
use crate::state::TableState;
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use tracing::{debug, warn};
use unicode_segmentation::UnicodeSegmentation;

/// Sortable, searchable, paginated data table.
///
/// Rows flow through sort, then search, then pagination. Column layout
/// (visibility and order) lives in a [`TableState`] and is persisted when a
/// store is configured; row selection is kept by id and survives paging.
///
/// ```rust
/// use bubbletea_datatable::table::{Model, TableConfig};
/// use bubbletea_datatable::ColumnDescriptor;
/// use serde_json::json;
///
/// let rows = (1..=25).map(|i| json!({"id": i, "name": format!("row {i}")})).collect();
/// let mut table = Model::with_config(
///     vec![ColumnDescriptor::new("name", "Name")],
///     rows,
///     TableConfig::new()
///         .with_pagination(true)
///         .with_page_size(10)
///         .with_selectable(true),
/// );
/// assert_eq!(table.total_pages(), 3);
///
/// table.go_to_page(3);
/// assert_eq!(table.page_rows().len(), 5);
/// ```
pub struct Model<T: TableRow> {
    pub(super) state: TableState<T>,
    pub(super) config: TableConfig,
    pub(super) paginator: paginator::Model,
    pub(super) selection: Selection,
    pub(super) menu: ColumnMenu,
    pub(super) pointer_drag: PointerDrag,
    pub(super) keyboard_drag: KeyboardDrag,
    pub(super) filtered: Vec<T>,
    pub(super) cursor: usize,
    pub(super) focused_column: usize,
    pub(super) focus: bool,
    pub(super) loading: bool,
    pub(super) status_message: Option<String>,

    pub(super) search_input: String,
    pub(super) editing_search: bool,
    pub(super) committed_term: String,
    pub(super) last_notified: Option<String>,
    pub(super) debouncer: Debouncer,
    pub(super) sequence: SearchSequence,
    pub(super) is_searching: bool,
    pub(super) api_results: Option<Vec<T>>,
    pub(super) all_matching_ids: Option<Vec<String>>,
    pub(super) pending_cmd: Option<Cmd>,

    pub(super) item_id: Option<ItemIdFn<T>>,
    pub(super) disabled_rows: Option<RowPredicate<T>>,
    pub(super) search_handler: Option<SearchHandler>,
    pub(super) on_activate: Option<RowCallback<T>>,
    pub(super) cell_renderer: Option<CellRenderer<T>>,
    pub(super) row_renderer: Option<RowRenderer<T>>,
    pub(super) actions_renderer: Option<ActionsRenderer<T>>,
    pub(super) bulk_actions: Vec<BulkAction<T>>,
    pub(super) exporter: Option<Exporter<T>>,

    /// Key bindings.
    pub keymap: TableKeyMap,
    /// Styles.
    pub styles: TableStyles,
}

impl<T: TableRow + std::fmt::Debug> std::fmt::Debug for Model<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("state", &self.state)
            .field("config", &self.config)
            .field("page", &self.paginator.page())
            .field("selection", &self.selection)
            .field("committed_term", &self.committed_term)
            .field("is_searching", &self.is_searching)
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}

impl<T: TableRow + Send + 'static> Model<T> {
    /// Creates a table with the default configuration.
    pub fn new(columns: Vec<ColumnDescriptor>, data: Vec<T>) -> Self {
        Self::with_config(columns, data, TableConfig::default())
    }

    /// Creates a table. The column layout is restored from the configured
    /// store, if any.
    pub fn with_config(columns: Vec<ColumnDescriptor>, data: Vec<T>, config: TableConfig) -> Self {
        let state = TableState::initialize(
            columns,
            data,
            config.persistence.clone(),
            config.initial_visibility.clone(),
        )
        .with_mixed_order(config.mixed_order);
        let paginator = paginator::Model::new().with_page_size(config.page_size);
        let debouncer = Debouncer::new(config.client_debounce);

        let mut model = Self {
            state,
            paginator,
            selection: Selection::new(),
            menu: ColumnMenu::new(),
            pointer_drag: PointerDrag::new(),
            keyboard_drag: KeyboardDrag::new(),
            filtered: Vec::new(),
            cursor: 0,
            focused_column: 0,
            focus: false,
            loading: false,
            status_message: None,
            search_input: String::new(),
            editing_search: false,
            committed_term: String::new(),
            last_notified: None,
            debouncer,
            sequence: SearchSequence::new(),
            is_searching: false,
            api_results: None,
            all_matching_ids: None,
            pending_cmd: None,
            item_id: None,
            disabled_rows: None,
            search_handler: None,
            on_activate: None,
            cell_renderer: None,
            row_renderer: None,
            actions_renderer: None,
            bulk_actions: Vec::new(),
            exporter: None,
            keymap: TableKeyMap::default(),
            styles: TableStyles::default(),
            config,
        };
        model.refresh();
        model
    }

    /// Overrides [`TableRow::id`] for selection.
    pub fn with_item_id<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.item_id = Some(Box::new(f));
        self
    }

    /// Marks rows for which `f` returns true as not selectable.
    pub fn with_disabled_rows<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.disabled_rows = Some(Box::new(f));
        self
    }

    /// Delegates search to the caller.
    ///
    /// The table stops filtering locally and instead hands each committed
    /// term to `handler` together with a request token. Rows are then
    /// supplied through [`SearchResultsMsg`] or [`Model::accept_search_results`].
    ///
    /// A term set earlier with [`Model::with_search_term`] is forwarded at
    /// once; the handler's command is returned by [`Model::init`].
    pub fn with_search_handler<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&str, crate::search::SearchToken) -> Option<Cmd> + Send + 'static,
    {
        self.search_handler = Some(Box::new(handler));
        self.debouncer.set_window(self.config.server_debounce);
        if !self.committed_term.is_empty() {
            let term = self.committed_term.clone();
            self.last_notified = None;
            self.pending_cmd = self.notify_search(&term);
        }
        self.refresh();
        self
    }

    /// Called with the row under the cursor when it is activated.
    pub fn on_row_activate<F>(mut self, f: F) -> Self
    where
        F: FnMut(&T) + Send + 'static,
    {
        self.on_activate = Some(Box::new(f));
        self
    }

    /// Custom rendering of single cells.
    pub fn with_cell_renderer<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, &str) -> String + Send + Sync + 'static,
    {
        self.cell_renderer = Some(Box::new(f));
        self
    }

    /// Custom rendering of whole rows. Columns missing from the returned map
    /// fall back to the cell renderer or the raw value.
    pub fn with_row_renderer<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> std::collections::HashMap<String, String> + Send + Sync + 'static,
    {
        self.row_renderer = Some(Box::new(f));
        self
    }

    /// Adds an actions column rendered by `f`.
    pub fn with_actions<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.actions_renderer = Some(Box::new(f));
        self
    }

    /// Adds a bulk action. Actions are numbered from 1 in insertion order.
    pub fn with_bulk_action(mut self, action: BulkAction<T>) -> Self {
        self.bulk_actions.push(action);
        self
    }

    /// Replaces the default CSV export and enables exporting.
    pub fn with_exporter<F>(mut self, f: F) -> Self
    where
        F: Fn(&[T], &[ColumnDescriptor]) -> Result<(), ExportError> + Send + Sync + 'static,
    {
        self.exporter = Some(Box::new(f));
        self.config.enable_export = true;
        self
    }

    /// Replaces the key bindings.
    pub fn with_keymap(mut self, keymap: TableKeyMap) -> Self {
        self.keymap = keymap;
        self
    }

    /// Replaces the styles.
    pub fn with_styles(mut self, styles: TableStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Starts with an externally supplied search term, applied immediately.
    ///
    /// In server mode the handler is asked for the term right away and its
    /// command is held until [`Model::init`] or [`Component::focus`].
    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search_input = term.clone();
        self.pending_cmd = self.commit_search(term);
        self
    }

    /// Scopes the header checkbox to every row matching the current search.
    ///
    /// `ids` must list all matching rows across pages. The list is dropped
    /// when the search or the result set changes.
    pub fn with_all_matching_ids(mut self, ids: Vec<String>) -> Self {
        self.all_matching_ids = Some(ids);
        self
    }

    /// Takes the command built while configuring the table, such as the
    /// request for an initial server-side search term.
    pub fn init(&mut self) -> Option<Cmd> {
        self.pending_cmd.take()
    }

    /// Where filtering happens.
    pub fn search_mode(&self) -> SearchMode {
        if self.search_handler.is_some() {
            SearchMode::Server
        } else {
            SearchMode::Client
        }
    }

    /// Re-derives filtered rows and clamps page and cursor.
    pub(super) fn refresh(&mut self) {
        self.filtered = match &self.api_results {
            Some(rows) => sort_rows(rows, self.state.sort_state(), self.config.mixed_order),
            None => match self.search_mode() {
                SearchMode::Server => self.state.sorted_data().to_vec(),
                SearchMode::Client => filter_rows(
                    self.state.sorted_data(),
                    &self.committed_term,
                    self.config.match_mode,
                ),
            },
        };
        self.paginator.set_total_items(self.filtered.len());
        self.clamp_cursor();
    }

    pub(super) fn clamp_cursor(&mut self) {
        let len = self.page_rows().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
        let columns = self.state.visible_columns().len();
        self.focused_column = self.focused_column.min(columns.saturating_sub(1));
    }

    pub(super) fn row_id(&self, row: &T) -> String {
        match &self.item_id {
            Some(f) => f(row),
            None => row.id(),
        }
    }

    pub(super) fn is_row_disabled(&self, row: &T) -> bool {
        self.disabled_rows.as_ref().map(|f| f(row)).unwrap_or(false)
    }

    /// Resets sort, page and the select-all capture after the rows being
    /// looked at were replaced by a different search or result set.
    pub(super) fn reset_for_new_result_set(&mut self) {
        let dropped = self.selection.invalidate_capture();
        if dropped > 0 {
            debug!(dropped, "select-all capture dropped after search change");
        }
        self.all_matching_ids = None;
        self.state.set_sort(SortState::none());
        self.paginator.reset();
    }

    /// Applies a committed search term.
    pub(super) fn commit_search(&mut self, term: String) -> Option<Cmd> {
        if term != self.committed_term {
            debug!(term = %term, "search term committed");
            self.committed_term = term.clone();
            self.reset_for_new_result_set();
        }
        let cmd = match self.search_mode() {
            SearchMode::Server => self.notify_search(&term),
            SearchMode::Client => None,
        };
        self.refresh();
        cmd
    }

    /// Forwards `term` to the search handler unless it was the last term sent.
    pub(super) fn notify_search(&mut self, term: &str) -> Option<Cmd> {
        if self.last_notified.as_deref() == Some(term) {
            debug!(term = %term, "skipping duplicate search request");
            return None;
        }
        let handler = self.search_handler.as_mut()?;
        let token = self.sequence.issue();
        self.last_notified = Some(term.to_string());
        self.is_searching = true;
        debug!(term = %term, token = token.value(), "search requested");
        handler(term, token)
    }

    /// Handles debounce ticks, search results and, while focused, keys.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(tick) = msg.downcast_ref::<DebounceMsg>() {
            let term = self.debouncer.accept(tick)?;
            return self.commit_search(term);
        }
        if let Some(results) = msg.downcast_ref::<SearchResultsMsg<T>>() {
            self.accept_search_results(results.token, results.rows.clone());
            return None;
        }
        if !self.focus {
            return None;
        }
        let key_msg = msg.downcast_ref::<KeyMsg>()?;
        self.handle_key(key_msg)
    }

    pub(super) fn handle_key(&mut self, key_msg: &KeyMsg) -> Option<Cmd> {
        if self.menu.is_open() {
            if self.menu.handle_key(&mut self.state, key_msg) {
                self.after_layout_change();
            }
            return None;
        }
        if self.editing_search {
            return self.handle_search_key(key_msg);
        }
        if self.keyboard_drag.is_active() {
            self.handle_drag_key(key_msg);
            return None;
        }

        let km = &self.keymap;
        if km.clear_search.matches(key_msg) {
            return self.clear_search();
        } else if km.search.matches(key_msg) {
            self.editing_search = true;
        } else if km.column_menu.matches(key_msg) {
            self.menu.open();
        } else if km.reset_layout.matches(key_msg) {
            self.reset_to_defaults();
        } else if km.pick_up.matches(key_msg) {
            if let Some(key) = self.focused_column_key() {
                self.keyboard_drag.pick_up(&self.state, &key);
            }
        } else if km.column_left.matches(key_msg) {
            self.focused_column = self.focused_column.saturating_sub(1);
        } else if km.column_right.matches(key_msg) {
            self.focused_column += 1;
            self.clamp_cursor();
        } else if km.sort.matches(key_msg) {
            if let Some(key) = self.focused_column_key() {
                return self.handle_sort(&key);
            }
        } else if km.hide_column.matches(key_msg) {
            if let Some(key) = self.focused_column_key() {
                self.toggle_column_visibility(&key);
            }
        } else if km.toggle_row.matches(key_msg) {
            if let Some(id) = self.cursor_row().map(|r| self.row_id(r)) {
                self.toggle_row_selection(&id);
            }
        } else if km.toggle_all.matches(key_msg) {
            let checked = !self.is_all_selected();
            self.select_all(checked);
        } else if km.bulk_action.matches(key_msg) {
            if let KeyCode::Char(c) = key_msg.key {
                if let Some(index) = c.to_digit(10).and_then(|n| (n as usize).checked_sub(1)) {
                    self.run_bulk_action(index);
                }
            }
        } else if km.export.matches(key_msg) {
            self.export_with_status();
        } else if km.activate.matches(key_msg) {
            self.activate_cursor_row();
        } else if km.row_up.matches(key_msg) {
            self.cursor = self.cursor.saturating_sub(1);
        } else if km.row_down.matches(key_msg) {
            self.cursor += 1;
            self.clamp_cursor();
        } else if km.next_page.matches(key_msg) {
            self.paginator.next_page();
            self.clamp_cursor();
        } else if km.prev_page.matches(key_msg) {
            self.paginator.prev_page();
            self.clamp_cursor();
        } else if km.first_page.matches(key_msg) {
            self.paginator.reset();
            self.clamp_cursor();
        } else if km.last_page.matches(key_msg) {
            self.paginator.go_to(self.paginator.total_pages());
            self.clamp_cursor();
        }
        None
    }

    fn handle_search_key(&mut self, key_msg: &KeyMsg) -> Option<Cmd> {
        if self.keymap.clear_search.matches(key_msg) {
            return self.clear_search();
        }
        if self.keymap.search_done.matches(key_msg) {
            self.editing_search = false;
            return None;
        }
        let mut input = self.search_input.clone();
        match key_msg.key {
            KeyCode::Backspace => {
                let keep = input
                    .grapheme_indices(true)
                    .last()
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                input.truncate(keep);
            }
            KeyCode::Char(c)
                if !key_msg
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                input.push(c);
            }
            _ => return None,
        }
        Some(self.set_search_input(input))
    }

    fn handle_drag_key(&mut self, key_msg: &KeyMsg) {
        let km = &self.keymap;
        if km.move_left.matches(key_msg) {
            self.keyboard_drag.move_left(&self.state);
        } else if km.move_right.matches(key_msg) {
            self.keyboard_drag.move_right(&self.state);
        } else if km.drop.matches(key_msg) {
            let moved = self.keyboard_drag.active().map(str::to_string);
            if self.keyboard_drag.place(&mut self.state) {
                self.after_layout_change();
                if let Some(key) = moved {
                    self.focus_column(&key);
                }
            }
        } else if km.cancel_move.matches(key_msg) {
            self.keyboard_drag.cancel();
        }
    }

    fn export_with_status(&mut self) {
        let rows = self.filtered.len();
        self.status_message = match self.export() {
            Ok(super::types::ExportOutcome::Written(path)) => {
                Some(format!("Exported {rows} rows to {}", path.display()))
            }
            Ok(super::types::ExportOutcome::Custom) => Some(format!("Exported {rows} rows")),
            Err(ExportError::Disabled) => None,
            Err(ExportError::NoData) => Some("Nothing to export".to_string()),
            Err(e) => {
                warn!(error = %e, "export failed");
                Some("Export failed".to_string())
            }
        };
    }

    fn activate_cursor_row(&mut self) {
        let Some(row) = self.cursor_row().cloned() else {
            return;
        };
        if let Some(f) = self.on_activate.as_mut() {
            f(&row);
        }
    }

    pub(super) fn after_layout_change(&mut self) {
        self.clamp_cursor();
    }
}

impl<T: TableRow + Send + 'static> Component for Model<T> {
    /// Focuses the table and hands over any command pending from
    /// construction (see [`Model::init`]).
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        self.pending_cmd.take()
    }

    fn blur(&mut self) {
        self.focus = false;
        self.editing_search = false;
        self.keyboard_drag.cancel();
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
