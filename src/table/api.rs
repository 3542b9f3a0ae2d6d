//! Public operations of the table: layout, search, selection, paging and
//! export.

use super::types::ExportOutcome;
use super::Model;
use crate::column::ColumnDescriptor;
use crate::column_menu::ColumnMenu;
use crate::error::ExportError;
use crate::export::{export_to_path, to_csv_string};
use crate::paginator::PageItem;
use crate::reorder::KeyboardDrag;
use crate::row::TableRow;
use crate::search::{SearchMode, SearchToken};
use crate::selection::Selection;
use crate::state::TableState;
use bubbletea_rs::Cmd;
use tracing::debug;

impl<T: TableRow + Send + 'static> Model<T> {
    // -------------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------------

    /// The underlying table state.
    pub fn state(&self) -> &TableState<T> {
        &self.state
    }

    /// Visible columns in display order.
    pub fn visible_columns(&self) -> Vec<&ColumnDescriptor> {
        self.state.visible_columns()
    }

    /// Cycles the sort of `key`.
    ///
    /// While a server-side search is in flight the request is re-issued, so
    /// results computed for the old ordering are never applied.
    pub fn handle_sort(&mut self, key: &str) -> Option<Cmd> {
        if !self.state.handle_sort(key) {
            return None;
        }
        let cmd = if self.search_mode() == SearchMode::Server && self.is_searching {
            self.last_notified = None;
            let term = self.committed_term.clone();
            self.notify_search(&term)
        } else {
            None
        };
        self.refresh();
        cmd
    }

    /// Shows or hides a column. Returns false if refused.
    pub fn toggle_column_visibility(&mut self, key: &str) -> bool {
        let changed = self.state.toggle_column_visibility(key);
        if changed {
            self.after_layout_change();
        }
        changed
    }

    /// Moves `moved_key` to the position of `target_key`.
    pub fn reorder_columns(&mut self, moved_key: &str, target_key: &str) -> bool {
        let changed = self.state.reorder_columns(moved_key, target_key);
        if changed {
            self.after_layout_change();
        }
        changed
    }

    /// Restores the default column layout and clears the stored one.
    pub fn reset_to_defaults(&mut self) {
        self.state.reset_to_defaults();
        self.keyboard_drag.cancel();
        self.pointer_drag.cancel();
        self.after_layout_change();
    }

    /// The column visibility menu.
    pub fn column_menu(&self) -> &ColumnMenu {
        &self.menu
    }

    /// Opens the column visibility menu.
    pub fn open_column_menu(&mut self) {
        self.menu.open();
    }

    /// Key of the focused column.
    pub fn focused_column_key(&self) -> Option<String> {
        self.state
            .visible_columns()
            .get(self.focused_column)
            .map(|c| c.key.clone())
    }

    /// Focuses the visible column `key`. Returns false if it is not shown.
    pub fn focus_column(&mut self, key: &str) -> bool {
        match self.state.visible_columns().iter().position(|c| c.key == key) {
            Some(i) => {
                self.focused_column = i;
                true
            }
            None => false,
        }
    }

    /// Keyboard reordering state.
    pub fn keyboard_drag(&self) -> &KeyboardDrag {
        &self.keyboard_drag
    }

    /// Pointer pressed on the header of `key`.
    pub fn pointer_drag_start(&mut self, key: &str) -> bool {
        self.pointer_drag.begin(&self.state, key)
    }

    /// Pointer moved over the header of `key`.
    pub fn pointer_drag_over(&mut self, key: &str) {
        self.pointer_drag.hover(&self.state, key);
    }

    /// Pointer released. Returns true if the columns moved.
    pub fn pointer_drag_end(&mut self) -> bool {
        let changed = self.pointer_drag.release(&mut self.state);
        if changed {
            self.after_layout_change();
        }
        changed
    }

    /// Pointer gesture abandoned.
    pub fn pointer_drag_cancel(&mut self) {
        self.pointer_drag.cancel();
    }

    // -------------------------------------------------------------------------
    // Data
    // -------------------------------------------------------------------------

    /// Replaces the rows of the current result set, as when the caller
    /// reloads or receives server results. Sort, search and selection are
    /// kept; a new search or result set resets the sort instead.
    pub fn set_data(&mut self, data: Vec<T>) {
        self.state.set_data(data);
        self.refresh();
    }

    /// Sets the loading flag.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Returns true while loading.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Rows after sort and search, before pagination.
    pub fn filtered_rows(&self) -> &[T] {
        &self.filtered
    }

    /// Rows on the current page.
    pub fn page_rows(&self) -> &[T] {
        if self.config.pagination {
            self.paginator.paginate(&self.filtered)
        } else {
            &self.filtered
        }
    }

    /// Index of the cursor within the current page.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Row under the cursor.
    pub fn cursor_row(&self) -> Option<&T> {
        self.page_rows().get(self.cursor)
    }

    /// Last status message, e.g. the result of an export.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    /// Text in the search box.
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// Term currently applied.
    pub fn search_term(&self) -> &str {
        &self.committed_term
    }

    /// Returns true while a server-side request is outstanding.
    pub fn is_searching(&self) -> bool {
        self.is_searching
    }

    /// Token of the outstanding server-side request, if any. Results sent
    /// back with it are applied; results for older tokens are discarded.
    pub fn search_token(&self) -> Option<SearchToken> {
        if self.is_searching {
            self.sequence.latest()
        } else {
            None
        }
    }

    /// Returns true while the search box has keyboard focus.
    pub fn is_editing_search(&self) -> bool {
        self.editing_search
    }

    /// Updates the search box. The term is applied once input settles; the
    /// returned command delivers the settle tick.
    pub fn set_search_input(&mut self, input: impl Into<String>) -> Cmd {
        self.search_input = input.into();
        self.paginator.reset();
        self.clamp_cursor();
        let window = match self.search_mode() {
            SearchMode::Server => self.config.server_debounce,
            SearchMode::Client => self.config.client_debounce,
        };
        self.debouncer.set_window(window);
        self.debouncer.push(self.search_input.clone())
    }

    /// Applies an externally controlled term immediately, skipping debounce.
    pub fn set_search_term(&mut self, term: impl Into<String>) -> Option<Cmd> {
        let term = term.into();
        self.debouncer.cancel();
        self.search_input = term.clone();
        self.commit_search(term)
    }

    /// Clears input, applied term and API results, and returns to page 1.
    ///
    /// A server-side handler is told about the empty term.
    pub fn clear_search(&mut self) -> Option<Cmd> {
        self.debouncer.cancel();
        self.search_input.clear();
        self.editing_search = false;
        let had_results = self.api_results.take().is_some();
        if had_results || !self.committed_term.is_empty() {
            self.committed_term.clear();
            self.reset_for_new_result_set();
        }
        self.paginator.reset();

        let cmd = match self.search_handler.as_mut() {
            Some(handler) => {
                let token = self.sequence.issue();
                self.last_notified = Some(String::new());
                debug!(token = token.value(), "search cleared");
                handler("", token)
            }
            None => None,
        };
        self.is_searching = false;
        self.refresh();
        cmd
    }

    /// Applies server-side results if `token` is the latest request.
    ///
    /// Returns false, leaving the rows untouched, for stale tokens.
    pub fn accept_search_results(&mut self, token: SearchToken, rows: Vec<T>) -> bool {
        if !self.sequence.is_current(token) {
            debug!(token = token.value(), "discarding stale search results");
            return false;
        }
        self.is_searching = false;
        self.state.set_data(rows);
        self.refresh();
        true
    }

    /// Overrides client and server filtering with an out-of-band result set
    /// until [`Model::clear_api_search_results`] or [`Model::clear_search`].
    pub fn set_api_search_results(&mut self, rows: Vec<T>) {
        self.api_results = Some(rows);
        self.reset_for_new_result_set();
        self.refresh();
    }

    /// Drops the out-of-band result set.
    pub fn clear_api_search_results(&mut self) {
        if self.api_results.take().is_some() {
            self.reset_for_new_result_set();
            self.refresh();
        }
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// The selection set.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Ids of the selectable rows on the current page.
    pub fn visible_ids(&self) -> Vec<String> {
        self.page_rows()
            .iter()
            .filter(|r| !self.is_row_disabled(r))
            .map(|r| self.row_id(r))
            .collect()
    }

    /// Returns true if `row` cannot be selected.
    pub fn is_disabled(&self, row: &T) -> bool {
        self.is_row_disabled(row)
    }

    /// Returns true if `row` is selected.
    pub fn is_selected(&self, row: &T) -> bool {
        self.selection.is_selected(&self.row_id(row))
    }

    /// Flips selection of the row with `id`. Disabled rows and tables
    /// without selection refuse.
    pub fn toggle_row_selection(&mut self, id: &str) -> bool {
        if !self.config.selectable {
            return false;
        }
        let disabled = self
            .filtered
            .iter()
            .find(|r| self.row_id(r) == id)
            .map(|r| self.is_row_disabled(r))
            .unwrap_or(false);
        if disabled {
            return false;
        }
        self.selection.toggle(id);
        true
    }

    /// Header checkbox: selects the selectable rows on this page, or clears
    /// the whole selection.
    ///
    /// When an exhaustive id list was supplied through
    /// [`Model::set_all_matching_ids`], every listed row is selected instead.
    pub fn select_all(&mut self, checked: bool) {
        if !self.config.selectable {
            return;
        }
        let visible = self.visible_ids();
        self.selection
            .select_all(checked, &visible, self.all_matching_ids.as_deref());
    }

    /// Supplies the ids of every row matching the current search, across
    /// pages, for the header checkbox. `None` scopes it back to the page.
    ///
    /// The list is dropped when the search or the result set changes.
    pub fn set_all_matching_ids(&mut self, ids: Option<Vec<String>>) {
        self.all_matching_ids = ids;
    }

    /// Ids supplied through [`Model::set_all_matching_ids`].
    pub fn all_matching_ids(&self) -> Option<&[String]> {
        self.all_matching_ids.as_deref()
    }

    /// Selects every id in `ids`, typically all rows matching the current
    /// search across pages. The extra ids are dropped when the search changes.
    pub fn select_all_matching(&mut self, ids: &[String]) {
        if !self.config.selectable {
            return;
        }
        let visible = self.visible_ids();
        self.selection.select_all(true, &visible, Some(ids));
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Every selectable row on this page is selected.
    pub fn is_all_selected(&self) -> bool {
        self.selection.is_all_selected(&self.visible_ids())
    }

    /// Something is selected, but not every selectable row on this page.
    pub fn is_indeterminate(&self) -> bool {
        self.selection.is_indeterminate(&self.visible_ids())
    }

    /// Selected rows, drawn from the filtered dataset.
    pub fn selected_rows(&self) -> Vec<T> {
        self.filtered
            .iter()
            .filter(|r| self.selection.is_selected(&self.row_id(r)))
            .cloned()
            .collect()
    }

    /// Labels of the bulk actions.
    pub fn bulk_action_labels(&self) -> Vec<&str> {
        self.bulk_actions.iter().map(|a| a.label.as_str()).collect()
    }

    /// Runs bulk action `index` on the selected rows. Nothing happens when
    /// the index is out of range or nothing is selected.
    pub fn run_bulk_action(&mut self, index: usize) -> bool {
        if index >= self.bulk_actions.len() || self.selection.is_empty() {
            return false;
        }
        let rows = self.selected_rows();
        let action = &mut self.bulk_actions[index];
        debug!(action = %action.label, rows = rows.len(), "bulk action");
        (action.on_click)(&rows);
        true
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Current page, 1-based.
    pub fn page(&self) -> usize {
        self.paginator.page()
    }

    /// Number of pages over the filtered rows.
    pub fn total_pages(&self) -> usize {
        if self.config.pagination {
            self.paginator.total_pages()
        } else {
            usize::from(!self.filtered.is_empty())
        }
    }

    /// Moves to `page`, clamped into range.
    pub fn go_to_page(&mut self, page: usize) {
        self.paginator.go_to(page);
        self.clamp_cursor();
    }

    /// Changes the page size.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.config.page_size = page_size.max(1);
        self.paginator.set_page_size(page_size);
        self.clamp_cursor();
    }

    /// Page-number bar for the current page.
    pub fn page_numbers(&self) -> Vec<PageItem> {
        self.paginator.page_numbers()
    }

    // -------------------------------------------------------------------------
    // Export
    // -------------------------------------------------------------------------

    /// Exports the filtered rows under the visible columns.
    pub fn export(&self) -> Result<ExportOutcome, ExportError> {
        if !self.config.enable_export {
            return Err(ExportError::Disabled);
        }
        if self.filtered.is_empty() {
            return Err(ExportError::NoData);
        }
        let columns: Vec<&ColumnDescriptor> = self.state.visible_columns();
        if let Some(exporter) = &self.exporter {
            let owned: Vec<ColumnDescriptor> = columns.into_iter().cloned().collect();
            exporter(&self.filtered, &owned)?;
            return Ok(ExportOutcome::Custom);
        }
        let path = export_to_path(
            &self.config.export_dir,
            &self.config.export_file_name,
            &self.filtered,
            &columns,
        )?;
        Ok(ExportOutcome::Written(path))
    }

    /// The filtered rows as CSV text.
    pub fn export_csv(&self) -> Result<String, ExportError> {
        to_csv_string(&self.filtered, &self.state.visible_columns())
    }
}
