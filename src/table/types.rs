//! Configuration, callbacks and messages of the table component.

use crate::column::ColumnDescriptor;
use crate::error::ExportError;
use crate::paginator::DEFAULT_PAGE_SIZE;
use crate::search::{MatchMode, SearchToken};
use crate::sort::MixedTypeOrder;
use crate::storage::{LayoutPersistence, LayoutStore};
use bubbletea_rs::Cmd;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Quiet window before a client-side search term is applied.
pub const DEFAULT_CLIENT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Quiet window before a term is forwarded to a server-side search handler.
pub const DEFAULT_SERVER_DEBOUNCE: Duration = Duration::from_millis(500);

/// Default message shown when there are no rows.
pub const DEFAULT_EMPTY_MESSAGE: &str = "No data available";

/// Default message shown while loading.
pub const DEFAULT_LOADING_MESSAGE: &str = "Loading...";

/// Default cap on rendered cell width, in terminal columns.
pub const DEFAULT_MAX_CELL_WIDTH: usize = 30;

/// Extracts a row's identity.
pub type ItemIdFn<T> = Box<dyn Fn(&T) -> String + Send + Sync>;

/// Decides whether a row is disabled for selection.
pub type RowPredicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Receives a committed search term in server-delegated mode.
///
/// The returned command, if any, should eventually deliver a
/// [`SearchResultsMsg`] carrying the same token.
pub type SearchHandler = Box<dyn FnMut(&str, SearchToken) -> Option<Cmd> + Send>;

/// Called when a row is activated.
pub type RowCallback<T> = Box<dyn FnMut(&T) + Send>;

/// Renders one cell.
pub type CellRenderer<T> = Box<dyn Fn(&T, &str) -> String + Send + Sync>;

/// Renders every cell of a row at once, keyed by column.
pub type RowRenderer<T> = Box<dyn Fn(&T) -> HashMap<String, String> + Send + Sync>;

/// Renders the actions cell of a row.
pub type ActionsRenderer<T> = Box<dyn Fn(&T) -> String + Send + Sync>;

/// Replaces the default CSV export.
pub type Exporter<T> =
    Box<dyn Fn(&[T], &[ColumnDescriptor]) -> Result<(), ExportError> + Send + Sync>;

/// An action applied to the selected rows.
pub struct BulkAction<T> {
    /// Button label.
    pub label: String,
    pub(crate) on_click: Box<dyn FnMut(&[T]) + Send>,
}

impl<T> BulkAction<T> {
    /// Creates a bulk action.
    pub fn new<F>(label: impl Into<String>, on_click: F) -> Self
    where
        F: FnMut(&[T]) + Send + 'static,
    {
        Self {
            label: label.into(),
            on_click: Box::new(on_click),
        }
    }
}

impl<T> std::fmt::Debug for BulkAction<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulkAction")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Plain configuration of a table.
///
/// ```rust
/// use bubbletea_datatable::table::TableConfig;
/// use bubbletea_datatable::storage::MemoryStore;
/// use std::sync::Arc;
///
/// assert!(!TableConfig::new().pagination);
///
/// let config = TableConfig::new()
///     .with_storage(Arc::new(MemoryStore::new()), "services")
///     .with_pagination(true)
///     .with_page_size(25)
///     .with_selectable(true);
/// assert_eq!(config.page_size, 25);
/// assert_eq!(config.export_file_name, "table-export");
/// ```
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Layout persistence; `None` keeps the layout in memory only.
    pub persistence: Option<LayoutPersistence>,
    /// Visibility overriding both the stored layout and column defaults.
    pub initial_visibility: Option<HashMap<String, bool>>,
    /// Shows the selection column.
    pub selectable: bool,
    /// Splits rows into pages. Off by default, showing every row.
    pub pagination: bool,
    /// Rows per page.
    pub page_size: usize,
    /// How client-side search matches fields.
    pub match_mode: MatchMode,
    /// Debounce window for client-side search.
    pub client_debounce: Duration,
    /// Debounce window for server-delegated search.
    pub server_debounce: Duration,
    /// Ordering of mixed number/text columns.
    pub mixed_order: MixedTypeOrder,
    /// Enables the export key.
    pub enable_export: bool,
    /// Export file name, without extension. Defaults to `table-export`.
    pub export_file_name: String,
    /// Directory the default exporter writes to.
    pub export_dir: PathBuf,
    /// Shown when there are no rows.
    pub empty_message: String,
    /// Shown while loading.
    pub loading_message: String,
    /// Cells wider than this are truncated.
    pub max_cell_width: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            persistence: None,
            initial_visibility: None,
            selectable: false,
            pagination: false,
            page_size: DEFAULT_PAGE_SIZE,
            match_mode: MatchMode::default(),
            client_debounce: DEFAULT_CLIENT_DEBOUNCE,
            server_debounce: DEFAULT_SERVER_DEBOUNCE,
            mixed_order: MixedTypeOrder::default(),
            enable_export: false,
            export_file_name: crate::export::DEFAULT_EXPORT_FILE_NAME.to_string(),
            export_dir: PathBuf::from("."),
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
            loading_message: DEFAULT_LOADING_MESSAGE.to_string(),
            max_cell_width: DEFAULT_MAX_CELL_WIDTH,
        }
    }
}

impl TableConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Persists the layout in `store` under `storage_key`.
    pub fn with_storage(mut self, store: Arc<dyn LayoutStore>, storage_key: impl Into<String>) -> Self {
        self.persistence = Some(LayoutPersistence::new(store, storage_key));
        self
    }

    /// Explicit initial visibility.
    pub fn with_initial_visibility(mut self, visibility: HashMap<String, bool>) -> Self {
        self.initial_visibility = Some(visibility);
        self
    }

    /// Enables row selection.
    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    /// Enables or disables pagination.
    pub fn with_pagination(mut self, pagination: bool) -> Self {
        self.pagination = pagination;
        self
    }

    /// Rows per page. Zero is treated as one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Client-side match mode.
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    /// Debounce windows for client-side and server-delegated search.
    pub fn with_debounce(mut self, client: Duration, server: Duration) -> Self {
        self.client_debounce = client;
        self.server_debounce = server;
        self
    }

    /// Mixed-type ordering.
    pub fn with_mixed_order(mut self, order: MixedTypeOrder) -> Self {
        self.mixed_order = order;
        self
    }

    /// Enables export to `dir/<file_name>.csv`.
    pub fn with_export(mut self, dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        self.enable_export = true;
        self.export_dir = dir.into();
        self.export_file_name = file_name.into();
        self
    }

    /// Empty-state message.
    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    /// Loading-state message.
    pub fn with_loading_message(mut self, message: impl Into<String>) -> Self {
        self.loading_message = message.into();
        self
    }

    /// Maximum rendered cell width. Zero is treated as one.
    pub fn with_max_cell_width(mut self, width: usize) -> Self {
        self.max_cell_width = width.max(1);
        self
    }
}

/// Results of a server-side search, delivered back to the table.
///
/// Only the results carrying the most recently issued token are applied.
#[derive(Debug, Clone)]
pub struct SearchResultsMsg<T> {
    /// Token handed to the search handler.
    pub token: SearchToken,
    /// Rows matching the term.
    pub rows: Vec<T>,
}

/// Outcome of an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The default exporter wrote this file.
    Written(PathBuf),
    /// A custom exporter handled the rows.
    Custom,
}
