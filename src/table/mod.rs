//! Data table component with sorting, search, pagination, selection and a
//! configurable column layout.
//!
//! This module exposes a generic `Model<T: TableRow>` plus its supporting
//! types:
//! - `TableConfig`: plain configuration (storage, page size, debounce windows,
//!   messages, export target)
//! - `TableKeyMap` and `TableStyles`: key bindings and visual styles
//! - `SearchResultsMsg`: results of a server-side search, routed back through
//!   `update`
//!
//! ## Row pipeline
//!
//! Rows flow through three stages, each recomputed whenever its inputs change:
//!
//! 1. **Sort** by the active column, nulls last, stable for equal keys
//! 2. **Search**, either locally against every field of the row or delegated
//!    to a search handler that supplies the matching rows
//! 3. **Paginate** the result, clamping the current page when it shrinks
//!
//! An out-of-band result set set with `set_api_search_results` replaces the
//! first two stages until it is cleared.
//!
//! ## Search
//!
//! Typing into the search box schedules a debounce tick; only the last term
//! typed inside the window is applied. In server mode each forwarded term
//! carries a `SearchToken`, and results for anything but the newest token are
//! discarded.
//!
//! ## Column layout
//!
//! Visibility and order live in the shared [`TableState`](crate::TableState)
//! and are persisted when the configuration names a store. Columns can be
//! hidden from the column menu, moved with `m` and `<`/`>`, or moved through
//! the pointer drag API.
//!
//! ```rust
//! use bubbletea_datatable::table::{Model, TableConfig};
//! use bubbletea_datatable::ColumnDescriptor;
//! use serde_json::json;
//!
//! let columns = vec![
//!     ColumnDescriptor::new("name", "Name"),
//!     ColumnDescriptor::new("age", "Age"),
//! ];
//! let rows = vec![
//!     json!({"id": 1, "name": "Amy", "age": 31}),
//!     json!({"id": 2, "name": "Bob", "age": 25}),
//! ];
//! let mut table = Model::with_config(columns, rows, TableConfig::new());
//! table.handle_sort("age");
//! assert_eq!(table.filtered_rows()[0]["name"], "Bob");
//! ```

pub mod keys;
pub mod style;

mod api;
mod model;
mod rendering;
mod types;

#[cfg(test)]
mod tests;

pub use keys::TableKeyMap;
pub use model::Model;
pub use style::TableStyles;
pub use types::{
    ActionsRenderer, BulkAction, CellRenderer, ExportOutcome, Exporter, ItemIdFn, RowCallback,
    RowPredicate, RowRenderer, SearchHandler, SearchResultsMsg, TableConfig,
    DEFAULT_CLIENT_DEBOUNCE, DEFAULT_EMPTY_MESSAGE, DEFAULT_LOADING_MESSAGE,
    DEFAULT_MAX_CELL_WIDTH, DEFAULT_SERVER_DEBOUNCE,
};
