#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/bubbletea-datatable/")]

//! # bubbletea-datatable
//!
//! A data table engine for [bubbletea-rs](https://github.com/joshka/bubbletea-rs)
//! applications: sorting, debounced client- or server-side search,
//! pagination, row selection with bulk actions, CSV export, and a column
//! layout (visibility and order) that survives restarts.
//!
//! ## Overview
//!
//! The crate is layered so each piece can be used on its own:
//!
//! - [`ColumnRegistry`] holds the column descriptors
//! - [`TableState`] composes visibility, order and sort over a dataset and
//!   persists the layout through a [`LayoutStore`](storage::LayoutStore)
//! - [`search`], [`paginator`] and [`selection`] each own one stage of the
//!   row pipeline
//! - [`reorder`] and [`column_menu`] change the layout from user input
//! - [`Table`] wires everything into a component following the Elm
//!   Architecture, with `update()` and `view()`
//!
//! ## Rows
//!
//! Any `Clone` type can be shown by implementing [`TableRow`]. JSON objects
//! (`serde_json::Value`) work out of the box:
//!
//! ```rust
//! use bubbletea_datatable::prelude::*;
//! use serde_json::json;
//!
//! let mut table = Table::with_config(
//!     vec![
//!         ColumnDescriptor::new("name", "Name"),
//!         ColumnDescriptor::new("region", "Region").group("Location"),
//!     ],
//!     vec![
//!         json!({"id": "a", "name": "gateway", "region": "eu-west"}),
//!         json!({"id": "b", "name": "billing", "region": "us-east"}),
//!     ],
//!     TableConfig::new().with_selectable(true),
//! );
//!
//! table.set_search_term("bill");
//! assert_eq!(table.filtered_rows().len(), 1);
//! ```
//!
//! ## Integration with bubbletea-rs
//!
//! ```rust
//! use bubbletea_datatable::prelude::*;
//! use bubbletea_rs::{Cmd, Model, Msg};
//! use serde_json::{json, Value};
//!
//! struct App {
//!     table: Table<Value>,
//! }
//!
//! impl Model for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut table = Table::new(
//!             vec![ColumnDescriptor::new("name", "Name")],
//!             vec![json!({"id": 1, "name": "gateway"})],
//!         );
//!         let cmd = table.focus();
//!         (Self { table }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         self.table.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.table.view()
//!     }
//! }
//! ```

pub mod column;
pub mod column_menu;
pub mod debounce;
pub mod error;
pub mod export;
pub mod key;
pub mod paginator;
pub mod reorder;
pub mod row;
pub mod search;
pub mod selection;
pub mod sort;
pub mod state;
pub mod storage;
pub mod table;

use bubbletea_rs::Cmd;

/// Core trait for components that support focus management.
///
/// A focused component receives keyboard input; a blurred one ignores keys
/// but still handles other messages such as debounce ticks and search
/// results.
///
/// ```rust
/// use bubbletea_datatable::prelude::*;
/// use serde_json::Value;
///
/// let mut table: Table<Value> = Table::new(vec![ColumnDescriptor::new("name", "Name")], vec![]);
/// assert!(!table.focused());
///
/// table.focus();
/// assert!(table.focused());
///
/// table.blur();
/// assert!(!table.focused());
/// ```
pub trait Component {
    /// Sets the component to focused state.
    ///
    /// May return a command for initialization work.
    fn focus(&mut self) -> Option<Cmd>;

    /// Sets the component to blurred state and abandons any in-progress
    /// keyboard interaction.
    fn blur(&mut self);

    /// Returns the current focus state of the component.
    fn focused(&self) -> bool;
}

pub use column::{ColumnDescriptor, ColumnRegistry};
pub use column_menu::{ColumnMenu, GroupState, MenuItem};
pub use debounce::{DebounceMsg, Debouncer};
pub use error::{ConfigError, ExportError, StorageError, StorageResult};
pub use key::{new_binding, with_disabled, with_help, with_keys, Binding, KeyMap, KeyPress};
pub use paginator::{Model as Paginator, PageItem};
pub use reorder::{KeyboardDrag, PointerDrag};
pub use row::{CellValue, TableRow};
pub use search::{MatchMode, SearchMode, SearchToken};
pub use selection::Selection;
pub use sort::{MixedTypeOrder, SortDirection, SortState};
pub use state::{StateChange, SubscriptionId, TableState};
pub use storage::{FileStore, LayoutPersistence, LayoutStore, MemoryStore};
pub use table::{
    BulkAction, ExportOutcome, Model as Table, SearchResultsMsg, TableConfig, TableKeyMap,
    TableStyles,
};

/// Prelude module for convenient imports.
///
/// ```rust
/// use bubbletea_datatable::prelude::*;
/// ```
pub mod prelude {
    pub use crate::column::{ColumnDescriptor, ColumnRegistry};
    pub use crate::key::{Binding, KeyMap, KeyPress};
    pub use crate::paginator::PageItem;
    pub use crate::row::{CellValue, TableRow};
    pub use crate::search::{MatchMode, SearchToken};
    pub use crate::sort::{MixedTypeOrder, SortDirection, SortState};
    pub use crate::state::TableState;
    pub use crate::storage::{FileStore, LayoutStore, MemoryStore};
    pub use crate::table::{
        BulkAction, ExportOutcome, Model as Table, SearchResultsMsg, TableConfig,
    };
    pub use crate::Component;
}
