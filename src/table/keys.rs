//! Key bindings for the table component.
//!
//! - **Rows**: `↑/k`, `↓/j`, `enter` activates the row under the cursor
//! - **Pages**: `pgup/[`, `pgdn/]`, `home`, `end`
//! - **Columns**: `←/h`, `→/l` focus a column; `s` sorts it; `x` hides it
//! - **Reordering**: `m` picks the focused column up, `</>` move it,
//!   `enter` drops it and `esc` puts it back
//! - **Selection**: `space` toggles the row, `a` toggles every visible row,
//!   `1`-`9` run bulk actions
//! - **Search**: `/` edits the search term, `ctrl+l` clears it
//! - **Layout**: `c` opens the column menu, `R` restores defaults, `e` exports

use crate::key::{self, KeyMap as KeyMapTrait};
use crossterm::event::KeyCode;

/// Key bindings for table navigation and actions.
#[derive(Debug, Clone)]
pub struct TableKeyMap {
    /// Cursor to the previous row.
    pub row_up: key::Binding,
    /// Cursor to the next row.
    pub row_down: key::Binding,
    /// Activates the row under the cursor.
    pub activate: key::Binding,
    /// Previous page.
    pub prev_page: key::Binding,
    /// Next page.
    pub next_page: key::Binding,
    /// First page.
    pub first_page: key::Binding,
    /// Last page.
    pub last_page: key::Binding,
    /// Focuses the column to the left.
    pub column_left: key::Binding,
    /// Focuses the column to the right.
    pub column_right: key::Binding,
    /// Cycles the sort of the focused column.
    pub sort: key::Binding,
    /// Hides the focused column.
    pub hide_column: key::Binding,
    /// Picks up the focused column for reordering.
    pub pick_up: key::Binding,
    /// Moves the picked-up column left.
    pub move_left: key::Binding,
    /// Moves the picked-up column right.
    pub move_right: key::Binding,
    /// Drops the picked-up column.
    pub drop: key::Binding,
    /// Puts the picked-up column back.
    pub cancel_move: key::Binding,
    /// Toggles selection of the row under the cursor.
    pub toggle_row: key::Binding,
    /// Toggles selection of every visible row.
    pub toggle_all: key::Binding,
    /// Runs a bulk action by number.
    pub bulk_action: key::Binding,
    /// Starts editing the search term.
    pub search: key::Binding,
    /// Stops editing the search term.
    pub search_done: key::Binding,
    /// Clears the search.
    pub clear_search: key::Binding,
    /// Opens the column visibility menu.
    pub column_menu: key::Binding,
    /// Restores the default column layout.
    pub reset_layout: key::Binding,
    /// Exports the filtered rows.
    pub export: key::Binding,
}

impl Default for TableKeyMap {
    fn default() -> Self {
        Self {
            row_up: key::new_binding(vec![
                key::with_keys_str(&["up", "k"]),
                key::with_help("↑/k", "up"),
            ]),
            row_down: key::new_binding(vec![
                key::with_keys_str(&["down", "j"]),
                key::with_help("↓/j", "down"),
            ]),
            activate: key::new_binding(vec![
                key::with_keys_str(&["enter"]),
                key::with_help("enter", "open"),
            ]),
            prev_page: key::new_binding(vec![
                key::with_keys_str(&["pgup", "["]),
                key::with_help("pgup/[", "prev page"),
            ]),
            next_page: key::new_binding(vec![
                key::with_keys_str(&["pgdown", "]"]),
                key::with_help("pgdn/]", "next page"),
            ]),
            first_page: key::new_binding(vec![
                key::with_keys_str(&["home"]),
                key::with_help("home", "first page"),
            ]),
            last_page: key::new_binding(vec![
                key::with_keys_str(&["end"]),
                key::with_help("end", "last page"),
            ]),
            column_left: key::new_binding(vec![
                key::with_keys_str(&["left", "h"]),
                key::with_help("←/h", "prev column"),
            ]),
            column_right: key::new_binding(vec![
                key::with_keys_str(&["right", "l"]),
                key::with_help("→/l", "next column"),
            ]),
            sort: key::new_binding(vec![
                key::with_keys_str(&["s"]),
                key::with_help("s", "sort"),
            ]),
            hide_column: key::new_binding(vec![
                key::with_keys_str(&["x"]),
                key::with_help("x", "hide column"),
            ]),
            pick_up: key::new_binding(vec![
                key::with_keys_str(&["m"]),
                key::with_help("m", "move column"),
            ]),
            move_left: key::new_binding(vec![
                key::with_keys_str(&["<", "shift+left"]),
                key::with_help("<", "move left"),
            ]),
            move_right: key::new_binding(vec![
                key::with_keys_str(&[">", "shift+right"]),
                key::with_help(">", "move right"),
            ]),
            drop: key::new_binding(vec![
                key::with_keys_str(&["enter", "m"]),
                key::with_help("enter", "drop column"),
            ]),
            cancel_move: key::new_binding(vec![
                key::with_keys_str(&["esc"]),
                key::with_help("esc", "cancel move"),
            ]),
            toggle_row: key::new_binding(vec![
                key::with_keys_str(&[" "]),
                key::with_help("space", "select"),
            ]),
            toggle_all: key::new_binding(vec![
                key::with_keys_str(&["a"]),
                key::with_help("a", "select all"),
            ]),
            bulk_action: key::new_binding(vec![
                key::with_keys(
                    ('1'..='9').map(|c| KeyCode::Char(c).into()).collect(),
                ),
                key::with_help("1-9", "bulk action"),
            ]),
            search: key::new_binding(vec![
                key::with_keys_str(&["/"]),
                key::with_help("/", "search"),
            ]),
            search_done: key::new_binding(vec![
                key::with_keys_str(&["enter", "esc"]),
                key::with_help("enter", "done"),
            ]),
            clear_search: key::new_binding(vec![
                key::with_keys_str(&["ctrl+l"]),
                key::with_help("ctrl+l", "clear search"),
            ]),
            column_menu: key::new_binding(vec![
                key::with_keys_str(&["c"]),
                key::with_help("c", "columns"),
            ]),
            reset_layout: key::new_binding(vec![
                key::with_keys_str(&["R"]),
                key::with_help("R", "reset layout"),
            ]),
            export: key::new_binding(vec![
                key::with_keys_str(&["e"]),
                key::with_help("e", "export"),
            ]),
        }
    }
}

impl KeyMapTrait for TableKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![
            &self.row_up,
            &self.row_down,
            &self.sort,
            &self.search,
            &self.column_menu,
        ]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![
            vec![
                &self.row_up,
                &self.row_down,
                &self.activate,
                &self.prev_page,
                &self.next_page,
                &self.first_page,
                &self.last_page,
            ],
            vec![
                &self.column_left,
                &self.column_right,
                &self.sort,
                &self.hide_column,
                &self.pick_up,
                &self.move_left,
                &self.move_right,
            ],
            vec![
                &self.toggle_row,
                &self.toggle_all,
                &self.bulk_action,
                &self.search,
                &self.clear_search,
            ],
            vec![&self.column_menu, &self.reset_layout, &self.export],
        ]
    }
}
