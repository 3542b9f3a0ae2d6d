//! Column visibility menu.
//!
//! Lists ungrouped columns first, then each group with a tri-state header,
//! and a reset entry at the bottom. Toggles go through [`TableState`], which
//! refuses to hide the last visible column; entries whose toggle would be
//! refused are reported as disabled so the menu can render them inert.

use crate::key::{self, KeyMap as KeyMapTrait};
use crate::row::TableRow;
use crate::state::TableState;
use bubbletea_rs::{KeyMsg, Msg};
use lipgloss_extras::prelude::*;

/// Visibility of a group's members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupState {
    /// Every member is visible.
    All,
    /// Some but not all members are visible.
    Some,
    /// No member is visible.
    None,
}

impl GroupState {
    /// Checkbox glyph: `[x]`, `[-]` or `[ ]`.
    pub fn checkbox(self) -> &'static str {
        match self {
            GroupState::All => "[x]",
            GroupState::Some => "[-]",
            GroupState::None => "[ ]",
        }
    }
}

/// Tri-state of `group`. A group with no members reports [`GroupState::None`].
pub fn group_state<T: TableRow>(state: &TableState<T>, group: &str) -> GroupState {
    let members = state.registry().group_members(group);
    let visible = members.iter().filter(|k| state.is_visible(k)).count();
    if members.is_empty() || visible == 0 {
        GroupState::None
    } else if visible == members.len() {
        GroupState::All
    } else {
        GroupState::Some
    }
}

/// Toggles one column. Returns false if the toggle was refused.
pub fn toggle_column<T: TableRow>(state: &mut TableState<T>, key: &str) -> bool {
    state.toggle_column_visibility(key)
}

/// Toggles a whole group: a fully visible group is hidden, anything else is
/// made fully visible. Refused if hiding would leave no visible column.
pub fn toggle_group<T: TableRow>(state: &mut TableState<T>, group: &str) -> bool {
    let members = state.registry().group_members(group);
    if members.is_empty() {
        return false;
    }
    let show = group_state(state, group) != GroupState::All;
    state.set_columns_visible(&members, show)
}

/// One row of the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    /// A single column checkbox.
    Column {
        /// Column key.
        key: String,
        /// Column label.
        label: String,
        /// Whether the column is shown.
        visible: bool,
        /// Set when toggling would be refused.
        disabled: bool,
        /// Group the column belongs to.
        group: Option<String>,
    },
    /// A group header checkbox.
    Group {
        /// Group name.
        name: String,
        /// Tri-state of the members.
        state: GroupState,
        /// Set when toggling would be refused.
        disabled: bool,
    },
    /// Restore default layout.
    Reset,
}

impl MenuItem {
    /// Returns true for entries the user cannot toggle.
    pub fn is_disabled(&self) -> bool {
        match self {
            MenuItem::Column { disabled, .. } | MenuItem::Group { disabled, .. } => *disabled,
            MenuItem::Reset => false,
        }
    }
}

/// Menu rows for the current state: ungrouped columns, then groups with
/// their members, then reset.
pub fn menu_items<T: TableRow>(state: &TableState<T>) -> Vec<MenuItem> {
    let only_one_visible = state.visible_count() <= 1;
    let column_item = |key: &str| -> Option<MenuItem> {
        let c = state.registry().get(key)?;
        let visible = state.is_visible(key);
        Some(MenuItem::Column {
            key: c.key.clone(),
            label: c.label.clone(),
            visible,
            disabled: visible && (!c.hideable || only_one_visible),
            group: c.group.clone(),
        })
    };

    let mut items: Vec<MenuItem> = state
        .registry()
        .columns()
        .iter()
        .filter(|c| c.group.is_none())
        .filter_map(|c| column_item(&c.key))
        .collect();

    for group in state.registry().groups() {
        let members = state.registry().group_members(&group);
        let tri = group_state(state, &group);
        let disabled = !state.can_set_columns_visible(&members, tri != GroupState::All);
        items.push(MenuItem::Group {
            name: group.clone(),
            state: tri,
            disabled,
        });
        items.extend(members.iter().filter_map(|k| column_item(k)));
    }

    items.push(MenuItem::Reset);
    items
}

/// Key bindings for the menu.
#[derive(Debug, Clone)]
pub struct ColumnMenuKeyMap {
    /// Cursor up.
    pub up: key::Binding,
    /// Cursor down.
    pub down: key::Binding,
    /// Toggle the entry under the cursor.
    pub toggle: key::Binding,
    /// Restore defaults.
    pub reset: key::Binding,
    /// Close the menu.
    pub close: key::Binding,
}

impl Default for ColumnMenuKeyMap {
    fn default() -> Self {
        Self {
            up: key::new_binding(vec![
                key::with_keys_str(&["up", "k"]),
                key::with_help("↑/k", "up"),
            ]),
            down: key::new_binding(vec![
                key::with_keys_str(&["down", "j"]),
                key::with_help("↓/j", "down"),
            ]),
            toggle: key::new_binding(vec![
                key::with_keys_str(&[" ", "enter"]),
                key::with_help("space", "toggle"),
            ]),
            reset: key::new_binding(vec![
                key::with_keys_str(&["r"]),
                key::with_help("r", "reset columns"),
            ]),
            close: key::new_binding(vec![
                key::with_keys_str(&["esc", "c"]),
                key::with_help("esc", "close"),
            ]),
        }
    }
}

impl KeyMapTrait for ColumnMenuKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![&self.toggle, &self.close]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![
            vec![&self.up, &self.down],
            vec![&self.toggle, &self.reset, &self.close],
        ]
    }
}

/// Styles for the menu.
#[derive(Debug, Clone)]
pub struct ColumnMenuStyles {
    /// Entry under the cursor.
    pub cursor: Style,
    /// Group headers.
    pub group: Style,
    /// Entries that cannot be toggled.
    pub disabled: Style,
}

impl Default for ColumnMenuStyles {
    fn default() -> Self {
        Self {
            cursor: Style::new().bold(true).foreground(Color::from("#EE6FF8")),
            group: Style::new().bold(true),
            disabled: Style::new().foreground(Color::from("#626262")),
        }
    }
}

/// Menu state: open flag and cursor.
#[derive(Debug, Clone)]
pub struct ColumnMenu {
    open: bool,
    cursor: usize,
    /// Key bindings.
    pub keymap: ColumnMenuKeyMap,
    /// Styles.
    pub styles: ColumnMenuStyles,
}

impl Default for ColumnMenu {
    fn default() -> Self {
        Self {
            open: false,
            cursor: 0,
            keymap: ColumnMenuKeyMap::default(),
            styles: ColumnMenuStyles::default(),
        }
    }
}

impl ColumnMenu {
    /// Creates a closed menu.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while the menu is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Opens the menu with the cursor at the top.
    pub fn open(&mut self) {
        self.open = true;
        self.cursor = 0;
    }

    /// Closes the menu.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Index of the entry under the cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Activates the entry under the cursor. Returns true if state changed.
    pub fn activate<T: TableRow>(&mut self, state: &mut TableState<T>) -> bool {
        let items = menu_items(state);
        match items.get(self.cursor) {
            Some(MenuItem::Column { key, .. }) => toggle_column(state, key),
            Some(MenuItem::Group { name, .. }) => toggle_group(state, name),
            Some(MenuItem::Reset) => {
                state.reset_to_defaults();
                true
            }
            None => false,
        }
    }

    /// Handles menu keys while open. Returns true if the table state changed.
    pub fn update<T: TableRow>(&mut self, state: &mut TableState<T>, msg: &Msg) -> bool {
        let Some(key_msg) = msg.downcast_ref::<KeyMsg>() else {
            return false;
        };
        self.handle_key(state, key_msg)
    }

    pub(crate) fn handle_key<T: TableRow>(&mut self, state: &mut TableState<T>, key_msg: &KeyMsg) -> bool {
        if !self.open {
            return false;
        }
        let len = menu_items(state).len();
        if self.keymap.up.matches(key_msg) {
            self.cursor = self.cursor.saturating_sub(1);
        } else if self.keymap.down.matches(key_msg) {
            self.cursor = (self.cursor + 1).min(len.saturating_sub(1));
        } else if self.keymap.toggle.matches(key_msg) {
            return self.activate(state);
        } else if self.keymap.reset.matches(key_msg) {
            state.reset_to_defaults();
            return true;
        } else if self.keymap.close.matches(key_msg) {
            self.close();
        }
        false
    }

    /// Renders the menu, or an empty string when closed.
    pub fn view<T: TableRow>(&self, state: &TableState<T>) -> String {
        if !self.open {
            return String::new();
        }
        let mut lines = Vec::new();
        for (i, item) in menu_items(state).iter().enumerate() {
            let text = match item {
                MenuItem::Column { label, visible, group, .. } => {
                    let indent = if group.is_some() { "  " } else { "" };
                    let check = if *visible { "[x]" } else { "[ ]" };
                    format!("{indent}{check} {label}")
                }
                MenuItem::Group { name, state, .. } => {
                    self.styles.group.render(&format!("{} {name}", state.checkbox()))
                }
                MenuItem::Reset => "Reset to defaults".to_string(),
            };
            let pointer = if i == self.cursor { "> " } else { "  " };
            let line = if item.is_disabled() {
                self.styles.disabled.render(&text)
            } else if i == self.cursor {
                self.styles.cursor.render(&text)
            } else {
                text
            };
            lines.push(format!("{pointer}{line}"));
        }
        lines.join("\n")
    }
}
