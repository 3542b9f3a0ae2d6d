//! Column reordering.
//!
//! Two input adapters drive the same primitive: [`PointerDrag`] follows a
//! press/hover/release gesture, [`KeyboardDrag`] picks a column up and walks
//! it left or right. Both end in [`TableState::reorder_columns`], so a given
//! logical move yields the same order whichever way it was made.

use crate::row::TableRow;
use crate::state::TableState;
use tracing::debug;

/// Key of the row-selection pseudo-column.
pub const SELECT_COLUMN_KEY: &str = "__select";
/// Key of the row-actions pseudo-column.
pub const ACTIONS_COLUMN_KEY: &str = "__actions";

/// Removes `moved` from `order` and reinserts it at the index `target` held
/// before the removal.
///
/// Returns `None` when either key is missing or both are the same.
pub fn move_key(order: &[String], moved: &str, target: &str) -> Option<Vec<String>> {
    if moved == target {
        return None;
    }
    let from = order.iter().position(|k| k == moved)?;
    let to = order.iter().position(|k| k == target)?;

    let mut next = order.to_vec();
    let key = next.remove(from);
    next.insert(to, key);
    Some(next)
}

/// Visible draggable column keys in display order.
pub fn draggable_keys<T: TableRow>(state: &TableState<T>) -> Vec<String> {
    state
        .visible_columns()
        .into_iter()
        .filter(|c| c.draggable && !is_pseudo_column(&c.key))
        .map(|c| c.key.clone())
        .collect()
}

fn is_pseudo_column(key: &str) -> bool {
    key == SELECT_COLUMN_KEY || key == ACTIONS_COLUMN_KEY
}

fn can_drag<T: TableRow>(state: &TableState<T>, key: &str) -> bool {
    draggable_keys(state).iter().any(|k| k == key)
}

/// Pointer gesture adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointerDrag {
    active: Option<String>,
    over: Option<String>,
}

impl PointerDrag {
    /// Creates an idle adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Key being dragged.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Key currently hovered.
    pub fn over(&self) -> Option<&str> {
        self.over.as_deref()
    }

    /// Press on a header. Returns false if the column cannot be dragged.
    pub fn begin<T: TableRow>(&mut self, state: &TableState<T>, key: &str) -> bool {
        if !can_drag(state, key) {
            return false;
        }
        self.active = Some(key.to_string());
        self.over = None;
        true
    }

    /// Pointer moved over a header. Non-draggable targets are ignored.
    pub fn hover<T: TableRow>(&mut self, state: &TableState<T>, key: &str) {
        if self.active.is_some() && can_drag(state, key) {
            self.over = Some(key.to_string());
        }
    }

    /// Release. Applies the move if there is a target.
    pub fn release<T: TableRow>(&mut self, state: &mut TableState<T>) -> bool {
        let active = self.active.take();
        let over = self.over.take();
        match (active, over) {
            (Some(moved), Some(target)) => state.reorder_columns(&moved, &target),
            _ => false,
        }
    }

    /// Abandons the gesture.
    pub fn cancel(&mut self) {
        self.active = None;
        self.over = None;
    }
}

/// Keyboard adapter: pick up, move left/right, drop or cancel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardDrag {
    active: Option<String>,
    target: Option<String>,
}

impl KeyboardDrag {
    /// Creates an idle adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while a column is picked up.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Key picked up.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Key the picked-up column would land on.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Picks up `key`. Returns false if the column cannot be dragged.
    pub fn pick_up<T: TableRow>(&mut self, state: &TableState<T>, key: &str) -> bool {
        if !can_drag(state, key) {
            return false;
        }
        debug!(column = %key, "column picked up");
        self.active = Some(key.to_string());
        self.target = Some(key.to_string());
        true
    }

    /// Moves the landing spot one draggable column to the left.
    pub fn move_left<T: TableRow>(&mut self, state: &TableState<T>) -> bool {
        self.step(state, -1)
    }

    /// Moves the landing spot one draggable column to the right.
    pub fn move_right<T: TableRow>(&mut self, state: &TableState<T>) -> bool {
        self.step(state, 1)
    }

    fn step<T: TableRow>(&mut self, state: &TableState<T>, delta: isize) -> bool {
        let Some(target) = self.target.as_deref() else {
            return false;
        };
        let keys = draggable_keys(state);
        let Some(pos) = keys.iter().position(|k| k == target) else {
            return false;
        };
        let next = pos as isize + delta;
        if next < 0 || next as usize >= keys.len() {
            return false;
        }
        self.target = Some(keys[next as usize].clone());
        true
    }

    /// The order that dropping now would produce.
    pub fn preview<T: TableRow>(&self, state: &TableState<T>) -> Vec<String> {
        match (&self.active, &self.target) {
            (Some(moved), Some(target)) => move_key(state.column_order(), moved, target)
                .unwrap_or_else(|| state.column_order().to_vec()),
            _ => state.column_order().to_vec(),
        }
    }

    /// Drops the column at the current landing spot.
    pub fn place<T: TableRow>(&mut self, state: &mut TableState<T>) -> bool {
        let active = self.active.take();
        let target = self.target.take();
        match (active, target) {
            (Some(moved), Some(target)) if moved != target => {
                state.reorder_columns(&moved, &target)
            }
            _ => false,
        }
    }

    /// Puts the column back without moving it.
    pub fn cancel(&mut self) {
        self.active = None;
        self.target = None;
    }
}
