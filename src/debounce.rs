//! Debouncing of text input.
//!
//! Every pushed value schedules a tick for the end of the quiet window and
//! bumps the debouncer's tag. When a tick arrives, only the one carrying the
//! latest tag is accepted, so a burst of keystrokes inside the window yields
//! exactly one settled value.
//!
//! ```rust
//! use bubbletea_datatable::debounce::Debouncer;
//! use std::time::Duration;
//!
//! let mut debouncer = Debouncer::new(Duration::from_millis(100));
//! let _cmd = debouncer.push("a");
//! let _cmd = debouncer.push("ab");
//! let settled = debouncer.pending_msg().unwrap();
//! assert_eq!(debouncer.update(&(Box::new(settled) as bubbletea_rs::Msg)), Some("ab".to_string()));
//! ```

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Message delivered when a debounce window ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebounceMsg {
    id: i64,
    tag: u64,
    /// The value pushed when the window started.
    pub value: String,
}

impl DebounceMsg {
    /// The debouncer this message belongs to.
    pub fn id(&self) -> i64 {
        self.id
    }
}

/// Collapses bursts of values into one after a quiet window.
#[derive(Debug, Clone)]
pub struct Debouncer {
    id: i64,
    tag: u64,
    window: Duration,
    pending: Option<String>,
}

impl Debouncer {
    /// Creates a debouncer with the given quiet window.
    pub fn new(window: Duration) -> Self {
        Self {
            id: next_id(),
            tag: 0,
            window,
            pending: None,
        }
    }

    /// Unique id used to route messages.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The quiet window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Changes the quiet window for subsequent pushes.
    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }

    /// Returns true while a value is waiting for its window to end.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Records a new value and schedules the end of its window.
    pub fn push(&mut self, value: impl Into<String>) -> Cmd {
        let value = value.into();
        self.tag += 1;
        self.pending = Some(value.clone());

        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.window, move |_| {
            Box::new(DebounceMsg {
                id,
                tag,
                value: value.clone(),
            }) as Msg
        })
    }

    /// The message the latest scheduled tick will deliver, if any.
    pub fn pending_msg(&self) -> Option<DebounceMsg> {
        self.pending.as_ref().map(|value| DebounceMsg {
            id: self.id,
            tag: self.tag,
            value: value.clone(),
        })
    }

    /// Drops the pending value; ticks already scheduled will be ignored.
    pub fn cancel(&mut self) {
        self.tag += 1;
        self.pending = None;
    }

    /// Accepts a tick message, returning the settled value.
    ///
    /// Messages for other debouncers and stale ticks return `None`.
    pub fn update(&mut self, msg: &Msg) -> Option<String> {
        let tick = msg.downcast_ref::<DebounceMsg>()?;
        self.accept(tick)
    }

    pub(crate) fn accept(&mut self, tick: &DebounceMsg) -> Option<String> {
        if tick.id != self.id || tick.tag != self.tag {
            return None;
        }
        self.pending.take()
    }
}
