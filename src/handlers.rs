//! Typed handler slots for the default todo shortcut table.
//!
//! The application wires one callback per verb; the core only ever calls
//! into these slots, never the other way around, which keeps the
//! core-to-application dependency one-way.

use std::sync::Arc;

/// One application verb. Returns whether the verb did anything.
pub type HandlerFn = Arc<dyn Fn() -> bool + Send + Sync>;

/// The full slot record consumed by `catalog::default_shortcuts`.
#[derive(Clone)]
pub struct TodoHandlers {
    pub focus_new_todo: HandlerFn,
    pub focus_search: HandlerFn,
    pub add_todo: HandlerFn,
    pub toggle_first_todo: HandlerFn,
    pub delete_first_todo: HandlerFn,
    pub cancel_edit: HandlerFn,
    pub save_edit: HandlerFn,
    pub show_help: HandlerFn,
    pub toggle_theme: HandlerFn,
    pub select_all: HandlerFn,
    pub clear_completed: HandlerFn,
}

impl TodoHandlers {
    /// All slots wired to a no-op returning false. Useful as a base for
    /// tests and for hosts that fill slots incrementally.
    pub fn noop() -> Self {
        fn slot() -> HandlerFn {
            Arc::new(|| false)
        }
        Self {
            focus_new_todo: slot(),
            focus_search: slot(),
            add_todo: slot(),
            toggle_first_todo: slot(),
            delete_first_todo: slot(),
            cancel_edit: slot(),
            save_edit: slot(),
            show_help: slot(),
            toggle_theme: slot(),
            select_all: slot(),
            clear_completed: slot(),
        }
    }
}

impl std::fmt::Debug for TodoHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TodoHandlers { .. }")
    }
}
