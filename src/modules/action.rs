//! Undoable-action module.
//!
//! Wraps a do/undo pair into an action whose successful runs land on a
//! bounded undo stack. `undo` pops and invokes; `redo` re-applies from a
//! parallel stack that empties whenever a new action runs. Failed runs are
//! counted but never pushed.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use super::{ModuleBase, ShortcutModule};
use crate::config::{ActionFn, ShortcutConfig};

/// Undo stack bound.
const UNDO_STACK_CAP: usize = 25;

/// Forward application of an undoable action.
pub type DoFn = Arc<dyn Fn() -> anyhow::Result<bool> + Send + Sync>;

/// Reverse application. Returns whether anything was undone.
pub type UndoFn = Arc<dyn Fn() -> bool + Send + Sync>;

struct UndoRecord {
    label: String,
    do_fn: DoFn,
    undo_fn: UndoFn,
    at: DateTime<Utc>,
}

#[derive(Default)]
struct UndoState {
    undo: Vec<UndoRecord>,
    redo: Vec<UndoRecord>,
    total: u64,
    successful: u64,
    failed: u64,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ActionModuleStats {
    pub total_actions: u64,
    pub successful_actions: u64,
    pub failed_actions: u64,
    pub undo_depth: usize,
    pub redo_depth: usize,
    pub success_rate: f64,
}

pub struct ActionModule {
    base: ModuleBase,
    state: Arc<Mutex<UndoState>>,
}

impl Default for ActionModule {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionModule {
    pub fn new() -> Self {
        Self {
            base: ModuleBase::new("action"),
            state: Arc::new(Mutex::new(UndoState::default())),
        }
    }

    /// Wrap a do/undo pair. The returned action runs `do_fn`; `Ok(true)`
    /// pushes an undo record (evicting the oldest past the cap) and clears
    /// the redo stack. `Ok(false)` and `Err` count as failures.
    pub fn create_undoable_action(
        &self,
        do_fn: DoFn,
        undo_fn: UndoFn,
        label: impl Into<String>,
    ) -> ActionFn {
        let label = label.into();
        let state = self.state.clone();

        Arc::new(move |_event, _contexts| {
            let result = do_fn();
            if let Ok(mut st) = state.lock() {
                st.total += 1;
                match &result {
                    Ok(true) => {
                        st.successful += 1;
                        if st.undo.len() >= UNDO_STACK_CAP {
                            st.undo.remove(0);
                        }
                        st.undo.push(UndoRecord {
                            label: label.clone(),
                            do_fn: do_fn.clone(),
                            undo_fn: undo_fn.clone(),
                            at: Utc::now(),
                        });
                        st.redo.clear();
                    }
                    _ => st.failed += 1,
                }
            }
            result
        })
    }

    pub fn register_shortcut(&mut self, config: ShortcutConfig) {
        self.base.register_shortcut(config);
    }

    /// A cloneable handle exposing undo/redo after the module is boxed
    /// into a `ModuleManager`.
    pub fn undo_handle(&self) -> UndoHandle {
        UndoHandle {
            state: self.state.clone(),
        }
    }

    pub fn undo(&self) -> bool {
        self.undo_handle().undo()
    }

    pub fn redo(&self) -> bool {
        self.undo_handle().redo()
    }

    pub fn action_stats(&self) -> ActionModuleStats {
        self.undo_handle().stats()
    }
}

impl ShortcutModule for ActionModule {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn enabled(&self) -> bool {
        self.base.enabled()
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.base.set_enabled(enabled);
    }

    fn all_shortcuts(&self) -> Vec<ShortcutConfig> {
        self.base.stamped_shortcuts()
    }

    fn stats(&self) -> serde_json::Value {
        let stats = self.action_stats();
        json!({
            "kind": "action",
            "total_actions": stats.total_actions,
            "successful_actions": stats.successful_actions,
            "failed_actions": stats.failed_actions,
            "undo_depth": stats.undo_depth,
            "redo_depth": stats.redo_depth,
            "success_rate": stats.success_rate,
        })
    }
}

/// Shared view into an `ActionModule`'s undo state.
#[derive(Clone)]
pub struct UndoHandle {
    state: Arc<Mutex<UndoState>>,
}

impl UndoHandle {
    /// Pop and invoke the latest undo. False when the stack is empty.
    pub fn undo(&self) -> bool {
        let record = match self.state.lock() {
            Ok(mut st) => st.undo.pop(),
            Err(_) => None,
        };
        let Some(record) = record else {
            return false;
        };
        let undone = (record.undo_fn)();
        debug!(label = %record.label, recorded_at = %record.at, undone, "undo invoked");
        if let Ok(mut st) = self.state.lock() {
            st.redo.push(record);
        }
        undone
    }

    /// Re-apply the most recently undone action. False when there is
    /// nothing to redo or the re-application did not succeed.
    pub fn redo(&self) -> bool {
        let record = match self.state.lock() {
            Ok(mut st) => st.redo.pop(),
            Err(_) => None,
        };
        let Some(record) = record else {
            return false;
        };
        let redone = matches!((record.do_fn)(), Ok(true));
        debug!(label = %record.label, redone, "redo invoked");
        if redone {
            if let Ok(mut st) = self.state.lock() {
                if st.undo.len() >= UNDO_STACK_CAP {
                    st.undo.remove(0);
                }
                st.undo.push(UndoRecord {
                    at: Utc::now(),
                    ..record
                });
            }
        }
        redone
    }

    pub fn stats(&self) -> ActionModuleStats {
        match self.state.lock() {
            Ok(st) => ActionModuleStats {
                total_actions: st.total,
                successful_actions: st.successful,
                failed_actions: st.failed,
                undo_depth: st.undo.len(),
                redo_depth: st.redo.len(),
                success_rate: if st.total == 0 {
                    0.0
                } else {
                    st.successful as f64 / st.total as f64
                },
            },
            Err(_) => ActionModuleStats::default(),
        }
    }
}
