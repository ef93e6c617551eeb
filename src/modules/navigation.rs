//! Focus-navigation module.
//!
//! Holds named focus targets and builds actions that move focus through an
//! injected `FocusHost` (the DOM or widget tree is a collaborator, not a
//! dependency). Every successful focus is recorded to a bounded history.
//! Visual feedback runs through the injected `Scheduler` so tests stay
//! synchronous; any pending feedback is cancelled on teardown.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use super::{ModuleBase, ShortcutModule};
use crate::config::{ActionFn, ShortcutConfig};

/// Navigation history bound.
const NAV_HISTORY_CAP: usize = 50;

/// Collaborator that can move focus to an element named by a selector.
pub trait FocusHost: Send + Sync {
    /// Focus the element; optionally select its text. Returns whether an
    /// element was found and focused.
    fn focus(&self, selector: &str, select_text: bool) -> bool;

    /// Brief visual highlight of the focused element. Optional.
    fn flash(&self, _selector: &str) {}
}

/// Next-tick scheduling hook for the visual-feedback helper.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, task: Box<dyn FnOnce() + Send>);

    /// Drop anything still pending. Called on module teardown.
    fn cancel_all(&self) {}
}

/// Runs tasks immediately on the calling thread. The default, and what
/// tests use.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineScheduler;

impl Scheduler for InlineScheduler {
    fn schedule(&self, task: Box<dyn FnOnce() + Send>) {
        task();
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FocusOptions {
    pub select_text: bool,
    pub visual_feedback: bool,
}

#[derive(Clone, Debug)]
pub struct FocusTarget {
    pub selector: String,
    pub options: FocusOptions,
}

/// One recorded focus move.
#[derive(Clone, Debug, Serialize)]
pub struct NavRecord {
    pub target: String,
    pub at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct NavigationStats {
    pub total: u64,
    pub per_target: HashMap<String, u64>,
}

pub struct NavigationModule {
    base: ModuleBase,
    targets: HashMap<String, FocusTarget>,
    host: Arc<dyn FocusHost>,
    scheduler: Arc<dyn Scheduler>,
    history: Arc<Mutex<VecDeque<NavRecord>>>,
    total: Arc<Mutex<u64>>,
}

impl NavigationModule {
    pub fn new(host: Arc<dyn FocusHost>) -> Self {
        Self::with_scheduler(host, Arc::new(InlineScheduler))
    }

    pub fn with_scheduler(host: Arc<dyn FocusHost>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            base: ModuleBase::new("navigation"),
            targets: HashMap::new(),
            host,
            scheduler,
            history: Arc::new(Mutex::new(VecDeque::with_capacity(NAV_HISTORY_CAP))),
            total: Arc::new(Mutex::new(0)),
        }
    }

    pub fn add_focus_target(
        &mut self,
        name: impl Into<String>,
        selector: impl Into<String>,
        options: FocusOptions,
    ) {
        self.targets.insert(
            name.into(),
            FocusTarget {
                selector: selector.into(),
                options,
            },
        );
    }

    /// Build an action that focuses the named target, records the move,
    /// and reports success. `None` if the target was never declared.
    pub fn create_focus_action(&self, name: &str) -> Option<ActionFn> {
        let target = self.targets.get(name)?.clone();
        let name = name.to_string();
        let host = self.host.clone();
        let scheduler = self.scheduler.clone();
        let history = self.history.clone();
        let total = self.total.clone();

        Some(Arc::new(move |_event, _contexts| {
            let focused = host.focus(&target.selector, target.options.select_text);
            if focused {
                if let Ok(mut history) = history.lock() {
                    if history.len() >= NAV_HISTORY_CAP {
                        history.pop_front();
                    }
                    history.push_back(NavRecord {
                        target: name.clone(),
                        at: Utc::now(),
                    });
                }
                if let Ok(mut total) = total.lock() {
                    *total += 1;
                }
                if target.options.visual_feedback {
                    let host = host.clone();
                    let selector = target.selector.clone();
                    scheduler.schedule(Box::new(move || host.flash(&selector)));
                }
            } else {
                debug!(target = %name, selector = %target.selector, "focus target not found");
            }
            Ok(focused)
        }))
    }

    pub fn register_shortcut(&mut self, config: ShortcutConfig) {
        self.base.register_shortcut(config);
    }

    /// Total focus count plus per-target frequencies. `total` counts every
    /// recorded move, including ones the bounded history has evicted.
    pub fn navigation_stats(&self) -> NavigationStats {
        let mut per_target: HashMap<String, u64> = HashMap::new();
        if let Ok(history) = self.history.lock() {
            for record in history.iter() {
                *per_target.entry(record.target.clone()).or_default() += 1;
            }
        }
        let total = self.total.lock().map(|t| *t).unwrap_or_default();
        NavigationStats { total, per_target }
    }

    pub fn history(&self) -> Vec<NavRecord> {
        self.history
            .lock()
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl ShortcutModule for NavigationModule {
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
        let stats = self.navigation_stats();
        json!({
            "kind": "navigation",
            "total": stats.total,
            "per_target": stats.per_target,
            "targets": self.targets.len(),
            "shortcuts": self.base.shortcut_count(),
        })
    }
}

impl Drop for NavigationModule {
    fn drop(&mut self) {
        self.scheduler.cancel_all();
    }
}
