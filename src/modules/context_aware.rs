//! Context-aware action selection.
//!
//! Builds actions that branch on the active contexts: the most specific
//! branch present wins, falling back to `global`, then to a no-op that
//! reports false. Choices are recorded to a bounded learning log that is
//! advisory only; it never influences dispatch.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use super::{ModuleBase, ShortcutModule};
use crate::config::{ActionFn, ShortcutConfig};
use crate::context::Context;

/// Learning log bound.
const LEARNING_LOG_CAP: usize = 200;

/// One recorded branch choice.
#[derive(Clone, Debug, Serialize)]
pub struct ContextChoice {
    pub contexts: Vec<Context>,
    pub branch: String,
    pub at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ContextStats {
    pub total: u64,
    pub per_branch: HashMap<String, u64>,
}

pub struct ContextAwareModule {
    base: ModuleBase,
    log: Arc<Mutex<VecDeque<ContextChoice>>>,
    total: Arc<Mutex<u64>>,
}

impl Default for ContextAwareModule {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextAwareModule {
    pub fn new() -> Self {
        Self {
            base: ModuleBase::new("context-aware"),
            log: Arc::new(Mutex::new(VecDeque::with_capacity(LEARNING_LOG_CAP))),
            total: Arc::new(Mutex::new(0)),
        }
    }

    /// Build an action that runs the branch for the most specific active
    /// context. The dispatcher hands actions the active contexts ordered
    /// most specific first with `global` appended, so the first branch hit
    /// is the right one.
    pub fn create_context_aware_action(
        &self,
        branches: HashMap<Context, ActionFn>,
    ) -> ActionFn {
        let log = self.log.clone();
        let total = self.total.clone();

        Arc::new(move |event, contexts| {
            let chosen = contexts
                .iter()
                .find(|ctx| branches.contains_key(ctx))
                .copied()
                .or_else(|| {
                    branches
                        .contains_key(&Context::Global)
                        .then_some(Context::Global)
                });

            let branch_name = chosen.map(|c| c.as_str()).unwrap_or("noop");
            if let Ok(mut log) = log.lock() {
                if log.len() >= LEARNING_LOG_CAP {
                    log.pop_front();
                }
                log.push_back(ContextChoice {
                    contexts: contexts.to_vec(),
                    branch: branch_name.to_string(),
                    at: Utc::now(),
                });
            }
            if let Ok(mut total) = total.lock() {
                *total += 1;
            }

            match chosen.and_then(|ctx| branches.get(&ctx)) {
                Some(branch) => branch(event, contexts),
                None => Ok(false),
            }
        })
    }

    pub fn register_shortcut(&mut self, config: ShortcutConfig) {
        self.base.register_shortcut(config);
    }

    /// Branch-choice frequencies. `total` counts every invocation, even
    /// ones the bounded log has evicted.
    pub fn context_stats(&self) -> ContextStats {
        let mut per_branch: HashMap<String, u64> = HashMap::new();
        if let Ok(log) = self.log.lock() {
            for choice in log.iter() {
                *per_branch.entry(choice.branch.clone()).or_default() += 1;
            }
        }
        let total = self.total.lock().map(|t| *t).unwrap_or_default();
        ContextStats { total, per_branch }
    }

    pub fn learning_log(&self) -> Vec<ContextChoice> {
        self.log
            .lock()
            .map(|l| l.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl ShortcutModule for ContextAwareModule {
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
        let stats = self.context_stats();
        json!({
            "kind": "context-aware",
            "total": stats.total,
            "per_branch": stats.per_branch,
            "shortcuts": self.base.shortcut_count(),
        })
    }
}
