//! Pluggable shortcut modules.
//!
//! A module is a named group of shortcuts with shared lifecycle plus
//! domain-specific helpers: focus navigation, undoable actions, and
//! context-aware branching. `ModuleManager` aggregates shortcuts from
//! enabled modules and applies registered plugins to each config.

mod action;
mod context_aware;
mod manager;
mod navigation;

pub use action::{ActionModule, ActionModuleStats, DoFn, UndoFn, UndoHandle};
pub use context_aware::{ContextAwareModule, ContextChoice, ContextStats};
pub use manager::{ModuleManager, PluginFn};
pub use navigation::{
    FocusHost, FocusOptions, FocusTarget, InlineScheduler, NavRecord, NavigationModule,
    NavigationStats, Scheduler,
};

use std::collections::HashMap;

use crate::config::ShortcutConfig;
use crate::key::Fingerprint;

/// Shared module contract. Shortcuts returned by `all_shortcuts` are
/// stamped with the owning module's name and current enabled flag.
pub trait ShortcutModule: Send + Sync {
    fn name(&self) -> &str;
    fn enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);
    fn all_shortcuts(&self) -> Vec<ShortcutConfig>;
    fn stats(&self) -> serde_json::Value;
}

/// Common state every module embeds: explicit name, enabled flag, and the
/// module's shortcut table keyed by fingerprint with stable order.
pub struct ModuleBase {
    name: String,
    enabled: bool,
    shortcuts: Vec<ShortcutConfig>,
    index: HashMap<Fingerprint, usize>,
}

impl ModuleBase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            shortcuts: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Add a shortcut to the module's table. A config with the same
    /// fingerprint replaces the previous one in place.
    pub fn register_shortcut(&mut self, config: ShortcutConfig) {
        let fingerprint = config.fingerprint();
        match self.index.get(&fingerprint) {
            Some(&idx) => self.shortcuts[idx] = config,
            None => {
                self.index.insert(fingerprint, self.shortcuts.len());
                self.shortcuts.push(config);
            }
        }
    }

    /// The module's shortcuts, stamped with owner name and enabled flag.
    pub fn stamped_shortcuts(&self) -> Vec<ShortcutConfig> {
        self.shortcuts
            .iter()
            .map(|config| {
                let mut config = config.clone();
                config.module = Some(self.name.clone());
                config.module_enabled = self.enabled;
                config
            })
            .collect()
    }

    pub fn shortcut_count(&self) -> usize {
        self.shortcuts.len()
    }
}
