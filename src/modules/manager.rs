//! Module aggregation and plugin application.
//!
//! Plugins are pure config transformers applied in registration order;
//! order-dependent composition is the caller's responsibility.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::ShortcutModule;
use crate::config::ShortcutConfig;

/// Pure transformation applied to every shortcut config a module exposes.
pub type PluginFn = Arc<dyn Fn(ShortcutConfig) -> ShortcutConfig + Send + Sync>;

#[derive(Default)]
pub struct ModuleManager {
    modules: Vec<Box<dyn ShortcutModule>>,
    index: HashMap<String, usize>,
    plugins: Vec<(String, PluginFn)>,
}

impl ModuleManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module. Rejects a second module with the same name.
    pub fn register_module(&mut self, module: Box<dyn ShortcutModule>) -> bool {
        let name = module.name().to_string();
        if self.index.contains_key(&name) {
            debug!(module = %name, "module name already registered");
            return false;
        }
        self.index.insert(name, self.modules.len());
        self.modules.push(module);
        true
    }

    pub fn module(&self, name: &str) -> Option<&dyn ShortcutModule> {
        self.index
            .get(name)
            .map(|&idx| self.modules[idx].as_ref())
    }

    pub fn module_mut(&mut self, name: &str) -> Option<&mut (dyn ShortcutModule + 'static)> {
        let idx = *self.index.get(name)?;
        Some(self.modules[idx].as_mut())
    }

    pub fn set_module_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.module_mut(name) {
            Some(module) => {
                module.set_enabled(enabled);
                true
            }
            None => false,
        }
    }

    pub fn register_plugin(&mut self, name: impl Into<String>, plugin: PluginFn) {
        self.plugins.push((name.into(), plugin));
    }

    /// Run a config through every plugin, in plugin-registration order.
    pub fn apply_plugins(&self, config: ShortcutConfig) -> ShortcutConfig {
        self.plugins
            .iter()
            .fold(config, |config, (_, plugin)| plugin(config))
    }

    /// Concatenated shortcuts from enabled modules, in module-registration
    /// order, with plugins applied to each config.
    pub fn all_shortcuts(&self) -> Vec<ShortcutConfig> {
        self.modules
            .iter()
            .filter(|module| module.enabled())
            .flat_map(|module| module.all_shortcuts())
            .map(|config| self.apply_plugins(config))
            .collect()
    }

    pub fn all_module_stats(&self) -> HashMap<String, serde_json::Value> {
        self.modules
            .iter()
            .map(|module| (module.name().to_string(), module.stats()))
            .collect()
    }

    pub fn module_names(&self) -> Vec<&str> {
        self.modules.iter().map(|module| module.name()).collect()
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
