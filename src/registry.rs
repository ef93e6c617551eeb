//! Shortcut registry: fingerprint-unique storage with stable iteration.
//!
//! Vec storage keeps deterministic insertion order for introspection and
//! tie-breaking; a HashMap gives O(1) fingerprint lookup. Replacement keeps
//! the original insertion sequence so `all()` order never shifts under
//! overwrite.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::{ShortcutConfig, ShortcutInfo};
use crate::context::Context;
use crate::error::RegistrationError;
use crate::key::Fingerprint;

/// One registered shortcut plus its bookkeeping.
#[derive(Clone, Debug)]
pub struct RegistryEntry {
    pub config: ShortcutConfig,
    pub fingerprint: Fingerprint,
    /// Monotonic, assigned at first registration, kept across replacement.
    pub insertion_seq: u64,
    pub enabled: bool,
    pub usage_count: u64,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl RegistryEntry {
    /// Visible to the matcher: the entry and its owning module (if any)
    /// are both enabled. Invisible entries stay listed for introspection.
    pub fn matchable(&self) -> bool {
        self.enabled && self.config.module_enabled
    }

    pub fn info(&self) -> ShortcutInfo {
        self.config.info()
    }
}

/// Outcome status of a registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterStatus {
    Inserted,
    Replaced,
}

pub struct Registry {
    entries: Vec<RegistryEntry>,
    index: HashMap<Fingerprint, usize>,
    next_seq: u64,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Insert a validated config. A duplicate fingerprint is rejected
    /// unless the config allows overwrite, in which case the entry is
    /// replaced in place and keeps its insertion sequence.
    pub fn register(
        &mut self,
        config: ShortcutConfig,
    ) -> Result<(RegisterStatus, Fingerprint), RegistrationError> {
        let fingerprint = config.fingerprint();
        if let Some(&idx) = self.index.get(&fingerprint) {
            if !config.allow_overwrite {
                return Err(RegistrationError::DuplicateFingerprint(
                    fingerprint.canonical(),
                ));
            }
            let entry = &mut self.entries[idx];
            entry.config = config;
            entry.enabled = true;
            debug!(fingerprint = %fingerprint, "shortcut replaced");
            return Ok((RegisterStatus::Replaced, fingerprint));
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.index.insert(fingerprint.clone(), self.entries.len());
        self.entries.push(RegistryEntry {
            config,
            fingerprint: fingerprint.clone(),
            insertion_seq: seq,
            enabled: true,
            usage_count: 0,
            last_used_at: None,
        });
        debug!(fingerprint = %fingerprint, seq, "shortcut registered");
        Ok((RegisterStatus::Inserted, fingerprint))
    }

    pub fn unregister(&mut self, fingerprint: &Fingerprint) -> bool {
        match self.index.remove(fingerprint) {
            Some(idx) => {
                self.entries.remove(idx);
                // Positions after the removed entry shift down by one.
                for (i, entry) in self.entries.iter().enumerate().skip(idx) {
                    self.index.insert(entry.fingerprint.clone(), i);
                }
                debug!(fingerprint = %fingerprint, "shortcut unregistered");
                true
            }
            None => false,
        }
    }

    pub fn lookup(&self, fingerprint: &Fingerprint) -> Option<&RegistryEntry> {
        self.index
            .get(fingerprint)
            .and_then(|&idx| self.entries.get(idx))
    }

    pub fn by_context(&self, context: Context) -> Vec<&RegistryEntry> {
        self.entries
            .iter()
            .filter(|e| e.config.context == context)
            .collect()
    }

    pub fn count_in_context(&self, context: Context) -> usize {
        self.entries
            .iter()
            .filter(|e| e.config.context == context)
            .count()
    }

    /// All entries in first-insertion order, replacement included.
    pub fn all(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn set_enabled(&mut self, fingerprint: &Fingerprint, enabled: bool) -> bool {
        match self.index.get(fingerprint) {
            Some(&idx) => {
                self.entries[idx].enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Flip visibility for every entry owned by a module. Returns how many
    /// entries were touched.
    pub fn set_module_enabled(&mut self, module: &str, enabled: bool) -> usize {
        let mut touched = 0;
        for entry in &mut self.entries {
            if entry.config.module.as_deref() == Some(module) {
                entry.config.module_enabled = enabled;
                touched += 1;
            }
        }
        touched
    }

    /// Record one successful dispatch against an entry.
    pub fn record_use(&mut self, fingerprint: &Fingerprint) {
        if let Some(&idx) = self.index.get(fingerprint) {
            let entry = &mut self.entries[idx];
            entry.usage_count += 1;
            entry.last_used_at = Some(Utc::now());
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        // next_seq keeps counting; sequences stay unique across clears.
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
