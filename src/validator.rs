//! Config normalization and rule validation with a bounded result cache.
//!
//! Rules run in a fixed order and all failures are accumulated, so a
//! rejection reports every problem at once. Results for the registry-
//! independent rules are cached in an LRU keyed by fingerprint plus a hash
//! of the config's matching-relevant fields; the per-context cap is
//! evaluated fresh on every call because it depends on registry state.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;

use lru::LruCache;
use tracing::debug;

use crate::config::ShortcutConfig;
use crate::context::Context;
use crate::error::ValidationError;
use crate::event::KeyEvent;
use crate::key::{normalize_key, Fingerprint};

/// Maximum cached validation results.
const VALIDATION_CACHE_CAP: usize = 128;

/// Default maximum shortcuts per context.
pub const DEFAULT_PER_CONTEXT_CAP: usize = 20;

/// Maximum accepted key-name length.
const MAX_KEY_LEN: usize = 20;

pub struct Validator {
    reserved_global_keys: HashSet<String>,
    system_shortcuts: HashSet<String>,
    per_context_cap: usize,
    cache: LruCache<(String, u64), Vec<ValidationError>>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    pub fn new() -> Self {
        Self {
            reserved_global_keys: ["F5", "F12", "Tab"].iter().map(|k| k.to_string()).collect(),
            // Chords the host platform claims for itself; stored without a
            // context because the rule only applies in `global`.
            system_shortcuts: ["C-r", "C-s"].iter().map(|c| c.to_string()).collect(),
            per_context_cap: DEFAULT_PER_CONTEXT_CAP,
            cache: LruCache::new(
                NonZeroUsize::new(VALIDATION_CACHE_CAP).unwrap_or(NonZeroUsize::MIN),
            ),
        }
    }

    /// Lowercase the key, fold named-key aliases, and resolve a raw context
    /// name when one was supplied. Defaults (`context = global`,
    /// `prevent_default = true`) are already baked in by the builder.
    pub fn normalize(&self, mut config: ShortcutConfig) -> ShortcutConfig {
        config.key = normalize_key(&config.key);
        if let Some(name) = &config.context_name {
            if let Some(ctx) = Context::from_name(name) {
                config.context = ctx;
            }
        }
        config
    }

    /// Apply the rule set to a normalized config. `existing_in_context` is
    /// the number of shortcuts the registry already holds for the config's
    /// context, excluding any entry this registration would replace.
    pub fn validate(
        &mut self,
        config: &ShortcutConfig,
        existing_in_context: usize,
    ) -> Result<(), Vec<ValidationError>> {
        let cache_key = (config.fingerprint().canonical(), config_hash(config));
        let mut errors = match self.cache.get(&cache_key) {
            Some(cached) => cached.clone(),
            None => {
                let fresh = self.apply_rules(config);
                self.cache.put(cache_key, fresh.clone());
                fresh
            }
        };

        // Rule 7 depends on the registry, so it never goes through the cache.
        if existing_in_context >= self.per_context_cap {
            errors.push(ValidationError::TooManyShortcuts {
                context: config.context.to_string(),
                cap: self.per_context_cap,
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Reject events that cannot be dispatched (no key). Logged at debug
    /// level only; an invalid event is ignored, never an error.
    pub fn check_event(&self, event: &KeyEvent) -> bool {
        if !event.is_valid() {
            debug!(event = ?event, "ignoring key event without a key");
            return false;
        }
        true
    }

    /// Rules 1-6, in order, accumulating every violation.
    fn apply_rules(&self, config: &ShortcutConfig) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let key = config.key.as_str();
        let has_modifier =
            config.ctrl || config.alt || config.shift || config.meta.fingerprint_flag();

        // 1. Key present and sane. (Rule 2, "action is callable", cannot
        // fail here: the builder requires the action up front.)
        if key.is_empty() || key.len() > MAX_KEY_LEN {
            errors.push(ValidationError::InvalidKey(key.to_string()));
        }

        // 3. Context must be a member of the closed set.
        if let Some(name) = &config.context_name {
            if Context::from_name(name).is_none() {
                errors.push(ValidationError::UnknownContext(name.clone()));
            }
        }

        // 4. Reserved global keys stay with the platform.
        if config.context == Context::Global
            && !has_modifier
            && self.reserved_global_keys.contains(key)
        {
            errors.push(ValidationError::ReservedKey(key.to_string()));
        }

        // 5. System chords are off-limits in global; editing may shadow them.
        if config.context == Context::Global && self.system_shortcuts.contains(&chord_of(config)) {
            errors.push(ValidationError::SystemConflict(config.combo()));
        }

        // 6. Bare printable letters only bind in more specific contexts.
        if config.context == Context::Global && !has_modifier && is_printable_letter(key) {
            errors.push(ValidationError::ModifierRuleViolation(key.to_string()));
        }

        errors
    }

    /// Drop cached results for one fingerprint. Called on registry
    /// mutations so no stale result survives them.
    pub fn invalidate(&mut self, fingerprint: &Fingerprint) {
        let canonical = fingerprint.canonical();
        let stale: Vec<(String, u64)> = self
            .cache
            .iter()
            .filter(|((fp, _), _)| *fp == canonical)
            .map(|(k, _)| k.clone())
            .collect();
        for key in stale {
            self.cache.pop(&key);
        }
    }

    /// Replace the reserved-key table. Config-time only; clears the cache.
    pub fn set_reserved_global_keys(&mut self, keys: impl IntoIterator<Item = String>) {
        self.reserved_global_keys = keys.into_iter().map(|k| normalize_key(&k)).collect();
        self.cache.clear();
    }

    /// Replace the system-shortcut table with canonical chords such as
    /// `C-r`. Config-time only; clears the cache.
    pub fn set_system_shortcuts(&mut self, chords: impl IntoIterator<Item = String>) {
        self.system_shortcuts = chords.into_iter().collect();
        self.cache.clear();
    }

    /// Drop every cached result. Used by `clear()`, which invalidates the
    /// whole registry at once.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn set_per_context_cap(&mut self, cap: usize) {
        self.per_context_cap = cap;
    }

    pub fn per_context_cap(&self) -> usize {
        self.per_context_cap
    }

    #[cfg(test)]
    pub(crate) fn cached_results(&self) -> usize {
        self.cache.len()
    }
}

/// Context-free canonical chord, e.g. `C-r` for Ctrl+R.
fn chord_of(config: &ShortcutConfig) -> String {
    let mut chord = String::new();
    if config.ctrl {
        chord.push_str("C-");
    }
    if config.alt {
        chord.push_str("A-");
    }
    if config.shift {
        chord.push_str("S-");
    }
    if config.meta.fingerprint_flag() {
        chord.push_str("M-");
    }
    chord.push_str(&config.key);
    chord
}

fn is_printable_letter(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(c), None) if c.is_alphabetic()
    )
}

/// Hash of the fields validation depends on. Paired with the fingerprint in
/// the cache key so two configs for the same chord but different metadata
/// don't share a slot.
fn config_hash(config: &ShortcutConfig) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    config.key.hash(&mut hasher);
    config.ctrl.hash(&mut hasher);
    config.alt.hash(&mut hasher);
    config.shift.hash(&mut hasher);
    config.meta.fingerprint_flag().hash(&mut hasher);
    config.context.as_str().hash(&mut hasher);
    config.context_name.hash(&mut hasher);
    config.prevent_default.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
