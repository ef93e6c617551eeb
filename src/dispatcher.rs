//! The dispatch core: an explicit value owned by the application.
//!
//! `ShortcutCore` wires the validator, registry, matcher, and stats behind
//! the public registration and event-injection API. The context probe and
//! error sink are injected; there is no process-wide state. `handle` never
//! panics and never returns an error: action failures are captured, logged,
//! counted, and forwarded to the sink as a human-readable message.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::catalog;
use crate::config::{Category, ShortcutConfig, ShortcutInfo};
use crate::context::{ordered_active, Context, ContextProbeFn};
use crate::error::{DispatchError, RegistrationError, ResultExt};
use crate::event::KeyEvent;
use crate::key::Fingerprint;
use crate::matcher;
use crate::modules::ModuleManager;
use crate::registry::{RegisterStatus, Registry, RegistryEntry};
use crate::stats::{Stats, StatsSnapshot, Totals};
use crate::validator::Validator;

/// Injected callback receiving user-facing failure messages.
pub type ErrorSinkFn = Arc<dyn Fn(&str) + Send + Sync>;

/// Outcome of a registration attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationStatus {
    Inserted,
    Replaced,
    Rejected,
}

#[derive(Clone, Debug)]
pub struct RegisterOutcome {
    pub status: RegistrationStatus,
    pub fingerprint: Option<String>,
    pub errors: Vec<RegistrationError>,
}

impl RegisterOutcome {
    pub fn is_ok(&self) -> bool {
        self.status != RegistrationStatus::Rejected
    }
}

/// Result of dispatching one event. `error` is populated when a matched
/// action failed; the dispatch itself still completed.
#[derive(Clone, Debug)]
pub struct DispatchResult {
    pub matched: bool,
    pub fingerprint: Option<String>,
    pub error: Option<DispatchError>,
    pub duration: Duration,
}

pub struct ShortcutCore {
    registry: Registry,
    validator: Validator,
    stats: Stats,
    probe: Option<ContextProbeFn>,
    sink: Option<ErrorSinkFn>,
    debug: bool,
}

impl Default for ShortcutCore {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortcutCore {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            validator: Validator::new(),
            stats: Stats::new(),
            probe: None,
            sink: None,
            debug: false,
        }
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    pub fn register(&mut self, config: ShortcutConfig) -> RegisterOutcome {
        let config = self.validator.normalize(config);
        let fingerprint = config.fingerprint();

        // A replacement does not count against the per-context cap.
        let mut existing = self.registry.count_in_context(config.context);
        if self.registry.lookup(&fingerprint).is_some() {
            existing = existing.saturating_sub(1);
        }

        if let Err(violations) = self.validator.validate(&config, existing) {
            debug!(fingerprint = %fingerprint, ?violations, "registration rejected");
            return RegisterOutcome {
                status: RegistrationStatus::Rejected,
                fingerprint: Some(fingerprint.canonical()),
                errors: violations
                    .into_iter()
                    .map(RegistrationError::Invalid)
                    .collect(),
            };
        }

        match self.registry.register(config) {
            Ok((status, fingerprint)) => {
                self.validator.invalidate(&fingerprint);
                RegisterOutcome {
                    status: match status {
                        RegisterStatus::Inserted => RegistrationStatus::Inserted,
                        RegisterStatus::Replaced => RegistrationStatus::Replaced,
                    },
                    fingerprint: Some(fingerprint.canonical()),
                    errors: Vec::new(),
                }
            }
            Err(err) => RegisterOutcome {
                status: RegistrationStatus::Rejected,
                fingerprint: Some(fingerprint.canonical()),
                errors: vec![err],
            },
        }
    }

    /// Register every shortcut exposed by the manager's enabled modules,
    /// with plugins already applied.
    pub fn install_modules(&mut self, manager: &ModuleManager) -> Vec<RegisterOutcome> {
        manager
            .all_shortcuts()
            .into_iter()
            .map(|config| self.register(config))
            .collect()
    }

    pub fn unregister(&mut self, fingerprint: &str) -> bool {
        // Fingerprint strings come from the host; a malformed one is a
        // caller bug worth a warning, not an error.
        let Some(fingerprint) = Fingerprint::parse(fingerprint).warn_on_err() else {
            return false;
        };
        let removed = self.registry.unregister(&fingerprint);
        if removed {
            self.validator.invalidate(&fingerprint);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.registry.clear();
        self.validator.clear_cache();
        info!("shortcut registry cleared");
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    pub fn handle(&mut self, event: &KeyEvent) -> DispatchResult {
        let session = self.debug.then(crate::stats::DebugSession::start);
        let start = Instant::now();
        self.stats.record_event();

        if !self.validator.check_event(event) {
            return DispatchResult {
                matched: false,
                fingerprint: None,
                error: None,
                duration: start.elapsed(),
            };
        }

        // The probe runs at most once per event.
        let active = match &self.probe {
            Some(probe) => probe(),
            None => Vec::new(),
        };

        let hit = matcher::select(&self.registry, event, &active).map(|entry| {
            (
                entry.fingerprint.clone(),
                entry.config.action.clone(),
                entry.config.prevent_default,
                entry.config.combo(),
            )
        });

        let result = match hit {
            Some((fingerprint, action, prevent, combo)) => {
                if prevent {
                    event.prevent_default();
                }
                let contexts = ordered_active(&active);
                let failure = run_isolated(&action, event, &contexts).map(|reason| {
                    let failure = DispatchError::ActionFailure {
                        combo: combo.clone(),
                        reason,
                    };
                    error!(fingerprint = %fingerprint, %failure, "shortcut action failed");
                    if let Some(sink) = &self.sink {
                        sink(&failure.to_string());
                    }
                    self.stats.record_error();
                    failure
                });

                let duration = start.elapsed();
                self.stats.record_match(&fingerprint.canonical(), duration);
                self.registry.record_use(&fingerprint);
                DispatchResult {
                    matched: true,
                    fingerprint: Some(fingerprint.canonical()),
                    error: failure,
                    duration,
                }
            }
            None => {
                self.stats.record_miss();
                debug!(key = %event.key, "no shortcut matched");
                DispatchResult {
                    matched: false,
                    fingerprint: None,
                    error: None,
                    duration: start.elapsed(),
                }
            }
        };

        if let Some(session) = session {
            debug!(
                duration_ns = session.elapsed().as_nanos() as u64,
                matched = result.matched,
                "dispatch session ended"
            );
        }
        result
    }

    // ------------------------------------------------------------------
    // Introspection and lifecycle
    // ------------------------------------------------------------------

    /// All registered shortcuts in insertion order, disabled ones included.
    pub fn list_all(&self) -> Vec<ShortcutInfo> {
        self.registry.all().iter().map(RegistryEntry::info).collect()
    }

    pub fn list_by_category(&self) -> std::collections::BTreeMap<Category, Vec<ShortcutInfo>> {
        catalog::group_by_category(self.list_all())
    }

    pub fn set_enabled(&mut self, fingerprint: &str, enabled: bool) -> bool {
        match Fingerprint::parse(fingerprint).warn_on_err() {
            Some(fingerprint) => self.registry.set_enabled(&fingerprint, enabled),
            None => false,
        }
    }

    /// Enable or disable every shortcut owned by a module. Disabled module
    /// shortcuts stay registered but are invisible to matching.
    pub fn set_module_enabled(&mut self, module: &str, enabled: bool) -> usize {
        self.registry.set_module_enabled(module, enabled)
    }

    pub fn set_context_probe(&mut self, probe: ContextProbeFn) {
        self.probe = Some(probe);
    }

    pub fn set_error_sink(&mut self, sink: ErrorSinkFn) {
        self.sink = Some(sink);
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    pub fn totals(&self) -> Totals {
        self.stats.totals()
    }

    pub fn stats_snapshot(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    // Validator configuration passthroughs (config-time only).

    pub fn set_reserved_global_keys(&mut self, keys: impl IntoIterator<Item = String>) {
        self.validator.set_reserved_global_keys(keys);
    }

    pub fn set_system_shortcuts(&mut self, chords: impl IntoIterator<Item = String>) {
        self.validator.set_system_shortcuts(chords);
    }

    pub fn set_per_context_cap(&mut self, cap: usize) {
        self.validator.set_per_context_cap(cap);
    }
}

/// Run an action inside an isolation scope, translating both `Err` returns
/// and panics into a failure reason. `None` means the action completed.
fn run_isolated(
    action: &crate::config::ActionFn,
    event: &KeyEvent,
    contexts: &[Context],
) -> Option<String> {
    match panic::catch_unwind(AssertUnwindSafe(|| action(event, contexts))) {
        Ok(Ok(_handled)) => None,
        Ok(Err(err)) => Some(err.to_string()),
        Err(payload) => Some(panic_reason(payload)),
    }
}

fn panic_reason(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "action panicked".to_string()
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
