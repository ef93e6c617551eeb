//! Per-session dispatch statistics and debug timing.
//!
//! Counters only ever increase within a session; `reset` starts a new one.
//! Everything here is in-memory, nothing is persisted.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Usage record for one fingerprint.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ShortcutUsage {
    pub count: u64,
    pub last_used_at: Option<DateTime<Utc>>,
    pub total_duration_ns: u128,
}

/// Session-wide counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub events: u64,
    pub matches: u64,
    pub misses: u64,
    pub errors: u64,
}

#[derive(Default)]
pub struct Stats {
    per_shortcut: HashMap<String, ShortcutUsage>,
    totals: Totals,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self) {
        self.totals.events += 1;
    }

    pub fn record_match(&mut self, fingerprint: &str, duration: Duration) {
        self.totals.matches += 1;
        let usage = self.per_shortcut.entry(fingerprint.to_string()).or_default();
        usage.count += 1;
        usage.last_used_at = Some(Utc::now());
        usage.total_duration_ns += duration.as_nanos();
    }

    pub fn record_miss(&mut self) {
        self.totals.misses += 1;
    }

    pub fn record_error(&mut self) {
        self.totals.errors += 1;
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn usage(&self, fingerprint: &str) -> Option<&ShortcutUsage> {
        self.per_shortcut.get(fingerprint)
    }

    pub fn reset(&mut self) {
        self.per_shortcut.clear();
        self.totals = Totals::default();
    }

    /// Serializable snapshot for introspection or logging.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            per_shortcut: self.per_shortcut.clone(),
            totals: self.totals,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct StatsSnapshot {
    pub per_shortcut: HashMap<String, ShortcutUsage>,
    pub totals: Totals,
}

/// Transient per-event timing scope, created only when debug is on.
pub struct DebugSession {
    start: Instant,
}

impl DebugSession {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let mut stats = Stats::new();
        stats.record_event();
        stats.record_match("global:C-n", Duration::from_micros(5));
        stats.record_event();
        stats.record_match("global:C-n", Duration::from_micros(7));
        stats.record_event();
        stats.record_miss();

        let totals = stats.totals();
        assert_eq!(totals.events, 3);
        assert_eq!(totals.matches, 2);
        assert_eq!(totals.misses, 1);

        let usage = stats.usage("global:C-n").unwrap();
        assert_eq!(usage.count, 2);
        assert_eq!(usage.total_duration_ns, 12_000);
        assert!(usage.last_used_at.is_some());
    }

    #[test]
    fn reset_clears_everything() {
        let mut stats = Stats::new();
        stats.record_event();
        stats.record_match("global:C-n", Duration::ZERO);
        stats.record_error();
        stats.reset();

        assert_eq!(stats.totals(), Totals::default());
        assert!(stats.usage("global:C-n").is_none());
    }
}
