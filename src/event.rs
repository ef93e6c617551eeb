//! Key event input shape.
//!
//! Events arrive from a host event loop (browser, TUI, test harness) with a
//! key name, modifier flags, and an optional prevent-default hook. Missing
//! modifiers are simply false; the hook is optional and safe to invoke any
//! number of times.

use std::sync::Arc;

/// Optional host callback suppressing the platform's default handling.
pub type PreventDefaultFn = Arc<dyn Fn() + Send + Sync>;

/// A single key event as seen by the dispatcher.
#[derive(Clone)]
pub struct KeyEvent {
    pub key: String,
    pub ctrl_key: bool,
    pub alt_key: bool,
    pub shift_key: bool,
    pub meta_key: bool,
    prevent_default: Option<PreventDefaultFn>,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl_key: false,
            alt_key: false,
            shift_key: false,
            meta_key: false,
            prevent_default: None,
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl_key = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt_key = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift_key = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta_key = true;
        self
    }

    pub fn with_prevent_default(mut self, hook: PreventDefaultFn) -> Self {
        self.prevent_default = Some(hook);
        self
    }

    /// Invoke the host's prevent-default hook, if any. Idempotent from the
    /// dispatcher's point of view; calling it repeatedly must be harmless.
    pub fn prevent_default(&self) {
        if let Some(hook) = &self.prevent_default {
            hook();
        }
    }

    /// An event is dispatchable only if it names a key.
    pub fn is_valid(&self) -> bool {
        !self.key.is_empty()
    }
}

impl std::fmt::Debug for KeyEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyEvent")
            .field("key", &self.key)
            .field("ctrl_key", &self.ctrl_key)
            .field("alt_key", &self.alt_key)
            .field("shift_key", &self.shift_key)
            .field("meta_key", &self.meta_key)
            .field("has_prevent_default", &self.prevent_default.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn builder_sets_modifiers() {
        let ev = KeyEvent::new("s").ctrl().shift();
        assert!(ev.ctrl_key && ev.shift_key);
        assert!(!ev.alt_key && !ev.meta_key);
    }

    #[test]
    fn prevent_default_is_optional_and_repeatable() {
        let ev = KeyEvent::new("s");
        ev.prevent_default();
        ev.prevent_default();

        let calls = Arc::new(AtomicUsize::new(0));
        let counted = calls.clone();
        let ev = KeyEvent::new("s")
            .with_prevent_default(Arc::new(move || {
                counted.fetch_add(1, Ordering::SeqCst);
            }));
        ev.prevent_default();
        ev.prevent_default();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn empty_key_is_invalid() {
        assert!(!KeyEvent::new("").is_valid());
        assert!(KeyEvent::new("a").is_valid());
    }
}
