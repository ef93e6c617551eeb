//! Context-aware keyboard shortcut dispatch core.
//!
//! The crate provides a shortcut registry, a key-chord matcher with
//! context specificity, a validation engine with conflict rules, an
//! execution pipeline with error isolation and timing, and a pluggable
//! module system (focus navigation, undoable actions, context-aware
//! branching).
//!
//! # Architecture
//!
//! Dispatch walks an ordered context stack for deterministic routing: the
//! most specific active context (e.g. `editing`) is checked first, falling
//! through to `global`, which is always implicitly active. Registration
//! runs configs through normalization and a rule validator before they
//! reach the fingerprint-unique registry.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use shortcut_kit::{Context, KeyEvent, ShortcutConfig, ShortcutCore};
//!
//! let mut core = ShortcutCore::new();
//! core.set_context_probe(Arc::new(|| vec![]));
//!
//! let outcome = core.register(
//!     ShortcutConfig::new("n", Arc::new(|_event, _contexts| Ok(true)))
//!         .ctrl()
//!         .description("Focus the new-todo input"),
//! );
//! assert!(outcome.is_ok());
//!
//! let result = core.handle(&KeyEvent::new("N").ctrl());
//! assert!(result.matched);
//! ```

pub mod catalog;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod handlers;
pub mod key;
pub mod logging;
pub mod matcher;
pub mod modules;
pub mod registry;
pub mod stats;
pub mod validator;

pub use catalog::{default_shortcuts, format_key_combo, group_by_category};
pub use config::{ActionFn, Category, MetaRule, ShortcutConfig, ShortcutInfo};
pub use context::{Context, ContextProbeFn};
pub use dispatcher::{
    DispatchResult, ErrorSinkFn, RegisterOutcome, RegistrationStatus, ShortcutCore,
};
pub use error::{DispatchError, RegistrationError, ResultExt, ValidationError};
pub use event::{KeyEvent, PreventDefaultFn};
pub use key::{format_combo, normalize_key, Fingerprint, FingerprintParseError};
pub use handlers::{HandlerFn, TodoHandlers};
pub use modules::{
    ActionModule, ContextAwareModule, FocusHost, FocusOptions, InlineScheduler, ModuleManager,
    NavigationModule, Scheduler, ShortcutModule, UndoHandle,
};
pub use registry::{RegisterStatus, Registry, RegistryEntry};
pub use stats::{StatsSnapshot, Totals};
pub use validator::Validator;
