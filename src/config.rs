//! Shortcut configuration: the registration input.
//!
//! A config pairs a key chord with an opaque action plus display metadata.
//! Actions receive the triggering event and the active contexts and report
//! success as `Ok(true)`/`Ok(false)`; failures are isolated by the
//! dispatcher and never escape `handle`.

use std::sync::Arc;

use serde::Serialize;

use crate::context::Context;
use crate::event::KeyEvent;
use crate::key::{self, Fingerprint};

/// Opaque action callback. Panics are also captured at the dispatch seam,
/// but well-behaved actions report failure through the `Result`.
pub type ActionFn = Arc<dyn Fn(&KeyEvent, &[Context]) -> anyhow::Result<bool> + Send + Sync>;

/// How a config treats the meta modifier.
///
/// The default is `DontCare`: an event with meta held still matches a config
/// that never mentioned meta. A declared value must match exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MetaRule {
    #[default]
    DontCare,
    Exact(bool),
}

impl MetaRule {
    pub fn accepts(&self, event_meta: bool) -> bool {
        match self {
            MetaRule::DontCare => true,
            MetaRule::Exact(required) => *required == event_meta,
        }
    }

    /// The meta flag baked into the fingerprint: only an explicit
    /// `Exact(true)` declares meta as part of the chord.
    pub fn fingerprint_flag(&self) -> bool {
        matches!(self, MetaRule::Exact(true))
    }
}

/// Display category for grouping shortcuts in help output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Navigation,
    Todos,
    Editing,
    View,
    Help,
    #[default]
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Navigation => "navigation",
            Category::Todos => "todos",
            Category::Editing => "editing",
            Category::View => "view",
            Category::Help => "help",
            Category::General => "general",
        }
    }
}

/// Registration input for one shortcut.
#[derive(Clone)]
pub struct ShortcutConfig {
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: MetaRule,
    pub context: Context,
    /// Raw context name when the config came from data rather than code.
    /// Resolved during validation; unknown names reject the registration.
    pub context_name: Option<String>,
    pub action: ActionFn,
    pub prevent_default: bool,
    pub description: String,
    pub category: Category,
    pub module: Option<String>,
    pub module_enabled: bool,
    pub allow_overwrite: bool,
}

impl ShortcutConfig {
    pub fn new(key: impl Into<String>, action: ActionFn) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            alt: false,
            shift: false,
            meta: MetaRule::DontCare,
            context: Context::Global,
            context_name: None,
            action,
            prevent_default: true,
            description: String::new(),
            category: Category::General,
            module: None,
            module_enabled: true,
            allow_overwrite: false,
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn meta(mut self, required: bool) -> Self {
        self.meta = MetaRule::Exact(required);
        self
    }

    pub fn context(mut self, context: Context) -> Self {
        self.context = context;
        self.context_name = None;
        self
    }

    /// Bind to a context by name. Unknown names surface as `UnknownContext`
    /// at registration time instead of panicking here.
    pub fn context_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if let Some(ctx) = Context::from_name(&name) {
            self.context = ctx;
        }
        self.context_name = Some(name);
        self
    }

    pub fn no_prevent_default(mut self) -> Self {
        self.prevent_default = false;
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn allow_overwrite(mut self) -> Self {
        self.allow_overwrite = true;
        self
    }

    /// Canonical identity of this config's chord in its context.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::new(
            self.context,
            self.ctrl,
            self.alt,
            self.shift,
            self.meta.fingerprint_flag(),
            &self.key,
        )
    }

    /// Display string for this config's chord (`Ctrl+s`, `↵`, ...).
    pub fn combo(&self) -> String {
        key::format_combo(
            self.ctrl,
            self.alt,
            self.shift,
            self.meta.fingerprint_flag(),
            &self.key,
        )
    }

    /// Introspection snapshot without the action.
    pub fn info(&self) -> ShortcutInfo {
        ShortcutInfo {
            fingerprint: self.fingerprint().canonical(),
            combo: self.combo(),
            key: key::normalize_key(&self.key),
            ctrl: self.ctrl,
            alt: self.alt,
            shift: self.shift,
            meta: match self.meta {
                MetaRule::DontCare => None,
                MetaRule::Exact(b) => Some(b),
            },
            context: self.context,
            prevent_default: self.prevent_default,
            description: self.description.clone(),
            category: self.category,
            module: self.module.clone(),
            module_enabled: self.module_enabled,
        }
    }
}

// Manual Debug: the action closure has no useful representation.
impl std::fmt::Debug for ShortcutConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortcutConfig")
            .field("key", &self.key)
            .field("ctrl", &self.ctrl)
            .field("alt", &self.alt)
            .field("shift", &self.shift)
            .field("meta", &self.meta)
            .field("context", &self.context)
            .field("prevent_default", &self.prevent_default)
            .field("description", &self.description)
            .field("category", &self.category)
            .field("module", &self.module)
            .field("module_enabled", &self.module_enabled)
            .finish()
    }
}

/// Serializable view of a registered shortcut, used by the introspection
/// API (`list_all`, `list_by_category`) and help rendering.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShortcutInfo {
    pub fingerprint: String,
    pub combo: String,
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: Option<bool>,
    pub context: Context,
    pub prevent_default: bool,
    pub description: String,
    pub category: Category,
    pub module: Option<String>,
    pub module_enabled: bool,
}
