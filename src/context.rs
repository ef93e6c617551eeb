//! Application contexts and the context probe.
//!
//! A context is a named application mode. A shortcut binds to exactly one
//! context; dispatch walks active contexts from most to least specific so
//! an `editing` binding wins over a `global` one for the same chord.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Closed set of application contexts, ordered by specificity.
///
/// `Global` is always implicitly active and always checked last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Context {
    Editing,
    Modal,
    Global,
}

impl Context {
    /// All known contexts, most specific first.
    pub const ALL: [Context; 3] = [Context::Editing, Context::Modal, Context::Global];

    /// Higher means more specific: `editing > modal > global`.
    pub fn specificity(&self) -> u8 {
        match self {
            Context::Editing => 2,
            Context::Modal => 1,
            Context::Global => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Context::Editing => "editing",
            Context::Modal => "modal",
            Context::Global => "global",
        }
    }

    /// Resolve a context name, case-insensitively. Unknown names fail
    /// registration with `UnknownContext`.
    pub fn from_name(name: &str) -> Option<Context> {
        match name.to_lowercase().as_str() {
            "editing" => Some(Context::Editing),
            "modal" => Some(Context::Modal),
            "global" => Some(Context::Global),
            _ => None,
        }
    }
}

impl std::fmt::Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Injected callback reporting the currently active contexts, most specific
/// first. `Global` is implicit and never needs to be returned. The probe is
/// invoked at most once per dispatched event.
pub type ContextProbeFn = Arc<dyn Fn() -> Vec<Context> + Send + Sync>;

/// Order active contexts by decreasing specificity, dropping duplicates and
/// appending the implicit `Global`.
pub fn ordered_active(active: &[Context]) -> Vec<Context> {
    let mut out: Vec<Context> = Vec::with_capacity(active.len() + 1);
    for ctx in active {
        if !out.contains(ctx) && *ctx != Context::Global {
            out.push(*ctx);
        }
    }
    out.sort_by_key(|c| std::cmp::Reverse(c.specificity()));
    out.push(Context::Global);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_is_case_insensitive() {
        assert_eq!(Context::from_name("EDITING"), Some(Context::Editing));
        assert_eq!(Context::from_name("Modal"), Some(Context::Modal));
        assert_eq!(Context::from_name("global"), Some(Context::Global));
        assert_eq!(Context::from_name("popup"), None);
    }

    #[test]
    fn ordered_active_appends_implicit_global() {
        assert_eq!(ordered_active(&[]), vec![Context::Global]);
        assert_eq!(
            ordered_active(&[Context::Modal, Context::Editing]),
            vec![Context::Editing, Context::Modal, Context::Global]
        );
    }

    #[test]
    fn ordered_active_dedupes() {
        assert_eq!(
            ordered_active(&[Context::Editing, Context::Editing, Context::Global]),
            vec![Context::Editing, Context::Global]
        );
    }
}
