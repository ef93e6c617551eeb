//! Key normalization, canonical fingerprints, and display formatting.
//!
//! A fingerprint identifies one `(context, modifiers, key)` combination and
//! renders as a canonical string such as `editing:C-S-s` (modifiers in fixed
//! C, A, S, M order). All functions here are pure and deterministic.

use serde::Serialize;
use thiserror::Error;

use crate::context::Context;

/// Errors from parsing a canonical fingerprint string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FingerprintParseError {
    #[error("fingerprint string is empty")]
    Empty,
    #[error("fingerprint has no key, only modifiers")]
    MissingKey,
    #[error("unknown context '{0}' in fingerprint")]
    UnknownContext(String),
}

/// Normalize a key name to its canonical form.
///
/// Printable single characters are lowercased; named keys fold to a fixed
/// spelling (`" "` and `space` become `Space`, `esc` becomes `Escape`, and
/// so on). Unknown multi-character names pass through verbatim.
pub fn normalize_key(key: &str) -> String {
    if key == " " {
        return "Space".to_string();
    }
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return c.to_lowercase().to_string();
    }
    match key.to_lowercase().as_str() {
        "enter" | "return" => "Enter",
        "escape" | "esc" => "Escape",
        "tab" => "Tab",
        "space" | "spacebar" => "Space",
        "delete" | "del" => "Delete",
        "backspace" | "back" => "Backspace",
        "arrowup" | "up" | "uparrow" => "ArrowUp",
        "arrowdown" | "down" | "downarrow" => "ArrowDown",
        "arrowleft" | "left" | "leftarrow" => "ArrowLeft",
        "arrowright" | "right" | "rightarrow" => "ArrowRight",
        "home" => "Home",
        "end" => "End",
        "pageup" | "pgup" => "PageUp",
        "pagedown" | "pgdn" | "pgdown" => "PageDown",
        k if k.len() <= 3 && k.starts_with('f') && k[1..].parse::<u8>().is_ok() => {
            return k.to_uppercase();
        }
        _ => return key.to_string(),
    }
    .to_string()
}

/// True for printable single characters whose glyph already encodes a shift
/// (`/`, `?`, `=`, ...). The matcher does not require `shift` for these
/// unless the config demands it.
pub fn is_shifted_form(key: &str) -> bool {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => !c.is_alphanumeric() && !c.is_whitespace(),
        _ => false,
    }
}

/// Canonical identity of a `(context, modifiers, key)` combination.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Fingerprint {
    pub context: Context,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
    pub key: String,
}

impl Fingerprint {
    pub fn new(
        context: Context,
        ctrl: bool,
        alt: bool,
        shift: bool,
        meta: bool,
        key: &str,
    ) -> Self {
        Self {
            context,
            ctrl,
            alt,
            shift,
            meta,
            key: normalize_key(key),
        }
    }

    /// Canonical string form, e.g. `editing:C-S-s`.
    pub fn canonical(&self) -> String {
        self.to_string()
    }

    /// Parse a canonical string back into a fingerprint.
    pub fn parse(s: &str) -> Result<Self, FingerprintParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(FingerprintParseError::Empty);
        }
        let (ctx_name, rest) = s.split_once(':').unwrap_or(("global", s));
        let context = Context::from_name(ctx_name)
            .ok_or_else(|| FingerprintParseError::UnknownContext(ctx_name.to_string()))?;

        let mut rest = rest;
        let mut ctrl = false;
        let mut alt = false;
        let mut shift = false;
        let mut meta = false;
        // Fixed C, A, S, M prefix order.
        for (prefix, flag) in [
            ("C-", &mut ctrl),
            ("A-", &mut alt),
            ("S-", &mut shift),
            ("M-", &mut meta),
        ] {
            if let Some(stripped) = rest.strip_prefix(prefix) {
                *flag = true;
                rest = stripped;
            }
        }
        if rest.is_empty() {
            return Err(FingerprintParseError::MissingKey);
        }
        Ok(Self::new(context, ctrl, alt, shift, meta, rest))
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:", self.context)?;
        if self.ctrl {
            f.write_str("C-")?;
        }
        if self.alt {
            f.write_str("A-")?;
        }
        if self.shift {
            f.write_str("S-")?;
        }
        if self.meta {
            f.write_str("M-")?;
        }
        f.write_str(&self.key)
    }
}

/// User-facing glyph for a canonical key name.
pub fn display_key(key: &str) -> String {
    match key {
        " " | "Space" => "Space",
        "Enter" => "↵",
        "Escape" => "Esc",
        "Delete" => "Del",
        "Backspace" => "⌫",
        "ArrowUp" => "↑",
        "ArrowDown" => "↓",
        "ArrowLeft" => "←",
        "ArrowRight" => "→",
        k => return k.to_string(),
    }
    .to_string()
}

/// Display string for a key plus modifier set, in fixed
/// `Ctrl+Alt+Shift+Meta+Key` order. Stable for golden tests.
pub fn format_combo(ctrl: bool, alt: bool, shift: bool, meta: bool, key: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    if ctrl {
        parts.push("Ctrl".to_string());
    }
    if alt {
        parts.push("Alt".to_string());
    }
    if shift {
        parts.push("Shift".to_string());
    }
    if meta {
        parts.push("Meta".to_string());
    }
    parts.push(display_key(&normalize_key(key)));
    parts.join("+")
}
