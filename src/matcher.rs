//! Event-to-shortcut matching.
//!
//! Contexts are probed from most to least specific with `global` always
//! last, and the first visible hit wins, so an `editing` binding shadows a
//! `global` one for the same chord. Within one fingerprint the registry's
//! uniqueness invariant makes the earliest registration the survivor.

use crate::context::{ordered_active, Context};
use crate::event::KeyEvent;
use crate::key::{is_shifted_form, normalize_key, Fingerprint};
use crate::registry::{Registry, RegistryEntry};

/// Select the best-matching visible entry for an event, or `None` on miss.
pub fn select<'r>(
    registry: &'r Registry,
    event: &KeyEvent,
    active: &[Context],
) -> Option<&'r RegistryEntry> {
    let key = normalize_key(&event.key);
    let contexts = ordered_active(active);

    for context in contexts {
        for fingerprint in candidate_fingerprints(context, event, &key) {
            if let Some(entry) = registry.lookup(&fingerprint) {
                if entry.matchable() && entry.config.meta.accepts(event.meta_key) {
                    return Some(entry);
                }
            }
        }
    }
    None
}

/// Fingerprints an event can legally match in one context, exact first.
///
/// Relaxations: a pressed meta also tries the meta-less chord (configs
/// default to "don't care" about meta; the explicit-false case is filtered
/// by `MetaRule::accepts` afterwards), and a pressed shift is dropped for
/// shifted-form printables like `/`, whose key string already encodes it.
fn candidate_fingerprints(context: Context, event: &KeyEvent, key: &str) -> Vec<Fingerprint> {
    let shift_relaxable = event.shift_key && is_shifted_form(key);
    let mut shifts = vec![event.shift_key];
    if shift_relaxable {
        shifts.push(false);
    }
    let mut metas = vec![event.meta_key];
    if event.meta_key {
        metas.push(false);
    }

    let mut candidates = Vec::with_capacity(shifts.len() * metas.len());
    for &shift in &shifts {
        for &meta in &metas {
            candidates.push(Fingerprint::new(
                context,
                event.ctrl_key,
                event.alt_key,
                shift,
                meta,
                key,
            ));
        }
    }
    candidates
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
