//! Error types for registration and dispatch.
//!
//! Registration problems are returned as structured values; dispatch
//! problems are captured and reported through the error sink, never
//! propagated out of `handle`.

use thiserror::Error;
use tracing::{error, warn};

/// A rule violation found while validating a shortcut config.
///
/// All violations for a config are accumulated and returned together, in
/// rule order, so a caller can surface every problem at once.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid key '{0}'")]
    InvalidKey(String),

    #[error("'{0}' is a reserved key in the global context")]
    ReservedKey(String),

    #[error("'{0}' collides with a system shortcut")]
    SystemConflict(String),

    #[error("printable key '{0}' requires a modifier in the global context")]
    ModifierRuleViolation(String),

    #[error("context '{context}' is full ({cap} shortcuts)")]
    TooManyShortcuts { context: String, cap: usize },

    #[error("unknown context '{0}'")]
    UnknownContext(String),
}

/// Why a registration was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("a shortcut is already registered for {0}")]
    DuplicateFingerprint(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// A failure captured during dispatch. Carried inside `DispatchResult`;
/// `handle` itself never fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Action for {combo} failed: {reason}")]
    ActionFailure { combo: String, reason: String },
}

/// Log-and-continue helpers for recoverable failures. The error is logged
/// with the caller's location and swallowed; the caller gets an `Option`.
pub trait ResultExt<T> {
    /// Log at error level and discard the error.
    fn log_err(self) -> Option<T>;
    /// Log at warn level and discard the error. For failures the caller
    /// half-expects, like malformed input from outside the crate.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?err,
                    file = caller.file(),
                    line = caller.line(),
                    "recoverable failure"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?err,
                    file = caller.file(),
                    line = caller.line(),
                    "ignoring failure"
                );
                None
            }
        }
    }
}
