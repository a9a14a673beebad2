//! Errors raised by user-supplied code evaluated during binding.
//!
//! Post constraints, default closures, and coercion methods run
//! arbitrary user code. A fault in that code is not a binding mismatch:
//! it travels through the binder unmodified on the ordinary error
//! channel instead of being converted into a bind failure.

use std::fmt;

/// Result of evaluating user-supplied code.
pub type EvalResult = Result<crate::Value, EvalError>;

/// Error raised by user-supplied constraint, default, or coercion code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    message: String,
}

impl EvalError {
    /// Create an error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        EvalError {
            message: message.into(),
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for EvalError {}
