//! Domain error model.

use thiserror::Error;

/// Result type used across the access engine.
pub type DomainResult<T> = Result<T, DomainError>;

/// Failures of static configuration: a permission table or other built-in
/// data that does not hold its own invariants.
///
/// Runtime failures (storage, tokens, authorization) have their own types in
/// the crates that raise them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }
}
