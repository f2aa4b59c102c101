//! Error types for the Kleo client core
//!
//! Every error here is a recoverable, typed result returned to the caller.
//! Nothing is fatal to the process: a bad snapshot for one loan must not
//! prevent computation for other loans, and numeric safety figures are never
//! silently defaulted to zero.

use thiserror::Error;

/// Result type alias using KleoError
pub type Result<T> = std::result::Result<T, KleoError>;

/// Unified error type for Kleo core operations
#[derive(Debug, Error)]
pub enum KleoError {
    // Arithmetic errors
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    // Account parsing errors
    #[error("Account error: {0}")]
    Account(#[from] crate::account::AccountIdError),

    // Mirrored vouch data diverged from the authoritative ledger
    #[error("Invalid vouch data: {reason}")]
    InvalidVouchData { reason: String },

    // A lifecycle transition was attempted with an unsatisfied guard
    #[error("Guard not satisfied: {reason}")]
    GuardNotSatisfied { reason: String },

    // Requested amount exceeds the top tier's range
    #[error("No tier available for amount {amount}")]
    NoTierAvailable { amount: u128 },

    // The fetched snapshot contradicts itself (borrowed > liquidity,
    // vouch capital sum > principal, stars at stake > total)
    #[error("Inconsistent snapshot: {reason}")]
    InconsistentSnapshot { reason: String },

    // Malformed tier configuration
    #[error("Invalid tier table: {reason}")]
    InvalidTierTable { reason: String },

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Scaled-integer arithmetic errors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Division by zero")]
    DivisionByZero,
}

impl KleoError {
    /// Build a guard rejection with a typed reason string
    pub fn guard(reason: impl Into<String>) -> Self {
        KleoError::GuardNotSatisfied {
            reason: reason.into(),
        }
    }

    /// Build an inconsistent-snapshot error
    pub fn inconsistent(reason: impl Into<String>) -> Self {
        KleoError::InconsistentSnapshot {
            reason: reason.into(),
        }
    }

    /// Build an invalid-vouch-data error
    pub fn invalid_vouch(reason: impl Into<String>) -> Self {
        KleoError::InvalidVouchData {
            reason: reason.into(),
        }
    }
}

// Implement From for common external error types
impl From<serde_json::Error> for KleoError {
    fn from(err: serde_json::Error) -> Self {
        KleoError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for KleoError {
    fn from(err: anyhow::Error) -> Self {
        KleoError::Internal(err.to_string())
    }
}
