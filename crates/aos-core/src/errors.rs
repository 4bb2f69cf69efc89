//! Cross-cutting error types for AccountabilityOS.
//!
//! Domain-specific errors (`DatabaseError`, `OracleError`, ...) live in their
//! own crates. `aos-cli` converges everything into `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any AccountabilityOS crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A status change was attempted that the entity's state machine forbids.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// A critical-case action is not legal in the case's current status
    /// (strict escalation policy only).
    #[error("Illegal action '{action}' for case in status {status}")]
    IllegalTransition { status: String, action: String },

    /// Data failed validation (schema, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
