//! Orchestrator error types.

use aos_core::errors::CoreError;
use aos_db::error::DatabaseError;
use thiserror::Error;

/// Errors surfaced to callers of the orchestrator.
///
/// Oracle failures are not here: they end up as an `error` session and a
/// response payload, never as an `Err`.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("critical case not found: {0}")]
    CaseNotFound(String),

    #[error("{entity} not found: {id}")]
    EntityNotFound { entity: &'static str, id: String },

    /// Rejected by the strict escalation policy; nothing was written.
    #[error("action '{action}' is not allowed while the case is {status}")]
    IllegalTransition { status: String, action: String },

    #[error("invalid submission: {0}")]
    Validation(String),

    #[error(transparent)]
    Database(DatabaseError),
}

impl From<DatabaseError> for OrchestratorError {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::NotFound { entity, id } => Self::EntityNotFound { entity, id },
            DatabaseError::Core(CoreError::IllegalTransition { status, action }) => {
                Self::IllegalTransition { status, action }
            }
            DatabaseError::Core(CoreError::Validation(msg)) => Self::Validation(msg),
            other => Self::Database(other),
        }
    }
}

impl From<CoreError> for OrchestratorError {
    fn from(e: CoreError) -> Self {
        DatabaseError::Core(e).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_entity_not_found() {
        let err: OrchestratorError = DatabaseError::NotFound {
            entity: "user",
            id: "emp-404".into(),
        }
        .into();
        assert!(matches!(err, OrchestratorError::EntityNotFound { entity: "user", .. }));
        assert_eq!(err.to_string(), "user not found: emp-404");
    }

    #[test]
    fn illegal_transition_is_lifted() {
        let err: OrchestratorError = CoreError::IllegalTransition {
            status: "resolved".into(),
            action: "hr_final".into(),
        }
        .into();
        assert!(matches!(err, OrchestratorError::IllegalTransition { .. }));
    }

    #[test]
    fn conflicts_stay_database_errors() {
        let err: OrchestratorError = DatabaseError::Conflict("lost".into()).into();
        assert!(matches!(err, OrchestratorError::Database(DatabaseError::Conflict(_))));
    }
}
