//! Applying actor actions to critical cases.

use chrono::Utc;

use aos_core::entities::CriticalCase;
use aos_core::escalation::{TransitionPolicy, plan};
use aos_db::error::DatabaseError;
use aos_db::retry::{RetryConfig, retry_on_conflict};
use aos_db::service::AosService;

use crate::error::OrchestratorError;

/// Runs case actions: read, plan with the pure state machine, then
/// compare-and-swap. A lost race re-reads and re-plans against the newer
/// case, so concurrent actions on one case all land in its timeline.
#[derive(Debug, Clone, Default)]
pub struct EscalationEngine {
    policy: TransitionPolicy,
    retry: RetryConfig,
}

impl EscalationEngine {
    #[must_use]
    pub const fn new(policy: TransitionPolicy, retry: RetryConfig) -> Self {
        Self { policy, retry }
    }

    #[must_use]
    pub const fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Apply `action` to case `case_id` and return the updated case.
    ///
    /// # Errors
    ///
    /// - `CaseNotFound` if no case has this ID.
    /// - `IllegalTransition` under the strict policy; the case is untouched.
    /// - `Database(Conflict)` once every retry lost its race.
    pub async fn act(
        &self,
        svc: &AosService,
        case_id: &str,
        action: &str,
        response: &str,
        private_notes: &str,
    ) -> Result<CriticalCase, OrchestratorError> {
        let policy = self.policy;
        let result = retry_on_conflict(&self.retry, case_id, move |attempt| async move {
            let case = svc.get_case(case_id).await?;
            let transition = plan(case.escalation, action, response, private_notes, Utc::now(), policy)?;
            if attempt > 1 {
                tracing::debug!(case_id, attempt, version = case.version, "re-planned after conflict");
            }
            svc.apply_case_transition(&case, &transition).await
        })
        .await;

        match result {
            Ok(case) => Ok(case),
            Err(DatabaseError::NotFound { .. }) => Err(OrchestratorError::CaseNotFound(case_id.to_string())),
            Err(e) => {
                if matches!(e, DatabaseError::Conflict(_)) {
                    tracing::warn!(case_id, action, error = %e, "case action gave up");
                }
                Err(e.into())
            }
        }
    }
}
