//! Feedback submission and recovery.
//!
//! A submission moves through four durable points:
//! 1. `begin_analysis`: the session is `analyzing` with the feedback stored
//!    and a new `analysis_version`.
//! 2. The oracle call, bounded by a timeout.
//! 3. `store_accepted_analysis`: the validated analysis is on the session.
//! 4. `apply_fan_out`: derived records and `completed`, in one transaction.
//!
//! A crash after 3 is finished by [`FeedbackOrchestrator::recover`]; a crash
//! before it leaves a session that recovery marks `error`.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use aos_core::entities::{AnalysisResult, FeedbackSubmission, Session};
use aos_core::enums::SessionStatus;
use aos_core::fanout::FanOutPlan;
use aos_core::ids::{DEFAULT_SUPERVISOR_ID, DEFAULT_SUPERVISOR_NAME};
use aos_core::responses::{AnalysisErrorKind, RecoveryReport, SubmitFeedbackResponse};
use aos_db::error::DatabaseError;
use aos_db::repos::session::NewSession;
use aos_db::service::AosService;
use aos_oracle::{AnalysisContext, AnalysisGateway, OracleError};

use crate::error::OrchestratorError;

/// Reason recorded on sessions found `analyzing` with no accepted analysis.
pub const INTERRUPTED_REASON: &str = "analysis interrupted";

/// Name of the schema every accepted analysis must satisfy.
const ANALYSIS_SCHEMA: &str = "analysis_result";

pub struct FeedbackOrchestrator {
    gateway: Arc<dyn AnalysisGateway>,
    timeout: Duration,
    supervisor_id: String,
    supervisor_name: String,
}

impl FeedbackOrchestrator {
    #[must_use]
    pub fn new(gateway: Arc<dyn AnalysisGateway>, timeout: Duration) -> Self {
        Self {
            gateway,
            timeout,
            supervisor_id: DEFAULT_SUPERVISOR_ID.to_string(),
            supervisor_name: DEFAULT_SUPERVISOR_NAME.to_string(),
        }
    }

    /// Supervisor assigned to sessions this orchestrator creates.
    #[must_use]
    pub fn with_default_supervisor(mut self, id: &str, name: &str) -> Self {
        self.supervisor_id = id.to_string();
        self.supervisor_name = name.to_string();
        self
    }

    /// Submit feedback and run it through analysis and fan-out.
    ///
    /// Oracle failures do not produce an `Err`: the session is marked `error`
    /// and the response carries the reason and its kind.
    ///
    /// # Errors
    ///
    /// - `Validation` for out-of-range ratings; nothing is persisted.
    /// - `EntityNotFound` for an unknown employee.
    /// - `Database` if the store fails, including `InvalidState` when the
    ///   session is already being analyzed.
    pub async fn submit(
        &self,
        svc: &AosService,
        submission: &FeedbackSubmission,
    ) -> Result<SubmitFeedbackResponse, OrchestratorError> {
        submission.feedback.validate()?;

        let employee = svc.get_user(&submission.employee_id).await?;
        let active_goal_titles = svc.active_goal_titles(&employee.id).await?;

        let session = self.write_ahead(svc, submission).await?;
        let version = session.analysis_version;
        tracing::info!(session_id = %session.id, version, "feedback submitted");

        let ctx = AnalysisContext {
            session_id: session.id.clone(),
            employee,
            feedback: submission.feedback.clone(),
            active_goal_titles,
        };

        match self.analyze(svc, &ctx).await {
            Ok(analysis) => {
                svc.store_accepted_analysis(&session.id, version, &analysis)
                    .await?;
                let plan = FanOutPlan::build(
                    &session.id,
                    version,
                    &session.employee_id,
                    &session.supervisor_id,
                    &analysis,
                );
                let outcome = svc.apply_fan_out(&plan).await?;
                Ok(SubmitFeedbackResponse {
                    session_id: session.id,
                    status: outcome.session.status,
                    analysis: Some(analysis),
                    error: None,
                    error_kind: None,
                    case_id: outcome.case.map(|c| c.id),
                })
            }
            Err((kind, reason)) => {
                tracing::warn!(session_id = %session.id, version, %kind, error = %reason, "analysis failed");
                svc.mark_session_error(&session.id, version, &reason)
                    .await?;
                Ok(SubmitFeedbackResponse {
                    session_id: session.id,
                    status: SessionStatus::Error,
                    analysis: None,
                    error: Some(reason),
                    error_kind: Some(kind),
                    case_id: None,
                })
            }
        }
    }

    /// Finish or fail every session stuck in `analyzing`.
    ///
    /// Sessions holding an analysis accepted for their current version are
    /// fanned out (a no-op for rows an earlier attempt already wrote). An
    /// analysis left over from an earlier version does not count. Sessions
    /// without a current one are
    /// marked `error` with [`INTERRUPTED_REASON`]. With `submitted_before`,
    /// newer submissions are left alone since they may still be in flight.
    ///
    /// # Errors
    ///
    /// Returns `Database` if the scan or a write fails for a reason other
    /// than the session having moved on concurrently.
    pub async fn recover(
        &self,
        svc: &AosService,
        submitted_before: Option<DateTime<Utc>>,
    ) -> Result<RecoveryReport, OrchestratorError> {
        let mut report = RecoveryReport::default();

        for session in svc.stalled_sessions(submitted_before).await? {
            let outcome = match session.current_analysis() {
                Some(analysis) => resume(svc, &session, analysis)
                    .await
                    .map(|()| report.resumed.push(session.id.clone())),
                None => svc
                    .mark_session_error(&session.id, session.analysis_version, INTERRUPTED_REASON)
                    .await
                    .map(|_| report.interrupted.push(session.id.clone())),
            };

            match outcome {
                Ok(()) => {}
                Err(e @ (DatabaseError::Conflict(_) | DatabaseError::InvalidState(_))) => {
                    tracing::warn!(session_id = %session.id, error = %e, "session moved on during recovery");
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::info!(
            resumed = report.resumed.len(),
            interrupted = report.interrupted.len(),
            "recovery finished"
        );
        Ok(report)
    }

    /// Put the session into `analyzing`, creating it first if needed.
    async fn write_ahead(
        &self,
        svc: &AosService,
        submission: &FeedbackSubmission,
    ) -> Result<Session, DatabaseError> {
        let existing = match &submission.session_id {
            Some(id) => match svc.get_session(id).await {
                Ok(session) => Some(session),
                Err(e) if e.is_not_found() => None,
                Err(e) => return Err(e),
            },
            None => None,
        };

        let session_id = match existing {
            Some(session) => session.id,
            None => {
                let new = NewSession {
                    id: submission.session_id.clone(),
                    employee_id: submission.employee_id.clone(),
                    employee_name: submission.employee_name.clone(),
                    supervisor_id: self.supervisor_id.clone(),
                    supervisor_name: self.supervisor_name.clone(),
                    scheduled_at: None,
                    meeting_location: submission.feedback.meeting_location,
                };
                svc.schedule_session(&new).await?.id
            }
        };

        svc.begin_analysis(
            &session_id,
            &submission.employee_id,
            &submission.employee_name,
            &submission.feedback,
        )
        .await
    }

    /// Call the gateway under the timeout and re-check what it returned.
    async fn analyze(
        &self,
        svc: &AosService,
        ctx: &AnalysisContext,
    ) -> Result<AnalysisResult, (AnalysisErrorKind, String)> {
        let reply = tokio::time::timeout(self.timeout, self.gateway.analyze(ctx)).await;

        let analysis = match reply {
            Err(_) => {
                let err = OracleError::Timeout(self.timeout);
                return Err((AnalysisErrorKind::OracleUnavailable, err.to_string()));
            }
            Ok(Err(e)) => {
                let kind = if e.is_malformed() {
                    AnalysisErrorKind::MalformedAnalysis
                } else {
                    AnalysisErrorKind::OracleUnavailable
                };
                return Err((kind, e.to_string()));
            }
            Ok(Ok(analysis)) => analysis,
        };

        let malformed = |msg: String| (AnalysisErrorKind::MalformedAnalysis, format!("malformed analysis: {msg}"));
        analysis.validate().map_err(|e| malformed(e.to_string()))?;
        let value = serde_json::to_value(&analysis).map_err(|e| malformed(e.to_string()))?;
        svc.schema()
            .validate(ANALYSIS_SCHEMA, &value)
            .map_err(|e| malformed(e.to_string()))?;
        Ok(analysis)
    }
}

async fn resume(
    svc: &AosService,
    session: &Session,
    analysis: &AnalysisResult,
) -> Result<(), DatabaseError> {
    let plan = FanOutPlan::build(
        &session.id,
        session.analysis_version,
        &session.employee_id,
        &session.supervisor_id,
        analysis,
    );
    let outcome = svc.apply_fan_out(&plan).await?;
    tracing::info!(session_id = %session.id, created = outcome.created, "stalled fan-out resumed");
    Ok(())
}
