//! The gateway seam.

use async_trait::async_trait;

use aos_core::entities::{AnalysisResult, FeedbackPayload, User};

use crate::error::OracleError;

/// Everything the oracle is told about one session.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    pub session_id: String,
    pub employee: User,
    pub feedback: FeedbackPayload,
    /// Titles of the employee's `active` goals.
    pub active_goal_titles: Vec<String>,
}

/// One operation: analyze a session's feedback.
///
/// Implementations return a result that already passed schema and bounds
/// validation; callers never see a half-parsed analysis.
#[async_trait]
pub trait AnalysisGateway: Send + Sync {
    /// # Errors
    ///
    /// Returns `OracleError::Malformed` for a non-conforming reply and one of
    /// the other variants when the oracle could not be reached.
    async fn analyze(&self, ctx: &AnalysisContext) -> Result<AnalysisResult, OracleError>;
}
