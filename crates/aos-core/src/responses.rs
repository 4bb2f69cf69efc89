//! Response types returned as JSON by `aos` commands and the orchestrator.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::{AnalysisResult, CoachingGoal, CriticalCase, Insight, Session, User};
use crate::enums::{Role, SessionStatus};

/// Why an analysis failed. Both kinds persist the same `error` session shape;
/// the distinction only informs the caller's retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisErrorKind {
    /// Network failure, upstream error, or timeout. Worth retrying.
    OracleUnavailable,
    /// The oracle replied with something that does not conform.
    MalformedAnalysis,
}

impl AnalysisErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OracleUnavailable => "oracle_unavailable",
            Self::MalformedAnalysis => "malformed_analysis",
        }
    }

    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::OracleUnavailable)
    }
}

impl fmt::Display for AnalysisErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response from `aos feedback submit`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SubmitFeedbackResponse {
    pub session_id: String,
    pub status: SessionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<AnalysisErrorKind>,
    /// ID of the case opened by this submission, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_id: Option<String>,
}

/// Response from `aos seed`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SeedReport {
    /// `false` when the store already held users and nothing was written.
    pub seeded: bool,
    pub users: u32,
    pub sessions: u32,
    pub goals: u32,
    pub insights: u32,
}

/// Response from `aos session recover`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RecoveryReport {
    /// Sessions whose accepted analysis was fanned out and completed.
    pub resumed: Vec<String>,
    /// Sessions stuck without an accepted analysis, now marked `error`.
    pub interrupted: Vec<String>,
}

/// Response from `aos dashboard <role>`.
///
/// Sections irrelevant to the role are omitted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DashboardResponse {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<User>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upcoming_sessions: Option<Vec<Session>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_sessions: Option<Vec<Session>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<Vec<Insight>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cases: Option<Vec<CriticalCase>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_reviews: Option<Vec<CoachingGoal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<u32>,
}

impl DashboardResponse {
    #[must_use]
    pub const fn empty(role: Role) -> Self {
        Self {
            role,
            users: None,
            upcoming_sessions: None,
            recent_sessions: None,
            insights: None,
            cases: None,
            pending_reviews: None,
            employee_count: None,
        }
    }
}
