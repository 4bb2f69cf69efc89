use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::RecommendedResource;
use crate::enums::{GoalSource, GoalStatus};

/// A development goal owned by one user.
///
/// `check_ins` is append-only; the store appends entries in place and never
/// rewrites the list.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CoachingGoal {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub source: GoalSource,
    pub status: GoalStatus,
    #[schemars(range(max = 100))]
    pub progress: u8,
    pub start_date: Option<NaiveDate>,
    pub target_end_date: Option<NaiveDate>,
    pub check_ins: Vec<CheckIn>,
    pub resource: Option<RecommendedResource>,
    pub decline_reason: Option<String>,
    pub upheld_by_am: bool,
    /// Session whose analysis proposed this goal, for AI goals.
    pub session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One progress report on a goal.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CheckIn {
    pub timestamp: DateTime<Utc>,
    pub progress: u8,
    pub notes: String,
}
