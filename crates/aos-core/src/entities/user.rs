use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Role, Trend};

/// A person in the organization.
///
/// Seeded users keep fixed IDs such as `emp-001`; only employees and team
/// leads carry performance scores.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub team: String,
    pub scores: Option<PerformanceScores>,
    pub trends: Option<PerformanceTrends>,
}

/// Percent scores (0-100) across the tracked performance dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PerformanceScores {
    pub overall: u8,
    pub project_delivery: u8,
    pub goal_completion: u8,
    pub communication: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PerformanceTrends {
    pub overall: Trend,
    pub project_delivery: Trend,
    pub goal_completion: Trend,
    pub communication: Trend,
}
