//! Fan-out planning: which records an accepted analysis produces.
//!
//! The plan is computed once from the analysis and applied by the store in
//! a single transaction. Every planned record carries an `origin_key`. The
//! store inserts with `ON CONFLICT(origin_key) DO NOTHING`, so replaying a
//! plan after a partial failure never duplicates anything.
//!
//! Keys include the analysis version, so a deliberate resubmission produces
//! a fresh set (including a new case when the new analysis is critical) while
//! a replay of the same version produces nothing.

use serde::{Deserialize, Serialize};

use crate::entities::{AnalysisResult, CriticalInsight, RecommendedResource};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedInsight {
    pub origin_key: String,
    pub user_id: String,
    pub content: String,
}

/// A pending AI goal (`source = ai`, `status = pending`, `progress = 0`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedGoal {
    pub origin_key: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub resource: Option<RecommendedResource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedCase {
    pub origin_key: String,
    pub insight: CriticalInsight,
}

/// Everything one accepted analysis creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanOutPlan {
    pub session_id: String,
    pub analysis_version: u32,
    pub insights: Vec<PlannedInsight>,
    pub goals: Vec<PlannedGoal>,
    pub case: Option<PlannedCase>,
}

impl FanOutPlan {
    /// Build the plan for `analysis`, accepted on `session_id` at `analysis_version`.
    ///
    /// Insights go to the employee; goals go to `goal_owner` (the session's
    /// supervisor).
    #[must_use]
    pub fn build(
        session_id: &str,
        analysis_version: u32,
        employee_id: &str,
        goal_owner: &str,
        analysis: &AnalysisResult,
    ) -> Self {
        let insights = analysis
            .employee_insights
            .iter()
            .enumerate()
            .map(|(idx, content)| PlannedInsight {
                origin_key: insight_key(session_id, analysis_version, idx),
                user_id: employee_id.to_string(),
                content: content.clone(),
            })
            .collect();

        let goals = analysis
            .coaching_recommendations
            .iter()
            .enumerate()
            .map(|(idx, rec)| PlannedGoal {
                origin_key: goal_key(session_id, analysis_version, idx),
                user_id: goal_owner.to_string(),
                title: rec.title.clone(),
                description: rec.description.clone(),
                resource: rec.recommended_resource.clone(),
            })
            .collect();

        let case = analysis
            .critical_coaching_insight
            .as_ref()
            .map(|insight| PlannedCase {
                origin_key: case_key(session_id, analysis_version),
                insight: insight.clone(),
            });

        Self {
            session_id: session_id.to_string(),
            analysis_version,
            insights,
            goals,
            case,
        }
    }

    /// Total number of records the plan creates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.insights.len() + self.goals.len() + usize::from(self.case.is_some())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[must_use]
pub fn insight_key(session_id: &str, version: u32, idx: usize) -> String {
    format!("{session_id}:v{version}:insight:{idx}")
}

#[must_use]
pub fn goal_key(session_id: &str, version: u32, idx: usize) -> String {
    format!("{session_id}:v{version}:goal:{idx}")
}

#[must_use]
pub fn case_key(session_id: &str, version: u32) -> String {
    format!("{session_id}:v{version}:case")
}
