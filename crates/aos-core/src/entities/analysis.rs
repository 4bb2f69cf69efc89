use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Structured analysis of one session's feedback, as returned by the oracle.
///
/// Owned by the session that produced it and never mutated after it is
/// accepted. List fields default to empty so a reply that omits an empty list
/// still conforms; summaries and both scores are required.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AnalysisResult {
    pub supervisor_summary: String,
    pub employee_summary: String,
    #[schemars(range(min = 1, max = 10))]
    pub leadership_score: f64,
    #[schemars(range(min = 1, max = 10))]
    pub effectiveness_score: f64,
    #[serde(default)]
    pub swot_analysis: SwotAnalysis,
    #[serde(default)]
    pub strengths_observed: Vec<StrengthObserved>,
    #[serde(default)]
    pub coaching_recommendations: Vec<CoachingRecommendation>,
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
    #[serde(default)]
    pub missed_signals: Vec<MissedSignal>,
    #[serde(default)]
    pub critical_coaching_insight: Option<CriticalInsight>,
    #[serde(default)]
    pub employee_insights: Vec<String>,
}

impl AnalysisResult {
    /// Check the bounds that JSON shape alone cannot express.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` naming the first offending field.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (field, score) in [
            ("leadership_score", self.leadership_score),
            ("effectiveness_score", self.effectiveness_score),
        ] {
            if !(1.0..=10.0).contains(&score) {
                return Err(CoreError::Validation(format!(
                    "{field} must be between 1 and 10, got {score}"
                )));
            }
        }
        if let Some(critical) = &self.critical_coaching_insight
            && critical.summary.trim().is_empty()
        {
            return Err(CoreError::Validation(
                "critical_coaching_insight.summary is empty".into(),
            ));
        }
        if self.employee_insights.iter().any(|s| s.trim().is_empty()) {
            return Err(CoreError::Validation(
                "employee_insights contains a blank entry".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SwotAnalysis {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub opportunities: Vec<String>,
    #[serde(default)]
    pub threats: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StrengthObserved {
    pub action: String,
    pub example: String,
}

/// A development recommendation; each one becomes a pending AI goal.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CoachingRecommendation {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub recommended_resource: Option<RecommendedResource>,
}

/// A book, course, or article attached to a recommendation or goal.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RecommendedResource {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
}

/// A follow-up task. `owner` is `supervisor` or `employee`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ActionItem {
    pub task: String,
    pub owner: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MissedSignal {
    pub signal: String,
    pub context: String,
    pub suggested_follow_up: String,
}

/// The payload that opens a critical case.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CriticalInsight {
    pub summary: String,
    #[serde(default)]
    pub reason_for_criticality: String,
    pub severity: String,
    #[serde(default)]
    pub suggested_immediate_action: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> AnalysisResult {
        serde_json::from_value(serde_json::json!({
            "supervisor_summary": "Clear agenda.",
            "employee_summary": "Felt heard.",
            "leadership_score": 7,
            "effectiveness_score": 8.5
        }))
        .unwrap()
    }

    #[test]
    fn omitted_lists_default_to_empty() {
        let result = minimal();
        assert!(result.employee_insights.is_empty());
        assert!(result.coaching_recommendations.is_empty());
        assert!(result.critical_coaching_insight.is_none());
        assert!(result.validate().is_ok());
    }

    #[test]
    fn out_of_range_score_is_rejected() {
        let mut result = minimal();
        result.leadership_score = 11.0;
        let err = result.validate().unwrap_err();
        assert!(err.to_string().contains("leadership_score"));

        result.leadership_score = 0.5;
        assert!(result.validate().is_err());
    }

    #[test]
    fn resource_type_field_is_renamed() {
        let resource: RecommendedResource = serde_json::from_value(serde_json::json!({
            "type": "book",
            "title": "Just Listen",
            "author": "Mark Goulston"
        }))
        .unwrap();
        assert_eq!(resource.kind, "book");
        let back = serde_json::to_value(&resource).unwrap();
        assert_eq!(back["type"], "book");
    }

    #[test]
    fn blank_critical_summary_is_rejected() {
        let mut result = minimal();
        result.critical_coaching_insight = Some(CriticalInsight {
            summary: "  ".into(),
            reason_for_criticality: String::new(),
            severity: "high".into(),
            suggested_immediate_action: String::new(),
        });
        assert!(result.validate().is_err());
    }
}
