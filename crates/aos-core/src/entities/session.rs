use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::AnalysisResult;
use crate::enums::{GrowthTrajectory, MeetingLocation, SessionStatus};
use crate::errors::CoreError;

/// One scheduled or submitted one-on-one.
///
/// `analysis_version` counts how many times the session has entered
/// `analyzing`; derived entities are keyed on it so a retry of the same
/// version never duplicates them.
///
/// `analysis` is the latest accepted analysis and `accepted_version` the
/// version it was accepted at. A resubmission leaves both in place until its
/// own analysis is accepted, so a failed retry never orphans the records the
/// earlier analysis produced.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Session {
    pub id: String,
    pub supervisor_id: String,
    pub supervisor_name: String,
    pub employee_id: String,
    pub employee_name: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub meeting_location: MeetingLocation,
    pub status: SessionStatus,
    pub feedback: Option<FeedbackPayload>,
    pub analysis: Option<AnalysisResult>,
    pub analysis_version: u32,
    #[serde(default)]
    pub accepted_version: Option<u32>,
    pub error: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// The analysis accepted for the current `analysis_version`, if any.
    ///
    /// While a resubmission is in flight this is `None` even though
    /// `analysis` still holds the previous version's result.
    #[must_use]
    pub fn current_analysis(&self) -> Option<&AnalysisResult> {
        if self.accepted_version == Some(self.analysis_version) {
            self.analysis.as_ref()
        } else {
            None
        }
    }
}

/// Supervisor-entered observations about a one-on-one.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(default)]
pub struct FeedbackPayload {
    pub meeting_location: MeetingLocation,
    /// How the feedback was delivered, 1 (harsh) to 5 (constructive).
    #[schemars(range(min = 1, max = 5))]
    pub feedback_tone: u8,
    /// How well the employee received it, 1 to 5.
    #[schemars(range(min = 1, max = 5))]
    pub reception_quality: u8,
    pub growth_trajectory: GrowthTrajectory,
    /// Free-form tags such as `Fatigue`, `Anxiety`, `Overwhelm`.
    pub stress_signs: Vec<String>,
    pub expressed_aspirations: String,
    pub appreciation_given: bool,
    pub detailed_notes: String,
    pub transcript: String,
    pub daily_recording_url: String,
}

impl Default for FeedbackPayload {
    fn default() -> Self {
        Self {
            meeting_location: MeetingLocation::default(),
            feedback_tone: 3,
            reception_quality: 3,
            growth_trajectory: GrowthTrajectory::default(),
            stress_signs: Vec::new(),
            expressed_aspirations: String::new(),
            appreciation_given: false,
            detailed_notes: String::new(),
            transcript: String::new(),
            daily_recording_url: String::new(),
        }
    }
}

impl FeedbackPayload {
    /// Check the 1-5 rating bounds.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if either rating is out of range.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (field, rating) in [
            ("feedback_tone", self.feedback_tone),
            ("reception_quality", self.reception_quality),
        ] {
            if !(1..=5).contains(&rating) {
                return Err(CoreError::Validation(format!(
                    "{field} must be between 1 and 5, got {rating}"
                )));
            }
        }
        Ok(())
    }
}

/// A feedback submission as received from the caller.
///
/// Without `session_id` a new session is created; with one, the feedback is
/// upserted onto that session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FeedbackSubmission {
    #[serde(default)]
    pub session_id: Option<String>,
    pub employee_id: String,
    pub employee_name: String,
    #[serde(flatten)]
    pub feedback: FeedbackPayload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_defaults_fill_missing_fields() {
        let sub: FeedbackSubmission = serde_json::from_value(serde_json::json!({
            "employee_id": "emp-001",
            "employee_name": "Alex Rivera",
            "stress_signs": ["burnout"]
        }))
        .unwrap();
        assert!(sub.session_id.is_none());
        assert_eq!(sub.feedback.feedback_tone, 3);
        assert_eq!(sub.feedback.reception_quality, 3);
        assert_eq!(sub.feedback.meeting_location, MeetingLocation::Office);
        assert_eq!(sub.feedback.growth_trajectory, GrowthTrajectory::Growing);
        assert_eq!(sub.feedback.stress_signs, vec!["burnout".to_string()]);
    }

    #[test]
    fn current_analysis_tracks_the_accepted_version() {
        let mut session: Session = serde_json::from_value(serde_json::json!({
            "id": "ses-1",
            "supervisor_id": "tl-001",
            "supervisor_name": "Taylor Chen",
            "employee_id": "emp-001",
            "employee_name": "Alex Rivera",
            "scheduled_at": null,
            "meeting_location": "office",
            "status": "analyzing",
            "feedback": null,
            "analysis": null,
            "analysis_version": 2,
            "error": null,
            "submitted_at": null,
            "created_at": "2026-01-05T10:00:00Z",
            "updated_at": "2026-01-05T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(session.accepted_version, None);
        assert!(session.current_analysis().is_none());

        session.analysis = Some(AnalysisResult {
            supervisor_summary: "s".into(),
            employee_summary: "e".into(),
            leadership_score: 6.0,
            effectiveness_score: 6.0,
            swot_analysis: crate::entities::SwotAnalysis::default(),
            strengths_observed: vec![],
            coaching_recommendations: vec![],
            action_items: vec![],
            missed_signals: vec![],
            critical_coaching_insight: None,
            employee_insights: vec![],
        });
        session.accepted_version = Some(1);
        assert!(session.current_analysis().is_none());

        session.accepted_version = Some(2);
        assert!(session.current_analysis().is_some());
    }

    #[test]
    fn ratings_outside_one_to_five_fail_validation() {
        let payload = FeedbackPayload {
            feedback_tone: 0,
            ..FeedbackPayload::default()
        };
        assert!(payload.validate().is_err());

        let payload = FeedbackPayload {
            reception_quality: 6,
            ..FeedbackPayload::default()
        };
        let err = payload.validate().unwrap_err();
        assert!(err.to_string().contains("reception_quality"));

        assert!(FeedbackPayload::default().validate().is_ok());
    }
}
