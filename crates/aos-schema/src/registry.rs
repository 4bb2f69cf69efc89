//! Central schema registry for all AccountabilityOS types.

use std::collections::HashMap;

use aos_core::enums::EntityType;
use schemars::schema_for;

use crate::error::SchemaError;

/// Named JSON Schemas generated from `aos-core` types.
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, serde_json::Value>,
}

/// Insert a schema into the map. `schemars` output always serializes, so the
/// conversion cannot fail in practice.
macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert($name, serde_json::to_value(schema_for!($ty)).unwrap());
    };
}

impl SchemaRegistry {
    /// Build a registry with every entity, oracle, trail, response, and
    /// audit-detail schema.
    ///
    /// # Panics
    ///
    /// Panics if `serde_json::to_value` fails on a `schemars`-generated
    /// schema, which does not happen for derived schemas.
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        // --- Entities ---
        register!(schemas, "user", aos_core::entities::User);
        register!(schemas, "session", aos_core::entities::Session);
        register!(schemas, "insight", aos_core::entities::Insight);
        register!(schemas, "coaching_goal", aos_core::entities::CoachingGoal);
        register!(schemas, "critical_case", aos_core::entities::CriticalCase);
        register!(schemas, "audit_entry", aos_core::entities::AuditEntry);

        // --- Inputs ---
        register!(schemas, "analysis_result", aos_core::entities::AnalysisResult);
        register!(
            schemas,
            "feedback_submission",
            aos_core::entities::FeedbackSubmission
        );

        // --- Trail envelope ---
        register!(schemas, "trail_operation", aos_core::trail::TrailOperation);

        // --- Responses ---
        register!(
            schemas,
            "submit_feedback_response",
            aos_core::responses::SubmitFeedbackResponse
        );
        register!(schemas, "seed_report", aos_core::responses::SeedReport);
        register!(schemas, "recovery_report", aos_core::responses::RecoveryReport);
        register!(
            schemas,
            "dashboard_response",
            aos_core::responses::DashboardResponse
        );

        // --- Audit details ---
        register!(
            schemas,
            "status_changed_detail",
            aos_core::audit_detail::StatusChangedDetail
        );
        register!(
            schemas,
            "case_action_detail",
            aos_core::audit_detail::CaseActionDetail
        );
        register!(
            schemas,
            "check_in_detail",
            aos_core::audit_detail::CheckInDetail
        );
        register!(schemas, "fan_out_detail", aos_core::audit_detail::FanOutDetail);
        register!(schemas, "seeded_detail", aos_core::audit_detail::SeededDetail);

        Self { schemas }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas.get(name)
    }

    /// Validate a JSON value against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the schema name is unknown, or
    /// `SchemaError::ValidationFailed` listing every violation.
    pub fn validate(&self, name: &str, instance: &serde_json::Value) -> Result<(), SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        let validator = jsonschema::validator_for(schema)
            .map_err(|e| SchemaError::Generation(format!("{e}")))?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| format!("{e}"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }

    /// All registered schema names, sorted.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Schema name for the full representation of an entity type.
#[must_use]
pub const fn entity_schema_name(entity: EntityType) -> &'static str {
    match entity {
        EntityType::User => "user",
        EntityType::Session => "session",
        EntityType::Insight => "insight",
        EntityType::Goal => "coaching_goal",
        EntityType::Case => "critical_case",
        EntityType::Audit => "audit_entry",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aos_core::entities::{CriticalCase, CriticalInsight, Insight};
    use aos_core::enums::TrailOp;
    use aos_core::trail::TrailOperation;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new()
    }

    fn valid_analysis() -> serde_json::Value {
        serde_json::json!({
            "supervisor_summary": "Clear agenda, little probing.",
            "employee_summary": "Engaged but tired.",
            "leadership_score": 6,
            "effectiveness_score": 7.5,
            "swot_analysis": {
                "strengths": ["Preparation"],
                "weaknesses": [],
                "opportunities": [],
                "threats": ["Burnout"]
            },
            "coaching_recommendations": [{
                "title": "Ask follow-up questions",
                "description": "Probe stress signals when they come up",
                "recommended_resource": {"type": "book", "title": "Just Listen"}
            }],
            "employee_insights": ["You delivered the migration early."]
        })
    }

    #[test]
    fn registry_has_expected_count() {
        // 6 entities + 2 inputs + 1 trail + 4 responses + 5 audit details
        assert_eq!(registry().schema_count(), 18);
    }

    #[test]
    fn registry_list_is_sorted() {
        let names = registry().list();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn every_entity_type_has_a_schema() {
        let reg = registry();
        for entity in [
            EntityType::User,
            EntityType::Session,
            EntityType::Insight,
            EntityType::Goal,
            EntityType::Case,
            EntityType::Audit,
        ] {
            assert!(
                reg.get(entity_schema_name(entity)).is_some(),
                "missing schema for {entity}"
            );
        }
    }

    #[test]
    fn validate_valid_insight() {
        let insight = Insight {
            id: "ins-test1234".into(),
            user_id: "emp-001".into(),
            session_id: None,
            content: "Keep leveraging structured agendas.".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&insight).unwrap();
        assert!(registry().validate("insight", &json).is_ok());
    }

    #[test]
    fn validate_valid_case() {
        let case = CriticalCase::open(
            "cas-test1234".into(),
            "ses-test1234".into(),
            CriticalInsight {
                summary: "Burnout risk".into(),
                reason_for_criticality: String::new(),
                severity: "high".into(),
                suggested_immediate_action: String::new(),
            },
            Utc::now(),
        );
        let json = serde_json::to_value(&case).unwrap();
        assert!(registry().validate("critical_case", &json).is_ok());
    }

    #[test]
    fn analysis_with_minimal_fields_conforms() {
        assert!(registry().validate("analysis_result", &valid_analysis()).is_ok());
    }

    #[test]
    fn analysis_missing_scores_is_rejected() {
        let mut reply = valid_analysis();
        reply.as_object_mut().unwrap().remove("leadership_score");
        let result = registry().validate("analysis_result", &reply);
        match result {
            Err(SchemaError::ValidationFailed { errors }) => assert!(!errors.is_empty()),
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn analysis_with_wrong_types_is_rejected() {
        let mut reply = valid_analysis();
        reply["employee_insights"] = serde_json::json!("not a list");
        assert!(registry().validate("analysis_result", &reply).is_err());
    }

    #[test]
    fn validate_rejects_invalid_enum() {
        let invalid = serde_json::json!({
            "id": "emp-009",
            "name": "Riley",
            "role": "overlord",
            "team": "Ops",
            "scores": null,
            "trends": null
        });
        assert!(registry().validate("user", &invalid).is_err());
    }

    #[test]
    fn validate_valid_trail_operation() {
        let op = TrailOperation {
            v: 1,
            ts: "2026-02-08T12:00:00Z".into(),
            stream: "ses-00000000".into(),
            op: TrailOp::Create,
            entity: EntityType::Insight,
            id: "ins-test1234".into(),
            data: serde_json::json!({"content": "test"}),
        };
        let json = serde_json::to_value(&op).unwrap();
        assert!(registry().validate("trail_operation", &json).is_ok());
    }

    #[test]
    fn validate_nonexistent_schema_returns_not_found() {
        let result = registry().validate("bogus", &serde_json::json!({}));
        assert!(matches!(result, Err(SchemaError::NotFound(_))));
    }
}
