//! Shared test utilities for aos-db unit tests.

pub(crate) mod helpers {
    use aos_core::entities::{
        AnalysisResult, CoachingRecommendation, CriticalInsight, FeedbackPayload, Session,
        SwotAnalysis, User,
    };
    use aos_core::enums::Role;

    use crate::AosDb;
    use crate::repos::session::NewSession;
    use crate::service::AosService;
    use crate::trail::writer::TrailWriter;

    /// In-memory service with the trail disabled.
    pub async fn test_service() -> AosService {
        let db = AosDb::open_local(":memory:").await.unwrap();
        AosService::from_db(db, TrailWriter::disabled())
    }

    /// In-memory service writing its trail to `trail_dir`.
    pub async fn test_service_with_trail(trail_dir: std::path::PathBuf) -> AosService {
        let db = AosDb::open_local(":memory:").await.unwrap();
        AosService::from_db(db, TrailWriter::new(trail_dir).unwrap())
    }

    pub fn employee(id: &str) -> User {
        User {
            id: id.into(),
            name: format!("Employee {id}"),
            role: Role::Employee,
            team: "Engineering".into(),
            scores: None,
            trends: None,
        }
    }

    /// Schedule an upcoming session for `emp-001` and return it.
    pub async fn upcoming_session(svc: &AosService) -> Session {
        svc.schedule_session(&NewSession::for_employee("emp-001", "Alex Rivera"))
            .await
            .unwrap()
    }

    /// Move a fresh session into `analyzing` and return it.
    pub async fn analyzing_session(svc: &AosService) -> Session {
        let session = upcoming_session(svc).await;
        svc.begin_analysis(&session.id, "emp-001", "Alex Rivera", &FeedbackPayload::default())
            .await
            .unwrap()
    }

    pub fn analysis(insights: usize, recs: usize, critical: bool) -> AnalysisResult {
        AnalysisResult {
            supervisor_summary: "Supervisor summary".into(),
            employee_summary: "Employee summary".into(),
            leadership_score: 7.0,
            effectiveness_score: 6.5,
            swot_analysis: SwotAnalysis::default(),
            strengths_observed: vec![],
            coaching_recommendations: (0..recs)
                .map(|i| CoachingRecommendation {
                    title: format!("Recommendation {i}"),
                    description: "Practice it weekly".into(),
                    recommended_resource: None,
                })
                .collect(),
            action_items: vec![],
            missed_signals: vec![],
            critical_coaching_insight: critical.then(|| CriticalInsight {
                summary: "Burnout risk".into(),
                reason_for_criticality: "Fatigue in three sessions".into(),
                severity: "high".into(),
                suggested_immediate_action: "Rebalance workload".into(),
            }),
            employee_insights: (0..insights).map(|i| format!("Insight {i}")).collect(),
        }
    }
}
