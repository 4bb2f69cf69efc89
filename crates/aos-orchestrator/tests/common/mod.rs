//! Shared fixtures: a scripted gateway and a seeded in-memory store.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use aos_core::entities::{
    AnalysisResult, CoachingRecommendation, CriticalInsight, FeedbackPayload, FeedbackSubmission,
    RecommendedResource, SwotAnalysis,
};
use aos_db::service::AosService;
use aos_oracle::{AnalysisContext, AnalysisGateway, OracleError};

/// What the scripted gateway does on its next call.
pub enum Reply {
    Analysis(AnalysisResult),
    Unavailable,
    Malformed,
    /// Never answers; the orchestrator's timeout must fire.
    Hang,
}

/// Gateway that plays back a fixed script and records the contexts it saw.
#[derive(Default)]
pub struct ScriptedGateway {
    script: Mutex<VecDeque<Reply>>,
    seen: Mutex<Vec<AnalysisContext>>,
}

impl ScriptedGateway {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<AnalysisContext> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisGateway for ScriptedGateway {
    async fn analyze(&self, ctx: &AnalysisContext) -> Result<AnalysisResult, OracleError> {
        self.seen.lock().unwrap().push(ctx.clone());
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Reply::Analysis(a)) => Ok(a),
            Some(Reply::Unavailable) => Err(OracleError::Unavailable("connection refused".into())),
            Some(Reply::Malformed) => Err(OracleError::Malformed("reply is not JSON".into())),
            Some(Reply::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(OracleError::Unavailable("unreachable".into()))
            }
            None => Err(OracleError::Unavailable("script exhausted".into())),
        }
    }
}

pub async fn seeded_service() -> AosService {
    let svc = AosService::new_local(":memory:", None).await.unwrap();
    svc.seed_demo_data().await.unwrap();
    svc
}

pub fn analysis(insights: usize, recs: usize, critical: bool) -> AnalysisResult {
    AnalysisResult {
        supervisor_summary: "Supportive, clear next steps.".into(),
        employee_summary: "You are on a good trajectory.".into(),
        leadership_score: 7.0,
        effectiveness_score: 8.0,
        swot_analysis: SwotAnalysis::default(),
        strengths_observed: vec![],
        coaching_recommendations: (0..recs)
            .map(|i| CoachingRecommendation {
                title: format!("Recommendation {i}"),
                description: "Practice weekly".into(),
                recommended_resource: Some(RecommendedResource {
                    kind: "book".into(),
                    title: "Just Listen".into(),
                    author: Some("Mark Goulston".into()),
                }),
            })
            .collect(),
        action_items: vec![],
        missed_signals: vec![],
        critical_coaching_insight: critical.then(|| CriticalInsight {
            summary: "Burnout indicators".into(),
            reason_for_criticality: "Employee described sustained exhaustion".into(),
            severity: "high".into(),
            suggested_immediate_action: "Reduce workload this sprint".into(),
        }),
        employee_insights: (0..insights).map(|i| format!("Insight {i}")).collect(),
    }
}

pub fn submission(session_id: Option<&str>) -> FeedbackSubmission {
    FeedbackSubmission {
        session_id: session_id.map(String::from),
        employee_id: "emp-001".into(),
        employee_name: "Alex Rivera".into(),
        feedback: FeedbackPayload {
            stress_signs: vec!["burnout".into()],
            detailed_notes: "Talked about on-call load".into(),
            ..FeedbackPayload::default()
        },
    }
}

/// Row count of `table`.
pub async fn count(svc: &AosService, table: &str) -> i64 {
    let mut rows = svc
        .db()
        .conn()
        .query(&format!("SELECT COUNT(*) FROM {table}"), ())
        .await
        .unwrap();
    rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap()
}
