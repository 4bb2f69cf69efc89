//! Record store integration tests.
//!
//! Drives the public `AosService` API end to end:
//! - Submission lifecycle: schedule, write-ahead, accept, fan-out
//! - Case actions through the compare-and-swap retry loop
//! - Goal lifecycle on fan-out goals
//! - On-disk database with the JSONL trail enabled

use std::time::Duration;

use chrono::Utc;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use aos_core::entities::{AnalysisResult, CoachingRecommendation, CriticalInsight, FeedbackPayload, StrengthObserved, SwotAnalysis};
use aos_core::enums::{AmReviewDecision, AuditAction, CaseStatus, GoalStatus, SessionStatus, TrailOp};
use aos_core::escalation::{TransitionPolicy, plan};
use aos_core::fanout::FanOutPlan;
use aos_db::error::DatabaseError;
use aos_db::repos::audit::AuditFilter;
use aos_db::repos::session::NewSession;
use aos_db::retry::{RetryConfig, retry_on_conflict};
use aos_db::service::AosService;

async fn test_service() -> AosService {
    AosService::new_local(":memory:", None).await.unwrap()
}

fn analysis(critical: bool) -> AnalysisResult {
    AnalysisResult {
        supervisor_summary: "Productive check-in".into(),
        employee_summary: "You are growing fast".into(),
        leadership_score: 7.5,
        effectiveness_score: 8.0,
        swot_analysis: SwotAnalysis::default(),
        strengths_observed: vec![StrengthObserved { action: "Clear agenda".into(), example: "Shared the agenda up front".into() }],
        coaching_recommendations: vec![CoachingRecommendation {
            title: "Ask more open questions".into(),
            description: "Use what/how prompts".into(),
            recommended_resource: None,
        }],
        action_items: vec![],
        missed_signals: vec![],
        critical_coaching_insight: critical.then(|| CriticalInsight {
            summary: "Possible burnout".into(),
            reason_for_criticality: "Mentioned late nights twice".into(),
            severity: "high".into(),
            suggested_immediate_action: "Review workload this week".into(),
        }),
        employee_insights: vec!["Strong ownership".into(), "Share wins earlier".into()],
    }
}

/// Schedule, submit, accept, and fan out; returns the applied plan.
async fn completed_submission(svc: &AosService, critical: bool) -> FanOutPlan {
    let session = svc
        .schedule_session(&NewSession::for_employee("emp-001", "Alex Rivera"))
        .await
        .unwrap();
    let session = svc
        .begin_analysis(&session.id, "emp-001", "Alex Rivera", &FeedbackPayload::default())
        .await
        .unwrap();
    let accepted = analysis(critical);
    svc.store_accepted_analysis(&session.id, session.analysis_version, &accepted)
        .await
        .unwrap();
    let plan = FanOutPlan::build(
        &session.id,
        session.analysis_version,
        &session.employee_id,
        &session.supervisor_id,
        &accepted,
    );
    svc.apply_fan_out(&plan).await.unwrap();
    plan
}

async fn act(svc: &AosService, case_id: &str, action: &str) -> Result<aos_core::entities::CriticalCase, DatabaseError> {
    let retry = RetryConfig {
        max_attempts: 5,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(4),
    };
    retry_on_conflict(&retry, "case action", move |_| async move {
        let case = svc.get_case(case_id).await?;
        let t = plan(case.escalation, action, "", "", Utc::now(), TransitionPolicy::Permissive)?;
        svc.apply_case_transition(&case, &t).await
    })
    .await
}

// ---------------------------------------------------------------------------
// Submission lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submission_completes_with_stored_analysis() {
    let svc = test_service().await;
    let plan = completed_submission(&svc, false).await;

    let session = svc.get_session(&plan.session_id).await.unwrap();
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(session.analysis, Some(analysis(false)));
    assert_eq!(svc.insights_for_session(&session.id).await.unwrap().len(), 2);
    assert!(svc.case_for_session(&session.id).await.unwrap().is_none());
}

#[tokio::test]
async fn stalled_sessions_only_lists_analyzing() {
    let svc = test_service().await;
    completed_submission(&svc, false).await;

    let stuck = svc
        .schedule_session(&NewSession::for_employee("emp-002", "Jordan Kim"))
        .await
        .unwrap();
    svc.begin_analysis(&stuck.id, "emp-002", "Jordan Kim", &FeedbackPayload::default())
        .await
        .unwrap();

    let stalled = svc.stalled_sessions(None).await.unwrap();
    assert_eq!(stalled.len(), 1);
    assert_eq!(stalled[0].id, stuck.id);
    assert!(stalled[0].analysis.is_none());
}

#[tokio::test]
async fn error_then_resubmit_bumps_version() {
    let svc = test_service().await;
    let session = svc
        .schedule_session(&NewSession::for_employee("emp-001", "Alex Rivera"))
        .await
        .unwrap();
    let v1 = svc
        .begin_analysis(&session.id, "emp-001", "Alex Rivera", &FeedbackPayload::default())
        .await
        .unwrap();
    let errored = svc
        .mark_session_error(&session.id, v1.analysis_version, "oracle timed out")
        .await
        .unwrap();
    assert_eq!(errored.status, SessionStatus::Error);

    let v2 = svc
        .begin_analysis(&session.id, "emp-001", "Alex Rivera", &FeedbackPayload::default())
        .await
        .unwrap();
    assert_eq!(v2.analysis_version, v1.analysis_version + 1);
    assert!(v2.error.is_none());

    // A late result for v1 is refused.
    let late = svc
        .store_accepted_analysis(&session.id, v1.analysis_version, &analysis(false))
        .await
        .unwrap_err();
    assert!(matches!(late, DatabaseError::Conflict(_)));
}

// ---------------------------------------------------------------------------
// Case actions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn case_walks_to_hr_and_resolves() {
    let svc = test_service().await;
    let plan = completed_submission(&svc, true).await;
    let case = svc.case_for_session(&plan.session_id).await.unwrap().unwrap();

    for action in [
        "supervisor_respond",
        "employee_not_satisfied",
        "am_escalate",
        "manager_review",
        "hr_final",
    ] {
        act(&svc, &case.id, action).await.unwrap();
    }

    let done = svc.get_case(&case.id).await.unwrap();
    assert_eq!(done.status(), CaseStatus::Resolved);
    assert_eq!(done.level(), 5);
    assert_eq!(done.timeline.len(), 6);
    assert_eq!(done.version, 5);
}

#[tokio::test]
async fn interleaved_acts_keep_every_timeline_entry() {
    let svc = test_service().await;
    let plan = completed_submission(&svc, true).await;
    let case = svc.case_for_session(&plan.session_id).await.unwrap().unwrap();

    let (a, b) = tokio::join!(
        act(&svc, &case.id, "supervisor_respond"),
        act(&svc, &case.id, "note_added")
    );
    a.unwrap();
    b.unwrap();

    let after = svc.get_case(&case.id).await.unwrap();
    assert_eq!(after.timeline.len(), 3);
    assert_eq!(after.version, 2);

    let audits = svc
        .query_audit(&AuditFilter {
            entity_id: Some(case.id.clone()),
            action: Some(AuditAction::CaseAction),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(audits.len(), 2);
}

// ---------------------------------------------------------------------------
// Goals from fan-out
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ai_goal_decline_and_review() {
    let svc = test_service().await;
    completed_submission(&svc, false).await;
    let goal = svc
        .list_goals(&aos_db::repos::goal::GoalFilter {
            user_id: Some("tl-001".into()),
            ..Default::default()
        })
        .await
        .unwrap()
        .remove(0);
    assert_eq!(goal.status, GoalStatus::Pending);

    svc.decline_goal(&goal.id, "Already doing this").await.unwrap();
    let upheld = svc
        .review_decline(&goal.id, AmReviewDecision::UpholdAi)
        .await
        .unwrap();
    assert_eq!(upheld.status, GoalStatus::Active);
    let progressed = svc.update_progress(&goal.id, 40, "Tried it twice").await.unwrap();
    assert_eq!(progressed.check_ins.len(), 1);
}

// ---------------------------------------------------------------------------
// On-disk store and trail
// ---------------------------------------------------------------------------

#[tokio::test]
async fn on_disk_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("store").join("aos.db");
    let db_path = db_path.to_str().unwrap();
    let trail_dir = dir.path().join("trail");

    let session_id = {
        let svc = AosService::new_local(db_path, Some(trail_dir.clone())).await.unwrap();
        completed_submission(&svc, true).await.session_id
    };

    let svc = AosService::new_local(db_path, Some(trail_dir)).await.unwrap();
    let session = svc.get_session(&session_id).await.unwrap();
    assert_eq!(session.status, SessionStatus::Completed);

    let ops = svc.trail().read_stream(&session_id).unwrap();
    assert!(ops.iter().any(|op| op.op == TrailOp::Transition));
    assert!(ops.iter().all(|op| op.stream == session_id));
}

#[tokio::test]
async fn disabled_trail_writes_nothing() {
    let svc = test_service().await;
    assert!(!svc.trail().is_enabled());
    let plan = completed_submission(&svc, true).await;
    assert!(svc.trail().read_stream(&plan.session_id).unwrap().is_empty());
}
