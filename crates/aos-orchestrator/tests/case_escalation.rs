//! Case actions through `EscalationEngine`.

mod common;

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::{assert_eq, assert_ne};
use rstest::rstest;

use aos_core::entities::CriticalCase;
use aos_core::enums::CaseStatus;
use aos_core::escalation::TransitionPolicy;
use aos_db::retry::RetryConfig;
use aos_db::service::AosService;
use aos_orchestrator::{EscalationEngine, FeedbackOrchestrator, OrchestratorError};

use common::{Reply, ScriptedGateway, analysis, seeded_service, submission};

fn engine(policy: TransitionPolicy) -> EscalationEngine {
    EscalationEngine::new(
        policy,
        RetryConfig {
            max_attempts: 8,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        },
    )
}

/// Submit feedback whose analysis carries a critical insight; return the case.
async fn open_case(svc: &AosService) -> CriticalCase {
    let gateway = Arc::new(ScriptedGateway::new([Reply::Analysis(analysis(3, 0, true))]));
    let resp = FeedbackOrchestrator::new(gateway, Duration::from_secs(1))
        .submit(svc, &submission(None))
        .await
        .unwrap();
    svc.get_case(&resp.case_id.unwrap()).await.unwrap()
}

async fn act_all(svc: &AosService, engine: &EscalationEngine, id: &str, actions: &[&str]) -> CriticalCase {
    let mut last = None;
    for action in actions {
        last = Some(engine.act(svc, id, action, "", "").await.unwrap());
    }
    last.unwrap()
}

// ---------------------------------------------------------------------------
// Permissive policy
// ---------------------------------------------------------------------------

#[rstest]
#[case(&["supervisor_respond"], CaseStatus::PendingEmployee, 2)]
#[case(&["supervisor_respond", "employee_satisfied"], CaseStatus::Resolved, 2)]
#[case(&["supervisor_respond", "employee_not_satisfied"], CaseStatus::PendingAm, 3)]
#[case(&["supervisor_respond", "employee_not_satisfied", "am_coach_supervisor"], CaseStatus::PendingSupervisorRetry, 3)]
#[case(&["supervisor_respond", "employee_not_satisfied", "am_address_directly"], CaseStatus::PendingEmployee, 3)]
#[case(&["supervisor_respond", "employee_not_satisfied", "am_escalate", "manager_review"], CaseStatus::PendingHr, 5)]
#[case(&["supervisor_respond", "employee_not_satisfied", "am_escalate", "manager_review", "hr_address"], CaseStatus::PendingEmployee, 5)]
#[case(&["supervisor_respond", "employee_not_satisfied", "am_escalate", "manager_review", "hr_final"], CaseStatus::Resolved, 5)]
#[tokio::test]
async fn action_paths(#[case] actions: &[&str], #[case] status: CaseStatus, #[case] level: u8) {
    let svc = seeded_service().await;
    let case = open_case(&svc).await;
    let engine = engine(TransitionPolicy::Permissive);

    let after = act_all(&svc, &engine, &case.id, actions).await;
    assert_eq!(after.status(), status);
    assert_eq!(after.level(), level);
    assert_eq!(after.timeline.len(), actions.len() + 1);

    let stored = svc.get_case(&case.id).await.unwrap();
    assert_eq!(stored, after);
}

#[tokio::test]
async fn unknown_action_only_grows_the_timeline() {
    let svc = seeded_service().await;
    let case = open_case(&svc).await;
    let engine = engine(TransitionPolicy::Permissive);

    let after = engine
        .act(&svc, &case.id, "reassign_to_ceo", "escalate please", "private")
        .await
        .unwrap();
    assert_eq!(after.escalation, case.escalation);
    assert_eq!(after.timeline.len(), 2);
    let entry = after.timeline.last().unwrap();
    assert_eq!(entry.actor, "reassign_to_ceo");
    assert_eq!(entry.response, "escalate please");
    assert_eq!(entry.private_notes, "private");
}

#[tokio::test]
async fn missing_case_is_case_not_found() {
    let svc = seeded_service().await;
    let err = engine(TransitionPolicy::Permissive)
        .act(&svc, "cas-missing0", "supervisor_respond", "", "")
        .await
        .unwrap_err();
    assert!(matches!(err, OrchestratorError::CaseNotFound(id) if id == "cas-missing0"));
}

#[tokio::test]
async fn concurrent_actions_all_reach_the_timeline() {
    let svc = seeded_service().await;
    let case = open_case(&svc).await;
    let engine = engine(TransitionPolicy::Permissive);

    let (a, b, c) = tokio::join!(
        engine.act(&svc, &case.id, "supervisor_respond", "first", ""),
        engine.act(&svc, &case.id, "comment", "second", ""),
        engine.act(&svc, &case.id, "comment", "third", ""),
    );
    a.unwrap();
    b.unwrap();
    c.unwrap();

    let stored = svc.get_case(&case.id).await.unwrap();
    assert_eq!(stored.timeline.len(), 4);
    assert_eq!(stored.version, 3);
    let mut responses: Vec<_> = stored.timeline[1..].iter().map(|e| e.response.as_str()).collect();
    responses.sort_unstable();
    assert_eq!(responses, vec!["first", "second", "third"]);
}

// ---------------------------------------------------------------------------
// Strict policy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn strict_rejects_without_writing() {
    let svc = seeded_service().await;
    let case = open_case(&svc).await;
    let engine = engine(TransitionPolicy::Strict);

    let err = engine
        .act(&svc, &case.id, "hr_final", "", "")
        .await
        .unwrap_err();
    assert!(matches!(err, OrchestratorError::IllegalTransition { .. }));

    let stored = svc.get_case(&case.id).await.unwrap();
    assert_eq!(stored, case);
}

#[tokio::test]
async fn strict_allows_the_legal_ladder() {
    let svc = seeded_service().await;
    let case = open_case(&svc).await;
    let engine = engine(TransitionPolicy::Strict);

    let after = act_all(
        &svc,
        &engine,
        &case.id,
        &["supervisor_respond", "employee_not_satisfied", "am_escalate", "manager_review", "hr_final"],
    )
    .await;
    assert_eq!(after.status(), CaseStatus::Resolved);
    assert_eq!(after.level(), 5);

    let err = engine
        .act(&svc, &case.id, "supervisor_respond", "", "")
        .await
        .unwrap_err();
    assert!(matches!(err, OrchestratorError::IllegalTransition { .. }));
}

#[tokio::test]
async fn new_critical_analysis_after_resolution_opens_a_fresh_case() {
    let svc = seeded_service().await;
    let engine = engine(TransitionPolicy::Permissive);
    let gateway = Arc::new(ScriptedGateway::new([
        Reply::Analysis(analysis(1, 0, true)),
        Reply::Analysis(analysis(1, 0, true)),
    ]));
    let orch = FeedbackOrchestrator::new(gateway, Duration::from_secs(1));

    let first = orch.submit(&svc, &submission(None)).await.unwrap();
    let first_case = first.case_id.unwrap();
    let resolved = act_all(&svc, &engine, &first_case, &["supervisor_respond", "employee_satisfied"]).await;
    assert_eq!(resolved.status(), CaseStatus::Resolved);

    let second = orch
        .submit(&svc, &submission(Some(&first.session_id)))
        .await
        .unwrap();
    let fresh = svc.get_case(&second.case_id.unwrap()).await.unwrap();
    assert_ne!(fresh.id, first_case);
    assert_eq!(fresh.status(), CaseStatus::PendingSupervisor);
    assert_eq!(fresh.level(), 1);
    assert_eq!(fresh.timeline.len(), 1);

    // The resolved case is untouched.
    assert_eq!(svc.get_case(&first_case).await.unwrap(), resolved);
}
