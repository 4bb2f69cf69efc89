//! `ChatOracle` against a mock chat-completions server.

use pretty_assertions::assert_eq;
use wiremock::matchers::{bearer_token, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aos_core::entities::{FeedbackPayload, User};
use aos_core::enums::Role;
use aos_oracle::{AnalysisContext, AnalysisGateway, ChatOracle, ChatOracleConfig, OracleError};

const ANALYSIS: &str = r#"{
    "supervisor_summary": "Good session.",
    "employee_summary": "Nice progress.",
    "leadership_score": 6,
    "effectiveness_score": 7,
    "swot_analysis": {"strengths": [], "weaknesses": [], "opportunities": [], "threats": []},
    "strengths_observed": [],
    "coaching_recommendations": [{"title": "Delegate more", "description": "Hand off one task a week"}],
    "action_items": [],
    "missed_signals": [],
    "critical_coaching_insight": {
        "summary": "Burnout risk",
        "reason_for_criticality": "Mentioned exhaustion",
        "severity": "high",
        "suggested_immediate_action": "Reduce on-call load"
    },
    "employee_insights": ["Insight one", "Insight two", "Insight three"]
}"#;

fn oracle(server: &MockServer) -> ChatOracle {
    ChatOracle::new(ChatOracleConfig {
        base_url: server.uri(),
        api_key: "sk-test".into(),
        model: "gemini-2.5-flash".into(),
        temperature: 0.2,
    })
    .unwrap()
}

fn ctx() -> AnalysisContext {
    AnalysisContext {
        session_id: "ses-00000001".into(),
        employee: User {
            id: "emp-001".into(),
            name: "Alex Rivera".into(),
            role: Role::Employee,
            team: "Engineering".into(),
            scores: None,
            trends: None,
        },
        feedback: FeedbackPayload {
            stress_signs: vec!["burnout".into()],
            ..FeedbackPayload::default()
        },
        active_goal_titles: vec![],
    }
}

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

#[tokio::test]
async fn parses_fenced_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(bearer_token("sk-test"))
        .and(body_partial_json(serde_json::json!({"model": "gemini-2.5-flash"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion(&format!("```json\n{ANALYSIS}\n```"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let analysis = oracle(&server).analyze(&ctx()).await.unwrap();
    assert_eq!(analysis.employee_insights.len(), 3);
    assert_eq!(
        analysis.critical_coaching_insight.unwrap().severity,
        "high"
    );
}

#[tokio::test]
async fn server_error_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = oracle(&server).analyze(&ctx()).await.unwrap_err();
    assert!(matches!(err, OracleError::Api { status: 502, .. }));
}

#[tokio::test]
async fn prose_reply_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("I think it went well!")))
        .mount(&server)
        .await;

    let err = oracle(&server).analyze(&ctx()).await.unwrap_err();
    assert!(err.is_malformed());
}

#[tokio::test]
async fn missing_choices_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
        .mount(&server)
        .await;

    let err = oracle(&server).analyze(&ctx()).await.unwrap_err();
    assert!(err.is_malformed());
}

#[tokio::test]
async fn unreachable_server_is_unavailable() {
    // wiremock pools MockServers, so dropping one does not close its port;
    // bind and release a listener to get an address that refuses connections.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let oracle = ChatOracle::new(ChatOracleConfig {
        base_url: format!("http://127.0.0.1:{port}"),
        api_key: "sk-test".into(),
        model: "gemini-2.5-flash".into(),
        temperature: 0.2,
    })
    .unwrap();

    let err = oracle.analyze(&ctx()).await.unwrap_err();
    assert!(matches!(err, OracleError::Unavailable(_)));
}
