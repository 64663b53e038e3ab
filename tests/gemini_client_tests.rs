// Tests for the Gemini scoring client against a local stub server

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    Router,
};
use prep_coach::error::ScoringError;
use prep_coach::scoring::{
    GeminiScoringService, ScoringRequester, ScoringService, FALLBACK_SUMMARY,
};
use prep_coach::session::{Message, Role, Transcript};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const API_KEY: &str = "test-key-4821";

/// One request as seen by the stub
struct Seen {
    path_and_query: String,
    api_key: Option<String>,
    body: serde_json::Value,
}

struct Stub {
    status: StatusCode,
    reply: String,
    seen: Mutex<Vec<Seen>>,
}

async fn stub_reply(
    State(stub): State<Arc<Stub>>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    stub.seen.lock().unwrap().push(Seen {
        path_and_query: uri
            .path_and_query()
            .map(|p| p.to_string())
            .unwrap_or_default(),
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body: serde_json::from_str(&body).unwrap_or(serde_json::Value::Null),
    });
    (stub.status, stub.reply.clone())
}

/// Serve `reply` with `status` on an ephemeral port; returns the base URL
async fn spawn_stub(status: StatusCode, reply: serde_json::Value) -> (String, Arc<Stub>) {
    let stub = Arc::new(Stub {
        status,
        reply: reply.to_string(),
        seen: Mutex::new(Vec::new()),
    });
    let app = Router::new().fallback(stub_reply).with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), stub)
}

fn client(base_url: &str) -> GeminiScoringService {
    GeminiScoringService::new(
        API_KEY.to_string(),
        "gemini-1.5-flash".to_string(),
        base_url.to_string(),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn transcript() -> Transcript {
    Transcript::from(vec![
        Message::new(Role::Assistant, "Why Rust?"),
        Message::new(Role::User, "The borrow checker catches my mistakes."),
    ])
}

#[tokio::test]
async fn test_candidate_parts_are_joined() {
    let (base_url, stub) = spawn_stub(
        StatusCode::OK,
        serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "{\"overallScore\": 6.5, " },
                        { "text": "\"summary\": \"Solid.\"}" }
                    ]
                }
            }]
        }),
    )
    .await;

    let text = client(&base_url).generate("Analyze interview").await.unwrap();
    assert_eq!(text, "{\"overallScore\": 6.5, \"summary\": \"Solid.\"}");

    let seen = stub.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0].path_and_query,
        "/models/gemini-1.5-flash:generateContent"
    );
    assert_eq!(seen[0].api_key.as_deref(), Some(API_KEY));
    assert_eq!(
        seen[0].body["contents"][0]["parts"][0]["text"],
        "Analyze interview"
    );
}

#[tokio::test]
async fn test_requester_parses_gemini_reply() {
    let (base_url, _stub) = spawn_stub(
        StatusCode::OK,
        serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{
                        "text": "```json\n{\"overallScore\": 8, \"summary\": \"Clear answers.\", \"strengths\": [\"Concise\"]}\n```"
                    }]
                }
            }]
        }),
    )
    .await;

    let requester = ScoringRequester::new(Arc::new(client(&base_url)));
    let result = requester.score(None, &transcript()).await;

    assert_eq!(result.overall_score, 8.0);
    assert_eq!(result.summary, "Clear answers.");
    assert_eq!(result.strengths, vec!["Concise".to_string()]);
}

#[tokio::test]
async fn test_error_status_falls_back() {
    let (base_url, _stub) = spawn_stub(
        StatusCode::INTERNAL_SERVER_ERROR,
        serde_json::json!({ "error": { "message": "overloaded" } }),
    )
    .await;

    match client(&base_url).generate("Analyze interview").await {
        Err(ScoringError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.contains("overloaded"));
        }
        other => panic!("Expected status error, got {:?}", other),
    }

    let requester = ScoringRequester::new(Arc::new(client(&base_url)));
    let result = requester.score(None, &transcript()).await;
    assert_eq!(result.overall_score, 0.0);
    assert_eq!(result.summary, FALLBACK_SUMMARY);
}

#[tokio::test]
async fn test_missing_candidates_is_empty_response() {
    let (base_url, _stub) =
        spawn_stub(StatusCode::OK, serde_json::json!({ "candidates": [] })).await;

    let err = client(&base_url).generate("Analyze interview").await.unwrap_err();
    assert!(matches!(err, ScoringError::EmptyResponse));
}

#[tokio::test]
async fn test_transport_error_does_not_leak_api_key() {
    // Nothing listens on port 1
    let err = client("http://127.0.0.1:1")
        .generate("Analyze interview")
        .await
        .unwrap_err();

    assert!(matches!(err, ScoringError::Request(_)));
    let rendered = format!("{} / {:?}", err, err);
    assert!(
        !rendered.contains(API_KEY),
        "API key leaked into error: {}",
        rendered
    );
}
