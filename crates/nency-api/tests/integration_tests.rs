//! Integration tests for the Nency API.
//!
//! Each test builds its own router over recording mock collaborators and
//! drives it with `oneshot`, so nothing touches the network, the browser,
//! or an SMTP server.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use nency_action::handler::mock::{MockCollaborators, MockMode};
use nency_api::create_router;
use nency_api::handlers::{CommandResponse, HealthResponse, HistoryResponse, SessionsResponse};
use nency_api::state::AppState;
use nency_chat::DialogState;
use nency_core::config::NencyConfig;

// =============================================================================
// Helpers
// =============================================================================

fn test_config() -> NencyConfig {
    let mut config = NencyConfig::default();
    config.chat.rate_limit_per_sec = 0;
    config
}

fn make_app_with(config: NencyConfig) -> (axum::Router, MockCollaborators) {
    let mocks = MockCollaborators::new();
    let state = AppState::new(config, mocks.collaborators());
    (create_router(state), mocks)
}

fn make_app() -> (axum::Router, MockCollaborators) {
    make_app_with(test_config())
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::delete(uri).body(Body::empty()).unwrap()
}

async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

async fn json_body<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

async fn command(app: &axum::Router, text: &str, session: Option<Uuid>) -> CommandResponse {
    let mut body = json!({ "command": text });
    if let Some(id) = session {
        body["session_id"] = json!(id);
    }
    let resp = app
        .clone()
        .oneshot(post_json("/process_command", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK, "command {:?}", text);
    json_body(resp).await
}

// =============================================================================
// Page and health
// =============================================================================

#[tokio::test]
async fn test_index_serves_page() {
    let (app, _mocks) = make_app();
    let resp = app.oneshot(get("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"));
    let body = String::from_utf8(body_bytes(resp).await).unwrap();
    assert!(body.starts_with("<!DOCTYPE html>"));
}

#[tokio::test]
async fn test_health() {
    let (app, _mocks) = make_app();
    command(&app, "hello", None).await;

    let resp = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let health: HealthResponse = json_body(resp).await;
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(health.active_sessions, 1);
}

// =============================================================================
// POST /process_command
// =============================================================================

#[tokio::test]
async fn test_command_weather() {
    let (app, mocks) = make_app();
    let resp = command(&app, "weather in Tokyo", None).await;
    assert_eq!(
        resp.response,
        "Current weather in Tokyo, Japan: Partly cloudy with a temperature of 18.0°C (64.4°F)."
    );
    assert_eq!(resp.dialog_state, DialogState::Idle);
    assert_eq!(mocks.weather.lookups(), vec!["Tokyo".to_string()]);
}

#[tokio::test]
async fn test_command_open_site_speech() {
    let (app, mocks) = make_app();
    let resp = command(&app, "open example.com", None).await;
    assert_eq!(resp.response, "Opening https://example.com.");
    assert_eq!(resp.speech, "Opening link");
    assert_eq!(mocks.opener.opened(), vec!["https://example.com".to_string()]);
}

#[tokio::test]
async fn test_command_reuses_session() {
    let (app, _mocks) = make_app();
    let first = command(&app, "tell me a joke", None).await;
    let second = command(&app, "another one", Some(first.session_id)).await;
    assert_eq!(first.session_id, second.session_id);
}

#[tokio::test]
async fn test_command_unknown_session_gets_new_one() {
    let (app, _mocks) = make_app();
    let stale = Uuid::new_v4();
    let resp = command(&app, "tell me a joke", Some(stale)).await;
    assert_ne!(resp.session_id, stale);
}

#[tokio::test]
async fn test_email_dialog_over_http() {
    let (app, mocks) = make_app();

    let r1 = command(&app, "send an email to bob@x.com", None).await;
    assert_eq!(
        r1.response,
        "I'll help you send an email to bob@x.com. What's the subject?"
    );
    assert_eq!(r1.dialog_state, DialogState::AwaitingSubject);

    let r2 = command(&app, "Hello", Some(r1.session_id)).await;
    assert_eq!(r2.response, "Great! Now, what's your message?");
    assert_eq!(r2.dialog_state, DialogState::AwaitingBody);

    let r3 = command(&app, "See you", Some(r1.session_id)).await;
    assert_eq!(r3.response, "Email sent successfully to bob@x.com!");
    assert_eq!(r3.dialog_state, DialogState::Idle);

    let sent = mocks.mail.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "bob@x.com");
    assert_eq!(sent[0].subject, "Hello");
    assert_eq!(sent[0].body, "See you");
}

#[tokio::test]
async fn test_interleaved_sessions_over_http() {
    let (app, mocks) = make_app();
    let a = command(&app, "send an email to alice@a.com", None).await.session_id;
    let b = command(&app, "send an email to bob@b.com", None).await.session_id;

    command(&app, "For Bob", Some(b)).await;
    command(&app, "For Alice", Some(a)).await;
    command(&app, "Alice body", Some(a)).await;
    command(&app, "Bob body", Some(b)).await;

    let sent = mocks.mail.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].recipient, "alice@a.com");
    assert_eq!(sent[0].subject, "For Alice");
    assert_eq!(sent[0].body, "Alice body");
    assert_eq!(sent[1].recipient, "bob@b.com");
    assert_eq!(sent[1].subject, "For Bob");
    assert_eq!(sent[1].body, "Bob body");
}

#[tokio::test]
async fn test_collaborator_failure_is_200_with_text() {
    let (app, mocks) = make_app();
    mocks.model.set_mode(MockMode::Unavailable);
    let resp = command(&app, "tell me a joke", None).await;
    assert_eq!(
        resp.response,
        "I'm not sure how to answer that. Gemini AI integration is not available."
    );

    mocks.weather.set_mode(MockMode::Fail("timeout".to_string()));
    let resp = command(&app, "weather in Tokyo", None).await;
    assert!(resp
        .response
        .starts_with("Sorry, I couldn't get the weather information."));
}

#[tokio::test]
async fn test_command_too_long_is_400() {
    let mut config = test_config();
    config.chat.max_message_length = 16;
    let (app, _mocks) = make_app_with(config);

    let resp = app
        .oneshot(post_json(
            "/process_command",
            json!({ "command": "this command is longer than sixteen characters" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(resp).await;
    assert_eq!(body["error"], "bad_request");
    assert!(body["message"].as_str().unwrap().contains("16"));
}

#[tokio::test]
async fn test_command_missing_field_is_rejected() {
    let (app, _mocks) = make_app();
    let resp = app
        .oneshot(post_json("/process_command", json!({ "text": "hi" })))
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}

// =============================================================================
// POST /send_email
// =============================================================================

#[tokio::test]
async fn test_send_email_direct() {
    let (app, mocks) = make_app();
    let resp = app
        .oneshot(post_json(
            "/send_email",
            json!({ "recipient": "carol@c.com", "subject": "Hi", "message": "Body" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = json_body(resp).await;
    assert_eq!(body["response"], "Email sent successfully to carol@c.com!");
    assert_eq!(body["success"], true);
    assert_eq!(mocks.mail.sent().len(), 1);
}

#[tokio::test]
async fn test_send_email_failure_is_text() {
    let (app, mocks) = make_app();
    mocks.mail.set_mode(MockMode::Unavailable);
    let resp = app
        .oneshot(post_json(
            "/send_email",
            json!({ "recipient": "carol@c.com", "subject": "Hi", "message": "Body" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = json_body(resp).await;
    assert_eq!(
        body["response"],
        "Failed to send email. Error: mail transport is not configured"
    );
    assert_eq!(body["success"], false);
}

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn test_list_sessions() {
    let (app, _mocks) = make_app();
    let id = command(&app, "send an email to bob@x.com", None).await.session_id;

    let resp = app.oneshot(get("/sessions")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let list: SessionsResponse = json_body(resp).await;
    assert_eq!(list.sessions.len(), 1);
    assert_eq!(list.sessions[0].id, id);
    assert_eq!(list.sessions[0].dialog_state, DialogState::AwaitingSubject);
}

#[tokio::test]
async fn test_session_history() {
    let (app, _mocks) = make_app();
    let id = command(&app, "open notepad", None).await.session_id;

    let resp = app
        .oneshot(get(&format!("/sessions/{}/history", id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let history: HistoryResponse = json_body(resp).await;
    assert_eq!(history.session_id, id);
    assert_eq!(history.messages.len(), 2);
    assert_eq!(history.messages[0].content, "open notepad");
    assert_eq!(history.messages[1].content, "Opening notepad.");
}

#[tokio::test]
async fn test_session_history_unknown_is_404() {
    let (app, _mocks) = make_app();
    let resp = app
        .oneshot(get(&format!("/sessions/{}/history", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(resp).await;
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_delete_session() {
    let (app, _mocks) = make_app();
    let id = command(&app, "hello", None).await.session_id;

    let resp = app
        .clone()
        .oneshot(delete(&format!("/sessions/{}", id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .oneshot(delete(&format!("/sessions/{}", id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_session_id_is_client_error() {
    let (app, _mocks) = make_app();
    let resp = app.oneshot(delete("/sessions/not-a-uuid")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// POST /sessions/{id}/cancel
// =============================================================================

#[tokio::test]
async fn test_cancel_draft() {
    let (app, mocks) = make_app();
    let id = command(&app, "send an email to bob@x.com", None).await.session_id;
    command(&app, "Hello", Some(id)).await;

    let resp = app
        .clone()
        .oneshot(post_json(&format!("/sessions/{}/cancel", id), json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = json_body(resp).await;
    assert_eq!(body["response"], "Okay, I've cancelled the email to bob@x.com.");
    assert_eq!(body["dialog_state"], "idle");

    // The next utterance is classified again, not taken as the body.
    let resp = command(&app, "open notepad", Some(id)).await;
    assert_eq!(resp.response, "Opening notepad.");
    assert!(mocks.mail.sent().is_empty());
}

#[tokio::test]
async fn test_cancel_when_idle() {
    let (app, _mocks) = make_app();
    let id = command(&app, "hello", None).await.session_id;
    let resp = app
        .oneshot(post_json(&format!("/sessions/{}/cancel", id), json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = json_body(resp).await;
    assert_eq!(body["response"], "There's no email in progress to cancel.");
}

#[tokio::test]
async fn test_cancel_unknown_session_is_404() {
    let (app, _mocks) = make_app();
    let resp = app
        .oneshot(post_json(
            &format!("/sessions/{}/cancel", Uuid::new_v4()),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Middleware
// =============================================================================

#[tokio::test]
async fn test_rate_limit_rejects_bursts() {
    let mut config = test_config();
    config.chat.rate_limit_per_sec = 1;
    let (app, _mocks) = make_app_with(config);

    let mut limited = 0;
    for _ in 0..5 {
        let resp = app.clone().oneshot(get("/sessions")).await.unwrap();
        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            limited += 1;
        }
    }
    // At most two windows can be touched by five quick requests.
    assert!(limited >= 3, "only {} requests were limited", limited);
}

#[tokio::test]
async fn test_health_is_not_rate_limited() {
    let mut config = test_config();
    config.chat.rate_limit_per_sec = 1;
    let (app, _mocks) = make_app_with(config);

    for _ in 0..5 {
        let resp = app.clone().oneshot(get("/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_body_limit() {
    let (app, _mocks) = make_app();
    let huge = "a".repeat(2 * 1024 * 1024);
    let resp = app
        .oneshot(post_json("/process_command", json!({ "command": huge })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
