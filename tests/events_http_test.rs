//! HTTP-level tests for the events webhook and slash command.
//!
//! Each test drives the real router with `tower::ServiceExt::oneshot`
//! against a recording gateway stub; requests are signed with the same
//! signing code the server verifies with.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use http_body_util::BodyExt;
use secrecy::SecretString;
use tower::ServiceExt;

use welcome_bot::dispatcher::Dispatcher;
use welcome_bot::error::GatewayError;
use welcome_bot::gateway::{ChatGateway, MessagePayload, PostedMessage};
use welcome_bot::server::{AppState, router};
use welcome_bot::signing;

const SIGNING_SECRET: &str = "test-signing-secret";
const BOT_ID: &str = "UBOT";

/// Records outbound calls and hands back fabricated timestamps.
#[derive(Default)]
struct RecordingGateway {
    posts: Mutex<Vec<MessagePayload>>,
    updates: Mutex<Vec<MessagePayload>>,
}

#[async_trait]
impl ChatGateway for RecordingGateway {
    async fn post_message(&self, payload: &MessagePayload) -> Result<PostedMessage, GatewayError> {
        let mut posts = self.posts.lock().unwrap();
        posts.push(payload.clone());
        Ok(PostedMessage {
            channel: payload.channel.clone(),
            ts: format!("1000.{:04}", posts.len()),
        })
    }

    async fn update_message(
        &self,
        payload: &MessagePayload,
    ) -> Result<PostedMessage, GatewayError> {
        let mut updates = self.updates.lock().unwrap();
        updates.push(payload.clone());
        Ok(PostedMessage {
            channel: payload.channel.clone(),
            ts: format!("2000.{:04}", updates.len()),
        })
    }
}

fn test_app() -> (Arc<RecordingGateway>, Router) {
    let gateway = Arc::new(RecordingGateway::default());
    let dispatcher = Arc::new(Dispatcher::new(gateway.clone(), BOT_ID));
    let app = router(AppState {
        dispatcher,
        signing_secret: SecretString::from(SIGNING_SECRET.to_string()),
    });
    (gateway, app)
}

/// Build a correctly signed events request.
fn signed_event(body: &str) -> Request<Body> {
    let timestamp = Utc::now().timestamp();
    let signature = signing::sign_request(SIGNING_SECRET, timestamp, body.as_bytes());
    Request::builder()
        .method("POST")
        .uri("/slack/events")
        .header("content-type", "application/json")
        .header("x-slack-request-timestamp", timestamp.to_string())
        .header("x-slack-signature", signature)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn message_event(user: &str, text: &str) -> String {
    serde_json::json!({
        "type": "event_callback",
        "event": {
            "type": "message",
            "channel": "C1",
            "user": user,
            "text": text,
            "ts": "1.000100"
        }
    })
    .to_string()
}

// ── Signature verification ──────────────────────────────────────────

#[tokio::test]
async fn unsigned_request_is_rejected() {
    let (gateway, app) = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/slack/events")
        .header("content-type", "application/json")
        .body(Body::from(message_event("U1", "start")))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(gateway.posts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn wrong_secret_is_rejected() {
    let (gateway, app) = test_app();
    let body = message_event("U1", "start");
    let timestamp = Utc::now().timestamp();
    let signature = signing::sign_request("not-the-secret", timestamp, body.as_bytes());
    let request = Request::builder()
        .method("POST")
        .uri("/slack/events")
        .header("content-type", "application/json")
        .header("x-slack-request-timestamp", timestamp.to_string())
        .header("x-slack-signature", signature)
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(gateway.posts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn stale_timestamp_is_rejected() {
    let (_gateway, app) = test_app();
    let body = message_event("U1", "hello");
    let timestamp = Utc::now().timestamp() - signing::TIMESTAMP_TOLERANCE_SECS - 10;
    let signature = signing::sign_request(SIGNING_SECRET, timestamp, body.as_bytes());
    let request = Request::builder()
        .method("POST")
        .uri("/slack/events")
        .header("content-type", "application/json")
        .header("x-slack-request-timestamp", timestamp.to_string())
        .header("x-slack-signature", signature)
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ── Events endpoint ─────────────────────────────────────────────────

#[tokio::test]
async fn url_verification_echoes_challenge() {
    let (_gateway, app) = test_app();
    let body = r#"{"type":"url_verification","challenge":"abc123"}"#;

    let response = app.oneshot(signed_event(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["challenge"], "abc123");
}

#[tokio::test]
async fn start_message_then_reaction_runs_the_welcome_flow() {
    let (gateway, app) = test_app();

    let response = app
        .clone()
        .oneshot(signed_event(&message_event("U1", "start")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    {
        let posts = gateway.posts.lock().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].channel, "@U1");
    }

    let reaction = serde_json::json!({
        "type": "event_callback",
        "event": {
            "type": "reaction_added",
            "user": "U1",
            "reaction": "white_check_mark",
            "item": {"type": "message", "channel": "C9", "ts": "1000.0001"}
        }
    })
    .to_string();
    let response = app.oneshot(signed_event(&reaction)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updates = gateway.updates.lock().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].channel, "C9");
    assert_eq!(updates[0].ts.as_deref(), Some("1000.0001"));
}

#[tokio::test]
async fn flagged_message_gets_a_threaded_warning() {
    let (gateway, app) = test_app();

    let response = app
        .oneshot(signed_event(&message_event("U1", "a bad word 2 appears")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let posts = gateway.posts.lock().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].channel, "C1");
    assert_eq!(posts[0].thread_ts.as_deref(), Some("1.000100"));
}

#[tokio::test]
async fn malformed_payload_is_acknowledged() {
    let (gateway, app) = test_app();
    let response = app.oneshot(signed_event("{not json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(gateway.posts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_event_types_are_acknowledged() {
    let (gateway, app) = test_app();
    let body = r#"{"type":"event_callback","event":{"type":"member_joined_channel","user":"U1"}}"#;
    let response = app.oneshot(signed_event(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(gateway.posts.lock().unwrap().is_empty());
}

// ── Slash command ───────────────────────────────────────────────────

fn command_request(user_id: &str, channel_id: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/message-count")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(format!(
            "token=t&user_id={user_id}&channel_id={channel_id}&command=%2Fmessage-count"
        )))
        .unwrap()
}

#[tokio::test]
async fn message_count_replies_into_the_channel() {
    let (gateway, app) = test_app();

    for text in ["one", "two", "three"] {
        app.clone()
            .oneshot(signed_event(&message_event("U1", text)))
            .await
            .unwrap();
    }

    let response = app.oneshot(command_request("U1", "C5")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let posts = gateway.posts.lock().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].channel, "C5");
    assert_eq!(posts[0].text.as_deref(), Some("Messages: 3"));
}

#[tokio::test]
async fn message_count_for_unseen_user_is_zero() {
    let (gateway, app) = test_app();

    let response = app.oneshot(command_request("U9", "C5")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let posts = gateway.posts.lock().unwrap();
    assert_eq!(posts[0].text.as_deref(), Some("Messages: 0"));
}
