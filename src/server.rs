//! HTTP surface — Slack event webhooks and the slash command.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Form, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::dispatcher::Dispatcher;
use crate::events::{CallbackEvent, EventEnvelope};
use crate::gateway::MessagePayload;
use crate::signing;

const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";
const SIGNATURE_HEADER: &str = "x-slack-signature";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub signing_secret: SecretString,
}

/// Build the router: the events webhook and the message-count command.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/slack/events", post(slack_events))
        .route("/message-count", post(message_count))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Events webhook ──────────────────────────────────────────────────

/// Events API endpoint. Signature verification runs over the raw body
/// before any parsing; a request that fails it gets a 401 and nothing
/// else. Everything after that point answers 200 — a malformed or
/// failing event must not make Slack retry the delivery.
async fn slack_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !verify_headers(&state.signing_secret, &headers, &body) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let envelope: EventEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("undecodable event payload: {e}");
            return StatusCode::OK.into_response();
        }
    };

    match envelope {
        EventEnvelope::UrlVerification { challenge } => {
            info!("answering url_verification handshake");
            Json(serde_json::json!({ "challenge": challenge })).into_response()
        }
        EventEnvelope::EventCallback { event } => {
            let result = match event {
                CallbackEvent::Message(ref msg) => state.dispatcher.handle_message(msg).await,
                CallbackEvent::ReactionAdded(ref reaction) => {
                    state.dispatcher.handle_reaction(reaction).await
                }
                CallbackEvent::Unknown => Ok(()),
            };
            if let Err(e) = result {
                warn!("event handling failed: {e}");
            }
            StatusCode::OK.into_response()
        }
        EventEnvelope::Unknown => StatusCode::OK.into_response(),
    }
}

fn verify_headers(secret: &SecretString, headers: &HeaderMap, body: &[u8]) -> bool {
    let Some(timestamp) = headers
        .get(TIMESTAMP_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
    else {
        return false;
    };
    let Some(signature) = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    signing::verify_request(
        secret.expose_secret(),
        timestamp,
        body,
        signature,
        Utc::now().timestamp(),
    )
}

// ── Slash command ───────────────────────────────────────────────────

/// Form payload of a slash-command invocation. Slack sends many more
/// fields; only these two are used.
#[derive(Debug, Deserialize)]
struct SlashCommand {
    user_id: Option<String>,
    channel_id: Option<String>,
}

/// `/message-count` responder: posts the caller's running message count
/// back into the invoking channel.
async fn message_count(
    State(state): State<AppState>,
    Form(command): Form<SlashCommand>,
) -> StatusCode {
    let (Some(user_id), Some(channel_id)) = (command.user_id, command.channel_id) else {
        return StatusCode::OK;
    };

    let count = state.dispatcher.message_count(&user_id).await;
    let reply = MessagePayload::text(channel_id, format!("Messages: {count}"));
    if let Err(e) = state.dispatcher.gateway().post_message(&reply).await {
        warn!("message-count reply failed: {e}");
    }
    StatusCode::OK
}
