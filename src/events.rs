//! Inbound event payloads from the Slack Events API.
//!
//! Fields the dispatcher depends on are all optional: a missing field
//! means "no value" and the dependent action is skipped, it is never a
//! deserialization failure (bot messages, message subtypes and app
//! events routinely omit `user` or `text`).

use serde::Deserialize;

/// Outer envelope of an Events API request body.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEnvelope {
    /// One-time endpoint handshake; the challenge must be echoed back.
    UrlVerification { challenge: String },
    /// A workspace event wrapped in callback metadata.
    EventCallback { event: CallbackEvent },
    #[serde(other)]
    Unknown,
}

/// The inner event of an `event_callback` envelope.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CallbackEvent {
    Message(MessageEvent),
    ReactionAdded(ReactionAddedEvent),
    #[serde(other)]
    Unknown,
}

/// A message posted in a channel the bot can see.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageEvent {
    pub channel: Option<String>,
    pub user: Option<String>,
    pub text: Option<String>,
    pub ts: Option<String>,
}

/// A reaction added to an item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReactionAddedEvent {
    pub user: Option<String>,
    #[serde(default)]
    pub item: ReactionItem,
}

/// The item a reaction was added to.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReactionItem {
    pub channel: Option<String>,
}
