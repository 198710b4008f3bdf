//! Typed payloads for the Slack Web API.

use serde::{Deserialize, Serialize};

// ── Block Kit ───────────────────────────────────────────────────────

/// An `mrkdwn` text object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mrkdwn {
    #[serde(rename = "type")]
    kind: String,
    pub text: String,
}

impl Mrkdwn {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            kind: "mrkdwn".to_string(),
            text: text.into(),
        }
    }
}

/// A Block Kit layout block. Only the blocks the bot renders are modeled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Section { text: Mrkdwn },
    Divider,
}

impl Block {
    /// A section block with mrkdwn text.
    pub fn section(text: impl Into<String>) -> Self {
        Self::Section {
            text: Mrkdwn::new(text),
        }
    }

    pub fn divider() -> Self {
        Self::Divider
    }
}

// ── Outbound messages ───────────────────────────────────────────────

/// An outbound message for `chat.postMessage` / `chat.update`.
///
/// Unset optional fields are omitted from the JSON body entirely — the
/// Web API rejects explicit nulls for some of them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MessagePayload {
    pub channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_emoji: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
}

impl MessagePayload {
    /// A plain-text message to a channel.
    pub fn text(channel: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// A block-based message to a channel.
    pub fn blocks(channel: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            channel: channel.into(),
            blocks,
            ..Self::default()
        }
    }

    /// Thread this message onto an existing message's timestamp.
    pub fn in_thread(mut self, thread_ts: impl Into<String>) -> Self {
        self.thread_ts = Some(thread_ts.into());
        self
    }

    /// Target an existing message (required for `chat.update`).
    pub fn with_ts(mut self, ts: impl Into<String>) -> Self {
        self.ts = Some(ts.into());
        self
    }

    /// Display name override for the posting bot.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Emoji icon override for the posting bot.
    pub fn with_icon(mut self, icon_emoji: impl Into<String>) -> Self {
        self.icon_emoji = Some(icon_emoji.into());
        self
    }
}

/// Identity of a message after a successful post or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    pub channel: String,
    pub ts: String,
}
