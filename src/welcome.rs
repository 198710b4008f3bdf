//! Welcome checklist — onboarding message with a reaction task.
//!
//! One checklist exists per user for the lifetime of the process. It is
//! posted to the user's DM pseudo-channel when they send the trigger
//! phrase and re-rendered with a checked glyph once they react to it.

use std::collections::HashMap;

use crate::error::GatewayError;
use crate::gateway::{Block, ChatGateway, MessagePayload};

const INTRO_TEXT: &str =
    "Welcome to this awesome channel! \n\n*Get started by completing the tasks!*";
const TASK_LABEL: &str = "*React to this message!*";
const CHECKED: &str = ":white_check_mark:";
const UNCHECKED: &str = ":white_large_square:";

pub const WELCOME_USERNAME: &str = "Welcome Robot!";
pub const WELCOME_ICON: &str = ":robot_face:";

/// The `@<user>` pseudo-channel Slack resolves to the user's DM.
pub fn dm_channel(user: &str) -> String {
    format!("@{user}")
}

// ── Checklist entity ────────────────────────────────────────────────

/// Render state for one onboarding conversation.
///
/// Two states: incomplete → complete; complete is terminal.
#[derive(Debug, Clone)]
pub struct WelcomeChecklist {
    channel: String,
    user: String,
    /// Timestamp of the rendered message; empty until first posted.
    ts: String,
    completed: bool,
}

impl WelcomeChecklist {
    pub fn new(channel: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            user: user.into(),
            ts: String::new(),
            completed: false,
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn ts(&self) -> &str {
        &self.ts
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Mark the task done and re-home the checklist to the channel the
    /// completing reaction arrived in. The completed flag never reverts.
    pub fn complete(&mut self, channel: impl Into<String>) {
        self.completed = true;
        self.channel = channel.into();
    }

    /// Build the current render. Deterministic for a given state: the
    /// intro and divider blocks are static, only the task glyph varies.
    pub fn payload(&self) -> MessagePayload {
        let mut payload = MessagePayload::blocks(
            self.channel.clone(),
            vec![
                Block::section(INTRO_TEXT),
                Block::divider(),
                self.task_block(),
            ],
        )
        .with_username(WELCOME_USERNAME)
        .with_icon(WELCOME_ICON);
        if !self.ts.is_empty() {
            payload = payload.with_ts(self.ts.clone());
        }
        payload
    }

    fn task_block(&self) -> Block {
        let glyph = if self.completed { CHECKED } else { UNCHECKED };
        Block::section(format!("{glyph} {TASK_LABEL}"))
    }
}

// ── Registry ────────────────────────────────────────────────────────

/// Composite registry key.
///
/// Built by [`WelcomeKey::for_user`] on BOTH the insertion and lookup
/// paths: the welcome conversation is keyed by the user's DM
/// pseudo-channel no matter which channel the triggering message or the
/// completing reaction arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct WelcomeKey {
    channel: String,
    user: String,
}

impl WelcomeKey {
    fn for_user(user: &str) -> Self {
        Self {
            channel: dm_channel(user),
            user: user.to_string(),
        }
    }
}

/// In-memory store of welcome checklists, at most one per (channel, user).
#[derive(Default)]
pub struct WelcomeRegistry {
    entries: HashMap<WelcomeKey, WelcomeChecklist>,
}

impl WelcomeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send a welcome checklist to `channel` for `user` unless one was
    /// already sent. Returns true if a message was posted.
    pub async fn try_send(
        &mut self,
        gateway: &dyn ChatGateway,
        channel: &str,
        user: &str,
    ) -> Result<bool, GatewayError> {
        let key = WelcomeKey::for_user(user);
        if self.entries.contains_key(&key) {
            return Ok(false);
        }

        let mut welcome = WelcomeChecklist::new(channel, user);
        let posted = gateway.post_message(&welcome.payload()).await?;
        welcome.ts = posted.ts;
        self.entries.insert(key, welcome);
        Ok(true)
    }

    /// Complete the checklist for `user` after a reaction in
    /// `reacting_channel`. A reaction with no matching checklist is a
    /// silent no-op. Returns true if a message was updated.
    pub async fn complete_for(
        &mut self,
        gateway: &dyn ChatGateway,
        reacting_channel: &str,
        user: &str,
    ) -> Result<bool, GatewayError> {
        let key = WelcomeKey::for_user(user);
        let Some(welcome) = self.entries.get_mut(&key) else {
            return Ok(false);
        };

        welcome.complete(reacting_channel);
        let updated = gateway.update_message(&welcome.payload()).await?;
        welcome.ts = updated.ts;
        Ok(true)
    }

    /// The checklist for `user`, if one was sent.
    pub fn get(&self, user: &str) -> Option<&WelcomeChecklist> {
        self.entries.get(&WelcomeKey::for_user(user))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
