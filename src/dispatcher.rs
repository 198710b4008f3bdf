//! Event dispatcher — routes inbound events to the bot's state.
//!
//! One dispatcher instance owns all mutable state (welcome registry,
//! message counter) so tests can run independent dispatchers in
//! parallel. Each map sits behind its own mutex; `try_send` performs its
//! outbound post while holding the registry lock, so concurrent webhook
//! delivery cannot double-send a welcome.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::counter::MessageCounter;
use crate::error::GatewayError;
use crate::events::{MessageEvent, ReactionAddedEvent};
use crate::filter::WordFilter;
use crate::gateway::{ChatGateway, MessagePayload};
use crate::welcome::{WelcomeRegistry, dm_channel};

/// Trigger phrase for the welcome checklist (case-insensitive match).
const START_TRIGGER: &str = "start";

/// Threaded reply posted under a flagged message.
const FLAGGED_REPLY: &str = "That's a bad word homie.";

/// Stateless router over inbound events; all state lives in the maps it
/// owns. Gateway failures propagate to the caller — the HTTP layer logs
/// them and keeps serving.
pub struct Dispatcher {
    gateway: Arc<dyn ChatGateway>,
    bot_user_id: String,
    filter: WordFilter,
    welcomes: Mutex<WelcomeRegistry>,
    counter: Mutex<MessageCounter>,
}

impl Dispatcher {
    pub fn new(gateway: Arc<dyn ChatGateway>, bot_user_id: impl Into<String>) -> Self {
        Self::with_filter(gateway, bot_user_id, WordFilter::default_terms())
    }

    pub fn with_filter(
        gateway: Arc<dyn ChatGateway>,
        bot_user_id: impl Into<String>,
        filter: WordFilter,
    ) -> Self {
        Self {
            gateway,
            bot_user_id: bot_user_id.into(),
            filter,
            welcomes: Mutex::new(WelcomeRegistry::new()),
            counter: Mutex::new(MessageCounter::new()),
        }
    }

    /// Handle a message event: count it, then either start the welcome
    /// flow or check the text against the word filter.
    pub async fn handle_message(&self, event: &MessageEvent) -> Result<(), GatewayError> {
        // Only react to actual users; our own messages would loop.
        let Some(user) = event.user.as_deref() else {
            return Ok(());
        };
        if user == self.bot_user_id {
            return Ok(());
        }

        self.counter.lock().await.record(user);

        let Some(text) = event.text.as_deref() else {
            return Ok(());
        };

        if text.eq_ignore_ascii_case(START_TRIGGER) {
            let sent = self
                .welcomes
                .lock()
                .await
                .try_send(self.gateway.as_ref(), &dm_channel(user), user)
                .await?;
            debug!(user, sent, "welcome trigger");
        } else if self.filter.is_flagged(text) {
            let (Some(channel), Some(ts)) = (event.channel.as_deref(), event.ts.as_deref()) else {
                return Ok(());
            };
            let warning = MessagePayload::text(channel, FLAGGED_REPLY).in_thread(ts);
            self.gateway.post_message(&warning).await?;
            debug!(user, channel, "flagged message warned");
        }

        Ok(())
    }

    /// Handle a reaction event: complete the reacting user's welcome
    /// checklist if one exists. Lookup miss is a silent no-op.
    pub async fn handle_reaction(&self, event: &ReactionAddedEvent) -> Result<(), GatewayError> {
        let Some(user) = event.user.as_deref() else {
            return Ok(());
        };
        let Some(channel) = event.item.channel.as_deref() else {
            return Ok(());
        };

        let completed = self
            .welcomes
            .lock()
            .await
            .complete_for(self.gateway.as_ref(), channel, user)
            .await?;
        debug!(user, channel, completed, "reaction handled");
        Ok(())
    }

    /// Message count for `user`, for the slash-command responder.
    pub async fn message_count(&self, user: &str) -> u64 {
        self.counter.lock().await.count(user)
    }

    pub fn gateway(&self) -> &Arc<dyn ChatGateway> {
        &self.gateway
    }
}
