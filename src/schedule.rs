//! Startup message scheduling.
//!
//! The messages are handed to Slack's `chat.scheduleMessage` once at
//! startup, before the events server binds; Slack owns the delivery.
//! This path is independent of event handling.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::error::GatewayError;
use crate::gateway::SlackGateway;

/// A message to be delivered at an absolute future time.
#[derive(Debug, Clone)]
pub struct ScheduledMessage {
    pub channel: String,
    pub text: String,
    pub post_at: DateTime<Utc>,
}

/// The fixed startup messages, offset from now.
pub fn startup_messages(channel: &str) -> Vec<ScheduledMessage> {
    let now = Utc::now();
    vec![
        ScheduledMessage {
            channel: channel.to_string(),
            text: "First message".to_string(),
            post_at: now + Duration::seconds(20),
        },
        ScheduledMessage {
            channel: channel.to_string(),
            text: "Second Message!".to_string(),
            post_at: now + Duration::seconds(30),
        },
    ]
}

/// Schedule every message, collecting the ids Slack assigns.
pub async fn schedule_all(
    gateway: &SlackGateway,
    messages: &[ScheduledMessage],
) -> Result<Vec<String>, GatewayError> {
    let mut ids = Vec::with_capacity(messages.len());
    for msg in messages {
        let id = gateway
            .schedule_message(&msg.channel, &msg.text, msg.post_at.timestamp())
            .await?;
        info!(channel = %msg.channel, id = %id, "message scheduled");
        ids.push(id);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_messages_target_the_channel() {
        let messages = startup_messages("C05NNFUC05S");
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().all(|m| m.channel == "C05NNFUC05S"));
    }

    #[test]
    fn startup_messages_are_offset_into_the_future() {
        let before = Utc::now();
        let messages = startup_messages("C1");
        let after = Utc::now();

        assert!(messages[0].post_at >= before + Duration::seconds(20));
        assert!(messages[0].post_at <= after + Duration::seconds(20));
        assert!(messages[1].post_at >= before + Duration::seconds(30));
        assert!(messages[1].post_at <= after + Duration::seconds(30));
        assert!(messages[0].post_at < messages[1].post_at);
    }
}
