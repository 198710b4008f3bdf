//! Slack Web API gateway.

pub mod client;
pub mod types;

pub use client::{ChatGateway, SlackGateway};
pub use types::{Block, MessagePayload, Mrkdwn, PostedMessage};
