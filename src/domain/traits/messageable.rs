use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::domain::entities::OutgoingMessage;

/// Identifies one message the bot has sent or may act on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHandle {
    pub channel_id: String,
    pub message_id: String,
}

/// Messageable - any channel-like target the bot can talk to.
///
/// An edit must be given the handle returned by the send it amends.
#[async_trait]
pub trait Messageable: Send + Sync {
    /// Identifier of the underlying channel
    fn target_id(&self) -> &str;

    /// Send a message, returning a handle usable for later edits
    async fn send(&self, message: OutgoingMessage) -> Result<MessageHandle, BotError>;

    /// Edit a previously sent message in place
    async fn edit(&self, handle: &MessageHandle, message: OutgoingMessage) -> Result<(), BotError>;

    /// Handles of the most recent messages in the channel, newest first
    async fn recent(&self, limit: usize) -> Result<Vec<MessageHandle>, BotError>;

    /// Delete a single message
    async fn delete(&self, handle: &MessageHandle) -> Result<(), BotError>;
}
