//! Handler invocation context

use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::application::state::AppState;
use crate::domain::entities::{Message, OutgoingMessage};
use crate::domain::traits::{MessageHandle, Messageable};

/// Per-invocation context handed to command handlers.
///
/// Created by the dispatcher for each resolved command, discarded when the
/// handler completes.
#[derive(Clone)]
pub struct Context {
    pub message: Message,
    pub command: String,
    pub args: Vec<String>,
    pub channel: Arc<dyn Messageable>,
    pub state: Arc<AppState>,
}

impl Context {
    pub fn new(
        message: Message,
        command: String,
        args: Vec<String>,
        channel: Arc<dyn Messageable>,
        state: Arc<AppState>,
    ) -> Self {
        Self {
            message,
            command,
            args,
            channel,
            state,
        }
    }

    pub fn author_id(&self) -> &str {
        &self.message.author.id
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Send a reply into the originating channel
    pub async fn send(&self, message: OutgoingMessage) -> Result<MessageHandle, CommandError> {
        self.channel.send(message).await.map_err(CommandError::from)
    }

    /// Send a plain text reply
    pub async fn say(&self, content: impl Into<String>) -> Result<MessageHandle, CommandError> {
        self.send(OutgoingMessage::text(content)).await
    }

    /// Edit a message previously sent through this context
    pub async fn edit(
        &self,
        handle: &MessageHandle,
        message: OutgoingMessage,
    ) -> Result<(), CommandError> {
        self.channel
            .edit(handle, message)
            .await
            .map_err(CommandError::from)
    }
}
