use chrono::{DateTime, Utc};

use super::User;

/// An incoming chat message
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    pub author: User,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(channel_id: impl Into<String>, author: User, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            channel_id: channel_id.into(),
            author,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Replace the locally generated id with the platform's message id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// An outbound message payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub content: Option<String>,
    pub embed: Option<Embed>,
}

impl OutgoingMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embed: None,
        }
    }

    pub fn with_embed(mut self, embed: Embed) -> Self {
        self.embed = Some(embed);
        self
    }
}

/// Rich content attached to an outbound message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Embed {
    pub description: Option<String>,
    pub media: Option<String>,
}

impl Embed {
    pub fn media(url: impl Into<String>) -> Self {
        Self {
            description: None,
            media: Some(url.into()),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
