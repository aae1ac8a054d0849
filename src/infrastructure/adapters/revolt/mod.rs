//! Revolt REST adapter

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::errors::BotError;
use crate::application::services::status::Presence;
use crate::domain::entities::{Message, OutgoingMessage, User};
use crate::domain::traits::{MessageHandle, Messageable};

/// Revolt API base URL
const API_BASE: &str = "https://api.revolt.chat";

/// A message as the api returns it
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    #[serde(rename = "_id")]
    pub id: String,
    pub channel: String,
    pub author: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl ApiMessage {
    /// Lift the wire form into the domain message. The platform only ships
    /// the author id here; the bot-author flag is resolved upstream when
    /// the author is the bot itself.
    pub fn into_message(self) -> Message {
        let author = User::new(self.author);
        Message::new(self.channel, author, self.content.unwrap_or_default()).with_id(self.id)
    }
}

/// Revolt bot client over the REST api
pub struct RevoltClient {
    token: String,
    client: Client,
    base: String,
}

impl RevoltClient {
    pub fn new(token: impl Into<String>, api_base: Option<String>) -> Result<Self, BotError> {
        let client = Client::builder()
            .user_agent(concat!("meowie-bot/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| BotError::Internal(e.to_string()))?;

        Ok(Self {
            token: token.into(),
            client,
            base: api_base.unwrap_or_else(|| API_BASE.to_string()),
        })
    }

    /// Get the API URL for a path
    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Fetch the bot's own user record
    pub async fn fetch_self(&self) -> Result<User, BotError> {
        #[derive(Deserialize)]
        struct Response {
            #[serde(rename = "_id")]
            id: String,
            username: String,
            #[serde(default)]
            bot: Option<serde_json::Value>,
        }

        let url = self.api_url("/users/@me");
        let response = self
            .client
            .get(&url)
            .header("x-bot-token", &self.token)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Api {
                status: response.status().as_u16(),
            });
        }

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        let mut user = User::new(data.id).with_username(data.username);
        if data.bot.is_some() {
            user = user.as_bot();
        }

        Ok(user)
    }

    /// Send a message to a channel
    pub async fn send_message(
        &self,
        channel_id: &str,
        message: &OutgoingMessage,
    ) -> Result<MessageHandle, BotError> {
        #[derive(Serialize)]
        struct SendEmbed<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            description: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            media: Option<&'a str>,
        }

        #[derive(Serialize)]
        struct SendRequest<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            content: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            embeds: Option<Vec<SendEmbed<'a>>>,
        }

        #[derive(Deserialize)]
        struct Response {
            #[serde(rename = "_id")]
            id: String,
            channel: String,
        }

        let url = self.api_url(&format!("/channels/{}/messages", channel_id));
        let request = SendRequest {
            content: message.content.as_deref(),
            embeds: message.embed.as_ref().map(|embed| {
                vec![SendEmbed {
                    description: embed.description.as_deref(),
                    media: embed.media.as_deref(),
                }]
            }),
        };

        let response = self
            .client
            .post(&url)
            .header("x-bot-token", &self.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Api {
                status: response.status().as_u16(),
            });
        }

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        Ok(MessageHandle {
            channel_id: data.channel,
            message_id: data.id,
        })
    }

    /// Edit a previously sent message in place
    pub async fn edit_message(
        &self,
        handle: &MessageHandle,
        message: &OutgoingMessage,
    ) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct EditEmbed<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            description: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            media: Option<&'a str>,
        }

        #[derive(Serialize)]
        struct EditRequest<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            content: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            embeds: Option<Vec<EditEmbed<'a>>>,
        }

        let url = self.api_url(&format!(
            "/channels/{}/messages/{}",
            handle.channel_id, handle.message_id
        ));
        let request = EditRequest {
            content: message.content.as_deref(),
            embeds: message.embed.as_ref().map(|embed| {
                vec![EditEmbed {
                    description: embed.description.as_deref(),
                    media: embed.media.as_deref(),
                }]
            }),
        };

        let response = self
            .client
            .patch(&url)
            .header("x-bot-token", &self.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Api {
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }

    /// Delete a single message. A 404 surfaces as `Api { status: 404 }` so
    /// callers can decide whether already-gone counts as success.
    pub async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<(), BotError> {
        let url = self.api_url(&format!("/channels/{}/messages/{}", channel_id, message_id));
        let response = self
            .client
            .delete(&url)
            .header("x-bot-token", &self.token)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Api {
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }

    /// Most recent messages in a channel, newest first
    pub async fn fetch_messages(
        &self,
        channel_id: &str,
        limit: usize,
    ) -> Result<Vec<ApiMessage>, BotError> {
        let url = self.api_url(&format!(
            "/channels/{}/messages?limit={}",
            channel_id, limit
        ));
        let response = self
            .client
            .get(&url)
            .header("x-bot-token", &self.token)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Api {
                status: response.status().as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))
    }

    /// Messages after a known id, oldest first; drives the poll loop
    pub async fn poll_channel(
        &self,
        channel_id: &str,
        after: Option<&str>,
    ) -> Result<Vec<ApiMessage>, BotError> {
        let mut url = self.api_url(&format!(
            "/channels/{}/messages?limit=50&sort=Oldest",
            channel_id
        ));
        if let Some(after) = after {
            url.push_str(&format!("&after={}", after));
        }

        let response = self
            .client
            .get(&url)
            .header("x-bot-token", &self.token)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Api {
                status: response.status().as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))
    }

    /// Update the bot's presence status text
    pub async fn set_status_text(&self, text: &str) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct Status<'a> {
            text: &'a str,
            presence: &'a str,
        }

        #[derive(Serialize)]
        struct EditRequest<'a> {
            status: Status<'a>,
        }

        let url = self.api_url("/users/@me");
        let request = EditRequest {
            status: Status {
                text,
                presence: "Online",
            },
        };

        let response = self
            .client
            .patch(&url)
            .header("x-bot-token", &self.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Api {
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Presence for RevoltClient {
    async fn set_status(&self, text: &str) -> Result<(), BotError> {
        self.set_status_text(text).await
    }
}

/// One Revolt channel as a messageable target
pub struct RevoltChannel {
    client: Arc<RevoltClient>,
    channel_id: String,
}

impl RevoltChannel {
    pub fn new(client: Arc<RevoltClient>, channel_id: impl Into<String>) -> Self {
        Self {
            client,
            channel_id: channel_id.into(),
        }
    }
}

#[async_trait]
impl Messageable for RevoltChannel {
    fn target_id(&self) -> &str {
        &self.channel_id
    }

    async fn send(&self, message: OutgoingMessage) -> Result<MessageHandle, BotError> {
        self.client.send_message(&self.channel_id, &message).await
    }

    async fn edit(&self, handle: &MessageHandle, message: OutgoingMessage) -> Result<(), BotError> {
        self.client.edit_message(handle, &message).await
    }

    async fn recent(&self, limit: usize) -> Result<Vec<MessageHandle>, BotError> {
        let messages = self.client.fetch_messages(&self.channel_id, limit).await?;

        Ok(messages
            .into_iter()
            .map(|message| MessageHandle {
                channel_id: message.channel,
                message_id: message.id,
            })
            .collect())
    }

    async fn delete(&self, handle: &MessageHandle) -> Result<(), BotError> {
        self.client
            .delete_message(&handle.channel_id, &handle.message_id)
            .await
    }
}
