//! Console adapter for development/testing

use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::domain::entities::OutgoingMessage;
use crate::domain::traits::{MessageHandle, Messageable};

/// Prints outbound traffic to stdout. Message ids are monotonic so an edit
/// can be matched to the send it targets.
pub struct ConsoleChannel {
    next_id: AtomicU64,
}

impl ConsoleChannel {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
        }
    }

    pub async fn read_line(prompt: &str) -> Option<String> {
        print!("{}", prompt);
        let _ = std::io::stdout().flush();

        let mut input = String::new();
        std::io::stdin().read_line(&mut input).ok()?;
        Some(input.trim().to_string())
    }
}

impl Default for ConsoleChannel {
    fn default() -> Self {
        Self::new()
    }
}

fn render(message: &OutgoingMessage) -> String {
    let mut out = message.content.clone().unwrap_or_default();

    if let Some(embed) = &message.embed {
        if let Some(description) = &embed.description {
            out.push_str(&format!(" [embed: {}]", description));
        }
        if let Some(media) = &embed.media {
            out.push_str(&format!(" [media: {}]", media));
        }
    }

    out
}

#[async_trait]
impl Messageable for ConsoleChannel {
    fn target_id(&self) -> &str {
        "console"
    }

    async fn send(&self, message: OutgoingMessage) -> Result<MessageHandle, BotError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        println!("[BOT] {}", render(&message));

        Ok(MessageHandle {
            channel_id: "console".to_string(),
            message_id: id.to_string(),
        })
    }

    async fn edit(&self, handle: &MessageHandle, message: OutgoingMessage) -> Result<(), BotError> {
        println!("[BOT edit #{}] {}", handle.message_id, render(&message));
        Ok(())
    }

    async fn recent(&self, _limit: usize) -> Result<Vec<MessageHandle>, BotError> {
        Ok(Vec::new())
    }

    async fn delete(&self, _handle: &MessageHandle) -> Result<(), BotError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Embed;

    #[tokio::test]
    async fn sends_hand_out_distinct_monotonic_handles() {
        let channel = ConsoleChannel::new();

        let first = channel.send(OutgoingMessage::text("one")).await.unwrap();
        let second = channel.send(OutgoingMessage::text("two")).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(first.message_id, "1");
        assert_eq!(second.message_id, "2");
    }

    #[test]
    fn render_includes_embed_media() {
        let message =
            OutgoingMessage::text("Hav kat pic!").with_embed(Embed::media("https://example/cat.png"));

        let rendered = render(&message);

        assert!(rendered.contains("Hav kat pic!"));
        assert!(rendered.contains("https://example/cat.png"));
    }
}
