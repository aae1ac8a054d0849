//! Shared application context built once at startup.
//!
//! Replaces process-global mutable state: everything handlers need is
//! constructed in `main`, wrapped in an `Arc`, and passed down. Read-only
//! after construction, so concurrent handlers share it without locking.

use crate::infrastructure::animals::AnimalClient;

/// Identity of the bot's own platform user
#[derive(Debug, Clone)]
pub struct BotIdentity {
    pub id: String,
    pub username: String,
}

/// Read-only state shared by the dispatcher and every handler
pub struct AppState {
    pub identity: BotIdentity,
    pub animals: AnimalClient,
    pub prefix: String,
    pub owner: Option<String>,
}

impl AppState {
    pub fn is_owner(&self, user_id: &str) -> bool {
        self.owner.as_deref() == Some(user_id)
    }
}
