//! Application layer errors

use thiserror::Error;

use crate::infrastructure::animals::AnimalError;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("platform api error: status {status}")]
    Api { status: u16 },

    #[error("command error: {0}")]
    Command(#[from] CommandError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl BotError {
    /// True when the platform reported the target as already gone
    pub fn is_not_found(&self) -> bool {
        matches!(self, BotError::Api { status: 404 })
    }
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("permission denied")]
    Denied,

    #[error("not the bot owner")]
    NotOwner,

    #[error("upstream failure: {0}")]
    Upstream(#[from] AnimalError),

    #[error("platform failure: {0}")]
    Platform(#[from] Box<BotError>),

    #[error("execution failed: {0}")]
    ExecutionFailed(String),
}

impl From<BotError> for CommandError {
    fn from(err: BotError) -> Self {
        CommandError::Platform(Box::new(err))
    }
}

/// Command registration errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("name or alias already registered: {0}")]
    Duplicate(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("parse error: {0}")]
    Parse(String),
}
