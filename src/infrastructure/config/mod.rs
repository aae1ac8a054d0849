//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub dispatch: DispatchConfig,
    pub animals: AnimalsConfig,
    pub adapters: AdaptersConfig,
    pub keepalive: KeepaliveConfig,
    pub status: StatusConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
    pub owner: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DispatchConfig {
    pub notify_unknown_command: bool,
    /// Token accepted in place of the prefix; defaults to the bot mention
    pub mention_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AnimalsConfig {
    pub api_base: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub revolt: Option<RevoltConfig>,
    pub console: Option<ConsoleConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RevoltConfig {
    pub enabled: bool,
    pub token: Option<String>,
    pub api_base: Option<String>,
    /// Channels polled for new messages
    pub channels: Vec<String>,
    pub poll_interval_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct KeepaliveConfig {
    pub enabled: bool,
    pub bind: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StatusConfig {
    pub enabled: bool,
    pub interval_seconds: u64,
    pub rounds: u64,
    pub entries: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "Meowie".to_string(),
                prefix: "^".to_string(),
                owner: None,
            },
            dispatch: DispatchConfig {
                notify_unknown_command: false,
                mention_token: None,
            },
            animals: AnimalsConfig {
                api_base: "https://some-random-api.ml".to_string(),
                timeout_seconds: 10,
            },
            adapters: AdaptersConfig {
                revolt: Some(RevoltConfig {
                    enabled: false,
                    token: None,
                    api_base: None,
                    channels: Vec::new(),
                    poll_interval_seconds: 2,
                }),
                console: Some(ConsoleConfig { enabled: true }),
            },
            keepalive: KeepaliveConfig {
                enabled: true,
                bind: "0.0.0.0:8080".to_string(),
            },
            status: StatusConfig {
                enabled: true,
                interval_seconds: 10,
                rounds: 10_000,
                entries: vec![
                    "Playing with catnips!".to_string(),
                    "Meow!".to_string(),
                    "Thank you Cesiyi and Mclnoot!".to_string(),
                    "Check out Mechabot.tk!".to_string(),
                ],
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Build a config from environment variables alone
    pub fn load_env() -> Self {
        let mut config = Config::default();

        if let Ok(token) = std::env::var("BOT_TOKEN") {
            if let Some(ref mut revolt) = config.adapters.revolt {
                revolt.token = Some(token);
                revolt.enabled = true;
            }
        }

        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            config.bot.prefix = prefix;
        }

        if let Ok(owner) = std::env::var("BOT_OWNER") {
            config.bot.owner = Some(owner);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_yaml() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(parsed.bot.prefix, "^");
        assert_eq!(parsed.animals.timeout_seconds, 10);
        assert!(!parsed.dispatch.notify_unknown_command);
    }

    #[test]
    fn kebab_case_keys_are_parsed() {
        let yaml = r#"
bot:
  name: Meowie
  prefix: "^"
  owner: "01ABCDEF"
dispatch:
  notify-unknown-command: true
  mention-token: "<@01ABCDEF>"
animals:
  api-base: "https://example.test"
  timeout-seconds: 5
adapters:
  revolt:
    enabled: true
    token: "secret"
    api-base: null
    channels: ["01CHAN"]
    poll-interval-seconds: 3
  console:
    enabled: false
keepalive:
  enabled: true
  bind: "127.0.0.1:9000"
status:
  enabled: false
  interval-seconds: 10
  rounds: 100
  entries: []
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert!(config.dispatch.notify_unknown_command);
        assert_eq!(config.animals.timeout_seconds, 5);
        assert_eq!(
            config.adapters.revolt.unwrap().channels,
            vec!["01CHAN".to_string()]
        );
        assert_eq!(config.bot.owner.as_deref(), Some("01ABCDEF"));
    }
}
