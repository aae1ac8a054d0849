//! Random animal fact/picture client.
//!
//! One GET per call against `{base}/animal/{kind}`; no retries and no
//! caching. The request timeout is bounded so a stalled upstream cannot
//! hang a handler forever.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Animal kinds the upstream endpoint serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimalKind {
    Dog,
    Cat,
    Raccoon,
    Panda,
    Kangaroo,
    Koala,
    Fox,
    Bird,
}

impl AnimalKind {
    pub const ALL: [AnimalKind; 8] = [
        AnimalKind::Dog,
        AnimalKind::Cat,
        AnimalKind::Raccoon,
        AnimalKind::Panda,
        AnimalKind::Kangaroo,
        AnimalKind::Koala,
        AnimalKind::Fox,
        AnimalKind::Bird,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnimalKind::Dog => "dog",
            AnimalKind::Cat => "cat",
            AnimalKind::Raccoon => "raccoon",
            AnimalKind::Panda => "panda",
            AnimalKind::Kangaroo => "kangaroo",
            AnimalKind::Koala => "koala",
            AnimalKind::Fox => "fox",
            AnimalKind::Bird => "bird",
        }
    }
}

impl fmt::Display for AnimalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimalKind {
    type Err = AnimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dog" => Ok(AnimalKind::Dog),
            "cat" => Ok(AnimalKind::Cat),
            "raccoon" => Ok(AnimalKind::Raccoon),
            "panda" => Ok(AnimalKind::Panda),
            "kangaroo" => Ok(AnimalKind::Kangaroo),
            "koala" => Ok(AnimalKind::Koala),
            "fox" => Ok(AnimalKind::Fox),
            "bird" => Ok(AnimalKind::Bird),
            other => Err(AnimalError::InvalidKind(other.to_string())),
        }
    }
}

/// Animal client errors
#[derive(Error, Debug)]
pub enum AnimalError {
    #[error("unknown animal kind: {0}")]
    InvalidKind(String),

    #[error("animal api returned status {status}")]
    Upstream { status: u16 },

    #[error("animal api request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("animal api response missing `{0}`")]
    MissingField(&'static str),
}

#[derive(Debug, Deserialize)]
struct AnimalPayload {
    #[serde(default)]
    fact: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

/// Client for the random-animal endpoint
#[derive(Debug, Clone)]
pub struct AnimalClient {
    client: reqwest::Client,
    api_base: String,
}

impl AnimalClient {
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Result<Self, AnimalError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("meowie-bot/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.into(),
        })
    }

    /// Random fact about the given kind
    pub async fn fact(&self, kind: AnimalKind) -> Result<String, AnimalError> {
        let payload = self.fetch(kind).await?;
        require_field(payload.fact, "fact")
    }

    /// Random picture url for the given kind
    pub async fn picture(&self, kind: AnimalKind) -> Result<String, AnimalError> {
        let payload = self.fetch(kind).await?;
        require_field(payload.image, "image")
    }

    async fn fetch(&self, kind: AnimalKind) -> Result<AnimalPayload, AnimalError> {
        let url = format!("{}/animal/{}", self.api_base, kind);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnimalError::Upstream {
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

fn require_field(value: Option<String>, field: &'static str) -> Result<String, AnimalError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(AnimalError::MissingField(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_allowed_kind_parses() {
        for kind in AnimalKind::ALL {
            assert_eq!(kind.as_str().parse::<AnimalKind>().unwrap(), kind);
        }
    }

    #[test]
    fn kind_parsing_is_case_insensitive() {
        assert_eq!("CAT".parse::<AnimalKind>().unwrap(), AnimalKind::Cat);
        assert_eq!("Fox".parse::<AnimalKind>().unwrap(), AnimalKind::Fox);
    }

    #[test]
    fn unknown_kind_is_rejected_before_any_network_call() {
        let err = "elephant".parse::<AnimalKind>().unwrap_err();
        assert!(matches!(err, AnimalError::InvalidKind(kind) if kind == "elephant"));
    }

    #[test]
    fn payload_fields_are_extracted() {
        let payload: AnimalPayload = serde_json::from_str(
            r#"{"fact": "Cats sleep 70% of their lives.", "image": "https://example/cat.png"}"#,
        )
        .unwrap();

        assert_eq!(
            require_field(payload.fact, "fact").unwrap(),
            "Cats sleep 70% of their lives."
        );
        assert_eq!(
            require_field(payload.image, "image").unwrap(),
            "https://example/cat.png"
        );
    }

    #[test]
    fn missing_fields_are_reported() {
        let payload: AnimalPayload =
            serde_json::from_str(r#"{"fact": "only a fact"}"#).unwrap();

        assert!(require_field(payload.fact, "fact").is_ok());
        assert!(matches!(
            require_field(payload.image, "image").unwrap_err(),
            AnimalError::MissingField("image")
        ));
    }

    #[test]
    fn empty_fields_count_as_missing() {
        assert!(matches!(
            require_field(Some(String::new()), "fact").unwrap_err(),
            AnimalError::MissingField("fact")
        ));
    }
}
