//! Message parser - decides whether raw text addresses the bot

/// Outcome of parsing one message body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// Prefixed invocation, split into command token and positional args
    Command { name: String, args: Vec<String> },
    /// The configured mention token used in place of the prefix
    MentionPing,
    /// Anything else; dispatch ignores it
    Plain,
}

/// Splits raw message text into command token and argument remainder
pub struct MessageParser {
    prefix: String,
    mention_token: Option<String>,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            mention_token: None,
        }
    }

    pub fn with_mention_token(mut self, token: impl Into<String>) -> Self {
        self.mention_token = Some(token.into());
        self
    }

    /// Parse one message body. The prefix must match literally at the very
    /// start of the text; the remainder splits on the first whitespace run.
    pub fn parse(&self, text: &str) -> Parsed {
        if let Some(token) = &self.mention_token {
            if text == token {
                return Parsed::MentionPing;
            }
        }

        let Some(rest) = text.strip_prefix(&self.prefix) else {
            return Parsed::Plain;
        };

        let mut parts = rest.split_whitespace();
        let Some(name) = parts.next() else {
            return Parsed::Plain;
        };

        Parsed::Command {
            name: name.to_string(),
            args: parts.map(str::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> MessageParser {
        MessageParser::new("^").with_mention_token("<@01ABC>")
    }

    #[test]
    fn unprefixed_text_is_plain() {
        assert_eq!(parser().parse("hello"), Parsed::Plain);
    }

    #[test]
    fn prefix_must_be_at_the_start() {
        assert_eq!(parser().parse("say ^cat"), Parsed::Plain);
    }

    #[test]
    fn prefixed_token_becomes_a_command() {
        assert_eq!(
            parser().parse("^cat"),
            Parsed::Command {
                name: "cat".to_string(),
                args: vec![],
            }
        );
    }

    #[test]
    fn remainder_splits_into_positional_args() {
        assert_eq!(
            parser().parse("^fact   cat  extra"),
            Parsed::Command {
                name: "fact".to_string(),
                args: vec!["cat".to_string(), "extra".to_string()],
            }
        );
    }

    #[test]
    fn bare_prefix_is_plain() {
        assert_eq!(parser().parse("^"), Parsed::Plain);
        assert_eq!(parser().parse("^   "), Parsed::Plain);
    }

    #[test]
    fn mention_token_is_recognized_exactly() {
        assert_eq!(parser().parse("<@01ABC>"), Parsed::MentionPing);
        assert_eq!(parser().parse("<@01ABC> hi"), Parsed::Plain);
    }
}
