//! Message dispatcher - routes incoming messages to command handlers

use std::sync::Arc;

use futures::future::try_join_all;

use crate::application::state::AppState;
use crate::domain::entities::command::CommandRegistry;
use crate::domain::entities::{Message, OutgoingMessage};
use crate::domain::traits::Messageable;

use super::context::Context;
use super::parser::{MessageParser, Parsed};

/// Terminal state of one dispatch pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Message was not addressed to the bot, or came from a bot
    Ignored,
    /// Mention token answered with the prefix hint
    PrefixHint,
    /// Prefixed token matched no registered command
    UnknownCommand(String),
    /// A pre-invoke check refused the invocation or raised
    CheckFailed(String),
    /// Handler ran to completion
    Completed(String),
    /// Handler raised; contained at this boundary
    Failed(String),
}

/// Dispatcher behavior switches
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    /// Reply to unrecognized command tokens instead of discarding silently
    pub notify_unknown_command: bool,
}

/// Routes each incoming message to zero or one command handler.
///
/// Handler and check errors never escape `dispatch`: they are logged and
/// folded into the returned outcome so the event loop survives anything a
/// handler does.
pub struct Dispatcher {
    parser: MessageParser,
    registry: CommandRegistry,
    options: DispatchOptions,
    state: Arc<AppState>,
}

impl Dispatcher {
    pub fn new(
        parser: MessageParser,
        registry: CommandRegistry,
        options: DispatchOptions,
        state: Arc<AppState>,
    ) -> Self {
        Self {
            parser,
            registry,
            options,
            state,
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Process one incoming message
    pub async fn dispatch(
        &self,
        message: Message,
        channel: Arc<dyn Messageable>,
    ) -> DispatchOutcome {
        if message.author.is_bot || message.author.id == self.state.identity.id {
            return DispatchOutcome::Ignored;
        }

        let (name, args) = match self.parser.parse(&message.content) {
            Parsed::Plain => return DispatchOutcome::Ignored,
            Parsed::MentionPing => {
                let hint = format!("Mah prefix iz `{}`!!", self.state.prefix);
                if let Err(err) = channel.send(OutgoingMessage::text(hint)).await {
                    tracing::warn!("failed to send prefix hint: {}", err);
                }
                return DispatchOutcome::PrefixHint;
            }
            Parsed::Command { name, args } => (name, args),
        };

        let Some(command) = self.registry.find(&name) else {
            tracing::debug!("no command registered for '{}'", name);
            if self.options.notify_unknown_command {
                let reply = format!("Unknown command: {}{}", self.state.prefix, name);
                if let Err(err) = channel.send(OutgoingMessage::text(reply)).await {
                    tracing::warn!("failed to report unknown command: {}", err);
                }
            }
            return DispatchOutcome::UnknownCommand(name);
        };

        let ctx = Context::new(
            message,
            command.name.clone(),
            args,
            channel,
            Arc::clone(&self.state),
        );

        if !command.checks.is_empty() {
            let checks = command.checks.iter().map(|check| check(ctx.clone()));
            match try_join_all(checks).await {
                Ok(results) if results.iter().all(|passed| *passed) => {}
                Ok(_) => {
                    tracing::warn!("check refused invocation of '{}'", command.name);
                    return DispatchOutcome::CheckFailed(command.name.clone());
                }
                Err(err) => {
                    tracing::warn!("check for '{}' raised: {}", command.name, err);
                    return DispatchOutcome::CheckFailed(command.name.clone());
                }
            }
        }

        let Some(handler) = &command.handler else {
            tracing::warn!("command '{}' has no handler", command.name);
            return DispatchOutcome::Failed(command.name.clone());
        };

        match handler(ctx.clone()).await {
            Ok(()) => DispatchOutcome::Completed(command.name.clone()),
            Err(err) => {
                tracing::error!("handler for '{}' failed: {}", command.name, err);
                let apology = format!(
                    "Something went wrong running {}{} :c",
                    self.state.prefix, command.name
                );
                if let Err(send_err) = ctx.say(apology).await {
                    tracing::warn!("failed to report handler failure: {}", send_err);
                }
                DispatchOutcome::Failed(command.name.clone())
            }
        }
    }
}
