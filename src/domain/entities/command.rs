use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::application::errors::{CommandError, RegistryError};
use crate::application::messaging::Context;

/// Boxed future returned by command handlers
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<(), CommandError>> + Send>>;

/// Command handler function type
pub type Handler = Arc<dyn Fn(Context) -> HandlerFuture + Send + Sync>;

/// Boxed future returned by pre-invoke checks
pub type CheckFuture = Pin<Box<dyn Future<Output = Result<bool, CommandError>> + Send>>;

/// Pre-invoke check function type
pub type Check = Arc<dyn Fn(Context) -> CheckFuture + Send + Sync>;

/// A bot command
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub aliases: Vec<String>,
    pub usage: Option<String>,
    pub handler: Option<Handler>,
    pub checks: Vec<Check>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            aliases: Vec::new(),
            usage: None,
            handler: None,
            checks: Vec::new(),
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn with_check<F, Fut>(mut self, check: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool, CommandError>> + Send + 'static,
    {
        self.checks.push(Arc::new(move |ctx| Box::pin(check(ctx))));
        self
    }

    pub fn with_handler<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CommandError>> + Send + 'static,
    {
        self.handler = Some(Arc::new(move |ctx| Box::pin(handler(ctx))));
        self
    }
}

/// Registry mapping names and aliases to commands.
///
/// Every name and alias is a lowercased key into the same map, so lookup is
/// a single hash probe. Populated once at startup, read-only afterwards.
#[derive(Default)]
pub struct CommandRegistry {
    index: HashMap<String, Arc<Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Fails if its name or any alias is already
    /// claimed, case-insensitively, by this or a previous registration.
    pub fn register(&mut self, command: Command) -> Result<(), RegistryError> {
        let command = Arc::new(command);

        let mut keys = Vec::with_capacity(1 + command.aliases.len());
        keys.push(command.name.to_lowercase());
        keys.extend(command.aliases.iter().map(|a| a.to_lowercase()));

        for (i, key) in keys.iter().enumerate() {
            if self.index.contains_key(key) || keys[..i].contains(key) {
                return Err(RegistryError::Duplicate(key.clone()));
            }
        }

        for key in keys {
            self.index.insert(key, Arc::clone(&command));
        }

        Ok(())
    }

    /// Look up a command by name or alias, case-insensitively
    pub fn find(&self, token: &str) -> Option<&Arc<Command>> {
        self.index.get(&token.to_lowercase())
    }

    /// Iterate registered commands, one entry each regardless of aliases
    pub fn commands(&self) -> impl Iterator<Item = &Arc<Command>> {
        self.index
            .iter()
            .filter(|(key, cmd)| **key == cmd.name.to_lowercase())
            .map(|(_, cmd)| cmd)
    }

    pub fn len(&self) -> usize {
        self.commands().count()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_find() {
        let mut registry = CommandRegistry::new();
        registry.register(Command::new("cat")).unwrap();

        assert!(registry.find("cat").is_some());
        assert_eq!(registry.find("cat").unwrap().name, "cat");
        assert!(registry.find("dog").is_none());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut registry = CommandRegistry::new();
        registry.register(Command::new("cat")).unwrap();

        assert!(registry.find("CAT").is_some());
        assert!(registry.find("Cat").is_some());
    }

    #[test]
    fn aliases_resolve_to_their_command() {
        let mut registry = CommandRegistry::new();
        registry
            .register(Command::new("ping").with_aliases(vec!["pingcog".to_string()]))
            .unwrap();

        assert_eq!(registry.find("pingcog").unwrap().name, "ping");
        assert_eq!(registry.find("PINGCOG").unwrap().name, "ping");
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut registry = CommandRegistry::new();
        registry.register(Command::new("cat")).unwrap();

        let err = registry.register(Command::new("CAT")).unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("cat".to_string()));
    }

    #[test]
    fn alias_clashing_with_existing_name_is_rejected() {
        let mut registry = CommandRegistry::new();
        registry.register(Command::new("cat")).unwrap();

        let err = registry
            .register(Command::new("kitty").with_aliases(vec!["Cat".to_string()]))
            .unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("cat".to_string()));
    }

    #[test]
    fn name_clashing_with_existing_alias_is_rejected() {
        let mut registry = CommandRegistry::new();
        registry
            .register(Command::new("ping").with_aliases(vec!["pong".to_string()]))
            .unwrap();

        assert!(registry.register(Command::new("pong")).is_err());
    }

    #[test]
    fn self_colliding_command_is_rejected_atomically() {
        let mut registry = CommandRegistry::new();
        let err = registry
            .register(Command::new("cat").with_aliases(vec!["cat".to_string()]))
            .unwrap_err();

        assert_eq!(err, RegistryError::Duplicate("cat".to_string()));
        // nothing from the failed registration may leak into the index
        assert!(registry.find("cat").is_none());
    }

    #[test]
    fn commands_iterates_each_command_once() {
        let mut registry = CommandRegistry::new();
        registry
            .register(Command::new("ping").with_aliases(vec!["pingcog".to_string()]))
            .unwrap();
        registry.register(Command::new("cat")).unwrap();

        assert_eq!(registry.len(), 2);
    }
}
