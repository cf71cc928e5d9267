//! Command handler registry
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: Resolve commands against where they were invoked
//! - 1.0.0: Name to handler lookup

use std::collections::HashMap;
use std::sync::Arc;

use super::handler::SlashCommandHandler;

/// Outcome of looking up an invoked slash command
pub enum Dispatch {
    Run(Arc<dyn SlashCommandHandler>),
    /// The command exists but was used outside a server
    GuildOnly,
    Unknown,
}

/// Slash command names mapped to their handlers
#[derive(Clone, Default)]
pub struct CommandRegistry {
    handlers: HashMap<&'static str, Arc<dyn SlashCommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `/ping` and `/recruit`
    pub fn with_default_handlers() -> Self {
        let mut registry = Self::new();
        for handler in super::handlers::create_all_handlers() {
            registry.register(handler);
        }
        registry
    }

    pub fn register(&mut self, handler: Arc<dyn SlashCommandHandler>) {
        for name in handler.command_names() {
            self.handlers.insert(name, Arc::clone(&handler));
        }
    }

    /// Pick the handler for `name`, honouring guild-only commands
    pub fn resolve(&self, name: &str, in_guild: bool) -> Dispatch {
        match self.handlers.get(name) {
            Some(handler) if handler.guild_only() && !in_guild => Dispatch::GuildOnly,
            Some(handler) => Dispatch::Run(Arc::clone(handler)),
            None => Dispatch::Unknown,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
