//! # Command System
//!
//! Slash command (/) handling for Discord interactions.
//!
//! - **Version**: 2.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.1.0: Add modular handler infrastructure (handler trait, context, registry)
//! - 2.0.0: Slash-only command system with /recruit
//! - 1.0.0: Initial /ping command

pub mod context;
pub mod handler;
pub mod handlers;
pub mod registry;
pub mod slash;

// Re-export the CommandHandler from the handler module
pub use crate::command_handler::CommandHandler;

// Re-export handler infrastructure
pub use context::CommandContext;
pub use handler::SlashCommandHandler;
pub use registry::{CommandRegistry, Dispatch};

// Re-export commonly used items from submodules
pub use slash::{create_slash_commands, register_global_commands, register_guild_commands};
