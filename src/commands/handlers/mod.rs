//! Per-command handler implementations
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: Add RecruitHandler
//! - 1.0.0: Initial extraction from command_handler.rs

pub mod recruit;
pub mod utility;

use std::sync::Arc;

use super::handler::SlashCommandHandler;

/// Create all registered command handlers
pub fn create_all_handlers() -> Vec<Arc<dyn SlashCommandHandler>> {
    vec![Arc::new(utility::UtilityHandler), Arc::new(recruit::RecruitHandler)]
}
