//! # Core Module
//!
//! Core domain types, configuration, and error handling for the recruitment bot.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Add RecruitError domain errors
//! - 1.1.0: Add response module with Discord length limits and truncation
//! - 1.0.0: Initial creation with config module

pub mod config;
pub mod error;
pub mod response;

// Re-export commonly used items
pub use config::Config;
pub use error::RecruitError;
pub use response::{
    clip_chars, truncate_chars, truncate_for_message, MESSAGE_LIMIT, POST_TEXT_LIMIT, TITLE_CHAR_LIMIT,
};
