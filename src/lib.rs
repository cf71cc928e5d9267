// Core layer - shared types and configuration
pub mod core;

// Features layer - all feature modules
pub mod features;

// UI components
pub mod message_components;

// Application layer
pub mod command_handler;
pub mod commands;

pub use crate::core::{Config, RecruitError};

pub use features::recruitment::{
    ForumTagTable, InMemorySessionStore, PartySize, PublishTargets, Publisher, RecruitPlatform,
    RecruitmentSession, RecruitmentSessions, SessionStore, Stage, Tag,
};
