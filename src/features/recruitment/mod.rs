//! # Feature: Recruitment Posts
//!
//! Walks a user through composing a recruitment post: capture the text, toggle
//! voice channel / party size / topic tags, then publish a forum thread and an
//! optional companion voice channel. Drafts live in memory, one per user.
//!
//! - **Version**: 1.3.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.3.0: Persistent entry button, TTL eviction of abandoned drafts
//! - 1.2.0: Explicit stages, per-user locking, voice cleanup on failed publish
//! - 1.1.0: Edit-content modal and party size select menu
//! - 1.0.0: Initial release with chat capture and option buttons

pub mod entry;
pub mod platform;
pub mod publish;
pub mod session;
pub mod store;
pub mod sweeper;

pub use entry::{ensure_entry_message, ENTRY_BUTTON_ID};
pub use platform::SerenityPlatform;
pub use publish::{
    CreatedChannel, ForumThreadRequest, PublishPlan, PublishTargets, Published, Publisher,
    RecruitPlatform, VoiceChannelRequest,
};
pub use session::{Action, ForumTagTable, PartySize, RecruitmentSession, Stage, Tag};
pub use store::{InMemorySessionStore, RecruitmentSessions, SessionSlot, SessionStore};
pub use sweeper::{session_sweep_loop, SWEEP_INTERVAL};
