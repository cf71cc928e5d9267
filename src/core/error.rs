//! Recruitment domain errors
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: Add NotDraftOwner for controls pressed by another user
//! - 1.0.0: Initial draft errors

use thiserror::Error;

/// Errors raised by the recruitment draft flow.
///
/// None of these are fatal to the bot: every variant maps to a short reply for
/// the acting user via [`RecruitError::user_message`].
#[derive(Error, Debug)]
pub enum RecruitError {
    /// An action arrived for a user with no draft in progress.
    #[error("no recruitment draft in progress")]
    NoActiveSession,

    /// Publish (or a text update) was attempted without any post content.
    #[error("recruitment post content is missing")]
    MissingContent,

    /// A tag id outside the fixed vocabulary.
    #[error("unknown recruitment tag: {0}")]
    UnknownTag(String),

    /// A chat message arrived after the content was already captured.
    #[error("recruitment post content was already captured")]
    TextAlreadyCaptured,

    /// A draft control was pressed by someone other than the draft's owner.
    #[error("draft control belongs to another user")]
    NotDraftOwner,

    /// A Discord call failed while publishing.
    #[error("failed to {action}")]
    RemoteOperationFailure {
        action: &'static str,
        source: anyhow::Error,
    },
}

impl RecruitError {
    /// Reply shown to the user when this error ends an interaction
    pub fn user_message(&self) -> &'static str {
        match self {
            RecruitError::NoActiveSession => {
                "❗ No recruitment draft in progress. Start one with `/recruit`."
            }
            RecruitError::MissingContent => {
                "❗ Please enter the recruitment post content first."
            }
            RecruitError::UnknownTag(_) => "❗ That tag is not available.",
            RecruitError::TextAlreadyCaptured => {
                "ℹ️ Content is already saved. Use **Edit content** to change it."
            }
            RecruitError::NotDraftOwner => {
                "❗ These controls belong to someone else's draft. Start your own with `/recruit`."
            }
            RecruitError::RemoteOperationFailure { .. } => {
                "❌ Sorry, creating the recruitment post failed. Please press confirm again."
            }
        }
    }
}
