//! Slash command handler trait
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: Handlers declare whether they only work inside a server
//! - 1.0.0: Handler trait for `/ping` and `/recruit`

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use super::context::CommandContext;

/// A slash command backed by the recruitment context
///
/// ```ignore
/// pub struct RecruitHandler;
///
/// #[async_trait]
/// impl SlashCommandHandler for RecruitHandler {
///     fn command_names(&self) -> &'static [&'static str] {
///         &["recruit"]
///     }
///
///     fn guild_only(&self) -> bool {
///         true
///     }
///
///     async fn handle(&self, ctx: Arc<CommandContext>, serenity_ctx: &Context, command: &ApplicationCommandInteraction) -> Result<()> {
///         let session = ctx.sessions.start(command.user.id).await;
///         // reply with the draft controls
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait SlashCommandHandler: Send + Sync {
    fn command_names(&self) -> &'static [&'static str];

    /// Drafts publish into a guild's forum, so draft commands refuse DMs
    fn guild_only(&self) -> bool {
        false
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()>;
}
