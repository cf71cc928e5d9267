//! Recruit command handler
//!
//! Handles: recruit

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::message_components::MessageComponentHandler;

/// Starts a fresh recruitment draft, replacing any draft the user had
pub struct RecruitHandler;

#[async_trait]
impl SlashCommandHandler for RecruitHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["recruit"]
    }

    fn guild_only(&self) -> bool {
        true
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let owner = command.user.id;
        let replaced = ctx.sessions.exists(owner).await;
        let session = ctx.sessions.start(owner).await;

        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message
                            .content(MessageComponentHandler::draft_summary(&session))
                            .set_components(MessageComponentHandler::create_option_components(&session))
                            .ephemeral(true)
                    })
            })
            .await?;

        if replaced {
            info!("📝 Recruitment draft restarted for user {owner}");
        } else {
            info!("📝 Recruitment draft started for user {owner}");
        }
        Ok(())
    }
}
