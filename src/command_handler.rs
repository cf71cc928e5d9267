use crate::commands::{CommandContext, CommandRegistry, Dispatch};
use crate::core::RecruitError;
use crate::message_components::MessageComponentHandler;
use anyhow::Result;
use log::{debug, info, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::channel::Message;
use serenity::prelude::Context;
use std::sync::Arc;
use uuid::Uuid;

/// Entry point for slash commands and plain chat messages
#[derive(Clone)]
pub struct CommandHandler {
    context: Arc<CommandContext>,
    registry: CommandRegistry,
}

impl CommandHandler {
    pub fn new(context: Arc<CommandContext>) -> Self {
        Self {
            context,
            registry: CommandRegistry::with_default_handlers(),
        }
    }

    pub fn context(&self) -> Arc<CommandContext> {
        Arc::clone(&self.context)
    }

    /// Capture recruitment content typed as a chat message
    ///
    /// Messages from users without a draft, or whose draft already has content,
    /// are ordinary chat and are left alone.
    pub async fn handle_message(&self, ctx: &Context, msg: &Message) -> Result<()> {
        let request_id = Uuid::new_v4();
        let owner = msg.author.id;

        let session = match self.context.sessions.set_text(owner, &msg.content).await {
            Ok(session) => session,
            Err(RecruitError::NoActiveSession) | Err(RecruitError::TextAlreadyCaptured) => {
                return Ok(());
            }
            Err(e) => {
                debug!("[{request_id}] Ignoring message from {owner} with a draft open: {e}");
                return Ok(());
            }
        };

        info!(
            "[{request_id}] 📥 Recruitment content captured | User: {owner} | Channel: {} | Content: '{}'",
            msg.channel_id,
            MessageComponentHandler::describe(&session)
        );

        msg.channel_id
            .send_message(&ctx.http, |m| {
                m.reference_message(msg)
                    .content(MessageComponentHandler::capture_reply(&session))
                    .set_components(MessageComponentHandler::create_option_components(&session))
            })
            .await?;

        Ok(())
    }

    pub async fn handle_slash_command(&self, ctx: &Context, command: &ApplicationCommandInteraction) -> Result<()> {
        let request_id = Uuid::new_v4();
        let user_id = command.user.id;
        let guild_id = command
            .guild_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "DM".to_string());

        info!(
            "[{}] 📥 Slash command received | Command: {} | User: {} | Channel: {} | Guild: {}",
            request_id, command.data.name, user_id, command.channel_id, guild_id
        );

        let reply = match self.registry.resolve(&command.data.name, command.guild_id.is_some()) {
            Dispatch::Run(handler) => {
                handler.handle(self.context(), ctx, command).await?;
                debug!("[{request_id}] ✅ /{} completed", command.data.name);
                return Ok(());
            }
            Dispatch::GuildOnly => {
                debug!("[{request_id}] /{} refused outside a server", command.data.name);
                "❗ Recruitment posts can only be created inside a server."
            }
            Dispatch::Unknown => {
                warn!("[{request_id}] Unknown slash command: {}", command.data.name);
                "Unknown command."
            }
        };

        command
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| message.content(reply).ephemeral(true))
            })
            .await?;

        Ok(())
    }
}
