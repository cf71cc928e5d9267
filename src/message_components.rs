use anyhow::Result;
use log::{debug, error, info, warn};
use serenity::builder::CreateComponents;
use serenity::model::application::component::{ActionRowComponent, ButtonStyle, InputTextStyle};
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::modal::ModalSubmitInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::id::UserId;
use serenity::prelude::Context;
use std::sync::Arc;
use uuid::Uuid;

use crate::commands::CommandContext;
use crate::core::{truncate_chars, truncate_for_message, RecruitError, POST_TEXT_LIMIT};
use crate::features::recruitment::{
    PartySize, Publisher, RecruitmentSession, RecruitmentSessions, SerenityPlatform, Tag,
    ENTRY_BUTTON_ID,
};

/// Custom id prefix shared by every recruitment control
pub const RECRUIT_PREFIX: &str = "recruit:";
pub const TEXT_MODAL_ID: &str = "recruit:text_modal";
pub const TEXT_INPUT_ID: &str = "recruit:text";

/// Modal text input limit, leaving room for the voice link in the post body
const TEXT_INPUT_MAX: u64 = POST_TEXT_LIMIT as u64;

/// Every recruitment control, keyed by its custom id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentAction {
    Start,
    VoiceOn,
    VoiceOff,
    /// Duo/trio buttons; pressing the selected size clears it
    PartyButton(PartySize),
    PartySelect,
    /// Raw tag id, validated when toggled
    Tag(String),
    EditText,
    Confirm,
    Cancel,
}

impl ComponentAction {
    pub fn parse(custom_id: &str) -> Option<Self> {
        if custom_id == ENTRY_BUTTON_ID {
            return Some(ComponentAction::Start);
        }
        let id = custom_id.strip_prefix(RECRUIT_PREFIX)?;
        let action = match id {
            "voice_on" => ComponentAction::VoiceOn,
            "voice_off" => ComponentAction::VoiceOff,
            "party_select" => ComponentAction::PartySelect,
            "edit" => ComponentAction::EditText,
            "confirm" => ComponentAction::Confirm,
            "cancel" => ComponentAction::Cancel,
            _ => {
                if let Some(size) = id.strip_prefix("party:") {
                    ComponentAction::PartyButton(PartySize::from_id(size)?)
                } else if let Some(tag) = id.strip_prefix("tag:") {
                    ComponentAction::Tag(tag.to_string())
                } else {
                    return None;
                }
            }
        };
        Some(action)
    }

    /// Parse a custom id that may carry an owner scope (`<id>#<user id>`)
    pub fn parse_scoped(custom_id: &str) -> Option<(Self, Option<UserId>)> {
        match custom_id.rsplit_once('#') {
            Some((id, owner)) => Some((Self::parse(id)?, Some(UserId(owner.parse().ok()?)))),
            None => Some((Self::parse(custom_id)?, None)),
        }
    }

    /// Custom id that only the draft owner may use
    pub fn scoped_id(&self, owner: UserId) -> String {
        format!("{}#{}", self.custom_id(), owner.0)
    }

    pub fn custom_id(&self) -> String {
        match self {
            ComponentAction::Start => ENTRY_BUTTON_ID.to_string(),
            ComponentAction::VoiceOn => format!("{RECRUIT_PREFIX}voice_on"),
            ComponentAction::VoiceOff => format!("{RECRUIT_PREFIX}voice_off"),
            ComponentAction::PartyButton(size) => format!("{RECRUIT_PREFIX}party:{}", size.id()),
            ComponentAction::PartySelect => format!("{RECRUIT_PREFIX}party_select"),
            ComponentAction::Tag(tag) => format!("{RECRUIT_PREFIX}tag:{tag}"),
            ComponentAction::EditText => format!("{RECRUIT_PREFIX}edit"),
            ComponentAction::Confirm => format!("{RECRUIT_PREFIX}confirm"),
            ComponentAction::Cancel => format!("{RECRUIT_PREFIX}cancel"),
        }
    }
}

/// Apply an option control to the user's draft under one lock
pub async fn apply_option_action(
    sessions: &RecruitmentSessions,
    owner: UserId,
    action: &ComponentAction,
    values: &[String],
) -> Result<RecruitmentSession, RecruitError> {
    match action {
        ComponentAction::VoiceOn => sessions.toggle_voice(owner, true).await,
        ComponentAction::VoiceOff => sessions.toggle_voice(owner, false).await,
        ComponentAction::PartySelect => {
            let size = values
                .first()
                .and_then(|v| PartySize::from_id(v))
                .unwrap_or_default();
            sessions.set_party_size(owner, size).await
        }
        ComponentAction::PartyButton(size) => {
            let mut slot = sessions.slot(owner).await;
            let session = slot.session_mut().ok_or(RecruitError::NoActiveSession)?;
            let next = if session.party_size == *size {
                PartySize::Unspecified
            } else {
                *size
            };
            session.set_party_size(next)?;
            Ok(session.clone())
        }
        ComponentAction::Tag(tag_id) => sessions.toggle_tag(owner, tag_id).await,
        _ => sessions.get(owner).await.ok_or(RecruitError::NoActiveSession),
    }
}

fn style_for(selected: bool) -> ButtonStyle {
    if selected {
        ButtonStyle::Primary
    } else {
        ButtonStyle::Secondary
    }
}

/// Handler for all message component interactions
pub struct MessageComponentHandler {
    context: Arc<CommandContext>,
}

impl MessageComponentHandler {
    pub fn new(context: Arc<CommandContext>) -> Self {
        Self { context }
    }

    /// Handle all types of component interactions
    pub async fn handle_component_interaction(&self, ctx: &Context, interaction: &MessageComponentInteraction) -> Result<()> {
        let request_id = Uuid::new_v4();
        let custom_id = &interaction.data.custom_id;
        let owner = interaction.user.id;

        info!("[{request_id}] 🖱️ Component interaction: {custom_id} from user: {owner}");

        let Some((action, scope)) = ComponentAction::parse_scoped(custom_id) else {
            interaction
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|message| {
                            message.content("Unknown component interaction.").ephemeral(true)
                        })
                })
                .await?;
            return Ok(());
        };

        if scope.is_some_and(|draft_owner| draft_owner != owner) {
            debug!("[{request_id}] {owner} pressed a control of another user's draft");
            return self.reply_error(ctx, interaction, &RecruitError::NotDraftOwner).await;
        }

        match action {
            ComponentAction::Start => {
                let session = self.context.sessions.start(owner).await;
                debug!("[{request_id}] 📝 Draft started from entry button");
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| {
                                message
                                    .content(Self::draft_summary(&session))
                                    .set_components(Self::create_option_components(&session))
                                    .ephemeral(true)
                            })
                    })
                    .await?;
            }
            ComponentAction::EditText => {
                match self.context.sessions.get(owner).await {
                    Some(session) => self.show_text_modal(ctx, interaction, &session).await?,
                    None => self.reply_error(ctx, interaction, &RecruitError::NoActiveSession).await?,
                }
            }
            ComponentAction::Confirm => {
                self.handle_confirm(ctx, interaction, request_id).await?;
            }
            ComponentAction::Cancel => {
                self.context.sessions.remove(owner).await;
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::UpdateMessage)
                            .interaction_response_data(|message| {
                                message
                                    .content("🗑️ Recruitment draft discarded.")
                                    .components(|c| c) // Clear components
                            })
                    })
                    .await?;
            }
            option => {
                match apply_option_action(&self.context.sessions, owner, &option, &interaction.data.values).await {
                    Ok(session) => {
                        interaction
                            .create_interaction_response(&ctx.http, |response| {
                                response
                                    .kind(InteractionResponseType::UpdateMessage)
                                    .interaction_response_data(|message| {
                                        message
                                            .content(Self::draft_summary(&session))
                                            .set_components(Self::create_option_components(&session))
                                    })
                            })
                            .await?;
                    }
                    Err(e) => {
                        debug!("[{request_id}] Option {custom_id} rejected: {e}");
                        self.reply_error(ctx, interaction, &e).await?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Handle modal submit interactions
    pub async fn handle_modal_submit(&self, ctx: &Context, interaction: &ModalSubmitInteraction) -> Result<()> {
        let custom_id = &interaction.data.custom_id;
        let owner = interaction.user.id;

        info!("Processing modal submit: {custom_id} from user: {owner}");

        if custom_id != TEXT_MODAL_ID {
            interaction
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|message| {
                            message.content("Unknown modal submission.").ephemeral(true)
                        })
                })
                .await?;
            return Ok(());
        }

        let mut text = String::new();
        for action_row in &interaction.data.components {
            for component in &action_row.components {
                if let ActionRowComponent::InputText(input) = component {
                    if input.custom_id == TEXT_INPUT_ID {
                        text = input.value.clone();
                    }
                }
            }
        }

        match self.context.sessions.edit_text(owner, &text).await {
            Ok(session) => {
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::UpdateMessage)
                            .interaction_response_data(|message| {
                                message
                                    .content(Self::draft_summary(&session))
                                    .set_components(Self::create_option_components(&session))
                            })
                    })
                    .await?;
            }
            Err(e) => {
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| {
                                message.content(e.user_message()).ephemeral(true)
                            })
                    })
                    .await?;
            }
        }

        Ok(())
    }

    /// Publish the draft; the reply is deferred since two channel creations can be slow
    async fn handle_confirm(&self, ctx: &Context, interaction: &MessageComponentInteraction, request_id: Uuid) -> Result<()> {
        let Some(guild_id) = interaction.guild_id else {
            interaction
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|message| {
                            message
                                .content("❗ Recruitment posts can only be created inside a server.")
                                .ephemeral(true)
                        })
                })
                .await?;
            return Ok(());
        };

        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::DeferredChannelMessageWithSource)
                    .interaction_response_data(|message| message.ephemeral(true))
            })
            .await?;

        let platform = SerenityPlatform::new(ctx.http.clone(), guild_id);
        let publisher = Publisher::new(&self.context.sessions, &self.context.targets);

        let reply = match publisher.publish(interaction.user.id, &platform).await {
            Ok(published) => {
                info!("[{request_id}] ✅ Recruitment post created: {}", published.thread.url);
                format!("✅ Recruitment post created\n👉 {}", published.thread.url)
            }
            Err(e) => {
                match &e {
                    RecruitError::RemoteOperationFailure { source, .. } => {
                        error!("[{request_id}] ❌ Publish failed: {e}: {source}");
                    }
                    _ => warn!("[{request_id}] Publish rejected: {e}"),
                }
                e.user_message().to_string()
            }
        };

        interaction
            .edit_original_interaction_response(&ctx.http, |response| response.content(&reply))
            .await?;

        Ok(())
    }

    async fn reply_error(&self, ctx: &Context, interaction: &MessageComponentInteraction, err: &RecruitError) -> Result<()> {
        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message.content(err.user_message()).ephemeral(true)
                    })
            })
            .await?;
        Ok(())
    }

    /// Show the edit-content modal, prefilled with the current text
    async fn show_text_modal(&self, ctx: &Context, interaction: &MessageComponentInteraction, session: &RecruitmentSession) -> Result<()> {
        let current = session.text.clone().unwrap_or_default();
        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::Modal)
                    .interaction_response_data(|modal| {
                        modal
                            .custom_id(TEXT_MODAL_ID)
                            .title("Recruitment post")
                            .components(|c| {
                                c.create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id(TEXT_INPUT_ID)
                                            .label("Post content")
                                            .style(InputTextStyle::Paragraph)
                                            .placeholder("What are you recruiting for?")
                                            .value(&current)
                                            .required(true)
                                            .min_length(1)
                                            .max_length(TEXT_INPUT_MAX)
                                    })
                                })
                            })
                    })
            })
            .await?;

        Ok(())
    }

    /// Message text describing a draft
    pub fn draft_summary(session: &RecruitmentSession) -> String {
        let content = match session.content() {
            Some(text) => format!("> {}", text.replace('\n', "\n> ")),
            None => "✏️ **Type the recruitment post content in this channel**, or press **Edit content**.".to_string(),
        };
        let tags = if session.tags.is_empty() {
            "none".to_string()
        } else {
            session.tags.iter().map(Tag::label).collect::<Vec<_>>().join(", ")
        };
        let voice = if session.voice_enabled { "ON" } else { "OFF" };

        truncate_for_message(&format!(
            "📝 **Recruitment draft**\n{content}\n\n🔊 Voice: {voice} | 👥 Party: {} | 🏷️ Tags: {tags}",
            session.party_size.label()
        ))
    }

    /// Reply to a chat message whose text was just captured
    pub fn capture_reply(session: &RecruitmentSession) -> String {
        truncate_for_message(&format!(
            "✅ Content saved. Pick your options, then create the post.\n\n{}",
            Self::draft_summary(session)
        ))
    }

    /// Create the option controls for a draft; every id is scoped to its owner
    pub fn create_option_components(session: &RecruitmentSession) -> CreateComponents {
        CreateComponents::default()
            .create_action_row(|row| {
                row.create_button(|button| {
                    button
                        .custom_id(ComponentAction::VoiceOn.scoped_id(session.owner_id))
                        .label("🔊 Voice ON")
                        .style(style_for(session.voice_enabled))
                })
                .create_button(|button| {
                    button
                        .custom_id(ComponentAction::VoiceOff.scoped_id(session.owner_id))
                        .label("🔇 Voice OFF")
                        .style(style_for(!session.voice_enabled))
                })
                .create_button(|button| {
                    button
                        .custom_id(ComponentAction::PartyButton(PartySize::Duo).scoped_id(session.owner_id))
                        .label(PartySize::Duo.label())
                        .style(style_for(session.party_size == PartySize::Duo))
                })
                .create_button(|button| {
                    button
                        .custom_id(ComponentAction::PartyButton(PartySize::Trio).scoped_id(session.owner_id))
                        .label(PartySize::Trio.label())
                        .style(style_for(session.party_size == PartySize::Trio))
                })
            })
            .create_action_row(|row| {
                row.create_select_menu(|menu| {
                    menu.custom_id(ComponentAction::PartySelect.scoped_id(session.owner_id))
                        .placeholder("👥 Party size")
                        .options(|options| {
                            for size in PartySize::ALL {
                                options.create_option(|option| {
                                    option
                                        .label(size.label())
                                        .value(size.id())
                                        .default_selection(session.party_size == size)
                                });
                            }
                            options
                        })
                })
            })
            .create_action_row(|row| {
                for tag in Tag::ALL {
                    row.create_button(|button| {
                        button
                            .custom_id(ComponentAction::Tag(tag.id().to_string()).scoped_id(session.owner_id))
                            .label(tag.label())
                            .style(style_for(session.tags.contains(&tag)))
                    });
                }
                row
            })
            .create_action_row(|row| {
                row.create_button(|button| {
                    button
                        .custom_id(ComponentAction::EditText.scoped_id(session.owner_id))
                        .label("✏️ Edit content")
                        .style(ButtonStyle::Secondary)
                })
                .create_button(|button| {
                    button
                        .custom_id(ComponentAction::Confirm.scoped_id(session.owner_id))
                        .label("✅ Create post")
                        .style(ButtonStyle::Success)
                })
                .create_button(|button| {
                    button
                        .custom_id(ComponentAction::Cancel.scoped_id(session.owner_id))
                        .label("🗑️ Discard")
                        .style(ButtonStyle::Danger)
                })
            })
            .to_owned()
    }

    /// Short label for logs
    pub fn describe(session: &RecruitmentSession) -> String {
        match session.content() {
            Some(text) => truncate_chars(text, 20),
            None => "<no content>".to_string(),
        }
    }
}
