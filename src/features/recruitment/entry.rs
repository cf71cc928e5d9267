//! Persistent "start recruitment" button
//!
//! On startup the bot makes sure the configured entry channel carries one
//! message with the entry button, so users can begin a draft without typing
//! `/recruit`. Safe to run on every reconnect.

use anyhow::Result;
use log::info;
use serenity::builder::CreateComponents;
use serenity::http::Http;
use serenity::model::application::component::{ActionRow, ActionRowComponent, ButtonStyle};
use serenity::model::id::{ChannelId, UserId};

/// Custom id of the entry button
pub const ENTRY_BUTTON_ID: &str = "recruit:start";

/// How far back to look for an existing entry message
const ENTRY_SCAN_LIMIT: u64 = 50;

const ENTRY_PROMPT: &str = "📣 **Looking for a party?** Press the button below to write a recruitment post.";

pub fn create_entry_button() -> CreateComponents {
    CreateComponents::default()
        .create_action_row(|row| {
            row.create_button(|button| {
                button
                    .custom_id(ENTRY_BUTTON_ID)
                    .label("📝 Write recruitment post")
                    .style(ButtonStyle::Success)
            })
        })
        .to_owned()
}

/// Whether any row holds the entry button
pub fn has_entry_button(rows: &[ActionRow]) -> bool {
    rows.iter()
        .flat_map(|row| row.components.iter())
        .any(|component| match component {
            ActionRowComponent::Button(button) => button.custom_id.as_deref() == Some(ENTRY_BUTTON_ID),
            _ => false,
        })
}

/// Post the entry message unless the bot already posted one recently
///
/// Returns true when a new message was sent.
pub async fn ensure_entry_message(http: &Http, channel_id: ChannelId, bot_id: UserId) -> Result<bool> {
    let messages = channel_id
        .messages(http, |retriever| retriever.limit(ENTRY_SCAN_LIMIT))
        .await?;

    if messages
        .iter()
        .any(|m| m.author.id == bot_id && has_entry_button(&m.components))
    {
        info!("📣 Entry button already present in channel {channel_id}");
        return Ok(false);
    }

    channel_id
        .send_message(http, |m| m.content(ENTRY_PROMPT).set_components(create_entry_button()))
        .await?;
    info!("📣 Posted recruitment entry button in channel {channel_id}");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn button_row(custom_id: &str) -> ActionRow {
        serde_json::from_value(json!({
            "type": 1,
            "components": [
                { "type": 2, "style": 3, "label": "📝 Write recruitment post", "custom_id": custom_id }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_create_entry_button() {
        let components = create_entry_button();
        assert_eq!(components.0.len(), 1);
    }

    #[test]
    fn test_has_entry_button_empty() {
        assert!(!has_entry_button(&[]));
    }

    #[test]
    fn test_has_entry_button_finds_existing() {
        let rows = vec![button_row("recruit:confirm"), button_row(ENTRY_BUTTON_ID)];
        assert!(has_entry_button(&rows));
    }

    #[test]
    fn test_has_entry_button_ignores_other_buttons() {
        let rows = vec![button_row("poll:vote"), button_row("recruit:start#99")];
        assert!(!has_entry_button(&rows));
    }

    #[test]
    fn test_has_entry_button_ignores_link_buttons() {
        let row: ActionRow = serde_json::from_value(json!({
            "type": 1,
            "components": [
                { "type": 2, "style": 5, "label": "Rules", "url": "https://discord.com/channels/1/2" }
            ]
        }))
        .unwrap();
        assert!(!has_entry_button(&[row]));
    }
}
