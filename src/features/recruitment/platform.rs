//! Discord implementation of [`RecruitPlatform`]

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use serde_json::{json, Map, Value};
use serenity::http::Http;
use serenity::model::channel::ChannelType;
use serenity::model::id::{ChannelId, GuildId};

use super::publish::{CreatedChannel, ForumThreadRequest, RecruitPlatform, VoiceChannelRequest};

/// Jump link for a channel or thread
pub fn channel_url(guild_id: GuildId, channel_id: ChannelId) -> String {
    format!("https://discord.com/channels/{}/{}", guild_id.0, channel_id.0)
}

/// Body of a forum post request (`POST /channels/{forum}/threads`)
pub fn forum_post_payload(request: &ForumThreadRequest) -> Map<String, Value> {
    let applied_tags: Vec<String> = request.applied_tags.iter().map(|id| id.to_string()).collect();

    let mut map = Map::new();
    map.insert("name".to_string(), json!(request.title));
    map.insert("applied_tags".to_string(), json!(applied_tags));
    map.insert("message".to_string(), json!({ "content": request.body }));
    map
}

/// Creates recruitment channels in one guild through the bot's HTTP client
pub struct SerenityPlatform {
    http: Arc<Http>,
    guild_id: GuildId,
}

impl SerenityPlatform {
    pub fn new(http: Arc<Http>, guild_id: GuildId) -> Self {
        Self { http, guild_id }
    }
}

#[async_trait]
impl RecruitPlatform for SerenityPlatform {
    async fn create_voice_channel(&self, request: &VoiceChannelRequest) -> Result<CreatedChannel> {
        debug!(
            "🔊 Creating voice channel '{}' (limit {}) in guild {}",
            request.name, request.user_limit, self.guild_id
        );
        let channel = self
            .guild_id
            .create_channel(&self.http, |c| {
                c.name(&request.name)
                    .kind(ChannelType::Voice)
                    .category(ChannelId(request.category_id))
                    .user_limit(request.user_limit)
            })
            .await?;

        Ok(CreatedChannel {
            id: channel.id.0,
            url: channel_url(self.guild_id, channel.id),
        })
    }

    async fn create_forum_thread(&self, request: &ForumThreadRequest) -> Result<CreatedChannel> {
        debug!(
            "🧵 Creating forum thread '{}' with {} tags in channel {}",
            request.title,
            request.applied_tags.len(),
            request.forum_channel_id
        );
        // Forum posts go through the thread endpoint with a raw payload
        let thread = self
            .http
            .create_private_thread(request.forum_channel_id, &forum_post_payload(request))
            .await?;

        Ok(CreatedChannel {
            id: thread.id.0,
            url: channel_url(self.guild_id, thread.id),
        })
    }

    async fn delete_channel(&self, channel_id: u64) -> Result<()> {
        ChannelId(channel_id).delete(&self.http).await?;
        Ok(())
    }
}
