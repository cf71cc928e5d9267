//! Environment configuration
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Entry channel and draft TTL settings
//! - 1.0.0: Initial token, guild and recruitment target settings

use anyhow::{anyhow, Context as _, Result};
use std::time::Duration;

use crate::features::recruitment::{ForumTagTable, PublishTargets};

/// Default minutes before an untouched draft is evicted
pub const DEFAULT_SESSION_TTL_MINUTES: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub discord_guild_id: Option<String>,
    pub log_level: String,
    pub forum_channel_id: u64,
    pub voice_category_id: u64,
    pub forum_tags: ForumTagTable,
    pub entry_channel_id: Option<u64>,
    pub session_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &str| get(key).ok_or_else(|| anyhow!("{key} must be set"));
        let parse_id = |key: &str, value: String| -> Result<u64> {
            value
                .parse()
                .with_context(|| format!("{key} must be a Discord id, got '{value}'"))
        };

        let forum_tags = ForumTagTable::from_json(&require("RECRUIT_FORUM_TAGS")?)
            .context("RECRUIT_FORUM_TAGS is invalid")?;

        let entry_channel_id = match get("RECRUIT_ENTRY_CHANNEL_ID") {
            Some(value) => Some(parse_id("RECRUIT_ENTRY_CHANNEL_ID", value)?),
            None => None,
        };

        let ttl_minutes = match get("RECRUIT_SESSION_TTL_MINUTES") {
            Some(value) => value
                .parse::<u64>()
                .with_context(|| format!("RECRUIT_SESSION_TTL_MINUTES must be a number, got '{value}'"))?,
            None => DEFAULT_SESSION_TTL_MINUTES,
        };

        Ok(Self {
            discord_token: require("DISCORD_TOKEN")?,
            discord_guild_id: get("DISCORD_GUILD_ID"),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            forum_channel_id: parse_id("RECRUIT_FORUM_CHANNEL_ID", require("RECRUIT_FORUM_CHANNEL_ID")?)?,
            voice_category_id: parse_id("RECRUIT_VOICE_CATEGORY_ID", require("RECRUIT_VOICE_CATEGORY_ID")?)?,
            forum_tags,
            entry_channel_id,
            session_ttl: Duration::from_secs(ttl_minutes * 60),
        })
    }

    /// Where published posts go
    pub fn publish_targets(&self) -> PublishTargets {
        PublishTargets {
            forum_channel_id: self.forum_channel_id,
            voice_category_id: self.voice_category_id,
            forum_tags: self.forum_tags.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::recruitment::Tag;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("DISCORD_TOKEN", "token"),
        ("RECRUIT_FORUM_CHANNEL_ID", "1462720250704433336"),
        ("RECRUIT_VOICE_CATEGORY_ID", "1462740011387715615"),
        (
            "RECRUIT_FORUM_TAGS",
            r#"{"trial":"11","newbie":"12","pve":"13","pvp":"14"}"#,
        ),
    ];

    #[test]
    fn test_minimal_config() {
        let config = Config::from_lookup(env(BASE)).unwrap();
        assert_eq!(config.discord_token, "token");
        assert_eq!(config.forum_channel_id, 1462720250704433336);
        assert_eq!(config.forum_tags.external_id(Tag::Pvp), 14);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.entry_channel_id, None);
        assert_eq!(config.session_ttl, Duration::from_secs(30 * 60));
        assert_eq!(config.discord_guild_id, None);
    }

    #[test]
    fn test_optional_settings() {
        let mut pairs = BASE.to_vec();
        pairs.push(("RECRUIT_ENTRY_CHANNEL_ID", "555"));
        pairs.push(("RECRUIT_SESSION_TTL_MINUTES", "5"));
        pairs.push(("LOG_LEVEL", "debug"));
        pairs.push(("DISCORD_GUILD_ID", "777"));

        let config = Config::from_lookup(env(&pairs)).unwrap();
        assert_eq!(config.entry_channel_id, Some(555));
        assert_eq!(config.session_ttl, Duration::from_secs(300));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.discord_guild_id.as_deref(), Some("777"));
    }

    #[test]
    fn test_missing_token() {
        let pairs: Vec<_> = BASE.iter().copied().filter(|(k, _)| *k != "DISCORD_TOKEN").collect();
        let err = Config::from_lookup(env(&pairs)).unwrap_err();
        assert!(err.to_string().contains("DISCORD_TOKEN"));
    }

    #[test]
    fn test_bad_channel_id() {
        let mut pairs = BASE.to_vec();
        pairs[1] = ("RECRUIT_FORUM_CHANNEL_ID", "forum");
        let err = Config::from_lookup(env(&pairs)).unwrap_err();
        assert!(err.to_string().contains("RECRUIT_FORUM_CHANNEL_ID"));
    }

    #[test]
    fn test_publish_targets() {
        let targets = Config::from_lookup(env(BASE)).unwrap().publish_targets();
        assert_eq!(targets.voice_category_id, 1462740011387715615);
        assert_eq!(targets.forum_tags.external_id(Tag::Trial), 11);
    }
}
