//! Recruitment draft state
//!
//! A [`RecruitmentSession`] is one user's in-progress recruitment post. The
//! session moves through an explicit [`Stage`]; [`Stage::permits`] is the
//! transition table deciding which [`Action`] is accepted in each stage.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use serenity::model::id::UserId;

use crate::core::RecruitError;

/// Topic tags a recruitment post can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    Trial,
    Newbie,
    Pve,
    Pvp,
}

impl Tag {
    /// The fixed tag vocabulary, in display order
    pub const ALL: [Tag; 4] = [Tag::Trial, Tag::Newbie, Tag::Pve, Tag::Pvp];

    pub fn id(&self) -> &'static str {
        match self {
            Tag::Trial => "trial",
            Tag::Newbie => "newbie",
            Tag::Pve => "pve",
            Tag::Pvp => "pvp",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tag::Trial => "Trial",
            Tag::Newbie => "Newbie",
            Tag::Pve => "PVE",
            Tag::Pvp => "PVP",
        }
    }
}

impl FromStr for Tag {
    type Err = RecruitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|tag| tag.id() == s)
            .ok_or_else(|| RecruitError::UnknownTag(s.to_string()))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Requested party size; doubles as the voice channel user limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartySize {
    #[default]
    Unspecified,
    Duo,
    Trio,
}

impl PartySize {
    pub const ALL: [PartySize; 3] = [PartySize::Unspecified, PartySize::Duo, PartySize::Trio];

    /// Voice channel capacity, 0 meaning unlimited
    pub fn capacity(&self) -> u32 {
        match self {
            PartySize::Unspecified => 0,
            PartySize::Duo => 2,
            PartySize::Trio => 3,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            PartySize::Unspecified => "any",
            PartySize::Duo => "duo",
            PartySize::Trio => "trio",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PartySize::Unspecified => "Any size",
            PartySize::Duo => "Duo",
            PartySize::Trio => "Trio",
        }
    }

    pub fn from_id(id: &str) -> Option<PartySize> {
        PartySize::ALL.into_iter().find(|size| size.id() == id)
    }
}

/// Where a draft is in the flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitingText,
    CollectingOptions,
}

/// Things a user can do to a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Content typed as a plain chat message
    CaptureText,
    /// Content submitted through the edit modal
    EditText,
    ChangeOptions,
    Publish,
}

impl Stage {
    pub fn permits(&self, action: Action) -> bool {
        match (self, action) {
            (Stage::AwaitingText, Action::CaptureText) => true,
            (Stage::CollectingOptions, Action::CaptureText) => false,
            (_, Action::EditText | Action::ChangeOptions | Action::Publish) => true,
        }
    }
}

/// One user's in-progress recruitment post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecruitmentSession {
    pub owner_id: UserId,
    pub text: Option<String>,
    pub voice_enabled: bool,
    pub party_size: PartySize,
    pub tags: BTreeSet<Tag>,
    stage: Stage,
}

impl RecruitmentSession {
    pub fn new(owner_id: UserId) -> Self {
        Self {
            owner_id,
            text: None,
            voice_enabled: true,
            party_size: PartySize::Unspecified,
            tags: BTreeSet::new(),
            stage: Stage::AwaitingText,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Content, if any non-blank text was captured
    pub fn content(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }

    fn check(&self, action: Action) -> Result<(), RecruitError> {
        if self.stage.permits(action) {
            Ok(())
        } else {
            Err(RecruitError::TextAlreadyCaptured)
        }
    }

    fn store_text(&mut self, text: &str) -> Result<(), RecruitError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RecruitError::MissingContent);
        }
        self.text = Some(text.to_string());
        self.stage = Stage::CollectingOptions;
        Ok(())
    }

    /// First content capture from chat; never overwrites existing content
    pub fn capture_text(&mut self, text: &str) -> Result<(), RecruitError> {
        self.check(Action::CaptureText)?;
        self.store_text(text)
    }

    /// Content from the edit modal; replaces whatever was there
    pub fn edit_text(&mut self, text: &str) -> Result<(), RecruitError> {
        self.check(Action::EditText)?;
        self.store_text(text)
    }

    pub fn set_voice(&mut self, enabled: bool) -> Result<(), RecruitError> {
        self.check(Action::ChangeOptions)?;
        self.voice_enabled = enabled;
        Ok(())
    }

    pub fn set_party_size(&mut self, size: PartySize) -> Result<(), RecruitError> {
        self.check(Action::ChangeOptions)?;
        self.party_size = size;
        Ok(())
    }

    /// Add the tag if missing, remove it if present
    pub fn toggle_tag(&mut self, tag_id: &str) -> Result<(), RecruitError> {
        self.check(Action::ChangeOptions)?;
        let tag: Tag = tag_id.parse()?;
        if !self.tags.remove(&tag) {
            self.tags.insert(tag);
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Snowflake {
    Number(u64),
    Text(String),
}

impl Snowflake {
    fn into_u64(self) -> Result<u64> {
        match self {
            Snowflake::Number(id) => Ok(id),
            Snowflake::Text(id) => id
                .trim()
                .parse()
                .map_err(|_| anyhow!("'{id}' is not a valid Discord id")),
        }
    }
}

/// Maps internal tags to the forum's external tag ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumTagTable {
    ids: HashMap<Tag, u64>,
}

impl ForumTagTable {
    /// Build a table; every vocabulary tag must have an id
    pub fn new(ids: HashMap<Tag, u64>) -> Result<Self> {
        if let Some(missing) = Tag::ALL.iter().find(|tag| !ids.contains_key(tag)) {
            return Err(anyhow!("forum tag table is missing an id for '{missing}'"));
        }
        Ok(Self { ids })
    }

    /// Parse a JSON object such as `{"trial": "1462732371433619665", ...}`
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, Snowflake> = serde_json::from_str(json)?;
        let mut ids = HashMap::new();
        for (name, id) in raw {
            let tag: Tag = name.parse()?;
            ids.insert(tag, id.into_u64()?);
        }
        Self::new(ids)
    }

    pub fn external_id(&self, tag: Tag) -> u64 {
        // `new` guarantees every tag is present
        self.ids.get(&tag).copied().unwrap_or_default()
    }

    pub fn external_ids<'a>(&self, tags: impl IntoIterator<Item = &'a Tag>) -> Vec<u64> {
        tags.into_iter().map(|tag| self.external_id(*tag)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAGS_JSON: &str =
        r#"{"trial":"1462732371433619665","newbie":"1462732385002197046","pve":1462732410738311168,"pvp":"1462732421563945004"}"#;

    fn session() -> RecruitmentSession {
        RecruitmentSession::new(UserId(42))
    }

    #[test]
    fn test_new_session_defaults() {
        let s = session();
        assert!(s.voice_enabled);
        assert_eq!(s.party_size, PartySize::Unspecified);
        assert!(s.tags.is_empty());
        assert_eq!(s.text, None);
        assert_eq!(s.stage(), Stage::AwaitingText);
    }

    #[test]
    fn test_tag_toggle_twice_restores() {
        let mut s = session();
        s.toggle_tag("pve").unwrap();
        let before = s.tags.clone();
        s.toggle_tag("pvp").unwrap();
        s.toggle_tag("pvp").unwrap();
        assert_eq!(s.tags, before);
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let mut s = session();
        s.toggle_tag("trial").unwrap();
        let err = s.toggle_tag("raid").unwrap_err();
        assert!(matches!(err, RecruitError::UnknownTag(ref id) if id == "raid"));
        assert_eq!(s.tags, BTreeSet::from([Tag::Trial]));
    }

    #[test]
    fn test_capture_text_moves_stage() {
        let mut s = session();
        s.capture_text("  Raid group forming ").unwrap();
        assert_eq!(s.text.as_deref(), Some("Raid group forming"));
        assert_eq!(s.stage(), Stage::CollectingOptions);
    }

    #[test]
    fn test_capture_text_does_not_overwrite() {
        let mut s = session();
        s.capture_text("first").unwrap();
        let err = s.capture_text("second").unwrap_err();
        assert!(matches!(err, RecruitError::TextAlreadyCaptured));
        assert_eq!(s.text.as_deref(), Some("first"));
    }

    #[test]
    fn test_edit_text_overwrites() {
        let mut s = session();
        s.capture_text("first").unwrap();
        s.edit_text("second").unwrap();
        assert_eq!(s.text.as_deref(), Some("second"));
    }

    #[test]
    fn test_blank_text_rejected() {
        let mut s = session();
        assert!(matches!(s.capture_text("   "), Err(RecruitError::MissingContent)));
        assert_eq!(s.stage(), Stage::AwaitingText);
    }

    #[test]
    fn test_transition_table() {
        assert!(Stage::AwaitingText.permits(Action::CaptureText));
        assert!(!Stage::CollectingOptions.permits(Action::CaptureText));
        assert!(Stage::AwaitingText.permits(Action::Publish));
        assert!(Stage::CollectingOptions.permits(Action::EditText));
    }

    #[test]
    fn test_party_size_capacity() {
        assert_eq!(PartySize::Unspecified.capacity(), 0);
        assert_eq!(PartySize::Duo.capacity(), 2);
        assert_eq!(PartySize::Trio.capacity(), 3);
        assert_eq!(PartySize::from_id("trio"), Some(PartySize::Trio));
        assert_eq!(PartySize::from_id("quad"), None);
    }

    #[test]
    fn test_tag_table_from_json() {
        let table = ForumTagTable::from_json(TAGS_JSON).unwrap();
        assert_eq!(table.external_id(Tag::Pve), 1462732410738311168);
        assert_eq!(
            table.external_ids(&BTreeSet::from([Tag::Trial, Tag::Pvp])),
            vec![1462732371433619665, 1462732421563945004]
        );
    }

    #[test]
    fn test_tag_table_requires_every_tag() {
        let err = ForumTagTable::from_json(r#"{"trial":"1"}"#).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_tag_table_rejects_unknown_tag() {
        let json = r#"{"trial":"1","newbie":"2","pve":"3","pvp":"4","raid":"5"}"#;
        assert!(ForumTagTable::from_json(json).is_err());
    }
}
