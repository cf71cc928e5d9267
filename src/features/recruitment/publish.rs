//! Publishing a recruitment draft
//!
//! Publishing is the terminal transition of a draft: an optional voice
//! channel, then a forum thread whose body links to it, then the draft is
//! discarded. The user's slot stays locked for the whole sequence, so a
//! double-pressed confirm sees the draft already gone.

use anyhow::Result;
use async_trait::async_trait;
use log::{info, warn};
use serenity::model::id::UserId;

use super::session::{ForumTagTable, RecruitmentSession};
use super::store::RecruitmentSessions;
use crate::core::{clip_chars, truncate_chars, RecruitError, MESSAGE_LIMIT, TITLE_CHAR_LIMIT};

/// Prefix used on voice channel names and thread titles
pub const TITLE_PREFIX: &str = "🎮";

/// Request for a voice channel under the recruitment category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceChannelRequest {
    pub category_id: u64,
    pub name: String,
    /// 0 means unlimited
    pub user_limit: u32,
}

/// Request for a thread in the recruitment forum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumThreadRequest {
    pub forum_channel_id: u64,
    pub title: String,
    pub applied_tags: Vec<u64>,
    pub body: String,
}

/// A channel or thread that now exists on the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedChannel {
    pub id: u64,
    pub url: String,
}

/// The remote calls publishing needs
#[async_trait]
pub trait RecruitPlatform: Send + Sync {
    async fn create_voice_channel(&self, request: &VoiceChannelRequest) -> Result<CreatedChannel>;

    async fn create_forum_thread(&self, request: &ForumThreadRequest) -> Result<CreatedChannel>;

    async fn delete_channel(&self, channel_id: u64) -> Result<()>;
}

/// Fixed destinations for published posts
#[derive(Debug, Clone)]
pub struct PublishTargets {
    pub forum_channel_id: u64,
    pub voice_category_id: u64,
    pub forum_tags: ForumTagTable,
}

/// Everything derived from a draft before any remote call is made
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishPlan {
    pub text: String,
    pub title: String,
    pub voice: Option<VoiceChannelRequest>,
    pub forum_channel_id: u64,
    pub applied_tags: Vec<u64>,
}

impl PublishPlan {
    /// Check the draft can be published and derive the requests
    pub fn build(session: &RecruitmentSession, targets: &PublishTargets) -> Result<Self, RecruitError> {
        let text = session.content().ok_or(RecruitError::MissingContent)?;
        let title = format!("{TITLE_PREFIX} {}", truncate_chars(text, TITLE_CHAR_LIMIT));

        let voice = session.voice_enabled.then(|| VoiceChannelRequest {
            category_id: targets.voice_category_id,
            name: title.clone(),
            user_limit: session.party_size.capacity(),
        });

        Ok(Self {
            text: text.to_string(),
            title,
            voice,
            forum_channel_id: targets.forum_channel_id,
            applied_tags: targets.forum_tags.external_ids(&session.tags),
        })
    }

    /// Thread request; the voice address, when present, is the final line
    ///
    /// The text is clipped so the whole body fits in one message.
    pub fn thread_request(&self, voice_url: Option<&str>) -> ForumThreadRequest {
        let body = match voice_url {
            Some(url) => {
                let budget = MESSAGE_LIMIT.saturating_sub(url.chars().count() + 1);
                format!("{}\n{url}", clip_chars(&self.text, budget))
            }
            None => clip_chars(&self.text, MESSAGE_LIMIT),
        };
        ForumThreadRequest {
            forum_channel_id: self.forum_channel_id,
            title: self.title.clone(),
            applied_tags: self.applied_tags.clone(),
            body,
        }
    }
}

/// Result of a successful publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub thread: CreatedChannel,
    pub voice: Option<CreatedChannel>,
}

/// Runs the publish transition for one user
pub struct Publisher<'a> {
    sessions: &'a RecruitmentSessions,
    targets: &'a PublishTargets,
}

impl<'a> Publisher<'a> {
    pub fn new(sessions: &'a RecruitmentSessions, targets: &'a PublishTargets) -> Self {
        Self { sessions, targets }
    }

    pub async fn publish(&self, owner: UserId, platform: &dyn RecruitPlatform) -> Result<Published, RecruitError> {
        let mut slot = self.sessions.slot(owner).await;
        let session = slot.session().ok_or(RecruitError::NoActiveSession)?;
        let plan = PublishPlan::build(session, self.targets)?;

        let voice = match &plan.voice {
            Some(request) => Some(platform.create_voice_channel(request).await.map_err(|source| {
                RecruitError::RemoteOperationFailure {
                    action: "create voice channel",
                    source,
                }
            })?),
            None => None,
        };

        let request = plan.thread_request(voice.as_ref().map(|v| v.url.as_str()));
        let thread = match platform.create_forum_thread(&request).await {
            Ok(thread) => thread,
            Err(source) => {
                if let Some(orphan) = &voice {
                    if let Err(e) = platform.delete_channel(orphan.id).await {
                        warn!("🧹 Failed to clean up voice channel {} after thread failure: {e}", orphan.id);
                    }
                }
                return Err(RecruitError::RemoteOperationFailure {
                    action: "create forum thread",
                    source,
                });
            }
        };

        slot.take();
        info!("📌 Published recruitment post {} for user {owner}", thread.id);
        Ok(Published { thread, voice })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::recruitment::session::{PartySize, Tag};
    use anyhow::anyhow;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    const USER: UserId = UserId(7);
    const PVE_ID: u64 = 1462732410738311168;

    // Records every call; can be told to fail thread creation
    #[derive(Default)]
    struct MockPlatform {
        voice_requests: Mutex<Vec<VoiceChannelRequest>>,
        thread_requests: Mutex<Vec<ForumThreadRequest>>,
        deleted: Mutex<Vec<u64>>,
        fail_threads: bool,
        delay: Option<Duration>,
        next_id: AtomicU64,
    }

    impl MockPlatform {
        fn failing_threads() -> Self {
            Self {
                fail_threads: true,
                ..Default::default()
            }
        }

        fn slow() -> Self {
            Self {
                delay: Some(Duration::from_millis(30)),
                ..Default::default()
            }
        }

        fn created(&self) -> CreatedChannel {
            let id = 500 + self.next_id.fetch_add(1, Ordering::SeqCst);
            CreatedChannel {
                id,
                url: format!("https://discord.com/channels/1/{id}"),
            }
        }
    }

    #[async_trait]
    impl RecruitPlatform for MockPlatform {
        async fn create_voice_channel(&self, request: &VoiceChannelRequest) -> Result<CreatedChannel> {
            self.voice_requests.lock().unwrap().push(request.clone());
            Ok(self.created())
        }

        async fn create_forum_thread(&self, request: &ForumThreadRequest) -> Result<CreatedChannel> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.thread_requests.lock().unwrap().push(request.clone());
            if self.fail_threads {
                return Err(anyhow!("Missing Permissions"));
            }
            Ok(self.created())
        }

        async fn delete_channel(&self, channel_id: u64) -> Result<()> {
            self.deleted.lock().unwrap().push(channel_id);
            Ok(())
        }
    }

    fn targets() -> PublishTargets {
        let ids = HashMap::from([
            (Tag::Trial, 1462732371433619665),
            (Tag::Newbie, 1462732385002197046),
            (Tag::Pve, PVE_ID),
            (Tag::Pvp, 1462732421563945004),
        ]);
        PublishTargets {
            forum_channel_id: 1462720250704433336,
            voice_category_id: 1462740011387715615,
            forum_tags: ForumTagTable::new(ids).unwrap(),
        }
    }

    async fn raid_draft(sessions: &RecruitmentSessions) {
        sessions.start(USER).await;
        sessions.set_text(USER, "Raid group forming").await.unwrap();
        sessions.set_party_size(USER, PartySize::Duo).await.unwrap();
        sessions.toggle_tag(USER, "pve").await.unwrap();
    }

    #[tokio::test]
    async fn test_publish_with_voice() {
        let sessions = RecruitmentSessions::in_memory();
        let targets = targets();
        let platform = MockPlatform::default();
        raid_draft(&sessions).await;

        let published = Publisher::new(&sessions, &targets)
            .publish(USER, &platform)
            .await
            .unwrap();

        let voice = platform.voice_requests.lock().unwrap().clone();
        assert_eq!(voice.len(), 1);
        assert_eq!(voice[0].user_limit, 2);
        assert_eq!(voice[0].name, "🎮 Raid group forming");
        assert_eq!(voice[0].category_id, 1462740011387715615);

        let threads = platform.thread_requests.lock().unwrap().clone();
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].applied_tags, vec![PVE_ID]);
        assert!(threads[0].body.contains("Raid group forming"));
        let voice_url = &published.voice.as_ref().unwrap().url;
        assert_eq!(threads[0].body.lines().last(), Some(voice_url.as_str()));

        assert!(sessions.get(USER).await.is_none());
    }

    #[tokio::test]
    async fn test_publish_without_voice() {
        let sessions = RecruitmentSessions::in_memory();
        let targets = targets();
        let platform = MockPlatform::default();
        raid_draft(&sessions).await;
        sessions.toggle_voice(USER, false).await.unwrap();

        let published = Publisher::new(&sessions, &targets)
            .publish(USER, &platform)
            .await
            .unwrap();

        assert!(published.voice.is_none());
        assert!(platform.voice_requests.lock().unwrap().is_empty());
        let threads = platform.thread_requests.lock().unwrap().clone();
        assert_eq!(threads[0].body, "Raid group forming");
    }

    #[tokio::test]
    async fn test_publish_missing_content() {
        let sessions = RecruitmentSessions::in_memory();
        let targets = targets();
        let platform = MockPlatform::default();
        sessions.start(USER).await;
        sessions.toggle_tag(USER, "pvp").await.unwrap();

        let err = Publisher::new(&sessions, &targets)
            .publish(USER, &platform)
            .await
            .unwrap_err();

        assert!(matches!(err, RecruitError::MissingContent));
        assert!(platform.voice_requests.lock().unwrap().is_empty());
        assert!(platform.thread_requests.lock().unwrap().is_empty());
        assert!(sessions.get(USER).await.is_some());
    }

    #[tokio::test]
    async fn test_publish_no_session() {
        let sessions = RecruitmentSessions::in_memory();
        let targets = targets();
        let platform = MockPlatform::default();

        let err = Publisher::new(&sessions, &targets)
            .publish(USER, &platform)
            .await
            .unwrap_err();
        assert!(matches!(err, RecruitError::NoActiveSession));
    }

    #[tokio::test]
    async fn test_thread_failure_cleans_up_voice_and_keeps_draft() {
        let sessions = RecruitmentSessions::in_memory();
        let targets = targets();
        let platform = MockPlatform::failing_threads();
        raid_draft(&sessions).await;

        let err = Publisher::new(&sessions, &targets)
            .publish(USER, &platform)
            .await
            .unwrap_err();

        assert!(matches!(err, RecruitError::RemoteOperationFailure { .. }));
        assert_eq!(*platform.deleted.lock().unwrap(), vec![500]);
        assert!(sessions.get(USER).await.is_some());
    }

    #[tokio::test]
    async fn test_double_confirm_publishes_once() {
        let sessions = RecruitmentSessions::in_memory();
        let targets = targets();
        let platform = MockPlatform::slow();
        raid_draft(&sessions).await;

        let publisher = Publisher::new(&sessions, &targets);
        let (first, second) = tokio::join!(
            publisher.publish(USER, &platform),
            publisher.publish(USER, &platform)
        );

        let results = [first, second];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(RecruitError::NoActiveSession))));
        assert_eq!(platform.thread_requests.lock().unwrap().len(), 1);
        assert_eq!(platform.voice_requests.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_plan_truncates_title() {
        let mut session = RecruitmentSession::new(USER);
        session.capture_text(&"x".repeat(100)).unwrap();
        let plan = PublishPlan::build(&session, &targets()).unwrap();
        assert_eq!(plan.title, format!("🎮 {}", "x".repeat(TITLE_CHAR_LIMIT)));
        assert_eq!(plan.text.len(), 100);
        assert_eq!(plan.voice.unwrap().user_limit, 0);
    }

    #[test]
    fn test_long_body_fits_one_message() {
        let mut session = RecruitmentSession::new(USER);
        session.edit_text(&"가".repeat(4000)).unwrap();
        let plan = PublishPlan::build(&session, &targets()).unwrap();

        let url = "https://discord.com/channels/1462730000000000000/1462749999999999999";
        let with_voice = plan.thread_request(Some(url));
        assert_eq!(with_voice.body.chars().count(), MESSAGE_LIMIT);
        assert_eq!(with_voice.body.lines().last(), Some(url));

        let without_voice = plan.thread_request(None);
        assert_eq!(without_voice.body.chars().count(), MESSAGE_LIMIT);
    }

    #[test]
    fn test_short_body_unchanged() {
        let mut session = RecruitmentSession::new(USER);
        session.capture_text("Raid tonight\nBring potions").unwrap();
        let plan = PublishPlan::build(&session, &targets()).unwrap();

        let request = plan.thread_request(Some("https://discord.com/channels/1/2"));
        assert_eq!(request.body, "Raid tonight\nBring potions\nhttps://discord.com/channels/1/2");
    }

    #[tokio::test]
    async fn test_publish_long_draft() {
        let sessions = RecruitmentSessions::in_memory();
        let targets = targets();
        let platform = MockPlatform::default();
        sessions.start(USER).await;
        sessions.edit_text(USER, &"x".repeat(1990)).await.unwrap();

        Publisher::new(&sessions, &targets)
            .publish(USER, &platform)
            .await
            .unwrap();

        let threads = platform.thread_requests.lock().unwrap().clone();
        assert!(threads[0].body.chars().count() <= MESSAGE_LIMIT);
        assert!(sessions.get(USER).await.is_none());
    }

    #[test]
    fn test_plan_maps_all_tags() {
        let mut session = RecruitmentSession::new(USER);
        session.capture_text("tags").unwrap();
        for tag in Tag::ALL {
            session.toggle_tag(tag.id()).unwrap();
        }
        let plan = PublishPlan::build(&session, &targets()).unwrap();
        assert_eq!(plan.applied_tags.len(), 4);
        assert!(plan.applied_tags.contains(&PVE_ID));
    }

    #[test]
    fn test_shared_platform_is_object_safe() {
        let _platform: Arc<dyn RecruitPlatform> = Arc::new(MockPlatform::default());
    }
}
