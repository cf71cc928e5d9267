//! Per-user recruitment draft storage
//!
//! [`SessionStore`] is the key-value seam: one lockable slot per user. The
//! in-memory implementation keeps slots in a `DashMap`, each behind its own
//! async mutex, so one user's events run one at a time while different users
//! never block each other. [`RecruitmentSessions`] layers the draft operations
//! on top of any store.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use async_trait::async_trait;
use dashmap::DashMap;
use log::debug;
use serenity::model::id::UserId;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::session::{PartySize, RecruitmentSession};
use crate::core::RecruitError;

/// A stored draft plus the last time it was touched
#[derive(Debug, Clone)]
pub struct StoredSession {
    pub session: RecruitmentSession,
    pub touched: Instant,
}

/// Exclusive access to one user's slot, held until dropped
pub struct SessionSlot {
    guard: OwnedMutexGuard<Option<StoredSession>>,
}

impl SessionSlot {
    pub fn new(guard: OwnedMutexGuard<Option<StoredSession>>) -> Self {
        Self { guard }
    }

    pub fn session(&self) -> Option<&RecruitmentSession> {
        self.guard.as_ref().map(|stored| &stored.session)
    }

    /// Mutable access; marks the draft as touched
    pub fn session_mut(&mut self) -> Option<&mut RecruitmentSession> {
        self.guard.as_mut().map(|stored| {
            stored.touched = Instant::now();
            &mut stored.session
        })
    }

    pub fn replace(&mut self, session: RecruitmentSession) {
        *self.guard = Some(StoredSession {
            session,
            touched: Instant::now(),
        });
    }

    pub fn take(&mut self) -> Option<RecruitmentSession> {
        self.guard.take().map(|stored| stored.session)
    }
}

/// Storage for in-progress drafts keyed by user
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Lock the user's slot, waiting for any other holder
    async fn slot(&self, owner: UserId) -> SessionSlot;

    /// Drop drafts untouched for longer than `ttl`; returns how many went
    fn purge_expired(&self, ttl: Duration) -> usize;

    /// Number of drafts currently stored
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

type Slot = Arc<Mutex<Option<StoredSession>>>;

/// Volatile store; everything is lost on restart
#[derive(Default)]
pub struct InMemorySessionStore {
    slots: DashMap<UserId, Slot>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn slot(&self, owner: UserId) -> SessionSlot {
        // Clone the Arc out so the map shard is not held across the await
        let slot = self.slots.entry(owner).or_default().clone();
        SessionSlot::new(slot.lock_owned().await)
    }

    fn purge_expired(&self, ttl: Duration) -> usize {
        let mut purged = 0;
        self.slots.retain(|owner, slot| {
            // Someone holds or waits on this slot
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            let Ok(guard) = slot.try_lock() else {
                return true;
            };
            match guard.as_ref() {
                None => false,
                Some(stored) if stored.touched.elapsed() >= ttl => {
                    debug!("⌛ Evicting abandoned recruitment draft for user {owner}");
                    purged += 1;
                    false
                }
                Some(_) => true,
            }
        });
        purged
    }

    fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|entry| match entry.value().try_lock() {
                Ok(guard) => guard.is_some(),
                Err(_) => true,
            })
            .count()
    }
}

/// Draft operations over a [`SessionStore`]
#[derive(Clone)]
pub struct RecruitmentSessions {
    store: Arc<dyn SessionStore>,
}

impl RecruitmentSessions {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemorySessionStore::new()))
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Lock a user's slot directly, for multi-step work such as publishing
    pub async fn slot(&self, owner: UserId) -> SessionSlot {
        self.store.slot(owner).await
    }

    /// Begin a fresh draft, discarding any previous one
    pub async fn start(&self, owner: UserId) -> RecruitmentSession {
        let session = RecruitmentSession::new(owner);
        self.store.slot(owner).await.replace(session.clone());
        session
    }

    pub async fn get(&self, owner: UserId) -> Option<RecruitmentSession> {
        self.store.slot(owner).await.session().cloned()
    }

    pub async fn exists(&self, owner: UserId) -> bool {
        self.store.slot(owner).await.session().is_some()
    }

    async fn update<F>(&self, owner: UserId, apply: F) -> Result<RecruitmentSession, RecruitError>
    where
        F: FnOnce(&mut RecruitmentSession) -> Result<(), RecruitError> + Send,
    {
        let mut slot = self.store.slot(owner).await;
        let session = slot.session_mut().ok_or(RecruitError::NoActiveSession)?;
        apply(session)?;
        Ok(session.clone())
    }

    /// Content captured from chat; rejected once content exists
    pub async fn set_text(&self, owner: UserId, text: &str) -> Result<RecruitmentSession, RecruitError> {
        self.update(owner, |s| s.capture_text(text)).await
    }

    /// Content submitted from the edit modal; overwrites
    pub async fn edit_text(&self, owner: UserId, text: &str) -> Result<RecruitmentSession, RecruitError> {
        self.update(owner, |s| s.edit_text(text)).await
    }

    pub async fn toggle_voice(&self, owner: UserId, enabled: bool) -> Result<RecruitmentSession, RecruitError> {
        self.update(owner, |s| s.set_voice(enabled)).await
    }

    pub async fn set_party_size(&self, owner: UserId, size: PartySize) -> Result<RecruitmentSession, RecruitError> {
        self.update(owner, |s| s.set_party_size(size)).await
    }

    pub async fn toggle_tag(&self, owner: UserId, tag_id: &str) -> Result<RecruitmentSession, RecruitError> {
        self.update(owner, |s| s.toggle_tag(tag_id)).await
    }

    pub async fn remove(&self, owner: UserId) {
        self.store.slot(owner).await.take();
    }
}
