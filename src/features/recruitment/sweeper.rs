//! Background eviction of abandoned drafts

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};

use super::store::SessionStore;

/// How often the sweeper checks for expired drafts
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Evict drafts untouched for `ttl`, forever, once per `interval`
pub async fn session_sweep_loop(store: Arc<dyn SessionStore>, ttl: Duration, interval: Duration) {
    info!("🧹 Recruitment draft sweeper started (ttl: {}s)", ttl.as_secs());
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        let purged = store.purge_expired(ttl);
        if purged > 0 {
            info!("🧹 Evicted {purged} abandoned recruitment drafts");
        } else {
            debug!("🧹 Sweep found no expired drafts ({} active)", store.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::recruitment::store::RecruitmentSessions;
    use serenity::model::id::UserId;

    const TTL: Duration = Duration::from_secs(30 * 60);

    #[tokio::test(start_paused = true)]
    async fn test_sweep_loop_evicts() {
        let sessions = RecruitmentSessions::in_memory();
        sessions.start(UserId(3)).await;

        let handle = tokio::spawn(session_sweep_loop(sessions.store().clone(), TTL, SWEEP_INTERVAL));
        tokio::time::sleep(TTL + 2 * SWEEP_INTERVAL).await;
        handle.abort();

        assert!(sessions.store().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_loop_keeps_active_drafts() {
        let sessions = RecruitmentSessions::in_memory();
        sessions.start(UserId(3)).await;

        let handle = tokio::spawn(session_sweep_loop(sessions.store().clone(), TTL, SWEEP_INTERVAL));
        for _ in 0..4 {
            tokio::time::sleep(TTL / 2).await;
            sessions.toggle_voice(UserId(3), false).await.unwrap();
        }
        handle.abort();

        assert!(sessions.get(UserId(3)).await.is_some());
    }
}
