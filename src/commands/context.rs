//! Shared context for command and component handlers
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use crate::features::recruitment::{PublishTargets, RecruitmentSessions};
use std::sync::Arc;

/// Shared context for all handlers
///
/// Contains the services every handler needs:
/// - RecruitmentSessions holding in-progress drafts
/// - PublishTargets naming the forum, voice category and tag ids
/// - Bot start time for uptime tracking
#[derive(Clone)]
pub struct CommandContext {
    pub sessions: RecruitmentSessions,
    pub targets: Arc<PublishTargets>,
    pub start_time: std::time::Instant,
}

impl CommandContext {
    pub fn new(sessions: RecruitmentSessions, targets: PublishTargets) -> Self {
        Self {
            sessions,
            targets: Arc::new(targets),
            start_time: std::time::Instant::now(),
        }
    }
}
