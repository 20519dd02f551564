use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use memory_match::leaderboard::{
    InMemoryLeaderboard, LeaderboardEntry, LeaderboardError, LeaderboardGateway, ScoreSubmission,
};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Gateway wrapper that remembers every submission and can be switched off.
/// Backed by an in-memory leaderboard unless told otherwise.
#[derive(Clone)]
pub struct RecordingLeaderboard {
    inner: Arc<dyn LeaderboardGateway>,
    submissions: Arc<RwLock<Vec<ScoreSubmission>>>,
    offline: Arc<AtomicBool>,
}

impl RecordingLeaderboard {
    pub fn new() -> Self {
        Self::wrapping(Arc::new(InMemoryLeaderboard::new()))
    }

    pub fn wrapping(inner: Arc<dyn LeaderboardGateway>) -> Self {
        Self {
            inner,
            submissions: Arc::new(RwLock::new(Vec::new())),
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn submissions(&self) -> Vec<ScoreSubmission> {
        self.submissions.read().await.clone()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), LeaderboardError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(LeaderboardError::Unavailable("offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LeaderboardGateway for RecordingLeaderboard {
    async fn fetch_top(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        self.check_online()?;
        self.inner.fetch_top().await
    }

    async fn submit(
        &self,
        submission: &ScoreSubmission,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        self.submissions.write().await.push(submission.clone());
        self.check_online()?;
        self.inner.submit(submission).await
    }
}
