use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::{LeaderboardEntry, LeaderboardGateway, ScoreSubmission};

/// Best-effort front for a [`LeaderboardGateway`].
///
/// Keeps the last known standings. Failures are logged and leave the cache as it was;
/// nothing here ever returns an error to gameplay.
#[derive(Clone)]
pub struct LeaderboardService {
    gateway: Arc<dyn LeaderboardGateway>,
    cache: Arc<RwLock<CachedStandings>>,
    pending: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

/// Standings plus a version bumped by every accepted submission. A fetch that
/// started before a submission landed must not overwrite its result.
#[derive(Default)]
struct CachedStandings {
    entries: Vec<LeaderboardEntry>,
    version: u64,
}

impl LeaderboardService {
    pub fn new(gateway: Arc<dyn LeaderboardGateway>) -> Self {
        Self {
            gateway,
            cache: Arc::new(RwLock::new(CachedStandings::default())),
            pending: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Last known standings.
    pub async fn standings(&self) -> Vec<LeaderboardEntry> {
        self.cache.read().await.entries.clone()
    }

    /// Fetches fresh standings, falling back to the cached ones on failure.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Vec<LeaderboardEntry> {
        let seen_version = self.cache.read().await.version;

        match self.gateway.fetch_top().await {
            Ok(entries) => {
                let mut cache = self.cache.write().await;
                if cache.version != seen_version {
                    debug!("Submission landed during fetch, keeping newer standings");
                    return cache.entries.clone();
                }
                cache.entries = entries.clone();
                entries
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch leaderboard, keeping cached standings");
                self.standings().await
            }
        }
    }

    /// Submits a result and waits for it. Returns the new standings if the gateway accepted it.
    #[instrument(skip(self, submission), fields(player_name = %submission.player_name, score = submission.score))]
    pub async fn submit(&self, submission: ScoreSubmission) -> Option<Vec<LeaderboardEntry>> {
        match self.gateway.submit(&submission).await {
            Ok(entries) => {
                info!(entry_count = entries.len(), "Score submitted to leaderboard");
                let mut cache = self.cache.write().await;
                cache.entries = entries.clone();
                cache.version += 1;
                Some(entries)
            }
            Err(e) => {
                warn!(error = %e, "Failed to submit score, leaderboard not updated");
                None
            }
        }
    }

    /// Submits a result without waiting for the gateway.
    pub async fn submit_in_background(&self, submission: ScoreSubmission) {
        let service = self.clone();
        let handle = tokio::spawn(async move {
            service.submit(submission).await;
        });

        let mut pending = self.pending.lock().await;
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    /// Waits for every background submission started so far.
    pub async fn wait_for_pending(&self) {
        let handles: Vec<JoinHandle<()>> = std::mem::take(&mut *self.pending.lock().await);
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "Leaderboard submission task failed");
            }
        }
    }
}
