use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::game::{
    cards::Deck,
    names::{PetNameGenerator, PlayerNameGenerator},
    service::GameService,
};
use crate::leaderboard::LeaderboardService;

/// Every live game session, keyed by session id. All sessions deal from the same card
/// set and report to the same leaderboard.
pub struct SessionRegistry {
    /// A mapping from session ID to its controller
    sessions: Arc<RwLock<HashMap<Uuid, Arc<GameService>>>>,
    deck: Deck,
    leaderboard: LeaderboardService,
    names: Arc<dyn PlayerNameGenerator>,
    reveal_delay: Duration,
}

impl SessionRegistry {
    pub fn new(deck: Deck, leaderboard: LeaderboardService, reveal_delay: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            deck,
            leaderboard,
            names: Arc::new(PetNameGenerator::new()),
            reveal_delay,
        }
    }

    pub fn with_name_generator(mut self, names: Arc<dyn PlayerNameGenerator>) -> Self {
        self.names = names;
        self
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn leaderboard(&self) -> &LeaderboardService {
        &self.leaderboard
    }

    #[instrument(skip(self))]
    pub async fn create_session(&self) -> (Uuid, Arc<GameService>) {
        let session_id = Uuid::new_v4();
        let service = Arc::new(
            GameService::new(&self.deck, self.leaderboard.clone(), self.reveal_delay)
                .with_name_generator(Arc::clone(&self.names)),
        );

        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id, Arc::clone(&service));
        debug!(%session_id, session_count = sessions.len(), "Session created");

        (session_id, service)
    }

    pub async fn get_session(&self, session_id: &Uuid) -> Option<Arc<GameService>> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned()
    }

    #[instrument(skip(self))]
    pub async fn remove_session(&self, session_id: &Uuid) -> Option<Arc<GameService>> {
        let removed = self.sessions.write().await.remove(session_id);
        if let Some(service) = &removed {
            service.shutdown().await;
            debug!(%session_id, "Session removed");
        }
        removed
    }

    /// Ids of sessions nobody has played in for at least `threshold`.
    pub async fn idle_sessions(&self, threshold: Duration) -> Vec<Uuid> {
        let candidates: Vec<(Uuid, Arc<GameService>)> = self
            .sessions
            .read()
            .await
            .iter()
            .map(|(id, service)| (*id, Arc::clone(service)))
            .collect();

        let mut idle = Vec::new();
        for (session_id, service) in candidates {
            if service.idle_for().await >= threshold {
                idle.push(session_id);
            }
        }
        idle
    }

    /// Drops every session idle for at least `threshold`. Returns how many went.
    #[instrument(skip(self))]
    pub async fn evict_idle(&self, threshold: Duration) -> usize {
        let mut evicted = 0;
        for session_id in self.idle_sessions(threshold).await {
            let mut sessions = self.sessions.write().await;
            // The player may have come back since the scan
            let still_idle = match sessions.get(&session_id) {
                Some(service) => service.idle_for().await >= threshold,
                None => false,
            };
            if !still_idle {
                continue;
            }
            let removed = sessions.remove(&session_id);
            drop(sessions);
            if let Some(service) = removed {
                service.shutdown().await;
                evicted += 1;
                debug!(%session_id, "Evicted idle session");
            }
        }
        evicted
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
