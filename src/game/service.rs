use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    game::{
        cards::Deck,
        logic::{GameSession, SelectOutcome, SessionSnapshot},
        names::{PetNameGenerator, PlayerNameGenerator},
    },
    leaderboard::{LeaderboardService, ScoreSubmission},
};

/// How long a finished turn stays face up before it is turned back over.
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(700);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub outcome: SelectOutcome,
    pub state: SessionSnapshot,
}

struct SessionSlot {
    session: GameSession,
    /// Turns the current selection back over once the reveal delay has passed
    pending_clear: Option<JoinHandle<()>>,
    /// Last time the player did something in this session
    last_activity: Instant,
}

impl SessionSlot {
    fn record_activity(&mut self) {
        self.last_activity = Instant::now();
    }
}

/// Drives one game session: forwards clicks to the state machine, schedules the
/// reveal delay, and reports finished games to the leaderboard.
pub struct GameService {
    slot: Arc<Mutex<SessionSlot>>,
    leaderboard: LeaderboardService,
    names: Arc<dyn PlayerNameGenerator>,
    reveal_delay: Duration,
}

impl GameService {
    pub fn new(deck: &Deck, leaderboard: LeaderboardService, reveal_delay: Duration) -> Self {
        Self::with_session(GameSession::new(deck), leaderboard, reveal_delay)
    }

    /// Wraps an existing session, keeping its deck order.
    pub fn with_session(
        session: GameSession,
        leaderboard: LeaderboardService,
        reveal_delay: Duration,
    ) -> Self {
        Self {
            slot: Arc::new(Mutex::new(SessionSlot {
                session,
                pending_clear: None,
                last_activity: Instant::now(),
            })),
            leaderboard,
            names: Arc::new(PetNameGenerator::new()),
            reveal_delay,
        }
    }

    pub fn with_name_generator(mut self, names: Arc<dyn PlayerNameGenerator>) -> Self {
        self.names = names;
        self
    }

    pub fn reveal_delay(&self) -> Duration {
        self.reveal_delay
    }

    pub fn leaderboard(&self) -> &LeaderboardService {
        &self.leaderboard
    }

    /// Starts the game for `player_name`. Blank names get a generated one.
    #[instrument(skip(self))]
    pub async fn start_game(&self, player_name: Option<&str>) -> SessionSnapshot {
        let name = match player_name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => self.names.generate().await,
        };

        let mut slot = self.slot.lock().await;
        slot.record_activity();
        if slot.session.start_game(name.clone()) {
            info!(player_name = %name, generation = %slot.session.generation(), "Game started");
        } else {
            debug!(phase = ?slot.session.phase(), "Game already started, ignoring");
        }
        slot.session.snapshot()
    }

    #[instrument(skip(self))]
    pub async fn select_card(&self, card_id: u32) -> SelectionResult {
        let mut slot = self.slot.lock().await;
        slot.record_activity();
        let outcome = slot.session.select_card(card_id);

        if outcome.ends_turn() {
            let generation = slot.session.generation();
            slot.pending_clear = Some(self.schedule_clear(generation));
            debug!(attempts = slot.session.attempts(), ?outcome, "Turn resolved");
        }

        let state = slot.session.snapshot();
        let submission = outcome.completes_game().then(|| {
            ScoreSubmission::new(
                slot.session.player_name(),
                slot.session.score(),
                slot.session.attempts(),
            )
        });
        drop(slot);

        if let Some(submission) = submission {
            info!(
                player_name = %submission.player_name,
                score = submission.score,
                attempts = submission.attempts,
                "Game completed"
            );
            self.leaderboard.submit_in_background(submission).await;
        }

        SelectionResult { outcome, state }
    }

    /// Resets to a freshly shuffled, not yet started game. Any pending reveal timer
    /// belongs to the old game and is cancelled.
    #[instrument(skip(self))]
    pub async fn start_new_game(&self) -> SessionSnapshot {
        let mut slot = self.slot.lock().await;
        slot.record_activity();
        if let Some(handle) = slot.pending_clear.take() {
            handle.abort();
        }
        slot.session.start_new_game();
        info!(generation = %slot.session.generation(), "New game dealt");
        slot.session.snapshot()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.slot.lock().await.session.snapshot()
    }

    pub async fn is_revealed(&self, card_id: u32) -> bool {
        self.slot.lock().await.session.is_revealed(card_id)
    }

    pub async fn is_complete(&self) -> bool {
        self.slot.lock().await.session.is_complete()
    }

    pub async fn score(&self) -> u32 {
        self.slot.lock().await.session.score()
    }

    /// Time since the last start, click or restart. Reading state does not count.
    pub async fn idle_for(&self) -> Duration {
        self.slot.lock().await.last_activity.elapsed()
    }

    /// Cancels the pending reveal timer so nothing runs for a session being dropped.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.slot.lock().await.pending_clear.take() {
            handle.abort();
        }
    }

    fn schedule_clear(&self, generation: Uuid) -> JoinHandle<()> {
        let slot = Arc::clone(&self.slot);
        let delay = self.reveal_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let mut slot = slot.lock().await;
            // A new game may have been dealt while we slept
            if slot.session.generation() != generation {
                return;
            }
            slot.session.clear_selection();
            slot.pending_clear = None;
        })
    }
}
