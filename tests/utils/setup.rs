use std::sync::Arc;
use std::time::Duration;

use memory_match::{
    game::{GameService, GameSession, SelectionResult, DEFAULT_REVEAL_DELAY},
    Deck, LeaderboardService,
};

use super::deck_builders::{pair_cards, DeckBuilder};
use super::mocks::RecordingLeaderboard;
use memory_match::LeaderboardGateway;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub service: GameService,
    pub leaderboard: LeaderboardService,
    pub gateway: RecordingLeaderboard,
    pub reveal_delay: Duration,
}

pub struct TestSetupBuilder {
    deck: Deck,
    reveal_delay: Duration,
    player_name: Option<String>,
    backing: Option<Arc<dyn LeaderboardGateway>>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            deck: DeckBuilder::new().with_pairs(2).build(),
            reveal_delay: DEFAULT_REVEAL_DELAY,
            player_name: None,
            backing: None,
        }
    }

    pub fn with_pairs(mut self, count: usize) -> Self {
        self.deck = DeckBuilder::new().with_pairs(count).build();
        self
    }

    #[allow(dead_code)]
    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }

    /// Records submissions on top of `gateway` instead of a fresh in-memory board.
    #[allow(dead_code)]
    pub fn with_backing_gateway(mut self, gateway: Arc<dyn LeaderboardGateway>) -> Self {
        self.backing = Some(gateway);
        self
    }

    pub fn with_player(mut self, name: &str) -> Self {
        self.player_name = Some(name.to_string());
        self
    }

    pub async fn build(self) -> TestSetup {
        let gateway = match self.backing {
            Some(backing) => RecordingLeaderboard::wrapping(backing),
            None => RecordingLeaderboard::new(),
        };
        let leaderboard = LeaderboardService::new(Arc::new(gateway.clone()));
        let service = GameService::with_session(
            GameSession::new(&self.deck),
            leaderboard.clone(),
            self.reveal_delay,
        );

        if let Some(name) = &self.player_name {
            service.start_game(Some(name.as_str())).await;
        }

        TestSetup {
            service,
            leaderboard,
            gateway,
            reveal_delay: self.reveal_delay,
        }
    }
}

impl TestSetup {
    /// Lets the reveal timer of the last turn fire.
    pub async fn wait_for_reveal(&self) {
        tokio::time::sleep(self.reveal_delay + Duration::from_millis(1)).await;
    }

    /// Picks two cards and waits out the reveal delay. Returns the second pick's result.
    pub async fn play_turn(&self, first: u32, second: u32) -> SelectionResult {
        self.service.select_card(first).await;
        let result = self.service.select_card(second).await;
        self.wait_for_reveal().await;
        result
    }

    pub async fn match_pair(&self, pair_id: u32) -> SelectionResult {
        let (a, b) = pair_cards(pair_id);
        self.play_turn(a, b).await
    }

    /// Picks one card of `pair_a` and one of `pair_b`.
    pub async fn miss(&self, pair_a: u32, pair_b: u32) -> SelectionResult {
        self.play_turn(pair_cards(pair_a).0, pair_cards(pair_b).0)
            .await
    }
}
