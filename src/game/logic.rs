// A GameSession is one player's run through a shuffled deck.
// It only knows about state transitions; timing (the reveal delay) and the leaderboard
// are driven from the service layer.

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::cards::Deck;

/// Cards that can be face up at once while a turn is being resolved.
pub const MAX_SELECTED: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    NotStarted,
    InProgress,
    Completed,
}

/// Why a card click did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IgnoreReason {
    NotStarted,
    GameCompleted,
    SelectionPending,
    AlreadySelected,
    AlreadyMatched,
    UnknownCard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectOutcome {
    Ignored { reason: IgnoreReason },
    /// First card of a turn turned face up
    Revealed,
    Matched {
        #[serde(rename = "pairId")]
        pair_id: u32,
        completed: bool,
    },
    Mismatched,
}

impl SelectOutcome {
    pub fn ends_turn(&self) -> bool {
        matches!(
            self,
            SelectOutcome::Matched { .. } | SelectOutcome::Mismatched
        )
    }

    pub fn completes_game(&self) -> bool {
        matches!(self, SelectOutcome::Matched { completed: true, .. })
    }
}

#[derive(Debug, Clone)]
pub struct GameSession {
    generation: Uuid,
    deck: Deck,
    selected: Vec<u32>,        // Card ids, in click order
    matched_pairs: BTreeSet<u32>,
    attempts: u32,
    score: u32,
    phase: GamePhase,
    player_name: String,
}

impl GameSession {
    /// Creates a session over a freshly shuffled copy of `deck`.
    pub fn new(deck: &Deck) -> Self {
        Self::with_deck(deck.shuffled())
    }

    /// Creates a session that uses `deck` in the given order.
    pub fn with_deck(deck: Deck) -> Self {
        Self {
            generation: Uuid::new_v4(),
            deck,
            selected: Vec::with_capacity(MAX_SELECTED),
            matched_pairs: BTreeSet::new(),
            attempts: 0,
            score: 0,
            phase: GamePhase::NotStarted,
            player_name: String::new(),
        }
    }

    /// Moves NOT_STARTED -> IN_PROGRESS. Returns false if the game was already started.
    pub fn start_game(&mut self, player_name: impl Into<String>) -> bool {
        if self.phase != GamePhase::NotStarted {
            return false;
        }
        self.player_name = player_name.into();
        self.phase = GamePhase::InProgress;
        true
    }

    pub fn select_card(&mut self, card_id: u32) -> SelectOutcome {
        let ignored = |reason| SelectOutcome::Ignored { reason };

        match self.phase {
            GamePhase::NotStarted => return ignored(IgnoreReason::NotStarted),
            GamePhase::Completed => return ignored(IgnoreReason::GameCompleted),
            GamePhase::InProgress => {}
        }

        if self.selected.len() >= MAX_SELECTED {
            return ignored(IgnoreReason::SelectionPending);
        }

        let Some(card) = self.deck.get(card_id) else {
            return ignored(IgnoreReason::UnknownCard);
        };
        let pair_id = card.pair_id;

        if self.selected.contains(&card_id) {
            return ignored(IgnoreReason::AlreadySelected);
        }
        if self.matched_pairs.contains(&pair_id) {
            return ignored(IgnoreReason::AlreadyMatched);
        }

        self.selected.push(card_id);
        if self.selected.len() < MAX_SELECTED {
            return SelectOutcome::Revealed;
        }

        self.attempts += 1;

        let first_pair = self.deck.get(self.selected[0]).map(|c| c.pair_id);
        if first_pair != Some(pair_id) {
            return SelectOutcome::Mismatched;
        }

        self.matched_pairs.insert(pair_id);
        let completed = self.is_complete();
        if completed {
            // Only reachable once per game, so the score is frozen here
            self.phase = GamePhase::Completed;
            self.score = self.compute_score();
        }

        SelectOutcome::Matched { pair_id, completed }
    }

    /// Turns the pending selection face down again. Matched cards stay revealed.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn selection_pending(&self) -> bool {
        self.selected.len() == MAX_SELECTED
    }

    pub fn is_selected(&self, card_id: u32) -> bool {
        self.selected.contains(&card_id)
    }

    pub fn is_matched(&self, card_id: u32) -> bool {
        self.deck
            .get(card_id)
            .is_some_and(|card| self.matched_pairs.contains(&card.pair_id))
    }

    pub fn is_revealed(&self, card_id: u32) -> bool {
        self.is_selected(card_id) || self.is_matched(card_id)
    }

    pub fn is_complete(&self) -> bool {
        self.matched_pairs.len() == self.deck.total_pairs()
    }

    /// `round(total_pairs / attempts * 100)` clamped to `0..=100`; 0 before any attempt.
    pub fn compute_score(&self) -> u32 {
        if self.attempts == 0 {
            return 0;
        }
        let ratio = self.deck.total_pairs() as f64 / self.attempts as f64;
        (ratio * 100.0).round().clamp(0.0, 100.0) as u32
    }

    /// Resets to NOT_STARTED with a reshuffled deck and a new generation.
    pub fn start_new_game(&mut self) {
        self.start_new_game_with(&mut rand::rng());
    }

    pub fn start_new_game_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let deck = self.deck.shuffled_with(rng);
        *self = Self::with_deck(deck);
    }

    pub fn generation(&self) -> Uuid {
        self.generation
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn selected(&self) -> &[u32] {
        &self.selected
    }

    pub fn matched_pairs(&self) -> &BTreeSet<u32> {
        &self.matched_pairs
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let cards = self
            .deck
            .cards()
            .iter()
            .map(|card| {
                let matched = self.matched_pairs.contains(&card.pair_id);
                let revealed = matched || self.selected.contains(&card.id);
                CardView {
                    id: card.id,
                    pair_id: revealed.then_some(card.pair_id),
                    text: revealed.then(|| card.text.clone()),
                    revealed,
                    matched,
                }
            })
            .collect();

        SessionSnapshot {
            generation: self.generation,
            phase: self.phase,
            player_name: (!self.player_name.is_empty()).then(|| self.player_name.clone()),
            attempts: self.attempts,
            score: self.score,
            total_pairs: self.deck.total_pairs(),
            matched_pairs: self.matched_pairs.len(),
            cards,
        }
    }
}

/// A card as the player sees it. Face-down cards do not leak their pair or label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub id: u32,
    pub pair_id: Option<u32>,
    pub text: Option<String>,
    pub revealed: bool,
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub generation: Uuid,
    pub phase: GamePhase,
    pub player_name: Option<String>,
    pub attempts: u32,
    pub score: u32,
    pub total_pairs: usize,
    pub matched_pairs: usize,
    pub cards: Vec<CardView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::cards::Card;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    // pairId 1 twice (ids 0, 1), pairId 2 twice (ids 2, 3)
    fn two_pair_deck() -> Deck {
        Deck::new(vec![
            Card::new(0, 1, "A"),
            Card::new(1, 1, "A"),
            Card::new(2, 2, "B"),
            Card::new(3, 2, "B"),
        ])
        .unwrap()
    }

    fn started(deck: Deck) -> GameSession {
        let mut session = GameSession::with_deck(deck);
        assert!(session.start_game("Alice"));
        session
    }

    fn assert_invariants(session: &GameSession) {
        assert!(session.selected().len() <= MAX_SELECTED);
        assert!(session.matched_pairs().len() * 2 <= session.deck().len());
        assert!(session.score() <= 100);
    }

    #[test]
    fn test_new_session_is_not_started() {
        let session = GameSession::new(&Deck::standard());
        assert_eq!(session.phase(), GamePhase::NotStarted);
        assert_eq!(session.attempts(), 0);
        assert_eq!(session.score(), 0);
        assert!(session.selected().is_empty());
        assert!(session.matched_pairs().is_empty());
        assert_eq!(session.deck().len(), 16);
    }

    #[test]
    fn test_select_before_start_is_ignored() {
        let mut session = GameSession::with_deck(two_pair_deck());
        let outcome = session.select_card(0);
        assert_eq!(
            outcome,
            SelectOutcome::Ignored {
                reason: IgnoreReason::NotStarted
            }
        );
        assert!(session.selected().is_empty());
    }

    #[test]
    fn test_start_game_only_once() {
        let mut session = GameSession::with_deck(two_pair_deck());
        assert!(session.start_game("Alice"));
        assert!(!session.start_game("Bob"));
        assert_eq!(session.player_name(), "Alice");
    }

    #[test]
    fn test_perfect_game_scores_100() {
        let mut session = started(two_pair_deck());

        assert_eq!(session.select_card(0), SelectOutcome::Revealed);
        assert_eq!(
            session.select_card(1),
            SelectOutcome::Matched {
                pair_id: 1,
                completed: false
            }
        );
        assert_eq!(session.attempts(), 1);
        assert_eq!(session.matched_pairs(), &BTreeSet::from([1]));

        session.clear_selection();
        session.select_card(2);
        assert_eq!(
            session.select_card(3),
            SelectOutcome::Matched {
                pair_id: 2,
                completed: true
            }
        );
        assert_eq!(session.attempts(), 2);
        assert_eq!(session.matched_pairs(), &BTreeSet::from([1, 2]));
        assert!(session.is_complete());
        assert_eq!(session.phase(), GamePhase::Completed);
        assert_eq!(session.score(), 100);
    }

    #[test]
    fn test_mismatch_counts_attempt_and_hides_after_clear() {
        let mut session = started(two_pair_deck());

        session.select_card(0);
        assert_eq!(session.select_card(2), SelectOutcome::Mismatched);
        assert_eq!(session.attempts(), 1);
        assert!(session.matched_pairs().is_empty());
        assert!(session.is_revealed(0));
        assert!(session.is_revealed(2));

        session.clear_selection();
        assert!(!session.is_revealed(0));
        assert!(!session.is_revealed(2));
    }

    #[test]
    fn test_third_card_while_pending_is_ignored() {
        let mut session = started(two_pair_deck());
        session.select_card(0);
        session.select_card(2);

        let selected_before = session.selected().to_vec();
        let matched_before = session.matched_pairs().clone();

        let outcome = session.select_card(1);
        assert_eq!(
            outcome,
            SelectOutcome::Ignored {
                reason: IgnoreReason::SelectionPending
            }
        );
        assert_eq!(session.selected(), selected_before.as_slice());
        assert_eq!(session.matched_pairs(), &matched_before);
        assert_eq!(session.attempts(), 1);
    }

    #[test]
    fn test_same_card_twice_is_ignored() {
        let mut session = started(two_pair_deck());
        session.select_card(0);
        assert_eq!(
            session.select_card(0),
            SelectOutcome::Ignored {
                reason: IgnoreReason::AlreadySelected
            }
        );
        assert_eq!(session.selected(), &[0]);
        assert_eq!(session.attempts(), 0);
    }

    #[test]
    fn test_matched_card_is_ignored() {
        let mut session = started(two_pair_deck());
        session.select_card(0);
        session.select_card(1);
        session.clear_selection();

        for card_id in [0, 1] {
            assert_eq!(
                session.select_card(card_id),
                SelectOutcome::Ignored {
                    reason: IgnoreReason::AlreadyMatched
                }
            );
        }
        assert!(session.selected().is_empty());
        assert_eq!(session.attempts(), 1);
    }

    #[test]
    fn test_unknown_card_is_ignored() {
        let mut session = started(two_pair_deck());
        assert_eq!(
            session.select_card(42),
            SelectOutcome::Ignored {
                reason: IgnoreReason::UnknownCard
            }
        );
    }

    #[test]
    fn test_completed_game_ignores_clicks_and_keeps_score() {
        let mut session = started(two_pair_deck());
        for (a, b) in [(0, 2), (0, 1), (2, 3)] {
            session.select_card(a);
            session.select_card(b);
            session.clear_selection();
        }
        assert!(session.is_complete());
        assert_eq!(session.attempts(), 3);
        assert_eq!(session.score(), 67);

        assert_eq!(
            session.select_card(0),
            SelectOutcome::Ignored {
                reason: IgnoreReason::GameCompleted
            }
        );
        assert!(session.is_complete());
        assert_eq!(session.score(), 67);
        assert_eq!(session.attempts(), 3);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(2, 100)]
    #[case(3, 67)]
    #[case(4, 50)]
    #[case(7, 29)]
    #[case(201, 1)]
    #[case(500, 0)]
    fn test_compute_score(#[case] attempts: u32, #[case] expected: u32) {
        let mut session = started(two_pair_deck());
        session.attempts = attempts;
        assert_eq!(session.compute_score(), expected);
    }

    #[test]
    fn test_compute_score_is_capped() {
        // Fewer attempts than pairs cannot happen in play, but the formula still clamps
        let mut session = started(two_pair_deck());
        session.attempts = 1;
        assert_eq!(session.compute_score(), 100);
    }

    #[test]
    fn test_start_new_game_resets_everything() {
        let mut session = started(two_pair_deck());
        session.select_card(0);
        session.select_card(1);
        session.clear_selection();
        session.select_card(2);
        session.select_card(3);
        assert_eq!(session.phase(), GamePhase::Completed);

        let old_generation = session.generation();
        let mut old_ids: Vec<u32> = session.deck().cards().iter().map(|c| c.id).collect();

        session.start_new_game_with(&mut StdRng::seed_from_u64(3));

        assert_eq!(session.phase(), GamePhase::NotStarted);
        assert_eq!(session.attempts(), 0);
        assert_eq!(session.score(), 0);
        assert!(session.selected().is_empty());
        assert!(session.matched_pairs().is_empty());
        assert_eq!(session.player_name(), "");
        assert!(!session.is_complete());
        assert_ne!(session.generation(), old_generation);

        let mut new_ids: Vec<u32> = session.deck().cards().iter().map(|c| c.id).collect();
        old_ids.sort_unstable();
        new_ids.sort_unstable();
        assert_eq!(old_ids, new_ids);
    }

    #[test]
    fn test_invariants_hold_over_random_play() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut session = GameSession::with_deck(Deck::standard().shuffled_with(&mut rng));
        session.start_game("fuzz");

        let mut was_complete = false;
        for step in 0..2_000u32 {
            let card_id = rng.random_range(0..18);
            let outcome = session.select_card(card_id);
            assert_invariants(&session);

            if was_complete {
                assert!(session.is_complete());
                assert!(!outcome.ends_turn());
            }
            was_complete = session.is_complete();

            if step % 3 == 0 {
                session.clear_selection();
            }
        }
        assert_invariants(&session);
    }

    #[test]
    fn test_snapshot_hides_face_down_cards() {
        let mut session = started(two_pair_deck());
        session.select_card(0);
        session.select_card(1);
        session.clear_selection();
        session.select_card(2);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, GamePhase::InProgress);
        assert_eq!(snapshot.player_name.as_deref(), Some("Alice"));
        assert_eq!(snapshot.total_pairs, 2);
        assert_eq!(snapshot.matched_pairs, 1);

        let view = |id: u32| snapshot.cards.iter().find(|c| c.id == id).unwrap();
        assert!(view(0).matched && view(0).revealed);
        assert_eq!(view(0).text.as_deref(), Some("A"));
        assert!(view(2).revealed && !view(2).matched);
        assert_eq!(view(2).pair_id, Some(2));
        assert!(!view(3).revealed);
        assert_eq!(view(3).text, None);
        assert_eq!(view(3).pair_id, None);
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(SelectOutcome::Matched {
            pair_id: 4,
            completed: true,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "MATCHED", "pairId": 4, "completed": true})
        );

        let json = serde_json::to_value(SelectOutcome::Ignored {
            reason: IgnoreReason::SelectionPending,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "IGNORED", "reason": "SELECTION_PENDING"})
        );
    }
}
