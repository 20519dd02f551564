use std::collections::{HashMap, HashSet};
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// The faces printed on the standard deck. Every face appears on exactly two cards.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter,
)]
pub enum CardFace {
    Apple = 1,
    Banana = 2,
    Cherry = 3,
    Grapes = 4,
    Lemon = 5,
    Peach = 6,
    Pineapple = 7,
    Strawberry = 8,
}

impl CardFace {
    pub fn pair_id(&self) -> u32 {
        *self as u32
    }

    pub fn label(&self) -> &'static str {
        match self {
            CardFace::Apple => "🍎",
            CardFace::Banana => "🍌",
            CardFace::Cherry => "🍒",
            CardFace::Grapes => "🍇",
            CardFace::Lemon => "🍋",
            CardFace::Peach => "🍑",
            CardFace::Pineapple => "🍍",
            CardFace::Strawberry => "🍓",
        }
    }
}

impl fmt::Display for CardFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: u32,
    pub pair_id: u32,
    pub text: String,
}

impl Card {
    pub fn new(id: u32, pair_id: u32, text: impl Into<String>) -> Self {
        Self {
            id,
            pair_id,
            text: text.into(),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({})", self.id, self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeckError {
    #[error("Deck has no cards")]
    Empty,
    #[error("Deck has an odd number of cards: {0}")]
    OddCardCount(usize),
    #[error("Card id {0} appears more than once")]
    DuplicateCardId(u32),
    #[error("Pair {pair_id} has {count} cards, expected exactly 2")]
    UnpairedCard { pair_id: u32, count: usize },
}

/// An ordered, validated set of cards. Every pair id is shared by exactly two cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn new(cards: Vec<Card>) -> Result<Self, DeckError> {
        if cards.is_empty() {
            return Err(DeckError::Empty);
        }
        if cards.len() % 2 != 0 {
            return Err(DeckError::OddCardCount(cards.len()));
        }

        let mut seen_ids = HashSet::new();
        let mut pair_counts: HashMap<u32, usize> = HashMap::new();
        for card in &cards {
            if !seen_ids.insert(card.id) {
                return Err(DeckError::DuplicateCardId(card.id));
            }
            *pair_counts.entry(card.pair_id).or_default() += 1;
        }

        // Report the smallest offending pair so the error is stable
        let mut pair_ids: Vec<_> = pair_counts.keys().copied().collect();
        pair_ids.sort_unstable();
        for pair_id in pair_ids {
            let count = pair_counts[&pair_id];
            if count != 2 {
                return Err(DeckError::UnpairedCard { pair_id, count });
            }
        }

        Ok(Self { cards })
    }

    /// Two cards for every [`CardFace`], in face order.
    pub fn standard() -> Self {
        let cards = CardFace::iter()
            .enumerate()
            .flat_map(|(index, face)| {
                let first_id = index as u32 * 2;
                [
                    Card::new(first_id, face.pair_id(), face.label()),
                    Card::new(first_id + 1, face.pair_id(), face.label()),
                ]
            })
            .collect();

        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn total_pairs(&self) -> usize {
        self.cards.len() / 2
    }

    pub fn get(&self, card_id: u32) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == card_id)
    }

    /// Returns a uniformly shuffled copy of this deck (Fisher-Yates).
    pub fn shuffled(&self) -> Self {
        self.shuffled_with(&mut rand::rng())
    }

    pub fn shuffled_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let mut cards = self.cards.clone();
        cards.shuffle(rng);
        Self { cards }
    }
}
