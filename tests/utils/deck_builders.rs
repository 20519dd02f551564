use memory_match::{Card, Deck};

// ============================================================================
// Deck Setup Utilities
// ============================================================================

/// Builds decks where pair `n` (1-based) is cards `2(n-1)` and `2(n-1)+1`.
pub struct DeckBuilder {
    labels: Vec<String>,
}

impl DeckBuilder {
    pub fn new() -> Self {
        Self { labels: vec![] }
    }

    pub fn with_pairs(mut self, count: usize) -> Self {
        self.labels = (1..=count).map(|n| format!("P{n}")).collect();
        self
    }

    #[allow(dead_code)]
    pub fn with_labels(mut self, labels: &[&str]) -> Self {
        self.labels = labels.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn build(self) -> Deck {
        let cards = self
            .labels
            .iter()
            .enumerate()
            .flat_map(|(index, label)| {
                let pair_id = index as u32 + 1;
                let first_id = index as u32 * 2;
                [
                    Card::new(first_id, pair_id, label.clone()),
                    Card::new(first_id + 1, pair_id, label.clone()),
                ]
            })
            .collect();

        Deck::new(cards).expect("builder always produces a valid deck")
    }
}

/// Card ids of pair `pair_id` in a [`DeckBuilder`] deck.
pub fn pair_cards(pair_id: u32) -> (u32, u32) {
    let first = (pair_id - 1) * 2;
    (first, first + 1)
}
