// Public API
pub use cards::{Card, CardFace, Deck, DeckError};
pub use cleanup_task::{start_cleanup_task, CleanupConfig};
pub use logic::{
    CardView, GamePhase, GameSession, IgnoreReason, SelectOutcome, SessionSnapshot, MAX_SELECTED,
};
pub use names::{FixedNameGenerator, PetNameGenerator, PlayerNameGenerator};
pub use registry::SessionRegistry;
pub use service::{GameService, SelectionResult, DEFAULT_REVEAL_DELAY};

// Internal modules
mod cards;
mod cleanup_task;
mod logic;
mod names;
mod registry;
mod service;
