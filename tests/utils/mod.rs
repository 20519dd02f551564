pub mod deck_builders;
pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
pub use deck_builders::DeckBuilder;
#[allow(unused_imports)]
pub use mocks::RecordingLeaderboard;
#[allow(unused_imports)]
pub use setup::{TestSetup, TestSetupBuilder};
