// Library crate for the memory match game
// This file exposes the public API for the server binary and integration tests

pub mod api;
pub mod config;
pub mod game;
pub mod leaderboard;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use config::{AppConfig, LeaderboardBackend};
pub use game::{Card, Deck, GameService, GameSession, SelectOutcome, SessionRegistry};
pub use leaderboard::{LeaderboardEntry, LeaderboardGateway, LeaderboardService};
pub use shared::{AppError, AppState};
