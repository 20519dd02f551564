pub mod http;
pub mod repository;
pub mod service;

mod errors;
pub mod models;

pub use errors::LeaderboardError;
pub use http::HttpLeaderboard;
pub use models::{LeaderboardEntry, ScoreSubmission};
pub use repository::{InMemoryLeaderboard, LocalFileLeaderboard};
pub use service::LeaderboardService;

use async_trait::async_trait;

/// Where finished games are ranked.
///
/// Implementations own ordering and truncation; callers show what they get back.
#[async_trait]
pub trait LeaderboardGateway: Send + Sync {
    async fn fetch_top(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;

    /// Records a result and returns the updated standings.
    async fn submit(
        &self,
        submission: &ScoreSubmission,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;
}
