use thiserror::Error;

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Leaderboard unavailable: {0}")]
    Unavailable(String),
}
