use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// One ranked result. The wire format matches the remote leaderboard API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub score: u32,
    #[serde(default)] // The remote API may only send name and score
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// A finished game, as sent to the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub player_name: String,
    pub score: u32,
    pub attempts: u32,
}

impl ScoreSubmission {
    pub fn new(player_name: impl Into<String>, score: u32, attempts: u32) -> Self {
        Self {
            player_name: player_name.into(),
            score,
            attempts,
        }
    }

    /// Turns the submission into an entry stamped with the given time's local date.
    pub fn into_entry(self, submitted_at: DateTime<Utc>) -> LeaderboardEntry {
        LeaderboardEntry {
            player_name: self.player_name,
            score: self.score,
            attempts: self.attempts,
            date: Some(
                submitted_at
                    .with_timezone(&Local)
                    .format("%Y-%m-%d")
                    .to_string(),
            ),
        }
    }
}

/// Record layout of the locally persisted leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub name: String,
    pub attempts: u32,
    pub score: u32,
    #[serde(default)]
    pub date: Option<String>,
}

impl From<StoredEntry> for LeaderboardEntry {
    fn from(entry: StoredEntry) -> Self {
        Self {
            player_name: entry.name,
            score: entry.score,
            attempts: entry.attempts,
            date: entry.date,
        }
    }
}

impl From<LeaderboardEntry> for StoredEntry {
    fn from(entry: LeaderboardEntry) -> Self {
        Self {
            name: entry.player_name,
            attempts: entry.attempts,
            score: entry.score,
            date: entry.date,
        }
    }
}

/// Orders best-first (highest score, then fewest attempts) and keeps the top `capacity`.
/// The sort is stable, so among equal results the earlier submission ranks higher.
pub fn rank_entries(entries: &mut Vec<LeaderboardEntry>, capacity: usize) {
    entries.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.attempts.cmp(&b.attempts))
    });
    entries.truncate(capacity);
}
