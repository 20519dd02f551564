use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, instrument, warn};

use super::{
    models::{rank_entries, StoredEntry},
    LeaderboardEntry, LeaderboardError, LeaderboardGateway, ScoreSubmission,
};

/// Number of results kept by the bundled leaderboards.
pub const DEFAULT_CAPACITY: usize = 5;

/// Record key used by [`LocalFileLeaderboard`] unless told otherwise.
pub const DEFAULT_RECORD_KEY: &str = "memory-match-leaderboard";

fn validate(submission: &ScoreSubmission) -> Result<(), LeaderboardError> {
    if submission.player_name.trim().is_empty() {
        return Err(LeaderboardError::Validation(
            "Player name cannot be empty".to_string(),
        ));
    }
    if submission.score > 100 {
        return Err(LeaderboardError::Validation(format!(
            "Score {} is out of range",
            submission.score
        )));
    }
    Ok(())
}

/// In-memory leaderboard for development and testing
///
/// Results are ranked and capped here, the same way the persisted store does it.
/// Everything is lost when the process exits.
#[derive(Debug)]
pub struct InMemoryLeaderboard {
    entries: RwLock<Vec<LeaderboardEntry>>,
    capacity: usize,
}

impl Default for InMemoryLeaderboard {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLeaderboard {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            capacity,
        }
    }

    /// Creates a leaderboard pre-populated with `entries` (ranked on the way in)
    pub fn with_entries(mut entries: Vec<LeaderboardEntry>, capacity: usize) -> Self {
        rank_entries(&mut entries, capacity);
        Self {
            entries: RwLock::new(entries),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[async_trait]
impl LeaderboardGateway for InMemoryLeaderboard {
    #[instrument(skip(self))]
    async fn fetch_top(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let entries = self.entries.read().await;
        debug!(entry_count = entries.len(), "Fetched leaderboard from memory");
        Ok(entries.clone())
    }

    #[instrument(skip(self, submission), fields(player_name = %submission.player_name))]
    async fn submit(
        &self,
        submission: &ScoreSubmission,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        validate(submission)?;

        let mut entries = self.entries.write().await;
        entries.push(submission.clone().into_entry(Utc::now()));
        rank_entries(&mut entries, self.capacity);

        debug!(entry_count = entries.len(), "Score recorded in memory");
        Ok(entries.clone())
    }
}

/// Leaderboard persisted to a JSON file on disk.
///
/// The file is a keyed record store: a JSON object whose values are JSON-encoded
/// strings. The leaderboard lives under a single key and holds at most `capacity`
/// entries ordered by score. Other keys in the file are preserved.
#[derive(Debug)]
pub struct LocalFileLeaderboard {
    path: PathBuf,
    key: String,
    capacity: usize,
    write_lock: Mutex<()>,
}

impl LocalFileLeaderboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_options(path, DEFAULT_RECORD_KEY, DEFAULT_CAPACITY)
    }

    pub fn with_options(path: impl Into<PathBuf>, key: impl Into<String>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
            capacity,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_records(&self) -> Result<BTreeMap<String, String>, LeaderboardError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn decode_entries(&self, records: &BTreeMap<String, String>) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let Some(raw) = records.get(&self.key) else {
            return Ok(Vec::new());
        };
        let stored: Vec<StoredEntry> = serde_json::from_str(raw)?;
        Ok(stored.into_iter().map(LeaderboardEntry::from).collect())
    }

    async fn write_records(&self, records: &BTreeMap<String, String>) -> Result<(), LeaderboardError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write next to the target and rename so a crash never leaves half a file
        let tmp_path = temp_path(&self.path);
        tokio::fs::write(&tmp_path, serde_json::to_vec_pretty(records)?).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

/// Sibling of `path` with `.tmp` appended to the full file name, so it never equals `path`.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[async_trait]
impl LeaderboardGateway for LocalFileLeaderboard {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch_top(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let records = self.read_records().await?;
        let entries = self.decode_entries(&records)?;
        debug!(entry_count = entries.len(), "Loaded leaderboard from disk");
        Ok(entries)
    }

    #[instrument(skip(self, submission), fields(path = %self.path.display(), player_name = %submission.player_name))]
    async fn submit(
        &self,
        submission: &ScoreSubmission,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        validate(submission)?;

        let _guard = self.write_lock.lock().await;

        let mut records = match self.read_records().await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Leaderboard file unreadable, starting a new one");
                BTreeMap::new()
            }
        };

        let mut entries = match self.decode_entries(&records) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, key = %self.key, "Leaderboard record unreadable, replacing it");
                Vec::new()
            }
        };

        entries.push(submission.clone().into_entry(Utc::now()));
        rank_entries(&mut entries, self.capacity);

        let stored: Vec<StoredEntry> = entries.iter().cloned().map(StoredEntry::from).collect();
        records.insert(self.key.clone(), serde_json::to_string(&stored)?);
        self.write_records(&records).await?;

        debug!(entry_count = entries.len(), "Leaderboard written to disk");
        Ok(entries)
    }
}
