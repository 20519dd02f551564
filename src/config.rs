use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

use crate::game::{CleanupConfig, DEFAULT_REVEAL_DELAY};
use crate::leaderboard::{
    repository::DEFAULT_CAPACITY, HttpLeaderboard, InMemoryLeaderboard, LeaderboardError,
    LeaderboardGateway, LocalFileLeaderboard,
};

pub const ENV_BIND_ADDR: &str = "MEMORY_MATCH_BIND_ADDR";
pub const ENV_REVEAL_DELAY_MS: &str = "MEMORY_MATCH_REVEAL_DELAY_MS";
pub const ENV_LEADERBOARD: &str = "MEMORY_MATCH_LEADERBOARD";
pub const ENV_LEADERBOARD_SIZE: &str = "MEMORY_MATCH_LEADERBOARD_SIZE";
pub const ENV_HTTP_TIMEOUT_MS: &str = "MEMORY_MATCH_HTTP_TIMEOUT_MS";
pub const ENV_SESSION_IDLE_SECS: &str = "MEMORY_MATCH_SESSION_IDLE_SECS";
pub const ENV_CLEANUP_INTERVAL_SECS: &str = "MEMORY_MATCH_CLEANUP_INTERVAL_SECS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Unknown leaderboard backend: {0} (expected memory, file:<path> or http:<url>)")]
    UnknownLeaderboard(String),
}

/// Where finished games are recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardBackend {
    InMemory,
    File(PathBuf),
    Http(String),
}

impl FromStr for LeaderboardBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("memory") {
            return Ok(LeaderboardBackend::InMemory);
        }
        if let Some(path) = s.strip_prefix("file:").filter(|p| !p.is_empty()) {
            return Ok(LeaderboardBackend::File(PathBuf::from(path)));
        }
        if s.starts_with("http://") || s.starts_with("https://") {
            return parse_endpoint(s, s);
        }
        if let Some(url) = s.strip_prefix("http:").filter(|u| !u.is_empty()) {
            return parse_endpoint(s, url);
        }
        Err(ConfigError::UnknownLeaderboard(s.to_string()))
    }
}

/// Only absolute http(s) URLs make a usable remote leaderboard.
fn parse_endpoint(raw: &str, url: &str) -> Result<LeaderboardBackend, ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        key: ENV_LEADERBOARD,
        value: raw.to_string(),
    };

    let parsed = Url::parse(url).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
        return Err(invalid());
    }
    Ok(LeaderboardBackend::Http(url.to_string()))
}

impl LeaderboardBackend {
    pub fn build(
        &self,
        capacity: usize,
        http_timeout: Duration,
    ) -> Result<Arc<dyn LeaderboardGateway>, LeaderboardError> {
        Ok(match self {
            LeaderboardBackend::InMemory => Arc::new(InMemoryLeaderboard::with_capacity(capacity)),
            LeaderboardBackend::File(path) => Arc::new(LocalFileLeaderboard::with_options(
                path,
                crate::leaderboard::repository::DEFAULT_RECORD_KEY,
                capacity,
            )),
            LeaderboardBackend::Http(url) => Arc::new(HttpLeaderboard::new(url, http_timeout)?),
        })
    }
}

/// Runtime configuration for the game server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub reveal_delay: Duration,
    pub leaderboard: LeaderboardBackend,
    /// Results kept by the local leaderboards
    pub leaderboard_capacity: usize,
    pub http_timeout: Duration,
    /// Eviction of sessions nobody plays in any more
    pub cleanup: CleanupConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            reveal_delay: DEFAULT_REVEAL_DELAY,
            leaderboard: LeaderboardBackend::InMemory,
            leaderboard_capacity: DEFAULT_CAPACITY,
            http_timeout: Duration::from_secs(5),
            cleanup: CleanupConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_BIND_ADDR) {
            config.bind_addr = parse(ENV_BIND_ADDR, &value)?;
        }
        if let Some(value) = lookup(ENV_REVEAL_DELAY_MS) {
            config.reveal_delay = Duration::from_millis(parse(ENV_REVEAL_DELAY_MS, &value)?);
        }
        if let Some(value) = lookup(ENV_LEADERBOARD) {
            config.leaderboard = value.parse()?;
        }
        if let Some(value) = lookup(ENV_LEADERBOARD_SIZE) {
            let capacity: usize = parse(ENV_LEADERBOARD_SIZE, &value)?;
            if capacity == 0 {
                return Err(ConfigError::InvalidValue {
                    key: ENV_LEADERBOARD_SIZE,
                    value,
                });
            }
            config.leaderboard_capacity = capacity;
        }
        if let Some(value) = lookup(ENV_HTTP_TIMEOUT_MS) {
            config.http_timeout = Duration::from_millis(parse(ENV_HTTP_TIMEOUT_MS, &value)?);
        }
        if let Some(value) = lookup(ENV_SESSION_IDLE_SECS) {
            config.cleanup.idle_threshold = parse_positive_secs(ENV_SESSION_IDLE_SECS, value)?;
        }
        if let Some(value) = lookup(ENV_CLEANUP_INTERVAL_SECS) {
            config.cleanup.cleanup_interval =
                parse_positive_secs(ENV_CLEANUP_INTERVAL_SECS, value)?;
        }

        Ok(config)
    }
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

fn parse_positive_secs(key: &'static str, value: String) -> Result<Duration, ConfigError> {
    match parse::<u64>(key, &value)? {
        0 => Err(ConfigError::InvalidValue { key, value }),
        secs => Ok(Duration::from_secs(secs)),
    }
}
