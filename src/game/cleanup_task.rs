use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, info, instrument};

use super::registry::SessionRegistry;

/// Configuration for the session cleanup task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupConfig {
    /// How often to look for idle sessions
    pub cleanup_interval: Duration,
    /// How long a session must go unplayed before it is dropped
    pub idle_threshold: Duration,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            cleanup_interval: Duration::from_secs(5 * 60),  // 5 minutes
            idle_threshold: Duration::from_secs(30 * 60), // 30 minutes
        }
    }
}

/// Periodically drops sessions nobody has played in for a while. Runs until aborted.
#[instrument(skip(registry))]
pub async fn start_cleanup_task(registry: Arc<SessionRegistry>, config: CleanupConfig) {
    info!(
        cleanup_interval_secs = config.cleanup_interval.as_secs(),
        idle_threshold_secs = config.idle_threshold.as_secs(),
        "Starting session cleanup background task"
    );

    let mut cleanup_interval = interval(config.cleanup_interval);

    loop {
        cleanup_interval.tick().await;

        let evicted = registry.evict_idle(config.idle_threshold).await;
        if evicted > 0 {
            let remaining = registry.session_count().await;
            info!(
                evicted,
                remaining,
                "Session cleanup completed"
            );
        } else {
            debug!("No idle sessions to clean up");
        }
    }
}
