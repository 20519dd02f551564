use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, instrument};

use super::{LeaderboardEntry, LeaderboardError, LeaderboardGateway, ScoreSubmission};

/// Remote leaderboard API.
///
/// `GET <endpoint>` returns the standings, `POST <endpoint>` records a result.
/// Ranking and truncation are up to the server.
#[derive(Debug, Clone)]
pub struct HttpLeaderboard {
    http: Client,
    endpoint: String,
}

impl HttpLeaderboard {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, LeaderboardError> {
        let endpoint = endpoint.into();
        Url::parse(&endpoint)
            .map_err(|e| LeaderboardError::Validation(format!("invalid endpoint {endpoint}: {e}")))?;

        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, endpoint))
    }

    pub fn with_client(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LeaderboardGateway for HttpLeaderboard {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch_top(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let entries: Vec<LeaderboardEntry> = self
            .http
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(entry_count = entries.len(), "Fetched remote leaderboard");
        Ok(entries)
    }

    #[instrument(skip(self, submission), fields(endpoint = %self.endpoint, player_name = %submission.player_name))]
    async fn submit(
        &self,
        submission: &ScoreSubmission,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        self.http
            .post(&self.endpoint)
            .json(submission)
            .send()
            .await?
            .error_for_status()?;

        debug!("Score accepted by remote leaderboard");

        // The POST response carries no standings; read them back
        self.fetch_top().await
    }
}
