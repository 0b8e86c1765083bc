//! Leaderboard polling over the REST side of the server.
//!
//! The game flows over the WebSocket; the leaderboard is a plain GET
//! polled on an interval. A failed poll keeps the last good standings
//! on screen instead of blanking them.

use std::time::Duration;

use fourline_protocol::LeaderboardEntry;
use tokio::sync::watch;

use crate::FourlineError;

/// Fetches and polls `/api/leaderboard`.
#[derive(Debug, Clone)]
pub struct LeaderboardClient {
    http: reqwest::Client,
    endpoint: String,
}

impl LeaderboardClient {
    /// A client for the given API base URL (no trailing slash).
    pub fn new(api_url: impl AsRef<str>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/api/leaderboard", api_url.as_ref()),
        }
    }

    /// Fetches the current standings once.
    ///
    /// The server sends a JSON `null` when no games have been recorded;
    /// that reads back as an empty list.
    pub async fn fetch(&self) -> Result<Vec<LeaderboardEntry>, FourlineError> {
        let entries: Option<Vec<LeaderboardEntry>> = self
            .http
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(entries.unwrap_or_default())
    }

    /// Spawns a poll loop and returns a receiver of the latest good
    /// standings. Failed polls log and keep the previous value.
    pub fn poll(
        self,
        interval: Duration,
    ) -> watch::Receiver<Vec<LeaderboardEntry>> {
        let (tx, rx) = watch::channel(Vec::new());
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match self.fetch().await {
                    Ok(entries) => {
                        tx.send_replace(entries);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "leaderboard poll failed");
                    }
                }
                if tx.is_closed() {
                    break;
                }
            }
        });
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_construction() {
        let client = LeaderboardClient::new("http://localhost:8080");
        assert_eq!(
            client.endpoint,
            "http://localhost:8080/api/leaderboard"
        );
    }
}
