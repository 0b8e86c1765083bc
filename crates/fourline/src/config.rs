//! Client configuration.

use std::time::Duration;

use fourline_session::SessionConfig;

/// Endpoint and timing configuration for the client.
///
/// Defaults target a local server. Tests override the URLs with the
/// bound test server's address and shrink the durations to keep runs
/// fast.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// The game WebSocket endpoint.
    pub ws_url: String,

    /// Base URL for the REST side (leaderboard).
    pub api_url: String,

    /// How long a connection attempt may sit in the opening state
    /// before it is treated as failed.
    pub open_timeout: Duration,

    /// Session timing (reconnect delay, notice TTLs).
    pub session: SessionConfig,

    /// How often the leaderboard is re-fetched.
    pub leaderboard_poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            ws_url: "ws://localhost:8080/ws".to_string(),
            api_url: "http://localhost:8080".to_string(),
            open_timeout: Duration::from_secs(10),
            session: SessionConfig::default(),
            leaderboard_poll_interval: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// A config pointed at the given endpoints, defaults otherwise.
    pub fn new(
        ws_url: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            ws_url: ws_url.into(),
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    /// Overrides the session timing.
    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    /// Overrides the connection open timeout.
    pub fn with_open_timeout(mut self, timeout: Duration) -> Self {
        self.open_timeout = timeout;
        self
    }
}
