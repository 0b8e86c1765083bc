//! # Fourline
//!
//! Connect Four client stack: connection lifecycle, session state, and
//! leaderboard polling for the game server's WebSocket + REST API.
//!
//! The layers are separate crates; this meta-crate ties them together
//! and runs the driver task:
//!
//! ```text
//! fourline            ← driver task, SessionView, leaderboard polling
//! fourline-session    ← phase machine, reconnection policy, turn gate
//! fourline-transport  ← generation-tagged WebSocket connections
//! fourline-protocol   ← wire types and the JSON codec
//! ```
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use fourline::{ClientConfig, SessionClient};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), fourline::FourlineError> {
//! let (handle, mut views) = SessionClient::spawn(ClientConfig::default());
//! handle.join("Ada")?;
//!
//! loop {
//!     views.changed().await.ok();
//!     let view = views.borrow().clone();
//!     if view.your_turn {
//!         handle.play(3)?;
//!     }
//! }
//! # }
//! ```

mod client;
mod config;
mod error;
mod leaderboard;

pub use client::{SessionClient, SessionHandle, SessionView};
pub use config::ClientConfig;
pub use error::FourlineError;
pub use leaderboard::LeaderboardClient;

pub use fourline_protocol as protocol;
pub use fourline_session as session;
pub use fourline_transport as transport;
