//! Client session core for Fourline.
//!
//! This crate is the authoritative client-side session state:
//!
//! 1. **Session context** — one owned object holding phase, identity,
//!    the latest game snapshot, and user-visible notices
//!    ([`SessionContext`]).
//! 2. **State machine** — consumes user intents and decoded protocol
//!    events, returns the I/O the driver should perform
//!    ([`SessionStateMachine`], [`Effect`]).
//! 3. **Reconnection** — the single-attempt, token-guarded re-bind
//!    policy for unexpected disconnects ([`ReconnectionCoordinator`]).
//! 4. **Turn gating** — pure functions deciding whether a move may be
//!    submitted ([`is_your_turn`], [`can_drop`]).
//!
//! # How it fits in the stack
//!
//! ```text
//! Driver (above)   ← executes Effects: connect, send, close, arm timer
//!     ↕
//! Session (this crate)  ← owns phase, identity, snapshot, notices
//!     ↕
//! Protocol (below) ← provides ClientMessage, ServerMessage, GameSnapshot
//! ```
//!
//! Nothing here performs I/O or reads a clock beyond notice expiry, so
//! every transition is a plain synchronous unit test.

mod context;
mod error;
mod machine;
mod reconnect;
mod turn;

pub use context::{
    Identity, Notice, SessionConfig, SessionContext, SessionPhase,
};
pub use error::SessionError;
pub use machine::{
    validate_username, Effect, SessionCommand, SessionStateMachine,
    MAX_USERNAME_LEN,
};
pub use reconnect::{ReconnectToken, ReconnectionCoordinator};
pub use turn::{can_drop, is_your_turn};
