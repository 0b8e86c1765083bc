//! Client-side transport layer for Fourline.
//!
//! Owns exactly one live WebSocket connection at a time and reports its
//! lifecycle as [`ConnectionEvent`]s: opened, frame received, closed.
//! Every event carries the [`Generation`] of the handle that produced
//! it, so late events from a superseded connection can be discarded.
//!
//! The connection itself runs in a background task; the owning loop
//! drives [`ConnectionManager`] and consumes the event channel.

mod error;
mod manager;
mod websocket;

pub use error::TransportError;
pub use manager::{ConnectionEvent, ConnectionManager};

use std::fmt;

/// A monotonically increasing tag distinguishing the current connection
/// handle from retired ones.
///
/// Opening a new connection retires the previous handle; an event tagged
/// with an older generation refers to a retired handle and must be
/// ignored even if it arrives late.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    /// Creates a `Generation` from a raw `u64`.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen-{}", self.0)
    }
}
