//! Error types for the transport layer.
//!
//! Connect failures, timeouts, and socket errors are not returned from
//! calls — they surface as `Closed { expected: false }` events on the
//! connection's event channel, because the caller observes them
//! asynchronously. Only the synchronous `send` path has an error to
//! report directly.

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// `send` was called with no live, open connection. The frame was
    /// not delivered and will not be — callers distinguish "command
    /// lost" from "command delivered" by this error.
    #[error("connection is not open")]
    NotOpen,
}
