//! Unified error type for the Fourline client.

use fourline_protocol::ProtocolError;
use fourline_session::SessionError;
use fourline_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `fourline` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum FourlineError {
    /// A transport-level error (send on a closed connection).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (username validation).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// An HTTP error from the leaderboard endpoint.
    #[error("leaderboard request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The driver task is gone; no more commands can be delivered.
    #[error("session driver has shut down")]
    DriverGone,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err: FourlineError = TransportError::NotOpen.into();
        assert!(matches!(err, FourlineError::Transport(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err: FourlineError = SessionError::EmptyUsername.into();
        assert!(matches!(err, FourlineError::Session(_)));
        assert_eq!(err.to_string(), "Please enter a username");
    }

    #[test]
    fn test_driver_gone_display() {
        assert_eq!(
            FourlineError::DriverGone.to_string(),
            "session driver has shut down"
        );
    }
}
