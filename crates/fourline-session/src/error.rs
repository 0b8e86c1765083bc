//! Error types for the session layer.

/// Errors that can occur while validating user intents.
///
/// These are the only session-layer failures that reach the user
/// directly; everything else is a notice or handled by the
/// reconnection policy. The `Display` strings are shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The username was empty (or whitespace-only) after trimming.
    #[error("Please enter a username")]
    EmptyUsername,

    /// The username exceeds the 20-character limit.
    #[error("Username must be at most {max} characters")]
    UsernameTooLong {
        /// The allowed maximum.
        max: usize,
    },
}
