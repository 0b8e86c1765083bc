//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding messages.
///
/// Decode errors are soft by design: a malformed or unrecognized frame
/// is logged and dropped by the caller, and subsequent frames keep
/// flowing. Nothing here is fatal.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a message into a frame).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, an unrecognized type
    /// tag, or a payload missing required fields.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
