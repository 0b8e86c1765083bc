//! Codec trait and implementations for serializing/deserializing messages.
//!
//! The transport layer carries opaque frames; a codec converts between
//! those frames and typed messages. [`JsonCodec`] matches the server's
//! JSON wire format and is the default. The trait leaves room for a
//! binary codec without touching any other layer.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode Rust types to frames and decode frames back.
///
/// `Send + Sync + 'static` because the codec is shared with the
/// connection task. Decoding must be total over arbitrary input: any
/// malformed frame yields [`ProtocolError::Decode`], never a panic —
/// the caller logs it and keeps processing subsequent frames.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into a frame.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes a frame back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the frame is malformed,
    /// carries an unrecognized type tag, or is missing required payload
    /// fields.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] for the server's JSON wire format (via `serde_json`).
///
/// Behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use fourline_protocol::{ClientMessage, Codec, JsonCodec};
///
/// let codec = JsonCodec;
/// let frame = codec
///     .encode(&ClientMessage::Move { column: 3 })
///     .unwrap();
/// let decoded: ClientMessage = codec.decode(&frame).unwrap();
/// assert_eq!(decoded, ClientMessage::Move { column: 3 });
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
