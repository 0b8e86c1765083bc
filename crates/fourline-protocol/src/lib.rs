//! Wire protocol for Fourline.
//!
//! This crate defines the "language" the client speaks with the game
//! server:
//!
//! - **Types** ([`GameSnapshot`], [`Board`], [`PlayerInfo`], etc.) —
//!   the structures that travel on the wire.
//! - **Messages** ([`ClientMessage`], [`ServerMessage`]) — the closed
//!   set of outbound/inbound message shapes.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw frames) and session
//! (game state). It doesn't know about connections or turns — it only
//! knows how to serialize and deserialize messages.
//!
//! ```text
//! Transport (bytes) → Protocol (ServerMessage) → Session (game context)
//! ```
//!
//! # Wire format
//!
//! Every message is a JSON envelope `{ "type": "...", "payload": {...} }`
//! with a snake_case type tag and camelCase payload fields, matching the
//! authoritative server. Boards are 6×7 integer matrices (0 = empty,
//! 1 = player 1, 2 = player 2), row 0 on top.

mod codec;
mod error;
mod message;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use message::{ClientMessage, ServerMessage};
pub use types::{
    Board, Cell, GameId, GameSnapshot, LeaderboardEntry, PlayerId,
    PlayerInfo, Seat, COLUMNS, ROWS,
};
