//! The closed set of messages exchanged with the server.
//!
//! Every frame is a JSON envelope `{ "type": ..., "payload": ... }`.
//! Serde's adjacently-tagged representation produces exactly that shape,
//! so there is no separate envelope struct. Type tags are snake_case;
//! payload fields are camelCase where the server uses camelCase.

use serde::{Deserialize, Serialize};

use crate::{GameId, GameSnapshot, PlayerId};

/// Outbound: what the client may send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Enter the matchmaking queue under the given name.
    JoinQueue {
        /// The trimmed display name (1–20 characters).
        username: String,
    },

    /// Re-bind a fresh connection to an in-flight game after a drop.
    Reconnect {
        /// The same name used to join.
        username: String,
        /// The last-known game id.
        #[serde(rename = "gameId")]
        game_id: GameId,
    },

    /// Drop a disc into the given column.
    Move {
        /// Target column, 0–6.
        column: usize,
    },
}

/// Inbound: what the server may send.
///
/// A frame whose type tag is not one of these, or whose payload is
/// missing required fields, fails decoding — the caller logs the
/// [`ProtocolError`](crate::ProtocolError) and drops the frame without
/// touching session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Matchmaking finished; the game is starting.
    GameStart {
        /// The initial snapshot.
        game: GameSnapshot,
        /// Which player this client is.
        #[serde(rename = "yourPlayerId")]
        your_player_id: PlayerId,
    },

    /// A new authoritative snapshot (someone moved).
    GameUpdate {
        /// The replacement snapshot.
        game: GameSnapshot,
        /// Optional notice to surface alongside the update.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// The game ended; the snapshot carries the winner (or none, a draw).
    GameOver {
        /// The final snapshot.
        game: GameSnapshot,
        /// The result notice ("Ada wins!", "It's a draw", ...).
        message: String,
    },

    /// A server-side error; transient, does not change session state.
    Error {
        /// Human-readable description.
        message: String,
    },

    /// The last move was rejected by the server's rules.
    InvalidMove {
        /// Why the move was rejected.
        message: String,
    },

    /// The opponent's connection is gone; the game itself continues
    /// (they may reconnect, or a bot plays on).
    OpponentLeft {
        /// Notice to surface.
        message: String,
    },
}

// =========================================================================
// Tests
// =========================================================================
