//! Core protocol types for Fourline's wire format.
//!
//! Everything here mirrors what the authoritative server sends. The
//! client never mutates a snapshot — each inbound update replaces the
//! previous one wholesale.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Number of board rows. Row 0 is the top row.
pub const ROWS: usize = 6;

/// Number of board columns.
pub const COLUMNS: usize = 7;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A server-assigned player identifier.
///
/// Newtype wrapper so a player id can't be confused with a game id or a
/// plain username. `#[serde(transparent)]` keeps the wire shape a plain
/// JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A server-assigned game identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub String);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GameId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A player's public profile as delivered by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    /// The server-assigned id.
    pub id: PlayerId,
    /// Display name the player joined with.
    pub username: String,
    /// Whether this seat is filled by the server's bot.
    #[serde(default)]
    pub is_bot: bool,
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// The contents of one board cell.
///
/// The server encodes cells as integers (0/1/2), so this enum converts
/// through `u8` rather than serializing variant names. A value outside
/// 0..=2 fails decoding — malformed snapshots never reach the session
/// layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Cell {
    /// No disc.
    Empty,
    /// Player 1's disc (red).
    Player1,
    /// Player 2's disc (yellow).
    Player2,
}

impl TryFrom<u8> for Cell {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Empty),
            1 => Ok(Self::Player1),
            2 => Ok(Self::Player2),
            other => Err(format!("cell value out of range: {other}")),
        }
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => 0,
            Cell::Player1 => 1,
            Cell::Player2 => 2,
        }
    }
}

/// Which of the two seats a value refers to (`currentTurn` on the wire).
///
/// Encoded as 1 or 2, never 0 — a snapshot always has a current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Seat {
    /// Player 1 (red discs, moves first).
    One,
    /// Player 2 (yellow discs).
    Two,
}

impl Seat {
    /// The disc color for this seat, as shown to the user.
    pub fn color(self) -> &'static str {
        match self {
            Self::One => "Red",
            Self::Two => "Yellow",
        }
    }

    /// The 1-based player number (what the wire carries).
    pub fn number(self) -> u8 {
        self.into()
    }
}

impl TryFrom<u8> for Seat {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(format!("seat must be 1 or 2, got {other}")),
        }
    }
}

impl From<Seat> for u8 {
    fn from(seat: Seat) -> Self {
        match seat {
            Seat::One => 1,
            Seat::Two => 2,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// A 6×7 game board, row 0 on top.
///
/// Fixed-size arrays make the board shape a decode-time guarantee:
/// a snapshot with the wrong number of rows or columns is rejected by
/// the codec, so downstream code never re-validates dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board(pub [[Cell; COLUMNS]; ROWS]);

impl Board {
    /// An empty board.
    pub fn empty() -> Self {
        Self([[Cell::Empty; COLUMNS]; ROWS])
    }

    /// Returns the cell at the given position.
    ///
    /// # Panics
    /// Panics if `row >= ROWS` or `col >= COLUMNS`.
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.0[row][col]
    }

    /// Returns `true` if the column can take no more discs.
    ///
    /// Discs stack from the bottom, so a column is full exactly when
    /// its top cell (row 0) is occupied.
    ///
    /// # Panics
    /// Panics if `col >= COLUMNS`.
    pub fn is_column_full(&self, col: usize) -> bool {
        self.0[0][col] != Cell::Empty
    }

    /// Returns `true` if every column is full.
    pub fn is_full(&self) -> bool {
        (0..COLUMNS).all(|col| self.is_column_full(col))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

// ---------------------------------------------------------------------------
// GameSnapshot
// ---------------------------------------------------------------------------

/// The complete, authoritative game state as last delivered by the server.
///
/// Immutable per message: the session layer stores each snapshot as-is
/// and never patches fields in place, so stale data from a prior
/// snapshot cannot survive an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    /// The server-assigned game id (also the reconnection key).
    pub id: GameId,
    /// The player in seat 1.
    pub player1: PlayerInfo,
    /// The player in seat 2; absent while matchmaking is pending.
    #[serde(default)]
    pub player2: Option<PlayerInfo>,
    /// The full board.
    pub board: Board,
    /// Whose turn it is.
    pub current_turn: Seat,
    /// The winner, present only in a finished game. Absent on a draw.
    #[serde(default)]
    pub winner: Option<PlayerInfo>,
    /// The four-in-a-row cells as (row, col) pairs, if the game was won.
    #[serde(default)]
    pub winning_line: Option<Vec<(usize, usize)>>,
}

impl GameSnapshot {
    /// Which seat the given player occupies, if any.
    pub fn seat_of(&self, player_id: &PlayerId) -> Option<Seat> {
        if self.player1.id == *player_id {
            Some(Seat::One)
        } else if self
            .player2
            .as_ref()
            .is_some_and(|p| p.id == *player_id)
        {
            Some(Seat::Two)
        } else {
            None
        }
    }

    /// The player occupying the given seat, if present.
    pub fn player_at(&self, seat: Seat) -> Option<&PlayerInfo> {
        match seat {
            Seat::One => Some(&self.player1),
            Seat::Two => self.player2.as_ref(),
        }
    }

    /// Returns `true` if the given (row, col) is part of the winning line.
    pub fn is_winning_cell(&self, row: usize, col: usize) -> bool {
        self.winning_line
            .as_ref()
            .is_some_and(|line| line.iter().any(|&(r, c)| r == row && c == col))
    }
}

// ---------------------------------------------------------------------------
// Leaderboard
// ---------------------------------------------------------------------------

/// One row of the ranking list served by `GET /api/leaderboard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// The player's display name.
    pub username: String,
    /// Games won.
    pub wins: u32,
    /// Games lost.
    pub losses: u32,
    /// Games drawn.
    pub draws: u32,
}

impl LeaderboardEntry {
    /// Win percentage over all recorded games, 0.0 when none are recorded.
    pub fn win_rate(&self) -> f64 {
        let total = self.wins + self.losses + self.draws;
        if total == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(total) * 100.0
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
