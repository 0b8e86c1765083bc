//! Session types: phase, identity, notices, and the owned context.
//!
//! The context is the single place client-side session state lives.
//! Transitions go through [`SessionStateMachine`](crate::SessionStateMachine);
//! consumers read through the accessors, which hide expired notices.

use std::time::{Duration, Instant};

use fourline_protocol::{GameSnapshot, PlayerId, Seat};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Timing configuration for session behavior.
///
/// The defaults match the original client: a 2-second reconnect delay,
/// 5 seconds for server errors, 3 seconds for rejected moves. Tests set
/// zero or huge durations instead of sleeping.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long to wait after an unexpected close before the single
    /// reconnection attempt fires.
    pub reconnect_delay: Duration,

    /// How long a server `error` notice stays visible.
    pub error_notice_ttl: Duration,

    /// How long an `invalid_move` notice stays visible.
    pub invalid_move_notice_ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reconnect_delay: Duration::from_secs(2),
            error_notice_ttl: Duration::from_secs(5),
            invalid_move_notice_ttl: Duration::from_secs(3),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionPhase
// ---------------------------------------------------------------------------

/// The session's lifecycle phase.
///
/// ```text
///   Idle ──(join)──→ Waiting ──(game_start)──→ Playing ──(game_over)──→ Finished
///    ↑                                                                      │
///    └────────────────────────────(play again)─────────────────────────────┘
/// ```
///
/// `Idle` is initial and there is no terminal phase — `Finished` always
/// returns to `Idle` through an explicit play-again intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No session; the user has not joined.
    #[default]
    Idle,
    /// Joined the queue, waiting for an opponent.
    Waiting,
    /// A game is in progress.
    Playing,
    /// The game ended; awaiting play-again.
    Finished,
}

impl SessionPhase {
    /// Returns `true` while a session is genuinely in flight — the
    /// phases in which an unexpected disconnect matters.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Waiting | Self::Playing)
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Waiting => write!(f, "waiting"),
            Self::Playing => write!(f, "playing"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Who this client is for the lifetime of one session.
///
/// Created at join with just the username; the server assigns the
/// player id at `game_start`. Discarded wholesale on play-again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The validated (trimmed, 1–20 chars) display name.
    pub username: String,
    /// The server-assigned id, bound when the game starts.
    pub player_id: Option<PlayerId>,
}

impl Identity {
    /// A fresh identity with no player id bound yet.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            player_id: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Notice
// ---------------------------------------------------------------------------

/// A user-visible notice, optionally self-clearing.
///
/// Server-reported errors expire after a fixed window; connection-lost
/// and validation errors persist until the next successful action
/// replaces or clears them. Expiry is checked at read time, so no timer
/// is needed to clear a notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    text: String,
    expires: Option<Instant>,
}

impl Notice {
    /// A notice that stays until explicitly cleared or replaced.
    pub fn permanent(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            expires: None,
        }
    }

    /// A notice that reads back as absent once `ttl` has elapsed.
    pub fn expiring(text: impl Into<String>, ttl: Duration) -> Self {
        Self {
            text: text.into(),
            expires: Some(Instant::now() + ttl),
        }
    }

    /// The notice text, or `None` if it has expired.
    pub fn text(&self) -> Option<&str> {
        match self.expires {
            Some(expires) if Instant::now() >= expires => None,
            _ => Some(&self.text),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionContext
// ---------------------------------------------------------------------------

/// The one owned object holding all client-side session state.
///
/// Exclusively owned by the state machine; the driver and view layer
/// read it through the accessors. The snapshot is only ever replaced
/// wholesale — there is no API to patch it in place.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub(crate) phase_: SessionPhase,
    pub(crate) identity_: Option<Identity>,
    pub(crate) game_: Option<GameSnapshot>,
    pub(crate) info_: Option<Notice>,
    pub(crate) error_: Option<Notice>,
}

impl SessionContext {
    /// A fresh context in the `Idle` phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase_
    }

    /// The session identity, present from join until play-again.
    pub fn identity(&self) -> Option<&Identity> {
        self.identity_.as_ref()
    }

    /// The latest authoritative snapshot; absent while Idle/Waiting.
    pub fn game(&self) -> Option<&GameSnapshot> {
        self.game_.as_ref()
    }

    /// The current informational message, if any.
    pub fn info_message(&self) -> Option<&str> {
        self.info_.as_ref().map(|n| n.text.as_str())
    }

    /// The current error notice, if present and not yet expired.
    pub fn error_message(&self) -> Option<&str> {
        self.error_.as_ref().and_then(Notice::text)
    }

    /// The seat this client occupies in the current game, if known.
    pub fn your_seat(&self) -> Option<Seat> {
        let game = self.game_.as_ref()?;
        let player_id = self.identity_.as_ref()?.player_id.as_ref()?;
        game.seat_of(player_id)
    }

    pub(crate) fn set_phase(&mut self, phase: SessionPhase) {
        self.phase_ = phase;
    }

    /// Stores a new snapshot, replacing the previous one wholesale.
    pub(crate) fn replace_game(&mut self, game: GameSnapshot) {
        self.game_ = Some(game);
    }

    pub(crate) fn set_info(&mut self, notice: Notice) {
        self.info_ = Some(notice);
    }

    pub(crate) fn set_error(&mut self, notice: Notice) {
        self.error_ = Some(notice);
    }

    pub(crate) fn clear_error(&mut self) {
        self.error_ = None;
    }

    /// Full reset back to `Idle`: snapshot, identity, and notices all
    /// dropped. This is the play-again path.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

// =========================================================================
// Tests
// =========================================================================
