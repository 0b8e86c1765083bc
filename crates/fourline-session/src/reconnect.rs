//! Reconnection policy: at most one attempt per disconnection.
//!
//! The coordinator never owns identity or game state and never touches
//! a timer itself — it decides *whether* an attempt should be armed and
//! recognizes *which* timer firing is the current one. The driver owns
//! the actual delay.

use std::fmt;

use crate::SessionContext;

/// Identifies one armed reconnection timer.
///
/// Tokens are handed out monotonically; a firing whose token does not
/// match the currently armed one belongs to a superseded or disarmed
/// timer and is a no-op. This is what makes overlapping closures safe:
/// arming is idempotent and stale timers cannot double-fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReconnectToken(u64);

impl fmt::Display for ReconnectToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reconnect-{}", self.0)
    }
}

/// Where the coordinator is in its single-attempt cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArmState {
    /// Nothing armed; the next unexpected close may arm an attempt.
    Idle,
    /// A timer is armed with this token. Further closes do not arm a
    /// second one.
    Armed(ReconnectToken),
    /// The attempt has fired. A failure of that attempt (another close)
    /// must not auto-retry; only a fresh snapshot from the server
    /// resets the cycle.
    Fired,
}

/// Decides when a reconnection attempt is armed and when it fires.
///
/// ## Lifecycle
///
/// ```text
/// Idle ──(unexpected close, session in flight)──→ Armed(token)
///   ↑                                                 │
///   │                              (timer fires, token matches)
///   │                                                 ▼
///   ├──────────(snapshot received: recovered)────── Fired
///   └──────────(play-again / teardown: disarm)──── any state
/// ```
#[derive(Debug)]
pub struct ReconnectionCoordinator {
    next_token: u64,
    state: ArmState,
}

impl ReconnectionCoordinator {
    /// A coordinator with nothing armed.
    pub fn new() -> Self {
        Self {
            next_token: 0,
            state: ArmState::Idle,
        }
    }

    /// Considers arming an attempt after an unexpected close.
    ///
    /// Returns the token to arm a timer with, or `None` when no attempt
    /// should be made: the session is not in flight, no identity or
    /// game id is known (nothing to re-bind), an attempt is already
    /// armed, or the previous attempt already failed.
    pub fn arm(&mut self, context: &SessionContext) -> Option<ReconnectToken> {
        if self.state != ArmState::Idle {
            tracing::debug!(state = ?self.state, "reconnect not armed");
            return None;
        }
        if !context.phase().is_in_flight() {
            return None;
        }
        // A reconnect re-binds by username + game id; without a game id
        // (still matchmaking) there is nothing to re-bind to.
        if context.identity().is_none() || context.game().is_none() {
            tracing::debug!("no identity or game id, reconnect not armed");
            return None;
        }

        self.next_token += 1;
        let token = ReconnectToken(self.next_token);
        self.state = ArmState::Armed(token);
        tracing::info!(%token, "reconnect attempt armed");
        Some(token)
    }

    /// Reports a timer firing. Returns `true` only for the currently
    /// armed token; stale tokens are ignored.
    pub fn fire(&mut self, token: ReconnectToken) -> bool {
        if self.state == ArmState::Armed(token) {
            self.state = ArmState::Fired;
            true
        } else {
            tracing::debug!(%token, "stale reconnect timer ignored");
            false
        }
    }

    /// Cancels any armed or fired attempt. Used on play-again and
    /// session teardown so a pending timer becomes a no-op.
    pub fn disarm(&mut self) {
        self.state = ArmState::Idle;
    }

    /// Marks the session as recovered (a fresh snapshot arrived), which
    /// permits arming again on a future disconnection.
    pub fn recovered(&mut self) {
        self.state = ArmState::Idle;
    }

    /// Returns `true` if a timer is currently armed.
    pub fn is_armed(&self) -> bool {
        matches!(self.state, ArmState::Armed(_))
    }
}

impl Default for ReconnectionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
