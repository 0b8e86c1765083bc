//! Turn gating: pure predicates over the snapshot.
//!
//! Everything here is derived on demand from the latest snapshot and
//! the bound identity — there is no cached "my turn" flag to fall out
//! of sync when a new snapshot arrives.

use fourline_protocol::{GameSnapshot, COLUMNS};

use crate::{Identity, SessionPhase};

/// Returns `true` when it is this client's turn to move.
///
/// False unless the session is `Playing` with a snapshot, a bound
/// player id, and `current_turn` matching this client's seat. Exactly
/// one of the two players sees `true` for any snapshot.
pub fn is_your_turn(
    phase: SessionPhase,
    game: Option<&GameSnapshot>,
    identity: Option<&Identity>,
) -> bool {
    if phase != SessionPhase::Playing {
        return false;
    }
    let (Some(game), Some(identity)) = (game, identity) else {
        return false;
    };
    let Some(player_id) = identity.player_id.as_ref() else {
        return false;
    };
    game.seat_of(player_id) == Some(game.current_turn)
}

/// Returns `true` when `column` is in range and has room for a disc.
pub fn can_drop(game: &GameSnapshot, column: usize) -> bool {
    column < COLUMNS && !game.board.is_column_full(column)
}

// =========================================================================
// Tests
// =========================================================================
