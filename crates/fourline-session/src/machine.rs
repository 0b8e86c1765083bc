//! The session state machine.
//!
//! All transition logic lives here, synchronously: the machine owns the
//! [`SessionContext`], consumes user commands and connection events, and
//! returns the [`Effect`]s the driver must carry out. It performs no I/O
//! itself, so every transition is testable without a connection.

use std::time::Duration;

use fourline_protocol::{ClientMessage, GameSnapshot, PlayerId, ServerMessage};

use crate::{
    can_drop, is_your_turn, Identity, Notice, ReconnectToken,
    ReconnectionCoordinator, SessionConfig, SessionContext, SessionError,
    SessionPhase,
};

/// Longest accepted username, in characters.
pub const MAX_USERNAME_LEN: usize = 20;

const WAITING_NOTICE: &str = "Waiting for opponent...";
const CONNECTION_LOST_NOTICE: &str =
    "Connection lost. Attempting to reconnect...";
const NOT_CONNECTED_NOTICE: &str = "Not connected to server";

/// Trims and length-checks a display name.
///
/// Returns the trimmed name, or the user-facing error to surface.
pub fn validate_username(raw: &str) -> Result<String, SessionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SessionError::EmptyUsername);
    }
    if trimmed.chars().count() > MAX_USERNAME_LEN {
        return Err(SessionError::UsernameTooLong {
            max: MAX_USERNAME_LEN,
        });
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Commands and effects
// ---------------------------------------------------------------------------

/// A user intent fed into the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Join the matchmaking queue under this (raw, unvalidated) name.
    Join { username: String },
    /// Drop a disc into this column.
    Move { column: usize },
    /// Leave the finished game and return to idle.
    PlayAgain,
}

/// What the driver must do after a transition.
///
/// Effects are returned, never executed here, so the machine stays
/// synchronous and the driver keeps ownership of the connection.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Open a fresh connection and send `queue` once it is up.
    Connect { queue: ClientMessage },
    /// Send on the current connection.
    Send(ClientMessage),
    /// Close the current connection, if any.
    Close,
    /// Start a one-shot timer; report it back via
    /// [`SessionStateMachine::handle_reconnect_due`] with the same token.
    ArmReconnect {
        token: ReconnectToken,
        delay: Duration,
    },
}

// ---------------------------------------------------------------------------
// SessionStateMachine
// ---------------------------------------------------------------------------

/// Owns the session context and applies every transition.
#[derive(Debug)]
pub struct SessionStateMachine {
    config: SessionConfig,
    context: SessionContext,
    reconnect: ReconnectionCoordinator,
}

impl SessionStateMachine {
    /// A fresh machine in the `Idle` phase.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            context: SessionContext::new(),
            reconnect: ReconnectionCoordinator::new(),
        }
    }

    /// Read access to the session state.
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Applies a user command.
    pub fn handle_command(&mut self, command: SessionCommand) -> Vec<Effect> {
        match command {
            SessionCommand::Join { username } => self.join(&username),
            SessionCommand::Move { column } => self.try_move(column),
            SessionCommand::PlayAgain => self.play_again(),
        }
    }

    /// Applies a decoded server message.
    pub fn handle_server_message(
        &mut self,
        message: ServerMessage,
    ) -> Vec<Effect> {
        match message {
            ServerMessage::GameStart {
                game,
                your_player_id,
            } => self.game_start(game, your_player_id),
            ServerMessage::GameUpdate { game, message } => {
                self.game_update(game, message)
            }
            ServerMessage::GameOver { game, message } => {
                self.game_over(game, message)
            }
            ServerMessage::Error { message } => {
                self.server_error(message)
            }
            ServerMessage::InvalidMove { message } => {
                self.invalid_move(message)
            }
            ServerMessage::OpponentLeft { message } => {
                self.opponent_left(message)
            }
        }
    }

    /// The connection came up (initial open or reconnect). Clears the
    /// connection-lost notice.
    pub fn handle_opened(&mut self) -> Vec<Effect> {
        self.context.clear_error();
        Vec::new()
    }

    /// The connection went down. An expected close (we asked for it) is
    /// a no-op; an unexpected one surfaces a notice and may arm the
    /// single reconnection attempt.
    pub fn handle_closed(&mut self, expected: bool) -> Vec<Effect> {
        if expected {
            return Vec::new();
        }
        if !self.context.phase().is_in_flight() {
            tracing::debug!(
                phase = %self.context.phase(),
                "close outside an active session, ignored"
            );
            return Vec::new();
        }

        self.context
            .set_error(Notice::permanent(CONNECTION_LOST_NOTICE));

        match self.reconnect.arm(&self.context) {
            Some(token) => vec![Effect::ArmReconnect {
                token,
                delay: self.config.reconnect_delay,
            }],
            None => Vec::new(),
        }
    }

    /// A `Send` effect could not be delivered (no open connection).
    /// The message is gone; tell the user instead of pretending.
    pub fn handle_send_failed(&mut self) -> Vec<Effect> {
        tracing::debug!("outbound message dropped, connection not open");
        self.context
            .set_error(Notice::permanent(NOT_CONNECTED_NOTICE));
        Vec::new()
    }

    /// The reconnection timer fired. Stale tokens and sessions that
    /// meanwhile reset are no-ops.
    pub fn handle_reconnect_due(
        &mut self,
        token: ReconnectToken,
    ) -> Vec<Effect> {
        if !self.reconnect.fire(token) {
            return Vec::new();
        }
        let (Some(identity), Some(game)) =
            (self.context.identity(), self.context.game())
        else {
            return Vec::new();
        };

        tracing::info!(game = %game.id, "attempting reconnect");
        vec![Effect::Connect {
            queue: ClientMessage::Reconnect {
                username: identity.username.clone(),
                game_id: game.id.clone(),
            },
        }]
    }

    // -- commands ----------------------------------------------------------

    fn join(&mut self, raw_username: &str) -> Vec<Effect> {
        if self.context.phase() != SessionPhase::Idle {
            tracing::debug!(
                phase = %self.context.phase(),
                "join ignored outside idle"
            );
            return Vec::new();
        }

        let username = match validate_username(raw_username) {
            Ok(username) => username,
            Err(err) => {
                self.context.set_error(Notice::permanent(err.to_string()));
                return Vec::new();
            }
        };

        tracing::info!(%username, "joining queue");
        self.context.identity_ = Some(Identity::new(username.clone()));
        self.context.set_phase(SessionPhase::Waiting);
        self.context.set_info(Notice::permanent(WAITING_NOTICE));
        self.context.clear_error();

        vec![Effect::Connect {
            queue: ClientMessage::JoinQueue { username },
        }]
    }

    fn try_move(&mut self, column: usize) -> Vec<Effect> {
        let phase = self.context.phase();
        if !is_your_turn(phase, self.context.game(), self.context.identity()) {
            tracing::debug!(column, "move dropped, not our turn");
            return Vec::new();
        }
        // is_your_turn guarantees a snapshot exists.
        let Some(game) = self.context.game() else {
            return Vec::new();
        };
        if !can_drop(game, column) {
            tracing::debug!(column, "move dropped, column unavailable");
            return Vec::new();
        }

        vec![Effect::Send(ClientMessage::Move { column })]
    }

    fn play_again(&mut self) -> Vec<Effect> {
        if self.context.phase() != SessionPhase::Finished {
            tracing::debug!(
                phase = %self.context.phase(),
                "play-again ignored before game over"
            );
            return Vec::new();
        }

        self.reconnect.disarm();
        self.context.reset();
        vec![Effect::Close]
    }

    // -- server messages ---------------------------------------------------

    fn game_start(
        &mut self,
        game: GameSnapshot,
        your_player_id: PlayerId,
    ) -> Vec<Effect> {
        // Accepted while Waiting (first start) and while Playing
        // (re-bind after a reconnect).
        if !self.context.phase().is_in_flight() {
            tracing::debug!(
                phase = %self.context.phase(),
                "game_start ignored"
            );
            return Vec::new();
        }

        let info = match game.seat_of(&your_player_id) {
            Some(seat) => format!(
                "Game started! You are Player {} ({})",
                seat.number(),
                seat.color()
            ),
            None => {
                tracing::warn!(
                    player = %your_player_id,
                    game = %game.id,
                    "assigned id not seated in snapshot"
                );
                "Game started!".to_string()
            }
        };

        tracing::info!(game = %game.id, player = %your_player_id, "game started");
        if let Some(identity) = self.context.identity_.as_mut() {
            identity.player_id = Some(your_player_id);
        }
        self.context.replace_game(game);
        self.context.set_phase(SessionPhase::Playing);
        self.context.set_info(Notice::permanent(info));
        self.context.clear_error();
        self.reconnect.recovered();
        Vec::new()
    }

    fn game_update(
        &mut self,
        game: GameSnapshot,
        message: Option<String>,
    ) -> Vec<Effect> {
        if self.context.phase() != SessionPhase::Playing {
            tracing::debug!(
                phase = %self.context.phase(),
                "game_update ignored"
            );
            return Vec::new();
        }

        self.context.replace_game(game);
        if let Some(message) = message {
            self.context.set_info(Notice::permanent(message));
        }
        self.context.clear_error();
        self.reconnect.recovered();
        Vec::new()
    }

    fn game_over(
        &mut self,
        game: GameSnapshot,
        message: String,
    ) -> Vec<Effect> {
        if self.context.phase() != SessionPhase::Playing {
            tracing::debug!(
                phase = %self.context.phase(),
                "game_over ignored"
            );
            return Vec::new();
        }

        tracing::info!(game = %game.id, %message, "game over");
        self.context.replace_game(game);
        self.context.set_phase(SessionPhase::Finished);
        self.context.set_info(Notice::permanent(message));
        self.context.clear_error();
        self.reconnect.disarm();
        Vec::new()
    }

    fn server_error(&mut self, message: String) -> Vec<Effect> {
        if !self.context.phase().is_in_flight() {
            tracing::debug!(%message, "server error outside session, ignored");
            return Vec::new();
        }
        tracing::warn!(%message, "server error");
        self.context.set_error(Notice::expiring(
            message,
            self.config.error_notice_ttl,
        ));
        Vec::new()
    }

    fn invalid_move(&mut self, message: String) -> Vec<Effect> {
        if self.context.phase() != SessionPhase::Playing {
            tracing::debug!(%message, "invalid_move outside playing, ignored");
            return Vec::new();
        }
        self.context.set_error(Notice::expiring(
            message,
            self.config.invalid_move_notice_ttl,
        ));
        Vec::new()
    }

    fn opponent_left(&mut self, message: String) -> Vec<Effect> {
        if !self.context.phase().is_in_flight() {
            return Vec::new();
        }
        tracing::info!("opponent left");
        self.context.set_info(Notice::permanent(message));
        Vec::new()
    }
}

impl Default for SessionStateMachine {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use fourline_protocol::{
        Board, Cell, GameSnapshot, PlayerInfo, Seat, COLUMNS, ROWS,
    };

    fn snapshot(current_turn: Seat) -> GameSnapshot {
        GameSnapshot {
            id: "g-1".into(),
            player1: PlayerInfo {
                id: "p1".into(),
                username: "Ada".to_string(),
                is_bot: false,
            },
            player2: Some(PlayerInfo {
                id: "p2".into(),
                username: "Grace".to_string(),
                is_bot: false,
            }),
            board: Board::empty(),
            current_turn,
            winner: None,
            winning_line: None,
        }
    }

    /// Machine for "Ada", joined and playing as Player 1.
    fn playing_machine(current_turn: Seat) -> SessionStateMachine {
        let mut machine = SessionStateMachine::default();
        machine.handle_command(SessionCommand::Join {
            username: "Ada".to_string(),
        });
        machine.handle_server_message(ServerMessage::GameStart {
            game: snapshot(current_turn),
            your_player_id: "p1".into(),
        });
        assert_eq!(machine.context().phase(), SessionPhase::Playing);
        machine
    }

    // -- validate_username -------------------------------------------------

    #[test]
    fn test_validate_username_trims_whitespace() {
        assert_eq!(validate_username("  Ada  ").unwrap(), "Ada");
    }

    #[test]
    fn test_validate_username_rejects_blank() {
        assert_eq!(
            validate_username("   "),
            Err(SessionError::EmptyUsername)
        );
    }

    #[test]
    fn test_validate_username_rejects_over_twenty_chars() {
        let long = "a".repeat(MAX_USERNAME_LEN + 1);
        assert_eq!(
            validate_username(&long),
            Err(SessionError::UsernameTooLong {
                max: MAX_USERNAME_LEN
            })
        );
        // Exactly at the limit is fine.
        let exact = "a".repeat(MAX_USERNAME_LEN);
        assert!(validate_username(&exact).is_ok());
    }

    // -- join --------------------------------------------------------------

    #[test]
    fn test_join_transitions_to_waiting_and_connects() {
        let mut machine = SessionStateMachine::default();

        let effects = machine.handle_command(SessionCommand::Join {
            username: "Ada".to_string(),
        });

        assert_eq!(
            effects,
            vec![Effect::Connect {
                queue: ClientMessage::JoinQueue {
                    username: "Ada".to_string()
                }
            }]
        );
        assert_eq!(machine.context().phase(), SessionPhase::Waiting);
        assert_eq!(
            machine.context().info_message(),
            Some("Waiting for opponent...")
        );
        assert_eq!(
            machine.context().identity().map(|i| i.username.as_str()),
            Some("Ada")
        );
    }

    #[test]
    fn test_join_invalid_username_surfaces_error_without_effects() {
        let mut machine = SessionStateMachine::default();

        let effects = machine.handle_command(SessionCommand::Join {
            username: "   ".to_string(),
        });

        assert!(effects.is_empty());
        assert_eq!(machine.context().phase(), SessionPhase::Idle);
        assert_eq!(
            machine.context().error_message(),
            Some("Please enter a username")
        );
    }

    #[test]
    fn test_join_while_waiting_is_ignored() {
        let mut machine = SessionStateMachine::default();
        machine.handle_command(SessionCommand::Join {
            username: "Ada".to_string(),
        });

        let effects = machine.handle_command(SessionCommand::Join {
            username: "Grace".to_string(),
        });

        assert!(effects.is_empty());
        assert_eq!(
            machine.context().identity().map(|i| i.username.as_str()),
            Some("Ada")
        );
    }

    // -- game_start --------------------------------------------------------

    #[test]
    fn test_game_start_binds_player_and_announces_seat() {
        let mut machine = SessionStateMachine::default();
        machine.handle_command(SessionCommand::Join {
            username: "Ada".to_string(),
        });

        let effects = machine.handle_server_message(ServerMessage::GameStart {
            game: snapshot(Seat::One),
            your_player_id: "p1".into(),
        });

        assert!(effects.is_empty());
        assert_eq!(machine.context().phase(), SessionPhase::Playing);
        assert_eq!(machine.context().your_seat(), Some(Seat::One));
        assert_eq!(
            machine.context().info_message(),
            Some("Game started! You are Player 1 (Red)")
        );
    }

    #[test]
    fn test_game_start_as_player_two_announces_yellow() {
        let mut machine = SessionStateMachine::default();
        machine.handle_command(SessionCommand::Join {
            username: "Grace".to_string(),
        });

        machine.handle_server_message(ServerMessage::GameStart {
            game: snapshot(Seat::One),
            your_player_id: "p2".into(),
        });

        assert_eq!(
            machine.context().info_message(),
            Some("Game started! You are Player 2 (Yellow)")
        );
    }

    #[test]
    fn test_game_start_while_idle_is_ignored() {
        let mut machine = SessionStateMachine::default();

        machine.handle_server_message(ServerMessage::GameStart {
            game: snapshot(Seat::One),
            your_player_id: "p1".into(),
        });

        assert_eq!(machine.context().phase(), SessionPhase::Idle);
        assert!(machine.context().game().is_none());
    }

    // -- moves -------------------------------------------------------------

    #[test]
    fn test_move_on_your_turn_sends() {
        let mut machine = playing_machine(Seat::One);

        let effects =
            machine.handle_command(SessionCommand::Move { column: 3 });

        assert_eq!(
            effects,
            vec![Effect::Send(ClientMessage::Move { column: 3 })]
        );
    }

    #[test]
    fn test_move_off_turn_is_dropped() {
        let mut machine = playing_machine(Seat::Two);

        let effects =
            machine.handle_command(SessionCommand::Move { column: 3 });

        assert!(effects.is_empty());
    }

    #[test]
    fn test_move_into_full_column_is_dropped() {
        let mut machine = playing_machine(Seat::One);
        let mut game = snapshot(Seat::One);
        for row in 0..ROWS {
            game.board.0[row][3] = Cell::Player1;
        }
        machine.handle_server_message(ServerMessage::GameUpdate {
            game,
            message: None,
        });

        assert!(machine
            .handle_command(SessionCommand::Move { column: 3 })
            .is_empty());
        // A neighboring open column still works.
        assert!(!machine
            .handle_command(SessionCommand::Move { column: 2 })
            .is_empty());
    }

    #[test]
    fn test_move_out_of_range_is_dropped() {
        let mut machine = playing_machine(Seat::One);

        assert!(machine
            .handle_command(SessionCommand::Move { column: COLUMNS })
            .is_empty());
    }

    #[test]
    fn test_move_outside_playing_is_dropped() {
        let mut machine = SessionStateMachine::default();
        assert!(machine
            .handle_command(SessionCommand::Move { column: 0 })
            .is_empty());
    }

    // -- updates and game over ---------------------------------------------

    #[test]
    fn test_game_update_replaces_snapshot_wholesale() {
        let mut machine = playing_machine(Seat::One);
        let mut next = snapshot(Seat::Two);
        next.board.0[ROWS - 1][3] = Cell::Player1;

        machine.handle_server_message(ServerMessage::GameUpdate {
            game: next.clone(),
            message: None,
        });

        assert_eq!(machine.context().game(), Some(&next));
        // Turn flipped, so it is no longer ours.
        assert!(machine
            .handle_command(SessionCommand::Move { column: 0 })
            .is_empty());
    }

    #[test]
    fn test_game_update_message_becomes_info() {
        let mut machine = playing_machine(Seat::One);

        machine.handle_server_message(ServerMessage::GameUpdate {
            game: snapshot(Seat::Two),
            message: Some("Grace reconnected".to_string()),
        });

        assert_eq!(
            machine.context().info_message(),
            Some("Grace reconnected")
        );
    }

    #[test]
    fn test_game_over_finishes_with_result_notice() {
        let mut machine = playing_machine(Seat::One);
        let mut end = snapshot(Seat::One);
        end.winner = Some(end.player1.clone());

        machine.handle_server_message(ServerMessage::GameOver {
            game: end,
            message: "Ada wins!".to_string(),
        });

        assert_eq!(machine.context().phase(), SessionPhase::Finished);
        assert_eq!(machine.context().info_message(), Some("Ada wins!"));
        // No moves after the game ends.
        assert!(machine
            .handle_command(SessionCommand::Move { column: 0 })
            .is_empty());
    }

    // -- notices -----------------------------------------------------------

    #[test]
    fn test_server_error_notice_visible_within_ttl() {
        let config = SessionConfig {
            error_notice_ttl: Duration::from_secs(3600),
            ..SessionConfig::default()
        };
        let mut machine = SessionStateMachine::new(config);
        machine.handle_command(SessionCommand::Join {
            username: "Ada".to_string(),
        });

        machine.handle_server_message(ServerMessage::Error {
            message: "queue full".to_string(),
        });

        assert_eq!(machine.context().error_message(), Some("queue full"));
        // Errors never change the phase.
        assert_eq!(machine.context().phase(), SessionPhase::Waiting);
    }

    #[test]
    fn test_server_error_notice_expires() {
        let config = SessionConfig {
            error_notice_ttl: Duration::ZERO,
            ..SessionConfig::default()
        };
        let mut machine = SessionStateMachine::new(config);
        machine.handle_command(SessionCommand::Join {
            username: "Ada".to_string(),
        });

        machine.handle_server_message(ServerMessage::Error {
            message: "queue full".to_string(),
        });

        assert_eq!(machine.context().error_message(), None);
    }

    #[test]
    fn test_server_error_while_idle_is_ignored() {
        let mut machine = SessionStateMachine::default();

        machine.handle_server_message(ServerMessage::Error {
            message: "queue full".to_string(),
        });

        assert_eq!(machine.context().error_message(), None);
    }

    #[test]
    fn test_invalid_move_notice_expires() {
        let config = SessionConfig {
            invalid_move_notice_ttl: Duration::ZERO,
            ..SessionConfig::default()
        };
        let mut machine = SessionStateMachine::new(config);
        machine.handle_command(SessionCommand::Join {
            username: "Ada".to_string(),
        });
        machine.handle_server_message(ServerMessage::GameStart {
            game: snapshot(Seat::One),
            your_player_id: "p1".into(),
        });

        machine.handle_server_message(ServerMessage::InvalidMove {
            message: "Column is full".to_string(),
        });

        assert_eq!(machine.context().error_message(), None);
    }

    #[test]
    fn test_opponent_left_surfaces_info_only() {
        let mut machine = playing_machine(Seat::One);

        machine.handle_server_message(ServerMessage::OpponentLeft {
            message: "Grace disconnected".to_string(),
        });

        assert_eq!(machine.context().phase(), SessionPhase::Playing);
        assert_eq!(
            machine.context().info_message(),
            Some("Grace disconnected")
        );
    }

    // -- connection lifecycle ----------------------------------------------

    #[test]
    fn test_unexpected_close_while_playing_arms_reconnect() {
        let mut machine = playing_machine(Seat::One);

        let effects = machine.handle_closed(false);

        assert_eq!(
            machine.context().error_message(),
            Some("Connection lost. Attempting to reconnect...")
        );
        assert!(matches!(
            effects.as_slice(),
            [Effect::ArmReconnect { delay, .. }]
                if *delay == Duration::from_secs(2)
        ));
    }

    #[test]
    fn test_unexpected_close_while_waiting_does_not_arm() {
        // No game id yet, nothing to re-bind to — notice only.
        let mut machine = SessionStateMachine::default();
        machine.handle_command(SessionCommand::Join {
            username: "Ada".to_string(),
        });

        let effects = machine.handle_closed(false);

        assert!(effects.is_empty());
        assert_eq!(
            machine.context().error_message(),
            Some("Connection lost. Attempting to reconnect...")
        );
    }

    #[test]
    fn test_expected_close_is_silent() {
        let mut machine = playing_machine(Seat::One);

        assert!(machine.handle_closed(true).is_empty());
        assert_eq!(machine.context().error_message(), None);
    }

    #[test]
    fn test_reconnect_due_sends_rebind_message() {
        let mut machine = playing_machine(Seat::One);
        let effects = machine.handle_closed(false);
        let [Effect::ArmReconnect { token, .. }] = effects.as_slice() else {
            panic!("expected a single ArmReconnect effect");
        };

        let effects = machine.handle_reconnect_due(*token);

        assert_eq!(
            effects,
            vec![Effect::Connect {
                queue: ClientMessage::Reconnect {
                    username: "Ada".to_string(),
                    game_id: "g-1".into(),
                }
            }]
        );
    }

    #[test]
    fn test_single_reconnect_attempt_per_disconnection() {
        let mut machine = playing_machine(Seat::One);
        let effects = machine.handle_closed(false);
        let [Effect::ArmReconnect { token, .. }] = effects.as_slice() else {
            panic!("expected a single ArmReconnect effect");
        };
        let token = *token;
        machine.handle_reconnect_due(token);

        // The attempt itself failed: no second timer, no retry loop.
        assert!(machine.handle_closed(false).is_empty());
        assert!(machine.handle_reconnect_due(token).is_empty());
    }

    #[test]
    fn test_reconnect_cycle_resets_on_fresh_snapshot() {
        let mut machine = playing_machine(Seat::One);
        let effects = machine.handle_closed(false);
        let [Effect::ArmReconnect { token, .. }] = effects.as_slice() else {
            panic!("expected a single ArmReconnect effect");
        };
        machine.handle_reconnect_due(*token);
        machine.handle_opened();

        // The server re-binds us with a fresh game_start.
        machine.handle_server_message(ServerMessage::GameStart {
            game: snapshot(Seat::One),
            your_player_id: "p1".into(),
        });
        assert_eq!(machine.context().error_message(), None);

        // A later disconnection is a new cycle and arms again.
        let effects = machine.handle_closed(false);
        assert!(matches!(
            effects.as_slice(),
            [Effect::ArmReconnect { .. }]
        ));
    }

    #[test]
    fn test_reconnect_due_after_play_again_is_noop() {
        // The timer is still pending when the game ends over a revived
        // connection and the user hits play-again; the firing must not
        // reconnect a session that no longer exists.
        let mut machine = playing_machine(Seat::One);
        let effects = machine.handle_closed(false);
        let [Effect::ArmReconnect { token, .. }] = effects.as_slice() else {
            panic!("expected a single ArmReconnect effect");
        };
        let token = *token;
        machine.handle_server_message(ServerMessage::GameOver {
            game: snapshot(Seat::One),
            message: "Ada wins!".to_string(),
        });
        machine.handle_command(SessionCommand::PlayAgain);

        assert!(machine.handle_reconnect_due(token).is_empty());
        assert_eq!(machine.context().phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_send_failed_surfaces_not_connected() {
        let mut machine = playing_machine(Seat::One);

        assert!(machine.handle_send_failed().is_empty());
        assert_eq!(
            machine.context().error_message(),
            Some("Not connected to server")
        );

        // The next open clears it.
        machine.handle_opened();
        assert_eq!(machine.context().error_message(), None);
    }

    #[test]
    fn test_opened_clears_connection_lost_notice() {
        let mut machine = playing_machine(Seat::One);
        machine.handle_closed(false);
        assert!(machine.context().error_message().is_some());

        machine.handle_opened();

        assert_eq!(machine.context().error_message(), None);
    }

    // -- play again --------------------------------------------------------

    #[test]
    fn test_play_again_resets_to_idle_and_closes() {
        let mut machine = playing_machine(Seat::One);
        machine.handle_server_message(ServerMessage::GameOver {
            game: snapshot(Seat::One),
            message: "Ada wins!".to_string(),
        });

        let effects = machine.handle_command(SessionCommand::PlayAgain);

        assert_eq!(effects, vec![Effect::Close]);
        assert_eq!(machine.context().phase(), SessionPhase::Idle);
        assert!(machine.context().identity().is_none());
        assert!(machine.context().game().is_none());
    }

    #[test]
    fn test_play_again_mid_game_is_ignored() {
        let mut machine = playing_machine(Seat::One);

        assert!(machine
            .handle_command(SessionCommand::PlayAgain)
            .is_empty());
        assert_eq!(machine.context().phase(), SessionPhase::Playing);
    }
}
