//! The session driver: one task tying machine, transport, and timers
//! together.
//!
//! The driver owns the [`SessionStateMachine`] and the
//! [`ConnectionManager`] and is the only place their worlds meet. It
//! runs a single `select!` loop over user commands, connection events,
//! and reconnect timer firings; every iteration feeds the machine,
//! executes the effects it returns, and publishes a fresh view.
//!
//! Events from superseded connections are filtered by generation before
//! they reach the machine, so a handle abandoned mid-open can never
//! corrupt the session.

use fourline_protocol::{Codec, JsonCodec, GameSnapshot, Seat, ServerMessage};
use fourline_session::{
    Effect, ReconnectToken, SessionCommand, SessionPhase,
    SessionStateMachine,
};
use fourline_transport::{ConnectionEvent, ConnectionManager};
use tokio::sync::{mpsc, watch};

use crate::{ClientConfig, FourlineError};

// ---------------------------------------------------------------------------
// SessionView
// ---------------------------------------------------------------------------

/// A cloned, point-in-time view of the session for display.
///
/// Published on a watch channel after every transition; consumers never
/// see intermediate state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionView {
    /// Current lifecycle phase.
    pub phase: SessionPhase,
    /// The name this client joined with, if any.
    pub username: Option<String>,
    /// Latest authoritative snapshot.
    pub game: Option<GameSnapshot>,
    /// The seat this client occupies, once the game has started.
    pub your_seat: Option<Seat>,
    /// Whether a move may currently be submitted.
    pub your_turn: bool,
    /// Informational message, if any.
    pub info: Option<String>,
    /// Error notice, if present and unexpired.
    pub error: Option<String>,
}

impl SessionView {
    fn capture(machine: &SessionStateMachine) -> Self {
        let ctx = machine.context();
        Self {
            phase: ctx.phase(),
            username: ctx.identity().map(|i| i.username.clone()),
            game: ctx.game().cloned(),
            your_seat: ctx.your_seat(),
            your_turn: fourline_session::is_your_turn(
                ctx.phase(),
                ctx.game(),
                ctx.identity(),
            ),
            info: ctx.info_message().map(str::to_string),
            error: ctx.error_message().map(str::to_string),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionHandle
// ---------------------------------------------------------------------------

enum DriverCommand {
    Session(SessionCommand),
    Shutdown,
}

/// Cheap-to-clone handle for feeding user intents to the driver task.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<DriverCommand>,
}

impl SessionHandle {
    /// Joins the matchmaking queue under `username`.
    pub fn join(&self, username: impl Into<String>) -> Result<(), FourlineError> {
        self.send(SessionCommand::Join {
            username: username.into(),
        })
    }

    /// Drops a disc into `column`.
    pub fn play(&self, column: usize) -> Result<(), FourlineError> {
        self.send(SessionCommand::Move { column })
    }

    /// Leaves a finished game and returns to idle.
    pub fn play_again(&self) -> Result<(), FourlineError> {
        self.send(SessionCommand::PlayAgain)
    }

    /// Stops the driver task, closing any open connection.
    pub fn shutdown(&self) -> Result<(), FourlineError> {
        self.commands
            .send(DriverCommand::Shutdown)
            .map_err(|_| FourlineError::DriverGone)
    }

    fn send(&self, command: SessionCommand) -> Result<(), FourlineError> {
        self.commands
            .send(DriverCommand::Session(command))
            .map_err(|_| FourlineError::DriverGone)
    }
}

// ---------------------------------------------------------------------------
// SessionClient
// ---------------------------------------------------------------------------

/// Spawns the driver task and returns a handle plus a view receiver.
pub struct SessionClient;

impl SessionClient {
    /// Starts a session driver for the configured endpoint.
    pub fn spawn(
        config: ClientConfig,
    ) -> (SessionHandle, watch::Receiver<SessionView>) {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let machine = SessionStateMachine::new(config.session.clone());
        let (views_tx, views_rx) =
            watch::channel(SessionView::capture(&machine));

        tokio::spawn(drive(config, machine, commands_rx, views_tx));

        (
            SessionHandle {
                commands: commands_tx,
            },
            views_rx,
        )
    }
}

async fn drive(
    config: ClientConfig,
    mut machine: SessionStateMachine,
    mut commands: mpsc::UnboundedReceiver<DriverCommand>,
    views: watch::Sender<SessionView>,
) {
    let (mut manager, mut events) =
        ConnectionManager::new(config.ws_url.clone(), config.open_timeout);
    let codec = JsonCodec;
    // Reconnect timers report here; stale tokens are rejected by the
    // machine, so a fired timer is always safe to deliver.
    let (timers_tx, mut timers) = mpsc::unbounded_channel::<ReconnectToken>();

    loop {
        let effects = tokio::select! {
            command = commands.recv() => match command {
                Some(DriverCommand::Session(command)) => {
                    machine.handle_command(command)
                }
                Some(DriverCommand::Shutdown) | None => {
                    tracing::debug!("session driver shutting down");
                    manager.close();
                    break;
                }
            },
            Some(event) = events.recv() => {
                handle_connection_event(&mut machine, &manager, &codec, event)
            }
            Some(token) = timers.recv() => {
                machine.handle_reconnect_due(token)
            }
        };

        for effect in effects {
            match effect {
                Effect::Connect { queue } => match codec.encode(&queue) {
                    Ok(frame) => {
                        let generation = manager.open(frame);
                        tracing::debug!(%generation, "opening connection");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to encode outbound message");
                    }
                },
                Effect::Send(message) => match codec.encode(&message) {
                    Ok(frame) => {
                        if let Err(e) = manager.send(&frame) {
                            tracing::debug!(error = %e, "send dropped");
                            // Never arms new effects, only a notice.
                            let _ = machine.handle_send_failed();
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to encode outbound message");
                    }
                },
                Effect::Close => manager.close(),
                Effect::ArmReconnect { token, delay } => {
                    let timers_tx = timers_tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = timers_tx.send(token);
                    });
                }
            }
        }

        views.send_replace(SessionView::capture(&machine));
    }
}

fn handle_connection_event(
    machine: &mut SessionStateMachine,
    manager: &ConnectionManager,
    codec: &JsonCodec,
    event: ConnectionEvent,
) -> Vec<Effect> {
    // Events from a superseded handle never reach the machine.
    if !manager.is_current(event.generation()) {
        tracing::debug!(
            generation = %event.generation(),
            "event from superseded connection, dropped"
        );
        return Vec::new();
    }

    match event {
        ConnectionEvent::Opened { generation } => {
            tracing::debug!(%generation, "connection open");
            machine.handle_opened()
        }
        ConnectionEvent::Frame { data, .. } => {
            match codec.decode::<ServerMessage>(&data) {
                Ok(message) => machine.handle_server_message(message),
                Err(e) => {
                    // Bad frame: log and keep the connection alive.
                    tracing::warn!(error = %e, "undecodable frame dropped");
                    Vec::new()
                }
            }
        }
        ConnectionEvent::Closed { expected, .. } => {
            machine.handle_closed(expected)
        }
    }
}
