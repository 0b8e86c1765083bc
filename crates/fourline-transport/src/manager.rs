//! The connection manager: owns the single live connection handle.
//!
//! # Concurrency note
//!
//! `ConnectionManager` is not shared between tasks — it is owned by the
//! single event-processing loop. The actual socket I/O runs in a
//! background task per connection (spawned by [`ConnectionManager::open`]);
//! the two sides communicate only through channels, so there is no shared
//! mutable state and no locking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::websocket::{run_connection, Outbound};
use crate::{Generation, TransportError};

/// A lifecycle event from a connection handle.
///
/// Every variant carries the generation of the handle that produced it.
/// Consumers must drop events whose generation is no longer current
/// (see [`ConnectionManager::is_current`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// The transport finished opening; the queued frame has been sent.
    Opened {
        /// The handle that opened.
        generation: Generation,
    },

    /// An inbound frame arrived.
    Frame {
        /// The handle that received it.
        generation: Generation,
        /// The raw frame bytes (text frames are delivered as their
        /// UTF-8 bytes).
        data: Vec<u8>,
    },

    /// The connection is gone.
    Closed {
        /// The handle that closed.
        generation: Generation,
        /// `true` when this side asked for the close (explicit
        /// [`close`](ConnectionManager::close) or the handle being
        /// superseded); `false` for connect failures, open timeouts,
        /// remote closes, and socket errors.
        expected: bool,
    },
}

impl ConnectionEvent {
    /// The generation of the handle this event belongs to.
    pub fn generation(&self) -> Generation {
        match self {
            Self::Opened { generation }
            | Self::Frame { generation, .. }
            | Self::Closed { generation, .. } => *generation,
        }
    }
}

/// The manager's record of the live connection task.
struct ActiveHandle {
    generation: Generation,
    outbound: mpsc::UnboundedSender<Outbound>,
    /// Set by the connection task once the transport has opened.
    /// Until then, `send` reports [`TransportError::NotOpen`].
    open: Arc<AtomicBool>,
}

/// Owns at most one live transport connection.
///
/// ## Lifecycle
///
/// ```text
/// open(queued) ──→ [connecting] ──→ Opened ──→ Frame* ──→ Closed
///      │                │
///      │                └─ timeout / refused ──→ Closed { expected: false }
///      │
///      └─ retires the previous handle (Closed { expected: true })
/// ```
///
/// `open` establishes the connection asynchronously and sends `queued`
/// exactly when the transport opens — never before, and never if the
/// handle is superseded first. The open wait is bounded by the
/// `open_timeout` passed to [`new`](Self::new).
pub struct ConnectionManager {
    url: String,
    open_timeout: Duration,
    next_generation: u64,
    current: Option<ActiveHandle>,
    events: mpsc::UnboundedSender<ConnectionEvent>,
}

impl ConnectionManager {
    /// Creates a manager for the given endpoint and returns the event
    /// channel its connections will report on.
    pub fn new(
        url: impl Into<String>,
        open_timeout: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<ConnectionEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let manager = Self {
            url: url.into(),
            open_timeout,
            next_generation: 0,
            current: None,
            events: events_tx,
        };
        (manager, events_rx)
    }

    /// Opens a new connection, retiring any previous handle, and queues
    /// `frame` to be sent the moment the transport opens.
    ///
    /// Returns the new handle's generation. The result of the open
    /// arrives on the event channel: `Opened` on success, or
    /// `Closed { expected: false }` on failure or timeout.
    pub fn open(&mut self, frame: Vec<u8>) -> Generation {
        self.retire_current();

        self.next_generation += 1;
        let generation = Generation::new(self.next_generation);
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let open = Arc::new(AtomicBool::new(false));

        self.current = Some(ActiveHandle {
            generation,
            outbound: outbound_tx,
            open: Arc::clone(&open),
        });

        tracing::debug!(%generation, url = %self.url, "opening connection");
        tokio::spawn(run_connection(
            self.url.clone(),
            generation,
            frame,
            outbound_rx,
            open,
            self.events.clone(),
            self.open_timeout,
        ));

        generation
    }

    /// Sends a frame over the current connection.
    ///
    /// # Errors
    /// Returns [`TransportError::NotOpen`] if there is no live handle or
    /// the handle has not finished opening — a send never silently
    /// succeeds against a dead socket.
    pub fn send(&self, frame: &[u8]) -> Result<(), TransportError> {
        let handle =
            self.current.as_ref().ok_or(TransportError::NotOpen)?;
        if !handle.open.load(Ordering::Acquire) {
            return Err(TransportError::NotOpen);
        }
        handle
            .outbound
            .send(Outbound::Data(frame.to_vec()))
            .map_err(|_| TransportError::NotOpen)
    }

    /// Closes the current connection, if any. The handle reports
    /// `Closed { expected: true }` once the socket is down.
    pub fn close(&mut self) {
        self.retire_current();
    }

    /// Returns `true` if `generation` names the current handle.
    ///
    /// Events failing this check come from a retired handle and must be
    /// dropped.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.current
            .as_ref()
            .is_some_and(|h| h.generation == generation)
    }

    /// The generation of the current handle, if one is live.
    pub fn generation(&self) -> Option<Generation> {
        self.current.as_ref().map(|h| h.generation)
    }

    fn retire_current(&mut self) {
        if let Some(handle) = self.current.take() {
            tracing::debug!(
                generation = %handle.generation,
                "retiring connection handle"
            );
            // The task treats this as an expected close. If the task is
            // already gone the send fails, which is fine — a Closed
            // event for that generation is already on the channel.
            let _ = handle.outbound.send(Outbound::Close);
        }
    }
}
