//! The per-connection WebSocket task, via `tokio-tungstenite`.
//!
//! One task per handle generation: connect (bounded by the open
//! timeout), send the queued frame, then pump frames in both directions
//! until either side closes. All outcomes are reported as
//! [`ConnectionEvent`]s tagged with this handle's generation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use crate::{ConnectionEvent, Generation};

/// Commands the manager sends to a connection task.
#[derive(Debug)]
pub(crate) enum Outbound {
    /// Send a frame.
    Data(Vec<u8>),
    /// Close the socket (expected close).
    Close,
}

type WsStream = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Runs one connection from dial to close.
pub(crate) async fn run_connection(
    url: String,
    generation: Generation,
    queued: Vec<u8>,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    open: Arc<AtomicBool>,
    events: mpsc::UnboundedSender<ConnectionEvent>,
    open_timeout: Duration,
) {
    let ws: WsStream = match tokio::time::timeout(
        open_timeout,
        tokio_tungstenite::connect_async(&url),
    )
    .await
    {
        Ok(Ok((ws, _response))) => ws,
        Ok(Err(e)) => {
            tracing::debug!(%generation, error = %e, "connect failed");
            let _ = events.send(ConnectionEvent::Closed {
                generation,
                expected: false,
            });
            return;
        }
        Err(_) => {
            tracing::debug!(
                %generation,
                timeout_ms = open_timeout.as_millis() as u64,
                "connect timed out"
            );
            let _ = events.send(ConnectionEvent::Closed {
                generation,
                expected: false,
            });
            return;
        }
    };

    // Superseded while connecting: the queued frame must not be sent on
    // a handle that is no longer current.
    if matches!(
        outbound.try_recv(),
        Ok(Outbound::Close) | Err(mpsc::error::TryRecvError::Disconnected)
    ) {
        tracing::debug!(%generation, "superseded before open, dropping queued frame");
        let mut ws = ws;
        let _ = ws.close(None).await;
        let _ = events.send(ConnectionEvent::Closed {
            generation,
            expected: true,
        });
        return;
    }

    let (mut sink, mut stream) = ws.split();

    open.store(true, Ordering::Release);
    let _ = events.send(ConnectionEvent::Opened { generation });
    tracing::debug!(%generation, "connection opened");

    // The queued frame goes out first, strictly after open.
    if let Err(e) = sink.send(Message::Binary(queued.into())).await {
        tracing::debug!(%generation, error = %e, "queued send failed");
        let _ = events.send(ConnectionEvent::Closed {
            generation,
            expected: false,
        });
        return;
    }

    loop {
        tokio::select! {
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Binary(data))) => {
                    let _ = events.send(ConnectionEvent::Frame {
                        generation,
                        data: data.into(),
                    });
                }
                Some(Ok(Message::Text(text))) => {
                    let _ = events.send(ConnectionEvent::Frame {
                        generation,
                        data: text.as_bytes().to_vec(),
                    });
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::debug!(%generation, "closed by remote");
                    let _ = events.send(ConnectionEvent::Closed {
                        generation,
                        expected: false,
                    });
                    return;
                }
                Some(Ok(_)) => {} // ping/pong handled by tungstenite
                Some(Err(e)) => {
                    tracing::debug!(%generation, error = %e, "socket error");
                    let _ = events.send(ConnectionEvent::Closed {
                        generation,
                        expected: false,
                    });
                    return;
                }
            },
            cmd = outbound.recv() => match cmd {
                Some(Outbound::Data(data)) => {
                    if let Err(e) =
                        sink.send(Message::Binary(data.into())).await
                    {
                        tracing::debug!(%generation, error = %e, "send failed");
                        let _ = events.send(ConnectionEvent::Closed {
                            generation,
                            expected: false,
                        });
                        return;
                    }
                }
                // Manager asked for a close, or dropped the handle.
                Some(Outbound::Close) | None => {
                    let _ = sink.close().await;
                    tracing::debug!(%generation, "closed locally");
                    let _ = events.send(ConnectionEvent::Closed {
                        generation,
                        expected: true,
                    });
                    return;
                }
            },
        }
    }
}
