// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification socket transport with bounded reconnection.
//!
//! One authenticated socket, read-mostly: snapshots and pushes come in over
//! it, and the only outbound frame is the `get_notifications` snapshot
//! request. Writes (mark-as-read) travel over HTTP in [`crate::notify::api`].
//!
//! On any close the transport reconnects after a fixed delay, up to
//! [`MAX_RECONNECT_ATTEMPTS`] consecutive failures; after that it stops
//! silently and recovery requires an external trigger. The attempt counter
//! resets on every successful open.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::notify::frame::{self, NotifyEvent};
use crate::url::{to_ws_base, urlencode};

/// Consecutive reconnect attempts before giving up.
pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;

struct ActiveLoop {
    cancel: CancellationToken,
    connected: Arc<AtomicBool>,
    outbound: mpsc::UnboundedSender<String>,
}

/// Notification socket transport handle.
pub struct NotifyTransport {
    ws_base: String,
    reconnect_delay: Duration,
    event_tx: mpsc::UnboundedSender<NotifyEvent>,
    active: Option<ActiveLoop>,
}

impl NotifyTransport {
    /// Create an idle transport and the receiving end of its event channel.
    pub fn new(
        notify_ws_base: &str,
        reconnect_delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<NotifyEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let transport = Self {
            ws_base: to_ws_base(notify_ws_base),
            reconnect_delay,
            event_tx,
            active: None,
        };
        (transport, event_rx)
    }

    /// Open the socket. No-op without a token, and idempotent against
    /// duplicate calls while the current connection is open.
    pub fn connect(&mut self, token: Option<&str>) {
        let Some(token) = token else {
            tracing::debug!("notification connect skipped, no token");
            return;
        };
        if self.is_connected() {
            tracing::debug!("notification socket already open, ignoring connect");
            return;
        }
        if let Some(prev) = self.active.take() {
            prev.cancel.cancel();
        }

        let url = format!("{}/notifications/?token={}", self.ws_base, urlencode(token));
        let cancel = CancellationToken::new();
        let connected = Arc::new(AtomicBool::new(false));
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        spawn_connection_loop(
            url,
            self.reconnect_delay,
            cancel.clone(),
            Arc::clone(&connected),
            outbound_rx,
            self.event_tx.clone(),
        );

        self.active = Some(ActiveLoop { cancel, connected, outbound: outbound_tx });
    }

    /// Whether the socket is currently open.
    pub fn is_connected(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.connected.load(Ordering::Relaxed))
    }

    /// Ask the server for a fresh snapshot. No-op unless the socket is open;
    /// requests are never queued.
    pub fn request_notifications(&self) {
        let Some(active) = self.active.as_ref() else {
            tracing::debug!("cannot request notifications, not connected");
            return;
        };
        if !active.connected.load(Ordering::Relaxed) {
            tracing::debug!("cannot request notifications, not connected");
            return;
        }
        let _ = active.outbound.send(frame::get_notifications_frame());
    }
}

impl Drop for NotifyTransport {
    fn drop(&mut self) {
        // Cancels any pending reconnect sleep along with the socket itself,
        // so no reconnect loop outlives its owner.
        if let Some(ref active) = self.active {
            active.cancel.cancel();
        }
    }
}

/// Spawn the connect/read/reconnect loop that owns the socket.
fn spawn_connection_loop(
    url: String,
    reconnect_delay: Duration,
    cancel: CancellationToken,
    connected: Arc<AtomicBool>,
    mut outbound_rx: mpsc::UnboundedReceiver<String>,
    event_tx: mpsc::UnboundedSender<NotifyEvent>,
) {
    tokio::spawn(async move {
        let mut attempts = 0u32;

        loop {
            if cancel.is_cancelled() {
                break;
            }

            match tokio_tungstenite::connect_async(url.as_str()).await {
                Ok((ws_stream, _)) => {
                    attempts = 0; // reset on successful open
                    connected.store(true, Ordering::Relaxed);
                    let _ = event_tx.send(NotifyEvent::Open);
                    tracing::debug!("notification socket connected");

                    let (mut write, mut read) = ws_stream.split();

                    // Pull a fresh snapshot on every fresh connection rather
                    // than relying solely on server-initiated pushes.
                    let request = Message::Text(frame::get_notifications_frame().into());
                    if write.send(request).await.is_ok() {
                        run_session(
                            &cancel,
                            &mut write,
                            &mut read,
                            &mut outbound_rx,
                            &event_tx,
                        )
                        .await;
                    }

                    connected.store(false, Ordering::Relaxed);
                    if cancel.is_cancelled() {
                        break;
                    }
                    let _ = event_tx.send(NotifyEvent::Closed);
                }
                Err(e) => {
                    tracing::debug!(err = %e, attempts, "notification socket connect failed");
                }
            }

            if attempts >= MAX_RECONNECT_ATTEMPTS {
                tracing::debug!(attempts, "notification reconnects exhausted, giving up");
                break;
            }
            attempts += 1;

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(reconnect_delay) => {}
            }
        }
    });
}

type WsWrite = futures_util::stream::SplitSink<
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
    Message,
>;
type WsRead = futures_util::stream::SplitStream<
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
>;

/// Run one open session until the socket closes or the owner cancels.
async fn run_session(
    cancel: &CancellationToken,
    write: &mut WsWrite,
    read: &mut WsRead,
    outbound_rx: &mut mpsc::UnboundedReceiver<String>,
    event_tx: &mpsc::UnboundedSender<NotifyEvent>,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = write.send(Message::Close(None)).await;
                break;
            }

            out = outbound_rx.recv() => {
                match out {
                    Some(text) => {
                        if write.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break, // transport handle dropped
                }
            }

            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(event) = frame::parse_frame(text.as_str()) {
                            let _ = event_tx.send(event);
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(err = %e, "notification socket error");
                        break;
                    }
                    _ => {} // ping/pong/binary ignored
                }
            }
        }
    }
}
