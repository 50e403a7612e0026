// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chat socket transport: exactly one socket to a mode-specific endpoint.
//!
//! No automatic reconnection — when the socket drops, the owner decides
//! whether to call [`ChatTransport::connect`] again. Re-connecting (for a
//! mode or token change) tears down the previous socket first, so a widget
//! instance never holds two live chat sockets.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::chat::frame::{self, ChatFrame};
use crate::url::{to_ws_base, urlencode};

/// Connection mode: anonymous visitor or authenticated staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    Customer,
    Staff,
}

impl ChatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events emitted by the transport into its single dispatch channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// The socket opened.
    Open,
    /// A parsed inbound frame.
    Frame(ChatFrame),
    /// The socket errored (connect failure or mid-session error).
    Errored,
    /// The socket closed. Not emitted on deliberate teardown.
    Closed,
}

/// One live socket, owned by the transport's reader task.
struct ActiveSocket {
    cancel: CancellationToken,
    connected: Arc<AtomicBool>,
    outbound: mpsc::UnboundedSender<String>,
}

/// Chat socket transport handle.
///
/// Create once per widget session, connect, and drop to dispose — dropping
/// cancels the socket task and closes the socket.
pub struct ChatTransport {
    ws_base: String,
    event_tx: mpsc::UnboundedSender<ChatEvent>,
    active: Option<ActiveSocket>,
}

impl ChatTransport {
    /// Create an idle transport and the receiving end of its event channel.
    pub fn new(chat_ws_base: &str) -> (Self, mpsc::UnboundedReceiver<ChatEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let transport = Self { ws_base: to_ws_base(chat_ws_base), event_tx, active: None };
        (transport, event_rx)
    }

    /// Open the socket for the given mode.
    ///
    /// Any previously opened socket is torn down first: one transport, one
    /// socket. The token query parameter is attached only for staff mode.
    pub fn connect(&mut self, mode: ChatMode, token: Option<&str>) {
        if let Some(prev) = self.active.take() {
            prev.cancel.cancel();
        }

        let url = build_chat_url(&self.ws_base, mode, token);
        let cancel = CancellationToken::new();
        let connected = Arc::new(AtomicBool::new(false));
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        spawn_socket_task(
            url,
            cancel.clone(),
            Arc::clone(&connected),
            outbound_rx,
            self.event_tx.clone(),
        );

        self.active = Some(ActiveSocket { cancel, connected, outbound: outbound_tx });
    }

    /// Whether the socket is currently open.
    pub fn is_connected(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.connected.load(Ordering::Relaxed))
    }

    /// Send a chat message. Silently dropped unless the socket is open —
    /// the transport never buffers or retries; the optimistic transcript
    /// append is the caller's job.
    pub fn send(&self, content: &str) {
        let Some(active) = self.active.as_ref() else {
            tracing::debug!("chat send dropped, transport not connected");
            return;
        };
        if !active.connected.load(Ordering::Relaxed) {
            tracing::debug!("chat send dropped, socket not open");
            return;
        }
        let _ = active.outbound.send(frame::message_frame(content));
    }
}

impl Drop for ChatTransport {
    fn drop(&mut self) {
        if let Some(ref active) = self.active {
            active.cancel.cancel();
        }
    }
}

/// Spawn the task that owns the socket for its whole lifetime.
///
/// Terminal events (`Errored`/`Closed`) are suppressed when the task was
/// cancelled: deliberate teardown is not a failure the reducer should see.
fn spawn_socket_task(
    url: String,
    cancel: CancellationToken,
    connected: Arc<AtomicBool>,
    mut outbound_rx: mpsc::UnboundedReceiver<String>,
    event_tx: mpsc::UnboundedSender<ChatEvent>,
) {
    tokio::spawn(async move {
        let ws_stream = tokio::select! {
            _ = cancel.cancelled() => return,
            result = tokio_tungstenite::connect_async(url.as_str()) => match result {
                Ok((ws_stream, _)) => ws_stream,
                Err(e) => {
                    tracing::debug!(err = %e, "chat socket connect failed");
                    let _ = event_tx.send(ChatEvent::Errored);
                    return;
                }
            },
        };

        connected.store(true, Ordering::Relaxed);
        let _ = event_tx.send(ChatEvent::Open);
        tracing::debug!("chat socket connected");

        let (mut write, mut read) = ws_stream.split();
        let mut errored = false;

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
                                errored = true;
                                break;
                            }
                        }
                        None => break, // transport handle dropped
                    }
                }

                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            if let Some(frame) = frame::parse_frame(text.as_str()) {
                                let _ = event_tx.send(ChatEvent::Frame(frame));
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Err(e)) => {
                            tracing::debug!(err = %e, "chat socket error");
                            errored = true;
                            break;
                        }
                        _ => {} // ping/pong/binary ignored
                    }
                }
            }
        }

        connected.store(false, Ordering::Relaxed);
        if !cancel.is_cancelled() {
            if errored {
                let _ = event_tx.send(ChatEvent::Errored);
            }
            let _ = event_tx.send(ChatEvent::Closed);
        }
    });
}

/// Build the chat socket URL: `<base>/chat/<mode>/`, with a token query
/// parameter only for staff connections.
fn build_chat_url(ws_base: &str, mode: ChatMode, token: Option<&str>) -> String {
    let mut url = format!("{ws_base}/chat/{mode}/");
    if mode == ChatMode::Staff {
        if let Some(token) = token {
            url.push_str(&format!("?token={}", urlencode(token)));
        }
    }
    url
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
