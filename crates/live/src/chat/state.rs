// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chat protocol state: a pure reducer over transport events, plus the
//! session glue that binds the reducer to a live transport.

use tokio::sync::mpsc;

use crate::chat::frame::{ChatFrame, ChatMessage, ContactInfo, ContactRequest, Role};
use crate::chat::transport::{ChatEvent, ChatMode, ChatTransport};

/// UI-consumable protocol state, derived exclusively from transport events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatState {
    /// Ordered, append-only transcript. Never mutated or truncated.
    pub transcript: Vec<ChatMessage>,
    /// Whether the assistant is currently typing. Last write wins.
    pub typing: bool,
    /// Whether the socket is open.
    pub connected: bool,
    /// Generic transport-error string. The taxonomy is deliberately coarse:
    /// errored or not.
    pub error: Option<String>,
    /// The active contact gate, if the remote side demanded identity fields.
    pub contact_request: Option<ContactRequest>,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one transport event. Frame ordering follows socket delivery
    /// order, so a `contact_request` arriving after `typing: true` correctly
    /// clears the typing flag.
    pub fn apply(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::Open => {
                self.connected = true;
            }
            ChatEvent::Closed => {
                self.connected = false;
            }
            ChatEvent::Errored => {
                self.connected = false;
                self.error = Some("chat connection error".to_owned());
            }
            ChatEvent::Frame(ChatFrame::Typing { status }) => {
                self.typing = status;
            }
            ChatEvent::Frame(ChatFrame::ContactRequest(request)) => {
                // A contact request supersedes any active one and implicitly
                // ends the "assistant is typing" indication.
                self.contact_request = Some(request);
                self.typing = false;
            }
            ChatEvent::Frame(ChatFrame::Message { role, content }) => {
                self.transcript.push(ChatMessage { role, content });
            }
        }
    }
}

/// A live chat session: one transport, one reducer, one event channel.
pub struct ChatSession {
    transport: ChatTransport,
    events: mpsc::UnboundedReceiver<ChatEvent>,
    pub state: ChatState,
}

impl ChatSession {
    pub fn new(chat_ws_base: &str) -> Self {
        let (transport, events) = ChatTransport::new(chat_ws_base);
        Self { transport, events, state: ChatState::new() }
    }

    /// Open (or re-open with a different mode/token) the chat socket.
    pub fn connect(&mut self, mode: ChatMode, token: Option<&str>) {
        self.transport.connect(mode, token);
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Send a free-text message and append it to the transcript
    /// optimistically — no acknowledgement is awaited or required.
    pub fn send_message(&mut self, text: &str) {
        self.transport.send(text);
        self.state.transcript.push(ChatMessage { role: Role::User, content: text.to_owned() });
    }

    /// Submit contact info through the regular message path and release the
    /// contact gate immediately, without waiting for server confirmation.
    ///
    /// If the server rejects the submission its next frame is a new
    /// `contact_request` with `invalid` populated, which re-arms the gate.
    pub fn send_contact_info(&mut self, info: &ContactInfo) {
        self.send_message(&info.summary());
        self.state.contact_request = None;
    }

    /// Wait for the next transport event and fold it into the state.
    /// Returns `None` once the transport is gone and the channel is drained.
    pub async fn recv(&mut self) -> Option<ChatEvent> {
        let event = self.events.recv().await?;
        self.state.apply(event.clone());
        Some(event)
    }

    /// Drain all pending events without blocking.
    pub fn pump(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.state.apply(event);
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
