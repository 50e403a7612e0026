// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live-chat stack: socket transport, protocol reducer, contact capture.

pub mod contact;
pub mod frame;
pub mod state;
pub mod transport;
pub mod widget;

pub use contact::{CapturePhase, ContactCapture};
pub use frame::{ChatFrame, ChatMessage, ContactInfo, ContactRequest, Role};
pub use state::{ChatSession, ChatState};
pub use transport::{ChatEvent, ChatMode, ChatTransport};
