// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Desklive: real-time messaging core for the support desk.
//!
//! Two parallel transport+protocol stacks over one shared idiom:
//!
//! - [`chat`] — the live-chat socket used by the AI support widget, plus the
//!   protocol state layered on top of it (transcript, typing indicator,
//!   contact-capture negotiation). No automatic reconnection; the owner
//!   recreates the transport on mode/token changes.
//! - [`notify`] — the authenticated notification socket with its bounded
//!   reconnection policy, and the reconciler that merges pushes, snapshots,
//!   and unread counters into one deduplicated view. Mark-as-read writes go
//!   out over HTTP, not the socket.
//!
//! Both transports emit typed events into a single dispatch point so the
//! protocol reducers stay pure and testable without a live socket.

pub mod chat;
pub mod config;
pub mod notify;
pub mod url;
