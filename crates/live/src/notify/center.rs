// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification center: one transport, one reconciler, one write channel.
//!
//! Mark-as-read is a two-channel operation: the feed mutates optimistically,
//! the HTTP write goes out, and on success a fresh snapshot is requested over
//! the socket to correct any drift. A failed write is logged and left alone —
//! the next snapshot is the rollback.

use tokio::sync::mpsc;

use crate::config::LiveConfig;
use crate::notify::api::NotifyApi;
use crate::notify::feed::NotificationFeed;
use crate::notify::frame::NotifyEvent;
use crate::notify::transport::NotifyTransport;

pub struct NotificationCenter {
    transport: NotifyTransport,
    events: mpsc::UnboundedReceiver<NotifyEvent>,
    api: NotifyApi,
    token: Option<String>,
    pub feed: NotificationFeed,
}

impl NotificationCenter {
    pub fn new(config: &LiveConfig) -> Self {
        let (transport, events) =
            NotifyTransport::new(&config.notify_ws_base, config.notify_reconnect_delay());
        let api = NotifyApi::new(
            &config.api_base,
            config.token.as_deref().unwrap_or_default(),
            &config.business_id,
        );
        Self { transport, events, api, token: config.token.clone(), feed: NotificationFeed::new() }
    }

    /// Open the notification socket (no-op without a configured token).
    pub fn connect(&mut self) {
        self.transport.connect(self.token.as_deref());
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Wait for the next transport event and fold it into the feed.
    pub async fn recv(&mut self) -> Option<NotifyEvent> {
        let event = self.events.recv().await?;
        self.feed.apply(event.clone());
        Some(event)
    }

    /// Drain all pending events without blocking.
    pub fn pump(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.feed.apply(event);
        }
    }

    /// Mark one notification read: optimistic flip first, then the HTTP
    /// write, then a corrective snapshot request on success.
    pub async fn mark_one_as_read(&mut self, id: u64) {
        self.feed.mark_one_read(id);
        match self.api.mark_one_read(id).await {
            Ok(()) => self.transport.request_notifications(),
            Err(e) => {
                tracing::warn!(id, err = %e, "mark-one-read failed, keeping optimistic state");
            }
        }
    }

    /// Mark everything read, same optimistic-then-resync shape.
    pub async fn mark_all_as_read(&mut self) {
        self.feed.mark_all_read();
        match self.api.mark_all_read().await {
            Ok(()) => self.transport.request_notifications(),
            Err(e) => {
                tracing::warn!(err = %e, "mark-all-read failed, keeping optimistic state");
            }
        }
    }
}
