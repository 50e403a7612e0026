// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification wire frames and the notification data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Denormalized reference to the ticket or task a notification points at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItemRef {
    pub id: u64,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: String,
}

/// A server-assigned notification. `id` is the deduplication key across all
/// inbound sources; `is_read` is the only field mutated client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub notification_type: String,
    /// At most one of `ticket`/`task` is populated per notification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<WorkItemRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<WorkItemRef>,
}

/// Events emitted by the notification transport into its dispatch channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyEvent {
    /// The socket opened (fresh snapshot already requested).
    Open,
    /// The socket closed. Not emitted on deliberate teardown.
    Closed,
    /// Incremental push of a single notification.
    Push(Notification),
    /// Raw unread counter, authoritative only before the first snapshot.
    UnreadCount(u64),
    /// Full list replacement.
    Snapshot(Vec<Notification>),
    /// Unread-only list replacement.
    UnreadSnapshot(Vec<Notification>),
}

/// Parse one inbound notification frame.
///
/// The server uses a couple of aliases (`notification_message` for
/// `new_notification`, `unread_count` for `unread_count_update`) and puts a
/// push payload under either `notification` or `data`. Unknown frame types
/// are logged and ignored for forward compatibility.
pub fn parse_frame(text: &str) -> Option<NotifyEvent> {
    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(err = %e, "dropping malformed notification frame");
            return None;
        }
    };

    let frame_type = value.get("type").and_then(|t| t.as_str()).unwrap_or("");
    match frame_type {
        "connection_established" => {
            let greeting = value.get("message").and_then(|m| m.as_str()).unwrap_or("");
            tracing::debug!(greeting, "notification socket acknowledged");
            None
        }
        "new_notification" | "notification_message" => {
            let payload = value.get("notification").or_else(|| value.get("data"))?.clone();
            match serde_json::from_value(payload) {
                Ok(notification) => Some(NotifyEvent::Push(notification)),
                Err(e) => {
                    tracing::debug!(err = %e, "dropping unparseable notification push");
                    None
                }
            }
        }
        "unread_count_update" | "unread_count" => {
            let count = value.get("count").and_then(|c| c.as_u64())?;
            Some(NotifyEvent::UnreadCount(count))
        }
        "notifications_list" => parse_list(&value).map(NotifyEvent::Snapshot),
        "unread_notifications_list" => parse_list(&value).map(NotifyEvent::UnreadSnapshot),
        other => {
            tracing::debug!(frame_type = other, "ignoring unknown notification frame");
            None
        }
    }
}

fn parse_list(value: &serde_json::Value) -> Option<Vec<Notification>> {
    let list = value.get("notifications")?.clone();
    match serde_json::from_value(list) {
        Ok(notifications) => Some(notifications),
        Err(e) => {
            tracing::debug!(err = %e, "dropping unparseable notification list");
            None
        }
    }
}

/// Serialize the client→server snapshot request.
pub fn get_notifications_frame() -> String {
    serde_json::json!({ "type": "get_notifications" }).to_string()
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
