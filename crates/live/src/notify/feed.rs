// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification reconciler: one deduplicated, displayable list and a
//! consistent unread counter, derived from inbound sources that are not
//! guaranteed to agree with each other.
//!
//! Storage is an `IndexMap` keyed by notification id — map keying IS the
//! dedup invariant, insertion order IS the storage order (newest first).

use indexmap::IndexMap;

use crate::notify::frame::{Notification, NotifyEvent};

/// Reconciled notification state.
#[derive(Debug, Default)]
pub struct NotificationFeed {
    items: IndexMap<u64, Notification>,
    unread: u64,
    snapshot_seen: bool,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one transport event.
    pub fn apply(&mut self, event: NotifyEvent) {
        match event {
            NotifyEvent::Open | NotifyEvent::Closed => {}
            NotifyEvent::Push(notification) => self.push(notification),
            NotifyEvent::UnreadCount(count) => {
                // The raw counter frame is only authoritative before any
                // snapshot has arrived (the gap between connection-open and
                // first snapshot). After that, the list is the truth.
                if !self.snapshot_seen {
                    self.unread = count;
                }
            }
            NotifyEvent::Snapshot(list) | NotifyEvent::UnreadSnapshot(list) => {
                self.replace(list);
            }
        }
    }

    /// Prepend a pushed notification. A duplicate id keeps the pushed
    /// occurrence and drops the stored one.
    fn push(&mut self, notification: Notification) {
        self.items.shift_remove(&notification.id);
        self.items.shift_insert(0, notification.id, notification);
        if self.snapshot_seen {
            self.recompute_unread();
        }
    }

    /// Replace the list wholesale. From the first snapshot on, the unread
    /// counter is derived exclusively from `is_read` flags.
    fn replace(&mut self, list: Vec<Notification>) {
        self.items = list.into_iter().map(|n| (n.id, n)).collect();
        self.snapshot_seen = true;
        self.recompute_unread();
    }

    fn recompute_unread(&mut self) {
        self.unread = self.items.values().filter(|n| !n.is_read).count() as u64;
    }

    /// Optimistically mark one notification read: flip the flag and
    /// decrement the counter (floor zero) before any HTTP round-trip. A
    /// failed HTTP call is never rolled back; the next snapshot corrects.
    pub fn mark_one_read(&mut self, id: u64) {
        if let Some(notification) = self.items.get_mut(&id) {
            if !notification.is_read {
                notification.is_read = true;
                self.unread = self.unread.saturating_sub(1);
            }
        }
    }

    /// Optimistically mark everything read and zero the counter.
    pub fn mark_all_read(&mut self) {
        for notification in self.items.values_mut() {
            notification.is_read = true;
        }
        self.unread = 0;
    }

    pub fn unread_count(&self) -> u64 {
        self.unread
    }

    pub fn snapshot_seen(&self) -> bool {
        self.snapshot_seen
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stored notifications in storage order.
    pub fn items(&self) -> impl Iterator<Item = &Notification> {
        self.items.values()
    }

    /// Render-time ordering over a bounded prefix of the stored list:
    /// unread first, then `created_at` descending within each group. The
    /// storage order is untouched.
    pub fn display(&self, limit: usize) -> Vec<&Notification> {
        let mut shown: Vec<&Notification> = self.items.values().take(limit).collect();
        shown.sort_by(|a, b| {
            a.is_read.cmp(&b.is_read).then_with(|| b.created_at.cmp(&a.created_at))
        });
        shown
    }
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
