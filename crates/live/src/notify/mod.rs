// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification stack: authenticated socket with bounded reconnection, the
//! reconciler that merges pushes/snapshots/counters, and the HTTP write
//! channel for mark-as-read.

pub mod api;
pub mod center;
pub mod feed;
pub mod frame;
pub mod transport;

pub use api::NotifyApi;
pub use center::NotificationCenter;
pub use feed::NotificationFeed;
pub use frame::{Notification, NotifyEvent, WorkItemRef};
pub use transport::NotifyTransport;
