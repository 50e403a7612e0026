// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end notification tests: socket lifecycle, reconnection bounds,
//! and the two-channel mark-read flow.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use desklive::config::LiveConfig;
use desklive::notify::transport::MAX_RECONNECT_ATTEMPTS;
use desklive::notify::{NotificationCenter, NotifyEvent, NotifyTransport};
use desklive_specs::DeskServer;
use serde_json::json;

const TIMEOUT: Duration = Duration::from_secs(5);

fn config_for(server: &DeskServer) -> LiveConfig {
    LiveConfig {
        chat_ws_base: server.base_url(),
        notify_ws_base: server.base_url(),
        api_base: server.base_url(),
        token: Some("tok".to_owned()),
        business_id: "biz-7".to_owned(),
        notify_reconnect_ms: 100, // fast reconnects for tests
    }
}

async fn next_event(center: &mut NotificationCenter) -> anyhow::Result<NotifyEvent> {
    match tokio::time::timeout(TIMEOUT, center.recv()).await {
        Ok(Some(event)) => Ok(event),
        Ok(None) => anyhow::bail!("event channel closed"),
        Err(_) => anyhow::bail!("no notification event within {TIMEOUT:?}"),
    }
}

fn note_json(id: u64, is_read: bool, created_at: &str) -> serde_json::Value {
    json!({
        "id": id,
        "is_read": is_read,
        "created_at": created_at,
        "notification_type": "ticket_update",
    })
}

// -- Transport lifecycle ------------------------------------------------------

#[tokio::test]
async fn open_pulls_snapshot_and_connect_is_idempotent() -> anyhow::Result<()> {
    let mut server = DeskServer::start().await?;
    let (mut transport, _events) =
        NotifyTransport::new(&server.base_url(), Duration::from_millis(100));

    transport.connect(Some("tok"));
    let mut conn = server.next_conn(TIMEOUT).await?;
    assert_eq!(conn.path, "/notifications/");
    assert_eq!(conn.query, "token=tok");

    // A fresh snapshot is requested on every fresh connection.
    assert_eq!(conn.recv(TIMEOUT).await?, json!({"type": "get_notifications"}));

    // Second connect while open must not open a second socket.
    let deadline = tokio::time::Instant::now() + TIMEOUT;
    while !transport.is_connected() {
        anyhow::ensure!(tokio::time::Instant::now() < deadline, "never connected");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    transport.connect(Some("tok"));
    server.expect_no_conn(Duration::from_millis(300)).await?;
    Ok(())
}

#[tokio::test]
async fn connect_without_token_is_a_noop() -> anyhow::Result<()> {
    let mut server = DeskServer::start().await?;
    let (mut transport, _events) =
        NotifyTransport::new(&server.base_url(), Duration::from_millis(100));

    transport.connect(None);
    assert!(!transport.is_connected());
    server.expect_no_conn(Duration::from_millis(300)).await?;
    Ok(())
}

#[tokio::test]
async fn reconnects_after_server_close() -> anyhow::Result<()> {
    let mut server = DeskServer::start().await?;
    let (mut transport, _events) =
        NotifyTransport::new(&server.base_url(), Duration::from_millis(100));

    transport.connect(Some("tok"));
    let mut first = server.next_conn(TIMEOUT).await?;
    assert_eq!(first.recv(TIMEOUT).await?, json!({"type": "get_notifications"}));

    // Server-side disconnect: the transport retries after the fixed delay
    // and pulls a fresh snapshot again.
    drop(first);
    let mut second = server.next_conn(TIMEOUT).await?;
    assert_eq!(second.recv(TIMEOUT).await?, json!({"type": "get_notifications"}));
    Ok(())
}

#[tokio::test]
async fn reconnection_is_bounded() -> anyhow::Result<()> {
    // A listener that accepts and immediately drops every connection, so
    // each attempt fails during the WebSocket handshake.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let accepted = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&accepted);
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            drop(stream);
        }
    });

    let (mut transport, _events) =
        NotifyTransport::new(&format!("http://{addr}"), Duration::from_millis(50));
    transport.connect(Some("tok"));

    // Initial attempt plus the bounded reconnects.
    let expected = 1 + MAX_RECONNECT_ATTEMPTS;
    let deadline = tokio::time::Instant::now() + TIMEOUT;
    while accepted.load(Ordering::SeqCst) < expected {
        anyhow::ensure!(
            tokio::time::Instant::now() < deadline,
            "only {} attempts observed",
            accepted.load(Ordering::SeqCst)
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    // After exhaustion no further attempt is ever scheduled.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(accepted.load(Ordering::SeqCst), expected);
    Ok(())
}

// -- Reconciliation and the two-channel mark-read flow ------------------------

#[tokio::test]
async fn counter_frame_then_snapshot_then_mark_read() -> anyhow::Result<()> {
    let mut server = DeskServer::start().await?;
    let mut center = NotificationCenter::new(&config_for(&server));
    center.connect();

    let mut conn = server.next_conn(TIMEOUT).await?;
    assert_eq!(conn.recv(TIMEOUT).await?, json!({"type": "get_notifications"}));

    // Before any snapshot, the pushed counter is authoritative. (The first
    // event on the channel is `Open`, so loop up to the counter frame.)
    conn.send(json!({"type": "unread_count_update", "count": 3}));
    while !matches!(next_event(&mut center).await?, NotifyEvent::UnreadCount(_)) {}
    assert_eq!(center.feed.unread_count(), 3);

    // Snapshot with 2 unread + 1 read recomputes the counter from the list.
    conn.send(json!({"type": "notifications_list", "notifications": [
        note_json(1, false, "2026-08-01T10:00:00Z"),
        note_json(2, false, "2026-08-01T09:00:00Z"),
        note_json(3, true, "2026-08-01T08:00:00Z"),
    ]}));
    while !matches!(next_event(&mut center).await?, NotifyEvent::Snapshot(_)) {}
    assert_eq!(center.feed.unread_count(), 2);

    // Counter frames after a snapshot are ignored.
    conn.send(json!({"type": "unread_count_update", "count": 99}));
    assert_eq!(next_event(&mut center).await?, NotifyEvent::UnreadCount(99));
    assert_eq!(center.feed.unread_count(), 2);

    // Mark-read: optimistic flip, HTTP write on the REST channel, resync
    // request back on the socket.
    center.mark_one_as_read(1).await;
    assert_eq!(center.feed.unread_count(), 1);

    let call = tokio::time::timeout(TIMEOUT, server.rest_calls.recv())
        .await?
        .ok_or_else(|| anyhow::anyhow!("rest channel closed"))?;
    assert_eq!(call.method, "PATCH");
    assert_eq!(call.path, "/api/v1/notifications/1/read");
    assert_eq!(call.auth.as_deref(), Some("Bearer tok"));
    assert_eq!(call.business.as_deref(), Some("biz-7"));

    assert_eq!(conn.recv(TIMEOUT).await?, json!({"type": "get_notifications"}));
    Ok(())
}

#[tokio::test]
async fn mark_all_read_uses_bulk_endpoint_and_resyncs() -> anyhow::Result<()> {
    let mut server = DeskServer::start().await?;
    let mut center = NotificationCenter::new(&config_for(&server));
    center.connect();

    let mut conn = server.next_conn(TIMEOUT).await?;
    assert_eq!(conn.recv(TIMEOUT).await?, json!({"type": "get_notifications"}));

    conn.send(json!({"type": "notifications_list", "notifications": [
        note_json(1, false, "2026-08-01T10:00:00Z"),
        note_json(2, false, "2026-08-01T09:00:00Z"),
    ]}));
    while !matches!(next_event(&mut center).await?, NotifyEvent::Snapshot(_)) {}
    assert_eq!(center.feed.unread_count(), 2);

    center.mark_all_as_read().await;
    assert_eq!(center.feed.unread_count(), 0);

    let call = tokio::time::timeout(TIMEOUT, server.rest_calls.recv())
        .await?
        .ok_or_else(|| anyhow::anyhow!("rest channel closed"))?;
    assert_eq!(call.method, "POST");
    assert_eq!(call.path, "/api/v1/notifications/mark-all-read");

    assert_eq!(conn.recv(TIMEOUT).await?, json!({"type": "get_notifications"}));
    Ok(())
}

#[tokio::test]
async fn push_deduplicates_against_snapshot() -> anyhow::Result<()> {
    let mut server = DeskServer::start().await?;
    let mut center = NotificationCenter::new(&config_for(&server));
    center.connect();

    let conn = server.next_conn(TIMEOUT).await?;
    conn.send(json!({"type": "notifications_list", "notifications": [
        note_json(1, false, "2026-08-01T10:00:00Z"),
        note_json(2, false, "2026-08-01T09:00:00Z"),
    ]}));
    while !matches!(next_event(&mut center).await?, NotifyEvent::Snapshot(_)) {}

    // A push for an id already in the list moves it to the front, no dup.
    conn.send(json!({"type": "new_notification", "notification":
        note_json(2, false, "2026-08-01T09:00:00Z")}));
    while !matches!(next_event(&mut center).await?, NotifyEvent::Push(_)) {}

    let ids: Vec<u64> = center.feed.items().map(|n| n.id).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(center.feed.unread_count(), 2);
    Ok(())
}
