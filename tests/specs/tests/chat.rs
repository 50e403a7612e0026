// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end chat tests against an in-process WebSocket server.

use std::time::Duration;

use desklive::chat::{ChatEvent, ChatMessage, ChatMode, ChatSession, Role};
use desklive_specs::DeskServer;
use serde_json::json;

const TIMEOUT: Duration = Duration::from_secs(5);

async fn next_event(session: &mut ChatSession) -> anyhow::Result<ChatEvent> {
    match tokio::time::timeout(TIMEOUT, session.recv()).await {
        Ok(Some(event)) => Ok(event),
        Ok(None) => anyhow::bail!("event channel closed"),
        Err(_) => anyhow::bail!("no chat event within {TIMEOUT:?}"),
    }
}

#[tokio::test]
async fn round_trip_builds_transcript() -> anyhow::Result<()> {
    let mut server = DeskServer::start().await?;
    let mut session = ChatSession::new(&server.base_url());
    session.connect(ChatMode::Customer, None);

    let mut conn = server.next_conn(TIMEOUT).await?;
    assert_eq!(conn.path, "/chat/customer/");
    assert_eq!(next_event(&mut session).await?, ChatEvent::Open);

    session.send_message("password reset");
    let sent = conn.recv(TIMEOUT).await?;
    assert_eq!(sent, json!({"type": "message", "content": "password reset"}));

    conn.send(json!({
        "type": "message",
        "role": "assistant",
        "content": "Try resetting from Settings."
    }));
    while session.state.transcript.len() < 2 {
        next_event(&mut session).await?;
    }

    assert_eq!(
        session.state.transcript,
        vec![
            ChatMessage { role: Role::User, content: "password reset".to_owned() },
            ChatMessage {
                role: Role::Assistant,
                content: "Try resetting from Settings.".to_owned()
            },
        ]
    );
    Ok(())
}

#[tokio::test]
async fn contact_request_clears_live_typing_indicator() -> anyhow::Result<()> {
    let mut server = DeskServer::start().await?;
    let mut session = ChatSession::new(&server.base_url());
    session.connect(ChatMode::Customer, None);

    let conn = server.next_conn(TIMEOUT).await?;
    assert_eq!(next_event(&mut session).await?, ChatEvent::Open);

    conn.send(json!({"type": "typing", "status": true}));
    conn.send(json!({"type": "contact_request", "fields": ["name", "email"]}));

    while session.state.contact_request.is_none() {
        next_event(&mut session).await?;
    }

    assert!(!session.state.typing);
    let request = session.state.contact_request.clone().unwrap();
    assert_eq!(request.fields, vec!["name", "email"]);
    Ok(())
}

#[tokio::test]
async fn mode_switch_tears_down_previous_socket() -> anyhow::Result<()> {
    let mut server = DeskServer::start().await?;
    let mut session = ChatSession::new(&server.base_url());

    session.connect(ChatMode::Customer, Some("tok"));
    let mut customer_conn = server.next_conn(TIMEOUT).await?;
    assert_eq!(customer_conn.path, "/chat/customer/");
    // Customer connections never carry the token.
    assert_eq!(customer_conn.query, "");

    session.connect(ChatMode::Staff, Some("tok"));
    customer_conn.wait_closed(TIMEOUT).await?;

    let staff_conn = server.next_conn(TIMEOUT).await?;
    assert_eq!(staff_conn.path, "/chat/staff/");
    assert_eq!(staff_conn.query, "token=tok");
    Ok(())
}

#[tokio::test]
async fn connect_failure_surfaces_generic_error() -> anyhow::Result<()> {
    // Nothing is listening on this port.
    let mut session = ChatSession::new("http://127.0.0.1:9");
    session.connect(ChatMode::Customer, None);

    assert_eq!(next_event(&mut session).await?, ChatEvent::Errored);
    assert_eq!(session.state.error.as_deref(), Some("chat connection error"));
    assert!(!session.state.connected);
    Ok(())
}

#[tokio::test]
async fn malformed_frames_are_swallowed_silently() -> anyhow::Result<()> {
    let mut server = DeskServer::start().await?;
    let mut session = ChatSession::new(&server.base_url());
    session.connect(ChatMode::Customer, None);

    let conn = server.next_conn(TIMEOUT).await?;
    assert_eq!(next_event(&mut session).await?, ChatEvent::Open);

    let _ = conn.to_client.send("{not json".to_owned());
    conn.send(json!({"type": "message", "content": "still alive"}));

    while session.state.transcript.is_empty() {
        next_event(&mut session).await?;
    }
    assert!(session.state.error.is_none());
    assert_eq!(session.state.transcript[0].content, "still alive");
    Ok(())
}
