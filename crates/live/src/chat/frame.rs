// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chat wire frames and the transcript data model.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Who produced a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Parse a role string from a frame. Anything unrecognized (or absent)
    /// is attributed to the assistant.
    pub fn from_frame(s: Option<&str>) -> Self {
        match s {
            Some("user") => Self::User,
            Some("system") => Self::System,
            _ => Self::Assistant,
        }
    }
}

/// One entry in the append-only chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// The remote side's demand for visitor identity fields.
///
/// While a request is active the UI soft-blocks free-text input; the gate is
/// released optimistically when contact info is submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    /// Required identity fields, drawn from `name`/`email`/`phone`.
    #[serde(default)]
    pub fields: Vec<String>,
    /// Field → validation error, populated after a rejected submission.
    #[serde(default)]
    pub invalid: HashMap<String, String>,
}

/// Visitor identity values gathered by the contact-capture form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactInfo {
    /// Build the synthetic chat message that carries contact details to the
    /// remote side. Only populated fields appear, in name/email/phone order.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(name) = populated(&self.name) {
            parts.push(format!("Name: {name}"));
        }
        if let Some(email) = populated(&self.email) {
            parts.push(format!("Email: {email}"));
        }
        if let Some(phone) = populated(&self.phone) {
            parts.push(format!("Phone: {phone}"));
        }
        format!("Here are my contact details. {}", parts.join(", "))
    }
}

fn populated(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// A parsed server→client chat frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatFrame {
    /// The assistant started or stopped typing.
    Typing { status: bool },
    /// The remote side demands contact info before the chat can proceed.
    ContactRequest(ContactRequest),
    /// A chat message to append to the transcript.
    Message { role: Role, content: String },
}

/// Parse one inbound chat frame.
///
/// Malformed JSON and unknown frame types are swallowed (debug-logged only).
/// `message` frames without content are dropped at this layer so the reducer
/// never sees them.
pub fn parse_frame(text: &str) -> Option<ChatFrame> {
    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(err = %e, "dropping malformed chat frame");
            return None;
        }
    };

    let frame_type = value.get("type").and_then(|t| t.as_str()).unwrap_or("");
    match frame_type {
        "typing" => {
            let status = value.get("status").and_then(|s| s.as_bool()).unwrap_or(false);
            Some(ChatFrame::Typing { status })
        }
        "contact_request" => {
            let fields = value
                .get("fields")
                .and_then(|f| f.as_array())
                .map(|arr| arr.iter().filter_map(|v| v.as_str().map(String::from)).collect())
                .unwrap_or_default();
            let invalid = value
                .get("invalid")
                .cloned()
                .and_then(|v| serde_json::from_value(v).ok())
                .unwrap_or_default();
            Some(ChatFrame::ContactRequest(ContactRequest { fields, invalid }))
        }
        "message" => {
            let content = value.get("content").and_then(|c| c.as_str()).unwrap_or("");
            if content.is_empty() {
                return None;
            }
            let role = Role::from_frame(value.get("role").and_then(|r| r.as_str()));
            Some(ChatFrame::Message { role, content: content.to_owned() })
        }
        other => {
            tracing::debug!(frame_type = other, "ignoring unknown chat frame");
            None
        }
    }
}

/// Serialize the client→server message frame.
pub fn message_frame(content: &str) -> String {
    serde_json::json!({ "type": "message", "content": content }).to_string()
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
