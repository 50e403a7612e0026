// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket URL helpers shared by both transports.

/// Rewrite an HTTP base URL to its WebSocket equivalent.
///
/// Bases already using `ws://`/`wss://` pass through unchanged, so config
/// values may use either scheme. Trailing slashes are trimmed so path
/// segments can be appended uniformly.
pub fn to_ws_base(base_url: &str) -> String {
    let ws_base = if base_url.starts_with("https://") {
        base_url.replacen("https://", "wss://", 1)
    } else if base_url.starts_with("http://") {
        base_url.replacen("http://", "ws://", 1)
    } else {
        base_url.to_owned()
    };
    ws_base.trim_end_matches('/').to_owned()
}

/// Percent-encode a query parameter value.
pub fn urlencode(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => c.to_string(),
            _ => format!("%{:02X}", c as u8),
        })
        .collect()
}

#[cfg(test)]
#[path = "url_tests.rs"]
mod tests;
