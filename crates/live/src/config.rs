// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

/// Configuration for the desklive messaging core.
#[derive(Debug, Clone, clap::Args)]
pub struct LiveConfig {
    /// Base URL of the chat socket endpoint (http(s) or ws(s) scheme).
    #[arg(long, default_value = "http://127.0.0.1:8000", env = "DESK_CHAT_WS_BASE")]
    pub chat_ws_base: String,

    /// Base URL of the notification socket endpoint (http(s) or ws(s) scheme).
    #[arg(long, default_value = "http://127.0.0.1:8000", env = "DESK_NOTIFY_WS_BASE")]
    pub notify_ws_base: String,

    /// Base URL of the REST API (mark-read writes, public widget config).
    #[arg(long, default_value = "http://127.0.0.1:8000", env = "DESK_API_BASE")]
    pub api_base: String,

    /// Bearer token for authenticated endpoints. If unset, only the anonymous
    /// customer chat works.
    #[arg(long, env = "DESK_TOKEN")]
    pub token: Option<String>,

    /// Business/tenant discriminator sent with REST writes.
    #[arg(long, default_value = "default", env = "DESK_BUSINESS_ID")]
    pub business_id: String,

    /// Delay between notification reconnect attempts in milliseconds.
    #[arg(long, default_value_t = 3000, env = "DESK_NOTIFY_RECONNECT_MS")]
    pub notify_reconnect_ms: u64,
}

impl LiveConfig {
    pub fn notify_reconnect_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.notify_reconnect_ms)
    }
}
