// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Public widget configuration, fetched once at widget mount.

use serde::{Deserialize, Serialize};

/// Chat widget settings served by the unauthenticated public-config endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetSettings {
    /// Greeting shown before a chat session starts.
    #[serde(default)]
    pub greeting_message: String,
    /// Whether the widget should render at all.
    #[serde(default)]
    pub is_enabled: bool,
    /// Assistant tone hint (free-form).
    #[serde(default)]
    pub tone: String,
}

/// `GET /api/v1/widget/config` — fetch the public widget settings.
pub async fn fetch_widget_settings(api_base: &str) -> anyhow::Result<WidgetSettings> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .unwrap_or_default();
    let url = format!("{}/api/v1/widget/config", api_base.trim_end_matches('/'));
    let resp = client.get(url).send().await?;
    let settings = resp.error_for_status()?.json().await?;
    Ok(settings)
}
