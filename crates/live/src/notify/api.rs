// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP write channel for notifications. The socket is read-mostly; all
//! mark-as-read writes go through REST with bearer auth and the tenant
//! discriminator header.

use reqwest::Client;

/// Tenant discriminator header sent with every write.
pub const BUSINESS_HEADER: &str = "X-Business-Id";

/// REST client for notification writes.
pub struct NotifyApi {
    base_url: String,
    token: String,
    business_id: String,
    client: Client,
}

impl NotifyApi {
    pub fn new(api_base: &str, token: &str, business_id: &str) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            base_url: api_base.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
            business_id: business_id.to_owned(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /api/v1/notifications/mark-all-read` — bulk mark-as-read.
    pub async fn mark_all_read(&self) -> anyhow::Result<()> {
        let resp = self
            .client
            .post(self.url("/api/v1/notifications/mark-all-read"))
            .bearer_auth(&self.token)
            .header(BUSINESS_HEADER, &self.business_id)
            .send()
            .await?;
        resp.error_for_status()?;
        Ok(())
    }

    /// `PATCH /api/v1/notifications/{id}/read` — mark one notification read.
    pub async fn mark_one_read(&self, id: u64) -> anyhow::Result<()> {
        let resp = self
            .client
            .patch(self.url(&format!("/api/v1/notifications/{id}/read")))
            .bearer_auth(&self.token)
            .header(BUSINESS_HEADER, &self.business_id)
            .send()
            .await?;
        resp.error_for_status()?;
        Ok(())
    }
}
