// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Instagram publishing over the Graph API.
//!
//! Instagram publishes in two phases: a media container is created first,
//! then published once the backend has ingested the image.
//! [`InstagramChannel`] drives both phases and retrieves post insights.

use std::time::Duration;

use async_trait::async_trait;
use dripflow_config::model::InstagramConfig;
use dripflow_core::{ChannelClient, DripflowError, OutboundContent, Platform, PostId, PostMetrics};
use serde::Deserialize;
use tracing::debug;

/// Base URL for the Instagram Graph API.
const GRAPH_BASE_URL: &str = "https://graph.facebook.com/v18.0";

/// Pause between container creation and publish, giving the backend time
/// to ingest the image.
const SETTLE_DELAY: Duration = Duration::from_secs(5);

/// Channel client that publishes to an Instagram business account.
#[derive(Debug, Clone)]
pub struct InstagramChannel {
    client: reqwest::Client,
    access_token: String,
    account_id: String,
    base_url: String,
    settle_delay: Duration,
}

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct InsightsResponse {
    data: Vec<InsightEntry>,
}

#[derive(Debug, Deserialize)]
struct InsightEntry {
    name: String,
    values: Vec<InsightValue>,
}

#[derive(Debug, Deserialize)]
struct InsightValue {
    value: i64,
}

impl InstagramChannel {
    /// Create a client from configuration.
    ///
    /// Fails when the access token or account id is missing, so a
    /// misconfigured channel is rejected at startup.
    pub fn new(config: &InstagramConfig) -> Result<Self, DripflowError> {
        let access_token = config
            .access_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                DripflowError::Config("instagram.access_token is not set".to_string())
            })?
            .to_string();
        let account_id = config
            .account_id
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(|| {
                DripflowError::Config("instagram.account_id is not set".to_string())
            })?
            .to_string();

        Ok(Self {
            client: reqwest::Client::new(),
            access_token,
            account_id,
            base_url: GRAPH_BASE_URL.to_string(),
            settle_delay: SETTLE_DELAY,
        })
    }

    /// Override the API base URL (for tests against a mock server).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Shorten the container settle delay (for tests).
    #[cfg(test)]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        action: &str,
    ) -> Result<String, DripflowError> {
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| DripflowError::Channel {
                message: format!("instagram {action} request failed"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(DripflowError::Channel {
                message: format!("instagram {action} returned {status}: {body}"),
                source: None,
            });
        }

        let parsed: IdResponse =
            serde_json::from_str(&body).map_err(|e| DripflowError::Channel {
                message: format!("instagram {action} returned unparseable body: {body}"),
                source: Some(Box::new(e)),
            })?;
        Ok(parsed.id)
    }
}

#[async_trait]
impl ChannelClient for InstagramChannel {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    fn name(&self) -> &str {
        "instagram"
    }

    async fn publish(&self, content: &OutboundContent) -> Result<PostId, DripflowError> {
        let (text, media) = match content {
            OutboundContent::Social { text, media } => (text.as_str(), media.as_deref()),
            OutboundContent::Email { .. } => {
                return Err(DripflowError::Channel {
                    message: "instagram channel cannot deliver email content".to_string(),
                    source: None,
                });
            }
        };

        // Instagram has no text-only post type; a missing image is a local
        // error, not an API round trip.
        let image_url = media.ok_or_else(|| DripflowError::Channel {
            message: "instagram posts require an image url".to_string(),
            source: None,
        })?;

        let container_endpoint = format!("{}/{}/media", self.base_url, self.account_id);
        let container_id = self
            .post_form(
                &container_endpoint,
                &[
                    ("image_url", image_url),
                    ("caption", text),
                    ("access_token", &self.access_token),
                ],
                "container creation",
            )
            .await?;
        debug!(container_id = %container_id, "instagram media container created");

        tokio::time::sleep(self.settle_delay).await;

        let publish_endpoint = format!("{}/{}/media_publish", self.base_url, self.account_id);
        let post_id = self
            .post_form(
                &publish_endpoint,
                &[
                    ("creation_id", &container_id),
                    ("access_token", &self.access_token),
                ],
                "publish",
            )
            .await?;
        debug!(post_id = %post_id, "instagram publish succeeded");
        Ok(PostId(post_id))
    }

    async fn fetch_metrics(&self, post_id: &str) -> Result<PostMetrics, DripflowError> {
        let endpoint = format!("{}/{}/insights", self.base_url, post_id);
        let response = self
            .client
            .get(&endpoint)
            .query(&[
                ("metric", "engagement,impressions,reach,saved"),
                ("access_token", &self.access_token),
            ])
            .send()
            .await
            .map_err(|e| DripflowError::Channel {
                message: "instagram insights request failed".to_string(),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(DripflowError::Channel {
                message: format!("instagram insights returned {status}: {body}"),
                source: None,
            });
        }

        let parsed: InsightsResponse =
            serde_json::from_str(&body).map_err(|e| DripflowError::Channel {
                message: format!("instagram insights returned unparseable body: {body}"),
                source: Some(Box::new(e)),
            })?;

        let mut metrics = PostMetrics::new();
        for entry in parsed.data {
            if let Some(first) = entry.values.first() {
                metrics.insert(entry.name, first.value);
            }
        }
        Ok(metrics)
    }
}
