// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Facebook Page publishing over the Graph API.
//!
//! Provides [`FacebookChannel`] which posts text and photo updates to a
//! configured Page and retrieves post-level insight metrics.

use async_trait::async_trait;
use dripflow_config::model::FacebookConfig;
use dripflow_core::{ChannelClient, DripflowError, OutboundContent, Platform, PostId, PostMetrics};
use serde::Deserialize;
use tracing::debug;

/// Base URL for the Facebook Graph API.
const GRAPH_BASE_URL: &str = "https://graph.facebook.com/v18.0";

/// Channel client that publishes to a Facebook Page.
#[derive(Debug, Clone)]
pub struct FacebookChannel {
    client: reqwest::Client,
    access_token: String,
    page_id: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PublishResponse {
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

impl FacebookChannel {
    /// Create a client from configuration.
    ///
    /// Fails when the access token or Page id is missing, so a
    /// misconfigured channel is rejected at startup rather than at the
    /// first publish.
    pub fn new(config: &FacebookConfig) -> Result<Self, DripflowError> {
        let access_token = config
            .access_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                DripflowError::Config("facebook.access_token is not set".to_string())
            })?
            .to_string();
        let page_id = config
            .page_id
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| DripflowError::Config("facebook.page_id is not set".to_string()))?
            .to_string();

        Ok(Self {
            client: reqwest::Client::new(),
            access_token,
            page_id,
            base_url: GRAPH_BASE_URL.to_string(),
        })
    }

    /// Override the API base URL (for tests against a mock server).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        action: &str,
    ) -> Result<PostId, DripflowError> {
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| DripflowError::Channel {
                message: format!("facebook {action} request failed"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(DripflowError::Channel {
                message: format!("facebook {action} returned {status}: {body}"),
                source: None,
            });
        }

        let parsed: PublishResponse =
            serde_json::from_str(&body).map_err(|e| DripflowError::Channel {
                message: format!("facebook {action} returned unparseable body: {body}"),
                source: Some(Box::new(e)),
            })?;
        debug!(post_id = %parsed.id, "facebook {action} succeeded");
        Ok(PostId(parsed.id))
    }
}

#[async_trait]
impl ChannelClient for FacebookChannel {
    fn platform(&self) -> Platform {
        Platform::Facebook
    }

    fn name(&self) -> &str {
        "facebook"
    }

    async fn publish(&self, content: &OutboundContent) -> Result<PostId, DripflowError> {
        let (text, media) = match content {
            OutboundContent::Social { text, media } => (text.as_str(), media.as_deref()),
            OutboundContent::Email { .. } => {
                return Err(DripflowError::Channel {
                    message: "facebook channel cannot deliver email content".to_string(),
                    source: None,
                });
            }
        };

        // Photo posts and plain feed posts use different Graph endpoints.
        match media {
            Some(url) => {
                let endpoint = format!("{}/{}/photos", self.base_url, self.page_id);
                self.post_form(
                    &endpoint,
                    &[
                        ("url", url),
                        ("caption", text),
                        ("access_token", &self.access_token),
                    ],
                    "photo publish",
                )
                .await
            }
            None => {
                let endpoint = format!("{}/{}/feed", self.base_url, self.page_id);
                self.post_form(
                    &endpoint,
                    &[("message", text), ("access_token", &self.access_token)],
                    "feed publish",
                )
                .await
            }
        }
    }

    async fn fetch_metrics(&self, post_id: &str) -> Result<PostMetrics, DripflowError> {
        let endpoint = format!("{}/{}/insights", self.base_url, post_id);
        let response = self
            .client
            .get(&endpoint)
            .query(&[
                ("metric", "post_impressions,post_engaged_users"),
                ("access_token", &self.access_token),
            ])
            .send()
            .await
            .map_err(|e| DripflowError::Channel {
                message: "facebook insights request failed".to_string(),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(DripflowError::Channel {
                message: format!("facebook insights returned {status}: {body}"),
                source: None,
            });
        }

        let parsed: InsightsResponse =
            serde_json::from_str(&body).map_err(|e| DripflowError::Channel {
                message: format!("facebook insights returned unparseable body: {body}"),
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

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> FacebookConfig {
        FacebookConfig {
            access_token: Some("fb-token".to_string()),
            page_id: Some("page123".to_string()),
            ..FacebookConfig::default()
        }
    }

    fn test_channel(base_url: &str) -> FacebookChannel {
        FacebookChannel::new(&test_config())
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    #[test]
    fn new_requires_access_token() {
        let config = FacebookConfig {
            page_id: Some("page123".to_string()),
            ..FacebookConfig::default()
        };
        assert!(FacebookChannel::new(&config).is_err());
    }

    #[test]
    fn new_requires_page_id() {
        let config = FacebookConfig {
            access_token: Some("fb-token".to_string()),
            ..FacebookConfig::default()
        };
        assert!(FacebookChannel::new(&config).is_err());
    }

    #[tokio::test]
    async fn text_post_hits_feed_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/page123/feed"))
            .and(body_string_contains("message=Launch+day"))
            .and(body_string_contains("access_token=fb-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "id": "page123_9001" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let channel = test_channel(&server.uri());
        let content = OutboundContent::Social {
            text: "Launch day".to_string(),
            media: None,
        };
        let id = channel.publish(&content).await.unwrap();
        assert_eq!(id.0, "page123_9001");
    }

    #[tokio::test]
    async fn media_post_hits_photos_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/page123/photos"))
            .and(body_string_contains("caption=New+product"))
            .and(body_string_contains(
                "url=https%3A%2F%2Fcdn.example.com%2Fshot.png",
            ))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "id": "page123_9002" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let channel = test_channel(&server.uri());
        let content = OutboundContent::Social {
            text: "New product".to_string(),
            media: Some("https://cdn.example.com/shot.png".to_string()),
        };
        let id = channel.publish(&content).await.unwrap();
        assert_eq!(id.0, "page123_9002");
    }

    #[tokio::test]
    async fn api_error_surfaces_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/page123/feed"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "message": "Invalid OAuth access token" }
            })))
            .mount(&server)
            .await;

        let channel = test_channel(&server.uri());
        let content = OutboundContent::Social {
            text: "hello".to_string(),
            media: None,
        };
        let err = channel.publish(&content).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("400"), "got: {msg}");
        assert!(msg.contains("Invalid OAuth access token"), "got: {msg}");
    }

    #[tokio::test]
    async fn email_content_is_rejected_without_network_call() {
        let server = MockServer::start().await;
        let channel = test_channel(&server.uri());
        let content = OutboundContent::Email {
            to: "lead@example.com".to_string(),
            subject: "hi".to_string(),
            html_body: "<p>hi</p>".to_string(),
        };
        assert!(channel.publish(&content).await.is_err());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetch_metrics_parses_insight_entries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page123_9001/insights"))
            .and(query_param("metric", "post_impressions,post_engaged_users"))
            .and(query_param("access_token", "fb-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    { "name": "post_impressions", "values": [ { "value": 120 } ] },
                    { "name": "post_engaged_users", "values": [ { "value": 14 } ] }
                ]
            })))
            .mount(&server)
            .await;

        let channel = test_channel(&server.uri());
        let metrics = channel.fetch_metrics("page123_9001").await.unwrap();
        assert_eq!(metrics.get("post_impressions"), Some(&120));
        assert_eq!(metrics.get("post_engaged_users"), Some(&14));
    }

    #[tokio::test]
    async fn fetch_metrics_propagates_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing/insights"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": { "message": "Unsupported get request" }
            })))
            .mount(&server)
            .await;

        let channel = test_channel(&server.uri());
        assert!(channel.fetch_metrics("missing").await.is_err());
    }
}
