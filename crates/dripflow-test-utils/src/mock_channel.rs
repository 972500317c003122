// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel client for deterministic testing.
//!
//! `MockChannel` implements `ChannelClient` with scripted publish outcomes
//! and captured outbound content for assertion in tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use dripflow_core::{
    ChannelClient, DripflowError, OutboundContent, Platform, PostId, PostMetrics,
};

/// A mock publishing channel for testing.
///
/// Every `publish()` call captures its content. By default publishes
/// succeed with a generated id; `script_failure()` queues errors that are
/// consumed first, in order.
pub struct MockChannel {
    platform: Platform,
    published: Arc<Mutex<Vec<OutboundContent>>>,
    scripted_failures: Arc<Mutex<VecDeque<String>>>,
    scripted_metrics_failures: Arc<Mutex<VecDeque<String>>>,
    metrics: Arc<Mutex<PostMetrics>>,
    metrics_fetched: Arc<Mutex<Vec<String>>>,
}

impl MockChannel {
    /// Create a mock channel reporting the given platform.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            published: Arc::new(Mutex::new(Vec::new())),
            scripted_failures: Arc::new(Mutex::new(VecDeque::new())),
            scripted_metrics_failures: Arc::new(Mutex::new(VecDeque::new())),
            metrics: Arc::new(Mutex::new(PostMetrics::new())),
            metrics_fetched: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a failure for the next publish attempt.
    pub async fn script_failure(&self, message: &str) {
        self.scripted_failures
            .lock()
            .await
            .push_back(message.to_string());
    }

    /// Queue a failure for the next metrics fetch.
    pub async fn script_metrics_failure(&self, message: &str) {
        self.scripted_metrics_failures
            .lock()
            .await
            .push_back(message.to_string());
    }

    /// Set the metrics returned by `fetch_metrics()`.
    pub async fn set_metrics(&self, metrics: PostMetrics) {
        *self.metrics.lock().await = metrics;
    }

    /// Post ids passed to `fetch_metrics()`, including failed fetches.
    pub async fn metrics_fetched(&self) -> Vec<String> {
        self.metrics_fetched.lock().await.clone()
    }

    /// Get all content passed to `publish()`, including failed attempts.
    pub async fn published(&self) -> Vec<OutboundContent> {
        self.published.lock().await.clone()
    }

    /// Get the count of publish attempts.
    pub async fn publish_count(&self) -> usize {
        self.published.lock().await.len()
    }
}

#[async_trait]
impl ChannelClient for MockChannel {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn name(&self) -> &str {
        "mock-channel"
    }

    async fn publish(&self, content: &OutboundContent) -> Result<PostId, DripflowError> {
        self.published.lock().await.push(content.clone());
        if let Some(message) = self.scripted_failures.lock().await.pop_front() {
            return Err(DripflowError::Channel {
                message,
                source: None,
            });
        }
        Ok(PostId(format!("mock-post-{}", uuid::Uuid::new_v4())))
    }

    async fn fetch_metrics(&self, post_id: &str) -> Result<PostMetrics, DripflowError> {
        self.metrics_fetched.lock().await.push(post_id.to_string());
        if let Some(message) = self.scripted_metrics_failures.lock().await.pop_front() {
            return Err(DripflowError::Channel {
                message,
                source: None,
            });
        }
        Ok(self.metrics.lock().await.clone())
    }
}
