// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time-windowed social publishing.
//!
//! One scheduler tick walks the post table in order and dispatches every
//! pending post whose scheduled time falls within five minutes of now to
//! the matching channel client. Rows that fail stay pending and are
//! retried only while still inside the window.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tracing::{error, info, warn};

use dripflow_core::{
    sheet_row, ActivityRecorder, ChannelClient, DripflowError, Outcome, OutboundContent, Platform,
    PostStatus, RecordStore, ScheduledPost,
};

use crate::quota::QuotaSet;

/// Schedule format in the post table: date and time in separate columns.
const SCHEDULE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Half-width of the dispatch window, either side of the scheduled time.
const DUE_WINDOW_SECS: i64 = 300;

/// Pause between successive insight fetches in the metrics pass.
const METRICS_DELAY: Duration = Duration::from_secs(1);

/// Publishes scheduled posts through their platform clients.
pub struct PostScheduler {
    store: Arc<dyn RecordStore>,
    clients: HashMap<Platform, Arc<dyn ChannelClient>>,
    activity: Arc<dyn ActivityRecorder>,
    quotas: QuotaSet,
    dispatch_delay: Duration,
    metrics_delay: Duration,
}

impl PostScheduler {
    pub fn new(
        store: Arc<dyn RecordStore>,
        activity: Arc<dyn ActivityRecorder>,
        dispatch_delay: Duration,
    ) -> Self {
        Self {
            store,
            clients: HashMap::new(),
            activity,
            quotas: QuotaSet::new(),
            dispatch_delay,
            metrics_delay: METRICS_DELAY,
        }
    }

    /// Shorten the metrics pause (for tests).
    #[cfg(test)]
    pub fn with_metrics_delay(mut self, delay: Duration) -> Self {
        self.metrics_delay = delay;
        self
    }

    /// Register a channel client with its daily publish limit.
    pub fn register(&mut self, client: Arc<dyn ChannelClient>, daily_limit: u32) {
        self.quotas.insert(client.platform(), daily_limit);
        self.clients.insert(client.platform(), client);
    }

    pub fn quotas(&self) -> &QuotaSet {
        &self.quotas
    }

    /// Start a fresh day on every platform.
    pub fn reset_quotas(&mut self) {
        self.quotas.reset_all();
    }

    /// Run one scheduling tick at the current local time.
    pub async fn run(&mut self) {
        self.run_at(Local::now().naive_local()).await;
    }

    async fn run_at(&mut self, now: NaiveDateTime) {
        let posts = self.store.list_posts().await;
        info!(post_count = posts.len(), "starting social tick");

        for (index, post) in posts.iter().enumerate() {
            if post.status == PostStatus::Posted {
                continue;
            }
            if !is_due(post, now) {
                continue;
            }

            let (platform, client) = match self.resolve_client(&post.platform) {
                Ok(resolved) => resolved,
                Err(err) => {
                    error!(row = sheet_row(index), error = %err, "cannot dispatch post");
                    continue;
                }
            };
            match self.quotas.get(platform) {
                Some(quota) if quota.allow() => {}
                _ => {
                    warn!(%platform, row = sheet_row(index), "daily quota exhausted, skipping post");
                    continue;
                }
            }

            self.dispatch(index, post, platform, client).await;
            tokio::time::sleep(self.dispatch_delay).await;
        }
    }

    /// Case-insensitive platform resolution against the registered clients.
    fn resolve_client(
        &self,
        raw: &str,
    ) -> Result<(Platform, Arc<dyn ChannelClient>), DripflowError> {
        let platform = Platform::from_str(raw.trim()).map_err(|_| {
            DripflowError::UnsupportedPlatform {
                platform: raw.trim().to_string(),
            }
        })?;
        let client = self.clients.get(&platform).cloned().ok_or_else(|| {
            DripflowError::UnsupportedPlatform {
                platform: platform.to_string(),
            }
        })?;
        Ok((platform, client))
    }

    async fn dispatch(
        &mut self,
        index: usize,
        post: &ScheduledPost,
        platform: Platform,
        client: Arc<dyn ChannelClient>,
    ) {
        let content = OutboundContent::Social {
            text: published_text(post),
            media: post.media_ref().map(str::to_string),
        };
        let row = sheet_row(index);

        match client.publish(&content).await {
            Ok(post_id) => {
                if let Some(quota) = self.quotas.get_mut(platform) {
                    quota.record_success();
                }
                // The store gets the canonical platform name, not the raw cell.
                if !self
                    .store
                    .mark_post_sent(row, &platform.to_string(), Some(&post_id.0))
                    .await
                {
                    // Published but the row failed to record it; the post
                    // will look pending again next tick.
                    error!(row, %platform, "published post but failed to update row");
                }
                let details = format!("{platform} post row {row} published as {}", post_id.0);
                self.activity
                    .record(platform, Outcome::Success, &details)
                    .await;
                info!(row, %platform, post_id = %post_id.0, "post published");
            }
            Err(err) => {
                let details = format!("{platform} post row {row} failed: {err}");
                self.activity
                    .record(platform, Outcome::Failed, &details)
                    .await;
                warn!(row, %platform, error = %err, "post publish failed");
            }
        }
    }

    /// Fetch and log insight metrics for every published post.
    ///
    /// Purely observational: failures are logged and skipped per item and
    /// nothing in the post table changes.
    pub async fn collect_metrics(&self) {
        let posts = self.store.list_posts().await;
        for (index, post) in posts.iter().enumerate() {
            if post.status != PostStatus::Posted || post.post_id.trim().is_empty() {
                continue;
            }
            let Ok((platform, client)) = self.resolve_client(&post.platform) else {
                continue;
            };
            match client.fetch_metrics(post.post_id.trim()).await {
                Ok(metrics) => {
                    info!(
                        row = sheet_row(index),
                        %platform,
                        post_id = %post.post_id,
                        ?metrics,
                        "post metrics"
                    );
                }
                Err(err) => {
                    warn!(
                        row = sheet_row(index),
                        %platform,
                        post_id = %post.post_id,
                        error = %err,
                        "metrics fetch failed"
                    );
                }
            }
            tokio::time::sleep(self.metrics_delay).await;
        }
    }
}

/// Whether the post's scheduled time is within the dispatch window of now.
///
/// Boundary inclusive; an unparseable date or time is never due.
fn is_due(post: &ScheduledPost, now: NaiveDateTime) -> bool {
    let stamp = format!("{} {}", post.date.trim(), post.time.trim());
    match NaiveDateTime::parse_from_str(&stamp, SCHEDULE_FORMAT) {
        Ok(scheduled) => {
            let offset = now.signed_duration_since(scheduled).num_seconds().abs();
            offset <= DUE_WINDOW_SECS
        }
        Err(_) => false,
    }
}

/// Caption text as published: body plus hashtags, blank-line separated.
fn published_text(post: &ScheduledPost) -> String {
    format!("{}\n\n{}", post.text, post.hashtags)
        .trim()
        .to_string()
}
