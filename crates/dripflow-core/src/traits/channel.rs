// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel client trait for external publishing destinations.

use async_trait::async_trait;

use crate::error::DripflowError;
use crate::types::{OutboundContent, Platform, PostId, PostMetrics};

/// A publishing capability against one external channel.
///
/// A client owns its own preconditions: content of the wrong family, or
/// content missing something the channel requires (Instagram's media
/// reference), is rejected locally without touching the network.
#[async_trait]
pub trait ChannelClient: Send + Sync + 'static {
    /// The platform this client publishes to.
    fn platform(&self) -> Platform;

    /// Human-readable adapter name for logs.
    fn name(&self) -> &str;

    /// Attempts to publish the content, returning the channel's identifier.
    ///
    /// Any error means nothing was durably published as far as the caller
    /// can tell; callers must not mutate quota or record state on `Err`.
    async fn publish(&self, content: &OutboundContent) -> Result<PostId, DripflowError>;

    /// Fetches engagement metrics for a previously published post.
    async fn fetch_metrics(&self, post_id: &str) -> Result<PostMetrics, DripflowError>;
}
