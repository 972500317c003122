// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the channel, store, and activity traits.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The external identifier a channel assigns to a published post or message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostId(pub String);

/// Metric-name-to-value map returned by a channel's insights endpoint.
///
/// `BTreeMap` keeps log output in a stable order.
pub type PostMetrics = BTreeMap<String, i64>;

/// A publishing destination.
///
/// Parsing is case-insensitive so raw spreadsheet cells like `"facebook"`
/// resolve to the right variant. `LinkedIn` is declared but has no client.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Platform {
    Email,
    Facebook,
    Instagram,
    LinkedIn,
}

/// Outreach state of a sales lead.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum LeadStatus {
    #[default]
    Pending,
    Contacted,
}

/// Publication state of a scheduled post.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum PostStatus {
    #[default]
    Pending,
    Posted,
}

/// Outcome of an attempted channel action, as recorded in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    Failed,
}

/// One row of the lead table.
///
/// `stage` only increases, and only as a side effect of a successful email
/// publish on this lead. `last_contact` is an ISO-8601 local datetime or
/// empty for never-contacted leads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub name: String,
    pub email: String,
    pub company: String,
    pub industry: String,
    pub status: LeadStatus,
    pub last_contact: String,
    pub stage: u32,
}

/// One row of the scheduled-post table.
///
/// `platform` is kept as the raw cell value; the scheduler resolves it
/// case-insensitively and treats anything unresolvable as unsupported.
/// `media` is empty when the post has no media reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPost {
    pub date: String,
    pub time: String,
    pub platform: String,
    pub text: String,
    pub media: String,
    pub hashtags: String,
    pub status: PostStatus,
    pub posted_time: String,
    pub post_id: String,
}

impl ScheduledPost {
    /// The media reference, or `None` when the cell is empty.
    pub fn media_ref(&self) -> Option<&str> {
        let trimmed = self.media.trim();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    }
}

/// Content handed to a channel client for publication.
///
/// Tagged by channel family: email sends carry an addressed HTML message,
/// social publishes carry caption text and an optional media reference.
/// Each client rejects the variant it cannot express, locally, before any
/// network call.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundContent {
    Email {
        to: String,
        subject: String,
        html_body: String,
    },
    Social {
        text: String,
        media: Option<String>,
    },
}
