// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record store gateway trait over the durable lead and post tables.

use async_trait::async_trait;

use crate::types::{Lead, LeadStatus, ScheduledPost};

/// Maps a logical index in a listed sequence to the store's 1-based
/// physical row.
///
/// Row 1 is the header, so logical index `i` lives at physical row `i + 2`.
/// Every caller that turns an enumeration index into a row address goes
/// through this function rather than repeating the arithmetic.
pub fn sheet_row(index: usize) -> usize {
    index + 2
}

/// Gateway to the durable tables holding leads and scheduled posts.
///
/// The gateway is fail-soft by contract: reads degrade to an empty
/// sequence and writes return `false` instead of propagating errors, so a
/// broken store never aborts a campaign tick. A `false` return means the
/// row may be partially written; there is no rollback.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Lists every lead row in table order. Empty on any read error.
    async fn list_leads(&self) -> Vec<Lead>;

    /// Lists every scheduled post in table order. Empty on any read error.
    async fn list_posts(&self) -> Vec<ScheduledPost>;

    /// Writes status, last-contact, and optionally stage on a lead row.
    ///
    /// `row` is the 1-based physical row (use [`sheet_row`]).
    async fn update_lead(
        &self,
        row: usize,
        status: LeadStatus,
        last_contact: &str,
        stage: Option<u32>,
    ) -> bool;

    /// Marks a post row as published, recording the time and channel id.
    async fn mark_post_sent(&self, row: usize, platform: &str, post_id: Option<&str>) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_row_skips_the_header() {
        assert_eq!(sheet_row(0), 2);
        assert_eq!(sheet_row(1), 3);
        assert_eq!(sheet_row(41), 43);
    }
}
