// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory record store for deterministic testing.
//!
//! `MemoryRecordStore` implements `RecordStore` over plain vectors, using
//! the same row addressing as the CSV store (first record lives at row 2).

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use dripflow_core::{Lead, LeadStatus, RecordStore, ScheduledPost};

/// A record store backed by in-memory vectors.
///
/// Updates apply the same fail-soft contract as the CSV store: an
/// out-of-range row returns `false` instead of panicking. The `fail`
/// flag makes every call behave as if the backing file were unreadable;
/// the `fail_writes` flag degrades writes only, so reads still return
/// rows while every update reports `false`.
pub struct MemoryRecordStore {
    leads: Arc<Mutex<Vec<Lead>>>,
    posts: Arc<Mutex<Vec<ScheduledPost>>>,
    fail: Arc<Mutex<bool>>,
    fail_writes: Arc<Mutex<bool>>,
    marked_platforms: Arc<Mutex<Vec<String>>>,
}

impl MemoryRecordStore {
    /// Create a store seeded with the given leads and posts.
    pub fn new(leads: Vec<Lead>, posts: Vec<ScheduledPost>) -> Self {
        Self {
            leads: Arc::new(Mutex::new(leads)),
            posts: Arc::new(Mutex::new(posts)),
            fail: Arc::new(Mutex::new(false)),
            fail_writes: Arc::new(Mutex::new(false)),
            marked_platforms: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make every subsequent call behave as if the store were unreachable.
    pub async fn set_failing(&self, failing: bool) {
        *self.fail.lock().await = failing;
    }

    /// Make writes report failure while reads keep serving rows.
    pub async fn set_write_failing(&self, failing: bool) {
        *self.fail_writes.lock().await = failing;
    }

    /// Platform names passed to `mark_post_sent`, in call order.
    pub async fn marked_platforms(&self) -> Vec<String> {
        self.marked_platforms.lock().await.clone()
    }

    /// Snapshot the current leads.
    pub async fn leads(&self) -> Vec<Lead> {
        self.leads.lock().await.clone()
    }

    /// Snapshot the current posts.
    pub async fn posts(&self) -> Vec<ScheduledPost> {
        self.posts.lock().await.clone()
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list_leads(&self) -> Vec<Lead> {
        if *self.fail.lock().await {
            return Vec::new();
        }
        self.leads.lock().await.clone()
    }

    async fn list_posts(&self) -> Vec<ScheduledPost> {
        if *self.fail.lock().await {
            return Vec::new();
        }
        self.posts.lock().await.clone()
    }

    async fn update_lead(
        &self,
        row: usize,
        status: LeadStatus,
        last_contact: &str,
        stage: Option<u32>,
    ) -> bool {
        if *self.fail.lock().await || *self.fail_writes.lock().await || row < 2 {
            return false;
        }
        let mut leads = self.leads.lock().await;
        let Some(lead) = leads.get_mut(row - 2) else {
            return false;
        };
        lead.status = status;
        lead.last_contact = last_contact.to_string();
        if let Some(stage) = stage {
            lead.stage = stage;
        }
        true
    }

    async fn mark_post_sent(&self, row: usize, platform: &str, post_id: Option<&str>) -> bool {
        self.marked_platforms.lock().await.push(platform.to_string());
        if *self.fail.lock().await || *self.fail_writes.lock().await || row < 2 {
            return false;
        }
        let mut posts = self.posts.lock().await;
        let Some(post) = posts.get_mut(row - 2) else {
            return false;
        };
        post.status = dripflow_core::PostStatus::Posted;
        // Fixed marker; tests assert non-emptiness, not wall-clock time.
        post.posted_time = "2026-01-01T00:00:00".to_string();
        post.post_id = post_id.unwrap_or_default().to_string();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dripflow_core::sheet_row;

    fn lead(name: &str) -> Lead {
        Lead {
            name: name.to_string(),
            email: format!("{name}@example.com"),
            company: "Acme".to_string(),
            industry: "retail".to_string(),
            status: LeadStatus::Pending,
            last_contact: String::new(),
            stage: 0,
        }
    }

    #[tokio::test]
    async fn update_lead_addresses_by_sheet_row() {
        let store = MemoryRecordStore::new(vec![lead("ada"), lead("grace")], Vec::new());
        assert!(
            store
                .update_lead(sheet_row(1), LeadStatus::Contacted, "2026-03-01T09:00:00", Some(1))
                .await
        );
        let leads = store.leads().await;
        assert_eq!(leads[0].status, LeadStatus::Pending);
        assert_eq!(leads[1].status, LeadStatus::Contacted);
        assert_eq!(leads[1].stage, 1);
    }

    #[tokio::test]
    async fn out_of_range_row_returns_false() {
        let store = MemoryRecordStore::new(vec![lead("ada")], Vec::new());
        assert!(!store.update_lead(1, LeadStatus::Contacted, "x", None).await);
        assert!(!store.update_lead(5, LeadStatus::Contacted, "x", None).await);
    }

    #[tokio::test]
    async fn write_failing_store_still_serves_reads() {
        let store = MemoryRecordStore::new(vec![lead("ada")], Vec::new());
        store.set_write_failing(true).await;
        assert_eq!(store.list_leads().await.len(), 1);
        assert!(!store.update_lead(2, LeadStatus::Contacted, "x", None).await);
        assert_eq!(store.leads().await[0].status, LeadStatus::Pending);
    }

    #[tokio::test]
    async fn failing_store_returns_empty_and_false() {
        let store = MemoryRecordStore::new(vec![lead("ada")], Vec::new());
        store.set_failing(true).await;
        assert!(store.list_leads().await.is_empty());
        assert!(!store.update_lead(2, LeadStatus::Contacted, "x", None).await);
    }
}
