// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Activity recorder that captures entries in memory.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use dripflow_core::{ActivityRecorder, Outcome, Platform};

/// A captured activity entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub channel: Platform,
    pub outcome: Outcome,
    pub details: String,
}

/// An activity recorder backed by an in-memory vector.
#[derive(Default)]
pub struct MemoryActivityLog {
    entries: Arc<Mutex<Vec<ActivityEntry>>>,
}

impl MemoryActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the recorded entries.
    pub async fn entries(&self) -> Vec<ActivityEntry> {
        self.entries.lock().await.clone()
    }

    /// Number of entries with the given outcome.
    pub async fn count_with_outcome(&self, outcome: Outcome) -> usize {
        self.entries
            .lock()
            .await
            .iter()
            .filter(|e| e.outcome == outcome)
            .count()
    }
}

#[async_trait]
impl ActivityRecorder for MemoryActivityLog {
    async fn record(&self, channel: Platform, outcome: Outcome, details: &str) {
        self.entries.lock().await.push(ActivityEntry {
            channel,
            outcome,
            details: details.to_string(),
        });
    }
}
