// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily send quotas.
//!
//! Counters live in process memory and are reset by the serve loop's
//! daily reset job. Only confirmed publishes count against a quota.

use std::collections::HashMap;

use dripflow_core::Platform;

/// A single channel's daily send counter.
#[derive(Debug, Clone)]
pub struct QuotaTracker {
    count: u32,
    limit: u32,
}

impl QuotaTracker {
    pub fn new(limit: u32) -> Self {
        Self { count: 0, limit }
    }

    /// Whether another send is allowed right now.
    pub fn allow(&self) -> bool {
        self.count < self.limit
    }

    /// Count a confirmed publish against the quota.
    pub fn record_success(&mut self) {
        self.count += 1;
    }

    /// Start a fresh day.
    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

/// Per-platform quota trackers for the post scheduler.
#[derive(Debug, Default)]
pub struct QuotaSet {
    trackers: HashMap<Platform, QuotaTracker>,
}

impl QuotaSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, platform: Platform, limit: u32) {
        self.trackers.insert(platform, QuotaTracker::new(limit));
    }

    pub fn get(&self, platform: Platform) -> Option<&QuotaTracker> {
        self.trackers.get(&platform)
    }

    pub fn get_mut(&mut self, platform: Platform) -> Option<&mut QuotaTracker> {
        self.trackers.get_mut(&platform)
    }

    pub fn reset_all(&mut self) {
        for tracker in self.trackers.values_mut() {
            tracker.reset();
        }
    }
}
