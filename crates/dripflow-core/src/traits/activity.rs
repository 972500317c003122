// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Activity recorder trait for the append-only action log.

use async_trait::async_trait;

use crate::types::{Outcome, Platform};

/// Appends an immutable record of every attempted channel action.
///
/// Recording is best-effort: implementations log their own failures and
/// never surface them, so a broken activity sink cannot fail a publish
/// that already happened.
#[async_trait]
pub trait ActivityRecorder: Send + Sync + 'static {
    /// Records one attempted action and its outcome.
    async fn record(&self, channel: Platform, outcome: Outcome, details: &str);
}
