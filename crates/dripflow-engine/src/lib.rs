// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign orchestration engines.
//!
//! Two engines drive the system: [`StageEngine`] walks the lead table
//! and advances each lead through the staged email sequence, and
//! [`PostScheduler`] publishes time-windowed social posts. Both consult
//! in-memory daily quotas and record every attempted action in the
//! activity log.

pub mod quota;
pub mod sales;
pub mod social;

pub use quota::{QuotaSet, QuotaTracker};
pub use sales::StageEngine;
pub use social::PostScheduler;
