// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Dripflow campaign engine.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Dripflow workspace. The channel clients,
//! the record store gateway, and the activity recorder all implement traits
//! defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::DripflowError;
pub use types::{
    Lead, LeadStatus, OutboundContent, Outcome, Platform, PostId, PostMetrics, PostStatus,
    ScheduledPost,
};

pub use traits::{ActivityRecorder, ChannelClient, RecordStore, sheet_row};
