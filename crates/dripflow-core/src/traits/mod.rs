// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for the Dripflow seams.
//!
//! The engines consume everything through these traits so the record store,
//! the channel clients, and the activity log can each be swapped for mocks
//! in tests. All traits use `#[async_trait]` for dynamic dispatch.

pub mod activity;
pub mod channel;
pub mod store;

pub use activity::ActivityRecorder;
pub use channel::ChannelClient;
pub use store::{RecordStore, sheet_row};
