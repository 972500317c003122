// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Dripflow integration tests.
//!
//! Provides in-memory stand-ins for the record store, channel clients,
//! and the activity log so engine behavior can be tested without a
//! filesystem or network.
//!
//! # Components
//!
//! - [`MemoryRecordStore`] - Record store backed by in-memory vectors
//! - [`MockChannel`] - Channel client with scripted results and capture
//! - [`MemoryActivityLog`] - Activity recorder that captures entries

pub mod memory_activity;
pub mod memory_store;
pub mod mock_channel;

pub use memory_activity::MemoryActivityLog;
pub use memory_store::MemoryRecordStore;
pub use mock_channel::MockChannel;
