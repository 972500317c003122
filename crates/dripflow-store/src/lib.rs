// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CSV persistence layer for the Dripflow campaign engine.
//!
//! Provides the tabular record store gateway over the lead and
//! scheduled-post tables, and the append-only activity log. Both speak the
//! spreadsheet-shaped contract: header row first, data rows addressed by
//! 1-based physical row.

pub mod activity;
pub mod csv_store;

pub use activity::CsvActivityLog;
pub use csv_store::CsvRecordStore;
