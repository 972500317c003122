// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CSV implementation of the [`ActivityRecorder`] trait.
//!
//! Appends one row per attempted channel action: Timestamp, Type, Status,
//! Details. The header row is written the first time the file is created.
//! Recording is best-effort; failures are logged and swallowed so a broken
//! log sink can never fail a publish that already happened.

use std::fs::OpenOptions;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Local;
use tracing::error;

use dripflow_core::{ActivityRecorder, Outcome, Platform};

/// Append-only CSV activity log.
pub struct CsvActivityLog {
    path: PathBuf,
}

impl CsvActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn append(&self, channel: Platform, outcome: Outcome, details: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let needs_header = std::fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);

        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer.write_record(["Timestamp", "Type", "Status", "Details"])?;
        }
        writer.write_record([
            Local::now().to_rfc3339().as_str(),
            &channel.to_string(),
            &outcome.to_string(),
            details,
        ])?;
        writer.flush()?;
        Ok(())
    }
}

#[async_trait]
impl ActivityRecorder for CsvActivityLog {
    async fn record(&self, channel: Platform, outcome: Outcome, details: &str) {
        if let Err(e) = self.append(channel, outcome, details) {
            error!(path = %self.path.display(), error = %e, "failed to append activity record");
        }
    }
}
