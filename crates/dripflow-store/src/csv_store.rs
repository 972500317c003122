// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CSV implementation of the [`RecordStore`] trait.
//!
//! Two header-rowed CSV files back the lead and scheduled-post tables.
//! Rows are addressed by 1-based physical row (header = row 1), matching
//! the [`dripflow_core::sheet_row`] mapping. Field updates rewrite the
//! whole file; there is no transactional guarantee across the cells of a
//! single update, which is within the gateway's fail-soft contract.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Local;
use csv::StringRecord;
use tracing::{debug, error, info};

use dripflow_config::model::StoreConfig;
use dripflow_core::{DripflowError, Lead, LeadStatus, PostStatus, RecordStore, ScheduledPost};

// Lead table columns: Name, Email, Company, Industry, Status, Last Contact, Stage.
const LEAD_COLUMNS: usize = 7;
const LEAD_STATUS: usize = 4;
const LEAD_LAST_CONTACT: usize = 5;
const LEAD_STAGE: usize = 6;

// Post table columns: Date, Time, Platform, Text, Media, Hashtags, Status,
// Posted Time, Post ID.
const POST_COLUMNS: usize = 9;
const POST_STATUS: usize = 6;
const POST_POSTED_TIME: usize = 7;
const POST_POST_ID: usize = 8;

/// CSV-file-backed record store gateway.
///
/// The backing files are the single source of truth and may be read or
/// rewritten concurrently by an independent dashboard process; the last
/// writer wins on any column.
pub struct CsvRecordStore {
    leads_path: PathBuf,
    posts_path: PathBuf,
}

impl CsvRecordStore {
    /// Creates a gateway over the configured lead and post tables.
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            leads_path: PathBuf::from(&config.leads_path),
            posts_path: PathBuf::from(&config.posts_path),
        }
    }

    /// Reads every physical row of a table, header included, so that
    /// `rows[r - 1]` is physical row `r`.
    fn read_rows(path: &PathBuf) -> Result<Vec<StringRecord>, DripflowError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(store_err)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record.map_err(store_err)?);
        }
        Ok(rows)
    }

    fn write_rows(path: &PathBuf, rows: &[StringRecord]) -> Result<(), DripflowError> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(store_err)?;
        for row in rows {
            writer.write_record(row).map_err(store_err)?;
        }
        writer.flush().map_err(store_err)?;
        Ok(())
    }

    /// Rewrites selected cells of one physical data row in place.
    fn patch_row(
        path: &PathBuf,
        row: usize,
        width: usize,
        patches: &[(usize, String)],
    ) -> Result<(), DripflowError> {
        let mut rows = Self::read_rows(path)?;
        if row < 2 || row > rows.len() {
            return Err(DripflowError::Store {
                source: format!("row {row} out of range (table has {} rows)", rows.len()).into(),
            });
        }

        let mut cells: Vec<String> = rows[row - 1].iter().map(str::to_string).collect();
        if cells.len() < width {
            cells.resize(width, String::new());
        }
        for (column, value) in patches {
            cells[*column] = value.clone();
        }
        rows[row - 1] = StringRecord::from(cells);

        Self::write_rows(path, &rows)
    }
}

#[async_trait]
impl RecordStore for CsvRecordStore {
    async fn list_leads(&self) -> Vec<Lead> {
        match Self::read_rows(&self.leads_path) {
            Ok(rows) => rows.iter().skip(1).map(lead_from_record).collect(),
            Err(e) => {
                error!(path = %self.leads_path.display(), error = %e, "error reading sales leads");
                Vec::new()
            }
        }
    }

    async fn list_posts(&self) -> Vec<ScheduledPost> {
        match Self::read_rows(&self.posts_path) {
            Ok(rows) => rows.iter().skip(1).map(post_from_record).collect(),
            Err(e) => {
                error!(path = %self.posts_path.display(), error = %e, "error reading social posts");
                Vec::new()
            }
        }
    }

    async fn update_lead(
        &self,
        row: usize,
        status: LeadStatus,
        last_contact: &str,
        stage: Option<u32>,
    ) -> bool {
        let mut patches = vec![
            (LEAD_STATUS, status.to_string()),
            (LEAD_LAST_CONTACT, last_contact.to_string()),
        ];
        if let Some(stage) = stage {
            patches.push((LEAD_STAGE, stage.to_string()));
        }

        match Self::patch_row(&self.leads_path, row, LEAD_COLUMNS, &patches) {
            Ok(()) => {
                info!(row, status = %status, "lead row updated");
                true
            }
            Err(e) => {
                error!(row, error = %e, "error updating lead");
                false
            }
        }
    }

    async fn mark_post_sent(&self, row: usize, platform: &str, post_id: Option<&str>) -> bool {
        let mut patches = vec![
            (POST_STATUS, PostStatus::Posted.to_string()),
            (POST_POSTED_TIME, now_timestamp()),
        ];
        if let Some(id) = post_id {
            patches.push((POST_POST_ID, id.to_string()));
        }

        match Self::patch_row(&self.posts_path, row, POST_COLUMNS, &patches) {
            Ok(()) => {
                info!(row, platform, "marked post row as sent");
                true
            }
            Err(e) => {
                error!(row, platform, error = %e, "error marking post as sent");
                false
            }
        }
    }
}

fn store_err(e: impl std::error::Error + Send + Sync + 'static) -> DripflowError {
    DripflowError::Store { source: Box::new(e) }
}

/// ISO-8601 local timestamp without offset, matching the last-contact format.
pub fn now_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn cell(record: &StringRecord, index: usize) -> String {
    record.get(index).unwrap_or("").trim().to_string()
}

fn lead_from_record(record: &StringRecord) -> Lead {
    let status = cell(record, LEAD_STATUS).parse().unwrap_or_else(|_| {
        debug!(raw = %cell(record, LEAD_STATUS), "unrecognized lead status, treating as Pending");
        LeadStatus::Pending
    });
    Lead {
        name: cell(record, 0),
        email: cell(record, 1),
        company: cell(record, 2),
        industry: cell(record, 3),
        status,
        last_contact: cell(record, LEAD_LAST_CONTACT),
        stage: cell(record, LEAD_STAGE).parse().unwrap_or(0),
    }
}

fn post_from_record(record: &StringRecord) -> ScheduledPost {
    ScheduledPost {
        date: cell(record, 0),
        time: cell(record, 1),
        platform: cell(record, 2),
        text: cell(record, 3),
        media: cell(record, 4),
        hashtags: cell(record, 5),
        status: cell(record, POST_STATUS).parse().unwrap_or(PostStatus::Pending),
        posted_time: cell(record, POST_POSTED_TIME),
        post_id: cell(record, POST_POST_ID),
    }
}
