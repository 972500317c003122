// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Staged email outreach.
//!
//! One engine tick walks the lead table in order and sends at most one
//! email per lead per calendar day, advancing the lead's stage only
//! after the channel confirms the send.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::{error, info, warn};

use dripflow_config::model::EmailConfig;
use dripflow_core::{
    sheet_row, ActivityRecorder, ChannelClient, Lead, LeadStatus, Outcome, OutboundContent,
    Platform, RecordStore,
};
use dripflow_email::{EmailTemplate, TemplateVars};

use crate::quota::QuotaTracker;

/// Timestamp format written to the lead table's last-contact column.
const LAST_CONTACT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Drives leads through the staged email sequence.
pub struct StageEngine {
    store: Arc<dyn RecordStore>,
    email: Arc<dyn ChannelClient>,
    activity: Arc<dyn ActivityRecorder>,
    quota: QuotaTracker,
    sender_name: String,
    value_prop: String,
    case_study_company: String,
    case_study_result: String,
    resource_link: String,
    send_delay: Duration,
}

impl StageEngine {
    pub fn new(
        store: Arc<dyn RecordStore>,
        email: Arc<dyn ChannelClient>,
        activity: Arc<dyn ActivityRecorder>,
        config: &EmailConfig,
        send_delay: Duration,
    ) -> Self {
        Self {
            store,
            email,
            activity,
            quota: QuotaTracker::new(config.daily_limit),
            sender_name: config.sender_name.clone(),
            value_prop: config.value_prop.clone(),
            case_study_company: config.case_study_company.clone(),
            case_study_result: config.case_study_result.clone(),
            resource_link: config.resource_link.clone(),
            send_delay,
        }
    }

    /// Remaining sends allowed today.
    pub fn quota(&self) -> &QuotaTracker {
        &self.quota
    }

    /// Start a fresh daily quota.
    pub fn reset_quota(&mut self) {
        self.quota.reset();
    }

    /// Run one outreach tick at the current local time.
    pub async fn run(&mut self) {
        self.run_at(Local::now().naive_local()).await;
    }

    async fn run_at(&mut self, now: NaiveDateTime) {
        let leads = self.store.list_leads().await;
        info!(lead_count = leads.len(), "starting sales tick");
        let today = now.date();
        let now_stamp = now.format(LAST_CONTACT_FORMAT).to_string();

        for (index, lead) in leads.iter().enumerate() {
            if contacted_today(lead, today) {
                continue;
            }
            let Some(template) = EmailTemplate::for_stage(lead.stage) else {
                // Stage 3 and beyond is terminal.
                continue;
            };
            if !self.quota.allow() {
                warn!(
                    email = %lead.email,
                    limit = self.quota.limit(),
                    "daily email quota exhausted, skipping lead"
                );
                continue;
            }

            let content = OutboundContent::Email {
                to: lead.email.clone(),
                subject: template.subject(&lead.company),
                html_body: template.body(&TemplateVars {
                    name: &lead.name,
                    company: &lead.company,
                    industry: &lead.industry,
                    value_prop: &self.value_prop,
                    case_study_company: &self.case_study_company,
                    case_study_result: &self.case_study_result,
                    resource_link: &self.resource_link,
                    sender_name: &self.sender_name,
                }),
            };

            match self.email.publish(&content).await {
                Ok(_) => {
                    self.quota.record_success();
                    let row = sheet_row(index);
                    if !self
                        .store
                        .update_lead(row, LeadStatus::Contacted, &now_stamp, Some(lead.stage + 1))
                        .await
                    {
                        // The email went out; the row just failed to record it.
                        error!(row, email = %lead.email, "sent email but failed to update lead row");
                    }
                    let details =
                        format!("stage {} email to {} ({})", lead.stage, lead.email, lead.company);
                    self.activity
                        .record(Platform::Email, Outcome::Success, &details)
                        .await;
                    info!(email = %lead.email, stage = lead.stage, "outreach email sent");
                }
                Err(err) => {
                    let details = format!(
                        "stage {} email to {} failed: {err}",
                        lead.stage, lead.email
                    );
                    self.activity
                        .record(Platform::Email, Outcome::Failed, &details)
                        .await;
                    warn!(email = %lead.email, error = %err, "outreach email failed");
                }
            }

            tokio::time::sleep(self.send_delay).await;
        }
    }
}

/// Whether this lead already received an email today.
///
/// Date equality on the calendar day, not elapsed hours; a blank or
/// unparseable last-contact stamp counts as not contacted.
fn contacted_today(lead: &Lead, today: NaiveDate) -> bool {
    if lead.status != LeadStatus::Contacted {
        return false;
    }
    NaiveDateTime::parse_from_str(&lead.last_contact, LAST_CONTACT_FORMAT)
        .map(|stamp| stamp.date() == today)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dripflow_test_utils::{MemoryActivityLog, MemoryRecordStore, MockChannel};

    fn lead(name: &str, stage: u32) -> Lead {
        Lead {
            name: name.to_string(),
            email: format!("{name}@example.com"),
            company: "Acme".to_string(),
            industry: "retail".to_string(),
            status: LeadStatus::Pending,
            last_contact: String::new(),
            stage,
        }
    }

    fn engine(
        store: Arc<MemoryRecordStore>,
        channel: Arc<MockChannel>,
        activity: Arc<MemoryActivityLog>,
        daily_limit: u32,
    ) -> StageEngine {
        let config = EmailConfig {
            daily_limit,
            ..EmailConfig::default()
        };
        StageEngine::new(store, channel, activity, &config, Duration::from_millis(0))
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn successful_send_advances_stage_and_records_activity() {
        let store = Arc::new(MemoryRecordStore::new(vec![lead("ada", 0)], Vec::new()));
        let channel = Arc::new(MockChannel::new(Platform::Email));
        let activity = Arc::new(MemoryActivityLog::new());
        let mut engine = engine(store.clone(), channel.clone(), activity.clone(), 50);

        engine.run_at(noon()).await;

        let leads = store.leads().await;
        assert_eq!(leads[0].stage, 1);
        assert_eq!(leads[0].status, LeadStatus::Contacted);
        assert_eq!(leads[0].last_contact, "2026-03-02T12:00:00");

        let entries = activity.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].outcome, Outcome::Success);
        assert!(entries[0].details.contains("ada@example.com"));

        let published = channel.published().await;
        match &published[0] {
            OutboundContent::Email { to, subject, html_body } => {
                assert_eq!(to, "ada@example.com");
                assert!(subject.contains("Acme"));
                assert!(html_body.contains("ada"));
            }
            other => panic!("expected email content, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn lead_contacted_today_is_skipped() {
        let mut contacted = lead("ada", 1);
        contacted.status = LeadStatus::Contacted;
        contacted.last_contact = "2026-03-02T09:00:00".to_string();
        let store = Arc::new(MemoryRecordStore::new(vec![contacted], Vec::new()));
        let channel = Arc::new(MockChannel::new(Platform::Email));
        let activity = Arc::new(MemoryActivityLog::new());
        let mut engine = engine(store.clone(), channel.clone(), activity.clone(), 50);

        engine.run_at(noon()).await;

        assert_eq!(channel.publish_count().await, 0);
        assert_eq!(store.leads().await[0].stage, 1);
    }

    #[tokio::test]
    async fn lead_contacted_yesterday_is_sent_again() {
        let mut contacted = lead("ada", 1);
        contacted.status = LeadStatus::Contacted;
        contacted.last_contact = "2026-03-01T09:00:00".to_string();
        let store = Arc::new(MemoryRecordStore::new(vec![contacted], Vec::new()));
        let channel = Arc::new(MockChannel::new(Platform::Email));
        let activity = Arc::new(MemoryActivityLog::new());
        let mut engine = engine(store.clone(), channel.clone(), activity.clone(), 50);

        engine.run_at(noon()).await;

        assert_eq!(channel.publish_count().await, 1);
        assert_eq!(store.leads().await[0].stage, 2);
    }

    #[tokio::test]
    async fn unparseable_last_contact_counts_as_not_contacted() {
        let mut garbled = lead("ada", 1);
        garbled.status = LeadStatus::Contacted;
        garbled.last_contact = "yesterday-ish".to_string();
        let store = Arc::new(MemoryRecordStore::new(vec![garbled], Vec::new()));
        let channel = Arc::new(MockChannel::new(Platform::Email));
        let activity = Arc::new(MemoryActivityLog::new());
        let mut engine = engine(store.clone(), channel.clone(), activity.clone(), 50);

        engine.run_at(noon()).await;

        assert_eq!(channel.publish_count().await, 1);
    }

    #[tokio::test]
    async fn terminal_stage_is_never_emailed() {
        let store = Arc::new(MemoryRecordStore::new(vec![lead("ada", 3)], Vec::new()));
        let channel = Arc::new(MockChannel::new(Platform::Email));
        let activity = Arc::new(MemoryActivityLog::new());
        let mut engine = engine(store.clone(), channel.clone(), activity.clone(), 50);

        engine.run_at(noon()).await;

        assert_eq!(channel.publish_count().await, 0);
        assert!(activity.entries().await.is_empty());
    }

    #[tokio::test]
    async fn quota_gates_later_leads_without_activity_records() {
        let store = Arc::new(MemoryRecordStore::new(
            vec![lead("ada", 0), lead("grace", 0), lead("edsger", 0)],
            Vec::new(),
        ));
        let channel = Arc::new(MockChannel::new(Platform::Email));
        let activity = Arc::new(MemoryActivityLog::new());
        let mut engine = engine(store.clone(), channel.clone(), activity.clone(), 2);

        engine.run_at(noon()).await;

        assert_eq!(channel.publish_count().await, 2);
        assert_eq!(activity.entries().await.len(), 2);
        let leads = store.leads().await;
        assert_eq!(leads[0].stage, 1);
        assert_eq!(leads[1].stage, 1);
        assert_eq!(leads[2].stage, 0);
    }

    #[tokio::test]
    async fn failed_send_leaves_lead_untouched_and_records_failure() {
        let store = Arc::new(MemoryRecordStore::new(vec![lead("ada", 0)], Vec::new()));
        let channel = Arc::new(MockChannel::new(Platform::Email));
        channel.script_failure("smtp handshake refused").await;
        let activity = Arc::new(MemoryActivityLog::new());
        let mut engine = engine(store.clone(), channel.clone(), activity.clone(), 50);

        engine.run_at(noon()).await;

        let leads = store.leads().await;
        assert_eq!(leads[0].stage, 0);
        assert_eq!(leads[0].status, LeadStatus::Pending);

        let entries = activity.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].outcome, Outcome::Failed);
        assert!(entries[0].details.contains("smtp handshake refused"));
    }

    #[tokio::test]
    async fn failed_quota_consumes_nothing() {
        let store = Arc::new(MemoryRecordStore::new(
            vec![lead("ada", 0), lead("grace", 0)],
            Vec::new(),
        ));
        let channel = Arc::new(MockChannel::new(Platform::Email));
        channel.script_failure("transient").await;
        let activity = Arc::new(MemoryActivityLog::new());
        let mut engine = engine(store.clone(), channel.clone(), activity.clone(), 1);

        engine.run_at(noon()).await;

        // The failed first send left quota intact for the second lead.
        assert_eq!(channel.publish_count().await, 2);
        assert_eq!(store.leads().await[1].stage, 1);
    }

    #[tokio::test]
    async fn store_write_failure_after_send_is_not_rolled_back() {
        let store = Arc::new(MemoryRecordStore::new(vec![lead("ada", 0)], Vec::new()));
        store.set_write_failing(true).await;
        let channel = Arc::new(MockChannel::new(Platform::Email));
        let activity = Arc::new(MemoryActivityLog::new());
        let mut engine = engine(store.clone(), channel.clone(), activity.clone(), 50);

        engine.run_at(noon()).await;

        // The email went out, so quota and the activity log reflect it
        // even though the lead row could not be updated.
        assert_eq!(channel.publish_count().await, 1);
        assert_eq!(engine.quota().count(), 1);
        let entries = activity.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].outcome, Outcome::Success);

        let leads = store.leads().await;
        assert_eq!(leads[0].stage, 0);
        assert_eq!(leads[0].status, LeadStatus::Pending);
        assert!(leads[0].last_contact.is_empty());
    }

    #[tokio::test]
    async fn reset_quota_allows_sending_again() {
        let store = Arc::new(MemoryRecordStore::new(vec![lead("ada", 0)], Vec::new()));
        let channel = Arc::new(MockChannel::new(Platform::Email));
        let activity = Arc::new(MemoryActivityLog::new());
        let mut engine = engine(store.clone(), channel.clone(), activity.clone(), 1);

        engine.run_at(noon()).await;
        assert!(!engine.quota().allow());
        engine.reset_quota();
        assert!(engine.quota().allow());
    }

    #[test]
    fn contacted_today_requires_contacted_status() {
        let mut pending = lead("ada", 0);
        pending.last_contact = "2026-03-02T09:00:00".to_string();
        assert!(!contacted_today(&pending, noon().date()));
    }
}
