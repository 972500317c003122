// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `dripflow serve` command implementation.
//!
//! Builds the record store, activity log, and channel clients from
//! configuration, then drives the daily sales tick, the periodic social
//! tick, the daily metrics pass, and the daily quota reset from a single
//! minute-resolution loop until interrupted.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use dripflow_config::DripflowConfig;
use dripflow_core::{ActivityRecorder, ChannelClient, DripflowError, RecordStore};
use dripflow_email::EmailChannel;
use dripflow_engine::{PostScheduler, StageEngine};
use dripflow_facebook::FacebookChannel;
use dripflow_instagram::InstagramChannel;
use dripflow_store::{CsvActivityLog, CsvRecordStore};

/// Resolution of the scheduling loop. Fine enough that an "HH:MM" match
/// cannot be skipped over.
const TICK_SECS: u64 = 20;

struct Engines {
    sales: Option<StageEngine>,
    scheduler: PostScheduler,
}

fn build_engines(config: &DripflowConfig) -> Result<Engines, DripflowError> {
    let store: Arc<dyn RecordStore> = Arc::new(CsvRecordStore::new(&config.store));
    let activity: Arc<dyn ActivityRecorder> =
        Arc::new(CsvActivityLog::new(config.store.activity_log_path.clone()));

    let sales = if config.email.address.is_some() && config.email.password.is_some() {
        let channel = Arc::new(EmailChannel::new(&config.email)?);
        Some(StageEngine::new(
            store.clone(),
            channel,
            activity.clone(),
            &config.email,
            Duration::from_secs(config.schedule.send_delay_secs),
        ))
    } else {
        info!("email channel disabled (no credentials configured)");
        None
    };

    let mut scheduler = PostScheduler::new(
        store,
        activity,
        Duration::from_secs(config.schedule.dispatch_delay_secs),
    );
    if config.facebook.access_token.is_some() && config.facebook.page_id.is_some() {
        let channel: Arc<dyn ChannelClient> = Arc::new(FacebookChannel::new(&config.facebook)?);
        scheduler.register(channel, config.facebook.daily_limit);
        info!("facebook channel enabled");
    } else {
        info!("facebook channel disabled (no credentials configured)");
    }
    if config.instagram.access_token.is_some() && config.instagram.account_id.is_some() {
        let channel: Arc<dyn ChannelClient> = Arc::new(InstagramChannel::new(&config.instagram)?);
        scheduler.register(channel, config.instagram.daily_limit);
        info!("instagram channel enabled");
    } else {
        info!("instagram channel disabled (no credentials configured)");
    }
    if config.linkedin.access_token.is_some() {
        warn!("linkedin credentials configured but no linkedin client is available");
    }

    Ok(Engines { sales, scheduler })
}

/// Run the scheduler daemon until interrupted.
pub async fn run(config: &DripflowConfig) -> Result<(), DripflowError> {
    let mut engines = build_engines(config)?;

    let started = Local::now().naive_local();
    let mut sales_job = DailyJob::new(&config.schedule.sales_time, started);
    let mut metrics_job = DailyJob::new(&config.schedule.metrics_time, started);
    let mut reset_job = DailyJob::new(&config.schedule.quota_reset_time, started);
    let mut social_job =
        IntervalJob::new(chrono::Duration::minutes(i64::from(
            config.schedule.social_interval_minutes,
        )));

    info!(
        sales_time = %config.schedule.sales_time,
        social_interval_minutes = config.schedule.social_interval_minutes,
        metrics_time = %config.schedule.metrics_time,
        "scheduler started"
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(TICK_SECS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Local::now().naive_local();
                if reset_job.due(now) {
                    if let Some(sales) = engines.sales.as_mut() {
                        sales.reset_quota();
                    }
                    engines.scheduler.reset_quotas();
                    info!("daily quotas reset");
                }
                if sales_job.due(now) {
                    if let Some(sales) = engines.sales.as_mut() {
                        sales.run().await;
                    }
                }
                if social_job.due(now) {
                    engines.scheduler.run().await;
                }
                if metrics_job.due(now) {
                    engines.scheduler.collect_metrics().await;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}

/// Run one sales outreach tick and exit.
pub async fn run_sales_once(config: &DripflowConfig) -> Result<(), DripflowError> {
    let mut engines = build_engines(config)?;
    let Some(sales) = engines.sales.as_mut() else {
        return Err(DripflowError::Config(
            "email channel is not configured (set email.address and email.password)".to_string(),
        ));
    };
    sales.run().await;
    Ok(())
}

/// Run one social publishing tick and exit.
pub async fn run_social_once(config: &DripflowConfig) -> Result<(), DripflowError> {
    let mut engines = build_engines(config)?;
    engines.scheduler.run().await;
    Ok(())
}

/// Collect post metrics and exit.
pub async fn run_metrics_once(config: &DripflowConfig) -> Result<(), DripflowError> {
    let engines = build_engines(config)?;
    engines.scheduler.collect_metrics().await;
    Ok(())
}

/// A job that fires once per calendar day, at or after a fixed "HH:MM".
///
/// The comparison is `>=`, not equality, so a tick that overruns the
/// scheduled minute (a long send burst) fires the job late instead of
/// skipping it for the whole day.
struct DailyJob {
    at: Option<NaiveTime>,
    last_run: Option<NaiveDate>,
}

impl DailyJob {
    /// A job armed at `now`; a slot already passed today first fires
    /// tomorrow. An unparseable time never fires (validation rejects it
    /// before the loop starts).
    fn new(at: &str, now: NaiveDateTime) -> Self {
        let at = NaiveTime::parse_from_str(at, "%H:%M").ok();
        let last_run = match at {
            Some(time) if now.time() >= time => Some(now.date()),
            _ => None,
        };
        Self { at, last_run }
    }

    fn due(&mut self, now: NaiveDateTime) -> bool {
        let Some(at) = self.at else {
            return false;
        };
        if now.time() < at || self.last_run == Some(now.date()) {
            return false;
        }
        self.last_run = Some(now.date());
        true
    }
}

/// A job that fires at a fixed interval, starting one interval after
/// the loop begins.
struct IntervalJob {
    every: chrono::Duration,
    next: Option<NaiveDateTime>,
}

impl IntervalJob {
    fn new(every: chrono::Duration) -> Self {
        Self { every, next: None }
    }

    fn due(&mut self, now: NaiveDateTime) -> bool {
        match self.next {
            None => {
                self.next = Some(now + self.every);
                false
            }
            Some(next) if now >= next => {
                self.next = Some(now + self.every);
                true
            }
            Some(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn daily_job_fires_once_per_day() {
        let mut job = DailyJob::new("09:00", at(8, 0, 0));
        assert!(!job.due(at(8, 59, 40)));
        assert!(job.due(at(9, 0, 0)));
        // Later ticks the same day stay quiet.
        assert!(!job.due(at(9, 0, 20)));
        assert!(!job.due(at(14, 30, 0)));

        let next_day = at(9, 0, 0) + chrono::Duration::days(1);
        assert!(job.due(next_day));
    }

    #[test]
    fn daily_job_overrunning_tick_fires_late_not_never() {
        // A long preceding tick can push the next tick well past the
        // scheduled minute.
        let mut job = DailyJob::new("09:00", at(8, 0, 0));
        assert!(!job.due(at(8, 55, 0)));
        assert!(job.due(at(9, 7, 13)));
        assert!(!job.due(at(9, 7, 33)));
    }

    #[test]
    fn daily_job_started_after_slot_waits_for_tomorrow() {
        let mut job = DailyJob::new("09:00", at(14, 0, 0));
        assert!(!job.due(at(14, 0, 20)));
        assert!(!job.due(at(23, 59, 40)));

        let next_day = at(9, 0, 0) + chrono::Duration::days(1);
        assert!(job.due(next_day));
    }

    #[test]
    fn interval_job_arms_on_first_tick() {
        let mut job = IntervalJob::new(chrono::Duration::minutes(30));
        assert!(!job.due(at(12, 0, 0)));
        assert!(!job.due(at(12, 29, 40)));
        assert!(job.due(at(12, 30, 0)));
        assert!(!job.due(at(12, 30, 20)));
        assert!(job.due(at(13, 0, 0)));
    }

    #[tokio::test]
    async fn engines_build_without_credentials() {
        let config = dripflow_config::load_and_validate_str("").unwrap();
        let engines = build_engines(&config).unwrap();
        assert!(engines.sales.is_none());
    }
}
