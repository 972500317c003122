// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Dripflow campaign engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Dripflow configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values;
/// channels without credentials are simply not constructed.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DripflowConfig {
    /// Process identity and logging settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Record store file locations.
    #[serde(default)]
    pub store: StoreConfig,

    /// Email channel (SMTP) settings.
    #[serde(default)]
    pub email: EmailConfig,

    /// Facebook Graph API settings.
    #[serde(default)]
    pub facebook: FacebookConfig,

    /// Instagram Graph API settings.
    #[serde(default)]
    pub instagram: InstagramConfig,

    /// LinkedIn settings. Declared for forward compatibility; no publish
    /// path exists and scheduled LinkedIn posts are skipped as unsupported.
    #[serde(default)]
    pub linkedin: LinkedinConfig,

    /// Campaign tick schedule.
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Display name of the process.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_name() -> String {
    "dripflow".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Record store file locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Path to the lead table CSV.
    #[serde(default = "default_leads_path")]
    pub leads_path: String,

    /// Path to the scheduled-post table CSV.
    #[serde(default = "default_posts_path")]
    pub posts_path: String,

    /// Path to the append-only activity log CSV.
    #[serde(default = "default_activity_log_path")]
    pub activity_log_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            leads_path: default_leads_path(),
            posts_path: default_posts_path(),
            activity_log_path: default_activity_log_path(),
        }
    }
}

fn data_file(name: &str) -> String {
    dirs::data_dir()
        .map(|p| p.join("dripflow").join(name))
        .unwrap_or_else(|| std::path::PathBuf::from(name))
        .to_string_lossy()
        .into_owned()
}

fn default_leads_path() -> String {
    data_file("leads.csv")
}

fn default_posts_path() -> String {
    data_file("posts.csv")
}

fn default_activity_log_path() -> String {
    data_file("activity.csv")
}

/// Email channel (SMTP) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmailConfig {
    /// SMTP relay hostname.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    /// SMTP relay port (implicit TLS).
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Sender address and SMTP username. `None` disables the email channel.
    #[serde(default)]
    pub address: Option<String>,

    /// SMTP password or app password. `None` disables the email channel.
    #[serde(default)]
    pub password: Option<String>,

    /// Name signed at the bottom of outreach emails.
    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    /// Maximum successful sends per day.
    #[serde(default = "default_email_daily_limit")]
    pub daily_limit: u32,

    /// Value proposition slotted into the initial outreach template.
    #[serde(default = "default_value_prop")]
    pub value_prop: String,

    /// Reference customer named in the first follow-up.
    #[serde(default = "default_case_study_company")]
    pub case_study_company: String,

    /// Result claimed for the reference customer in the first follow-up.
    #[serde(default = "default_case_study_result")]
    pub case_study_result: String,

    /// Resource link shared in the final follow-up.
    #[serde(default = "default_resource_link")]
    pub resource_link: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            address: None,
            password: None,
            sender_name: default_sender_name(),
            daily_limit: default_email_daily_limit(),
            value_prop: default_value_prop(),
            case_study_company: default_case_study_company(),
            case_study_result: default_case_study_result(),
            resource_link: default_resource_link(),
        }
    }
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    465
}

fn default_sender_name() -> String {
    "The Dripflow Team".to_string()
}

fn default_email_daily_limit() -> u32 {
    50
}

fn default_value_prop() -> String {
    "increase revenue by 30%".to_string()
}

fn default_case_study_company() -> String {
    "Northwind Traders".to_string()
}

fn default_case_study_result() -> String {
    "40% growth".to_string()
}

fn default_resource_link() -> String {
    "https://dripflow.dev/playbook".to_string()
}

/// Facebook Graph API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FacebookConfig {
    /// Meta Graph API access token. `None` disables the Facebook channel.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Facebook page id to publish to.
    #[serde(default)]
    pub page_id: Option<String>,

    /// Maximum successful publishes per day.
    #[serde(default = "default_social_daily_limit")]
    pub daily_limit: u32,
}

impl Default for FacebookConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            page_id: None,
            daily_limit: default_social_daily_limit(),
        }
    }
}

/// Instagram Graph API configuration (business account).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InstagramConfig {
    /// Meta Graph API access token. `None` disables the Instagram channel.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Instagram business account id to publish from.
    #[serde(default)]
    pub account_id: Option<String>,

    /// Maximum successful publishes per day.
    #[serde(default = "default_social_daily_limit")]
    pub daily_limit: u32,
}

impl Default for InstagramConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            account_id: None,
            daily_limit: default_social_daily_limit(),
        }
    }
}

fn default_social_daily_limit() -> u32 {
    25
}

/// LinkedIn configuration. Declared but unimplemented; kept so existing
/// deployments carrying these keys keep loading.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LinkedinConfig {
    /// LinkedIn API access token.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Member URN to publish as.
    #[serde(default)]
    pub person_urn: Option<String>,

    /// Organization URN to publish as.
    #[serde(default)]
    pub organization_urn: Option<String>,

    /// Maximum successful publishes per day.
    #[serde(default = "default_linkedin_daily_limit")]
    pub daily_limit: u32,
}

impl Default for LinkedinConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            person_urn: None,
            organization_urn: None,
            daily_limit: default_linkedin_daily_limit(),
        }
    }
}

fn default_linkedin_daily_limit() -> u32 {
    10
}

/// Campaign tick schedule.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Local time of the daily sales tick ("HH:MM").
    #[serde(default = "default_sales_time")]
    pub sales_time: String,

    /// Minutes between social publishing ticks.
    #[serde(default = "default_social_interval_minutes")]
    pub social_interval_minutes: u32,

    /// Local time of the daily metrics collection pass ("HH:MM").
    #[serde(default = "default_metrics_time")]
    pub metrics_time: String,

    /// Local time of the daily quota counter reset ("HH:MM").
    #[serde(default = "default_quota_reset_time")]
    pub quota_reset_time: String,

    /// Seconds slept between successive email sends within one tick.
    #[serde(default = "default_send_delay_secs")]
    pub send_delay_secs: u64,

    /// Seconds slept between successive social dispatches within one tick.
    #[serde(default = "default_dispatch_delay_secs")]
    pub dispatch_delay_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            sales_time: default_sales_time(),
            social_interval_minutes: default_social_interval_minutes(),
            metrics_time: default_metrics_time(),
            quota_reset_time: default_quota_reset_time(),
            send_delay_secs: default_send_delay_secs(),
            dispatch_delay_secs: default_dispatch_delay_secs(),
        }
    }
}

fn default_sales_time() -> String {
    "09:00".to_string()
}

fn default_social_interval_minutes() -> u32 {
    30
}

fn default_metrics_time() -> String {
    "18:00".to_string()
}

fn default_quota_reset_time() -> String {
    "00:00".to_string()
}

fn default_send_delay_secs() -> u64 {
    10
}

fn default_dispatch_delay_secs() -> u64 {
    2
}
