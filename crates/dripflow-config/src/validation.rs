// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as parseable schedule times and non-empty store paths.

use chrono::NaiveTime;

use crate::diagnostic::ConfigError;
use crate::model::DripflowConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &DripflowConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    for (key, value) in [
        ("store.leads_path", &config.store.leads_path),
        ("store.posts_path", &config.store.posts_path),
        ("store.activity_log_path", &config.store.activity_log_path),
    ] {
        if value.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        }
    }

    for (key, value) in [
        ("schedule.sales_time", &config.schedule.sales_time),
        ("schedule.metrics_time", &config.schedule.metrics_time),
        ("schedule.quota_reset_time", &config.schedule.quota_reset_time),
    ] {
        if NaiveTime::parse_from_str(value, "%H:%M").is_err() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be a local time in HH:MM form, got `{value}`"),
            });
        }
    }

    if config.schedule.social_interval_minutes == 0 {
        errors.push(ConfigError::Validation {
            message: "schedule.social_interval_minutes must be at least 1".to_string(),
        });
    }

    if config.email.smtp_host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "email.smtp_host must not be empty".to_string(),
        });
    }

    // An address without a password (or vice versa) is a misconfiguration,
    // not a disabled channel.
    if config.email.address.is_some() != config.email.password.is_some() {
        errors.push(ConfigError::Validation {
            message: "email.address and email.password must be set together".to_string(),
        });
    }

    if config.facebook.access_token.is_some() != config.facebook.page_id.is_some() {
        errors.push(ConfigError::Validation {
            message: "facebook.access_token and facebook.page_id must be set together"
                .to_string(),
        });
    }

    if config.instagram.access_token.is_some() != config.instagram.account_id.is_some() {
        errors.push(ConfigError::Validation {
            message: "instagram.access_token and instagram.account_id must be set together"
                .to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
