// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./dripflow.toml` > `~/.config/dripflow/dripflow.toml`
//! > `/etc/dripflow/dripflow.toml` with environment variable overrides via
//! `DRIPFLOW_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::DripflowConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/dripflow/dripflow.toml` (system-wide)
/// 3. `~/.config/dripflow/dripflow.toml` (user XDG config)
/// 4. `./dripflow.toml` (local directory)
/// 5. `DRIPFLOW_*` environment variables
pub fn load_config() -> Result<DripflowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DripflowConfig::default()))
        .merge(Toml::file("/etc/dripflow/dripflow.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("dripflow/dripflow.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("dripflow.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<DripflowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DripflowConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DripflowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DripflowConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `DRIPFLOW_EMAIL_SMTP_HOST` must map to
/// `email.smtp_host`, not `email.smtp.host`.
fn env_provider() -> Env {
    Env::prefixed("DRIPFLOW_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: DRIPFLOW_EMAIL_DAILY_LIMIT -> "email_daily_limit"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("app_", "app.", 1)
            .replacen("store_", "store.", 1)
            .replacen("email_", "email.", 1)
            .replacen("facebook_", "facebook.", 1)
            .replacen("instagram_", "instagram.", 1)
            .replacen("linkedin_", "linkedin.", 1)
            .replacen("schedule_", "schedule.", 1);
        mapped.into()
    })
}
