// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Dripflow campaign engine.

use thiserror::Error;

/// The primary error type used across Dripflow traits and core operations.
#[derive(Debug, Error)]
pub enum DripflowError {
    /// Configuration errors (invalid TOML, missing credentials, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Record store errors (file I/O, malformed rows, write failure).
    #[error("store error: {source}")]
    Store {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel client errors (transport failure, API rejection, local
    /// precondition violations such as a missing media reference).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A scheduled row names a platform with no publish path.
    #[error("unsupported platform: {platform}")]
    UnsupportedPlatform { platform: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
