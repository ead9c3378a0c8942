// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Default quota, matching the usual browser local-storage allowance.
pub const DEFAULT_STORAGE_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one JSON file per collection
    pub data_dir: PathBuf,
    /// Total bytes allowed across all collections (None = unlimited)
    pub storage_quota_bytes: Option<usize>,
    /// Seed the exercise catalog when it is empty
    pub seed_exercises: bool,
    /// Bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS (localhost is always allowed)
    pub frontend_url: String,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            data_dir: PathBuf::from("./test-data"),
            storage_quota_bytes: None,
            seed_exercises: true,
            host: "127.0.0.1".to_string(),
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let quota: usize = parse_var("STORAGE_QUOTA_BYTES", DEFAULT_STORAGE_QUOTA_BYTES)?;

        Ok(Self {
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            // 0 disables the quota
            storage_quota_bytes: (quota > 0).then_some(quota),
            seed_exercises: parse_var("SEED_EXERCISES", true)?,
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 8080)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        })
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
