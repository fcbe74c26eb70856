// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_RATES_URL: &str = "https://api.exchangerate-api.com/v4/latest";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// Runtime settings read from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub rates_url: String,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Config::from_lookup(|k| std::env::var(k).ok())
    }

    /// Builds a config from any variable source; `SUBTRACKER_DB`,
    /// `SUBTRACKER_RATES_URL` and `SUBTRACKER_HTTP_TIMEOUT_SECS` are read.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = match lookup("SUBTRACKER_DB").filter(|s| !s.trim().is_empty()) {
            Some(p) => PathBuf::from(p.trim()),
            None => crate::db::db_path()?,
        };
        let rates_url = lookup("SUBTRACKER_RATES_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_RATES_URL.to_string());
        let secs = match lookup("SUBTRACKER_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().with_context(|| {
                format!("Invalid SUBTRACKER_HTTP_TIMEOUT_SECS '{}'", raw)
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };
        Ok(Config {
            db_path,
            rates_url,
            http_timeout: Duration::from_secs(secs),
        })
    }
}
