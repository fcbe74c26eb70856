// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use serde::Deserialize;

use crate::config::Config;
use crate::currency::REFERENCE_CODE;
use crate::models::ExchangeRateTable;
use crate::store::{KeyValueStore, load_preferences, save_preferences};
use crate::utils::http_client;

pub trait RateSource {
    /// Units of each currency per one `base`.
    fn fetch(&self, base: &str) -> Result<HashMap<String, f64>>;
}

#[derive(Debug, Deserialize)]
struct LatestRates {
    rates: HashMap<String, f64>,
    #[serde(rename = "base")]
    _base: Option<String>,
    #[serde(rename = "date")]
    _date: Option<String>,
}

pub struct HttpRateSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpRateSource {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(HttpRateSource {
            client: http_client(config.http_timeout)?,
            base_url: config.rates_url.clone(),
        })
    }
}

impl RateSource for HttpRateSource {
    fn fetch(&self, base: &str) -> Result<HashMap<String, f64>> {
        let url = format!("{}/{}", self.base_url, base);
        let resp = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("GET {}", url))?
            .error_for_status()?;
        let body: LatestRates = resp.json().context("Malformed rates response")?;
        if body.rates.is_empty() {
            return Err(anyhow!("Rates response from {} was empty", url));
        }
        Ok(body.rates)
    }
}

/// Replaces the stored rate table with a fresh USD snapshot. Any failure
/// keeps the previous table and is only logged. Returns whether it changed.
pub fn refresh(store: &mut dyn KeyValueStore, source: &dyn RateSource) -> Result<bool> {
    let fetched = match source.fetch(REFERENCE_CODE) {
        Ok(rates) => rates,
        Err(e) => {
            log::warn!("exchange-rate refresh failed, keeping last table: {:#}", e);
            return Ok(false);
        }
    };
    let mut prefs = load_preferences(&*store)?;
    prefs.exchange_rates = ExchangeRateTable::new(fetched);
    prefs.rates_updated_at = Some(Utc::now());
    save_preferences(store, &prefs)?;
    log::info!("exchange rates replaced ({} codes)", prefs.exchange_rates.len());
    Ok(true)
}
