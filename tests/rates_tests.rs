// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, anyhow};
use rust_decimal::Decimal;
use subtracker::config::{Config, DEFAULT_RATES_URL};
use subtracker::models::ExchangeRateTable;
use subtracker::rates::{RateSource, refresh};
use subtracker::store::{MemoryStore, load_preferences, save_preferences};

struct Offline;

impl RateSource for Offline {
    fn fetch(&self, _base: &str) -> Result<HashMap<String, f64>> {
        Err(anyhow!("network unreachable"))
    }
}

struct Fixed(Vec<(&'static str, f64)>);

impl RateSource for Fixed {
    fn fetch(&self, base: &str) -> Result<HashMap<String, f64>> {
        assert_eq!(base, "USD");
        Ok(self.0.iter().map(|(c, r)| (c.to_string(), *r)).collect())
    }
}

#[test]
fn failed_refresh_keeps_previous_table() {
    let mut store = MemoryStore::new();
    let mut prefs = load_preferences(&store).unwrap();
    prefs.exchange_rates = ExchangeRateTable::from_pairs([("USD", 1.0), ("GBP", 0.8)]);
    save_preferences(&mut store, &prefs).unwrap();

    let changed = refresh(&mut store, &Offline).unwrap();
    assert!(!changed);
    assert_eq!(load_preferences(&store).unwrap(), prefs);
}

#[test]
fn successful_refresh_replaces_table_wholesale() {
    let mut store = MemoryStore::new();
    let changed = refresh(&mut store, &Fixed(vec![("USD", 1.0), ("JPY", 150.0)])).unwrap();
    assert!(changed);

    let prefs = load_preferences(&store).unwrap();
    assert_eq!(prefs.exchange_rates.len(), 2);
    assert_eq!(prefs.exchange_rates.get("JPY"), Some(150.0));
    // Codes from the old table are gone
    assert_eq!(prefs.exchange_rates.get("TRY"), None);
    assert!(prefs.rates_updated_at.is_some());
}

#[test]
fn unusable_rates_fall_back_to_one() {
    let t = ExchangeRateTable::from_pairs([("EUR", 0.0), ("GBP", -2.0), ("JPY", f64::NAN)]);
    assert_eq!(t.rate("EUR"), Decimal::ONE);
    assert_eq!(t.rate("GBP"), Decimal::ONE);
    assert_eq!(t.rate("JPY"), Decimal::ONE);
    assert_eq!(t.rate("CNY"), Decimal::ONE);
    assert_eq!(
        ExchangeRateTable::default().rate("TRY"),
        Decimal::new(30, 0)
    );
}

#[test]
fn config_defaults_without_environment() {
    let cfg = Config::from_lookup(|k| match k {
        "SUBTRACKER_DB" => Some("/tmp/subs.sqlite".to_string()),
        _ => None,
    })
    .unwrap();
    assert_eq!(cfg.db_path, PathBuf::from("/tmp/subs.sqlite"));
    assert_eq!(cfg.rates_url, DEFAULT_RATES_URL);
    assert_eq!(cfg.http_timeout, Duration::from_secs(15));
}

#[test]
fn config_overrides() {
    let cfg = Config::from_lookup(|k| match k {
        "SUBTRACKER_DB" => Some("db.sqlite".to_string()),
        "SUBTRACKER_RATES_URL" => Some("http://localhost:8080/rates/".to_string()),
        "SUBTRACKER_HTTP_TIMEOUT_SECS" => Some(" 3 ".to_string()),
        _ => None,
    })
    .unwrap();
    assert_eq!(cfg.rates_url, "http://localhost:8080/rates");
    assert_eq!(cfg.http_timeout, Duration::from_secs(3));
}

#[test]
fn config_rejects_bad_timeout() {
    let err = Config::from_lookup(|k| match k {
        "SUBTRACKER_DB" => Some("db.sqlite".to_string()),
        "SUBTRACKER_HTTP_TIMEOUT_SECS" => Some("soon".to_string()),
        _ => None,
    })
    .unwrap_err();
    assert!(err.to_string().contains("SUBTRACKER_HTTP_TIMEOUT_SECS"));
}
