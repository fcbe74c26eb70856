// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashSet;
use std::io::Write;

use anyhow::Result;
use serde_json::Value;
use thiserror::Error;

use crate::models::Subscription;
use crate::reminders::{LocalReminderScheduler, cancel_reminders};
use crate::store::{KeyValueStore, load_subscriptions, save_subscriptions};

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("could not store restored records: {0:#}")]
    Store(anyhow::Error),
}

pub fn export_json(records: &[Subscription]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

pub fn export_csv<W: Write>(records: &[Subscription], out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record([
        "id",
        "name",
        "price",
        "currency",
        "billingCycle",
        "startDate",
        "category",
        "isFreeTrial",
        "trialEndDate",
        "cancellationUrl",
    ])?;
    for r in records {
        wtr.write_record([
            r.id.clone(),
            r.name.clone(),
            r.price.to_string(),
            r.currency.clone(),
            r.billing_cycle.to_string(),
            r.start_date.to_string(),
            r.category.to_string(),
            r.is_free_trial.to_string(),
            r.trial_end_date.map(|d| d.to_string()).unwrap_or_default(),
            r.cancellation_url.clone().unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Parses a backup without touching any store.
pub fn parse_backup(text: &str) -> Result<Vec<Subscription>, BackupError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| BackupError::InvalidData(format!("not JSON ({})", e)))?;
    if !value.is_array() {
        return Err(BackupError::InvalidData(
            "top-level value must be an array".to_string(),
        ));
    }
    serde_json::from_value(value)
        .map_err(|e| BackupError::InvalidData(format!("records do not decode ({})", e)))
}

/// Replaces the whole collection with the backup's records. Nothing is
/// written unless the entire text parses. Reminders owned by replaced records
/// are cancelled unless a restored record still refers to them.
pub fn restore_from_json(store: &mut dyn KeyValueStore, text: &str) -> Result<usize, BackupError> {
    let records = parse_backup(text)?;
    let previous = match load_subscriptions(&*store) {
        Ok(previous) => previous,
        Err(e) => {
            log::warn!("existing subscriptions unreadable, replacing them: {:#}", e);
            Vec::new()
        }
    };
    save_subscriptions(store, &records).map_err(BackupError::Store)?;

    let kept: HashSet<&str> = records
        .iter()
        .flat_map(|r| r.notification_ids.iter().map(String::as_str))
        .collect();
    let stale: Vec<String> = previous
        .into_iter()
        .flat_map(|r| r.notification_ids)
        .filter(|id| !kept.contains(id.as_str()))
        .collect();
    let mut sched = LocalReminderScheduler::new(store);
    cancel_reminders(&mut sched, &stale).map_err(BackupError::Store)?;

    log::info!("restored {} subscription(s) from backup", records.len());
    Ok(records.len())
}
