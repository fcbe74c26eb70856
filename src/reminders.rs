// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::store::{KeyValueStore, REMINDERS_KEY};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub subscription_name: String,
    pub title: String,
    pub body: String,
    pub fire_at: NaiveDateTime,
}

pub trait ReminderScheduler {
    /// Queues a reminder and returns its handle.
    fn schedule(
        &mut self,
        subscription_name: &str,
        title: &str,
        body: &str,
        fire_at: NaiveDateTime,
    ) -> Result<String>;
    /// Unknown handles are ignored.
    fn cancel(&mut self, ids: &[String]) -> Result<()>;
}

/// Reminder queue kept in the application store.
pub struct LocalReminderScheduler<'a> {
    store: &'a mut dyn KeyValueStore,
}

impl<'a> LocalReminderScheduler<'a> {
    pub fn new(store: &'a mut dyn KeyValueStore) -> Self {
        LocalReminderScheduler { store }
    }

    pub fn pending(&self) -> Result<Vec<Reminder>> {
        load_queue(&*self.store)
    }
}

impl ReminderScheduler for LocalReminderScheduler<'_> {
    fn schedule(
        &mut self,
        subscription_name: &str,
        title: &str,
        body: &str,
        fire_at: NaiveDateTime,
    ) -> Result<String> {
        let mut queue = load_queue(&*self.store)?;
        let id = uuid::Uuid::new_v4().to_string();
        queue.push(Reminder {
            id: id.clone(),
            subscription_name: subscription_name.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            fire_at,
        });
        save_queue(self.store, &queue)?;
        log::info!("scheduled reminder {} for {} at {}", id, subscription_name, fire_at);
        Ok(id)
    }

    fn cancel(&mut self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let mut queue = load_queue(&*self.store)?;
        let before = queue.len();
        queue.retain(|r| !ids.contains(&r.id));
        if queue.len() != before {
            save_queue(self.store, &queue)?;
        }
        log::info!("cancelled {} reminder(s)", before - queue.len());
        Ok(())
    }
}

fn load_queue(store: &dyn KeyValueStore) -> Result<Vec<Reminder>> {
    match store.get(REMINDERS_KEY)? {
        Some(raw) => serde_json::from_str(&raw).context("Stored reminders are corrupt"),
        None => Ok(Vec::new()),
    }
}

fn save_queue(store: &mut dyn KeyValueStore, queue: &[Reminder]) -> Result<()> {
    let raw = serde_json::to_string(queue)?;
    store.set(REMINDERS_KEY, &raw)
}

/// Schedules the 24h and 2h trial warnings that are still in the future.
/// The trial ends at the start of `trial_end`.
pub fn schedule_trial_reminders(
    scheduler: &mut dyn ReminderScheduler,
    name: &str,
    trial_end: NaiveDate,
    now: NaiveDateTime,
) -> Result<Vec<String>> {
    let Some(ends_at) = trial_end.and_hms_opt(0, 0, 0) else {
        return Ok(Vec::new());
    };
    let plan = [
        (
            Duration::hours(24),
            "Trial Ending Soon!".to_string(),
            format!("Your free trial for {} ends in 24 hours.", name),
        ),
        (
            Duration::hours(2),
            "Urgent: Trial Expiring!".to_string(),
            format!(
                "Your free trial for {} ends in 2 hours! Cancel now if needed.",
                name
            ),
        ),
    ];
    let mut ids = Vec::new();
    for (lead, title, body) in plan {
        let fire_at = ends_at - lead;
        if fire_at > now {
            ids.push(scheduler.schedule(name, &title, &body, fire_at)?);
        }
    }
    Ok(ids)
}

pub fn cancel_reminders(scheduler: &mut dyn ReminderScheduler, ids: &[String]) -> Result<()> {
    scheduler.cancel(ids)
}

/// Removes and returns every reminder whose time has come, oldest first.
pub fn take_due(store: &mut dyn KeyValueStore, now: NaiveDateTime) -> Result<Vec<Reminder>> {
    let queue = load_queue(&*store)?;
    let (mut due, rest): (Vec<Reminder>, Vec<Reminder>) =
        queue.into_iter().partition(|r| r.fire_at <= now);
    if !due.is_empty() {
        save_queue(store, &rest)?;
    }
    due.sort_by(|a, b| a.fire_at.cmp(&b.fire_at));
    Ok(due)
}
