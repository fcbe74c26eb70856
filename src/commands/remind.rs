// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Local;

use crate::reminders::{LocalReminderScheduler, Reminder, take_due};
use crate::store::KeyValueStore;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(store: &mut dyn KeyValueStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => {
            let mut pending = LocalReminderScheduler::new(store).pending()?;
            pending.sort_by(|a, b| a.fire_at.cmp(&b.fire_at));
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &pending)? {
                print_reminders(&pending, "No reminders scheduled.");
            }
        }
        Some(("due", sub)) => {
            let due = take_due(store, Local::now().naive_local())?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &due)? {
                print_reminders(&due, "Nothing due.");
            }
        }
        _ => {}
    }
    Ok(())
}

fn print_reminders(items: &[Reminder], empty: &str) {
    if items.is_empty() {
        println!("{}", empty);
        return;
    }
    let data = items
        .iter()
        .map(|r| {
            vec![
                r.fire_at.format("%Y-%m-%d %H:%M").to_string(),
                r.subscription_name.clone(),
                r.title.clone(),
                r.body.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["When", "Subscription", "Title", "Message"], data)
    );
}
