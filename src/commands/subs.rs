// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;

use crate::aggregate::monthly_price;
use crate::catalog::{self, PRESETS};
use crate::currency::{fmt_money, parse_currency};
use crate::models::{BillingCycle, Category, CategoryFilter, SortOption, Subscription};
use crate::reminders::{LocalReminderScheduler, cancel_reminders, schedule_trial_reminders};
use crate::store::{KeyValueStore, load_preferences, load_subscriptions};
use crate::subscriptions::{self, SubscriptionPatch, TrialChange, view};
use crate::utils::{
    arg, maybe_print_json, opt_arg, parse_date, parse_price, parse_symbol, pretty_table,
};

pub fn handle(store: &mut dyn KeyValueStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("show", sub)) => show(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => remove(store, sub)?,
        Some(("presets", sub)) => presets(sub)?,
        _ => {}
    }
    Ok(())
}

fn add(store: &mut dyn KeyValueStore, sub: &clap::ArgMatches) -> Result<()> {
    let preset = match opt_arg(sub, "preset") {
        Some(id) => Some(
            catalog::preset(id)
                .with_context(|| format!("Unknown preset '{}' (see `sub presets`)", id))?,
        ),
        None => None,
    };
    let prefs = load_preferences(&*store)?;
    let currency = match opt_arg(sub, "currency") {
        Some(c) => parse_symbol(c)?,
        None => parse_currency(&prefs.currency).unwrap_or("$"),
    };
    let name = match (opt_arg(sub, "name"), preset) {
        (Some(n), _) => n.to_string(),
        (None, Some(p)) => p.name.to_string(),
        (None, None) => bail!("--name is required"),
    };
    let price = match (opt_arg(sub, "price"), preset) {
        (Some(p), _) => parse_price(p)?,
        (None, Some(p)) => p
            .price_in(currency)
            .with_context(|| format!("{} has no {} price; pass --price", p.name, currency))?,
        (None, None) => bail!("--price is required"),
    };
    let cycle = opt_arg(sub, "cycle")
        .unwrap_or("monthly")
        .parse::<BillingCycle>()?;
    let start = match opt_arg(sub, "start") {
        Some(s) => parse_date(s)?,
        None => Local::now().date_naive(),
    };

    let mut rec = Subscription::new(&name, price, currency, cycle, start);
    rec.category = match opt_arg(sub, "category") {
        Some(c) => c.parse::<Category>()?,
        None => preset.map(|p| p.category).unwrap_or_default(),
    };
    rec.cancellation_url = opt_arg(sub, "cancel-url")
        .map(str::to_string)
        .or_else(|| preset.map(|p| p.cancellation_url.to_string()));
    rec.theme_color = opt_arg(sub, "color")
        .map(str::to_string)
        .or_else(|| preset.map(|p| p.color.to_string()));
    if let Some(end) = opt_arg(sub, "trial-end") {
        rec.is_free_trial = true;
        rec.trial_end_date = Some(parse_date(end)?);
        rec.remind_me = !sub.get_flag("no-remind");
    }
    rec.validate()
        .with_context(|| format!("Invalid subscription '{}'", rec.name))?;

    let mut rec = subscriptions::add(store, rec)?;
    if let (true, Some(end)) = (rec.remind_me, rec.trial_end_date) {
        let mut sched = LocalReminderScheduler::new(store);
        let ids =
            schedule_trial_reminders(&mut sched, &rec.name, end, Local::now().naive_local())?;
        let patch = SubscriptionPatch {
            notification_ids: Some(ids.clone()),
            ..Default::default()
        };
        if let Err(e) = subscriptions::update(store, &rec.id, &patch) {
            let mut sched = LocalReminderScheduler::new(store);
            cancel_reminders(&mut sched, &ids)?;
            return Err(e);
        }
        rec.notification_ids = ids;
    }
    println!(
        "Added '{}' at {} {} (id: {})",
        rec.name,
        fmt_money(rec.price, &rec.currency),
        rec.billing_cycle,
        rec.id
    );
    if !rec.notification_ids.is_empty() {
        println!(
            "Scheduled {} trial reminder(s)",
            rec.notification_ids.len()
        );
    }
    Ok(())
}

fn list(store: &mut dyn KeyValueStore, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let prefs = load_preferences(&*store)?;
    let sort = match opt_arg(sub, "sort") {
        Some(s) => s.parse::<SortOption>()?,
        None => prefs.sort_option,
    };
    let filter = match opt_arg(sub, "category") {
        Some(c) => c.parse::<CategoryFilter>()?,
        None => prefs.filter_category,
    };
    let records = load_subscriptions(&*store)?;
    let rows = view(
        &records,
        sort,
        filter,
        &prefs.currency,
        &prefs.exchange_rates,
    );
    if maybe_print_json(json_flag, jsonl_flag, &rows)? {
        return Ok(());
    }
    if rows.is_empty() {
        println!("No subscriptions yet. Add one with `subtracker sub add`.");
        return Ok(());
    }
    let now = Local::now().naive_local();
    let data = rows
        .iter()
        .map(|r| {
            let status = if r.is_trial_ending_soon(now) {
                "trial, ending soon!"
            } else if r.is_free_trial {
                "trial"
            } else {
                "active"
            };
            vec![
                r.name.clone(),
                fmt_money(r.price, &r.currency),
                r.billing_cycle.to_string(),
                r.category.to_string(),
                fmt_money(
                    monthly_price(r, &prefs.currency, &prefs.exchange_rates),
                    &prefs.currency,
                ),
                r.next_billing_date(now.date()).to_string(),
                status.to_string(),
                r.id.clone(),
            ]
        })
        .collect();
    let monthly_hdr = format!("Monthly ({})", prefs.currency);
    println!(
        "{}",
        pretty_table(
            &[
                "Name",
                "Price",
                "Cycle",
                "Category",
                &monthly_hdr,
                "Next charge",
                "Status",
                "ID"
            ],
            data,
        )
    );
    Ok(())
}

fn show(store: &mut dyn KeyValueStore, sub: &clap::ArgMatches) -> Result<()> {
    let rec = subscriptions::get(&*store, arg(sub, "id")?)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rec)? {
        return Ok(());
    }
    let today = Local::now().date_naive();
    let mut data = vec![
        vec!["Name".to_string(), rec.name.clone()],
        vec!["Price".into(), fmt_money(rec.price, &rec.currency)],
        vec!["Cycle".into(), rec.billing_cycle.to_string()],
        vec!["Category".into(), rec.category.to_string()],
        vec!["Start date".into(), rec.start_date.to_string()],
        vec![
            "Next charge".into(),
            rec.next_billing_date(today).to_string(),
        ],
    ];
    if rec.is_free_trial {
        data.push(vec![
            "Trial ends on".into(),
            rec.trial_end_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".into()),
        ]);
        data.push(vec![
            "Reminders".into(),
            format!("{} scheduled", rec.notification_ids.len()),
        ]);
    }
    if let Some(url) = &rec.cancellation_url {
        data.push(vec!["Cancel at".into(), url.clone()]);
    }
    if let Some(color) = &rec.theme_color {
        data.push(vec!["Color".into(), color.clone()]);
    }
    data.push(vec!["ID".into(), rec.id.clone()]);
    println!("{}", pretty_table(&["Field", "Value"], data));
    Ok(())
}

fn edit(store: &mut dyn KeyValueStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = arg(sub, "id")?;
    let mut patch = SubscriptionPatch {
        name: opt_arg(sub, "name").map(str::to_string),
        price: opt_arg(sub, "price").map(parse_price).transpose()?,
        currency: opt_arg(sub, "currency")
            .map(parse_symbol)
            .transpose()?
            .map(str::to_string),
        billing_cycle: opt_arg(sub, "cycle")
            .map(|s| s.parse::<BillingCycle>())
            .transpose()?,
        category: opt_arg(sub, "category")
            .map(|s| s.parse::<Category>())
            .transpose()?,
        start_date: opt_arg(sub, "start").map(parse_date).transpose()?,
        ..Default::default()
    };
    patch.trial = if sub.get_flag("end-trial") {
        Some(TrialChange::Clear)
    } else {
        opt_arg(sub, "trial-end")
            .map(parse_date)
            .transpose()?
            .map(TrialChange::Until)
    };
    patch.remind_me = if sub.get_flag("remind") {
        Some(true)
    } else if sub.get_flag("no-remind") {
        Some(false)
    } else {
        None
    };
    patch.cancellation_url = if sub.get_flag("clear-cancel-url") {
        Some(None)
    } else {
        opt_arg(sub, "cancel-url").map(|u| Some(u.to_string()))
    };
    patch.theme_color = if sub.get_flag("clear-color") {
        Some(None)
    } else {
        opt_arg(sub, "color").map(|c| Some(c.to_string()))
    };
    if patch.is_empty() {
        return Err(anyhow!("Nothing to change for '{}'", id));
    }

    let before = subscriptions::get(&*store, id)?;
    let mut after = before.clone();
    patch.apply(&mut after);
    after
        .validate()
        .with_context(|| format!("Invalid subscription '{}'", after.name))?;

    let reminders_stale = after.trial_end_date != before.trial_end_date
        || after.remind_me != before.remind_me
        || (after.remind_me && after.name != before.name);
    if reminders_stale {
        let mut sched = LocalReminderScheduler::new(store);
        cancel_reminders(&mut sched, &before.notification_ids)?;
        let ids = match (after.remind_me, after.trial_end_date) {
            (true, Some(end)) => {
                schedule_trial_reminders(&mut sched, &after.name, end, Local::now().naive_local())?
            }
            _ => Vec::new(),
        };
        patch.notification_ids = Some(ids);
    }

    let updated = subscriptions::update(store, id, &patch)?;
    println!("Updated '{}' (id: {})", updated.name, updated.id);
    Ok(())
}

fn remove(store: &mut dyn KeyValueStore, sub: &clap::ArgMatches) -> Result<()> {
    let removed = subscriptions::delete(store, arg(sub, "id")?)?;
    let mut sched = LocalReminderScheduler::new(store);
    cancel_reminders(&mut sched, &removed.notification_ids)?;
    println!("Removed '{}'", removed.name);
    Ok(())
}

fn presets(sub: &clap::ArgMatches) -> Result<()> {
    let data: Vec<Vec<String>> = PRESETS
        .iter()
        .map(|p| {
            let prices = p
                .prices()
                .map(|(sym, price)| fmt_money(price, sym))
                .collect::<Vec<_>>()
                .join("  ");
            vec![
                p.id.to_string(),
                p.name.to_string(),
                p.category.to_string(),
                prices,
            ]
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!(
            "{}",
            pretty_table(&["Preset", "Service", "Category", "Monthly prices"], data)
        );
    }
    Ok(())
}
