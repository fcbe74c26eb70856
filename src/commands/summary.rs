// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::summarize;
use crate::config::Config;
use crate::currency::fmt_money;
use crate::rates::{HttpRateSource, refresh};
use crate::store::{KeyValueStore, load_preferences, load_subscriptions};
use crate::utils::{maybe_print_json, opt_arg, parse_symbol, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;

pub fn handle(store: &mut dyn KeyValueStore, m: &clap::ArgMatches, config: &Config) -> Result<()> {
    if m.get_flag("refresh") {
        let source = HttpRateSource::new(config)?;
        if !refresh(store, &source)? {
            eprintln!("Could not refresh exchange rates; using the last known table.");
        }
    }
    let prefs = load_preferences(&*store)?;
    let target = match opt_arg(m, "currency") {
        Some(c) => parse_symbol(c)?.to_string(),
        None => prefs.currency.clone(),
    };
    let records = load_subscriptions(&*store)?;
    let summary = summarize(&records, &target, &prefs.exchange_rates);
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &summary)? {
        return Ok(());
    }

    let totals = vec![
        vec!["Monthly".to_string(), fmt_money(summary.monthly, &target)],
        vec!["Yearly".into(), fmt_money(summary.yearly, &target)],
        vec!["Active".into(), summary.active.to_string()],
        vec!["Free trials".into(), summary.trials.to_string()],
    ];
    println!("{}", pretty_table(&["Total", "Amount"], totals));

    if summary.categories.is_empty() {
        println!("Nothing to break down yet (free trials are not counted).");
        return Ok(());
    }
    let hundred = Decimal::from(100);
    let data = summary
        .categories
        .iter()
        .map(|c| {
            vec![
                c.category.to_string(),
                fmt_money(c.monthly, &target),
                format!("{:.0}%", (c.share * hundred).round()),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Monthly", "Share"], data)
    );
    Ok(())
}
