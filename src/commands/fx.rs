// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::currency::{REFERENCE_CODE, code_for_symbol, convert};
use crate::rates::{HttpRateSource, refresh};
use crate::store::{KeyValueStore, load_preferences};
use crate::utils::{arg, maybe_print_json, parse_decimal, parse_symbol, pretty_table};
use anyhow::Result;

pub fn handle(store: &mut dyn KeyValueStore, m: &clap::ArgMatches, config: &Config) -> Result<()> {
    match m.subcommand() {
        Some(("fetch", _)) => fetch_rates(store, config)?,
        Some(("list", sub)) => list_rates(store, sub)?,
        Some(("convert", sub)) => convert_amount(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn fetch_rates(store: &mut dyn KeyValueStore, config: &Config) -> Result<()> {
    let source = HttpRateSource::new(config)?;
    if refresh(store, &source)? {
        let prefs = load_preferences(&*store)?;
        println!(
            "Exchange rates refreshed ({} currencies per 1 {}).",
            prefs.exchange_rates.len(),
            REFERENCE_CODE
        );
    } else {
        println!("Could not refresh exchange rates; keeping the previous table.");
    }
    Ok(())
}

fn list_rates(store: &mut dyn KeyValueStore, sub: &clap::ArgMatches) -> Result<()> {
    let prefs = load_preferences(&*store)?;
    if maybe_print_json(
        sub.get_flag("json"),
        sub.get_flag("jsonl"),
        &prefs.exchange_rates,
    )? {
        return Ok(());
    }
    let data: Vec<Vec<String>> = prefs
        .exchange_rates
        .iter()
        .map(|(code, rate)| vec![code.to_string(), rate.to_string()])
        .collect();
    let hdr = format!("Per 1 {}", REFERENCE_CODE);
    println!("{}", pretty_table(&["Code", &hdr], data));
    match prefs.rates_updated_at {
        Some(t) => println!("Last refreshed {}", t.format("%Y-%m-%d %H:%M UTC")),
        None => println!("Built-in snapshot; run `subtracker fx fetch` to refresh."),
    }
    Ok(())
}

fn convert_amount(store: &mut dyn KeyValueStore, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(arg(sub, "amount")?)?;
    let from = parse_symbol(arg(sub, "from")?)?;
    let to = parse_symbol(arg(sub, "to")?)?;
    let prefs = load_preferences(&*store)?;
    let res = convert(amount, from, to, &prefs.exchange_rates);
    println!(
        "{} {} -> {:.4} {}",
        amount,
        code_for_symbol(from),
        res,
        code_for_symbol(to)
    );
    Ok(())
}
