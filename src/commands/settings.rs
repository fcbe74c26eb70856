// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};

use crate::models::{CategoryFilter, LANGUAGES, SortOption, default_currency_for_language};
use crate::store::{KeyValueStore, load_preferences, save_preferences};
use crate::utils::{arg, maybe_print_json, parse_symbol, pretty_table};

pub fn handle(store: &mut dyn KeyValueStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(store, sub)?,
        Some(("currency", sub)) => {
            let symbol = parse_symbol(arg(sub, "value")?)?;
            let mut prefs = load_preferences(&*store)?;
            prefs.currency = symbol.to_string();
            save_preferences(store, &prefs)?;
            println!("Display currency set to {}", symbol);
        }
        Some(("language", sub)) => {
            let lang = arg(sub, "value")?.to_lowercase();
            let currency = default_currency_for_language(&lang).ok_or_else(|| {
                anyhow!(
                    "Unsupported language '{}' (use {})",
                    lang,
                    LANGUAGES.join("|")
                )
            })?;
            let mut prefs = load_preferences(&*store)?;
            prefs.language = lang.clone();
            prefs.currency = currency.to_string();
            save_preferences(store, &prefs)?;
            println!("Language set to {} (display currency {})", lang, currency);
        }
        Some(("biometric", sub)) => {
            let enabled = match arg(sub, "value")?.to_lowercase().as_str() {
                "on" | "true" | "yes" => true,
                "off" | "false" | "no" => false,
                other => return Err(anyhow!("Expected on|off, got '{}'", other)),
            };
            let mut prefs = load_preferences(&*store)?;
            prefs.is_biometric_enabled = enabled;
            save_preferences(store, &prefs)?;
            println!("App lock {}", if enabled { "enabled" } else { "disabled" });
        }
        Some(("onboarding", _)) => {
            complete_onboarding(store)?;
            println!("Onboarding marked as complete");
        }
        Some(("sort", sub)) => {
            let sort = arg(sub, "value")?.parse::<SortOption>()?;
            let mut prefs = load_preferences(&*store)?;
            prefs.sort_option = sort;
            save_preferences(store, &prefs)?;
            println!("Lists now sorted by {}", sort);
        }
        Some(("filter", sub)) => {
            let filter = arg(sub, "value")?.parse::<CategoryFilter>()?;
            let mut prefs = load_preferences(&*store)?;
            prefs.filter_category = filter;
            save_preferences(store, &prefs)?;
            println!("Lists now show category {}", filter);
        }
        _ => {}
    }
    Ok(())
}

pub fn complete_onboarding(store: &mut dyn KeyValueStore) -> Result<()> {
    let mut prefs = load_preferences(&*store)?;
    if !prefs.has_completed_onboarding {
        prefs.has_completed_onboarding = true;
        save_preferences(store, &prefs)?;
    }
    Ok(())
}

fn show(store: &mut dyn KeyValueStore, sub: &clap::ArgMatches) -> Result<()> {
    let prefs = load_preferences(&*store)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &prefs)? {
        return Ok(());
    }
    let yes_no = |b: bool| if b { "yes" } else { "no" }.to_string();
    let data = vec![
        vec!["Display currency".to_string(), prefs.currency.clone()],
        vec!["Language".into(), prefs.language.clone()],
        vec!["App lock".into(), yes_no(prefs.is_biometric_enabled)],
        vec!["Onboarding done".into(), yes_no(prefs.has_completed_onboarding)],
        vec!["Sort".into(), prefs.sort_option.to_string()],
        vec!["Filter".into(), prefs.filter_category.to_string()],
        vec![
            "Exchange rates".into(),
            format!("{} currencies", prefs.exchange_rates.len()),
        ],
        vec![
            "Rates updated".into(),
            prefs
                .rates_updated_at
                .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| "never (built-in defaults)".into()),
        ],
    ];
    println!("{}", pretty_table(&["Setting", "Value"], data));
    Ok(())
}
