// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::{code_for_symbol, is_known_symbol};
use crate::models::{Preferences, Subscription};
use crate::store::{KeyValueStore, load_preferences, load_subscriptions};
use crate::utils::pretty_table;
use anyhow::Result;
use rust_decimal::Decimal;

pub fn handle(store: &mut dyn KeyValueStore) -> Result<()> {
    let records = load_subscriptions(&*store)?;
    let prefs = load_preferences(&*store)?;
    let rows = diagnose(&records, &prefs);
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// One `[issue, detail]` row per problem found.
pub fn diagnose(records: &[Subscription], prefs: &Preferences) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let label = |r: &Subscription| format!("{} ({})", r.name, r.id);

    for r in records {
        if r.name.trim().is_empty() {
            rows.push(vec!["empty_name".into(), r.id.clone()]);
        }
        if r.price < Decimal::ZERO {
            rows.push(vec!["negative_price".into(), format!("{} {}", label(r), r.price)]);
        }
        if r.is_free_trial && r.trial_end_date.is_none() {
            rows.push(vec!["trial_without_end_date".into(), label(r)]);
        }
        if !r.is_free_trial && r.trial_end_date.is_some() {
            rows.push(vec!["end_date_without_trial".into(), label(r)]);
        }
        // Unknown symbols silently count as USD
        if !is_known_symbol(&r.currency) {
            rows.push(vec![
                "unknown_currency".into(),
                format!("{} '{}'", label(r), r.currency),
            ]);
        } else if prefs.exchange_rates.get(code_for_symbol(&r.currency)).is_none() {
            rows.push(vec![
                "missing_fx".into(),
                format!("{} {}", label(r), code_for_symbol(&r.currency)),
            ]);
        }
    }

    let mut seen = std::collections::HashSet::new();
    for r in records {
        if !seen.insert(r.id.as_str()) {
            rows.push(vec!["duplicate_id".into(), r.id.clone()]);
        }
    }

    if !is_known_symbol(&prefs.currency) {
        rows.push(vec!["unknown_display_currency".into(), prefs.currency.clone()]);
    } else if prefs.exchange_rates.get(code_for_symbol(&prefs.currency)).is_none() {
        rows.push(vec![
            "missing_fx".into(),
            format!("display currency {}", code_for_symbol(&prefs.currency)),
        ]);
    }
    rows
}
