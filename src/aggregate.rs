// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Monthly and yearly spend figures in a chosen display currency.
//!
//! Every function here is total: unknown symbols fall back to USD and missing
//! rates fall back to 1, so malformed data skews a figure instead of failing.
//! Figures too large for a `Decimal` saturate at `Decimal::MAX`.
//! Free trials are not a cost yet and contribute nothing.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::currency::convert;
use crate::models::{BillingCycle, Category, ExchangeRateTable, Subscription};

/// Average weeks per month.
fn weeks_per_month() -> Decimal {
    Decimal::new(433, 2)
}

/// Monthly equivalent of the plan price, whether or not it is still a trial.
pub fn monthly_price(record: &Subscription, target: &str, rates: &ExchangeRateTable) -> Decimal {
    let monthly = match record.billing_cycle {
        BillingCycle::Weekly => record.price.saturating_mul(weeks_per_month()),
        BillingCycle::Monthly => record.price,
        BillingCycle::Yearly => record.price / Decimal::from(12),
    };
    convert(monthly, &record.currency, target, rates)
}

pub fn normalize_to_monthly(
    record: &Subscription,
    target: &str,
    rates: &ExchangeRateTable,
) -> Decimal {
    if record.is_free_trial {
        return Decimal::ZERO;
    }
    monthly_price(record, target, rates)
}

pub fn normalize_to_yearly(
    record: &Subscription,
    target: &str,
    rates: &ExchangeRateTable,
) -> Decimal {
    if record.is_free_trial {
        return Decimal::ZERO;
    }
    let yearly = match record.billing_cycle {
        BillingCycle::Weekly => record.price.saturating_mul(Decimal::from(52)),
        BillingCycle::Monthly => record.price.saturating_mul(Decimal::from(12)),
        BillingCycle::Yearly => record.price,
    };
    convert(yearly, &record.currency, target, rates)
}

pub fn total_monthly(records: &[Subscription], target: &str, rates: &ExchangeRateTable) -> Decimal {
    records
        .iter()
        .map(|r| normalize_to_monthly(r, target, rates))
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

pub fn total_yearly(records: &[Subscription], target: &str, rates: &ExchangeRateTable) -> Decimal {
    records
        .iter()
        .map(|r| normalize_to_yearly(r, target, rates))
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub monthly: Decimal,
    /// Fraction of the monthly total, in `0..=1`.
    pub share: Decimal,
}

/// Monthly cost per category, largest first. Empty when nothing costs money.
pub fn category_breakdown(
    records: &[Subscription],
    target: &str,
    rates: &ExchangeRateTable,
) -> Vec<CategoryShare> {
    let total = total_monthly(records, target, rates);
    if total.is_zero() {
        return Vec::new();
    }
    let mut by_category: BTreeMap<Category, Decimal> = BTreeMap::new();
    for r in records.iter().filter(|r| !r.is_free_trial) {
        let sum = by_category.entry(r.category).or_insert(Decimal::ZERO);
        *sum = sum.saturating_add(normalize_to_monthly(r, target, rates));
    }
    let mut shares: Vec<CategoryShare> = by_category
        .into_iter()
        .map(|(category, monthly)| CategoryShare {
            category,
            monthly,
            share: monthly.checked_div(total).unwrap_or(Decimal::ZERO),
        })
        .collect();
    // BTreeMap order already breaks ties by category; the sort is stable.
    shares.sort_by(|a, b| b.monthly.cmp(&a.monthly));
    shares
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub currency: String,
    pub monthly: Decimal,
    pub yearly: Decimal,
    pub active: usize,
    pub trials: usize,
    pub categories: Vec<CategoryShare>,
}

pub fn summarize(records: &[Subscription], target: &str, rates: &ExchangeRateTable) -> Summary {
    let trials = records.iter().filter(|r| r.is_free_trial).count();
    Summary {
        currency: target.to_string(),
        monthly: total_monthly(records, target, rates),
        yearly: total_yearly(records, target, rates),
        active: records.len() - trials,
        trials,
        categories: category_breakdown(records, target, rates),
    }
}
