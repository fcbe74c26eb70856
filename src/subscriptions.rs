// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::aggregate::monthly_price;
use crate::models::{
    BillingCycle, Category, CategoryFilter, ExchangeRateTable, SortOption, Subscription,
};
use crate::store::{KeyValueStore, load_subscriptions, save_subscriptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialChange {
    Until(NaiveDate),
    Clear,
}

/// Field-wise edit; `None` leaves a field alone. For the optional text
/// fields, `Some(None)` clears them.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionPatch {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub billing_cycle: Option<BillingCycle>,
    pub category: Option<Category>,
    pub start_date: Option<NaiveDate>,
    pub trial: Option<TrialChange>,
    pub remind_me: Option<bool>,
    pub cancellation_url: Option<Option<String>>,
    pub theme_color: Option<Option<String>>,
    pub notification_ids: Option<Vec<String>>,
}

impl SubscriptionPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.currency.is_none()
            && self.billing_cycle.is_none()
            && self.category.is_none()
            && self.start_date.is_none()
            && self.trial.is_none()
            && self.remind_me.is_none()
            && self.cancellation_url.is_none()
            && self.theme_color.is_none()
            && self.notification_ids.is_none()
    }

    pub fn apply(&self, rec: &mut Subscription) {
        if let Some(name) = &self.name {
            rec.name = name.trim().to_string();
        }
        if let Some(price) = self.price {
            rec.price = price;
        }
        if let Some(currency) = &self.currency {
            rec.currency = currency.clone();
        }
        if let Some(cycle) = self.billing_cycle {
            rec.billing_cycle = cycle;
        }
        if let Some(category) = self.category {
            rec.category = category;
        }
        if let Some(start) = self.start_date {
            rec.start_date = start;
        }
        match self.trial {
            Some(TrialChange::Until(end)) => {
                rec.is_free_trial = true;
                rec.trial_end_date = Some(end);
            }
            Some(TrialChange::Clear) => {
                rec.is_free_trial = false;
                rec.trial_end_date = None;
                rec.remind_me = false;
            }
            None => {}
        }
        if let Some(remind) = self.remind_me {
            rec.remind_me = remind && rec.is_free_trial;
        }
        if let Some(url) = &self.cancellation_url {
            rec.cancellation_url = url.clone();
        }
        if let Some(color) = &self.theme_color {
            rec.theme_color = color.clone();
        }
        if let Some(ids) = &self.notification_ids {
            rec.notification_ids = ids.clone();
        }
    }
}

pub fn find<'a>(records: &'a [Subscription], id: &str) -> Option<&'a Subscription> {
    records.iter().find(|r| r.id == id)
}

pub fn get(store: &dyn KeyValueStore, id: &str) -> Result<Subscription> {
    let records = load_subscriptions(store)?;
    find(&records, id)
        .cloned()
        .ok_or_else(|| anyhow!("Subscription '{}' not found", id))
}

pub fn add(store: &mut dyn KeyValueStore, record: Subscription) -> Result<Subscription> {
    record
        .validate()
        .with_context(|| format!("Invalid subscription '{}'", record.name))?;
    let mut records = load_subscriptions(store)?;
    if find(&records, &record.id).is_some() {
        return Err(anyhow!("Subscription id '{}' already exists", record.id));
    }
    records.push(record.clone());
    save_subscriptions(store, &records)?;
    log::info!("added subscription {} ({})", record.id, record.name);
    Ok(record)
}

pub fn update(
    store: &mut dyn KeyValueStore,
    id: &str,
    patch: &SubscriptionPatch,
) -> Result<Subscription> {
    let mut records = load_subscriptions(store)?;
    let rec = records
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| anyhow!("Subscription '{}' not found", id))?;
    patch.apply(rec);
    rec.validate()
        .with_context(|| format!("Invalid subscription '{}'", rec.name))?;
    let updated = rec.clone();
    save_subscriptions(store, &records)?;
    log::info!("updated subscription {}", id);
    Ok(updated)
}

/// Removes a record and hands it back so its reminders can be cancelled.
pub fn delete(store: &mut dyn KeyValueStore, id: &str) -> Result<Subscription> {
    let mut records = load_subscriptions(store)?;
    let pos = records
        .iter()
        .position(|r| r.id == id)
        .ok_or_else(|| anyhow!("Subscription '{}' not found", id))?;
    let removed = records.remove(pos);
    save_subscriptions(store, &records)?;
    log::info!("deleted subscription {} ({})", removed.id, removed.name);
    Ok(removed)
}

/// Filtered and sorted copy for display; storage order is never relied on.
pub fn view(
    records: &[Subscription],
    sort: SortOption,
    filter: CategoryFilter,
    target: &str,
    rates: &ExchangeRateTable,
) -> Vec<Subscription> {
    let mut out: Vec<Subscription> = records
        .iter()
        .filter(|r| filter.matches(r.category))
        .cloned()
        .collect();
    let by_name = |a: &Subscription, b: &Subscription| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    };
    match sort {
        SortOption::Name => out.sort_by(by_name),
        SortOption::Date => {
            out.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| by_name(a, b)))
        }
        SortOption::Price => {
            let mut keyed: Vec<(Decimal, Subscription)> = out
                .into_iter()
                .map(|r| (monthly_price(&r, target, rates), r))
                .collect();
            keyed.sort_by(|(pa, a), (pb, b)| pb.cmp(pa).then_with(|| by_name(a, b)));
            out = keyed.into_iter().map(|(_, r)| r).collect();
        }
    }
    out
}
