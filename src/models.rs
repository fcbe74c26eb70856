// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, Duration, Months, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Weekly,
    Monthly,
    Yearly,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Weekly => "weekly",
            BillingCycle::Monthly => "monthly",
            BillingCycle::Yearly => "yearly",
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingCycle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(BillingCycle::Weekly),
            "monthly" => Ok(BillingCycle::Monthly),
            "yearly" => Ok(BillingCycle::Yearly),
            other => Err(anyhow!(
                "Invalid billing cycle '{}' (use weekly|monthly|yearly)",
                other
            )),
        }
    }
}

/// Spending category. Variant order is the display order used to break ties.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Category {
    Entertainment,
    Personal,
    Utilities,
    Work,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Entertainment,
        Category::Personal,
        Category::Utilities,
        Category::Work,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Entertainment => "Entertainment",
            Category::Personal => "Personal",
            Category::Utilities => "Utilities",
            Category::Work => "Work",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                anyhow!(
                    "Invalid category '{}' (use Entertainment|Personal|Utilities|Work|Other)",
                    s
                )
            })
    }
}

// Legacy records carry no category, or an explicit null.
fn category_or_other<'de, D: Deserializer<'de>>(d: D) -> Result<Category, D::Error> {
    Ok(Option::<Category>::deserialize(d)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    Name,
    Price,
    #[default]
    Date,
}

impl FromStr for SortOption {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortOption::Name),
            "price" => Ok(SortOption::Price),
            "date" => Ok(SortOption::Date),
            other => Err(anyhow!("Invalid sort option '{}' (use name|price|date)", other)),
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOption::Name => "name",
            SortOption::Price => "price",
            SortOption::Date => "date",
        })
    }
}

/// Category filter persisted as `"All"` or a category name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Only(s.parse()?))
        }
    }
}

impl TryFrom<String> for CategoryFilter {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<CategoryFilter> for String {
    fn from(f: CategoryFilter) -> Self {
        f.to_string()
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("All"),
            CategoryFilter::Only(c) => f.write_str(c.as_str()),
        }
    }
}

// An unknown category name falls back to showing everything.
fn filter_or_all<'de, D: Deserializer<'de>>(d: D) -> Result<CategoryFilter, D::Error> {
    let raw = serde_json::Value::deserialize(d)?;
    match raw.as_str().map(str::parse::<CategoryFilter>) {
        Some(Ok(filter)) => Ok(filter),
        None if raw.is_null() => Ok(CategoryFilter::All),
        _ => {
            log::warn!("ignoring stored category filter {}", raw);
            Ok(CategoryFilter::All)
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("price must not be negative (got {0})")]
    NegativePrice(Decimal),
    #[error("a free trial needs a trial end date")]
    MissingTrialEnd,
    #[error("trial end date is only allowed on free trials")]
    UnexpectedTrialEnd,
    #[error("invalid theme color '{0}', expected #RRGGBB")]
    InvalidColor(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub currency: String,
    pub billing_cycle: BillingCycle,
    #[serde(with = "iso_date")]
    pub start_date: NaiveDate,
    #[serde(default, deserialize_with = "category_or_other")]
    pub category: Category,
    #[serde(default)]
    pub is_free_trial: bool,
    #[serde(
        default,
        with = "iso_date_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub trial_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub remind_me: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "color")]
    pub theme_color: Option<String>,
    #[serde(default)]
    pub notification_ids: Vec<String>,
}

impl Subscription {
    /// A fresh non-trial record with a new id.
    pub fn new(
        name: &str,
        price: Decimal,
        currency: &str,
        billing_cycle: BillingCycle,
        start_date: NaiveDate,
    ) -> Self {
        Subscription {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            price,
            currency: currency.to_string(),
            billing_cycle,
            start_date,
            category: Category::Other,
            is_free_trial: false,
            trial_end_date: None,
            remind_me: false,
            cancellation_url: None,
            theme_color: None,
            notification_ids: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.price < Decimal::ZERO {
            return Err(ValidationError::NegativePrice(self.price));
        }
        match (self.is_free_trial, self.trial_end_date) {
            (true, None) => return Err(ValidationError::MissingTrialEnd),
            (false, Some(_)) => return Err(ValidationError::UnexpectedTrialEnd),
            _ => {}
        }
        if let Some(color) = &self.theme_color {
            if !HEX_COLOR.is_match(color) {
                return Err(ValidationError::InvalidColor(color.clone()));
            }
        }
        Ok(())
    }

    /// Trials end at the start of their end date.
    pub fn trial_ends_at(&self) -> Option<NaiveDateTime> {
        if !self.is_free_trial {
            return None;
        }
        self.trial_end_date.and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    pub fn is_trial_ending_soon(&self, now: NaiveDateTime) -> bool {
        match self.trial_ends_at() {
            Some(end) => {
                let left = end - now;
                left > Duration::zero() && left < Duration::hours(48)
            }
            None => false,
        }
    }

    /// First charge date on or after `today`.
    pub fn next_billing_date(&self, today: NaiveDate) -> NaiveDate {
        if let Some(end) = self.trial_end_date.filter(|_| self.is_free_trial) {
            return end;
        }
        if self.start_date >= today {
            return self.start_date;
        }
        match self.billing_cycle {
            BillingCycle::Weekly => {
                let elapsed = (today - self.start_date).num_days();
                let periods = (elapsed + 6) / 7;
                self.start_date + Duration::days(periods * 7)
            }
            BillingCycle::Monthly => step_months(self.start_date, today, 1),
            BillingCycle::Yearly => step_months(self.start_date, today, 12),
        }
    }
}

// Always offset from `start` so a 31st does not drift to the 28th after February.
fn step_months(start: NaiveDate, today: NaiveDate, step: u32) -> NaiveDate {
    let mut n = step;
    loop {
        match start.checked_add_months(Months::new(n)) {
            Some(d) if d >= today => return d,
            Some(_) => n += step,
            None => return today,
        }
    }
}

/// Units of each currency per 1 USD, keyed by ISO code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeRateTable {
    rates: BTreeMap<String, f64>,
}

impl Default for ExchangeRateTable {
    fn default() -> Self {
        ExchangeRateTable::from_pairs([("USD", 1.0), ("EUR", 0.92), ("GBP", 0.79), ("TRY", 30.0)])
    }
}

impl ExchangeRateTable {
    pub fn new(rates: impl IntoIterator<Item = (String, f64)>) -> Self {
        ExchangeRateTable {
            rates: rates.into_iter().collect(),
        }
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        ExchangeRateTable::new(pairs.into_iter().map(|(c, r)| (c.to_string(), r)))
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    /// Rate for `code`, or 1 when it is missing or unusable.
    pub fn rate(&self, code: &str) -> Decimal {
        self.get(code)
            .filter(|r| r.is_finite() && *r > 0.0)
            .and_then(|r| Decimal::try_from(r).ok())
            .filter(|r| !r.is_zero())
            .unwrap_or(Decimal::ONE)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(c, r)| (c.as_str(), *r))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

pub const LANGUAGES: [&str; 5] = ["en", "tr", "de", "es", "fr"];

/// Display currency picked along with a UI language.
pub fn default_currency_for_language(language: &str) -> Option<&'static str> {
    match language {
        "tr" => Some("₺"),
        "en" => Some("$"),
        "de" | "es" | "fr" => Some("€"),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub currency: String,
    pub language: String,
    pub is_biometric_enabled: bool,
    pub has_completed_onboarding: bool,
    pub sort_option: SortOption,
    #[serde(deserialize_with = "filter_or_all")]
    pub filter_category: CategoryFilter,
    pub exchange_rates: ExchangeRateTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rates_updated_at: Option<DateTime<Utc>>,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            currency: "$".to_string(),
            language: "en".to_string(),
            is_biometric_enabled: true,
            has_completed_onboarding: false,
            sort_option: SortOption::default(),
            filter_category: CategoryFilter::default(),
            exchange_rates: ExchangeRateTable::default(),
            rates_updated_at: None,
        }
    }
}

pub(crate) fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive())
}

mod iso_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(d: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&d.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_iso_date(&raw).ok_or_else(|| D::Error::custom(format!("invalid date '{raw}'")))
    }
}

mod iso_date_opt {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(d: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.collect_str(&d.format("%Y-%m-%d")),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) => super::parse_iso_date(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date '{raw}'"))),
            None => Ok(None),
        }
    }
}
