// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use subtracker::aggregate::{
    category_breakdown, normalize_to_monthly, normalize_to_yearly, summarize, total_monthly,
    total_yearly,
};
use subtracker::currency::convert;
use subtracker::models::{BillingCycle, Category, ExchangeRateTable, Subscription};

fn rec(name: &str, price: &str, currency: &str, cycle: BillingCycle) -> Subscription {
    Subscription::new(
        name,
        price.parse().unwrap(),
        currency,
        cycle,
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
    )
}

fn usd_only() -> ExchangeRateTable {
    ExchangeRateTable::from_pairs([("USD", 1.0)])
}

fn close(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < Decimal::new(1, 12)
}

#[test]
fn monthly_record_in_same_currency_is_its_price() {
    let records = vec![rec("Netflix", "12", "$", BillingCycle::Monthly)];
    let total = total_monthly(&records, "$", &usd_only());
    assert_eq!(format!("{:.2}", total), "12.00");
}

#[test]
fn monthly_totals_sum_prices_without_conversion() {
    let records = vec![
        rec("A", "9.99", "€", BillingCycle::Monthly),
        rec("B", "5.01", "€", BillingCycle::Monthly),
        rec("C", "100", "€", BillingCycle::Monthly),
    ];
    let rates = ExchangeRateTable::default();
    assert_eq!(total_monthly(&records, "€", &rates), Decimal::new(115, 0));
}

#[test]
fn weekly_uses_fixed_multipliers() {
    let r = rec("Gym", "10", "$", BillingCycle::Weekly);
    let rates = usd_only();
    assert_eq!(normalize_to_monthly(&r, "$", &rates), Decimal::new(4330, 2));
    assert_eq!(normalize_to_yearly(&r, "$", &rates), Decimal::new(520, 0));
}

#[test]
fn yearly_spreads_over_twelve_months() {
    let r = rec("Domain", "120", "$", BillingCycle::Yearly);
    let rates = usd_only();
    assert_eq!(normalize_to_monthly(&r, "$", &rates), Decimal::new(10, 0));
    assert_eq!(normalize_to_yearly(&r, "$", &rates), Decimal::new(120, 0));
}

#[test]
fn monthly_record_is_twelve_times_yearly() {
    let r = rec("Music", "10.99", "$", BillingCycle::Monthly);
    assert_eq!(
        normalize_to_yearly(&r, "$", &usd_only()),
        Decimal::new(13188, 2)
    );
}

#[test]
fn free_trials_cost_nothing_anywhere() {
    let mut trial = rec("Trial", "999", "$", BillingCycle::Monthly);
    trial.is_free_trial = true;
    trial.trial_end_date = NaiveDate::from_ymd_opt(2030, 1, 1);
    trial.category = Category::Work;
    let records = vec![trial];
    let rates = usd_only();
    assert!(total_monthly(&records, "$", &rates).is_zero());
    assert!(total_yearly(&records, "$", &rates).is_zero());
    assert!(category_breakdown(&records, "$", &rates).is_empty());
}

#[test]
fn lira_yearly_converts_through_usd() {
    let r = rec("Netflix TR", "149.99", "₺", BillingCycle::Yearly);
    let rates = ExchangeRateTable::from_pairs([("USD", 1.0), ("TRY", 30.0)]);
    let monthly = normalize_to_monthly(&r, "$", &rates);
    assert_eq!(monthly.round_dp(4), Decimal::new(4166, 4));
}

#[test]
fn breakdown_shares_split_by_category() {
    let mut fun = rec("Streaming", "10", "$", BillingCycle::Monthly);
    fun.category = Category::Entertainment;
    let mut work = rec("Editor", "360", "$", BillingCycle::Yearly);
    work.category = Category::Work;
    let records = vec![fun, work];
    let rates = usd_only();

    assert_eq!(total_monthly(&records, "$", &rates), Decimal::new(40, 0));
    let shares = category_breakdown(&records, "$", &rates);
    assert_eq!(shares.len(), 2);
    assert_eq!(shares[0].category, Category::Work);
    assert_eq!(shares[0].monthly, Decimal::new(30, 0));
    assert_eq!(shares[0].share, Decimal::new(75, 2));
    assert_eq!(shares[1].category, Category::Entertainment);
    assert_eq!(shares[1].monthly, Decimal::new(10, 0));
    assert_eq!(shares[1].share, Decimal::new(25, 2));
}

#[test]
fn breakdown_shares_sum_to_one() {
    let mut a = rec("A", "10", "$", BillingCycle::Monthly);
    a.category = Category::Personal;
    let mut b = rec("B", "10", "€", BillingCycle::Weekly);
    b.category = Category::Utilities;
    let c = rec("C", "10", "£", BillingCycle::Yearly);
    let records = vec![a, b, c];
    let rates = ExchangeRateTable::default();

    let shares = category_breakdown(&records, "$", &rates);
    assert_eq!(shares.len(), 3);
    let sum: Decimal = shares.iter().map(|s| s.share).sum();
    assert!(close(sum, Decimal::ONE), "shares summed to {}", sum);
    // Largest first
    assert!(shares.windows(2).all(|w| w[0].monthly >= w[1].monthly));
}

#[test]
fn breakdown_is_empty_without_records() {
    assert!(category_breakdown(&[], "$", &usd_only()).is_empty());
}

#[test]
fn unknown_symbol_counts_as_usd() {
    let r = rec("Odd", "10", "₿", BillingCycle::Monthly);
    let rates = ExchangeRateTable::from_pairs([("USD", 1.0), ("EUR", 0.5)]);
    assert_eq!(normalize_to_monthly(&r, "€", &rates), Decimal::new(5, 0));
}

#[test]
fn missing_rate_counts_as_one() {
    let r = rec("Anime", "100", "¥", BillingCycle::Monthly);
    let rates = ExchangeRateTable::from_pairs([("USD", 1.0), ("EUR", 0.5)]);
    // JPY missing: 100 / 1 * 0.5
    assert_eq!(normalize_to_monthly(&r, "€", &rates), Decimal::new(50, 0));
}

#[test]
fn conversion_round_trip_returns_starting_amount() {
    let rates = ExchangeRateTable::default();
    let amount = Decimal::new(10000, 2);
    let there = convert(amount, "€", "₺", &rates);
    let back = convert(there, "₺", "€", &rates);
    assert!(close(back, amount), "round trip gave {}", back);
}

#[test]
fn legacy_record_without_category_lands_in_other() {
    let raw = r#"[{"id":"1","name":"Old","price":8,"currency":"$","billingCycle":"monthly",
        "startDate":"2024-05-01T09:30:00.000Z","isFreeTrial":false,"remindMe":false}]"#;
    let records: Vec<Subscription> = serde_json::from_str(raw).unwrap();
    let shares = category_breakdown(&records, "$", &usd_only());
    assert_eq!(shares.len(), 1);
    assert_eq!(shares[0].category, Category::Other);
    assert_eq!(shares[0].share, Decimal::ONE);
}

#[test]
fn summary_counts_trials_separately() {
    let mut trial = rec("Trial", "5", "$", BillingCycle::Monthly);
    trial.is_free_trial = true;
    trial.trial_end_date = NaiveDate::from_ymd_opt(2030, 1, 1);
    let records = vec![trial, rec("Paid", "5", "$", BillingCycle::Monthly)];
    let s = summarize(&records, "$", &usd_only());
    assert_eq!(s.active, 1);
    assert_eq!(s.trials, 1);
    assert_eq!(s.monthly, Decimal::new(5, 0));
    assert_eq!(s.yearly, Decimal::new(60, 0));
    assert_eq!(s.categories.len(), 1);
}

#[test]
fn huge_prices_saturate_instead_of_overflowing() {
    let weekly = rec("Huge", "20000000000000000000000000000", "$", BillingCycle::Weekly);
    let rates = usd_only();
    assert_eq!(normalize_to_monthly(&weekly, "$", &rates), Decimal::MAX);
    assert_eq!(normalize_to_yearly(&weekly, "$", &rates), Decimal::MAX);

    let records: Vec<Subscription> = (0..4)
        .map(|_| rec("Huge", "20000000000000000000000000000", "$", BillingCycle::Monthly))
        .collect();
    assert_eq!(total_monthly(&records, "$", &rates), Decimal::MAX);
    assert_eq!(total_yearly(&records, "$", &rates), Decimal::MAX);

    let shares = category_breakdown(&records, "$", &rates);
    assert_eq!(shares.len(), 1);
    assert_eq!(shares[0].share, Decimal::ONE);
    let s = summarize(&records, "$", &rates);
    assert_eq!(s.monthly, Decimal::MAX);
}

#[test]
fn tiny_rate_saturates_conversion() {
    let rates = ExchangeRateTable::from_pairs([("USD", 1.0), ("TRY", 1e-20)]);
    let amount = Decimal::new(1_000_000_000, 0);
    assert_eq!(convert(amount, "₺", "$", &rates), Decimal::MAX);
    assert_eq!(convert(-amount, "₺", "$", &rates), Decimal::MIN);

    let r = rec("Lira", "1000000000", "₺", BillingCycle::Monthly);
    assert_eq!(normalize_to_monthly(&r, "$", &rates), Decimal::MAX);
}
