// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use subtracker::models::{BillingCycle, Subscription};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn rec(cycle: BillingCycle, start: NaiveDate) -> Subscription {
    Subscription::new("S", Decimal::TEN, "$", cycle, start)
}

#[test]
fn next_billing_date_keeps_month_end_anchor() {
    let r = rec(BillingCycle::Monthly, date(2025, 1, 31));
    assert_eq!(r.next_billing_date(date(2025, 2, 10)), date(2025, 2, 28));
    assert_eq!(r.next_billing_date(date(2025, 3, 1)), date(2025, 3, 31));
    assert_eq!(r.next_billing_date(date(2025, 1, 31)), date(2025, 1, 31));
    assert_eq!(r.next_billing_date(date(2024, 12, 1)), date(2025, 1, 31));
}

#[test]
fn next_billing_date_weekly_and_yearly() {
    let w = rec(BillingCycle::Weekly, date(2025, 1, 1));
    assert_eq!(w.next_billing_date(date(2025, 1, 10)), date(2025, 1, 15));
    assert_eq!(w.next_billing_date(date(2025, 1, 15)), date(2025, 1, 15));

    let y = rec(BillingCycle::Yearly, date(2024, 2, 29));
    assert_eq!(y.next_billing_date(date(2024, 6, 1)), date(2025, 2, 28));
}

#[test]
fn trial_charges_on_its_end_date() {
    let mut r = rec(BillingCycle::Monthly, date(2025, 1, 1));
    r.is_free_trial = true;
    r.trial_end_date = Some(date(2025, 3, 15));
    assert_eq!(r.next_billing_date(date(2025, 2, 1)), date(2025, 3, 15));
}

#[test]
fn trial_ending_soon_window() {
    let mut r = rec(BillingCycle::Monthly, date(2025, 1, 1));
    r.is_free_trial = true;
    r.trial_end_date = Some(date(2025, 5, 10));
    let at = |d: u32, h: u32| date(2025, 5, d).and_hms_opt(h, 0, 0).unwrap();
    assert!(r.is_trial_ending_soon(at(9, 12)));
    assert!(r.is_trial_ending_soon(at(8, 1)));
    assert!(!r.is_trial_ending_soon(at(7, 23)));
    assert!(!r.is_trial_ending_soon(at(10, 0)));
    r.is_free_trial = false;
    r.trial_end_date = None;
    assert!(!r.is_trial_ending_soon(at(9, 12)));
}
