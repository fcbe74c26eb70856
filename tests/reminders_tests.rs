// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use subtracker::reminders::{
    LocalReminderScheduler, ReminderScheduler, cancel_reminders, schedule_trial_reminders,
    take_due,
};
use subtracker::store::MemoryStore;

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn trial_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
}

#[test]
fn both_warnings_when_far_away() {
    let mut store = MemoryStore::new();
    let mut sched = LocalReminderScheduler::new(&mut store);
    let ids = schedule_trial_reminders(&mut sched, "Netflix", trial_end(), at(2025, 6, 1, 12))
        .unwrap();
    assert_eq!(ids.len(), 2);

    let mut pending = sched.pending().unwrap();
    pending.sort_by_key(|r| r.fire_at);
    assert_eq!(pending[0].fire_at, at(2025, 6, 9, 0));
    assert_eq!(pending[0].title, "Trial Ending Soon!");
    assert_eq!(pending[0].body, "Your free trial for Netflix ends in 24 hours.");
    assert_eq!(pending[1].fire_at, at(2025, 6, 9, 22));
    assert_eq!(pending[1].title, "Urgent: Trial Expiring!");
    assert_eq!(
        pending[1].body,
        "Your free trial for Netflix ends in 2 hours! Cancel now if needed."
    );
    assert!(pending.iter().all(|r| r.subscription_name == "Netflix"));
    assert!(pending.iter().all(|r| ids.contains(&r.id)));
}

#[test]
fn only_urgent_warning_inside_a_day() {
    let mut store = MemoryStore::new();
    let mut sched = LocalReminderScheduler::new(&mut store);
    let ids = schedule_trial_reminders(&mut sched, "Box", trial_end(), at(2025, 6, 9, 10))
        .unwrap();
    assert_eq!(ids.len(), 1);
    assert_eq!(sched.pending().unwrap()[0].fire_at, at(2025, 6, 9, 22));
}

#[test]
fn nothing_when_trial_is_imminent_or_over() {
    let mut store = MemoryStore::new();
    let mut sched = LocalReminderScheduler::new(&mut store);
    let ids = schedule_trial_reminders(&mut sched, "Box", trial_end(), at(2025, 6, 9, 23))
        .unwrap();
    assert!(ids.is_empty());
    let ids = schedule_trial_reminders(&mut sched, "Box", trial_end(), at(2025, 7, 1, 0))
        .unwrap();
    assert!(ids.is_empty());
    assert!(sched.pending().unwrap().is_empty());
}

#[test]
fn cancel_removes_only_named_reminders() {
    let mut store = MemoryStore::new();
    let mut sched = LocalReminderScheduler::new(&mut store);
    let a = schedule_trial_reminders(&mut sched, "A", trial_end(), at(2025, 6, 1, 0)).unwrap();
    let b = schedule_trial_reminders(&mut sched, "B", trial_end(), at(2025, 6, 1, 0)).unwrap();
    cancel_reminders(&mut sched, &a).unwrap();
    let left = sched.pending().unwrap();
    assert_eq!(left.len(), 2);
    assert!(left.iter().all(|r| b.contains(&r.id)));

    // Unknown and empty handles are ignored
    sched.cancel(&["no-such-id".to_string()]).unwrap();
    sched.cancel(&[]).unwrap();
    assert_eq!(sched.pending().unwrap().len(), 2);
}

#[test]
fn take_due_pops_in_time_order() {
    let mut store = MemoryStore::new();
    {
        let mut sched = LocalReminderScheduler::new(&mut store);
        sched.schedule("Late", "t", "b", at(2025, 6, 5, 0)).unwrap();
        sched.schedule("Early", "t", "b", at(2025, 6, 2, 0)).unwrap();
        sched.schedule("Future", "t", "b", at(2025, 7, 1, 0)).unwrap();
    }
    let due = take_due(&mut store, at(2025, 6, 5, 0)).unwrap();
    let names: Vec<&str> = due.iter().map(|r| r.subscription_name.as_str()).collect();
    assert_eq!(names, ["Early", "Late"]);

    assert!(take_due(&mut store, at(2025, 6, 30, 0)).unwrap().is_empty());
    let rest = LocalReminderScheduler::new(&mut store).pending().unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].subscription_name, "Future");
}
