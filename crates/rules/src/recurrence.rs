//! Recurrence matcher: does an event occur on a given calendar date?
//!
//! Matching is pure and deterministic. The same functions answer both
//! "which events fall on the selected day" and "which events are due today".
//!
//! Rules:
//! - `Once`: the anchor date only.
//! - `Monthly`: every month on the anchor day. Months without that day
//!   (an anchor on the 31st in a 30-day month, the 29th-31st in February)
//!   are skipped, never clamped to the month end or rolled into the next month.
//! - `Yearly`: every year on the anchor day and month, whatever the year. A
//!   February 29 anchor therefore occurs in leap years only.
//!
//! The anchor date is not a lower bound for recurring events: a monthly
//! event anchored in March also matches in February of the same year.

use chrono::{Datelike, Duration, NaiveDate};

use datebook_core::{Event, RecurrenceKind};

/// Months scanned when searching for the next monthly occurrence.
/// Any day 1..=31 recurs at least twice a year.
const MONTHLY_SCAN: u32 = 48;

/// Years scanned when searching for the next yearly occurrence.
/// February 29 can be absent for up to 7 consecutive years (e.g. 2097-2103).
const YEARLY_SCAN: i32 = 9;

/// Whether `event` occurs on `target`.
pub fn occurs_on(event: &Event, target: NaiveDate) -> bool {
    let anchor = event.date;
    match event.recurrence {
        RecurrenceKind::Once => anchor == target,
        RecurrenceKind::Monthly => anchor.day() == target.day(),
        RecurrenceKind::Yearly => anchor.day() == target.day() && anchor.month() == target.month(),
    }
}

/// Events occurring on `target`, in snapshot order.
pub fn events_occurring_on(events: &[Event], target: NaiveDate) -> Vec<&Event> {
    events.iter().filter(|e| occurs_on(e, target)).collect()
}

/// Events occurring on `target` that have alerting enabled, in snapshot order.
pub fn alerts_due_on(events: &[Event], target: NaiveDate) -> Vec<&Event> {
    events
        .iter()
        .filter(|e| e.alerting_enabled && occurs_on(e, target))
        .collect()
}

/// First date on or after `from` on which `event` occurs.
///
/// Returns `None` only for a `Once` event whose date has passed.
pub fn next_occurrence(event: &Event, from: NaiveDate) -> Option<NaiveDate> {
    let anchor = event.date;
    match event.recurrence {
        RecurrenceKind::Once => (anchor >= from).then_some(anchor),
        RecurrenceKind::Monthly => {
            let start = from.year() * 12 + from.month0() as i32;
            (0..MONTHLY_SCAN as i32).find_map(|offset| {
                let index = start + offset;
                let year = index.div_euclid(12);
                let month = index.rem_euclid(12) as u32 + 1;
                NaiveDate::from_ymd_opt(year, month, anchor.day()).filter(|d| *d >= from)
            })
        }
        RecurrenceKind::Yearly => (0..YEARLY_SCAN).find_map(|offset| {
            NaiveDate::from_ymd_opt(from.year() + offset, anchor.month(), anchor.day())
                .filter(|d| *d >= from)
        }),
    }
}

/// One upcoming occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upcoming<'a> {
    pub event: &'a Event,
    pub date: NaiveDate,
}

/// Next occurrence of every event within `[from, from + days)`, soonest first.
///
/// Events sharing a date keep their snapshot order.
pub fn upcoming(events: &[Event], from: NaiveDate, days: u32) -> Vec<Upcoming<'_>> {
    let Some(end) = from.checked_add_signed(Duration::days(i64::from(days))) else {
        return Vec::new();
    };

    let mut found: Vec<Upcoming<'_>> = events
        .iter()
        .filter_map(|event| {
            next_occurrence(event, from)
                .filter(|date| *date < end)
                .map(|date| Upcoming { event, date })
        })
        .collect();
    found.sort_by_key(|u| u.date);
    found
}
