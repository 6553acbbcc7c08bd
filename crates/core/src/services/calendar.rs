//! Calendar arithmetic behind period keys and gap filling.
//!
//! Every function here works on naive (zone-less) dates, so the same record
//! lands in the same period on every host.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};

use crate::models::bucket::{Granularity, PeriodKey};

/// First calendar day of the period containing `date`.
///
/// Weekly periods start on Monday. With `Granularity::None` the date itself
/// is returned.
#[must_use]
pub fn period_start(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Daily | Granularity::None => date,
        Granularity::Weekly => {
            date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
        }
        Granularity::Monthly => date.with_day(1).unwrap_or(date),
    }
}

/// Start of the period after the one starting at `start`.
/// `None` when the step leaves chrono's date range, or for `Granularity::None`.
#[must_use]
pub fn next_period_start(start: NaiveDate, granularity: Granularity) -> Option<NaiveDate> {
    match granularity {
        Granularity::Daily => start.succ_opt(),
        Granularity::Weekly => start.checked_add_signed(Duration::days(7)),
        Granularity::Monthly => start.with_day(1)?.checked_add_months(Months::new(1)),
        Granularity::None => None,
    }
}

/// Zero-padded key of the period containing `timestamp`.
#[must_use]
pub fn period_key(timestamp: NaiveDateTime, granularity: Granularity) -> PeriodKey {
    let date = timestamp.date();
    let key = match granularity {
        Granularity::Daily => format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day()),
        Granularity::Weekly => {
            // The ISO week-year differs from the calendar year around New Year.
            let week = date.iso_week();
            format!("{:04}-W{:02}", week.year(), week.week())
        }
        Granularity::Monthly => format!("{:04}-{:02}", date.year(), date.month()),
        Granularity::None => timestamp.format("%Y-%m-%dT%H:%M:%S").to_string(),
    };
    PeriodKey::new(key)
}

/// Starts of every period from the one holding `min` to the one holding
/// `max`, inclusive, one calendar step apart.
///
/// Empty for `Granularity::None`, which has no calendar step, and when
/// `min > max`.
#[must_use]
pub fn period_starts(min: NaiveDate, max: NaiveDate, granularity: Granularity) -> Vec<NaiveDate> {
    if !granularity.is_calendar() || min > max {
        return Vec::new();
    }
    let end = period_start(max, granularity);
    let mut current = period_start(min, granularity);
    let mut starts = Vec::new();

    while current <= end {
        starts.push(current);
        current = match next_period_start(current, granularity) {
            Some(next) => next,
            None => break,
        };
    }

    starts
}
