//! Week-of-month bucketing.
//!
//! Weeks here are plain calendar-day partitions of the month (days 1-7,
//! 8-14, 15-21, 22-28, 29-31), not ISO weeks. They exist only to gate the
//! weekly rest allowance.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Hours worked in one interval, keyed by when the interval started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkedHours {
    /// Start of the interval; decides the week bucket.
    pub start: NaiveDateTime,
    /// Hours worked in the interval.
    pub hours: Decimal,
}

/// Returns the week bucket of a date: `ceil(day_of_month / 7)`, in `1..=5`.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::week_of_month;
/// use chrono::NaiveDate;
///
/// assert_eq!(week_of_month(NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()), 1);
/// assert_eq!(week_of_month(NaiveDate::from_ymd_opt(2026, 3, 8).unwrap()), 2);
/// assert_eq!(week_of_month(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()), 5);
/// ```
pub fn week_of_month(date: NaiveDate) -> u32 {
    date.day().div_ceil(7)
}

/// Sums hours per week bucket, using each entry's start date.
///
/// Buckets with no entries are absent from the result.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{bucket_by_week, WorkedHours};
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let buckets = bucket_by_week(&[
///     WorkedHours { start: at("2026-03-02 09:00:00"), hours: Decimal::new(8, 0) },
///     WorkedHours { start: at("2026-03-06 09:00:00"), hours: Decimal::new(8, 0) },
///     WorkedHours { start: at("2026-03-09 09:00:00"), hours: Decimal::new(4, 0) },
/// ]);
/// assert_eq!(buckets[&1], Decimal::new(16, 0));
/// assert_eq!(buckets[&2], Decimal::new(4, 0));
/// ```
pub fn bucket_by_week(entries: &[WorkedHours]) -> BTreeMap<u32, Decimal> {
    let mut buckets = BTreeMap::new();
    for entry in entries {
        *buckets
            .entry(week_of_month(entry.start.date()))
            .or_insert(Decimal::ZERO) += entry.hours;
    }
    buckets
}
