//! Night window overlap calculation.
//!
//! Night work is any time inside two fixed windows anchored to the calendar
//! day an interval starts on: the early morning `[00:00, 06:00)` and the
//! evening window `[22:00, 06:00 next day)`. The windows do not overlap each
//! other.
//!
//! Only the start day's windows are considered. An interval longer than 24
//! hours therefore undercounts the nights after the first; dashboards rely on
//! this narrower definition.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::models::duration_hours;

/// Hour of day at which the early morning window ends.
pub const NIGHT_END_HOUR: i64 = 6;

/// Hour of day at which the evening night window begins.
pub const NIGHT_START_HOUR: i64 = 22;

/// A half-open `[start, end)` window of night time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightWindow {
    /// Inclusive start of the window.
    pub start: NaiveDateTime,
    /// Exclusive end of the window.
    pub end: NaiveDateTime,
}

impl NightWindow {
    /// Returns the portion of `[start, end)` that falls inside this window,
    /// never negative.
    fn overlap(&self, start: NaiveDateTime, end: NaiveDateTime) -> Duration {
        let from = start.max(self.start);
        let to = end.min(self.end);
        if from < to { to - from } else { Duration::zero() }
    }
}

/// Returns the two night windows anchored to the calendar day of `anchor`.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::night_windows;
/// use chrono::NaiveDateTime;
///
/// let anchor = NaiveDateTime::parse_from_str("2026-03-02 15:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let [early, evening] = night_windows(anchor);
/// assert_eq!(early.start.to_string(), "2026-03-02 00:00:00");
/// assert_eq!(early.end.to_string(), "2026-03-02 06:00:00");
/// assert_eq!(evening.start.to_string(), "2026-03-02 22:00:00");
/// assert_eq!(evening.end.to_string(), "2026-03-03 06:00:00");
/// ```
pub fn night_windows(anchor: NaiveDateTime) -> [NightWindow; 2] {
    let midnight = anchor.date().and_time(NaiveTime::MIN);
    let next_morning = midnight + Duration::days(1) + Duration::hours(NIGHT_END_HOUR);

    [
        NightWindow {
            start: midnight,
            end: midnight + Duration::hours(NIGHT_END_HOUR),
        },
        NightWindow {
            start: midnight + Duration::hours(NIGHT_START_HOUR),
            end: next_morning,
        },
    ]
}

/// Returns the hours of `[start, end)` that fall inside the night windows of
/// `start`'s calendar day.
///
/// A malformed interval (`end <= start`) yields zero rather than an error.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::night_overlap_hours;
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let start = NaiveDateTime::parse_from_str("2026-03-02 20:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let end = NaiveDateTime::parse_from_str("2026-03-03 02:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(night_overlap_hours(start, end), Decimal::new(4, 0));
/// ```
pub fn night_overlap_hours(start: NaiveDateTime, end: NaiveDateTime) -> Decimal {
    if end <= start {
        return Decimal::ZERO;
    }

    let overlap = night_windows(start)
        .iter()
        .fold(Duration::zero(), |total, window| total + window.overlap(start, end));

    duration_hours(overlap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::hours_between;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    // ==========================================================================
    // NH-001: interval inside the early morning window counts in full
    // ==========================================================================
    #[test]
    fn test_nh_001_early_morning_interval_is_all_night() {
        let start = make_datetime("2026-03-02", "01:00:00");
        let end = make_datetime("2026-03-02", "05:00:00");
        assert_eq!(night_overlap_hours(start, end), dec("4"));
    }

    // ==========================================================================
    // NH-002: daytime interval has no night hours
    // ==========================================================================
    #[test]
    fn test_nh_002_daytime_interval_has_no_night_hours() {
        let start = make_datetime("2026-03-02", "10:00:00");
        let end = make_datetime("2026-03-02", "18:00:00");
        assert_eq!(night_overlap_hours(start, end), Decimal::ZERO);
    }

    // ==========================================================================
    // NH-003: overnight 23:00-03:00 is entirely night
    // ==========================================================================
    #[test]
    fn test_nh_003_overnight_interval() {
        let start = make_datetime("2026-03-02", "23:00:00");
        let end = make_datetime("2026-03-03", "03:00:00");
        assert_eq!(night_overlap_hours(start, end), dec("4"));
    }

    // ==========================================================================
    // NH-004: evening shift partially inside the night window
    // ==========================================================================
    #[test]
    fn test_nh_004_evening_shift_partial_overlap() {
        let start = make_datetime("2026-03-02", "18:00:00");
        let end = make_datetime("2026-03-02", "23:30:00");
        assert_eq!(night_overlap_hours(start, end), dec("1.5"));
    }

    // ==========================================================================
    // NH-005: early start that runs into the morning
    // ==========================================================================
    #[test]
    fn test_nh_005_early_start_into_daytime() {
        let start = make_datetime("2026-03-02", "04:00:00");
        let end = make_datetime("2026-03-02", "12:00:00");
        assert_eq!(night_overlap_hours(start, end), dec("2"));
    }

    #[test]
    fn test_interval_touching_both_windows() {
        // 05:00-23:00 touches the early window (1h) and the evening window (1h)
        let start = make_datetime("2026-03-02", "05:00:00");
        let end = make_datetime("2026-03-02", "23:00:00");
        assert_eq!(night_overlap_hours(start, end), dec("2"));
    }

    #[test]
    fn test_window_boundaries_are_half_open() {
        let start = make_datetime("2026-03-02", "06:00:00");
        let end = make_datetime("2026-03-02", "22:00:00");
        assert_eq!(night_overlap_hours(start, end), Decimal::ZERO);
    }

    #[test]
    fn test_end_before_start_is_zero() {
        let start = make_datetime("2026-03-02", "03:00:00");
        let end = make_datetime("2026-03-02", "01:00:00");
        assert_eq!(night_overlap_hours(start, end), Decimal::ZERO);
    }

    #[test]
    fn test_zero_length_is_zero() {
        let at = make_datetime("2026-03-02", "02:00:00");
        assert_eq!(night_overlap_hours(at, at), Decimal::ZERO);
    }

    #[test]
    fn test_multi_day_interval_only_counts_first_night() {
        // 48 hours starting at noon: only the first evening window (8h) counts
        let start = make_datetime("2026-03-02", "12:00:00");
        let end = make_datetime("2026-03-04", "12:00:00");
        assert_eq!(night_overlap_hours(start, end), dec("8"));
    }

    #[test]
    fn test_minutes_are_fractional() {
        let start = make_datetime("2026-03-02", "21:45:00");
        let end = make_datetime("2026-03-02", "22:20:00");
        let hours = night_overlap_hours(start, end);
        assert_eq!(hours.round_dp(6), dec("0.333333"));
    }

    proptest! {
        #[test]
        fn prop_overlap_never_exceeds_duration(
            start_minute in 0i64..(24 * 60),
            length_minutes in 1i64..(36 * 60),
        ) {
            let start = make_datetime("2026-03-02", "00:00:00") + Duration::minutes(start_minute);
            let end = start + Duration::minutes(length_minutes);

            let night = night_overlap_hours(start, end);
            prop_assert!(night >= Decimal::ZERO);
            prop_assert!(night <= hours_between(start, end));
        }

        #[test]
        fn prop_inside_early_window_is_full_duration(
            offset_minutes in 60i64..(5 * 60),
            length_minutes in 1i64..60,
        ) {
            // Intervals within [01:00, 05:00) are entirely night time
            let start = make_datetime("2026-03-02", "00:00:00") + Duration::minutes(offset_minutes);
            let end = (start + Duration::minutes(length_minutes))
                .min(make_datetime("2026-03-02", "05:00:00"));
            prop_assume!(end > start);

            prop_assert_eq!(night_overlap_hours(start, end), hours_between(start, end));
        }
    }
}
