//! Weekly rest allowance (holiday pay) calculation.
//!
//! A week bucket that reaches the minimum weekly hours earns a paid rest
//! allowance proportional to its hours, capped at a full-time week:
//!
//! ```text
//! allowance = min(hours, max_weekly_hours) / max_weekly_hours * allowance_hours * wage
//! ```
//!
//! With the default rules (15h threshold, 40h cap, 8h allowance) a 20-hour
//! week at 10,000 per hour earns `20 / 40 * 8 * 10000 = 40000`.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::WeeklyHolidayRules;

/// The allowance outcome for one week bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyHolidayPay {
    /// Week bucket number (1-5).
    pub week: u32,
    /// Hours worked in the bucket.
    pub hours: Decimal,
    /// Whether the bucket reached the minimum weekly hours.
    pub eligible: bool,
    /// Unfloored allowance for the bucket; zero when not eligible.
    pub amount: Decimal,
}

/// The allowance across all week buckets of a month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayPayResult {
    /// Per-bucket outcomes, ordered by week.
    pub weeks: Vec<WeeklyHolidayPay>,
    /// Sum of the per-bucket amounts, not yet floored.
    pub total: Decimal,
}

/// Calculates the allowance for a single week bucket.
///
/// The threshold is inclusive: a bucket with exactly `min_weekly_hours`
/// qualifies.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::weekly_holiday_pay;
/// use attendance_engine::config::WeeklyHolidayRules;
/// use rust_decimal::Decimal;
///
/// let rules = WeeklyHolidayRules::default();
/// let pay = weekly_holiday_pay(1, Decimal::new(50, 0), Decimal::new(10000, 0), &rules);
/// assert!(pay.eligible);
/// // Capped as if 40 hours: 40 / 40 * 8 * 10000
/// assert_eq!(pay.amount, Decimal::new(80000, 0));
/// ```
pub fn weekly_holiday_pay(
    week: u32,
    hours: Decimal,
    hourly_wage: Decimal,
    rules: &WeeklyHolidayRules,
) -> WeeklyHolidayPay {
    let eligible = hours >= rules.min_weekly_hours;
    let amount = if eligible {
        let capped = hours.min(rules.max_weekly_hours);
        capped * rules.allowance_hours * hourly_wage / rules.max_weekly_hours
    } else {
        Decimal::ZERO
    };

    WeeklyHolidayPay {
        week,
        hours,
        eligible,
        amount,
    }
}

/// Calculates the allowance for every week bucket and sums it.
///
/// The total is left unfloored; flooring happens once at the output
/// boundary.
pub fn calculate_holiday_pay(
    buckets: &BTreeMap<u32, Decimal>,
    hourly_wage: Decimal,
    rules: &WeeklyHolidayRules,
) -> HolidayPayResult {
    let weeks: Vec<WeeklyHolidayPay> = buckets
        .iter()
        .map(|(&week, &hours)| weekly_holiday_pay(week, hours, hourly_wage, rules))
        .collect();
    let total = weeks.iter().map(|w| w.amount).sum();

    HolidayPayResult { weeks, total }
}
