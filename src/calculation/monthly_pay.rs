//! Monthly pay calculation.
//!
//! Combines the ordinary hourly pay, the weekly rest allowance and the night
//! premium for one worker over one calendar month. Intermediate sums are
//! kept exact; each monetary output is floored exactly once.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::warn;

use crate::config::PayRules;
use crate::error::{EngineError, EngineResult};
use crate::models::{PaySummary, WorkInterval, Worker};

use super::holiday_allowance::calculate_holiday_pay;
use super::night_hours::night_overlap_hours;
use super::weekly_hours::{WorkedHours, bucket_by_week};

/// Floors a currency amount to whole units, saturating at both ends.
///
/// Negative amounts become 0 and amounts beyond `u64::MAX` become `u64::MAX`.
fn floor_currency(amount: Decimal) -> u64 {
    if amount.is_sign_negative() {
        return 0;
    }
    amount.floor().to_u64().unwrap_or(u64::MAX)
}

/// Calculates a worker's pay for the given month.
///
/// Only closed intervals whose start falls in `year`/`month` contribute.
/// Intervals with a negative duration are skipped with a warning.
///
/// # Arguments
///
/// * `worker` - The worker, supplying the hourly wage
/// * `year` - Calendar year
/// * `month` - Calendar month (1-12)
/// * `intervals` - The worker's attendance ledger; may include other months
/// * `rules` - Holiday allowance and night premium rules
///
/// # Returns
///
/// The [`PaySummary`] for the month, or a validation error when `month` is
/// out of range.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::calculate_monthly_pay;
/// use attendance_engine::config::PayRules;
/// use attendance_engine::models::{WorkInterval, Worker};
/// use chrono::NaiveDateTime;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let worker = Worker {
///     id: "worker_001".to_string(),
///     name: "Kim".to_string(),
///     hourly_wage: 10000,
///     scheduled_start_time: None,
/// };
/// let mut interval = WorkInterval::open("worker_001", at("2026-03-02 09:00:00"), false);
/// interval.end = Some(at("2026-03-02 18:00:00"));
///
/// let summary = calculate_monthly_pay(&worker, 2026, 3, &[interval], &PayRules::default()).unwrap();
/// assert_eq!(summary.base_salary, 90000);
/// assert_eq!(summary.final_salary, 90000);
/// ```
pub fn calculate_monthly_pay(
    worker: &Worker,
    year: i32,
    month: u32,
    intervals: &[WorkInterval],
    rules: &PayRules,
) -> EngineResult<PaySummary> {
    if !(1..=12).contains(&month) {
        return Err(EngineError::validation(
            "month",
            format!("{} is not between 1 and 12", month),
        ));
    }

    let wage = Decimal::from(worker.hourly_wage);
    let mut worked = Vec::new();
    let mut total_night_hours = Decimal::ZERO;

    for interval in intervals.iter().filter(|i| i.started_in(year, month)) {
        let (Some(end), Some(hours)) = (interval.end, interval.worked_hours()) else {
            continue;
        };
        if hours < Decimal::ZERO {
            warn!(
                worker_id = %worker.id,
                interval_id = %interval.id,
                hours = %hours,
                "Skipping interval that ends before it starts"
            );
            continue;
        }

        total_night_hours += night_overlap_hours(interval.start, end);
        worked.push(WorkedHours {
            start: interval.start,
            hours,
        });
    }

    if worked.is_empty() {
        return Ok(PaySummary::empty(&worker.id, year, month, worker.hourly_wage));
    }

    let total_hours: Decimal = worked.iter().map(|w| w.hours).sum();
    let buckets = bucket_by_week(&worked);
    let holiday = calculate_holiday_pay(&buckets, wage, &rules.weekly_holiday);
    let night_pay = total_night_hours * wage * rules.night_premium_multiplier;

    let base_salary = floor_currency(total_hours * wage);
    let final_salary = floor_currency(Decimal::from(base_salary) + holiday.total + night_pay);

    Ok(PaySummary {
        worker_id: worker.id.clone(),
        year,
        month,
        hourly_wage: worker.hourly_wage,
        total_hours,
        base_salary,
        total_holiday_pay: floor_currency(holiday.total),
        total_night_hours,
        total_night_pay: floor_currency(night_pay),
        final_salary,
    })
}
