//! Monthly pay summary model.
//!
//! [`PaySummary`] is the output of the pay calculator. It is derived on
//! demand and never persisted. Hour totals are kept exact and rendered with
//! one decimal place on the wire; money fields are whole currency units.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize, Serializer};

/// Renders hours with exactly one decimal place, e.g. `9` as `"9.0"`.
fn serialize_one_decimal<S: Serializer>(hours: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_hours(*hours))
}

/// Formats an hour total with one decimal place, rounding half away from zero.
///
/// # Example
///
/// ```
/// use attendance_engine::models::format_hours;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_hours(Decimal::new(9, 0)), "9.0");
/// assert_eq!(format_hours(Decimal::new(425, 2)), "4.3");
/// ```
pub fn format_hours(hours: Decimal) -> String {
    let mut rounded = hours.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(1);
    rounded.to_string()
}

/// A worker's pay for one calendar month.
///
/// # Example
///
/// ```
/// use attendance_engine::models::PaySummary;
///
/// let summary = PaySummary::empty("worker_001", 2026, 3, 10000);
/// let json = serde_json::to_value(&summary).unwrap();
/// assert_eq!(json["totalHours"], "0.0");
/// assert_eq!(json["finalSalary"], 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaySummary {
    /// The worker the summary belongs to.
    pub worker_id: String,
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
    /// Hourly wage used for the computation.
    pub hourly_wage: u32,
    /// Total hours worked across closed intervals.
    #[serde(serialize_with = "serialize_one_decimal")]
    pub total_hours: Decimal,
    /// `floor(total_hours * hourly_wage)`.
    pub base_salary: u64,
    /// Weekly rest allowance, floored once after summing all weeks.
    pub total_holiday_pay: u64,
    /// Hours that fell inside the night windows.
    #[serde(serialize_with = "serialize_one_decimal")]
    pub total_night_hours: Decimal,
    /// Night premium, floored.
    pub total_night_pay: u64,
    /// `floor(base_salary + holiday pay + night pay)` using the unfloored allowances.
    pub final_salary: u64,
}

impl PaySummary {
    /// Returns an all-zero summary for a month with no closed intervals.
    pub fn empty(worker_id: impl Into<String>, year: i32, month: u32, hourly_wage: u32) -> Self {
        Self {
            worker_id: worker_id.into(),
            year,
            month,
            hourly_wage,
            total_hours: Decimal::ZERO,
            base_salary: 0,
            total_holiday_pay: 0,
            total_night_hours: Decimal::ZERO,
            total_night_pay: 0,
            final_salary: 0,
        }
    }
}
