//! Calculation logic for the attendance and pay engine.
//!
//! This module contains the pure pay functions: night window overlap,
//! week-of-month bucketing, the weekly rest allowance and the monthly pay
//! calculation that combines them. None of them touch storage.

mod holiday_allowance;
mod monthly_pay;
mod night_hours;
mod weekly_hours;

pub use holiday_allowance::{HolidayPayResult, WeeklyHolidayPay, calculate_holiday_pay, weekly_holiday_pay};
pub use monthly_pay::calculate_monthly_pay;
pub use night_hours::{NIGHT_END_HOUR, NIGHT_START_HOUR, NightWindow, night_overlap_hours, night_windows};
pub use weekly_hours::{WorkedHours, bucket_by_week, week_of_month};
