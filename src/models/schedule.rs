//! Planned work schedule model.
//!
//! Schedules are set by a manager for display. They never feed the pay
//! calculation, which uses actual attendance only.

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// Longest date range accepted in a single schedule registration.
pub const MAX_SCHEDULE_RANGE_DAYS: i64 = 366;

/// A planned shift for one worker on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Unique identifier for the schedule entry.
    pub id: Uuid,
    /// The worker the shift is planned for.
    pub worker_id: String,
    /// Day of the shift.
    pub date: NaiveDate,
    /// Planned start time.
    pub start_time: NaiveTime,
    /// Planned end time. May be earlier than `start_time` for overnight shifts.
    pub end_time: NaiveTime,
}

impl Schedule {
    /// Expands an inclusive date range into one schedule entry per day.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `end_date` precedes `start_date` or the
    /// range is longer than [`MAX_SCHEDULE_RANGE_DAYS`].
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_engine::models::Schedule;
    /// use chrono::{NaiveDate, NaiveTime};
    ///
    /// let entries = Schedule::for_range(
    ///     "worker_001",
    ///     NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
    ///     NaiveDate::from_ymd_opt(2026, 3, 6).unwrap(),
    ///     NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
    ///     NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
    /// ).unwrap();
    /// assert_eq!(entries.len(), 5);
    /// ```
    pub fn for_range(
        worker_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> EngineResult<Vec<Schedule>> {
        if end_date < start_date {
            return Err(EngineError::validation(
                "endDate",
                format!("{} is before start date {}", end_date, start_date),
            ));
        }

        let span = (end_date - start_date).num_days() + 1;
        if span > MAX_SCHEDULE_RANGE_DAYS {
            return Err(EngineError::validation(
                "endDate",
                format!(
                    "range of {} days exceeds the maximum of {}",
                    span, MAX_SCHEDULE_RANGE_DAYS
                ),
            ));
        }

        Ok(start_date
            .iter_days()
            .take_while(|date| *date <= end_date)
            .map(|date| Schedule {
                id: Uuid::new_v4(),
                worker_id: worker_id.to_string(),
                date,
                start_time,
                end_time,
            })
            .collect())
    }

    /// Returns true if the schedule falls in the given calendar month.
    pub fn is_in_month(&self, year: i32, month: u32) -> bool {
        self.date.year() == year && self.date.month() == month
    }
}
