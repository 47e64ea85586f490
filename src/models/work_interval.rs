//! Work interval model.
//!
//! A [`WorkInterval`] is one continuous work session, opened by a check-in
//! and closed by a check-out. The attendance ledger of a worker is an ordered
//! list of these.

use chrono::{Datelike, Duration, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Returns the signed number of hours between two datetimes.
///
/// Millisecond precision; negative when `end` precedes `start`.
///
/// # Example
///
/// ```
/// use attendance_engine::models::hours_between;
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let start = NaiveDateTime::parse_from_str("2026-03-02 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let end = NaiveDateTime::parse_from_str("2026-03-02 18:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(hours_between(start, end), Decimal::new(95, 1));
/// ```
pub fn hours_between(start: NaiveDateTime, end: NaiveDateTime) -> Decimal {
    duration_hours(end - start)
}

/// Converts a duration to fractional hours at millisecond precision.
pub fn duration_hours(duration: Duration) -> Decimal {
    Decimal::new(duration.num_milliseconds(), 0) / Decimal::new(3_600_000, 0)
}

/// One continuous work session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkInterval {
    /// Unique identifier for the interval.
    pub id: Uuid,
    /// The worker who owns this interval.
    pub worker_id: String,
    /// Check-in time.
    pub start: NaiveDateTime,
    /// Check-out time; `None` while the worker is still clocked in.
    pub end: Option<NaiveDateTime>,
    /// Whether the check-in was later than the worker's scheduled start.
    #[serde(default)]
    pub is_late: bool,
}

impl WorkInterval {
    /// Opens a new interval at `start`.
    pub fn open(worker_id: impl Into<String>, start: NaiveDateTime, is_late: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            worker_id: worker_id.into(),
            start,
            end: None,
            is_late,
        }
    }

    /// Returns true while the interval has no end.
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Returns the worked hours of a closed interval, or `None` while open.
    pub fn worked_hours(&self) -> Option<Decimal> {
        self.end.map(|end| hours_between(self.start, end))
    }

    /// Returns true if the interval started in the given calendar month.
    pub fn started_in(&self, year: i32, month: u32) -> bool {
        self.start.year() == year && self.start.month() == month
    }
}
