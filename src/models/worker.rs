//! Worker model and related types.
//!
//! This module defines the Worker struct for representing the people who
//! check in and out, together with the wage used for pay computation.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Trims a worker ID supplied by a caller.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] on `workerId` if nothing is left.
pub fn normalize_worker_id(worker_id: &str) -> EngineResult<&str> {
    let trimmed = worker_id.trim();
    if trimmed.is_empty() {
        return Err(EngineError::validation("workerId", "must not be empty"));
    }
    Ok(trimmed)
}

/// Represents a worker whose attendance is tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    /// Unique identifier for the worker.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Hourly wage in whole currency units.
    pub hourly_wage: u32,
    /// Scheduled start of the working day, used only to flag late check-ins.
    #[serde(default)]
    pub scheduled_start_time: Option<NaiveTime>,
}

impl Worker {
    /// Returns true if a check-in at `at` is later than the scheduled start
    /// time on the same calendar day.
    ///
    /// Workers without a scheduled start time are never late.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::Worker;
    /// use chrono::{NaiveDateTime, NaiveTime};
    ///
    /// let worker = Worker {
    ///     id: "worker_001".to_string(),
    ///     name: "Kim".to_string(),
    ///     hourly_wage: 10000,
    ///     scheduled_start_time: NaiveTime::from_hms_opt(9, 0, 0),
    /// };
    /// let on_time = NaiveDateTime::parse_from_str("2026-03-02 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
    /// let late = NaiveDateTime::parse_from_str("2026-03-02 09:00:01", "%Y-%m-%d %H:%M:%S").unwrap();
    /// assert!(!worker.is_late_at(on_time));
    /// assert!(worker.is_late_at(late));
    /// ```
    pub fn is_late_at(&self, at: NaiveDateTime) -> bool {
        self.scheduled_start_time
            .is_some_and(|start| at.time() > start)
    }
}

/// Input for registering a new worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorker {
    /// Unique identifier for the worker.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Hourly wage; the configured default applies when absent.
    #[serde(default)]
    pub hourly_wage: Option<u32>,
    /// Scheduled start of the working day.
    #[serde(default)]
    pub scheduled_start_time: Option<NaiveTime>,
}

impl NewWorker {
    /// Builds the worker record, filling in the default wage if none was given.
    pub fn into_worker(self, default_hourly_wage: u32) -> Worker {
        Worker {
            id: self.id,
            name: self.name,
            hourly_wage: self.hourly_wage.unwrap_or(default_hourly_wage),
            scheduled_start_time: self.scheduled_start_time,
        }
    }
}
