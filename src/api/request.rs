//! Request types for the attendance API.
//!
//! This module defines the JSON bodies and query strings accepted by the
//! endpoints, and their conversion into domain types.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{NewWorker, Schedule};

/// Request body for `POST /attendance/check-in` and `/attendance/check-out`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRequest {
    /// The worker checking in or out.
    pub worker_id: String,
}

/// Query string selecting a calendar month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MonthQuery {
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
}

/// Query string selecting a single day.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DateQuery {
    /// The day; defaults to today when absent.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Request body for `POST /manager/workers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterWorkerRequest {
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

impl TryFrom<RegisterWorkerRequest> for NewWorker {
    type Error = EngineError;

    fn try_from(req: RegisterWorkerRequest) -> EngineResult<Self> {
        let id = req.id.trim();
        if id.is_empty() {
            return Err(EngineError::validation("id", "must not be empty"));
        }
        let name = req.name.trim();
        if name.is_empty() {
            return Err(EngineError::validation("name", "must not be empty"));
        }

        Ok(NewWorker {
            id: id.to_string(),
            name: name.to_string(),
            hourly_wage: req.hourly_wage,
            scheduled_start_time: req.scheduled_start_time,
        })
    }
}

/// Request body for `PUT /manager/workers/:id/start-time`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTimeRequest {
    /// New scheduled start of the working day.
    pub scheduled_start_time: NaiveTime,
}

/// Request body for `POST /manager/schedules`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    /// The worker the shifts are planned for.
    pub worker_id: String,
    /// First day of the range (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the range (inclusive).
    pub end_date: NaiveDate,
    /// Planned start time on each day.
    pub start_time: NaiveTime,
    /// Planned end time on each day.
    pub end_time: NaiveTime,
}

impl ScheduleRequest {
    /// Expands the request into one schedule entry per day.
    pub fn into_schedules(self) -> EngineResult<Vec<Schedule>> {
        let worker_id = self.worker_id.trim();
        if worker_id.is_empty() {
            return Err(EngineError::validation("workerId", "must not be empty"));
        }
        Schedule::for_range(
            worker_id,
            self.start_date,
            self.end_date,
            self.start_time,
            self.end_time,
        )
    }
}
