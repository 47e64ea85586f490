//! Manager dashboard: who is in today.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::WorkInterval;

use super::store::AttendanceStore;

/// A worker's attendance state on the dashboard day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    /// No session started on the day.
    NotCheckedIn,
    /// The day's latest session is still open.
    Working,
    /// The day's latest session is closed.
    CheckedOut,
}

/// One row of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerStatus {
    /// Worker ID.
    pub worker_id: String,
    /// Display name.
    pub name: String,
    /// Current state.
    pub status: AttendanceStatus,
    /// Check-in time of the day's latest session, as `HH:MM`.
    pub check_in_time: Option<String>,
    /// Lateness recorded at that check-in.
    pub is_late: bool,
}

/// Headline counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Workers with at least one session started on the day.
    pub checked_in_today: usize,
    /// Workers currently checked in.
    pub working: usize,
    /// Workers whose latest session of the day was late.
    pub late: usize,
    /// All registered workers.
    pub total_workers: usize,
}

/// The dashboard for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// The day shown.
    pub date: NaiveDate,
    /// Headline counts.
    pub stats: DashboardStats,
    /// One row per worker, ordered by worker ID.
    pub workers: Vec<WorkerStatus>,
}

/// Picks the session that describes a worker's day.
///
/// The open interval wins when it started on `date`, whatever its start time;
/// otherwise the latest closed session of the day is used.
fn session_on(intervals: &[WorkInterval], date: NaiveDate) -> Option<&WorkInterval> {
    let started_on_date = |interval: &&WorkInterval| interval.start.date() == date;
    intervals
        .last()
        .filter(|last| last.is_open())
        .filter(started_on_date)
        .or_else(|| {
            intervals
                .iter()
                .filter(|i| !i.is_open())
                .filter(started_on_date)
                .max_by_key(|i| i.start)
        })
}

/// Builds the dashboard for `date` from every worker's ledger.
///
/// Only sessions that started on `date` are considered. A session still open
/// decides the row; otherwise the latest closed one does. Workers removed
/// while the view is being built are left out.
pub async fn dashboard(store: &AttendanceStore, date: NaiveDate) -> EngineResult<DashboardView> {
    let workers = store.workers();
    let mut stats = DashboardStats::default();
    let mut rows = Vec::with_capacity(workers.len());

    for worker in workers {
        let intervals = match store.intervals(&worker.id).await {
            Ok(intervals) => intervals,
            Err(EngineError::WorkerNotFound { .. }) => continue,
            Err(err) => return Err(err),
        };
        let row = match session_on(&intervals, date) {
            None => WorkerStatus {
                worker_id: worker.id,
                name: worker.name,
                status: AttendanceStatus::NotCheckedIn,
                check_in_time: None,
                is_late: false,
            },
            Some(session) => {
                stats.checked_in_today += 1;
                let status = if session.is_open() {
                    stats.working += 1;
                    AttendanceStatus::Working
                } else {
                    AttendanceStatus::CheckedOut
                };
                if session.is_late {
                    stats.late += 1;
                }
                WorkerStatus {
                    worker_id: worker.id,
                    name: worker.name,
                    status,
                    check_in_time: Some(session.start.format("%H:%M").to_string()),
                    is_late: session.is_late,
                }
            }
        };
        rows.push(row);
    }
    stats.total_workers = rows.len();

    Ok(DashboardView {
        date,
        stats,
        workers: rows,
    })
}
