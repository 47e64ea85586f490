//! Attendance history across all workers, newest session first.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{WorkInterval, Worker, format_hours};

use super::store::AttendanceStore;

/// One recorded work session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// The interval this record describes.
    pub interval_id: Uuid,
    /// Worker ID.
    pub worker_id: String,
    /// Display name.
    pub name: String,
    /// Day the session started.
    pub date: NaiveDate,
    /// Check-in time.
    pub check_in: NaiveDateTime,
    /// Check-out time; `None` while the worker is still in.
    pub check_out: Option<NaiveDateTime>,
    /// Worked hours of a closed session.
    #[serde(serialize_with = "serialize_optional_hours")]
    pub worked_hours: Option<Decimal>,
    /// Worked duration as `"<h>h <m>m"`, whole minutes.
    pub worked_time: Option<String>,
    /// Lateness recorded at check-in.
    pub is_late: bool,
}

impl AttendanceRecord {
    fn new(worker: &Worker, interval: &WorkInterval) -> Self {
        Self {
            interval_id: interval.id,
            worker_id: worker.id.clone(),
            name: worker.name.clone(),
            date: interval.start.date(),
            check_in: interval.start,
            check_out: interval.end,
            worked_hours: interval.worked_hours(),
            worked_time: interval.end.map(|end| format_worked_time(end - interval.start)),
            is_late: interval.is_late,
        }
    }
}

fn serialize_optional_hours<S: Serializer>(
    hours: &Option<Decimal>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match hours {
        Some(hours) => serializer.serialize_some(&format_hours(*hours)),
        None => serializer.serialize_none(),
    }
}

fn format_worked_time(duration: chrono::Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Lists every worker's sessions, newest check-in first.
///
/// Sessions with the same check-in time are ordered by worker ID.
pub async fn attendance_history(store: &AttendanceStore) -> EngineResult<Vec<AttendanceRecord>> {
    let mut records = Vec::new();
    for worker in store.workers() {
        let intervals = match store.intervals(&worker.id).await {
            Ok(intervals) => intervals,
            Err(EngineError::WorkerNotFound { .. }) => continue,
            Err(err) => return Err(err),
        };
        records.extend(
            intervals
                .iter()
                .map(|interval| AttendanceRecord::new(&worker, interval)),
        );
    }

    records.sort_by(|a, b| {
        b.check_in
            .cmp(&a.check_in)
            .then_with(|| a.worker_id.cmp(&b.worker_id))
    });
    Ok(records)
}
