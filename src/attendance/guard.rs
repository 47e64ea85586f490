//! Check-in / check-out state machine.
//!
//! Each worker is either CLOSED (no open interval) or OPEN (exactly one).
//! [`AttendanceGuard`] moves between the two inside a per-worker ledger
//! transaction, so two simultaneous check-ins for the same worker cannot both
//! observe CLOSED.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::clock::Clock;
use crate::error::{EngineError, EngineResult};
use crate::models::{WorkInterval, normalize_worker_id};

use super::events::{AttendanceEvent, AttendanceEventKind, EventBus};
use super::store::AttendanceStore;

/// Result of a successful check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInOutcome {
    /// The worker that checked in.
    pub worker_id: String,
    /// Recorded check-in time.
    pub time: NaiveDateTime,
    /// Whether the check-in was after the worker's scheduled start.
    pub is_late: bool,
}

/// Result of a successful check-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutOutcome {
    /// The worker that checked out.
    pub worker_id: String,
    /// Recorded check-out time.
    pub time: NaiveDateTime,
    /// The interval that was closed.
    pub interval: WorkInterval,
}

/// Enforces at most one open interval per worker.
#[derive(Clone)]
pub struct AttendanceGuard {
    store: Arc<AttendanceStore>,
    events: EventBus,
    clock: Arc<dyn Clock>,
}

impl AttendanceGuard {
    /// Creates a guard over `store`, publishing to `events` and reading the
    /// current time from `clock`.
    pub fn new(store: Arc<AttendanceStore>, events: EventBus, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            events,
            clock,
        }
    }

    /// Checks a worker in at the current time.
    pub async fn check_in(&self, worker_id: &str) -> EngineResult<CheckInOutcome> {
        self.check_in_at(worker_id, self.clock.now()).await
    }

    /// Checks a worker out at the current time.
    pub async fn check_out(&self, worker_id: &str) -> EngineResult<CheckOutOutcome> {
        self.check_out_at(worker_id, self.clock.now()).await
    }

    /// Opens a new interval for `worker_id` at `now`.
    ///
    /// # Errors
    ///
    /// * [`EngineError::Validation`] for an empty worker ID
    /// * [`EngineError::WorkerNotFound`] for an unknown worker
    /// * [`EngineError::AlreadyCheckedIn`] if an interval is already open
    /// * [`EngineError::StorageUnavailable`] if the worker's lock could not be
    ///   acquired in time; nothing was written and the call may be retried
    pub async fn check_in_at(
        &self,
        worker_id: &str,
        now: NaiveDateTime,
    ) -> EngineResult<CheckInOutcome> {
        let worker_id = normalize_worker_id(worker_id)?;
        let mut tx = self.store.begin(worker_id).await?;

        if tx.open_interval().is_some() {
            warn!(worker_id = %worker_id, "Check-in rejected, already checked in");
            return Err(EngineError::AlreadyCheckedIn {
                worker_id: worker_id.to_string(),
            });
        }

        let is_late = tx.worker().is_late_at(now);
        tx.stage_open(WorkInterval::open(worker_id, now, is_late))?;
        tx.commit();

        info!(worker_id = %worker_id, time = %now, is_late, "Worker checked in");
        self.events.publish(AttendanceEvent {
            kind: AttendanceEventKind::CheckIn,
            worker_id: worker_id.to_string(),
            timestamp: now,
            is_late: Some(is_late),
        });

        Ok(CheckInOutcome {
            worker_id: worker_id.to_string(),
            time: now,
            is_late,
        })
    }

    /// Closes the open interval for `worker_id` at `now`.
    ///
    /// A `now` earlier than the check-in is clamped to the check-in time,
    /// leaving a zero-length interval.
    ///
    /// # Errors
    ///
    /// Same as [`check_in_at`](Self::check_in_at), with
    /// [`EngineError::NotCheckedIn`] when no interval is open.
    pub async fn check_out_at(
        &self,
        worker_id: &str,
        now: NaiveDateTime,
    ) -> EngineResult<CheckOutOutcome> {
        let worker_id = normalize_worker_id(worker_id)?;
        let mut tx = self.store.begin(worker_id).await?;

        let Some(start) = tx.open_interval().map(|open| open.start) else {
            warn!(worker_id = %worker_id, "Check-out rejected, not checked in");
            return Err(EngineError::NotCheckedIn {
                worker_id: worker_id.to_string(),
            });
        };

        let end = if now < start {
            warn!(
                worker_id = %worker_id,
                check_in = %start,
                check_out = %now,
                "Check-out precedes check-in, clamping to check-in time"
            );
            start
        } else {
            now
        };

        let interval = tx.stage_close(end)?;
        tx.commit();

        info!(worker_id = %worker_id, time = %end, "Worker checked out");
        self.events.publish(AttendanceEvent {
            kind: AttendanceEventKind::CheckOut,
            worker_id: worker_id.to_string(),
            timestamp: end,
            is_late: None,
        });

        Ok(CheckOutOutcome {
            worker_id: worker_id.to_string(),
            time: end,
            interval,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::Worker;
    use chrono::NaiveTime;
    use std::time::Duration;

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn create_test_worker(id: &str) -> Worker {
        Worker {
            id: id.to_string(),
            name: "Kim".to_string(),
            hourly_wage: 10000,
            scheduled_start_time: NaiveTime::from_hms_opt(9, 0, 0),
        }
    }

    fn create_guard(lock_timeout_ms: u64) -> (AttendanceGuard, Arc<AttendanceStore>, EventBus) {
        let store = Arc::new(AttendanceStore::new(Duration::from_millis(lock_timeout_ms)));
        store.register_worker(create_test_worker("worker_001")).unwrap();
        store.register_worker(create_test_worker("worker_002")).unwrap();
        let events = EventBus::new(16);
        let clock = Arc::new(FixedClock::new(make_datetime("2026-03-02 08:55:00")));
        let guard = AttendanceGuard::new(Arc::clone(&store), events.clone(), clock);
        (guard, store, events)
    }

    // ==========================================================================
    // AG-001: check-in then check-out produces one closed interval
    // ==========================================================================
    #[tokio::test]
    async fn test_ag_001_check_in_then_out() {
        let (guard, store, _) = create_guard(100);

        let check_in = guard
            .check_in_at("worker_001", make_datetime("2026-03-02 09:00:00"))
            .await
            .unwrap();
        assert!(!check_in.is_late);

        let check_out = guard
            .check_out_at("worker_001", make_datetime("2026-03-02 18:00:00"))
            .await
            .unwrap();
        assert_eq!(check_out.interval.start, make_datetime("2026-03-02 09:00:00"));
        assert_eq!(check_out.interval.end, Some(make_datetime("2026-03-02 18:00:00")));

        let intervals = store.intervals("worker_001").await.unwrap();
        assert_eq!(intervals.len(), 1);
        assert!(!intervals[0].is_open());
    }

    // ==========================================================================
    // AG-002: second check-in while open is a conflict
    // ==========================================================================
    #[tokio::test]
    async fn test_ag_002_double_check_in_is_rejected() {
        let (guard, store, _) = create_guard(100);
        guard
            .check_in_at("worker_001", make_datetime("2026-03-02 09:00:00"))
            .await
            .unwrap();

        let err = guard
            .check_in_at("worker_001", make_datetime("2026-03-02 09:05:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::AlreadyCheckedIn { .. }));
        assert!(!err.is_retryable());
        assert_eq!(store.intervals("worker_001").await.unwrap().len(), 1);
    }

    // ==========================================================================
    // AG-003: check-out while closed is a conflict
    // ==========================================================================
    #[tokio::test]
    async fn test_ag_003_check_out_without_check_in_is_rejected() {
        let (guard, store, _) = create_guard(100);

        let err = guard
            .check_out_at("worker_001", make_datetime("2026-03-02 18:00:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotCheckedIn { .. }));
        assert!(store.intervals("worker_001").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_late_check_in_is_flagged() {
        let (guard, store, _) = create_guard(100);
        let outcome = guard
            .check_in_at("worker_001", make_datetime("2026-03-02 09:10:00"))
            .await
            .unwrap();
        assert!(outcome.is_late);
        assert!(store.intervals("worker_001").await.unwrap()[0].is_late);
    }

    #[tokio::test]
    async fn test_lateness_follows_updated_start_time() {
        let (guard, store, _) = create_guard(100);
        guard
            .check_in_at("worker_001", make_datetime("2026-03-02 09:30:00"))
            .await
            .unwrap();
        guard
            .check_out_at("worker_001", make_datetime("2026-03-02 17:00:00"))
            .await
            .unwrap();

        store
            .set_scheduled_start_time("worker_001", NaiveTime::from_hms_opt(10, 0, 0))
            .await
            .unwrap();
        let outcome = guard
            .check_in_at("worker_001", make_datetime("2026-03-03 09:30:00"))
            .await
            .unwrap();
        assert!(!outcome.is_late);

        let intervals = store.intervals("worker_001").await.unwrap();
        assert!(intervals[0].is_late);
        assert!(!intervals[1].is_late);
    }

    #[tokio::test]
    async fn test_removed_worker_cannot_check_in() {
        let (guard, store, _) = create_guard(100);
        store.remove_worker("worker_001").await.unwrap();

        assert!(matches!(
            guard
                .check_in_at("worker_001", make_datetime("2026-03-02 09:00:00"))
                .await,
            Err(EngineError::WorkerNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_check_in_uses_clock() {
        let (guard, _, _) = create_guard(100);
        let outcome = guard.check_in("worker_001").await.unwrap();
        assert_eq!(outcome.time, make_datetime("2026-03-02 08:55:00"));
    }

    #[tokio::test]
    async fn test_early_check_out_is_clamped_to_check_in() {
        let (guard, _, _) = create_guard(100);
        guard
            .check_in_at("worker_001", make_datetime("2026-03-02 09:00:00"))
            .await
            .unwrap();

        let outcome = guard
            .check_out_at("worker_001", make_datetime("2026-03-02 08:00:00"))
            .await
            .unwrap();
        assert_eq!(outcome.time, make_datetime("2026-03-02 09:00:00"));
        assert_eq!(outcome.interval.worked_hours(), Some(rust_decimal::Decimal::ZERO));
    }

    #[tokio::test]
    async fn test_unknown_and_empty_worker_ids() {
        let (guard, _, _) = create_guard(100);
        let now = make_datetime("2026-03-02 09:00:00");

        assert!(matches!(
            guard.check_in_at("nobody", now).await,
            Err(EngineError::WorkerNotFound { .. })
        ));
        assert!(matches!(
            guard.check_in_at("  ", now).await,
            Err(EngineError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_events_published_after_commit() {
        let (guard, _, events) = create_guard(100);
        let mut rx = events.subscribe();

        guard
            .check_in_at("worker_001", make_datetime("2026-03-02 09:30:00"))
            .await
            .unwrap();
        guard
            .check_out_at("worker_001", make_datetime("2026-03-02 17:00:00"))
            .await
            .unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.kind, AttendanceEventKind::CheckIn);
        assert_eq!(first.is_late, Some(true));
        let second = rx.recv().await.unwrap();
        assert_eq!(second.kind, AttendanceEventKind::CheckOut);
        assert_eq!(second.timestamp, make_datetime("2026-03-02 17:00:00"));
    }

    #[tokio::test]
    async fn test_rejected_check_in_publishes_nothing() {
        let (guard, _, events) = create_guard(100);
        let mut rx = events.subscribe();

        let _ = guard
            .check_out_at("worker_001", make_datetime("2026-03-02 17:00:00"))
            .await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_lock_timeout_is_transient_and_writes_nothing() {
        let (guard, store, _) = create_guard(20);
        let held = store.begin("worker_001").await.unwrap();

        let err = guard
            .check_in_at("worker_001", make_datetime("2026-03-02 09:00:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::StorageUnavailable { .. }));
        assert!(err.is_retryable());

        drop(held);
        assert!(store.intervals("worker_001").await.unwrap().is_empty());

        // Retrying after the lock is released succeeds
        assert!(guard
            .check_in_at("worker_001", make_datetime("2026-03-02 09:00:00"))
            .await
            .is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_check_ins_admit_exactly_one() {
        let (guard, store, _) = create_guard(5000);
        let now = make_datetime("2026-03-02 09:00:00");

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let guard = guard.clone();
                tokio::spawn(async move { guard.check_in_at("worker_001", now).await })
            })
            .collect();

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(EngineError::AlreadyCheckedIn { .. }) => conflicts += 1,
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 15);
        let intervals = store.intervals("worker_001").await.unwrap();
        assert_eq!(intervals.iter().filter(|i| i.is_open()).count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_check_ins_for_different_workers_all_succeed() {
        let (guard, _, _) = create_guard(5000);
        let now = make_datetime("2026-03-02 09:00:00");

        let first = tokio::spawn({
            let guard = guard.clone();
            async move { guard.check_in_at("worker_001", now).await }
        });
        let second = tokio::spawn({
            let guard = guard.clone();
            async move { guard.check_in_at("worker_002", now).await }
        });

        assert!(first.await.unwrap().is_ok());
        assert!(second.await.unwrap().is_ok());
    }
}
