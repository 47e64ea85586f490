//! In-process storage for workers, attendance ledgers and schedules.
//!
//! Each worker's ledger sits behind its own async mutex. Every read-decide-write
//! on a ledger happens inside a [`LedgerTransaction`], which holds that lock
//! until it is committed or dropped. Writes are staged and only applied on
//! [`LedgerTransaction::commit`]; a dropped transaction writes nothing.
//!
//! Changes to a worker's record (start time, removal) also take the ledger
//! lock, so they never interleave with a check-in or check-out.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{Schedule, WorkInterval, Worker, normalize_worker_id};

/// A worker's append-only attendance history, in check-in order.
///
/// Only the most recent interval can be open.
#[derive(Debug, Default)]
pub struct Ledger {
    intervals: Vec<WorkInterval>,
    // Set when the worker is deleted; waiters still holding the handle see it.
    removed: bool,
}

impl Ledger {
    /// Returns every interval, oldest first.
    pub fn intervals(&self) -> &[WorkInterval] {
        &self.intervals
    }

    /// Returns the open interval, if the worker is currently checked in.
    pub fn open_interval(&self) -> Option<&WorkInterval> {
        self.intervals.last().filter(|i| i.is_open())
    }
}

fn not_found(worker_id: &str) -> EngineError {
    EngineError::WorkerNotFound {
        worker_id: worker_id.to_string(),
    }
}

struct WorkerEntry {
    worker: Worker,
    ledger: Arc<Mutex<Ledger>>,
}

/// A write staged inside a transaction.
#[derive(Debug)]
enum StagedWrite {
    Open(WorkInterval),
    Close(WorkInterval),
}

/// Exclusive access to one worker's ledger.
///
/// Holds the worker's lock for its whole lifetime. Nothing is written until
/// [`commit`](Self::commit) is called.
pub struct LedgerTransaction {
    worker: Worker,
    ledger: OwnedMutexGuard<Ledger>,
    staged: Option<StagedWrite>,
}

impl LedgerTransaction {
    /// The worker this transaction belongs to.
    pub fn worker(&self) -> &Worker {
        &self.worker
    }

    /// The worker's open interval as of the start of the transaction.
    pub fn open_interval(&self) -> Option<&WorkInterval> {
        self.ledger.open_interval()
    }

    /// Stages a new open interval.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AlreadyCheckedIn`] if the ledger already has an
    /// open interval.
    pub fn stage_open(&mut self, interval: WorkInterval) -> EngineResult<()> {
        if self.open_interval().is_some() {
            return Err(EngineError::AlreadyCheckedIn {
                worker_id: self.worker.id.clone(),
            });
        }
        self.staged = Some(StagedWrite::Open(interval));
        Ok(())
    }

    /// Stages closing the open interval at `end` and returns the closed copy.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotCheckedIn`] if there is no open interval.
    pub fn stage_close(&mut self, end: NaiveDateTime) -> EngineResult<WorkInterval> {
        let mut closed = self
            .open_interval()
            .cloned()
            .ok_or_else(|| EngineError::NotCheckedIn {
                worker_id: self.worker.id.clone(),
            })?;
        closed.end = Some(end);
        self.staged = Some(StagedWrite::Close(closed.clone()));
        Ok(closed)
    }

    /// Applies the staged write and releases the lock.
    pub fn commit(mut self) {
        match self.staged.take() {
            Some(StagedWrite::Open(interval)) => self.ledger.intervals.push(interval),
            Some(StagedWrite::Close(closed)) => {
                if let Some(slot) = self.ledger.intervals.iter_mut().find(|i| i.id == closed.id) {
                    *slot = closed;
                }
            }
            None => {}
        }
    }
}

impl Drop for LedgerTransaction {
    fn drop(&mut self) {
        if self.staged.is_some() {
            debug!(worker_id = %self.worker.id, "Rolling back uncommitted attendance write");
        }
    }
}

/// Shared storage for the attendance service.
pub struct AttendanceStore {
    workers: RwLock<BTreeMap<String, WorkerEntry>>,
    schedules: RwLock<Vec<Schedule>>,
    lock_timeout: Duration,
}

impl AttendanceStore {
    /// Creates an empty store whose ledger locks wait at most `lock_timeout`.
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            workers: RwLock::new(BTreeMap::new()),
            schedules: RwLock::new(Vec::new()),
            lock_timeout,
        }
    }

    fn read_workers(&self) -> RwLockReadGuard<'_, BTreeMap<String, WorkerEntry>> {
        self.workers.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_workers(&self) -> RwLockWriteGuard<'_, BTreeMap<String, WorkerEntry>> {
        self.workers.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers a new worker with an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::WorkerExists`] if the ID is taken.
    pub fn register_worker(&self, worker: Worker) -> EngineResult<Worker> {
        let mut workers = self.write_workers();
        if workers.contains_key(&worker.id) {
            return Err(EngineError::WorkerExists {
                worker_id: worker.id,
            });
        }
        workers.insert(
            worker.id.clone(),
            WorkerEntry {
                worker: worker.clone(),
                ledger: Arc::new(Mutex::new(Ledger::default())),
            },
        );
        Ok(worker)
    }

    /// Looks up a worker by ID.
    pub fn worker(&self, worker_id: &str) -> EngineResult<Worker> {
        self.read_workers()
            .get(worker_id)
            .map(|entry| entry.worker.clone())
            .ok_or_else(|| not_found(worker_id))
    }

    /// Returns every registered worker, ordered by ID.
    pub fn workers(&self) -> Vec<Worker> {
        self.read_workers()
            .values()
            .map(|entry| entry.worker.clone())
            .collect()
    }

    /// Changes the start time used to flag late check-ins.
    ///
    /// Intervals already recorded keep the flag they were given. `None`
    /// disables lateness for the worker.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::WorkerNotFound`] for an unknown worker and
    /// [`EngineError::StorageUnavailable`] if the worker's lock is busy.
    pub async fn set_scheduled_start_time(
        &self,
        worker_id: &str,
        scheduled_start_time: Option<NaiveTime>,
    ) -> EngineResult<Worker> {
        let worker_id = normalize_worker_id(worker_id)?;
        let _ledger = self.lock_live_ledger(worker_id).await?;

        let mut workers = self.write_workers();
        let entry = workers
            .get_mut(worker_id)
            .ok_or_else(|| not_found(worker_id))?;
        entry.worker.scheduled_start_time = scheduled_start_time;
        info!(
            worker_id = %worker_id,
            scheduled_start_time = ?scheduled_start_time,
            "Scheduled start time updated"
        );
        Ok(entry.worker.clone())
    }

    /// Deletes a worker together with their attendance and schedules.
    ///
    /// Waits for the worker's lock, so an in-flight check-in either finishes
    /// first or fails with [`EngineError::WorkerNotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::WorkerNotFound`] for an unknown worker and
    /// [`EngineError::StorageUnavailable`] if the worker's lock is busy.
    pub async fn remove_worker(&self, worker_id: &str) -> EngineResult<Worker> {
        let worker_id = normalize_worker_id(worker_id)?;
        let mut ledger = self.lock_live_ledger(worker_id).await?;

        let entry = self
            .write_workers()
            .remove(worker_id)
            .ok_or_else(|| not_found(worker_id))?;
        ledger.removed = true;
        let discarded = std::mem::take(&mut ledger.intervals).len();
        self.schedules
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .retain(|s| s.worker_id != worker_id);

        info!(worker_id = %worker_id, intervals = discarded, "Worker removed");
        Ok(entry.worker)
    }

    fn ledger_handle(&self, worker_id: &str) -> EngineResult<Arc<Mutex<Ledger>>> {
        self.read_workers()
            .get(worker_id)
            .map(|entry| Arc::clone(&entry.ledger))
            .ok_or_else(|| not_found(worker_id))
    }

    /// Locks a worker's ledger, failing if the worker was removed while
    /// this call was waiting.
    async fn lock_live_ledger(&self, worker_id: &str) -> EngineResult<OwnedMutexGuard<Ledger>> {
        let handle = self.ledger_handle(worker_id)?;
        let ledger = self.lock_ledger(worker_id, handle).await?;
        if ledger.removed {
            return Err(not_found(worker_id));
        }
        Ok(ledger)
    }

    async fn lock_ledger(
        &self,
        worker_id: &str,
        ledger: Arc<Mutex<Ledger>>,
    ) -> EngineResult<OwnedMutexGuard<Ledger>> {
        match tokio::time::timeout(self.lock_timeout, ledger.lock_owned()).await {
            Ok(guard) => Ok(guard),
            Err(_) => {
                warn!(
                    worker_id = %worker_id,
                    timeout_ms = self.lock_timeout.as_millis() as u64,
                    "Timed out waiting for attendance ledger lock"
                );
                Err(EngineError::StorageUnavailable {
                    message: format!(
                        "timed out after {}ms waiting for the ledger of worker '{}'",
                        self.lock_timeout.as_millis(),
                        worker_id
                    ),
                })
            }
        }
    }

    /// Starts a transaction on a worker's ledger, waiting for its lock.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::WorkerNotFound`] for an unknown worker and
    /// [`EngineError::StorageUnavailable`] if the lock is not acquired within
    /// the configured timeout.
    pub async fn begin(&self, worker_id: &str) -> EngineResult<LedgerTransaction> {
        let ledger = self.lock_live_ledger(worker_id).await?;
        // Read under the ledger lock so record changes are never half-seen.
        let worker = self.worker(worker_id)?;
        Ok(LedgerTransaction {
            worker,
            ledger,
            staged: None,
        })
    }

    /// Returns a consistent copy of a worker's ledger.
    pub async fn intervals(&self, worker_id: &str) -> EngineResult<Vec<WorkInterval>> {
        let ledger = self.lock_live_ledger(worker_id).await?;
        Ok(ledger.intervals().to_vec())
    }

    /// Stores schedule entries for a registered worker.
    pub fn add_schedules(&self, worker_id: &str, entries: &[Schedule]) -> EngineResult<()> {
        let worker_id = normalize_worker_id(worker_id)?;
        self.worker(worker_id)?;
        let mut schedules = self
            .schedules
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        schedules.extend_from_slice(entries);
        Ok(())
    }

    /// Returns a worker's schedule entries for a month, ordered by date.
    pub fn schedules_for_month(
        &self,
        worker_id: &str,
        year: i32,
        month: u32,
    ) -> EngineResult<Vec<Schedule>> {
        let worker_id = normalize_worker_id(worker_id)?;
        self.worker(worker_id)?;
        let mut entries: Vec<Schedule> = self
            .schedules
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .filter(|s| s.worker_id == worker_id && s.is_in_month(year, month))
            .cloned()
            .collect();
        entries.sort_by_key(|s| (s.date, s.start_time));
        Ok(entries)
    }

    /// Returns every worker's schedule entries on one date.
    pub fn schedules_on(&self, date: NaiveDate) -> Vec<Schedule> {
        let mut entries: Vec<Schedule> = self
            .schedules
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .filter(|s| s.date == date)
            .cloned()
            .collect();
        entries.sort_by(|a, b| {
            (a.start_time, &a.worker_id).cmp(&(b.start_time, &b.worker_id))
        });
        entries
    }
}
