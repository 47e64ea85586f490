//! Storage-backed monthly pay computation.

use std::sync::Arc;

use tracing::info;

use crate::attendance::AttendanceStore;
use crate::calculation::calculate_monthly_pay;
use crate::config::PayRules;
use crate::error::EngineResult;
use crate::models::{PaySummary, normalize_worker_id};

/// Computes pay summaries from the attendance store.
///
/// Summaries are derived on every call and never cached.
#[derive(Clone)]
pub struct PayCalculator {
    store: Arc<AttendanceStore>,
    rules: PayRules,
}

impl PayCalculator {
    /// Creates a calculator reading from `store` with the given pay rules.
    pub fn new(store: Arc<AttendanceStore>, rules: PayRules) -> Self {
        Self { store, rules }
    }

    /// Returns the pay rules in use.
    pub fn rules(&self) -> &PayRules {
        &self.rules
    }

    /// Computes a worker's pay for one calendar month.
    ///
    /// # Errors
    ///
    /// * [`EngineError::Validation`](crate::error::EngineError::Validation) for an
    ///   empty worker ID or a month outside 1-12
    /// * [`EngineError::WorkerNotFound`](crate::error::EngineError::WorkerNotFound)
    ///   for an unknown worker
    /// * [`EngineError::StorageUnavailable`](crate::error::EngineError::StorageUnavailable)
    ///   if the ledger could not be read in time
    pub async fn compute_monthly_pay(
        &self,
        worker_id: &str,
        year: i32,
        month: u32,
    ) -> EngineResult<PaySummary> {
        let worker_id = normalize_worker_id(worker_id)?;

        let worker = self.store.worker(worker_id)?;
        let intervals = self.store.intervals(worker_id).await?;
        let summary = calculate_monthly_pay(&worker, year, month, &intervals, &self.rules)?;

        info!(
            worker_id = %worker_id,
            year,
            month,
            total_hours = %summary.total_hours,
            final_salary = summary.final_salary,
            "Monthly pay computed"
        );
        Ok(summary)
    }
}
