//! Attendance recording.
//!
//! This module contains the storage for worker ledgers and schedules, the
//! check-in/check-out guard, the event bus, the manager dashboard and the
//! attendance history.

mod dashboard;
mod events;
mod guard;
mod history;
mod store;

pub use dashboard::{AttendanceStatus, DashboardStats, DashboardView, WorkerStatus, dashboard};
pub use events::{AttendanceEvent, AttendanceEventKind, EventBus};
pub use guard::{AttendanceGuard, CheckInOutcome, CheckOutOutcome};
pub use history::{AttendanceRecord, attendance_history};
pub use store::{AttendanceStore, Ledger, LedgerTransaction};
