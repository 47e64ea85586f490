//! Core data models for the attendance and pay engine.
//!
//! This module contains all the domain models used throughout the engine.

mod pay_summary;
mod schedule;
mod work_interval;
mod worker;

pub use pay_summary::{PaySummary, format_hours};
pub use schedule::{MAX_SCHEDULE_RANGE_DAYS, Schedule};
pub use work_interval::{WorkInterval, duration_hours, hours_between};
pub use worker::{NewWorker, Worker, normalize_worker_id};
