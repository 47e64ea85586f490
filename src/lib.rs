//! Attendance and pay engine for small businesses.
//!
//! Workers check in and out; managers register workers, plan schedules and
//! watch a live dashboard. Monthly pay is derived from the recorded work
//! intervals and includes the weekly rest allowance and a night premium.
//!
//! The pure pay functions live in [`calculation`]. [`attendance`] holds the
//! storage and the check-in/check-out guard, and [`api`] exposes both over
//! HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod attendance;
pub mod calculation;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod payroll;
