//! Configuration loading and management for the attendance and pay engine.
//!
//! This module provides functionality to load engine configuration from YAML
//! files: the pay rules (weekly holiday allowance, night premium) and the
//! service settings (bind address, default wage, lock timeout).
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Listening on {}", config.service().bind_address);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EngineConfig, PayRules, ServiceConfig, WeeklyHolidayRules};
