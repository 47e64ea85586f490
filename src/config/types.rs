//! Configuration types for attendance and pay computation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Weekly rest allowance (holiday pay) rules.
///
/// A week bucket earns the allowance when its hours reach
/// `min_weekly_hours`. The allowance is
/// `min(hours, max_weekly_hours) / max_weekly_hours * allowance_hours * wage`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeeklyHolidayRules {
    /// Minimum hours in a week bucket to qualify (inclusive).
    pub min_weekly_hours: Decimal,
    /// Hours at which the allowance is capped (a full-time week).
    pub max_weekly_hours: Decimal,
    /// Paid hours granted for a full-time week.
    pub allowance_hours: Decimal,
}

impl Default for WeeklyHolidayRules {
    fn default() -> Self {
        Self {
            min_weekly_hours: Decimal::new(15, 0),
            max_weekly_hours: Decimal::new(40, 0),
            allowance_hours: Decimal::new(8, 0),
        }
    }
}

/// Pay rules loaded from `pay_rules.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PayRules {
    /// Weekly rest allowance rules.
    pub weekly_holiday: WeeklyHolidayRules,
    /// Additional multiplier paid on night hours, on top of the ordinary rate.
    pub night_premium_multiplier: Decimal,
}

impl Default for PayRules {
    fn default() -> Self {
        Self {
            weekly_holiday: WeeklyHolidayRules::default(),
            night_premium_multiplier: Decimal::new(5, 1),
        }
    }
}

/// Service settings loaded from `service.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to.
    pub bind_address: String,
    /// Hourly wage assigned to workers registered without one.
    pub default_hourly_wage: u32,
    /// Maximum time to wait for a worker's ledger lock, in milliseconds.
    pub lock_timeout_ms: u64,
    /// Capacity of the attendance event broadcast channel.
    pub event_channel_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            default_hourly_wage: 9860,
            lock_timeout_ms: 5000,
            event_channel_capacity: 256,
        }
    }
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    /// Pay rules.
    pay_rules: PayRules,
    /// Service settings.
    service: ServiceConfig,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(pay_rules: PayRules, service: ServiceConfig) -> Self {
        Self { pay_rules, service }
    }

    /// Returns the pay rules.
    pub fn pay_rules(&self) -> &PayRules {
        &self.pay_rules
    }

    /// Returns the service settings.
    pub fn service(&self) -> &ServiceConfig {
        &self.service
    }
}
