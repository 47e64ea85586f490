//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{EngineConfig, PayRules, ServiceConfig};

/// Loads and provides access to engine configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and validates the values before handing them to the engine.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── pay_rules.yaml   # Holiday allowance and night premium rules
/// └── service.yaml     # Bind address, default wage, lock timeout
/// ```
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Night premium: {}", loader.pay_rules().night_premium_multiplier);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if a required file is missing, contains invalid
    /// YAML, or holds values the engine cannot work with.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let pay_rules_path = path.join("pay_rules.yaml");
        let pay_rules = Self::load_yaml::<PayRules>(&pay_rules_path)?;
        Self::validate_pay_rules(&pay_rules, &pay_rules_path)?;

        let service_path = path.join("service.yaml");
        let service = Self::load_yaml::<ServiceConfig>(&service_path)?;
        Self::validate_service(&service, &service_path)?;

        Ok(Self {
            config: EngineConfig::new(pay_rules, service),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate_pay_rules(rules: &PayRules, path: &Path) -> EngineResult<()> {
        let holiday = &rules.weekly_holiday;
        let problem = if holiday.max_weekly_hours <= Decimal::ZERO {
            Some("weekly_holiday.max_weekly_hours must be positive")
        } else if holiday.min_weekly_hours < Decimal::ZERO {
            Some("weekly_holiday.min_weekly_hours must not be negative")
        } else if holiday.min_weekly_hours > holiday.max_weekly_hours {
            Some("weekly_holiday.min_weekly_hours exceeds max_weekly_hours")
        } else if holiday.allowance_hours < Decimal::ZERO {
            Some("weekly_holiday.allowance_hours must not be negative")
        } else if rules.night_premium_multiplier < Decimal::ZERO {
            Some("night_premium_multiplier must not be negative")
        } else {
            None
        };

        match problem {
            Some(message) => Err(EngineError::ConfigParseError {
                path: path.display().to_string(),
                message: message.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn validate_service(service: &ServiceConfig, path: &Path) -> EngineResult<()> {
        let problem = if service.event_channel_capacity == 0 {
            Some("event_channel_capacity must be at least 1")
        } else if service.lock_timeout_ms == 0 {
            Some("lock_timeout_ms must be at least 1")
        } else {
            None
        };

        match problem {
            Some(message) => Err(EngineError::ConfigParseError {
                path: path.display().to_string(),
                message: message.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the pay rules.
    pub fn pay_rules(&self) -> &PayRules {
        self.config.pay_rules()
    }

    /// Returns the service settings.
    pub fn service(&self) -> &ServiceConfig {
        self.config.service()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/default"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "attendance-engine-{}-{}",
            name,
            uuid::Uuid::new_v4()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const SERVICE_YAML: &str = "bind_address: \"127.0.0.1:0\"\n\
                                default_hourly_wage: 9860\n\
                                lock_timeout_ms: 100\n\
                                event_channel_capacity: 8\n";

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.pay_rules(), &PayRules::default());
        assert_eq!(loader.service().default_hourly_wage, 9860);
    }

    #[test]
    fn test_pay_rules_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let rules = loader.pay_rules();

        assert_eq!(rules.weekly_holiday.min_weekly_hours, dec("15"));
        assert_eq!(rules.weekly_holiday.max_weekly_hours, dec("40"));
        assert_eq!(rules.weekly_holiday.allowance_hours, dec("8"));
        assert_eq!(rules.night_premium_multiplier, dec("0.5"));
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("pay_rules.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let dir = scratch_dir("bad-yaml");
        fs::write(dir.join("pay_rules.yaml"), "weekly_holiday: [unclosed").unwrap();
        fs::write(dir.join("service.yaml"), SERVICE_YAML).unwrap();

        let result = ConfigLoader::load(&dir);
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_min_hours_above_cap_is_rejected() {
        let dir = scratch_dir("min-above-max");
        fs::write(
            dir.join("pay_rules.yaml"),
            "weekly_holiday:\n  min_weekly_hours: \"50\"\n  max_weekly_hours: \"40\"\n  allowance_hours: \"8\"\nnight_premium_multiplier: \"0.5\"\n",
        )
        .unwrap();
        fs::write(dir.join("service.yaml"), SERVICE_YAML).unwrap();

        match ConfigLoader::load(&dir) {
            Err(EngineError::ConfigParseError { message, .. }) => {
                assert!(message.contains("min_weekly_hours"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_zero_channel_capacity_is_rejected() {
        let dir = scratch_dir("zero-capacity");
        fs::write(
            dir.join("pay_rules.yaml"),
            "weekly_holiday:\n  min_weekly_hours: \"15\"\n  max_weekly_hours: \"40\"\n  allowance_hours: \"8\"\nnight_premium_multiplier: \"0.5\"\n",
        )
        .unwrap();
        fs::write(
            dir.join("service.yaml"),
            "bind_address: \"127.0.0.1:0\"\ndefault_hourly_wage: 9860\nlock_timeout_ms: 100\nevent_channel_capacity: 0\n",
        )
        .unwrap();

        match ConfigLoader::load(&dir) {
            Err(EngineError::ConfigParseError { message, .. }) => {
                assert!(message.contains("event_channel_capacity"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }

        fs::remove_dir_all(dir).ok();
    }
}
