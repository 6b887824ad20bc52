//! Engine configuration.
//!
//! Defaults reproduce the reference model. A host application may override
//! individual values from a partial JSON document.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::MedicalValidationError;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Age/AMH combinations flagged as clinically implausible.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConsistencyThresholds {
    /// Above this age, AMH above `high_amh` is flagged
    pub older_age: f64,
    pub high_amh: f64,
    /// Below this age, AMH below `low_amh` is flagged
    pub younger_age: f64,
    pub low_amh: f64,
}

impl Default for ConsistencyThresholds {
    fn default() -> Self {
        Self {
            older_age: 40.0,
            high_amh: 3.0,
            younger_age: 25.0,
            low_amh: 0.5,
        }
    }
}

impl ConsistencyThresholds {
    /// Check an age/AMH pair.
    pub fn check(&self, age: f64, amh: f64) -> Result<(), MedicalValidationError> {
        let implausible = (age > self.older_age && amh > self.high_amh)
            || (age < self.younger_age && amh < self.low_amh);
        if implausible {
            Err(MedicalValidationError::AgeAmhInconsistency { age, amh })
        } else {
            Ok(())
        }
    }
}

/// Upper bound on `cycles_per_year`.
pub const MAX_CYCLES_PER_YEAR: u32 = 120;

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Lowest reportable monthly probability
    pub monthly_floor: f64,
    /// Highest reportable monthly probability
    pub monthly_ceiling: f64,
    /// Cycles compounded into the annual probability
    pub cycles_per_year: u32,
    /// Ratio to the age-band benchmark beyond which a deviation is reported
    pub benchmark_tolerance: f64,
    pub consistency: ConsistencyThresholds,
    /// Upper bound on recommendations returned
    pub max_recommendations: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            monthly_floor: 0.005,
            monthly_ceiling: 0.25,
            cycles_per_year: 12,
            benchmark_tolerance: 2.0,
            consistency: ConsistencyThresholds::default(),
            max_recommendations: 12,
        }
    }
}

impl EngineConfig {
    /// Load from JSON; absent keys keep their defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would break the probability bounds.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.monthly_floor.is_nan() || self.monthly_floor <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "monthly_floor must be positive, got {}",
                self.monthly_floor
            )));
        }
        if self.monthly_ceiling.is_nan() || self.monthly_ceiling > 1.0 {
            return Err(ConfigError::Invalid(format!(
                "monthly_ceiling must not exceed 1.0, got {}",
                self.monthly_ceiling
            )));
        }
        if self.monthly_floor >= self.monthly_ceiling {
            return Err(ConfigError::Invalid(format!(
                "monthly_floor {} must be below monthly_ceiling {}",
                self.monthly_floor, self.monthly_ceiling
            )));
        }
        if !(1..=MAX_CYCLES_PER_YEAR).contains(&self.cycles_per_year) {
            return Err(ConfigError::Invalid(format!(
                "cycles_per_year must be between 1 and {}, got {}",
                MAX_CYCLES_PER_YEAR, self.cycles_per_year
            )));
        }
        if self.benchmark_tolerance.is_nan() || self.benchmark_tolerance <= 1.0 {
            return Err(ConfigError::Invalid(format!(
                "benchmark_tolerance must be greater than 1.0, got {}",
                self.benchmark_tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{"cycles_per_year": 6}"#).unwrap();
        assert_eq!(config.cycles_per_year, 6);
        assert_eq!(config.monthly_floor, 0.005);
        assert_eq!(config.consistency, ConsistencyThresholds::default());
    }

    #[test]
    fn test_nested_thresholds_override() {
        let config = EngineConfig::from_json(r#"{"consistency": {"older_age": 38.0}}"#).unwrap();
        assert_eq!(config.consistency.older_age, 38.0);
        assert_eq!(config.consistency.high_amh, 3.0);
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let result = EngineConfig::from_json(r#"{"monthly_floor": 0.3}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = EngineConfig::from_json(r#"{"cycles_per_year": 0}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = EngineConfig::from_json(r#"{"cycles_per_year": 4294967295}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = EngineConfig::from_json(r#"{"cycles_per_year": 121}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
        assert!(EngineConfig::from_json(r#"{"cycles_per_year": 120}"#).is_ok());

        let result = EngineConfig::from_json(r#"{"benchmark_tolerance": 0.5}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            EngineConfig::from_json("{not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_consistency_check() {
        let thresholds = ConsistencyThresholds::default();
        assert!(thresholds.check(42.0, 3.5).is_err());
        assert!(thresholds.check(42.0, 1.0).is_ok());
        assert!(thresholds.check(22.0, 0.2).is_err());
    }
}
