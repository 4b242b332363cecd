//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{EngineConfig, EngineFile, EngineSettings, SettlementFile, SettlementRules};

/// Loads and validates engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/co/
/// ├── engine.yaml      # Worker pool, chunking and rounding
/// └── settlement.yaml  # Settlement divisors, rates and indemnity tiers
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/co").unwrap();
/// println!("Workers: {}", loader.config().settings().worker_pool_size);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if a file is missing, contains invalid YAML, or
    /// holds a value the engine cannot work with (zero divisors, an empty
    /// worker pool, and so on).
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let engine_path = path.join("engine.yaml");
        let engine = Self::load_yaml::<EngineFile>(&engine_path)?.engine;
        Self::validate_settings(&engine, &engine_path)?;

        let settlement_path = path.join("settlement.yaml");
        let settlement = Self::load_yaml::<SettlementFile>(&settlement_path)?.settlement;
        Self::validate_rules(&settlement, &settlement_path)?;

        Ok(Self {
            config: EngineConfig::new(engine, settlement),
        })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
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

    fn validate_settings(settings: &EngineSettings, path: &Path) -> EngineResult<()> {
        let invalid = |message: &str| EngineError::ConfigParseError {
            path: path.display().to_string(),
            message: message.to_string(),
        };

        if settings.worker_pool_size == 0 {
            return Err(invalid("worker_pool_size must be at least 1"));
        }
        if settings.liquidation_chunk_size == 0 {
            return Err(invalid("liquidation_chunk_size must be at least 1"));
        }
        if settings.commercial_month_days == 0 || settings.biweekly_days == 0 {
            return Err(invalid("commercial day counts must be positive"));
        }
        if settings.biweekly_days > settings.commercial_month_days {
            return Err(invalid("biweekly_days cannot exceed commercial_month_days"));
        }
        Ok(())
    }

    fn validate_rules(rules: &SettlementRules, path: &Path) -> EngineResult<()> {
        let positive = [
            ("severance_divisor", rules.severance_divisor),
            ("severance_interest_divisor", rules.severance_interest_divisor),
            ("service_bonus_divisor", rules.service_bonus_divisor),
            ("vacation_divisor", rules.vacation_divisor),
            ("minimum_monthly_wage", rules.minimum_monthly_wage),
        ];

        for (field, value) in positive {
            if value <= Decimal::ZERO {
                return Err(EngineError::ConfigParseError {
                    path: path.display().to_string(),
                    message: format!("{} must be positive", field),
                });
            }
        }

        if rules.severance_interest_rate < Decimal::ZERO {
            return Err(EngineError::ConfigParseError {
                path: path.display().to_string(),
                message: "severance_interest_rate cannot be negative".to_string(),
            });
        }
        if rules.semester_day_cap <= 0 || rules.salary_history_months == 0 {
            return Err(EngineError::ConfigParseError {
                path: path.display().to_string(),
                message: "semester_day_cap and salary_history_months must be positive"
                    .to_string(),
            });
        }
        Ok(())
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consumes the loader and returns the configuration.
    pub fn into_config(self) -> EngineConfig {
        self.config
    }
}
