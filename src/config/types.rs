//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Runtime settings for the liquidation batch and rounding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Number of worker threads used to compute entries during liquidation.
    pub worker_pool_size: usize,
    /// Number of employees computed per chunk of the liquidation batch.
    pub liquidation_chunk_size: usize,
    /// Decimal places monetary results are rounded to (0 = whole pesos).
    pub rounding_scale: u32,
    /// Days in a commercial month, used to turn a monthly salary into a daily one.
    pub commercial_month_days: u32,
    /// Commercial days paid for a full biweekly period.
    pub biweekly_days: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            worker_pool_size: 4,
            liquidation_chunk_size: 250,
            rounding_scale: 0,
            commercial_month_days: 30,
            biweekly_days: 15,
        }
    }
}

/// Days of salary owed per year of tenure for dismissal without just cause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndemnityTier {
    /// Days of salary owed for the first year (also the floor).
    pub first_year_days: Decimal,
    /// Days of salary owed for each additional year, prorated by day.
    pub additional_year_days: Decimal,
}

/// Indemnity rules (Código Sustantivo del Trabajo, art. 64).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndemnityRules {
    /// Tier for salaries below the high-earner threshold.
    pub standard: IndemnityTier,
    /// Tier for salaries at or above the high-earner threshold.
    pub high_earner: IndemnityTier,
    /// Threshold expressed in minimum monthly wages.
    pub high_earner_threshold_wages: Decimal,
    /// Minimum days of salary owed on early termination of a fixed-term contract.
    pub early_termination_min_days: Decimal,
}

/// Rules for the termination settlement concepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementRules {
    /// Commercial year used for severance (360).
    pub severance_divisor: Decimal,
    /// Annual interest rate on severance (0.12).
    pub severance_interest_rate: Decimal,
    /// Commercial year used to prorate the severance interest (360).
    pub severance_interest_divisor: Decimal,
    /// Divisor applied to semester days for the service bonus.
    pub service_bonus_divisor: Decimal,
    /// Maximum days counted in a single semester.
    pub semester_day_cap: i64,
    /// Divisor for vacation pay (720 = 15 days per year).
    pub vacation_divisor: Decimal,
    /// Months of salary history averaged for the service bonus.
    pub salary_history_months: u32,
    /// Legal minimum monthly wage (SMMLV).
    pub minimum_monthly_wage: Decimal,
    /// Indemnity rules.
    pub indemnity: IndemnityRules,
}

impl Default for SettlementRules {
    fn default() -> Self {
        Self {
            severance_divisor: Decimal::from(360),
            severance_interest_rate: Decimal::new(12, 2),
            severance_interest_divisor: Decimal::from(360),
            service_bonus_divisor: Decimal::from(180),
            semester_day_cap: 180,
            vacation_divisor: Decimal::from(720),
            salary_history_months: 12,
            minimum_monthly_wage: Decimal::from(1_300_000),
            indemnity: IndemnityRules {
                standard: IndemnityTier {
                    first_year_days: Decimal::from(30),
                    additional_year_days: Decimal::from(20),
                },
                high_earner: IndemnityTier {
                    first_year_days: Decimal::from(20),
                    additional_year_days: Decimal::from(15),
                },
                high_earner_threshold_wages: Decimal::from(10),
                early_termination_min_days: Decimal::from(15),
            },
        }
    }
}

/// The settlement section of `settlement.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SettlementFile {
    pub settlement: SettlementRules,
}

/// The engine section of `engine.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EngineFile {
    pub engine: EngineSettings,
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    settings: EngineSettings,
    settlement: SettlementRules,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(settings: EngineSettings, settlement: SettlementRules) -> Self {
        Self {
            settings,
            settlement,
        }
    }

    /// Returns the engine runtime settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the settlement rules.
    pub fn settlement(&self) -> &SettlementRules {
        &self.settlement
    }
}
