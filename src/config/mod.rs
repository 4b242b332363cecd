//! Configuration loading and management for the payroll engine.
//!
//! This module loads engine settings (worker pool, chunking, rounding) and
//! the settlement rules (divisors, rates, indemnity tiers) from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/co").unwrap();
//! println!("Minimum wage: {}", config.config().settlement().minimum_monthly_wage);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EngineConfig, EngineSettings, IndemnityRules, IndemnityTier, SettlementRules};
