//! Calculation logic for the payroll engine.
//!
//! This module contains the pure calculation functions: the base salary
//! contribution of a period, per-employee period liquidation, and the
//! settlement concepts (severance, interest on severance, service bonus,
//! vacation pay and indemnity) together with the day counting and money
//! rounding they share. Nothing here touches storage.

mod base_salary;
mod days_worked;
mod indemnity;
mod liquidation;
mod rounding;
mod service_bonus;
mod settlement;
mod severance;
mod vacation;

pub use base_salary::{BaseSalaryContribution, BaseSalaryPolicy, CommercialDaysPolicy};
pub use days_worked::{commercial_days, effective_end_date, inclusive_days, semester_bounds};
pub use indemnity::calculate_indemnity;
pub use liquidation::liquidate_employee;
pub use rounding::round_money;
pub use service_bonus::{AverageSalary, average_salary, calculate_service_bonus};
pub use settlement::{SettlementCalculation, SettlementInput, calculate_settlement};
pub use severance::{calculate_severance, calculate_severance_interest};
pub use vacation::calculate_vacation_pay;
