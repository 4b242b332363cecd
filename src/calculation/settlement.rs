//! Termination settlement calculation.
//!
//! This module ties the concept calculators together. It validates the
//! snapshot, works out the effective end date and tenure, runs every concept,
//! and returns the amounts together with a typed, versioned breakdown.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    CALCULATION_DETAIL_VERSION, CalculationDetail, Contract, IndemnityType, SalaryRecord,
    SettlementConcepts,
};

use super::{
    average_salary, calculate_indemnity, calculate_service_bonus, calculate_severance,
    calculate_severance_interest, calculate_vacation_pay, effective_end_date, inclusive_days,
};

/// Everything the calculator reads.
#[derive(Debug, Clone, Copy)]
pub struct SettlementInput<'a> {
    /// The contract being settled.
    pub contract: &'a Contract,
    /// Monthly salary history for the averaging window.
    pub salary_history: &'a [SalaryRecord],
    /// The requested settlement date.
    pub settlement_date: NaiveDate,
    /// Which indemnity applies.
    pub indemnity_type: IndemnityType,
}

/// The result of a settlement calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementCalculation {
    /// Last day counted.
    pub effective_end_date: NaiveDate,
    /// Inclusive days worked.
    pub days_worked: i64,
    /// The 12-month average, or `None` when no history existed.
    pub average_salary_12m: Option<Decimal>,
    /// Concept amounts. `other_concepts` and `deductions` start at zero.
    pub concepts: SettlementConcepts,
    /// Breakdown for the audit trail.
    pub detail: CalculationDetail,
}

/// Computes a contract settlement.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if the contract salary is not
/// positive or the effective end date falls before the contract start.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{SettlementInput, calculate_settlement};
/// use payroll_engine::config::EngineConfig;
/// use payroll_engine::models::{Contract, ContractStatus, ContractTerm, IndemnityType};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let contract = Contract {
///     id: "c_001".to_string(),
///     employee_id: "emp_001".to_string(),
///     salary: Decimal::from(1_200_000),
///     start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
///     end_date: Some(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()),
///     status: ContractStatus::Terminated,
///     term: ContractTerm::Indefinite,
/// };
/// let input = SettlementInput {
///     contract: &contract,
///     salary_history: &[],
///     settlement_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
///     indemnity_type: IndemnityType::None,
/// };
///
/// let result = calculate_settlement(&input, &EngineConfig::default()).unwrap();
/// assert_eq!(result.days_worked, 365);
/// assert_eq!(result.concepts.severance, Decimal::from(1_216_667));
/// ```
pub fn calculate_settlement(
    input: &SettlementInput<'_>,
    config: &EngineConfig,
) -> EngineResult<SettlementCalculation> {
    let contract = input.contract;
    let rules = config.settlement();
    let scale = config.settings().rounding_scale;
    let month_days = config.settings().commercial_month_days;

    if contract.salary <= Decimal::ZERO {
        return Err(EngineError::validation(
            "salary",
            format!("contract '{}' has a non-positive salary", contract.id),
        ));
    }

    let effective_end = effective_end_date(contract, input.settlement_date);
    if effective_end < contract.start_date {
        return Err(EngineError::validation(
            "settlement_date",
            format!(
                "{} is before contract start {}",
                effective_end, contract.start_date
            ),
        ));
    }

    let days_worked = inclusive_days(contract.start_date, effective_end);
    let last_salary = contract.salary;

    let severance = calculate_severance(last_salary, days_worked, rules, scale);
    let interest = calculate_severance_interest(severance.amount, days_worked, rules, scale);
    let average = average_salary(contract, input.salary_history, effective_end, rules, scale);
    let bonus = calculate_service_bonus(contract, &average, effective_end, rules, scale);
    let vacation = calculate_vacation_pay(last_salary, days_worked, rules, scale);
    let indemnity = calculate_indemnity(
        contract,
        input.indemnity_type,
        effective_end,
        rules,
        month_days,
        scale,
    );

    let concepts = SettlementConcepts {
        severance: severance.amount,
        severance_interest: interest.amount,
        service_bonus: bonus.amount,
        vacation_pay: vacation.amount,
        indemnity: indemnity.amount,
        other_concepts: Decimal::ZERO,
        deductions: Decimal::ZERO,
    };

    Ok(SettlementCalculation {
        effective_end_date: effective_end,
        days_worked,
        average_salary_12m: average.average,
        concepts,
        detail: CalculationDetail {
            version: CALCULATION_DETAIL_VERSION,
            computed_at: Utc::now(),
            effective_end_date: effective_end,
            days_worked,
            concepts: vec![severance, interest, bonus, vacation, indemnity],
        },
    })
}
