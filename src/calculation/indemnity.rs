//! Indemnity for termination without just cause or early termination.
//!
//! Implements the two cases of Código Sustantivo del Trabajo art. 64 that the
//! engine supports:
//!
//! - **Without just cause** (indefinite-term): a number of days of salary that
//!   grows with tenure. Below the high-earner threshold the first year owes
//!   30 days and each further year 20 (prorated); at or above it, 20 and 15.
//!   The first-year figure is the floor. Tenure is counted on the 30-day
//!   commercial calendar, so a year of service is always 360 days.
//! - **Early termination** (fixed-term): the salary for the days left until
//!   the agreed end of the term, never more than the whole term and never
//!   less than the statutory minimum.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::SettlementRules;
use crate::models::{
    AuditWarning, ConceptBreakdown, ConceptField, ConceptInputs, Contract, ContractTerm,
    FormulaId, IndemnityType, Severity,
};

use super::{commercial_days, inclusive_days, round_money};

/// Commercial year used to prorate additional years of tenure.
const TENURE_YEAR_DAYS: i64 = 360;

/// Computes the indemnity owed for `indemnity_type`.
///
/// # Arguments
///
/// * `contract` - The contract being settled
/// * `indemnity_type` - Which indemnity applies
/// * `effective_end` - Last day worked
/// * `rules` - Settlement rules
/// * `month_days` - Commercial month length used to derive the daily salary
/// * `scale` - Rounding scale
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_indemnity;
/// use payroll_engine::config::SettlementRules;
/// use payroll_engine::models::{Contract, ContractStatus, ContractTerm, IndemnityType};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let contract = Contract {
///     id: "c_001".to_string(),
///     employee_id: "emp_001".to_string(),
///     salary: Decimal::from(1_500_000),
///     start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     end_date: None,
///     status: ContractStatus::Active,
///     term: ContractTerm::Indefinite,
/// };
/// let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
/// let result = calculate_indemnity(
///     &contract, IndemnityType::WithoutJustCause, end, &SettlementRules::default(), 30, 0,
/// );
/// // Under one year: the 30-day floor applies.
/// assert_eq!(result.amount, Decimal::from(1_500_000));
/// ```
pub fn calculate_indemnity(
    contract: &Contract,
    indemnity_type: IndemnityType,
    effective_end: NaiveDate,
    rules: &SettlementRules,
    month_days: u32,
    scale: u32,
) -> ConceptBreakdown {
    match indemnity_type {
        IndemnityType::None => ConceptBreakdown {
            concept: ConceptField::Indemnity,
            formula: FormulaId::IndemnityNotApplicable,
            inputs: ConceptInputs::NoIndemnity,
            amount: Decimal::ZERO,
            used_fallback: false,
            warnings: vec![],
        },
        IndemnityType::WithoutJustCause => {
            without_just_cause(contract, effective_end, rules, month_days, scale)
        }
        IndemnityType::EarlyTermination => {
            early_termination(contract, effective_end, rules, month_days, scale)
        }
    }
}

fn without_just_cause(
    contract: &Contract,
    effective_end: NaiveDate,
    rules: &SettlementRules,
    month_days: u32,
    scale: u32,
) -> ConceptBreakdown {
    let tiers = &rules.indemnity;
    let threshold = tiers.high_earner_threshold_wages * rules.minimum_monthly_wage;
    let high_earner = contract.salary >= threshold;
    let tier = if high_earner {
        &tiers.high_earner
    } else {
        &tiers.standard
    };

    let tenure_days = commercial_days(contract.start_date, effective_end);
    let extra_days = (tenure_days - TENURE_YEAR_DAYS).max(0);
    let days_owed = tier.first_year_days
        + tier.additional_year_days * Decimal::from(extra_days) / Decimal::from(TENURE_YEAR_DAYS);

    let month = Decimal::from(month_days);
    let amount = round_money(contract.salary * days_owed / month, scale);

    let mut warnings = Vec::new();
    if contract.term == ContractTerm::FixedTerm {
        warnings.push(AuditWarning::new(
            "fixed_term_graduated_indemnity",
            "Fixed-term contract indemnified with the tenure-graduated formula; \
             remaining-term indemnity may apply instead",
            Severity::Medium,
        ));
    }

    ConceptBreakdown {
        concept: ConceptField::Indemnity,
        formula: FormulaId::IndemnityTenureGraduated,
        inputs: ConceptInputs::IndemnityWithoutJustCause {
            daily_salary: round_money(contract.salary / month, 2),
            tenure_days,
            high_earner,
            first_year_days: tier.first_year_days,
            additional_year_days: tier.additional_year_days,
            days_owed: days_owed.round_dp(4),
        },
        amount,
        used_fallback: false,
        warnings,
    }
}

fn early_termination(
    contract: &Contract,
    effective_end: NaiveDate,
    rules: &SettlementRules,
    month_days: u32,
    scale: u32,
) -> ConceptBreakdown {
    let month = Decimal::from(month_days);
    let daily_salary = round_money(contract.salary / month, 2);
    let min_days = rules.indemnity.early_termination_min_days;

    let not_applicable = |code: &str, message: String| ConceptBreakdown {
        concept: ConceptField::Indemnity,
        formula: FormulaId::IndemnityRemainingTerm,
        inputs: ConceptInputs::IndemnityEarlyTermination {
            daily_salary,
            remaining_days: 0,
            contract_term_days: 0,
            min_days,
            days_owed: Decimal::ZERO,
        },
        amount: Decimal::ZERO,
        used_fallback: true,
        warnings: vec![AuditWarning::new(code, message, Severity::High)],
    };

    let Some(term_end) = contract.end_date else {
        return not_applicable(
            "no_fixed_term",
            format!(
                "Contract '{}' has no agreed end date; early-termination indemnity set to zero",
                contract.id
            ),
        );
    };

    let remaining_days = (term_end - effective_end).num_days();
    if remaining_days <= 0 {
        return not_applicable(
            "term_already_ended",
            format!(
                "Contract '{}' term ended on {}; nothing remains to indemnify",
                contract.id, term_end
            ),
        );
    }

    let contract_term_days = inclusive_days(contract.start_date, term_end);
    let days_owed = Decimal::from(remaining_days)
        .max(min_days)
        .min(Decimal::from(contract_term_days));
    let amount = round_money(contract.salary * days_owed / month, scale);

    ConceptBreakdown {
        concept: ConceptField::Indemnity,
        formula: FormulaId::IndemnityRemainingTerm,
        inputs: ConceptInputs::IndemnityEarlyTermination {
            daily_salary,
            remaining_days,
            contract_term_days,
            min_days,
            days_owed,
        },
        amount,
        used_fallback: false,
        warnings: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContractStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_contract(salary: i64, term: ContractTerm, end: Option<NaiveDate>) -> Contract {
        Contract {
            id: "c_001".to_string(),
            employee_id: "emp_001".to_string(),
            salary: Decimal::from(salary),
            start_date: date(2020, 1, 1),
            end_date: end,
            status: ContractStatus::Active,
            term,
        }
    }

    fn rules() -> SettlementRules {
        SettlementRules::default()
    }

    fn days_owed(result: &ConceptBreakdown) -> Decimal {
        match &result.inputs {
            ConceptInputs::IndemnityWithoutJustCause { days_owed, .. }
            | ConceptInputs::IndemnityEarlyTermination { days_owed, .. } => *days_owed,
            other => panic!("Expected indemnity inputs, got {:?}", other),
        }
    }

    /// IN-001: no indemnity requested
    #[test]
    fn test_none_is_zero() {
        let contract = create_contract(1_500_000, ContractTerm::Indefinite, None);
        let result = calculate_indemnity(
            &contract,
            IndemnityType::None,
            date(2021, 2, 4),
            &rules(),
            30,
            0,
        );
        assert_eq!(result.amount, Decimal::ZERO);
        assert_eq!(result.inputs, ConceptInputs::NoIndemnity);
    }

    /// IN-002: three commercial years below threshold = 30 + 2 × 20 days
    #[test]
    fn test_without_just_cause_grows_with_tenure() {
        let contract = create_contract(1_500_000, ContractTerm::Indefinite, None);
        let result = calculate_indemnity(
            &contract,
            IndemnityType::WithoutJustCause,
            date(2022, 12, 31),
            &rules(),
            30,
            0,
        );
        assert_eq!(days_owed(&result), Decimal::from(70));
        assert_eq!(result.amount, Decimal::from(3_500_000));
    }

    /// IN-003: short tenure gets the first-year floor
    #[test]
    fn test_without_just_cause_floor() {
        let contract = create_contract(1_500_000, ContractTerm::Indefinite, None);
        let result = calculate_indemnity(
            &contract,
            IndemnityType::WithoutJustCause,
            date(2020, 1, 20),
            &rules(),
            30,
            0,
        );
        assert_eq!(days_owed(&result), Decimal::from(30));
        assert_eq!(result.amount, Decimal::from(1_500_000));
    }

    /// IN-004: salary at ten minimum wages uses the 20/15 tier
    #[test]
    fn test_high_earner_tier() {
        let contract = create_contract(13_000_000, ContractTerm::Indefinite, None);
        let result = calculate_indemnity(
            &contract,
            IndemnityType::WithoutJustCause,
            date(2021, 12, 30),
            &rules(),
            30,
            0,
        );
        // Two commercial years: 20 + 15
        assert_eq!(days_owed(&result), Decimal::from(35));
        assert_eq!(result.amount, Decimal::from(15_166_667));
        match result.inputs {
            ConceptInputs::IndemnityWithoutJustCause { high_earner, .. } => assert!(high_earner),
            other => panic!("Expected without-just-cause inputs, got {:?}", other),
        }
    }

    /// IN-009: a leap year in the tenure does not add a fraction of a year
    #[test]
    fn test_tenure_counts_commercial_days() {
        let contract = create_contract(1_500_000, ContractTerm::Indefinite, None);
        let result = calculate_indemnity(
            &contract,
            IndemnityType::WithoutJustCause,
            date(2021, 12, 31),
            &rules(),
            30,
            0,
        );
        // 2020-01-01..2021-12-31 is 731 calendar days but two commercial years
        assert_eq!(days_owed(&result), Decimal::from(50));
        assert_eq!(result.amount, Decimal::from(2_500_000));
        match result.inputs {
            ConceptInputs::IndemnityWithoutJustCause { tenure_days, .. } => {
                assert_eq!(tenure_days, 720)
            }
            other => panic!("Expected without-just-cause inputs, got {:?}", other),
        }
    }

    /// IN-005: early termination pays the remaining term
    #[test]
    fn test_early_termination_pays_remaining_days() {
        let contract = create_contract(1_500_000, ContractTerm::FixedTerm, Some(date(2020, 12, 31)));
        let result = calculate_indemnity(
            &contract,
            IndemnityType::EarlyTermination,
            date(2020, 10, 31),
            &rules(),
            30,
            0,
        );
        // Nov 1..Dec 31 = 61 days
        assert_eq!(days_owed(&result), Decimal::from(61));
        assert_eq!(result.amount, Decimal::from(3_050_000));
    }

    /// IN-006: a few days left still pays the statutory minimum
    #[test]
    fn test_early_termination_minimum() {
        let contract = create_contract(1_500_000, ContractTerm::FixedTerm, Some(date(2020, 12, 31)));
        let result = calculate_indemnity(
            &contract,
            IndemnityType::EarlyTermination,
            date(2020, 12, 26),
            &rules(),
            30,
            0,
        );
        assert_eq!(days_owed(&result), Decimal::from(15));
    }

    /// IN-007: the minimum never exceeds the whole contract term
    #[test]
    fn test_early_termination_capped_at_term() {
        let mut contract =
            create_contract(1_500_000, ContractTerm::FixedTerm, Some(date(2020, 1, 10)));
        contract.start_date = date(2020, 1, 1);
        let result = calculate_indemnity(
            &contract,
            IndemnityType::EarlyTermination,
            date(2020, 1, 2),
            &rules(),
            30,
            0,
        );
        assert_eq!(days_owed(&result), Decimal::from(10));
    }

    /// IN-008: indefinite contract cannot be early-terminated; warns
    #[test]
    fn test_early_termination_without_end_date_warns() {
        let contract = create_contract(1_500_000, ContractTerm::Indefinite, None);
        let result = calculate_indemnity(
            &contract,
            IndemnityType::EarlyTermination,
            date(2020, 4, 9),
            &rules(),
            30,
            0,
        );
        assert_eq!(result.amount, Decimal::ZERO);
        assert!(result.used_fallback);
        assert_eq!(result.warnings[0].code, "no_fixed_term");
    }
}
