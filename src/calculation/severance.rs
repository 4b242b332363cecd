//! Severance (cesantías) and interest on severance.

use rust_decimal::Decimal;

use crate::config::SettlementRules;
use crate::models::{ConceptBreakdown, ConceptField, ConceptInputs, FormulaId};

use super::round_money;

/// Computes severance: `last_salary × days_worked / 360`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_severance;
/// use payroll_engine::config::SettlementRules;
/// use rust_decimal::Decimal;
///
/// let result = calculate_severance(Decimal::from(1_200_000), 365, &SettlementRules::default(), 0);
/// assert_eq!(result.amount, Decimal::from(1_216_667));
/// ```
pub fn calculate_severance(
    last_salary: Decimal,
    days_worked: i64,
    rules: &SettlementRules,
    scale: u32,
) -> ConceptBreakdown {
    let amount = round_money(
        last_salary * Decimal::from(days_worked) / rules.severance_divisor,
        scale,
    );

    ConceptBreakdown {
        concept: ConceptField::Severance,
        formula: FormulaId::SeveranceCommercialYear,
        inputs: ConceptInputs::Severance {
            last_salary,
            days_worked,
            divisor: rules.severance_divisor,
        },
        amount,
        used_fallback: false,
        warnings: vec![],
    }
}

/// Computes interest on severance: `severance × days_worked × rate / 360`.
///
/// `severance` is the already-rounded severance amount, so the breakdown
/// shows the same figure the employee sees on the severance line.
pub fn calculate_severance_interest(
    severance: Decimal,
    days_worked: i64,
    rules: &SettlementRules,
    scale: u32,
) -> ConceptBreakdown {
    let amount = round_money(
        severance * Decimal::from(days_worked) * rules.severance_interest_rate
            / rules.severance_interest_divisor,
        scale,
    );

    ConceptBreakdown {
        concept: ConceptField::SeveranceInterest,
        formula: FormulaId::SeveranceInterestAnnual,
        inputs: ConceptInputs::SeveranceInterest {
            severance,
            days_worked,
            annual_rate: rules.severance_interest_rate,
            divisor: rules.severance_interest_divisor,
        },
        amount,
        used_fallback: false,
        warnings: vec![],
    }
}
