//! Vacation pay (vacaciones compensadas en dinero).

use rust_decimal::Decimal;

use crate::config::SettlementRules;
use crate::models::{ConceptBreakdown, ConceptField, ConceptInputs, FormulaId};

use super::round_money;

/// Computes vacation pay: `last_salary × days_worked / 720`.
///
/// 720 is two commercial years, which yields fifteen working days of salary
/// per year worked.
pub fn calculate_vacation_pay(
    last_salary: Decimal,
    days_worked: i64,
    rules: &SettlementRules,
    scale: u32,
) -> ConceptBreakdown {
    let amount = round_money(
        last_salary * Decimal::from(days_worked) / rules.vacation_divisor,
        scale,
    );

    ConceptBreakdown {
        concept: ConceptField::VacationPay,
        formula: FormulaId::VacationCommercialYear,
        inputs: ConceptInputs::VacationPay {
            last_salary,
            days_worked,
            divisor: rules.vacation_divisor,
        },
        amount,
        used_fallback: false,
        warnings: vec![],
    }
}
