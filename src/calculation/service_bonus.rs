//! Service bonus (prima de servicios) and the 12-month salary average.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::config::SettlementRules;
use crate::models::{
    AuditWarning, ConceptBreakdown, ConceptField, ConceptInputs, Contract, FormulaId,
    SalaryRecord, Severity,
};

use super::days_worked::month_index;
use super::{inclusive_days, round_money, semester_bounds};

/// The salary base for the service bonus, and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct AverageSalary {
    /// The amount to use.
    pub amount: Decimal,
    /// The true average, or `None` when there was no history at all.
    pub average: Option<Decimal>,
    /// Months with salary data inside the averaging window.
    pub months: u32,
    /// True when `amount` is `last_salary` because no history existed.
    pub used_fallback: bool,
    /// Partial-data warnings.
    pub warnings: Vec<AuditWarning>,
}

/// Averages monthly salary over the `rules.salary_history_months` months
/// ending with the month of `effective_end`.
///
/// Several records for the same month are summed before averaging. With no
/// history in the window the result falls back to `last_salary` and says
/// so; with fewer months than the contract has lasted it averages what is
/// there and warns.
pub fn average_salary(
    contract: &Contract,
    history: &[SalaryRecord],
    effective_end: NaiveDate,
    rules: &SettlementRules,
    scale: u32,
) -> AverageSalary {
    let window = i64::from(rules.salary_history_months);
    let end_idx = month_index(effective_end);
    let start_idx = end_idx - window + 1;

    let mut per_month: BTreeMap<i64, Decimal> = BTreeMap::new();
    for record in history {
        let idx = month_index(record.month);
        if idx >= start_idx && idx <= end_idx {
            *per_month.entry(idx).or_insert(Decimal::ZERO) += record.amount;
        }
    }

    let months = per_month.len() as u32;
    let mut warnings = Vec::new();

    if months == 0 {
        warnings.push(AuditWarning::new(
            "missing_salary_history",
            format!(
                "No salary history in the last {} months; using last salary {} as the average",
                window, contract.salary
            ),
            Severity::Medium,
        ));
        return AverageSalary {
            amount: contract.salary,
            average: None,
            months,
            used_fallback: true,
            warnings,
        };
    }

    let expected = (end_idx - month_index(contract.start_date) + 1).clamp(1, window);
    if i64::from(months) < expected {
        warnings.push(AuditWarning::new(
            "partial_salary_history",
            format!(
                "Salary history covers {} of {} expected months; averaging available months",
                months, expected
            ),
            Severity::Low,
        ));
    }

    let total: Decimal = per_month.values().copied().sum();
    let average = round_money(total / Decimal::from(months), scale);

    AverageSalary {
        amount: average,
        average: Some(average),
        months,
        used_fallback: false,
        warnings,
    }
}

/// Computes the service bonus for the semester containing `effective_end`:
/// `base_salary × days_in_semester / divisor`.
///
/// Days are counted from the later of the semester start and the contract
/// start, up to `effective_end`, and capped at `rules.semester_day_cap`.
pub fn calculate_service_bonus(
    contract: &Contract,
    average: &AverageSalary,
    effective_end: NaiveDate,
    rules: &SettlementRules,
    scale: u32,
) -> ConceptBreakdown {
    let (semester_start, _) = semester_bounds(effective_end);
    let counted_from = semester_start.max(contract.start_date);
    let days_in_semester = inclusive_days(counted_from, effective_end)
        .clamp(0, rules.semester_day_cap);

    let amount = round_money(
        average.amount * Decimal::from(days_in_semester) / rules.service_bonus_divisor,
        scale,
    );

    ConceptBreakdown {
        concept: ConceptField::ServiceBonus,
        formula: FormulaId::ServiceBonusSemester,
        inputs: ConceptInputs::ServiceBonus {
            base_salary: average.amount,
            semester_start,
            counted_from,
            counted_to: effective_end,
            days_in_semester,
            divisor: rules.service_bonus_divisor,
            months_of_history: average.months,
        },
        amount,
        used_fallback: average.used_fallback,
        warnings: average.warnings.clone(),
    }
}
