//! Per-employee liquidation.
//!
//! This module turns one employee's contract and novedades for a period into
//! a [`PayrollEntry`]. It is pure: no I/O, no shared state, so the engine can
//! run it for many employees in parallel.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{
    AuditWarning, Contract, Novedad, NovedadCategory, PayrollEntry, PayrollPeriod, Severity,
};

use super::BaseSalaryPolicy;

/// Computes the payroll entry for one employee.
///
/// Only novedades that belong to `period` and to the contract's employee are
/// counted. `net` may come out negative (heavy garnishments, for instance);
/// it is reported as-is with a warning, never clamped.
///
/// # Arguments
///
/// * `period` - The period being liquidated
/// * `contract` - The employee's active contract for the period
/// * `novedades` - The employee's novedades for the period
/// * `policy` - Decides the base salary contribution
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{CommercialDaysPolicy, liquidate_employee};
/// use payroll_engine::config::EngineSettings;
/// # use payroll_engine::models::*;
/// # use chrono::{NaiveDate, Utc};
/// # use rust_decimal::Decimal;
/// # use uuid::Uuid;
/// # let period = PayrollPeriod {
/// #     id: Uuid::new_v4(), period_type: PeriodType::Biweekly,
/// #     start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
/// #     end_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
/// #     description: String::new(), state: PeriodState::Open,
/// #     created_by: "admin".into(), created_at: Utc::now(),
/// #     liquidated_at: None, liquidated_by: None, approved_at: None, approved_by: None,
/// #     approval_comment: None, closed_at: None, closed_by: None, closing_comment: None,
/// #     omissions: vec![], version: 0,
/// # };
/// # let contract = Contract {
/// #     id: "c_001".into(), employee_id: "emp_001".into(),
/// #     salary: Decimal::from(1_500_000),
/// #     start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), end_date: None,
/// #     status: ContractStatus::Active, term: ContractTerm::Indefinite,
/// # };
///
/// let policy = CommercialDaysPolicy::new(&EngineSettings::default());
/// let entry = liquidate_employee(&period, &contract, &[], &policy);
/// assert_eq!(entry.net, Decimal::from(750_000));
/// ```
pub fn liquidate_employee(
    period: &PayrollPeriod,
    contract: &Contract,
    novedades: &[Novedad],
    policy: &dyn BaseSalaryPolicy,
) -> PayrollEntry {
    let base = policy.contribution(period, contract);
    let mut warnings = base.warnings;

    let relevant: Vec<&Novedad> = novedades
        .iter()
        .filter(|n| n.period_id == period.id && n.employee_id == contract.employee_id)
        .collect();

    let sum_category = |category: NovedadCategory| -> Decimal {
        relevant
            .iter()
            .filter(|n| n.category() == category)
            .map(|n| n.line_total())
            .sum()
    };

    let earnings_total = sum_category(NovedadCategory::Earning);
    let total_deducted = sum_category(NovedadCategory::Deduction);
    let total_earned = base.amount + earnings_total;
    let net = total_earned - total_deducted;

    if net < Decimal::ZERO {
        warnings.push(AuditWarning::new(
            "negative_net",
            format!(
                "Deductions {} exceed earnings {} for employee '{}'",
                total_deducted, total_earned, contract.employee_id
            ),
            Severity::High,
        ));
    }

    PayrollEntry {
        id: Uuid::new_v4(),
        period_id: period.id,
        employee_id: contract.employee_id.clone(),
        contract_id: contract.id.clone(),
        base_salary: contract.salary,
        days_paid: base.days_paid,
        base_salary_contribution: base.amount,
        earnings_total,
        total_earned,
        total_deducted,
        net,
        novedad_ids: relevant.iter().map(|n| n.id).collect(),
        warnings,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::CommercialDaysPolicy;
    use crate::config::EngineSettings;
    use crate::models::{ContractStatus, ContractTerm, NovedadType, PeriodState, PeriodType};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_period() -> PayrollPeriod {
        PayrollPeriod {
            id: Uuid::new_v4(),
            period_type: PeriodType::Biweekly,
            start_date: date(2024, 3, 1),
            end_date: date(2024, 3, 15),
            description: "Primera quincena marzo".to_string(),
            state: PeriodState::Open,
            created_by: "admin".to_string(),
            created_at: Utc::now(),
            liquidated_at: None,
            liquidated_by: None,
            approved_at: None,
            approved_by: None,
            approval_comment: None,
            closed_at: None,
            closed_by: None,
            closing_comment: None,
            omissions: vec![],
            version: 0,
        }
    }

    fn create_contract() -> Contract {
        Contract {
            id: "c_001".to_string(),
            employee_id: "emp_001".to_string(),
            salary: Decimal::from(1_500_000),
            start_date: date(2023, 1, 1),
            end_date: None,
            status: ContractStatus::Active,
            term: ContractTerm::Indefinite,
        }
    }

    fn novedad(
        period: &PayrollPeriod,
        employee_id: &str,
        novedad_type: NovedadType,
        value: i64,
        quantity: i64,
    ) -> Novedad {
        Novedad {
            id: Uuid::new_v4(),
            period_id: period.id,
            employee_id: employee_id.to_string(),
            novedad_type,
            value: Decimal::from(value),
            quantity: Decimal::from(quantity),
            date: period.start_date,
            comment: None,
            created_by: "admin".to_string(),
            created_at: Utc::now(),
        }
    }

    fn policy() -> CommercialDaysPolicy {
        CommercialDaysPolicy::new(&EngineSettings::default())
    }

    /// LQ-001: overtime earning and loan deduction
    #[test]
    fn test_overtime_and_loan_scenario() {
        let period = create_period();
        let contract = create_contract();
        let novedades = vec![
            novedad(&period, "emp_001", NovedadType::OvertimeDay, 50_000, 2),
            novedad(&period, "emp_001", NovedadType::Loan, 30_000, 1),
        ];

        let entry = liquidate_employee(&period, &contract, &novedades, &policy());

        assert_eq!(entry.base_salary_contribution, Decimal::from(750_000));
        assert_eq!(entry.total_earned, Decimal::from(850_000));
        assert_eq!(entry.total_deducted, Decimal::from(30_000));
        assert_eq!(entry.net, Decimal::from(820_000));
        assert_eq!(entry.novedad_ids.len(), 2);
        assert!(entry.is_balanced());
    }

    /// LQ-002: negative net is surfaced, not clamped
    #[test]
    fn test_negative_net_is_reported() {
        let period = create_period();
        let contract = create_contract();
        let novedades = vec![novedad(
            &period,
            "emp_001",
            NovedadType::Garnishment,
            1_000_000,
            1,
        )];

        let entry = liquidate_employee(&period, &contract, &novedades, &policy());

        assert_eq!(entry.net, Decimal::from(-250_000));
        assert!(entry.warnings.iter().any(|w| w.code == "negative_net"));
    }

    /// LQ-003: other employees' novedades are ignored
    #[test]
    fn test_ignores_foreign_novedades() {
        let period = create_period();
        let contract = create_contract();
        let novedades = vec![
            novedad(&period, "emp_002", NovedadType::Bonus, 99_000, 1),
            novedad(&period, "emp_001", NovedadType::Bonus, 10_000, 1),
        ];

        let entry = liquidate_employee(&period, &contract, &novedades, &policy());

        assert_eq!(entry.earnings_total, Decimal::from(10_000));
        assert_eq!(entry.novedad_ids.len(), 1);
    }

    #[test]
    fn test_base_salary_is_snapshotted() {
        let period = create_period();
        let contract = create_contract();

        let entry = liquidate_employee(&period, &contract, &[], &policy());

        assert_eq!(entry.base_salary, Decimal::from(1_500_000));
        assert_eq!(entry.contract_id, "c_001");
    }

    proptest! {
        #[test]
        fn prop_entry_totals_match_novedad_sums(
            lines in proptest::collection::vec((0usize..NovedadType::ALL.len(), 0i64..5_000_000, 0i64..20), 0..30)
        ) {
            let period = create_period();
            let contract = create_contract();
            let novedades: Vec<Novedad> = lines
                .iter()
                .map(|(t, v, q)| novedad(&period, "emp_001", NovedadType::ALL[*t], *v, *q))
                .collect();

            let entry = liquidate_employee(&period, &contract, &novedades, &policy());

            let earnings: Decimal = novedades
                .iter()
                .filter(|n| n.category() == NovedadCategory::Earning)
                .map(|n| n.value * n.quantity)
                .sum();
            let deductions: Decimal = novedades
                .iter()
                .filter(|n| n.category() == NovedadCategory::Deduction)
                .map(|n| n.value * n.quantity)
                .sum();

            prop_assert_eq!(entry.total_earned, entry.base_salary_contribution + earnings);
            prop_assert_eq!(entry.total_deducted, deductions);
            prop_assert_eq!(entry.net, entry.total_earned - entry.total_deducted);
        }
    }
}
