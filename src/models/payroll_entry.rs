//! Payroll entry model.
//!
//! One [`PayrollEntry`] exists per (period, employee) pair. Entries are
//! produced only by liquidation and never edited afterwards.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuditWarning;

/// The computed payroll result for one employee in one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollEntry {
    /// Unique identifier.
    pub id: Uuid,
    /// The liquidated period.
    pub period_id: Uuid,
    /// The paid employee.
    pub employee_id: String,
    /// The contract the salary was read from.
    pub contract_id: String,
    /// Monthly salary snapshot taken at liquidation time.
    pub base_salary: Decimal,
    /// Commercial days of salary paid in this period.
    pub days_paid: Decimal,
    /// Portion of the salary earned in this period.
    pub base_salary_contribution: Decimal,
    /// Sum of earning-category novedad line totals.
    pub earnings_total: Decimal,
    /// `base_salary_contribution + earnings_total`.
    pub total_earned: Decimal,
    /// Sum of deduction-category novedad line totals.
    pub total_deducted: Decimal,
    /// `total_earned - total_deducted`. May be negative.
    pub net: Decimal,
    /// Novedades folded into this entry.
    pub novedad_ids: Vec<Uuid>,
    /// Partial-data and review warnings.
    #[serde(default)]
    pub warnings: Vec<AuditWarning>,
    /// When the entry was computed.
    pub created_at: DateTime<Utc>,
}

impl PayrollEntry {
    /// Returns true if the stored totals are internally consistent.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::PayrollEntry;
    /// use chrono::Utc;
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    ///
    /// let entry = PayrollEntry {
    ///     id: Uuid::new_v4(),
    ///     period_id: Uuid::new_v4(),
    ///     employee_id: "emp_001".to_string(),
    ///     contract_id: "c_001".to_string(),
    ///     base_salary: Decimal::from(1_500_000),
    ///     days_paid: Decimal::from(15),
    ///     base_salary_contribution: Decimal::from(750_000),
    ///     earnings_total: Decimal::from(100_000),
    ///     total_earned: Decimal::from(850_000),
    ///     total_deducted: Decimal::from(30_000),
    ///     net: Decimal::from(820_000),
    ///     novedad_ids: vec![],
    ///     warnings: vec![],
    ///     created_at: Utc::now(),
    /// };
    /// assert!(entry.is_balanced());
    /// ```
    pub fn is_balanced(&self) -> bool {
        self.total_earned == self.base_salary_contribution + self.earnings_total
            && self.net == self.total_earned - self.total_deducted
    }
}
