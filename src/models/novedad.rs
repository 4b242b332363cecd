//! Novedad (payroll adjustment) model.
//!
//! A novedad is a discrete adjustment tied to one employee within one payroll
//! period. Each [`NovedadType`] carries its category as part of its
//! definition, so a type can never drift into the wrong side of the ledger.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Which side of the payroll entry a novedad lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NovedadCategory {
    /// Adds to `total_earned`.
    Earning,
    /// Adds to `total_deducted`.
    Deduction,
}

impl fmt::Display for NovedadCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NovedadCategory::Earning => write!(f, "earning"),
            NovedadCategory::Deduction => write!(f, "deduction"),
        }
    }
}

/// The enumerated kinds of payroll adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NovedadType {
    /// Daytime overtime hours (hora extra diurna).
    OvertimeDay,
    /// Night overtime hours (hora extra nocturna).
    OvertimeNight,
    /// Overtime on Sundays and holidays.
    OvertimeHoliday,
    /// Night work surcharge (recargo nocturno).
    NightSurcharge,
    /// Sunday or holiday work surcharge.
    HolidaySurcharge,
    /// One-off bonus.
    Bonus,
    /// Sales commission.
    Commission,
    /// Transport allowance (auxilio de transporte).
    TransportAllowance,
    /// Paid sick leave (incapacidad).
    SickLeave,
    /// Any other earning.
    OtherEarning,
    /// Loan repayment installment.
    Loan,
    /// Court-ordered garnishment (embargo).
    Garnishment,
    /// Payroll-deducted credit (libranza).
    PayrollCredit,
    /// Salary advance recovered in this period.
    SalaryAdvance,
    /// Voluntary pension or savings contribution.
    VoluntaryContribution,
    /// Unpaid leave.
    UnpaidLeave,
    /// Any other deduction.
    OtherDeduction,
}

impl NovedadType {
    /// Every type, in declaration order.
    pub const ALL: [NovedadType; 17] = [
        NovedadType::OvertimeDay,
        NovedadType::OvertimeNight,
        NovedadType::OvertimeHoliday,
        NovedadType::NightSurcharge,
        NovedadType::HolidaySurcharge,
        NovedadType::Bonus,
        NovedadType::Commission,
        NovedadType::TransportAllowance,
        NovedadType::SickLeave,
        NovedadType::OtherEarning,
        NovedadType::Loan,
        NovedadType::Garnishment,
        NovedadType::PayrollCredit,
        NovedadType::SalaryAdvance,
        NovedadType::VoluntaryContribution,
        NovedadType::UnpaidLeave,
        NovedadType::OtherDeduction,
    ];

    /// Returns the category this type always belongs to.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{NovedadCategory, NovedadType};
    ///
    /// assert_eq!(NovedadType::OvertimeDay.category(), NovedadCategory::Earning);
    /// assert_eq!(NovedadType::Garnishment.category(), NovedadCategory::Deduction);
    /// ```
    pub fn category(self) -> NovedadCategory {
        match self {
            NovedadType::OvertimeDay
            | NovedadType::OvertimeNight
            | NovedadType::OvertimeHoliday
            | NovedadType::NightSurcharge
            | NovedadType::HolidaySurcharge
            | NovedadType::Bonus
            | NovedadType::Commission
            | NovedadType::TransportAllowance
            | NovedadType::SickLeave
            | NovedadType::OtherEarning => NovedadCategory::Earning,
            NovedadType::Loan
            | NovedadType::Garnishment
            | NovedadType::PayrollCredit
            | NovedadType::SalaryAdvance
            | NovedadType::VoluntaryContribution
            | NovedadType::UnpaidLeave
            | NovedadType::OtherDeduction => NovedadCategory::Deduction,
        }
    }

    /// Returns every type belonging to `category`.
    pub fn of_category(category: NovedadCategory) -> impl Iterator<Item = NovedadType> {
        Self::ALL.into_iter().filter(move |t| t.category() == category)
    }
}

/// A payroll adjustment recorded against an open period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Novedad {
    /// Unique identifier.
    pub id: Uuid,
    /// The owning period.
    pub period_id: Uuid,
    /// The employee the adjustment applies to.
    pub employee_id: String,
    /// The adjustment kind. Its category is fixed by the type.
    #[serde(rename = "type")]
    pub novedad_type: NovedadType,
    /// Unit amount.
    pub value: Decimal,
    /// Multiplier applied to `value`.
    pub quantity: Decimal,
    /// The day the adjustment refers to.
    pub date: NaiveDate,
    /// Free-text note.
    pub comment: Option<String>,
    /// Who recorded the adjustment.
    pub created_by: String,
    /// When the adjustment was recorded.
    pub created_at: DateTime<Utc>,
}

impl Novedad {
    /// The category this novedad counts towards.
    pub fn category(&self) -> NovedadCategory {
        self.novedad_type.category()
    }

    /// Returns `value × quantity`.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{Novedad, NovedadType};
    /// use chrono::{NaiveDate, Utc};
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    ///
    /// let novedad = Novedad {
    ///     id: Uuid::new_v4(),
    ///     period_id: Uuid::new_v4(),
    ///     employee_id: "emp_001".to_string(),
    ///     novedad_type: NovedadType::OvertimeDay,
    ///     value: Decimal::from(50_000),
    ///     quantity: Decimal::from(2),
    ///     date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
    ///     comment: None,
    ///     created_by: "admin".to_string(),
    ///     created_at: Utc::now(),
    /// };
    /// assert_eq!(novedad.line_total(), Decimal::from(100_000));
    /// ```
    pub fn line_total(&self) -> Decimal {
        self.value * self.quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_exactly_one_category() {
        let earnings = NovedadType::of_category(NovedadCategory::Earning).count();
        let deductions = NovedadType::of_category(NovedadCategory::Deduction).count();
        assert_eq!(earnings + deductions, NovedadType::ALL.len());
    }

    #[test]
    fn test_overtime_types_are_earnings() {
        assert_eq!(
            NovedadType::OvertimeDay.category(),
            NovedadCategory::Earning
        );
        assert_eq!(
            NovedadType::OvertimeNight.category(),
            NovedadCategory::Earning
        );
    }

    #[test]
    fn test_loan_and_garnishment_are_deductions() {
        assert_eq!(NovedadType::Loan.category(), NovedadCategory::Deduction);
        assert_eq!(
            NovedadType::Garnishment.category(),
            NovedadCategory::Deduction
        );
    }

    #[test]
    fn test_type_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&NovedadType::OvertimeDay).unwrap(),
            "\"overtime_day\""
        );
        let parsed: NovedadType = serde_json::from_str("\"payroll_credit\"").unwrap();
        assert_eq!(parsed, NovedadType::PayrollCredit);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let parsed: Result<NovedadType, _> = serde_json::from_str("\"mystery\"");
        assert!(parsed.is_err());
    }
}
