//! Base salary contribution for a payroll period.
//!
//! How much of the monthly salary a period pays is a policy decision, so it
//! sits behind the [`BaseSalaryPolicy`] trait. The shipped policy follows the
//! Colombian commercial calendar: every month has 30 days and a biweekly
//! period pays 15, regardless of the calendar length.

use rust_decimal::Decimal;

use crate::config::EngineSettings;
use crate::models::{AuditWarning, Contract, PayrollPeriod, PeriodType, Severity};

use super::{commercial_days, round_money};

/// The salary portion earned in one period.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseSalaryContribution {
    /// Commercial days paid.
    pub days_paid: Decimal,
    /// Amount paid for those days.
    pub amount: Decimal,
    /// Partial-data warnings.
    pub warnings: Vec<AuditWarning>,
}

/// Decides how much base salary a contract earns in a period.
pub trait BaseSalaryPolicy: Send + Sync {
    /// Returns the contribution of `contract` to `period`.
    fn contribution(&self, period: &PayrollPeriod, contract: &Contract) -> BaseSalaryContribution;
}

/// Pays `salary × days / 30`, counting days on the commercial calendar.
///
/// A period fully covered by the contract pays the nominal days (15 or 30).
/// When the contract starts or ends inside the period, the covered span is
/// counted on the 30-day commercial calendar and capped at the nominal days.
#[derive(Debug, Clone)]
pub struct CommercialDaysPolicy {
    month_days: u32,
    biweekly_days: u32,
    rounding_scale: u32,
}

impl CommercialDaysPolicy {
    /// Builds the policy from the engine settings.
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            month_days: settings.commercial_month_days,
            biweekly_days: settings.biweekly_days,
            rounding_scale: settings.rounding_scale,
        }
    }

    fn nominal_days(&self, period_type: PeriodType) -> i64 {
        match period_type {
            PeriodType::Biweekly => i64::from(self.biweekly_days),
            PeriodType::Monthly => i64::from(self.month_days),
        }
    }
}

impl BaseSalaryPolicy for CommercialDaysPolicy {
    fn contribution(&self, period: &PayrollPeriod, contract: &Contract) -> BaseSalaryContribution {
        let nominal = self.nominal_days(period.period_type);
        let mut warnings = Vec::new();

        let days = match contract.overlap(period.start_date, period.end_date) {
            Some((from, to)) => {
                let missed = period.calendar_days() - ((to - from).num_days() + 1);
                if missed > 0 {
                    warnings.push(AuditWarning::new(
                        "partial_period",
                        format!(
                            "Contract '{}' covers {} to {} only; {} calendar days unpaid",
                            contract.id, from, to, missed
                        ),
                        Severity::Low,
                    ));
                    commercial_days(from, to).clamp(0, nominal)
                } else {
                    nominal
                }
            }
            None => {
                warnings.push(AuditWarning::new(
                    "contract_outside_period",
                    format!(
                        "Contract '{}' does not cover any day of the period",
                        contract.id
                    ),
                    Severity::High,
                ));
                0
            }
        };

        let days_paid = Decimal::from(days);
        let amount = round_money(
            contract.salary * days_paid / Decimal::from(self.month_days),
            self.rounding_scale,
        );

        BaseSalaryContribution {
            days_paid,
            amount,
            warnings,
        }
    }
}
