//! Payroll period model.
//!
//! This module contains the [`PayrollPeriod`] record and the states it moves
//! through. Transitions themselves live in [`crate::engine`]; this module only
//! knows which edges exist.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Length of a payroll period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    /// Quincenal.
    Biweekly,
    /// Mensual.
    Monthly,
}

/// Lifecycle state of a payroll period.
///
/// `Open → Liquidated → Approved → Closed`. No edge may be skipped or taken
/// twice, and `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodState {
    /// Accepting novedades.
    Open,
    /// Entries computed and frozen.
    Liquidated,
    /// Entries approved for payment.
    Approved,
    /// Terminal; retained for audit.
    Closed,
}

impl PeriodState {
    /// The only state reachable from `self`, or `None` when terminal.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::PeriodState;
    ///
    /// assert_eq!(PeriodState::Open.next(), Some(PeriodState::Liquidated));
    /// assert_eq!(PeriodState::Closed.next(), None);
    /// ```
    pub fn next(self) -> Option<PeriodState> {
        match self {
            PeriodState::Open => Some(PeriodState::Liquidated),
            PeriodState::Liquidated => Some(PeriodState::Approved),
            PeriodState::Approved => Some(PeriodState::Closed),
            PeriodState::Closed => None,
        }
    }

    /// Returns true if no further mutation is permitted.
    pub fn is_terminal(self) -> bool {
        self == PeriodState::Closed
    }
}

impl fmt::Display for PeriodState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PeriodState::Open => "open",
            PeriodState::Liquidated => "liquidated",
            PeriodState::Approved => "approved",
            PeriodState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// An employee skipped during liquidation, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidationOmission {
    /// The skipped employee.
    pub employee_id: String,
    /// Why no entry was produced.
    pub reason: String,
}

/// A payroll period and its lifecycle metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollPeriod {
    /// Unique identifier.
    pub id: Uuid,
    /// Biweekly or monthly.
    #[serde(rename = "type")]
    pub period_type: PeriodType,
    /// First day of the period (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
    /// Free-text description.
    pub description: String,
    /// Current lifecycle state.
    pub state: PeriodState,
    /// Who created the period.
    pub created_by: String,
    /// When the period was created.
    pub created_at: DateTime<Utc>,
    /// When the period was liquidated.
    pub liquidated_at: Option<DateTime<Utc>>,
    /// Who liquidated the period.
    pub liquidated_by: Option<String>,
    /// When the period was approved.
    pub approved_at: Option<DateTime<Utc>>,
    /// Who approved the period.
    pub approved_by: Option<String>,
    /// Optional approval comment.
    pub approval_comment: Option<String>,
    /// When the period was closed.
    pub closed_at: Option<DateTime<Utc>>,
    /// Who closed the period.
    pub closed_by: Option<String>,
    /// Optional closing comment.
    pub closing_comment: Option<String>,
    /// Employees skipped by liquidation.
    #[serde(default)]
    pub omissions: Vec<LiquidationOmission>,
    /// Bumped on every committed transition; used for optimistic checks.
    pub version: u64,
}

impl PayrollPeriod {
    /// Checks if a given date falls within this period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Number of calendar days in the period, inclusive of both ends.
    pub fn calendar_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}
