//! Employee and contract records consumed from the HR collaborators.
//!
//! The engine never creates or edits these; it reads them through the
//! directory traits and snapshots what it needs onto its own records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents an employee known to the HR directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Whether the employee is currently active.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Lifecycle status of a contract as reported by the HR directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    /// The contract is in force.
    Active,
    /// The contract has ended; `end_date` is the termination date.
    Terminated,
}

/// Duration arrangement of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractTerm {
    /// Término indefinido.
    Indefinite,
    /// Término fijo; `end_date` is the agreed end of the term.
    FixedTerm,
}

/// Represents an employment contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    /// Unique identifier for the contract.
    pub id: String,
    /// The employee bound by the contract.
    pub employee_id: String,
    /// Monthly salary.
    pub salary: Decimal,
    /// First day of the contract.
    pub start_date: NaiveDate,
    /// Agreed term end (fixed-term) or termination date (terminated).
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Current status.
    pub status: ContractStatus,
    /// Duration arrangement.
    pub term: ContractTerm,
}

impl Contract {
    /// Returns true if the contract covers at least one day of `[start, end]`.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{Contract, ContractStatus, ContractTerm};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let contract = Contract {
    ///     id: "c_001".to_string(),
    ///     employee_id: "emp_001".to_string(),
    ///     salary: Decimal::from(1_500_000),
    ///     start_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
    ///     end_date: None,
    ///     status: ContractStatus::Active,
    ///     term: ContractTerm::Indefinite,
    /// };
    /// let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    /// assert!(contract.overlaps(start, end));
    /// ```
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && self.end_date.is_none_or(|e| e >= start)
    }

    /// Returns the days of `[start, end]` covered by the contract, as an
    /// inclusive date range, or `None` when they don't overlap.
    pub fn overlap(&self, start: NaiveDate, end: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        if !self.overlaps(start, end) {
            return None;
        }
        let from = self.start_date.max(start);
        let to = self.end_date.map_or(end, |e| e.min(end));
        Some((from, to))
    }
}

/// One month of paid salary, used to average the last twelve months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRecord {
    /// Any day inside the month the salary was paid for.
    pub month: NaiveDate,
    /// Monthly salary actually paid (base plus salary-constituting earnings).
    pub amount: Decimal,
}
