//! Structured breakdown of a settlement calculation.
//!
//! Every concept records the formula it used, the typed inputs fed into it,
//! the rounded amount and any warnings. The record is versioned so readers
//! can tell which layout they are looking at.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AuditWarning, ConceptField};

/// Layout version written by this build.
pub const CALCULATION_DETAIL_VERSION: u32 = 1;

/// Identifies the formula a concept was computed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulaId {
    /// `last_salary × days_worked / 360`.
    SeveranceCommercialYear,
    /// `severance × days_worked × rate / 360`.
    SeveranceInterestAnnual,
    /// `average_salary × semester_days / divisor`.
    ServiceBonusSemester,
    /// `last_salary × days_worked / 720`.
    VacationCommercialYear,
    /// No indemnity owed.
    IndemnityNotApplicable,
    /// Tenure-graduated days of salary.
    IndemnityTenureGraduated,
    /// Remaining contract days of salary.
    IndemnityRemainingTerm,
}

/// The values a concept formula was evaluated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConceptInputs {
    /// Cesantías.
    Severance {
        /// Monthly salary at settlement.
        last_salary: Decimal,
        /// Inclusive days worked.
        days_worked: i64,
        /// Commercial year.
        divisor: Decimal,
    },
    /// Intereses sobre cesantías.
    SeveranceInterest {
        /// Rounded severance amount.
        severance: Decimal,
        /// Inclusive days worked.
        days_worked: i64,
        /// Annual rate.
        annual_rate: Decimal,
        /// Commercial year.
        divisor: Decimal,
    },
    /// Prima de servicios.
    ServiceBonus {
        /// Salary base used (12-month average or the fallback).
        base_salary: Decimal,
        /// First day of the semester.
        semester_start: NaiveDate,
        /// First day counted (later of semester start and contract start).
        counted_from: NaiveDate,
        /// Last day counted.
        counted_to: NaiveDate,
        /// Days counted in the semester, after the cap.
        days_in_semester: i64,
        /// Divisor applied to the semester days.
        divisor: Decimal,
        /// Months of salary history found in the averaging window.
        months_of_history: u32,
    },
    /// Vacaciones.
    VacationPay {
        /// Monthly salary at settlement.
        last_salary: Decimal,
        /// Inclusive days worked.
        days_worked: i64,
        /// Divisor (720 = 15 days per year).
        divisor: Decimal,
    },
    /// No indemnity requested.
    NoIndemnity,
    /// Dismissal without just cause.
    IndemnityWithoutJustCause {
        /// `last_salary / 30`.
        daily_salary: Decimal,
        /// Tenure in commercial days (360 per year).
        tenure_days: i64,
        /// Whether the high-earner tier applied.
        high_earner: bool,
        /// Days owed for the first year.
        first_year_days: Decimal,
        /// Days owed per additional year.
        additional_year_days: Decimal,
        /// Total days of salary owed.
        days_owed: Decimal,
    },
    /// Early termination of a fixed-term contract.
    IndemnityEarlyTermination {
        /// `last_salary / 30`.
        daily_salary: Decimal,
        /// Days left until the agreed end of the term.
        remaining_days: i64,
        /// Length of the agreed term.
        contract_term_days: i64,
        /// Statutory minimum days.
        min_days: Decimal,
        /// Total days of salary owed.
        days_owed: Decimal,
    },
}

/// One concept's amount plus everything needed to re-derive it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptBreakdown {
    /// Which settlement field this breakdown feeds.
    pub concept: ConceptField,
    /// The formula applied.
    pub formula: FormulaId,
    /// The inputs the formula was evaluated with.
    pub inputs: ConceptInputs,
    /// The rounded result.
    pub amount: Decimal,
    /// True when an input was missing and a documented fallback was used.
    pub used_fallback: bool,
    /// Warnings raised while computing this concept.
    #[serde(default)]
    pub warnings: Vec<AuditWarning>,
}

/// The full, versioned calculation record stored with a settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationDetail {
    /// Layout version.
    pub version: u32,
    /// When the calculation ran.
    pub computed_at: DateTime<Utc>,
    /// Last day counted (contract end or settlement date).
    pub effective_end_date: NaiveDate,
    /// Inclusive days worked.
    pub days_worked: i64,
    /// One breakdown per computed concept.
    pub concepts: Vec<ConceptBreakdown>,
}

impl CalculationDetail {
    /// Returns the breakdown for `concept`, if it was computed.
    pub fn concept(&self, concept: ConceptField) -> Option<&ConceptBreakdown> {
        self.concepts.iter().find(|c| c.concept == concept)
    }

    /// All warnings across concepts, in concept order.
    pub fn warnings(&self) -> impl Iterator<Item = &AuditWarning> {
        self.concepts.iter().flat_map(|c| c.warnings.iter())
    }
}
