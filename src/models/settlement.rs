//! Contract settlement model.
//!
//! A [`ContractSettlement`] is the termination payout for one contract. The
//! concept amounts live in [`SettlementConcepts`]; the total is always derived
//! from them and never stored on its own.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{CalculationDetail, StateTransition};

/// Approval workflow state of a settlement.
///
/// ```text
/// draft ──submit──▶ pending_approval ──approve──▶ approved ──pay──▶ paid
///   │ ▲                   │                          │
///   │ └──── rejected ◀────┴─────────reject───────────┘
///   └──approve (implicit submit)──▶ approved
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementState {
    /// Computed and editable.
    Draft,
    /// Submitted; waiting for a decision.
    PendingApproval,
    /// Approved; concept values are locked.
    Approved,
    /// Rejected; passes straight back to draft for correction.
    Rejected,
    /// Paid. Terminal: nothing may change.
    Paid,
}

impl SettlementState {
    /// Returns true if no further mutation is permitted.
    pub fn is_terminal(self) -> bool {
        self == SettlementState::Paid
    }
}

impl fmt::Display for SettlementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SettlementState::Draft => "draft",
            SettlementState::PendingApproval => "pending_approval",
            SettlementState::Approved => "approved",
            SettlementState::Rejected => "rejected",
            SettlementState::Paid => "paid",
        };
        f.write_str(name)
    }
}

/// Indemnity owed on termination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndemnityType {
    /// Resignation, just cause, or end of term.
    #[default]
    None,
    /// Dismissal without just cause.
    WithoutJustCause,
    /// Early termination of a fixed-term contract.
    EarlyTermination,
}

/// An editable money field of a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptField {
    /// Cesantías.
    Severance,
    /// Intereses sobre cesantías.
    SeveranceInterest,
    /// Prima de servicios.
    ServiceBonus,
    /// Vacaciones.
    VacationPay,
    /// Indemnización.
    Indemnity,
    /// Anything else owed to the employee.
    OtherConcepts,
    /// Amounts withheld from the payout.
    Deductions,
}

impl fmt::Display for ConceptField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConceptField::Severance => "severance",
            ConceptField::SeveranceInterest => "severance_interest",
            ConceptField::ServiceBonus => "service_bonus",
            ConceptField::VacationPay => "vacation_pay",
            ConceptField::Indemnity => "indemnity",
            ConceptField::OtherConcepts => "other_concepts",
            ConceptField::Deductions => "deductions",
        };
        f.write_str(name)
    }
}

/// The money fields of a settlement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementConcepts {
    /// Cesantías.
    pub severance: Decimal,
    /// Intereses sobre cesantías.
    pub severance_interest: Decimal,
    /// Prima de servicios.
    pub service_bonus: Decimal,
    /// Vacaciones.
    pub vacation_pay: Decimal,
    /// Indemnización.
    pub indemnity: Decimal,
    /// Other amounts owed.
    pub other_concepts: Decimal,
    /// Amounts withheld.
    pub deductions: Decimal,
}

impl SettlementConcepts {
    /// Reads one field.
    pub fn get(&self, field: ConceptField) -> Decimal {
        match field {
            ConceptField::Severance => self.severance,
            ConceptField::SeveranceInterest => self.severance_interest,
            ConceptField::ServiceBonus => self.service_bonus,
            ConceptField::VacationPay => self.vacation_pay,
            ConceptField::Indemnity => self.indemnity,
            ConceptField::OtherConcepts => self.other_concepts,
            ConceptField::Deductions => self.deductions,
        }
    }

    /// Overwrites one field.
    pub fn set(&mut self, field: ConceptField, value: Decimal) {
        let slot = match field {
            ConceptField::Severance => &mut self.severance,
            ConceptField::SeveranceInterest => &mut self.severance_interest,
            ConceptField::ServiceBonus => &mut self.service_bonus,
            ConceptField::VacationPay => &mut self.vacation_pay,
            ConceptField::Indemnity => &mut self.indemnity,
            ConceptField::OtherConcepts => &mut self.other_concepts,
            ConceptField::Deductions => &mut self.deductions,
        };
        *slot = value;
    }

    /// Sum of every concept minus deductions.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::SettlementConcepts;
    /// use rust_decimal::Decimal;
    ///
    /// let concepts = SettlementConcepts {
    ///     severance: Decimal::from(100),
    ///     severance_interest: Decimal::from(10),
    ///     service_bonus: Decimal::from(50),
    ///     vacation_pay: Decimal::from(40),
    ///     indemnity: Decimal::ZERO,
    ///     other_concepts: Decimal::from(5),
    ///     deductions: Decimal::from(20),
    /// };
    /// assert_eq!(concepts.total(), Decimal::from(185));
    /// ```
    pub fn total(&self) -> Decimal {
        self.severance
            + self.severance_interest
            + self.service_bonus
            + self.vacation_pay
            + self.indemnity
            + self.other_concepts
            - self.deductions
    }
}

/// One field's value before and after a manual edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    /// The edited field.
    pub field: ConceptField,
    /// Value before the edit.
    pub before: Decimal,
    /// Value after the edit.
    pub after: Decimal,
}

/// An entry in the append-only manual adjustment log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualAdjustment {
    /// When the edit was applied.
    pub at: DateTime<Utc>,
    /// Who applied it.
    pub actor: String,
    /// Exactly the fields that changed.
    pub changes: Vec<FieldChange>,
    /// Mandatory justification.
    pub justification: String,
}

/// Who approved a settlement and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    /// Approver id.
    pub approved_by: String,
    /// Approval time.
    pub approved_at: DateTime<Utc>,
    /// Optional comments.
    pub comments: Option<String>,
}

/// Who rejected a settlement, when and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionRecord {
    /// Rejector id.
    pub rejected_by: String,
    /// Rejection time.
    pub rejected_at: DateTime<Utc>,
    /// Mandatory reason.
    pub reason: String,
}

/// Payment confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Who recorded the payment.
    pub paid_by: String,
    /// When it was paid.
    pub paid_at: DateTime<Utc>,
    /// Bank or treasury reference.
    pub payment_reference: String,
}

/// The termination settlement for one contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractSettlement {
    /// Unique identifier.
    pub id: Uuid,
    /// The settled contract.
    pub contract_id: String,
    /// The contract's employee.
    pub employee_id: String,
    /// Workflow state.
    pub state: SettlementState,
    /// Contract start, captured at generation.
    pub contract_start_date: NaiveDate,
    /// Contract end, captured at generation.
    pub contract_end_date: Option<NaiveDate>,
    /// The requested settlement date.
    pub settlement_date: NaiveDate,
    /// Inclusive days worked.
    pub days_worked: i64,
    /// Monthly salary at settlement.
    pub last_salary: Decimal,
    /// Average monthly salary over the last twelve months, if any history existed.
    pub average_salary_12m: Option<Decimal>,
    /// Indemnity requested.
    pub indemnity_type: IndemnityType,
    /// Current concept values (computed, possibly hand-adjusted).
    pub concepts: SettlementConcepts,
    /// Structured breakdown of the original calculation.
    pub detail: CalculationDetail,
    /// Free-text notes supplied at generation.
    pub notes: Option<String>,
    /// Append-only log of manual edits.
    #[serde(default)]
    pub manual_adjustments: Vec<ManualAdjustment>,
    /// Append-only log of state changes.
    #[serde(default)]
    pub transitions: Vec<StateTransition<SettlementState>>,
    /// Set on approval; cleared when a later rejection reopens the draft.
    pub approval: Option<ApprovalRecord>,
    /// The most recent rejection.
    pub rejection: Option<RejectionRecord>,
    /// Set when paid.
    pub payment: Option<PaymentRecord>,
    /// Who generated the settlement.
    pub created_by: String,
    /// When it was generated.
    pub created_at: DateTime<Utc>,
    /// Last committed change.
    pub updated_at: DateTime<Utc>,
    /// Bumped on every committed change; used for optimistic checks.
    pub version: u64,
}

impl ContractSettlement {
    /// The payout: every concept minus deductions.
    pub fn total(&self) -> Decimal {
        self.concepts.total()
    }

    /// Returns true if concept values may be edited.
    pub fn is_editable(&self) -> bool {
        self.state == SettlementState::Draft
    }
}
