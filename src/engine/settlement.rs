//! Settlement approval workflow.
//!
//! Each function takes the current settlement and returns the next version.
//! Every state change appends to the transition log and every concept edit
//! appends to the manual adjustment log; neither log is ever rewritten. The
//! facade commits the result with an optimistic version check.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::SettlementCalculation;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ApprovalRecord, ConceptField, Contract, ContractSettlement, FieldChange, IndemnityType,
    ManualAdjustment, PaymentRecord, RejectionRecord, SettlementState, StateTransition,
};

use super::Actor;

pub(crate) const ENTITY: &str = "settlement";

/// Input for [`crate::engine::PayrollEngine::generate_settlement`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateSettlement {
    /// The contract to settle.
    pub contract_id: String,
    /// The requested settlement date.
    pub settlement_date: NaiveDate,
    /// Which indemnity applies. Defaults to none.
    #[serde(default)]
    pub indemnity_type: IndemnityType,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Builds a draft settlement from a finished calculation.
pub(crate) fn draft(
    contract: &Contract,
    request: GenerateSettlement,
    calculation: SettlementCalculation,
    actor: &Actor,
    now: DateTime<Utc>,
) -> ContractSettlement {
    ContractSettlement {
        id: Uuid::new_v4(),
        contract_id: contract.id.clone(),
        employee_id: contract.employee_id.clone(),
        state: SettlementState::Draft,
        contract_start_date: contract.start_date,
        contract_end_date: contract.end_date,
        settlement_date: request.settlement_date,
        days_worked: calculation.days_worked,
        last_salary: contract.salary,
        average_salary_12m: calculation.average_salary_12m,
        indemnity_type: request.indemnity_type,
        concepts: calculation.concepts,
        detail: calculation.detail,
        notes: request.notes,
        manual_adjustments: vec![],
        transitions: vec![],
        approval: None,
        rejection: None,
        payment: None,
        created_by: actor.id.clone(),
        created_at: now,
        updated_at: now,
        version: 0,
    }
}

fn terminal(settlement: &ContractSettlement) -> EngineError {
    EngineError::TerminalState {
        entity: ENTITY,
        id: settlement.id.to_string(),
        state: settlement.state.to_string(),
    }
}

fn invalid(settlement: &ContractSettlement, action: &'static str) -> EngineError {
    if settlement.state.is_terminal() {
        return terminal(settlement);
    }
    EngineError::InvalidTransition {
        entity: ENTITY,
        id: settlement.id.to_string(),
        state: settlement.state.to_string(),
        action,
    }
}

fn push_transition(
    settlement: &mut ContractSettlement,
    to: SettlementState,
    actor: &Actor,
    now: DateTime<Utc>,
) {
    settlement.transitions.push(StateTransition {
        from: settlement.state,
        to,
        actor: actor.id.clone(),
        at: now,
    });
    settlement.state = to;
}

fn require_text(field: &str, value: &str) -> EngineResult<()> {
    if value.trim().is_empty() {
        return Err(EngineError::validation(field, "must not be blank"));
    }
    Ok(())
}

/// Applies a manual edit to a draft.
///
/// Only fields whose value actually differs are recorded. An edit that
/// changes nothing is rejected rather than logged.
pub(crate) fn adjusted(
    settlement: &ContractSettlement,
    changes: &BTreeMap<ConceptField, Decimal>,
    justification: &str,
    actor: &Actor,
    now: DateTime<Utc>,
) -> EngineResult<ContractSettlement> {
    if !settlement.is_editable() {
        return Err(invalid(settlement, "edit"));
    }
    require_text("justification", justification)?;
    if let Some((field, _)) = changes.iter().find(|(_, value)| **value < Decimal::ZERO) {
        return Err(EngineError::validation(
            field.to_string(),
            "must not be negative",
        ));
    }

    let mut next = settlement.clone();
    let mut applied = Vec::new();
    for (field, after) in changes {
        let before = next.concepts.get(*field);
        if before != *after {
            next.concepts.set(*field, *after);
            applied.push(FieldChange {
                field: *field,
                before,
                after: *after,
            });
        }
    }
    if applied.is_empty() {
        return Err(EngineError::validation(
            "changes",
            "no concept value differs from the current one",
        ));
    }

    next.manual_adjustments.push(ManualAdjustment {
        at: now,
        actor: actor.id.clone(),
        changes: applied,
        justification: justification.to_string(),
    });
    next.updated_at = now;
    Ok(next)
}

/// `Draft → PendingApproval`.
pub(crate) fn submitted(
    settlement: &ContractSettlement,
    actor: &Actor,
    now: DateTime<Utc>,
) -> EngineResult<ContractSettlement> {
    if settlement.state != SettlementState::Draft {
        return Err(invalid(settlement, "submit"));
    }
    let mut next = settlement.clone();
    push_transition(&mut next, SettlementState::PendingApproval, actor, now);
    next.updated_at = now;
    Ok(next)
}

/// `PendingApproval → Approved`, or `Draft → Approved` through an implicit
/// submit that is logged as its own edge.
pub(crate) fn approved(
    settlement: &ContractSettlement,
    comments: Option<String>,
    actor: &Actor,
    now: DateTime<Utc>,
) -> EngineResult<ContractSettlement> {
    let mut next = settlement.clone();
    match settlement.state {
        SettlementState::Draft => {
            push_transition(&mut next, SettlementState::PendingApproval, actor, now);
        }
        SettlementState::PendingApproval => {}
        _ => return Err(invalid(settlement, "approve")),
    }
    push_transition(&mut next, SettlementState::Approved, actor, now);
    next.approval = Some(ApprovalRecord {
        approved_by: actor.id.clone(),
        approved_at: now,
        comments,
    });
    next.updated_at = now;
    Ok(next)
}

/// Rejects a settlement and reopens it as a draft.
///
/// Both edges (`→ Rejected` and `Rejected → Draft`) are logged. Any earlier
/// approval stamp is cleared.
pub(crate) fn rejected(
    settlement: &ContractSettlement,
    reason: &str,
    actor: &Actor,
    now: DateTime<Utc>,
) -> EngineResult<ContractSettlement> {
    match settlement.state {
        SettlementState::Draft | SettlementState::PendingApproval | SettlementState::Approved => {}
        _ => return Err(invalid(settlement, "reject")),
    }
    require_text("reason", reason)?;

    let mut next = settlement.clone();
    push_transition(&mut next, SettlementState::Rejected, actor, now);
    push_transition(&mut next, SettlementState::Draft, actor, now);
    next.rejection = Some(RejectionRecord {
        rejected_by: actor.id.clone(),
        rejected_at: now,
        reason: reason.to_string(),
    });
    next.approval = None;
    next.updated_at = now;
    Ok(next)
}

/// `Approved → Paid`. Terminal.
pub(crate) fn paid(
    settlement: &ContractSettlement,
    payment_reference: &str,
    actor: &Actor,
    now: DateTime<Utc>,
) -> EngineResult<ContractSettlement> {
    if settlement.state != SettlementState::Approved {
        return Err(invalid(settlement, "pay"));
    }
    require_text("payment_reference", payment_reference)?;

    let mut next = settlement.clone();
    push_transition(&mut next, SettlementState::Paid, actor, now);
    next.payment = Some(PaymentRecord {
        paid_by: actor.id.clone(),
        paid_at: now,
        payment_reference: payment_reference.to_string(),
    });
    next.updated_at = now;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{SettlementInput, calculate_settlement};
    use crate::config::EngineConfig;
    use crate::models::{ContractStatus, ContractTerm};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn create_draft() -> ContractSettlement {
        let contract = Contract {
            id: "c_001".to_string(),
            employee_id: "emp_001".to_string(),
            salary: dec("1200000"),
            start_date: date(2023, 1, 1),
            end_date: Some(date(2023, 12, 31)),
            status: ContractStatus::Terminated,
            term: ContractTerm::Indefinite,
        };
        let request = GenerateSettlement {
            contract_id: contract.id.clone(),
            settlement_date: date(2024, 1, 5),
            indemnity_type: IndemnityType::None,
            notes: None,
        };
        let calculation = calculate_settlement(
            &SettlementInput {
                contract: &contract,
                salary_history: &[],
                settlement_date: request.settlement_date,
                indemnity_type: request.indemnity_type,
            },
            &EngineConfig::default(),
        )
        .unwrap();
        draft(&contract, request, calculation, &Actor::new("hr"), Utc::now())
    }

    fn edges(settlement: &ContractSettlement) -> Vec<(SettlementState, SettlementState)> {
        settlement
            .transitions
            .iter()
            .map(|t| (t.from, t.to))
            .collect()
    }

    fn paid_settlement() -> ContractSettlement {
        let now = Utc::now();
        let s = approved(&create_draft(), None, &Actor::new("boss"), now).unwrap();
        paid(&s, "TRX-1", &Actor::new("treasury"), now).unwrap()
    }

    /// SA-001: an edit records exactly the changed fields with before/after
    #[test]
    fn test_adjustment_records_before_and_after() {
        let s = create_draft();
        let mut changes = BTreeMap::new();
        changes.insert(ConceptField::Deductions, dec("100000"));
        changes.insert(ConceptField::Severance, s.concepts.severance);

        let next = adjusted(&s, &changes, "Loan payoff", &Actor::new("hr"), Utc::now()).unwrap();

        assert_eq!(next.manual_adjustments.len(), 1);
        let adjustment = &next.manual_adjustments[0];
        assert_eq!(
            adjustment.changes,
            vec![FieldChange {
                field: ConceptField::Deductions,
                before: Decimal::ZERO,
                after: dec("100000"),
            }]
        );
        assert_eq!(next.total(), s.total() - dec("100000"));
    }

    /// SA-002: the adjustment log only grows
    #[test]
    fn test_adjustment_log_is_append_only() {
        let s = create_draft();
        let mut first = BTreeMap::new();
        first.insert(ConceptField::OtherConcepts, dec("50000"));
        let mut second = BTreeMap::new();
        second.insert(ConceptField::OtherConcepts, dec("70000"));

        let s1 = adjusted(&s, &first, "Bonus owed", &Actor::system(), Utc::now()).unwrap();
        let s2 = adjusted(&s1, &second, "Corrected bonus", &Actor::system(), Utc::now()).unwrap();

        assert_eq!(s2.manual_adjustments.len(), 2);
        assert_eq!(s2.manual_adjustments[0], s1.manual_adjustments[0]);
        assert_eq!(s2.manual_adjustments[1].changes[0].before, dec("50000"));
    }

    #[test]
    fn test_adjustment_requires_justification() {
        let mut changes = BTreeMap::new();
        changes.insert(ConceptField::Deductions, dec("1"));

        let result = adjusted(&create_draft(), &changes, "  ", &Actor::system(), Utc::now());

        match result {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "justification"),
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_adjustment_rejects_negative_values() {
        let mut changes = BTreeMap::new();
        changes.insert(ConceptField::Indemnity, dec("-5"));

        let result = adjusted(&create_draft(), &changes, "typo", &Actor::system(), Utc::now());

        match result {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "indemnity"),
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_adjustment_without_change_rejected() {
        let s = create_draft();
        let mut changes = BTreeMap::new();
        changes.insert(ConceptField::Severance, s.concepts.severance);

        assert!(adjusted(&s, &changes, "noop", &Actor::system(), Utc::now()).is_err());
    }

    /// SA-003: only drafts are editable
    #[test]
    fn test_cannot_edit_approved() {
        let s = approved(&create_draft(), None, &Actor::system(), Utc::now()).unwrap();
        let mut changes = BTreeMap::new();
        changes.insert(ConceptField::Deductions, dec("1"));

        let result = adjusted(&s, &changes, "late edit", &Actor::system(), Utc::now());

        assert!(matches!(result, Err(EngineError::InvalidTransition { .. })));
    }

    /// SA-004: approving a draft logs the implicit submit
    #[test]
    fn test_approve_from_draft_logs_both_edges() {
        let s = approved(
            &create_draft(),
            Some("ok".to_string()),
            &Actor::new("boss"),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(s.state, SettlementState::Approved);
        assert_eq!(
            edges(&s),
            vec![
                (SettlementState::Draft, SettlementState::PendingApproval),
                (SettlementState::PendingApproval, SettlementState::Approved),
            ]
        );
        let approval = s.approval.unwrap();
        assert_eq!(approval.approved_by, "boss");
        assert_eq!(approval.comments.as_deref(), Some("ok"));
    }

    #[test]
    fn test_submit_then_approve() {
        let now = Utc::now();
        let s = submitted(&create_draft(), &Actor::system(), now).unwrap();
        assert_eq!(s.state, SettlementState::PendingApproval);
        assert!(submitted(&s, &Actor::system(), now).is_err());

        let s = approved(&s, None, &Actor::system(), now).unwrap();
        assert_eq!(s.transitions.len(), 2);
    }

    #[test]
    fn test_cannot_approve_twice() {
        let s = approved(&create_draft(), None, &Actor::system(), Utc::now()).unwrap();

        match approved(&s, None, &Actor::system(), Utc::now()) {
            Err(EngineError::InvalidTransition { state, .. }) => assert_eq!(state, "approved"),
            other => panic!("Expected invalid transition, got {:?}", other),
        }
    }

    /// SA-005: rejection reopens the draft and clears the approval
    #[test]
    fn test_reject_approved_returns_to_draft() {
        let now = Utc::now();
        let s = approved(&create_draft(), None, &Actor::new("boss"), now).unwrap();

        let s = rejected(&s, "Wrong salary", &Actor::new("auditor"), now).unwrap();

        assert_eq!(s.state, SettlementState::Draft);
        assert!(s.approval.is_none());
        assert!(s.is_editable());
        let rejection = s.rejection.as_ref().unwrap();
        assert_eq!(rejection.rejected_by, "auditor");
        assert_eq!(rejection.reason, "Wrong salary");
        assert_eq!(
            &edges(&s)[2..],
            &[
                (SettlementState::Approved, SettlementState::Rejected),
                (SettlementState::Rejected, SettlementState::Draft),
            ]
        );
    }

    #[test]
    fn test_reject_requires_reason() {
        let result = rejected(&create_draft(), "", &Actor::system(), Utc::now());
        assert!(matches!(result, Err(EngineError::Validation { .. })));
    }

    #[test]
    fn test_pay_requires_approval() {
        let result = paid(&create_draft(), "TRX-1", &Actor::system(), Utc::now());
        assert!(matches!(result, Err(EngineError::InvalidTransition { .. })));
    }

    #[test]
    fn test_pay_requires_reference() {
        let s = approved(&create_draft(), None, &Actor::system(), Utc::now()).unwrap();
        let result = paid(&s, " ", &Actor::system(), Utc::now());
        assert!(matches!(result, Err(EngineError::Validation { .. })));
    }

    /// SA-006: a paid settlement refuses every mutation
    #[test]
    fn test_paid_is_terminal() {
        let s = paid_settlement();
        let now = Utc::now();
        let actor = Actor::system();
        let mut changes = BTreeMap::new();
        changes.insert(ConceptField::Deductions, dec("1"));

        assert_eq!(s.payment.as_ref().unwrap().payment_reference, "TRX-1");
        assert!(matches!(
            adjusted(&s, &changes, "late", &actor, now),
            Err(EngineError::TerminalState { .. })
        ));
        assert!(matches!(
            submitted(&s, &actor, now),
            Err(EngineError::TerminalState { .. })
        ));
        assert!(matches!(
            approved(&s, None, &actor, now),
            Err(EngineError::TerminalState { .. })
        ));
        assert!(matches!(
            rejected(&s, "late", &actor, now),
            Err(EngineError::TerminalState { .. })
        ));
        assert!(matches!(
            paid(&s, "TRX-2", &actor, now),
            Err(EngineError::TerminalState { .. })
        ));
    }
}
