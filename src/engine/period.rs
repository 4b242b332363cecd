//! Period lifecycle transitions.
//!
//! `Open → Liquidated → Approved → Closed`. The functions here take the
//! current record and return the next one; they never touch storage. The
//! facade commits the result with an optimistic version check.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{LiquidationOmission, PayrollPeriod, PeriodState, PeriodType};

use super::Actor;

pub(crate) const ENTITY: &str = "period";

/// Input for [`crate::engine::PayrollEngine::create_period`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPeriod {
    /// Biweekly or monthly.
    #[serde(rename = "type")]
    pub period_type: PeriodType,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive). Must be after `start_date`.
    pub end_date: NaiveDate,
    /// Free-text description. Must not be blank.
    pub description: String,
}

/// Fails unless `period` is in `expected`.
///
/// A closed period reports [`EngineError::TerminalState`]; any other
/// mismatch reports [`EngineError::InvalidTransition`].
pub(crate) fn require_state(
    period: &PayrollPeriod,
    expected: PeriodState,
    action: &'static str,
) -> EngineResult<()> {
    if period.state == expected {
        return Ok(());
    }
    if period.state.is_terminal() {
        return Err(EngineError::TerminalState {
            entity: ENTITY,
            id: period.id.to_string(),
            state: period.state.to_string(),
        });
    }
    Err(EngineError::InvalidTransition {
        entity: ENTITY,
        id: period.id.to_string(),
        state: period.state.to_string(),
        action,
    })
}

/// Builds a fresh `Open` period.
pub(crate) fn open(new: NewPeriod, actor: &Actor, now: DateTime<Utc>) -> EngineResult<PayrollPeriod> {
    if new.end_date <= new.start_date {
        return Err(EngineError::validation(
            "end_date",
            format!("{} must be after start_date {}", new.end_date, new.start_date),
        ));
    }
    if new.description.trim().is_empty() {
        return Err(EngineError::validation("description", "must not be blank"));
    }

    Ok(PayrollPeriod {
        id: Uuid::new_v4(),
        period_type: new.period_type,
        start_date: new.start_date,
        end_date: new.end_date,
        description: new.description,
        state: PeriodState::Open,
        created_by: actor.id.clone(),
        created_at: now,
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
    })
}

/// `Open → Liquidated`.
pub(crate) fn liquidated(
    period: &PayrollPeriod,
    omissions: Vec<LiquidationOmission>,
    actor: &Actor,
    now: DateTime<Utc>,
) -> EngineResult<PayrollPeriod> {
    require_state(period, PeriodState::Open, "liquidate")?;
    let mut next = period.clone();
    next.state = PeriodState::Liquidated;
    next.liquidated_at = Some(now);
    next.liquidated_by = Some(actor.id.clone());
    next.omissions = omissions;
    Ok(next)
}

/// `Liquidated → Approved`.
pub(crate) fn approved(
    period: &PayrollPeriod,
    comment: Option<String>,
    actor: &Actor,
    now: DateTime<Utc>,
) -> EngineResult<PayrollPeriod> {
    require_state(period, PeriodState::Liquidated, "approve")?;
    let mut next = period.clone();
    next.state = PeriodState::Approved;
    next.approved_at = Some(now);
    next.approved_by = Some(actor.id.clone());
    next.approval_comment = comment;
    Ok(next)
}

/// `Approved → Closed`.
pub(crate) fn closed(
    period: &PayrollPeriod,
    comment: Option<String>,
    actor: &Actor,
    now: DateTime<Utc>,
) -> EngineResult<PayrollPeriod> {
    require_state(period, PeriodState::Approved, "close")?;
    let mut next = period.clone();
    next.state = PeriodState::Closed;
    next.closed_at = Some(now);
    next.closed_by = Some(actor.id.clone());
    next.closing_comment = comment;
    Ok(next)
}
