//! Warning and audit records shared by the calculators and state machines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How much attention a warning needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational.
    Low,
    /// A fallback or default was used.
    Medium,
    /// The result likely needs manual review.
    High,
}

/// A warning generated during calculation.
///
/// Warnings indicate partial data or fallbacks that don't prevent
/// calculation but must be surfaced alongside the result.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{AuditWarning, Severity};
///
/// let warning = AuditWarning::new(
///     "negative_net",
///     "Deductions exceed earnings",
///     Severity::High,
/// );
/// assert_eq!(warning.code, "negative_net");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level.
    pub severity: Severity,
}

impl AuditWarning {
    /// Creates a new warning.
    pub fn new(code: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity,
        }
    }
}

/// One edge taken by a state machine, kept in an append-only log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition<S> {
    /// State before the transition.
    pub from: S,
    /// State after the transition.
    pub to: S,
    /// Who triggered it.
    pub actor: String,
    /// When it happened.
    pub at: DateTime<Utc>,
}
