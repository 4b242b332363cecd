//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod audit;
mod employee;
mod novedad;
mod payroll_entry;
mod period;
mod settlement;
mod settlement_detail;

pub use audit::{AuditWarning, Severity, StateTransition};
pub use employee::{Contract, ContractStatus, ContractTerm, Employee, SalaryRecord};
pub use novedad::{Novedad, NovedadCategory, NovedadType};
pub use payroll_entry::PayrollEntry;
pub use period::{LiquidationOmission, PayrollPeriod, PeriodState, PeriodType};
pub use settlement::{
    ApprovalRecord, ConceptField, ContractSettlement, FieldChange, IndemnityType,
    ManualAdjustment, PaymentRecord, RejectionRecord, SettlementConcepts, SettlementState,
};
pub use settlement_detail::{
    CALCULATION_DETAIL_VERSION, CalculationDetail, ConceptBreakdown, ConceptInputs, FormulaId,
};
