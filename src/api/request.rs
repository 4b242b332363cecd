//! Request types for the payroll engine API.
//!
//! This module defines the JSON request bodies and their conversion into
//! engine inputs.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::{GenerateSettlement, NewNovedad, NewPeriod};
use crate::models::{ConceptField, IndemnityType, NovedadCategory, NovedadType, PeriodType};

/// Request body for `POST /periods`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePeriodRequest {
    /// Biweekly or monthly.
    #[serde(rename = "type")]
    pub period_type: PeriodType,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Free-text description.
    pub description: String,
}

impl From<CreatePeriodRequest> for NewPeriod {
    fn from(req: CreatePeriodRequest) -> Self {
        NewPeriod {
            period_type: req.period_type,
            start_date: req.start_date,
            end_date: req.end_date,
            description: req.description,
        }
    }
}

/// Request body for `POST /periods/:id/novedades`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddNovedadRequest {
    /// The employee the adjustment applies to.
    pub employee_id: String,
    /// Optional; must agree with `type` when present.
    #[serde(default)]
    pub category: Option<NovedadCategory>,
    /// The adjustment kind.
    #[serde(rename = "type")]
    pub novedad_type: NovedadType,
    /// Unit amount.
    pub value: Decimal,
    /// Multiplier. Defaults to one.
    #[serde(default = "default_quantity")]
    pub quantity: Decimal,
    /// The day the adjustment refers to.
    pub date: NaiveDate,
    /// Free-text note.
    #[serde(default)]
    pub comment: Option<String>,
}

fn default_quantity() -> Decimal {
    Decimal::ONE
}

impl From<AddNovedadRequest> for NewNovedad {
    fn from(req: AddNovedadRequest) -> Self {
        NewNovedad {
            employee_id: req.employee_id,
            category: req.category,
            novedad_type: req.novedad_type,
            value: req.value,
            quantity: req.quantity,
            date: req.date,
            comment: req.comment,
        }
    }
}

/// Optional body for `POST /periods/:id/approve` and `/close`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeriodActionRequest {
    /// Free-text comment stored on the period.
    #[serde(default)]
    pub comment: Option<String>,
}

/// Request body for `POST /settlements`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSettlementRequest {
    /// The contract to settle.
    pub contract_id: String,
    /// The requested settlement date.
    pub settlement_date: NaiveDate,
    /// Which indemnity applies.
    #[serde(default)]
    pub indemnity_type: IndemnityType,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<GenerateSettlementRequest> for GenerateSettlement {
    fn from(req: GenerateSettlementRequest) -> Self {
        GenerateSettlement {
            contract_id: req.contract_id,
            settlement_date: req.settlement_date,
            indemnity_type: req.indemnity_type,
            notes: req.notes,
        }
    }
}

/// Request body for `PATCH /settlements/:id`.
///
/// Omitted fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSettlementRequest {
    /// New severance.
    #[serde(default)]
    pub severance: Option<Decimal>,
    /// New interest on severance.
    #[serde(default)]
    pub severance_interest: Option<Decimal>,
    /// New service bonus.
    #[serde(default)]
    pub service_bonus: Option<Decimal>,
    /// New vacation pay.
    #[serde(default)]
    pub vacation_pay: Option<Decimal>,
    /// New indemnity.
    #[serde(default)]
    pub indemnity: Option<Decimal>,
    /// New other concepts.
    #[serde(default)]
    pub other_concepts: Option<Decimal>,
    /// New deductions.
    #[serde(default)]
    pub deductions: Option<Decimal>,
    /// Why the values are being changed.
    pub justification: String,
}

impl UpdateSettlementRequest {
    /// The fields present in the request.
    pub fn changes(&self) -> BTreeMap<ConceptField, Decimal> {
        [
            (ConceptField::Severance, self.severance),
            (ConceptField::SeveranceInterest, self.severance_interest),
            (ConceptField::ServiceBonus, self.service_bonus),
            (ConceptField::VacationPay, self.vacation_pay),
            (ConceptField::Indemnity, self.indemnity),
            (ConceptField::OtherConcepts, self.other_concepts),
            (ConceptField::Deductions, self.deductions),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}

/// Optional body for `POST /settlements/:id/approve`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApproveSettlementRequest {
    /// Approver comments.
    #[serde(default)]
    pub comments: Option<String>,
}

/// Request body for `POST /settlements/:id/reject`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectSettlementRequest {
    /// Why the settlement is rejected.
    pub reason: String,
}

/// Request body for `POST /settlements/:id/pay`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaySettlementRequest {
    /// Bank or treasury reference.
    pub payment_reference: String,
}
