//! Novedad ledger input validation.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Novedad, NovedadCategory, NovedadType, PayrollPeriod};

use super::Actor;

/// Input for [`crate::engine::PayrollEngine::add_novedad`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNovedad {
    /// The employee the adjustment applies to.
    pub employee_id: String,
    /// Optional; when given it must agree with `novedad_type`.
    #[serde(default)]
    pub category: Option<NovedadCategory>,
    /// The adjustment kind.
    #[serde(rename = "type")]
    pub novedad_type: NovedadType,
    /// Unit amount, at least zero.
    pub value: Decimal,
    /// Multiplier, at least zero.
    pub quantity: Decimal,
    /// Must fall inside the period.
    pub date: NaiveDate,
    /// Free-text note.
    #[serde(default)]
    pub comment: Option<String>,
}

/// Validates `new` against `period` and builds the ledger row.
///
/// The period's state is not checked here; the store checks it when the
/// row is committed.
pub(crate) fn record(
    period: &PayrollPeriod,
    new: NewNovedad,
    actor: &Actor,
    now: DateTime<Utc>,
) -> EngineResult<Novedad> {
    if new.employee_id.trim().is_empty() {
        return Err(EngineError::validation("employee_id", "must not be blank"));
    }
    if let Some(category) = new.category {
        let expected = new.novedad_type.category();
        if category != expected {
            return Err(EngineError::validation(
                "category",
                format!(
                    "type '{:?}' is a {} novedad, not a {}",
                    new.novedad_type, expected, category
                ),
            ));
        }
    }
    if new.value < Decimal::ZERO {
        return Err(EngineError::validation("value", "must not be negative"));
    }
    if new.quantity < Decimal::ZERO {
        return Err(EngineError::validation("quantity", "must not be negative"));
    }
    if !period.contains_date(new.date) {
        return Err(EngineError::validation(
            "date",
            format!(
                "{} is outside the period {}..{}",
                new.date, period.start_date, period.end_date
            ),
        ));
    }

    Ok(Novedad {
        id: Uuid::new_v4(),
        period_id: period.id,
        employee_id: new.employee_id,
        novedad_type: new.novedad_type,
        value: new.value,
        quantity: new.quantity,
        date: new.date,
        comment: new.comment,
        created_by: actor.id.clone(),
        created_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::period::{NewPeriod, open};
    use crate::models::PeriodType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn period() -> PayrollPeriod {
        open(
            NewPeriod {
                period_type: PeriodType::Biweekly,
                start_date: date(2024, 3, 1),
                end_date: date(2024, 3, 15),
                description: "Primera quincena marzo".to_string(),
            },
            &Actor::new("admin"),
            Utc::now(),
        )
        .unwrap()
    }

    fn overtime() -> NewNovedad {
        NewNovedad {
            employee_id: "emp_001".to_string(),
            category: None,
            novedad_type: NovedadType::OvertimeDay,
            value: dec("50000"),
            quantity: dec("2"),
            date: date(2024, 3, 5),
            comment: None,
        }
    }

    fn field_of(result: EngineResult<Novedad>) -> String {
        match result {
            Err(EngineError::Validation { field, .. }) => field,
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    /// NV-001: a valid novedad takes the period id and the actor
    #[test]
    fn test_record_valid_novedad() {
        let period = period();

        let novedad = record(&period, overtime(), &Actor::new("hr"), Utc::now()).unwrap();

        assert_eq!(novedad.period_id, period.id);
        assert_eq!(novedad.created_by, "hr");
        assert_eq!(novedad.category(), NovedadCategory::Earning);
        assert_eq!(novedad.line_total(), dec("100000"));
    }

    /// NV-002: a category that contradicts the type is rejected
    #[test]
    fn test_category_must_match_type() {
        let mut new = overtime();
        new.category = Some(NovedadCategory::Deduction);

        assert_eq!(
            field_of(record(&period(), new, &Actor::system(), Utc::now())),
            "category"
        );
    }

    #[test]
    fn test_matching_category_accepted() {
        let mut new = overtime();
        new.category = Some(NovedadCategory::Earning);

        assert!(record(&period(), new, &Actor::system(), Utc::now()).is_ok());
    }

    #[test]
    fn test_negative_value_rejected() {
        let mut new = overtime();
        new.value = dec("-1");

        assert_eq!(
            field_of(record(&period(), new, &Actor::system(), Utc::now())),
            "value"
        );
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let mut new = overtime();
        new.quantity = dec("-0.5");

        assert_eq!(
            field_of(record(&period(), new, &Actor::system(), Utc::now())),
            "quantity"
        );
    }

    #[test]
    fn test_date_outside_period_rejected() {
        let mut new = overtime();
        new.date = date(2024, 3, 16);

        assert_eq!(
            field_of(record(&period(), new, &Actor::system(), Utc::now())),
            "date"
        );
    }

    #[test]
    fn test_zero_quantity_allowed() {
        let mut new = overtime();
        new.quantity = Decimal::ZERO;

        let novedad = record(&period(), new, &Actor::system(), Utc::now()).unwrap();
        assert_eq!(novedad.line_total(), Decimal::ZERO);
    }
}
