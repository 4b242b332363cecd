//! Persistence for engine-owned records.
//!
//! Every write is one atomic unit: the store re-checks the record's version
//! (and, where it matters, its state) under the same lock that applies the
//! write. A caller holding a stale snapshot gets [`EngineError::Conflict`].

use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{ContractSettlement, Novedad, PayrollEntry, PayrollPeriod, PeriodState};

use super::{period, settlement};

/// Storage backend for periods, novedades, entries and settlements.
pub trait PayrollStore: Send + Sync {
    /// Stores a new period.
    fn insert_period(&self, period: PayrollPeriod) -> EngineResult<PayrollPeriod>;

    /// Looks up a period.
    fn period(&self, id: Uuid) -> EngineResult<Option<PayrollPeriod>>;

    /// Replaces a period if its stored version is still `expected_version`.
    /// Returns the stored record with its version bumped.
    fn update_period(
        &self,
        period: PayrollPeriod,
        expected_version: u64,
    ) -> EngineResult<PayrollPeriod>;

    /// Appends a novedad if its period is still open, bumping the period's
    /// version so a liquidation computed from an older ledger cannot commit.
    fn insert_novedad(&self, novedad: Novedad) -> EngineResult<Novedad>;

    /// Every novedad of a period, in insertion order.
    fn novedades(&self, period_id: Uuid) -> EngineResult<Vec<Novedad>>;

    /// Stores `entries` and the liquidated `period` together.
    ///
    /// Succeeds only if the stored period is still open at
    /// `expected_version` and holds no entries. On failure nothing is
    /// written.
    fn commit_liquidation(
        &self,
        period: PayrollPeriod,
        expected_version: u64,
        entries: Vec<PayrollEntry>,
    ) -> EngineResult<PayrollPeriod>;

    /// Every entry of a period.
    fn entries(&self, period_id: Uuid) -> EngineResult<Vec<PayrollEntry>>;

    /// Stores a new settlement. At most one settlement may exist per contract.
    fn insert_settlement(&self, settlement: ContractSettlement)
    -> EngineResult<ContractSettlement>;

    /// Looks up a settlement.
    fn settlement(&self, id: Uuid) -> EngineResult<Option<ContractSettlement>>;

    /// Looks up the settlement of a contract.
    fn settlement_for_contract(&self, contract_id: &str)
    -> EngineResult<Option<ContractSettlement>>;

    /// Replaces a settlement if its stored version is still
    /// `expected_version`. Returns the stored record with its version bumped.
    fn update_settlement(
        &self,
        settlement: ContractSettlement,
        expected_version: u64,
    ) -> EngineResult<ContractSettlement>;
}

#[derive(Default)]
struct Tables {
    periods: HashMap<Uuid, PayrollPeriod>,
    novedades: HashMap<Uuid, Vec<Novedad>>,
    entries: HashMap<Uuid, Vec<PayrollEntry>>,
    settlements: HashMap<Uuid, ContractSettlement>,
    settlement_by_contract: HashMap<String, Uuid>,
}

/// A [`PayrollStore`] held in process memory behind one read/write lock.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn stale(entity: &'static str, id: String, stored: u64, expected: u64) -> EngineError {
    EngineError::Conflict {
        entity,
        id,
        message: format!(
            "stored version {} does not match expected version {}",
            stored, expected
        ),
    }
}

fn period_not_found(id: Uuid) -> EngineError {
    EngineError::NotFound {
        entity: period::ENTITY,
        id: id.to_string(),
    }
}

impl PayrollStore for InMemoryStore {
    fn insert_period(&self, period: PayrollPeriod) -> EngineResult<PayrollPeriod> {
        let mut tables = self.tables.write();
        if tables.periods.contains_key(&period.id) {
            return Err(EngineError::Conflict {
                entity: period::ENTITY,
                id: period.id.to_string(),
                message: "period already exists".to_string(),
            });
        }
        tables.periods.insert(period.id, period.clone());
        Ok(period)
    }

    fn period(&self, id: Uuid) -> EngineResult<Option<PayrollPeriod>> {
        Ok(self.tables.read().periods.get(&id).cloned())
    }

    fn update_period(
        &self,
        mut period: PayrollPeriod,
        expected_version: u64,
    ) -> EngineResult<PayrollPeriod> {
        let mut tables = self.tables.write();
        let stored = tables
            .periods
            .get_mut(&period.id)
            .ok_or_else(|| period_not_found(period.id))?;
        if stored.version != expected_version {
            return Err(stale(
                period::ENTITY,
                period.id.to_string(),
                stored.version,
                expected_version,
            ));
        }
        period.version = expected_version + 1;
        *stored = period.clone();
        Ok(period)
    }

    fn insert_novedad(&self, novedad: Novedad) -> EngineResult<Novedad> {
        let mut tables = self.tables.write();
        let owner = tables
            .periods
            .get_mut(&novedad.period_id)
            .ok_or_else(|| period_not_found(novedad.period_id))?;
        period::require_state(owner, PeriodState::Open, "add novedad to")?;
        // A liquidation that read the ledger before this row must not commit
        owner.version += 1;
        tables
            .novedades
            .entry(novedad.period_id)
            .or_default()
            .push(novedad.clone());
        Ok(novedad)
    }

    fn novedades(&self, period_id: Uuid) -> EngineResult<Vec<Novedad>> {
        Ok(self
            .tables
            .read()
            .novedades
            .get(&period_id)
            .cloned()
            .unwrap_or_default())
    }

    fn commit_liquidation(
        &self,
        mut period: PayrollPeriod,
        expected_version: u64,
        entries: Vec<PayrollEntry>,
    ) -> EngineResult<PayrollPeriod> {
        let mut tables = self.tables.write();
        let stored = tables
            .periods
            .get(&period.id)
            .ok_or_else(|| period_not_found(period.id))?;
        if stored.version != expected_version {
            return Err(stale(
                period::ENTITY,
                period.id.to_string(),
                stored.version,
                expected_version,
            ));
        }
        period::require_state(stored, PeriodState::Open, "liquidate")?;
        if tables.entries.get(&period.id).is_some_and(|e| !e.is_empty()) {
            return Err(EngineError::Conflict {
                entity: period::ENTITY,
                id: period.id.to_string(),
                message: "entries already exist for this period".to_string(),
            });
        }

        period.version = expected_version + 1;
        tables.entries.insert(period.id, entries);
        tables.periods.insert(period.id, period.clone());
        Ok(period)
    }

    fn entries(&self, period_id: Uuid) -> EngineResult<Vec<PayrollEntry>> {
        Ok(self
            .tables
            .read()
            .entries
            .get(&period_id)
            .cloned()
            .unwrap_or_default())
    }

    fn insert_settlement(
        &self,
        settlement: ContractSettlement,
    ) -> EngineResult<ContractSettlement> {
        let mut tables = self.tables.write();
        if let Some(existing) = tables.settlement_by_contract.get(&settlement.contract_id) {
            return Err(EngineError::Conflict {
                entity: settlement::ENTITY,
                id: existing.to_string(),
                message: format!(
                    "contract '{}' already has a settlement",
                    settlement.contract_id
                ),
            });
        }
        tables
            .settlement_by_contract
            .insert(settlement.contract_id.clone(), settlement.id);
        tables.settlements.insert(settlement.id, settlement.clone());
        Ok(settlement)
    }

    fn settlement(&self, id: Uuid) -> EngineResult<Option<ContractSettlement>> {
        Ok(self.tables.read().settlements.get(&id).cloned())
    }

    fn settlement_for_contract(
        &self,
        contract_id: &str,
    ) -> EngineResult<Option<ContractSettlement>> {
        let tables = self.tables.read();
        Ok(tables
            .settlement_by_contract
            .get(contract_id)
            .and_then(|id| tables.settlements.get(id))
            .cloned())
    }

    fn update_settlement(
        &self,
        mut settlement: ContractSettlement,
        expected_version: u64,
    ) -> EngineResult<ContractSettlement> {
        let mut tables = self.tables.write();
        let stored = tables
            .settlements
            .get_mut(&settlement.id)
            .ok_or_else(|| EngineError::NotFound {
                entity: settlement::ENTITY,
                id: settlement.id.to_string(),
            })?;
        if stored.version != expected_version {
            return Err(stale(
                settlement::ENTITY,
                settlement.id.to_string(),
                stored.version,
                expected_version,
            ));
        }
        settlement.version = expected_version + 1;
        *stored = settlement.clone();
        Ok(settlement)
    }
}
