//! The payroll engine facade.
//!
//! [`PayrollEngine`] owns the configuration, the store and the directory
//! collaborators, and runs every period and settlement operation as a
//! read / verify / commit cycle. Liquidation computes all entries in memory
//! on a bounded [`rayon`] pool before a single atomic commit, so a failure
//! at any point leaves the period open with no entries.

mod directory;
mod novedad;
mod period;
mod settlement;
mod store;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::{
    BaseSalaryPolicy, CommercialDaysPolicy, SettlementInput, calculate_settlement,
    liquidate_employee,
};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ConceptField, Contract, ContractSettlement, LiquidationOmission, Novedad, PayrollEntry,
    PayrollPeriod, PeriodState,
};

pub use directory::{
    Actor, ContractRepository, DirectorySeed, EmployeeDirectory, InMemoryDirectory,
};
pub use novedad::NewNovedad;
pub use period::NewPeriod;
pub use settlement::GenerateSettlement;
pub use store::{InMemoryStore, PayrollStore};

/// The outcome of a successful liquidation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidationReport {
    /// The period, now liquidated.
    pub period: PayrollPeriod,
    /// One entry per liquidated employee.
    pub entries: Vec<PayrollEntry>,
    /// Employees skipped, and why.
    pub omissions: Vec<LiquidationOmission>,
}

/// Runs payroll periods and contract settlements.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use payroll_engine::config::EngineConfig;
/// use payroll_engine::engine::{Actor, InMemoryDirectory, InMemoryStore, NewPeriod, PayrollEngine};
/// use payroll_engine::models::{PeriodState, PeriodType};
/// use chrono::NaiveDate;
///
/// let directory = Arc::new(InMemoryDirectory::new());
/// let engine = PayrollEngine::new(
///     EngineConfig::default(),
///     Arc::new(InMemoryStore::new()),
///     directory.clone(),
///     directory,
/// )
/// .unwrap();
///
/// let period = engine
///     .create_period(
///         &Actor::new("admin"),
///         NewPeriod {
///             period_type: PeriodType::Monthly,
///             start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
///             end_date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
///             description: "Marzo 2024".to_string(),
///         },
///     )
///     .unwrap();
/// assert_eq!(period.state, PeriodState::Open);
/// ```
pub struct PayrollEngine {
    config: EngineConfig,
    store: Arc<dyn PayrollStore>,
    employees: Arc<dyn EmployeeDirectory>,
    contracts: Arc<dyn ContractRepository>,
    policy: Arc<dyn BaseSalaryPolicy>,
    pool: ThreadPool,
}

impl PayrollEngine {
    /// Creates an engine using [`CommercialDaysPolicy`] for base salary.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigParseError`] if the liquidation worker
    /// pool cannot be started.
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn PayrollStore>,
        employees: Arc<dyn EmployeeDirectory>,
        contracts: Arc<dyn ContractRepository>,
    ) -> EngineResult<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.settings().worker_pool_size)
            .thread_name(|i| format!("liquidation-{}", i))
            .build()
            .map_err(|e| EngineError::ConfigParseError {
                path: "engine.worker_pool_size".to_string(),
                message: e.to_string(),
            })?;
        let policy = Arc::new(CommercialDaysPolicy::new(config.settings()));

        Ok(Self {
            config,
            store,
            employees,
            contracts,
            policy,
            pool,
        })
    }

    /// Replaces the base salary policy.
    pub fn with_policy(mut self, policy: Arc<dyn BaseSalaryPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ---- periods -------------------------------------------------------

    /// Opens a new payroll period.
    pub fn create_period(&self, actor: &Actor, new: NewPeriod) -> EngineResult<PayrollPeriod> {
        let period = period::open(new, actor, Utc::now())?;
        let period = self.store.insert_period(period)?;
        info!(
            period_id = %period.id,
            start_date = %period.start_date,
            end_date = %period.end_date,
            actor = %actor.id,
            "Period created"
        );
        Ok(period)
    }

    /// Records a novedad against an open period.
    ///
    /// # Errors
    ///
    /// Fails with [`EngineError::NotFound`] for an unknown period or
    /// employee, [`EngineError::Validation`] for bad input, and a state
    /// error if the period is no longer open when the row is committed.
    pub fn add_novedad(
        &self,
        actor: &Actor,
        period_id: Uuid,
        new: NewNovedad,
    ) -> EngineResult<Novedad> {
        let period = self.period(period_id)?;
        period::require_state(&period, PeriodState::Open, "add novedad to")?;
        let novedad = novedad::record(&period, new, actor, Utc::now())?;
        if self.employees.employee(&novedad.employee_id)?.is_none() {
            return Err(EngineError::NotFound {
                entity: "employee",
                id: novedad.employee_id,
            });
        }

        let novedad = self.store.insert_novedad(novedad).inspect_err(|e| {
            warn!(period_id = %period_id, error = %e, "Novedad rejected at commit");
        })?;
        info!(
            period_id = %period_id,
            novedad_id = %novedad.id,
            employee_id = %novedad.employee_id,
            novedad_type = ?novedad.novedad_type,
            actor = %actor.id,
            "Novedad recorded"
        );
        Ok(novedad)
    }

    /// Liquidates an open period.
    ///
    /// Every active employee with a contract covering the period gets one
    /// entry; the rest are reported as omissions. Entries and the state
    /// change are committed together.
    pub fn liquidate(&self, actor: &Actor, period_id: Uuid) -> EngineResult<LiquidationReport> {
        let start_time = Instant::now();
        let snapshot = self.period(period_id)?;
        period::require_state(&snapshot, PeriodState::Open, "liquidate")?;

        let mut contracts: Vec<Contract> = Vec::new();
        let mut omissions = Vec::new();
        for employee in self.employees.active_employees()? {
            match self.contracts.active_contract_for(
                &employee.id,
                snapshot.start_date,
                snapshot.end_date,
            )? {
                Some(contract) => contracts.push(contract),
                None => {
                    warn!(
                        period_id = %period_id,
                        employee_id = %employee.id,
                        "No active contract for period; employee skipped"
                    );
                    omissions.push(LiquidationOmission {
                        employee_id: employee.id,
                        reason: "no active contract covering the period".to_string(),
                    });
                }
            }
        }

        let mut by_employee: HashMap<String, Vec<Novedad>> = HashMap::new();
        for novedad in self.store.novedades(period_id)? {
            by_employee
                .entry(novedad.employee_id.clone())
                .or_default()
                .push(novedad);
        }

        let entries = self.compute_entries(&snapshot, &contracts, &by_employee);
        debug!(
            period_id = %period_id,
            entries = entries.len(),
            "Entries computed; committing"
        );

        let next = period::liquidated(&snapshot, omissions.clone(), actor, Utc::now())?;
        let committed = self
            .store
            .commit_liquidation(next, snapshot.version, entries.clone())
            .inspect_err(|e| {
                warn!(period_id = %period_id, error = %e, "Liquidation commit failed; period left open");
            })?;

        info!(
            period_id = %period_id,
            entries = entries.len(),
            omissions = omissions.len(),
            actor = %actor.id,
            duration_us = start_time.elapsed().as_micros(),
            "Period liquidated"
        );
        Ok(LiquidationReport {
            period: committed,
            entries,
            omissions,
        })
    }

    fn compute_entries(
        &self,
        period: &PayrollPeriod,
        contracts: &[Contract],
        by_employee: &HashMap<String, Vec<Novedad>>,
    ) -> Vec<PayrollEntry> {
        let chunk_size = self.config.settings().liquidation_chunk_size.max(1);
        let policy = self.policy.as_ref();
        self.pool.install(|| {
            contracts
                .par_chunks(chunk_size)
                .flat_map_iter(|chunk| {
                    chunk.iter().map(|contract| {
                        let novedades = by_employee
                            .get(&contract.employee_id)
                            .map(Vec::as_slice)
                            .unwrap_or(&[]);
                        liquidate_employee(period, contract, novedades, policy)
                    })
                })
                .collect()
        })
    }

    /// `Liquidated → Approved`.
    pub fn approve_period(
        &self,
        actor: &Actor,
        period_id: Uuid,
        comment: Option<String>,
    ) -> EngineResult<PayrollPeriod> {
        self.transition_period(actor, period_id, "approve", |p| {
            period::approved(p, comment, actor, Utc::now())
        })
    }

    /// `Approved → Closed`.
    pub fn close_period(
        &self,
        actor: &Actor,
        period_id: Uuid,
        comment: Option<String>,
    ) -> EngineResult<PayrollPeriod> {
        self.transition_period(actor, period_id, "close", |p| {
            period::closed(p, comment, actor, Utc::now())
        })
    }

    fn transition_period<F>(
        &self,
        actor: &Actor,
        period_id: Uuid,
        action: &'static str,
        apply: F,
    ) -> EngineResult<PayrollPeriod>
    where
        F: FnOnce(&PayrollPeriod) -> EngineResult<PayrollPeriod>,
    {
        let current = self.period(period_id)?;
        let next = apply(&current).inspect_err(|e| {
            warn!(period_id = %period_id, action, error = %e, "Period transition refused");
        })?;
        let saved = self.store.update_period(next, current.version)?;
        info!(
            period_id = %period_id,
            action,
            from = %current.state,
            to = %saved.state,
            actor = %actor.id,
            "Period transition committed"
        );
        Ok(saved)
    }

    /// Reads a period.
    pub fn period(&self, period_id: Uuid) -> EngineResult<PayrollPeriod> {
        self.store
            .period(period_id)?
            .ok_or_else(|| EngineError::NotFound {
                entity: period::ENTITY,
                id: period_id.to_string(),
            })
    }

    /// Reads every novedad of a period.
    pub fn novedades(&self, period_id: Uuid) -> EngineResult<Vec<Novedad>> {
        self.period(period_id)?;
        self.store.novedades(period_id)
    }

    /// Reads every entry of a period. Empty until the period is liquidated.
    pub fn entries(&self, period_id: Uuid) -> EngineResult<Vec<PayrollEntry>> {
        self.period(period_id)?;
        self.store.entries(period_id)
    }

    // ---- settlements ---------------------------------------------------

    /// Computes and stores a draft settlement for a contract.
    ///
    /// # Errors
    ///
    /// Fails with [`EngineError::NotFound`] for an unknown contract,
    /// [`EngineError::Conflict`] if the contract already has a settlement,
    /// and [`EngineError::Validation`] if the dates or salary are unusable.
    pub fn generate_settlement(
        &self,
        actor: &Actor,
        request: GenerateSettlement,
    ) -> EngineResult<ContractSettlement> {
        let contract = self
            .contracts
            .contract(&request.contract_id)?
            .ok_or_else(|| EngineError::NotFound {
                entity: "contract",
                id: request.contract_id.clone(),
            })?;
        if let Some(existing) = self.store.settlement_for_contract(&contract.id)? {
            return Err(EngineError::Conflict {
                entity: settlement::ENTITY,
                id: existing.id.to_string(),
                message: format!("contract '{}' already has a settlement", contract.id),
            });
        }

        let history = self.contracts.salary_history(&contract.employee_id)?;
        let calculation = calculate_settlement(
            &SettlementInput {
                contract: &contract,
                salary_history: &history,
                settlement_date: request.settlement_date,
                indemnity_type: request.indemnity_type,
            },
            &self.config,
        )?;
        for warning in calculation.detail.warnings() {
            warn!(
                contract_id = %contract.id,
                code = %warning.code,
                severity = ?warning.severity,
                "{}",
                warning.message
            );
        }

        let draft = settlement::draft(&contract, request, calculation, actor, Utc::now());
        let saved = self.store.insert_settlement(draft)?;
        info!(
            settlement_id = %saved.id,
            contract_id = %saved.contract_id,
            days_worked = saved.days_worked,
            total = %saved.total(),
            actor = %actor.id,
            "Settlement generated"
        );
        Ok(saved)
    }

    /// Edits concept values of a draft settlement.
    pub fn update_settlement(
        &self,
        actor: &Actor,
        settlement_id: Uuid,
        changes: &BTreeMap<ConceptField, Decimal>,
        justification: &str,
    ) -> EngineResult<ContractSettlement> {
        self.transition_settlement(actor, settlement_id, "edit", |s| {
            settlement::adjusted(s, changes, justification, actor, Utc::now())
        })
    }

    /// `Draft → PendingApproval`.
    pub fn submit_settlement(
        &self,
        actor: &Actor,
        settlement_id: Uuid,
    ) -> EngineResult<ContractSettlement> {
        self.transition_settlement(actor, settlement_id, "submit", |s| {
            settlement::submitted(s, actor, Utc::now())
        })
    }

    /// Approves a pending settlement, or a draft in one step.
    pub fn approve_settlement(
        &self,
        actor: &Actor,
        settlement_id: Uuid,
        comments: Option<String>,
    ) -> EngineResult<ContractSettlement> {
        self.transition_settlement(actor, settlement_id, "approve", |s| {
            settlement::approved(s, comments, actor, Utc::now())
        })
    }

    /// Rejects a settlement; it returns to draft for correction.
    pub fn reject_settlement(
        &self,
        actor: &Actor,
        settlement_id: Uuid,
        reason: &str,
    ) -> EngineResult<ContractSettlement> {
        self.transition_settlement(actor, settlement_id, "reject", |s| {
            settlement::rejected(s, reason, actor, Utc::now())
        })
    }

    /// `Approved → Paid`.
    pub fn mark_settlement_paid(
        &self,
        actor: &Actor,
        settlement_id: Uuid,
        payment_reference: &str,
    ) -> EngineResult<ContractSettlement> {
        self.transition_settlement(actor, settlement_id, "pay", |s| {
            settlement::paid(s, payment_reference, actor, Utc::now())
        })
    }

    fn transition_settlement<F>(
        &self,
        actor: &Actor,
        settlement_id: Uuid,
        action: &'static str,
        apply: F,
    ) -> EngineResult<ContractSettlement>
    where
        F: FnOnce(&ContractSettlement) -> EngineResult<ContractSettlement>,
    {
        let current = self.settlement(settlement_id)?;
        let next = apply(&current).inspect_err(|e| {
            warn!(settlement_id = %settlement_id, action, error = %e, "Settlement transition refused");
        })?;
        let saved = self.store.update_settlement(next, current.version)?;
        info!(
            settlement_id = %settlement_id,
            action,
            from = %current.state,
            to = %saved.state,
            total = %saved.total(),
            actor = %actor.id,
            "Settlement transition committed"
        );
        Ok(saved)
    }

    /// Reads a settlement.
    pub fn settlement(&self, settlement_id: Uuid) -> EngineResult<ContractSettlement> {
        self.store
            .settlement(settlement_id)?
            .ok_or_else(|| EngineError::NotFound {
                entity: settlement::ENTITY,
                id: settlement_id.to_string(),
            })
    }

    /// Reads the settlement of a contract.
    pub fn settlement_for_contract(&self, contract_id: &str) -> EngineResult<ContractSettlement> {
        self.store
            .settlement_for_contract(contract_id)?
            .ok_or_else(|| EngineError::NotFound {
                entity: settlement::ENTITY,
                id: contract_id.to_string(),
            })
    }
}
