//! Performance benchmarks for the payroll engine.
//!
//! Targets:
//! - Settlement calculation for one contract: < 50μs mean
//! - Liquidation of 100 employees: < 20ms mean
//! - Liquidation of 1000 employees: < 150ms mean
//! - Settlement request through the HTTP router: < 1ms mean
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;

use chrono::NaiveDate;
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::calculation::{SettlementInput, calculate_settlement};
use payroll_engine::config::{ConfigLoader, EngineConfig};
use payroll_engine::engine::{Actor, InMemoryDirectory, InMemoryStore, NewNovedad, NewPeriod, PayrollEngine};
use payroll_engine::models::{
    Contract, ContractStatus, ContractTerm, Employee, IndemnityType, NovedadType, PeriodType,
    SalaryRecord,
};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn load_config() -> EngineConfig {
    ConfigLoader::load("./config/co")
        .expect("Failed to load config")
        .into_config()
}

/// Builds a directory with `count` employees on indefinite contracts.
fn create_directory(count: usize) -> Arc<InMemoryDirectory> {
    let directory = InMemoryDirectory::new();
    for i in 0..count {
        let employee_id = format!("emp_{:05}", i);
        directory.add_employee(Employee {
            id: employee_id.clone(),
            name: format!("Empleado {}", i),
            active: true,
        });
        directory.add_contract(Contract {
            id: format!("c_{:05}", i),
            employee_id,
            salary: Decimal::from(1_300_000 + (i as i64 % 50) * 100_000),
            start_date: date(2020 + (i as i32 % 4), 1 + (i as u32 % 12), 1),
            end_date: None,
            status: ContractStatus::Active,
            term: ContractTerm::Indefinite,
        });
    }
    Arc::new(directory)
}

fn create_engine(count: usize) -> PayrollEngine {
    let directory = create_directory(count);
    PayrollEngine::new(
        load_config(),
        Arc::new(InMemoryStore::new()),
        directory.clone(),
        directory,
    )
    .expect("Failed to build engine")
}

/// Opens a period and gives every third employee an overtime and a loan.
fn prepare_period(engine: &PayrollEngine, count: usize) -> uuid::Uuid {
    let actor = Actor::system();
    let period = engine
        .create_period(
            &actor,
            NewPeriod {
                period_type: PeriodType::Biweekly,
                start_date: date(2024, 3, 1),
                end_date: date(2024, 3, 15),
                description: "Benchmark".to_string(),
            },
        )
        .expect("Failed to create period");

    for i in (0..count).step_by(3) {
        for (novedad_type, value) in [
            (NovedadType::OvertimeDay, 50_000),
            (NovedadType::Loan, 30_000),
        ] {
            engine
                .add_novedad(
                    &actor,
                    period.id,
                    NewNovedad {
                        employee_id: format!("emp_{:05}", i),
                        category: None,
                        novedad_type,
                        value: Decimal::from(value),
                        quantity: Decimal::from(2),
                        date: date(2024, 3, 5),
                        comment: None,
                    },
                )
                .expect("Failed to add novedad");
        }
    }
    period.id
}

/// Benchmark: Settlement calculation for a single contract.
///
/// Target: < 50μs mean
fn bench_settlement_calculation(c: &mut Criterion) {
    let config = load_config();
    let contract = Contract {
        id: "c_bench".to_string(),
        employee_id: "emp_bench".to_string(),
        salary: Decimal::from(4_500_000),
        start_date: date(2019, 2, 11),
        end_date: None,
        status: ContractStatus::Active,
        term: ContractTerm::Indefinite,
    };
    let history: Vec<SalaryRecord> = (1..=12)
        .map(|month| SalaryRecord {
            month: date(2023, month, 1),
            amount: Decimal::from(4_200_000 + month as i64 * 25_000),
        })
        .collect();

    c.bench_function("settlement_calculation", |b| {
        b.iter(|| {
            let input = SettlementInput {
                contract: &contract,
                salary_history: &history,
                settlement_date: date(2023, 12, 15),
                indemnity_type: IndemnityType::WithoutJustCause,
            };
            black_box(calculate_settlement(black_box(&input), &config))
        })
    });
}

/// Benchmark: Period liquidation across the worker pool.
///
/// Targets: 100 employees < 20ms, 1000 employees < 150ms
fn bench_liquidation(c: &mut Criterion) {
    let mut group = c.benchmark_group("liquidation");

    for count in [100usize, 1000] {
        let engine = create_engine(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || prepare_period(&engine, count),
                |period_id| black_box(engine.liquidate(&Actor::system(), period_id)),
                BatchSize::PerIteration,
            )
        });
    }

    group.finish();
}

/// Benchmark: Settlement generation through the HTTP router.
///
/// Target: < 1ms mean
fn bench_settlement_request(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let count = 10_000;
    let router = create_router(AppState::new(create_engine(count)));
    let mut next = 0usize;

    c.bench_function("settlement_request", |b| {
        b.to_async(&rt).iter_batched(
            || {
                // Each contract settles once, so walk through them
                let body = serde_json::json!({
                    "contract_id": format!("c_{:05}", next % count),
                    "settlement_date": "2024-06-30",
                    "indemnity_type": "without_just_cause"
                })
                .to_string();
                next += 1;
                body
            },
            |body| {
                let router = router.clone();
                async move {
                    let response = router
                        .oneshot(
                            Request::builder()
                                .method("POST")
                                .uri("/settlements")
                                .header("Content-Type", "application/json")
                                .body(Body::from(body))
                                .unwrap(),
                        )
                        .await
                        .unwrap();
                    black_box(response)
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_settlement_calculation,
    bench_liquidation,
    bench_settlement_request,
);
criterion_main!(benches);
