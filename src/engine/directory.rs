//! Collaborators the engine reads from but does not own.
//!
//! Employees, contracts and salary history are maintained elsewhere (an HR
//! system, a database). The engine only needs read access, expressed through
//! the [`EmployeeDirectory`] and [`ContractRepository`] traits.
//! [`InMemoryDirectory`] implements both and can be seeded from YAML.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{Contract, Employee, SalaryRecord};

/// The user performing an operation. Its id is stamped on every record the
/// operation creates or transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User id.
    pub id: String,
}

impl Actor {
    /// Creates an actor with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The actor used when a request names nobody.
    pub fn system() -> Self {
        Self::new("system")
    }
}

/// Read access to employees.
pub trait EmployeeDirectory: Send + Sync {
    /// Every employee currently flagged active.
    fn active_employees(&self) -> EngineResult<Vec<Employee>>;

    /// Looks up one employee.
    fn employee(&self, id: &str) -> EngineResult<Option<Employee>>;
}

/// Read access to contracts and salary history.
pub trait ContractRepository: Send + Sync {
    /// The employee's contract covering any part of `start..=end`.
    ///
    /// When several contracts overlap the window the most recently started
    /// one wins.
    fn active_contract_for(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Option<Contract>>;

    /// Looks up one contract.
    fn contract(&self, id: &str) -> EngineResult<Option<Contract>>;

    /// Monthly salary records for an employee, in no particular order.
    fn salary_history(&self, employee_id: &str) -> EngineResult<Vec<SalaryRecord>>;
}

/// The YAML layout accepted by [`InMemoryDirectory::load_seed`].
///
/// ```yaml
/// employees:
///   - id: emp_001
///     name: Ana Restrepo
/// contracts:
///   - id: c_001
///     employee_id: emp_001
///     salary: "1500000"
///     start_date: 2023-01-01
///     status: active
///     term: indefinite
/// salary_history:
///   emp_001:
///     - { month: 2024-01-01, amount: "1500000" }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectorySeed {
    /// Employees to register.
    #[serde(default)]
    pub employees: Vec<Employee>,
    /// Contracts to register.
    #[serde(default)]
    pub contracts: Vec<Contract>,
    /// Salary history keyed by employee id.
    #[serde(default)]
    pub salary_history: HashMap<String, Vec<SalaryRecord>>,
}

#[derive(Default)]
struct DirectoryTables {
    employees: BTreeMap<String, Employee>,
    contracts: BTreeMap<String, Contract>,
    salary_history: HashMap<String, Vec<SalaryRecord>>,
}

/// In-process employee directory and contract repository.
#[derive(Default)]
pub struct InMemoryDirectory {
    tables: RwLock<DirectoryTables>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory holding everything in `seed`.
    pub fn from_seed(seed: DirectorySeed) -> Self {
        let directory = Self::new();
        for employee in seed.employees {
            directory.add_employee(employee);
        }
        for contract in seed.contracts {
            directory.add_contract(contract);
        }
        for (employee_id, records) in seed.salary_history {
            for record in records {
                directory.add_salary_record(&employee_id, record);
            }
        }
        directory
    }

    /// Reads a [`DirectorySeed`] from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigNotFound`] if the file cannot be read and
    /// [`EngineError::ConfigParseError`] if it is not a valid seed.
    pub fn load_seed<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: display.clone(),
        })?;
        let seed: DirectorySeed =
            serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
                path: display,
                message: e.to_string(),
            })?;

        Ok(Self::from_seed(seed))
    }

    /// Registers or replaces an employee.
    pub fn add_employee(&self, employee: Employee) {
        self.tables
            .write()
            .employees
            .insert(employee.id.clone(), employee);
    }

    /// Registers or replaces a contract.
    pub fn add_contract(&self, contract: Contract) {
        self.tables
            .write()
            .contracts
            .insert(contract.id.clone(), contract);
    }

    /// Appends a salary record to an employee's history.
    pub fn add_salary_record(&self, employee_id: &str, record: SalaryRecord) {
        self.tables
            .write()
            .salary_history
            .entry(employee_id.to_string())
            .or_default()
            .push(record);
    }
}

impl EmployeeDirectory for InMemoryDirectory {
    fn active_employees(&self) -> EngineResult<Vec<Employee>> {
        Ok(self
            .tables
            .read()
            .employees
            .values()
            .filter(|e| e.active)
            .cloned()
            .collect())
    }

    fn employee(&self, id: &str) -> EngineResult<Option<Employee>> {
        Ok(self.tables.read().employees.get(id).cloned())
    }
}

impl ContractRepository for InMemoryDirectory {
    fn active_contract_for(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Option<Contract>> {
        Ok(self
            .tables
            .read()
            .contracts
            .values()
            .filter(|c| c.employee_id == employee_id && c.overlaps(start, end))
            .max_by_key(|c| c.start_date)
            .cloned())
    }

    fn contract(&self, id: &str) -> EngineResult<Option<Contract>> {
        Ok(self.tables.read().contracts.get(id).cloned())
    }

    fn salary_history(&self, employee_id: &str) -> EngineResult<Vec<SalaryRecord>> {
        Ok(self
            .tables
            .read()
            .salary_history
            .get(employee_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContractStatus, ContractTerm};
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn contract(id: &str, start: NaiveDate, end: Option<NaiveDate>) -> Contract {
        Contract {
            id: id.to_string(),
            employee_id: "emp_001".to_string(),
            salary: Decimal::from(1_500_000),
            start_date: start,
            end_date: end,
            status: ContractStatus::Active,
            term: ContractTerm::Indefinite,
        }
    }

    #[test]
    fn test_inactive_employees_are_hidden() {
        let directory = InMemoryDirectory::new();
        directory.add_employee(Employee {
            id: "emp_001".to_string(),
            name: "Ana".to_string(),
            active: true,
        });
        directory.add_employee(Employee {
            id: "emp_002".to_string(),
            name: "Luis".to_string(),
            active: false,
        });

        let active = directory.active_employees().unwrap();

        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "emp_001");
        assert!(directory.employee("emp_002").unwrap().is_some());
    }

    #[test]
    fn test_latest_overlapping_contract_wins() {
        let directory = InMemoryDirectory::new();
        directory.add_contract(contract("c_old", date(2020, 1, 1), Some(date(2024, 3, 5))));
        directory.add_contract(contract("c_new", date(2024, 3, 6), None));
        directory.add_contract(contract("c_future", date(2025, 1, 1), None));

        let found = directory
            .active_contract_for("emp_001", date(2024, 3, 1), date(2024, 3, 15))
            .unwrap()
            .unwrap();

        assert_eq!(found.id, "c_new");
    }

    #[test]
    fn test_no_contract_outside_window() {
        let directory = InMemoryDirectory::new();
        directory.add_contract(contract("c_001", date(2020, 1, 1), Some(date(2023, 12, 31))));

        let found = directory
            .active_contract_for("emp_001", date(2024, 3, 1), date(2024, 3, 15))
            .unwrap();

        assert!(found.is_none());
    }

    #[test]
    fn test_seed_from_yaml() {
        let yaml = r#"
employees:
  - id: emp_001
    name: Ana Restrepo
contracts:
  - id: c_001
    employee_id: emp_001
    salary: "1500000"
    start_date: 2023-01-01
    status: active
    term: indefinite
salary_history:
  emp_001:
    - { month: 2024-01-01, amount: "1500000" }
    - { month: 2024-02-01, amount: "1500000" }
"#;
        let seed: DirectorySeed = serde_yaml::from_str(yaml).unwrap();
        let directory = InMemoryDirectory::from_seed(seed);

        assert_eq!(directory.active_employees().unwrap().len(), 1);
        assert!(directory.contract("c_001").unwrap().is_some());
        assert_eq!(directory.salary_history("emp_001").unwrap().len(), 2);
        assert!(directory.salary_history("emp_999").unwrap().is_empty());
    }

    #[test]
    fn test_load_seed_missing_file() {
        let result = InMemoryDirectory::load_seed("./does/not/exist.yaml");
        assert!(matches!(result, Err(EngineError::ConfigNotFound { .. })));
    }
}
