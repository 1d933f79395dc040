//! Store contracts the payroll engine reads from and writes to.
//!
//! The calculator never talks to storage. The batch runner and the HTTP
//! API go through these traits, which [`MemoryStore`] implements.

mod memory;
mod seed;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::EngineResult;
use crate::models::{Employee, Payroll, PayrollNovelty, PayrollPeriod};

pub use memory::MemoryStore;
pub use seed::SeedData;

/// Narrows the set of active employees a query returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EmployeeFilter {
    /// Only employees of this department (case-insensitive).
    pub department: Option<String>,
    /// Only employees whose name or identification contains this text
    /// (case-insensitive).
    pub search: Option<String>,
}

impl EmployeeFilter {
    /// Returns true if the employee is active and passes every criterion.
    pub fn matches(&self, employee: &Employee) -> bool {
        if !employee.is_active() {
            return false;
        }

        if let Some(department) = &self.department {
            if !employee.department.eq_ignore_ascii_case(department) {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let haystacks = [
                employee.full_name().to_lowercase(),
                employee.identification.to_lowercase(),
            ];
            if !haystacks.iter().any(|h| h.contains(&needle)) {
                return false;
            }
        }

        true
    }
}

/// Supplies employee records.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Returns every employee, active or not.
    async fn list_employees(&self) -> EngineResult<Vec<Employee>>;

    /// Returns the active employees that pass `filter`.
    async fn active_employees(&self, filter: &EmployeeFilter) -> EngineResult<Vec<Employee>>;

    /// Returns the employee with the given ID.
    async fn get_employee(&self, id: &str) -> EngineResult<Employee>;
}

/// Supplies novelty records.
#[async_trait]
pub trait NoveltyStore: Send + Sync {
    /// Returns every novelty across all employees and periods.
    async fn list_novelties(&self) -> EngineResult<Vec<PayrollNovelty>>;
}

/// Persists processed payrolls keyed by employee and period.
#[async_trait]
pub trait PayrollStore: Send + Sync {
    /// Returns the payrolls stored for a period.
    async fn by_period(&self, period: PayrollPeriod) -> EngineResult<Vec<Payroll>>;

    /// Returns the payroll stored under a composite key.
    async fn get_payroll(&self, id: &str) -> EngineResult<Payroll>;

    /// Deletes every payroll of a period and returns how many were removed.
    async fn delete_by_period(&self, period: PayrollPeriod) -> EngineResult<usize>;

    /// Inserts a batch of payrolls. Either all are stored or none are.
    async fn bulk_insert(&self, payrolls: Vec<Payroll>) -> EngineResult<Vec<Payroll>>;

    /// Inserts one payroll, replacing any record with the same key.
    async fn insert(&self, payroll: Payroll) -> EngineResult<Payroll>;
}
