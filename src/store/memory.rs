//! In-memory implementation of every store trait.
//!
//! Payrolls are keyed by their composite `employee-month-year` ID. Locks
//! are always taken employees first, then novelties, then payrolls.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, Payroll, PayrollNovelty, PayrollPeriod};

use super::{EmployeeFilter, EmployeeStore, NoveltyStore, PayrollStore, SeedData};

/// A store that keeps employees, novelties and payrolls in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    employees: RwLock<Vec<Employee>>,
    novelties: RwLock<Vec<PayrollNovelty>>,
    payrolls: RwLock<BTreeMap<String, Payroll>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding validated seed data.
    ///
    /// Fails on the first employee or novelty that does not validate, on
    /// duplicate employee IDs, and on novelties of unknown employees.
    pub fn from_seed(seed: SeedData) -> EngineResult<Self> {
        let mut ids = HashSet::new();
        for employee in &seed.employees {
            employee.validate()?;
            if !ids.insert(employee.id.as_str()) {
                return Err(duplicate_employee(&employee.id));
            }
        }

        for novelty in &seed.novelties {
            novelty.validate()?;
            if !ids.contains(novelty.employee_id.as_str()) {
                return Err(unknown_employee_novelty(novelty));
            }
        }

        info!(
            employees = seed.employees.len(),
            novelties = seed.novelties.len(),
            "Seeded in-memory store"
        );

        Ok(Self {
            employees: RwLock::new(seed.employees),
            novelties: RwLock::new(seed.novelties),
            payrolls: RwLock::new(BTreeMap::new()),
        })
    }

    /// Adds a validated employee.
    pub async fn add_employee(&self, employee: Employee) -> EngineResult<()> {
        employee.validate()?;

        let mut employees = self.employees.write().await;
        if employees.iter().any(|e| e.id == employee.id) {
            return Err(duplicate_employee(&employee.id));
        }
        employees.push(employee);
        Ok(())
    }

    /// Removes an employee and returns it. Their novelties and payrolls are
    /// left in place.
    pub async fn remove_employee(&self, id: &str) -> EngineResult<Employee> {
        let mut employees = self.employees.write().await;
        let index = employees
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| EngineError::EmployeeNotFound {
                employee_id: id.to_string(),
            })?;
        Ok(employees.remove(index))
    }

    /// Adds a validated novelty for a known employee.
    pub async fn add_novelty(&self, novelty: PayrollNovelty) -> EngineResult<()> {
        novelty.validate()?;

        let employees = self.employees.read().await;
        if !employees.iter().any(|e| e.id == novelty.employee_id) {
            return Err(unknown_employee_novelty(&novelty));
        }

        self.novelties.write().await.push(novelty);
        Ok(())
    }
}

fn duplicate_employee(id: &str) -> EngineError {
    EngineError::Storage {
        message: format!("duplicate employee id '{}'", id),
    }
}

fn unknown_employee_novelty(novelty: &PayrollNovelty) -> EngineError {
    EngineError::InvalidNovelty {
        novelty_id: novelty.id.clone(),
        message: format!("unknown employee '{}'", novelty.employee_id),
    }
}

fn unknown_employee_payroll(payroll: &Payroll) -> EngineError {
    EngineError::Storage {
        message: format!(
            "payroll '{}' references unknown employee '{}'",
            payroll.id, payroll.employee_id
        ),
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn list_employees(&self) -> EngineResult<Vec<Employee>> {
        Ok(self.employees.read().await.clone())
    }

    async fn active_employees(&self, filter: &EmployeeFilter) -> EngineResult<Vec<Employee>> {
        Ok(self
            .employees
            .read()
            .await
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }

    async fn get_employee(&self, id: &str) -> EngineResult<Employee> {
        self.employees
            .read()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| EngineError::EmployeeNotFound {
                employee_id: id.to_string(),
            })
    }
}

#[async_trait]
impl NoveltyStore for MemoryStore {
    async fn list_novelties(&self) -> EngineResult<Vec<PayrollNovelty>> {
        Ok(self.novelties.read().await.clone())
    }
}

#[async_trait]
impl PayrollStore for MemoryStore {
    async fn by_period(&self, period: PayrollPeriod) -> EngineResult<Vec<Payroll>> {
        Ok(self
            .payrolls
            .read()
            .await
            .values()
            .filter(|p| p.is_for(period))
            .cloned()
            .collect())
    }

    async fn get_payroll(&self, id: &str) -> EngineResult<Payroll> {
        self.payrolls
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::PayrollNotFound {
                payroll_id: id.to_string(),
            })
    }

    async fn delete_by_period(&self, period: PayrollPeriod) -> EngineResult<usize> {
        let mut payrolls = self.payrolls.write().await;
        let before = payrolls.len();
        payrolls.retain(|_, p| !p.is_for(period));
        let removed = before - payrolls.len();

        debug!(period = %period, removed, "Deleted payrolls for period");
        Ok(removed)
    }

    async fn bulk_insert(&self, batch: Vec<Payroll>) -> EngineResult<Vec<Payroll>> {
        let employees = self.employees.read().await;
        let mut payrolls = self.payrolls.write().await;

        let mut keys = HashSet::new();
        for payroll in &batch {
            if !employees.iter().any(|e| e.id == payroll.employee_id) {
                return Err(unknown_employee_payroll(payroll));
            }
            if payrolls.contains_key(&payroll.id) || !keys.insert(payroll.id.as_str()) {
                return Err(EngineError::Storage {
                    message: format!("duplicate payroll key '{}'", payroll.id),
                });
            }
        }

        for payroll in &batch {
            payrolls.insert(payroll.id.clone(), payroll.clone());
        }

        debug!(inserted = batch.len(), "Bulk inserted payrolls");
        Ok(batch)
    }

    async fn insert(&self, payroll: Payroll) -> EngineResult<Payroll> {
        let employees = self.employees.read().await;
        if !employees.iter().any(|e| e.id == payroll.employee_id) {
            return Err(unknown_employee_payroll(&payroll));
        }

        self.payrolls
            .write()
            .await
            .insert(payroll.id.clone(), payroll.clone());
        Ok(payroll)
    }
}
