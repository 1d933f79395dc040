//! Batch payroll runs.
//!
//! A run calculates every active employee for a period in parallel on the
//! blocking pool, then replaces the period's stored payrolls. Delete and insert happen under a
//! per-runner lock so two runs never interleave their writes.

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_payroll;
use crate::config::CalculationConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, Payroll, PayrollPeriod};
use crate::store::{EmployeeFilter, EmployeeStore, NoveltyStore, PayrollStore};

/// A payroll that could not be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    /// 1-based position of the employee in the run.
    pub row: usize,
    /// The employee's ID.
    pub employee_id: String,
    /// The employee's identification number.
    pub identification: String,
    /// The employee's full name.
    pub name: String,
    /// Why the record was rejected.
    pub message: String,
}

/// The outcome of a payroll run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// The period that was processed.
    pub period: PayrollPeriod,
    /// Payrolls that were stored.
    pub payrolls: Vec<Payroll>,
    /// Payrolls that could not be stored.
    pub errors: Vec<RowError>,
    /// How many previously stored payrolls the run replaced.
    pub replaced: usize,
    /// Wall time of the run in microseconds.
    pub duration_us: u64,
}

impl RunSummary {
    /// Returns true if every employee's payroll was stored.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Runs payrolls for whole periods against a store.
pub struct PayrollRunner<S> {
    store: Arc<S>,
    config: CalculationConfig,
    period_lock: Mutex<()>,
}

impl<S> PayrollRunner<S>
where
    S: EmployeeStore + NoveltyStore + PayrollStore,
{
    /// Creates a runner over `store` using `config` for every calculation.
    pub fn new(store: Arc<S>, config: CalculationConfig) -> Self {
        Self {
            store,
            config,
            period_lock: Mutex::new(()),
        }
    }

    /// Returns the store the runner reads from and writes to.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Returns the calculation settings.
    pub fn config(&self) -> &CalculationConfig {
        &self.config
    }

    /// Calculates and stores the payroll of every active employee for
    /// `period`, replacing anything previously stored for it.
    ///
    /// If the batch insert is rejected, each payroll is inserted on its own
    /// and failures are reported per row in [`RunSummary::errors`].
    pub async fn run(&self, period: PayrollPeriod) -> EngineResult<RunSummary> {
        let start_time = Instant::now();
        let run_id = Uuid::new_v4();
        let _guard = self.period_lock.lock().await;

        let employees = self
            .store
            .active_employees(&EmployeeFilter::default())
            .await?;
        if employees.is_empty() {
            return Err(EngineError::NoActiveEmployees {
                month: period.month(),
                year: period.year(),
            });
        }
        let novelties = self.store.list_novelties().await?;

        info!(
            run_id = %run_id,
            period = %period,
            employees = employees.len(),
            novelties = novelties.len(),
            "Starting payroll run"
        );

        let config = self.config.clone();
        let (employees, payrolls) = tokio::task::spawn_blocking(move || {
            let payrolls: Vec<Payroll> = employees
                .par_iter()
                .map(|employee| calculate_payroll(employee, &novelties, period, &config))
                .collect();
            (employees, payrolls)
        })
        .await
        .map_err(|e| EngineError::Calculation {
            message: e.to_string(),
        })?;

        let replaced = self.store.delete_by_period(period).await?;

        let (stored, errors) = match self.store.bulk_insert(payrolls.clone()).await {
            Ok(stored) => (stored, Vec::new()),
            Err(e) => {
                warn!(
                    run_id = %run_id,
                    period = %period,
                    error = %e,
                    "Bulk insert rejected, inserting payrolls one by one"
                );
                self.insert_each(&employees, payrolls).await
            }
        };

        let duration_us = start_time.elapsed().as_micros() as u64;
        info!(
            run_id = %run_id,
            period = %period,
            stored = stored.len(),
            failed = errors.len(),
            replaced,
            duration_us,
            "Payroll run finished"
        );

        Ok(RunSummary {
            run_id,
            period,
            payrolls: stored,
            errors,
            replaced,
            duration_us,
        })
    }

    /// Deletes every stored payroll of `period` and returns how many were
    /// removed. Waits for any run in progress.
    pub async fn clear(&self, period: PayrollPeriod) -> EngineResult<usize> {
        let _guard = self.period_lock.lock().await;
        let removed = self.store.delete_by_period(period).await?;
        info!(period = %period, removed, "Cleared payroll period");
        Ok(removed)
    }

    async fn insert_each(
        &self,
        employees: &[Employee],
        payrolls: Vec<Payroll>,
    ) -> (Vec<Payroll>, Vec<RowError>) {
        let mut stored = Vec::with_capacity(payrolls.len());
        let mut errors = Vec::new();

        for (index, (employee, payroll)) in employees.iter().zip(payrolls).enumerate() {
            match self.store.insert(payroll).await {
                Ok(payroll) => stored.push(payroll),
                Err(e) => {
                    warn!(employee_id = %employee.id, error = %e, "Payroll insert failed");
                    errors.push(RowError {
                        row: index + 1,
                        employee_id: employee.id.clone(),
                        identification: employee.identification.clone(),
                        name: employee.full_name(),
                        message: e.to_string(),
                    });
                }
            }
        }

        (stored, errors)
    }
}
