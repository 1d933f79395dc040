//! Payroll result models.
//!
//! This module contains the [`Payroll`] record produced once per employee
//! per period, together with the audit structures that explain how it was
//! derived.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayrollPeriod;
use crate::error::EngineResult;

/// The processed payroll of one employee for one period.
///
/// Records are immutable once created. Recalculating a period produces a
/// new record under the same [`Payroll::key`], which replaces the old one.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{Payroll, PayrollPeriod};
///
/// let period = PayrollPeriod::new(3, 2025).unwrap();
/// assert_eq!(Payroll::key("emp_001", period), "emp_001-3-2025");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payroll {
    /// Composite key of employee, month and year.
    pub id: String,
    /// The employee this payroll belongs to.
    pub employee_id: String,
    /// The period month, 1-12.
    pub period_month: u32,
    /// The period year.
    pub period_year: i32,
    /// The effective base compensation for the period.
    pub base_salary: Decimal,
    /// Sum of bonus novelties.
    pub bonuses: Decimal,
    /// Sum of overtime novelties.
    pub overtime: Decimal,
    /// Sum of commission novelties.
    pub commissions: Decimal,
    /// Sum of deduction, absence and loan novelties.
    pub deductions: Decimal,
    /// Health withholding included in `total_deductions`.
    #[serde(default)]
    pub health_contribution: Decimal,
    /// Pension withholding included in `total_deductions`.
    #[serde(default)]
    pub pension_contribution: Decimal,
    /// Health rate in force when the payroll was calculated.
    #[serde(default)]
    pub health_rate: Decimal,
    /// Pension rate in force when the payroll was calculated.
    #[serde(default)]
    pub pension_rate: Decimal,
    /// Base plus every earning novelty.
    pub total_earnings: Decimal,
    /// Novelty deductions plus withheld contributions.
    pub total_deductions: Decimal,
    /// Total earnings minus total deductions. May be negative.
    pub net_salary: Decimal,
    /// When the payroll was calculated.
    pub processed_at: DateTime<Utc>,
}

impl Payroll {
    /// Returns the idempotent key for an employee and period.
    pub fn key(employee_id: &str, period: PayrollPeriod) -> String {
        format!("{}-{}-{}", employee_id, period.month(), period.year())
    }

    /// Returns the period this payroll was calculated for.
    pub fn period(&self) -> EngineResult<PayrollPeriod> {
        PayrollPeriod::new(self.period_month, self.period_year)
    }

    /// Returns true if the payroll belongs to the period.
    pub fn is_for(&self, period: PayrollPeriod) -> bool {
        self.period_month == period.month() && self.period_year == period.year()
    }

    /// Returns the sum of the mandatory contributions.
    pub fn contributions(&self) -> Decimal {
        self.health_contribution + self.pension_contribution
    }

    /// Returns true if every field except `processed_at` matches.
    pub fn same_amounts(&self, other: &Payroll) -> bool {
        Payroll {
            processed_at: other.processed_at,
            ..self.clone()
        } == *other
    }
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate data that did not stop the calculation but should be
/// looked at, such as novelties of an unknown type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// A payroll together with the trace that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollCalculation {
    /// The calculated payroll.
    pub payroll: Payroll,
    /// How the payroll was derived.
    pub audit_trace: AuditTrace,
}
