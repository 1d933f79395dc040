//! Effective base compensation.
//!
//! This module resolves the amount an employee earns for the period before
//! any novelty: the monthly salary, or the daily rate times days worked.

use rust_decimal::Decimal;

use crate::models::{AuditStep, Compensation, Employee};

/// The result of resolving the effective base, including the audit step.
#[derive(Debug, Clone)]
pub struct CompensationResult {
    /// The effective base compensation for the period.
    pub amount: Decimal,
    /// The audit step recording this resolution.
    pub audit_step: AuditStep,
}

/// Returns the effective base compensation for a set of contract terms.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::effective_base;
/// use payroll_engine::models::Compensation;
/// use rust_decimal::Decimal;
///
/// let daily = Compensation::Daily { daily_rate: Decimal::from(50_000), working_days: 20 };
/// assert_eq!(effective_base(&daily), Decimal::from(1_000_000));
///
/// let monthly = Compensation::Monthly { base_salary: Decimal::from(2_000_000) };
/// assert_eq!(effective_base(&monthly), Decimal::from(2_000_000));
/// ```
pub fn effective_base(compensation: &Compensation) -> Decimal {
    match compensation {
        Compensation::Monthly { base_salary } => *base_salary,
        Compensation::Daily {
            daily_rate,
            working_days,
        } => *daily_rate * Decimal::from(*working_days),
    }
}

/// Resolves an employee's effective base compensation for the period.
///
/// The resolved amount is what the payroll stores as `base_salary`; for a
/// daily worker it changes month to month with the days worked.
pub fn resolve_compensation(employee: &Employee, step_number: u32) -> CompensationResult {
    let amount = effective_base(&employee.compensation);

    let (input, reasoning) = match &employee.compensation {
        Compensation::Monthly { base_salary } => (
            serde_json::json!({
                "contract_type": "monthly",
                "base_salary": base_salary.to_string()
            }),
            format!("Monthly contract: base salary {} applies in full", base_salary),
        ),
        Compensation::Daily {
            daily_rate,
            working_days,
        } => (
            serde_json::json!({
                "contract_type": "daily",
                "daily_rate": daily_rate.to_string(),
                "working_days": working_days
            }),
            format!(
                "Daily contract: {} days x {} = {}",
                working_days, daily_rate, amount
            ),
        ),
    };

    CompensationResult {
        amount,
        audit_step: AuditStep {
            step_number,
            rule_id: "effective_base".to_string(),
            rule_name: "Effective Base Compensation".to_string(),
            input,
            output: serde_json::json!({ "effective_base": amount.to_string() }),
            reasoning,
        },
    }
}
