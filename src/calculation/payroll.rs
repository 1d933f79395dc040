//! The payroll calculator.
//!
//! Combines the effective base, the period's novelties and the mandatory
//! contributions into one [`Payroll`] record. The calculation is pure: it
//! performs no I/O and, apart from `processed_at`, returns identical output
//! for identical input.

use std::time::Instant;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::CalculationConfig;
use crate::models::{
    AuditStep, AuditTrace, Employee, Payroll, PayrollCalculation, PayrollNovelty, PayrollPeriod,
};

use super::compensation::resolve_compensation;
use super::contributions::calculate_contributions;
use super::novelty_selection::select_period_novelties;
use super::novelty_totals::aggregate_novelties;

/// Calculates an employee's payroll for a period.
///
/// `all_novelties` may hold novelties of every employee and period; only
/// the employee's novelties dated inside `period` are counted. Net salary
/// is not clamped and can be negative.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_payroll;
/// use payroll_engine::config::CalculationConfig;
/// use payroll_engine::models::{Employee, PayrollPeriod};
/// use rust_decimal::Decimal;
///
/// let employee = Employee::monthly("emp_001", Decimal::from(2_000_000));
/// let period = PayrollPeriod::new(3, 2025).unwrap();
///
/// let payroll = calculate_payroll(&employee, &[], period, &CalculationConfig::default());
///
/// assert_eq!(payroll.id, "emp_001-3-2025");
/// assert_eq!(payroll.total_earnings, Decimal::from(2_000_000));
/// assert_eq!(payroll.deductions, Decimal::ZERO);
/// assert_eq!(payroll.total_deductions, Decimal::from(160_000));
/// assert_eq!(payroll.net_salary, Decimal::from(1_840_000));
/// ```
pub fn calculate_payroll(
    employee: &Employee,
    all_novelties: &[PayrollNovelty],
    period: PayrollPeriod,
    config: &CalculationConfig,
) -> Payroll {
    calculate_payroll_at(employee, all_novelties, period, config, Utc::now()).payroll
}

/// Calculates an employee's payroll for a period along with its audit trace.
pub fn calculate_payroll_with_trace(
    employee: &Employee,
    all_novelties: &[PayrollNovelty],
    period: PayrollPeriod,
    config: &CalculationConfig,
) -> PayrollCalculation {
    calculate_payroll_at(employee, all_novelties, period, config, Utc::now())
}

/// Calculates a payroll stamped with an explicit `processed_at`.
pub fn calculate_payroll_at(
    employee: &Employee,
    all_novelties: &[PayrollNovelty],
    period: PayrollPeriod,
    config: &CalculationConfig,
    processed_at: DateTime<Utc>,
) -> PayrollCalculation {
    let start_time = Instant::now();
    let mut steps: Vec<AuditStep> = Vec::with_capacity(5);

    let compensation = resolve_compensation(employee, 1);
    let effective_base = compensation.amount;
    steps.push(compensation.audit_step);

    let selection = select_period_novelties(&employee.id, all_novelties, period, 2);
    steps.push(selection.audit_step);

    let aggregation = aggregate_novelties(&selection.novelties, 3);
    let totals = aggregation.totals;
    steps.push(aggregation.audit_step);

    let contributions = calculate_contributions(effective_base, config, 4);
    let withheld = contributions.total();
    steps.push(contributions.audit_step.clone());

    let total_earnings = effective_base + totals.earnings();
    let total_deductions = totals.deductions + withheld;
    let net_salary = total_earnings - total_deductions;

    steps.push(AuditStep {
        step_number: 5,
        rule_id: "net_salary".to_string(),
        rule_name: "Net Salary".to_string(),
        input: serde_json::json!({
            "total_earnings": total_earnings.to_string(),
            "novelty_deductions": totals.deductions.to_string(),
            "contributions": withheld.to_string()
        }),
        output: serde_json::json!({
            "total_deductions": total_deductions.to_string(),
            "net_salary": net_salary.to_string()
        }),
        reasoning: if net_salary < Decimal::ZERO {
            format!(
                "Deductions {} exceed earnings {}; negative net {} is kept",
                total_deductions, total_earnings, net_salary
            )
        } else {
            format!(
                "Net {} = earnings {} - deductions {}",
                net_salary, total_earnings, total_deductions
            )
        },
    });

    let payroll = Payroll {
        id: Payroll::key(&employee.id, period),
        employee_id: employee.id.clone(),
        period_month: period.month(),
        period_year: period.year(),
        base_salary: effective_base,
        bonuses: totals.bonuses,
        overtime: totals.overtime,
        commissions: totals.commissions,
        deductions: totals.deductions,
        health_contribution: contributions.health,
        pension_contribution: contributions.pension,
        health_rate: config.health_rate,
        pension_rate: config.pension_rate,
        total_earnings,
        total_deductions,
        net_salary,
        processed_at,
    };

    let duration_us = start_time.elapsed().as_micros() as u64;
    debug!(
        employee_id = %employee.id,
        period = %period,
        net_salary = %net_salary,
        novelties = selection.novelties.len(),
        duration_us,
        "Payroll calculated"
    );

    PayrollCalculation {
        payroll,
        audit_trace: AuditTrace {
            steps,
            warnings: aggregation.warnings,
            duration_us,
        },
    }
}
