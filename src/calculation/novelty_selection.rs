//! Period novelty selection.
//!
//! The calculator receives every novelty across all employees and periods.
//! This module picks the ones that belong to one employee and one period.

use crate::models::{AuditStep, PayrollNovelty, PayrollPeriod};

/// The novelties that apply to an employee's period, with the audit step.
#[derive(Debug, Clone)]
pub struct NoveltySelectionResult<'a> {
    /// Novelties of the employee dated inside the period, in input order.
    pub novelties: Vec<&'a PayrollNovelty>,
    /// The audit step recording the selection.
    pub audit_step: AuditStep,
}

/// Selects the novelties of `employee_id` dated within `period`.
///
/// Membership is decided on the novelty's calendar date alone: the first
/// day of the month is inside, the last day of the previous month is not.
pub fn select_period_novelties<'a>(
    employee_id: &str,
    all_novelties: &'a [PayrollNovelty],
    period: PayrollPeriod,
    step_number: u32,
) -> NoveltySelectionResult<'a> {
    let novelties: Vec<&PayrollNovelty> = all_novelties
        .iter()
        .filter(|n| n.employee_id == employee_id && period.contains(n.date))
        .collect();

    let audit_step = AuditStep {
        step_number,
        rule_id: "novelty_selection".to_string(),
        rule_name: "Period Novelty Selection".to_string(),
        input: serde_json::json!({
            "employee_id": employee_id,
            "period_month": period.month(),
            "period_year": period.year(),
            "candidates": all_novelties.len()
        }),
        output: serde_json::json!({
            "selected": novelties.iter().map(|n| n.id.as_str()).collect::<Vec<_>>()
        }),
        reasoning: format!(
            "Selected {} of {} novelties dated in {}",
            novelties.len(),
            all_novelties.len(),
            period
        ),
    };

    NoveltySelectionResult {
        novelties,
        audit_step,
    }
}
