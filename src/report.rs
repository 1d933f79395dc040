//! Period payroll reports and CSV export.

use std::collections::BTreeMap;
use std::io;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, Payroll, PayrollPeriod};

/// Department name used for employees without one.
pub const UNASSIGNED_DEPARTMENT: &str = "Unassigned";

/// One employee's line in a period report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// Employee ID.
    pub employee_id: String,
    /// Employee full name; empty if the employee no longer exists.
    pub employee_name: String,
    /// Employee identification number.
    pub identification: String,
    /// Employee job title.
    pub position: String,
    /// Effective base compensation.
    pub base_salary: Decimal,
    /// Bonus total.
    pub bonuses: Decimal,
    /// Overtime total.
    pub overtime: Decimal,
    /// Commission total.
    pub commissions: Decimal,
    /// Novelty deductions.
    pub deductions: Decimal,
    /// Total earnings.
    pub total_earnings: Decimal,
    /// Total deductions including withheld contributions.
    pub total_deductions: Decimal,
    /// Net pay.
    pub net_salary: Decimal,
}

/// Headcount and net payroll of one department.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DepartmentSummary {
    /// Active employees in the department.
    pub employees: usize,
    /// Net pay of those employees for the period.
    pub net_payroll: Decimal,
}

/// Period-wide sums.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportTotals {
    /// Sum of total earnings.
    pub earnings: Decimal,
    /// Sum of total deductions.
    pub deductions: Decimal,
    /// Sum of net pay.
    pub net: Decimal,
}

/// Everything processed for one payroll period.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodReport {
    /// The reported period.
    pub period: PayrollPeriod,
    /// Active employees at the time of the report.
    pub active_employees: usize,
    /// One row per payroll of the period, ordered by employee name.
    pub rows: Vec<ReportRow>,
    /// Sums over all rows.
    pub totals: ReportTotals,
    /// Active employees and their net pay by department.
    pub departments: BTreeMap<String, DepartmentSummary>,
}

impl PeriodReport {
    /// Builds the report of `period` from the employee roster and any
    /// payrolls. Payrolls of other periods are ignored.
    pub fn build(period: PayrollPeriod, employees: &[Employee], payrolls: &[Payroll]) -> Self {
        let period_payrolls: Vec<&Payroll> = payrolls.iter().filter(|p| p.is_for(period)).collect();

        let mut rows: Vec<ReportRow> = period_payrolls
            .iter()
            .map(|payroll| {
                let employee = employees.iter().find(|e| e.id == payroll.employee_id);
                ReportRow {
                    employee_id: payroll.employee_id.clone(),
                    employee_name: employee.map(Employee::full_name).unwrap_or_default(),
                    identification: employee
                        .map(|e| e.identification.clone())
                        .unwrap_or_default(),
                    position: employee.map(|e| e.position.clone()).unwrap_or_default(),
                    base_salary: payroll.base_salary,
                    bonuses: payroll.bonuses,
                    overtime: payroll.overtime,
                    commissions: payroll.commissions,
                    deductions: payroll.deductions,
                    total_earnings: payroll.total_earnings,
                    total_deductions: payroll.total_deductions,
                    net_salary: payroll.net_salary,
                }
            })
            .collect();
        rows.sort_by(|a, b| {
            a.employee_name
                .cmp(&b.employee_name)
                .then_with(|| a.employee_id.cmp(&b.employee_id))
        });

        let totals = rows.iter().fold(ReportTotals::default(), |mut acc, row| {
            acc.earnings += row.total_earnings;
            acc.deductions += row.total_deductions;
            acc.net += row.net_salary;
            acc
        });

        let mut departments: BTreeMap<String, DepartmentSummary> = BTreeMap::new();
        let active: Vec<&Employee> = employees.iter().filter(|e| e.is_active()).collect();
        for employee in &active {
            let name = if employee.department.trim().is_empty() {
                UNASSIGNED_DEPARTMENT.to_string()
            } else {
                employee.department.clone()
            };
            let summary = departments.entry(name).or_default();
            summary.employees += 1;
            if let Some(payroll) = period_payrolls.iter().find(|p| p.employee_id == employee.id) {
                summary.net_payroll += payroll.net_salary;
            }
        }

        PeriodReport {
            period,
            active_employees: active.len(),
            rows,
            totals,
            departments,
        }
    }

    /// Writes the rows as CSV with a header line.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> EngineResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        if self.rows.is_empty() {
            csv_writer.write_record(CSV_HEADERS)?;
        }
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush().map_err(|e| EngineError::Export {
            message: e.to_string(),
        })
    }

    /// Returns the rows as a CSV document.
    pub fn to_csv_string(&self) -> EngineResult<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| EngineError::Export {
            message: e.to_string(),
        })
    }

    /// Returns the download name, e.g. `Payroll_Report_3_2025.csv`.
    pub fn csv_filename(&self) -> String {
        format!(
            "Payroll_Report_{}_{}.csv",
            self.period.month(),
            self.period.year()
        )
    }
}

const CSV_HEADERS: [&str; 12] = [
    "employee_id",
    "employee_name",
    "identification",
    "position",
    "base_salary",
    "bonuses",
    "overtime",
    "commissions",
    "deductions",
    "total_earnings",
    "total_deductions",
    "net_salary",
];
