//! Payslips for processed payrolls.
//!
//! A [`Payslip`] lays one stored payroll out as earning and deduction lines
//! next to the employee's details and the novelties of the period. Only
//! amounts carried on the payroll are shown, so the lines always add up to
//! the stored net salary.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::calculation::percent;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, NoveltyType, Payroll, PayrollNovelty, PayrollPeriod};

/// One labelled amount on a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayslipLine {
    /// What the amount is for.
    pub label: String,
    /// The amount.
    pub amount: Decimal,
}

impl PayslipLine {
    fn new(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// A novelty listed on a payslip for reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayslipNovelty {
    /// The kind of adjustment.
    pub novelty_type: NoveltyType,
    /// The adjustment amount.
    pub amount: Decimal,
    /// The date the adjustment was recorded for.
    pub date: NaiveDate,
    /// Free text entered with the novelty.
    pub description: String,
}

/// A printable breakdown of one employee's payroll.
#[derive(Debug, Clone, Serialize)]
pub struct Payslip {
    /// Company name printed in the header.
    pub company: String,
    /// The payroll this payslip was built from.
    pub payroll_id: String,
    /// Employee full name.
    pub employee_name: String,
    /// Employee identification number.
    pub identification: String,
    /// Employee job title.
    pub position: String,
    /// Employee department.
    pub department: String,
    /// The payroll period.
    pub period: PayrollPeriod,
    /// When the payroll was processed.
    pub processed_at: DateTime<Utc>,
    /// Earning lines, base first.
    pub earnings: Vec<PayslipLine>,
    /// Deduction lines.
    pub deductions: Vec<PayslipLine>,
    /// The employee's novelties dated in the period.
    pub novelties: Vec<PayslipNovelty>,
    /// Total earnings.
    pub total_earnings: Decimal,
    /// Total deductions.
    pub total_deductions: Decimal,
    /// Net pay.
    pub net_salary: Decimal,
}

impl Payslip {
    /// Builds the payslip for `payroll`.
    ///
    /// `novelties` may contain records of any employee or period; only the
    /// ones behind this payroll are listed. Contribution lines print the
    /// rates stored on the payroll.
    pub fn build(
        payroll: &Payroll,
        employee: &Employee,
        novelties: &[PayrollNovelty],
        company: &str,
    ) -> EngineResult<Self> {
        if payroll.employee_id != employee.id {
            return Err(EngineError::InvalidEmployee {
                field: "id".to_string(),
                message: format!(
                    "payroll '{}' belongs to '{}', not '{}'",
                    payroll.id, payroll.employee_id, employee.id
                ),
            });
        }
        let period = payroll.period()?;

        let mut earnings = vec![PayslipLine::new("Base salary", payroll.base_salary)];
        for (label, amount) in [
            ("Bonuses", payroll.bonuses),
            ("Overtime", payroll.overtime),
            ("Commissions", payroll.commissions),
        ] {
            if amount > Decimal::ZERO {
                earnings.push(PayslipLine::new(label, amount));
            }
        }

        let mut deductions = Vec::new();
        if !payroll.health_contribution.is_zero() {
            deductions.push(PayslipLine::new(
                format!("Health ({})", percent(payroll.health_rate)),
                payroll.health_contribution,
            ));
        }
        if !payroll.pension_contribution.is_zero() {
            deductions.push(PayslipLine::new(
                format!("Pension ({})", percent(payroll.pension_rate)),
                payroll.pension_contribution,
            ));
        }
        if payroll.deductions > Decimal::ZERO {
            deductions.push(PayslipLine::new("Other deductions", payroll.deductions));
        }

        let mut listed: Vec<PayslipNovelty> = novelties
            .iter()
            .filter(|n| n.employee_id == employee.id && period.contains(n.date))
            .map(|n| PayslipNovelty {
                novelty_type: n.novelty_type.clone(),
                amount: n.amount,
                date: n.date,
                description: n.description.clone(),
            })
            .collect();
        listed.sort_by_key(|n| n.date);

        Ok(Payslip {
            company: company.to_string(),
            payroll_id: payroll.id.clone(),
            employee_name: employee.full_name(),
            identification: employee.identification.clone(),
            position: employee.position.clone(),
            department: employee.department.clone(),
            period,
            processed_at: payroll.processed_at,
            earnings,
            deductions,
            novelties: listed,
            total_earnings: payroll.total_earnings,
            total_deductions: payroll.total_deductions,
            net_salary: payroll.net_salary,
        })
    }

    /// Returns true if the lines add up to the totals and the net salary.
    pub fn reconciles(&self) -> bool {
        let earned: Decimal = self.earnings.iter().map(|l| l.amount).sum();
        let deducted: Decimal = self.deductions.iter().map(|l| l.amount).sum();

        earned == self.total_earnings
            && deducted == self.total_deductions
            && self.total_earnings - deducted == self.net_salary
    }

    /// Returns the download name, e.g. `Payslip_1020304050_3_2025.html`.
    ///
    /// Characters outside `[A-Za-z0-9_.-]` in the identification become
    /// `_`, so the name is always safe inside a `Content-Disposition` header.
    pub fn filename(&self) -> String {
        let identification: String = self
            .identification
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        format!(
            "Payslip_{}_{}_{}.html",
            identification,
            self.period.month(),
            self.period.year()
        )
    }

    /// Renders the payslip as a standalone HTML document.
    pub fn render_html(&self) -> String {
        let mut html = String::with_capacity(4096);

        html.push_str(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<title>Payslip</title>\n\
             <style>\n\
             body { font-family: Arial, sans-serif; padding: 40px; max-width: 800px; margin: 0 auto; }\n\
             .header { text-align: center; border-bottom: 2px solid #333; margin-bottom: 30px; }\n\
             table { width: 100%; border-collapse: collapse; margin: 20px 0; }\n\
             th, td { padding: 10px 12px; border: 1px solid #ddd; }\n\
             .amount { text-align: right; }\n\
             .deduction { text-align: right; color: #d32f2f; }\n\
             .total-row { background-color: #f9f9f9; font-weight: bold; }\n\
             .net-salary { background-color: #e8f5e9; font-size: 18px; font-weight: bold; }\n\
             </style>\n</head>\n<body>\n",
        );

        let _ = write!(
            html,
            "<div class=\"header\">\n<h1>{}</h1>\n<h2>Payslip</h2>\n</div>\n",
            escape_html(&self.company)
        );

        html.push_str("<table class=\"info\">\n");
        for (label, value) in [
            ("Employee", self.employee_name.clone()),
            ("Identification", self.identification.clone()),
            ("Position", self.position.clone()),
            ("Department", self.department.clone()),
            ("Period", self.period.to_string()),
            (
                "Processed",
                self.processed_at.format("%Y-%m-%d").to_string(),
            ),
        ] {
            let _ = writeln!(
                html,
                "<tr><th>{}</th><td>{}</td></tr>",
                label,
                escape_html(&value)
            );
        }
        html.push_str("</table>\n");

        html.push_str("<table class=\"lines\">\n<tr><th>Concept</th><th class=\"amount\">Amount</th></tr>\n");
        for line in &self.earnings {
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td class=\"amount\">${}</td></tr>",
                escape_html(&line.label),
                format_money(line.amount)
            );
        }
        let _ = writeln!(
            html,
            "<tr class=\"total-row\"><td>Total earnings</td><td class=\"amount\">${}</td></tr>",
            format_money(self.total_earnings)
        );
        for line in &self.deductions {
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td class=\"deduction\">-${}</td></tr>",
                escape_html(&line.label),
                format_money(line.amount)
            );
        }
        let _ = writeln!(
            html,
            "<tr class=\"total-row\"><td>Total deductions</td><td class=\"deduction\">-${}</td></tr>",
            format_money(self.total_deductions)
        );
        let _ = writeln!(
            html,
            "<tr class=\"net-salary\"><td>Net pay</td><td class=\"amount\">${}</td></tr>",
            format_money(self.net_salary)
        );
        html.push_str("</table>\n");

        if !self.novelties.is_empty() {
            html.push_str(
                "<h3>Novelties</h3>\n<table class=\"novelties\">\n\
                 <tr><th>Date</th><th>Type</th><th>Description</th><th class=\"amount\">Amount</th></tr>\n",
            );
            for novelty in &self.novelties {
                let _ = writeln!(
                    html,
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"amount\">${}</td></tr>",
                    novelty.date,
                    escape_html(novelty.novelty_type.as_str()),
                    escape_html(&novelty.description),
                    format_money(novelty.amount)
                );
            }
            html.push_str("</table>\n");
        }

        html.push_str(
            "<p class=\"footer\">This payslip was generated electronically.</p>\n</body>\n</html>\n",
        );
        html
    }
}

/// Escapes text for inclusion in HTML element content or attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Formats an amount with comma thousands separators, e.g. `1,840,000`.
pub fn format_money(amount: Decimal) -> String {
    let raw = amount.abs().to_string();
    let (whole, fraction) = match raw.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (raw.as_str(), None),
    };

    let mut grouped = String::with_capacity(raw.len() + whole.len() / 3 + 1);
    if amount.is_sign_negative() && !amount.is_zero() {
        grouped.push('-');
    }
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::calculate_payroll;
    use crate::config::{CalculationConfig, ContributionPolicy};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_employee() -> Employee {
        let mut employee = Employee::monthly("emp_001", dec("2000000"));
        employee.identification = "1020304050".to_string();
        employee.first_name = "Laura".to_string();
        employee.last_name = "Gomez".to_string();
        employee.position = "Analyst".to_string();
        employee.department = "R&D".to_string();
        employee
    }

    fn novelty(id: &str, novelty_type: NoveltyType, amount: &str, day: u32) -> PayrollNovelty {
        PayrollNovelty {
            id: id.to_string(),
            employee_id: "emp_001".to_string(),
            novelty_type,
            amount: dec(amount),
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            description: format!("{} <note>", id),
        }
    }

    fn period() -> PayrollPeriod {
        PayrollPeriod::new(3, 2025).unwrap()
    }

    fn build(novelties: &[PayrollNovelty], config: &CalculationConfig) -> Payslip {
        let employee = create_test_employee();
        let payroll = calculate_payroll(&employee, novelties, period(), config);
        Payslip::build(&payroll, &employee, novelties, "Acme S.A.S.").unwrap()
    }

    #[test]
    fn test_base_only_payslip() {
        let payslip = build(&[], &CalculationConfig::default());

        assert_eq!(
            payslip.earnings,
            vec![PayslipLine::new("Base salary", dec("2000000"))]
        );
        assert_eq!(
            payslip.deductions,
            vec![
                PayslipLine::new("Health (4%)", dec("80000")),
                PayslipLine::new("Pension (4%)", dec("80000")),
            ]
        );
        assert_eq!(payslip.net_salary, dec("1840000"));
        assert!(payslip.reconciles());
    }

    #[test]
    fn test_zero_earning_lines_are_omitted() {
        let novelties = vec![novelty("n1", NoveltyType::Overtime, "50000", 10)];

        let payslip = build(&novelties, &CalculationConfig::default());

        let labels: Vec<&str> = payslip.earnings.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["Base salary", "Overtime"]);
    }

    #[test]
    fn test_other_deductions_line() {
        let novelties = vec![
            novelty("n1", NoveltyType::Loan, "120000", 3),
            novelty("n2", NoveltyType::Absence, "30000", 4),
        ];

        let payslip = build(&novelties, &CalculationConfig::default());

        assert_eq!(
            payslip.deductions.last(),
            Some(&PayslipLine::new("Other deductions", dec("150000")))
        );
        assert_eq!(payslip.total_deductions, dec("310000"));
        assert!(payslip.reconciles());
    }

    #[test]
    fn test_excluded_policy_has_no_contribution_lines() {
        let config = CalculationConfig {
            contribution_policy: ContributionPolicy::Excluded,
            ..CalculationConfig::default()
        };

        let payslip = build(&[], &config);

        assert!(payslip.deductions.is_empty());
        assert_eq!(payslip.net_salary, dec("2000000"));
        assert!(payslip.reconciles());
    }

    #[test]
    fn test_lists_only_period_novelties_in_date_order() {
        let mut april = novelty("n3", NoveltyType::Bonus, "1", 1);
        april.date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let novelties = vec![
            novelty("n2", NoveltyType::Bonus, "20000", 20),
            novelty("n1", NoveltyType::Commission, "10000", 2),
            april,
        ];

        let payslip = build(&novelties, &CalculationConfig::default());

        let days: Vec<String> = payslip.novelties.iter().map(|n| n.date.to_string()).collect();
        assert_eq!(days, vec!["2025-03-02", "2025-03-20"]);
    }

    #[test]
    fn test_contribution_labels_use_rates_of_the_payroll() {
        let config = CalculationConfig {
            health_rate: dec("0.05"),
            pension_rate: dec("0.035"),
            ..CalculationConfig::default()
        };

        let payslip = build(&[], &config);

        assert_eq!(
            payslip.deductions,
            vec![
                PayslipLine::new("Health (5%)", dec("100000")),
                PayslipLine::new("Pension (3.5%)", dec("70000")),
            ]
        );
        assert!(payslip.reconciles());
    }

    #[test]
    fn test_rejects_payroll_of_another_employee() {
        let employee = create_test_employee();
        let other = Employee::monthly("emp_002", dec("1000000"));
        let payroll = calculate_payroll(&other, &[], period(), &CalculationConfig::default());

        let result = Payslip::build(&payroll, &employee, &[], "Acme");
        assert!(matches!(result, Err(EngineError::InvalidEmployee { .. })));
    }

    #[test]
    fn test_tampered_totals_do_not_reconcile() {
        let mut payslip = build(&[], &CalculationConfig::default());
        payslip.net_salary += Decimal::ONE;

        assert!(!payslip.reconciles());
    }

    #[test]
    fn test_filename() {
        let payslip = build(&[], &CalculationConfig::default());
        assert_eq!(payslip.filename(), "Payslip_1020304050_3_2025.html");
    }

    #[test]
    fn test_filename_replaces_unsafe_characters() {
        let mut payslip = build(&[], &CalculationConfig::default());
        payslip.identification = "10\"20\r\n30 é".to_string();

        assert_eq!(payslip.filename(), "Payslip_10_20__30___3_2025.html");
    }

    #[test]
    fn test_render_html_escapes_text() {
        let novelties = vec![novelty("n1", NoveltyType::Bonus, "100000", 5)];

        let html = build(&novelties, &CalculationConfig::default()).render_html();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Acme S.A.S."));
        assert!(html.contains("R&amp;D"));
        assert!(html.contains("n1 &lt;note&gt;"));
        assert!(!html.contains("<note>"));
        assert!(html.contains("March 2025"));
        assert!(html.contains("$1,940,000"));
        assert!(html.contains("-$80,000"));
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(dec("0")), "0");
        assert_eq!(format_money(dec("999")), "999");
        assert_eq!(format_money(dec("1000")), "1,000");
        assert_eq!(format_money(dec("1840000")), "1,840,000");
        assert_eq!(format_money(dec("-500000")), "-500,000");
        assert_eq!(format_money(dec("1234.50")), "1,234.50");
    }
}
