//! Property tests for the payroll calculator.
//!
//! Generates employees of both contract types with arbitrary novelty sets
//! spread over a year and checks the relations every payroll must satisfy.

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use payroll_engine::calculation::{calculate_payroll, calculate_payroll_at};
use payroll_engine::config::{CalculationConfig, ContributionPolicy};
use payroll_engine::models::{Employee, NoveltyType, PayrollNovelty, PayrollPeriod};
use payroll_engine::payslip::Payslip;

const EMPLOYEE_ID: &str = "emp_prop_001";

fn novelty_type(index: usize) -> NoveltyType {
    match index {
        0 => NoveltyType::Bonus,
        1 => NoveltyType::Overtime,
        2 => NoveltyType::Commission,
        3 => NoveltyType::Deduction,
        4 => NoveltyType::Absence,
        _ => NoveltyType::Loan,
    }
}

fn arb_employee() -> impl Strategy<Value = Employee> {
    prop_oneof![
        (0u64..20_000_000).prop_map(|base| Employee::monthly(EMPLOYEE_ID, Decimal::from(base))),
        (0u64..500_000, 0u32..=31).prop_map(|(rate, days)| {
            Employee::daily(EMPLOYEE_ID, Decimal::from(rate), days)
        }),
    ]
    .prop_map(|mut employee| {
        employee.identification = "1000000001".to_string();
        employee.first_name = "Prop".to_string();
        employee.last_name = "Tester".to_string();
        employee
    })
}

fn arb_novelties() -> impl Strategy<Value = Vec<PayrollNovelty>> {
    prop::collection::vec(
        (0usize..6, 0u64..5_000_000, 1u32..=12, 1u32..=28, any::<bool>()),
        0..20,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (kind, amount, month, day, own))| PayrollNovelty {
                id: format!("nov_{:03}", i),
                employee_id: if own { EMPLOYEE_ID } else { "emp_other" }.to_string(),
                novelty_type: novelty_type(kind),
                amount: Decimal::from(amount),
                date: NaiveDate::from_ymd_opt(2025, month, day).unwrap(),
                description: String::new(),
            })
            .collect()
    })
}

fn arb_config() -> impl Strategy<Value = CalculationConfig> {
    prop_oneof![Just(ContributionPolicy::Withheld), Just(ContributionPolicy::Excluded)].prop_map(
        |contribution_policy| CalculationConfig {
            contribution_policy,
            ..CalculationConfig::default()
        },
    )
}

fn march() -> PayrollPeriod {
    PayrollPeriod::new(3, 2025).unwrap()
}

proptest! {
    #[test]
    fn calculation_is_deterministic(
        employee in arb_employee(),
        novelties in arb_novelties(),
        config in arb_config(),
    ) {
        let at = Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap();
        let first = calculate_payroll_at(&employee, &novelties, march(), &config, at);
        let second = calculate_payroll_at(&employee, &novelties, march(), &config, at);

        prop_assert_eq!(first.payroll, second.payroll);
        prop_assert_eq!(first.audit_trace.steps, second.audit_trace.steps);
    }

    #[test]
    fn totals_reconcile(
        employee in arb_employee(),
        novelties in arb_novelties(),
        config in arb_config(),
    ) {
        let payroll = calculate_payroll(&employee, &novelties, march(), &config);

        prop_assert_eq!(
            payroll.total_earnings,
            payroll.base_salary + payroll.bonuses + payroll.overtime + payroll.commissions
        );
        prop_assert_eq!(payroll.net_salary, payroll.total_earnings - payroll.total_deductions);
        prop_assert_eq!(
            payroll.total_deductions,
            payroll.deductions + payroll.contributions()
        );
    }

    #[test]
    fn payslip_matches_payroll(
        employee in arb_employee(),
        novelties in arb_novelties(),
        config in arb_config(),
    ) {
        let payroll = calculate_payroll(&employee, &novelties, march(), &config);
        let payslip = Payslip::build(&payroll, &employee, &novelties, "Prop Co").unwrap();

        prop_assert!(payslip.reconciles());
        prop_assert_eq!(payslip.net_salary, payroll.net_salary);
    }

    #[test]
    fn novelties_outside_the_period_are_ignored(
        employee in arb_employee(),
        novelties in arb_novelties(),
    ) {
        let config = CalculationConfig::default();
        let in_period: Vec<PayrollNovelty> = novelties
            .iter()
            .filter(|n| n.employee_id == EMPLOYEE_ID && march().contains(n.date))
            .cloned()
            .collect();

        let full = calculate_payroll(&employee, &novelties, march(), &config);
        let filtered = calculate_payroll(&employee, &in_period, march(), &config);

        prop_assert!(full.same_amounts(&filtered));
    }

    #[test]
    fn contributions_depend_on_base_only(
        employee in arb_employee(),
        novelties in arb_novelties(),
    ) {
        let config = CalculationConfig::default();
        let bare = calculate_payroll(&employee, &[], march(), &config);
        let with_novelties = calculate_payroll(&employee, &novelties, march(), &config);

        prop_assert_eq!(bare.health_contribution, with_novelties.health_contribution);
        prop_assert_eq!(bare.pension_contribution, with_novelties.pension_contribution);
        prop_assert_eq!(bare.base_salary, with_novelties.base_salary);
    }

    #[test]
    fn excluding_contributions_never_lowers_net(
        employee in arb_employee(),
        novelties in arb_novelties(),
    ) {
        let withheld = calculate_payroll(&employee, &novelties, march(), &CalculationConfig::default());
        let excluded = calculate_payroll(
            &employee,
            &novelties,
            march(),
            &CalculationConfig {
                contribution_policy: ContributionPolicy::Excluded,
                ..CalculationConfig::default()
            },
        );

        prop_assert!(excluded.net_salary >= withheld.net_salary);
        prop_assert_eq!(excluded.total_earnings, withheld.total_earnings);
    }
}
