//! Monthly payroll engine.
//!
//! This crate calculates an employee's monthly payroll from their
//! compensation terms and the novelties (bonuses, overtime, loans, ...)
//! recorded for the period, runs whole periods in batch, and produces
//! payslips and period reports.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod payslip;
pub mod report;
pub mod runner;
pub mod session;
pub mod store;
