//! Calculation logic for the payroll engine.
//!
//! This module contains the payroll calculator and the steps it is built
//! from: effective base resolution, period novelty selection, aggregation
//! by novelty category, and mandatory contribution withholding.

mod compensation;
mod contributions;
mod novelty_selection;
mod novelty_totals;
mod payroll;

pub use compensation::{CompensationResult, effective_base, resolve_compensation};
pub use contributions::{ContributionResult, calculate_contributions, percent, round_currency};
pub use novelty_selection::{NoveltySelectionResult, select_period_novelties};
pub use novelty_totals::{
    NoveltyAggregationResult, NoveltyTotals, UNKNOWN_NOVELTY_TYPE, aggregate_novelties,
};
pub use payroll::{calculate_payroll, calculate_payroll_at, calculate_payroll_with_trace};
