//! Mandatory health and pension contributions.
//!
//! Each contribution is a percentage of the effective base, rounded half-up
//! to the configured currency scale. Under [`ContributionPolicy::Excluded`]
//! nothing is withheld and both contributions are recorded as zero.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::{CalculationConfig, ContributionPolicy};
use crate::models::AuditStep;

/// Rounds a monetary amount half-up to `scale` decimal places.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::round_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_currency(Decimal::from_str("40000.5").unwrap(), 0), Decimal::from(40_001));
/// assert_eq!(round_currency(Decimal::from_str("40000.49").unwrap(), 0), Decimal::from(40_000));
/// ```
pub fn round_currency(amount: Decimal, scale: u32) -> Decimal {
    amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

/// The withheld contributions, including the audit step.
#[derive(Debug, Clone)]
pub struct ContributionResult {
    /// Health contribution withheld.
    pub health: Decimal,
    /// Pension contribution withheld.
    pub pension: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

impl ContributionResult {
    /// Returns the total withheld.
    pub fn total(&self) -> Decimal {
        self.health + self.pension
    }
}

/// Calculates the health and pension contributions on an effective base.
pub fn calculate_contributions(
    effective_base: Decimal,
    config: &CalculationConfig,
    step_number: u32,
) -> ContributionResult {
    let health = round_currency(effective_base * config.health_rate, config.currency_scale);
    let pension = round_currency(effective_base * config.pension_rate, config.currency_scale);

    let (withheld_health, withheld_pension, reasoning) = match config.contribution_policy {
        ContributionPolicy::Withheld => (
            health,
            pension,
            format!(
                "Withheld health {} ({} of {}) and pension {} ({} of {})",
                health,
                percent(config.health_rate),
                effective_base,
                pension,
                percent(config.pension_rate),
                effective_base
            ),
        ),
        ContributionPolicy::Excluded => (
            Decimal::ZERO,
            Decimal::ZERO,
            "Contribution policy is 'excluded': nothing withheld".to_string(),
        ),
    };

    ContributionResult {
        health: withheld_health,
        pension: withheld_pension,
        audit_step: AuditStep {
            step_number,
            rule_id: "mandatory_contributions".to_string(),
            rule_name: "Mandatory Contributions".to_string(),
            input: serde_json::json!({
                "effective_base": effective_base.to_string(),
                "health_rate": config.health_rate.to_string(),
                "pension_rate": config.pension_rate.to_string(),
                "policy": match config.contribution_policy {
                    ContributionPolicy::Withheld => "withheld",
                    ContributionPolicy::Excluded => "excluded",
                }
            }),
            output: serde_json::json!({
                "health": withheld_health.to_string(),
                "pension": withheld_pension.to_string()
            }),
            reasoning,
        },
    }
}

/// Formats a fraction as a percentage, e.g. `0.04` as `4%`.
pub fn percent(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_default_withholds_four_percent_each() {
        let result = calculate_contributions(dec("2000000"), &CalculationConfig::default(), 4);

        assert_eq!(result.health, dec("80000"));
        assert_eq!(result.pension, dec("80000"));
        assert_eq!(result.total(), dec("160000"));
        assert_eq!(result.audit_step.input["policy"], "withheld");
    }

    #[test]
    fn test_rounds_half_up_to_whole_units() {
        // 4% of 1,000,012.50 is 40,000.50
        let result = calculate_contributions(dec("1000012.50"), &CalculationConfig::default(), 4);

        assert_eq!(result.health, dec("40001"));
        assert_eq!(result.pension, dec("40001"));
    }

    #[test]
    fn test_rounds_to_configured_scale() {
        let config = CalculationConfig {
            currency_scale: 2,
            ..CalculationConfig::default()
        };

        let result = calculate_contributions(dec("1234.5678"), &config, 4);
        assert_eq!(result.health, dec("49.38"));
    }

    #[test]
    fn test_excluded_policy_withholds_nothing() {
        let config = CalculationConfig {
            contribution_policy: ContributionPolicy::Excluded,
            ..CalculationConfig::default()
        };

        let result = calculate_contributions(dec("2000000"), &config, 4);
        assert_eq!(result.total(), Decimal::ZERO);
        assert_eq!(result.audit_step.input["policy"], "excluded");
    }

    #[test]
    fn test_zero_base_has_zero_contributions() {
        let result = calculate_contributions(Decimal::ZERO, &CalculationConfig::default(), 4);
        assert_eq!(result.total(), Decimal::ZERO);
    }

    #[test]
    fn test_percent_formatting() {
        assert_eq!(percent(dec("0.04")), "4%");
        assert_eq!(percent(dec("0.125")), "12.5%");
    }
}
