//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from `engine.yaml`. Every section has defaults, so a
//! partial file only overrides what it names.

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Whether mandatory contributions are withheld from net salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionPolicy {
    /// Health and pension are part of total deductions.
    #[default]
    Withheld,
    /// Total deductions contain novelty deductions only.
    Excluded,
}

/// Settings that drive the payroll calculator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CalculationConfig {
    /// Whether contributions reduce net salary.
    pub contribution_policy: ContributionPolicy,
    /// Health contribution as a fraction of the effective base.
    pub health_rate: Decimal,
    /// Pension contribution as a fraction of the effective base.
    pub pension_rate: Decimal,
    /// Decimal places computed amounts are rounded to.
    pub currency_scale: u32,
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            contribution_policy: ContributionPolicy::Withheld,
            health_rate: Decimal::new(4, 2),
            pension_rate: Decimal::new(4, 2),
            currency_scale: 0,
        }
    }
}

impl CalculationConfig {
    /// Checks that both contribution rates are fractions between 0 and 1.
    pub fn validate(&self) -> Result<(), String> {
        for (name, rate) in [
            ("health_rate", self.health_rate),
            ("pension_rate", self.pension_rate),
        ] {
            if rate.is_sign_negative() || rate > Decimal::ONE {
                return Err(format!("calculation.{} must be between 0 and 1, got {}", name, rate));
            }
        }
        Ok(())
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the API listens on.
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

/// The operator reported by the static session source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OperatorConfig {
    /// Operator identifier.
    pub id: String,
    /// Operator email.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Role name.
    #[serde(default)]
    pub role: Option<String>,
}

/// Session cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How long a fetched session stays fresh, in milliseconds.
    pub ttl_ms: u64,
    /// The operator to report; no session when absent.
    pub operator: Option<OperatorConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_ms: 5_000,
            operator: None,
        }
    }
}

/// The complete engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Calculator settings.
    pub calculation: CalculationConfig,
    /// Company name printed on payslips and reports.
    pub company_name: String,
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Session cache settings.
    pub session: SessionConfig,
    /// Optional JSON file of employees and novelties to seed the store with.
    pub seed_file: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            calculation: CalculationConfig::default(),
            company_name: "Company".to_string(),
            server: ServerConfig::default(),
            session: SessionConfig::default(),
            seed_file: None,
        }
    }
}

impl FromStr for EngineConfig {
    type Err = serde_yaml::Error;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        serde_yaml::from_str(content)
    }
}
