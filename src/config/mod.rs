//! Configuration loading and management for the payroll engine.
//!
//! This module loads the engine configuration from YAML: the contribution
//! policy and rates used by the calculator, currency rounding, the company
//! name printed on documents, and server and session settings.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config").unwrap();
//! println!("Policy: {:?}", loader.calculation().contribution_policy);
//! ```

mod loader;
mod types;

pub use loader::{CONFIG_FILE_NAME, ConfigLoader};
pub use types::{
    CalculationConfig, ContributionPolicy, EngineConfig, OperatorConfig, ServerConfig,
    SessionConfig,
};
