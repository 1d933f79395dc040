//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from a directory containing `engine.yaml`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{EngineError, EngineResult};

use super::types::{CalculationConfig, EngineConfig};

/// Name of the configuration file inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "engine.yaml";

/// Loads and provides access to the engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// └── engine.yaml   # Calculation, server, session and seed settings
/// ```
///
/// A relative `seed_file` is resolved against the configuration directory.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config")?;
/// println!("Company: {}", loader.config().company_name);
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if `engine.yaml` is missing or is not valid YAML
    /// for [`EngineConfig`].
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let dir = path.as_ref();
        let file = dir.join(CONFIG_FILE_NAME);
        let path_str = file.display().to_string();

        let content = fs::read_to_string(&file).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let mut config =
            content
                .parse::<EngineConfig>()
                .map_err(|e| EngineError::ConfigParseError {
                    path: path_str.clone(),
                    message: e.to_string(),
                })?;
        config
            .calculation
            .validate()
            .map_err(|message| EngineError::ConfigParseError {
                path: path_str,
                message,
            })?;

        config.seed_file = config.seed_file.map(|seed| resolve(dir, seed));

        Ok(Self { config })
    }

    /// Loads configuration from the directory, or falls back to defaults
    /// when the directory has no `engine.yaml`.
    ///
    /// Parse errors are still reported.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        match Self::load(path) {
            Err(EngineError::ConfigNotFound { path }) => {
                info!(path = %path, "No configuration file found, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the calculator settings.
    pub fn calculation(&self) -> &CalculationConfig {
        &self.config.calculation
    }

    /// Consumes the loader and returns the configuration.
    pub fn into_config(self) -> EngineConfig {
        self.config
    }
}

fn resolve(dir: &Path, seed: PathBuf) -> PathBuf {
    if seed.is_relative() {
        dir.join(seed)
    } else {
        seed
    }
}
