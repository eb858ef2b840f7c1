//! CLI command implementations

pub mod convert;
pub mod openapi;
pub mod sanitize;
pub mod validate;

use crate::cli::error::CliError;
use crate::config::ConverterConfig;
use std::path::Path;

/// Load `.xmi-schema.toml` from the project root (defaults when absent)
pub fn load_config(root: &Path) -> Result<ConverterConfig, CliError> {
    ConverterConfig::load(root).map_err(|e| CliError::ConfigError(format!("{:#}", e)))
}
