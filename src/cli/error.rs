//! CLI-specific error types

use crate::convert::ConvertError;
use crate::export::ExportError;
use crate::import::ImportError;
use std::path::PathBuf;
use thiserror::Error;

/// CLI-specific error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read file {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("XMI validation failed: {0}")]
    ValidationError(String),

    #[error("Import error: {0}")]
    ImportError(#[from] ImportError),

    #[error("Export error: {0}")]
    ExportError(#[from] ExportError),

    #[error("Conversion error: {0}")]
    ConvertError(#[from] ConvertError),

    #[error("Conversion finished with {0} error(s)")]
    ConversionFailed(usize),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
