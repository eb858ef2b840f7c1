//! Version folder conversion
//!
//! Drives XMI files of one or more version folders through validation,
//! extraction and schema generation, then assembles the folder's OpenAPI
//! document.

pub mod converter;
pub mod naming;
pub mod report;

use std::path::PathBuf;

use crate::export::ExportError;
use crate::validation::input::ValidationError;

/// Error that stops a folder or a whole run
#[derive(Debug, Clone, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum ConvertError {
    /// The targeted folder (or the root) does not exist; fatal for the run
    #[error("Folder not found: {0}")]
    FolderNotFound(PathBuf),
    /// The version identifier cannot name a folder; fatal for the run
    #[error("Invalid version folder: {0}")]
    InvalidVersion(String),
    /// No `.xml`/`.xmi` files in the folder; fatal for the folder
    #[error("No eligible XMI files in {0}")]
    NoEligibleFiles(PathBuf),
    /// Output could not be written; fatal for the folder
    #[error("IO error on {path}: {message}")]
    Io { path: PathBuf, message: String },
    /// The OpenAPI document could not be rendered; fatal for the folder
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

impl From<ValidationError> for ConvertError {
    fn from(error: ValidationError) -> Self {
        ConvertError::InvalidVersion(error.to_string())
    }
}

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            message: error.to_string(),
        }
    }
}

pub use converter::{Converter, VERSION_FOLDER_PATTERN};
pub use naming::{Allocation, NameAllocator};
pub use report::{ConversionReport, FileError, FileRecord, FileStatus, FolderReport};
