//! Import functionality
//!
//! Provides the XMI importer that turns UML class models into
//! [`UmlClass`](crate::models::UmlClass) values, plus the byte decoding used
//! for files exported by modelling tools.

pub mod encoding;
pub mod xmi;

use crate::models::UmlClass;
use crate::validation::xmi::XmiValidationError;

/// Result of an import operation.
///
/// Contains extracted classes and any warnings from the import process.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[must_use = "import results should be processed or warnings checked"]
pub struct ImportResult {
    /// Classes in document order
    pub classes: Vec<UmlClass>,
    /// Skipped sub-elements and unresolved references
    pub warnings: Vec<String>,
}

/// Error during import
#[derive(Debug, Clone, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum ImportError {
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("XMI validation error: {0}")]
    XMIValidationError(#[from] XmiValidationError),
}

impl ImportError {
    /// Whether the document could not be read as XML at all
    pub fn is_malformed(&self) -> bool {
        match self {
            ImportError::ParseError(_) => true,
            ImportError::XMIValidationError(e) => e.is_malformed(),
        }
    }
}

pub use encoding::{DecodedText, SourceEncoding, decode_xmi_bytes};
pub use xmi::XMIImporter;
