//! Export functionality
//!
//! Provides exporters for:
//! - JSON Schema (one document per UML class)
//! - OpenAPI (one document per version folder, referencing the schemas)

pub mod json_schema;
pub mod openapi;

/// Result of an export operation.
///
/// Contains the exported content and format identifier.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[must_use = "export results contain the exported content and should be used"]
pub struct ExportResult {
    /// Exported content
    pub content: String,
    /// Format identifier
    pub format: String,
}

/// Error during export
#[derive(Debug, Clone, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("IO error: {0}")]
    IoError(String),
}

// Re-export for convenience
pub use json_schema::{GeneratedSchema, JSONSchemaExporter, JsonSchemaType, map_uml_type};
pub use openapi::OpenAPIExporter;
