//! XMI Schema Converter - UML class models to JSON Schema and OpenAPI
//!
//! Reads XMI 2.1 exports of UML class models (as written by Enterprise
//! Architect and similar tools) and produces, per version folder:
//! - one JSON Schema (draft-07) document per UML class
//! - one OpenAPI document whose `components.schemas` reference those files
//!
//! Provides unified interfaces for:
//! - XMI validation and UML class extraction
//! - JSON Schema and OpenAPI export
//! - Version folder conversion with per-file reports
//! - Configuration (`.xmi-schema.toml` plus environment overrides)

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod convert;
pub mod export;
pub mod import;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::ConverterConfig;
pub use convert::{
    ConversionReport, ConvertError, Converter, FileRecord, FileStatus, FolderReport,
};
pub use export::{
    ExportError, ExportResult, GeneratedSchema, JSONSchemaExporter, OpenAPIExporter, map_uml_type,
};
pub use import::{ImportError, ImportResult, XMIImporter};
pub use models::{OpenAPIFormat, TypeRef, UmlAttribute, UmlClass};
pub use validation::{XmiValidation, XmiValidationError, sanitize_class_name, validate_xmi};
