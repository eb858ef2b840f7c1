//! OpenAPI exporter
//!
//! Assembles one OpenAPI document per version folder whose
//! `components.schemas` section references the generated JSON Schema files.
//! Schemas are never inlined.

use crate::export::ExportError;
use crate::models::openapi::{OpenAPIFormat, OpenApiInfo, SchemaReference};
use serde_json::{Map, Value as JsonValue, json};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// OpenAPI version written when none is configured
pub const DEFAULT_OPENAPI_VERSION: &str = "3.0.0";

/// Prefix of every `$ref`, relative to the OpenAPI document's consumers
pub const DEFAULT_REF_PREFIX: &str = "schemas/";

/// File name of the OpenAPI document inside the schema directory
pub const DEFAULT_OPENAPI_FILE: &str = "openapi.json";

/// OpenAPI Exporter
#[derive(Debug, Clone)]
pub struct OpenAPIExporter {
    openapi_version: String,
    ref_prefix: String,
}

impl Default for OpenAPIExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenAPIExporter {
    /// Create a new OpenAPIExporter
    pub fn new() -> Self {
        Self {
            openapi_version: DEFAULT_OPENAPI_VERSION.to_string(),
            ref_prefix: DEFAULT_REF_PREFIX.to_string(),
        }
    }

    pub fn with_openapi_version(mut self, version: impl Into<String>) -> Self {
        self.openapi_version = version.into();
        self
    }

    pub fn with_ref_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.ref_prefix = prefix.into();
        self
    }

    /// Assemble the OpenAPI document.
    ///
    /// Every reference yields exactly one entry in `components.schemas`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use xmi_schema::export::openapi::OpenAPIExporter;
    /// use xmi_schema::models::openapi::{OpenApiInfo, SchemaReference};
    ///
    /// let document = OpenAPIExporter::new().assemble(
    ///     &OpenApiInfo::for_version_folder("v2.1", "GGM"),
    ///     &[SchemaReference::new("Person", "person.json")],
    /// );
    /// assert_eq!(document["components"]["schemas"]["Person"]["$ref"], "schemas/person.json");
    /// assert_eq!(document["info"]["version"], "2.1");
    /// ```
    pub fn assemble(&self, info: &OpenApiInfo, references: &[SchemaReference]) -> JsonValue {
        let mut schemas = Map::new();
        for (key, reference) in Self::component_keys(references)
            .into_iter()
            .zip(references)
        {
            schemas.insert(
                key,
                json!({ "$ref": format!("{}{}", self.ref_prefix, reference.file_name) }),
            );
        }

        json!({
            "openapi": self.openapi_version,
            "info": info,
            "paths": {},
            "components": { "schemas": schemas },
        })
    }

    /// Component keys for a list of references, in the same order.
    ///
    /// The key is the original class name; an empty name falls back to the
    /// file stem and a name already taken gets `_2`, `_3`, ... appended.
    pub fn component_keys(references: &[SchemaReference]) -> Vec<String> {
        let mut used = HashSet::new();
        references
            .iter()
            .map(|reference| {
                let base = if reference.name.trim().is_empty() {
                    reference.stem().to_string()
                } else {
                    reference.name.clone()
                };
                let mut key = base.clone();
                let mut n = 2;
                while used.contains(&key) {
                    key = format!("{}_{}", base, n);
                    n += 1;
                }
                if key != base {
                    debug!("Component key '{}' already used, keyed as '{}'", base, key);
                }
                used.insert(key.clone());
                key
            })
            .collect()
    }

    /// Serialize an assembled document. JSON output ends with a newline.
    pub fn render(&self, document: &JsonValue, format: OpenAPIFormat) -> Result<String, ExportError> {
        match format {
            OpenAPIFormat::Yaml => serde_yaml::to_string(document).map_err(|e| {
                ExportError::SerializationError(format!("Failed to serialize to YAML: {}", e))
            }),
            OpenAPIFormat::Json => serde_json::to_string_pretty(document)
                .map(|mut content| {
                    content.push('\n');
                    content
                })
                .map_err(|e| {
                    ExportError::SerializationError(format!("Failed to serialize to JSON: {}", e))
                }),
        }
    }

    /// Collect references from an existing schema directory.
    ///
    /// Reads every `*.json` file except `openapi_file`, sorted by file name.
    /// Each schema is keyed by its `title`, falling back to the file stem.
    /// Files that are not valid JSON are skipped with a warning.
    pub fn references_from_schema_dir(
        schema_dir: &Path,
        openapi_file: &str,
    ) -> Result<Vec<SchemaReference>, ExportError> {
        let entries = fs::read_dir(schema_dir).map_err(|e| {
            ExportError::IoError(format!("Failed to read {}: {}", schema_dir.display(), e))
        })?;

        let mut file_names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|name| name.ends_with(".json") && name != openapi_file)
            .collect();
        file_names.sort();

        let mut references = Vec::with_capacity(file_names.len());
        for file_name in file_names {
            let path = schema_dir.join(&file_name);
            let content = fs::read_to_string(&path).map_err(|e| {
                ExportError::IoError(format!("Failed to read {}: {}", path.display(), e))
            })?;
            let schema: JsonValue = match serde_json::from_str(&content) {
                Ok(schema) => schema,
                Err(e) => {
                    warn!("Skipping schema {}: {}", path.display(), e);
                    continue;
                }
            };
            let name = schema
                .get("title")
                .and_then(JsonValue::as_str)
                .unwrap_or_default()
                .to_string();
            references.push(SchemaReference::new(name, file_name));
        }
        Ok(references)
    }

    /// Number of `$ref` entries under `components.schemas`
    pub fn reference_count(document: &JsonValue) -> usize {
        document
            .pointer("/components/schemas")
            .and_then(JsonValue::as_object)
            .map(|schemas| schemas.values().filter(|s| s.get("$ref").is_some()).count())
            .unwrap_or(0)
    }
}
