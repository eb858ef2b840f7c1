//! OpenAPI model structures
//!
//! Inputs of the OpenAPI assembler: document metadata, the schema files to
//! reference, and the output format.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// OpenAPI format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenAPIFormat {
    /// JSON format
    #[default]
    Json,
    /// YAML format
    Yaml,
}

impl OpenAPIFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            OpenAPIFormat::Json => "json",
            OpenAPIFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for OpenAPIFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OpenAPIFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OpenAPIFormat::Json),
            "yaml" | "yml" => Ok(OpenAPIFormat::Yaml),
            other => Err(format!("unknown OpenAPI format '{}' (expected json or yaml)", other)),
        }
    }
}

/// `info` block of a generated OpenAPI document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenApiInfo {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OpenApiInfo {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: None,
        }
    }

    /// Info for a version folder: `v2.1` becomes version `2.1`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use xmi_schema::models::openapi::OpenApiInfo;
    ///
    /// let info = OpenApiInfo::for_version_folder("v2.1", "Gemeentelijk Gegevensmodel API");
    /// assert_eq!(info.version, "2.1");
    /// assert_eq!(info.title, "Gemeentelijk Gegevensmodel API");
    /// ```
    pub fn for_version_folder(folder_name: &str, title: &str) -> Self {
        let version = folder_name
            .strip_prefix(['v', 'V'])
            .filter(|rest| !rest.is_empty())
            .unwrap_or(folder_name);
        Self::new(title, version)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One generated schema file the OpenAPI document points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaReference {
    /// Original class name, used as the component key
    pub name: String,
    /// File name of the schema, relative to the schema directory
    pub file_name: String,
}

impl SchemaReference {
    pub fn new(name: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_name: file_name.into(),
        }
    }

    /// File name without the `.json` extension
    pub fn stem(&self) -> &str {
        self.file_name
            .strip_suffix(".json")
            .unwrap_or(&self.file_name)
    }
}
