//! Converter configuration file support
//!
//! Handles parsing of `.xmi-schema.toml` configuration files and
//! environment variable overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::export::openapi::{
    DEFAULT_OPENAPI_FILE, DEFAULT_OPENAPI_VERSION, DEFAULT_REF_PREFIX, OpenAPIExporter,
};
use crate::models::openapi::{OpenAPIFormat, OpenApiInfo};

/// Default configuration filename
pub const CONFIG_FILENAME: &str = ".xmi-schema.toml";

/// Default name of the schema directory inside a version folder
pub const DEFAULT_SCHEMA_DIR: &str = "schemas";

/// Environment variable for the schema directory
pub const ENV_OUTPUT_DIR: &str = "XMI_SCHEMA_OUTPUT_DIR";

/// Environment variable for the per-run timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "XMI_SCHEMA_TIMEOUT_SECS";

/// Environment variable toggling parallel file processing
pub const ENV_PARALLEL: &str = "XMI_SCHEMA_PARALLEL";

/// Output configuration section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSection {
    /// Schema directory, relative to the version folder (or absolute)
    #[serde(default = "default_schema_dir")]
    pub schema_dir: String,

    /// OpenAPI document file name inside the schema directory
    #[serde(default = "default_openapi_file")]
    pub openapi_file: String,

    /// Prefix put in front of schema file names in `$ref` values
    #[serde(default = "default_ref_prefix")]
    pub ref_prefix: String,

    /// OpenAPI output format
    #[serde(default)]
    pub openapi_format: OpenAPIFormat,
}

fn default_schema_dir() -> String {
    DEFAULT_SCHEMA_DIR.to_string()
}

fn default_openapi_file() -> String {
    DEFAULT_OPENAPI_FILE.to_string()
}

fn default_ref_prefix() -> String {
    DEFAULT_REF_PREFIX.to_string()
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            schema_dir: default_schema_dir(),
            openapi_file: default_openapi_file(),
            ref_prefix: default_ref_prefix(),
            openapi_format: OpenAPIFormat::default(),
        }
    }
}

/// OpenAPI document configuration section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenApiSection {
    /// `info.title`
    #[serde(default = "default_title")]
    pub title: String,

    /// `info.description`
    #[serde(default = "default_description")]
    pub description: Option<String>,

    /// Value of the top-level `openapi` key
    #[serde(default = "default_version_spec")]
    pub version_spec: String,
}

fn default_title() -> String {
    "Gemeentelijk Gegevensmodel API".to_string()
}

fn default_description() -> Option<String> {
    Some("Generated from UML models".to_string())
}

fn default_version_spec() -> String {
    DEFAULT_OPENAPI_VERSION.to_string()
}

impl Default for OpenApiSection {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: default_description(),
            version_spec: default_version_spec(),
        }
    }
}

/// Run configuration section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSection {
    /// Process the files of a folder in parallel
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Per-run timeout in seconds (no timeout when absent)
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// File extensions (without dot) treated as XMI input
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_parallel() -> bool {
    true
}

fn default_extensions() -> Vec<String> {
    vec!["xml".to_string(), "xmi".to_string()]
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            timeout_secs: None,
            extensions: default_extensions(),
        }
    }
}

/// Main configuration structure
///
/// Represents the `.xmi-schema.toml` configuration file format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    #[serde(default)]
    pub output: OutputSection,

    #[serde(default)]
    pub openapi: OpenApiSection,

    #[serde(default)]
    pub run: RunSection,
}

impl ConverterConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a project root
    ///
    /// Looks for `.xmi-schema.toml` in the root directory and falls back to
    /// defaults if not found. Environment overrides are applied last.
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config {}", config_path.display()))?;
            Self::parse(&content)
                .with_context(|| format!("Invalid config {}", config_path.display()))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Save configuration to a project root
    pub fn save(&self, root: &Path) -> Result<()> {
        let config_path = root.join(CONFIG_FILENAME);
        std::fs::write(&config_path, self.to_toml()?)
            .with_context(|| format!("Failed to write config {}", config_path.display()))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup (the environment in production)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(ENV_OUTPUT_DIR).filter(|d| !d.trim().is_empty()) {
            self.output.schema_dir = dir;
        }

        if let Some(secs) = lookup(ENV_TIMEOUT_SECS)
            && let Ok(secs) = secs.trim().parse()
        {
            self.run.timeout_secs = Some(secs);
        }

        if let Some(parallel) = lookup(ENV_PARALLEL) {
            match parallel.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.run.parallel = true,
                "0" | "false" | "no" | "off" => self.run.parallel = false,
                _ => {}
            }
        }
    }

    /// Schema directory for a version folder
    pub fn schema_dir_for(&self, folder: &Path) -> PathBuf {
        let dir = Path::new(&self.output.schema_dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            folder.join(dir)
        }
    }

    /// OpenAPI file name with the extension matching the configured format
    pub fn openapi_file_name(&self) -> String {
        let file = Path::new(&self.output.openapi_file);
        let stem = file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("openapi");
        format!("{}.{}", stem, self.output.openapi_format.extension())
    }

    /// Stem of the OpenAPI file, which no schema may use
    pub fn reserved_stem(&self) -> String {
        let name = self.openapi_file_name();
        name.rsplit_once('.')
            .map(|(stem, _)| stem.to_string())
            .unwrap_or(name)
    }

    /// Whether a path has one of the configured input extensions
    pub fn is_eligible(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.run
                    .extensions
                    .iter()
                    .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.run.timeout_secs.map(Duration::from_secs)
    }

    /// OpenAPI exporter configured from the `[output]` and `[openapi]` sections
    pub fn openapi_exporter(&self) -> OpenAPIExporter {
        OpenAPIExporter::new()
            .with_openapi_version(&self.openapi.version_spec)
            .with_ref_prefix(&self.output.ref_prefix)
    }

    /// `info` block for a version folder
    pub fn openapi_info(&self, folder_name: &str) -> OpenApiInfo {
        let info = OpenApiInfo::for_version_folder(folder_name, &self.openapi.title);
        match &self.openapi.description {
            Some(description) => info.with_description(description),
            None => info,
        }
    }
}

/// Generate a sample configuration file content
pub fn sample_config() -> &'static str {
    r#"# XMI schema converter configuration

[output]
# Schema directory, relative to each version folder (or absolute)
schema_dir = "schemas"

# OpenAPI document written next to the schemas
openapi_file = "openapi.json"

# Prefix of every $ref in components.schemas
ref_prefix = "schemas/"

# OpenAPI output format: "json" (default) or "yaml"
openapi_format = "json"

[openapi]
title = "Gemeentelijk Gegevensmodel API"
description = "Generated from UML models"
version_spec = "3.0.0"

[run]
# Process the files of a version folder in parallel
parallel = true

# Stop starting new files after this many seconds
# timeout_secs = 300

# Input file extensions
extensions = ["xml", "xmi"]
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = ConverterConfig::new();
        assert_eq!(config.output.schema_dir, DEFAULT_SCHEMA_DIR);
        assert_eq!(config.output.openapi_format, OpenAPIFormat::Json);
        assert_eq!(config.openapi.version_spec, "3.0.0");
        assert!(config.run.parallel);
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[output]
openapi_format = "yaml"

[run]
parallel = false
timeout_secs = 30
"#;
        let config = ConverterConfig::parse(toml).unwrap();
        assert_eq!(config.output.openapi_format, OpenAPIFormat::Yaml);
        assert_eq!(config.output.ref_prefix, DEFAULT_REF_PREFIX);
        assert!(!config.run.parallel);
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.openapi_file_name(), "openapi.yaml");
        assert_eq!(config.reserved_stem(), "openapi");
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(ConverterConfig::parse("[run]\nparallel = \"sometimes\"").is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_OUTPUT_DIR, "/tmp/out"),
            (ENV_TIMEOUT_SECS, "12"),
            (ENV_PARALLEL, "off"),
        ]);
        let mut config = ConverterConfig::new();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.output.schema_dir, "/tmp/out");
        assert_eq!(config.run.timeout_secs, Some(12));
        assert!(!config.run.parallel);
        assert_eq!(
            config.schema_dir_for(Path::new("/data/v1")),
            PathBuf::from("/tmp/out")
        );
    }

    #[test]
    fn test_unparseable_overrides_are_ignored() {
        let mut config = ConverterConfig::new();
        config.apply_overrides(|key| match key {
            ENV_TIMEOUT_SECS => Some("soon".to_string()),
            ENV_PARALLEL => Some("maybe".to_string()),
            _ => None,
        });
        assert_eq!(config.run.timeout_secs, None);
        assert!(config.run.parallel);
    }

    #[test]
    fn test_is_eligible() {
        let config = ConverterConfig::new();
        assert!(config.is_eligible(Path::new("model.xml")));
        assert!(config.is_eligible(Path::new("Model.XMI")));
        assert!(!config.is_eligible(Path::new("notes.txt")));
        assert!(!config.is_eligible(Path::new("README")));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let mut config = ConverterConfig::new();
        config.output.ref_prefix = "./".to_string();

        config.save(dir.path()).unwrap();
        assert!(dir.path().join(CONFIG_FILENAME).exists());

        let mut loaded = ConverterConfig::parse(
            &std::fs::read_to_string(dir.path().join(CONFIG_FILENAME)).unwrap(),
        )
        .unwrap();
        loaded.apply_overrides(|_| None);
        assert_eq!(loaded.output.ref_prefix, "./");
    }

    #[test]
    fn test_sample_config_is_valid() {
        let config = ConverterConfig::parse(sample_config()).unwrap();
        assert_eq!(config, ConverterConfig::default());
    }
}
