//! Version folder converter
//!
//! Converts the XMI files of a version folder into one JSON Schema per UML
//! class plus one OpenAPI document referencing them.
//!
//! A folder is processed in three stages:
//! 1. decode, validate and extract every file (in parallel unless disabled),
//! 2. allocate schema file names in file order, then class order,
//! 3. write the schemas, then the OpenAPI document.

use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::ConvertError;
use super::naming::NameAllocator;
use super::report::{ConversionReport, FileRecord, FileStatus, FolderReport};
use crate::config::ConverterConfig;
use crate::export::json_schema::{GeneratedSchema, JSONSchemaExporter};
use crate::export::openapi::OpenAPIExporter;
use crate::import::{SourceEncoding, XMIImporter, decode_xmi_bytes};
use crate::models::{SchemaReference, UmlClass};
use crate::validation::input::{validate_version_identifier, validate_xmi_file_size};

/// Directory names picked up when converting all version folders
pub const VERSION_FOLDER_PATTERN: &str = r"^[vV]\d+(\.\d+)*$";

static RE_VERSION_FOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(VERSION_FOLDER_PATTERN).expect("Invalid regex"));

/// Result of the first stage for one file
struct StagedFile {
    record: FileRecord,
    classes: Vec<UmlClass>,
}

/// Converter for version folders below a project root.
///
/// # Example
///
/// ```rust,no_run
/// use xmi_schema::config::ConverterConfig;
/// use xmi_schema::convert::Converter;
///
/// let converter = Converter::new("/path/to/project", ConverterConfig::default());
/// let report = converter.convert(Some("v2.1.0")).unwrap();
/// println!("{} schemas, {} errors", report.total_schemas(), report.error_count());
/// ```
#[derive(Debug)]
pub struct Converter {
    root: PathBuf,
    config: ConverterConfig,
    importer: XMIImporter,
}

impl Converter {
    pub fn new(root: impl Into<PathBuf>, config: ConverterConfig) -> Self {
        Self {
            root: root.into(),
            config,
            importer: XMIImporter::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Subdirectories of the root whose names look like `v1`, `v2.1.0`, ...,
    /// sorted by name.
    pub fn version_folders(&self) -> Result<Vec<PathBuf>, ConvertError> {
        if !self.root.is_dir() {
            return Err(ConvertError::FolderNotFound(self.root.clone()));
        }
        let entries = fs::read_dir(&self.root).map_err(|e| ConvertError::io(&self.root, e))?;

        let mut folders: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| RE_VERSION_FOLDER.is_match(n))
            })
            .collect();
        folders.sort();
        Ok(folders)
    }

    /// Convert one version folder (by name, relative to the root) or, with
    /// `None`, every version folder below the root.
    ///
    /// Only a missing folder or an unusable version identifier fails the whole
    /// run. Everything else, including folder-level fatal errors, ends up in
    /// the returned report.
    pub fn convert(&self, version: Option<&str>) -> Result<ConversionReport, ConvertError> {
        let deadline = self.config.timeout().map(|timeout| Instant::now() + timeout);
        let mut report = ConversionReport::new(&self.root);

        let folders = match version {
            Some(version) => {
                validate_version_identifier(version)?;
                let folder = self.root.join(version);
                if !folder.is_dir() {
                    return Err(ConvertError::FolderNotFound(folder));
                }
                vec![folder]
            }
            None => {
                let folders = self.version_folders()?;
                if folders.is_empty() {
                    warn!("No version folders found in {}", self.root.display());
                }
                folders
            }
        };

        for folder in folders {
            report.folders.push(self.convert_folder_until(&folder, deadline));
        }

        report.finished_at = chrono::Utc::now();
        info!(
            "Conversion finished: {} folders, {} schemas, {} errors",
            report.folders.len(),
            report.total_schemas(),
            report.error_count()
        );
        Ok(report)
    }

    /// Convert a single folder at any path, with its own deadline.
    pub fn convert_folder(&self, folder: &Path) -> FolderReport {
        let deadline = self.config.timeout().map(|timeout| Instant::now() + timeout);
        self.convert_folder_until(folder, deadline)
    }

    fn convert_folder_until(&self, folder: &Path, deadline: Option<Instant>) -> FolderReport {
        info!("Converting version folder {}", folder.display());
        let mut report = FolderReport::new(folder);

        let files = match self.eligible_files(folder) {
            Ok(files) => files,
            Err(e) => {
                error!("{}", e);
                return report.fail(e);
            }
        };

        let staged: Vec<StagedFile> = if self.config.run.parallel {
            files
                .par_iter()
                .map(|path| self.stage_file(path, deadline))
                .collect()
        } else {
            files
                .iter()
                .map(|path| self.stage_file(path, deadline))
                .collect()
        };

        let schema_dir = self.config.schema_dir_for(folder);
        if let Err(e) = fs::create_dir_all(&schema_dir) {
            let e = ConvertError::io(&schema_dir, e);
            error!("{}", e);
            return report.fail(e);
        }

        let mut names = NameAllocator::with_reserved([self.config.reserved_stem()]);
        let mut references = Vec::new();

        for StagedFile { mut record, classes } in staged {
            for class in &classes {
                let allocation = names.allocate(&class.name);
                if allocation.collided() {
                    info!(
                        "Class '{}' in {} collides on '{}', writing {}",
                        class.name,
                        record.file,
                        allocation.base,
                        allocation.file_name()
                    );
                    record.warnings.push(format!(
                        "class '{}' written as {} (name collision on {}.json)",
                        class.name,
                        allocation.file_name(),
                        allocation.base
                    ));
                }

                let schema = JSONSchemaExporter::generate_with_stem(class, &allocation.stem);
                match self.write_schema(&schema_dir, &schema) {
                    Ok(true) => {
                        references.push(SchemaReference::new(
                            schema.class_name.clone(),
                            schema.file_name.clone(),
                        ));
                        record.schemas.push(schema.file_name);
                    }
                    Ok(false) => record
                        .errors
                        .push(format!("class '{}': schema could not be serialized", class.name)),
                    Err(e) => {
                        error!("{}", e);
                        report.push(record);
                        return report.fail(e);
                    }
                }
            }
            report.push(record);
        }

        let openapi_path = schema_dir.join(self.config.openapi_file_name());
        let folder_name = folder
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        if let Err(e) = self.write_openapi(&openapi_path, folder_name, &references) {
            error!("{}", e);
            return report.fail(e);
        }
        report.openapi = Some(openapi_path);

        info!(
            "Folder {}: {} files converted, {} skipped, {} schemas",
            folder.display(),
            report.processed,
            report.skipped,
            report.schemas
        );
        report.finish()
    }

    /// Regenerate the OpenAPI document of a folder from the schema files
    /// already in its schema directory.
    pub fn regenerate_openapi(&self, folder: &Path) -> Result<PathBuf, ConvertError> {
        let schema_dir = self.config.schema_dir_for(folder);
        if !schema_dir.is_dir() {
            return Err(ConvertError::FolderNotFound(schema_dir));
        }
        let openapi_file = self.config.openapi_file_name();
        let references = OpenAPIExporter::references_from_schema_dir(&schema_dir, &openapi_file)?;
        if references.is_empty() {
            warn!("No schemas found in {}", schema_dir.display());
        }

        let openapi_path = schema_dir.join(openapi_file);
        let folder_name = folder
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        self.write_openapi(&openapi_path, folder_name, &references)?;
        Ok(openapi_path)
    }

    /// Input files directly inside the folder, sorted by file name
    fn eligible_files(&self, folder: &Path) -> Result<Vec<PathBuf>, ConvertError> {
        if !folder.is_dir() {
            return Err(ConvertError::FolderNotFound(folder.to_path_buf()));
        }
        let entries = fs::read_dir(folder).map_err(|e| ConvertError::io(folder, e))?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && self.config.is_eligible(path))
            .collect();
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        if files.is_empty() {
            return Err(ConvertError::NoEligibleFiles(folder.to_path_buf()));
        }
        debug!("{} input files in {}", files.len(), folder.display());
        Ok(files)
    }

    fn stage_file(&self, path: &Path, deadline: Option<Instant>) -> StagedFile {
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let skip = |status: FileStatus, reason: String| {
            warn!("Skipping {}: {}", path.display(), reason);
            StagedFile {
                record: FileRecord::skipped(file.clone(), status, reason),
                classes: Vec::new(),
            }
        };

        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return skip(
                FileStatus::SkippedTimeout,
                "run timeout reached before the file was started".to_string(),
            );
        }

        let size = match fs::metadata(path) {
            Ok(metadata) => metadata.len(),
            Err(e) => return skip(FileStatus::SkippedInvalid, format!("cannot read file: {}", e)),
        };
        if let Err(e) = validate_xmi_file_size(size) {
            return skip(FileStatus::SkippedInvalid, e.to_string());
        }

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => return skip(FileStatus::SkippedInvalid, format!("cannot read file: {}", e)),
        };
        let decoded = decode_xmi_bytes(&bytes);

        let result = match self.importer.import(&decoded.text) {
            Ok(result) => result,
            Err(e) if e.is_malformed() => return skip(FileStatus::SkippedMalformed, e.to_string()),
            Err(e) => return skip(FileStatus::SkippedInvalid, e.to_string()),
        };

        let mut record = FileRecord::new(file.clone(), FileStatus::Converted);
        record.encoding = Some(decoded.encoding);
        if decoded.encoding == SourceEncoding::Windows1252 {
            warn!("{} is not valid UTF-8, decoded as Windows-1252", path.display());
            record
                .warnings
                .push("not valid UTF-8, decoded as Windows-1252".to_string());
        }
        record.classes = result.classes.len();
        record.warnings.extend(result.warnings);

        let classes = result
            .classes
            .into_iter()
            .map(|mut class| {
                class.source_file = Some(file.clone());
                class
            })
            .collect::<Vec<_>>();

        info!("Extracted {} classes from {}", classes.len(), path.display());
        StagedFile { record, classes }
    }

    /// Write one schema. `Ok(false)` when the document cannot be serialized.
    fn write_schema(&self, schema_dir: &Path, schema: &GeneratedSchema) -> Result<bool, ConvertError> {
        let content = match schema.to_json_string() {
            Ok(content) => content,
            Err(e) => {
                warn!("Cannot serialize schema for '{}': {}", schema.class_name, e);
                return Ok(false);
            }
        };
        let path = schema_dir.join(&schema.file_name);
        fs::write(&path, content).map_err(|e| ConvertError::io(&path, e))?;
        debug!("Saved schema '{}' to {}", schema.class_name, path.display());
        Ok(true)
    }

    fn write_openapi(
        &self,
        path: &Path,
        folder_name: &str,
        references: &[SchemaReference],
    ) -> Result<(), ConvertError> {
        let exporter = self.config.openapi_exporter();
        let document = exporter.assemble(&self.config.openapi_info(folder_name), references);
        let content = exporter.render(&document, self.config.output.openapi_format)?;
        fs::write(path, content).map_err(|e| ConvertError::io(path, e))?;
        info!(
            "Saved OpenAPI document with {} schema references to {}",
            references.len(),
            path.display()
        );
        Ok(())
    }
}
