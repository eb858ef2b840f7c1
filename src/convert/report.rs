//! Conversion reports
//!
//! Every input file gets a [`FileRecord`]; every version folder a
//! [`FolderReport`]; a run a [`ConversionReport`]. Reports serialize to JSON
//! for the CLI's `--json` output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::ConvertError;
use crate::import::SourceEncoding;

/// What happened to one input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileStatus {
    /// Validated and extracted; its classes were turned into schemas
    Converted,
    /// Well-formed XML that is not an XMI UML model, or an unreadable file
    SkippedInvalid,
    /// Not well-formed XML
    SkippedMalformed,
    /// Not started before the run deadline
    SkippedTimeout,
}

impl FileStatus {
    pub fn is_skipped(&self) -> bool {
        !matches!(self, FileStatus::Converted)
    }
}

/// Outcome for one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// File name within the version folder
    pub file: String,
    pub status: FileStatus,
    /// Why the file was skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<SourceEncoding>,
    /// Number of classes extracted
    pub classes: usize,
    /// Schema files written for this file's classes
    pub schemas: Vec<String>,
    /// Per-class failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl FileRecord {
    pub fn new(file: impl Into<String>, status: FileStatus) -> Self {
        Self {
            file: file.into(),
            status,
            reason: None,
            encoding: None,
            classes: 0,
            schemas: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn skipped(file: impl Into<String>, status: FileStatus, reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::new(file, status)
        }
    }
}

/// One entry of [`FolderReport::errors`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileError {
    pub file: String,
    pub reason: String,
}

/// Outcome for one version folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderReport {
    pub folder: PathBuf,
    /// Files converted
    pub processed: usize,
    /// Files skipped (invalid, malformed or timed out)
    pub skipped: usize,
    /// Skipped files and per-class failures
    pub errors: Vec<FileError>,
    /// Schema files written
    pub schemas: usize,
    pub files: Vec<FileRecord>,
    /// OpenAPI document written for the folder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openapi: Option<PathBuf>,
    /// Error that stopped the folder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fatal: Option<ConvertError>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl FolderReport {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        let now = Utc::now();
        Self {
            folder: folder.into(),
            processed: 0,
            skipped: 0,
            errors: Vec::new(),
            schemas: 0,
            files: Vec::new(),
            openapi: None,
            fatal: None,
            started_at: now,
            finished_at: now,
        }
    }

    /// Add a file record and update the counters.
    pub fn push(&mut self, record: FileRecord) {
        if record.status.is_skipped() {
            self.skipped += 1;
            self.errors.push(FileError {
                file: record.file.clone(),
                reason: record
                    .reason
                    .clone()
                    .unwrap_or_else(|| "skipped".to_string()),
            });
        } else {
            self.processed += 1;
        }
        for error in &record.errors {
            self.errors.push(FileError {
                file: record.file.clone(),
                reason: error.clone(),
            });
        }
        self.schemas += record.schemas.len();
        self.files.push(record);
    }

    pub(crate) fn fail(mut self, error: ConvertError) -> Self {
        self.fatal = Some(error);
        self.finish()
    }

    pub(crate) fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal.is_some()
    }

    pub fn record(&self, file: &str) -> Option<&FileRecord> {
        self.files.iter().find(|r| r.file == file)
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    pub root: PathBuf,
    pub folders: Vec<FolderReport>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ConversionReport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let now = Utc::now();
        Self {
            root: root.into(),
            folders: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    /// File-level errors plus one per fatal folder
    pub fn error_count(&self) -> usize {
        self.folders
            .iter()
            .map(|f| f.errors.len() + usize::from(f.is_fatal()))
            .sum()
    }

    pub fn has_fatal(&self) -> bool {
        self.folders.iter().any(FolderReport::is_fatal)
    }

    pub fn total_schemas(&self) -> usize {
        self.folders.iter().map(|f| f.schemas).sum()
    }

    pub fn total_processed(&self) -> usize {
        self.folders.iter().map(|f| f.processed).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.folders.iter().map(|f| f.skipped).sum()
    }
}
