//! Input validation and sanitization utilities.
//!
//! This module provides functions for validating and sanitizing user input
//! before it reaches the filesystem.
//!
//! # Security
//!
//! Input validation prevents:
//! - Path traversal via malicious version identifiers or class names
//! - Excessively long file names
//! - Unbounded memory use from oversized input documents

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of a sanitized class name (file stem)
pub const MAX_SANITIZED_NAME_LENGTH: usize = 100;

/// Fallback file stem for class names with no usable characters
pub const UNNAMED: &str = "unnamed";

/// Maximum length for version folder identifiers
pub const MAX_VERSION_IDENTIFIER_LENGTH: usize = 255;

/// Maximum file size for XMI documents (50MB)
pub const MAX_XMI_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Errors that can occur during input validation.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ValidationError {
    /// Input is empty when a value is required
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    /// Input exceeds maximum allowed length
    #[error("{field} exceeds maximum length (max: {max}, got: {actual})")]
    TooLong {
        field: &'static str,
        max: u64,
        actual: u64,
    },

    /// Input contains invalid characters
    #[error("{field} contains invalid characters: {reason}")]
    InvalidCharacters { field: &'static str, reason: String },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Sanitize a UML class name into a file stem.
///
/// Slashes, backslashes, whitespace and every other non-alphanumeric
/// character become a single underscore; underscores never repeat and never
/// start or end the result. The result is lowercase ASCII, at most
/// [`MAX_SANITIZED_NAME_LENGTH`] characters, and [`UNNAMED`] when nothing is
/// left. The function is total and idempotent.
///
/// # Examples
///
/// ```
/// use xmi_schema::validation::input::sanitize_class_name;
///
/// assert_eq!(sanitize_class_name("Deelplan/Veld"), "deelplan_veld");
/// assert_eq!(sanitize_class_name("Gezinsmigrant en Overige migrant"), "gezinsmigrant_en_overige_migrant");
/// assert_eq!(sanitize_class_name("  __  "), "unnamed");
/// assert_eq!(sanitize_class_name(""), "unnamed");
/// ```
pub fn sanitize_class_name(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len().min(MAX_SANITIZED_NAME_LENGTH));
    let mut pending_separator = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !sanitized.is_empty() {
                sanitized.push('_');
            }
            pending_separator = false;
            sanitized.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }

        if sanitized.len() >= MAX_SANITIZED_NAME_LENGTH {
            break;
        }
    }

    // ASCII only, so byte truncation is a char boundary
    sanitized.truncate(MAX_SANITIZED_NAME_LENGTH);
    let trimmed_len = sanitized.trim_end_matches('_').len();
    sanitized.truncate(trimmed_len);

    if sanitized.is_empty() {
        return UNNAMED.to_string();
    }
    sanitized
}

/// Whether `stem` is already in sanitized form.
pub fn is_sanitized_name(stem: &str) -> bool {
    !stem.is_empty()
        && stem.len() <= MAX_SANITIZED_NAME_LENGTH
        && stem
            .split('_')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()))
}

/// Validate a version folder identifier (e.g., "v2.1.0").
///
/// The identifier names a folder directly under the project root, so it must
/// not contain path separators or parent references.
///
/// # Examples
///
/// ```
/// use xmi_schema::validation::input::validate_version_identifier;
///
/// assert!(validate_version_identifier("v2.1.0").is_ok());
/// assert!(validate_version_identifier("../etc").is_err());
/// assert!(validate_version_identifier("").is_err());
/// ```
pub fn validate_version_identifier(version: &str) -> ValidationResult<()> {
    if version.trim().is_empty() {
        return Err(ValidationError::Empty("version identifier"));
    }

    if version.len() > MAX_VERSION_IDENTIFIER_LENGTH {
        return Err(ValidationError::TooLong {
            field: "version identifier",
            max: MAX_VERSION_IDENTIFIER_LENGTH as u64,
            actual: version.len() as u64,
        });
    }

    if version.contains(['/', '\\']) {
        return Err(ValidationError::InvalidCharacters {
            field: "version identifier",
            reason: "path separators are not allowed".to_string(),
        });
    }

    if version == "." || version == ".." {
        return Err(ValidationError::InvalidCharacters {
            field: "version identifier",
            reason: "relative path components are not allowed".to_string(),
        });
    }

    if version.chars().any(char::is_control) {
        return Err(ValidationError::InvalidCharacters {
            field: "version identifier",
            reason: "control characters are not allowed".to_string(),
        });
    }

    Ok(())
}

/// Validate file size for XMI documents.
pub fn validate_xmi_file_size(file_size: u64) -> ValidationResult<()> {
    if file_size > MAX_XMI_FILE_SIZE {
        return Err(ValidationError::TooLong {
            field: "XMI file size",
            max: MAX_XMI_FILE_SIZE,
            actual: file_size,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_sanitized_name() {
        assert!(is_sanitized_name("a_b"));
        assert!(is_sanitized_name("unnamed"));
        assert!(!is_sanitized_name("a__b"));
        assert!(!is_sanitized_name("_a"));
        assert!(!is_sanitized_name("A"));
        assert!(!is_sanitized_name(""));
    }

    #[test]
    fn test_truncation_does_not_leave_trailing_underscore() {
        let name = format!("{} tail", "x".repeat(99));
        let sanitized = sanitize_class_name(&name);
        assert_eq!(sanitized, "x".repeat(99));
    }

    #[test]
    fn test_xmi_file_size_limit() {
        assert!(validate_xmi_file_size(1024).is_ok());
        assert!(validate_xmi_file_size(MAX_XMI_FILE_SIZE + 1).is_err());
    }
}
