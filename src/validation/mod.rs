//! Validation functionality
//!
//! Provides validation logic for:
//! - XML well-formedness (element tree parsing)
//! - XMI 2.1 document shape
//! - Input validation and sanitization (file names, version identifiers)

pub mod input;
pub mod xmi;
pub mod xml;

pub use input::{
    MAX_SANITIZED_NAME_LENGTH, UNNAMED, ValidationError, is_sanitized_name, sanitize_class_name,
    validate_version_identifier, validate_xmi_file_size,
};
pub use xmi::{XmiValidation, XmiValidationError, validate_document, validate_xmi};
pub use xml::{XmlElement, XmlError, parse_xml};
