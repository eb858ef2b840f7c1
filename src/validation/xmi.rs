//! XMI document validation
//!
//! A document is accepted as an XMI 2.1 UML model when:
//! - its root element is `xmi:XMI`,
//! - the root declares both the `xmi` and `uml` namespace prefixes,
//! - a `uml:Model` element exists somewhere in the tree.
//!
//! Names and prefixes are matched exactly (`XMI:XMI` or `xmlns:UML` do not
//! count). Namespace URIs are not checked. Validation never fails with an error
//! of its own: unreadable content is reported as an invalid verdict.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::xml::{XmlElement, parse_xml};

/// Reason an XMI document was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum XmiValidationError {
    /// The content is not well-formed XML
    #[error("Malformed XML: {0}")]
    Malformed(String),

    /// The root element is not `xmi:XMI`
    #[error("Root element is <{0}>, expected <xmi:XMI>")]
    WrongRoot(String),

    /// A required namespace prefix is not declared on the root element
    #[error("Missing namespace declaration xmlns:{0}")]
    MissingNamespace(String),

    /// No `uml:Model` element in the document
    #[error("No uml:Model element found")]
    MissingModel,
}

impl XmiValidationError {
    /// Whether the document could not be parsed at all (as opposed to having
    /// the wrong shape).
    pub fn is_malformed(&self) -> bool {
        matches!(self, XmiValidationError::Malformed(_))
    }
}

/// Outcome of validating an XMI document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "validation results should be checked"]
pub enum XmiValidation {
    Valid,
    Invalid(XmiValidationError),
}

impl XmiValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, XmiValidation::Valid)
    }

    /// The rejection reason, if invalid
    pub fn error(&self) -> Option<&XmiValidationError> {
        match self {
            XmiValidation::Valid => None,
            XmiValidation::Invalid(e) => Some(e),
        }
    }

    /// Convert into a `Result`
    pub fn into_result(self) -> Result<(), XmiValidationError> {
        match self {
            XmiValidation::Valid => Ok(()),
            XmiValidation::Invalid(e) => Err(e),
        }
    }
}

/// Namespace prefixes that must be declared on the root element
pub const REQUIRED_NAMESPACES: [&str; 2] = ["xmi", "uml"];

const ROOT_ELEMENT: &str = "xmi:XMI";
const MODEL_ELEMENT: &str = "uml:Model";

/// Validate raw XMI content.
///
/// # Example
///
/// ```rust
/// use xmi_schema::validation::xmi::validate_xmi;
///
/// let xmi = r#"<xmi:XMI xmlns:xmi="http://schema.omg.org/spec/XMI/2.1"
///                      xmlns:uml="http://schema.omg.org/spec/UML/2.1">
///                <uml:Model name="Model"/>
///              </xmi:XMI>"#;
/// assert!(validate_xmi(xmi).is_valid());
/// assert!(!validate_xmi("<not-xmi/>").is_valid());
/// ```
pub fn validate_xmi(content: &str) -> XmiValidation {
    match parse_xml(content) {
        Ok(root) => validate_document(&root),
        Err(e) => XmiValidation::Invalid(XmiValidationError::Malformed(e.to_string())),
    }
}

/// Validate an already parsed document tree.
pub fn validate_document(root: &XmlElement) -> XmiValidation {
    if root.name != ROOT_ELEMENT {
        return XmiValidation::Invalid(XmiValidationError::WrongRoot(root.name.clone()));
    }

    for required in REQUIRED_NAMESPACES {
        let declared = root
            .namespace_declarations()
            .any(|(prefix, _)| prefix == required);
        if !declared {
            return XmiValidation::Invalid(XmiValidationError::MissingNamespace(
                required.to_string(),
            ));
        }
    }

    if !root.contains(MODEL_ELEMENT) {
        return XmiValidation::Invalid(XmiValidationError::MissingModel);
    }

    XmiValidation::Valid
}
