//! UML class model extracted from XMI documents

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tagged values attached to a UML model element.
///
/// Keys are kept sorted so that everything emitted from them is stable.
pub type TaggedValues = BTreeMap<String, String>;

/// Tagged value holding free-text documentation
pub const DOCUMENTATION_TAG: &str = "documentation";

/// Tagged value holding the lower multiplicity bound
pub const LOWER_BOUND_TAG: &str = "lowerBound";

/// Tagged value holding the upper multiplicity bound
pub const UPPER_BOUND_TAG: &str = "upperBound";

/// Upper bound literal meaning "unbounded"
pub const UNBOUNDED: &str = "*";

/// Resolved type of a UML attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "camelCase")]
pub enum TypeRef {
    /// Type name as found in the model (e.g., "String", "int", "Datum")
    Named(String),
    /// The type reference could not be resolved
    Unresolved,
}

impl TypeRef {
    /// Build a type reference from an optional name; blank names are unresolved.
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(str::trim) {
            Some(n) if !n.is_empty() => TypeRef::Named(n.to_string()),
            _ => TypeRef::Unresolved,
        }
    }

    /// The type name, if resolved
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeRef::Named(name) => Some(name),
            TypeRef::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, TypeRef::Named(_))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{}", name),
            TypeRef::Unresolved => write!(f, "<unknown>"),
        }
    }
}

/// A typed field of a UML class.
///
/// # Example
///
/// ```rust
/// use xmi_schema::models::{TypeRef, UmlAttribute};
///
/// let attr = UmlAttribute::new("bsn", TypeRef::Named("string".to_string()))
///     .with_lower_bound("1");
/// assert!(attr.is_required());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UmlAttribute {
    /// Attribute name
    pub name: String,
    /// Resolved attribute type
    pub type_ref: TypeRef,
    /// Attribute-level tagged values, copied verbatim
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tagged_values: TaggedValues,
    /// Lower multiplicity bound as written in the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<String>,
    /// Upper multiplicity bound as written in the model (`*` = unbounded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<String>,
}

impl UmlAttribute {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            tagged_values: TaggedValues::new(),
            lower_bound: None,
            upper_bound: None,
        }
    }

    pub fn with_lower_bound(mut self, bound: impl Into<String>) -> Self {
        self.lower_bound = Some(bound.into());
        self
    }

    pub fn with_upper_bound(mut self, bound: impl Into<String>) -> Self {
        self.upper_bound = Some(bound.into());
        self
    }

    pub fn with_tagged_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tagged_values.insert(key.into(), value.into());
        self
    }

    /// Whether the attribute is mandatory.
    ///
    /// True iff the lower bound is present and parses as an integer >= 1.
    /// Non-numeric, zero, and absent bounds are optional.
    pub fn is_required(&self) -> bool {
        self.lower_bound
            .as_deref()
            .and_then(|b| b.trim().parse::<i64>().ok())
            .is_some_and(|b| b >= 1)
    }

    /// Maximum number of values, or `None` when unbounded or unspecified.
    pub fn max_occurs(&self) -> Option<u64> {
        self.upper_bound
            .as_deref()
            .and_then(|b| b.trim().parse::<u64>().ok())
    }

    /// Whether the attribute holds more than one value (`*` or a bound > 1).
    pub fn is_multi_valued(&self) -> bool {
        match self.upper_bound.as_deref().map(str::trim) {
            Some(UNBOUNDED) => true,
            Some(_) => self.max_occurs().is_some_and(|max| max > 1),
            None => false,
        }
    }

    /// Free-text documentation from the `documentation` tagged value
    pub fn documentation(&self) -> Option<&str> {
        self.tagged_values
            .get(DOCUMENTATION_TAG)
            .map(String::as_str)
            .filter(|d| !d.trim().is_empty())
    }
}

/// A UML class with its attributes.
///
/// Built once per class element found in an XMI document and not modified
/// afterwards.
///
/// # Example
///
/// ```rust
/// use xmi_schema::models::{TypeRef, UmlAttribute, UmlClass};
///
/// let class = UmlClass::new("Person")
///     .with_attribute(UmlAttribute::new("bsn", TypeRef::Unresolved));
/// assert_eq!(class.attributes.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UmlClass {
    /// Class name as written in the model (may be empty)
    pub name: String,
    /// Documentation text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    /// Class-level tagged values, copied verbatim
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tagged_values: TaggedValues,
    /// Attributes in source order
    #[serde(default)]
    pub attributes: Vec<UmlAttribute>,
    /// File the class was read from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

impl UmlClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documentation: None,
            tagged_values: TaggedValues::new(),
            attributes: Vec::new(),
            source_file: None,
        }
    }

    pub fn with_attribute(mut self, attribute: UmlAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_tagged_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tagged_values.insert(key.into(), value.into());
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    /// Names of the attributes that are mandatory, in source order
    pub fn required_attributes(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|a| a.is_required())
            .map(|a| a.name.as_str())
            .collect()
    }
}
