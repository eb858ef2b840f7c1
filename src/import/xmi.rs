//! XMI importer
//!
//! Extracts UML classes and their attributes from XMI 2.1 documents.
//!
//! Two vocabularies are understood:
//! - the `UML:` element vocabulary written by Enterprise Architect
//!   (`UML:Class`, `UML:Classifier.feature`, `UML:Attribute`,
//!   `UML:ModelElement.taggedValue`, `UML:StructuralFeature.type`);
//! - the UML 2 vocabulary (`packagedElement xmi:type="uml:Class"`,
//!   `ownedAttribute`, `lowerValue`/`upperValue`, `ownedComment`).
//!
//! Malformed sub-elements are skipped one by one with a warning; they never
//! discard the enclosing class.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use super::{ImportError, ImportResult};
use crate::models::{
    DOCUMENTATION_TAG, LOWER_BOUND_TAG, TaggedValues, TypeRef, UNBOUNDED, UPPER_BOUND_TAG,
    UmlAttribute, UmlClass,
};
use crate::validation::xmi::validate_document;
use crate::validation::xml::{XmlElement, parse_xml};

/// Attributes carrying an element's own id
const ID_ATTRS: &[&str] = &["xmi.id", "xmi:id"];

/// Attributes carrying a reference to another element's id
const ID_REF_ATTRS: &[&str] = &["xmi.idref", "xmi:idref", "idref"];

/// Prefix of the element ids Enterprise Architect generates
const ELEMENT_ID_PREFIX: &str = "EAID_";

/// Attributes carrying the element type in UML 2 documents
const TYPE_ATTRS: &[&str] = &["xmi:type", "xsi:type"];

/// Tagged values that may hold the lower bound
const LOWER_BOUND_TAGS: &[&str] = &[LOWER_BOUND_TAG, "lower"];

/// Tagged values that may hold the upper bound
const UPPER_BOUND_TAGS: &[&str] = &[UPPER_BOUND_TAG, "upper"];

/// XMI Importer
///
/// Imports XMI content into a list of [`UmlClass`].
#[derive(Debug, Default)]
pub struct XMIImporter;

impl XMIImporter {
    /// Create a new XMIImporter
    pub fn new() -> Self {
        Self
    }

    /// Parse, validate, and extract classes from XMI content.
    ///
    /// # Arguments
    ///
    /// * `xml_content` - The XMI document as a string.
    ///
    /// # Returns
    ///
    /// The extracted classes and warnings, `ImportError::ParseError` for
    /// content that is not well-formed XML, or `ImportError::XMIValidationError`
    /// for XML that is not an XMI 2.1 model.
    ///
    /// # Example
    ///
    /// ```rust
    /// use xmi_schema::import::XMIImporter;
    ///
    /// let xmi = r#"<xmi:XMI xmlns:xmi="x" xmlns:uml="u" xmlns:UML="u">
    ///   <uml:Model name="M">
    ///     <UML:Class name="Person">
    ///       <UML:Classifier.feature>
    ///         <UML:Attribute name="bsn"/>
    ///       </UML:Classifier.feature>
    ///     </UML:Class>
    ///   </uml:Model>
    /// </xmi:XMI>"#;
    ///
    /// let result = XMIImporter::new().import(xmi).unwrap();
    /// assert_eq!(result.classes[0].name, "Person");
    /// assert_eq!(result.classes[0].attributes[0].name, "bsn");
    /// ```
    pub fn import(&self, xml_content: &str) -> Result<ImportResult, ImportError> {
        let root = parse_xml(xml_content).map_err(|e| ImportError::ParseError(e.to_string()))?;
        validate_document(&root).into_result()?;
        Ok(self.extract(&root))
    }

    /// Extract classes from an already validated document tree.
    pub fn extract(&self, root: &XmlElement) -> ImportResult {
        let mut extraction = Extraction::new(root);
        let mut classes = Vec::new();
        extraction.collect_classes(root, &mut classes);

        debug!(
            "Extracted {} classes ({} warnings)",
            classes.len(),
            extraction.warnings.len()
        );

        ImportResult {
            classes,
            warnings: extraction.warnings,
        }
    }
}

/// State for one extraction pass over a document.
struct Extraction {
    /// Element names by xmi id, for resolving type references
    names_by_id: HashMap<String, String>,
    warnings: Vec<String>,
}

impl Extraction {
    fn new(root: &XmlElement) -> Self {
        let mut names_by_id = HashMap::new();
        for element in std::iter::once(root).chain(root.descendants()) {
            if let (Some(id), Some(name)) = (element.attr_any(ID_ATTRS), element.attr("name"))
                && !name.trim().is_empty()
            {
                names_by_id
                    .entry(id.to_string())
                    .or_insert_with(|| name.trim().to_string());
            }
        }
        Self {
            names_by_id,
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }

    /// Find class definitions below `element` in document order.
    fn collect_classes(&mut self, element: &XmlElement, out: &mut Vec<UmlClass>) {
        for child in &element.children {
            // Type references and tool extensions never hold class definitions
            if child.is("uml", "StructuralFeature.type")
                || child.is("xmi", "Extension")
                || child.is_local("XMI.extension")
            {
                continue;
            }

            if child.is("uml", "Class") {
                if !is_reference(child) {
                    out.push(self.extract_classifier_class(child));
                }
            } else if child.is_local("packagedElement") || child.is_local("nestedClassifier") {
                match child.attr_any(TYPE_ATTRS) {
                    Some(t) if t.eq_ignore_ascii_case("uml:Class") => {
                        out.push(self.extract_packaged_class(child));
                    }
                    Some(t)
                        if t.eq_ignore_ascii_case("uml:Component")
                            && child.children_local("ownedAttribute").next().is_some() =>
                    {
                        out.push(self.extract_packaged_class(child));
                    }
                    _ => {}
                }
            }

            self.collect_classes(child, out);
        }
    }

    /// `UML:Class` with `UML:Classifier.feature` / `UML:Attribute` children.
    fn extract_classifier_class(&mut self, element: &XmlElement) -> UmlClass {
        let name = self.class_name(element);
        let tagged_values = self.read_tagged_values(element, &name);
        let documentation = tagged_values
            .get(DOCUMENTATION_TAG)
            .filter(|d| !d.trim().is_empty())
            .cloned();

        let mut attributes: Vec<UmlAttribute> = Vec::new();
        let mut seen = HashSet::new();
        for feature in element.children_named("uml", "Classifier.feature") {
            for child in &feature.children {
                if child.is("uml", "Attribute") {
                    if let Some(attribute) = self.extract_feature_attribute(child, &name) {
                        self.push_attribute(&name, attribute, &mut attributes, &mut seen);
                    }
                } else if child.is("uml", "Operation") {
                    debug!("Ignoring operation in class '{}'", name);
                } else {
                    self.warn(format!(
                        "Skipping unexpected element <{}> in features of class '{}'",
                        child.name, name
                    ));
                }
            }
        }

        UmlClass {
            name,
            documentation,
            tagged_values,
            attributes,
            source_file: None,
        }
    }

    fn extract_feature_attribute(
        &mut self,
        element: &XmlElement,
        class_name: &str,
    ) -> Option<UmlAttribute> {
        let Some(name) = non_blank(element.attr("name")) else {
            self.warn(format!(
                "Skipping attribute without a name in class '{}'",
                class_name
            ));
            return None;
        };

        let owner = format!("{}.{}", class_name, name);
        let tagged_values = self.read_tagged_values(element, &owner);

        let type_name = self
            .structural_feature_type(element)
            .or_else(|| element.attr("type").and_then(|t| self.resolve_id_or_name(t)))
            .or_else(|| tagged_values.get("type").cloned());
        let type_ref = TypeRef::from_name(type_name.as_deref());

        let (range_lower, range_upper) = multiplicity_range(element);
        let lower_bound = first_tag(&tagged_values, LOWER_BOUND_TAGS).or(range_lower);
        let upper_bound = first_tag(&tagged_values, UPPER_BOUND_TAGS).or(range_upper);

        Some(self.finish_attribute(
            UmlAttribute {
                name: name.to_string(),
                type_ref,
                tagged_values,
                lower_bound,
                upper_bound,
            },
            &owner,
        ))
    }

    /// `packagedElement xmi:type="uml:Class"` with `ownedAttribute` children.
    fn extract_packaged_class(&mut self, element: &XmlElement) -> UmlClass {
        let name = self.class_name(element);
        let tagged_values = self.read_tagged_values(element, &name);
        let documentation = owned_comment(element).or_else(|| {
            tagged_values
                .get(DOCUMENTATION_TAG)
                .filter(|d| !d.trim().is_empty())
                .cloned()
        });

        let mut attributes: Vec<UmlAttribute> = Vec::new();
        let mut seen = HashSet::new();
        for owned in element.children_local("ownedAttribute") {
            if owned.attr("association").is_some() {
                debug!("Skipping association end in class '{}'", name);
                continue;
            }
            if let Some(attribute) = self.extract_owned_attribute(owned, &name) {
                self.push_attribute(&name, attribute, &mut attributes, &mut seen);
            }
        }

        UmlClass {
            name,
            documentation,
            tagged_values,
            attributes,
            source_file: None,
        }
    }

    fn extract_owned_attribute(
        &mut self,
        element: &XmlElement,
        class_name: &str,
    ) -> Option<UmlAttribute> {
        let Some(name) = non_blank(element.attr("name")) else {
            self.warn(format!(
                "Skipping attribute without a name in class '{}'",
                class_name
            ));
            return None;
        };

        let owner = format!("{}.{}", class_name, name);
        let mut tagged_values = self.read_tagged_values(element, &owner);
        if let Some(doc) = owned_comment(element) {
            tagged_values
                .entry(DOCUMENTATION_TAG.to_string())
                .or_insert(doc);
        }

        let type_name = element
            .attr("type")
            .and_then(|t| self.resolve_id_or_name(t))
            .or_else(|| {
                element
                    .children_local("type")
                    .find_map(|t| self.type_from_reference(t))
            });
        let type_ref = TypeRef::from_name(type_name.as_deref());

        let lower_bound = value_of(element, "lowerValue")
            .or_else(|| first_tag(&tagged_values, LOWER_BOUND_TAGS));
        let upper_bound = value_of(element, "upperValue")
            .or_else(|| first_tag(&tagged_values, UPPER_BOUND_TAGS));

        Some(self.finish_attribute(
            UmlAttribute {
                name: name.to_string(),
                type_ref,
                tagged_values,
                lower_bound,
                upper_bound,
            },
            &owner,
        ))
    }

    fn finish_attribute(&mut self, attribute: UmlAttribute, owner: &str) -> UmlAttribute {
        if !attribute.type_ref.is_resolved() {
            debug!("Unresolved type for attribute '{}', defaulting to string", owner);
            self.warnings.push(format!(
                "Unresolved type for attribute '{}', defaulting to string",
                owner
            ));
        }
        if attribute.lower_bound.is_none() {
            debug!("No multiplicity for attribute '{}', treating as optional", owner);
        }
        attribute
    }

    fn push_attribute(
        &mut self,
        class_name: &str,
        attribute: UmlAttribute,
        attributes: &mut Vec<UmlAttribute>,
        seen: &mut HashSet<String>,
    ) {
        if seen.insert(attribute.name.clone()) {
            attributes.push(attribute);
        } else {
            self.warn(format!(
                "Skipping duplicate attribute '{}' in class '{}'",
                attribute.name, class_name
            ));
        }
    }

    fn class_name(&mut self, element: &XmlElement) -> String {
        match element.attr("name") {
            Some(name) => name.to_string(),
            None => {
                self.warn(format!(
                    "Class element <{}> has no name attribute",
                    element.name
                ));
                String::new()
            }
        }
    }

    /// Read `UML:ModelElement.taggedValue` / `UML:TaggedValue` entries.
    fn read_tagged_values(&mut self, element: &XmlElement, owner: &str) -> TaggedValues {
        let mut values = TaggedValues::new();
        for container in element.children_named("uml", "ModelElement.taggedValue") {
            for entry in &container.children {
                if !entry.is("uml", "TaggedValue") {
                    self.warn(format!(
                        "Skipping unexpected element <{}> in tagged values of '{}'",
                        entry.name, owner
                    ));
                    continue;
                }
                let Some(key) = non_blank(entry.attr_any(&["tag", "name"])) else {
                    self.warn(format!("Skipping tagged value without a tag on '{}'", owner));
                    continue;
                };
                let value = entry
                    .attr("value")
                    .map(str::to_string)
                    .or_else(|| {
                        entry
                            .children_local("TaggedValue.dataValue")
                            .next()
                            .map(|d| d.text.clone())
                    })
                    .unwrap_or_else(|| entry.text.clone());
                values.insert(key.to_string(), value);
            }
        }
        values
    }

    /// Type named by a `UML:StructuralFeature.type` child.
    fn structural_feature_type(&self, element: &XmlElement) -> Option<String> {
        for type_element in element.children_named("uml", "StructuralFeature.type") {
            if let Some(text) = non_blank(Some(type_element.text.as_str())) {
                return Some(text.to_string());
            }
            if let Some(name) = type_element
                .children
                .iter()
                .find_map(|r| self.type_from_reference(r))
            {
                return Some(name);
            }
        }
        None
    }

    /// Type name carried by a reference element: its `name`, a resolvable id
    /// reference, or an `href` fragment.
    fn type_from_reference(&self, element: &XmlElement) -> Option<String> {
        if let Some(name) = non_blank(element.attr("name")) {
            return Some(name.to_string());
        }
        if let Some(id) = element.attr_any(ID_REF_ATTRS)
            && let Some(name) = self.names_by_id.get(id)
        {
            return Some(name.clone());
        }
        element.attr("href").and_then(|href| self.name_from_href(href))
    }

    /// Name behind a `type` value that is either an element id or a type name.
    /// An id missing from the index resolves to nothing.
    fn resolve_id_or_name(&self, value: &str) -> Option<String> {
        if let Some(name) = self.names_by_id.get(value) {
            return Some(name.clone());
        }
        let value = value.trim();
        if value.is_empty() || is_element_id(value) {
            return None;
        }
        Some(value.to_string())
    }

    fn name_from_href(&self, href: &str) -> Option<String> {
        let target = match href.rsplit_once('#') {
            Some((_, fragment)) => fragment,
            None => href.rsplit(['/', '\\']).next().unwrap_or(href),
        };
        let target = target.trim();
        if target.is_empty() {
            return None;
        }
        self.resolve_id_or_name(target)
    }
}

/// Whether a value is an EA element id (`EAID_<guid>`) rather than a type name.
/// `EAJava_int` style values name a primitive and are kept.
fn is_element_id(value: &str) -> bool {
    value
        .get(..ELEMENT_ID_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(ELEMENT_ID_PREFIX))
}

fn is_reference(element: &XmlElement) -> bool {
    element.attr_any(ID_REF_ATTRS).is_some() || element.attr("href").is_some()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn first_tag(values: &TaggedValues, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| values.get(*k))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `value` attribute of the first child with the given local name
fn value_of(element: &XmlElement, local: &str) -> Option<String> {
    element
        .children_local(local)
        .find_map(|c| non_blank(c.attr("value")))
        .map(str::to_string)
}

/// Body of the first `ownedComment` child
fn owned_comment(element: &XmlElement) -> Option<String> {
    element.children_local("ownedComment").find_map(|c| {
        non_blank(c.attr("body"))
            .map(str::to_string)
            .or_else(|| {
                c.children_local("body")
                    .find_map(|b| non_blank(Some(b.text.as_str())))
                    .map(str::to_string)
            })
    })
}

/// Bounds from `UML:StructuralFeature.multiplicity` / `UML:MultiplicityRange`.
///
/// An upper bound of `-1` means unbounded.
fn multiplicity_range(element: &XmlElement) -> (Option<String>, Option<String>) {
    let range = element
        .children_named("uml", "StructuralFeature.multiplicity")
        .flat_map(|m| m.descendants())
        .find(|d| d.is("uml", "MultiplicityRange"));

    match range {
        Some(r) => {
            let lower = non_blank(r.attr("lower")).map(str::to_string);
            let upper = non_blank(r.attr("upper")).map(|u| {
                if u == "-1" {
                    UNBOUNDED.to_string()
                } else {
                    u.to_string()
                }
            });
            (lower, upper)
        }
        None => (None, None),
    }
}
