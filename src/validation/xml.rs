//! XML utilities
//!
//! Parses XML content into a small owned element tree. XMI documents exported
//! from modelling tools are small enough that walking a tree is simpler than
//! driving the extraction from the raw event stream.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

/// Errors raised while reading XML content.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum XmlError {
    #[error("XML parsing error at position {position}: {message}")]
    Syntax { position: u64, message: String },

    #[error("Unclosed element at end of document: <{0}>")]
    UnclosedElement(String),

    #[error("Document has no root element")]
    NoRootElement,

    #[error("Document has more than one root element (second: <{0}>)")]
    MultipleRoots(String),
}

/// An XML element with its attributes, child elements, and text content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Qualified name as written (e.g., "UML:Class", "xmi:XMI")
    pub name: String,
    /// Attributes in document order, values unescaped
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order
    pub children: Vec<XmlElement>,
    /// Concatenated, trimmed text content of this element
    pub text: String,
}

impl XmlElement {
    /// Value of an attribute by exact qualified name
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value of the first attribute present among `keys`
    pub fn attr_any(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.attr(k))
    }

    /// Namespace prefix of the element name, if any
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(p, _)| p)
    }

    /// Element name without its namespace prefix
    pub fn local_name(&self) -> &str {
        self.name
            .split_once(':')
            .map(|(_, l)| l)
            .unwrap_or(&self.name)
    }

    /// Whether this element is `prefix:local`.
    ///
    /// The prefix is compared ASCII case-insensitively (`UML:` and `uml:` are
    /// both used by exporting tools); the local name is compared exactly.
    pub fn is(&self, prefix: &str, local: &str) -> bool {
        self.prefix().is_some_and(|p| p.eq_ignore_ascii_case(prefix)) && self.local_name() == local
    }

    /// Whether this element has the given local name, with or without a prefix
    pub fn is_local(&self, local: &str) -> bool {
        self.local_name() == local
    }

    /// Child elements named `prefix:local`
    pub fn children_named<'a>(
        &'a self,
        prefix: &'a str,
        local: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.is(prefix, local))
    }

    /// Child elements with the given local name, regardless of prefix
    pub fn children_local<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.is_local(local))
    }

    /// All descendants in document (pre-)order, excluding `self`
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Whether any descendant has exactly the qualified name `name`
    pub fn contains(&self, name: &str) -> bool {
        self.descendants().any(|d| d.name == name)
    }

    /// Namespace declarations on this element as `(prefix, uri)` pairs
    pub fn namespace_declarations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .filter_map(|(k, v)| k.strip_prefix("xmlns:").map(|p| (p, v.as_str())))
    }
}

/// Pre-order iterator over the descendants of an element.
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

/// Parse XML content into an element tree.
///
/// Any well-formedness problem (syntax error, mismatched or unclosed tags,
/// missing or duplicate root) is reported as an [`XmlError`].
///
/// # Example
///
/// ```rust
/// use xmi_schema::validation::xml::parse_xml;
///
/// let root = parse_xml(r#"<a x="1"><b>text</b></a>"#).unwrap();
/// assert_eq!(root.attr("x"), Some("1"));
/// assert_eq!(root.children[0].text, "text");
/// assert!(parse_xml("<a><b></a>").is_err());
/// ```
pub fn parse_xml(content: &str) -> Result<XmlElement, XmlError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let position = reader.buffer_position() as u64;
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                stack.push(element_from_start(e, position)?);
            }
            Ok(Event::Empty(ref e)) => {
                let element = element_from_start(e, position)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack.pop().ok_or_else(|| XmlError::Syntax {
                    position,
                    message: "closing tag without matching opening tag".to_string(),
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(ref t)) => {
                if let Some(current) = stack.last_mut() {
                    let text = t.unescape().map_err(|e| XmlError::Syntax {
                        position,
                        message: e.to_string(),
                    })?;
                    current.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(current) = stack.last_mut() {
                    let bytes = e.into_inner();
                    current.text.push_str(&String::from_utf8_lossy(&bytes));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(XmlError::Syntax {
                    position: reader.buffer_position() as u64,
                    message: e.to_string(),
                });
            }
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::UnclosedElement(open.name));
    }

    root.ok_or(XmlError::NoRootElement)
}

fn element_from_start(e: &BytesStart<'_>, position: u64) -> Result<XmlElement, XmlError> {
    let syntax = |message: String| XmlError::Syntax { position, message };

    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| syntax(format!("attribute error: {}", err)))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| syntax(format!("attribute value error: {}", err)))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(XmlError::MultipleRoots(element.name));
    }
    Ok(())
}
