//! JSON Schema exporter for generating one JSON Schema document per UML class.

use super::{ExportError, ExportResult};
use crate::models::{TypeRef, UmlAttribute, UmlClass};
use crate::validation::input::sanitize_class_name;
use serde_json::{Map, Value, json};

/// JSON Schema dialect written into every generated document
pub const JSON_SCHEMA_DRAFT: &str = "http://json-schema.org/draft-07/schema#";

/// Vendor extension carrying UML tagged values
pub const TAGGED_VALUE_EXTENSION: &str = "x-uml-tagged-value";

/// JSON Schema primitive type (plus optional format) for a UML type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonSchemaType {
    pub json_type: &'static str,
    pub format: Option<&'static str>,
}

impl JsonSchemaType {
    /// Used for every UML type that is not in [`UML_TYPE_MAPPINGS`] and for
    /// unresolved types.
    pub const DEFAULT: JsonSchemaType = JsonSchemaType {
        json_type: "string",
        format: None,
    };
}

/// UML type name (normalized, see [`normalize_type_name`]) → JSON Schema type.
pub const UML_TYPE_MAPPINGS: &[(&str, &str, Option<&str>)] = &[
    // string-like
    ("string", "string", None),
    ("str", "string", None),
    ("text", "string", None),
    ("tekst", "string", None),
    ("char", "string", None),
    ("character", "string", None),
    ("varchar", "string", None),
    ("nvarchar", "string", None),
    ("memo", "string", None),
    // integer-like
    ("int", "integer", None),
    ("integer", "integer", None),
    ("long", "integer", None),
    ("short", "integer", None),
    ("byte", "integer", None),
    ("bigint", "integer", None),
    ("smallint", "integer", None),
    ("tinyint", "integer", None),
    ("unlimitednatural", "integer", None),
    ("nonnegativeinteger", "integer", None),
    ("positiveinteger", "integer", None),
    // boolean-like
    ("boolean", "boolean", None),
    ("bool", "boolean", None),
    ("indicatie", "boolean", None),
    // decimal/real-like
    ("double", "number", None),
    ("float", "number", None),
    ("real", "number", None),
    ("decimal", "number", None),
    ("numeric", "number", None),
    ("number", "number", None),
    ("currency", "number", None),
    ("money", "number", None),
    ("bedrag", "number", None),
    // date/time-like
    ("date", "string", Some("date")),
    ("datum", "string", Some("date")),
    ("time", "string", Some("time")),
    ("tijd", "string", Some("time")),
    ("datetime", "string", Some("date-time")),
    ("timestamp", "string", Some("date-time")),
    ("datumtijd", "string", Some("date-time")),
    // string formats
    ("uri", "string", Some("uri")),
    ("url", "string", Some("uri")),
    ("email", "string", Some("email")),
    ("uuid", "string", Some("uuid")),
    ("guid", "string", Some("uuid")),
];

/// Prefixes modelling tools put in front of primitive type names
const TYPE_NAME_PREFIXES: &[&str] = &["eajava_", "eanone_", "eac#_", "eacpp_", "eavb_"];

/// Normalize a UML type name for lookup: lowercase, drop length/precision
/// suffixes (`varchar(50)`), tool prefixes (`EAJava_int`) and namespace or
/// package qualifiers (`xsd:string`, `java.lang.String`).
pub fn normalize_type_name(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase();
    let base = lower.split('(').next().unwrap_or_default().trim();
    let base = TYPE_NAME_PREFIXES
        .iter()
        .find_map(|p| base.strip_prefix(p))
        .unwrap_or(base);
    base.rsplit(['.', ':']).next().unwrap_or(base).to_string()
}

/// Map a UML type to a JSON Schema type.
///
/// Total: types missing from [`UML_TYPE_MAPPINGS`] and unresolved types map to
/// [`JsonSchemaType::DEFAULT`] (`"string"` without a format).
///
/// # Example
///
/// ```rust
/// use xmi_schema::export::json_schema::{JsonSchemaType, map_uml_type};
/// use xmi_schema::models::TypeRef;
///
/// assert_eq!(map_uml_type(&TypeRef::Named("Integer".to_string())).json_type, "integer");
/// assert_eq!(map_uml_type(&TypeRef::Named("Adres".to_string())), JsonSchemaType::DEFAULT);
/// assert_eq!(map_uml_type(&TypeRef::Unresolved), JsonSchemaType::DEFAULT);
/// ```
pub fn map_uml_type(type_ref: &TypeRef) -> JsonSchemaType {
    let Some(name) = type_ref.name() else {
        return JsonSchemaType::DEFAULT;
    };
    let normalized = normalize_type_name(name);
    UML_TYPE_MAPPINGS
        .iter()
        .find(|(uml, _, _)| *uml == normalized)
        .map(|&(_, json_type, format)| JsonSchemaType { json_type, format })
        .unwrap_or(JsonSchemaType::DEFAULT)
}

/// A JSON Schema document generated for one UML class.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSchema {
    /// Original class name
    pub class_name: String,
    /// Output file name (`<stem>.json`)
    pub file_name: String,
    /// The schema document
    pub document: Value,
}

impl GeneratedSchema {
    /// File name without the `.json` extension
    pub fn stem(&self) -> &str {
        self.file_name
            .strip_suffix(".json")
            .unwrap_or(&self.file_name)
    }

    /// Serialized document, as written to disk
    pub fn to_json_string(&self) -> Result<String, ExportError> {
        JSONSchemaExporter::to_json_string(&self.document)
    }
}

/// Exporter for JSON Schema format.
pub struct JSONSchemaExporter;

impl JSONSchemaExporter {
    /// Export a class to a JSON Schema string (SDK interface).
    ///
    /// # Example
    ///
    /// ```rust
    /// use xmi_schema::export::json_schema::JSONSchemaExporter;
    /// use xmi_schema::models::{TypeRef, UmlAttribute, UmlClass};
    ///
    /// let class = UmlClass::new("Person")
    ///     .with_attribute(UmlAttribute::new("bsn", TypeRef::Named("string".to_string())).with_lower_bound("1"));
    ///
    /// let result = JSONSchemaExporter.export(&class).unwrap();
    /// assert_eq!(result.format, "json_schema");
    /// assert!(result.content.contains("\"required\""));
    /// ```
    pub fn export(&self, class: &UmlClass) -> Result<ExportResult, ExportError> {
        Ok(ExportResult {
            content: Self::to_json_string(&Self::export_class(class))?,
            format: "json_schema".to_string(),
        })
    }

    /// Generate the schema for a class, named after its sanitized class name.
    pub fn generate(class: &UmlClass) -> GeneratedSchema {
        Self::generate_with_stem(class, &sanitize_class_name(&class.name))
    }

    /// Generate the schema for a class under an explicit file stem (used when
    /// sanitized names collide).
    pub fn generate_with_stem(class: &UmlClass, stem: &str) -> GeneratedSchema {
        GeneratedSchema {
            class_name: class.name.clone(),
            file_name: format!("{}.json", stem),
            document: Self::export_class(class),
        }
    }

    /// Export a class to a JSON Schema value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use xmi_schema::export::json_schema::JSONSchemaExporter;
    /// use xmi_schema::models::UmlClass;
    ///
    /// let schema = JSONSchemaExporter::export_class(&UmlClass::new("Person"));
    /// assert_eq!(schema["title"], "Person");
    /// assert_eq!(schema["type"], "object");
    /// assert!(schema.get("required").is_none());
    /// ```
    pub fn export_class(class: &UmlClass) -> Value {
        let mut properties = Map::new();
        for attribute in &class.attributes {
            properties.insert(attribute.name.clone(), Self::export_attribute(attribute));
        }

        let mut schema = Map::new();
        schema.insert("$schema".to_string(), json!(JSON_SCHEMA_DRAFT));
        schema.insert("type".to_string(), json!("object"));
        schema.insert("title".to_string(), json!(class.name));

        if let Some(documentation) = class.documentation.as_deref().filter(|d| !d.trim().is_empty())
        {
            schema.insert("description".to_string(), json!(documentation));
        }

        schema.insert("properties".to_string(), Value::Object(properties));

        let required = class.required_attributes();
        if !required.is_empty() {
            schema.insert("required".to_string(), json!(required));
        }

        if !class.tagged_values.is_empty() {
            schema.insert(
                TAGGED_VALUE_EXTENSION.to_string(),
                json!(class.tagged_values),
            );
        }

        Value::Object(schema)
    }

    /// Export one attribute to a property schema.
    pub fn export_attribute(attribute: &UmlAttribute) -> Value {
        let mapped = map_uml_type(&attribute.type_ref);
        let mut item = Map::new();
        item.insert("type".to_string(), json!(mapped.json_type));
        if let Some(format) = mapped.format {
            item.insert("format".to_string(), json!(format));
        }

        let mut property = if attribute.is_multi_valued() {
            let mut array = Map::new();
            array.insert("type".to_string(), json!("array"));
            array.insert("items".to_string(), Value::Object(item));
            if let Some(min) = attribute
                .lower_bound
                .as_deref()
                .and_then(|b| b.trim().parse::<u64>().ok())
                .filter(|&b| b >= 1)
            {
                array.insert("minItems".to_string(), json!(min));
            }
            if let Some(max) = attribute.max_occurs() {
                array.insert("maxItems".to_string(), json!(max));
            }
            array
        } else {
            item
        };

        if let Some(documentation) = attribute.documentation() {
            property.insert("description".to_string(), json!(documentation));
        }

        if !attribute.tagged_values.is_empty() {
            property.insert(
                TAGGED_VALUE_EXTENSION.to_string(),
                json!(attribute.tagged_values),
            );
        }

        Value::Object(property)
    }

    /// Serialize a schema document the way it is written to disk: pretty
    /// printed, keys sorted, trailing newline.
    pub fn to_json_string(document: &Value) -> Result<String, ExportError> {
        let mut content = serde_json::to_string_pretty(document)
            .map_err(|e| ExportError::SerializationError(e.to_string()))?;
        content.push('\n');
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_type_name() {
        assert_eq!(normalize_type_name("EAJava_int"), "int");
        assert_eq!(normalize_type_name("xsd:string"), "string");
        assert_eq!(normalize_type_name("java.lang.String"), "string");
        assert_eq!(normalize_type_name("VARCHAR(100)"), "varchar");
        assert_eq!(normalize_type_name(" DateTime "), "datetime");
    }

    #[test]
    fn test_every_mapping_is_reachable() {
        for (uml, json_type, format) in UML_TYPE_MAPPINGS {
            let mapped = map_uml_type(&TypeRef::Named(uml.to_uppercase()));
            assert_eq!(mapped.json_type, *json_type, "{}", uml);
            assert_eq!(mapped.format, *format, "{}", uml);
        }
    }

    #[test]
    fn test_unknown_types_default_to_plain_string() {
        for name in ["Adres", "EAID_1234", "", "Gemeente"] {
            assert_eq!(
                map_uml_type(&TypeRef::Named(name.to_string())),
                JsonSchemaType::DEFAULT
            );
        }
    }

    #[test]
    fn test_multi_valued_attribute_becomes_array() {
        let attribute = UmlAttribute::new("tags", TypeRef::Named("int".to_string()))
            .with_lower_bound("1")
            .with_upper_bound("*");
        let property = JSONSchemaExporter::export_attribute(&attribute);
        assert_eq!(property["type"], "array");
        assert_eq!(property["items"]["type"], "integer");
        assert_eq!(property["minItems"], 1);
        assert!(property.get("maxItems").is_none());
    }
}
