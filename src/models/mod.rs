//! Models module
//!
//! Defines the in-memory UML class model produced by the XMI importer and
//! consumed by the exporters, plus the inputs of the OpenAPI assembler.

pub mod openapi;
pub mod uml;

pub use openapi::{OpenAPIFormat, OpenApiInfo, SchemaReference};
pub use uml::{
    DOCUMENTATION_TAG, LOWER_BOUND_TAG, TaggedValues, TypeRef, UNBOUNDED, UPPER_BOUND_TAG,
    UmlAttribute, UmlClass,
};
