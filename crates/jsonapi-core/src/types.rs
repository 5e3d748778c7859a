//! # Classification Types
//!
//! The closed sets of answers the classifiers can give, plus the property
//! tags carried by DOM property nodes.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What a JSON object found in a `data` position denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomDataType {
    /// Neither a resource nor a resource identifier.
    None,
    /// A full resource object.
    Resource,
    /// A `{type, id[, meta]}` reference.
    ResourceIdentifier,
}

impl fmt::Display for DomDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "None",
            Self::Resource => "Resource",
            Self::ResourceIdentifier => "ResourceIdentifier",
        };
        f.write_str(s)
    }
}

/// The concrete shape of a top-level document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomDocumentType {
    /// No `data` and no `errors` (for example meta-only).
    Document,
    /// `"data": null`.
    NullDocument,
    /// `data` is a single resource.
    ResourceDocument,
    /// `data` is a single resource identifier.
    ResourceIdentifierDocument,
    /// `"data": []`.
    EmptyDocument,
    /// `data` is an array of resources.
    ResourceCollectionDocument,
    /// `data` is an array of resource identifiers.
    ResourceIdentifierCollectionDocument,
    /// `errors` is present.
    ErrorsDocument,
}

impl DomDocumentType {
    /// Whether primary data is a collection (including the empty one).
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            Self::EmptyDocument
                | Self::ResourceCollectionDocument
                | Self::ResourceIdentifierCollectionDocument
        )
    }

    /// Whether the document carries a `data` member at all.
    pub fn has_data(&self) -> bool {
        !matches!(self, Self::Document | Self::ErrorsDocument)
    }
}

impl fmt::Display for DomDocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Document => "Document",
            Self::NullDocument => "NullDocument",
            Self::ResourceDocument => "ResourceDocument",
            Self::ResourceIdentifierDocument => "ResourceIdentifierDocument",
            Self::EmptyDocument => "EmptyDocument",
            Self::ResourceCollectionDocument => "ResourceCollectionDocument",
            Self::ResourceIdentifierCollectionDocument => "ResourceIdentifierCollectionDocument",
            Self::ErrorsDocument => "ErrorsDocument",
        };
        f.write_str(s)
    }
}

/// The linkage cardinality of a relationship object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomRelationshipType {
    /// No `data` member: links and/or meta only.
    Relationship,
    /// `data` is null or a single resource identifier.
    ToOneRelationship,
    /// `data` is an array of resource identifiers.
    ToManyRelationship,
}

impl fmt::Display for DomRelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Relationship => "Relationship",
            Self::ToOneRelationship => "ToOneRelationship",
            Self::ToManyRelationship => "ToManyRelationship",
        };
        f.write_str(s)
    }
}

/// The JSON:API role of a DOM property node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiPropertyType {
    /// `data`.
    Data,
    /// `errors`.
    Errors,
    /// `included`.
    Included,
    /// `jsonapi`.
    JsonApi,
    /// `links`.
    Links,
    /// `meta`.
    Meta,
    /// `type`.
    Type,
    /// `id`.
    Id,
    /// `attributes`.
    Attributes,
    /// `relationships`.
    Relationships,
    /// `version` inside `jsonapi`.
    Version,
    /// A named member of `attributes`.
    Attribute,
    /// A named member of `relationships`.
    Relationship,
    /// A named member of `links`.
    Link,
    /// `href` inside a link object.
    Href,
    /// A member of free-form JSON (meta content, attribute values, error members).
    Member,
    /// A member JSON:API does not define at this position.
    Unknown,
}

impl fmt::Display for ApiPropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Short name of a JSON value's kind, used in error details.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_document_types() {
        assert!(DomDocumentType::EmptyDocument.is_collection());
        assert!(DomDocumentType::ResourceCollectionDocument.is_collection());
        assert!(!DomDocumentType::ResourceDocument.is_collection());
        assert!(!DomDocumentType::NullDocument.is_collection());
    }

    #[test]
    fn test_has_data() {
        assert!(DomDocumentType::NullDocument.has_data());
        assert!(!DomDocumentType::Document.has_data());
        assert!(!DomDocumentType::ErrorsDocument.has_data());
    }

    #[test]
    fn test_json_type_names() {
        assert_eq!(json_type_name(&Value::Null), "null");
        assert_eq!(json_type_name(&serde_json::json!([1])), "array");
        assert_eq!(json_type_name(&serde_json::json!({"a": 1})), "object");
        assert_eq!(json_type_name(&serde_json::json!(1.5)), "number");
    }

    #[test]
    fn test_display_matches_variant_names() {
        assert_eq!(DomDocumentType::ErrorsDocument.to_string(), "ErrorsDocument");
        assert_eq!(DomRelationshipType::ToManyRelationship.to_string(), "ToManyRelationship");
        assert_eq!(ApiPropertyType::Attributes.to_string(), "Attributes");
        assert_eq!(DomDataType::ResourceIdentifier.to_string(), "ResourceIdentifier");
    }
}
