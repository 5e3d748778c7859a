//! # DOM Document
//!
//! The root of a built tree, with accessors for the top-level members and
//! the entry points that turn JSON into a tree and back.

use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

use jsonapi_core::keywords::{DATA, ERRORS, INCLUDED, JSONAPI, LINKS, META};
use jsonapi_core::{DomDocumentType, DomSettings, StructuralErrors};

use crate::builder::DomBuilder;
use crate::node::{DomNode, NodeData, ObjectKind};
use crate::resource::DomResource;

/// Failure to turn JSON text into a DOM document.
#[derive(Error, Debug)]
pub enum DomParseError {
    /// The text is not valid JSON.
    #[error("invalid JSON at line {line}, column {column}: {err}", line = .0.line(), column = .0.column(), err = .0)]
    Json(#[from] serde_json::Error),

    /// The JSON is not a structurally valid JSON:API document.
    #[error("invalid JSON:API document:\n{0}")]
    Structural(#[from] StructuralErrors),
}

/// A JSON:API document as a typed tree.
#[derive(Debug, Clone, PartialEq)]
pub struct DomDocument {
    root: DomNode,
}

impl DomDocument {
    pub(crate) fn from_root(root: DomNode) -> Self {
        Self { root }
    }

    /// Build a tree from parsed JSON, failing if any structural error was
    /// found. Use [`DomBuilder::build`] to keep the partial tree.
    ///
    /// # Errors
    ///
    /// Returns every structural error in document order.
    pub fn parse(value: &Value) -> Result<Self, StructuralErrors> {
        DomBuilder::build(value).into_result()
    }

    /// The document classification.
    pub fn document_type(&self) -> DomDocumentType {
        match self.root.data() {
            NodeData::Document { document_type } => *document_type,
            _ => DomDocumentType::Document,
        }
    }

    /// The document root node.
    pub fn root(&self) -> &DomNode {
        &self.root
    }

    /// Consume the document, returning its root node.
    pub fn into_root(self) -> DomNode {
        self.root
    }

    /// The value of the top-level `data` member.
    pub fn primary_data(&self) -> Option<&DomNode> {
        self.root.member(DATA)
    }

    /// Primary resources or identifiers, whether `data` is single or a
    /// collection. Empty for null and empty documents.
    pub fn primary_resources(&self) -> Vec<DomResource<'_>> {
        let Some(data) = self.primary_data() else {
            return Vec::new();
        };
        if self.document_type().is_collection() {
            data.items().filter_map(DomResource::new).collect()
        } else {
            DomResource::new(data).into_iter().collect()
        }
    }

    /// Resources in the top-level `included` member.
    pub fn included(&self) -> Vec<DomResource<'_>> {
        self.root
            .member(INCLUDED)
            .map(|included| included.items().filter_map(DomResource::new).collect())
            .unwrap_or_default()
    }

    /// Error object nodes of an errors document.
    pub fn errors(&self) -> impl Iterator<Item = &DomNode> {
        self.root
            .member(ERRORS)
            .into_iter()
            .flat_map(|errors| errors.items())
            .filter(|node| node.object_kind() == Some(ObjectKind::Error))
    }

    /// The top-level `meta` object node.
    pub fn meta(&self) -> Option<&DomNode> {
        self.root.member(META)
    }

    /// The top-level `links` object node.
    pub fn links(&self) -> Option<&DomNode> {
        self.root.member(LINKS)
    }

    /// The top-level `jsonapi` object node.
    pub fn jsonapi(&self) -> Option<&DomNode> {
        self.root.member(JSONAPI)
    }

    /// Serialize using the process-wide default settings.
    pub fn to_value(&self) -> Value {
        self.root.to_value()
    }

    /// Serialize using explicit settings.
    pub fn to_value_with(&self, settings: &DomSettings) -> Value {
        self.root.to_value_with(settings)
    }

    /// Serialize to pretty-printed JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error only if `serde_json` fails to write the tree.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_value())
    }
}

impl FromStr for DomDocument {
    type Err = DomParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::parse(&value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_and_round_trip() {
        let value = json!({
            "jsonapi": {"version": "1.1"},
            "data": [
                {"type": "articles", "id": "1", "attributes": {"title": "A"}},
                {"type": "articles", "id": "2", "attributes": {"title": "B"}}
            ],
            "included": [{"type": "people", "id": "9", "attributes": {"name": "Dan"}}],
            "meta": {"total": 2}
        });
        let doc = DomDocument::parse(&value).unwrap();
        assert_eq!(doc.document_type(), DomDocumentType::ResourceCollectionDocument);
        assert_eq!(doc.primary_resources().len(), 2);
        assert_eq!(doc.included().len(), 1);
        assert_eq!(doc.to_value_with(&DomSettings::default()), value);
    }

    #[test]
    fn test_from_str_json_error_has_position() {
        let err = "{\n  \"data\": ".parse::<DomDocument>().unwrap_err();
        match &err {
            DomParseError::Json(e) => assert_eq!(e.line(), 2),
            other => panic!("expected JSON error, got {other:?}"),
        }
        assert!(err.to_string().starts_with("invalid JSON at line 2"));
    }

    #[test]
    fn test_from_str_structural_errors() {
        let err = r#"{"data": 5}"#.parse::<DomDocument>().unwrap_err();
        let DomParseError::Structural(errors) = err else {
            panic!("expected structural errors");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].pointer.to_string(), "/data");
    }

    #[test]
    fn test_null_and_empty_documents_have_no_resources() {
        let null = DomDocument::parse(&json!({"data": null})).unwrap();
        assert_eq!(null.document_type(), DomDocumentType::NullDocument);
        assert!(null.primary_resources().is_empty());
        assert_eq!(null.to_value_with(&DomSettings::default()), json!({"data": null}));

        let empty = DomDocument::parse(&json!({"data": []})).unwrap();
        assert_eq!(empty.document_type(), DomDocumentType::EmptyDocument);
        assert!(empty.primary_resources().is_empty());
    }

    #[test]
    fn test_errors_iterator() {
        let doc = DomDocument::parse(&json!({"errors": [{"status": "404"}, {"status": "409"}]})).unwrap();
        assert_eq!(doc.errors().count(), 2);
        assert_eq!(doc.to_json_string().unwrap().lines().count(), 10);
    }
}
