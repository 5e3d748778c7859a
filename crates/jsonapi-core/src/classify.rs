//! # Structural Classifiers
//!
//! Decide what a JSON object denotes in JSON:API terms using only its member
//! set. Three classifiers cooperate:
//!
//! - [`classify_data`] — resource vs resource identifier, for any object in
//!   a `data` position (primary data or relationship linkage).
//! - [`classify_document`] — the concrete document variant, from the
//!   top-level `data` and `errors` members.
//! - [`classify_relationship`] — to-one vs to-many, from a relationship
//!   object's `data` member.
//!
//! ## Wire Compatibility
//!
//! The member-count ladder in [`classify_data`] is reproduced exactly,
//! including two inherited ambiguities:
//!
//! - `{type, id, meta}` is always a resource identifier, although it could
//!   also be read as a resource without attributes, relationships or links.
//! - In a `data` array only the first element is classified; its answer is
//!   broadcast to the whole collection.
//!
//! Changing either rule would reclassify documents existing producers emit.

use serde_json::{Map, Value};

use crate::error::{StructuralError, StructuralErrorKind};
use crate::keywords::{DATA, ERRORS, ID, META, TYPE};
use crate::pointer::JsonPointer;
use crate::types::{json_type_name, DomDataType, DomDocumentType, DomRelationshipType};

/// Classify an object found in a `data` position.
///
/// Member names are compared case-sensitively. Never fails: shapes that are
/// neither a resource nor an identifier yield [`DomDataType::None`].
pub fn classify_data(object: &Map<String, Value>) -> DomDataType {
    let has_type = object.contains_key(TYPE);
    let data_type = match object.len() {
        0 => DomDataType::None,
        1 if has_type => DomDataType::Resource,
        1 => DomDataType::None,
        2 if has_type && object.contains_key(ID) => DomDataType::ResourceIdentifier,
        3 if has_type && object.contains_key(ID) && object.contains_key(META) => {
            DomDataType::ResourceIdentifier
        }
        _ if has_type => DomDataType::Resource,
        _ => DomDataType::None,
    };
    tracing::trace!(members = object.len(), %data_type, "classified data object");
    data_type
}

/// Classify an object in a position where a resource or identifier is
/// mandatory, failing with [`StructuralErrorKind::IllegalData`] otherwise.
pub fn classify_data_strict(
    object: &Map<String, Value>,
    pointer: &JsonPointer,
) -> Result<DomDataType, StructuralError> {
    match classify_data(object) {
        DomDataType::None => Err(StructuralError::new(
            pointer.clone(),
            StructuralErrorKind::IllegalData,
        )),
        data_type => Ok(data_type),
    }
}

/// Classify a top-level document object.
///
/// # Errors
///
/// Returns a [`StructuralError`] at the document root when `data` and
/// `errors` coexist, and at `/data` or `/errors` when those members have an
/// illegal shape.
pub fn classify_document(object: &Map<String, Value>) -> Result<DomDocumentType, StructuralError> {
    classify_document_at(object, &JsonPointer::root())
}

/// Classify a document object located at `pointer`.
///
/// Same rules as [`classify_document`]; error pointers are relative to
/// `pointer`.
pub fn classify_document_at(
    object: &Map<String, Value>,
    pointer: &JsonPointer,
) -> Result<DomDocumentType, StructuralError> {
    let data = object.get(DATA);
    let errors = object.get(ERRORS);

    let document_type = match (data, errors) {
        (Some(_), Some(_)) => {
            return Err(StructuralError::new(
                pointer.clone(),
                StructuralErrorKind::ConflictingTopLevelMembers,
            ));
        }
        (Some(data), None) => classify_primary_data(data, &pointer.member(DATA))?,
        (None, Some(Value::Array(_))) => DomDocumentType::ErrorsDocument,
        (None, Some(other)) => {
            return Err(StructuralError::new(
                pointer.member(ERRORS),
                StructuralErrorKind::ErrorsNotArray {
                    found: json_type_name(other),
                },
            ));
        }
        (None, None) => DomDocumentType::Document,
    };
    tracing::debug!(%document_type, "classified document");
    Ok(document_type)
}

fn classify_primary_data(
    data: &Value,
    pointer: &JsonPointer,
) -> Result<DomDocumentType, StructuralError> {
    match data {
        Value::Null => Ok(DomDocumentType::NullDocument),
        Value::Object(object) => match classify_data_strict(object, pointer)? {
            DomDataType::ResourceIdentifier => Ok(DomDocumentType::ResourceIdentifierDocument),
            _ => Ok(DomDocumentType::ResourceDocument),
        },
        Value::Array(items) => {
            // Only the first element governs the collection shape.
            let Some(first) = items.first() else {
                return Ok(DomDocumentType::EmptyDocument);
            };
            let first_pointer = pointer.index(0);
            let Value::Object(object) = first else {
                return Err(StructuralError::new(
                    first_pointer,
                    StructuralErrorKind::ExpectedObject {
                        member: DATA.to_string(),
                        found: json_type_name(first),
                    },
                ));
            };
            match classify_data_strict(object, &first_pointer)? {
                DomDataType::ResourceIdentifier => {
                    Ok(DomDocumentType::ResourceIdentifierCollectionDocument)
                }
                _ => Ok(DomDocumentType::ResourceCollectionDocument),
            }
        }
        other => Err(StructuralError::new(
            pointer.clone(),
            StructuralErrorKind::InvalidDataShape {
                found: json_type_name(other),
            },
        )),
    }
}

/// Classify a relationship object.
///
/// # Errors
///
/// Returns a [`StructuralError`] at `/data` when the linkage is a scalar.
pub fn classify_relationship(
    object: &Map<String, Value>,
) -> Result<DomRelationshipType, StructuralError> {
    classify_relationship_at(object, &JsonPointer::root())
}

/// Classify a relationship object located at `pointer`.
pub fn classify_relationship_at(
    object: &Map<String, Value>,
    pointer: &JsonPointer,
) -> Result<DomRelationshipType, StructuralError> {
    match object.get(DATA) {
        None => Ok(DomRelationshipType::Relationship),
        Some(Value::Null) | Some(Value::Object(_)) => Ok(DomRelationshipType::ToOneRelationship),
        Some(Value::Array(_)) => Ok(DomRelationshipType::ToManyRelationship),
        Some(other) => Err(StructuralError::new(
            pointer.member(DATA),
            StructuralErrorKind::InvalidRelationshipData {
                found: json_type_name(other),
            },
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    // ── Data shape ───────────────────────────────────────────────────

    #[test]
    fn test_data_empty_object_is_none() {
        assert_eq!(classify_data(&obj(json!({}))), DomDataType::None);
    }

    #[test]
    fn test_data_single_type_is_resource() {
        assert_eq!(classify_data(&obj(json!({"type": "articles"}))), DomDataType::Resource);
    }

    #[test]
    fn test_data_single_non_type_is_none() {
        assert_eq!(classify_data(&obj(json!({"id": "1"}))), DomDataType::None);
    }

    #[test]
    fn test_data_type_and_id_is_identifier() {
        assert_eq!(
            classify_data(&obj(json!({"type": "articles", "id": "1"}))),
            DomDataType::ResourceIdentifier
        );
        // Member order does not matter.
        assert_eq!(
            classify_data(&obj(json!({"id": "1", "type": "articles"}))),
            DomDataType::ResourceIdentifier
        );
    }

    #[test]
    fn test_data_type_and_other_is_resource() {
        assert_eq!(
            classify_data(&obj(json!({"type": "articles", "attributes": {}}))),
            DomDataType::Resource
        );
    }

    #[test]
    fn test_data_two_without_type_is_none() {
        assert_eq!(classify_data(&obj(json!({"id": "1", "meta": {}}))), DomDataType::None);
    }

    #[test]
    fn test_data_type_id_meta_prefers_identifier() {
        assert_eq!(
            classify_data(&obj(json!({"type": "articles", "id": "1", "meta": {}}))),
            DomDataType::ResourceIdentifier
        );
    }

    #[test]
    fn test_data_three_with_type_is_resource() {
        assert_eq!(
            classify_data(&obj(json!({"type": "articles", "id": "1", "links": {}}))),
            DomDataType::Resource
        );
    }

    #[test]
    fn test_data_three_without_type_is_none() {
        assert_eq!(
            classify_data(&obj(json!({"id": "1", "meta": {}, "links": {}}))),
            DomDataType::None
        );
    }

    #[test]
    fn test_data_four_members() {
        assert_eq!(
            classify_data(&obj(json!({
                "type": "articles", "id": "1", "meta": {}, "attributes": {}
            }))),
            DomDataType::Resource
        );
        assert_eq!(
            classify_data(&obj(json!({"a": 1, "b": 2, "c": 3, "d": 4}))),
            DomDataType::None
        );
    }

    #[test]
    fn test_data_member_names_case_sensitive() {
        assert_eq!(classify_data(&obj(json!({"Type": "articles"}))), DomDataType::None);
        assert_eq!(
            classify_data(&obj(json!({"type": "articles", "ID": "1"}))),
            DomDataType::Resource
        );
    }

    #[test]
    fn test_data_strict_rejects_none() {
        let err = classify_data_strict(&obj(json!({"id": "1"})), &JsonPointer::root().member("data"))
            .unwrap_err();
        assert_eq!(err.kind, StructuralErrorKind::IllegalData);
        assert_eq!(err.pointer.to_string(), "/data");
    }

    // ── Document shape ───────────────────────────────────────────────

    #[test]
    fn test_document_null_data() {
        assert_eq!(
            classify_document(&obj(json!({"data": null}))).unwrap(),
            DomDocumentType::NullDocument
        );
    }

    #[test]
    fn test_document_empty_array() {
        assert_eq!(
            classify_document(&obj(json!({"data": []}))).unwrap(),
            DomDocumentType::EmptyDocument
        );
    }

    #[test]
    fn test_document_single_resource() {
        assert_eq!(
            classify_document(&obj(json!({"data": {"type": "articles", "id": "1", "attributes": {}}})))
                .unwrap(),
            DomDocumentType::ResourceDocument
        );
    }

    #[test]
    fn test_document_single_identifier() {
        assert_eq!(
            classify_document(&obj(json!({"data": {"type": "articles", "id": "1"}}))).unwrap(),
            DomDocumentType::ResourceIdentifierDocument
        );
    }

    #[test]
    fn test_document_resource_collection() {
        assert_eq!(
            classify_document(&obj(json!({"data": [{"type": "articles", "id": "1", "attributes": {}}]})))
                .unwrap(),
            DomDocumentType::ResourceCollectionDocument
        );
    }

    #[test]
    fn test_document_identifier_collection() {
        assert_eq!(
            classify_document(&obj(json!({"data": [{"type": "tags", "id": "1"}, {"type": "tags", "id": "2"}]})))
                .unwrap(),
            DomDocumentType::ResourceIdentifierCollectionDocument
        );
    }

    #[test]
    fn test_document_first_element_governs() {
        // The second element alone would classify as a resource.
        let doc = obj(json!({"data": [
            {"type": "people", "id": "9"},
            {"type": "people", "id": "9", "notatype": "x"}
        ]}));
        assert_eq!(
            classify_document(&doc).unwrap(),
            DomDocumentType::ResourceIdentifierCollectionDocument
        );

        let doc = obj(json!({"data": [
            {"type": "people", "id": "9", "attributes": {}},
            {"type": "people", "id": "10"}
        ]}));
        assert_eq!(classify_document(&doc).unwrap(), DomDocumentType::ResourceCollectionDocument);
    }

    #[test]
    fn test_document_data_and_errors_conflict() {
        let err = classify_document(&obj(json!({"data": {"type": "a"}, "errors": []}))).unwrap_err();
        assert_eq!(err.kind, StructuralErrorKind::ConflictingTopLevelMembers);
        assert!(err.pointer.is_root());
    }

    #[test]
    fn test_document_illegal_data_object() {
        let err = classify_document(&obj(json!({"data": {"id": "1"}}))).unwrap_err();
        assert_eq!(err.kind, StructuralErrorKind::IllegalData);
        assert_eq!(err.pointer.to_string(), "/data");
    }

    #[test]
    fn test_document_illegal_first_element() {
        let err = classify_document(&obj(json!({"data": [{"id": "1"}]}))).unwrap_err();
        assert_eq!(err.kind, StructuralErrorKind::IllegalData);
        assert_eq!(err.pointer.to_string(), "/data/0");

        let err = classify_document(&obj(json!({"data": [42]}))).unwrap_err();
        assert!(matches!(err.kind, StructuralErrorKind::ExpectedObject { .. }));
    }

    #[test]
    fn test_document_scalar_data() {
        let err = classify_document(&obj(json!({"data": "articles"}))).unwrap_err();
        assert_eq!(err.kind, StructuralErrorKind::InvalidDataShape { found: "string" });
    }

    #[test]
    fn test_document_errors() {
        assert_eq!(
            classify_document(&obj(json!({"errors": [{"status": "404"}]}))).unwrap(),
            DomDocumentType::ErrorsDocument
        );
        let err = classify_document(&obj(json!({"errors": {"status": "404"}}))).unwrap_err();
        assert_eq!(err.kind, StructuralErrorKind::ErrorsNotArray { found: "object" });
        assert_eq!(err.pointer.to_string(), "/errors");
    }

    #[test]
    fn test_document_meta_only() {
        assert_eq!(
            classify_document(&obj(json!({"meta": {"total": 0}}))).unwrap(),
            DomDocumentType::Document
        );
        assert_eq!(classify_document(&obj(json!({}))).unwrap(), DomDocumentType::Document);
    }

    // ── Relationship shape ───────────────────────────────────────────

    #[test]
    fn test_relationship_without_data() {
        assert_eq!(
            classify_relationship(&obj(json!({"links": {"related": "/x"}}))).unwrap(),
            DomRelationshipType::Relationship
        );
    }

    #[test]
    fn test_relationship_to_one() {
        assert_eq!(
            classify_relationship(&obj(json!({"data": null}))).unwrap(),
            DomRelationshipType::ToOneRelationship
        );
        assert_eq!(
            classify_relationship(&obj(json!({"data": {"type": "people", "id": "9"}}))).unwrap(),
            DomRelationshipType::ToOneRelationship
        );
    }

    #[test]
    fn test_relationship_to_many() {
        assert_eq!(
            classify_relationship(&obj(json!({"data": []}))).unwrap(),
            DomRelationshipType::ToManyRelationship
        );
    }

    #[test]
    fn test_relationship_scalar_data() {
        let pointer = JsonPointer::root().member("relationships").member("author");
        let err = classify_relationship_at(&obj(json!({"data": 7})), &pointer).unwrap_err();
        assert_eq!(err.pointer.to_string(), "/relationships/author/data");
        assert_eq!(err.kind, StructuralErrorKind::InvalidRelationshipData { found: "number" });
    }
}
