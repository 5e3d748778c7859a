//! # DOM Builder
//!
//! Depth-first construction of a [`DomDocument`] from a generic JSON tree.
//!
//! The classifiers from `jsonapi-core` run at every decision point: the
//! document root, every `data` occurrence, and every relationship object.
//! Violations are recorded in a [`StructuralErrors`] list together with a
//! JSON pointer to the offending member, and the walk continues. A member
//! whose shape is wrong is kept in the tree as free-form JSON so the caller
//! still gets a complete (if partially unclassified) tree.
//!
//! Members JSON:API does not define at a position are preserved as
//! [`ApiPropertyType::Unknown`] properties without an error.

use serde_json::{Map, Value};

use jsonapi_core::keywords::{
    ATTRIBUTES, DATA, ERRORS, HREF, ID, INCLUDED, JSONAPI, LINKS, META, RELATIONSHIPS, TYPE,
    VERSION,
};
use jsonapi_core::{
    classify_data, classify_document_at, classify_relationship_at, json_type_name,
    ApiPropertyType, DomDataType, DomDocumentType, DomRelationshipType, JsonPointer,
    StructuralError, StructuralErrorKind, StructuralErrors,
};

use crate::document::DomDocument;
use crate::node::{
    DomNode, ObjectKind, ScalarValue, ATTR_API_ID, ATTR_API_TYPE, ATTR_RELATIONSHIP_TYPE,
};

/// A built tree together with every structural error found while building.
#[derive(Debug, Clone)]
pub struct DomBuildOutput {
    /// The tree; complete even when errors were found.
    pub document: DomDocument,
    /// Errors in document order.
    pub errors: StructuralErrors,
}

impl DomBuildOutput {
    /// The tree if no errors were found.
    ///
    /// # Errors
    ///
    /// Returns all accumulated errors otherwise.
    pub fn into_result(self) -> Result<DomDocument, StructuralErrors> {
        if self.errors.is_empty() {
            Ok(self.document)
        } else {
            Err(self.errors)
        }
    }
}

/// Walks a JSON tree and builds the DOM, accumulating structural errors.
#[derive(Debug, Default)]
pub struct DomBuilder {
    errors: StructuralErrors,
}

impl DomBuilder {
    /// Build the DOM for a document.
    pub fn build(value: &Value) -> DomBuildOutput {
        let mut builder = DomBuilder::default();
        let root = match value {
            Value::Object(map) => builder.document(map),
            other => {
                builder.error(
                    JsonPointer::root(),
                    StructuralErrorKind::RootNotObject {
                        found: json_type_name(other),
                    },
                );
                DomNode::document(DomDocumentType::Document)
            }
        };
        tracing::debug!(errors = builder.errors.len(), "built document tree");
        DomBuildOutput {
            document: DomDocument::from_root(root),
            errors: builder.errors,
        }
    }

    fn error(&mut self, pointer: JsonPointer, kind: StructuralErrorKind) {
        self.errors.push(StructuralError::new(pointer, kind));
    }

    fn push_error(&mut self, error: StructuralError) {
        self.errors.push(error);
    }

    // ── Document ─────────────────────────────────────────────────────

    fn document(&mut self, map: &Map<String, Value>) -> DomNode {
        let root_pointer = JsonPointer::root();
        let classified = match classify_document_at(map, &root_pointer) {
            Ok(document_type) => Some(document_type),
            Err(e) => {
                self.push_error(e);
                None
            }
        };
        let mut root = DomNode::document(classified.unwrap_or(DomDocumentType::Document));

        for (name, value) in map {
            let pointer = root_pointer.member(name);
            let property = match name.as_str() {
                DATA => {
                    let node = match classified {
                        Some(document_type) => self.primary_data(value, document_type, &pointer),
                        None => DomNode::from_json(value),
                    };
                    DomNode::property(ApiPropertyType::Data, DATA, node)
                }
                ERRORS => {
                    let node = match classified {
                        Some(DomDocumentType::ErrorsDocument) => self.errors_array(value, &pointer),
                        _ => DomNode::from_json(value),
                    };
                    DomNode::property(ApiPropertyType::Errors, ERRORS, node)
                }
                INCLUDED => {
                    if !map.contains_key(DATA) {
                        self.error(pointer.clone(), StructuralErrorKind::IncludedWithoutData);
                    }
                    let node = self.included(value, &pointer);
                    DomNode::property(ApiPropertyType::Included, INCLUDED, node)
                }
                META => DomNode::property(ApiPropertyType::Meta, META, self.meta(value, &pointer)),
                LINKS => DomNode::property(ApiPropertyType::Links, LINKS, self.links(value, &pointer)),
                JSONAPI => DomNode::property(
                    ApiPropertyType::JsonApi,
                    JSONAPI,
                    self.jsonapi(value, &pointer),
                ),
                _ => DomNode::property(ApiPropertyType::Unknown, name.clone(), DomNode::from_json(value)),
            };
            root.push_child(property);
        }
        root
    }

    fn primary_data(
        &mut self,
        value: &Value,
        document_type: DomDocumentType,
        pointer: &JsonPointer,
    ) -> DomNode {
        match (document_type, value) {
            (DomDocumentType::ResourceDocument, Value::Object(map)) => self.resource(map, pointer),
            (DomDocumentType::ResourceIdentifierDocument, Value::Object(map)) => {
                self.identifier(map, pointer)
            }
            (DomDocumentType::ResourceCollectionDocument, Value::Array(items)) => {
                self.collection(items, pointer, DomDataType::Resource)
            }
            (DomDocumentType::ResourceIdentifierCollectionDocument, Value::Array(items)) => {
                self.collection(items, pointer, DomDataType::ResourceIdentifier)
            }
            _ => DomNode::from_json(value),
        }
    }

    /// Build every element with the shape the first element was given.
    fn collection(&mut self, items: &[Value], pointer: &JsonPointer, shape: DomDataType) -> DomNode {
        let nodes: Vec<DomNode> = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let item_pointer = pointer.index(i);
                match item {
                    Value::Object(map) if shape == DomDataType::ResourceIdentifier => {
                        self.identifier(map, &item_pointer)
                    }
                    Value::Object(map) => self.resource(map, &item_pointer),
                    other => {
                        self.error(
                            item_pointer,
                            StructuralErrorKind::ExpectedObject {
                                member: DATA.to_string(),
                                found: json_type_name(other),
                            },
                        );
                        DomNode::from_json(other)
                    }
                }
            })
            .collect();
        DomNode::array(nodes)
    }

    // ── Resources ────────────────────────────────────────────────────

    fn resource(&mut self, map: &Map<String, Value>, pointer: &JsonPointer) -> DomNode {
        let mut node = DomNode::object(ObjectKind::Resource);
        for (name, value) in map {
            let member_pointer = pointer.member(name);
            let property = match name.as_str() {
                TYPE => self.string_member(ApiPropertyType::Type, TYPE, value, &member_pointer),
                ID => self.string_member(ApiPropertyType::Id, ID, value, &member_pointer),
                ATTRIBUTES => DomNode::property(
                    ApiPropertyType::Attributes,
                    ATTRIBUTES,
                    self.attributes(value, &member_pointer),
                ),
                RELATIONSHIPS => DomNode::property(
                    ApiPropertyType::Relationships,
                    RELATIONSHIPS,
                    self.relationships(value, &member_pointer),
                ),
                LINKS => DomNode::property(
                    ApiPropertyType::Links,
                    LINKS,
                    self.links(value, &member_pointer),
                ),
                META => DomNode::property(ApiPropertyType::Meta, META, self.meta(value, &member_pointer)),
                _ => DomNode::property(ApiPropertyType::Unknown, name.clone(), DomNode::from_json(value)),
            };
            node.push_child(property);
        }
        self.require_members(map, &[TYPE], pointer);
        capture_identity(&mut node, map);
        node
    }

    fn identifier(&mut self, map: &Map<String, Value>, pointer: &JsonPointer) -> DomNode {
        let mut node = DomNode::object(ObjectKind::ResourceIdentifier);
        for (name, value) in map {
            let member_pointer = pointer.member(name);
            let property = match name.as_str() {
                TYPE => self.string_member(ApiPropertyType::Type, TYPE, value, &member_pointer),
                ID => self.string_member(ApiPropertyType::Id, ID, value, &member_pointer),
                META => DomNode::property(ApiPropertyType::Meta, META, self.meta(value, &member_pointer)),
                _ => DomNode::property(ApiPropertyType::Unknown, name.clone(), DomNode::from_json(value)),
            };
            node.push_child(property);
        }
        self.require_members(map, &[TYPE, ID], pointer);
        capture_identity(&mut node, map);
        node
    }

    /// Collection elements past the first are never classified, so their
    /// identity members are checked here.
    fn require_members(&mut self, map: &Map<String, Value>, members: &[&str], pointer: &JsonPointer) {
        for member in members {
            if !map.contains_key(*member) {
                self.error(
                    pointer.member(member),
                    StructuralErrorKind::MissingMember {
                        member: (*member).to_string(),
                    },
                );
            }
        }
    }

    fn string_member(
        &mut self,
        api_type: ApiPropertyType,
        name: &str,
        value: &Value,
        pointer: &JsonPointer,
    ) -> DomNode {
        if !value.is_string() {
            self.error(
                pointer.clone(),
                StructuralErrorKind::ExpectedString {
                    member: name.to_string(),
                    found: json_type_name(value),
                },
            );
        }
        DomNode::property(api_type, name, DomNode::from_json(value))
    }

    fn attributes(&mut self, value: &Value, pointer: &JsonPointer) -> DomNode {
        let Value::Object(map) = value else {
            return self.expected_object(ATTRIBUTES, value, pointer);
        };
        let mut node = DomNode::object(ObjectKind::Attributes);
        for (name, member) in map {
            node.push_child(DomNode::property(
                ApiPropertyType::Attribute,
                name.clone(),
                DomNode::from_json(member),
            ));
        }
        node
    }

    // ── Relationships ────────────────────────────────────────────────

    fn relationships(&mut self, value: &Value, pointer: &JsonPointer) -> DomNode {
        let Value::Object(map) = value else {
            return self.expected_object(RELATIONSHIPS, value, pointer);
        };
        let mut node = DomNode::object(ObjectKind::Relationships);
        for (name, member) in map {
            let rel = self.relationship(name, member, &pointer.member(name));
            node.push_child(DomNode::property(ApiPropertyType::Relationship, name.clone(), rel));
        }
        node
    }

    fn relationship(&mut self, name: &str, value: &Value, pointer: &JsonPointer) -> DomNode {
        let Value::Object(map) = value else {
            return self.expected_object(name, value, pointer);
        };
        let relationship_type = match classify_relationship_at(map, pointer) {
            Ok(t) => Some(t),
            Err(e) => {
                self.push_error(e);
                None
            }
        };
        let kind = ObjectKind::Relationship(relationship_type.unwrap_or(DomRelationshipType::Relationship));
        let mut node = DomNode::object(kind);
        if let Some(t) = relationship_type {
            node.set_attribute(ATTR_RELATIONSHIP_TYPE, t.to_string());
        }
        for (member, member_value) in map {
            let member_pointer = pointer.member(member);
            let property = match member.as_str() {
                DATA => {
                    let linkage = match relationship_type {
                        Some(_) => self.linkage(member_value, &member_pointer),
                        None => DomNode::from_json(member_value),
                    };
                    DomNode::property(ApiPropertyType::Data, DATA, linkage)
                }
                LINKS => DomNode::property(
                    ApiPropertyType::Links,
                    LINKS,
                    self.links(member_value, &member_pointer),
                ),
                META => DomNode::property(
                    ApiPropertyType::Meta,
                    META,
                    self.meta(member_value, &member_pointer),
                ),
                _ => DomNode::property(
                    ApiPropertyType::Unknown,
                    member.clone(),
                    DomNode::from_json(member_value),
                ),
            };
            node.push_child(property);
        }
        node
    }

    fn linkage(&mut self, value: &Value, pointer: &JsonPointer) -> DomNode {
        match value {
            Value::Array(items) => {
                let nodes: Vec<DomNode> = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.linkage_identifier(item, &pointer.index(i)))
                    .collect();
                DomNode::array(nodes)
            }
            Value::Null => DomNode::null(),
            other => self.linkage_identifier(other, pointer),
        }
    }

    fn linkage_identifier(&mut self, value: &Value, pointer: &JsonPointer) -> DomNode {
        match value {
            Value::Object(map) if classify_data(map) == DomDataType::ResourceIdentifier => {
                self.identifier(map, pointer)
            }
            other => {
                self.error(pointer.clone(), StructuralErrorKind::ExpectedResourceIdentifier);
                DomNode::from_json(other)
            }
        }
    }

    // ── Links, meta, jsonapi ─────────────────────────────────────────

    fn links(&mut self, value: &Value, pointer: &JsonPointer) -> DomNode {
        let map = match value {
            Value::Object(map) => map,
            Value::Null => return DomNode::null(),
            other => return self.expected_object(LINKS, other, pointer),
        };
        let mut node = DomNode::object(ObjectKind::Links);
        for (rel, link) in map {
            let link_node = self.link(link, &pointer.member(rel));
            node.push_child(DomNode::property(ApiPropertyType::Link, rel.clone(), link_node));
        }
        node
    }

    fn link(&mut self, value: &Value, pointer: &JsonPointer) -> DomNode {
        match value {
            Value::String(href) => DomNode::value(ScalarValue::String(href.clone())),
            Value::Null => DomNode::null(),
            Value::Object(map) if map.get(HREF).is_some_and(Value::is_string) => {
                let mut node = DomNode::object(ObjectKind::Link);
                for (name, member) in map {
                    let property = match name.as_str() {
                        HREF => DomNode::property(ApiPropertyType::Href, HREF, DomNode::from_json(member)),
                        META => DomNode::property(
                            ApiPropertyType::Meta,
                            META,
                            self.meta(member, &pointer.member(META)),
                        ),
                        _ => DomNode::property(ApiPropertyType::Member, name.clone(), DomNode::from_json(member)),
                    };
                    node.push_child(property);
                }
                node
            }
            other => {
                self.error(
                    pointer.clone(),
                    StructuralErrorKind::InvalidLink {
                        found: json_type_name(other),
                    },
                );
                DomNode::from_json(other)
            }
        }
    }

    fn meta(&mut self, value: &Value, pointer: &JsonPointer) -> DomNode {
        match value {
            Value::Object(map) => {
                let mut node = DomNode::object(ObjectKind::Meta);
                for (name, member) in map {
                    node.push_child(DomNode::property(
                        ApiPropertyType::Member,
                        name.clone(),
                        DomNode::from_json(member),
                    ));
                }
                node
            }
            Value::Null => DomNode::null(),
            other => self.expected_object(META, other, pointer),
        }
    }

    fn jsonapi(&mut self, value: &Value, pointer: &JsonPointer) -> DomNode {
        let Value::Object(map) = value else {
            return self.expected_object(JSONAPI, value, pointer);
        };
        let mut node = DomNode::object(ObjectKind::JsonApi);
        for (name, member) in map {
            let member_pointer = pointer.member(name);
            let property = match name.as_str() {
                VERSION => self.string_member(ApiPropertyType::Version, VERSION, member, &member_pointer),
                META => DomNode::property(ApiPropertyType::Meta, META, self.meta(member, &member_pointer)),
                _ => DomNode::property(ApiPropertyType::Member, name.clone(), DomNode::from_json(member)),
            };
            node.push_child(property);
        }
        node
    }

    // ── Errors and included ──────────────────────────────────────────

    fn errors_array(&mut self, value: &Value, pointer: &JsonPointer) -> DomNode {
        let Value::Array(items) = value else {
            return DomNode::from_json(value);
        };
        let nodes: Vec<DomNode> = items
            .iter()
            .enumerate()
            .map(|(i, item)| self.error_object(item, &pointer.index(i)))
            .collect();
        DomNode::array(nodes)
    }

    fn error_object(&mut self, value: &Value, pointer: &JsonPointer) -> DomNode {
        let Value::Object(map) = value else {
            return self.expected_object(ERRORS, value, pointer);
        };
        let mut node = DomNode::object(ObjectKind::Error);
        for (name, member) in map {
            let member_pointer = pointer.member(name);
            let property = match name.as_str() {
                LINKS => DomNode::property(ApiPropertyType::Links, LINKS, self.links(member, &member_pointer)),
                META => DomNode::property(ApiPropertyType::Meta, META, self.meta(member, &member_pointer)),
                _ => DomNode::property(ApiPropertyType::Member, name.clone(), DomNode::from_json(member)),
            };
            node.push_child(property);
        }
        node
    }

    fn included(&mut self, value: &Value, pointer: &JsonPointer) -> DomNode {
        let Value::Array(items) = value else {
            self.error(
                pointer.clone(),
                StructuralErrorKind::ExpectedArray {
                    member: INCLUDED.to_string(),
                    found: json_type_name(value),
                },
            );
            return DomNode::from_json(value);
        };
        let nodes: Vec<DomNode> = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let item_pointer = pointer.index(i);
                match item {
                    // In `included` only full resources are legal, so a
                    // bare {type, id} is still read as a resource.
                    Value::Object(map) if map.contains_key(TYPE) => self.resource(map, &item_pointer),
                    other => {
                        self.error(item_pointer, StructuralErrorKind::ExpectedResource);
                        DomNode::from_json(other)
                    }
                }
            })
            .collect();
        DomNode::array(nodes)
    }

    fn expected_object(&mut self, member: &str, value: &Value, pointer: &JsonPointer) -> DomNode {
        self.error(
            pointer.clone(),
            StructuralErrorKind::ExpectedObject {
                member: member.to_string(),
                found: json_type_name(value),
            },
        );
        DomNode::from_json(value)
    }
}

fn capture_identity(node: &mut DomNode, map: &Map<String, Value>) {
    if let Some(api_type) = map.get(TYPE).and_then(Value::as_str) {
        node.set_attribute(ATTR_API_TYPE, api_type);
    }
    if let Some(id) = map.get(ID).and_then(Value::as_str) {
        node.set_attribute(ATTR_API_ID, id);
    }
}
