//! Read-only view over a resource or resource identifier node.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use jsonapi_core::keywords::{ATTRIBUTES, ID, LINKS, META, RELATIONSHIPS, TYPE};
use jsonapi_core::{DomSettings, Links, Meta, Relationship, Relationships, ResourceIdentifier};

use crate::node::{DomNode, ObjectKind};

/// Borrowed view of a resource object in a DOM tree.
///
/// Nested members are decoded through `serde` on demand. Decoding always
/// uses [`DomSettings::default`] so explicit nulls stay visible to readers.
#[derive(Debug, Clone, Copy)]
pub struct DomResource<'a> {
    node: &'a DomNode,
}

impl<'a> DomResource<'a> {
    /// View `node` as a resource. `None` unless it is a resource or
    /// resource identifier object.
    pub fn new(node: &'a DomNode) -> Option<Self> {
        match node.object_kind() {
            Some(ObjectKind::Resource | ObjectKind::ResourceIdentifier) => Some(Self { node }),
            _ => None,
        }
    }

    /// The underlying node.
    pub fn node(&self) -> &'a DomNode {
        self.node
    }

    /// Whether the node is a bare resource identifier.
    pub fn is_identifier(&self) -> bool {
        self.node.object_kind() == Some(ObjectKind::ResourceIdentifier)
    }

    /// The `type` member.
    pub fn api_type(&self) -> Option<&'a str> {
        self.node.member(TYPE).and_then(DomNode::as_str)
    }

    /// The `id` member; absent for singletons and client-generated creates.
    pub fn id(&self) -> Option<&'a str> {
        self.node.member(ID).and_then(DomNode::as_str)
    }

    /// `{type, id}` of this resource, if it has both.
    pub fn identifier(&self) -> Option<ResourceIdentifier> {
        Some(ResourceIdentifier::new(self.api_type()?, self.id()?))
    }

    /// One attribute value.
    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.node
            .member(ATTRIBUTES)?
            .member(name)
            .map(|value| value.to_value_with(&DomSettings::default()))
    }

    /// All attributes in member order; empty when there are none.
    pub fn attributes(&self) -> Map<String, Value> {
        match self.node.member(ATTRIBUTES).map(|a| a.to_value_with(&DomSettings::default())) {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// The `relationships` member, empty when absent.
    ///
    /// # Errors
    ///
    /// Fails if a relationship does not decode into [`Relationship`].
    pub fn relationships(&self) -> Result<Relationships, serde_json::Error> {
        Ok(self.decode(RELATIONSHIPS)?.unwrap_or_default())
    }

    /// One relationship by name.
    ///
    /// # Errors
    ///
    /// Fails if the relationship does not decode into [`Relationship`].
    pub fn relationship(&self, name: &str) -> Result<Option<Relationship>, serde_json::Error> {
        match self.node.member(RELATIONSHIPS).and_then(|rels| rels.member(name)) {
            Some(node) => serde_json::from_value(node.to_value_with(&DomSettings::default())).map(Some),
            None => Ok(None),
        }
    }

    /// The resource-level `links` member.
    ///
    /// # Errors
    ///
    /// Fails if the links do not decode into [`Links`].
    pub fn links(&self) -> Result<Option<Links>, serde_json::Error> {
        self.decode(LINKS)
    }

    /// The resource-level `meta` member.
    ///
    /// # Errors
    ///
    /// Fails if the member does not decode into [`Meta`].
    pub fn meta(&self) -> Result<Option<Meta>, serde_json::Error> {
        self.decode(META)
    }

    fn decode<T: DeserializeOwned>(&self, member: &str) -> Result<Option<T>, serde_json::Error> {
        match self.node.member(member).map(|node| node.to_value_with(&DomSettings::default())) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value).map(Some),
        }
    }
}
