//! # Resource Linkage
//!
//! Resource identifiers and the relationship objects that carry them.
//!
//! A relationship's `data` member has three observable states: absent,
//! `null`, and present. `Relationship::data` models them as `None`,
//! `Some(Linkage::ToOne(None))`, and `Some(..)` respectively, so a null
//! to-one linkage survives a read/write cycle.

use std::fmt;

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::links::{Links, Meta};
use crate::types::DomRelationshipType;

/// A `{type, id[, meta]}` reference to a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    /// API type name.
    #[serde(rename = "type")]
    pub api_type: String,
    /// Resource id, opaque on the wire.
    pub id: String,
    /// Non-standard information about the reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl ResourceIdentifier {
    /// An identifier without meta.
    pub fn new(api_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            api_type: api_type.into(),
            id: id.into(),
            meta: None,
        }
    }

    /// Whether this identifier names the same resource as `other`,
    /// ignoring meta.
    pub fn same_identity(&self, other: &ResourceIdentifier) -> bool {
        self.api_type == other.api_type && self.id == other.id
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.api_type, self.id)
    }
}

/// The `data` member of a relationship object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Linkage {
    /// An array of identifiers (possibly empty).
    ToMany(Vec<ResourceIdentifier>),
    /// `null` or a single identifier.
    ToOne(Option<ResourceIdentifier>),
}

impl Linkage {
    /// A to-one linkage to `identifier`.
    pub fn to_one(identifier: ResourceIdentifier) -> Self {
        Self::ToOne(Some(identifier))
    }

    /// An empty to-one linkage (`null`).
    pub fn null() -> Self {
        Self::ToOne(None)
    }

    /// A to-many linkage.
    pub fn to_many(identifiers: impl IntoIterator<Item = ResourceIdentifier>) -> Self {
        Self::ToMany(identifiers.into_iter().collect())
    }

    /// The relationship cardinality this linkage expresses.
    pub fn relationship_type(&self) -> DomRelationshipType {
        match self {
            Self::ToOne(_) => DomRelationshipType::ToOneRelationship,
            Self::ToMany(_) => DomRelationshipType::ToManyRelationship,
        }
    }

    /// All identifiers in the linkage, in order.
    pub fn identifiers(&self) -> Vec<&ResourceIdentifier> {
        match self {
            Self::ToOne(one) => one.iter().collect(),
            Self::ToMany(many) => many.iter().collect(),
        }
    }
}

/// A relationship object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// `self` and `related` links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    /// Resource linkage; `Some(Linkage::ToOne(None))` is an explicit null.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    pub data: Option<Linkage>,
    /// Non-standard information about the relationship.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

fn deserialize_present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Linkage>, D::Error> {
    Linkage::deserialize(deserializer).map(Some)
}

impl Relationship {
    /// A relationship carrying only linkage.
    pub fn from_linkage(linkage: Linkage) -> Self {
        Self {
            links: None,
            data: Some(linkage),
            meta: None,
        }
    }

    /// The cardinality this relationship object expresses.
    pub fn relationship_type(&self) -> DomRelationshipType {
        self.data
            .as_ref()
            .map_or(DomRelationshipType::Relationship, Linkage::relationship_type)
    }
}

/// A `relationships` object, in member order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Relationships {
    entries: Vec<(String, Relationship)>,
}

impl Relationships {
    /// An empty relationships object.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Add or replace a relationship, builder style.
    pub fn with(mut self, rel: impl Into<String>, relationship: Relationship) -> Self {
        self.insert(rel, relationship);
        self
    }

    /// Add or replace a relationship.
    pub fn insert(&mut self, rel: impl Into<String>, relationship: Relationship) {
        let rel = rel.into();
        match self.entries.iter_mut().find(|(name, _)| *name == rel) {
            Some(entry) => entry.1 = relationship,
            None => self.entries.push((rel, relationship)),
        }
    }

    /// Look up a relationship by name.
    pub fn get(&self, rel: &str) -> Option<&Relationship> {
        self.entries.iter().find(|(name, _)| name == rel).map(|(_, r)| r)
    }

    /// Mutable lookup by name.
    pub fn get_mut(&mut self, rel: &str) -> Option<&mut Relationship> {
        self.entries.iter_mut().find(|(name, _)| name == rel).map(|(_, r)| r)
    }

    /// Whether there are no relationships.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate relationships in member order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Relationship)> {
        self.entries.iter().map(|(name, r)| (name.as_str(), r))
    }
}

impl Serialize for Relationships {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (rel, relationship) in &self.entries {
            map.serialize_entry(rel, relationship)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Relationships {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        let mut relationships = Relationships::new();
        for (rel, value) in map {
            let relationship: Relationship =
                serde_json::from_value(value).map_err(D::Error::custom)?;
            relationships.insert(rel, relationship);
        }
        Ok(relationships)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identifier_serde() {
        let id = ResourceIdentifier::new("people", "9");
        assert_eq!(serde_json::to_value(&id).unwrap(), json!({"type": "people", "id": "9"}));
        assert_eq!(id.to_string(), "people:9");
    }

    #[test]
    fn test_linkage_shapes() {
        let one: Linkage = serde_json::from_value(json!({"type": "people", "id": "9"})).unwrap();
        assert_eq!(one, Linkage::to_one(ResourceIdentifier::new("people", "9")));
        let none: Linkage = serde_json::from_value(json!(null)).unwrap();
        assert_eq!(none, Linkage::null());
        let many: Linkage = serde_json::from_value(json!([{"type": "tags", "id": "1"}])).unwrap();
        assert_eq!(many.relationship_type(), DomRelationshipType::ToManyRelationship);
        assert_eq!(many.identifiers().len(), 1);
        let empty: Linkage = serde_json::from_value(json!([])).unwrap();
        assert_eq!(empty, Linkage::ToMany(vec![]));
    }

    #[test]
    fn test_relationship_null_data_is_preserved() {
        let rel: Relationship = serde_json::from_value(json!({"data": null})).unwrap();
        assert_eq!(rel.data, Some(Linkage::null()));
        assert_eq!(rel.relationship_type(), DomRelationshipType::ToOneRelationship);
        assert_eq!(serde_json::to_value(&rel).unwrap(), json!({"data": null}));
    }

    #[test]
    fn test_relationship_without_data() {
        let rel: Relationship =
            serde_json::from_value(json!({"links": {"related": "/articles/1/author"}})).unwrap();
        assert!(rel.data.is_none());
        assert_eq!(rel.relationship_type(), DomRelationshipType::Relationship);
        assert_eq!(
            serde_json::to_value(&rel).unwrap(),
            json!({"links": {"related": "/articles/1/author"}})
        );
    }

    #[test]
    fn test_relationships_order_and_lookup() {
        let rels: Relationships = serde_json::from_value(json!({
            "comments": {"data": []},
            "author": {"data": {"type": "people", "id": "9"}}
        }))
        .unwrap();
        let names: Vec<&str> = rels.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["comments", "author"]);
        assert_eq!(
            rels.get("author").unwrap().relationship_type(),
            DomRelationshipType::ToOneRelationship
        );
    }
}
