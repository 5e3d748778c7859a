//! # Relationship Tables
//!
//! Relationship names follow the same rule as attribute names: unique
//! ignoring ASCII case, last registration wins, drops logged.

use std::any::TypeId;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use jsonapi_core::{DomRelationshipType, Relationships};

use crate::binding::Binding;

/// Relationship cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
    /// At most one related resource.
    ToOne,
    /// Any number of related resources.
    ToMany,
}

impl Cardinality {
    /// The matching relationship classification.
    pub fn relationship_type(&self) -> DomRelationshipType {
        match self {
            Self::ToOne => DomRelationshipType::ToOneRelationship,
            Self::ToMany => DomRelationshipType::ToManyRelationship,
        }
    }
}

/// How the `related` link of a relationship is formed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalRelPathMode {
    /// `{resource url}/{rel}`.
    #[default]
    DefaultRelPath,
    /// For a to-one relationship whose target id is known, link to the
    /// target's canonical URL `{related type}/{id}` instead.
    DropPreviousPathSegments,
}

/// Ids of related resources, already formatted for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelatedIds {
    /// To-one linkage; `None` is an empty relationship.
    One(Option<String>),
    /// To-many linkage.
    Many(Vec<String>),
}

impl RelatedIds {
    /// The cardinality these ids express.
    pub fn cardinality(&self) -> Cardinality {
        match self {
            Self::One(_) => Cardinality::ToOne,
            Self::Many(_) => Cardinality::ToMany,
        }
    }
}

/// One registered relationship.
#[derive(Debug, Clone)]
pub struct RelationshipInfo {
    /// Relationship name on the wire.
    pub rel: String,
    /// To-one or to-many.
    pub cardinality: Cardinality,
    /// Rust type of the related resource.
    pub related_type: TypeId,
    /// Rust type name of the related resource.
    pub related_type_name: &'static str,
    /// Optional binding to a field holding the related ids.
    pub binding: Option<Binding<RelatedIds>>,
    /// Link formation mode for `related`.
    pub path_mode: CanonicalRelPathMode,
}

/// Ordered, case-insensitively unique relationship table.
#[derive(Debug, Clone, Default)]
pub struct RelationshipsInfo {
    relationships: Vec<RelationshipInfo>,
    index: HashMap<String, usize>,
    container: Option<Binding<Relationships>>,
}

impl RelationshipsInfo {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a relationship, replacing any earlier one with the same name
    /// ignoring case.
    pub fn insert(&mut self, info: RelationshipInfo) {
        let key = info.rel.to_ascii_lowercase();
        if let Some(pos) = self.index.get(&key).copied() {
            let dropped = self.relationships.remove(pos);
            tracing::warn!(
                rel = %info.rel,
                dropped_cardinality = ?dropped.cardinality,
                "duplicate relationship registration, keeping the last one"
            );
            self.relationships.push(info);
            self.index = self
                .relationships
                .iter()
                .enumerate()
                .map(|(pos, r)| (r.rel.to_ascii_lowercase(), pos))
                .collect();
        } else {
            self.index.insert(key, self.relationships.len());
            self.relationships.push(info);
        }
    }

    /// Look up by name, ignoring case.
    pub fn get(&self, rel: &str) -> Option<&RelationshipInfo> {
        let pos = self.index.get(&rel.to_ascii_lowercase())?;
        self.relationships.get(*pos)
    }

    pub(crate) fn get_mut(&mut self, rel: &str) -> Option<&mut RelationshipInfo> {
        let pos = self.index.get(&rel.to_ascii_lowercase())?;
        self.relationships.get_mut(*pos)
    }

    /// Relationships in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RelationshipInfo> {
        self.relationships.iter()
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    /// Binding to a field holding a whole `relationships` object.
    pub fn container(&self) -> Option<&Binding<Relationships>> {
        self.container.as_ref()
    }

    pub(crate) fn set_container(&mut self, binding: Binding<Relationships>) {
        self.container = Some(binding);
    }
}
