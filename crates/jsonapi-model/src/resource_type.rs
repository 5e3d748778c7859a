//! # Resource and Complex Types
//!
//! The per-type entries of the service model. A [`ResourceType`] bundles
//! identity, attributes, relationships, links and meta for one registered
//! Rust type. A [`ComplexType`] only carries the attribute name table used
//! to remap nested objects.

use std::any::TypeId;
use std::collections::HashMap;

use jsonapi_core::{Links, Meta};

use crate::attribute::AttributesInfo;
use crate::binding::Binding;
use crate::relationship::RelationshipsInfo;

/// Binding of the resource id.
#[derive(Debug, Clone)]
pub struct IdInfo {
    /// Rust field name.
    pub field_name: String,
    /// Rust id type name.
    pub type_name: &'static str,
    /// Formats to and parses from the wire id.
    pub binding: Binding<String>,
}

/// API type name and optional id binding.
#[derive(Debug, Clone)]
pub struct ResourceIdentityInfo {
    /// API type name, the `type` member on the wire.
    pub api_type: String,
    /// Id binding; `None` denotes a singleton resource.
    pub id: Option<IdInfo>,
}

impl ResourceIdentityInfo {
    /// Whether the resource has no id.
    pub fn is_singleton(&self) -> bool {
        self.id.is_none()
    }
}

/// A link relation a resource type exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkInfo {
    /// Link relation name, e.g. `self`.
    pub rel: String,
}

/// Links a resource type exposes, plus an optional container binding.
#[derive(Debug, Clone, Default)]
pub struct LinksInfo {
    links: Vec<LinkInfo>,
    index: HashMap<String, usize>,
    binding: Option<Binding<Option<Links>>>,
}

impl LinksInfo {
    /// Register a link relation; duplicates are ignored.
    pub fn insert(&mut self, rel: impl Into<String>) {
        let rel = rel.into();
        if !self.index.contains_key(&rel) {
            self.index.insert(rel.clone(), self.links.len());
            self.links.push(LinkInfo { rel });
        }
    }

    /// Look up a link relation.
    pub fn get(&self, rel: &str) -> Option<&LinkInfo> {
        let pos = self.index.get(rel)?;
        self.links.get(*pos)
    }

    /// Whether `rel` is exposed.
    pub fn contains(&self, rel: &str) -> bool {
        self.get(rel).is_some()
    }

    /// Link relations in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &LinkInfo> {
        self.links.iter()
    }

    /// Binding to a field holding the resource's `links`.
    pub fn binding(&self) -> Option<&Binding<Option<Links>>> {
        self.binding.as_ref()
    }

    pub(crate) fn set_binding(&mut self, binding: Binding<Option<Links>>) {
        self.binding = Some(binding);
    }
}

/// Optional binding to a field holding the resource's `meta`.
#[derive(Debug, Clone, Default)]
pub struct MetaInfo {
    binding: Option<Binding<Option<Meta>>>,
}

impl MetaInfo {
    /// The binding, if registered.
    pub fn binding(&self) -> Option<&Binding<Option<Meta>>> {
        self.binding.as_ref()
    }

    pub(crate) fn set_binding(&mut self, binding: Binding<Option<Meta>>) {
        self.binding = Some(binding);
    }
}

/// Service model entry for one resource type.
#[derive(Debug, Clone)]
pub struct ResourceType {
    /// Rust type identity.
    pub type_id: TypeId,
    /// Rust type name.
    pub type_name: &'static str,
    /// API type and id binding.
    pub identity: ResourceIdentityInfo,
    /// Attribute table.
    pub attributes: AttributesInfo,
    /// Relationship table.
    pub relationships: RelationshipsInfo,
    /// Link table.
    pub links: LinksInfo,
    /// Meta binding.
    pub meta: MetaInfo,
}

impl ResourceType {
    /// API type name.
    pub fn api_type(&self) -> &str {
        &self.identity.api_type
    }

    /// Whether the resource has no id.
    pub fn is_singleton(&self) -> bool {
        self.identity.is_singleton()
    }
}

/// Service model entry for a nested object type used by attributes.
#[derive(Debug, Clone)]
pub struct ComplexType {
    /// Rust type identity.
    pub type_id: TypeId,
    /// Rust type name.
    pub type_name: &'static str,
    /// Name remapping for the nested members.
    pub attributes: AttributesInfo,
}
