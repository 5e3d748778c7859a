//! # Resource Mapper
//!
//! Copies data between registered Rust values and wire resource objects,
//! driven entirely by the [`ServiceModel`] tables.
//!
//! ## Write Path
//!
//! `type`, `id` (unless singleton), `attributes` in registration order,
//! `relationships` from relationship bindings merged over the container
//! binding, then `links` and `meta`.
//!
//! ## Read Path
//!
//! Every registered attribute is looked up in the wire `attributes` by its
//! API name. Absent attributes are skipped. Complex attributes have their
//! nested member names remapped recursively before decoding. Relationship
//! linkage must match the registered cardinality.
//!
//! Mapping fails fast: the first error is returned and the target value may
//! be partially written.

use std::any::Any;

use serde::Serialize;
use serde_json::{Map, Value};

use jsonapi_core::{Linkage, Links, Meta, Relationship, Relationships, ResourceIdentifier};
use jsonapi_dom::DomResource;
use jsonapi_model::{
    AccessorError, ComplexType, RelatedIds, RelationshipInfo, ResourceType, ServiceModel,
    ServiceModelError,
};

use crate::error::{DocumentBuildError, DocumentError, DocumentReadError};

/// A resource object ready to be written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceObject {
    /// API type name.
    #[serde(rename = "type")]
    pub api_type: String,
    /// Wire id; `None` for singletons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Attributes in registration order.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
    /// Relationship objects.
    #[serde(skip_serializing_if = "Relationships::is_empty")]
    pub relationships: Relationships,
    /// Resource links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    /// Resource meta.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl ResourceObject {
    /// The `{type, id}` of this resource, if it has an id.
    pub fn identifier(&self) -> Option<ResourceIdentifier> {
        self.id
            .as_ref()
            .map(|id| ResourceIdentifier::new(self.api_type.clone(), id.clone()))
    }

    /// Serialize to a JSON object.
    ///
    /// # Errors
    ///
    /// Fails only if a member cannot be represented as JSON.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[derive(Clone, Copy)]
enum Direction {
    ToApi,
    FromApi,
}

/// Maps between Rust values and wire resources using a service model.
#[derive(Debug, Clone, Copy)]
pub struct ResourceMapper<'m> {
    model: &'m ServiceModel,
}

impl<'m> ResourceMapper<'m> {
    /// A mapper over `model`.
    pub fn new(model: &'m ServiceModel) -> Self {
        Self { model }
    }

    /// The underlying service model.
    pub fn model(&self) -> &'m ServiceModel {
        self.model
    }

    // ── Write path ───────────────────────────────────────────────────

    /// Map `instance` to a wire resource.
    ///
    /// # Errors
    ///
    /// [`ServiceModelError`] if `T` is not registered;
    /// [`DocumentBuildError`] if a binding fails.
    pub fn to_resource<T: 'static>(&self, instance: &T) -> Result<ResourceObject, DocumentError> {
        let resource_type = self.model.resource_type::<T>()?;
        self.to_resource_dyn(resource_type, instance)
    }

    pub(crate) fn to_resource_dyn(
        &self,
        resource_type: &ResourceType,
        instance: &dyn Any,
    ) -> Result<ResourceObject, DocumentError> {
        let api_type = resource_type.api_type().to_string();
        let member_error = |member: &str, source: AccessorError| DocumentBuildError::Member {
            api_type: api_type.clone(),
            member: member.to_string(),
            source,
        };

        let id = match &resource_type.identity.id {
            Some(info) => Some(info.binding.get(instance).map_err(|e| member_error("id", e))?),
            None => None,
        };

        let mut attributes = Map::new();
        for attr in resource_type.attributes.iter() {
            let Some(binding) = &attr.binding else {
                continue;
            };
            let value = binding.get(instance).map_err(|source| DocumentBuildError::Attribute {
                api_type: api_type.clone(),
                attribute: attr.api_name.clone(),
                source,
            })?;
            let value = match attr.complex_type.and_then(|id| self.model.complex_type(id)) {
                Some(complex) => self.remap(complex, value, Direction::ToApi),
                None => value,
            };
            attributes.insert(attr.api_name.clone(), value);
        }

        let mut relationships = match resource_type.relationships.container() {
            Some(binding) => binding
                .get(instance)
                .map_err(|e| member_error("relationships", e))?,
            None => Relationships::new(),
        };
        for info in resource_type.relationships.iter() {
            let Some(binding) = &info.binding else {
                continue;
            };
            let ids = binding.get(instance).map_err(|e| member_error(&info.rel, e))?;
            let linkage = self.linkage(info, ids)?;
            match relationships.get_mut(&info.rel) {
                Some(existing) => existing.data = Some(linkage),
                None => relationships.insert(info.rel.clone(), Relationship::from_linkage(linkage)),
            }
        }

        let links = match resource_type.links.binding() {
            Some(binding) => binding.get(instance).map_err(|e| member_error("links", e))?,
            None => None,
        };
        let meta = match resource_type.meta.binding() {
            Some(binding) => binding.get(instance).map_err(|e| member_error("meta", e))?,
            None => None,
        };

        tracing::trace!(%api_type, ?id, "mapped resource to wire");
        Ok(ResourceObject {
            api_type,
            id,
            attributes,
            relationships,
            links,
            meta,
        })
    }

    /// Build linkage for `info` from ids read through its binding.
    ///
    /// The typed `to_one`/`to_many` bindings only ever produce ids of the
    /// registered cardinality. Caller-supplied linkage is checked by the
    /// document builder instead.
    fn linkage(&self, info: &RelationshipInfo, ids: RelatedIds) -> Result<Linkage, DocumentError> {
        debug_assert_eq!(ids.cardinality(), info.cardinality, "binding of '{}' changed cardinality", info.rel);
        let related = self.related_api_type(info)?;
        Ok(match ids {
            RelatedIds::One(id) => Linkage::ToOne(id.map(|id| ResourceIdentifier::new(related, id))),
            RelatedIds::Many(ids) => Linkage::to_many(
                ids.into_iter()
                    .map(|id| ResourceIdentifier::new(related, id)),
            ),
        })
    }

    /// API type name of the resource a relationship points at.
    pub(crate) fn related_api_type(&self, info: &RelationshipInfo) -> Result<&'m str, ServiceModelError> {
        self.model
            .try_resource_type_of(info.related_type)
            .map(ResourceType::api_type)
            .ok_or_else(|| ServiceModelError::UnregisteredType {
                type_name: info.related_type_name.to_string(),
            })
    }

    // ── Read path ────────────────────────────────────────────────────

    /// Read a wire resource into a fresh `T`.
    ///
    /// # Errors
    ///
    /// [`ServiceModelError`] if `T` is not registered;
    /// [`DocumentReadError`] on type, id, attribute or cardinality
    /// mismatches.
    pub fn read_resource<T: Default + 'static>(&self, resource: &DomResource<'_>) -> Result<T, DocumentError> {
        let mut instance = T::default();
        self.read_into(resource, &mut instance)?;
        Ok(instance)
    }

    /// Read a wire resource into an existing `T`.
    ///
    /// # Errors
    ///
    /// Same as [`ResourceMapper::read_resource`].
    pub fn read_into<T: 'static>(&self, resource: &DomResource<'_>, instance: &mut T) -> Result<(), DocumentError> {
        let resource_type = self.model.resource_type::<T>()?;
        self.read_dyn(resource_type, resource, instance)
    }

    fn read_dyn(
        &self,
        resource_type: &ResourceType,
        resource: &DomResource<'_>,
        instance: &mut dyn Any,
    ) -> Result<(), DocumentError> {
        let api_type = resource_type.api_type();
        let found = resource.api_type().unwrap_or_default();
        if found != api_type {
            return Err(DocumentReadError::TypeMismatch {
                expected: api_type.to_string(),
                found: found.to_string(),
            }
            .into());
        }
        let member_error = |member: &str, source: AccessorError| DocumentReadError::Member {
            api_type: api_type.to_string(),
            member: member.to_string(),
            source,
        };

        if let (Some(info), Some(id)) = (&resource_type.identity.id, resource.id()) {
            info.binding
                .set(instance, id.to_string())
                .map_err(|e| match e {
                    AccessorError::Id(source) => DocumentReadError::InvalidId {
                        api_type: api_type.to_string(),
                        source,
                    },
                    other => member_error("id", other),
                })?;
        }

        let wire_attributes = resource.attributes();
        for attr in resource_type.attributes.iter() {
            let (Some(binding), Some(value)) = (&attr.binding, wire_attributes.get(&attr.api_name)) else {
                continue;
            };
            let value = match attr.complex_type.and_then(|id| self.model.complex_type(id)) {
                Some(complex) => self.remap(complex, value.clone(), Direction::FromApi),
                None => value.clone(),
            };
            binding
                .set(instance, value)
                .map_err(|source| DocumentReadError::Attribute {
                    api_type: api_type.to_string(),
                    attribute: attr.api_name.clone(),
                    source,
                })?;
        }

        let relationships = resource.relationships().map_err(DocumentReadError::from)?;
        for info in resource_type.relationships.iter() {
            let Some(binding) = &info.binding else {
                continue;
            };
            let Some(linkage) = relationships.get(&info.rel).and_then(|r| r.data.as_ref()) else {
                continue;
            };
            let found = linkage.relationship_type();
            if found != info.cardinality.relationship_type() {
                return Err(DocumentReadError::CardinalityMismatch {
                    api_type: api_type.to_string(),
                    rel: info.rel.clone(),
                    expected: info.cardinality,
                    found,
                }
                .into());
            }
            let ids = match linkage {
                Linkage::ToOne(one) => RelatedIds::One(one.as_ref().map(|ri| ri.id.clone())),
                Linkage::ToMany(many) => RelatedIds::Many(many.iter().map(|ri| ri.id.clone()).collect()),
            };
            binding.set(instance, ids).map_err(|e| member_error(&info.rel, e))?;
        }
        if let Some(binding) = resource_type.relationships.container() {
            binding
                .set(instance, relationships)
                .map_err(|e| member_error("relationships", e))?;
        }

        if let Some(binding) = resource_type.links.binding() {
            let links = resource.links().map_err(DocumentReadError::from)?;
            binding.set(instance, links).map_err(|e| member_error("links", e))?;
        }
        if let Some(binding) = resource_type.meta.binding() {
            let meta = resource.meta().map_err(DocumentReadError::from)?;
            binding.set(instance, meta).map_err(|e| member_error("meta", e))?;
        }
        tracing::trace!(%api_type, id = ?resource.id(), "mapped wire resource");
        Ok(())
    }

    // ── Complex types ────────────────────────────────────────────────

    /// Rename nested members between field names and API names. Arrays are
    /// remapped element-wise; members without a table entry pass through.
    fn remap(&self, complex: &ComplexType, value: Value, direction: Direction) -> Value {
        match value {
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.remap(complex, item, direction))
                    .collect(),
            ),
            Value::Object(map) => {
                let mut out = Map::new();
                for (name, member) in map {
                    let attr = match direction {
                        Direction::ToApi => complex.attributes.by_field_name(&name),
                        Direction::FromApi => complex.attributes.by_api_name(&name),
                    };
                    let Some(attr) = attr else {
                        out.insert(name, member);
                        continue;
                    };
                    let member = match attr.complex_type.and_then(|id| self.model.complex_type(id)) {
                        Some(nested) => self.remap(nested, member, direction),
                        None => member,
                    };
                    let renamed = match direction {
                        Direction::ToApi => attr.api_name.clone(),
                        Direction::FromApi => attr.field_name.clone(),
                    };
                    out.insert(renamed, member);
                }
                Value::Object(out)
            }
            other => other,
        }
    }
}
