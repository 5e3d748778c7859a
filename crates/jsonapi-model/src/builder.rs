//! # Service Model Builder
//!
//! Explicit registration of resource and complex types. Each registration
//! hands out a typed sub-builder whose closures see the concrete Rust type;
//! `end()` erases them into tables and returns to the parent builder.
//!
//! ```ignore
//! let model = ServiceModelBuilder::new()
//!     .resource_type::<Article>("articles")
//!     .id("id", |a| a.id, |a, id| a.id = id)
//!     .attribute("title", |a| a.title.clone(), |a, v| a.title = v)
//!     .to_one::<Person, _, _, _>("author", |a| a.author_id, |a, id| a.author_id = id)
//!     .end()
//!     .resource_type::<Person>("people")
//!     .id("id", |p| p.id, |p, id| p.id = id)
//!     .end()
//!     .build()?;
//! ```
//!
//! [`ServiceModelBuilder::build`] validates the registrations as a whole and
//! freezes them into a [`ServiceModel`].

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use jsonapi_core::{Links, Meta, Relationships};

use crate::attribute::{AttributeInfo, AttributesInfo};
use crate::binding::Binding;
use crate::error::{AccessorError, ServiceModelError};
use crate::id::ApiId;
use crate::naming::NamingConvention;
use crate::relationship::{
    CanonicalRelPathMode, Cardinality, RelatedIds, RelationshipInfo, RelationshipsInfo,
};
use crate::resource_type::{
    ComplexType, IdInfo, LinksInfo, MetaInfo, ResourceIdentityInfo, ResourceType,
};
use crate::service_model::ServiceModel;

/// Collects registrations and builds a [`ServiceModel`].
#[derive(Debug, Default)]
pub struct ServiceModelBuilder {
    naming: NamingConvention,
    resource_types: Vec<ResourceType>,
    complex_types: Vec<ComplexType>,
}

impl ServiceModelBuilder {
    /// An empty builder using [`NamingConvention::CamelCase`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Naming convention for attributes registered from now on.
    pub fn naming(mut self, naming: NamingConvention) -> Self {
        self.naming = naming;
        self
    }

    /// Start registering resource type `T` under `api_type`.
    pub fn resource_type<T: 'static>(self, api_type: impl Into<String>) -> ResourceTypeBuilder<T> {
        ResourceTypeBuilder {
            identity: ResourceIdentityInfo {
                api_type: api_type.into(),
                id: None,
            },
            attributes: AttributesInfo::new(),
            relationships: RelationshipsInfo::new(),
            links: LinksInfo::default(),
            meta: MetaInfo::default(),
            parent: self,
            _marker: PhantomData,
        }
    }

    /// Start registering complex type `T`.
    pub fn complex_type<T: 'static>(self) -> ComplexTypeBuilder<T> {
        ComplexTypeBuilder {
            attributes: AttributesInfo::new(),
            parent: self,
            _marker: PhantomData,
        }
    }

    /// Validate all registrations and freeze them.
    ///
    /// # Errors
    ///
    /// Returns the first [`ServiceModelError`] found: empty or duplicate
    /// API type names, Rust types registered twice, relationships to
    /// unregistered types, complex attributes of unregistered types.
    pub fn build(self) -> Result<ServiceModel, ServiceModelError> {
        let mut api_types = HashSet::new();
        let mut rust_types = HashSet::new();
        for rt in &self.resource_types {
            if rt.identity.api_type.is_empty() {
                return Err(ServiceModelError::EmptyApiType {
                    type_name: rt.type_name.to_string(),
                });
            }
            if !api_types.insert(rt.identity.api_type.as_str()) {
                return Err(ServiceModelError::DuplicateApiType {
                    api_type: rt.identity.api_type.clone(),
                });
            }
            if !rust_types.insert(rt.type_id) {
                return Err(ServiceModelError::DuplicateRustType {
                    type_name: rt.type_name.to_string(),
                });
            }
        }
        for ct in &self.complex_types {
            if !rust_types.insert(ct.type_id) {
                return Err(ServiceModelError::DuplicateRustType {
                    type_name: ct.type_name.to_string(),
                });
            }
        }

        let resource_ids: HashSet<TypeId> = self.resource_types.iter().map(|rt| rt.type_id).collect();
        let complex_ids: HashSet<TypeId> = self.complex_types.iter().map(|ct| ct.type_id).collect();

        for rt in &self.resource_types {
            for rel in rt.relationships.iter() {
                if !resource_ids.contains(&rel.related_type) {
                    return Err(ServiceModelError::UnregisteredRelatedType {
                        api_type: rt.identity.api_type.clone(),
                        rel: rel.rel.clone(),
                        related: rel.related_type_name.to_string(),
                    });
                }
            }
            check_complex_attributes(rt.identity.api_type.as_str(), &rt.attributes, &complex_ids)?;
        }
        for ct in &self.complex_types {
            check_complex_attributes(ct.type_name, &ct.attributes, &complex_ids)?;
        }

        tracing::info!(
            resource_types = self.resource_types.len(),
            complex_types = self.complex_types.len(),
            "service model built"
        );
        let complex: HashMap<TypeId, ComplexType> =
            self.complex_types.into_iter().map(|ct| (ct.type_id, ct)).collect();
        Ok(ServiceModel::new(self.resource_types, complex))
    }
}

fn check_complex_attributes(
    owner: &str,
    attributes: &AttributesInfo,
    complex_ids: &HashSet<TypeId>,
) -> Result<(), ServiceModelError> {
    for attr in attributes.iter() {
        if let Some(complex) = attr.complex_type {
            if !complex_ids.contains(&complex) {
                return Err(ServiceModelError::UnregisteredComplexType {
                    owner: owner.to_string(),
                    attribute: attr.api_name.clone(),
                    complex: attr.type_name.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn value_binding<T, V, G, S>(get: G, set: S) -> Binding<Value>
where
    T: 'static,
    V: Serialize + DeserializeOwned + 'static,
    G: Fn(&T) -> V + Send + Sync + 'static,
    S: Fn(&mut T, V) + Send + Sync + 'static,
{
    Binding::new(
        move |t: &T| serde_json::to_value(get(t)).map_err(AccessorError::Encode),
        move |t: &mut T, value: Value| {
            let typed: V = serde_json::from_value(value).map_err(AccessorError::Decode)?;
            set(t, typed);
            Ok(())
        },
    )
}

/// Registers one resource type. Returned by
/// [`ServiceModelBuilder::resource_type`].
#[derive(Debug)]
pub struct ResourceTypeBuilder<T> {
    identity: ResourceIdentityInfo,
    attributes: AttributesInfo,
    relationships: RelationshipsInfo,
    links: LinksInfo,
    meta: MetaInfo,
    parent: ServiceModelBuilder,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> ResourceTypeBuilder<T> {
    /// Bind the resource id. Without this the resource is a singleton.
    pub fn id<K, G, S>(mut self, field_name: impl Into<String>, get: G, set: S) -> Self
    where
        K: ApiId,
        G: Fn(&T) -> K + Send + Sync + 'static,
        S: Fn(&mut T, K) + Send + Sync + 'static,
    {
        self.identity.id = Some(IdInfo {
            field_name: field_name.into(),
            type_name: std::any::type_name::<K>(),
            binding: Binding::new(
                move |t: &T| Ok(get(t).format_id()),
                move |t: &mut T, id: String| {
                    set(t, K::parse_id(&id)?);
                    Ok(())
                },
            ),
        });
        self
    }

    /// Bind a scalar attribute; the API name follows the naming convention.
    pub fn attribute<V, G, S>(self, field_name: &str, get: G, set: S) -> Self
    where
        V: Serialize + DeserializeOwned + 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let api_name = self.parent.naming.apply(field_name);
        self.attribute_named(api_name, field_name, get, set)
    }

    /// Bind a scalar attribute under an explicit API name.
    pub fn attribute_named<V, G, S>(
        mut self,
        api_name: impl Into<String>,
        field_name: &str,
        get: G,
        set: S,
    ) -> Self
    where
        V: Serialize + DeserializeOwned + 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.attributes.insert(AttributeInfo {
            api_name: api_name.into(),
            field_name: field_name.to_string(),
            type_name: std::any::type_name::<V>(),
            complex_type: None,
            binding: Some(value_binding(get, set)),
        });
        self
    }

    /// Bind an attribute holding complex type `C`, directly or as the
    /// element of a collection or option. `C` must be registered with
    /// [`ServiceModelBuilder::complex_type`].
    pub fn complex_attribute<C, V, G, S>(mut self, field_name: &str, get: G, set: S) -> Self
    where
        C: 'static,
        V: Serialize + DeserializeOwned + 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.attributes.insert(AttributeInfo {
            api_name: self.parent.naming.apply(field_name),
            field_name: field_name.to_string(),
            type_name: std::any::type_name::<C>(),
            complex_type: Some(TypeId::of::<C>()),
            binding: Some(value_binding(get, set)),
        });
        self
    }

    /// Bind a to-one relationship to resource type `R` through an optional
    /// id field.
    pub fn to_one<R, K, G, S>(mut self, rel: impl Into<String>, get: G, set: S) -> Self
    where
        R: 'static,
        K: ApiId,
        G: Fn(&T) -> Option<K> + Send + Sync + 'static,
        S: Fn(&mut T, Option<K>) + Send + Sync + 'static,
    {
        let binding = Binding::new(
            move |t: &T| Ok(RelatedIds::One(get(t).map(|k| k.format_id()))),
            move |t: &mut T, ids: RelatedIds| match ids {
                RelatedIds::One(id) => {
                    let id = id.as_deref().map(K::parse_id).transpose()?;
                    set(t, id);
                    Ok(())
                }
                RelatedIds::Many(_) => Err(AccessorError::CardinalityMismatch {
                    expected: Cardinality::ToOne,
                }),
            },
        );
        self.relationships
            .insert(relationship::<R>(rel.into(), Cardinality::ToOne, Some(binding)));
        self
    }

    /// Bind a to-many relationship to resource type `R` through an id list.
    pub fn to_many<R, K, G, S>(mut self, rel: impl Into<String>, get: G, set: S) -> Self
    where
        R: 'static,
        K: ApiId,
        G: Fn(&T) -> Vec<K> + Send + Sync + 'static,
        S: Fn(&mut T, Vec<K>) + Send + Sync + 'static,
    {
        let binding = Binding::new(
            move |t: &T| Ok(RelatedIds::Many(get(t).iter().map(ApiId::format_id).collect())),
            move |t: &mut T, ids: RelatedIds| match ids {
                RelatedIds::Many(ids) => {
                    let ids = ids
                        .iter()
                        .map(|id| K::parse_id(id))
                        .collect::<Result<Vec<K>, _>>()?;
                    set(t, ids);
                    Ok(())
                }
                RelatedIds::One(_) => Err(AccessorError::CardinalityMismatch {
                    expected: Cardinality::ToMany,
                }),
            },
        );
        self.relationships
            .insert(relationship::<R>(rel.into(), Cardinality::ToMany, Some(binding)));
        self
    }

    /// Declare a to-one relationship without a field; linkage is supplied
    /// per document.
    pub fn to_one_unbound<R: 'static>(mut self, rel: impl Into<String>) -> Self {
        self.relationships
            .insert(relationship::<R>(rel.into(), Cardinality::ToOne, None));
        self
    }

    /// Declare a to-many relationship without a field.
    pub fn to_many_unbound<R: 'static>(mut self, rel: impl Into<String>) -> Self {
        self.relationships
            .insert(relationship::<R>(rel.into(), Cardinality::ToMany, None));
        self
    }

    /// Set the `related` link mode of an already registered relationship.
    /// Unknown names are ignored with a warning.
    pub fn rel_path_mode(mut self, rel: &str, mode: CanonicalRelPathMode) -> Self {
        match self.relationships.get_mut(rel) {
            Some(info) => info.path_mode = mode,
            None => tracing::warn!(rel, "path mode set for unregistered relationship"),
        }
        self
    }

    /// Bind a field holding a whole `relationships` object.
    pub fn relationships_field<G, S>(mut self, get: G, set: S) -> Self
    where
        G: Fn(&T) -> Relationships + Send + Sync + 'static,
        S: Fn(&mut T, Relationships) + Send + Sync + 'static,
    {
        self.relationships.set_container(Binding::new(
            move |t: &T| Ok(get(t)),
            move |t: &mut T, v| {
                set(t, v);
                Ok(())
            },
        ));
        self
    }

    /// Expose a link relation, e.g. `self`.
    pub fn link(mut self, rel: impl Into<String>) -> Self {
        self.links.insert(rel);
        self
    }

    /// Bind a field holding the resource's `links`.
    pub fn links_field<G, S>(mut self, get: G, set: S) -> Self
    where
        G: Fn(&T) -> Option<Links> + Send + Sync + 'static,
        S: Fn(&mut T, Option<Links>) + Send + Sync + 'static,
    {
        self.links.set_binding(Binding::new(
            move |t: &T| Ok(get(t)),
            move |t: &mut T, v| {
                set(t, v);
                Ok(())
            },
        ));
        self
    }

    /// Bind a field holding the resource's `meta`.
    pub fn meta_field<G, S>(mut self, get: G, set: S) -> Self
    where
        G: Fn(&T) -> Option<Meta> + Send + Sync + 'static,
        S: Fn(&mut T, Option<Meta>) + Send + Sync + 'static,
    {
        self.meta.set_binding(Binding::new(
            move |t: &T| Ok(get(t)),
            move |t: &mut T, v| {
                set(t, v);
                Ok(())
            },
        ));
        self
    }

    /// Finish this resource type.
    pub fn end(self) -> ServiceModelBuilder {
        let mut parent = self.parent;
        tracing::debug!(
            api_type = %self.identity.api_type,
            attributes = self.attributes.len(),
            relationships = self.relationships.len(),
            "registered resource type"
        );
        parent.resource_types.push(ResourceType {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            identity: self.identity,
            attributes: self.attributes,
            relationships: self.relationships,
            links: self.links,
            meta: self.meta,
        });
        parent
    }
}

fn relationship<R: 'static>(
    rel: String,
    cardinality: Cardinality,
    binding: Option<Binding<RelatedIds>>,
) -> RelationshipInfo {
    RelationshipInfo {
        rel,
        cardinality,
        related_type: TypeId::of::<R>(),
        related_type_name: std::any::type_name::<R>(),
        binding,
        path_mode: CanonicalRelPathMode::default(),
    }
}

/// Registers one complex type. Returned by
/// [`ServiceModelBuilder::complex_type`].
#[derive(Debug)]
pub struct ComplexTypeBuilder<T> {
    attributes: AttributesInfo,
    parent: ServiceModelBuilder,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> ComplexTypeBuilder<T> {
    /// Register a nested member; the API name follows the naming convention.
    pub fn attribute(self, field_name: &str) -> Self {
        let api_name = self.parent.naming.apply(field_name);
        self.attribute_named(api_name, field_name)
    }

    /// Register a nested member under an explicit API name.
    pub fn attribute_named(mut self, api_name: impl Into<String>, field_name: &str) -> Self {
        self.attributes.insert(AttributeInfo {
            api_name: api_name.into(),
            field_name: field_name.to_string(),
            type_name: "",
            complex_type: None,
            binding: None,
        });
        self
    }

    /// Register a nested member that is itself complex type `C`.
    pub fn complex_attribute<C: 'static>(mut self, field_name: &str) -> Self {
        self.attributes.insert(AttributeInfo {
            api_name: self.parent.naming.apply(field_name),
            field_name: field_name.to_string(),
            type_name: std::any::type_name::<C>(),
            complex_type: Some(TypeId::of::<C>()),
            binding: None,
        });
        self
    }

    /// Finish this complex type.
    pub fn end(self) -> ServiceModelBuilder {
        let mut parent = self.parent;
        parent.complex_types.push(ComplexType {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            attributes: self.attributes,
        });
        parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Article {
        id: u64,
        title: String,
        author: Option<u64>,
    }

    #[derive(Debug, Default)]
    struct Person {
        id: u64,
    }

    #[derive(Debug, Default)]
    struct Address;

    #[test]
    fn test_build_valid_model() {
        let model = ServiceModelBuilder::new()
            .resource_type::<Article>("articles")
            .id("id", |a: &Article| a.id, |a: &mut Article, id| a.id = id)
            .attribute("title", |a: &Article| a.title.clone(), |a: &mut Article, v| a.title = v)
            .to_one::<Person, _, _, _>("author", |a: &Article| a.author, |a: &mut Article, id| a.author = id)
            .end()
            .resource_type::<Person>("people")
            .id("id", |p: &Person| p.id, |p: &mut Person, id| p.id = id)
            .end()
            .build()
            .unwrap();
        assert_eq!(model.resource_type::<Article>().unwrap().api_type(), "articles");
        assert_eq!(model.resource_type_by_api_type("people").unwrap().type_id, TypeId::of::<Person>());
    }

    #[test]
    fn test_duplicate_api_type() {
        let err = ServiceModelBuilder::new()
            .resource_type::<Article>("things")
            .end()
            .resource_type::<Person>("things")
            .end()
            .build()
            .unwrap_err();
        assert_eq!(err, ServiceModelError::DuplicateApiType { api_type: "things".into() });
    }

    #[test]
    fn test_duplicate_rust_type() {
        let err = ServiceModelBuilder::new()
            .resource_type::<Article>("articles")
            .end()
            .resource_type::<Article>("posts")
            .end()
            .build()
            .unwrap_err();
        assert!(matches!(err, ServiceModelError::DuplicateRustType { .. }));
    }

    #[test]
    fn test_empty_api_type() {
        let err = ServiceModelBuilder::new()
            .resource_type::<Article>("")
            .end()
            .build()
            .unwrap_err();
        assert!(matches!(err, ServiceModelError::EmptyApiType { .. }));
    }

    #[test]
    fn test_unregistered_related_type() {
        let err = ServiceModelBuilder::new()
            .resource_type::<Article>("articles")
            .to_one_unbound::<Person>("author")
            .end()
            .build()
            .unwrap_err();
        match err {
            ServiceModelError::UnregisteredRelatedType { api_type, rel, .. } => {
                assert_eq!(api_type, "articles");
                assert_eq!(rel, "author");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unregistered_complex_type() {
        let err = ServiceModelBuilder::new()
            .resource_type::<Person>("people")
            .complex_attribute::<Address, _, _, _>("home", |_: &Person| Value::Null, |_: &mut Person, _: Value| {})
            .end()
            .build()
            .unwrap_err();
        assert!(matches!(err, ServiceModelError::UnregisteredComplexType { .. }));

        let ok = ServiceModelBuilder::new()
            .complex_type::<Address>()
            .attribute("street_name")
            .end()
            .resource_type::<Person>("people")
            .complex_attribute::<Address, _, _, _>("home", |_: &Person| Value::Null, |_: &mut Person, _: Value| {})
            .end()
            .build();
        assert!(ok.is_ok());
    }

    #[test]
    fn test_naming_convention_applies_to_later_registrations() {
        #[derive(Default)]
        struct Profile {
            display_name: String,
        }
        let model = ServiceModelBuilder::new()
            .naming(NamingConvention::KebabCase)
            .resource_type::<Profile>("profiles")
            .attribute(
                "display_name",
                |p: &Profile| p.display_name.clone(),
                |p: &mut Profile, v| p.display_name = v,
            )
            .end()
            .build()
            .unwrap();
        let rt = model.resource_type::<Profile>().unwrap();
        assert!(rt.is_singleton());
        assert_eq!(rt.attributes.by_field_name("display_name").unwrap().api_name, "display-name");
    }

    #[test]
    fn test_relationship_binding_enforces_cardinality() {
        let model = ServiceModelBuilder::new()
            .resource_type::<Article>("articles")
            .to_one::<Person, _, _, _>("author", |a: &Article| a.author, |a: &mut Article, id| a.author = id)
            .end()
            .resource_type::<Person>("people")
            .end()
            .build()
            .unwrap();
        let rel = model.resource_type::<Article>().unwrap().relationships.get("author").unwrap();
        let binding = rel.binding.as_ref().unwrap();
        let mut article = Article::default();
        binding.set(&mut article, RelatedIds::One(Some("9".into()))).unwrap();
        assert_eq!(article.author, Some(9));
        assert_eq!(binding.get(&article).unwrap(), RelatedIds::One(Some("9".into())));
        let err = binding.set(&mut article, RelatedIds::Many(vec![])).unwrap_err();
        assert!(matches!(err, AccessorError::CardinalityMismatch { expected: Cardinality::ToOne }));
        let err = binding.set(&mut article, RelatedIds::One(Some("x".into()))).unwrap_err();
        assert!(matches!(err, AccessorError::Id(_)));
    }
}
