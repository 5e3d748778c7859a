//! # Document Builder
//!
//! Fluent, consuming assembly of outgoing documents.
//!
//! ```ignore
//! let doc = ctx
//!     .builder()
//!     .resource(&article)
//!         .link("describedby", Link::url("https://example.com/schema"))
//!         .relationship_meta("comments", Meta::new().with("count", 2))
//!         .end()
//!     .included_collection(&comments)
//!         .end()
//!     .meta(Meta::new().with("copyright", "ACME"))
//!     .build()?;
//! ```
//!
//! ## Design
//!
//! Resources are held by reference and mapped in [`DocumentBuilder::build`],
//! which runs the write path for every resource, fills hypermedia links and
//! validates the result through the DOM builder. Misuse found while
//! chaining (primary data set twice, per-item counts that differ from the
//! collection size) is remembered and the first such error is returned from
//! `build`, so call chains never need intermediate `?`.
//!
//! Member order of the written document: `jsonapi`, `links`, `data` or
//! `errors`, `included`, `meta`.

use std::any::{Any, TypeId};

use serde::Serialize;
use serde_json::{Map, Value};

use jsonapi_core::keywords::{DATA, ERRORS, INCLUDED, JSONAPI, LINKS, META};
use jsonapi_core::{
    ErrorObject, JsonApiVersion, Link, Linkage, Links, Meta, Relationship, ResourceIdentifier,
};
use jsonapi_dom::DomDocument;
use jsonapi_model::{ResourceType, ServiceModelError};

use crate::context::DocumentContext;
use crate::error::{DocumentBuildError, DocumentError};
use crate::hypermedia::{relationship_paths, resource_path, BaseUrlBuilder, HypermediaPath, UrlBuilder};
use crate::mapper::ResourceObject;

/// A resource waiting to be mapped, with its per-resource overrides.
struct PendingResource<'a> {
    instance: &'a dyn Any,
    type_id: TypeId,
    type_name: &'static str,
    links: Links,
    meta: Option<Meta>,
    relationships: Vec<(String, Relationship)>,
}

impl<'a> PendingResource<'a> {
    fn new<T: 'static>(instance: &'a T) -> Self {
        Self {
            instance,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            links: Links::new(),
            meta: None,
            relationships: Vec::new(),
        }
    }

    fn relationship_mut(&mut self, rel: &str) -> &mut Relationship {
        let index = match self.relationships.iter().position(|(name, _)| name == rel) {
            Some(index) => index,
            None => {
                self.relationships.push((rel.to_string(), Relationship::default()));
                self.relationships.len() - 1
            }
        };
        &mut self.relationships[index].1
    }
}

enum PrimaryData<'a> {
    Resource(PendingResource<'a>),
    Collection(Vec<PendingResource<'a>>),
    Identifier(ResourceIdentifier),
    Identifiers(Vec<ResourceIdentifier>),
    Null,
}

#[derive(Clone, Copy)]
enum Slot {
    Primary,
    Included,
}

/// Consuming builder for one outgoing document.
pub struct DocumentBuilder<'a> {
    ctx: &'a DocumentContext,
    primary: Option<PrimaryData<'a>>,
    included: Vec<PendingResource<'a>>,
    errors: Vec<ErrorObject>,
    links: Links,
    meta: Option<Meta>,
    version: Option<JsonApiVersion>,
    first_error: Option<DocumentError>,
}

impl<'a> DocumentBuilder<'a> {
    pub(crate) fn new(ctx: &'a DocumentContext) -> Self {
        Self {
            ctx,
            primary: None,
            included: Vec::new(),
            errors: Vec::new(),
            links: Links::new(),
            meta: None,
            version: ctx.options().settings.version,
            first_error: None,
        }
    }

    fn fail(&mut self, err: impl Into<DocumentError>) {
        if self.first_error.is_none() {
            self.first_error = Some(err.into());
        }
    }

    fn set_primary(mut self, data: PrimaryData<'a>) -> Self {
        if self.primary.is_some() {
            self.fail(DocumentBuildError::PrimaryDataAlreadySet);
        } else {
            self.primary = Some(data);
        }
        self
    }

    // ── Primary data ─────────────────────────────────────────────────

    /// Use one resource as primary data.
    pub fn resource<T: 'static>(self, instance: &'a T) -> ResourceBuilder<'a> {
        ResourceBuilder {
            parent: self,
            pending: PendingResource::new(instance),
            slot: Slot::Primary,
        }
    }

    /// Use a resource collection as primary data. An empty collection
    /// writes `"data": []`.
    pub fn resource_collection<T: 'static>(
        self,
        instances: impl IntoIterator<Item = &'a T>,
    ) -> ResourceCollectionBuilder<'a> {
        ResourceCollectionBuilder {
            parent: self,
            pending: instances.into_iter().map(PendingResource::new).collect(),
            slot: Slot::Primary,
        }
    }

    /// Use one resource identifier as primary data.
    pub fn resource_identifier(self, identifier: ResourceIdentifier) -> Self {
        self.set_primary(PrimaryData::Identifier(identifier))
    }

    /// Use resource identifiers as primary data.
    pub fn resource_identifiers(self, identifiers: impl IntoIterator<Item = ResourceIdentifier>) -> Self {
        self.set_primary(PrimaryData::Identifiers(identifiers.into_iter().collect()))
    }

    /// Write `"data": null`.
    pub fn null(self) -> Self {
        self.set_primary(PrimaryData::Null)
    }

    // ── Included ─────────────────────────────────────────────────────

    /// Add one resource to `included`.
    pub fn included<T: 'static>(self, instance: &'a T) -> ResourceBuilder<'a> {
        ResourceBuilder {
            parent: self,
            pending: PendingResource::new(instance),
            slot: Slot::Included,
        }
    }

    /// Add resources to `included`.
    pub fn included_collection<T: 'static>(
        self,
        instances: impl IntoIterator<Item = &'a T>,
    ) -> ResourceCollectionBuilder<'a> {
        ResourceCollectionBuilder {
            parent: self,
            pending: instances.into_iter().map(PendingResource::new).collect(),
            slot: Slot::Included,
        }
    }

    // ── Top level ────────────────────────────────────────────────────

    /// Set top-level `meta`.
    pub fn meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Add a top-level link.
    pub fn link(mut self, rel: impl Into<String>, link: Link) -> Self {
        self.links.insert(rel, Some(link));
        self
    }

    /// Add a top-level link to a hypermedia path, resolved with the
    /// context's URL builder (relative when none is configured).
    pub fn link_path(mut self, rel: impl Into<String>, path: &HypermediaPath) -> Self {
        let url = match self.ctx.url_builder() {
            Some(urls) => urls.url(path),
            None => BaseUrlBuilder::default().url(path),
        };
        self.links.insert(rel, Some(Link::url(url)));
        self
    }

    /// Write a `jsonapi` member with `version`.
    pub fn jsonapi(mut self, version: JsonApiVersion) -> Self {
        self.version = Some(version);
        self
    }

    /// Add an error object.
    pub fn error(mut self, error: ErrorObject) -> Self {
        self.errors.push(error);
        self
    }

    /// Add error objects.
    pub fn errors(mut self, errors: impl IntoIterator<Item = ErrorObject>) -> Self {
        self.errors.extend(errors);
        self
    }

    // ── Build ────────────────────────────────────────────────────────

    /// Map every resource, fill links and produce the document.
    ///
    /// # Errors
    ///
    /// The first misuse recorded while chaining, [`DocumentBuildError`]s
    /// from the write path, [`ServiceModelError`] for unregistered types,
    /// and [`DocumentError::Structural`] if the result is not a valid
    /// document.
    pub fn build(self) -> Result<DomDocument, DocumentError> {
        if let Some(err) = self.first_error {
            return Err(err);
        }
        if self.primary.is_some() && !self.errors.is_empty() {
            return Err(DocumentBuildError::DataWithErrors.into());
        }
        let writer = Writer { ctx: self.ctx };

        let mut seen: Vec<ResourceIdentifier> = Vec::new();
        let data = match self.primary {
            None => None,
            Some(PrimaryData::Null) => Some(Value::Null),
            Some(PrimaryData::Identifier(identifier)) => Some(to_json(&identifier)?),
            Some(PrimaryData::Identifiers(identifiers)) => Some(to_json(&identifiers)?),
            Some(PrimaryData::Resource(pending)) => {
                let object = writer.write(pending)?;
                seen.extend(object.identifier());
                Some(object.to_value()?)
            }
            Some(PrimaryData::Collection(pending)) => {
                let mut items = Vec::with_capacity(pending.len());
                for p in pending {
                    let object = writer.write(p)?;
                    seen.extend(object.identifier());
                    items.push(object.to_value()?);
                }
                Some(Value::Array(items))
            }
        };

        let mut included = Vec::new();
        for pending in self.included {
            let object = writer.write(pending)?;
            if let Some(identifier) = object.identifier() {
                if seen.iter().any(|s| s.same_identity(&identifier)) {
                    tracing::debug!(%identifier, "skipped duplicate included resource");
                    continue;
                }
                seen.push(identifier);
            }
            included.push(object.to_value()?);
        }

        let mut root = Map::new();
        if let Some(version) = self.version {
            root.insert(JSONAPI.to_string(), serde_json::json!({ "version": version.as_str() }));
        }
        if !self.links.is_empty() {
            root.insert(LINKS.to_string(), to_json(&self.links)?);
        }
        if let Some(data) = data {
            root.insert(DATA.to_string(), data);
        }
        if !self.errors.is_empty() {
            root.insert(ERRORS.to_string(), to_json(&self.errors)?);
        }
        if !included.is_empty() {
            root.insert(INCLUDED.to_string(), Value::Array(included));
        }
        if let Some(meta) = self.meta {
            root.insert(META.to_string(), meta.into_value());
        }

        let document = DomDocument::parse(&Value::Object(root))?;
        tracing::debug!(document_type = %document.document_type(), "built document");
        Ok(document)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, DocumentError> {
    Ok(serde_json::to_value(value)?)
}

/// Maps pending resources and fills their links.
struct Writer<'a> {
    ctx: &'a DocumentContext,
}

impl Writer<'_> {
    fn write(&self, pending: PendingResource<'_>) -> Result<ResourceObject, DocumentError> {
        let model = self.ctx.model();
        let resource_type = model
            .try_resource_type_of(pending.type_id)
            .ok_or_else(|| ServiceModelError::UnregisteredType {
                type_name: pending.type_name.to_string(),
            })?;
        let mapper = self.ctx.mapper();
        let mut object = mapper.to_resource_dyn(resource_type, pending.instance)?;
        if !resource_type.is_singleton() && object.id.as_deref().map_or(true, str::is_empty) {
            return Err(DocumentBuildError::MissingId {
                api_type: object.api_type,
            }
            .into());
        }

        for (rel, overrides) in pending.relationships {
            let Some(info) = resource_type.relationships.get(&rel) else {
                return Err(DocumentBuildError::UnknownRelationship {
                    api_type: object.api_type,
                    rel,
                }
                .into());
            };
            if let Some(linkage) = &overrides.data {
                if linkage.relationship_type() != info.cardinality.relationship_type() {
                    return Err(DocumentBuildError::CardinalityMismatch {
                        api_type: object.api_type,
                        rel,
                        expected: info.cardinality,
                    }
                    .into());
                }
            }
            if object.relationships.get(&info.rel).is_none() {
                object.relationships.insert(info.rel.clone(), Relationship::default());
            }
            let Some(target) = object.relationships.get_mut(&info.rel) else {
                continue;
            };
            if overrides.data.is_some() {
                target.data = overrides.data;
            }
            if let Some(links) = overrides.links {
                let merged = target.links.get_or_insert_with(Links::new);
                for (name, link) in links.iter() {
                    merged.insert(name, link.cloned());
                }
            }
            if overrides.meta.is_some() {
                target.meta = overrides.meta;
            }
        }

        if !pending.links.is_empty() {
            let links = object.links.get_or_insert_with(Links::new);
            for (rel, link) in pending.links.iter() {
                links.insert(rel, link.cloned());
            }
        }
        if pending.meta.is_some() {
            object.meta = pending.meta;
        }

        if let Some(urls) = self.ctx.url_builder() {
            self.fill_links(urls, resource_type, &mut object);
        }
        Ok(object)
    }

    /// Resource `self` and relationship `self`/`related` links. Links
    /// already present are never overwritten. A type that exposes link
    /// relations gets a generated `self` only if it lists `self`.
    fn fill_links(&self, urls: &dyn UrlBuilder, resource_type: &ResourceType, object: &mut ResourceObject) {
        let options = self.ctx.options();
        let path = resource_path(&object.api_type, object.id.as_deref());
        let exposes_self = resource_type.links.iter().next().is_none() || resource_type.links.contains("self");
        if options.resource_links && exposes_self {
            object
                .links
                .get_or_insert_with(Links::new)
                .insert_if_absent("self", Link::url(urls.url(&path)));
        }
        if !options.relationship_links {
            return;
        }
        for info in resource_type.relationships.iter() {
            let target = object
                .relationships
                .get(&info.rel)
                .and_then(|r| r.data.as_ref())
                .and_then(|linkage| match linkage {
                    Linkage::ToOne(Some(ri)) => Some((ri.api_type.clone(), ri.id.clone())),
                    _ => None,
                });
            let (self_path, related_path) = relationship_paths(
                &path,
                info,
                target.as_ref().map(|(t, id)| (t.as_str(), id.as_str())),
            );
            if object.relationships.get(&info.rel).is_none() {
                object.relationships.insert(info.rel.clone(), Relationship::default());
            }
            if let Some(relationship) = object.relationships.get_mut(&info.rel) {
                let links = relationship.links.get_or_insert_with(Links::new);
                links.insert_if_absent("self", Link::url(urls.url(&self_path)));
                links.insert_if_absent("related", Link::url(urls.url(&related_path)));
            }
        }
    }
}

/// Per-resource settings for one resource; [`ResourceBuilder::end`]
/// returns to the document builder.
pub struct ResourceBuilder<'a> {
    parent: DocumentBuilder<'a>,
    pending: PendingResource<'a>,
    slot: Slot,
}

impl<'a> ResourceBuilder<'a> {
    /// Add a resource link.
    pub fn link(mut self, rel: impl Into<String>, link: Link) -> Self {
        self.pending.links.insert(rel, Some(link));
        self
    }

    /// Set resource `meta`, replacing any bound meta.
    pub fn meta(mut self, meta: Meta) -> Self {
        self.pending.meta = Some(meta);
        self
    }

    /// Supply linkage for a declared relationship, replacing bound linkage.
    /// The relationship must exist and the linkage must match its
    /// cardinality; both are checked at build time.
    pub fn relationship(mut self, rel: &str, linkage: Linkage) -> Self {
        self.pending.relationship_mut(rel).data = Some(linkage);
        self
    }

    /// Add links to a relationship object.
    pub fn relationship_links(mut self, rel: &str, links: Links) -> Self {
        self.pending.relationship_mut(rel).links = Some(links);
        self
    }

    /// Set a relationship object's `meta`.
    pub fn relationship_meta(mut self, rel: &str, meta: Meta) -> Self {
        self.pending.relationship_mut(rel).meta = Some(meta);
        self
    }

    /// Finish this resource.
    pub fn end(self) -> DocumentBuilder<'a> {
        let mut parent = self.parent;
        match self.slot {
            Slot::Primary => parent.set_primary(PrimaryData::Resource(self.pending)),
            Slot::Included => {
                parent.included.push(self.pending);
                parent
            }
        }
    }
}

/// Per-item settings for a resource collection. Every `*_each` method
/// takes exactly one value per resource, in collection order.
pub struct ResourceCollectionBuilder<'a> {
    parent: DocumentBuilder<'a>,
    pending: Vec<PendingResource<'a>>,
    slot: Slot,
}

impl<'a> ResourceCollectionBuilder<'a> {
    fn check_count(&mut self, what: &'static str, found: usize) -> bool {
        if found == self.pending.len() {
            return true;
        }
        self.parent.fail(DocumentBuildError::CountMismatch {
            what,
            expected: self.pending.len(),
            found,
        });
        false
    }

    /// Resource links, one `Links` per resource.
    pub fn links_each(mut self, links: impl IntoIterator<Item = Links>) -> Self {
        let links: Vec<Links> = links.into_iter().collect();
        if self.check_count("links", links.len()) {
            for (pending, links) in self.pending.iter_mut().zip(links) {
                for (rel, link) in links.iter() {
                    pending.links.insert(rel, link.cloned());
                }
            }
        }
        self
    }

    /// Resource meta, one `Meta` per resource.
    pub fn meta_each(mut self, meta: impl IntoIterator<Item = Meta>) -> Self {
        let meta: Vec<Meta> = meta.into_iter().collect();
        if self.check_count("meta", meta.len()) {
            for (pending, meta) in self.pending.iter_mut().zip(meta) {
                pending.meta = Some(meta);
            }
        }
        self
    }

    /// Linkage for relationship `rel`, one per resource.
    pub fn relationship_each(mut self, rel: &str, linkage: impl IntoIterator<Item = Linkage>) -> Self {
        let linkage: Vec<Linkage> = linkage.into_iter().collect();
        if self.check_count("relationship", linkage.len()) {
            for (pending, linkage) in self.pending.iter_mut().zip(linkage) {
                pending.relationship_mut(rel).data = Some(linkage);
            }
        }
        self
    }

    /// Relationship meta for `rel`, one per resource.
    pub fn relationship_meta_each(mut self, rel: &str, meta: impl IntoIterator<Item = Meta>) -> Self {
        let meta: Vec<Meta> = meta.into_iter().collect();
        if self.check_count("relationship meta", meta.len()) {
            for (pending, meta) in self.pending.iter_mut().zip(meta) {
                pending.relationship_mut(rel).meta = Some(meta);
            }
        }
        self
    }

    /// Finish this collection.
    pub fn end(self) -> DocumentBuilder<'a> {
        let mut parent = self.parent;
        match self.slot {
            Slot::Primary => parent.set_primary(PrimaryData::Collection(self.pending)),
            Slot::Included => {
                parent.included.extend(self.pending);
                parent
            }
        }
    }
}
