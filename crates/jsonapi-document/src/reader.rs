//! # Document Reader
//!
//! Typed extraction from a parsed [`DomDocument`]: primary data and
//! included resources as registered Rust types, lookup by identity, related
//! resources through linkage, and the top-level members.
//!
//! A resource that carries only `type` and `id` is classified as an
//! identifier. The single and collection readers therefore accept
//! identifier documents too and read them as resources whose attributes are
//! all absent.

use serde::de::DeserializeOwned;

use jsonapi_core::{DomDocumentType, DomSettings, ErrorObject, JsonApiVersion, Links, Meta, ResourceIdentifier};
use jsonapi_dom::{DomDocument, DomNode, DomResource};

use crate::context::DocumentContext;
use crate::error::{DocumentError, DocumentReadError};

/// Reads registered Rust types out of one document.
#[derive(Debug, Clone, Copy)]
pub struct DocumentReader<'d> {
    ctx: &'d DocumentContext,
    document: &'d DomDocument,
}

impl<'d> DocumentReader<'d> {
    pub(crate) fn new(ctx: &'d DocumentContext, document: &'d DomDocument) -> Self {
        Self { ctx, document }
    }

    /// The underlying document.
    pub fn document(&self) -> &'d DomDocument {
        self.document
    }

    /// The document classification.
    pub fn document_type(&self) -> DomDocumentType {
        self.document.document_type()
    }

    fn require(&self, expected: &'static str, accepted: &[DomDocumentType]) -> Result<DomDocumentType, DocumentError> {
        let found = self.document_type();
        if accepted.contains(&found) {
            Ok(found)
        } else {
            Err(DocumentReadError::UnexpectedDocumentType { expected, found }.into())
        }
    }

    // ── Primary data ─────────────────────────────────────────────────

    /// The primary resource as `T`; `None` for `"data": null`.
    ///
    /// # Errors
    ///
    /// [`DocumentReadError::UnexpectedDocumentType`] unless the document
    /// holds a single resource, a single identifier or null.
    pub fn resource<T: Default + 'static>(&self) -> Result<Option<T>, DocumentError> {
        let found = self.require(
            "a single resource or null",
            &[
                DomDocumentType::ResourceDocument,
                DomDocumentType::ResourceIdentifierDocument,
                DomDocumentType::NullDocument,
            ],
        )?;
        if found == DomDocumentType::NullDocument {
            return Ok(None);
        }
        match self.document.primary_resources().first() {
            Some(resource) => self.ctx.mapper().read_resource(resource).map(Some),
            None => Ok(None),
        }
    }

    /// The primary resources as `T`, in document order.
    ///
    /// # Errors
    ///
    /// [`DocumentReadError::UnexpectedDocumentType`] unless primary data is
    /// a collection.
    pub fn resource_collection<T: Default + 'static>(&self) -> Result<Vec<T>, DocumentError> {
        self.require(
            "a resource collection",
            &[
                DomDocumentType::ResourceCollectionDocument,
                DomDocumentType::ResourceIdentifierCollectionDocument,
                DomDocumentType::EmptyDocument,
            ],
        )?;
        let mapper = self.ctx.mapper();
        self.document
            .primary_resources()
            .iter()
            .map(|resource| mapper.read_resource(resource))
            .collect()
    }

    /// The primary resource identifier; `None` for `"data": null`.
    ///
    /// # Errors
    ///
    /// [`DocumentReadError::UnexpectedDocumentType`] unless the document
    /// holds a single resource, a single identifier or null.
    pub fn resource_identifier(&self) -> Result<Option<ResourceIdentifier>, DocumentError> {
        self.require(
            "a single resource identifier or null",
            &[
                DomDocumentType::ResourceIdentifierDocument,
                DomDocumentType::ResourceDocument,
                DomDocumentType::NullDocument,
            ],
        )?;
        Ok(self
            .document
            .primary_resources()
            .first()
            .and_then(DomResource::identifier))
    }

    /// The primary resource identifiers, in document order.
    ///
    /// # Errors
    ///
    /// [`DocumentReadError::UnexpectedDocumentType`] unless primary data is
    /// a collection.
    pub fn resource_identifiers(&self) -> Result<Vec<ResourceIdentifier>, DocumentError> {
        self.require(
            "a resource identifier collection",
            &[
                DomDocumentType::ResourceIdentifierCollectionDocument,
                DomDocumentType::ResourceCollectionDocument,
                DomDocumentType::EmptyDocument,
            ],
        )?;
        Ok(self
            .document
            .primary_resources()
            .iter()
            .filter_map(DomResource::identifier)
            .collect())
    }

    // ── Included and lookup ──────────────────────────────────────────

    /// Every included resource whose `type` is `T`'s API type.
    ///
    /// # Errors
    ///
    /// [`jsonapi_model::ServiceModelError`] if `T` is unregistered, or any
    /// read error for a matching resource.
    pub fn included<T: Default + 'static>(&self) -> Result<Vec<T>, DocumentError> {
        let api_type = self.ctx.model().resource_type::<T>()?.api_type();
        let mapper = self.ctx.mapper();
        self.document
            .included()
            .iter()
            .filter(|resource| resource.api_type() == Some(api_type))
            .map(|resource| mapper.read_resource(resource))
            .collect()
    }

    /// The resource with `identifier`'s identity among primary data and
    /// included resources. Bare identifiers in primary data do not count.
    ///
    /// # Errors
    ///
    /// [`DocumentReadError::AmbiguousResource`] when more than one resource
    /// has the identity.
    pub fn find(&self, identifier: &ResourceIdentifier) -> Result<Option<DomResource<'d>>, DocumentError> {
        let mut matches = self
            .document
            .primary_resources()
            .into_iter()
            .filter(|resource| !resource.is_identifier())
            .chain(self.document.included())
            .filter(|resource| {
                resource.api_type() == Some(identifier.api_type.as_str())
                    && resource.id() == Some(identifier.id.as_str())
            });
        let first = matches.next();
        if first.is_some() && matches.next().is_some() {
            return Err(DocumentReadError::AmbiguousResource {
                api_type: identifier.api_type.clone(),
                id: identifier.id.clone(),
            }
            .into());
        }
        Ok(first)
    }

    /// [`DocumentReader::find`], read as `T`.
    ///
    /// # Errors
    ///
    /// Lookup errors and read errors.
    pub fn find_as<T: Default + 'static>(&self, identifier: &ResourceIdentifier) -> Result<Option<T>, DocumentError> {
        match self.find(identifier)? {
            Some(resource) => self.ctx.mapper().read_resource(&resource).map(Some),
            None => Ok(None),
        }
    }

    /// Resources linked from `resource` through relationship `rel`, in
    /// linkage order. Linked resources absent from the document are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Decode, lookup and read errors.
    pub fn related<R: Default + 'static>(&self, resource: &DomResource<'_>, rel: &str) -> Result<Vec<R>, DocumentError> {
        let Some(relationship) = resource.relationship(rel).map_err(DocumentReadError::from)? else {
            return Ok(Vec::new());
        };
        let Some(linkage) = relationship.data else {
            return Ok(Vec::new());
        };
        let mut related = Vec::new();
        for identifier in linkage.identifiers() {
            match self.find_as(identifier)? {
                Some(value) => related.push(value),
                None => tracing::debug!(%identifier, rel, "linked resource not in document"),
            }
        }
        Ok(related)
    }

    // ── Top level ────────────────────────────────────────────────────

    /// Top-level `meta`.
    ///
    /// # Errors
    ///
    /// [`DocumentReadError::Decode`] if the member does not decode.
    pub fn meta(&self) -> Result<Option<Meta>, DocumentError> {
        decode(self.document.meta())
    }

    /// Top-level `links`.
    ///
    /// # Errors
    ///
    /// [`DocumentReadError::Decode`] if the member does not decode.
    pub fn links(&self) -> Result<Option<Links>, DocumentError> {
        decode(self.document.links())
    }

    /// The version in the `jsonapi` member, if present.
    ///
    /// # Errors
    ///
    /// [`DocumentReadError::Decode`] for an unsupported version string.
    pub fn jsonapi_version(&self) -> Result<Option<JsonApiVersion>, DocumentError> {
        decode(self.document.jsonapi().and_then(|jsonapi| jsonapi.member("version")))
    }

    /// Error objects of an errors document; empty otherwise.
    ///
    /// # Errors
    ///
    /// [`DocumentReadError::Decode`] if an error object does not decode.
    pub fn errors(&self) -> Result<Vec<ErrorObject>, DocumentError> {
        self.document
            .errors()
            .map(|node| decode(Some(node)).map(Option::unwrap_or_default))
            .collect()
    }
}

fn decode<T: DeserializeOwned>(node: Option<&DomNode>) -> Result<Option<T>, DocumentError> {
    let Some(node) = node else {
        return Ok(None);
    };
    match node.to_value_with(&DomSettings::default()) {
        serde_json::Value::Null => Ok(None),
        value => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| DocumentReadError::Decode(e).into()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::context::DocumentContextOptions;
    use jsonapi_model::ServiceModelBuilder;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq)]
    struct Article {
        id: u64,
        title: String,
        author: Option<u64>,
        comments: Vec<u64>,
    }

    #[derive(Debug, Default, PartialEq)]
    struct Person {
        id: u64,
        name: String,
    }

    #[derive(Debug, Default, PartialEq)]
    struct Comment {
        id: u64,
        body: String,
    }

    fn ctx() -> DocumentContext {
        let model = ServiceModelBuilder::new()
            .resource_type::<Article>("articles")
            .id("id", |a: &Article| a.id, |a: &mut Article, id| a.id = id)
            .attribute("title", |a: &Article| a.title.clone(), |a: &mut Article, v| a.title = v)
            .to_one::<Person, _, _, _>("author", |a: &Article| a.author, |a: &mut Article, v| a.author = v)
            .to_many::<Comment, _, _, _>("comments", |a: &Article| a.comments.clone(), |a: &mut Article, v| a.comments = v)
            .end()
            .resource_type::<Person>("people")
            .id("id", |p: &Person| p.id, |p: &mut Person, id| p.id = id)
            .attribute("name", |p: &Person| p.name.clone(), |p: &mut Person, v| p.name = v)
            .end()
            .resource_type::<Comment>("comments")
            .id("id", |c: &Comment| c.id, |c: &mut Comment, id| c.id = id)
            .attribute("body", |c: &Comment| c.body.clone(), |c: &mut Comment, v| c.body = v)
            .end()
            .build()
            .unwrap();
        DocumentContext::new(Arc::new(model), DocumentContextOptions::default())
    }

    fn compound() -> DomDocument {
        DomDocument::parse(&json!({
            "jsonapi": {"version": "1.1"},
            "links": {"self": "http://x/articles/1"},
            "data": {
                "type": "articles",
                "id": "1",
                "attributes": {"title": "Rails is Omakase"},
                "relationships": {
                    "author": {"data": {"type": "people", "id": "9"}},
                    "comments": {"data": [
                        {"type": "comments", "id": "5"},
                        {"type": "comments", "id": "12"},
                        {"type": "comments", "id": "99"}
                    ]}
                }
            },
            "included": [
                {"type": "people", "id": "9", "attributes": {"name": "Dan"}},
                {"type": "comments", "id": "5", "attributes": {"body": "First!"}},
                {"type": "comments", "id": "12", "attributes": {"body": "I like XML better"}}
            ],
            "meta": {"total": 1}
        }))
        .unwrap()
    }

    #[test]
    fn test_read_primary_resource() {
        let ctx = ctx();
        let doc = compound();
        let article: Article = ctx.reader(&doc).resource().unwrap().unwrap();
        assert_eq!(
            article,
            Article {
                id: 1,
                title: "Rails is Omakase".into(),
                author: Some(9),
                comments: vec![5, 12, 99],
            }
        );
    }

    #[test]
    fn test_read_included_and_related() {
        let ctx = ctx();
        let doc = compound();
        let reader = ctx.reader(&doc);
        assert_eq!(reader.included::<Comment>().unwrap().len(), 2);
        let primary = doc.primary_resources()[0];
        let author: Vec<Person> = reader.related(&primary, "author").unwrap();
        assert_eq!(author, vec![Person { id: 9, name: "Dan".into() }]);
        let comments: Vec<Comment> = reader.related(&primary, "comments").unwrap();
        assert_eq!(comments.iter().map(|c| c.id).collect::<Vec<_>>(), vec![5, 12]);
        assert!(reader.related::<Person>(&primary, "editors").unwrap().is_empty());
    }

    #[test]
    fn test_top_level_members() {
        let ctx = ctx();
        let doc = compound();
        let reader = ctx.reader(&doc);
        assert_eq!(reader.jsonapi_version().unwrap(), Some(JsonApiVersion::V1_1));
        assert_eq!(reader.meta().unwrap().unwrap().get("total"), Some(&json!(1)));
        assert_eq!(reader.links().unwrap().unwrap().get("self").unwrap().href(), "http://x/articles/1");
        assert!(reader.errors().unwrap().is_empty());
    }

    #[test]
    fn test_null_and_wrong_document_types() {
        let ctx = ctx();
        let null = DomDocument::parse(&json!({"data": null})).unwrap();
        assert_eq!(ctx.reader(&null).resource::<Article>().unwrap(), None);
        let err = ctx.reader(&null).resource_collection::<Article>().unwrap_err();
        assert!(matches!(
            err,
            DocumentError::Read(DocumentReadError::UnexpectedDocumentType {
                found: DomDocumentType::NullDocument,
                ..
            })
        ));
    }

    #[test]
    fn test_identifier_collection_reads() {
        let ctx = ctx();
        let doc = DomDocument::parse(&json!({"data": [
            {"type": "people", "id": "1"},
            {"type": "people", "id": "2"}
        ]}))
        .unwrap();
        let reader = ctx.reader(&doc);
        assert_eq!(reader.resource_identifiers().unwrap().len(), 2);
        let people: Vec<Person> = reader.resource_collection().unwrap();
        assert_eq!(people[1], Person { id: 2, name: String::new() });
    }

    #[test]
    fn test_ambiguous_lookup() {
        let ctx = ctx();
        let doc = DomDocument::parse(&json!({
            "data": {"type": "people", "id": "1", "attributes": {"name": "A"}},
            "included": [{"type": "people", "id": "1", "attributes": {"name": "B"}}]
        }))
        .unwrap();
        let err = ctx
            .reader(&doc)
            .find(&ResourceIdentifier::new("people", "1"))
            .unwrap_err();
        assert!(matches!(err, DocumentError::Read(DocumentReadError::AmbiguousResource { .. })));
    }

    #[test]
    fn test_errors_document() {
        let ctx = ctx();
        let doc = DomDocument::parse(&json!({"errors": [
            {"status": "422", "title": "Invalid Attribute", "source": {"pointer": "/data/attributes/title"}}
        ]}))
        .unwrap();
        let errors = ctx.reader(&doc).errors().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].status.as_deref(), Some("422"));
        assert_eq!(errors[0].source.as_ref().unwrap().pointer.as_deref(), Some("/data/attributes/title"));
    }
}
