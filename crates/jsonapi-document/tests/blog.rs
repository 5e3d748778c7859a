//! End-to-end tests over a small blog model: articles with uuid ids and
//! timestamps, people with nested addresses, comments. Documents are built,
//! serialized to text, parsed back and read into Rust values.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use jsonapi_core::{DomDocumentType, DomRelationshipType, Linkage, Link, Meta, ResourceIdentifier};
use jsonapi_document::{
    DocumentBuildError, DocumentContext, DocumentContextOptions, DocumentError, DocumentReadError,
};
use jsonapi_model::{ServiceModel, ServiceModelBuilder};

#[derive(Debug, Clone, PartialEq)]
struct Article {
    id: Uuid,
    title: String,
    published_at: DateTime<Utc>,
    tags: Vec<String>,
    author: Option<u64>,
    comments: Vec<u64>,
}

impl Default for Article {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            title: String::new(),
            published_at: DateTime::<Utc>::default(),
            tags: Vec::new(),
            author: None,
            comments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Address {
    street_line: String,
    postal_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Person {
    id: u64,
    display_name: String,
    home_address: Option<Address>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Comment {
    id: u64,
    body: String,
    author: Option<u64>,
}

fn model() -> ServiceModel {
    ServiceModelBuilder::new()
        .complex_type::<Address>()
        .attribute("street_line")
        .attribute("postal_code")
        .end()
        .resource_type::<Article>("articles")
        .id("id", |a: &Article| a.id, |a: &mut Article, id| a.id = id)
        .attribute("title", |a: &Article| a.title.clone(), |a: &mut Article, v| a.title = v)
        .attribute("published_at", |a: &Article| a.published_at, |a: &mut Article, v| a.published_at = v)
        .attribute("tags", |a: &Article| a.tags.clone(), |a: &mut Article, v| a.tags = v)
        .to_one::<Person, _, _, _>("author", |a: &Article| a.author, |a: &mut Article, v| a.author = v)
        .to_many::<Comment, _, _, _>("comments", |a: &Article| a.comments.clone(), |a: &mut Article, v| a.comments = v)
        .end()
        .resource_type::<Person>("people")
        .id("id", |p: &Person| p.id, |p: &mut Person, id| p.id = id)
        .attribute("display_name", |p: &Person| p.display_name.clone(), |p: &mut Person, v| p.display_name = v)
        .complex_attribute::<Address, _, _, _>(
            "home_address",
            |p: &Person| p.home_address.clone(),
            |p: &mut Person, v| p.home_address = v,
        )
        .end()
        .resource_type::<Comment>("comments")
        .id("id", |c: &Comment| c.id, |c: &mut Comment, id| c.id = id)
        .attribute("body", |c: &Comment| c.body.clone(), |c: &mut Comment, v| c.body = v)
        .to_one::<Person, _, _, _>("author", |c: &Comment| c.author, |c: &mut Comment, v| c.author = v)
        .end()
        .build()
        .expect("blog model is valid")
}

fn context(base_url: Option<&str>) -> DocumentContext {
    DocumentContext::new(
        Arc::new(model()),
        DocumentContextOptions {
            base_url: base_url.map(str::to_string),
            ..DocumentContextOptions::default()
        },
    )
}

fn article() -> Article {
    Article {
        id: Uuid::parse_str("6f1c1e52-3f0e-4d2a-9a43-7d5b1d2f8c10").unwrap(),
        title: "JSON:API paints my bikeshed!".into(),
        published_at: Utc.with_ymd_and_hms(2015, 5, 22, 14, 56, 29).unwrap(),
        tags: vec!["api".into(), "json".into()],
        author: Some(9),
        comments: vec![5, 12],
    }
}

fn dan() -> Person {
    Person {
        id: 9,
        display_name: "Dan Gebhardt".into(),
        home_address: Some(Address {
            street_line: "1 Main St".into(),
            postal_code: None,
        }),
    }
}

fn comments() -> Vec<Comment> {
    vec![
        Comment { id: 5, body: "First!".into(), author: Some(2) },
        Comment { id: 12, body: "I like XML better".into(), author: Some(9) },
    ]
}

// ── Compound documents ───────────────────────────────────────────────

#[test]
fn test_compound_document_round_trip_through_text() {
    let ctx = context(Some("http://example.com"));
    let article = article();
    let author = dan();
    let comments = comments();

    let doc = ctx
        .builder()
        .link("self", Link::url("http://example.com/articles"))
        .resource(&article)
        .relationship_meta("comments", Meta::new().with("count", 2))
        .end()
        .included(&author)
        .end()
        .included_collection(&comments)
        .end()
        .meta(Meta::new().with("copyright", "Copyright 2015 Example Corp."))
        .build()
        .unwrap();
    let text = ctx.serialize(&doc).unwrap();

    let parsed = ctx.parse(&text).unwrap();
    assert_eq!(parsed.document_type(), DomDocumentType::ResourceDocument);
    let reader = ctx.reader(&parsed);
    assert_eq!(reader.resource::<Article>().unwrap(), Some(article.clone()));
    assert_eq!(reader.included::<Person>().unwrap(), vec![author]);
    assert_eq!(reader.included::<Comment>().unwrap(), comments);

    let primary = parsed.primary_resources()[0];
    let linked: Vec<Comment> = reader.related(&primary, "comments").unwrap();
    assert_eq!(linked.len(), 2);
    assert_eq!(
        primary.relationship("comments").unwrap().unwrap().meta.unwrap().get("count"),
        Some(&json!(2))
    );
    assert_eq!(
        primary.links().unwrap().unwrap().get("self").unwrap().href(),
        format!("http://example.com/articles/{}", article.id)
    );
}

#[test]
fn test_wire_shape_of_complex_and_temporal_attributes() {
    let ctx = context(None);
    let author = dan();
    let article = article();
    let value = ctx.builder().resource(&author).end().build().unwrap().to_value();
    assert_eq!(
        value["data"]["attributes"],
        json!({
            "displayName": "Dan Gebhardt",
            "homeAddress": {"streetLine": "1 Main St", "postalCode": null}
        })
    );
    let value = ctx.builder().resource(&article).end().build().unwrap().to_value();
    assert_eq!(value["data"]["attributes"]["publishedAt"], "2015-05-22T14:56:29Z");
    assert_eq!(value["data"]["id"], article.id.to_string());
}

// ── Cardinality ──────────────────────────────────────────────────────

#[test]
fn test_builder_rejects_wrong_cardinality() {
    let ctx = context(None);
    let article = article();
    let err = ctx
        .builder()
        .resource(&article)
        .relationship("author", Linkage::to_many([ResourceIdentifier::new("people", "9")]))
        .end()
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        DocumentError::Build(DocumentBuildError::CardinalityMismatch { ref rel, .. }) if rel == "author"
    ));
}

#[test]
fn test_builder_rejects_to_one_linkage_for_comments() {
    let ctx = context(None);
    let article = article();
    let err = ctx
        .builder()
        .resource(&article)
        .relationship("comments", Linkage::to_one(ResourceIdentifier::new("comments", "5")))
        .end()
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        DocumentError::Build(DocumentBuildError::CardinalityMismatch { ref rel, .. }) if rel == "comments"
    ));
    assert_eq!(err.status_and_code().0, 400);
}

#[test]
fn test_reader_rejects_to_many_linkage_for_author() {
    let ctx = context(None);
    let doc = ctx
        .parse(
            &json!({"data": {
                "type": "articles",
                "id": "6f1c1e52-3f0e-4d2a-9a43-7d5b1d2f8c10",
                "attributes": {"title": "x"},
                "relationships": {"author": {"data": [{"type": "people", "id": "9"}]}}
            }})
            .to_string(),
        )
        .unwrap();
    let err = ctx.reader(&doc).resource::<Article>().unwrap_err();
    match err {
        DocumentError::Read(DocumentReadError::CardinalityMismatch { rel, found, .. }) => {
            assert_eq!(rel, "author");
            assert_eq!(found, DomRelationshipType::ToManyRelationship);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_reader_rejects_wrong_cardinality() {
    let ctx = context(None);
    let doc = ctx
        .parse(
            &json!({"data": {
                "type": "articles",
                "id": "6f1c1e52-3f0e-4d2a-9a43-7d5b1d2f8c10",
                "attributes": {"title": "x"},
                "relationships": {"comments": {"data": {"type": "comments", "id": "5"}}}
            }})
            .to_string(),
        )
        .unwrap();
    let err = ctx.reader(&doc).resource::<Article>().unwrap_err();
    assert!(matches!(err, DocumentError::Read(DocumentReadError::CardinalityMismatch { .. })));
    assert_eq!(err.status_and_code(), (400, "DOCUMENT_READ_ERROR"));
}

// ── Client documents ─────────────────────────────────────────────────

#[test]
fn test_invalid_uuid_is_read_error() {
    let ctx = context(None);
    let doc = ctx
        .parse(r#"{"data": {"type": "articles", "id": "not-a-uuid", "attributes": {"title": "x"}}}"#)
        .unwrap();
    let err = ctx.reader(&doc).resource::<Article>().unwrap_err();
    assert!(matches!(err, DocumentError::Read(DocumentReadError::InvalidId { .. })));
}

#[test]
fn test_structural_errors_become_error_objects() {
    let ctx = context(None);
    let err = ctx
        .parse(r#"{"data": {"type": "articles", "id": 1, "attributes": []}, "included": {}}"#)
        .unwrap_err();
    let objects = err.to_error_objects();
    assert!(objects.len() >= 2);
    assert!(objects.iter().all(|o| o.status.as_deref() == Some("400")));
    assert!(objects
        .iter()
        .any(|o| o.source.as_ref().and_then(|s| s.pointer.as_deref()) == Some("/data/id")));

    let errors_doc = ctx.builder().errors(objects).build().unwrap();
    assert_eq!(errors_doc.document_type(), DomDocumentType::ErrorsDocument);
}

#[test]
fn test_first_element_decides_collection_shape() {
    let ctx = context(None);
    let doc = ctx
        .parse(
            &json!({"data": [
                {"type": "people", "id": "1"},
                {"type": "people", "id": "2", "attributes": {"displayName": "Two"}}
            ]})
            .to_string(),
        )
        .unwrap();
    assert_eq!(doc.document_type(), DomDocumentType::ResourceIdentifierCollectionDocument);
    let people: Vec<Person> = ctx.reader(&doc).resource_collection().unwrap();
    assert_eq!(people[0].id, 1);
}

// ── Properties ───────────────────────────────────────────────────────

fn arb_person() -> impl Strategy<Value = Person> {
    (
        any::<u64>(),
        "[a-zA-Z ]{0,24}",
        proptest::option::of(("[a-z0-9 ]{1,16}", proptest::option::of("[0-9]{5}"))),
    )
        .prop_map(|(id, display_name, address)| Person {
            id,
            display_name,
            home_address: address.map(|(street_line, postal_code)| Address { street_line, postal_code }),
        })
}

fn arb_comment() -> impl Strategy<Value = Comment> {
    (any::<u64>(), ".{0,32}", proptest::option::of(any::<u64>()))
        .prop_map(|(id, body, author)| Comment { id, body, author })
}

proptest! {
    #[test]
    fn mapper_round_trips_people(person in arb_person()) {
        let ctx = context(None);
        let doc = ctx.builder().resource(&person).end().build().unwrap();
        let parsed = ctx.parse(&ctx.serialize(&doc).unwrap()).unwrap();
        let read: Option<Person> = ctx.reader(&parsed).resource().unwrap();
        prop_assert_eq!(read, Some(person));
    }

    #[test]
    fn mapper_round_trips_comment_collections(comments in proptest::collection::vec(arb_comment(), 0..6)) {
        let ctx = context(Some("https://api.example.com/v1/"));
        let doc = ctx.builder().resource_collection(&comments).end().build().unwrap();
        let parsed = ctx.parse(&ctx.serialize(&doc).unwrap()).unwrap();
        let read: Vec<Comment> = ctx.reader(&parsed).resource_collection().unwrap();
        prop_assert_eq!(read, comments);
    }
}
