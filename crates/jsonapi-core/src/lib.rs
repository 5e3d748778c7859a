//! # jsonapi-core — Foundational Types for JSON:API Documents
//!
//! This crate is the leaf of the workspace. It defines the vocabulary every
//! other crate speaks: the structural classifiers that decide what a JSON
//! object *is* in JSON:API terms, the JSON pointers attached to structural
//! errors, the wire value types (links, linkage, error objects), and the
//! process-wide DOM settings.
//!
//! ## Key Design Principles
//!
//! 1. **Classification is total.** [`classify_data`] never fails; it returns
//!    [`DomDataType::None`] for shapes it cannot name. [`classify_document`]
//!    and [`classify_relationship`] only fail for definite protocol violations.
//!
//! 2. **Inherited ambiguities are preserved.** A three-member object with
//!    `type`, `id` and `meta` is a resource identifier, and the first element
//!    of a `data` array decides the shape of the whole collection. Producers
//!    in the wild rely on both rules.
//!
//! 3. **Every structural error has a location.** [`StructuralError`] always
//!    carries a [`JsonPointer`] to the offending member.
//!
//! 4. **Member order is preserved.** The workspace builds `serde_json` with
//!    `preserve_order`, so objects round-trip in insertion order.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `jsonapi-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod classify;
pub mod error;
pub mod error_object;
pub mod keywords;
pub mod linkage;
pub mod links;
pub mod pointer;
pub mod settings;
pub mod types;
pub mod version;

// Re-export primary types for ergonomic imports.
pub use classify::{
    classify_data, classify_data_strict, classify_document, classify_document_at,
    classify_relationship, classify_relationship_at,
};
pub use error::{StructuralError, StructuralErrorKind, StructuralErrors};
pub use error_object::{ErrorObject, ErrorSource};
pub use linkage::{Linkage, Relationship, Relationships, ResourceIdentifier};
pub use links::{Link, Links, Meta};
pub use pointer::JsonPointer;
pub use settings::{DomSettings, NullHandling};
pub use types::{json_type_name, ApiPropertyType, DomDataType, DomDocumentType, DomRelationshipType};
pub use version::JsonApiVersion;
