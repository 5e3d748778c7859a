//! # jsonapi-model — Service Model
//!
//! The registry that tells the mapper how each Rust type looks on the wire:
//! its API type name and id binding, attributes, relationships, links and
//! meta. Registration is explicit. Closures registered through
//! [`ServiceModelBuilder`] stand in for reflection and are resolved once.
//!
//! ## Lifecycle
//!
//! Build once with [`ServiceModelBuilder::build`], wrap in an `Arc`, share
//! read-only. A [`ServiceModel`] has no interior mutability, so concurrent
//! readers need no locking.
//!
//! ## Naming Rules
//!
//! Attribute and relationship names are unique ignoring ASCII case within a
//! type. When two registrations collide the last one wins and the earlier
//! one is dropped with a `warn`-level log line. API type names are
//! case-sensitive.
//!
//! ## Crate Policy
//!
//! - Depends only on `jsonapi-core`.
//! - All closures are `Send + Sync`.
//! - No `.unwrap()` outside tests.

pub mod attribute;
pub mod binding;
pub mod builder;
pub mod error;
pub mod id;
pub mod naming;
pub mod relationship;
pub mod resource_type;
pub mod service_model;

pub use attribute::{AttributeInfo, AttributesInfo};
pub use binding::Binding;
pub use builder::{ComplexTypeBuilder, ResourceTypeBuilder, ServiceModelBuilder};
pub use error::{AccessorError, ServiceModelError};
pub use id::{ApiId, IdParseError};
pub use naming::NamingConvention;
pub use relationship::{
    CanonicalRelPathMode, Cardinality, RelatedIds, RelationshipInfo, RelationshipsInfo,
};
pub use resource_type::{
    ComplexType, IdInfo, LinkInfo, LinksInfo, MetaInfo, ResourceIdentityInfo, ResourceType,
};
pub use service_model::ServiceModel;
