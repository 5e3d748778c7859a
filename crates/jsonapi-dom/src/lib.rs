//! # jsonapi-dom — Typed Document Object Model
//!
//! Turns a generic JSON tree into a typed tree whose nodes know what they
//! denote in JSON:API terms, and turns that tree back into JSON.
//!
//! ## Building
//!
//! [`DomBuilder::build`] walks the JSON depth first. The classifiers from
//! `jsonapi-core` decide the document variant, the shape of every `data`
//! member and the cardinality of every relationship. Structural errors are
//! accumulated with JSON pointers instead of aborting, so a single pass
//! reports every violation and still yields a tree.
//!
//! ## Serializing
//!
//! [`DomNode::to_value_with`] writes the tree back in member order.
//! Null-valued properties follow [`jsonapi_core::DomSettings`]: `data` is
//! always written, `meta` has its own policy, everything else uses the
//! default policy.
//!
//! ## Crate Policy
//!
//! - Depends only on `jsonapi-core`.
//! - Trees are single-owner values; there is no interior mutability.
//! - No `.unwrap()` outside tests.

pub mod builder;
pub mod document;
pub mod node;
pub mod resource;
mod serialize;

pub use builder::{DomBuildOutput, DomBuilder};
pub use document::{DomDocument, DomParseError};
pub use node::{
    DomNode, NodeData, NodeType, ObjectKind, ScalarType, ScalarValue, ATTR_API_ID, ATTR_API_TYPE,
    ATTR_DOCUMENT_TYPE, ATTR_RELATIONSHIP_TYPE,
};
pub use resource::DomResource;
