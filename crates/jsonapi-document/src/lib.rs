//! # jsonapi-document — Typed Documents
//!
//! Connects registered Rust types to JSON:API documents.
//!
//! - [`ResourceMapper`] copies values between Rust types and wire resources
//!   following the [`ServiceModel`](jsonapi_model::ServiceModel).
//! - [`DocumentBuilder`] assembles outgoing documents and fills hypermedia
//!   links through a [`UrlBuilder`].
//! - [`DocumentReader`] extracts Rust types from parsed documents.
//! - [`task`] runs parse, serialize and build on tokio's blocking pool.
//!
//! All entry points hang off a [`DocumentContext`], which bundles the shared
//! model with [`DocumentContextOptions`].
//!
//! ## Error Model
//!
//! Every fallible operation returns [`DocumentError`], whose
//! [`status_and_code`](DocumentError::status_and_code) gives the HTTP status
//! a host should answer with. Structural problems in client documents, read
//! failures and builder misuse are `400`; service model misconfiguration is
//! `500`.
//!
//! ## Crate Policy
//!
//! - Synchronous core; async only in [`task`].
//! - No `.unwrap()` outside tests.

pub mod builder;
pub mod context;
pub mod error;
pub mod hypermedia;
pub mod mapper;
pub mod reader;
pub mod task;

pub use builder::{DocumentBuilder, ResourceBuilder, ResourceCollectionBuilder};
pub use context::{DocumentContext, DocumentContextOptions};
pub use error::{DocumentBuildError, DocumentError, DocumentReadError};
pub use hypermedia::{BaseUrlBuilder, HypermediaPath, PathSegment, UrlBuilder};
pub use mapper::{ResourceMapper, ResourceObject};
pub use reader::DocumentReader;
