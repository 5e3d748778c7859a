//! # Async Facade
//!
//! Parsing, serializing and building are CPU-bound and synchronous. These
//! wrappers run them on tokio's blocking pool so async hosts do not stall
//! their executor on large documents. Cancellation happens only at the
//! `.await`; a started operation always runs to completion.

use jsonapi_dom::DomDocument;

use crate::context::DocumentContext;
use crate::error::DocumentError;

/// Parse JSON text on the blocking pool.
///
/// # Errors
///
/// Same as [`DocumentContext::parse`], plus [`DocumentError::Task`] if the
/// blocking task panicked.
pub async fn parse_document(ctx: DocumentContext, text: String) -> Result<DomDocument, DocumentError> {
    tokio::task::spawn_blocking(move || ctx.parse(&text)).await?
}

/// Serialize a document with the context's settings on the blocking pool.
///
/// # Errors
///
/// Same as [`DocumentContext::serialize`], plus [`DocumentError::Task`].
pub async fn serialize_document(ctx: DocumentContext, document: DomDocument) -> Result<String, DocumentError> {
    tokio::task::spawn_blocking(move || ctx.serialize(&document)).await?
}

/// Run a document-building closure on the blocking pool.
///
/// The closure receives the context so it can start a
/// [`DocumentBuilder`](crate::builder::DocumentBuilder) over data it owns.
///
/// # Errors
///
/// Whatever the closure returns, plus [`DocumentError::Task`].
pub async fn build_document<F>(ctx: DocumentContext, build: F) -> Result<DomDocument, DocumentError>
where
    F: FnOnce(&DocumentContext) -> Result<DomDocument, DocumentError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || build(&ctx)).await?
}
