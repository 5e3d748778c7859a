//! # Document Context
//!
//! Everything a document operation needs besides the document itself: the
//! shared [`ServiceModel`], link emission options, serialization settings
//! and the [`UrlBuilder`] used for hypermedia.
//!
//! A context is cheap to clone (the model and URL builder are behind
//! `Arc`) and is `Send + Sync`, so one can serve many concurrent requests.
//!
//! ## Configuration
//!
//! [`DocumentContextOptions`] is plain data with serde support so hosts can
//! load it from their own configuration files. A custom [`UrlBuilder`] is
//! code, not data, and is attached with [`DocumentContext::with_url_builder`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use jsonapi_core::DomSettings;
use jsonapi_dom::DomDocument;
use jsonapi_model::ServiceModel;

use crate::builder::DocumentBuilder;
use crate::error::DocumentError;
use crate::hypermedia::{BaseUrlBuilder, UrlBuilder};
use crate::mapper::ResourceMapper;
use crate::reader::DocumentReader;

/// Options for building and writing documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentContextOptions {
    /// Base URL for generated links. Without it (and without a custom URL
    /// builder) no links are generated.
    pub base_url: Option<String>,
    /// Generate resource `self` links.
    pub resource_links: bool,
    /// Generate relationship `self` and `related` links.
    pub relationship_links: bool,
    /// Serialization settings for written documents.
    pub settings: DomSettings,
}

impl Default for DocumentContextOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            resource_links: true,
            relationship_links: true,
            settings: DomSettings::default(),
        }
    }
}

/// Shared state for document operations.
#[derive(Debug, Clone)]
pub struct DocumentContext {
    model: Arc<ServiceModel>,
    options: DocumentContextOptions,
    url_builder: Option<Arc<dyn UrlBuilder>>,
}

impl DocumentContext {
    /// A context over `model`. A [`BaseUrlBuilder`] is installed when
    /// `options.base_url` is set.
    pub fn new(model: Arc<ServiceModel>, options: DocumentContextOptions) -> Self {
        let url_builder = options
            .base_url
            .as_deref()
            .map(|base| Arc::new(BaseUrlBuilder::new(base)) as Arc<dyn UrlBuilder>);
        Self {
            model,
            options,
            url_builder,
        }
    }

    /// Replace the URL builder.
    pub fn with_url_builder(mut self, url_builder: Arc<dyn UrlBuilder>) -> Self {
        self.url_builder = Some(url_builder);
        self
    }

    /// The service model.
    pub fn model(&self) -> &ServiceModel {
        &self.model
    }

    /// The shared service model handle.
    pub fn model_arc(&self) -> Arc<ServiceModel> {
        Arc::clone(&self.model)
    }

    /// The options this context was created with.
    pub fn options(&self) -> &DocumentContextOptions {
        &self.options
    }

    /// The URL builder, if links can be generated.
    pub fn url_builder(&self) -> Option<&dyn UrlBuilder> {
        self.url_builder.as_deref()
    }

    /// A resource mapper over this context's model.
    pub fn mapper(&self) -> ResourceMapper<'_> {
        ResourceMapper::new(&self.model)
    }

    /// Start building a document.
    pub fn builder(&self) -> DocumentBuilder<'_> {
        DocumentBuilder::new(self)
    }

    /// A typed reader over `document`.
    pub fn reader<'d>(&'d self, document: &'d DomDocument) -> DocumentReader<'d> {
        DocumentReader::new(self, document)
    }

    /// Parse JSON text into a structurally valid document.
    ///
    /// # Errors
    ///
    /// [`DocumentError::Json`] for malformed text and
    /// [`DocumentError::Structural`] with every violation found.
    pub fn parse(&self, text: &str) -> Result<DomDocument, DocumentError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let document = DomDocument::parse(&value)?;
        tracing::debug!(document_type = %document.document_type(), "parsed document");
        Ok(document)
    }

    /// Serialize `document` with this context's settings.
    ///
    /// # Errors
    ///
    /// Fails only if the tree holds values JSON cannot represent.
    pub fn serialize(&self, document: &DomDocument) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(&document.to_value_with(&self.options.settings))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonapi_core::{DomDocumentType, NullHandling};
    use jsonapi_model::ServiceModelBuilder;
    use serde_json::json;

    fn context(options: DocumentContextOptions) -> DocumentContext {
        DocumentContext::new(Arc::new(ServiceModelBuilder::new().build().unwrap()), options)
    }

    #[test]
    fn test_options_from_config() {
        let options: DocumentContextOptions = serde_json::from_value(json!({
            "base_url": "https://api.example.com",
            "relationship_links": false,
            "settings": {"null_handling": "ignore"}
        }))
        .unwrap();
        assert!(options.resource_links);
        assert!(!options.relationship_links);
        assert_eq!(options.settings.null_handling, NullHandling::Ignore);
        assert!(context(options).url_builder().is_some());
    }

    #[test]
    fn test_no_url_builder_without_base() {
        assert!(context(DocumentContextOptions::default()).url_builder().is_none());
    }

    #[test]
    fn test_parse_and_serialize_with_settings() {
        let ctx = context(DocumentContextOptions {
            settings: DomSettings {
                null_handling: NullHandling::Ignore,
                ..DomSettings::default()
            },
            ..DocumentContextOptions::default()
        });
        let doc = ctx.parse(r#"{"data": null, "meta": {"note": null}}"#).unwrap();
        assert_eq!(doc.document_type(), DomDocumentType::NullDocument);
        assert_eq!(ctx.serialize(&doc).unwrap(), r#"{"data":null,"meta":{}}"#);
    }

    #[test]
    fn test_parse_reports_json_and_structural_errors() {
        let ctx = context(DocumentContextOptions::default());
        assert!(matches!(ctx.parse("{"), Err(DocumentError::Json(_))));
        assert!(matches!(ctx.parse("[]"), Err(DocumentError::Structural(_))));
    }
}
