//! # Document Errors
//!
//! ## Design
//!
//! - [`DocumentReadError`]: a structurally valid document does not map onto
//!   the registered Rust types (bad id, wrong cardinality, undecodable
//!   attribute, ambiguous lookup).
//! - [`DocumentBuildError`]: an outgoing document was assembled wrong.
//! - [`DocumentError`] gathers these with structural and service model
//!   errors and maps each to an HTTP status hint. Client-caused errors are
//!   `400`; configuration errors are `500` and their details are never
//!   written into error objects.

use thiserror::Error;

use jsonapi_core::{DomDocumentType, ErrorObject, StructuralErrors};
use jsonapi_model::{AccessorError, Cardinality, IdParseError, ServiceModelError};

/// A wire document that cannot be mapped onto Rust types.
#[derive(Error, Debug)]
pub enum DocumentReadError {
    /// The document is not of a variant the read operation accepts.
    #[error("expected {expected}, found {found}")]
    UnexpectedDocumentType {
        /// What the operation accepts.
        expected: &'static str,
        /// The actual classification.
        found: DomDocumentType,
    },

    /// A resource's `type` does not match the Rust type being read.
    #[error("expected resource of type '{expected}', found '{found}'")]
    TypeMismatch {
        /// API type of the target Rust type.
        expected: String,
        /// API type on the wire.
        found: String,
    },

    /// A resource id does not parse into the id type.
    #[error("invalid id for '{api_type}': {source}")]
    InvalidId {
        /// API type of the resource.
        api_type: String,
        /// Parser failure.
        source: IdParseError,
    },

    /// An attribute value does not decode into its field.
    #[error("attribute '{attribute}' of '{api_type}': {source}")]
    Attribute {
        /// API type of the resource.
        api_type: String,
        /// API attribute name.
        attribute: String,
        /// Binding failure.
        source: AccessorError,
    },

    /// A relationship, links or meta member does not decode or bind.
    #[error("member '{member}' of '{api_type}': {source}")]
    Member {
        /// API type of the resource.
        api_type: String,
        /// Member name.
        member: String,
        /// Binding failure.
        source: AccessorError,
    },

    /// Wire linkage cardinality differs from the registered cardinality.
    #[error("relationship '{rel}' of '{api_type}' is registered {expected:?}, wire linkage is {found}")]
    CardinalityMismatch {
        /// API type of the resource.
        api_type: String,
        /// Relationship name.
        rel: String,
        /// Registered cardinality.
        expected: Cardinality,
        /// Wire classification.
        found: jsonapi_core::DomRelationshipType,
    },

    /// More than one resource in the document has the requested identity.
    #[error("more than one resource with identity {api_type}:{id}")]
    AmbiguousResource {
        /// API type.
        api_type: String,
        /// Resource id.
        id: String,
    },

    /// A DOM member could not be decoded into its wire type.
    #[error("decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// An outgoing document that cannot be assembled.
#[derive(Error, Debug)]
pub enum DocumentBuildError {
    /// Linkage of the wrong cardinality for a relationship.
    #[error("relationship '{rel}' of '{api_type}' is {expected:?}, linkage has the other cardinality")]
    CardinalityMismatch {
        /// API type of the resource.
        api_type: String,
        /// Relationship name.
        rel: String,
        /// Registered cardinality.
        expected: Cardinality,
    },

    /// Linkage was supplied for a relationship the type does not declare.
    #[error("'{api_type}' has no relationship '{rel}'")]
    UnknownRelationship {
        /// API type of the resource.
        api_type: String,
        /// Relationship name.
        rel: String,
    },

    /// Per-item values do not match the number of resources.
    #[error("{what}: expected {expected} items for the collection, got {found}")]
    CountMismatch {
        /// Which per-item setting.
        what: &'static str,
        /// Collection size.
        expected: usize,
        /// Supplied item count.
        found: usize,
    },

    /// Primary data was set twice.
    #[error("primary data already set")]
    PrimaryDataAlreadySet,

    /// Primary data and errors were both set.
    #[error("a document cannot carry both data and errors")]
    DataWithErrors,

    /// A non-singleton resource without a usable id.
    #[error("resource of type '{api_type}' has no id binding and is not a singleton")]
    MissingId {
        /// API type of the resource.
        api_type: String,
    },

    /// An attribute value could not be read or encoded.
    #[error("attribute '{attribute}' of '{api_type}': {source}")]
    Attribute {
        /// API type of the resource.
        api_type: String,
        /// API attribute name.
        attribute: String,
        /// Binding failure.
        source: AccessorError,
    },

    /// A relationship, links or meta field could not be read.
    #[error("member '{member}' of '{api_type}': {source}")]
    Member {
        /// API type of the resource.
        api_type: String,
        /// Member name.
        member: String,
        /// Binding failure.
        source: AccessorError,
    },
}

/// Any failure while reading or writing a document.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Wire JSON violates JSON:API structure.
    #[error("invalid JSON:API document:\n{0}")]
    Structural(#[from] StructuralErrors),

    /// Wire document does not map onto Rust types.
    #[error("read error: {0}")]
    Read(#[from] DocumentReadError),

    /// Outgoing document assembled wrong.
    #[error("build error: {0}")]
    Build(#[from] DocumentBuildError),

    /// Service model misconfiguration.
    #[error("service model error: {0}")]
    ServiceModel(#[from] ServiceModelError),

    /// A blocking task was cancelled or panicked.
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl DocumentError {
    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (u16, &'static str) {
        match self {
            Self::Json(_) => (400, "INVALID_JSON"),
            Self::Structural(_) => (400, "INVALID_DOCUMENT"),
            Self::Read(_) => (400, "DOCUMENT_READ_ERROR"),
            Self::Build(_) => (400, "DOCUMENT_BUILD_ERROR"),
            Self::ServiceModel(_) => (500, "SERVICE_MODEL_ERROR"),
            Self::Task(_) => (500, "INTERNAL_ERROR"),
        }
    }

    /// HTTP status hint.
    pub fn status_code(&self) -> u16 {
        self.status_and_code().0
    }

    /// Error objects for an errors document.
    ///
    /// Structural errors become one object per violation with a source
    /// pointer. Server-side errors are logged and reported without detail.
    pub fn to_error_objects(&self) -> Vec<ErrorObject> {
        let (status, code) = self.status_and_code();
        let mut objects = match self {
            Self::Structural(errors) => Vec::<ErrorObject>::from(errors),
            Self::ServiceModel(_) | Self::Task(_) => {
                tracing::error!(error = %self, "internal document error");
                vec![ErrorObject::new(status, "Internal error", "An internal error occurred")]
            }
            other => vec![ErrorObject::new(status, "Invalid document", other.to_string())],
        };
        for object in &mut objects {
            object.code = Some(code.to_string());
        }
        objects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonapi_core::{JsonPointer, StructuralError, StructuralErrorKind};

    #[test]
    fn test_status_codes() {
        let read = DocumentError::from(DocumentReadError::AmbiguousResource {
            api_type: "people".into(),
            id: "9".into(),
        });
        assert_eq!(read.status_code(), 400);
        let build = DocumentError::from(DocumentBuildError::PrimaryDataAlreadySet);
        assert_eq!(build.status_code(), 400);
        let config = DocumentError::from(ServiceModelError::UnregisteredApiType {
            api_type: "x".into(),
        });
        assert_eq!(config.status_code(), 500);
    }

    #[test]
    fn test_structural_error_objects_carry_pointers() {
        let mut errors = StructuralErrors::new();
        errors.push(StructuralError::new(
            JsonPointer::root().member("data"),
            StructuralErrorKind::IllegalData,
        ));
        errors.push(StructuralError::new(
            JsonPointer::root().member("included"),
            StructuralErrorKind::IncludedWithoutData,
        ));
        let objects = DocumentError::from(errors).to_error_objects();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[1].source.as_ref().unwrap().pointer.as_deref(), Some("/included"));
        assert_eq!(objects[0].code.as_deref(), Some("INVALID_DOCUMENT"));
    }

    #[test]
    fn test_internal_errors_hide_detail() {
        let err = DocumentError::from(ServiceModelError::UnregisteredType {
            type_name: "secret::Type".into(),
        });
        let objects = err.to_error_objects();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].status.as_deref(), Some("500"));
        assert!(!objects[0].detail.as_deref().unwrap().contains("secret"));
    }
}
