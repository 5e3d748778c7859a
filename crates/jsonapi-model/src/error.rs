//! # Service Model Errors
//!
//! ## Design
//!
//! - [`ServiceModelError`] is a configuration error. It means the registry
//!   was built wrong or queried for a type nobody registered. Hosts report
//!   it as a server fault and never retry.
//! - [`AccessorError`] is raised by a binding when it is handed an instance
//!   of the wrong Rust type or when a value does not convert. The mapper
//!   wraps it with resource and member context.

use thiserror::Error;

/// Registry construction or lookup failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceModelError {
    /// A Rust type was looked up that was never registered.
    #[error("resource type not registered for Rust type '{type_name}'")]
    UnregisteredType {
        /// Rust type name, as reported by `std::any::type_name`.
        type_name: String,
    },

    /// An API type name was looked up that was never registered.
    #[error("resource type not registered for API type '{api_type}'")]
    UnregisteredApiType {
        /// API type name.
        api_type: String,
    },

    /// Two resource types share an API type name.
    #[error("API type '{api_type}' registered more than once")]
    DuplicateApiType {
        /// API type name.
        api_type: String,
    },

    /// A Rust type is registered twice.
    #[error("Rust type '{type_name}' registered more than once")]
    DuplicateRustType {
        /// Rust type name.
        type_name: String,
    },

    /// A resource type was registered with an empty API type name.
    #[error("Rust type '{type_name}' registered with an empty API type name")]
    EmptyApiType {
        /// Rust type name.
        type_name: String,
    },

    /// A relationship points at a Rust type that is not a resource type.
    #[error("relationship '{rel}' of '{api_type}' refers to unregistered type '{related}'")]
    UnregisteredRelatedType {
        /// API type owning the relationship.
        api_type: String,
        /// Relationship name.
        rel: String,
        /// Rust type name of the related type.
        related: String,
    },

    /// A complex attribute's Rust type is not a registered complex type.
    #[error("attribute '{attribute}' of '{owner}' uses unregistered complex type '{complex}'")]
    UnregisteredComplexType {
        /// Owning resource or complex type.
        owner: String,
        /// API attribute name.
        attribute: String,
        /// Rust type name of the complex type.
        complex: String,
    },
}

/// A binding could not read or write a member.
#[derive(Error, Debug)]
pub enum AccessorError {
    /// The instance handed to the binding is not of the registered type.
    #[error("binding expects an instance of '{expected}'")]
    TypeMismatch {
        /// Rust type name the binding was registered for.
        expected: &'static str,
    },

    /// A field value could not be encoded to JSON.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// A JSON value could not be decoded into the field type.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// Linkage of the wrong cardinality was handed to a relationship binding.
    #[error("relationship binding expects {expected:?} linkage")]
    CardinalityMismatch {
        /// Cardinality the relationship was registered with.
        expected: crate::relationship::Cardinality,
    },

    /// A wire id could not be parsed into the id type.
    #[error(transparent)]
    Id(#[from] crate::id::IdParseError),
}
