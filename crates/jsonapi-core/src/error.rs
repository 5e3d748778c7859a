//! # Structural Errors
//!
//! Errors raised when wire JSON violates the structural rules of JSON:API.
//! All errors use `thiserror` for derive-based `Display` and `Error`.
//!
//! ## Design
//!
//! - Structural errors are data errors: they are recoverable and a host
//!   reports them to the client as `400`-class error objects.
//! - Every error carries a [`JsonPointer`] to the offending member.
//! - The DOM builder collects errors into [`StructuralErrors`] instead of
//!   stopping at the first one, so one pass reports every violation.

use std::fmt;

use thiserror::Error;

use crate::pointer::JsonPointer;

/// What went wrong at a structural error's location.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralErrorKind {
    /// The document root is not a JSON object.
    #[error("document must be a JSON object, found {found}")]
    RootNotObject {
        /// JSON kind found instead.
        found: &'static str,
    },

    /// `data` and `errors` are both present at the top level.
    #[error("conflicting top-level members: 'data' and 'errors' must not coexist")]
    ConflictingTopLevelMembers,

    /// A `data` object is neither a resource nor a resource identifier.
    #[error("illegal data member, expected resource or resource identifier")]
    IllegalData,

    /// `data` is a scalar.
    #[error("data must be null, an object, or an array, found {found}")]
    InvalidDataShape {
        /// JSON kind found instead.
        found: &'static str,
    },

    /// `errors` is not an array.
    #[error("errors must be an array, found {found}")]
    ErrorsNotArray {
        /// JSON kind found instead.
        found: &'static str,
    },

    /// A relationship's `data` is a scalar.
    #[error("relationship data must be null, an object, or an array, found {found}")]
    InvalidRelationshipData {
        /// JSON kind found instead.
        found: &'static str,
    },

    /// A member that must be an object is not.
    #[error("'{member}' must be an object, found {found}")]
    ExpectedObject {
        /// Member name.
        member: String,
        /// JSON kind found instead.
        found: &'static str,
    },

    /// A member that must be a string is not.
    #[error("'{member}' must be a string, found {found}")]
    ExpectedString {
        /// Member name.
        member: String,
        /// JSON kind found instead.
        found: &'static str,
    },

    /// A member that must be an array is not.
    #[error("'{member}' must be an array, found {found}")]
    ExpectedArray {
        /// Member name.
        member: String,
        /// JSON kind found instead.
        found: &'static str,
    },

    /// A required member is absent.
    #[error("required member '{member}' is missing")]
    MissingMember {
        /// Member name.
        member: String,
    },

    /// A linkage element is not a resource identifier.
    #[error("expected resource identifier with 'type' and 'id'")]
    ExpectedResourceIdentifier,

    /// An `included` element is not a resource.
    #[error("expected resource object with 'type'")]
    ExpectedResource,

    /// A link is neither a string, a link object, nor null.
    #[error("link must be a string, an object with 'href', or null, found {found}")]
    InvalidLink {
        /// JSON kind found instead.
        found: &'static str,
    },

    /// `included` appears without `data`.
    #[error("'included' must not be present without 'data'")]
    IncludedWithoutData,
}

/// A structural violation at a location in the wire document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}: {kind}", display_pointer(.pointer))]
pub struct StructuralError {
    /// Location of the offending member.
    pub pointer: JsonPointer,
    /// What is wrong there.
    pub kind: StructuralErrorKind,
}

fn display_pointer(pointer: &JsonPointer) -> String {
    if pointer.is_root() {
        "(root)".to_string()
    } else {
        pointer.to_string()
    }
}

impl StructuralError {
    /// Create an error at `pointer`.
    pub fn new(pointer: JsonPointer, kind: StructuralErrorKind) -> Self {
        Self { pointer, kind }
    }
}

/// Every structural error found in one pass over one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuralErrors {
    errors: Vec<StructuralError>,
}

impl StructuralErrors {
    /// An empty collection.
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record an error.
    pub fn push(&mut self, error: StructuralError) {
        tracing::debug!(pointer = %error.pointer, kind = %error.kind, "structural error");
        self.errors.push(error);
    }

    /// Returns the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if there are no errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns a slice of all errors.
    pub fn errors(&self) -> &[StructuralError] {
        &self.errors
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<StructuralError> {
        self.errors
    }
}

impl From<StructuralError> for StructuralErrors {
    fn from(error: StructuralError) -> Self {
        Self { errors: vec![error] }
    }
}

impl fmt::Display for StructuralErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for StructuralErrors {}

impl IntoIterator for StructuralErrors {
    type Item = StructuralError;
    type IntoIter = std::vec::IntoIter<StructuralError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
