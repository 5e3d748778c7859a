//! # Error Objects
//!
//! The members of a JSON:API `errors` array. Hosts translate library errors
//! into these before writing an errors document.

use serde::{Deserialize, Serialize};

use crate::error::{StructuralError, StructuralErrors};
use crate::links::{Links, Meta};

/// A JSON:API error object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// Unique identifier for this occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Links, typically `about`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    /// HTTP status code, as a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Application-specific error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short summary of the problem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Explanation specific to this occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// What in the request caused the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
    /// Non-standard information about the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// The `source` member of an error object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSource {
    /// JSON pointer into the request document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
    /// Query parameter that caused the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

impl ErrorObject {
    /// An error object with status, title and detail.
    pub fn new(status: u16, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            status: Some(status.to_string()),
            title: Some(title.into()),
            detail: Some(detail.into()),
            ..Self::default()
        }
    }

    /// Attach a source pointer, builder style.
    pub fn with_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.source = Some(ErrorSource {
            pointer: Some(pointer.into()),
            parameter: None,
        });
        self
    }
}

impl From<&StructuralError> for ErrorObject {
    fn from(error: &StructuralError) -> Self {
        ErrorObject::new(400, "Invalid JSON:API document", error.kind.to_string())
            .with_pointer(error.pointer.to_string())
    }
}

impl From<&StructuralErrors> for Vec<ErrorObject> {
    fn from(errors: &StructuralErrors) -> Self {
        errors.errors().iter().map(ErrorObject::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StructuralErrorKind;
    use crate::pointer::JsonPointer;
    use serde_json::json;

    #[test]
    fn test_structural_error_to_error_object() {
        let error = StructuralError::new(
            JsonPointer::root().member("data").member("type"),
            StructuralErrorKind::ExpectedString {
                member: "type".to_string(),
                found: "number",
            },
        );
        let object = ErrorObject::from(&error);
        assert_eq!(
            serde_json::to_value(&object).unwrap(),
            json!({
                "status": "400",
                "title": "Invalid JSON:API document",
                "detail": "'type' must be a string, found number",
                "source": {"pointer": "/data/type"}
            })
        );
    }

    #[test]
    fn test_error_object_deserialize() {
        let object: ErrorObject =
            serde_json::from_value(json!({"status": "404", "code": "E42", "meta": {"x": 1}})).unwrap();
        assert_eq!(object.status.as_deref(), Some("404"));
        assert_eq!(object.code.as_deref(), Some("E42"));
        assert!(object.source.is_none());
    }

    #[test]
    fn test_collection_conversion() {
        let mut errors = StructuralErrors::new();
        errors.push(StructuralError::new(
            JsonPointer::root(),
            StructuralErrorKind::ConflictingTopLevelMembers,
        ));
        let objects: Vec<ErrorObject> = (&errors).into();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].source.as_ref().unwrap().pointer.as_deref(), Some(""));
    }
}
