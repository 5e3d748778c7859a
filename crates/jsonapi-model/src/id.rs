//! # Resource Id Conversion
//!
//! Ids are opaque strings on the wire. [`ApiId`] formats a typed id for the
//! wire and parses it back. Implementations exist for `String`, the integer
//! primitives and [`Uuid`]; hosts implement it for their own id newtypes.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// A wire id that does not parse into the target id type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot parse id '{value}' as {target}: {reason}")]
pub struct IdParseError {
    /// The wire id.
    pub value: String,
    /// Target Rust type name.
    pub target: &'static str,
    /// Parser message.
    pub reason: String,
}

impl IdParseError {
    /// Build an error for `value` failing to parse as `T`.
    pub fn new<T>(value: &str, reason: impl fmt::Display) -> Self {
        Self {
            value: value.to_string(),
            target: std::any::type_name::<T>(),
            reason: reason.to_string(),
        }
    }
}

/// Conversion between a typed resource id and its wire string.
pub trait ApiId: Sized + Send + Sync + 'static {
    /// Format for the wire.
    fn format_id(&self) -> String;

    /// Parse from the wire.
    ///
    /// # Errors
    ///
    /// Returns [`IdParseError`] when `value` is not a valid id of this type.
    fn parse_id(value: &str) -> Result<Self, IdParseError>;
}

impl ApiId for String {
    fn format_id(&self) -> String {
        self.clone()
    }

    fn parse_id(value: &str) -> Result<Self, IdParseError> {
        Ok(value.to_string())
    }
}

macro_rules! integer_id {
    ($($t:ty),*) => {
        $(
            impl ApiId for $t {
                fn format_id(&self) -> String {
                    self.to_string()
                }

                fn parse_id(value: &str) -> Result<Self, IdParseError> {
                    value.parse::<$t>().map_err(|e| IdParseError::new::<$t>(value, e))
                }
            }
        )*
    };
}

integer_id!(i16, i32, i64, u16, u32, u64, usize);

impl ApiId for Uuid {
    fn format_id(&self) -> String {
        self.hyphenated().to_string()
    }

    fn parse_id(value: &str) -> Result<Self, IdParseError> {
        Uuid::parse_str(value).map_err(|e| IdParseError::new::<Uuid>(value, e))
    }
}
