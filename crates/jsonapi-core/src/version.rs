//! JSON:API protocol versions carried in the top-level `jsonapi` object.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A JSON:API specification version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JsonApiVersion {
    /// Version 1.0.
    #[default]
    #[serde(rename = "1.0")]
    V1_0,
    /// Version 1.1.
    #[serde(rename = "1.1")]
    V1_1,
}

impl JsonApiVersion {
    /// The wire string, e.g. `"1.0"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1_0 => "1.0",
            Self::V1_1 => "1.1",
        }
    }
}

impl fmt::Display for JsonApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JsonApiVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1.0" => Ok(Self::V1_0),
            "1.1" => Ok(Self::V1_1),
            other => Err(format!("unsupported JSON:API version: {other}")),
        }
    }
}
