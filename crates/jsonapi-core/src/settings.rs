//! # DOM Settings
//!
//! Serialization policy shared by every DOM tree: how null-valued
//! properties are written and which `jsonapi.version` builders emit.
//!
//! A process-wide default lives in a `OnceLock`. Hosts that want a
//! non-default policy call [`DomSettings::install`] once at startup;
//! afterwards the default is read-only. Callers that need a different
//! policy per document pass their own `DomSettings` explicitly.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::types::ApiPropertyType;
use crate::version::JsonApiVersion;

static DEFAULT_SETTINGS: OnceLock<DomSettings> = OnceLock::new();

/// What to do with a property whose value is JSON `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullHandling {
    /// Write the member with a `null` value.
    #[default]
    Include,
    /// Omit the member.
    Ignore,
}

/// Serialization policy for DOM trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomSettings {
    /// Policy for every null-valued property without a specific override.
    #[serde(default)]
    pub null_handling: NullHandling,
    /// Policy for null `meta` members; falls back to `null_handling`.
    #[serde(default)]
    pub meta_null_handling: Option<NullHandling>,
    /// Version written to the `jsonapi` member of built documents, if any.
    #[serde(default)]
    pub version: Option<JsonApiVersion>,
}

impl Default for DomSettings {
    fn default() -> Self {
        Self {
            null_handling: NullHandling::Include,
            meta_null_handling: None,
            version: None,
        }
    }
}

impl DomSettings {
    /// The process-wide default settings.
    pub fn global() -> &'static DomSettings {
        DEFAULT_SETTINGS.get_or_init(DomSettings::default)
    }

    /// Install the process-wide default settings.
    ///
    /// # Errors
    ///
    /// Returns the rejected settings when a default has already been
    /// installed or already been read.
    pub fn install(settings: DomSettings) -> Result<(), DomSettings> {
        DEFAULT_SETTINGS.set(settings)
    }

    /// Effective null handling for a property of the given type.
    ///
    /// `data` is always written so that `"data": null` survives.
    pub fn null_handling_for(&self, property_type: ApiPropertyType) -> NullHandling {
        match property_type {
            ApiPropertyType::Data => NullHandling::Include,
            ApiPropertyType::Meta => self.meta_null_handling.unwrap_or(self.null_handling),
            _ => self.null_handling,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_always_included() {
        let settings = DomSettings {
            null_handling: NullHandling::Ignore,
            ..DomSettings::default()
        };
        assert_eq!(settings.null_handling_for(ApiPropertyType::Data), NullHandling::Include);
        assert_eq!(settings.null_handling_for(ApiPropertyType::Attribute), NullHandling::Ignore);
    }

    #[test]
    fn test_meta_override_and_fallback() {
        let mut settings = DomSettings::default();
        assert_eq!(settings.null_handling_for(ApiPropertyType::Meta), NullHandling::Include);
        settings.meta_null_handling = Some(NullHandling::Ignore);
        assert_eq!(settings.null_handling_for(ApiPropertyType::Meta), NullHandling::Ignore);
        assert_eq!(settings.null_handling_for(ApiPropertyType::Links), NullHandling::Include);
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: DomSettings =
            serde_json::from_value(serde_json::json!({"meta_null_handling": "ignore"})).unwrap();
        assert_eq!(settings.null_handling, NullHandling::Include);
        assert_eq!(settings.meta_null_handling, Some(NullHandling::Ignore));
        assert_eq!(settings.version, None);
    }

    #[test]
    fn test_global_is_stable() {
        let a = DomSettings::global() as *const DomSettings;
        let b = DomSettings::global() as *const DomSettings;
        assert_eq!(a, b);
    }
}
