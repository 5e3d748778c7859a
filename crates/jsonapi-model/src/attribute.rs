//! # Attribute Tables
//!
//! [`AttributesInfo`] is the ordered attribute table of one resource or
//! complex type. API names are unique ignoring ASCII case. Inserting a
//! second attribute whose name collides with an earlier one replaces it:
//! the last registration wins. Each replacement is logged at `warn` level
//! since it usually means two registrations target the same member.
//!
//! Lookups go through hash indexes keyed on the lowercased API name and on
//! the field name; the `Vec` keeps registration order.

use std::any::TypeId;
use std::collections::HashMap;

use serde_json::Value;

use crate::binding::Binding;

/// One registered attribute.
#[derive(Debug, Clone)]
pub struct AttributeInfo {
    /// Member name inside `attributes` on the wire.
    pub api_name: String,
    /// Rust field name.
    pub field_name: String,
    /// Rust field type name.
    pub type_name: &'static str,
    /// Complex (nested object) type of the field, or of its elements for a
    /// collection field. `None` for scalars.
    pub complex_type: Option<TypeId>,
    /// Accessor pair. Complex-type tables carry no bindings; their values
    /// travel through the owning attribute's binding.
    pub binding: Option<Binding<Value>>,
}

impl AttributeInfo {
    /// Whether the attribute holds a complex type.
    pub fn is_complex(&self) -> bool {
        self.complex_type.is_some()
    }
}

/// Ordered, case-insensitively unique attribute table.
#[derive(Debug, Clone, Default)]
pub struct AttributesInfo {
    attributes: Vec<AttributeInfo>,
    by_api_name: HashMap<String, usize>,
    by_field_name: HashMap<String, usize>,
}

impl AttributesInfo {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute, replacing any earlier one with the same API name
    /// ignoring case.
    pub fn insert(&mut self, info: AttributeInfo) {
        let key = info.api_name.to_ascii_lowercase();
        if let Some(pos) = self.by_api_name.get(&key).copied() {
            let dropped = self.attributes.remove(pos);
            tracing::warn!(
                api_name = %info.api_name,
                dropped_field = %dropped.field_name,
                kept_field = %info.field_name,
                "duplicate attribute registration, keeping the last one"
            );
            self.attributes.push(info);
            self.reindex();
        } else {
            let pos = self.attributes.len();
            self.by_api_name.insert(key, pos);
            self.by_field_name.insert(info.field_name.clone(), pos);
            self.attributes.push(info);
        }
    }

    fn reindex(&mut self) {
        self.by_api_name.clear();
        self.by_field_name.clear();
        for (pos, a) in self.attributes.iter().enumerate() {
            self.by_api_name.insert(a.api_name.to_ascii_lowercase(), pos);
            self.by_field_name.insert(a.field_name.clone(), pos);
        }
    }

    /// Look up by API name, ignoring case.
    pub fn by_api_name(&self, api_name: &str) -> Option<&AttributeInfo> {
        let pos = self.by_api_name.get(&api_name.to_ascii_lowercase())?;
        self.attributes.get(*pos)
    }

    /// Look up by Rust field name.
    pub fn by_field_name(&self, field_name: &str) -> Option<&AttributeInfo> {
        let pos = self.by_field_name.get(field_name)?;
        self.attributes.get(*pos)
    }

    /// Attributes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &AttributeInfo> {
        self.attributes.iter()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
