//! # DOM Serialization
//!
//! Converts a DOM tree back into a `serde_json::Value` by matching on the
//! node kind. Member order follows child order. Null-valued properties are
//! written or dropped according to [`DomSettings::null_handling_for`].

use serde_json::{Map, Value};

use jsonapi_core::{DomSettings, NullHandling};

use crate::node::{DomNode, NodeData};

impl DomNode {
    /// Serialize this subtree using the process-wide default settings.
    pub fn to_value(&self) -> Value {
        self.to_value_with(DomSettings::global())
    }

    /// Serialize this subtree using explicit settings.
    pub fn to_value_with(&self, settings: &DomSettings) -> Value {
        match self.data() {
            NodeData::Document { .. } | NodeData::Object { .. } => {
                let mut map = Map::new();
                for child in self.children() {
                    write_member(child, settings, &mut map);
                }
                Value::Object(map)
            }
            NodeData::Property { .. } | NodeData::Item => self
                .inner()
                .map_or(Value::Null, |inner| inner.to_value_with(settings)),
            NodeData::Array => Value::Array(
                self.items().map(|item| item.to_value_with(settings)).collect(),
            ),
            NodeData::Value(scalar) => scalar.to_value(),
        }
    }
}

fn write_member(child: &DomNode, settings: &DomSettings, map: &mut Map<String, Value>) {
    let Some((name, api_type)) = child.property_name() else {
        tracing::warn!(node_type = %child.node_type(), "non-property child of object node skipped");
        return;
    };
    let value = child.to_value_with(settings);
    if value.is_null() && settings.null_handling_for(api_type) == NullHandling::Ignore {
        return;
    }
    map.insert(name.to_string(), value);
}
