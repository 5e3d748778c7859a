//! # DOM Nodes
//!
//! A strict tree of typed nodes mirroring the JSON structure of a document.
//! Each node owns its children; there is no sharing and no parent pointer.
//!
//! ## Node Kinds
//!
//! ```text
//! Document ─▶ Property* ─▶ (Object | Array | Value)
//! Object   ─▶ Property* ─▶ (Object | Array | Value)
//! Array    ─▶ Item*     ─▶ (Object | Array | Value)
//! ```
//!
//! A `Property` always owns exactly one child. Diagnostic attributes
//! (`apiType`, `apiId`, `documentType`, ...) are captured while the tree is
//! built and take part in structural equality.

use std::fmt;

use serde_json::{Number, Value};

use jsonapi_core::{ApiPropertyType, DomDocumentType, DomRelationshipType};

/// Diagnostic attribute holding a document's classification.
pub const ATTR_DOCUMENT_TYPE: &str = "documentType";
/// Diagnostic attribute holding a resource's API type name.
pub const ATTR_API_TYPE: &str = "apiType";
/// Diagnostic attribute holding a resource's id.
pub const ATTR_API_ID: &str = "apiId";
/// Diagnostic attribute holding a relationship's classification.
pub const ATTR_RELATIONSHIP_TYPE: &str = "relationshipType";

/// The kind tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// Document root.
    Document,
    /// JSON object.
    Object,
    /// Named member of a document or object.
    Property,
    /// JSON array.
    Array,
    /// Element of an array.
    Item,
    /// JSON scalar, including null.
    Value,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What a JSON object node denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Resource object.
    Resource,
    /// Resource identifier object.
    ResourceIdentifier,
    /// Relationship object, with its cardinality.
    Relationship(DomRelationshipType),
    /// The `relationships` member of a resource.
    Relationships,
    /// The `attributes` member of a resource.
    Attributes,
    /// A `links` object.
    Links,
    /// A link object (`{href, meta}`).
    Link,
    /// A `meta` object.
    Meta,
    /// An error object.
    Error,
    /// The top-level `jsonapi` object.
    JsonApi,
    /// Free-form JSON object.
    Generic,
}

/// A decoded JSON scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    /// `null`.
    Null,
    /// `true` / `false`.
    Bool(bool),
    /// Any JSON number, kept exact.
    Number(Number),
    /// A string.
    String(String),
}

/// Declared type of a scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// `null`.
    Null,
    /// Boolean.
    Boolean,
    /// Integral number.
    Integer,
    /// Non-integral number.
    Float,
    /// String.
    String,
}

impl ScalarValue {
    /// The declared type of this value.
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Self::Null => ScalarType::Null,
            Self::Bool(_) => ScalarType::Boolean,
            Self::Number(n) if n.is_f64() => ScalarType::Float,
            Self::Number(_) => ScalarType::Integer,
            Self::String(_) => ScalarType::String,
        }
    }

    /// The string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert back into a JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
        }
    }
}

/// Per-kind payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    /// Document root with its classification.
    Document {
        /// Document classification.
        document_type: DomDocumentType,
    },
    /// JSON object with what it denotes.
    Object {
        /// Object classification.
        kind: ObjectKind,
    },
    /// Named member.
    Property {
        /// JSON:API role of the member.
        api_type: ApiPropertyType,
        /// Member name as written on the wire.
        api_name: String,
    },
    /// JSON array.
    Array,
    /// Array element.
    Item,
    /// JSON scalar.
    Value(ScalarValue),
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct DomNode {
    data: NodeData,
    attributes: Vec<(String, String)>,
    children: Vec<DomNode>,
}

impl DomNode {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// A document root.
    pub fn document(document_type: DomDocumentType) -> Self {
        Self::new(NodeData::Document { document_type })
            .with_attribute(ATTR_DOCUMENT_TYPE, document_type.to_string())
    }

    /// An empty object node.
    pub fn object(kind: ObjectKind) -> Self {
        Self::new(NodeData::Object { kind })
    }

    /// A property owning `value`.
    pub fn property(api_type: ApiPropertyType, api_name: impl Into<String>, value: DomNode) -> Self {
        let mut node = Self::new(NodeData::Property {
            api_type,
            api_name: api_name.into(),
        });
        node.children.push(value);
        node
    }

    /// An array node whose children are wrapped in `Item` nodes.
    pub fn array(items: impl IntoIterator<Item = DomNode>) -> Self {
        let mut node = Self::new(NodeData::Array);
        node.children = items.into_iter().map(DomNode::item).collect();
        node
    }

    /// An array element owning `value`.
    pub fn item(value: DomNode) -> Self {
        let mut node = Self::new(NodeData::Item);
        node.children.push(value);
        node
    }

    /// A scalar node.
    pub fn value(value: ScalarValue) -> Self {
        Self::new(NodeData::Value(value))
    }

    /// A `null` scalar node.
    pub fn null() -> Self {
        Self::value(ScalarValue::Null)
    }

    /// Build a free-form subtree from JSON.
    ///
    /// Objects become [`ObjectKind::Generic`] nodes whose members are
    /// [`ApiPropertyType::Member`] properties.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::null(),
            Value::Bool(b) => Self::value(ScalarValue::Bool(*b)),
            Value::Number(n) => Self::value(ScalarValue::Number(n.clone())),
            Value::String(s) => Self::value(ScalarValue::String(s.clone())),
            Value::Array(items) => Self::array(items.iter().map(Self::from_json)),
            Value::Object(map) => {
                let mut node = Self::object(ObjectKind::Generic);
                for (name, member) in map {
                    node.push_child(Self::property(
                        ApiPropertyType::Member,
                        name.clone(),
                        Self::from_json(member),
                    ));
                }
                node
            }
        }
    }

    /// Add a diagnostic attribute, builder style.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Add or replace a diagnostic attribute.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Append a child node.
    pub fn push_child(&mut self, child: DomNode) {
        self.children.push(child);
    }

    /// The kind tag.
    pub fn node_type(&self) -> NodeType {
        match self.data {
            NodeData::Document { .. } => NodeType::Document,
            NodeData::Object { .. } => NodeType::Object,
            NodeData::Property { .. } => NodeType::Property,
            NodeData::Array => NodeType::Array,
            NodeData::Item => NodeType::Item,
            NodeData::Value(_) => NodeType::Value,
        }
    }

    /// The per-kind payload.
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// Diagnostic attributes in insertion order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Look up a diagnostic attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Owned children in order.
    pub fn children(&self) -> &[DomNode] {
        &self.children
    }

    /// The object kind, for object nodes.
    pub fn object_kind(&self) -> Option<ObjectKind> {
        match self.data {
            NodeData::Object { kind } => Some(kind),
            _ => None,
        }
    }

    /// The property name and role, for property nodes.
    pub fn property_name(&self) -> Option<(&str, ApiPropertyType)> {
        match &self.data {
            NodeData::Property { api_type, api_name } => Some((api_name.as_str(), *api_type)),
            _ => None,
        }
    }

    /// The scalar, for value nodes.
    pub fn scalar(&self) -> Option<&ScalarValue> {
        match &self.data {
            NodeData::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Whether this is a `null` value node.
    pub fn is_null(&self) -> bool {
        matches!(self.data, NodeData::Value(ScalarValue::Null))
    }

    /// The single child of a property or item node.
    pub fn inner(&self) -> Option<&DomNode> {
        match self.data {
            NodeData::Property { .. } | NodeData::Item => self.children.first(),
            _ => None,
        }
    }

    /// The value of the member named `name` of a document or object node.
    pub fn member(&self, name: &str) -> Option<&DomNode> {
        self.children
            .iter()
            .find(|c| matches!(&c.data, NodeData::Property { api_name, .. } if api_name == name))
            .and_then(DomNode::inner)
    }

    /// The elements of an array node, unwrapped from their items.
    pub fn items(&self) -> impl Iterator<Item = &DomNode> {
        let items: &[DomNode] = match self.data {
            NodeData::Array => &self.children,
            _ => &[],
        };
        items.iter().filter_map(DomNode::inner)
    }

    /// The string payload of a value node.
    pub fn as_str(&self) -> Option<&str> {
        self.scalar().and_then(ScalarValue::as_str)
    }
}
