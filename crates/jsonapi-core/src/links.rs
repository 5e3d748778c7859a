//! # Links and Meta
//!
//! Wire representations of `links` and `meta` members. Both preserve
//! member order so a document written from them reads back identically.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// A `meta` object: free-form, order-preserving JSON members.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meta(Map<String, Value>);

impl Meta {
    /// An empty meta object.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Add or replace a member, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Add or replace a member.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Look up a member.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Whether there are no members.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Convert into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Meta {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A single link: either a bare URL or a link object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Link {
    /// `"self": "https://example.com/articles/1"`.
    Url(String),
    /// `"self": {"href": "...", "meta": {...}}`.
    Object {
        /// Link target.
        href: String,
        /// Non-standard information about the link.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<Meta>,
    },
}

impl Link {
    /// A bare URL link.
    pub fn url(href: impl Into<String>) -> Self {
        Self::Url(href.into())
    }

    /// A link object carrying meta.
    pub fn with_meta(href: impl Into<String>, meta: Meta) -> Self {
        Self::Object {
            href: href.into(),
            meta: Some(meta),
        }
    }

    /// The link target.
    pub fn href(&self) -> &str {
        match self {
            Self::Url(href) | Self::Object { href, .. } => href,
        }
    }
}

/// A `links` object, in member order. A `None` entry is a null link.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Links {
    entries: Vec<(String, Option<Link>)>,
}

impl Links {
    /// An empty links object.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Add or replace a link, builder style.
    pub fn with(mut self, rel: impl Into<String>, link: Link) -> Self {
        self.insert(rel, Some(link));
        self
    }

    /// Add or replace a link; `None` writes a null link.
    pub fn insert(&mut self, rel: impl Into<String>, link: Option<Link>) {
        let rel = rel.into();
        match self.entries.iter_mut().find(|(name, _)| *name == rel) {
            Some(entry) => entry.1 = link,
            None => self.entries.push((rel, link)),
        }
    }

    /// Add a link only if `rel` is not present yet.
    pub fn insert_if_absent(&mut self, rel: impl Into<String>, link: Link) {
        let rel = rel.into();
        if !self.contains(&rel) {
            self.entries.push((rel, Some(link)));
        }
    }

    /// Look up a non-null link.
    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.entries
            .iter()
            .find(|(name, _)| name == rel)
            .and_then(|(_, link)| link.as_ref())
    }

    /// Whether `rel` is present (possibly as a null link).
    pub fn contains(&self, rel: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == rel)
    }

    /// Whether there are no links.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of links, null links included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate links in member order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Link>)> {
        self.entries.iter().map(|(name, link)| (name.as_str(), link.as_ref()))
    }
}

impl Serialize for Links {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (rel, link) in &self.entries {
            map.serialize_entry(rel, link)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Links {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        let mut links = Links::new();
        for (rel, value) in map {
            let link: Option<Link> = serde_json::from_value(value).map_err(D::Error::custom)?;
            links.insert(rel, link);
        }
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_link_forms_round_trip() {
        let links = Links::new()
            .with("self", Link::url("/articles/1"))
            .with("related", Link::with_meta("/articles/1/author", Meta::new().with("count", 1)));
        let value = serde_json::to_value(&links).unwrap();
        assert_eq!(
            value,
            json!({
                "self": "/articles/1",
                "related": {"href": "/articles/1/author", "meta": {"count": 1}}
            })
        );
        let back: Links = serde_json::from_value(value).unwrap();
        assert_eq!(back, links);
    }

    #[test]
    fn test_links_preserve_order() {
        let links: Links =
            serde_json::from_value(json!({"z": "/z", "a": "/a", "m": null})).unwrap();
        let rels: Vec<&str> = links.iter().map(|(rel, _)| rel).collect();
        assert_eq!(rels, vec!["z", "a", "m"]);
        assert!(links.contains("m"));
        assert!(links.get("m").is_none());
    }

    #[test]
    fn test_insert_replaces() {
        let mut links = Links::new().with("self", Link::url("/a"));
        links.insert("self", Some(Link::url("/b")));
        assert_eq!(links.len(), 1);
        assert_eq!(links.get("self").unwrap().href(), "/b");
        links.insert_if_absent("self", Link::url("/c"));
        assert_eq!(links.get("self").unwrap().href(), "/b");
    }

    #[test]
    fn test_invalid_link_rejected() {
        let result: Result<Links, _> = serde_json::from_value(json!({"self": 42}));
        assert!(result.is_err());
    }

    #[test]
    fn test_meta_members() {
        let meta = Meta::new().with("total", 3).with("note", "x");
        assert_eq!(meta.len(), 2);
        assert_eq!(meta.get("total"), Some(&json!(3)));
        assert_eq!(meta.into_value(), json!({"total": 3, "note": "x"}));
    }
}
