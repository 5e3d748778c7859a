//! # Hypermedia
//!
//! Link generation for built documents. A [`HypermediaPath`] is an ordered
//! list of [`PathSegment`]s of any length; a [`UrlBuilder`] turns one into
//! a URL. [`BaseUrlBuilder`] prefixes a base URL and is the default.
//!
//! Link shapes:
//!
//! ```text
//! resource self           {base}/{type}/{id}
//! singleton self          {base}/{type}
//! relationship self       {resource}/relationships/{rel}
//! relationship related    {resource}/{rel}
//! related, canonical mode {base}/{related type}/{related id}   (to-one, id known)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use jsonapi_model::{CanonicalRelPathMode, Cardinality, RelationshipInfo};

/// One segment of a hypermedia path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathSegment {
    /// A collection of resources, `articles`.
    ResourceCollection {
        /// API type name.
        api_type: String,
    },
    /// One resource, `articles/1`.
    Resource {
        /// API type name.
        api_type: String,
        /// Resource id.
        id: String,
    },
    /// The `relationships` keyword.
    Relationships,
    /// A relationship name.
    Relationship {
        /// Relationship name.
        rel: String,
    },
    /// Any other literal segment.
    NonResource {
        /// Literal path segment.
        segment: String,
    },
}

impl PathSegment {
    /// The raw URL path segments this contributes; `Resource` gives two.
    fn parts(&self) -> Vec<&str> {
        match self {
            Self::ResourceCollection { api_type } => vec![api_type.as_str()],
            Self::Resource { api_type, id } => vec![api_type.as_str(), id.as_str()],
            Self::Relationships => vec!["relationships"],
            Self::Relationship { rel } => vec![rel.as_str()],
            Self::NonResource { segment } => vec![segment.as_str()],
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = encode_path(self.parts()).ok_or(fmt::Error)?;
        f.write_str(path.trim_start_matches('/'))
    }
}

/// Percent-encode each part as one URL path segment and join them into an
/// absolute path. `/`, `%`, `?`, `#` and spaces inside a part are escaped.
fn encode_path<'a>(parts: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut url = Url::parse("http://localhost/").ok()?;
    url.path_segments_mut().ok()?.clear().extend(parts);
    Some(url.path().to_string())
}

/// An ordered sequence of path segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HypermediaPath {
    segments: Vec<PathSegment>,
}

impl HypermediaPath {
    /// An empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Path to a resource collection.
    pub fn collection(api_type: impl Into<String>) -> Self {
        Self::new().push(PathSegment::ResourceCollection {
            api_type: api_type.into(),
        })
    }

    /// Path to one resource.
    pub fn resource(api_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new().push(PathSegment::Resource {
            api_type: api_type.into(),
            id: id.into(),
        })
    }

    /// Append a segment, builder style.
    pub fn push(mut self, segment: PathSegment) -> Self {
        self.segments.push(segment);
        self
    }

    /// `{self}/relationships/{rel}`.
    pub fn relationship_self(&self, rel: &str) -> Self {
        self.clone()
            .push(PathSegment::Relationships)
            .push(PathSegment::Relationship { rel: rel.to_string() })
    }

    /// `{self}/{rel}`.
    pub fn relationship_related(&self, rel: &str) -> Self {
        self.clone().push(PathSegment::Relationship { rel: rel.to_string() })
    }

    /// Segments in order.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Whether the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for HypermediaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return Ok(());
        }
        let path = encode_path(self.segments.iter().flat_map(PathSegment::parts)).ok_or(fmt::Error)?;
        f.write_str(&path)
    }
}

/// Turns hypermedia paths into URLs.
pub trait UrlBuilder: Send + Sync + fmt::Debug {
    /// The URL for `path`.
    fn url(&self, path: &HypermediaPath) -> String;
}

/// Prefixes paths with a base URL, e.g. `https://api.example.com/v1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseUrlBuilder {
    base: String,
}

impl BaseUrlBuilder {
    /// A builder rooted at `base`; a trailing slash is ignored.
    pub fn new(base: impl Into<String>) -> Self {
        let base: String = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }
}

impl UrlBuilder for BaseUrlBuilder {
    fn url(&self, path: &HypermediaPath) -> String {
        format!("{}{path}", self.base)
    }
}

/// Path of a resource's `self` link. Singletons have no id segment.
pub fn resource_path(api_type: &str, id: Option<&str>) -> HypermediaPath {
    match id {
        Some(id) => HypermediaPath::resource(api_type, id),
        None => HypermediaPath::collection(api_type),
    }
}

/// Paths of a relationship's `self` and `related` links.
///
/// `related_target` is the related resource's `(api type, id)` when the
/// relationship is to-one and its linkage is known.
pub fn relationship_paths(
    resource: &HypermediaPath,
    info: &RelationshipInfo,
    related_target: Option<(&str, &str)>,
) -> (HypermediaPath, HypermediaPath) {
    let self_path = resource.relationship_self(&info.rel);
    let related_path = match (info.path_mode, info.cardinality, related_target) {
        (CanonicalRelPathMode::DropPreviousPathSegments, Cardinality::ToOne, Some((api_type, id))) => {
            HypermediaPath::resource(api_type, id)
        }
        _ => resource.relationship_related(&info.rel),
    };
    (self_path, related_path)
}
