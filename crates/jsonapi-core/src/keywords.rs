//! Member names defined by JSON:API.

/// Top-level primary data member.
pub const DATA: &str = "data";
/// Top-level errors member.
pub const ERRORS: &str = "errors";
/// Top-level compound-document member.
pub const INCLUDED: &str = "included";
/// Top-level implementation-information member.
pub const JSONAPI: &str = "jsonapi";
/// Links member.
pub const LINKS: &str = "links";
/// Meta member.
pub const META: &str = "meta";

/// Resource type member.
pub const TYPE: &str = "type";
/// Resource id member.
pub const ID: &str = "id";
/// Resource attributes member.
pub const ATTRIBUTES: &str = "attributes";
/// Resource relationships member.
pub const RELATIONSHIPS: &str = "relationships";

/// Link object target.
pub const HREF: &str = "href";
/// Version member of the `jsonapi` object.
pub const VERSION: &str = "version";

/// Link relation for a resource's own URL.
pub const SELF: &str = "self";
/// Link relation for a relationship's related resource(s).
pub const RELATED: &str = "related";
