//! # JSON Pointers
//!
//! RFC 6901 JSON pointers used as the source location of structural errors
//! and as the `source.pointer` of error objects.

use std::fmt;

use serde::{Serialize, Serializer};

/// A JSON pointer into a document, e.g. `/data/0/attributes/title`.
///
/// Pointers are built by appending reference tokens while walking a tree,
/// so they are cheap to derive from a parent and never need parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPointer {
    tokens: Vec<String>,
}

impl JsonPointer {
    /// The pointer to the whole document (the empty string).
    pub fn root() -> Self {
        Self { tokens: Vec::new() }
    }

    /// A pointer to a member of the object this pointer refers to.
    pub fn member(&self, name: &str) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.push(name.to_string());
        Self { tokens }
    }

    /// A pointer to an element of the array this pointer refers to.
    pub fn index(&self, index: usize) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.push(index.to_string());
        Self { tokens }
    }

    /// Whether this pointer refers to the whole document.
    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The unescaped reference tokens.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Parse a pointer from its string form.
    ///
    /// Returns `None` when the string is neither empty nor starts with `/`.
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() {
            return Some(Self::root());
        }
        let rest = s.strip_prefix('/')?;
        let tokens = rest
            .split('/')
            .map(|t| t.replace("~1", "/").replace("~0", "~"))
            .collect();
        Some(Self { tokens })
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "/{}", token.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

impl Serialize for JsonPointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
