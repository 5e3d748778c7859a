//! API member naming derived from Rust field names.

use serde::{Deserialize, Serialize};

/// How API attribute and relationship names are derived from field names
/// when no explicit name is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    /// Use the field name unchanged.
    AsIs,
    /// `first_name` → `firstName`.
    #[default]
    CamelCase,
    /// `first_name` → `first-name`.
    KebabCase,
    /// `firstName` → `first_name`.
    SnakeCase,
}

impl NamingConvention {
    /// Apply the convention to a field name.
    pub fn apply(&self, field_name: &str) -> String {
        match self {
            Self::AsIs => field_name.to_string(),
            Self::CamelCase => {
                let mut out = String::with_capacity(field_name.len());
                for (i, word) in words(field_name).iter().enumerate() {
                    if i == 0 {
                        out.push_str(word);
                    } else {
                        let mut chars = word.chars();
                        if let Some(first) = chars.next() {
                            out.extend(first.to_uppercase());
                            out.push_str(chars.as_str());
                        }
                    }
                }
                out
            }
            Self::KebabCase => words(field_name).join("-"),
            Self::SnakeCase => words(field_name).join("_"),
        }
    }
}

/// Split on `_`, `-` and lower-to-upper case transitions; lowercase each word.
fn words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for c in name.chars() {
        if c == '_' || c == '-' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
