//! # jsonapi-cli — Command-Line Tool for JSON:API Documents
//!
//! Provides the `jsonapi` binary.
//!
//! ## Subcommands
//!
//! - `jsonapi classify <file>` — Print the document type.
//! - `jsonapi check <file>` — Print every structural error with its JSON
//!   pointer; exit code 1 when any are found.
//! - `jsonapi format <file>` — Round-trip through the DOM and print
//!   normalized JSON.
//!
//! `-` reads the document from standard input:
//!
//! ```bash
//! curl -s https://api.example.com/articles | jsonapi check -
//! ```

pub mod check;
pub mod classify;
pub mod format;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// Read a document from `path`, or from stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read document from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Parse JSON text, naming the input in the error.
pub fn parse_json(text: &str, path: &Path) -> Result<Value> {
    serde_json::from_str(text).with_context(|| format!("{} is not valid JSON", path.display()))
}
