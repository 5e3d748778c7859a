//! # Classify Subcommand
//!
//! Prints the JSON:API document type of a file, and with `--resources` the
//! data type of every primary and included object.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use serde_json::Value;

use jsonapi_core::{classify_data, classify_document, json_type_name};

use crate::{parse_json, read_input};

/// Arguments for `jsonapi classify`.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Document to classify, or `-` for stdin.
    pub file: PathBuf,

    /// Also classify each object in `data` and `included`.
    #[arg(long)]
    pub resources: bool,
}

/// Execute the classify subcommand.
pub fn run_classify(args: &ClassifyArgs, out: &mut dyn Write) -> Result<u8> {
    let text = read_input(&args.file)?;
    let value = parse_json(&text, &args.file)?;
    let Value::Object(root) = &value else {
        bail!("document root must be a JSON object, found {}", json_type_name(&value));
    };
    let document_type = match classify_document(root) {
        Ok(document_type) => document_type,
        Err(e) => bail!("cannot classify {}: {e}", args.file.display()),
    };
    tracing::debug!(file = %args.file.display(), %document_type, "classified");
    writeln!(out, "{document_type}")?;

    if args.resources {
        for (member, item) in objects(root) {
            let Value::Object(map) = item else {
                continue;
            };
            let label = match (map.get("type").and_then(Value::as_str), map.get("id").and_then(Value::as_str)) {
                (Some(t), Some(id)) => format!("{t}:{id}"),
                (Some(t), None) => t.to_string(),
                _ => "?".to_string(),
            };
            writeln!(out, "  {member} {label} {}", classify_data(map))?;
        }
    }
    Ok(0)
}

fn objects(root: &serde_json::Map<String, Value>) -> Vec<(&'static str, &Value)> {
    let mut found = Vec::new();
    for member in ["data", "included"] {
        match root.get(member) {
            Some(Value::Array(items)) => found.extend(items.iter().map(|item| (member, item))),
            Some(item @ Value::Object(_)) => found.push((member, item)),
            _ => {}
        }
    }
    found
}
