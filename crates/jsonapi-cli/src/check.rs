//! # Check Subcommand
//!
//! Builds the DOM for a document and reports every structural error, one
//! per line as `<pointer>: <message>`. With `--json` the report is itself a
//! JSON:API errors document.
//!
//! Exit codes: `0` valid, `1` structural errors found.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use jsonapi_core::ErrorObject;
use jsonapi_dom::DomBuilder;

use crate::{parse_json, read_input};

/// Arguments for `jsonapi check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Document to check, or `-` for stdin.
    pub file: PathBuf,

    /// Print the errors as a JSON:API errors document.
    #[arg(long)]
    pub json: bool,
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs, out: &mut dyn Write) -> Result<u8> {
    let text = read_input(&args.file)?;
    let value = parse_json(&text, &args.file)?;
    let output = DomBuilder::build(&value);
    let errors = output.errors;
    tracing::debug!(file = %args.file.display(), errors = errors.len(), "checked");

    if args.json {
        let objects = Vec::<ErrorObject>::from(&errors);
        serde_json::to_writer_pretty(&mut *out, &serde_json::json!({ "errors": objects }))?;
        writeln!(out)?;
    } else if errors.is_empty() {
        writeln!(out, "ok: {}", output.document.document_type())?;
    } else {
        for error in errors.errors() {
            writeln!(out, "{error}")?;
        }
        writeln!(out, "{} structural error(s)", errors.len())?;
    }
    Ok(if errors.is_empty() { 0 } else { 1 })
}
