//! # Format Subcommand
//!
//! Parses a document into the DOM and writes it back. Member order is
//! kept; null-valued members are written or dropped per `--nulls`.
//! Structurally invalid documents are refused.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use jsonapi_core::{DomSettings, NullHandling};
use jsonapi_dom::DomDocument;

use crate::{parse_json, read_input};

/// Null handling choices on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NullsArg {
    /// Write null-valued members.
    Include,
    /// Drop null-valued members (`data` is always written).
    Ignore,
}

impl From<NullsArg> for NullHandling {
    fn from(arg: NullsArg) -> Self {
        match arg {
            NullsArg::Include => NullHandling::Include,
            NullsArg::Ignore => NullHandling::Ignore,
        }
    }
}

/// Arguments for `jsonapi format`.
#[derive(Args, Debug)]
pub struct FormatArgs {
    /// Document to format, or `-` for stdin.
    pub file: PathBuf,

    /// Null handling for every member except `data` and `meta`.
    #[arg(long, value_enum, default_value = "include")]
    pub nulls: NullsArg,

    /// Null handling for a null `meta` member; defaults to `--nulls`.
    #[arg(long, value_enum)]
    pub meta_nulls: Option<NullsArg>,

    /// Write compact JSON instead of pretty-printed.
    #[arg(long)]
    pub compact: bool,
}

/// Execute the format subcommand.
pub fn run_format(args: &FormatArgs, out: &mut dyn Write) -> Result<u8> {
    let text = read_input(&args.file)?;
    let value = parse_json(&text, &args.file)?;
    let document = DomDocument::parse(&value)
        .with_context(|| format!("{} is not a valid JSON:API document", args.file.display()))?;
    let settings = DomSettings {
        null_handling: args.nulls.into(),
        meta_null_handling: args.meta_nulls.map(NullHandling::from),
        ..DomSettings::default()
    };
    let normalized = document.to_value_with(&settings);
    if args.compact {
        serde_json::to_writer(&mut *out, &normalized)?;
    } else {
        serde_json::to_writer_pretty(&mut *out, &normalized)?;
    }
    writeln!(out)?;
    Ok(0)
}
