//! # jsonapi CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jsonapi_cli::check::{run_check, CheckArgs};
use jsonapi_cli::classify::{run_classify, ClassifyArgs};
use jsonapi_cli::format::{run_format, FormatArgs};

/// Inspect, validate and normalize JSON:API documents.
#[derive(Parser, Debug)]
#[command(name = "jsonapi", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the document type.
    Classify(ClassifyArgs),

    /// Report every structural error; exit code 1 when any are found.
    Check(CheckArgs),

    /// Round-trip through the DOM and print normalized JSON.
    Format(FormatArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = match cli.command {
        Commands::Classify(args) => run_classify(&args, &mut out),
        Commands::Check(args) => run_check(&args, &mut out),
        Commands::Format(args) => run_format(&args, &mut out),
    };
    let result = finish(result, &mut out);

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Flush buffered output once the handler is done, so a failed write
/// surfaces as an operational error.
fn finish(result: anyhow::Result<u8>, out: &mut dyn Write) -> anyhow::Result<u8> {
    let code = result?;
    out.flush()?;
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn flush_failure_is_reported() {
        let err = finish(Ok(0), &mut BrokenPipe).unwrap_err();
        assert!(err.downcast_ref::<std::io::Error>().is_some());
        assert_eq!(finish(Ok(1), &mut Vec::new()).unwrap(), 1);
    }

    #[test]
    fn cli_parse_check_json() {
        let cli = Cli::try_parse_from(["jsonapi", "check", "doc.json", "--json"]).unwrap();
        match cli.command {
            Commands::Check(args) => {
                assert!(args.json);
                assert_eq!(args.file.to_str(), Some("doc.json"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_parse_format_options() {
        let cli = Cli::try_parse_from(["jsonapi", "-vv", "format", "-", "--nulls", "ignore", "--compact"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Format(args) => {
                assert!(args.compact);
                assert_eq!(args.nulls, jsonapi_cli::format::NullsArg::Ignore);
                assert_eq!(args.meta_nulls, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_requires_a_subcommand() {
        assert!(Cli::try_parse_from(["jsonapi"]).is_err());
    }
}
