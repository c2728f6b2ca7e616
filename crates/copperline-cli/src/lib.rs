//! Copperline CLI library
//!
//! This module contains the core CLI logic for the Copperline design-file
//! inspector: it reads a KiCad schematic or board file, decodes it, and
//! reports the document as a summary or as JSON.

pub mod config;
pub mod error_adapter;

mod args;
mod report;

pub use args::{Args, StrictnessArg};

use std::fs;

use log::info;
use thiserror::Error;

use copperline_parser::{ParseOptions, Strictness, error::ParseError, parse_with};

/// Top-level CLI error.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    /// A parse failure, kept together with the source text so the error
    /// can be rendered with a labeled snippet.
    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Run the Copperline CLI application
///
/// Reads the input file, decodes it, and writes the report to the output
/// path or stdout.
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - JSON serialization errors
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(input_path = args.input; "Decoding design file");

    let app_config = config::load_config(args.config.as_ref())?;

    let strictness = resolve_strictness(args, &app_config);
    let options = ParseOptions { strictness };

    let source = fs::read_to_string(&args.input)?;
    let document = parse_with(&source, &options)
        .map_err(|err| CliError::Parse { err, src: source })?;

    info!(
        kind = document.kind_name(),
        version = document.version();
        "Decoded document"
    );

    let rendered = if args.json || app_config.json {
        let mut json = serde_json::to_string_pretty(&document)?;
        json.push('\n');
        json
    } else {
        report::summarize(&document)
    };

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!(output_file = path; "Report written");
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

/// The command line wins over the config file; the default is permissive.
fn resolve_strictness(args: &Args, config: &config::AppConfig) -> Strictness {
    if let Some(arg) = args.strictness {
        return arg.into();
    }
    match config.strictness.as_deref() {
        Some("capture") => Strictness::Capture,
        Some("strict") => Strictness::Strict,
        _ => Strictness::Permissive,
    }
}
