//! Command-line argument definitions for the Copperline CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input path, the output format,
//! the unknown-child policy, configuration file selection, and logging
//! verbosity.

use clap::{Parser, ValueEnum};
use copperline_parser::Strictness;

/// Command-line arguments for the Copperline design-file inspector
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input design file
    #[arg(help = "Path to a .kicad_sch or .kicad_pcb file")]
    pub input: String,

    /// Emit the decoded document as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Path to write the output to (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<String>,

    /// How to treat children the schema does not describe
    #[arg(long, value_enum)]
    pub strictness: Option<StrictnessArg>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace); falls back to
    /// the config file's `log_level`, then to `warn`
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Command-line spelling of the decoder's unknown-child policy.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrictnessArg {
    /// Drop unrecognized children
    Permissive,
    /// Keep unrecognized children as raw text
    Capture,
    /// Fail on the first unrecognized child
    Strict,
}

impl From<StrictnessArg> for Strictness {
    fn from(arg: StrictnessArg) -> Self {
        match arg {
            StrictnessArg::Permissive => Strictness::Permissive,
            StrictnessArg::Capture => Strictness::Capture,
            StrictnessArg::Strict => Strictness::Strict,
        }
    }
}
