//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Schemata CLI - resolve type-driven response formats and decode answers
///
/// Format documents are JSON or YAML files of the form
/// `{"schema": {...}, "schema_name": "...", "strict": true}` whose schema may
/// reference the built-in types (`Step`, `Plan`, `Task`) in `type` fields.
#[derive(Parser, Debug)]
#[command(
    name = "schemata",
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SCHEMATA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results [default: json-pretty, or the config's]
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a format document into literal JSON Schema
    Resolve(ResolveArgs),

    /// Render the system instruction that embeds the resolved schema
    Instruction(FormatArgs),

    /// Decode a stored provider response against a format document
    Decode(DecodeArgs),

    /// List the registered descriptor types
    Types(TypesArgs),
}

/// Arguments shared by commands that read a format document
#[derive(Parser, Debug)]
pub struct FormatArgs {
    /// Path to the format document (JSON or YAML)
    #[arg(value_name = "FORMAT")]
    pub format: PathBuf,

    /// Override the schema name
    #[arg(long)]
    pub schema_name: Option<String>,

    /// Force strict mode
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub format: FormatArgs,

    /// Print the full `response_format` wire payload instead of the schema
    #[arg(long)]
    pub wire: bool,
}

/// Arguments for the decode command
#[derive(Parser, Debug)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub format: FormatArgs,

    /// Path to the response: `{"messages": [...]}` JSON, or raw text with `--raw`
    #[arg(value_name = "RESPONSE")]
    pub response: PathBuf,

    /// Treat the response file as the assistant's raw answer
    #[arg(long)]
    pub raw: bool,

    /// Also print reasoning text attached to the messages
    #[arg(long)]
    pub show_reasoning: bool,
}

/// Arguments for the types command
#[derive(Parser, Debug)]
pub struct TypesArgs {
    /// Print each type's schema fragment as resolved under this schema name
    #[arg(long)]
    pub schema_name: Option<String>,
}

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    #[default]
    JsonPretty,
    /// YAML
    Yaml,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the verbosity level (0 = normal, 1+ = verbose)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::env::var("NO_COLOR").is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_parsing() {
        let cli = Cli::parse_from(["schemata", "-vv", "resolve", "format.json", "--wire", "--strict"]);
        assert_eq!(cli.verbosity_level(), 2);
        match cli.command {
            Commands::Resolve(args) => {
                assert!(args.wire);
                assert!(args.format.strict);
                assert_eq!(args.format.format, PathBuf::from("format.json"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_decode_parsing() {
        let cli = Cli::parse_from([
            "schemata", "--quiet", "-o", "yaml", "decode", "format.yaml", "answer.txt", "--raw",
        ]);
        assert_eq!(cli.verbosity_level(), 0);
        assert_eq!(cli.output, Some(OutputFormat::Yaml));
        match cli.command {
            Commands::Decode(args) => {
                assert!(args.raw);
                assert_eq!(args.response, PathBuf::from("answer.txt"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
