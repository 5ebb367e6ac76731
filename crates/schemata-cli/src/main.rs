//! Schemata CLI - Command-line interface for type-driven response formats
//!
//! This is the main entry point for the Schemata CLI application, providing
//! commands for resolving format documents into JSON Schema, rendering schema
//! instructions, and decoding stored provider responses into typed objects.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    control::set_override(cli.use_color());

    let result = Config::load_with_file(cli.config.as_deref()).and_then(|config| {
        control::set_override(cli.use_color() && config.output.color());

        if let Err(e) = init_logging(&cli, &config) {
            eprintln!("Failed to initialize logging: {}", e);
        }

        run(cli, config)
    });

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));
            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
fn run(cli: Cli, config: Config) -> Result<()> {
    let use_color = cli.use_color() && config.output.color();
    let format = cli.output.or(config.output.format).unwrap_or_default();
    let mut output = OutputWriter::new(format, use_color, cli.quiet);

    tracing::info!(verbosity = cli.verbosity_level(), "Executing command");

    match cli.command {
        Commands::Resolve(args) => handlers::handle_resolve(args, &config, &mut output),
        Commands::Instruction(args) => handlers::handle_instruction(args, &config, &mut output),
        Commands::Decode(args) => handlers::handle_decode(args, &config, &mut output),
        Commands::Types(args) => handlers::handle_types(args, &config, &mut output),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let mut logging_config = config.logging.to_logging_config();
    logging_config.apply_verbosity(cli.verbosity_level());

    // Environment wins over flags and the config file
    logging_config.merge_with_env();

    if cli.quiet {
        logging_config.level = "error".to_string();
    }

    logging::init_logging(&logging_config)
}
