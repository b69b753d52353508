//! Oak - command-line front end.
//!
//! Loads a route table from configuration and answers lookups against it.
//! Mostly useful for checking a routes file before embedding it elsewhere.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use oak_lib::config::{self, ConfigLoader, LogConfig, LookupMode, OakConfig};
use oak_lib::error::{ErrorContext, ErrorReporter, OakError, OakResult, TracingErrorReporter};
use oak_lib::routes::RouteTable;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line arguments for Oak.
#[derive(Parser, Debug)]
#[clap(name = "oak", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a path against the configured routes
    Lookup {
        /// Textual path, e.g. /cat/news
        path: String,

        /// Only accept a route stored at exactly this path
        #[clap(long)]
        exact: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },

    /// Print the route tree as JSON
    Dump,
}

/// Initialize the logging system.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(log: &LogConfig) -> OakResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_line_number(log.source_location)
        .with_file(log.source_location)
        .with_thread_names(true);

    let result = if log.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.pretty().finish())
    };

    result.map_err(|e| OakError::Custom(format!("Failed to set global tracing subscriber: {e}")))
}

fn run(command: Command, loaded: OakResult<OakConfig>) -> OakResult<()> {
    match command {
        Command::Lookup { path, exact } => {
            let config = loaded?;
            let table = RouteTable::from_config(&config)?;
            let mode = if exact {
                LookupMode::Exact
            } else {
                config.table.default_mode
            };

            match table.lookup_with(&path, mode)? {
                Some(target) => {
                    println!("{target}");
                    Ok(())
                }
                None => Err(OakError::Custom(format!("No route matches '{path}'"))),
            }
        }
        Command::Validate => {
            let config = loaded?;
            info!(routes = config.routes.len(), "Configuration validated successfully");
            Ok(())
        }
        Command::GenConfig { output } => {
            info!("Generating default configuration");
            let default_config = OakConfig::default();

            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let toml = toml::to_string_pretty(&default_config)
                .map_err(|e| OakError::Custom(format!("Failed to serialize config: {e}")))?;
            std::fs::write(&output, toml)?;

            info!("Default configuration written to {:?}", output);
            Ok(())
        }
        Command::Dump => {
            let table = RouteTable::from_config(&loaded?)?;
            println!("{}", serde_json::to_string_pretty(&table.snapshot())?);
            Ok(())
        }
    }
}

/// Main entry point for the application.
fn main() -> ExitCode {
    let args = Args::parse();

    let loader = ConfigLoader::new(args.config.as_deref(), config::ENV_PREFIX);
    let loaded = loader.load().map_err(OakError::from);

    // Logging follows the loaded configuration; a broken configuration still
    // gets reported, through the default logger.
    let log_config = loaded
        .as_ref()
        .map(|config| config.log.clone())
        .unwrap_or_default();
    if let Err(e) = init_logging(&log_config) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match run(args.command, loaded) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            TracingErrorReporter.report(ErrorContext::new(error, "oak"));
            ExitCode::FAILURE
        }
    }
}
