//! bootcfg
//!
//! Validates boot configuration and reports every problem before a service starts.

use anyhow::Context;
use bootcfg::{
    config::{AppConfig, LogFormat, LoggingConfig, load_config},
    error::ConfigError,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Validate typed boot configuration from TOML files and environment variables
#[derive(Parser, Debug)]
#[command(name = "bootcfg")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "BOOTCFG_CONFIG")]
    config: Option<String>,

    /// Do not read a .env file from the working directory
    #[arg(long, env = "BOOTCFG_NO_DOTENV")]
    no_dotenv: bool,

    /// Log level, overriding logging.debug (trace, debug, info, warn, error)
    #[arg(long, env = "BOOTCFG_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Validate the configuration and report problems (default)
    Check,

    /// Print the validated configuration, secrets redacted
    Print {
        #[arg(long, value_enum, default_value_t = OutputFormat::Toml)]
        output: OutputFormat,
    },

    /// Print the configuration used when nothing is configured
    Defaults {
        #[arg(long, value_enum, default_value_t = OutputFormat::Toml)]
        output: OutputFormat,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Toml,
}

/// Initialize the global subscriber from the logging section
fn init_logging(logging: &LoggingConfig, level_override: Option<&str>) {
    let level = level_override.unwrap_or(logging.level());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match logging.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }
}

/// A missing .env file is fine; any other failure is kept for a warning
fn dotenv_problem(result: Result<PathBuf, dotenvy::Error>) -> Option<dotenvy::Error> {
    match result {
        Ok(_) => None,
        Err(dotenvy::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => Some(e),
    }
}

fn render(config: &AppConfig, output: OutputFormat) -> anyhow::Result<String> {
    match output {
        OutputFormat::Json => {
            serde_json::to_string_pretty(config).context("Failed to render configuration as JSON")
        }
        OutputFormat::Toml => {
            toml::to_string_pretty(config).context("Failed to render configuration as TOML")
        }
    }
}

/// Log every failure; a service must never boot on a partial configuration
fn report_failure(err: &ConfigError) {
    match err {
        ConfigError::Load(reason) => error!(reason = %reason, "Failed to load configuration"),
        ConfigError::Invalid(errors) => {
            for field in errors {
                error!(
                    path = field.path(),
                    kind = field.kind().name(),
                    "{}",
                    field.message()
                );
            }
            error!(failures = errors.len(), "Configuration is invalid, refusing to start");
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    if let Some(Command::Defaults { output }) = args.command {
        println!("{}", render(&AppConfig::default(), output)?);
        return Ok(ExitCode::SUCCESS);
    }

    // Logging depends on the loaded config, so .env problems are reported once it is up
    let dotenv_error = if args.no_dotenv {
        None
    } else {
        dotenv_problem(dotenvy::dotenv())
    };

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&LoggingConfig::default(), args.log_level.as_deref());
            if let Some(dotenv_error) = &dotenv_error {
                warn!(error = %dotenv_error, "Failed to load .env file");
            }
            report_failure(&e);
            return Ok(ExitCode::FAILURE);
        }
    };

    init_logging(&config.logging, args.log_level.as_deref());
    if let Some(dotenv_error) = &dotenv_error {
        warn!(error = %dotenv_error, "Failed to load .env file");
    }
    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.server.port,
        name = %config.meta.name,
        "Configuration is valid"
    );
    for warning in config.warnings() {
        warn!("{}", warning);
    }

    match args.command.unwrap_or(Command::Check) {
        Command::Check | Command::Defaults { .. } => {}
        Command::Print { output } => println!("{}", render(&config, output)?),
    }

    Ok(ExitCode::SUCCESS)
}
