//! Configuration loader with layered sources
//!
//! Loads raw configuration from multiple sources with the following precedence
//! (highest to lowest), then validates it in one pass:
//! 1. Environment variables (BOOTCFG_<SECTION>__<FIELD>)
//! 2. Configuration file (TOML)
//! 3. Field and section defaults declared by the schema

use crate::config::assemble::validate;
use crate::config::types::AppConfig;
use crate::error::ConfigError;
use crate::schema::RawConfig;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use std::path::Path;
use tracing::debug;

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "BOOTCFG";

/// Separator between section and field in environment variable names
const ENV_SEPARATOR: &str = "__";

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "bootcfg.toml",
    ".bootcfg.toml",
    "~/.config/bootcfg/config.toml",
    "/etc/bootcfg/config.toml",
];

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let builder = Config::builder().add_source(File::from_str(toml_str, FileFormat::Toml));
    finish(builder)
}

/// Load configuration from an explicit set of environment variables
///
/// Only `BOOTCFG_<SECTION>__<FIELD>` entries are considered; everything else
/// is ignored. The process environment is not read.
pub fn load_config_from_vars<I, K, V>(vars: I) -> Result<AppConfig, ConfigError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let builder = Config::builder().add_source(env_source(vars));
    finish(builder)
}

/// Load configuration from files and the process environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        debug!(path, "Using configuration file");
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                debug!(path = %expanded, "Using configuration file");
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    let vars = std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
    builder = builder.add_source(env_source(vars));

    finish(builder)
}

/// Collect the raw tree from all sources without validating it
pub fn load_raw(builder: ConfigBuilder<DefaultState>) -> Result<RawConfig, ConfigError> {
    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let value: serde_json::Value = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    RawConfig::try_from(value)
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<AppConfig, ConfigError> {
    let raw = load_raw(builder)?;
    Ok(validate(&raw)?)
}

/// Environment source restricted to `BOOTCFG_<SECTION>__<FIELD>` variables.
///
/// Values stay strings; coercion happens in the schema.
fn env_source<I, K, V>(vars: I) -> Environment
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let scoped: config::Map<String, String> = vars
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .filter(|(k, _)| is_field_var(k))
        .collect();

    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator(ENV_SEPARATOR)
        .source(Some(scoped))
}

/// `BOOTCFG_SERVER__PORT` is a field variable, `BOOTCFG_CONFIG` is not
fn is_field_var(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    let Some(rest) = upper
        .strip_prefix(ENV_PREFIX)
        .and_then(|rest| rest.strip_prefix('_'))
    else {
        return false;
    };

    let mut parts = rest.split(ENV_SEPARATOR);
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(section), Some(field), None) if !section.is_empty() && !field.is_empty()
    )
}
