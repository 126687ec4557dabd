//! Configuration module
//!
//! Declares the application's configuration sections, assembles them from raw
//! input, and loads raw input from TOML files and environment variables.

pub mod assemble;
pub mod loader;
pub mod types;

pub use assemble::validate;
pub use loader::{load_config, load_config_from_str, load_config_from_vars};
pub use types::*;
