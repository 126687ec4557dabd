//! Typed boot configuration
//!
//! Turns loosely-typed startup input (environment strings, TOML files,
//! partially filled structures) into one validated, immutable [`AppConfig`],
//! or into the complete list of everything that is wrong with it.
//!
//! ## Defaulting Model
//!
//! ```text
//! section key absent   → whole-section default, verbatim
//! section key present  → every field on its own: default → coerce → validate
//! ```
//!
//! The two mechanisms never merge: a present-but-partial section gets field
//! defaults, never values from the whole-section default.
//!
//! ## Example
//!
//! ```
//! use bootcfg::{RawConfig, validate};
//!
//! let mut raw = RawConfig::new();
//! raw.set("server", "port", "9090");
//! raw.set("meta", "name", "MyServer");
//!
//! let config = validate(&raw).unwrap();
//! assert_eq!(config.server.port, 9090.0);
//! assert_eq!(config.meta.description, None);
//! ```
//!
//! ## Environment
//!
//! ```text
//! BOOTCFG_SERVER__PORT=9090
//! BOOTCFG_LOGGING__FORMAT=json
//! BOOTCFG_CRYPTO__SESSIONSECRET=...
//! ```

pub mod config;
pub mod error;
pub mod schema;
pub mod util;

// Re-export main types
pub use config::{AppConfig, load_config, validate};
pub use error::{ConfigError, FieldError, FieldErrorKind, Result, ValidationErrors};
pub use schema::{RawConfig, RawSection, RawValue};
