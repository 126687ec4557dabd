//! Assembles the typed configuration from raw input
//!
//! Walks every section in declaration order and either returns one complete
//! [`AppConfig`] or every failure found anywhere in the tree.

use crate::config::types::{
    AppConfig, CaptchaConfig, CryptoConfig, LoggingConfig, MetaConfig, PostgresConfig,
    RatelimitsConfig, ServerConfig,
};
use crate::error::{FieldError, ValidationErrors};
use crate::schema::{RawConfig, resolve_section};
use tracing::debug;

/// Validate `raw` into an [`AppConfig`].
///
/// Pure and deterministic: no partial configuration is ever returned.
pub fn validate(raw: &RawConfig) -> Result<AppConfig, ValidationErrors> {
    let mut errors: Vec<FieldError> = Vec::new();

    let server = resolve_section::<ServerConfig>(raw, &mut errors);
    let logging = resolve_section::<LoggingConfig>(raw, &mut errors);
    let postgres = resolve_section::<PostgresConfig>(raw, &mut errors);
    let crypto = resolve_section::<CryptoConfig>(raw, &mut errors);
    let meta = resolve_section::<MetaConfig>(raw, &mut errors);
    let captcha = resolve_section::<CaptchaConfig>(raw, &mut errors);
    let ratelimits = resolve_section::<RatelimitsConfig>(raw, &mut errors);

    match (server, logging, postgres, crypto, meta, captcha, ratelimits) {
        (
            Some(server),
            Some(logging),
            Some(postgres),
            Some(crypto),
            Some(meta),
            Some(captcha),
            Some(ratelimits),
        ) if errors.is_empty() => Ok(AppConfig {
            server,
            logging,
            postgres,
            crypto,
            meta,
            captcha,
            ratelimits,
        }),
        _ => {
            debug!(failures = errors.len(), "Configuration validation failed");
            Err(ValidationErrors::collected(errors))
        }
    }
}

impl TryFrom<&RawConfig> for AppConfig {
    type Error = ValidationErrors;

    fn try_from(raw: &RawConfig) -> Result<Self, Self::Error> {
        validate(raw)
    }
}
