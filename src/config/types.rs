//! Configuration types for bootcfg
//!
//! Each section declares its fields (kind, default, constraints) in
//! [`ConfigSection::read`] and its whole-section default in `Default`.

use crate::schema::kind::Enum;
use crate::schema::{ConfigSection, FieldReader, RawConfig, RawSection, field};
use crate::util::SecretString;
use serde::Serialize;

/// Placeholder session secret used when the `crypto` section is not configured
pub const DEFAULT_SESSION_SECRET: &str = "ThisIsADefaultSecretSessionKeyPlaceholder";

/// Minimum session secret length
pub const SESSION_SECRET_MIN_LENGTH: usize = 32;

/// Root configuration structure, immutable once validated
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Database connection settings
    pub postgres: PostgresConfig,

    /// Secrets used for signing
    pub crypto: CryptoConfig,

    /// Instance name and description shown to clients
    pub meta: MetaConfig,

    /// Captcha on registration
    pub captcha: CaptchaConfig,

    /// Rate limiting backend
    pub ratelimits: RatelimitsConfig,
}

impl AppConfig {
    /// Raw form with every field present and already typed.
    /// Validating it yields an identical configuration.
    pub fn to_raw(&self) -> RawConfig {
        RawConfig::new()
            .with_section(ServerConfig::NAME, self.server.to_raw())
            .with_section(LoggingConfig::NAME, self.logging.to_raw())
            .with_section(PostgresConfig::NAME, self.postgres.to_raw())
            .with_section(CryptoConfig::NAME, self.crypto.to_raw())
            .with_section(MetaConfig::NAME, self.meta.to_raw())
            .with_section(CaptchaConfig::NAME, self.captcha.to_raw())
            .with_section(RatelimitsConfig::NAME, self.ratelimits.to_raw())
    }

    /// Settings that are valid but risky, worth a warning at boot
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.postgres.sync_schema {
            warnings.push(
                "postgres.syncSchema is enabled: schema sync is destructive, never use it in production"
                    .to_string(),
            );
        }
        if self.postgres.debug_logging {
            warnings.push(
                "postgres.debugLogging is enabled: queries and their data will be logged".to_string(),
            );
        }
        if self.server.tcp_port().is_none() {
            warnings.push(format!("server.port {} is not a usable TCP port", self.server.port));
        }
        if self.server.allow_any_site && !self.server.cors.trim().is_empty() {
            warnings.push("server.allowAnySite is enabled and overrides server.cors".to_string());
        }
        if self.crypto.session_secret.expose_secret() == DEFAULT_SESSION_SECRET {
            warnings.push("crypto.sessionSecret is the built-in placeholder".to_string());
        }
        if self.captcha.enabled && (self.captcha.secret.is_none() || self.captcha.client_key.is_none()) {
            warnings.push("captcha.enabled is set but captcha.secret or captcha.clientKey is missing".to_string());
        }
        if self.ratelimits.enabled && self.ratelimits.redis_url.is_none() {
            warnings.push("ratelimits.enabled is set but ratelimits.redisUrl is missing".to_string());
        }

        warnings
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Port of the web server. Any finite number is accepted here;
    /// [`ServerConfig::tcp_port`] narrows it for binding.
    pub port: f64,

    /// Space separated list of allowed CORS origins
    pub cors: String,

    /// Disable cross origin restrictions; overrides `cors`
    pub allow_any_site: bool,

    /// Trust reverse proxy headers for client IPs
    pub trust_proxy: bool,

    /// Trust Cloudflare headers for client IPs (takes priority over proxy headers)
    pub trust_cloudflare: bool,

    /// Prefix the instance is served under, e.g. `/backend`
    pub base_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080.0,
            cors: String::new(),
            allow_any_site: false,
            trust_proxy: false,
            trust_cloudflare: false,
            base_path: "/".to_string(),
        }
    }
}

impl ConfigSection for ServerConfig {
    const NAME: &'static str = "server";

    fn read(fields: &mut FieldReader<'_>) -> Option<Self> {
        let port = fields.read(field::number("port").default(8080.0));
        let cors = fields.read(field::string("cors").default(""));
        let allow_any_site = fields.read(field::boolean("allowAnySite").default(false));
        let trust_proxy = fields.read(field::boolean("trustProxy").default(false));
        let trust_cloudflare = fields.read(field::boolean("trustCloudflare").default(false));
        let base_path = fields.read(field::string("basePath").default("/"));

        Some(Self {
            port: port?,
            cors: cors?,
            allow_any_site: allow_any_site?,
            trust_proxy: trust_proxy?,
            trust_cloudflare: trust_cloudflare?,
            base_path: base_path?,
        })
    }

    fn to_raw(&self) -> RawSection {
        RawSection::new()
            .with("port", self.port)
            .with("cors", self.cors.as_str())
            .with("allowAnySite", self.allow_any_site)
            .with("trustProxy", self.trust_proxy)
            .with("trustCloudflare", self.trust_cloudflare)
            .with("basePath", self.base_path.as_str())
    }
}

/// Cross-origin policy derived from `cors` and `allowAnySite`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy<'a> {
    /// Any origin is allowed
    Any,
    /// Only the listed origins; empty means same-origin only
    Origins(Vec<&'a str>),
}

/// Where the client IP of a request is taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientIpSource {
    /// `CF-Connecting-IP`
    Cloudflare,
    /// `X-Forwarded-For`
    Proxy,
    /// The socket peer address
    Peer,
}

impl ServerConfig {
    /// The port as a TCP port, `None` when it is fractional or out of range
    pub fn tcp_port(&self) -> Option<u16> {
        let port = self.port;
        (port.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(&port)).then(|| port as u16)
    }

    pub fn cors_policy(&self) -> CorsPolicy<'_> {
        if self.allow_any_site {
            CorsPolicy::Any
        } else {
            CorsPolicy::Origins(self.cors.split_whitespace().collect())
        }
    }

    pub fn client_ip_source(&self) -> ClientIpSource {
        if self.trust_cloudflare {
            ClientIpSource::Cloudflare
        } else if self.trust_proxy {
            ClientIpSource::Proxy
        } else {
            ClientIpSource::Peer
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LoggingConfig {
    /// Output format (json, pretty)
    pub format: LogFormat,

    /// Show debug logs
    pub debug: bool,
}

impl LoggingConfig {
    /// Default level directive for the subscriber
    pub fn level(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }
}

impl ConfigSection for LoggingConfig {
    const NAME: &'static str = "logging";

    fn read(fields: &mut FieldReader<'_>) -> Option<Self> {
        let format = fields.read(field::one_of("format", LogFormat::KIND).default(LogFormat::Pretty));
        let debug = fields.read(field::boolean("debug").default(false));

        Some(Self {
            format: format?,
            debug: debug?,
        })
    }

    fn to_raw(&self) -> RawSection {
        RawSection::new()
            .with("format", self.format.as_str())
            .with("debug", self.debug)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON structured output, recommended for production
    Json,
    /// Human-readable output
    #[default]
    Pretty,
}

impl LogFormat {
    pub const KIND: Enum<LogFormat> = Enum::new(&[("json", LogFormat::Json), ("pretty", LogFormat::Pretty)]);

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        }
    }
}

/// Postgres connection configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostgresConfig {
    /// Connection URL; may embed credentials
    pub connection: SecretString,

    /// Run all migrations on boot
    pub migrate_on_boot: bool,

    /// Keep the database schema in sync with the entities (destructive)
    pub sync_schema: bool,

    /// Log queries and entity management (leaks data)
    pub debug_logging: bool,

    /// Use SSL for the connection
    pub ssl: bool,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            connection: SecretString::new(""),
            migrate_on_boot: false,
            sync_schema: false,
            debug_logging: false,
            ssl: false,
        }
    }
}

impl ConfigSection for PostgresConfig {
    const NAME: &'static str = "postgres";

    fn read(fields: &mut FieldReader<'_>) -> Option<Self> {
        let connection = fields.read(field::secret("connection"));
        let migrate_on_boot = fields.read(field::boolean("migrateOnBoot").default(false));
        let sync_schema = fields.read(field::boolean("syncSchema").default(false));
        let debug_logging = fields.read(field::boolean("debugLogging").default(false));
        let ssl = fields.read(field::boolean("ssl").default(false));

        Some(Self {
            connection: connection?,
            migrate_on_boot: migrate_on_boot?,
            sync_schema: sync_schema?,
            debug_logging: debug_logging?,
            ssl: ssl?,
        })
    }

    fn to_raw(&self) -> RawSection {
        RawSection::new()
            .with("connection", self.connection.expose_secret())
            .with("migrateOnBoot", self.migrate_on_boot)
            .with("syncSchema", self.sync_schema)
            .with("debugLogging", self.debug_logging)
            .with("ssl", self.ssl)
    }
}

/// Cryptographic secrets
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoConfig {
    /// Used for signing session tokens
    pub session_secret: SecretString,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            session_secret: SecretString::new(DEFAULT_SESSION_SECRET),
        }
    }
}

impl ConfigSection for CryptoConfig {
    const NAME: &'static str = "crypto";

    fn read(fields: &mut FieldReader<'_>) -> Option<Self> {
        // required once the section is present; the placeholder only backs an absent section
        let session_secret =
            fields.read(field::secret("sessionSecret").min_length(SESSION_SECRET_MIN_LENGTH));

        Some(Self {
            session_secret: session_secret?,
        })
    }

    fn to_raw(&self) -> RawSection {
        RawSection::new().with("sessionSecret", self.session_secret.expose_secret())
    }
}

/// Name and description of this backend, displayed when making an account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaConfig {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            name: " ".to_string(),
            description: None,
        }
    }
}

impl ConfigSection for MetaConfig {
    const NAME: &'static str = "meta";

    fn read(fields: &mut FieldReader<'_>) -> Option<Self> {
        let name = fields.read(field::string("name").min_length(1));
        let description = fields.read(field::optional_string("description").min_length(1));

        Some(Self {
            name: name?,
            description: description?,
        })
    }

    fn to_raw(&self) -> RawSection {
        RawSection::new()
            .with("name", self.name.as_str())
            .with_opt("description", self.description.as_deref())
    }
}

/// Captcha on registration
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptchaConfig {
    pub enabled: bool,

    /// Server-side captcha secret
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<SecretString>,

    /// Public key handed to clients
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_key: Option<String>,
}

impl ConfigSection for CaptchaConfig {
    const NAME: &'static str = "captcha";

    fn read(fields: &mut FieldReader<'_>) -> Option<Self> {
        let enabled = fields.read(field::boolean("enabled").default(false));
        let secret = fields.read(field::optional_secret("secret").min_length(1));
        let client_key = fields.read(field::optional_string("clientKey").min_length(1));

        Some(Self {
            enabled: enabled?,
            secret: secret?,
            client_key: client_key?,
        })
    }

    fn to_raw(&self) -> RawSection {
        RawSection::new()
            .with("enabled", self.enabled)
            .with_opt("secret", self.secret.as_ref().map(SecretString::expose_secret))
            .with_opt("clientKey", self.client_key.as_deref())
    }
}

/// Rate limiting
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatelimitsConfig {
    pub enabled: bool,

    /// Redis instance holding the counters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis_url: Option<String>,
}

impl ConfigSection for RatelimitsConfig {
    const NAME: &'static str = "ratelimits";

    fn read(fields: &mut FieldReader<'_>) -> Option<Self> {
        let enabled = fields.read(field::boolean("enabled").default(false));
        let redis_url = fields.read(field::optional_string("redisUrl"));

        Some(Self {
            enabled: enabled?,
            redis_url: redis_url?,
        })
    }

    fn to_raw(&self) -> RawSection {
        RawSection::new()
            .with("enabled", self.enabled)
            .with_opt("redisUrl", self.redis_url.as_deref())
    }
}
