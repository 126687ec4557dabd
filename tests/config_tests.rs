//! Configuration loading tests

use bootcfg::ConfigError;
use bootcfg::config::{LogFormat, load_config_from_str, load_config_from_vars};

const MINIMAL_CONFIG: &str = r#"
[meta]
name = "test-server"
"#;

const FULL_CONFIG: &str = r#"
[server]
port = 9000
cors = "https://a.example https://b.example"
allowAnySite = "false"
trustProxy = "true"
trustCloudflare = false
basePath = "/backend"

[logging]
format = "json"
debug = true

[postgres]
connection = "postgres://user:pw@db:5432/app"
migrateOnBoot = "true"
ssl = "true"

[crypto]
sessionSecret = "0123456789abcdef0123456789abcdef"

[meta]
name = "Backend"
description = "A test backend"

[captcha]
enabled = "true"
secret = "captcha-secret"
clientKey = "captcha-client"

[ratelimits]
enabled = "true"
redisUrl = "redis://localhost:6379"
"#;

#[test]
fn test_minimal_config() {
    let config = load_config_from_str(MINIMAL_CONFIG).unwrap();

    assert_eq!(config.meta.name, "test-server");
    assert_eq!(config.meta.description, None);
    assert_eq!(config.server.port, 8080.0);
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn test_full_config() {
    let config = load_config_from_str(FULL_CONFIG).unwrap();

    // Server
    assert_eq!(config.server.port, 9000.0);
    assert!(!config.server.allow_any_site);
    assert!(config.server.trust_proxy);
    assert!(!config.server.trust_cloudflare);
    assert_eq!(config.server.base_path, "/backend");

    // Logging
    assert_eq!(config.logging.format, LogFormat::Json);
    assert!(config.logging.debug);

    // Postgres
    assert_eq!(
        config.postgres.connection.expose_secret(),
        "postgres://user:pw@db:5432/app"
    );
    assert!(config.postgres.migrate_on_boot);
    assert!(!config.postgres.sync_schema);
    assert!(config.postgres.ssl);

    // Meta
    assert_eq!(config.meta.name, "Backend");
    assert_eq!(config.meta.description.as_deref(), Some("A test backend"));

    // Captcha
    assert!(config.captcha.enabled);
    assert_eq!(
        config.captcha.secret.as_ref().map(|s| s.expose_secret()),
        Some("captcha-secret")
    );
    assert_eq!(config.captcha.client_key.as_deref(), Some("captcha-client"));

    // Rate limits
    assert!(config.ratelimits.enabled);
    assert_eq!(
        config.ratelimits.redis_url.as_deref(),
        Some("redis://localhost:6379")
    );

    assert!(config.warnings().is_empty());
}

#[test]
fn test_every_error_is_reported() {
    let config_str = r#"
[server]
port = "http"
trustProxy = "yes"

[logging]
format = "text"

[crypto]
sessionSecret = "short"

[meta]
name = ""
"#;

    let err = load_config_from_str(config_str).unwrap_err();
    let ConfigError::Invalid(errors) = &err else {
        panic!("expected validation errors, got {err}");
    };

    let paths: Vec<_> = errors.iter().map(|e| e.path()).collect();
    assert_eq!(
        paths,
        vec![
            "server.port",
            "server.trustProxy",
            "logging.format",
            "crypto.sessionSecret",
            "meta.name",
        ]
    );

    let rendered = err.to_string();
    assert!(rendered.contains("5 field error(s)"));
    assert!(rendered.contains("logging.format: expected one of [json, pretty]"));
}

#[test]
fn test_empty_crypto_table_is_rejected() {
    let err = load_config_from_str("[crypto]\n").unwrap_err();

    assert_eq!(err.field_errors().len(), 1);
    assert_eq!(err.field_errors()[0].path(), "crypto.sessionSecret");
    assert_eq!(err.field_errors()[0].kind().name(), "MissingRequiredField");
}

#[test]
fn test_fractional_port_is_accepted() {
    let config = load_config_from_str("[server]\nport = \"80.5\"\n").unwrap();

    assert_eq!(config.server.port, 80.5);
    assert_eq!(config.server.tcp_port(), None);
    assert!(config.warnings().iter().any(|w| w.contains("server.port")));
}

#[test]
fn test_env_vars_are_coerced() {
    let config = load_config_from_vars([
        ("BOOTCFG_SERVER__PORT", "9090"),
        ("BOOTCFG_SERVER__TRUSTCLOUDFLARE", "true"),
        ("BOOTCFG_LOGGING__FORMAT", "json"),
        ("BOOTCFG_POSTGRES__CONNECTION", "postgres://localhost/app"),
        ("BOOTCFG_POSTGRES__SYNCSCHEMA", "true"),
        ("BOOTCFG_RATELIMITS__REDISURL", "redis://cache:6379"),
    ])
    .unwrap();

    assert_eq!(config.server.port, 9090.0);
    assert!(config.server.trust_cloudflare);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert!(config.postgres.sync_schema);
    assert_eq!(
        config.ratelimits.redis_url.as_deref(),
        Some("redis://cache:6379")
    );

    let warnings = config.warnings();
    assert!(warnings.iter().any(|w| w.contains("postgres.syncSchema")));
}

#[test]
fn test_env_var_bad_boolean() {
    let err = load_config_from_vars([("BOOTCFG_SERVER__TRUSTPROXY", "1")]).unwrap_err();
    assert_eq!(err.field_errors().len(), 1);
    assert_eq!(err.field_errors()[0].path(), "server.trustProxy");
    assert_eq!(err.field_errors()[0].kind().name(), "InvalidBoolean");
}

#[test]
fn test_env_var_empty_meta_name() {
    let err = load_config_from_vars([("BOOTCFG_META__NAME", "")]).unwrap_err();
    assert_eq!(err.field_errors()[0].path(), "meta.name");
    assert_eq!(err.field_errors()[0].kind().name(), "InvalidLength");
}

#[test]
#[serial_test::serial]
fn test_env_var_overrides_file() {
    use bootcfg::config::load_config;
    use std::env;
    use std::fs;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("bootcfg.toml");
    let config_content = r#"
[server]
port = 7000
basePath = "/api"
"#;
    fs::write(&config_path, config_content).unwrap();

    unsafe {
        env::set_var("BOOTCFG_SERVER__PORT", "7001");
    }

    let config = load_config(Some(config_path.to_str().unwrap()));

    unsafe {
        env::remove_var("BOOTCFG_SERVER__PORT");
    }

    let config = config.unwrap();
    assert_eq!(config.server.port, 7001.0);
    assert_eq!(config.server.base_path, "/api");
}

#[test]
#[serial_test::serial]
fn test_file_only() {
    use bootcfg::config::load_config;
    use std::fs;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("bootcfg.toml");
    fs::write(&config_path, FULL_CONFIG).unwrap();

    let config = load_config(Some(config_path.to_str().unwrap())).unwrap();
    assert_eq!(config.server.port, 9000.0);
    assert_eq!(config.meta.name, "Backend");
}
