// Unit tests for configuration loading

use calendar_backend::config::{Config, MIN_SECRET_LEN};
use std::collections::HashMap;

fn load(pairs: &[(&str, &str)]) -> Result<Config, calendar_backend::core::errors::ServiceError> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_source(|key| map.get(key).cloned())
}

const SECRET: (&str, &str) = ("JWT_SECRET", "0123456789abcdef0123");

#[test]
fn test_defaults() {
    let config = load(&[SECRET]).unwrap();

    assert_eq!(config.bind_address, "0.0.0.0");
    assert_eq!(config.port, 3000);
    assert!(config.database_url.is_none());
    assert_eq!(config.static_dir, std::path::PathBuf::from("public"));
    assert_eq!(config.cors_allowed_origin, "http://localhost:3001");
    assert_eq!(config.request_timeout_secs, 30);
    assert_eq!(config.body_size_limit_bytes, 1024 * 1024);
    assert_eq!(config.log_level, "info");
    assert_eq!(config.log_format, "json");
}

#[test]
fn test_overrides() {
    let config = load(&[
        SECRET,
        ("PORT", "8080"),
        ("DATABASE_URL", "postgres://app:pw@db:5432/calendar"),
        ("STATIC_DIR", "/srv/www"),
        ("LOG_FORMAT", "text"),
    ])
    .unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.database_url.as_deref(),
        Some("postgres://app:pw@db:5432/calendar")
    );
    assert_eq!(config.static_dir, std::path::PathBuf::from("/srv/www"));
    assert_eq!(config.log_format, "text");
}

#[test]
fn test_secret_required() {
    let err = load(&[]).unwrap_err();
    assert!(err.to_string().contains("JWT_SECRET"));

    let err = load(&[("JWT_SECRET", "")]).unwrap_err();
    assert!(err.to_string().contains("JWT_SECRET"));
}

#[test]
fn test_short_secret_rejected() {
    let short = "x".repeat(MIN_SECRET_LEN - 1);
    assert!(load(&[("JWT_SECRET", short.as_str())]).is_err());

    let exact = "x".repeat(MIN_SECRET_LEN);
    assert!(load(&[("JWT_SECRET", exact.as_str())]).is_ok());
}

#[test]
fn test_invalid_values_rejected() {
    assert!(load(&[SECRET, ("PORT", "not-a-port")]).is_err());
    assert!(load(&[SECRET, ("DATABASE_URL", "not a url")]).is_err());
    assert!(load(&[SECRET, ("CORS_ALLOWED_ORIGIN", "nope")]).is_err());
    assert!(load(&[SECRET, ("LOG_LEVEL", "loud")]).is_err());
    assert!(load(&[SECRET, ("LOG_FORMAT", "xml")]).is_err());
    assert!(load(&[SECRET, ("BODY_SIZE_LIMIT_BYTES", "0")]).is_err());
}

#[test]
fn test_error_message_redacts_database_password() {
    let err = load(&[SECRET, ("DATABASE_URL", "postgres://app:hunter2@db:notaport/x")]).unwrap_err();
    assert!(!err.to_string().contains("hunter2"));
}

#[test]
fn test_debug_redacts_credentials() {
    let config = load(&[SECRET, ("DATABASE_URL", "postgres://app:hunter2@db/calendar")]).unwrap();
    let debug_str = format!("{:?}", config);

    assert!(!debug_str.contains("hunter2"));
    assert!(!debug_str.contains(SECRET.1));
    assert!(debug_str.contains("REDACTED"));
}

#[test]
fn test_test_config_is_valid() {
    let config = Config::test_config();
    assert!(config.jwt_secret.len() >= MIN_SECRET_LEN);
    assert!(config.database_url.is_none());
}
