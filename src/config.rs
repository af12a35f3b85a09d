// Configuration management

use crate::core::errors::ServiceError;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
///
/// All configuration is validated on load with clear error messages.
#[derive(Clone)]
pub struct Config {
    // Server configuration
    pub bind_address: String,
    pub port: u16,

    // Storage configuration; in-memory store when unset
    pub database_url: Option<String>,

    // Token signing secret
    pub jwt_secret: String,

    // Static assets and browser access
    pub static_dir: PathBuf,
    pub cors_allowed_origin: String,

    // Middleware configuration
    pub request_timeout_secs: u64,
    pub body_size_limit_bytes: usize,

    // Logging configuration
    pub log_level: String,
    pub log_format: String, // "json" or "text"
}

/// Minimum accepted length of `JWT_SECRET` in bytes
pub const MIN_SECRET_LEN: usize = 16;

impl Config {
    /// Load configuration from environment variables
    ///
    /// Supports `.env` file loading in development (via dotenv crate).
    pub fn from_env() -> Result<Self, ServiceError> {
        // Load .env file if present (development)
        #[cfg(not(test))]
        {
            dotenv::dotenv().ok();
        }

        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the
    /// process environment.
    pub fn from_source<F>(source: F) -> Result<Self, ServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            bind_address: get_or_default(&source, "BIND_ADDRESS", "0.0.0.0"),
            port: parse_port(&source)?,
            database_url: get_optional(&source, "DATABASE_URL"),
            jwt_secret: get_required(&source, "JWT_SECRET")?,
            static_dir: PathBuf::from(get_or_default(&source, "STATIC_DIR", "public")),
            cors_allowed_origin: get_or_default(
                &source,
                "CORS_ALLOWED_ORIGIN",
                "http://localhost:3001",
            ),
            request_timeout_secs: parse_positive(&source, "REQUEST_TIMEOUT_SECS", 30)?,
            body_size_limit_bytes: parse_positive(&source, "BODY_SIZE_LIMIT_BYTES", 1024 * 1024)?,
            log_level: get_or_default(&source, "LOG_LEVEL", "info"),
            log_format: get_or_default(&source, "LOG_FORMAT", "json"),
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate all configuration values
    fn validate(&self) -> Result<(), ServiceError> {
        if self.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ServiceError::ConfigurationError(format!(
                "JWT_SECRET must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }

        if let Some(ref url) = self.database_url {
            validate_url(url, "DATABASE_URL")?;
        }
        validate_url(&self.cors_allowed_origin, "CORS_ALLOWED_ORIGIN")?;

        validate_log_level(&self.log_level)?;
        validate_log_format(&self.log_format)?;

        Ok(())
    }

    /// Create a test configuration
    ///
    /// Bypasses environment loading; uses the in-memory store.
    pub fn test_config() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 3000,
            database_url: None,
            jwt_secret: "test-secret-please-change-me".to_string(),
            static_dir: PathBuf::from("public"),
            cors_allowed_origin: "http://localhost:3001".to_string(),
            request_timeout_secs: 30,
            body_size_limit_bytes: 1024 * 1024,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_deref().map(redact_url))
            .field("jwt_secret", &"<REDACTED>")
            .field("static_dir", &self.static_dir)
            .field("cors_allowed_origin", &self.cors_allowed_origin)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("body_size_limit_bytes", &self.body_size_limit_bytes)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish()
    }
}

fn get_or_default<F>(source: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    source(key)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn get_optional<F>(source: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    source(key).filter(|v| !v.is_empty())
}

fn get_required<F>(source: &F, key: &str) -> Result<String, ServiceError>
where
    F: Fn(&str) -> Option<String>,
{
    match source(key) {
        Some(value) if !value.is_empty() => Ok(value),
        Some(_) => Err(ServiceError::ConfigurationError(format!("{} is empty", key))),
        None => Err(ServiceError::ConfigurationError(format!("{} not set", key))),
    }
}

fn parse_port<F>(source: &F) -> Result<u16, ServiceError>
where
    F: Fn(&str) -> Option<String>,
{
    let port_str = get_or_default(source, "PORT", "3000");
    let port = port_str.parse::<u16>().map_err(|e| {
        ServiceError::ConfigurationError(format!("Invalid PORT value '{}': {}", port_str, e))
    })?;

    if port == 0 {
        return Err(ServiceError::ConfigurationError(
            "PORT must be between 1 and 65535".to_string(),
        ));
    }

    Ok(port)
}

/// Parse a strictly positive number or return the default
fn parse_positive<F, T>(source: &F, key: &str, default: T) -> Result<T, ServiceError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + PartialEq + Default,
    T::Err: fmt::Display,
{
    let Some(value) = get_optional(source, key) else {
        return Ok(default);
    };

    let parsed = value.parse::<T>().map_err(|e| {
        ServiceError::ConfigurationError(format!("Invalid {} value '{}': {}", key, value, e))
    })?;

    if parsed == T::default() {
        return Err(ServiceError::ConfigurationError(format!(
            "{} must be greater than 0",
            key
        )));
    }

    Ok(parsed)
}

fn validate_url(url: &str, description: &str) -> Result<(), ServiceError> {
    url::Url::parse(url).map_err(|e| {
        ServiceError::ConfigurationError(format!("Invalid {} '{}': {}", description, redact_url(url), e))
    })?;
    Ok(())
}

fn validate_log_level(level: &str) -> Result<(), ServiceError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&level.to_lowercase().as_str()) {
        return Err(ServiceError::ConfigurationError(format!(
            "Invalid LOG_LEVEL '{}': must be one of {}",
            level,
            valid_levels.join(", ")
        )));
    }
    Ok(())
}

fn validate_log_format(format: &str) -> Result<(), ServiceError> {
    if format != "json" && format != "text" {
        return Err(ServiceError::ConfigurationError(format!(
            "Invalid LOG_FORMAT '{}': must be 'json' or 'text'",
            format
        )));
    }
    Ok(())
}

/// Hide the password component of a connection URL
fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) if parsed.password().is_some() => {
            let _ = parsed.set_password(Some("***"));
            parsed.to_string()
        }
        Ok(parsed) => parsed.to_string(),
        Err(_) => "<unparseable>".to_string(),
    }
}
