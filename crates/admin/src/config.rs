//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//! - `FRONTEND_STORE_URL` - Public storefront URL; checkout returns shoppers here
//! - `AUTH_SECRET_KEY` - Auth provider backend secret key (verifies session tokens)
//! - `STRIPE_SECRET_KEY` - Stripe secret API key
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `AUTH_API_URL` - Auth provider backend API (default: <https://api.clerk.com/v1>)
//! - `STRIPE_API_URL` - Stripe API base (default: <https://api.stripe.com/v1>)
//! - `DATABASE_MAX_CONNECTIONS` - Pool size (default: 10)
//! - `DATABASE_ACQUIRE_TIMEOUT_SECS` - Seconds to wait for a pooled connection (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_AUTH_API_URL: &str = "https://api.clerk.com/v1";
const DEFAULT_STRIPE_API_URL: &str = "https://api.stripe.com/v1";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Output format of the server log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// Maximum pooled database connections
    pub database_max_connections: u32,
    /// How long a request waits for a pooled connection
    pub database_acquire_timeout: Duration,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public storefront URL (checkout success/cancel pages live here)
    pub frontend_store_url: Url,
    /// Auth provider configuration
    pub auth: AuthConfig,
    /// Stripe configuration
    pub stripe: StripeConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// Log output format
    pub log_format: LogFormat,
}

/// Auth provider backend configuration.
///
/// Implements `Debug` manually to redact the secret key.
#[derive(Clone)]
pub struct AuthConfig {
    /// Backend API base URL
    pub api_url: Url,
    /// Instance secret key
    pub secret_key: SecretString,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_url", &self.api_url.as_str())
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Stripe API configuration.
///
/// Implements `Debug` manually to redact the secret key.
#[derive(Clone)]
pub struct StripeConfig {
    /// API base URL
    pub api_url: Url,
    /// Secret API key (sk_live_... / sk_test_...)
    pub secret_key: SecretString,
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("api_url", &self.api_url.as_str())
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("ADMIN_DATABASE_URL")?;
        let database_max_connections = get_optional_env("DATABASE_MAX_CONNECTIONS")
            .map(|v| {
                v.parse::<u32>().map_err(|e| {
                    ConfigError::InvalidEnvVar("DATABASE_MAX_CONNECTIONS".to_string(), e.to_string())
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        let database_acquire_timeout =
            parse_acquire_timeout(get_optional_env("DATABASE_ACQUIRE_TIMEOUT_SECS").as_deref())?;
        let host = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;
        let frontend_store_url = parse_url("FRONTEND_STORE_URL", &get_required_env("FRONTEND_STORE_URL")?)?;

        let auth = AuthConfig::from_env()?;
        let stripe = StripeConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let log_format = LogFormat::parse(get_optional_env("LOG_FORMAT").as_deref());

        Ok(Self {
            database_url,
            database_max_connections,
            database_acquire_timeout,
            host,
            port,
            frontend_store_url,
            auth,
            stripe,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
            log_format,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_url(
                "AUTH_API_URL",
                &get_env_or_default("AUTH_API_URL", DEFAULT_AUTH_API_URL),
            )?,
            secret_key: get_validated_secret("AUTH_SECRET_KEY")?,
        })
    }
}

impl StripeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_url(
                "STRIPE_API_URL",
                &get_env_or_default("STRIPE_API_URL", DEFAULT_STRIPE_API_URL),
            )?,
            secret_key: get_validated_secret("STRIPE_SECRET_KEY")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an absolute URL, reporting the variable name on failure.
/// Whole seconds, at least one. Unset means the default.
fn parse_acquire_timeout(value: Option<&str>) -> Result<Duration, ConfigError> {
    let Some(value) = value else {
        return Ok(Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS));
    };
    let invalid = |reason: String| {
        ConfigError::InvalidEnvVar("DATABASE_ACQUIRE_TIMEOUT_SECS".to_string(), reason)
    };
    match value.trim().parse::<u64>() {
        Ok(0) => Err(invalid("must be at least 1 second".to_string())),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(invalid(e.to_string())),
    }
}

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real API keys are random strings with high entropy
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by the provider."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_config() -> AdminConfig {
        AdminConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            database_acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            frontend_store_url: Url::parse("http://localhost:3000").unwrap(),
            auth: AuthConfig {
                api_url: Url::parse(DEFAULT_AUTH_API_URL).unwrap(),
                secret_key: SecretString::from("sk_test_auth_key_value"),
            },
            stripe: StripeConfig {
                api_url: Url::parse(DEFAULT_STRIPE_API_URL).unwrap(),
                secret_key: SecretString::from("sk_test_stripe_key_value"),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
            log_format: LogFormat::Text,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-stripe-key-here", "STRIPE_SECRET_KEY");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("sk_test_aaaaaaaaaaaaaaaaaaaaaaaa", "STRIPE_SECRET_KEY");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_stripe_style_key() {
        let result = validate_secret_strength(
            "sk_test_51HqLyjWDarjtT1zdp7dcXmtBvS4yqk9G8aBd",
            "STRIPE_SECRET_KEY",
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some("JSON")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some("pretty")), LogFormat::Text);
        assert_eq!(LogFormat::parse(None), LogFormat::Text);
    }

    #[test]
    fn test_parse_url_reports_variable() {
        let err = parse_url("FRONTEND_STORE_URL", "not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "FRONTEND_STORE_URL"));
    }

    #[test]
    fn test_acquire_timeout_parse() {
        assert_eq!(parse_acquire_timeout(None).unwrap(), Duration::from_secs(10));
        assert_eq!(parse_acquire_timeout(Some("30")).unwrap(), Duration::from_secs(30));
        assert!(matches!(
            parse_acquire_timeout(Some("0")),
            Err(ConfigError::InvalidEnvVar(ref key, _)) if key == "DATABASE_ACQUIRE_TIMEOUT_SECS"
        ));
        assert!(parse_acquire_timeout(Some("soon")).is_err());
    }

    #[test]
    fn test_socket_addr() {
        let addr = sample_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3001);
    }

    #[test]
    fn test_config_debug_redacts_secrets() {
        let debug_output = format!("{:?}", sample_config());

        assert!(debug_output.contains("api.stripe.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("sk_test_auth_key_value"));
        assert!(!debug_output.contains("sk_test_stripe_key_value"));
    }
}
