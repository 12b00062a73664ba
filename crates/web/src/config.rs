//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults run a self-contained demo.
//!
//! - `WAKALNI_HOST` - Bind address (default: 127.0.0.1)
//! - `WAKALNI_PORT` - Listen port (default: 3000)
//! - `WAKALNI_BASE_URL` - Public URL (default: <http://127.0.0.1:3000>)
//! - `WAKALNI_USER_API_URL` - External user backend; unset means simulated sign-in
//! - `WAKALNI_USER_API_KEY` - Optional bearer key for the user backend
//! - `WAKALNI_DATA_DIR` - Directory of fixture overrides (`restaurants.json`, ...)
//! - `WAKALNI_ENFORCE_ROLE_ROUTES` - Turn the role guard on (default: false)
//! - `WAKALNI_SIMULATED_LATENCY_MS` - Delay of simulated network calls (default: 800)
//! - `WAKALNI_ADMIN_RESTAURANT_ID` - Restaurant shown in the admin dashboard (default: 1)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use wakalni_core::RestaurantId;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct WakalniConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// External user backend; `None` signs users in with a mock identity
    pub user_api: Option<UserApiConfig>,
    /// Directory holding fixture overrides
    pub data_dir: Option<PathBuf>,
    /// Whether the role guard redirects visitors away from other roles' areas
    pub enforce_role_routes: bool,
    /// Delay applied to simulated network calls
    pub simulated_latency: Duration,
    /// Restaurant the admin dashboard manages
    pub admin_restaurant_id: RestaurantId,
    /// Sentry error tracking
    pub sentry: SentryConfig,
}

/// External user backend configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct UserApiConfig {
    /// Base URL, e.g. `https://api.wakalni.dz`
    pub base_url: Url,
    /// Optional bearer key sent with every call
    pub api_key: Option<SecretString>,
}

impl std::fmt::Debug for UserApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Sentry configuration.
#[derive(Debug, Clone, Default)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl Default for WakalniConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://127.0.0.1:3000".to_string(),
            user_api: None,
            data_dir: None,
            enforce_role_routes: false,
            simulated_latency: Duration::from_millis(800),
            admin_restaurant_id: RestaurantId::new("1"),
            sentry: SentryConfig {
                sample_rate: 1.0,
                ..SentryConfig::default()
            },
        }
    }
}

impl WakalniConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable cannot be parsed or the user API
    /// key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let host = parse_env("WAKALNI_HOST", defaults.host)?;
        let port = parse_env("WAKALNI_PORT", defaults.port)?;
        let base_url = get_env_or_default("WAKALNI_BASE_URL", &defaults.base_url);
        Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("WAKALNI_BASE_URL".to_string(), e.to_string()))?;

        let user_api = UserApiConfig::from_env()?;
        let data_dir = get_optional_env("WAKALNI_DATA_DIR").map(PathBuf::from);
        let enforce_role_routes = parse_env("WAKALNI_ENFORCE_ROLE_ROUTES", false)?;
        let latency_ms: u64 = parse_env("WAKALNI_SIMULATED_LATENCY_MS", 800)?;
        let admin_restaurant_id = RestaurantId::new(get_env_or_default(
            "WAKALNI_ADMIN_RESTAURANT_ID",
            defaults.admin_restaurant_id.as_str(),
        ));

        let sentry = SentryConfig {
            dsn: get_optional_env("SENTRY_DSN"),
            environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sample_rate: parse_env("SENTRY_SAMPLE_RATE", 1.0)?,
            traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        };

        Ok(Self {
            host,
            port,
            base_url,
            user_api,
            data_dir,
            enforce_role_routes,
            simulated_latency: Duration::from_millis(latency_ms),
            admin_restaurant_id,
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl UserApiConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(raw) = get_optional_env("WAKALNI_USER_API_URL") else {
            return Ok(None);
        };
        let base_url = Url::parse(&raw).map_err(|e| {
            ConfigError::InvalidEnvVar("WAKALNI_USER_API_URL".to_string(), e.to_string())
        })?;
        let api_key = get_optional_env("WAKALNI_USER_API_KEY")
            .map(|key| {
                validate_secret_strength(&key, "WAKALNI_USER_API_KEY")?;
                Ok(SecretString::from(key))
            })
            .transpose()?;
        Ok(Some(Self { base_url, api_key }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable; blank values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
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
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Reject placeholder values and low-entropy keys.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
        assert!(shannon_entropy("aB3$xY9!mK2@nL5#") > 3.3);
    }

    #[test]
    fn test_validate_secret_strength() {
        assert!(matches!(
            validate_secret_strength("your-api-key-here", "TEST_VAR"),
            Err(ConfigError::InsecureSecret(_, _))
        ));
        assert!(validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR").is_err());
        assert!(validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = WakalniConfig::default();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.simulated_latency, Duration::from_millis(800));
        assert_eq!(config.admin_restaurant_id.as_str(), "1");
        assert!(!config.enforce_role_routes);
        assert!(!config.is_secure());
    }

    #[test]
    fn test_user_api_debug_redacts_key() {
        let config = UserApiConfig {
            base_url: Url::parse("https://api.wakalni.dz").unwrap(),
            api_key: Some(SecretString::from("k9$Qz!7vL2#pX8&m")),
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("api.wakalni.dz"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("k9$Qz!7vL2#pX8&m"));
    }
}
