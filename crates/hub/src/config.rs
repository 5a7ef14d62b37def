//! Hub configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Backend selection
//! - `HUB_STORE` - `rest` (default) or `postgres`
//!
//! ## Required for `rest`
//! - `HUB_REST_URL` - Base URL of the PostgREST-compatible service
//! - `HUB_REST_API_KEY` - Service API key (high entropy, no placeholders)
//!
//! ## Required for `postgres`
//! - `HUB_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `HUB_REST_TABLE` - Table holding the document (default: `system_data`)
//! - `HUB_DOCUMENT_KEY` - Fixed document identifier (default: `main`)
//! - `HUB_CACHE_PATH` - Local fallback file (default: `storage_hub_v1_data.json`)
//! - `HUB_REMOTE_TIMEOUT_SECS` - Timeout for each remote call (default: 10)
//! - `HUB_ZONES` - Comma-separated zone catalog (default: `A,B,C,D,E,F,G`)

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use storage_hub_core::ZoneCatalog;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_REST_TABLE: &str = "system_data";
const DEFAULT_DOCUMENT_KEY: &str = "main";
const DEFAULT_CACHE_PATH: &str = "storage_hub_v1_data.json";
const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;

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

/// Which remote store holds the system document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    Rest,
    Postgres,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rest" => Ok(Self::Rest),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(format!("expected `rest` or `postgres`, got `{other}`")),
        }
    }
}

/// Hub configuration.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Remote store settings
    pub remote: RemoteConfig,
    /// Identifier of the single system document
    pub document_key: String,
    /// Local fallback copy of the document
    pub cache_path: PathBuf,
    /// Upper bound on each remote load or save
    pub remote_timeout: Duration,
    /// Zones accepted when assigning a job
    pub zones: ZoneCatalog,
}

/// Settings for the selected remote store.
#[derive(Debug, Clone)]
pub enum RemoteConfig {
    Rest(RestConfig),
    Postgres(PostgresConfig),
}

/// PostgREST-compatible HTTP store configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct RestConfig {
    /// Service base URL (without `/rest/v1`)
    pub url: String,
    /// Service API key, sent as `apikey` and bearer token
    pub api_key: SecretString,
    /// Table with `id`, `data` and `updated_at` columns
    pub table: String,
}

impl std::fmt::Debug for RestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestConfig")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .field("table", &self.table)
            .finish()
    }
}

impl RestConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = get_required_env("HUB_REST_URL")?;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::InvalidEnvVar(
                "HUB_REST_URL".to_string(),
                "must start with http:// or https://".to_string(),
            ));
        }
        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            api_key: get_validated_secret("HUB_REST_API_KEY")?,
            table: get_env_or_default("HUB_REST_TABLE", DEFAULT_REST_TABLE),
        })
    }
}

/// `PostgreSQL` store configuration.
///
/// Implements `Debug` manually; the URL carries the password.
#[derive(Clone)]
pub struct PostgresConfig {
    /// `PostgreSQL` connection URL
    pub database_url: SecretString,
}

impl std::fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("database_url", &"[REDACTED]")
            .finish()
    }
}

impl PostgresConfig {
    /// Load the database URL from `HUB_DATABASE_URL` or `DATABASE_URL`.
    ///
    /// Used on its own by the `migrate` command, which needs a database
    /// whatever store is selected.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if neither variable is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Ok(Self {
            database_url: get_database_url("HUB_DATABASE_URL")?,
        })
    }
}

impl HubConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the REST API key fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let kind = get_optional_env("HUB_STORE")
            .map(|s| s.parse::<StoreKind>())
            .transpose()
            .map_err(|e| ConfigError::InvalidEnvVar("HUB_STORE".to_string(), e))?
            .unwrap_or_default();
        let remote = match kind {
            StoreKind::Rest => RemoteConfig::Rest(RestConfig::from_env()?),
            StoreKind::Postgres => RemoteConfig::Postgres(PostgresConfig::from_env()?),
        };

        let remote_timeout = get_env_or_default(
            "HUB_REMOTE_TIMEOUT_SECS",
            &DEFAULT_REMOTE_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("HUB_REMOTE_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        let zones = get_optional_env("HUB_ZONES")
            .map_or_else(ZoneCatalog::default, |list| ZoneCatalog::parse_list(&list));
        if zones.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "HUB_ZONES".to_string(),
                "must name at least one zone".to_string(),
            ));
        }

        Ok(Self {
            remote,
            document_key: get_env_or_default("HUB_DOCUMENT_KEY", DEFAULT_DOCUMENT_KEY),
            cache_path: PathBuf::from(get_env_or_default("HUB_CACHE_PATH", DEFAULT_CACHE_PATH)),
            remote_timeout: Duration::from_secs(remote_timeout),
            zones,
        })
    }

    /// The selected store kind.
    #[must_use]
    pub const fn store_kind(&self) -> StoreKind {
        match self.remote {
            RemoteConfig::Rest(_) => StoreKind::Rest,
            RemoteConfig::Postgres(_) => StoreKind::Postgres,
        }
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

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by the service."
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
