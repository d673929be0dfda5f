//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `COMMERCE_API_URL` - Base URL of the commerce backend (auth, users, orders)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_STATE_DIR` - Directory for persisted shopper state (default: ./state)
//! - `CATALOG_URL` - Remote catalog base URL (takes precedence over the file)
//! - `CATALOG_FILE` - Local catalog JSON file (default: data/products.json)
//! - `TOAST_DURATION_MS` - Notification display duration (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default notification display duration in milliseconds.
const DEFAULT_TOAST_DURATION_MS: u64 = 3000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where the product catalog is loaded from.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    /// A local JSON file shipped with the deployment.
    File(PathBuf),
    /// A remote catalog service, fetched in the background after startup.
    Remote(Url),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the persisted shopper state (cart, wishlist, theme)
    pub state_dir: PathBuf,
    /// Base URL of the commerce backend
    pub commerce_api_url: Url,
    /// Product catalog source
    pub catalog: CatalogSource,
    /// How long a notification stays visible before auto-dismissal
    pub toast_duration: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let state_dir = PathBuf::from(get_env_or_default("STOREFRONT_STATE_DIR", "./state"));

        let commerce_api_url = Url::parse(&get_required_env("COMMERCE_API_URL")?)
            .map_err(|e| ConfigError::InvalidEnvVar("COMMERCE_API_URL".to_string(), e.to_string()))?;

        let catalog = catalog_source(
            get_optional_env("CATALOG_URL"),
            get_env_or_default("CATALOG_FILE", "data/products.json"),
        )?;

        let toast_ms = match get_optional_env("TOAST_DURATION_MS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("TOAST_DURATION_MS".to_string(), e.to_string())
            })?,
            None => DEFAULT_TOAST_DURATION_MS,
        };

        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            state_dir,
            commerce_api_url,
            catalog,
            toast_duration: Duration::from_millis(toast_ms),
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Resolve the catalog source; a remote URL wins over the file fallback.
fn catalog_source(url: Option<String>, file: String) -> Result<CatalogSource, ConfigError> {
    match url {
        Some(raw) => {
            let parsed = Url::parse(&raw).map_err(|e| {
                ConfigError::InvalidEnvVar("CATALOG_URL".to_string(), e.to_string())
            })?;
            Ok(CatalogSource::Remote(parsed))
        }
        None => Ok(CatalogSource::File(PathBuf::from(file))),
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
