//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TIENDA_API_BASE_URL` - Base URL of the remote mock REST store
//!
//! ## Optional
//! - `TIENDA_PRODUCTS_PATH` - Products collection path (default: productos)
//! - `TIENDA_USERS_PATH` - Users collection path (default: usuarios)
//! - `TIENDA_STORAGE_DIR` - Directory for persisted session/cart snapshots
//!   (default: unset; callers fall back to in-memory storage)

use std::env;
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Remote mock REST store configuration.
    pub api: MockApiConfig,
    /// Directory for persisted local-storage slots, if file persistence is wanted.
    pub storage_dir: Option<PathBuf>,
}

/// Remote mock REST store configuration.
#[derive(Debug, Clone)]
pub struct MockApiConfig {
    /// Base URL, e.g. `https://<project>.mockapi.io/`.
    pub base_url: Url,
    /// Products collection path under the base URL.
    pub products_path: String,
    /// Users collection path under the base URL.
    pub users_path: String,
}

impl MockApiConfig {
    /// Create a config with the default collection paths.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            products_path: "productos".to_owned(),
            users_path: "usuarios".to_owned(),
        }
    }

    /// Resolve a collection path against the base URL.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if the joined path is not a valid URL.
    pub fn collection_url(&self, path: &str) -> Result<Url, url::ParseError> {
        // Trailing slash so `join` appends instead of replacing the last segment
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        base.join(path)
    }
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

        let base_url = get_env("TIENDA_API_BASE_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("TIENDA_API_BASE_URL".to_owned(), e.to_string())
            })?;

        let api = MockApiConfig {
            base_url,
            products_path: get_env_or_default("TIENDA_PRODUCTS_PATH", "productos"),
            users_path: get_env_or_default("TIENDA_USERS_PATH", "usuarios"),
        };

        let storage_dir = env::var("TIENDA_STORAGE_DIR").ok().map(PathBuf::from);

        Ok(Self { api, storage_dir })
    }
}

/// Get a required environment variable.
fn get_env(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

/// Get an environment variable with a default fallback.
fn get_env_or_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_owned())
}
