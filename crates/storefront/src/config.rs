//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPFRONT_API_URL` - Base URL of the storefront JSON API
//!
//! ## Optional
//! - `SHOPFRONT_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `SHOPFRONT_STORAGE_PATH` - Token/preference file (default: .shopfront/storage.json)
//! - `SHOPFRONT_POPUP_REQUIRE_CLICK` - Gate popup dismissal on the affiliate click (default: false)
//! - `SHOPFRONT_POPUP_AFFILIATE_URL` - Affiliate link (required when click gating is on)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::http::ensure_trailing_slash;
use crate::popup::PopupConfig;

const DEFAULT_TIMEOUT_SECS: &str = "10";
const DEFAULT_STORAGE_PATH: &str = ".shopfront/storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// API base URL, always ending in `/`
    pub api_url: Url,
    /// Blanket per-request timeout
    pub timeout: Duration,
    /// Where the file storage backend keeps its JSON map
    pub storage_path: PathBuf,
    /// Daily popup behavior
    pub popup: PopupConfig,
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
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let api_url = env.url("SHOPFRONT_API_URL")?.ok_or_else(|| {
            ConfigError::MissingEnvVar("SHOPFRONT_API_URL".to_string())
        })?;

        let timeout_secs = env
            .or_default("SHOPFRONT_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPFRONT_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPFRONT_TIMEOUT_SECS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let storage_path =
            PathBuf::from(env.or_default("SHOPFRONT_STORAGE_PATH", DEFAULT_STORAGE_PATH));
        let popup = Self::popup_config(&env)?;

        Ok(Self {
            api_url: ensure_trailing_slash(api_url),
            timeout: Duration::from_secs(timeout_secs),
            storage_path,
            popup,
        })
    }

    fn popup_config<F>(env: &Env<F>) -> Result<PopupConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require_affiliate_click = env.flag("SHOPFRONT_POPUP_REQUIRE_CLICK")?;
        let affiliate_url = env.url("SHOPFRONT_POPUP_AFFILIATE_URL")?;

        if require_affiliate_click && affiliate_url.is_none() {
            return Err(ConfigError::MissingEnvVar(
                "SHOPFRONT_POPUP_AFFILIATE_URL".to_string(),
            ));
        }

        Ok(PopupConfig {
            require_affiliate_click,
            affiliate_url,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable, treating blank as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn url(&self, key: &str) -> Result<Option<Url>, ConfigError> {
        self.optional(key)
            .map(|raw| {
                Url::parse(raw.trim())
                    .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
            })
            .transpose()
    }

    fn flag(&self, key: &str) -> Result<bool, ConfigError> {
        match self.optional(key).map(|v| v.trim().to_ascii_lowercase()) {
            None => Ok(false),
            Some(v) => match v.as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidEnvVar(
                    key.to_string(),
                    format!("expected a boolean, got {v}"),
                )),
            },
        }
    }
}
