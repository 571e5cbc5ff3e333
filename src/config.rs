//! Process configuration read once at startup.
//!
//! Values come from the environment (after `.env` has been loaded by the
//! binary). The resulting `AppConfig` is immutable and handed to the
//! components that need it.

use std::path::PathBuf;

use anyhow::Result;
use thiserror::Error;

use crate::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Default listening port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default interface to bind.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Keys at or below this length are reported as implausible by the health check.
const MIN_PLAUSIBLE_KEY_LEN: usize = 20;

/// Invalid configuration values. These are user errors, not internal ones.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid PORT '{value}': {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("Failed to determine data directory; set DATABASE_PATH")]
    NoDataDirectory,
}

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Gemini credential; `None` leaves the AI surface unavailable.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
}

impl AppConfig {
    /// Reads configuration from environment variables.
    ///
    /// | Variable          | Default                                   |
    /// |-------------------|-------------------------------------------|
    /// | `GEMINI_API_KEY`  | unset (AI unavailable)                    |
    /// | `GEMINI_MODEL`    | `gemini-1.5-flash-latest`                 |
    /// | `GEMINI_BASE_URL` | `https://generativelanguage.googleapis.com` |
    /// | `HOST`            | `0.0.0.0`                                 |
    /// | `PORT`            | `5000`                                    |
    /// | `DATABASE_PATH`   | `{data_dir}/startup-blog/blog.db`         |
    ///
    /// An empty `GEMINI_API_KEY` counts as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is not a valid port number or the data
    /// directory cannot be determined when `DATABASE_PATH` is unset.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let port = match std::env::var("PORT") {
            Ok(port) => port
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value: port, source })?,
            Err(_) => DEFAULT_PORT,
        };

        let database_path = match std::env::var("DATABASE_PATH") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_database_path()?,
        };

        Ok(Self {
            api_key,
            model: env_or("GEMINI_MODEL", DEFAULT_MODEL),
            base_url: env_or("GEMINI_BASE_URL", DEFAULT_BASE_URL),
            host: env_or("HOST", DEFAULT_HOST),
            port,
            database_path,
        })
    }

    /// Summarizes the credential for the health endpoint without exposing it.
    pub fn api_key_status(&self) -> ApiKeyStatus {
        let length = self.api_key.as_deref().map_or(0, str::len);
        ApiKeyStatus {
            has_api_key: self.api_key.is_some(),
            has_valid_api_key: length > MIN_PLAUSIBLE_KEY_LEN,
            api_key_length: length,
        }
    }
}

/// Non-secret facts about the configured credential.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApiKeyStatus {
    pub has_api_key: bool,
    /// Longer than 20 characters; a plausibility check only.
    pub has_valid_api_key: bool,
    pub api_key_length: usize,
}

/// Gets the cross-platform database path.
///
/// Returns the path as `{data_dir}/startup-blog/blog.db` where `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
///
/// # Errors
///
/// Returns an error if the data directory cannot be determined.
pub fn default_database_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDirectory)?;

    Ok(data_dir.join("startup-blog").join("blog.db"))
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}
