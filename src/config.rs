//! Configuration management for the Spotify proxy.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage application
//! configuration including Spotify API credentials, server settings, and the
//! token refresh policy.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Command-line flags (highest priority, applied by the caller)
//! 2. Environment variables
//! 3. `.env` file in the working directory, then in the local data directory
//! 4. Application defaults (where applicable)

use std::{
    env,
    io::ErrorKind,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
    str::FromStr,
};

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
    #[error("cannot prepare config directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot load .env file: {0}")]
    Env(#[from] dotenv::Error),
}

/// When the session asks the accounts service for a new access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    /// Refresh before every authenticated call.
    #[default]
    Always,
    /// Refresh only when the stored token is about to expire.
    OnExpiry,
}

impl FromStr for RefreshPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(RefreshPolicy::Always),
            "expiry" | "on-expiry" => Ok(RefreshPolicy::OnExpiry),
            other => Err(format!("unknown refresh policy '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub host: IpAddr,
    pub port: u16,
    pub api_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub refresh_policy: RefreshPolicy,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if one of `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` or
    /// `SPOTIFY_REDIRECT_URI` is unset, or if `PORT`, `HOST` or
    /// `SPOTIFY_REFRESH_POLICY` cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);
        Ok(Config {
            client_id: vars.required("SPOTIFY_CLIENT_ID")?,
            client_secret: vars.required("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: vars.required("SPOTIFY_REDIRECT_URI")?,
            host: vars.parsed("HOST", DEFAULT_HOST)?,
            port: vars.parsed("PORT", &DEFAULT_PORT.to_string())?,
            api_url: vars.optional("SPOTIFY_API_URL", DEFAULT_API_URL),
            auth_url: vars.optional("SPOTIFY_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: vars.optional("SPOTIFY_TOKEN_URL", DEFAULT_TOKEN_URL),
            refresh_policy: vars.parsed("SPOTIFY_REFRESH_POLICY", "always")?,
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Loads environment variables from `.env` files.
///
/// A `.env` in the working directory is read first, then the one in the
/// platform-specific local data directory under `spotproxy/.env`. Variables
/// that are already set are never overwritten, so the real environment wins
/// over both files. Missing files are skipped.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotproxy/.env`
/// - macOS: `~/Library/Application Support/spotproxy/.env`
/// - Windows: `%LOCALAPPDATA%/spotproxy/.env`
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or if a `.env`
/// file exists but cannot be read or parsed.
pub async fn load_env() -> Result<(), ConfigError> {
    skip_missing(dotenv::dotenv().map(|_| ()))?;

    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    load_env_file(&path)
}

/// Loads one `.env` file. A file that does not exist is not an error.
pub fn load_env_file(path: &Path) -> Result<(), ConfigError> {
    skip_missing(dotenv::from_path(path))
}

fn skip_missing(result: Result<(), dotenv::Error>) -> Result<(), ConfigError> {
    match result {
        Ok(()) => Ok(()),
        Err(dotenv::Error::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ConfigError::Env(e)),
    }
}

pub fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotproxy/.env");
    path
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.get(name).ok_or(ConfigError::Missing(name))
    }

    fn optional(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T: FromStr>(&self, name: &'static str, default: &str) -> Result<T, ConfigError> {
        let value = self.optional(name, default);
        match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(_) => Err(ConfigError::Invalid { name, value }),
        }
    }
}
