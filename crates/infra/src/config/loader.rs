//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `CINELOG_API_URL` is not set, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `CINELOG_API_URL`: Base URL of the movie API (required)
//! - `CINELOG_API_TIMEOUT`: Per-request timeout in seconds
//! - `CINELOG_REFRESH_TIMEOUT`: Refresh call timeout in seconds
//! - `CINELOG_MAX_ATTEMPTS`: Attempts for idempotent requests
//! - `CINELOG_COOKIE_JAR`: Path of the persisted cookie jar
//! - `CINELOG_MOVIES_PER_PAGE`: Page size of the movie list
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./cinelog.json` or `./cinelog.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use cinelog_domain::constants::{
    DEFAULT_API_TIMEOUT_SECS, DEFAULT_MAX_ATTEMPTS, DEFAULT_MOVIES_PER_PAGE,
    DEFAULT_REFRESH_TIMEOUT_SECS,
};
use cinelog_domain::{ApiConfig, CinelogError, Config, Result, SessionConfig};

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `CinelogError::Config` if configuration cannot be loaded from
/// either source or a value is malformed. Once `CINELOG_API_URL` is set, env
/// errors are returned as-is and no file is consulted.
pub fn load() -> Result<Config> {
    if std::env::var_os("CINELOG_API_URL").is_none() {
        tracing::debug!("CINELOG_API_URL not set, trying file");
        return load_from_file(None);
    }

    let config = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from environment variables
///
/// Only `CINELOG_API_URL` is required; everything else has a default.
///
/// # Errors
/// Returns `CinelogError::Config` if the base URL is missing or a numeric
/// variable does not parse.
pub fn load_from_env() -> Result<Config> {
    let base_url = env_var("CINELOG_API_URL")?;
    let defaults = SessionConfig::default();

    let config = Config {
        api: ApiConfig {
            base_url,
            timeout_secs: env_parse("CINELOG_API_TIMEOUT", DEFAULT_API_TIMEOUT_SECS)?,
            refresh_timeout_secs: env_parse(
                "CINELOG_REFRESH_TIMEOUT",
                DEFAULT_REFRESH_TIMEOUT_SECS,
            )?,
            max_attempts: env_parse("CINELOG_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?,
        },
        session: SessionConfig {
            cookie_jar_path: std::env::var("CINELOG_COOKIE_JAR")
                .unwrap_or(defaults.cookie_jar_path),
            movies_per_page: env_parse("CINELOG_MOVIES_PER_PAGE", DEFAULT_MOVIES_PER_PAGE)?,
        },
    };

    validate(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
///
/// # Errors
/// Returns `CinelogError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CinelogError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CinelogError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CinelogError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path).and_then(validate)
}

/// Parse configuration from string content, by file extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CinelogError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CinelogError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(CinelogError::Config(format!("Unsupported config format: {}", extension))),
    }
}

fn validate(config: Config) -> Result<Config> {
    url::Url::parse(&config.api.base_url).map_err(|e| {
        CinelogError::Config(format!("Invalid API base URL '{}': {}", config.api.base_url, e))
    })?;
    if config.api.timeout_secs == 0 {
        return Err(CinelogError::Config("timeout_secs must be at least 1".to_string()));
    }
    if config.api.refresh_timeout_secs == 0 {
        return Err(CinelogError::Config("refresh_timeout_secs must be at least 1".to_string()));
    }
    if config.session.movies_per_page == 0 {
        return Err(CinelogError::Config("movies_per_page must be at least 1".to_string()));
    }
    Ok(config)
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 6] = [
        "config.json",
        "config.toml",
        "cinelog.json",
        "cinelog.toml",
        "../config.json",
        "../config.toml",
    ];

    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        CinelogError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional environment variable, using `default` when unset.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| CinelogError::Config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
pub fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
