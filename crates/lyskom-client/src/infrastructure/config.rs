//! TOML-based configuration for the command-line client.
//!
//! The config file is looked up at:
//! - the path given as the first command-line argument, if any;
//! - otherwise `config.toml` in the platform config directory:
//!   - Windows: `%APPDATA%\lyskom\config.toml`
//!   - Linux:   `$XDG_CONFIG_HOME/lyskom/config.toml` or `~/.config/lyskom/config.toml`
//!   - macOS:   `~/Library/Application Support/lyskom/config.toml`
//!
//! A missing file is not an error; every field has a default, and the
//! binary writes those defaults out on first run.  Example:
//!
//! ```toml
//! [server]
//! host = "kom.lysator.liu.se"
//! port = 4894
//! read_timeout_secs = 300
//!
//! [client]
//! name = "lyskom-rs"
//! accept_async = ["send-message", "login", "logout"]
//! listen = true
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub client: ClientSettings,
}

/// Where to connect and how to identify.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Socket read timeout.  Absent means block forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_timeout_secs: Option<u64>,
    /// Identification sent in the handshake line.
    #[serde(default = "default_user")]
    pub user: String,
}

/// What the client does once connected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientSettings {
    /// Reported with set-client-version.
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Asynchronous message names to request with accept-async.
    #[serde(default = "default_accept_async")]
    pub accept_async: Vec<String>,
    /// Keep reading asynchronous messages after the bootstrap.
    #[serde(default)]
    pub listen: bool,
}

impl ServerConfig {
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_host() -> String {
    "kom.lysator.liu.se".to_string()
}
fn default_port() -> u16 {
    4894
}
fn default_user() -> String {
    "lyskom-rs".to_string()
}
fn default_name() -> String {
    "lyskom-rs".to_string()
}
fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_accept_async() -> Vec<String> {
    ["send-message", "login", "logout"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            read_timeout_secs: None,
            user: default_user(),
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
            log_level: default_log_level(),
            accept_async: default_accept_async(),
            listen: false,
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// The default config file path in the platform config directory.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads the config from `path`, or from [`config_file_path`] when `path`
/// is `None`.  A file that does not exist yields the defaults.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_file_path()?,
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ClientConfig::default()),
        Err(source) => Err(ConfigError::Io { path, source }),
    }
}

/// Writes `config` to `path`, creating the parent directory if needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(path: &Path, config: &ClientConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes the default config to `path` unless a file is already there.
/// Returns whether a file was written.
///
/// # Errors
///
/// As for [`save_config`].
pub fn write_default_config_if_missing(path: &Path) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }
    save_config(path, &ClientConfig::default())?;
    Ok(true)
}

/// Resolves the platform config base directory joined with `lyskom`.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("lyskom"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("lyskom"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support").join("lyskom"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
