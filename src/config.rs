//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. Built-in defaults
//! 2. User config: `~/.config/unit-passport/config.toml` (XDG) or platform config dir
//! 3. Project config: `.unit-passport.toml`
//! 4. Environment variables: `UNIT_PASSPORT_*` (`__` separates nested keys)
//!
//! ```toml
//! [passport]
//! directory = "unit-passports"
//! file_prefix = "unit-passport"
//! ipfs_gateway = "https://gateway.ipfs.io/ipfs/"
//! ```
//!
//! The defaults match the layout downstream readers expect; overriding them
//! is mostly useful for tests and staging hosts.

use std::ops::Deref;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Directory passports are written to.
pub const DEFAULT_PASSPORT_DIR: &str = "unit-passports";

/// Filename prefix, followed by `-<uuid>.yaml`.
pub const DEFAULT_FILE_PREFIX: &str = "unit-passport";

/// Gateway prefixed to every video content identifier.
pub const DEFAULT_IPFS_GATEWAY: &str = "https://gateway.ipfs.io/ipfs/";

/// Extension of the serialized passport format.
pub const PASSPORT_EXTENSION: &str = "yaml";

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub passport: PassportConfig,
}

/// Passport output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassportConfig {
    /// Destination directory, created on first write.
    pub directory: PathBuf,
    /// Filename prefix before the unit uuid.
    pub file_prefix: String,
    /// URL prefix for video content identifiers.
    pub ipfs_gateway: String,
}

impl Default for PassportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_PASSPORT_DIR),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            ipfs_gateway: DEFAULT_IPFS_GATEWAY.to_string(),
        }
    }
}

impl PassportConfig {
    /// Passport configuration writing into `directory` with default naming.
    pub fn in_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    /// Returns the passport path for a unit: `<directory>/<prefix>-<uuid>.yaml`.
    ///
    /// The uuid becomes part of a single file name, so uuids containing a
    /// path separator or NUL are rejected with [`AppError::InvalidUuid`];
    /// the result always lies directly inside `directory`.
    pub fn passport_path(&self, uuid: &str) -> Result<PathBuf, AppError> {
        if uuid.contains(['/', '\\', '\0']) {
            return Err(AppError::InvalidUuid(uuid.to_string()));
        }
        Ok(self.directory.join(format!(
            "{}-{}.{}",
            self.file_prefix, uuid, PASSPORT_EXTENSION
        )))
    }

    /// Returns the retrieval URL for a video content identifier.
    pub fn video_url(&self, cid: &str) -> String {
        format!("{}/{}", self.ipfs_gateway.trim_end_matches('/'), cid)
    }
}

impl Config {
    /// Load config with layered resolution (defaults → user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment(Self::user_config_path(), Path::new(".unit-passport.toml"))
            .extract()
            .map_err(ConfigError::from)
    }

    fn figment(user_config: PathBuf, project_config: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            // Layer 1: User config
            .merge(Toml::file(user_config))
            // Layer 2: Project config
            .merge(Toml::file(project_config))
            // Layer 3: Environment variables (highest priority)
            .merge(Env::prefixed("UNIT_PASSPORT_").split("__"))
    }

    /// User config path: ~/.config/unit-passport/config.toml (XDG) or platform config dir.
    fn user_config_path() -> PathBuf {
        // Prefer XDG config location (~/.config) on all platforms
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home
                .join(".config")
                .join("unit-passport")
                .join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        // Fall back to platform-specific config dir
        dirs::config_dir()
            .map(|p| p.join("unit-passport").join("config.toml"))
            .unwrap_or_default()
    }
}
