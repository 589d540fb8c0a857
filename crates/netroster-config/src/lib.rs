//! Configuration for netroster.
//!
//! A TOML file plus `NETROSTER_`-prefixed environment overrides, translated
//! into `netroster_core::CacheConfig` and `netroster_scan::ScanConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use netroster_core::CacheConfig;
use netroster_scan::ScanConfig;

/// Environment variable prefix. Nested keys are separated by `__`,
/// e.g. `NETROSTER_SCAN__TIMEOUT_SECS`.
pub const ENV_PREFIX: &str = "NETROSTER_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanSection,
    pub store: StoreSection,
}

/// `[scan]`: discovery and cache timing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanSection {
    /// Scanner executable.
    pub command: String,

    /// Interface to sweep; arp-scan picks one when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,

    /// Appended after `--localnet`.
    pub extra_args: Vec<String>,

    /// Hard limit on one sweep.
    pub timeout_secs: u64,

    /// Age after which a read triggers a full scan.
    pub cache_ttl_secs: u64,

    /// Background scan period; 0 disables it.
    pub auto_refresh_secs: u64,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            command: "arp-scan".into(),
            interface: None,
            extra_args: Vec::new(),
            timeout_secs: 30,
            cache_ttl_secs: 300,
            auto_refresh_secs: 0,
        }
    }
}

/// `[store]`: where favorites live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Config {
    /// Cache timing, validated.
    pub fn to_cache_config(&self) -> Result<CacheConfig, ConfigError> {
        if self.scan.timeout_secs == 0 {
            return Err(ConfigError::Validation {
                field: "scan.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }

        let refresh = self.scan.auto_refresh_secs;
        Ok(CacheConfig {
            scan_timeout: Duration::from_secs(self.scan.timeout_secs),
            view_ttl: Duration::from_secs(self.scan.cache_ttl_secs),
            auto_refresh: (refresh > 0).then(|| Duration::from_secs(refresh)),
        })
    }

    /// How to invoke the scanner.
    pub fn scan_config(&self) -> Result<ScanConfig, ConfigError> {
        let command = self.scan.command.trim();
        if command.is_empty() {
            return Err(ConfigError::Validation {
                field: "scan.command".into(),
                reason: "must not be empty".into(),
            });
        }

        let mut args = ScanConfig::default().args;
        args.extend(self.scan.extra_args.iter().cloned());
        Ok(ScanConfig {
            command: command.to_owned(),
            args,
            interface: self.scan.interface.clone().filter(|i| !i.trim().is_empty()),
        })
    }

    /// Configured favorites database, or the platform data directory.
    pub fn store_path(&self) -> PathBuf {
        self.store.path.clone().unwrap_or_else(default_store_path)
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "netroster", "netroster")
}

fn home_fallback(sub: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(sub);
    p.push("netroster");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default favorites database location.
pub fn default_store_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".local/share").join("favorites.db"),
        |dirs| dirs.data_dir().join("favorites.db"),
    )
}

// ── Loading / saving ────────────────────────────────────────────────

/// Load config from defaults, then `path` (if it exists), then the
/// environment.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Serialize config to TOML at `path`, creating parent directories.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
