//! Shared configuration for the netsim CLI.
//!
//! TOML lab profiles, defaults merged with `NETSIM_` environment
//! variables, translation to `netsim_core::SessionConfig`, and topology
//! file I/O. The CLI adds `GlobalOpts`-aware wrappers on top.

mod topology;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use netsim_core::SessionConfig;

pub use topology::{TopologyFormat, load_topology, save_topology};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no lab named '{name}' in the config file")]
    UnknownLab { name: String },

    #[error("no lab selected and no default_lab configured")]
    NoLab,

    #[error("unsupported topology file extension: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to read topology {path}: {reason}")]
    TopologyParse { path: PathBuf, reason: String },

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
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Lab used when `--lab` is not given.
    pub default_lab: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named labs, each pointing at a topology file.
    #[serde(default)]
    pub labs: BTreeMap<String, Lab>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_lab: None,
            defaults: Defaults::default(),
            labs: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Humantime duration, e.g. `"3s"` or `"500ms"`.
    #[serde(default = "default_boot_delay")]
    pub boot_delay: String,

    #[serde(default = "default_hints")]
    pub hints: bool,

    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            boot_delay: default_boot_delay(),
            hints: default_hints(),
            history_limit: default_history_limit(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_boot_delay() -> String {
    "3s".into()
}
fn default_hints() -> bool {
    true
}
fn default_history_limit() -> usize {
    256
}

/// A named lab.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Lab {
    /// Topology document (`.json`, `.yaml` or `.yml`).
    pub topology: PathBuf,

    /// Override the reload delay for this lab.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boot_delay: Option<String>,

    /// Override advisory hints for this lab.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hints: Option<bool>,
}

impl Config {
    /// Pick a lab: the explicit name, else `default_lab`.
    pub fn resolve_lab<'a>(&'a self, name: Option<&'a str>) -> Result<(&'a str, &'a Lab), ConfigError> {
        let name = name.or(self.default_lab.as_deref()).ok_or(ConfigError::NoLab)?;
        self.labs
            .get(name)
            .map(|lab| (name, lab))
            .ok_or_else(|| ConfigError::UnknownLab { name: name.into() })
    }

    /// Interpreter tunables for `lab` (or the global defaults).
    pub fn session_config(&self, lab: Option<&Lab>) -> Result<SessionConfig, ConfigError> {
        let delay_text = lab
            .and_then(|l| l.boot_delay.as_deref())
            .unwrap_or(&self.defaults.boot_delay);
        Ok(SessionConfig {
            boot_delay: parse_duration("boot_delay", delay_text)?,
            hints_enabled: lab.and_then(|l| l.hints).unwrap_or(self.defaults.hints),
            history_limit: self.defaults.history_limit,
        })
    }
}

/// Parse a humantime duration, naming the offending field on failure.
pub fn parse_duration(field: &str, text: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(text.trim()).map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("'{text}': {e}"),
    })
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "netsim", "netsim").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("netsim");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields the defaults.
///
/// Environment overrides use `__` as the nesting separator so keys with
/// underscores survive: `NETSIM_DEFAULTS__BOOT_DELAY=1s`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NETSIM_").split("__"));

    let config: Config = figment.extract()?;
    tracing::debug!(path = %path.display(), labs = config.labs.len(), "config loaded");
    Ok(config)
}

/// Load config, returning a default if the file is missing or broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
