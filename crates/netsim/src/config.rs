//! CLI-side configuration glue: resolves `--config`, `--lab` and
//! `--topology` into a loaded lab ready for the command handlers.
//!
//! The TOML types and loaders live in `netsim-config`; this module only
//! adds the `GlobalOpts`-aware layer on top.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use netsim_config::Config;
use netsim_core::{ConfigStore, SessionConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use netsim_config::{Lab, save_config_to, save_topology};

/// A topology loaded into a live store, plus where it came from.
pub struct LoadedLab {
    pub name: Option<String>,
    pub path: PathBuf,
    pub store: Arc<ConfigStore>,
    pub session: SessionConfig,
}

impl LoadedLab {
    /// Write the store's current state back to the topology file.
    pub fn save(&self) -> Result<(), CliError> {
        save_topology(&self.path, &self.store.to_topology())?;
        tracing::info!(path = %self.path.display(), "topology saved");
        Ok(())
    }
}

/// The config file in effect: `--config` or the platform default.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(netsim_config::config_path)
}

pub fn load_config(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(netsim_config::load_config_from(&config_path(global))?)
}

/// Resolve the topology source and load it.
///
/// `--topology` wins over any lab; without it the lab named by `--lab`
/// (or `default_lab`) must exist. Lab overrides still apply to the
/// session when both are given.
pub fn open_lab(global: &GlobalOpts) -> Result<LoadedLab, CliError> {
    let cfg = load_config(global)?;

    let lab = match global.lab.as_deref().or(cfg.default_lab.as_deref()) {
        Some(name) => match cfg.labs.get(name) {
            Some(lab) => Some((name.to_owned(), lab)),
            None if global.topology.is_some() => None,
            None => {
                return Err(CliError::LabNotFound {
                    name: name.into(),
                    available: available_labs(&cfg),
                });
            }
        },
        None => None,
    };

    let path = match (&global.topology, &lab) {
        (Some(path), _) => path.clone(),
        (None, Some((_, lab))) => lab.topology.clone(),
        (None, None) => {
            return Err(CliError::NoTopology {
                path: config_path(global).display().to_string(),
            });
        }
    };

    let session = cfg.session_config(lab.as_ref().map(|(_, l)| *l))?;
    let store = load_store(&path)?;
    Ok(LoadedLab {
        name: lab.map(|(name, _)| name),
        path,
        store,
        session,
    })
}

fn load_store(path: &Path) -> Result<Arc<ConfigStore>, CliError> {
    let topology = netsim_config::load_topology(path)?;
    Ok(Arc::new(ConfigStore::from_topology(topology)?))
}

fn available_labs(cfg: &Config) -> String {
    if cfg.labs.is_empty() {
        "(none)".into()
    } else {
        cfg.labs.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}
