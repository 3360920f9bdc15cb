// ── Topology files ──
//
// The on-disk shape is `netsim_core::Topology` verbatim; only the codec
// depends on the file extension.

use std::path::Path;

use netsim_core::Topology;

use crate::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyFormat {
    Json,
    Yaml,
}

impl TopologyFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

pub fn load_topology(path: &Path) -> Result<Topology, ConfigError> {
    let format = TopologyFormat::from_path(path)?;
    let text = std::fs::read_to_string(path)?;
    let parsed = match format {
        TopologyFormat::Json => serde_json::from_str(&text).map_err(|e| e.to_string()),
        TopologyFormat::Yaml => serde_yaml::from_str(&text).map_err(|e| e.to_string()),
    };
    let topology: Topology = parsed.map_err(|reason| ConfigError::TopologyParse {
        path: path.to_path_buf(),
        reason,
    })?;
    tracing::debug!(
        path = %path.display(),
        devices = topology.devices.len(),
        links = topology.links.len(),
        "topology loaded"
    );
    Ok(topology)
}

/// Write `topology` in the format implied by the extension, creating
/// parent directories as needed.
pub fn save_topology(path: &Path, topology: &Topology) -> Result<(), ConfigError> {
    let format = TopologyFormat::from_path(path)?;
    let text = match format {
        TopologyFormat::Json => serde_json::to_string_pretty(topology).map_err(|e| e.to_string()),
        TopologyFormat::Yaml => serde_yaml::to_string(topology).map_err(|e| e.to_string()),
    }
    .map_err(|reason| ConfigError::TopologyParse {
        path: path.to_path_buf(),
        reason,
    })?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)?;
    Ok(())
}
