// ── Configuration store ──
//
// Topology-wide device configuration with per-device write serialisation
// and pull-based snapshots.

mod collection;
mod config_store;

pub use config_store::{ConfigStore, MAX_VLAN, default_vlan_name};
