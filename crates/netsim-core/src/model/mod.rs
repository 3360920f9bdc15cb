// ── Simulation domain model ──
//
// Every type in this module is the canonical representation of a
// simulated entity. The serde shapes double as the round-trip format
// used by topology files.

pub mod device;
pub mod ids;
pub mod interface;
pub mod link;
pub mod topology;

// ── Re-exports ──────────────────────────────────────────────────────
// Flat access: `use netsim_core::model::*` gives you everything.

pub use device::{DEFAULT_VLAN, Device, DeviceKind, DeviceStatus, LineConfig};
pub use ids::{DeviceId, LinkId};
pub use interface::{
    InterfaceAddress, InterfaceConfig, SwitchportMode, TRUNK_ALLOW_ALL, short_interface_name,
};
pub use link::Link;
pub use topology::Topology;
