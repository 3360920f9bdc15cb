// ── Topology document ──

use serde::{Deserialize, Serialize};

use super::device::Device;
use super::link::Link;

/// The full device + link graph as it travels to and from disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Topology {
    pub fn new(devices: Vec<Device>, links: Vec<Link>) -> Self {
        Self { devices, links }
    }
}
