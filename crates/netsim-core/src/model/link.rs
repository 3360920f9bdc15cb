// ── Links ──

use serde::{Deserialize, Serialize};

use super::ids::{DeviceId, LinkId};

/// An undirected cable between two devices. Link state is derived from
/// the endpoints' interface configuration, never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    #[serde(rename = "sourceId")]
    pub source: DeviceId,
    #[serde(rename = "targetId")]
    pub target: DeviceId,
}

impl Link {
    pub fn new(id: impl Into<LinkId>, source: impl Into<DeviceId>, target: impl Into<DeviceId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn touches(&self, device: &DeviceId) -> bool {
        &self.source == device || &self.target == device
    }

    /// The endpoint opposite `device`, if `device` is on this link.
    pub fn other_end(&self, device: &DeviceId) -> Option<&DeviceId> {
        if &self.source == device {
            Some(&self.target)
        } else if &self.target == device {
            Some(&self.source)
        } else {
            None
        }
    }
}
