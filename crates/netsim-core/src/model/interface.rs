// ── Interface configuration ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::device::DEFAULT_VLAN;

/// Trunk allowed-VLAN spec meaning "every VLAN".
pub const TRUNK_ALLOW_ALL: &str = "all";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SwitchportMode {
    #[default]
    Access,
    Trunk,
    Dynamic,
}

/// IPv4 address and mask as typed. No validation happens here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceAddress {
    pub ip: String,
    pub mask: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<InterfaceAddress>,
    #[serde(default)]
    pub shutdown: bool,
    #[serde(default)]
    pub switchport_mode: SwitchportMode,
    #[serde(default = "default_access_vlan")]
    pub access_vlan: u16,
    #[serde(default = "default_trunk_allowed")]
    pub trunk_allowed: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_vlan: Option<u16>,
}

fn default_access_vlan() -> u16 {
    DEFAULT_VLAN
}

fn default_trunk_allowed() -> String {
    TRUNK_ALLOW_ALL.into()
}

impl InterfaceConfig {
    /// A fresh interface with IOS defaults: no shutdown, access mode, VLAN 1.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            address: None,
            shutdown: false,
            switchport_mode: SwitchportMode::Access,
            access_vlan: DEFAULT_VLAN,
            trunk_allowed: default_trunk_allowed(),
            native_vlan: None,
        }
    }

    /// Short display form: `GigabitEthernet0/3` → `Gi0/3`.
    pub fn short_name(&self) -> String {
        short_interface_name(&self.name)
    }
}

/// Abbreviate the well-known interface families the way IOS listings do.
pub fn short_interface_name(name: &str) -> String {
    const FAMILIES: [(&str, &str); 4] = [
        ("GigabitEthernet", "Gi"),
        ("FastEthernet", "Fa"),
        ("Loopback", "Lo"),
        ("Vlan", "Vl"),
    ];
    for (long, short) in FAMILIES {
        if let Some(rest) = name.strip_prefix(long) {
            return format!("{short}{rest}");
        }
    }
    name.to_owned()
}
