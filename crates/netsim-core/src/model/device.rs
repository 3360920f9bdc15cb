// ── Device domain types ──

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::ids::DeviceId;
use super::interface::InterfaceConfig;

/// VLAN every switch carries even when the table never mentions it.
pub const DEFAULT_VLAN: u16 = 1;

/// Catalog of device kinds the simulator knows how to place.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum DeviceKind {
    Router,
    SwitchL2,
    SwitchL3,
    Firewall,
    #[serde(rename = "PC")]
    #[strum(serialize = "PC")]
    Pc,
    Laptop,
    Server,
    AccessPoint,
    Printer,
    Phone,
    Hub,
    Internet,
    #[serde(rename = "SDWAN-Edge")]
    #[strum(serialize = "SDWAN-Edge")]
    SdwanEdge,
}

impl DeviceKind {
    /// Only switches keep a VLAN table.
    pub fn supports_vlans(self) -> bool {
        matches!(self, Self::SwitchL2 | Self::SwitchL3)
    }

    /// Kinds that can forward between subnets.
    pub fn is_routing_capable(self) -> bool {
        matches!(self, Self::Router | Self::SwitchL3 | Self::Firewall)
    }

    /// Kinds whose display VLAN tag follows the switch port they hang off.
    pub fn is_end_host(self) -> bool {
        matches!(self, Self::Pc | Self::Printer | Self::Server)
    }
}

/// Lifecycle status of a device.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DeviceStatus {
    #[default]
    Up,
    Down,
    Booting,
}

/// Console / vty line settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub login: bool,
}

/// The canonical Device record held by the configuration store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    pub label: String,
    pub kind: DeviceKind,
    #[serde(default)]
    pub status: DeviceStatus,

    /// Dotted-quad text. Stored as typed; validated only by the
    /// reachability engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_ip: Option<String>,

    #[serde(default)]
    pub hostname: String,

    #[serde(default)]
    pub vlan_table: BTreeMap<u16, String>,

    #[serde(default)]
    pub interface_table: BTreeMap<String, InterfaceConfig>,

    #[serde(default)]
    pub lines: BTreeMap<String, LineConfig>,

    #[serde(default)]
    pub routing_enabled: bool,

    /// VLAN tag shown on end hosts. Display only.
    #[serde(default, rename = "displayVlanTag", skip_serializing_if = "Option::is_none")]
    pub display_vlan: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startup_config: Option<String>,
}

impl Device {
    pub fn new(id: impl Into<DeviceId>, label: impl Into<String>, kind: DeviceKind) -> Self {
        let label = label.into();
        Self {
            id: id.into(),
            hostname: label.clone(),
            label,
            kind,
            status: DeviceStatus::Up,
            management_ip: None,
            vlan_table: BTreeMap::new(),
            interface_table: BTreeMap::new(),
            lines: BTreeMap::new(),
            routing_enabled: false,
            display_vlan: None,
            startup_config: None,
        }
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.management_ip = Some(ip.into());
        self
    }

    pub fn with_status(mut self, status: DeviceStatus) -> Self {
        self.status = status;
        self
    }

    /// Resolve a VLAN name. VLAN 1 is always `default` unless renamed.
    pub fn vlan_name(&self, id: u16) -> Option<&str> {
        match self.vlan_table.get(&id) {
            Some(name) => Some(name.as_str()),
            None if id == DEFAULT_VLAN => Some("default"),
            None => None,
        }
    }

    /// All VLANs, including the implicit VLAN 1, in ascending id order.
    pub fn vlans(&self) -> Vec<(u16, &str)> {
        let mut out: Vec<(u16, &str)> = Vec::with_capacity(self.vlan_table.len() + 1);
        if !self.vlan_table.contains_key(&DEFAULT_VLAN) {
            out.push((DEFAULT_VLAN, "default"));
        }
        out.extend(self.vlan_table.iter().map(|(id, name)| (*id, name.as_str())));
        out.sort_by_key(|(id, _)| *id);
        out
    }

    pub fn interface(&self, name: &str) -> Option<&InterfaceConfig> {
        self.interface_table.get(name)
    }

    /// True when any configured interface is administratively down.
    pub fn has_shutdown_interface(&self) -> bool {
        self.interface_table.values().any(|i| i.shutdown)
    }

    pub fn is_down(&self) -> bool {
        self.status == DeviceStatus::Down
    }

    /// Hostname, falling back to the label for records loaded without one.
    pub fn display_name(&self) -> &str {
        if self.hostname.is_empty() {
            &self.label
        } else {
            &self.hostname
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("pc".parse::<DeviceKind>().unwrap(), DeviceKind::Pc);
        assert_eq!("switchl2".parse::<DeviceKind>().unwrap(), DeviceKind::SwitchL2);
        assert_eq!(
            "sdwan-edge".parse::<DeviceKind>().unwrap(),
            DeviceKind::SdwanEdge
        );
    }

    #[test]
    fn kind_wire_names() {
        assert_eq!(serde_json::to_string(&DeviceKind::Pc).unwrap(), "\"PC\"");
        assert_eq!(
            serde_json::to_string(&DeviceKind::SdwanEdge).unwrap(),
            "\"SDWAN-Edge\""
        );
        assert_eq!(DeviceKind::SdwanEdge.to_string(), "SDWAN-Edge");
    }

    #[test]
    fn only_switches_support_vlans() {
        assert!(DeviceKind::SwitchL2.supports_vlans());
        assert!(DeviceKind::SwitchL3.supports_vlans());
        assert!(!DeviceKind::Router.supports_vlans());
        assert!(!DeviceKind::Pc.supports_vlans());
    }

    #[test]
    fn vlan_one_resolves_without_entry() {
        let dev = Device::new("sw1", "SW1", DeviceKind::SwitchL2);
        assert_eq!(dev.vlan_name(1), Some("default"));
        assert_eq!(dev.vlan_name(10), None);
        assert_eq!(dev.vlans(), vec![(1, "default")]);
    }

    #[test]
    fn vlans_are_sorted_with_implicit_default() {
        let mut dev = Device::new("sw1", "SW1", DeviceKind::SwitchL2);
        dev.vlan_table.insert(20, "VOICE".into());
        dev.vlan_table.insert(10, "DATA".into());
        assert_eq!(dev.vlans(), vec![(1, "default"), (10, "DATA"), (20, "VOICE")]);
    }

    #[test]
    fn hostname_defaults_to_label() {
        let dev = Device::new("r1", "Core-R1", DeviceKind::Router);
        assert_eq!(dev.hostname, "Core-R1");
        assert_eq!(dev.display_name(), "Core-R1");
    }

    #[test]
    fn wire_shape_uses_camel_case() {
        let mut dev = Device::new("pc1", "PC1", DeviceKind::Pc).with_ip("192.168.1.10");
        dev.display_vlan = Some(10);
        let json = serde_json::to_value(&dev).unwrap();
        assert_eq!(json["managementIp"], "192.168.1.10");
        assert_eq!(json["displayVlanTag"], 10);
        assert_eq!(json["status"], "up");
        assert!(json.get("vlanTable").is_some());
        assert!(json.get("interfaceTable").is_some());
    }

    #[test]
    fn minimal_record_deserializes_with_defaults() {
        let dev: Device =
            serde_json::from_str(r#"{"id":"h1","label":"H1","kind":"Server"}"#).unwrap();
        assert_eq!(dev.status, DeviceStatus::Up);
        assert!(dev.management_ip.is_none());
        assert_eq!(dev.display_name(), "H1");
    }
}
