// ── Port mapper ──
//
// A device's physical ports are derived, not stored: incident links are
// sorted by link id and numbered `GigabitEthernet0/1..k` in that order.
// Identity is positional. Adding a link whose id sorts earlier renumbers
// every later port on that device.

use serde::Serialize;

use crate::model::{Device, DeviceId, Link, LinkId};

/// Interface family used for mapped ports.
pub const PORT_PREFIX: &str = "GigabitEthernet0/";

/// One mapped port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortMapping {
    /// 1-based position in the sorted incident-link list.
    pub index: usize,
    /// Full interface name, e.g. `GigabitEthernet0/2`.
    pub name: String,
    pub link: LinkId,
    pub neighbor: DeviceId,
}

impl PortMapping {
    /// Display form, e.g. `Gi0/2`.
    pub fn short_name(&self) -> String {
        format!("Gi0/{}", self.index)
    }
}

/// Derive the port table for `device` from the current link set.
pub fn port_map(device: &DeviceId, links: &[Link]) -> Vec<PortMapping> {
    let mut incident: Vec<&Link> = links.iter().filter(|l| l.touches(device)).collect();
    incident.sort_by(|a, b| a.id.cmp(&b.id));
    incident
        .into_iter()
        .enumerate()
        .filter_map(|(pos, link)| {
            let neighbor = link.other_end(device)?.clone();
            let index = pos + 1;
            Some(PortMapping {
                index,
                name: format!("{PORT_PREFIX}{index}"),
                link: link.id.clone(),
                neighbor,
            })
        })
        .collect()
}

/// Parse the trailing number of an interface name as a 1-based port index.
///
/// `GigabitEthernet0/3` → 3, `Fa0/12` → 12, `Vlan1` → 1. Names without a
/// trailing number yield `None`.
pub fn port_index(name: &str) -> Option<usize> {
    let digits: String = name
        .chars()
        .rev()
        .take_while(char::is_ascii_digit)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse().ok().filter(|i| *i > 0)
}

/// The mapped port an interface name refers to, by trailing index.
pub fn port_for_interface(device: &DeviceId, interface: &str, links: &[Link]) -> Option<PortMapping> {
    let index = port_index(interface)?;
    port_map(device, links).into_iter().nth(index - 1)
}

/// Interface name currently mapped onto `link` at `device`'s end.
pub fn port_name_for_link(device: &DeviceId, link: &LinkId, links: &[Link]) -> Option<String> {
    port_map(device, links)
        .into_iter()
        .find(|p| &p.link == link)
        .map(|p| p.name)
}

/// A link reads as administratively down when either endpoint has any
/// interface shut. The shut interface need not be the one mapped to it.
pub fn link_is_down(source: Option<&Device>, target: Option<&Device>) -> bool {
    source.is_some_and(Device::has_shutdown_interface)
        || target.is_some_and(Device::has_shutdown_interface)
}
