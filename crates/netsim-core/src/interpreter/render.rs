// ── Rendering helpers ──
//
// Text shapes shared by the show commands and `copy running-config`.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use crate::model::{Device, InterfaceConfig, LineConfig, SwitchportMode, TRUNK_ALLOW_ALL};
use crate::ports::PortMapping;
use crate::reachability::subnet_of;

/// Lines every device carries even before anyone configures them.
const DEFAULT_LINES: [&str; 2] = ["con 0", "vty 0 4"];

/// One row of the merged interface list.
#[derive(Debug, Clone)]
pub(crate) struct InterfaceView {
    pub config: InterfaceConfig,
    pub port: Option<PortMapping>,
}

impl InterfaceView {
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Physical Ethernet family, as opposed to SVIs and loopbacks.
    pub fn is_physical(&self) -> bool {
        self.config.name.starts_with("GigabitEthernet")
            || self.config.name.starts_with("FastEthernet")
    }
}

/// Mapped ports first (in port order), then any other configured
/// interface in name order. Unconfigured ports get IOS defaults.
pub(crate) fn interface_views(device: &Device, ports: &[PortMapping]) -> Vec<InterfaceView> {
    let mut views: Vec<InterfaceView> = ports
        .iter()
        .map(|port| InterfaceView {
            config: device
                .interface(&port.name)
                .cloned()
                .unwrap_or_else(|| InterfaceConfig::new(&port.name)),
            port: Some(port.clone()),
        })
        .collect();
    views.extend(
        device
            .interface_table
            .values()
            .filter(|cfg| !ports.iter().any(|p| p.name == cfg.name))
            .map(|cfg| InterfaceView {
                config: cfg.clone(),
                port: None,
            }),
    );
    views
}

/// Prefix length of a contiguous dotted mask, e.g. `255.255.255.0` → 24.
pub(crate) fn mask_prefix(mask: &str) -> Option<u32> {
    let bits = u32::from(mask.parse::<Ipv4Addr>().ok()?);
    let ones = bits.leading_ones();
    (ones + bits.trailing_zeros() == 32).then_some(ones)
}

/// Network in CIDR form. Falls back to the /24 grouping when the address
/// or mask does not parse as strict IPv4.
pub(crate) fn network_of(ip: &str, mask: &str) -> String {
    match (ip.parse::<Ipv4Addr>(), mask_prefix(mask)) {
        (Ok(addr), Some(prefix)) => {
            let mask_bits = u32::MAX.checked_shl(32 - prefix).unwrap_or(0);
            let net = Ipv4Addr::from(u32::from(addr) & mask_bits);
            format!("{net}/{prefix}")
        }
        _ => format!("{}.0/24", subnet_of(ip)),
    }
}

/// Body of `show running-config`, from the first `!` to `end`. This is
/// also what `copy running-config startup-config` stores.
pub fn running_config(device: &Device, ports: &[PortMapping]) -> Vec<String> {
    let mut out = vec![
        "!".to_owned(),
        "version 15.2".to_owned(),
        "!".to_owned(),
        format!("hostname {}", device.display_name()),
        "!".to_owned(),
    ];

    if device.routing_enabled {
        out.push("ip routing".to_owned());
        out.push("!".to_owned());
    }

    for (id, name) in &device.vlan_table {
        out.push(format!("vlan {id}"));
        out.push(format!(" name {name}"));
        out.push("!".to_owned());
    }

    let switch = device.kind.supports_vlans();
    for view in interface_views(device, ports) {
        out.push(format!("interface {}", view.name()));
        interface_body(&view.config, switch, &mut out);
        out.push("!".to_owned());
    }

    let mut lines: BTreeMap<&str, LineConfig> = DEFAULT_LINES
        .iter()
        .map(|name| (*name, LineConfig::default()))
        .collect();
    for (name, cfg) in &device.lines {
        lines.insert(name.as_str(), cfg.clone());
    }
    for (name, cfg) in lines {
        out.push(format!("line {name}"));
        if let Some(password) = &cfg.password {
            out.push(format!(" password {password}"));
        }
        if cfg.login {
            out.push(" login".to_owned());
        }
    }
    out.push("!".to_owned());
    out.push("end".to_owned());
    out
}

fn interface_body(cfg: &InterfaceConfig, switch: bool, out: &mut Vec<String>) {
    if let Some(description) = &cfg.description {
        out.push(format!(" description {description}"));
    }
    if switch {
        match cfg.switchport_mode {
            SwitchportMode::Access => {
                if cfg.access_vlan != 1 {
                    out.push(format!(" switchport access vlan {}", cfg.access_vlan));
                    out.push(" switchport mode access".to_owned());
                }
            }
            SwitchportMode::Trunk => {
                if let Some(native) = cfg.native_vlan {
                    out.push(format!(" switchport trunk native vlan {native}"));
                }
                if cfg.trunk_allowed != TRUNK_ALLOW_ALL {
                    out.push(format!(
                        " switchport trunk allowed vlan {}",
                        cfg.trunk_allowed
                    ));
                }
                out.push(" switchport mode trunk".to_owned());
            }
            SwitchportMode::Dynamic => out.push(" switchport mode dynamic".to_owned()),
        }
    }
    match &cfg.address {
        Some(addr) => out.push(format!(" ip address {} {}", addr.ip, addr.mask)),
        None if !switch => out.push(" no ip address".to_owned()),
        None => {}
    }
    if cfg.shutdown {
        out.push(" shutdown".to_owned());
    }
}

/// Byte size reported in the `Current configuration` header.
pub(crate) fn config_size(body: &[String]) -> usize {
    body.iter().map(|l| l.len() + 1).sum()
}
