// ── show commands ──

use chrono::Utc;

use super::normalize_interface;
use crate::interpreter::error::CommandError;
use crate::interpreter::render::{self, InterfaceView};
use crate::interpreter::table::{Invocation, Reply};
use crate::model::{Device, DeviceKind, SwitchportMode};

/// Link/protocol state of one interface as `show` commands print it.
fn status(inv: &Invocation<'_>, device: &Device, view: &InterfaceView) -> (&'static str, &'static str) {
    if view.config.shutdown {
        return ("administratively down", "down");
    }
    if device.is_down() {
        return ("down", "down");
    }
    match &view.port {
        Some(port) => {
            let neighbor_up = inv
                .store()
                .device(&port.neighbor)
                .is_some_and(|n| !n.is_down());
            if neighbor_up { ("up", "up") } else { ("down", "down") }
        }
        None if view.is_physical() => ("down", "down"),
        None => ("up", "up"),
    }
}

fn views(inv: &Invocation<'_>, device: &Device) -> Vec<InterfaceView> {
    render::interface_views(device, &inv.store().port_map(&device.id))
}

fn model_name(kind: DeviceKind) -> &'static str {
    match kind {
        DeviceKind::Router => "NS-ISR4331",
        DeviceKind::SwitchL2 => "NS-C2960",
        DeviceKind::SwitchL3 => "NS-C3650",
        DeviceKind::Firewall => "NS-ASA5506",
        DeviceKind::SdwanEdge => "NS-VEDGE",
        _ => "NS-HOST",
    }
}

pub(crate) fn version(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let device = inv.device()?;
    let ports = inv.store().port_map(&device.id).len();
    Ok(Reply::lines(vec![
        format!(
            "NetSim IOS Software, {} Software ({}-UNIVERSALK9-M), Version 15.2(4)E10, RELEASE SOFTWARE",
            device.kind,
            model_name(device.kind)
        ),
        "ROM: Bootstrap program is NetSim ROMMON".to_owned(),
        String::new(),
        format!("{} uptime is 0 minutes", device.display_name()),
        "System image file is \"flash:netsim-universalk9-mz.152-4.E10.bin\"".to_owned(),
        String::new(),
        format!(
            "{} ({}) processor with 524288K bytes of memory.",
            model_name(device.kind),
            device.kind
        ),
        format!("{ports} Gigabit Ethernet interfaces"),
        "Configuration register is 0x2102".to_owned(),
    ]))
}

pub(crate) fn clock(_: &Invocation<'_>) -> Result<Reply, CommandError> {
    let now = Utc::now();
    Ok(Reply::lines([now
        .format("*%H:%M:%S%.3f UTC %a %b %-d %Y")
        .to_string()]))
}

pub(crate) fn history(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    Ok(Reply::lines(
        inv.ctx.history.iter().map(|cmd| format!("  {cmd}")),
    ))
}

pub(crate) fn ip_interface_brief(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let device = inv.device()?;
    let mut lines = vec![format!(
        "{:<27}{:<16}{:<4}{:<7}{:<22}{}",
        "Interface", "IP-Address", "OK?", "Method", "Status", "Protocol"
    )];
    for view in views(inv, &device) {
        let (line, protocol) = status(inv, &device, &view);
        let (ip, method) = match &view.config.address {
            Some(addr) => (addr.ip.as_str(), "manual"),
            None => ("unassigned", "unset"),
        };
        lines.push(format!(
            "{:<27}{:<16}{:<4}{:<7}{:<22}{}",
            view.name(),
            ip,
            "YES",
            method,
            line,
            protocol
        ));
    }
    Ok(Reply::lines(lines))
}

pub(crate) fn interfaces(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let device = inv.device()?;
    let mut all = views(inv, &device);

    if !inv.args.is_empty() {
        let typed: String = inv.args.iter().map(|t| t.text).collect();
        let name = normalize_interface(&typed).ok_or_else(|| inv.invalid(0))?;
        all.retain(|v| v.name() == name);
        if all.is_empty() {
            return Err(inv.invalid(0));
        }
    }

    let mut lines = Vec::new();
    for view in &all {
        let (line, protocol) = status(inv, &device, view);
        lines.push(format!(
            "{} is {line}, line protocol is {protocol}",
            view.name()
        ));
        lines.push(format!("  Hardware is {}", hardware(view.name())));
        if let Some(description) = &view.config.description {
            lines.push(format!("  Description: {description}"));
        }
        if let Some(addr) = &view.config.address {
            match render::mask_prefix(&addr.mask) {
                Some(prefix) => lines.push(format!("  Internet address is {}/{prefix}", addr.ip)),
                None => lines.push(format!("  Internet address is {} {}", addr.ip, addr.mask)),
            }
        }
        lines.push("  MTU 1500 bytes, BW 1000000 Kbit/sec, DLY 10 usec".to_owned());
        if let Some(port) = &view.port {
            let neighbor = inv
                .store()
                .device(&port.neighbor)
                .map_or_else(|| port.neighbor.to_string(), |n| n.display_name().to_owned());
            lines.push(format!("  Connected to {neighbor} (link {})", port.link));
        }
    }
    Ok(Reply::lines(lines))
}

fn hardware(name: &str) -> &'static str {
    if name.starts_with("GigabitEthernet") {
        "Gigabit Ethernet"
    } else if name.starts_with("FastEthernet") {
        "Fast Ethernet"
    } else if name.starts_with("Vlan") {
        "EtherSVI"
    } else {
        "Loopback"
    }
}

pub(crate) fn vlan_brief(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let device = inv.device()?;
    if !device.kind.supports_vlans() {
        return Err(CommandError::VlanUnsupported);
    }
    let views = views(inv, &device);

    let mut lines = vec![
        format!("{:<5}{:<33}{:<10}{}", "VLAN", "Name", "Status", "Ports"),
        format!(
            "{} {} {} {}",
            "-".repeat(4),
            "-".repeat(32),
            "-".repeat(9),
            "-".repeat(31)
        ),
    ];
    for (id, name) in device.vlans() {
        let ports: Vec<String> = views
            .iter()
            .filter(|v| {
                v.is_physical()
                    && v.config.switchport_mode == SwitchportMode::Access
                    && v.config.access_vlan == id
            })
            .map(|v| v.config.short_name())
            .collect();
        let row = format!("{id:<5}{name:<33}{:<10}{}", "active", ports.join(", "));
        lines.push(row.trim_end().to_owned());
    }
    Ok(Reply::lines(lines))
}

pub(crate) fn ip_route(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let device = inv.device()?;
    let routes = device.routing_enabled
        || matches!(
            device.kind,
            DeviceKind::Router | DeviceKind::Firewall | DeviceKind::SdwanEdge
        );
    if !routes {
        return Ok(Reply::lines([
            "Default gateway is not set",
            "Host               Gateway           Last Use    Total Uses  Interface",
            "ICMP redirect cache is empty",
        ]));
    }

    let mut lines = vec![
        "Codes: L - local, C - connected, S - static, R - RIP, O - OSPF".to_owned(),
        "       * - candidate default".to_owned(),
        String::new(),
        "Gateway of last resort is not set".to_owned(),
        String::new(),
    ];
    for view in views(inv, &device) {
        let Some(addr) = &view.config.address else {
            continue;
        };
        if view.config.shutdown {
            continue;
        }
        let network = render::network_of(&addr.ip, &addr.mask);
        lines.push(format!(
            "C        {network} is directly connected, {}",
            view.name()
        ));
        lines.push(format!(
            "L        {}/32 is directly connected, {}",
            addr.ip,
            view.name()
        ));
    }
    Ok(Reply::lines(lines))
}

pub(crate) fn running_config(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let device = inv.device()?;
    let body = render::running_config(&device, &inv.store().port_map(&device.id));
    let mut lines = vec![
        "Building configuration...".to_owned(),
        String::new(),
        format!("Current configuration : {} bytes", render::config_size(&body)),
    ];
    lines.extend(body);
    Ok(Reply::lines(lines))
}

pub(crate) fn startup_config(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let device = inv.device()?;
    match device.startup_config {
        Some(text) => {
            let mut lines = vec![format!("Using {} out of 65536 bytes", text.len() + 1)];
            lines.extend(text.lines().map(str::to_owned));
            Ok(Reply::lines(lines))
        }
        None => Ok(Reply::lines(["startup-config is not present"])),
    }
}
