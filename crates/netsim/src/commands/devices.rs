//! Device command handlers.

use std::sync::Arc;

use tabled::Tabled;

use netsim_core::Device;
use netsim_core::interpreter::render_running_config;

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::config::LoadedLab;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "VLANs")]
    vlans: String,
    #[tabled(rename = "Ports")]
    ports: usize,
}

fn row(lab: &LoadedLab, d: &Arc<Device>) -> DeviceRow {
    DeviceRow {
        id: d.id.to_string(),
        hostname: d.display_name().to_owned(),
        kind: d.kind.to_string(),
        status: d.status.to_string(),
        ip: d.management_ip.clone().unwrap_or_default(),
        vlans: vlan_summary(d),
        ports: lab.store.port_map(&d.id).len(),
    }
}

fn vlan_summary(d: &Device) -> String {
    if d.kind.supports_vlans() {
        d.vlans()
            .iter()
            .map(|(id, _)| id.to_string())
            .collect::<Vec<_>>()
            .join(",")
    } else {
        d.display_vlan.map(|v| format!("({v})")).unwrap_or_default()
    }
}

fn detail(lab: &LoadedLab, d: &Arc<Device>) -> String {
    let mut lines = vec![
        format!("ID:        {}", d.id),
        format!("Label:     {}", d.label),
        format!("Hostname:  {}", d.display_name()),
        format!("Kind:      {}", d.kind),
        format!("Status:    {}", d.status),
        format!("IP:        {}", d.management_ip.as_deref().unwrap_or("-")),
        format!("Routing:   {}", if d.routing_enabled { "enabled" } else { "disabled" }),
    ];
    if d.kind.supports_vlans() {
        lines.push("VLANs:".into());
        lines.extend(d.vlans().iter().map(|(id, name)| format!("  {id:<5} {name}")));
    } else if let Some(vlan) = d.display_vlan {
        lines.push(format!("VLAN tag:  {vlan}"));
    }
    let ports = lab.store.port_map(&d.id);
    if !ports.is_empty() {
        lines.push("Ports:".into());
        for port in ports {
            let state = d
                .interface(&port.name)
                .map_or("up", |i| if i.shutdown { "shutdown" } else { "up" });
            lines.push(format!("  {:<8} -> {:<12} {state}", port.short_name(), port.neighbor));
        }
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(lab: &LoadedLab, args: DevicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => {
            let snap = lab.store.devices_snapshot();
            let out = output::render_list(
                &global.output,
                snap.as_slice(),
                |d| row(lab, d),
                |d| d.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Show {
            device,
            running_config,
        } => {
            let device = util::resolve_device(&lab.store, &device)?;
            if running_config {
                let text = render_running_config(&device, &lab.store.port_map(&device.id));
                output::print_output(&text.join("\n"), global.quiet);
                return Ok(());
            }
            let out = output::render_single(
                &global.output,
                &device,
                |d| detail(lab, d),
                |d| d.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
