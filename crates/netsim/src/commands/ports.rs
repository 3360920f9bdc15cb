//! `netsim ports`: the derived port map of one device.

use tabled::Tabled;

use netsim_core::PortMapping;

use crate::cli::{GlobalOpts, PortsArgs};
use crate::config::LoadedLab;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct PortRow {
    #[tabled(rename = "Port")]
    short: String,
    #[tabled(rename = "Interface")]
    name: String,
    #[tabled(rename = "Link")]
    link: String,
    #[tabled(rename = "Neighbor")]
    neighbor: String,
    #[tabled(rename = "Admin")]
    admin: String,
}

pub fn handle(lab: &LoadedLab, args: &PortsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let device = util::resolve_device(&lab.store, &args.device)?;
    let ports = lab.store.port_map(&device.id);

    let neighbor_name = |p: &PortMapping| {
        lab.store
            .device(&p.neighbor)
            .map_or_else(|| p.neighbor.to_string(), |d| d.display_name().to_owned())
    };
    let out = output::render_list(
        &global.output,
        &ports,
        |p| PortRow {
            short: p.short_name(),
            name: p.name.clone(),
            link: p.link.to_string(),
            neighbor: neighbor_name(p),
            admin: match device.interface(&p.name) {
                Some(i) if i.shutdown => "shutdown".into(),
                _ => "up".into(),
            },
        },
        |p| p.name.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
