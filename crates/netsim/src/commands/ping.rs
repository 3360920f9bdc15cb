//! `netsim ping`: one reachability verdict between two devices.

use netsim_core::{ConfigStore, DeviceId, PathVerdict};

use crate::cli::{GlobalOpts, PingArgs};
use crate::config::LoadedLab;
use crate::error::CliError;
use crate::output;

use super::util;

fn hostname_of(store: &ConfigStore, id: &DeviceId) -> String {
    store
        .device(id)
        .map_or_else(|| id.to_string(), |d| d.display_name().to_owned())
}

fn detail(store: &ConfigStore, verdict: &PathVerdict, color: bool) -> String {
    let mut lines = vec![output::verdict(verdict.success, &verdict.message, color)];
    if !verdict.path.is_empty() {
        let names: Vec<String> = verdict.path.iter().map(|id| hostname_of(store, id)).collect();
        lines.push(format!("Path: {}", names.join(" -> ")));
    }
    if verdict.success {
        lines.push(format!("Hops: {}", verdict.hop_count));
    }
    lines.join("\n")
}

pub fn handle(lab: &LoadedLab, args: &PingArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let source = util::resolve_device(&lab.store, &args.source)?;
    let target = util::resolve_device(&lab.store, &args.target)?;
    let verdict = lab.store.find_path(&source.id, &target.id);
    tracing::debug!(source = %source.id, target = %target.id, success = verdict.success, "ping");

    let color = output::should_color(&global.color);
    let rendered = output::render_single(
        &global.output,
        &verdict,
        |v| detail(&lab.store, v, color),
        |v| {
            v.path
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&rendered, global.quiet);

    if verdict.success {
        Ok(())
    } else {
        Err(CliError::Unreachable {
            source_name: source.display_name().to_owned(),
            target_name: target.display_name().to_owned(),
            reason: verdict.message,
        })
    }
}
