//! Link command handlers.

use serde::Serialize;
use tabled::Tabled;

use netsim_core::{ConnectionAdvice, DeviceId, Link, LinkId, validate_connection};

use crate::cli::{GlobalOpts, LinksArgs, LinksCommand};
use crate::config::LoadedLab;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Views ───────────────────────────────────────────────────────────

/// A link with both ends resolved to their current port names.
#[derive(Serialize)]
struct LinkView {
    id: String,
    source: String,
    source_port: Option<String>,
    target: String,
    target_port: Option<String>,
    down: bool,
}

#[derive(Tabled)]
struct LinkRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Port")]
    source_port: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Port")]
    target_port: String,
    #[tabled(rename = "State")]
    state: String,
}

impl From<&LinkView> for LinkRow {
    fn from(v: &LinkView) -> Self {
        Self {
            id: v.id.clone(),
            source: v.source.clone(),
            source_port: v.source_port.clone().unwrap_or_else(|| "-".into()),
            target: v.target.clone(),
            target_port: v.target_port.clone().unwrap_or_else(|| "-".into()),
            state: if v.down { "down" } else { "up" }.into(),
        }
    }
}

fn view(lab: &LoadedLab, link: &Link) -> LinkView {
    let port = |device: &DeviceId| {
        lab.store
            .port_map(device)
            .into_iter()
            .find(|p| p.link == link.id)
            .map(|p| p.short_name())
    };
    LinkView {
        id: link.id.to_string(),
        source: link.source.to_string(),
        source_port: port(&link.source),
        target: link.target.to_string(),
        target_port: port(&link.target),
        down: lab.store.link_is_down(link),
    }
}

/// Advice as printed after `links add`, and as serialized output.
#[derive(Serialize)]
struct AddedLink {
    id: String,
    advice: ConnectionAdvice,
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(lab: &LoadedLab, args: LinksArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        LinksCommand::List => {
            let views: Vec<LinkView> = lab
                .store
                .links_snapshot()
                .iter()
                .map(|l| view(lab, l))
                .collect();
            let out = output::render_list(&global.output, &views, |v| LinkRow::from(v), |v| v.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LinksCommand::Add {
            source,
            target,
            save,
        } => {
            let source = util::resolve_device(&lab.store, &source)?;
            let target = util::resolve_device(&lab.store, &target)?;
            let advice = validate_connection(source.kind, target.kind);
            let id = lab.store.connect(&source.id, &target.id)?;
            tracing::info!(link = %id, source = %source.id, target = %target.id, "link added");

            let color = output::should_color(&global.color);
            let added = AddedLink {
                id: id.to_string(),
                advice,
            };
            let out = output::render_single(
                &global.output,
                &added,
                |a| {
                    format!(
                        "Added link {}\n{}",
                        a.id,
                        output::advice(a.advice.level, &a.advice.message, color)
                    )
                },
                |a| a.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            if save {
                lab.save()?;
            }
            Ok(())
        }

        LinksCommand::Remove { id, save } => {
            let link = lab.store.remove_link(&LinkId::from(id.as_str()))?;
            tracing::info!(link = %link.id, "link removed");
            output::print_output(&format!("Removed link {}", link.id), global.quiet);
            if save {
                lab.save()?;
            }
            Ok(())
        }
    }
}
