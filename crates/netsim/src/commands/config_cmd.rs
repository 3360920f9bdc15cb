//! Config subcommand handlers.

use std::path::Path;

use netsim_config::{Config, load_topology};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Lab};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Helpers ─────────────────────────────────────────────────────────

fn render_toml(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# unable to render config: {e}"))
}

/// Register `topology` as lab `name`, making it the default when no
/// default is set yet.
fn init(topology: &Path, name: &str, global: &GlobalOpts) -> Result<(), CliError> {
    // Refuse to register a file we cannot read back.
    let parsed = load_topology(topology)?;
    let topology = std::path::absolute(topology)?;

    let path = config::config_path(global);
    let mut cfg = config::load_config(global)?;
    if let Some(existing) = cfg.labs.get(name) {
        let prompt = format!(
            "Lab '{name}' already points at {}. Replace it?",
            existing.topology.display()
        );
        if !util::confirm(&prompt, "config init", global.yes)? {
            eprintln!("Aborted.");
            return Ok(());
        }
    }

    cfg.labs.insert(
        name.to_owned(),
        Lab {
            topology: topology.clone(),
            boot_delay: None,
            hints: None,
        },
    );
    if cfg.default_lab.is_none() {
        cfg.default_lab = Some(name.to_owned());
    }
    config::save_config_to(&cfg, &path)?;

    output::print_output(
        &format!(
            "Lab '{name}' -> {} ({} devices, {} links)\nWrote {}",
            topology.display(),
            parsed.devices.len(),
            parsed.links.len(),
            path.display()
        ),
        global.quiet,
    );
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init { topology, name } => init(&topology, &name, global),

        ConfigCommand::Show => {
            let cfg = config::load_config(global)?;
            let out = output::render_single(&global.output, &cfg, render_toml, |c| {
                c.default_lab.clone().unwrap_or_default()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path(global).display().to_string(), false);
            Ok(())
        }
    }
}
