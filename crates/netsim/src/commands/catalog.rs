//! `netsim commands`: the interpreter's command table.

use serde::Serialize;
use tabled::Tabled;

use netsim_core::interpreter::{CommandSpec, Mode, commands, commands_for};

use crate::cli::{CommandsArgs, GlobalOpts, ModeArg};
use crate::error::CliError;
use crate::output;

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::User => Self::UserExec,
            ModeArg::Privileged => Self::PrivilegedExec,
            ModeArg::Global => Self::GlobalConfig,
            ModeArg::Interface => Self::InterfaceConfig,
            ModeArg::Vlan => Self::VlanConfig,
            ModeArg::Line => Self::LineConfig,
        }
    }
}

#[derive(Serialize)]
struct CommandEntry {
    command: String,
    modes: Vec<Mode>,
    min_args: usize,
    max_args: Option<usize>,
    help: &'static str,
}

impl From<&CommandSpec> for CommandEntry {
    fn from(spec: &CommandSpec) -> Self {
        Self {
            command: spec.synopsis(),
            modes: spec.modes.to_vec(),
            min_args: spec.arity.min,
            max_args: spec.arity.max,
            help: spec.help,
        }
    }
}

#[derive(Tabled)]
struct CommandRow {
    #[tabled(rename = "Command")]
    command: String,
    #[tabled(rename = "Modes")]
    modes: String,
    #[tabled(rename = "Description")]
    help: String,
}

fn row(entry: &CommandEntry) -> CommandRow {
    CommandRow {
        command: entry.command.clone(),
        modes: entry
            .modes
            .iter()
            .copied()
            .map(Mode::prompt_suffix)
            .collect::<Vec<_>>()
            .join(" "),
        help: entry.help.to_owned(),
    }
}

pub fn handle(args: &CommandsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let entries: Vec<CommandEntry> = match args.mode {
        Some(mode) => commands_for(mode.into()).map(CommandEntry::from).collect(),
        None => commands().iter().map(CommandEntry::from).collect(),
    };
    let out = output::render_list(&global.output, &entries, row, |e| e.command.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
