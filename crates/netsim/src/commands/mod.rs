//! Command dispatch: bridges CLI args -> store / interpreter -> output.

pub mod catalog;
pub mod config_cmd;
pub mod console;
pub mod devices;
pub mod links;
pub mod ping;
pub mod ports;
pub mod util;
pub mod validate;

use crate::cli::{Command, GlobalOpts};
use crate::config::LoadedLab;
use crate::error::CliError;

/// Dispatch a topology-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, lab: &LoadedLab, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Console(args) => console::handle(lab, args, global).await,
        Command::Ping(args) => ping::handle(lab, &args, global),
        Command::Devices(args) => devices::handle(lab, args, global),
        Command::Links(args) => links::handle(lab, args, global),
        Command::Ports(args) => ports::handle(lab, &args, global),
        // Handled before a lab is loaded
        Command::Validate(_)
        | Command::Commands(_)
        | Command::Config(_)
        | Command::Completions(_) => unreachable!(),
    }
}
