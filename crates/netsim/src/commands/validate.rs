//! `netsim validate`: advisory check for a proposed connection.

use netsim_core::validate_connection;

use crate::cli::{GlobalOpts, ValidateArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub fn handle(args: &ValidateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let source = util::device_kind("source-kind", &args.source_kind)?;
    let target = util::device_kind("target-kind", &args.target_kind)?;
    let advice = validate_connection(source, target);

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &advice,
        |a| output::advice(a.level, &a.message, color),
        |a| a.level.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
