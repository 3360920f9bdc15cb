// ── Commands shared across modes ──

use crate::interpreter::error::CommandError;
use crate::interpreter::mode::Mode;
use crate::interpreter::table::{self, Invocation, Reply, Transition};

pub(crate) fn exit(_: &Invocation<'_>) -> Result<Reply, CommandError> {
    Ok(Reply::silent().with_transition(Transition::Exit))
}

pub(crate) fn end(_: &Invocation<'_>) -> Result<Reply, CommandError> {
    Ok(Reply::silent().with_transition(Transition::End))
}

pub(crate) fn help(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    Ok(Reply::lines(table::help_listing(inv.mode)))
}

/// `do <command>`: run an EXEC command without leaving configuration
/// mode. Mode changes are dropped; a reload still goes through.
pub(crate) fn run_exec(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let column = inv.args.first().map_or(0, |t| t.column);
    let mut reply = table::execute(inv.ctx, Mode::PrivilegedExec, None, inv.rest_from(0))
        .map_err(|err| err.shifted(column))?;
    if !matches!(reply.transition, Some(Transition::Reload)) {
        reply.transition = None;
    }
    Ok(reply)
}
