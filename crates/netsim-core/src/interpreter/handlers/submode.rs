// ── VLAN and line configuration commands ──

use crate::interpreter::error::CommandError;
use crate::interpreter::table::{Invocation, Reply};
use crate::model::DEFAULT_VLAN;
use crate::store::default_vlan_name;

pub(crate) fn vlan_name(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let vlan = inv.vlan_target()?;
    inv.store()
        .set_vlan(inv.device_id(), vlan, Some(inv.arg(0)))?;
    Ok(Reply::silent())
}

pub(crate) fn no_vlan_name(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let vlan = inv.vlan_target()?;
    let name = if vlan == DEFAULT_VLAN {
        "default".to_owned()
    } else {
        default_vlan_name(vlan)
    };
    inv.store().set_vlan(inv.device_id(), vlan, Some(&name))?;
    Ok(Reply::silent())
}

pub(crate) fn password(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let line = inv.line_target()?;
    let secret = inv.arg(0).to_owned();
    inv.store()
        .update_line(inv.device_id(), line, |l| l.password = Some(secret))?;
    Ok(Reply::silent())
}

pub(crate) fn no_password(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let line = inv.line_target()?;
    inv.store()
        .update_line(inv.device_id(), line, |l| l.password = None)?;
    Ok(Reply::silent())
}

pub(crate) fn login(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let line = inv.line_target()?;
    let has_password = inv.store().update_line(inv.device_id(), line, |l| {
        l.login = true;
        l.password.is_some()
    })?;
    if has_password {
        Ok(Reply::silent())
    } else {
        Ok(Reply::lines([format!(
            "% Login disabled on line {line}, until 'password' is set"
        )]))
    }
}

pub(crate) fn no_login(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let line = inv.line_target()?;
    inv.store()
        .update_line(inv.device_id(), line, |l| l.login = false)?;
    Ok(Reply::silent())
}
