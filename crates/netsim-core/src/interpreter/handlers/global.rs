// ── Global configuration commands ──

use tracing::debug;

use super::normalize_interface;
use crate::interpreter::error::CommandError;
use crate::interpreter::matcher::pick_keyword;
use crate::interpreter::mode::{Mode, Target};
use crate::interpreter::table::{Invocation, Reply};

const MAX_HOSTNAME: usize = 63;

/// IOS hostnames: a letter first, then letters, digits, `-` or `_`.
fn valid_hostname(name: &str) -> bool {
    name.len() <= MAX_HOSTNAME
        && name.starts_with(|c: char| c.is_ascii_alphabetic())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub(crate) fn hostname(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let name = inv.arg(0);
    if !valid_hostname(name) {
        return Err(inv.invalid(0));
    }
    inv.store().set_hostname(inv.device_id(), name)?;
    Ok(Reply {
        hostname: Some(name.to_owned()),
        ..Reply::silent()
    })
}

pub(crate) fn no_hostname(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let label = inv.device()?.label;
    inv.store().set_hostname(inv.device_id(), &label)?;
    Ok(Reply {
        hostname: Some(label),
        ..Reply::silent()
    })
}

pub(crate) fn interface(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let typed: String = inv.args.iter().map(|t| t.text).collect();
    let name = normalize_interface(&typed).ok_or_else(|| inv.invalid(0))?;
    inv.store().ensure_interface(inv.device_id(), &name)?;
    debug!(device = %inv.device_id(), interface = %name, "entering interface");
    Ok(Reply::enter(
        Mode::InterfaceConfig,
        Some(Target::Interface(name)),
    ))
}

pub(crate) fn vlan(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let id = inv.vlan_arg(0)?;
    inv.store().set_vlan(inv.device_id(), id, None)?;
    Ok(Reply::enter(Mode::VlanConfig, Some(Target::Vlan(id))))
}

pub(crate) fn no_vlan(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let id = inv.vlan_arg(0)?;
    if !inv.store().remove_vlan(inv.device_id(), id)? {
        debug!(device = %inv.device_id(), vlan = id, "no such VLAN");
    }
    Ok(Reply::silent())
}

pub(crate) fn ip_routing(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    inv.store().set_routing(inv.device_id(), true)?;
    Ok(Reply::silent())
}

pub(crate) fn no_ip_routing(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    inv.store().set_routing(inv.device_id(), false)?;
    Ok(Reply::silent())
}

/// `line console 0`, `line vty 0 4`, `line aux 0`.
pub(crate) fn line(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let kind = pick_keyword(inv.arg(0), &["console", "vty", "aux"]).ok_or_else(|| inv.invalid(0))?;
    let first: u8 = inv.arg(1).parse().map_err(|_| inv.invalid(1))?;
    let last: Option<u8> = match inv.args.get(2) {
        Some(token) => Some(
            token
                .text
                .parse()
                .ok()
                .filter(|last| *last >= first)
                .ok_or_else(|| inv.invalid(2))?,
        ),
        None => None,
    };

    let name = match (kind, last) {
        ("console", None) if first == 0 => "con 0".to_owned(),
        ("aux", None) if first == 0 => "aux 0".to_owned(),
        ("vty", None) if first <= 15 => format!("vty {first}"),
        ("vty", Some(last)) if last <= 15 => format!("vty {first} {last}"),
        (_, Some(_)) => return Err(inv.invalid(2)),
        _ => return Err(inv.invalid(1)),
    };

    inv.store().update_line(inv.device_id(), &name, |_| ())?;
    Ok(Reply::enter(Mode::LineConfig, Some(Target::Line(name))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostname_rules() {
        assert!(valid_hostname("Core-SW_1"));
        assert!(!valid_hostname("1core"));
        assert!(!valid_hostname("core.sw"));
        assert!(!valid_hostname(&"a".repeat(64)));
    }
}
