// ── Interface configuration commands ──

use std::str::FromStr;

use tracing::debug;

use crate::interpreter::display_sync::DisplaySync;
use crate::interpreter::error::CommandError;
use crate::interpreter::matcher::pick_keyword;
use crate::interpreter::table::{Invocation, Reply};
use crate::model::{DEFAULT_VLAN, Device, InterfaceAddress, SwitchportMode};
use crate::reachability::is_dotted_quad;

/// Set the shutdown flag; returns the previous value.
fn set_shutdown(inv: &Invocation<'_>, shutdown: bool) -> Result<bool, CommandError> {
    let name = inv.interface_target()?;
    Ok(inv
        .store()
        .update_interface(inv.device_id(), name, |iface| {
            std::mem::replace(&mut iface.shutdown, shutdown)
        })?)
}

pub(crate) fn shutdown(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let was_shut = set_shutdown(inv, true)?;
    if was_shut {
        return Ok(Reply::silent());
    }
    let name = inv.interface_target()?;
    Ok(Reply::lines([
        format!("%LINK-5-CHANGED: Interface {name}, changed state to administratively down"),
        format!("%LINEPROTO-5-UPDOWN: Line protocol on Interface {name}, changed state to down"),
    ]))
}

pub(crate) fn no_shutdown(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let was_shut = set_shutdown(inv, false)?;
    if !was_shut {
        return Ok(Reply::silent());
    }
    let name = inv.interface_target()?;
    Ok(Reply::lines([
        format!("%LINK-3-UPDOWN: Interface {name}, changed state to up"),
        format!("%LINEPROTO-5-UPDOWN: Line protocol on Interface {name}, changed state to up"),
    ]))
}

pub(crate) fn description(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let name = inv.interface_target()?;
    let text = inv.rest_from(0).to_owned();
    inv.store()
        .update_interface(inv.device_id(), name, |iface| iface.description = Some(text))?;
    Ok(Reply::silent())
}

pub(crate) fn no_description(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let name = inv.interface_target()?;
    inv.store()
        .update_interface(inv.device_id(), name, |iface| iface.description = None)?;
    Ok(Reply::silent())
}

// ── Switchport ──────────────────────────────────────────────────────

/// Switchport commands only exist on switches.
fn switch(inv: &Invocation<'_>) -> Result<Device, CommandError> {
    let device = inv.device()?;
    if device.kind.supports_vlans() {
        Ok(device)
    } else {
        debug!(device = %device.id, kind = %device.kind, "switchport on non-switch");
        Err(CommandError::VlanUnsupported)
    }
}

pub(crate) fn switchport_mode(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    switch(inv)?;
    let name = inv.interface_target()?;
    let keyword =
        pick_keyword(inv.arg(0), &["access", "trunk", "dynamic"]).ok_or_else(|| inv.invalid(0))?;
    let mode = SwitchportMode::from_str(keyword).map_err(|_| inv.invalid(0))?;
    inv.store()
        .update_interface(inv.device_id(), name, |iface| iface.switchport_mode = mode)?;
    Ok(Reply::silent())
}

pub(crate) fn access_vlan(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let device = switch(inv)?;
    let name = inv.interface_target()?;
    let vlan = inv.vlan_arg(0)?;

    let mut lines = Vec::new();
    if vlan != DEFAULT_VLAN && !device.vlan_table.contains_key(&vlan) {
        inv.store().set_vlan(inv.device_id(), vlan, None)?;
        lines.push(format!("% Access VLAN does not exist. Creating vlan {vlan}"));
    }
    inv.store()
        .update_interface(inv.device_id(), name, |iface| iface.access_vlan = vlan)?;

    let mut reply = Reply::lines(lines);
    reply.sync.push(DisplaySync::AccessVlan {
        interface: name.to_owned(),
        vlan,
    });
    Ok(reply)
}

pub(crate) fn trunk_allowed(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    switch(inv)?;
    let name = inv.interface_target()?;
    let spec = inv.rest_from(0).to_owned();
    inv.store()
        .update_interface(inv.device_id(), name, |iface| iface.trunk_allowed = spec)?;
    Ok(Reply::silent())
}

pub(crate) fn trunk_native(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    switch(inv)?;
    let name = inv.interface_target()?;
    let vlan = inv.vlan_arg(0)?;
    inv.store()
        .update_interface(inv.device_id(), name, |iface| iface.native_vlan = Some(vlan))?;
    Ok(Reply::silent())
}

// ── Addressing ──────────────────────────────────────────────────────

/// `ip address <ip> <mask>`. The first address configured on a device
/// also becomes its management address.
pub(crate) fn ip_address(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    if inv.args.len() != 2 {
        return Err(CommandError::Incomplete);
    }
    let name = inv.interface_target()?;
    let (ip, mask) = (inv.arg(0), inv.arg(1));
    if !is_dotted_quad(ip) {
        return Err(inv.invalid(0));
    }
    if !is_dotted_quad(mask) {
        return Err(inv.invalid(1));
    }

    let address = InterfaceAddress {
        ip: ip.to_owned(),
        mask: mask.to_owned(),
    };
    inv.store()
        .update_interface(inv.device_id(), name, |iface| iface.address = Some(address))?;
    inv.store().update_device(inv.device_id(), |dev| {
        if dev.management_ip.is_none() {
            debug!(device = %dev.id, %ip, "management address adopted from interface");
            dev.management_ip = Some(ip.to_owned());
        }
    })?;
    Ok(Reply::silent())
}

pub(crate) fn no_ip_address(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let name = inv.interface_target()?;
    let previous = inv
        .store()
        .update_interface(inv.device_id(), name, |iface| iface.address.take())?;
    if let Some(old) = previous {
        inv.store().update_device(inv.device_id(), |dev| {
            if dev.management_ip.as_deref() == Some(old.ip.as_str()) {
                dev.management_ip = None;
            }
        })?;
    }
    Ok(Reply::silent())
}
