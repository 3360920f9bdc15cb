// ── Display-state synchronisation ──
//
// Some commands have a visible side effect on a neighbouring device:
// assigning an access VLAN to a switch port tags the end host cabled to
// it. This runs after the store mutation, outside the handler, and only
// ever touches the neighbour's display tag.

use tracing::debug;

use crate::error::CoreError;
use crate::model::DeviceId;
use crate::ports::port_for_interface;
use crate::store::ConfigStore;

/// Deferred follow-up produced by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DisplaySync {
    AccessVlan { interface: String, vlan: u16 },
}

/// Tag the end host cabled to `interface` on `device` with `vlan`.
///
/// The port is found by the interface's trailing index in the current
/// port map. Only PCs, printers and servers are tagged. Returns the
/// device that was updated, if any.
pub fn propagate_access_vlan(
    store: &ConfigStore,
    device: &DeviceId,
    interface: &str,
    vlan: u16,
) -> Result<Option<DeviceId>, CoreError> {
    let links = store.links_snapshot();
    let Some(port) = port_for_interface(device, interface, &links) else {
        debug!(%device, %interface, "no cable on this port; nothing to tag");
        return Ok(None);
    };
    let Some(neighbor) = store.device(&port.neighbor) else {
        return Ok(None);
    };
    if !neighbor.kind.is_end_host() {
        debug!(neighbor = %neighbor.id, kind = %neighbor.kind, "neighbor is not an end host");
        return Ok(None);
    }
    store.set_display_vlan(&neighbor.id, Some(vlan))?;
    debug!(%device, %interface, neighbor = %neighbor.id, vlan, "display VLAN propagated");
    Ok(Some(neighbor.id))
}

pub(crate) fn apply(
    store: &ConfigStore,
    device: &DeviceId,
    sync: &DisplaySync,
) -> Result<Option<DeviceId>, CoreError> {
    match sync {
        DisplaySync::AccessVlan { interface, vlan } => {
            propagate_access_vlan(store, device, interface, *vlan)
        }
    }
}
