// ── Topology-wide configuration store ──
//
// Shared, long-lived state: every device record plus the link set.
// Sessions and the reachability engine receive an `Arc<ConfigStore>`;
// nothing here is ambient or global.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::collection::EntityCollection;
use crate::error::CoreError;
use crate::model::{
    Device, DeviceId, DeviceStatus, InterfaceConfig, LineConfig, Link, LinkId, Topology,
};
use crate::ports::{self, PortMapping};
use crate::reachability::{self, PathVerdict};

/// Highest VLAN id a switch accepts.
pub const MAX_VLAN: u16 = 4094;

/// Default name given to a VLAN created without one: `VLAN0010`.
pub fn default_vlan_name(vlan: u16) -> String {
    format!("VLAN{vlan:04}")
}

/// Central store for device configuration and the link graph.
///
/// Device writes lock only the shard holding that device, so concurrent
/// sessions on different devices never contend. Links live behind an
/// `ArcSwap` and are replaced wholesale, so a reader always sees one
/// consistent link set.
pub struct ConfigStore {
    devices: EntityCollection<DeviceId, Device>,
    links: ArcSwap<Vec<Link>>,
    revision: watch::Sender<u64>,
}

impl ConfigStore {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0u64);
        Self {
            devices: EntityCollection::new(),
            links: ArcSwap::from_pointee(Vec::new()),
            revision,
        }
    }

    /// Build a store pre-populated from a topology document.
    pub fn from_topology(topology: Topology) -> Result<Self, CoreError> {
        let store = Self::new();
        store.load(topology)?;
        Ok(store)
    }

    /// Replace the entire contents with `topology`.
    ///
    /// Rejects duplicate device/link ids and links to unknown devices;
    /// on error the store is left empty.
    pub fn load(&self, topology: Topology) -> Result<(), CoreError> {
        self.devices.clear();
        self.links.store(Arc::new(Vec::new()));

        let result = self.load_entries(topology);

        if result.is_err() {
            self.devices.clear();
            self.links.store(Arc::new(Vec::new()));
        }
        self.bump();
        info!(
            devices = self.devices.len(),
            links = self.links.load().len(),
            "topology loaded"
        );
        result
    }

    /// Export the current state as a topology document.
    pub fn to_topology(&self) -> Topology {
        Topology {
            devices: self
                .devices
                .snapshot()
                .iter()
                .map(|d| (**d).clone())
                .collect(),
            links: Vec::clone(&self.links.load()),
        }
    }

    // ── Topology management ──────────────────────────────────────────

    pub fn add_device(&self, mut device: Device) -> Result<(), CoreError> {
        if device.hostname.is_empty() {
            device.hostname.clone_from(&device.label);
        }
        let id = device.id.clone();
        if !self.devices.insert_new(id.clone(), device) {
            return Err(CoreError::DuplicateDevice { id });
        }
        debug!(device = %id, "device added");
        self.bump();
        Ok(())
    }

    /// Remove a device together with every link touching it.
    pub fn remove_device(&self, id: &DeviceId) -> Result<Device, CoreError> {
        let removed = self
            .devices
            .remove(id)
            .ok_or_else(|| CoreError::DeviceNotFound { id: id.clone() })?;
        self.links.rcu(|links| {
            links
                .iter()
                .filter(|l| !l.touches(id))
                .cloned()
                .collect::<Vec<_>>()
        });
        debug!(device = %id, "device removed");
        self.bump();
        Ok(removed)
    }

    pub fn add_link(&self, link: Link) -> Result<(), CoreError> {
        for end in [&link.source, &link.target] {
            if !self.devices.contains(end) {
                return Err(CoreError::DanglingLink {
                    id: link.id.clone(),
                    device: end.clone(),
                });
            }
        }
        if self.links.load().iter().any(|l| l.id == link.id) {
            return Err(CoreError::DuplicateLink { id: link.id });
        }
        debug!(link = %link.id, source = %link.source, target = %link.target, "link added");
        self.links.rcu(|links| {
            let mut next = Vec::clone(links);
            next.push(link.clone());
            next
        });
        self.bump();
        Ok(())
    }

    /// Cable two devices together under a freshly generated link id.
    pub fn connect(&self, source: &DeviceId, target: &DeviceId) -> Result<LinkId, CoreError> {
        let id = LinkId::generate();
        self.add_link(Link::new(id.clone(), source.clone(), target.clone()))?;
        Ok(id)
    }

    pub fn remove_link(&self, id: &LinkId) -> Result<Link, CoreError> {
        let current = self.links.load();
        let link = current
            .iter()
            .find(|l| &l.id == id)
            .cloned()
            .ok_or_else(|| CoreError::LinkNotFound { id: id.clone() })?;
        self.links.rcu(|links| {
            links
                .iter()
                .filter(|l| &l.id != id)
                .cloned()
                .collect::<Vec<_>>()
        });
        self.bump();
        Ok(link)
    }

    // ── Snapshot reads ───────────────────────────────────────────────

    /// Owned copy of one device record.
    pub fn device(&self, id: &DeviceId) -> Option<Device> {
        self.devices.get(id)
    }

    pub fn devices_snapshot(&self) -> Arc<Vec<Arc<Device>>> {
        self.devices.snapshot()
    }

    pub fn links_snapshot(&self) -> Arc<Vec<Link>> {
        self.links.load_full()
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.load().len()
    }

    /// The device whose management address is exactly `ip`.
    pub fn device_by_ip(&self, ip: &str) -> Option<Arc<Device>> {
        self.devices_snapshot()
            .iter()
            .find(|d| d.management_ip.as_deref() == Some(ip))
            .cloned()
    }

    /// Resolve a user-supplied reference: exact id first, then hostname
    /// or label (case-insensitive).
    pub fn find_device(&self, needle: &str) -> Option<Arc<Device>> {
        let snap = self.devices_snapshot();
        snap.iter()
            .find(|d| d.id.as_str() == needle)
            .or_else(|| {
                snap.iter().find(|d| {
                    d.hostname.eq_ignore_ascii_case(needle) || d.label.eq_ignore_ascii_case(needle)
                })
            })
            .cloned()
    }

    /// Monotonic counter bumped on every mutation.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Watch the revision counter. Readers pull fresh snapshots when it moves.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    // ── Device configuration ─────────────────────────────────────────

    /// Apply `f` to one device under its entry lock.
    pub fn update_device<R>(
        &self,
        id: &DeviceId,
        f: impl FnOnce(&mut Device) -> R,
    ) -> Result<R, CoreError> {
        let out = self
            .devices
            .update(id, f)
            .ok_or_else(|| CoreError::DeviceNotFound { id: id.clone() })?;
        self.bump();
        Ok(out)
    }

    /// Create the interface with defaults if absent. Never resets an
    /// existing record.
    pub fn ensure_interface(&self, id: &DeviceId, name: &str) -> Result<InterfaceConfig, CoreError> {
        self.update_device(id, |dev| {
            dev.interface_table
                .entry(name.to_owned())
                .or_insert_with(|| InterfaceConfig::new(name))
                .clone()
        })
    }

    /// Field-level update of an interface `ensure_interface` already created.
    pub fn update_interface<R>(
        &self,
        id: &DeviceId,
        name: &str,
        f: impl FnOnce(&mut InterfaceConfig) -> R,
    ) -> Result<R, CoreError> {
        self.update_device(id, |dev| dev.interface_table.get_mut(name).map(f))?
            .ok_or_else(|| CoreError::InterfaceMissing {
                device: id.clone(),
                name: name.to_owned(),
            })
    }

    /// Create VLAN `vlan` (default name `VLANnnnn`) or rename it when
    /// `name` is given. Returns `true` if the VLAN was created.
    pub fn set_vlan(&self, id: &DeviceId, vlan: u16, name: Option<&str>) -> Result<bool, CoreError> {
        if vlan == 0 || vlan > MAX_VLAN {
            return Err(CoreError::VlanOutOfRange { vlan });
        }
        self.update_device(id, |dev| {
            if !dev.kind.supports_vlans() {
                warn!(device = %dev.id, kind = %dev.kind, "VLAN operation on non-switch");
                return Err(CoreError::VlanUnsupported {
                    device: dev.id.clone(),
                    kind: dev.kind,
                });
            }
            let created = !dev.vlan_table.contains_key(&vlan);
            match (created, name) {
                (_, Some(name)) => {
                    dev.vlan_table.insert(vlan, name.to_owned());
                }
                (true, None) => {
                    dev.vlan_table.insert(vlan, default_vlan_name(vlan));
                }
                (false, None) => {}
            }
            Ok(created)
        })?
    }

    /// Delete a VLAN. Returns `false` if it did not exist.
    pub fn remove_vlan(&self, id: &DeviceId, vlan: u16) -> Result<bool, CoreError> {
        if vlan == crate::model::device::DEFAULT_VLAN {
            return Err(CoreError::DefaultVlanProtected);
        }
        self.update_device(id, |dev| {
            if !dev.kind.supports_vlans() {
                return Err(CoreError::VlanUnsupported {
                    device: dev.id.clone(),
                    kind: dev.kind,
                });
            }
            Ok(dev.vlan_table.remove(&vlan).is_some())
        })?
    }

    pub fn set_hostname(&self, id: &DeviceId, hostname: &str) -> Result<(), CoreError> {
        self.update_device(id, |dev| dev.hostname = hostname.to_owned())
    }

    pub fn set_routing(&self, id: &DeviceId, enabled: bool) -> Result<(), CoreError> {
        self.update_device(id, |dev| dev.routing_enabled = enabled)
    }

    pub fn set_management_ip(&self, id: &DeviceId, ip: Option<String>) -> Result<(), CoreError> {
        self.update_device(id, |dev| dev.management_ip = ip)
    }

    pub fn set_display_vlan(&self, id: &DeviceId, vlan: Option<u16>) -> Result<(), CoreError> {
        self.update_device(id, |dev| dev.display_vlan = vlan)
    }

    pub fn set_status(&self, id: &DeviceId, status: DeviceStatus) -> Result<(), CoreError> {
        self.update_device(id, |dev| dev.status = status)
    }

    /// Update a console/vty line, creating it on first touch.
    pub fn update_line<R>(
        &self,
        id: &DeviceId,
        line: &str,
        f: impl FnOnce(&mut LineConfig) -> R,
    ) -> Result<R, CoreError> {
        self.update_device(id, |dev| f(dev.lines.entry(line.to_owned()).or_default()))
    }

    pub fn save_startup_config(&self, id: &DeviceId, rendered: String) -> Result<(), CoreError> {
        self.update_device(id, |dev| dev.startup_config = Some(rendered))
    }

    // ── Ports ────────────────────────────────────────────────────────

    /// Current port table for `id`, derived from the live link set.
    pub fn port_map(&self, id: &DeviceId) -> Vec<PortMapping> {
        ports::port_map(id, &self.links.load())
    }

    /// Display-only link state: either endpoint has a shut interface.
    pub fn link_is_down(&self, link: &Link) -> bool {
        ports::link_is_down(
            self.devices.get(&link.source).as_ref(),
            self.devices.get(&link.target).as_ref(),
        )
    }

    // ── Reachability ─────────────────────────────────────────────────

    /// Run the reachability engine over a consistent snapshot.
    pub fn find_path(&self, source: &DeviceId, target: &DeviceId) -> PathVerdict {
        let devices = self.devices_snapshot();
        let links = self.links_snapshot();
        reachability::find_path(&devices, &links, source, target)
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn load_entries(&self, topology: Topology) -> Result<(), CoreError> {
        for device in topology.devices {
            self.add_device(device)?;
        }
        for link in topology.links {
            self.add_link(link)?;
        }
        Ok(())
    }

    fn bump(&self) {
        self.revision.send_modify(|v| *v += 1);
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{DeviceKind, SwitchportMode};

    fn store() -> ConfigStore {
        let store = ConfigStore::new();
        store
            .add_device(Device::new("sw1", "SW1", DeviceKind::SwitchL2))
            .unwrap();
        store
            .add_device(Device::new("r1", "R1", DeviceKind::Router))
            .unwrap();
        store
    }

    #[test]
    fn ensure_interface_is_idempotent() {
        let store = store();
        let id = DeviceId::from("sw1");
        store.ensure_interface(&id, "GigabitEthernet0/1").unwrap();
        store
            .update_interface(&id, "GigabitEthernet0/1", |i| {
                i.shutdown = true;
                i.access_vlan = 10;
            })
            .unwrap();

        let again = store.ensure_interface(&id, "GigabitEthernet0/1").unwrap();
        assert!(again.shutdown);
        assert_eq!(again.access_vlan, 10);
        assert_eq!(store.device(&id).unwrap().interface_table.len(), 1);
    }

    #[test]
    fn update_missing_interface_is_an_invariant_violation() {
        let store = store();
        let err = store
            .update_interface(&"sw1".into(), "GigabitEthernet0/9", |i| {
                i.switchport_mode = SwitchportMode::Trunk;
            })
            .unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn set_vlan_uses_zero_padded_default_name() {
        let store = store();
        let id = DeviceId::from("sw1");
        assert!(store.set_vlan(&id, 10, None).unwrap());
        assert_eq!(store.device(&id).unwrap().vlan_name(10), Some("VLAN0010"));

        // Re-creating keeps the existing name; an explicit name renames.
        store.set_vlan(&id, 10, Some("USERS")).unwrap();
        assert!(!store.set_vlan(&id, 10, None).unwrap());
        assert_eq!(store.device(&id).unwrap().vlan_name(10), Some("USERS"));
    }

    #[test]
    fn vlan_operations_rejected_on_router() {
        let store = store();
        let err = store.set_vlan(&"r1".into(), 10, None).unwrap_err();
        assert!(matches!(err, CoreError::VlanUnsupported { .. }));
        assert!(store.device(&"r1".into()).unwrap().vlan_table.is_empty());
    }

    #[test]
    fn vlan_range_enforced() {
        let store = store();
        assert_eq!(
            store.set_vlan(&"sw1".into(), 4095, None).unwrap_err(),
            CoreError::VlanOutOfRange { vlan: 4095 }
        );
        assert_eq!(
            store.remove_vlan(&"sw1".into(), 1).unwrap_err(),
            CoreError::DefaultVlanProtected
        );
    }

    #[test]
    fn remove_device_drops_incident_links() {
        let store = store();
        store.add_device(Device::new("pc1", "PC1", DeviceKind::Pc)).unwrap();
        store.add_link(Link::new("e1", "sw1", "r1")).unwrap();
        store.add_link(Link::new("e2", "sw1", "pc1")).unwrap();

        store.remove_device(&"r1".into()).unwrap();
        let links = store.links_snapshot();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].id.as_str(), "e2");
    }

    #[test]
    fn dangling_and_duplicate_links_rejected() {
        let store = store();
        assert!(matches!(
            store.add_link(Link::new("e1", "sw1", "ghost")),
            Err(CoreError::DanglingLink { .. })
        ));
        store.add_link(Link::new("e1", "sw1", "r1")).unwrap();
        assert!(matches!(
            store.add_link(Link::new("e1", "r1", "sw1")),
            Err(CoreError::DuplicateLink { .. })
        ));
    }

    #[test]
    fn load_rejects_duplicates_and_leaves_store_empty() {
        let store = ConfigStore::new();
        let topo = Topology::new(
            vec![
                Device::new("a", "A", DeviceKind::Pc),
                Device::new("a", "A2", DeviceKind::Pc),
            ],
            vec![],
        );
        assert!(store.load(topo).is_err());
        assert_eq!(store.device_count(), 0);
    }

    #[test]
    fn topology_round_trip_preserves_link_order() {
        let store = store();
        store.add_device(Device::new("pc1", "PC1", DeviceKind::Pc)).unwrap();
        store.add_link(Link::new("z9", "sw1", "pc1")).unwrap();
        store.add_link(Link::new("a1", "sw1", "r1")).unwrap();

        let exported = store.to_topology();
        let ids: Vec<&str> = exported.links.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["z9", "a1"]);

        let reloaded = ConfigStore::from_topology(exported.clone()).unwrap();
        assert_eq!(reloaded.to_topology(), exported);
    }

    #[test]
    fn lookups_by_ip_and_name() {
        let store = store();
        store
            .set_management_ip(&"r1".into(), Some("10.0.0.1".into()))
            .unwrap();
        assert_eq!(store.device_by_ip("10.0.0.1").unwrap().id.as_str(), "r1");
        assert!(store.device_by_ip("10.0.0.2").is_none());

        store.set_hostname(&"sw1".into(), "Access-SW").unwrap();
        assert_eq!(store.find_device("access-sw").unwrap().id.as_str(), "sw1");
        assert_eq!(store.find_device("r1").unwrap().id.as_str(), "r1");
    }

    #[test]
    fn revision_moves_on_every_mutation() {
        let store = store();
        let before = store.revision();
        store.set_routing(&"r1".into(), true).unwrap();
        assert!(store.revision() > before);
    }

    #[test]
    fn port_helpers_read_live_links() {
        let store = store();
        store.add_link(Link::new("e2", "sw1", "r1")).unwrap();
        let map = store.port_map(&"sw1".into());
        assert_eq!(map.len(), 1);
        assert_eq!(map[0].name, "GigabitEthernet0/1");

        let link = store.links_snapshot()[0].clone();
        assert!(!store.link_is_down(&link));
        store.ensure_interface(&"r1".into(), "Loopback0").unwrap();
        store
            .update_interface(&"r1".into(), "Loopback0", |i| i.shutdown = true)
            .unwrap();
        assert!(store.link_is_down(&link));
    }

    #[test]
    fn lines_are_created_on_first_touch() {
        let store = store();
        store
            .update_line(&"r1".into(), "con 0", |l| l.password = Some("cisco".into()))
            .unwrap();
        let dev = store.device(&"r1".into()).unwrap();
        assert_eq!(dev.lines["con 0"].password.as_deref(), Some("cisco"));
        assert!(!dev.lines["con 0"].login);
    }
}
