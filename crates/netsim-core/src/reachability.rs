// ── Reachability engine ──
//
// Physical path discovery (BFS over undirected links) followed by
// Layer-3 admission: liveness of every hop and a routing-capable device
// whenever the endpoints sit in different /24 groups. Read-only.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet, VecDeque};

use serde::Serialize;

use crate::model::{Device, DeviceId, Link};

/// Why a path query failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathFailure {
    /// Source or target id is not in the device list.
    DeviceNotFound { device: DeviceId },
    /// Missing or malformed management address.
    Configuration { device: DeviceId },
    /// No chain of links joins the two devices.
    Physical,
    /// A device on the path is down.
    LinkFailure { device: DeviceId },
    /// Different subnets and nothing on the path can route.
    Routing {
        source_subnet: String,
        target_subnet: String,
    },
}

/// Outcome of [`find_path`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathVerdict {
    pub success: bool,
    pub path: Vec<DeviceId>,
    pub hop_count: usize,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<PathFailure>,
}

impl PathVerdict {
    fn fail(failure: PathFailure, path: Vec<DeviceId>, message: String) -> Self {
        Self {
            success: false,
            path,
            hop_count: 0,
            message,
            failure: Some(failure),
        }
    }
}

/// Four dot-separated groups of 1-3 ASCII digits.
///
/// Octet values are not range-checked: `999.1.1.1` passes.
pub fn is_dotted_quad(ip: &str) -> bool {
    let groups: Vec<&str> = ip.split('.').collect();
    groups.len() == 4
        && groups
            .iter()
            .all(|g| (1..=3).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_digit()))
}

/// The fixed /24 grouping: first three dotted groups.
pub fn subnet_of(ip: &str) -> String {
    ip.split('.').take(3).collect::<Vec<_>>().join(".")
}

/// Decide whether a packet can travel from `source` to `target`.
///
/// The adjacency list is built from `links` in the order given, so the
/// chosen path is stable for a fixed input.
pub fn find_path<D: Borrow<Device>>(
    devices: &[D],
    links: &[Link],
    source: &DeviceId,
    target: &DeviceId,
) -> PathVerdict {
    let by_id: HashMap<&DeviceId, &Device> = devices
        .iter()
        .map(|d| {
            let d: &Device = d.borrow();
            (&d.id, d)
        })
        .collect();

    // 1. Resolve both endpoints.
    let (src, dst) = match (by_id.get(source), by_id.get(target)) {
        (Some(s), Some(t)) => (*s, *t),
        (None, _) => return not_found(source),
        (_, None) => return not_found(target),
    };

    // 2. Validate addressing.
    let src_ip = match checked_ip(src) {
        Ok(ip) => ip,
        Err(verdict) => return verdict,
    };
    let dst_ip = match checked_ip(dst) {
        Ok(ip) => ip,
        Err(verdict) => return verdict,
    };

    // 3. Subnet grouping.
    let src_subnet = subnet_of(src_ip);
    let dst_subnet = subnet_of(dst_ip);

    // 4-5. Physical path.
    let Some(path) = bfs(links, source, target) else {
        return PathVerdict::fail(
            PathFailure::Physical,
            Vec::new(),
            format!(
                "No physical path between {} and {}",
                src.display_name(),
                dst.display_name()
            ),
        );
    };

    // 6. Liveness: first down device wins.
    if let Some(down) = path
        .iter()
        .filter_map(|id| by_id.get(id))
        .find(|d| d.is_down())
    {
        return PathVerdict::fail(
            PathFailure::LinkFailure {
                device: down.id.clone(),
            },
            path.clone(),
            format!("Link failure: {} is down", down.display_name()),
        );
    }

    // 7. Inter-subnet traffic needs a router on the way.
    if src_subnet != dst_subnet {
        let routed = path
            .iter()
            .filter_map(|id| by_id.get(id))
            .any(|d| d.kind.is_routing_capable());
        if !routed {
            return PathVerdict::fail(
                PathFailure::Routing {
                    source_subnet: src_subnet.clone(),
                    target_subnet: dst_subnet.clone(),
                },
                path,
                format!(
                    "Routing error: {src_subnet}.0/24 and {dst_subnet}.0/24 need a router, \
                     L3 switch or firewall on the path"
                ),
            );
        }
    }

    // 8. Success.
    let hop_count = path.len() - 1;
    PathVerdict {
        success: true,
        message: format!("Reply from {dst_ip} to {src_ip}: {hop_count} hop(s)"),
        path,
        hop_count,
        failure: None,
    }
}

fn not_found(id: &DeviceId) -> PathVerdict {
    PathVerdict::fail(
        PathFailure::DeviceNotFound { device: id.clone() },
        Vec::new(),
        format!("Device not found: {id}"),
    )
}

fn checked_ip(device: &Device) -> Result<&str, PathVerdict> {
    match device.management_ip.as_deref() {
        Some(ip) if is_dotted_quad(ip) => Ok(ip),
        Some(ip) => Err(PathVerdict::fail(
            PathFailure::Configuration {
                device: device.id.clone(),
            },
            Vec::new(),
            format!(
                "Configuration error: {} has an invalid IP address '{ip}'",
                device.display_name()
            ),
        )),
        None => Err(PathVerdict::fail(
            PathFailure::Configuration {
                device: device.id.clone(),
            },
            Vec::new(),
            format!(
                "Configuration error: {} has no IP address",
                device.display_name()
            ),
        )),
    }
}

/// Unweighted shortest path; first discovery wins.
fn bfs(links: &[Link], source: &DeviceId, target: &DeviceId) -> Option<Vec<DeviceId>> {
    let mut adjacency: HashMap<&DeviceId, Vec<&DeviceId>> = HashMap::new();
    for link in links {
        adjacency.entry(&link.source).or_default().push(&link.target);
        adjacency.entry(&link.target).or_default().push(&link.source);
    }

    let mut visited: HashSet<&DeviceId> = HashSet::from([source]);
    let mut parent: HashMap<&DeviceId, &DeviceId> = HashMap::new();
    let mut queue: VecDeque<&DeviceId> = VecDeque::from([source]);

    while let Some(node) = queue.pop_front() {
        if node == target {
            let mut path = vec![node.clone()];
            let mut cursor = node;
            while let Some(&prev) = parent.get(cursor) {
                path.push(prev.clone());
                cursor = prev;
            }
            path.reverse();
            return Some(path);
        }
        for &next in adjacency.get(node).into_iter().flatten() {
            if visited.insert(next) {
                parent.insert(next, node);
                queue.push_back(next);
            }
        }
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{DeviceKind, DeviceStatus};

    fn ids(path: &[DeviceId]) -> Vec<&str> {
        path.iter().map(DeviceId::as_str).collect()
    }

    #[test]
    fn dotted_quad_checks_digit_count_only() {
        assert!(is_dotted_quad("192.168.1.10"));
        assert!(is_dotted_quad("999.999.999.999"));
        assert!(!is_dotted_quad("192.168.1"));
        assert!(!is_dotted_quad("192.168.1.1000"));
        assert!(!is_dotted_quad("192.168..1"));
        assert!(!is_dotted_quad("a.b.c.d"));
        assert!(!is_dotted_quad(""));
    }

    #[test]
    fn subnet_is_first_three_groups() {
        assert_eq!(subnet_of("10.0.1.5"), "10.0.1");
    }

    #[test]
    fn chain_scenario_takes_two_hops_through_switch() {
        let devices = vec![
            Device::new("A", "A", DeviceKind::Router),
            Device::new("B", "B", DeviceKind::SwitchL2),
            Device::new("C", "C", DeviceKind::Pc).with_ip("192.168.1.10"),
            Device::new("D", "D", DeviceKind::Pc).with_ip("192.168.1.11"),
        ];
        let links = vec![
            Link::new("e1", "A", "B"),
            Link::new("e2", "B", "C"),
            Link::new("e3", "B", "D"),
        ];
        let verdict = find_path(&devices, &links, &"C".into(), &"D".into());
        assert!(verdict.success, "{}", verdict.message);
        assert_eq!(verdict.hop_count, 2);
        assert_eq!(ids(&verdict.path), ["C", "B", "D"]);
        assert!(verdict.failure.is_none());
    }

    #[test]
    fn same_subnet_needs_no_router() {
        let devices = vec![
            Device::new("h1", "H1", DeviceKind::Pc).with_ip("192.168.1.10"),
            Device::new("s1", "S1", DeviceKind::SwitchL2),
            Device::new("s2", "S2", DeviceKind::SwitchL2),
            Device::new("h2", "H2", DeviceKind::Pc).with_ip("192.168.1.11"),
        ];
        let links = vec![
            Link::new("e1", "h1", "s1"),
            Link::new("e2", "s1", "s2"),
            Link::new("e3", "s2", "h2"),
        ];
        let verdict = find_path(&devices, &links, &"h1".into(), &"h2".into());
        assert!(verdict.success);
        assert_eq!(verdict.hop_count, 3);
    }

    #[test]
    fn cross_subnet_through_l2_only_is_a_routing_error() {
        let devices = vec![
            Device::new("h1", "H1", DeviceKind::Pc).with_ip("10.0.0.5"),
            Device::new("s1", "S1", DeviceKind::SwitchL2),
            Device::new("h2", "H2", DeviceKind::Pc).with_ip("10.0.1.5"),
        ];
        let links = vec![Link::new("e1", "h1", "s1"), Link::new("e2", "s1", "h2")];
        let verdict = find_path(&devices, &links, &"h1".into(), &"h2".into());
        assert!(!verdict.success);
        assert_eq!(
            verdict.failure,
            Some(PathFailure::Routing {
                source_subnet: "10.0.0".into(),
                target_subnet: "10.0.1".into(),
            })
        );
    }

    #[test]
    fn cross_subnet_through_router_succeeds() {
        let devices = vec![
            Device::new("h1", "H1", DeviceKind::Pc).with_ip("10.0.0.5"),
            Device::new("r1", "R1", DeviceKind::Router),
            Device::new("h2", "H2", DeviceKind::Pc).with_ip("10.0.1.5"),
        ];
        let links = vec![Link::new("e1", "h1", "r1"), Link::new("e2", "r1", "h2")];
        let verdict = find_path(&devices, &links, &"h1".into(), &"h2".into());
        assert!(verdict.success);
        assert_eq!(verdict.hop_count, 2);
    }

    #[test]
    fn down_device_short_circuits() {
        let devices = vec![
            Device::new("H", "H", DeviceKind::Pc).with_ip("192.168.1.1"),
            Device::new("G", "G", DeviceKind::SwitchL2).with_status(DeviceStatus::Down),
            Device::new("I", "I", DeviceKind::Pc).with_ip("192.168.1.2"),
        ];
        let links = vec![Link::new("e1", "H", "G"), Link::new("e2", "G", "I")];
        let verdict = find_path(&devices, &links, &"H".into(), &"I".into());
        assert!(!verdict.success);
        assert_eq!(verdict.hop_count, 0);
        assert_eq!(
            verdict.failure,
            Some(PathFailure::LinkFailure { device: "G".into() })
        );
    }

    #[test]
    fn missing_device_and_missing_ip() {
        let devices = vec![
            Device::new("a", "A", DeviceKind::Pc).with_ip("10.0.0.1"),
            Device::new("b", "B", DeviceKind::Pc),
            Device::new("c", "C", DeviceKind::Pc).with_ip("10.0.0"),
        ];
        let links = vec![Link::new("e1", "a", "b"), Link::new("e2", "a", "c")];

        let v = find_path(&devices, &links, &"a".into(), &"zz".into());
        assert_eq!(v.failure, Some(PathFailure::DeviceNotFound { device: "zz".into() }));
        assert!(v.path.is_empty());
        assert_eq!(v.hop_count, 0);

        let v = find_path(&devices, &links, &"a".into(), &"b".into());
        assert_eq!(v.failure, Some(PathFailure::Configuration { device: "b".into() }));

        let v = find_path(&devices, &links, &"c".into(), &"a".into());
        assert_eq!(v.failure, Some(PathFailure::Configuration { device: "c".into() }));
    }

    #[test]
    fn disconnected_devices_fail_physically() {
        let devices = vec![
            Device::new("a", "A", DeviceKind::Pc).with_ip("10.0.0.1"),
            Device::new("b", "B", DeviceKind::Pc).with_ip("10.0.0.2"),
        ];
        let verdict = find_path(&devices, &[], &"a".into(), &"b".into());
        assert_eq!(verdict.failure, Some(PathFailure::Physical));
    }

    #[test]
    fn repeated_queries_are_deterministic() {
        let devices = vec![
            Device::new("a", "A", DeviceKind::Pc).with_ip("10.0.0.1"),
            Device::new("s1", "S1", DeviceKind::SwitchL2),
            Device::new("s2", "S2", DeviceKind::SwitchL2),
            Device::new("b", "B", DeviceKind::Pc).with_ip("10.0.0.2"),
        ];
        // Two equal-length paths: via s1 and via s2.
        let links = vec![
            Link::new("e1", "a", "s1"),
            Link::new("e2", "a", "s2"),
            Link::new("e3", "s1", "b"),
            Link::new("e4", "s2", "b"),
        ];
        let first = find_path(&devices, &links, &"a".into(), &"b".into());
        for _ in 0..10 {
            assert_eq!(find_path(&devices, &links, &"a".into(), &"b".into()), first);
        }
        assert_eq!(ids(&first.path), ["a", "s1", "b"]);
    }

    #[test]
    fn path_to_self_is_zero_hops() {
        let devices = vec![Device::new("a", "A", DeviceKind::Pc).with_ip("10.0.0.1")];
        let verdict = find_path(&devices, &[], &"a".into(), &"a".into());
        assert!(verdict.success);
        assert_eq!(verdict.hop_count, 0);
        assert_eq!(ids(&verdict.path), ["a"]);
    }
}
