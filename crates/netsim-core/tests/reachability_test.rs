#![allow(clippy::unwrap_used)]
// Path queries through the store snapshot and the console `ping`.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use netsim_core::{
    ConfigStore, Device, DeviceId, DeviceKind, DeviceStatus, Link, PathFailure, Session,
    SessionConfig, Topology,
};

// ── Helpers ─────────────────────────────────────────────────────────

/// A - B - C, B - D. B is a router; A, C, D are hosts.
fn chain() -> ConfigStore {
    ConfigStore::from_topology(Topology::new(
        vec![
            Device::new("a", "A", DeviceKind::Pc).with_ip("10.0.1.10"),
            Device::new("b", "B", DeviceKind::Router).with_ip("10.0.1.1"),
            Device::new("c", "C", DeviceKind::Pc).with_ip("10.0.2.10"),
            Device::new("d", "D", DeviceKind::Server).with_ip("10.0.3.10"),
        ],
        vec![
            Link::new("ab", "a", "b"),
            Link::new("bc", "b", "c"),
            Link::new("bd", "b", "d"),
        ],
    ))
    .unwrap()
}

fn ids(path: &[DeviceId]) -> Vec<&str> {
    path.iter().map(DeviceId::as_str).collect()
}

// ── Store-level queries ─────────────────────────────────────────────

#[test]
fn test_chain_path_through_router() {
    let store = chain();
    let verdict = store.find_path(&"c".into(), &"d".into());
    assert!(verdict.success, "{}", verdict.message);
    assert_eq!(ids(&verdict.path), ["c", "b", "d"]);
    assert_eq!(verdict.hop_count, 2);
}

#[test]
fn test_same_query_same_answer() {
    let store = chain();
    let first = store.find_path(&"a".into(), &"d".into());
    for _ in 0..10 {
        assert_eq!(store.find_path(&"a".into(), &"d".into()), first);
    }
}

#[test]
fn test_cross_subnet_without_router_fails() {
    let store = ConfigStore::from_topology(Topology::new(
        vec![
            Device::new("h1", "H1", DeviceKind::Pc).with_ip("10.0.1.10"),
            Device::new("sw", "SW", DeviceKind::SwitchL2).with_ip("10.0.1.2"),
            Device::new("h2", "H2", DeviceKind::Pc).with_ip("10.0.2.10"),
        ],
        vec![Link::new("1", "h1", "sw"), Link::new("2", "sw", "h2")],
    ))
    .unwrap();
    let verdict = store.find_path(&"h1".into(), &"h2".into());
    assert!(!verdict.success);
    assert_eq!(
        verdict.failure,
        Some(PathFailure::Routing {
            source_subnet: "10.0.1".into(),
            target_subnet: "10.0.2".into(),
        })
    );
}

#[test]
fn test_down_device_on_path_short_circuits() {
    let store = chain();
    store.set_status(&"b".into(), DeviceStatus::Down).unwrap();
    let verdict = store.find_path(&"a".into(), &"c".into());
    assert!(!verdict.success);
    assert_eq!(verdict.hop_count, 0);
    assert_eq!(
        verdict.failure,
        Some(PathFailure::LinkFailure { device: "b".into() })
    );
}

#[test]
fn test_removing_a_link_breaks_the_path() {
    let store = chain();
    store.remove_link(&"bd".into()).unwrap();
    let verdict = store.find_path(&"a".into(), &"d".into());
    assert_eq!(verdict.failure, Some(PathFailure::Physical));
}

// ── Console ─────────────────────────────────────────────────────────

#[test]
fn test_ping_and_traceroute_from_console() {
    let store = Arc::new(chain());
    let mut s = Session::open(Arc::clone(&store), "c".into(), SessionConfig::default()).unwrap();

    let resp = s.execute("ping 10.0.3.10");
    assert_eq!(
        resp.lines,
        [
            "Type escape sequence to abort.",
            "Sending 5, 100-byte ICMP Echos to 10.0.3.10, timeout is 2 seconds:",
            "!!!!!",
            "Success rate is 100 percent (5/5), round-trip min/avg/max = 2/4/8 ms",
        ]
    );

    let resp = s.execute("traceroute 10.0.3.10");
    assert_eq!(
        resp.lines[3..],
        [
            "  1 10.0.1.1 (B) 1 msec 1 msec 1 msec",
            "  2 10.0.3.10 (D) 2 msec 2 msec 2 msec",
        ]
    );

    let resp = s.execute("ping 172.16.0.1");
    assert_eq!(resp.lines[2], ".....");
    assert_eq!(resp.lines[3], "Success rate is 0 percent (0/5)");

    let resp = s.execute("ping nowhere");
    assert!(resp.is_error());
}

#[test]
fn test_ping_sees_console_configuration() {
    let store = Arc::new(chain());
    let mut router = Session::open(Arc::clone(&store), "b".into(), SessionConfig::default()).unwrap();
    for line in ["en", "conf t", "int g0/1", "shutdown"] {
        assert!(!router.execute(line).is_error());
    }
    // Shut interfaces are display-only: the path still resolves.
    assert!(store.find_path(&"a".into(), &"c".into()).success);

    store.set_status(&"b".into(), DeviceStatus::Down).unwrap();
    let mut host = Session::open(Arc::clone(&store), "a".into(), SessionConfig::default()).unwrap();
    assert_eq!(host.execute("ping 10.0.2.10").lines[2], ".....");
}
