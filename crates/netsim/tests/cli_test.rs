//! Integration tests for the `netsim` CLI binary.
//!
//! Each test writes its own topology into a temp dir and points the
//! binary at it with `--topology`, so nothing touches the user's real
//! configuration.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// pc1 -- sw1 -- r1 -- pc2, with pc2 on a different /24.
const LAB: &str = r#"{
  "devices": [
    { "id": "pc1", "label": "PC1", "kind": "PC", "managementIp": "10.0.1.10" },
    { "id": "sw1", "label": "SW1", "kind": "SwitchL2", "managementIp": "10.0.1.2" },
    { "id": "r1", "label": "R1", "kind": "Router", "managementIp": "10.0.1.1" },
    { "id": "pc2", "label": "PC2", "kind": "PC", "managementIp": "10.0.2.10" },
    { "id": "pc3", "label": "PC3", "kind": "PC", "managementIp": "10.0.3.10" }
  ],
  "links": [
    { "id": "e1", "sourceId": "sw1", "targetId": "pc1" },
    { "id": "e2", "sourceId": "sw1", "targetId": "r1" },
    { "id": "e3", "sourceId": "r1", "targetId": "pc2" }
  ]
}"#;

/// Build a [`Command`] for the `netsim` binary with env isolation.
fn netsim_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("netsim");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NETSIM_DEFAULTS__BOOT_DELAY", "10ms")
        .env_remove("NETSIM_LAB")
        .env_remove("NETSIM_TOPOLOGY")
        .env_remove("NETSIM_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn write_lab(dir: &Path) -> PathBuf {
    let path = dir.join("lab.json");
    std::fs::write(&path, LAB).unwrap();
    path
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = netsim_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_subcommands() {
    let home = tempfile::tempdir().unwrap();
    netsim_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("console")
            .and(predicate::str::contains("ping"))
            .and(predicate::str::contains("validate")),
    );
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    netsim_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Topology selection ──────────────────────────────────────────────

#[test]
fn test_no_topology_is_a_config_error() {
    let home = tempfile::tempdir().unwrap();
    netsim_cmd(home.path())
        .args(["devices", "list"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("No topology selected"));
}

#[test]
fn test_unknown_device_exits_not_found() {
    let home = tempfile::tempdir().unwrap();
    let lab = write_lab(home.path());
    netsim_cmd(home.path())
        .arg("-t")
        .arg(&lab)
        .args(["ports", "nope"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("devices list"));
}

#[test]
fn test_config_init_registers_default_lab() {
    let home = tempfile::tempdir().unwrap();
    let lab = write_lab(home.path());
    let config = home.path().join("netsim.toml");

    netsim_cmd(home.path())
        .arg("--config")
        .arg(&config)
        .arg("config")
        .arg("init")
        .arg(&lab)
        .args(["--name", "campus"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5 devices, 3 links"));

    let text = std::fs::read_to_string(&config).unwrap();
    assert!(text.contains("default_lab = \"campus\""), "{text}");

    // The lab is now picked up without --topology.
    netsim_cmd(home.path())
        .arg("--config")
        .arg(&config)
        .args(["-o", "plain", "devices", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sw1"));

    // Re-registering without a terminal needs --yes.
    netsim_cmd(home.path())
        .arg("--config")
        .arg(&config)
        .arg("config")
        .arg("init")
        .arg(&lab)
        .args(["--name", "campus"])
        .assert()
        .code(2);
}

// ── Inspection ──────────────────────────────────────────────────────

#[test]
fn test_ports_follow_link_order() {
    let home = tempfile::tempdir().unwrap();
    let lab = write_lab(home.path());
    netsim_cmd(home.path())
        .arg("-t")
        .arg(&lab)
        .args(["-o", "plain", "ports", "SW1"])
        .assert()
        .success()
        .stdout("GigabitEthernet0/1\nGigabitEthernet0/2\n");
}

#[test]
fn test_links_json_reports_ports() {
    let home = tempfile::tempdir().unwrap();
    let lab = write_lab(home.path());
    let output = netsim_cmd(home.path())
        .arg("-t")
        .arg(&lab)
        .args(["-o", "json", "links", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let links: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(links[1]["id"], "e2");
    assert_eq!(links[1]["source_port"], "Gi0/2");
    assert_eq!(links[1]["target_port"], "Gi0/1");
    assert_eq!(links[1]["down"], false);
}

#[test]
fn test_commands_filtered_by_mode() {
    let home = tempfile::tempdir().unwrap();
    netsim_cmd(home.path())
        .args(["-o", "plain", "commands", "--mode", "vlan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name <name>").and(predicate::str::contains("enable").not()));
}

#[test]
fn test_validate_warns_on_pc_to_pc() {
    let home = tempfile::tempdir().unwrap();
    netsim_cmd(home.path())
        .args(["--color", "never", "validate", "pc", "pc"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[warning]"));

    netsim_cmd(home.path())
        .args(["validate", "pc", "toaster"])
        .assert()
        .code(2);
}

#[test]
fn test_links_add_prints_advice_and_saves() {
    let home = tempfile::tempdir().unwrap();
    let lab = write_lab(home.path());
    netsim_cmd(home.path())
        .arg("-t")
        .arg(&lab)
        .args(["--color", "never", "links", "add", "PC3", "PC1", "--save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[warning] Direct PC-to-PC link"));

    let output = netsim_cmd(home.path())
        .arg("-t")
        .arg(&lab)
        .args(["-o", "plain", "links", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().count(), 4);
}

// ── Reachability ────────────────────────────────────────────────────

#[test]
fn test_ping_through_router() {
    let home = tempfile::tempdir().unwrap();
    let lab = write_lab(home.path());
    netsim_cmd(home.path())
        .arg("-t")
        .arg(&lab)
        .args(["--color", "never", "ping", "PC1", "PC2"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Path: PC1 -> SW1 -> R1 -> PC2")
                .and(predicate::str::contains("Hops: 3")),
        );
}

#[test]
fn test_ping_without_path_fails() {
    let home = tempfile::tempdir().unwrap();
    let lab = write_lab(home.path());
    netsim_cmd(home.path())
        .arg("-t")
        .arg(&lab)
        .args(["ping", "pc1", "pc3"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("PC1 cannot reach PC3"));
}

// ── Console ─────────────────────────────────────────────────────────

#[test]
fn test_console_script_echoes_prompts() {
    let home = tempfile::tempdir().unwrap();
    let lab = write_lab(home.path());
    netsim_cmd(home.path())
        .arg("-t")
        .arg(&lab)
        .args(["console", "sw1", "--no-hints"])
        .write_stdin("en\nconf t\nvlan 10\nend\nshow vlan brief\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("SW1>en\n")
                .and(predicate::str::contains("SW1(config)#vlan 10\n"))
                .and(predicate::str::contains("SW1(config-vlan)#end\n"))
                .and(predicate::str::contains("10   VLAN0010")),
        );
}

#[test]
fn test_console_errors_are_inline() {
    let home = tempfile::tempdir().unwrap();
    let lab = write_lab(home.path());
    netsim_cmd(home.path())
        .arg("-t")
        .arg(&lab)
        .args(["console", "r1", "--no-hints"])
        .write_stdin("bogus\nshow\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("% Unknown command.")
                .and(predicate::str::contains("% Incomplete command.")),
        );
}

#[test]
fn test_console_save_writes_topology() {
    let home = tempfile::tempdir().unwrap();
    let lab = write_lab(home.path());
    let script = home.path().join("setup.txt");
    std::fs::write(
        &script,
        "enable\nconfigure terminal\nhostname Core\nvlan 20\nname USERS\nend\nreload\nshow vlan brief\n",
    )
    .unwrap();

    netsim_cmd(home.path())
        .arg("-t")
        .arg(&lab)
        .args(["console", "sw1", "--save", "--script"])
        .arg(&script)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Press RETURN to get started!")
                .and(predicate::str::contains("Core>show vlan brief")),
        );

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&lab).unwrap()).unwrap();
    let sw1 = saved["devices"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["id"] == "sw1")
        .unwrap();
    assert_eq!(sw1["hostname"], "Core");
    assert_eq!(sw1["vlanTable"]["20"], "USERS");
    assert_eq!(sw1["status"], "up");
}
