// ── EXEC-level commands ──

use tracing::{debug, info};

use crate::interpreter::error::CommandError;
use crate::interpreter::mode::Mode;
use crate::interpreter::render;
use crate::interpreter::table::{Invocation, Reply, Transition};
use crate::model::Device;
use crate::reachability::{PathVerdict, is_dotted_quad};

const ECHO_COUNT: usize = 5;

pub(crate) fn enable(_: &Invocation<'_>) -> Result<Reply, CommandError> {
    Ok(Reply::enter(Mode::PrivilegedExec, None))
}

pub(crate) fn disable(_: &Invocation<'_>) -> Result<Reply, CommandError> {
    Ok(Reply::enter(Mode::UserExec, None))
}

pub(crate) fn configure(_: &Invocation<'_>) -> Result<Reply, CommandError> {
    Ok(
        Reply::lines(["Enter configuration commands, one per line.  End with CNTL/Z."])
            .with_transition(Transition::Enter(Mode::GlobalConfig, None)),
    )
}

pub(crate) fn reload(_: &Invocation<'_>) -> Result<Reply, CommandError> {
    Ok(Reply::lines([
        "Proceed with reload? [confirm]",
        "",
        "%SYS-5-RELOAD: Reload requested by console. Reload Reason: Reload Command.",
    ])
    .with_transition(Transition::Reload))
}

pub(crate) fn clear_screen(_: &Invocation<'_>) -> Result<Reply, CommandError> {
    Ok(Reply {
        clear_transcript: true,
        ..Reply::silent()
    })
}

pub(crate) fn copy_run_start(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    save_startup(inv)?;
    Ok(Reply::lines([
        "Destination filename [startup-config]?",
        "Building configuration...",
        "[OK]",
    ]))
}

pub(crate) fn write_memory(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    save_startup(inv)?;
    Ok(Reply::lines(["Building configuration...", "[OK]"]))
}

fn save_startup(inv: &Invocation<'_>) -> Result<(), CommandError> {
    let device = inv.device()?;
    let body = render::running_config(&device, &inv.store().port_map(&device.id));
    inv.store()
        .save_startup_config(&device.id, body.join("\n"))?;
    info!(device = %device.id, "running-config saved to startup-config");
    Ok(())
}

// ── Connectivity ────────────────────────────────────────────────────

/// Address-resolve `ip` and run the reachability engine from this device.
fn probe(inv: &Invocation<'_>, ip: &str) -> Result<Option<PathVerdict>, CommandError> {
    if !is_dotted_quad(ip) {
        return Err(CommandError::Rejected(
            "Unrecognized host or address, or protocol not running.".into(),
        ));
    }
    let Some(target) = inv.store().device_by_ip(ip) else {
        debug!(%ip, "no device owns this address");
        return Ok(None);
    };
    let verdict = inv.store().find_path(inv.device_id(), &target.id);
    debug!(
        %ip,
        success = verdict.success,
        hops = verdict.hop_count,
        message = %verdict.message,
        "path query"
    );
    Ok(Some(verdict))
}

pub(crate) fn ping(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let ip = inv.arg(0);
    let verdict = probe(inv, ip)?;

    let mut lines = vec![
        "Type escape sequence to abort.".to_owned(),
        format!("Sending {ECHO_COUNT}, 100-byte ICMP Echos to {ip}, timeout is 2 seconds:"),
    ];
    match verdict {
        Some(v) if v.success => {
            let base = v.hop_count.max(1);
            lines.push("!".repeat(ECHO_COUNT));
            lines.push(format!(
                "Success rate is 100 percent ({ECHO_COUNT}/{ECHO_COUNT}), round-trip min/avg/max = {}/{}/{} ms",
                base,
                base * 2,
                base * 4
            ));
        }
        _ => {
            lines.push(".".repeat(ECHO_COUNT));
            lines.push(format!("Success rate is 0 percent (0/{ECHO_COUNT})"));
        }
    }
    Ok(Reply::lines(lines))
}

pub(crate) fn traceroute(inv: &Invocation<'_>) -> Result<Reply, CommandError> {
    let ip = inv.arg(0);
    let verdict = probe(inv, ip)?;

    let mut lines = vec![
        "Type escape sequence to abort.".to_owned(),
        format!("Tracing the route to {ip}"),
        String::new(),
    ];
    match verdict {
        Some(v) if v.success => {
            for (hop, id) in v.path.iter().skip(1).enumerate() {
                let label = inv
                    .store()
                    .device(id)
                    .map_or_else(|| id.to_string(), |d| hop_label(&d));
                let ms = hop + 1;
                lines.push(format!("  {ms} {label} {ms} msec {ms} msec {ms} msec"));
            }
        }
        Some(v) => {
            lines.push("  1  *  *  *".to_owned());
            lines.push(format!("Trace aborted: {}", v.message));
        }
        None => lines.push("  1  *  *  *".to_owned()),
    }
    Ok(Reply::lines(lines))
}

fn hop_label(device: &Device) -> String {
    match &device.management_ip {
        Some(ip) => format!("{ip} ({})", device.display_name()),
        None => device.display_name().to_owned(),
    }
}
