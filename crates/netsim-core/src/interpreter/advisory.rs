// ── Advisory hints ──
//
// After a command fails, a session may ask an advisor for a one-line
// hint. The request runs as a detached task; its answer lands on the
// session's channel and is shown on the next interaction. Nothing here
// blocks the interpreter and a missing or silent advisor changes nothing.

use futures_util::FutureExt;
use futures_util::future::{self, BoxFuture};

use super::error::CommandError;
use super::matcher::match_pattern;
use super::mode::Mode;
use super::table;
use crate::model::DeviceKind;

/// What the advisor is told about a failed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintRequest {
    pub device_kind: DeviceKind,
    pub mode: Mode,
    pub command: String,
    pub error: CommandError,
}

/// Source of hints. Implementations may be slow or remote; the session
/// never awaits them inline.
pub trait Advisor: Send + Sync {
    fn advise(&self, request: HintRequest) -> BoxFuture<'static, Option<String>>;
}

/// Never has anything to say.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAdvisor;

impl Advisor for NoopAdvisor {
    fn advise(&self, _request: HintRequest) -> BoxFuture<'static, Option<String>> {
        future::ready(None).boxed()
    }
}

/// Offline hints derived from the command table.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogAdvisor;

impl CatalogAdvisor {
    pub fn hint(request: &HintRequest) -> Option<String> {
        match &request.error {
            CommandError::Unknown => {
                Some("Type '?' to list the commands available in this mode.".to_owned())
            }
            CommandError::Incomplete => Some(format!(
                "'{}' needs more input. Type '{} ?' to see what can follow.",
                request.command.trim(),
                request.command.trim()
            )),
            CommandError::VlanUnsupported => Some(format!(
                "VLANs live on switches. A {} uses routed interfaces instead.",
                request.device_kind
            )),
            CommandError::InvalidInput { .. } => Some(wrong_mode_hint(request).unwrap_or_else(
                || "Check the word under the ^ marker; type '?' after a command to see valid values."
                    .to_owned(),
            )),
            CommandError::Rejected(_) | CommandError::Internal(_) => None,
        }
    }
}

impl Advisor for CatalogAdvisor {
    fn advise(&self, request: HintRequest) -> BoxFuture<'static, Option<String>> {
        future::ready(Self::hint(&request)).boxed()
    }
}

/// If the command exists in some other mode, say how to get there.
fn wrong_mode_hint(request: &HintRequest) -> Option<String> {
    let words: Vec<&str> = request.command.split_whitespace().collect();
    let home = table::commands()
        .iter()
        .find(|spec| {
            !spec.available_in(request.mode) && match_pattern(spec.pattern, &words).is_full()
        })?;

    let hint = if home.available_in(Mode::PrivilegedExec) {
        if request.mode == Mode::UserExec {
            format!("'{}' needs privileged mode. Type 'enable' first.", home.pattern)
        } else {
            format!("Prefix EXEC commands with 'do' in configuration mode: 'do {}'.", home.pattern)
        }
    } else if home.available_in(Mode::GlobalConfig) {
        format!("'{}' is a global configuration command. Use 'exit' or 'configure terminal' to get there.", home.pattern)
    } else if home.available_in(Mode::InterfaceConfig) {
        "Select an interface first, e.g. 'interface GigabitEthernet0/1'.".to_owned()
    } else if home.available_in(Mode::VlanConfig) {
        "Enter a VLAN first, e.g. 'vlan 10'.".to_owned()
    } else {
        "Select a line first, e.g. 'line console 0'.".to_owned()
    };
    Some(hint)
}
