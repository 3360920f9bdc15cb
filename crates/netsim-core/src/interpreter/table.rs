// ── Declarative command table ──
//
// Every command the interpreter understands is one row: the modes it is
// legal in, its canonical pattern, how many trailing arguments it takes,
// and the handler. The table is enumerable, so help listings come from
// the same data the resolver uses.

use super::display_sync::DisplaySync;
use super::error::CommandError;
use super::handlers::{common, exec, global, interface, show, submode};
use super::matcher::{Match, Token, abbreviates, match_pattern, tokenize};
use super::mode::{Mode, Target};
use crate::error::CoreError;
use crate::model::{Device, DeviceId};
use crate::store::ConfigStore;
use crate::store::MAX_VLAN;

pub(crate) type Handler = fn(&Invocation<'_>) -> Result<Reply, CommandError>;

/// Accepted count of trailing arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    /// `None` = unbounded.
    pub max: Option<usize>,
}

impl Arity {
    pub const NONE: Self = Self::exactly(0);
    pub const ANY: Self = Self { min: 0, max: None };

    pub const fn exactly(n: usize) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    pub const fn at_least(n: usize) -> Self {
        Self { min: n, max: None }
    }

    pub const fn between(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }
}

/// One row of the command table.
#[derive(Debug)]
pub struct CommandSpec {
    pub modes: &'static [Mode],
    /// Canonical words, space separated, e.g. `show running-config`.
    pub pattern: &'static str,
    pub arity: Arity,
    /// Argument synopsis shown in help, e.g. `<1-4094>`.
    pub usage: &'static str,
    pub help: &'static str,
    pub(crate) handler: Handler,
}

impl CommandSpec {
    pub fn available_in(&self, mode: Mode) -> bool {
        self.modes.contains(&mode)
    }

    /// Pattern plus argument synopsis.
    pub fn synopsis(&self) -> String {
        if self.usage.is_empty() {
            self.pattern.to_owned()
        } else {
            format!("{} {}", self.pattern, self.usage)
        }
    }
}

// ── Mode sets ───────────────────────────────────────────────────────

const ALL: &[Mode] = &[
    Mode::UserExec,
    Mode::PrivilegedExec,
    Mode::GlobalConfig,
    Mode::InterfaceConfig,
    Mode::VlanConfig,
    Mode::LineConfig,
];
const EXEC: &[Mode] = &[Mode::UserExec, Mode::PrivilegedExec];
const PRIV: &[Mode] = &[Mode::PrivilegedExec];
const CONFIG: &[Mode] = &[
    Mode::GlobalConfig,
    Mode::InterfaceConfig,
    Mode::VlanConfig,
    Mode::LineConfig,
];
const GLOBAL: &[Mode] = &[Mode::GlobalConfig];
const IFACE: &[Mode] = &[Mode::InterfaceConfig];
const VLAN: &[Mode] = &[Mode::VlanConfig];
const LINE: &[Mode] = &[Mode::LineConfig];

macro_rules! cmd {
    ($modes:expr, $pattern:literal, $arity:expr, $usage:literal, $help:literal, $handler:path) => {
        CommandSpec {
            modes: $modes,
            pattern: $pattern,
            arity: $arity,
            usage: $usage,
            help: $help,
            handler: $handler,
        }
    };
}

static COMMANDS: &[CommandSpec] = &[
    // ── Shared ──
    cmd!(ALL, "exit", Arity::NONE, "", "Exit from the current mode", common::exit),
    cmd!(ALL, "help", Arity::NONE, "", "Description of the interactive help system", common::help),
    cmd!(CONFIG, "end", Arity::NONE, "", "Exit to privileged EXEC mode", common::end),
    cmd!(CONFIG, "do", Arity::at_least(1), "<command>", "Run an EXEC command", common::run_exec),
    // ── EXEC ──
    cmd!(EXEC, "enable", Arity::NONE, "", "Turn on privileged commands", exec::enable),
    cmd!(PRIV, "disable", Arity::NONE, "", "Turn off privileged commands", exec::disable),
    cmd!(PRIV, "configure terminal", Arity::NONE, "", "Enter configuration mode", exec::configure),
    cmd!(PRIV, "reload", Arity::NONE, "", "Halt and perform a cold restart", exec::reload),
    cmd!(PRIV, "clear screen", Arity::NONE, "", "Clear the console transcript", exec::clear_screen),
    cmd!(PRIV, "copy running-config startup-config", Arity::NONE, "", "Save the running configuration", exec::copy_run_start),
    cmd!(PRIV, "write memory", Arity::NONE, "", "Write running configuration to memory", exec::write_memory),
    cmd!(EXEC, "ping", Arity::exactly(1), "<ip-address>", "Send echo messages", exec::ping),
    cmd!(EXEC, "traceroute", Arity::exactly(1), "<ip-address>", "Trace route to destination", exec::traceroute),
    cmd!(EXEC, "show version", Arity::NONE, "", "System hardware and software status", show::version),
    cmd!(EXEC, "show clock", Arity::NONE, "", "Display the system clock", show::clock),
    cmd!(EXEC, "show history", Arity::NONE, "", "Display the session command history", show::history),
    cmd!(EXEC, "show ip interface brief", Arity::NONE, "", "Brief summary of IP status and configuration", show::ip_interface_brief),
    cmd!(EXEC, "show ip route", Arity::NONE, "", "IP routing table", show::ip_route),
    cmd!(EXEC, "show interfaces", Arity::between(0, 2), "[<interface>]", "Interface status and configuration", show::interfaces),
    cmd!(EXEC, "show vlan brief", Arity::NONE, "", "VTP all VLAN status in brief", show::vlan_brief),
    cmd!(PRIV, "show running-config", Arity::NONE, "", "Current operating configuration", show::running_config),
    cmd!(PRIV, "show startup-config", Arity::NONE, "", "Contents of startup configuration", show::startup_config),
    // ── Global configuration ──
    cmd!(GLOBAL, "hostname", Arity::exactly(1), "<name>", "Set system's network name", global::hostname),
    cmd!(GLOBAL, "no hostname", Arity::NONE, "", "Restore the default system name", global::no_hostname),
    cmd!(GLOBAL, "interface", Arity::between(1, 2), "<type><number>", "Select an interface to configure", global::interface),
    cmd!(GLOBAL, "vlan", Arity::exactly(1), "<1-4094>", "VLAN commands", global::vlan),
    cmd!(GLOBAL, "no vlan", Arity::exactly(1), "<1-4094>", "Delete a VLAN", global::no_vlan),
    cmd!(GLOBAL, "ip routing", Arity::NONE, "", "Enable IP routing", global::ip_routing),
    cmd!(GLOBAL, "no ip routing", Arity::NONE, "", "Disable IP routing", global::no_ip_routing),
    cmd!(GLOBAL, "line", Arity::between(2, 3), "<console|vty> <first> [<last>]", "Configure a terminal line", global::line),
    // ── Interface configuration ──
    cmd!(IFACE, "shutdown", Arity::NONE, "", "Shutdown the selected interface", interface::shutdown),
    cmd!(IFACE, "no shutdown", Arity::NONE, "", "Enable the selected interface", interface::no_shutdown),
    cmd!(IFACE, "description", Arity::at_least(1), "<text>", "Interface specific description", interface::description),
    cmd!(IFACE, "no description", Arity::NONE, "", "Remove the interface description", interface::no_description),
    cmd!(IFACE, "switchport mode", Arity::exactly(1), "<access|trunk|dynamic>", "Set trunking mode of the interface", interface::switchport_mode),
    cmd!(IFACE, "switchport access vlan", Arity::exactly(1), "<1-4094>", "Set VLAN when interface is in access mode", interface::access_vlan),
    cmd!(IFACE, "switchport trunk allowed vlan", Arity::at_least(1), "<vlan-list>", "Set allowed VLANs when interface is in trunking mode", interface::trunk_allowed),
    cmd!(IFACE, "switchport trunk native vlan", Arity::exactly(1), "<1-4094>", "Set the native VLAN for a trunk", interface::trunk_native),
    cmd!(IFACE, "ip address", Arity::ANY, "<ip-address> <mask>", "Set the IP address of an interface", interface::ip_address),
    cmd!(IFACE, "no ip address", Arity::NONE, "", "Remove the interface IP address", interface::no_ip_address),
    // ── VLAN configuration ──
    cmd!(VLAN, "name", Arity::exactly(1), "<name>", "ASCII name of the VLAN", submode::vlan_name),
    cmd!(VLAN, "no name", Arity::NONE, "", "Restore the default VLAN name", submode::no_vlan_name),
    // ── Line configuration ──
    cmd!(LINE, "password", Arity::exactly(1), "<password>", "Set a password", submode::password),
    cmd!(LINE, "no password", Arity::NONE, "", "Remove the line password", submode::no_password),
    cmd!(LINE, "login", Arity::NONE, "", "Enable password checking", submode::login),
    cmd!(LINE, "no login", Arity::NONE, "", "Disable password checking", submode::no_login),
];

/// The whole table, in resolution order.
pub fn commands() -> &'static [CommandSpec] {
    COMMANDS
}

/// Rows legal in `mode`, in table order.
pub fn commands_for(mode: Mode) -> impl Iterator<Item = &'static CommandSpec> {
    COMMANDS.iter().filter(move |spec| spec.available_in(mode))
}

// ── Handler plumbing ────────────────────────────────────────────────

/// State a command runs against, fixed for one typed line.
pub(crate) struct Context<'a> {
    pub store: &'a ConfigStore,
    pub device: &'a DeviceId,
    pub history: &'a [String],
}

/// A resolved command about to run.
pub(crate) struct Invocation<'a> {
    pub ctx: &'a Context<'a>,
    pub mode: Mode,
    pub target: Option<&'a Target>,
    pub line: &'a str,
    pub args: Vec<Token<'a>>,
}

impl Invocation<'_> {
    pub fn store(&self) -> &ConfigStore {
        self.ctx.store
    }

    pub fn device_id(&self) -> &DeviceId {
        self.ctx.device
    }

    /// Fresh copy of the session's device record.
    pub fn device(&self) -> Result<Device, CommandError> {
        self.ctx.store.device(self.ctx.device).ok_or_else(|| {
            CoreError::DeviceNotFound {
                id: self.ctx.device.clone(),
            }
            .into()
        })
    }

    pub fn arg(&self, i: usize) -> &str {
        self.args.get(i).map_or("", |t| t.text)
    }

    /// The typed line from argument `i` to the end, spacing preserved.
    pub fn rest_from(&self, i: usize) -> &str {
        self.args
            .get(i)
            .map_or("", |t| self.line[t.offset..].trim_end())
    }

    /// Invalid-input error pointing at argument `i`.
    pub fn invalid(&self, i: usize) -> CommandError {
        let column = self
            .args
            .get(i)
            .or_else(|| self.args.last())
            .map_or(0, |t| t.column);
        CommandError::invalid_at(column)
    }

    /// Argument `i` as a VLAN id in `1..=4094`.
    pub fn vlan_arg(&self, i: usize) -> Result<u16, CommandError> {
        self.arg(i)
            .parse::<u16>()
            .ok()
            .filter(|v| (1..=MAX_VLAN).contains(v))
            .ok_or_else(|| self.invalid(i))
    }

    pub fn interface_target(&self) -> Result<&str, CommandError> {
        match self.target {
            Some(Target::Interface(name)) => Ok(name),
            _ => Err(missing_target("interface")),
        }
    }

    pub fn vlan_target(&self) -> Result<u16, CommandError> {
        match self.target {
            Some(Target::Vlan(id)) => Ok(*id),
            _ => Err(missing_target("VLAN")),
        }
    }

    pub fn line_target(&self) -> Result<&str, CommandError> {
        match self.target {
            Some(Target::Line(name)) => Ok(name),
            _ => Err(missing_target("line")),
        }
    }
}

fn missing_target(what: &str) -> CommandError {
    tracing::error!(target_kind = what, "sub-mode command without a target");
    CommandError::Internal(format!("no {what} selected"))
}

/// Mode change requested by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Transition {
    Enter(Mode, Option<Target>),
    /// One level up; closes the session from user EXEC.
    Exit,
    /// Straight back to privileged EXEC.
    End,
    Reload,
}

/// What a handler produced.
#[derive(Debug, Default)]
pub(crate) struct Reply {
    pub lines: Vec<String>,
    pub transition: Option<Transition>,
    pub sync: Vec<DisplaySync>,
    /// New hostname for the session prompt.
    pub hostname: Option<String>,
    pub clear_transcript: bool,
}

impl Reply {
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn enter(mode: Mode, target: Option<Target>) -> Self {
        Self::silent().with_transition(Transition::Enter(mode, target))
    }

    #[must_use]
    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = Some(transition);
        self
    }
}

// ── Resolution ──────────────────────────────────────────────────────

/// Find the row a typed line names in `mode`.
///
/// Full matches in the current mode win, longest pattern first, ties in
/// table order. Otherwise a partial match is incomplete, a match that
/// exists only in another mode is invalid input, and anything else is
/// unknown.
pub(crate) fn resolve<'l>(
    mode: Mode,
    tokens: &[Token<'l>],
) -> Result<(&'static CommandSpec, Vec<Token<'l>>), CommandError> {
    let words: Vec<&str> = tokens.iter().map(|t| t.text).collect();

    let mut best: Option<(&'static CommandSpec, usize)> = None;
    let mut partial = false;
    for spec in commands_for(mode) {
        match match_pattern(spec.pattern, &words) {
            Match::Full { consumed } => {
                if best.is_none_or(|(_, n)| consumed > n) {
                    best = Some((spec, consumed));
                }
            }
            Match::Partial => partial = true,
            Match::Mismatch { .. } => {}
        }
    }

    if let Some((spec, consumed)) = best {
        let args = tokens[consumed..].to_vec();
        if args.len() < spec.arity.min {
            return Err(CommandError::Incomplete);
        }
        if let Some(extra) = spec.arity.max.and_then(|max| args.get(max)) {
            return Err(CommandError::invalid_at(extra.column));
        }
        return Ok((spec, args));
    }
    if partial {
        return Err(CommandError::Incomplete);
    }

    let elsewhere = COMMANDS
        .iter()
        .any(|spec| !spec.available_in(mode) && match_pattern(spec.pattern, &words).is_full());
    if elsewhere {
        let column = tokens.first().map_or(0, |t| t.column);
        return Err(CommandError::invalid_at(column));
    }
    Err(CommandError::Unknown)
}

/// Resolve and run one line in `mode`.
pub(crate) fn execute(
    ctx: &Context<'_>,
    mode: Mode,
    target: Option<&Target>,
    line: &str,
) -> Result<Reply, CommandError> {
    let tokens = tokenize(line);
    if tokens.is_empty() {
        return Ok(Reply::silent());
    }
    let (spec, args) = resolve(mode, &tokens)?;
    tracing::trace!(pattern = spec.pattern, args = args.len(), %mode, "dispatch");
    let invocation = Invocation {
        ctx,
        mode,
        target,
        line,
        args,
    };
    (spec.handler)(&invocation)
}

// ── Help ────────────────────────────────────────────────────────────

/// Full listing for `?` / `help`.
pub fn help_listing(mode: Mode) -> Vec<String> {
    let rows: Vec<(String, &str)> = commands_for(mode)
        .map(|spec| (spec.synopsis(), spec.help))
        .collect();
    let mut lines = vec![mode.help_heading().to_owned()];
    lines.extend(format_rows(&rows));
    lines
}

/// Context help for a line ending in `?`.
///
/// `sh ?` lists what may follow `show`; `sh?` lists the words `sh`
/// abbreviates at that position.
pub fn context_help(mode: Mode, line: &str) -> Result<Vec<String>, CommandError> {
    let body = line.trim_end().trim_end_matches('?');
    let completing = !body.ends_with(char::is_whitespace) && !body.is_empty();
    let words: Vec<&str> = body.split_whitespace().collect();
    if words.is_empty() {
        return Ok(help_listing(mode));
    }

    let (prefix, partial) = if completing {
        (&words[..words.len() - 1], words.last().copied())
    } else {
        (&words[..], None)
    };

    let mut rows: Vec<(String, &str)> = Vec::new();
    for spec in commands_for(mode) {
        let canonical: Vec<&str> = spec.pattern.split_whitespace().collect();
        if prefix.len() > canonical.len()
            || !prefix
                .iter()
                .zip(&canonical)
                .all(|(typed, word)| abbreviates(typed, word))
        {
            continue;
        }
        let row = match (canonical.get(prefix.len()), partial) {
            (Some(next), Some(stem)) if abbreviates(stem, next) => ((*next).to_owned(), spec.help),
            (Some(_), Some(_)) | (None, Some(_)) => continue,
            (Some(next), None) => {
                let help = if prefix.len() + 1 == canonical.len() {
                    spec.help
                } else {
                    ""
                };
                ((*next).to_owned(), help)
            }
            (None, None) if spec.usage.is_empty() => ("<cr>".to_owned(), ""),
            (None, None) => (spec.usage.to_owned(), spec.help),
        };
        if !rows.iter().any(|(word, _)| *word == row.0) {
            rows.push(row);
        }
    }

    if rows.is_empty() {
        return Err(CommandError::Unknown);
    }
    Ok(format_rows(&rows))
}

fn format_rows(rows: &[(String, &str)]) -> Vec<String> {
    let width = rows.iter().map(|(word, _)| word.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(word, help)| {
            if help.is_empty() {
                format!("  {word}")
            } else {
                format!("  {word:<width$}  {help}")
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn resolve_line(mode: Mode, line: &str) -> Result<&'static str, CommandError> {
        let tokens = tokenize(line);
        resolve(mode, &tokens).map(|(spec, _)| spec.pattern)
    }

    #[test]
    fn patterns_are_unique_per_mode() {
        for mode in Mode::iter() {
            let mut seen = std::collections::HashSet::new();
            for spec in commands_for(mode) {
                assert!(seen.insert(spec.pattern), "{mode}: {}", spec.pattern);
            }
        }
    }

    #[test]
    fn every_mode_can_exit_and_ask_for_help() {
        for mode in Mode::iter() {
            assert_eq!(resolve_line(mode, "exit"), Ok("exit"));
            assert_eq!(resolve_line(mode, "help"), Ok("help"));
        }
    }

    #[test]
    fn longest_full_match_wins() {
        assert_eq!(
            resolve_line(Mode::InterfaceConfig, "no ip addr"),
            Ok("no ip address")
        );
        assert_eq!(
            resolve_line(Mode::PrivilegedExec, "sh ip int br"),
            Ok("show ip interface brief")
        );
    }

    #[test]
    fn partial_input_is_incomplete() {
        assert_eq!(
            resolve_line(Mode::PrivilegedExec, "conf"),
            Err(CommandError::Incomplete)
        );
        assert_eq!(
            resolve_line(Mode::GlobalConfig, "interface"),
            Err(CommandError::Incomplete)
        );
    }

    #[test]
    fn command_from_another_mode_is_invalid_input() {
        assert_eq!(
            resolve_line(Mode::UserExec, "  show running-config"),
            Err(CommandError::invalid_at(2))
        );
        assert_eq!(
            resolve_line(Mode::GlobalConfig, "shutdown"),
            Err(CommandError::invalid_at(0))
        );
    }

    #[test]
    fn gibberish_is_unknown() {
        assert_eq!(
            resolve_line(Mode::PrivilegedExec, "frobnicate"),
            Err(CommandError::Unknown)
        );
    }

    #[test]
    fn surplus_arguments_point_at_the_first_extra() {
        assert_eq!(
            resolve_line(Mode::GlobalConfig, "hostname a b"),
            Err(CommandError::invalid_at(11))
        );
    }

    #[test]
    fn help_lists_only_the_current_mode() {
        let lines = help_listing(Mode::VlanConfig);
        assert_eq!(lines[0], "VLAN configuration commands:");
        assert!(lines.iter().any(|l| l.contains("name <name>")));
        assert!(!lines.iter().any(|l| l.contains("hostname")));
    }

    #[test]
    fn context_help_offers_next_words() {
        let lines = context_help(Mode::PrivilegedExec, "show ip ?").unwrap();
        assert!(lines.iter().any(|l| l.trim_start().starts_with("interface")));
        assert!(lines.iter().any(|l| l.trim_start().starts_with("route")));

        let lines = context_help(Mode::PrivilegedExec, "sh ru?").unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].trim_start().starts_with("running-config"));

        let lines = context_help(Mode::PrivilegedExec, "reload ?").unwrap();
        assert_eq!(lines, vec!["  <cr>"]);

        assert_eq!(
            context_help(Mode::UserExec, "xyz ?"),
            Err(CommandError::Unknown)
        );
    }
}
