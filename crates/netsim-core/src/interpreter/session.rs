// ── Interpreter session ──
//
// One console attached to one device. Owns the mode, the sub-mode
// target, history and transcript; shares the configuration store.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::advisory::{Advisor, HintRequest};
use super::display_sync;
use super::error::CommandError;
use super::history::History;
use super::mode::{Mode, Target};
use super::table::{self, Context, Reply, Transition};
use crate::config::SessionConfig;
use crate::error::CoreError;
use crate::model::{DeviceId, DeviceStatus};
use crate::store::ConfigStore;

const CONFIG_NOTICE: &str = "%SYS-5-CONFIG_I: Configured from console by console";

/// How a call to [`Session::execute`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The session is ready for the next line.
    Continue,
    /// `exit` from user EXEC. Further input is ignored.
    Closed,
    /// `reload` accepted; the device is booting.
    Reloading,
    /// Input arrived while booting and was not processed.
    Refused,
}

/// Output of one interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Hints that arrived since the previous interaction.
    pub hints: Vec<String>,
    /// Console output for the command, including any error text.
    pub lines: Vec<String>,
    pub error: Option<CommandError>,
    pub outcome: Outcome,
}

impl Response {
    fn new(hints: Vec<String>, outcome: Outcome) -> Self {
        Self {
            hints,
            lines: Vec::new(),
            error: None,
            outcome,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Output lines joined for display.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Coarse session state for front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Ready(Mode),
    Booting { remaining: Duration },
    Closed,
}

pub struct Session {
    store: Arc<ConfigStore>,
    device: DeviceId,
    config: SessionConfig,

    mode: Mode,
    target: Option<Target>,
    hostname: String,
    history: History,
    transcript: Vec<String>,
    boot_deadline: Option<Instant>,
    closed: bool,

    advisor: Option<Arc<dyn Advisor>>,
    hints_tx: mpsc::UnboundedSender<String>,
    hints_rx: mpsc::UnboundedReceiver<String>,
}

impl Session {
    /// Attach a console to `device`. Starts in user EXEC.
    pub fn open(
        store: Arc<ConfigStore>,
        device: DeviceId,
        config: SessionConfig,
    ) -> Result<Self, CoreError> {
        let record = store
            .device(&device)
            .ok_or_else(|| CoreError::DeviceNotFound { id: device.clone() })?;
        let (hints_tx, hints_rx) = mpsc::unbounded_channel();
        info!(device = %device, kind = %record.kind, "console session opened");
        Ok(Self {
            hostname: record.display_name().to_owned(),
            history: History::new(config.history_limit),
            store,
            device,
            config,
            mode: Mode::UserExec,
            target: None,
            transcript: Vec::new(),
            boot_deadline: None,
            closed: false,
            advisor: None,
            hints_tx,
            hints_rx,
        })
    }

    #[must_use]
    pub fn with_advisor(mut self, advisor: Arc<dyn Advisor>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn device_id(&self) -> &DeviceId {
        &self.device
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    /// Hostname as last seen by this session.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn prompt(&self) -> String {
        format!("{}{}", self.hostname, self.mode.prompt_suffix())
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn recall_older(&mut self) -> Option<&str> {
        self.history.recall_older()
    }

    pub fn recall_newer(&mut self) -> Option<&str> {
        self.history.recall_newer()
    }

    /// Everything echoed and printed since the last reload.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn state(&mut self) -> SessionState {
        self.poll_boot();
        if self.closed {
            return SessionState::Closed;
        }
        match self.boot_deadline {
            Some(deadline) => SessionState::Booting {
                remaining: deadline.saturating_duration_since(Instant::now()),
            },
            None => SessionState::Ready(self.mode),
        }
    }

    pub fn is_booting(&mut self) -> bool {
        matches!(self.state(), SessionState::Booting { .. })
    }

    // ── Interaction ──────────────────────────────────────────────────

    /// Run one typed line.
    ///
    /// Errors are rendered into `lines` and reported in `error`; the
    /// session survives every outcome.
    pub fn execute(&mut self, line: &str) -> Response {
        let hints = self.drain_hints();
        if self.closed {
            return Response::new(hints, Outcome::Closed);
        }

        let mut lines = self.poll_boot();
        if self.boot_deadline.is_some() {
            debug!(device = %self.device, "input refused while booting");
            return Response::new(hints, Outcome::Refused);
        }

        let line = line.trim();
        if line.is_empty() {
            return Response {
                lines,
                ..Response::new(hints, Outcome::Continue)
            };
        }

        let prompt = self.prompt();
        self.transcript.push(format!("{prompt}{line}"));
        self.history.push(line);

        let result = if line.ends_with('?') {
            table::context_help(self.mode, line).map(Reply::lines)
        } else {
            let ctx = Context {
                store: &self.store,
                device: &self.device,
                history: self.history.entries(),
            };
            table::execute(&ctx, self.mode, self.target.as_ref(), line)
        };

        let response = match result {
            Ok(reply) => {
                let outcome = self.apply(reply, &mut lines);
                Response {
                    lines,
                    ..Response::new(hints, outcome)
                }
            }
            Err(err) => {
                debug!(device = %self.device, mode = %self.mode, command = %line, error = %err, "command failed");
                if let Some(column) = err.column() {
                    let indent = prompt.chars().count() + column;
                    lines.push(format!("{}^", " ".repeat(indent)));
                }
                lines.push(err.to_string());
                self.request_hint(line, &err);
                Response {
                    lines,
                    error: Some(err),
                    ..Response::new(hints, Outcome::Continue)
                }
            }
        };

        self.transcript.extend(response.lines.iter().cloned());
        response
    }

    /// Wait out a reload, then return the boot completion banner.
    pub async fn wait_until_ready(&mut self) -> Vec<String> {
        if let Some(deadline) = self.boot_deadline {
            tokio::time::sleep_until(deadline).await;
        }
        self.poll_boot()
    }

    /// Hints delivered since the last drain, formatted for display.
    /// Always empty once the session is closed.
    pub fn drain_hints(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.closed {
            return lines;
        }
        while let Ok(hint) = self.hints_rx.try_recv() {
            lines.push(format!("Hint: {hint}"));
        }
        self.transcript.extend(lines.iter().cloned());
        lines
    }

    // ── Internals ────────────────────────────────────────────────────

    fn apply(&mut self, reply: Reply, lines: &mut Vec<String>) -> Outcome {
        for sync in &reply.sync {
            if let Err(err) = display_sync::apply(&self.store, &self.device, sync) {
                warn!(device = %self.device, error = %err, "display sync failed");
            }
        }
        if let Some(hostname) = reply.hostname {
            self.hostname = hostname;
        }
        if reply.clear_transcript {
            self.transcript.clear();
        }
        lines.extend(reply.lines);

        match reply.transition {
            None => Outcome::Continue,
            Some(Transition::Enter(mode, target)) => {
                self.mode = mode;
                self.target = target;
                Outcome::Continue
            }
            Some(Transition::Exit) => match self.mode.parent() {
                None => {
                    self.closed = true;
                    self.hints_rx.close();
                    info!(device = %self.device, "console session closed");
                    Outcome::Closed
                }
                Some(parent) => {
                    if self.mode == Mode::GlobalConfig {
                        lines.push(CONFIG_NOTICE.to_owned());
                    }
                    self.mode = parent;
                    self.target = None;
                    Outcome::Continue
                }
            },
            Some(Transition::End) => {
                lines.push(CONFIG_NOTICE.to_owned());
                self.mode = Mode::PrivilegedExec;
                self.target = None;
                Outcome::Continue
            }
            Some(Transition::Reload) => {
                self.begin_reload(lines);
                Outcome::Reloading
            }
        }
    }

    fn begin_reload(&mut self, lines: &mut Vec<String>) {
        self.transcript.clear();
        self.mode = Mode::UserExec;
        self.target = None;
        self.boot_deadline = Some(Instant::now() + self.config.boot_delay);
        if let Err(err) = self.store.set_status(&self.device, DeviceStatus::Booting) {
            warn!(device = %self.device, error = %err, "could not mark device booting");
        }
        info!(device = %self.device, delay = ?self.config.boot_delay, "reloading");
        lines.push(String::new());
        lines.push("System Bootstrap, Version 15.0(1r), RELEASE SOFTWARE".to_owned());
        lines.push(format!("Booting {}...", self.hostname));
    }

    /// Finish a reload whose deadline has passed. Returns the banner.
    fn poll_boot(&mut self) -> Vec<String> {
        let Some(deadline) = self.boot_deadline else {
            return Vec::new();
        };
        if Instant::now() < deadline {
            return Vec::new();
        }
        self.boot_deadline = None;
        if let Err(err) = self.store.set_status(&self.device, DeviceStatus::Up) {
            warn!(device = %self.device, error = %err, "could not mark device up");
        }
        if let Some(record) = self.store.device(&self.device) {
            record.display_name().clone_into(&mut self.hostname);
        }
        info!(device = %self.device, "boot complete");
        let banner = vec![String::new(), "Press RETURN to get started!".to_owned()];
        self.transcript.extend(banner.iter().cloned());
        banner
    }

    /// Ask the advisor about a failed command, off the interpreter path.
    fn request_hint(&self, command: &str, error: &CommandError) {
        if !self.config.hints_enabled || error.is_internal() {
            return;
        }
        let Some(advisor) = self.advisor.clone() else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!("no async runtime; hint skipped");
            return;
        };
        let Some(kind) = self.store.device(&self.device).map(|d| d.kind) else {
            return;
        };

        let pending = advisor.advise(HintRequest {
            device_kind: kind,
            mode: self.mode,
            command: command.to_owned(),
            error: error.clone(),
        });
        let tx = self.hints_tx.clone();
        runtime.spawn(async move {
            let Some(hint) = pending.await else {
                return;
            };
            let hint = hint.trim();
            if !hint.is_empty() && tx.send(hint.to_owned()).is_err() {
                debug!("session gone; hint dropped");
            }
        });
    }
}

impl Drop for Session {
    /// A console torn down mid-reload still leaves the device up.
    fn drop(&mut self) {
        if self.boot_deadline.take().is_none() {
            return;
        }
        if let Err(err) = self.store.set_status(&self.device, DeviceStatus::Up) {
            warn!(device = %self.device, error = %err, "could not mark device up");
        }
        debug!(device = %self.device, "session dropped while booting");
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("device", &self.device)
            .field("mode", &self.mode)
            .field("target", &self.target)
            .field("hostname", &self.hostname)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::interpreter::advisory::CatalogAdvisor;
    use crate::model::{Device, DeviceKind, Link};
    use futures_util::FutureExt;
    use futures_util::future::BoxFuture;

    fn store() -> Arc<ConfigStore> {
        let store = ConfigStore::new();
        store.add_device(Device::new("sw1", "SW1", DeviceKind::SwitchL2)).unwrap();
        store.add_device(Device::new("r1", "R1", DeviceKind::Router)).unwrap();
        store.add_device(Device::new("pc1", "PC1", DeviceKind::Pc)).unwrap();
        store.add_link(Link::new("e1", "sw1", "pc1")).unwrap();
        store.add_link(Link::new("e2", "sw1", "r1")).unwrap();
        Arc::new(store)
    }

    fn session(device: &str) -> Session {
        Session::open(store(), device.into(), SessionConfig::default()).unwrap()
    }

    fn run(session: &mut Session, lines: &[&str]) -> Response {
        let mut last = None;
        for line in lines {
            last = Some(session.execute(line));
        }
        last.unwrap()
    }

    #[test]
    fn unknown_device_cannot_be_opened() {
        let err = Session::open(store(), "ghost".into(), SessionConfig::default()).unwrap_err();
        assert!(matches!(err, CoreError::DeviceNotFound { .. }));
    }

    #[test]
    fn prompts_follow_the_mode() {
        let mut s = session("sw1");
        assert_eq!(s.prompt(), "SW1>");
        s.execute("en");
        assert_eq!(s.prompt(), "SW1#");
        s.execute("conf t");
        assert_eq!(s.prompt(), "SW1(config)#");
        s.execute("int g0/1");
        assert_eq!(s.prompt(), "SW1(config-if)#");
        assert_eq!(
            s.target(),
            Some(&Target::Interface("GigabitEthernet0/1".into()))
        );
        s.execute("exit");
        s.execute("vlan 10");
        assert_eq!(s.prompt(), "SW1(config-vlan)#");
        s.execute("exit");
        s.execute("line con 0");
        assert_eq!(s.prompt(), "SW1(config-line)#");
        s.execute("end");
        assert_eq!(s.prompt(), "SW1#");
        assert!(s.target().is_none());
    }

    #[test]
    fn exit_from_user_exec_closes() {
        let mut s = session("r1");
        let resp = s.execute("exit");
        assert_eq!(resp.outcome, Outcome::Closed);
        assert!(s.is_closed());
        assert_eq!(s.execute("enable").outcome, Outcome::Closed);
        assert_eq!(s.mode(), Mode::UserExec);
    }

    #[test]
    fn hostname_updates_prompt_and_store() {
        let mut s = session("r1");
        run(&mut s, &["enable", "configure terminal", "hostname CORE"]);
        assert_eq!(s.prompt(), "CORE(config)#");
        assert_eq!(s.store().device(&"r1".into()).unwrap().hostname, "CORE");
    }

    #[test]
    fn errors_render_inline_with_marker() {
        let mut s = session("r1");
        let resp = s.execute("show running-config");
        assert_eq!(resp.error, Some(CommandError::invalid_at(0)));
        assert_eq!(resp.lines, ["   ^", "% Invalid input detected at '^' marker."]);
        assert_eq!(s.mode(), Mode::UserExec);

        let resp = s.execute("florp");
        assert_eq!(resp.lines, ["% Unknown command."]);
    }

    #[test]
    fn do_runs_exec_commands_from_config() {
        let mut s = session("sw1");
        let resp = run(&mut s, &["en", "conf t", "vlan 20", "do show vlan brief"]);
        assert!(!resp.is_error(), "{:?}", resp.lines);
        assert!(resp.lines.iter().any(|l| l.starts_with("20   VLAN0020")));
        assert_eq!(s.mode(), Mode::VlanConfig);

        let resp = s.execute("do disable");
        assert!(!resp.is_error());
        assert_eq!(s.mode(), Mode::VlanConfig);
    }

    #[test]
    fn history_records_non_empty_lines() {
        let mut s = session("r1");
        run(&mut s, &["enable", "", "   ", "show history"]);
        assert_eq!(s.history().entries(), ["enable", "show history"]);
        assert_eq!(s.recall_older(), Some("show history"));
        assert_eq!(s.recall_older(), Some("enable"));
        assert_eq!(s.recall_newer(), Some("show history"));
    }

    #[test]
    fn transcript_echoes_prompt_and_output() {
        let mut s = session("r1");
        s.execute("enable");
        s.execute("bogus");
        assert_eq!(s.transcript(), ["R1>enable", "R1#bogus", "% Unknown command."]);
    }

    #[test]
    fn clear_screen_empties_the_transcript() {
        let mut s = session("r1");
        run(&mut s, &["enable", "show version", "clear screen"]);
        assert!(s.transcript().is_empty());
        s.execute("disable");
        assert_eq!(s.transcript(), ["R1#disable"]);
    }

    #[test]
    fn leaving_config_logs_a_notice() {
        let mut s = session("r1");
        let resp = run(&mut s, &["en", "conf t", "end"]);
        assert_eq!(resp.lines, [CONFIG_NOTICE]);
    }

    #[tokio::test(start_paused = true)]
    async fn reload_refuses_input_until_boot_completes() {
        let mut s = session("r1");
        run(&mut s, &["en", "conf t", "int g0/1", "end"]);
        let resp = s.execute("reload");
        assert_eq!(resp.outcome, Outcome::Reloading);
        assert_eq!(s.mode(), Mode::UserExec);
        assert!(s.target().is_none());
        assert!(!s.transcript().iter().any(|l| l.contains("int g0/1")));
        assert_eq!(
            s.store().device(&"r1".into()).unwrap().status,
            DeviceStatus::Booting
        );

        assert_eq!(s.execute("enable").outcome, Outcome::Refused);
        assert!(s.is_booting());

        let banner = s.wait_until_ready().await;
        assert!(banner.iter().any(|l| l.contains("Press RETURN")));
        assert_eq!(s.state(), SessionState::Ready(Mode::UserExec));
        assert_eq!(s.store().device(&"r1".into()).unwrap().status, DeviceStatus::Up);
        assert_eq!(s.execute("enable").outcome, Outcome::Continue);
        assert_eq!(s.mode(), Mode::PrivilegedExec);
    }

    #[tokio::test(start_paused = true)]
    async fn booting_clears_after_the_delay_without_waiting() {
        let mut s = session("r1");
        run(&mut s, &["en", "reload"]);
        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(s.is_booting());
        tokio::time::advance(Duration::from_secs(2)).await;
        let resp = s.execute("enable");
        assert_eq!(resp.outcome, Outcome::Continue);
        assert_eq!(resp.lines[1], "Press RETURN to get started!");
    }

    #[tokio::test]
    async fn hints_arrive_on_the_next_interaction() {
        let mut s = session("r1").with_advisor(Arc::new(CatalogAdvisor));
        let resp = s.execute("conf t");
        assert!(resp.is_error());
        assert!(resp.hints.is_empty());

        tokio::task::yield_now().await;
        let resp = s.execute("enable");
        assert_eq!(resp.hints.len(), 1);
        assert!(resp.hints[0].starts_with("Hint: "));
        assert!(resp.hints[0].contains("enable"));
    }

    struct Slow;

    impl Advisor for Slow {
        fn advise(&self, _request: HintRequest) -> BoxFuture<'static, Option<String>> {
            async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Some("late".to_owned())
            }
            .boxed()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_advisor_never_blocks_commands() {
        let mut s = session("r1").with_advisor(Arc::new(Slow));
        s.execute("bogus");
        let resp = s.execute("enable");
        assert!(resp.hints.is_empty());
        assert_eq!(s.mode(), Mode::PrivilegedExec);

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(s.drain_hints(), ["Hint: late"]);
    }

    #[tokio::test]
    async fn closing_discards_pending_hints() {
        let mut s = session("r1").with_advisor(Arc::new(CatalogAdvisor));
        s.execute("wibble");
        assert_eq!(s.execute("exit").outcome, Outcome::Closed);

        tokio::task::yield_now().await;
        assert!(s.drain_hints().is_empty());
        assert!(s.execute("enable").hints.is_empty());
        assert!(!s.transcript().iter().any(|l| l.starts_with("Hint: ")));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_a_booting_session_leaves_the_device_up() {
        let store = store();
        let mut s = Session::open(Arc::clone(&store), "sw1".into(), SessionConfig::default())
            .unwrap();
        assert_eq!(run(&mut s, &["en", "reload"]).outcome, Outcome::Reloading);
        assert_eq!(store.device(&"sw1".into()).unwrap().status, DeviceStatus::Booting);

        drop(s);
        assert_eq!(store.device(&"sw1".into()).unwrap().status, DeviceStatus::Up);

        let mut again = Session::open(store, "sw1".into(), SessionConfig::default()).unwrap();
        assert_eq!(again.state(), SessionState::Ready(Mode::UserExec));
    }

    #[test]
    fn hints_skipped_without_runtime() {
        let mut s = session("r1").with_advisor(Arc::new(CatalogAdvisor));
        s.execute("bogus");
        assert!(s.drain_hints().is_empty());
    }

    #[tokio::test]
    async fn syslog_notices_do_not_trigger_hints() {
        let mut s = session("sw1").with_advisor(Arc::new(CatalogAdvisor));
        let resp = run(&mut s, &["en", "conf t", "int g0/1", "shutdown"]);
        assert!(resp.lines[0].starts_with("%LINK-5-CHANGED"));
        assert!(!resp.is_error());
        tokio::task::yield_now().await;
        assert!(s.drain_hints().is_empty());
    }

    #[tokio::test]
    async fn disabled_hints_stay_quiet() {
        let config = SessionConfig {
            hints_enabled: false,
            ..SessionConfig::default()
        };
        let mut s = Session::open(store(), "r1".into(), config)
            .unwrap()
            .with_advisor(Arc::new(CatalogAdvisor));
        s.execute("bogus");
        tokio::task::yield_now().await;
        assert!(s.drain_hints().is_empty());
    }
}
