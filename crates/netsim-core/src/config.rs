// ── Runtime session configuration ──
//
// These types describe *how* a console session behaves. They never
// touch disk; the CLI builds a `SessionConfig` from its config file and
// hands it in.

use std::time::Duration;

/// Tunables for one interpreter session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long `reload` keeps the session in the booting state.
    pub boot_delay: Duration,
    /// Ask the advisor for hints after command errors.
    pub hints_enabled: bool,
    /// Maximum retained history entries. 0 = unbounded.
    pub history_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            boot_delay: Duration::from_secs(3),
            hints_enabled: true,
            history_limit: 256,
        }
    }
}
