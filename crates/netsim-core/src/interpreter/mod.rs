// ── IOS-style command interpreter ──
//
// A session-scoped state machine. Each typed line is tokenised, resolved
// against the declarative command table for the current mode, and the
// matching handler mutates the configuration store through its public
// operations. Errors are rendered inline; the session always survives.

pub mod advisory;
pub mod display_sync;
mod error;
mod handlers;
mod history;
pub mod matcher;
mod mode;
mod render;
mod session;
pub mod table;

pub use advisory::{Advisor, CatalogAdvisor, HintRequest, NoopAdvisor};
pub use error::CommandError;
pub use history::History;
pub use mode::{Mode, Target};
pub use render::running_config as render_running_config;
pub use session::{Outcome, Response, Session, SessionState};
pub use table::{Arity, CommandSpec, commands, commands_for, context_help, help_listing};
