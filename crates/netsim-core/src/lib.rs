//! Simulation core for the netsim network lab.
//!
//! This crate owns the topology model, the shared configuration state, and
//! the IOS-style command interpreter that mutates it:
//!
//! - **[`ConfigStore`]**: topology-wide device configuration and link set.
//!   Device writes are serialised per device; reads go through immutable
//!   snapshots so a path query never observes a half-applied command.
//!
//! - **[`Session`]**: one console attached to one device. Tokenises typed
//!   lines, resolves them against the declarative [`interpreter::table`],
//!   walks the mode hierarchy and renders IOS-like output. Advisory hints
//!   arrive asynchronously and are drained on the next interaction.
//!
//! - **Port mapper** ([`ports`]): physical interface names derived from the
//!   incident links of a device, in link-id order.
//!
//! - **Reachability** ([`find_path`]): BFS over the link graph with
//!   liveness and /24 routing checks. Read-only.
//!
//! - **Connection validator** ([`validate_connection`]): advisory
//!   classification of a proposed link. Never blocks.

pub mod config;
pub mod error;
pub mod interpreter;
pub mod model;
pub mod ports;
pub mod reachability;
pub mod store;
pub mod validator;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::SessionConfig;
pub use error::CoreError;
pub use interpreter::{
    Advisor, CatalogAdvisor, CommandError, Mode, NoopAdvisor, Outcome, Response, Session,
    SessionState, Target,
};
pub use ports::PortMapping;
pub use reachability::{PathFailure, PathVerdict, find_path};
pub use store::ConfigStore;
pub use validator::{AdviceLevel, ConnectionAdvice, validate_connection};

pub use model::{
    Device, DeviceId, DeviceKind, DeviceStatus, InterfaceAddress, InterfaceConfig, LineConfig,
    Link, LinkId, SwitchportMode, Topology,
};
