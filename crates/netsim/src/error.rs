//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use netsim_config::ConfigError;
use netsim_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const UNREACHABLE: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 5;
    pub const CONFIG: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Lab / topology ───────────────────────────────────────────────

    #[error("No topology selected")]
    #[diagnostic(
        code(netsim::no_topology),
        help(
            "Pass --topology <file>, or register a lab with: netsim config init <file>\n\
             Config file: {path}"
        )
    )]
    NoTopology { path: String },

    #[error("Lab '{name}' not found in configuration")]
    #[diagnostic(
        code(netsim::lab_not_found),
        help("Available labs: {available}\nAdd one with: netsim config init <file> --name {name}")
    )]
    LabNotFound { name: String, available: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(netsim::not_found),
        help("Run: netsim {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{resource_type} '{identifier}' already exists")]
    #[diagnostic(code(netsim::conflict))]
    Conflict {
        resource_type: String,
        identifier: String,
    },

    #[error("{message}")]
    #[diagnostic(code(netsim::rejected))]
    Rejected { message: String },

    // ── Reachability ─────────────────────────────────────────────────

    #[error("{source_name} cannot reach {target_name}")]
    #[diagnostic(code(netsim::unreachable), help("{reason}"))]
    Unreachable {
        source_name: String,
        target_name: String,
        reason: String,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(netsim::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(netsim::config),
        help("Check the config file with: netsim config show")
    )]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(netsim::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(netsim::io))]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(netsim::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Unreachable { .. } => exit_code::UNREACHABLE,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::NoTopology { .. } | Self::LabNotFound { .. } | Self::Config(_) => {
                exit_code::CONFIG
            }
            Self::Rejected { .. } | Self::Io(_) | Self::Render(_) => exit_code::GENERAL,
        }
    }
}

// ── Library errors → CliError ────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => Self::Io(io),
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DeviceNotFound { id } => Self::NotFound {
                resource_type: "device".into(),
                identifier: id.to_string(),
                list_command: "devices list".into(),
            },
            CoreError::LinkNotFound { id } => Self::NotFound {
                resource_type: "link".into(),
                identifier: id.to_string(),
                list_command: "links list".into(),
            },
            CoreError::DuplicateDevice { id } => Self::Conflict {
                resource_type: "device".into(),
                identifier: id.to_string(),
            },
            CoreError::DuplicateLink { id } => Self::Conflict {
                resource_type: "link".into(),
                identifier: id.to_string(),
            },
            other => Self::Rejected {
                message: other.to_string(),
            },
        }
    }
}
