// ── Command errors ──
//
// Rendered inline as console output. None of these ends the session.

use thiserror::Error;
use tracing::error;

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Nothing in the current mode or any other mode matches.
    #[error("% Unknown command.")]
    Unknown,

    /// A command prefix matched but required tokens are missing.
    #[error("% Incomplete command.")]
    Incomplete,

    /// The command exists but is wrong here, or an argument is malformed.
    /// `column` is the character offset of the offending token in the
    /// typed line.
    #[error("% Invalid input detected at '^' marker.")]
    InvalidInput { column: usize },

    #[error("% This device does not support VLANs.")]
    VlanUnsupported,

    /// Accepted syntax, refused by the device.
    #[error("% {0}")]
    Rejected(String),

    /// Store invariant broken. The command is abandoned.
    #[error("% Internal error: {0}")]
    Internal(String),
}

impl CommandError {
    pub fn invalid_at(column: usize) -> Self {
        Self::InvalidInput { column }
    }

    /// Caret marker column, when the error points at a token.
    pub fn column(&self) -> Option<usize> {
        match self {
            Self::InvalidInput { column } => Some(*column),
            _ => None,
        }
    }

    /// Re-base the marker when a command ran as a suffix of a longer line
    /// (`do show ...`).
    #[must_use]
    pub fn shifted(self, offset: usize) -> Self {
        match self {
            Self::InvalidInput { column } => Self::InvalidInput {
                column: column + offset,
            },
            other => other,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::VlanUnsupported { .. } => Self::VlanUnsupported,
            CoreError::DefaultVlanProtected => {
                Self::Rejected("Default VLAN 1 may not be deleted.".into())
            }
            CoreError::VlanOutOfRange { .. } => Self::invalid_at(0),
            err @ (CoreError::InterfaceMissing { .. } | CoreError::DeviceNotFound { .. }) => {
                error!(error = %err, "store invariant violated");
                Self::Internal(err.to_string())
            }
            other => Self::Rejected(other.to_string()),
        }
    }
}
