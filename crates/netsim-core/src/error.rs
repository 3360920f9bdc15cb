// ── Core error types ──
//
// Failures of configuration-store operations. Command-level mistakes
// (unknown / incomplete / invalid input) are not errors at this layer;
// the interpreter renders them inline as `interpreter::CommandError`.

use thiserror::Error;

use crate::model::{DeviceId, DeviceKind, LinkId};

/// Unified error type for the core crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Device not found: {id}")]
    DeviceNotFound { id: DeviceId },

    #[error("Link not found: {id}")]
    LinkNotFound { id: LinkId },

    // ── Rejections ───────────────────────────────────────────────────
    #[error("{kind} device {device} does not support VLANs")]
    VlanUnsupported { device: DeviceId, kind: DeviceKind },

    #[error("VLAN {vlan} is out of range (1-4094)")]
    VlanOutOfRange { vlan: u16 },

    #[error("Default VLAN 1 may not be deleted")]
    DefaultVlanProtected,

    #[error("Device already exists: {id}")]
    DuplicateDevice { id: DeviceId },

    #[error("Link already exists: {id}")]
    DuplicateLink { id: LinkId },

    #[error("Link {id} references unknown device {device}")]
    DanglingLink { id: LinkId, device: DeviceId },

    // ── Invariant violations ─────────────────────────────────────────
    /// An operation needed an interface that `ensure_interface` should
    /// already have created. Always a programming bug.
    #[error("Internal error: interface {name} was never created on {device}")]
    InterfaceMissing { device: DeviceId, name: String },
}

impl CoreError {
    /// True for the invariant-violation class, as opposed to
    /// user-recoverable rejections.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::InterfaceMissing { .. })
    }
}
