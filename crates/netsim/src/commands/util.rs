//! Shared helpers for command handlers.

use std::sync::Arc;

use netsim_core::{ConfigStore, Device, DeviceKind};
use strum::IntoEnumIterator;

use crate::error::CliError;

/// Resolve a device by id, hostname or label.
pub fn resolve_device(store: &ConfigStore, identifier: &str) -> Result<Arc<Device>, CliError> {
    store
        .find_device(identifier)
        .ok_or_else(|| CliError::NotFound {
            resource_type: "device".into(),
            identifier: identifier.into(),
            list_command: "devices list".into(),
        })
}

/// Parse a device kind, case-insensitively.
pub fn device_kind(field: &str, raw: &str) -> Result<DeviceKind, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!(
            "unknown device kind '{raw}' (expected one of: {})",
            DeviceKind::iter()
                .map(|k| k.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal the prompt cannot be answered, so `--yes` becomes
/// mandatory.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}
