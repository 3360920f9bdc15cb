// ── Command handlers ──
//
// One function per table row. Handlers validate arguments, mutate the
// store through its public operations and describe any mode change in
// the returned `Reply`; they never touch session state directly.

pub(super) mod common;
pub(super) mod exec;
pub(super) mod global;
pub(super) mod interface;
pub(super) mod show;
pub(super) mod submode;

use super::matcher::abbreviates;

/// Interface families accepted by `interface` and `show interfaces`.
const FAMILIES: [&str; 4] = ["GigabitEthernet", "FastEthernet", "Vlan", "Loopback"];

/// Expand a typed interface reference to its canonical name.
///
/// The family may be abbreviated (`g0/1`, `fa 0/2`, `vlan10`, `lo0`);
/// callers join split tokens first. The unit part must start with a digit
/// and contain only digits, `/` and `.`.
pub(crate) fn normalize_interface(raw: &str) -> Option<String> {
    let split = raw.find(|c: char| c.is_ascii_digit())?;
    let (family, unit) = raw.split_at(split);
    if !unit.chars().all(|c| c.is_ascii_digit() || c == '/' || c == '.') {
        return None;
    }
    let family = FAMILIES
        .iter()
        .find(|canonical| abbreviates(family, canonical))?;
    Some(format!("{family}{unit}"))
}
