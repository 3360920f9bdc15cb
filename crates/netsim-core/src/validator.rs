// ── Connection validator ──
//
// Advisory classification of a proposed link. It never refuses a
// connection; the level only drives how the caller presents the advice.

use serde::Serialize;
use strum::Display;

use crate::model::DeviceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AdviceLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionAdvice {
    /// Always `true`: links are never blocked.
    pub is_valid: bool,
    pub message: String,
    pub level: AdviceLevel,
}

impl ConnectionAdvice {
    fn new(level: AdviceLevel, message: &str) -> Self {
        Self {
            is_valid: true,
            message: message.to_owned(),
            level,
        }
    }
}

/// Classify a link from `source` to `target`. Direction matters for the
/// Internet and L2-switch rules.
pub fn validate_connection(source: DeviceKind, target: DeviceKind) -> ConnectionAdvice {
    use DeviceKind as K;

    match (source, target) {
        (K::Pc, K::Pc) => ConnectionAdvice::new(
            AdviceLevel::Warning,
            "Direct PC-to-PC link: both hosts must share a subnet to communicate.",
        ),
        (K::Internet, K::Pc) => ConnectionAdvice::new(
            AdviceLevel::Error,
            "PCs should not connect straight to the Internet; place a router or firewall in between.",
        ),
        (K::SwitchL2, K::Internet) => ConnectionAdvice::new(
            AdviceLevel::Warning,
            "A Layer 2 switch cannot terminate a WAN link; use a router or firewall at the edge.",
        ),
        _ => ConnectionAdvice::new(AdviceLevel::Info, "Connection established."),
    }
}
