// ── Mode hierarchy ──

use serde::Serialize;
use strum::{Display, EnumIter};

/// Interpreter modes. Ordered from least to most specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
pub enum Mode {
    UserExec,
    PrivilegedExec,
    GlobalConfig,
    InterfaceConfig,
    VlanConfig,
    LineConfig,
}

impl Mode {
    /// Where `exit` leads. `None` from user EXEC closes the session.
    pub fn parent(self) -> Option<Self> {
        match self {
            Self::UserExec => None,
            Self::PrivilegedExec => Some(Self::UserExec),
            Self::GlobalConfig => Some(Self::PrivilegedExec),
            Self::InterfaceConfig | Self::VlanConfig | Self::LineConfig => Some(Self::GlobalConfig),
        }
    }

    pub fn is_config(self) -> bool {
        !matches!(self, Self::UserExec | Self::PrivilegedExec)
    }

    /// True for the modes bound to a [`Target`].
    pub fn is_submode(self) -> bool {
        matches!(
            self,
            Self::InterfaceConfig | Self::VlanConfig | Self::LineConfig
        )
    }

    /// Text appended to the hostname to form the prompt.
    pub fn prompt_suffix(self) -> &'static str {
        match self {
            Self::UserExec => ">",
            Self::PrivilegedExec => "#",
            Self::GlobalConfig => "(config)#",
            Self::InterfaceConfig => "(config-if)#",
            Self::VlanConfig => "(config-vlan)#",
            Self::LineConfig => "(config-line)#",
        }
    }

    /// Heading printed above the `?` listing.
    pub fn help_heading(self) -> &'static str {
        match self {
            Self::UserExec | Self::PrivilegedExec => "Exec commands:",
            Self::GlobalConfig => "Configure commands:",
            Self::InterfaceConfig => "Interface configuration commands:",
            Self::VlanConfig => "VLAN configuration commands:",
            Self::LineConfig => "Line configuration commands:",
        }
    }
}

/// What a configuration sub-mode is editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum Target {
    /// Normalised interface name, e.g. `GigabitEthernet0/1`.
    Interface(String),
    Vlan(u16),
    /// Line name, e.g. `con 0` or `vty 0 4`.
    Line(String),
}

impl Target {
    /// The mode a target is edited in.
    pub fn mode(&self) -> Mode {
        match self {
            Self::Interface(_) => Mode::InterfaceConfig,
            Self::Vlan(_) => Mode::VlanConfig,
            Self::Line(_) => Mode::LineConfig,
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Interface(name) | Self::Line(name) => f.write_str(name),
            Self::Vlan(id) => write!(f, "vlan {id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_mode_but_user_exec_has_a_parent() {
        for mode in Mode::iter() {
            assert_eq!(mode.parent().is_none(), mode == Mode::UserExec, "{mode}");
        }
        assert_eq!(Mode::VlanConfig.parent(), Some(Mode::GlobalConfig));
    }

    #[test]
    fn submodes_match_their_targets() {
        assert_eq!(Target::Interface("Gi0/1".into()).mode(), Mode::InterfaceConfig);
        assert_eq!(Target::Vlan(10).mode(), Mode::VlanConfig);
        assert!(Target::Line("con 0".into()).mode().is_submode());
        assert!(!Mode::GlobalConfig.is_submode());
        assert!(Mode::GlobalConfig.is_config());
    }
}
