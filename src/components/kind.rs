use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire-level component type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ComponentKind {
    /// Grouping wrapper holding up to five children
    ActionRow,
    Button,
    Select,
    /// Any type this crate does not model; passed through untouched
    Unknown(u8),
}

impl ComponentKind {
    pub fn value(&self) -> u8 {
        match self {
            Self::ActionRow => 1,
            Self::Button => 2,
            Self::Select => 3,
            Self::Unknown(value) => *value,
        }
    }

    /// Interactive kinds are the only ones that can ever enter the registry.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Button | Self::Select)
    }
}

impl From<u8> for ComponentKind {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::ActionRow,
            2 => Self::Button,
            3 => Self::Select,
            other => Self::Unknown(other),
        }
    }
}

impl From<ComponentKind> for u8 {
    fn from(kind: ComponentKind) -> Self {
        kind.value()
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ActionRow => write!(f, "action_row"),
            Self::Button => write!(f, "button"),
            Self::Select => write!(f, "select"),
            Self::Unknown(value) => write!(f, "unknown({value})"),
        }
    }
}

/// Visual style of a button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Success,
    Danger,
    /// Opens a url; link buttons never carry a custom id
    Link,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self::Secondary
    }
}

impl TryFrom<u8> for ButtonStyle {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Primary),
            2 => Ok(Self::Secondary),
            3 => Ok(Self::Success),
            4 => Ok(Self::Danger),
            5 => Ok(Self::Link),
            other => Err(format!("Invalid button style: {other}")),
        }
    }
}

impl From<ButtonStyle> for u8 {
    fn from(style: ButtonStyle) -> Self {
        match style {
            ButtonStyle::Primary => 1,
            ButtonStyle::Secondary => 2,
            ButtonStyle::Success => 3,
            ButtonStyle::Danger => 4,
            ButtonStyle::Link => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_values() {
        assert_eq!(ComponentKind::from(2), ComponentKind::Button);
        assert_eq!(ComponentKind::from(9), ComponentKind::Unknown(9));
        assert_eq!(ComponentKind::Select.value(), 3);
        assert!(!ComponentKind::ActionRow.is_interactive());
        assert!(!ComponentKind::Unknown(4).is_interactive());
    }

    #[test]
    fn test_button_style_rejects_unknown_values() {
        assert_eq!(ButtonStyle::try_from(4), Ok(ButtonStyle::Danger));
        assert!(ButtonStyle::try_from(0).is_err());
        assert!(serde_json::from_str::<ButtonStyle>("7").is_err());
    }
}
