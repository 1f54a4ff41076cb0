use serde::{Deserialize, Serialize};
use std::fmt;

use super::events::FormEvent;

/// Form lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    /// Initial state, entered at construction
    Active,
    /// Explicitly stopped by its owner
    Stopped,
    /// Timeout elapsed before the form was stopped
    TimedOut,
}

impl FormState {
    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped | Self::TimedOut)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Resolve the next state for an event, or `None` if the event does not
    /// apply in this state.
    pub fn transition(&self, event: FormEvent) -> Option<FormState> {
        match (self, event) {
            (Self::Active, FormEvent::Stop) => Some(Self::Stopped),
            (Self::Active, FormEvent::Timeout) => Some(Self::TimedOut),
            _ => None,
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::Active
    }
}

impl fmt::Display for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Stopped => write!(f, "stopped"),
            Self::TimedOut => write!(f, "timed_out"),
        }
    }
}

impl std::str::FromStr for FormState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "stopped" => Ok(Self::Stopped),
            "timed_out" => Ok(Self::TimedOut),
            _ => Err(format!("Invalid form state: {s}")),
        }
    }
}
