use serde::{Deserialize, Serialize};

/// Events that can move a form out of the Active state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormEvent {
    /// Owner called `stop()`
    Stop,
    /// The form's timeout timer fired
    Timeout,
}

impl FormEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Timeout => "timeout",
        }
    }

    /// Value the completion signal resolves with for this event
    pub fn timed_out(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}
