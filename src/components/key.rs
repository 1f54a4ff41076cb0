use std::fmt;

use super::kind::ComponentKind;

/// Routing key for an interactive element: unique across every registered,
/// dispatchable element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DispatchKey {
    pub kind: ComponentKind,
    pub custom_id: String,
}

impl DispatchKey {
    pub fn new(kind: ComponentKind, custom_id: impl Into<String>) -> Self {
        Self {
            kind,
            custom_id: custom_id.into(),
        }
    }
}

impl fmt::Display for DispatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.kind, self.custom_id)
    }
}
