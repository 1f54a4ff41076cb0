//! # Platform Limits
//!
//! Operational boundaries imposed by the remote interaction platform. These are
//! fixed by the platform, not by configuration.

use std::time::Duration;

/// Maximum number of elements attached to a single form.
pub const MAX_FORM_ELEMENTS: usize = 25;

/// Maximum number of options a select menu may carry.
pub const MAX_SELECT_OPTIONS: usize = 25;

/// Maximum number of elements rendered in one layout row.
pub const MAX_ROW_WIDTH: usize = 5;

/// Highest group index the platform will render (five rows, zero based).
pub const MAX_GROUP_INDEX: u8 = 4;

/// Timeout applied by [`crate::ui::FormBuilder`] when none is given.
pub const DEFAULT_FORM_TIMEOUT: Duration = Duration::from_secs(180);

/// Field length limits enforced by element setters.
pub mod limits {
    pub const CUSTOM_ID_MAX_LEN: usize = 100;
    pub const BUTTON_LABEL_MAX_LEN: usize = 80;
    pub const PLACEHOLDER_MAX_LEN: usize = 150;
    pub const OPTION_LABEL_MAX_LEN: usize = 100;
    pub const OPTION_VALUE_MAX_LEN: usize = 100;
}

/// Lifecycle event names used in structured log output.
pub mod events {
    pub const FORM_REGISTERED: &str = "form.registered";
    pub const FORM_REMOVED: &str = "form.removed";
    pub const FORM_STOPPED: &str = "form.stopped";
    pub const FORM_TIMED_OUT: &str = "form.timed_out";
    pub const FORM_REFRESHED: &str = "form.refreshed";
    pub const REGISTRY_SWEPT: &str = "registry.swept";
}
