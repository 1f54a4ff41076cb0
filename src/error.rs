//! # Form Store Error Types
//!
//! Validation and lifecycle errors surfaced synchronously by form, element and
//! registry mutation methods. Everything else the dispatch core does resolves
//! either as a silent drop or through a form's completion signal.

use thiserror::Error;

use crate::components::ComponentKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Form cannot have more than {limit} elements")]
    TooManyElements { limit: usize },

    #[error("Select menu cannot have more than {limit} options")]
    TooManyOptions { limit: usize },

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Dispatch key ({kind}, {custom_id}) is already registered")]
    DuplicateDispatchKey {
        kind: ComponentKind,
        custom_id: String,
    },

    #[error("Form {form_id} is no longer active")]
    FormNotActive { form_id: String },

    #[error("Form {form_id} is already registered with another registry")]
    FormAlreadyRegistered { form_id: String },

    #[error("Interaction {interaction_id} has already been responded to")]
    AlreadyResponded { interaction_id: String },

    #[error("Malformed component descriptor: {0}")]
    Descriptor(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Scheduler error: {0}")]
    Scheduler(String),
}

impl FormError {
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn duplicate_key(kind: ComponentKind, custom_id: impl Into<String>) -> Self {
        Self::DuplicateDispatchKey {
            kind,
            custom_id: custom_id.into(),
        }
    }

    pub fn form_not_active(form_id: impl ToString) -> Self {
        Self::FormNotActive {
            form_id: form_id.to_string(),
        }
    }

    pub fn form_already_registered(form_id: impl ToString) -> Self {
        Self::FormAlreadyRegistered {
            form_id: form_id.to_string(),
        }
    }

    pub fn already_responded(interaction_id: impl ToString) -> Self {
        Self::AlreadyResponded {
            interaction_id: interaction_id.to_string(),
        }
    }

    pub fn descriptor(message: impl Into<String>) -> Self {
        Self::Descriptor(message.into())
    }

    /// Whether this error belongs to the fail-fast validation class.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::TooManyElements { .. }
                | Self::TooManyOptions { .. }
                | Self::InvalidField { .. }
                | Self::DuplicateDispatchKey { .. }
                | Self::FormNotActive { .. }
                | Self::FormAlreadyRegistered { .. }
        )
    }
}

impl From<serde_json::Error> for FormError {
    fn from(err: serde_json::Error) -> Self {
        Self::Descriptor(err.to_string())
    }
}

impl From<config::ConfigError> for FormError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FormError>;
