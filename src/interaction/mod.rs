//! # Interaction Events
//!
//! Already-decoded component interactions as delivered by the transport layer.
//! An [`Interaction`] is cheap to clone: handler tasks, the form and the
//! registry all share the same underlying event and response channel.

pub mod response;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::components::{ComponentKind, DispatchKey};

pub use response::{InteractionResponder, InteractionResponse, NullResponder, ResponseKind};

/// Platform identifier of a message carrying interactive components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MessageId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Component payload of an interaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionData {
    pub component_type: ComponentKind,
    pub custom_id: String,
    /// Chosen option values; only select interactions carry any.
    #[serde(default)]
    pub values: Vec<String>,
}

impl InteractionData {
    pub fn button(custom_id: impl Into<String>) -> Self {
        Self {
            component_type: ComponentKind::Button,
            custom_id: custom_id.into(),
            values: Vec::new(),
        }
    }

    pub fn select(custom_id: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            component_type: ComponentKind::Select,
            custom_id: custom_id.into(),
            values,
        }
    }

    pub fn dispatch_key(&self) -> DispatchKey {
        DispatchKey::new(self.component_type, self.custom_id.clone())
    }
}

struct InteractionInner {
    id: String,
    data: InteractionData,
    message_id: Option<MessageId>,
    user_id: Option<String>,
    received_at: DateTime<Utc>,
    response: InteractionResponse,
}

#[derive(Clone)]
pub struct Interaction {
    inner: Arc<InteractionInner>,
}

impl Interaction {
    pub fn builder(data: InteractionData) -> InteractionBuilder {
        InteractionBuilder {
            id: None,
            data,
            message_id: None,
            user_id: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn data(&self) -> &InteractionData {
        &self.inner.data
    }

    pub fn dispatch_key(&self) -> DispatchKey {
        self.inner.data.dispatch_key()
    }

    pub fn message_id(&self) -> Option<MessageId> {
        self.inner.message_id
    }

    pub fn user_id(&self) -> Option<&str> {
        self.inner.user_id.as_deref()
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.inner.received_at
    }

    pub fn response(&self) -> &InteractionResponse {
        &self.inner.response
    }
}

impl fmt::Debug for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interaction")
            .field("id", &self.inner.id)
            .field("data", &self.inner.data)
            .field("message_id", &self.inner.message_id)
            .field("user_id", &self.inner.user_id)
            .field("responded", &self.inner.response.is_done())
            .finish()
    }
}

pub struct InteractionBuilder {
    id: Option<String>,
    data: InteractionData,
    message_id: Option<MessageId>,
    user_id: Option<String>,
}

impl InteractionBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn message_id(mut self, message_id: impl Into<MessageId>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn build(self, responder: Arc<dyn InteractionResponder>) -> Interaction {
        let id = self.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let response = InteractionResponse::new(id.clone(), responder);
        Interaction {
            inner: Arc::new(InteractionInner {
                id,
                data: self.data,
                message_id: self.message_id,
                user_id: self.user_id,
                received_at: Utc::now(),
                response,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_interaction_data_deserializes_platform_shape() {
        let data: InteractionData =
            serde_json::from_value(json!({"component_type": 3, "custom_id": "colour", "values": ["red"]}))
                .unwrap();
        assert_eq!(data, InteractionData::select("colour", vec!["red".into()]));

        let data: InteractionData =
            serde_json::from_value(json!({"component_type": 2, "custom_id": "ok"})).unwrap();
        assert!(data.values.is_empty());
    }

    #[test]
    fn test_clones_share_response_channel() {
        let interaction = Interaction::builder(InteractionData::button("ok"))
            .id("i-9")
            .message_id(77)
            .user_id("u-1")
            .build(Arc::new(NullResponder));
        let copy = interaction.clone();

        tokio_test::block_on(interaction.response().defer()).unwrap();
        assert!(copy.response().is_done());
        assert_eq!(copy.id(), "i-9");
        assert_eq!(copy.message_id(), Some(MessageId(77)));
        assert_eq!(
            copy.dispatch_key(),
            DispatchKey::new(ComponentKind::Button, "ok")
        );
    }
}
