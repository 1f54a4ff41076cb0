//! # Interaction Response Channel
//!
//! Each interaction can be answered exactly once. The response channel tracks
//! whether that happened so the dispatch pipeline knows when to fall back to a
//! deferred acknowledgement. Actual delivery is delegated to an
//! [`InteractionResponder`], which stands in for the platform transport.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::error::FormError;

/// What was sent back to the platform for an interaction
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseKind {
    /// Acknowledge without changing anything visible
    DeferredUpdate,
    /// Reply with a new message
    ChannelMessage { content: String, ephemeral: bool },
    /// Edit the message the component is attached to
    UpdateMessage {
        content: Option<String>,
        components: Vec<Value>,
    },
}

impl ResponseKind {
    pub fn response_type(&self) -> &'static str {
        match self {
            Self::DeferredUpdate => "deferred_update",
            Self::ChannelMessage { .. } => "channel_message",
            Self::UpdateMessage { .. } => "update_message",
        }
    }
}

/// Outbound side of the response channel
#[async_trait]
pub trait InteractionResponder: Send + Sync {
    async fn respond(&self, interaction_id: &str, response: ResponseKind) -> anyhow::Result<()>;
}

/// Responder that accepts and discards every response
#[derive(Debug, Default, Clone, Copy)]
pub struct NullResponder;

#[async_trait]
impl InteractionResponder for NullResponder {
    async fn respond(&self, interaction_id: &str, response: ResponseKind) -> anyhow::Result<()> {
        debug!(
            interaction_id = %interaction_id,
            response_type = response.response_type(),
            "Discarding interaction response"
        );
        Ok(())
    }
}

/// Single-use response channel attached to an interaction
pub struct InteractionResponse {
    interaction_id: String,
    responded: AtomicBool,
    responder: Arc<dyn InteractionResponder>,
}

impl InteractionResponse {
    pub fn new(interaction_id: impl Into<String>, responder: Arc<dyn InteractionResponder>) -> Self {
        Self {
            interaction_id: interaction_id.into(),
            responded: AtomicBool::new(false),
            responder,
        }
    }

    /// Whether a response has already been sent.
    pub fn is_done(&self) -> bool {
        self.responded.load(Ordering::Acquire)
    }

    pub async fn defer(&self) -> anyhow::Result<()> {
        self.send(ResponseKind::DeferredUpdate).await
    }

    pub async fn send_message(&self, content: impl Into<String>, ephemeral: bool) -> anyhow::Result<()> {
        self.send(ResponseKind::ChannelMessage {
            content: content.into(),
            ephemeral,
        })
        .await
    }

    pub async fn update_message(
        &self,
        content: Option<String>,
        components: Vec<Value>,
    ) -> anyhow::Result<()> {
        self.send(ResponseKind::UpdateMessage {
            content,
            components,
        })
        .await
    }

    async fn send(&self, response: ResponseKind) -> anyhow::Result<()> {
        if self
            .responded
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(FormError::already_responded(&self.interaction_id).into());
        }

        let result = self.responder.respond(&self.interaction_id, response).await;
        if result.is_err() {
            // Delivery failed, so the interaction is still unanswered.
            self.responded.store(false, Ordering::Release);
        }
        result
    }
}

impl std::fmt::Debug for InteractionResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionResponse")
            .field("interaction_id", &self.interaction_id)
            .field("responded", &self.is_done())
            .field("responder", &"<Arc<dyn InteractionResponder>>".to_string())
            .finish()
    }
}
