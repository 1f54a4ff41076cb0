use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use formstore_core::interaction::{
    Interaction, InteractionData, InteractionResponder, ResponseKind,
};
use formstore_core::ui::{
    handler_fn, ButtonSpec, Element, ElementCallback, Form, FormBuilder,
};

/// Responder that records every response it is asked to deliver
#[derive(Default)]
pub struct RecordingResponder {
    sent: Mutex<Vec<(String, ResponseKind)>>,
}

impl RecordingResponder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn responses(&self) -> Vec<(String, ResponseKind)> {
        self.sent.lock().clone()
    }

    pub fn defers(&self) -> usize {
        self.sent
            .lock()
            .iter()
            .filter(|(_, kind)| *kind == ResponseKind::DeferredUpdate)
            .count()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl InteractionResponder for RecordingResponder {
    async fn respond(&self, interaction_id: &str, response: ResponseKind) -> anyhow::Result<()> {
        self.sent.lock().push((interaction_id.to_string(), response));
        Ok(())
    }
}

pub fn click(custom_id: &str, responder: &Arc<RecordingResponder>) -> Interaction {
    Interaction::builder(InteractionData::button(custom_id)).build(responder.clone())
}

pub fn choose(custom_id: &str, values: &[&str], responder: &Arc<RecordingResponder>) -> Interaction {
    Interaction::builder(InteractionData::select(
        custom_id,
        values.iter().map(|v| v.to_string()).collect(),
    ))
    .build(responder.clone())
}

/// Handler that counts its invocations and does not respond
pub fn counting_handler(counter: Arc<AtomicUsize>) -> impl ElementCallback {
    handler_fn(move |_form, _element, _interaction| {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::AcqRel);
            Ok(())
        }
    })
}

/// Form of buttons with the given custom ids, each counting into `counter`
pub fn button_form(ids: &[&str], timeout: Option<Duration>, counter: &Arc<AtomicUsize>) -> Arc<Form> {
    let builder = ids.iter().fold(FormBuilder::new(), |builder, id| {
        builder.button(
            ButtonSpec::new(*id).custom_id(*id),
            counting_handler(counter.clone()),
        )
    });
    let builder = match timeout {
        Some(timeout) => builder.timeout(timeout),
        None => builder.no_timeout(),
    };
    builder.build().expect("form should build")
}

pub fn plain_button(id: &str) -> Element {
    Element::button(ButtonSpec::new(id).custom_id(id)).expect("button should build")
}
