//! # Forms
//!
//! A [`Form`] owns an ordered set of elements, a lifecycle state, an optional
//! inactivity timeout and a one-shot completion signal.
//!
//! ## Lifecycle
//!
//! ```text
//! Active ──stop()──────▶ Stopped   (signal resolves false)
//!    │
//!    └──timer fires────▶ TimedOut  (signal resolves true, on_timeout runs)
//! ```
//!
//! Both terminal transitions end in the same teardown callback, which the
//! registry installs when the form is added and which removes every registry
//! entry pointing at this form.

use async_trait::async_trait;
use futures::FutureExt;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use super::element::{ButtonSpec, Element, ElementCallback, SelectSpec};
use super::factory::ElementFactory;
use super::layout::{build_layout, LayoutRow};
use super::signal::CompletionSignal;
use crate::components::{walk_components, ComponentDescriptor, DispatchKey};
use crate::config::FormsConfig;
use crate::constants::{events, DEFAULT_FORM_TIMEOUT, MAX_FORM_ELEMENTS};
use crate::error::{FormError, Result};
use crate::execution::{Scheduler, TimerHandle};
use crate::interaction::Interaction;
use crate::logging::log_form_operation;
use crate::state_machine::{FormEvent, FormState};

/// Cleanup installed by the registry; runs at most once per installation.
pub type Teardown = Box<dyn FnOnce(&Form) + Send + 'static>;

/// Overridable per-form hooks
#[async_trait]
pub trait FormBehavior: Send + Sync {
    /// Decide whether an interaction may reach its element's handler.
    ///
    /// Returning `Ok(false)`, returning an error, or panicking all deny the
    /// interaction silently.
    async fn interaction_check(
        &self,
        _form: &Arc<Form>,
        _interaction: &Interaction,
    ) -> anyhow::Result<bool> {
        Ok(true)
    }

    /// Runs as a scheduled task after the form times out.
    async fn on_timeout(&self, _form: &Arc<Form>) {}
}

/// Allows every interaction and ignores timeouts.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultBehavior;

impl FormBehavior for DefaultBehavior {}

pub struct Form {
    id: Uuid,
    timeout: Option<Duration>,
    label_prefix: String,
    elements: RwLock<Vec<Arc<Element>>>,
    behavior: Arc<dyn FormBehavior>,
    factory: Arc<ElementFactory>,
    state: Mutex<FormState>,
    completion: CompletionSignal,
    timer: Mutex<Option<TimerHandle>>,
    teardown: Mutex<Option<Teardown>>,
    registry: Mutex<Option<Uuid>>,
}

impl Form {
    pub fn builder() -> FormBuilder {
        FormBuilder::new()
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Instant at which the form expires if left idle from `now`. `None` when
    /// the form has no timeout or the deadline is beyond the clock's range.
    pub fn deadline_from(&self, now: Instant) -> Option<Instant> {
        self.timeout.and_then(|timeout| now.checked_add(timeout))
    }

    pub fn state(&self) -> FormState {
        *self.state.lock()
    }

    pub fn is_active(&self) -> bool {
        self.state().is_active()
    }

    /// Whether the completion signal has resolved.
    pub fn is_finished(&self) -> bool {
        self.completion.is_resolved()
    }

    /// Wait for the form to finish. Returns `true` if it timed out.
    pub async fn wait(&self) -> bool {
        self.completion.wait().await
    }

    pub fn elements(&self) -> Vec<Arc<Element>> {
        self.elements.read().clone()
    }

    pub fn len(&self) -> usize {
        self.elements.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.read().is_empty()
    }

    pub fn element_by_custom_id(&self, custom_id: &str) -> Option<Arc<Element>> {
        self.elements
            .read()
            .iter()
            .find(|element| element.custom_id().as_deref() == Some(custom_id))
            .cloned()
    }

    /// Elements that would enter a registry, with their routing keys.
    pub fn dispatchable_elements(&self) -> Vec<(DispatchKey, Arc<Element>)> {
        self.elements
            .read()
            .iter()
            .filter_map(|element| element.dispatch_key().map(|key| (key, Arc::clone(element))))
            .collect()
    }

    /// Append an element after construction.
    ///
    /// Registry entries are not updated; re-add the form to route to it.
    pub fn add_element(&self, element: Element) -> Result<Arc<Element>> {
        let mut elements = self.elements.write();
        if elements.len() >= MAX_FORM_ELEMENTS {
            return Err(FormError::TooManyElements {
                limit: MAX_FORM_ELEMENTS,
            });
        }
        let element = Arc::new(element);
        elements.push(Arc::clone(&element));
        Ok(element)
    }

    /// Returns `false` if the element was not part of this form.
    pub fn remove_element(&self, element: &Arc<Element>) -> bool {
        let mut elements = self.elements.write();
        let before = elements.len();
        elements.retain(|existing| !Arc::ptr_eq(existing, element));
        elements.len() != before
    }

    pub fn clear_elements(&self) {
        self.elements.write().clear();
    }

    pub fn to_layout(&self) -> Vec<LayoutRow> {
        build_layout(&self.elements.read())
    }

    /// Row payloads ready to attach to an outgoing message.
    pub fn to_components(&self) -> Vec<Value> {
        self.to_layout().iter().map(LayoutRow::to_value).collect()
    }

    /// Rebuild the element list from freshly decoded descriptors.
    ///
    /// Dispatchable elements whose key reappears are updated in place and
    /// kept; everything else is synthesized through the form's factory. The
    /// registry is left untouched.
    pub fn refresh(&self, descriptors: &[ComponentDescriptor]) {
        let flat = walk_components(descriptors);
        let mut elements = self.elements.write();

        let mut existing: HashMap<DispatchKey, Arc<Element>> = elements
            .iter()
            .filter_map(|element| element.dispatch_key().map(|key| (key, Arc::clone(element))))
            .collect();

        let mut kept = 0usize;
        let rebuilt: Vec<Arc<Element>> = flat
            .iter()
            .map(|descriptor| {
                let current = descriptor
                    .dispatch_key()
                    .and_then(|key| existing.remove(&key));
                match current {
                    Some(element) => {
                        element.refresh_component(descriptor);
                        kept += 1;
                        element
                    }
                    None => Arc::new(self.factory.build(descriptor)),
                }
            })
            .collect();

        debug!(
            event = events::FORM_REFRESHED,
            form_id = %self.id,
            kept = kept,
            total = rebuilt.len(),
            "Reconciled form elements"
        );
        *elements = rebuilt;
    }

    /// Stop the form: resolve the signal with `false`, cancel the timer and
    /// tear down registry entries. Calling it on a finished form does nothing.
    pub fn stop(&self) {
        let event = FormEvent::Stop;
        if !self.transition(event) {
            return;
        }

        self.completion.resolve(event.timed_out());
        if let Some(timer) = self.timer.lock().take() {
            timer.cancel();
        }
        log_form_operation(events::FORM_STOPPED, &self.id.to_string(), "stopped", None);
        self.run_teardown();
    }

    fn transition(&self, event: FormEvent) -> bool {
        let mut state = self.state.lock();
        match state.transition(event) {
            Some(next) => {
                *state = next;
                true
            }
            None => {
                debug!(
                    form_id = %self.id,
                    state = %state.to_string(),
                    event = event.event_type(),
                    "Ignoring event on finished form"
                );
                false
            }
        }
    }

    /// Bind the form to one registry. Fails if another registry holds it.
    pub(crate) fn claim_registry(&self, registry_id: Uuid) -> bool {
        let mut registry = self.registry.lock();
        match *registry {
            Some(owner) if owner != registry_id => false,
            _ => {
                *registry = Some(registry_id);
                true
            }
        }
    }

    pub(crate) fn release_registry(&self, registry_id: Uuid) {
        let mut registry = self.registry.lock();
        if *registry == Some(registry_id) {
            *registry = None;
        }
    }

    pub(crate) fn set_teardown(&self, teardown: Teardown) {
        *self.teardown.lock() = Some(teardown);
    }

    pub(crate) fn run_teardown(&self) {
        let teardown = self.teardown.lock().take();
        if let Some(teardown) = teardown {
            teardown(self);
        }
    }

    /// (Re)arm the timer at `now + timeout`. The timeout measures inactivity:
    /// every dispatch re-arms it, so the form only times out once it has been
    /// idle for the whole duration. Replaces and cancels any pending timer.
    /// No-op when `deadline_from` yields nothing or the form has finished.
    pub(crate) fn arm_timer(self: &Arc<Self>, scheduler: &Arc<dyn Scheduler>) {
        let Some(deadline) = self.deadline_from(Instant::now()) else {
            return;
        };

        let mut timer = self.timer.lock();
        if !self.is_active() {
            return;
        }

        let form = Arc::downgrade(self);
        let weak_scheduler: Weak<dyn Scheduler> = Arc::downgrade(scheduler);
        let handle = scheduler.call_at(
            self.task_label("timeout"),
            deadline,
            Box::new(move || {
                let (Some(form), Some(scheduler)) = (form.upgrade(), weak_scheduler.upgrade())
                else {
                    return;
                };
                if form.dispatch_timeout(scheduler.as_ref()) {
                    form.run_teardown();
                }
            }),
        );

        if let Some(previous) = timer.replace(handle) {
            previous.cancel();
        }
    }

    /// Move to `TimedOut`, resolve the signal with `true` and schedule
    /// `on_timeout`. Returns `false` if the form had already finished.
    pub(crate) fn dispatch_timeout(self: &Arc<Self>, scheduler: &dyn Scheduler) -> bool {
        let event = FormEvent::Timeout;
        if !self.transition(event) {
            return false;
        }

        self.timer.lock().take();
        self.completion.resolve(event.timed_out());
        log_form_operation(events::FORM_TIMED_OUT, &self.id.to_string(), "timed_out", None);

        let form = Arc::clone(self);
        let behavior = Arc::clone(&self.behavior);
        scheduler.schedule(
            self.task_label("on-timeout"),
            async move {
                behavior.on_timeout(&form).await;
                Ok(())
            }
            .boxed(),
        );
        true
    }

    /// Hand one interaction for `element` to the scheduler.
    pub(crate) fn dispatch(
        self: &Arc<Self>,
        scheduler: &dyn Scheduler,
        element: Arc<Element>,
        interaction: Interaction,
    ) {
        let form = Arc::clone(self);
        scheduler.schedule(
            self.task_label("dispatch"),
            async move { form.run_interaction(element, interaction).await }.boxed(),
        );
    }

    async fn run_interaction(
        self: Arc<Self>,
        element: Arc<Element>,
        interaction: Interaction,
    ) -> anyhow::Result<()> {
        let check = AssertUnwindSafe(self.behavior.interaction_check(&self, &interaction))
            .catch_unwind()
            .await;
        let allowed = match check {
            Ok(Ok(allowed)) => allowed,
            Ok(Err(e)) => {
                debug!(form_id = %self.id, interaction_id = %interaction.id(), error = %e, "Interaction check failed");
                false
            }
            Err(_) => {
                debug!(form_id = %self.id, interaction_id = %interaction.id(), "Interaction check panicked");
                false
            }
        };
        if !allowed {
            debug!(form_id = %self.id, interaction_id = %interaction.id(), "Interaction denied");
            return Ok(());
        }

        element.invoke(Arc::clone(&self), interaction.clone()).await?;

        if !interaction.response().is_done() {
            interaction.response().defer().await?;
        }
        Ok(())
    }

    fn task_label(&self, task: &str) -> String {
        format!("{}-form-{}-{}", self.label_prefix, task, self.id)
    }
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("id", &self.id)
            .field("timeout", &self.timeout)
            .field("state", &self.state())
            .field("elements", &self.len())
            .field("factory", &self.factory)
            .finish()
    }
}

/// Builder for [`Form`]
///
/// Element construction errors are kept until [`FormBuilder::build`] so that
/// declarations can be chained.
pub struct FormBuilder {
    timeout: Option<Duration>,
    label_prefix: String,
    behavior: Arc<dyn FormBehavior>,
    factory: ElementFactory,
    elements: Vec<Element>,
    error: Option<FormError>,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self {
            timeout: Some(DEFAULT_FORM_TIMEOUT),
            label_prefix: "formstore".to_string(),
            behavior: Arc::new(DefaultBehavior),
            factory: ElementFactory::default(),
            elements: Vec::new(),
            error: None,
        }
    }

    pub fn with_config(config: &FormsConfig) -> Self {
        let mut builder = Self::new();
        builder.timeout = config.default_timeout();
        builder.label_prefix = config.task_label_prefix.clone();
        builder
    }

    /// A zero duration disables the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    pub fn behavior(self, behavior: impl FormBehavior + 'static) -> Self {
        self.behavior_arc(Arc::new(behavior))
    }

    pub fn behavior_arc(mut self, behavior: Arc<dyn FormBehavior>) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn factory(mut self, factory: ElementFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Declare an element together with its handler.
    pub fn element(mut self, element: Element, handler: impl ElementCallback + 'static) -> Self {
        element.set_handler(Arc::new(handler));
        self.elements.push(element);
        self
    }

    /// Declare an element without a handler.
    pub fn passive(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn button(self, spec: ButtonSpec, handler: impl ElementCallback + 'static) -> Self {
        match Element::button(spec) {
            Ok(element) => self.element(element, handler),
            Err(e) => self.fail(e),
        }
    }

    pub fn select(self, spec: SelectSpec, handler: impl ElementCallback + 'static) -> Self {
        match Element::select(spec) {
            Ok(element) => self.element(element, handler),
            Err(e) => self.fail(e),
        }
    }

    fn fail(mut self, error: FormError) -> Self {
        self.error.get_or_insert(error);
        self
    }

    pub fn build(self) -> Result<Arc<Form>> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.elements.len() > MAX_FORM_ELEMENTS {
            return Err(FormError::TooManyElements {
                limit: MAX_FORM_ELEMENTS,
            });
        }

        Ok(Arc::new(Form {
            id: Uuid::new_v4(),
            timeout: self.timeout,
            label_prefix: self.label_prefix,
            elements: RwLock::new(self.elements.into_iter().map(Arc::new).collect()),
            behavior: self.behavior,
            factory: Arc::new(self.factory),
            state: Mutex::new(FormState::Active),
            completion: CompletionSignal::new(),
            timer: Mutex::new(None),
            teardown: Mutex::new(None),
            registry: Mutex::new(None),
        }))
    }
}

impl Default for FormBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ButtonDescriptor, ComponentKind};
    use crate::execution::InlineScheduler;
    use crate::interaction::{InteractionData, NullResponder};
    use std::sync::atomic::{AtomicBool, Ordering};

    async fn noop(_: Arc<Form>, _: Arc<Element>, _: Interaction) -> anyhow::Result<()> {
        Ok(())
    }

    fn button(id: &str) -> ButtonSpec {
        ButtonSpec::new(id).custom_id(id)
    }

    #[test]
    fn test_build_rejects_more_than_25_elements() {
        let mut builder = FormBuilder::new();
        for i in 0..26 {
            builder = builder.button(button(&format!("b{i}")), noop);
        }
        assert_eq!(
            builder.build().unwrap_err(),
            FormError::TooManyElements { limit: 25 }
        );
    }

    #[test]
    fn test_build_surfaces_first_element_error() {
        let err = FormBuilder::new()
            .button(ButtonSpec::new("bad").custom_id(""), noop)
            .button(button("ok"), noop)
            .build()
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_add_element_fails_at_capacity() {
        let mut builder = FormBuilder::new();
        for i in 0..25 {
            builder = builder.button(button(&format!("b{i}")), noop);
        }
        let form = builder.build().unwrap();
        let extra = Element::button(button("extra")).unwrap();
        assert!(form.add_element(extra).is_err());
        assert_eq!(form.len(), 25);
    }

    #[test]
    fn test_remove_element_by_identity() {
        let form = FormBuilder::new().button(button("a"), noop).build().unwrap();
        let element = form.element_by_custom_id("a").unwrap();
        assert!(form.remove_element(&element));
        assert!(!form.remove_element(&element));
        assert!(form.is_empty());
    }

    #[test]
    fn test_zero_timeout_means_no_timeout() {
        let form = FormBuilder::new().timeout(Duration::ZERO).build().unwrap();
        assert_eq!(form.timeout(), None);
    }

    #[test]
    fn test_stop_twice_is_a_no_op() {
        let form = FormBuilder::new().build().unwrap();
        let torn_down = Arc::new(AtomicBool::new(false));
        let flag = torn_down.clone();
        form.set_teardown(Box::new(move |_: &Form| flag.store(true, Ordering::Release)));

        form.stop();
        assert!(torn_down.load(Ordering::Acquire));
        assert_eq!(form.state(), FormState::Stopped);

        form.stop();
        assert_eq!(form.state(), FormState::Stopped);
        assert!(!futures::executor::block_on(form.wait()));
    }

    #[test]
    fn test_timeout_after_stop_is_ignored() {
        let scheduler = InlineScheduler::new();
        let form = FormBuilder::new().build().unwrap();
        form.stop();
        assert!(!form.dispatch_timeout(&scheduler));
        assert_eq!(form.state(), FormState::Stopped);
    }

    #[test]
    fn test_refresh_preserves_identity_and_flattens_rows() {
        let form = FormBuilder::new()
            .button(button("keep"), noop)
            .button(button("drop"), noop)
            .build()
            .unwrap();
        let keep = form.element_by_custom_id("keep").unwrap();
        let interaction =
            Interaction::builder(InteractionData::button("keep")).build(Arc::new(NullResponder));
        keep.refresh_state(&interaction);

        let descriptor = |id: &str, label: &str| {
            ComponentDescriptor::Button(ButtonDescriptor {
                custom_id: Some(id.into()),
                label: Some(label.into()),
                ..Default::default()
            })
        };
        form.refresh(&[ComponentDescriptor::ActionRow {
            children: vec![descriptor("new", "New"), descriptor("keep", "Kept")],
        }]);

        let elements = form.elements();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].custom_id().as_deref(), Some("new"));
        assert!(elements[0].handler().is_none());
        assert!(Arc::ptr_eq(&elements[1], &keep));
        assert!(keep.handler().is_some());
        assert_eq!(keep.label().as_deref(), Some("Kept"));
        assert_eq!(keep.kind(), ComponentKind::Button);
    }
}
