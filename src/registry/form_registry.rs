//! # Form Registry
//!
//! In-memory dispatch table routing interactions to the element that
//! produced them.
//!
//! ## Architecture
//!
//! ```text
//! Interaction -> dispatch((kind, custom_id)) -> sweep expired -> lookup
//!             -> refresh expiry + element selection -> Scheduler::schedule
//! ```
//!
//! Entries are keyed by [`DispatchKey`] and point back at their form and
//! element. Each entry carries its own sliding expiry, refreshed on every
//! dispatch and swept lazily; there is no background sweeper.
//!
//! The tables are mutated only by `add_form`, `remove_form` and the sweep
//! inside `dispatch`, each under one lock acquisition. Handler code always
//! runs after that lock is released.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::components::{ComponentDescriptor, ComponentKind, DispatchKey};
use crate::constants::events;
use crate::error::{FormError, Result};
use crate::execution::{Scheduler, TokioScheduler};
use crate::interaction::{Interaction, MessageId};
use crate::logging::log_registry_operation;
use crate::ui::{Element, Form};

/// What `dispatch` did with an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A task was handed to the scheduler
    Scheduled,
    /// No live entry matched; the interaction was dropped
    Ignored,
}

/// Registry statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub total_entries: usize,
    pub total_forms: usize,
    pub tracked_messages: usize,
}

struct RegistryEntry {
    form: Arc<Form>,
    element: Arc<Element>,
    expires_at: Option<Instant>,
}

#[derive(Default)]
struct RegistryState {
    entries: HashMap<DispatchKey, RegistryEntry>,
    synced_messages: HashMap<MessageId, Arc<Form>>,
}

impl RegistryState {
    fn sweep(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.expires_at.map_or(true, |expires_at| expires_at > now));
        before - self.entries.len()
    }
}

struct RegistryInner {
    id: Uuid,
    state: Mutex<RegistryState>,
    scheduler: Arc<dyn Scheduler>,
}

impl RegistryInner {
    fn remove_form(&self, form_id: Uuid) -> usize {
        let removed = {
            let mut state = self.state.lock();
            let before = state.entries.len();
            state.entries.retain(|_, entry| entry.form.id() != form_id);
            state
                .synced_messages
                .retain(|_, synced| synced.id() != form_id);
            before - state.entries.len()
        };

        log_registry_operation(
            events::FORM_REMOVED,
            Some(&form_id.to_string()),
            removed,
            "removed",
            None,
        );
        removed
    }
}

/// Dispatch registry shared by the transport layer and form lifecycles.
/// Clones share the same tables.
#[derive(Clone)]
pub struct FormRegistry {
    inner: Arc<RegistryInner>,
}

impl FormRegistry {
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                id: Uuid::new_v4(),
                state: Mutex::new(RegistryState::default()),
                scheduler,
            }),
        }
    }

    /// Registry scheduling onto the current tokio runtime.
    pub fn with_tokio() -> Result<Self> {
        Ok(Self::new(Arc::new(TokioScheduler::current()?)))
    }

    pub fn scheduler(&self) -> &Arc<dyn Scheduler> {
        &self.inner.scheduler
    }

    /// Register every dispatchable element of `form` and arm its timeout.
    ///
    /// Fails without touching the tables if any key is already held by
    /// another form or repeats within `form`, or if `form` is registered with
    /// a different registry. Re-adding a form replaces its previous entries. A message id, when given, is associated with this
    /// form, replacing any earlier association.
    pub fn add_form(&self, form: &Arc<Form>, message_id: Option<MessageId>) -> Result<()> {
        if !form.is_active() {
            return Err(FormError::form_not_active(form.id()));
        }

        let now = Instant::now();
        let expires_at = form.deadline_from(now);
        let elements = form.dispatchable_elements();

        let total = {
            let mut state = self.inner.state.lock();
            let swept = state.sweep(now);
            if swept > 0 {
                log_registry_operation(events::REGISTRY_SWEPT, None, swept, "swept", None);
            }

            let mut seen = HashSet::with_capacity(elements.len());
            for (key, _) in &elements {
                let taken = state
                    .entries
                    .get(key)
                    .is_some_and(|entry| entry.form.id() != form.id());
                if taken || !seen.insert(key) {
                    return Err(FormError::duplicate_key(key.kind, key.custom_id.clone()));
                }
            }
            if !form.claim_registry(self.inner.id) {
                return Err(FormError::form_already_registered(form.id()));
            }

            state.entries.retain(|_, entry| entry.form.id() != form.id());
            for (key, element) in elements {
                state.entries.insert(
                    key,
                    RegistryEntry {
                        form: Arc::clone(form),
                        element,
                        expires_at,
                    },
                );
            }
            if let Some(message_id) = message_id {
                state.synced_messages.insert(message_id, Arc::clone(form));
            }
            state.entries.len()
        };

        let inner = Arc::downgrade(&self.inner);
        form.set_teardown(Box::new(move |form: &Form| {
            if let Some(inner) = inner.upgrade() {
                inner.remove_form(form.id());
            }
        }));
        form.arm_timer(&self.inner.scheduler);

        // The form may have finished before its teardown was installed.
        if !form.is_active() {
            self.remove_form(form);
            return Ok(());
        }

        log_registry_operation(
            events::FORM_REGISTERED,
            Some(&form.id().to_string()),
            total,
            "registered",
            message_id.map(|id| id.to_string()).as_deref(),
        );
        Ok(())
    }

    /// Drop every entry and message association belonging to `form`.
    /// Returns the number of entries removed; zero when already gone.
    pub fn remove_form(&self, form: &Form) -> usize {
        let removed = self.inner.remove_form(form.id());
        form.release_registry(self.inner.id);
        removed
    }

    /// Route an interaction to its element's form.
    pub fn dispatch(
        &self,
        kind: ComponentKind,
        custom_id: &str,
        interaction: Interaction,
    ) -> DispatchOutcome {
        let key = DispatchKey::new(kind, custom_id);
        let now = Instant::now();

        let hit = {
            let mut state = self.inner.state.lock();
            let swept = state.sweep(now);
            if swept > 0 {
                log_registry_operation(events::REGISTRY_SWEPT, None, swept, "swept", None);
            }
            state.entries.get_mut(&key).map(|entry| {
                entry.expires_at = entry.form.deadline_from(now);
                (Arc::clone(&entry.form), Arc::clone(&entry.element))
            })
        };

        let Some((form, element)) = hit else {
            debug!(key = %key, interaction_id = %interaction.id(), "No live form for interaction");
            return DispatchOutcome::Ignored;
        };

        element.refresh_state(&interaction);
        form.arm_timer(&self.inner.scheduler);
        form.dispatch(self.inner.scheduler.as_ref(), element, interaction);
        DispatchOutcome::Scheduled
    }

    /// Route an interaction by the key in its own payload.
    pub fn dispatch_interaction(&self, interaction: Interaction) -> DispatchOutcome {
        let key = interaction.dispatch_key();
        self.dispatch(key.kind, &key.custom_id, interaction)
    }

    pub fn is_message_tracked(&self, message_id: MessageId) -> bool {
        self.inner
            .state
            .lock()
            .synced_messages
            .contains_key(&message_id)
    }

    pub fn form_for_message(&self, message_id: MessageId) -> Option<Arc<Form>> {
        self.inner
            .state
            .lock()
            .synced_messages
            .get(&message_id)
            .cloned()
    }

    /// Reconcile the form tracking `message_id` with the message's current
    /// components. Callers check [`Self::is_message_tracked`] first; an
    /// untracked message is logged and ignored.
    pub fn update_from_message(&self, message_id: MessageId, components: &[ComponentDescriptor]) {
        let Some(form) = self.form_for_message(message_id) else {
            warn!(message_id = %message_id, "Ignoring update for untracked message");
            return;
        };
        form.refresh(components);
    }

    pub fn contains_key(&self, key: &DispatchKey) -> bool {
        self.inner.state.lock().entries.contains_key(key)
    }

    pub fn stats(&self) -> RegistryStats {
        let state = self.inner.state.lock();
        let forms: HashSet<Uuid> = state.entries.values().map(|entry| entry.form.id()).collect();
        RegistryStats {
            total_entries: state.entries.len(),
            total_forms: forms.len(),
            tracked_messages: state.synced_messages.len(),
        }
    }
}

impl std::fmt::Debug for FormRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormRegistry")
            .field("stats", &self.stats())
            .finish()
    }
}
