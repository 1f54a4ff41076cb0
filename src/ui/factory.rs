//! Descriptor to element construction, keyed by component kind.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::element::Element;
use crate::components::{ComponentDescriptor, ComponentKind};

pub type ElementConstructor = Arc<dyn Fn(&ComponentDescriptor) -> Element + Send + Sync>;

/// Builds elements for descriptors that have no live counterpart yet.
///
/// Kinds without a registered constructor get an opaque generic wrapper.
#[derive(Clone)]
pub struct ElementFactory {
    constructors: HashMap<ComponentKind, ElementConstructor>,
}

impl ElementFactory {
    /// Factory with no constructors; every descriptor becomes a generic wrapper.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    pub fn register<F>(&mut self, kind: ComponentKind, constructor: F)
    where
        F: Fn(&ComponentDescriptor) -> Element + Send + Sync + 'static,
    {
        self.constructors.insert(kind, Arc::new(constructor));
    }

    pub fn with<F>(mut self, kind: ComponentKind, constructor: F) -> Self
    where
        F: Fn(&ComponentDescriptor) -> Element + Send + Sync + 'static,
    {
        self.register(kind, constructor);
        self
    }

    pub fn handles(&self, kind: ComponentKind) -> bool {
        self.constructors.contains_key(&kind)
    }

    pub fn build(&self, descriptor: &ComponentDescriptor) -> Element {
        match self.constructors.get(&descriptor.kind()) {
            Some(constructor) => constructor(descriptor),
            None => Element::generic(descriptor.clone()),
        }
    }
}

impl Default for ElementFactory {
    fn default() -> Self {
        Self::empty()
            .with(ComponentKind::Button, Element::from_descriptor)
            .with(ComponentKind::Select, Element::from_descriptor)
    }
}

impl fmt::Debug for ElementFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.constructors.keys().map(|k| k.value()).collect();
        kinds.sort_unstable();
        f.debug_struct("ElementFactory").field("kinds", &kinds).finish()
    }
}
