//! # Elements
//!
//! An [`Element`] is the live, in-process counterpart of one component
//! descriptor. Its identity is the `Arc<Element>` itself: reconciliation
//! mutates an element in place so handlers and accumulated selection state
//! survive a message edit.
//!
//! Elements are shared between their form, the registry and running handler
//! tasks, so every mutable field sits behind its own lock and every setter
//! takes `&self`.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

use super::form::Form;
use super::token::new_dispatch_token;
use crate::components::{
    ButtonDescriptor, ButtonStyle, ComponentDescriptor, ComponentKind, DispatchKey,
    PartialEmoji, SelectMenuDescriptor, SelectOption,
};
use crate::constants::{limits, MAX_GROUP_INDEX, MAX_SELECT_OPTIONS};
use crate::error::{FormError, Result};
use crate::interaction::Interaction;

/// Callback invoked when an element receives an interaction
#[async_trait]
pub trait ElementCallback: Send + Sync {
    async fn call(
        &self,
        form: Arc<Form>,
        element: Arc<Element>,
        interaction: Interaction,
    ) -> anyhow::Result<()>;
}

#[async_trait]
impl<F, Fut> ElementCallback for F
where
    F: Fn(Arc<Form>, Arc<Element>, Interaction) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    async fn call(
        &self,
        form: Arc<Form>,
        element: Arc<Element>,
        interaction: Interaction,
    ) -> anyhow::Result<()> {
        (self)(form, element, interaction).await
    }
}

pub type HandlerRef = Arc<dyn ElementCallback>;

/// Pin a closure to the handler signature so its argument types are inferred.
pub fn handler_fn<F, Fut>(f: F) -> F
where
    F: Fn(Arc<Form>, Arc<Element>, Interaction) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    f
}

/// What the user last did to an element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum ElementBody {
    Button(ButtonDescriptor),
    Select(SelectMenuDescriptor),
    Generic(ComponentDescriptor),
}

impl ElementBody {
    fn to_descriptor(&self) -> ComponentDescriptor {
        match self {
            Self::Button(button) => ComponentDescriptor::Button(button.clone()),
            Self::Select(select) => ComponentDescriptor::SelectMenu(select.clone()),
            Self::Generic(descriptor) => descriptor.clone(),
        }
    }

    fn custom_id(&self) -> Option<&str> {
        match self {
            Self::Button(button) => button.custom_id.as_deref(),
            Self::Select(select) => Some(select.custom_id.as_str()),
            Self::Generic(descriptor) => descriptor.custom_id(),
        }
    }
}

/// Declarative description of a button
#[derive(Debug, Clone, Default)]
pub struct ButtonSpec {
    pub style: ButtonStyle,
    pub label: Option<String>,
    pub custom_id: Option<String>,
    pub url: Option<String>,
    pub disabled: bool,
    pub emoji: Option<PartialEmoji>,
    pub group: Option<u8>,
}

impl ButtonSpec {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    /// A button that opens `url` instead of producing interactions.
    pub fn link(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            style: ButtonStyle::Link,
            label: Some(label.into()),
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }

    pub fn custom_id(mut self, custom_id: impl Into<String>) -> Self {
        self.custom_id = Some(custom_id.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn emoji(mut self, emoji: PartialEmoji) -> Self {
        self.emoji = Some(emoji);
        self
    }

    pub fn group(mut self, group: u8) -> Self {
        self.group = Some(group);
        self
    }
}

/// Declarative description of a select menu
#[derive(Debug, Clone)]
pub struct SelectSpec {
    pub custom_id: Option<String>,
    pub placeholder: Option<String>,
    pub min_values: i32,
    pub max_values: i32,
    pub options: Vec<SelectOption>,
    pub group: Option<u8>,
}

impl Default for SelectSpec {
    fn default() -> Self {
        Self {
            custom_id: None,
            placeholder: None,
            min_values: 1,
            max_values: 1,
            options: Vec::new(),
            group: None,
        }
    }
}

impl SelectSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn custom_id(mut self, custom_id: impl Into<String>) -> Self {
        self.custom_id = Some(custom_id.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn values_range(mut self, min_values: i32, max_values: i32) -> Self {
        self.min_values = min_values;
        self.max_values = max_values;
        self
    }

    pub fn option(mut self, option: SelectOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn group(mut self, group: u8) -> Self {
        self.group = Some(group);
        self
    }
}

pub struct Element {
    kind: ComponentKind,
    body: RwLock<ElementBody>,
    group: RwLock<Option<u8>>,
    selection: RwLock<SelectionState>,
    handler: RwLock<Option<HandlerRef>>,
}

impl Element {
    fn from_body(kind: ComponentKind, body: ElementBody, group: Option<u8>) -> Self {
        Self {
            kind,
            body: RwLock::new(body),
            group: RwLock::new(group),
            selection: RwLock::new(SelectionState::default()),
            handler: RwLock::new(None),
        }
    }

    pub fn button(spec: ButtonSpec) -> Result<Self> {
        validate_group(spec.group)?;
        if let Some(label) = &spec.label {
            validate_len("label", label, limits::BUTTON_LABEL_MAX_LEN)?;
        }

        let (style, custom_id) = match spec.url {
            Some(_) => {
                if spec.custom_id.is_some() {
                    return Err(FormError::invalid_field(
                        "custom_id",
                        "link buttons cannot carry a custom id",
                    ));
                }
                (ButtonStyle::Link, None)
            }
            None if spec.style == ButtonStyle::Link => {
                return Err(FormError::invalid_field(
                    "url",
                    "link buttons require a url",
                ));
            }
            None => {
                let custom_id = spec.custom_id.unwrap_or_else(new_dispatch_token);
                validate_custom_id(&custom_id)?;
                (spec.style, Some(custom_id))
            }
        };

        let descriptor = ButtonDescriptor {
            style,
            custom_id,
            url: spec.url,
            disabled: spec.disabled,
            label: spec.label,
            emoji: spec.emoji,
        };
        Ok(Self::from_body(
            ComponentKind::Button,
            ElementBody::Button(descriptor),
            spec.group,
        ))
    }

    pub fn select(spec: SelectSpec) -> Result<Self> {
        validate_group(spec.group)?;
        if spec.options.len() > MAX_SELECT_OPTIONS {
            return Err(FormError::TooManyOptions {
                limit: MAX_SELECT_OPTIONS,
            });
        }
        if let Some(placeholder) = &spec.placeholder {
            validate_len("placeholder", placeholder, limits::PLACEHOLDER_MAX_LEN)?;
        }

        let custom_id = spec.custom_id.unwrap_or_else(new_dispatch_token);
        validate_custom_id(&custom_id)?;

        let descriptor = SelectMenuDescriptor {
            custom_id,
            placeholder: spec.placeholder,
            min_values: spec.min_values,
            max_values: spec.max_values,
            options: spec.options,
        };
        Ok(Self::from_body(
            ComponentKind::Select,
            ElementBody::Select(descriptor),
            spec.group,
        ))
    }

    /// Rebuild a button from a decoded descriptor, trusting its contents.
    pub fn reconstruct_button(descriptor: &ButtonDescriptor) -> Self {
        Self::from_body(
            ComponentKind::Button,
            ElementBody::Button(descriptor.clone()),
            None,
        )
    }

    pub fn reconstruct_select(descriptor: &SelectMenuDescriptor) -> Self {
        Self::from_body(
            ComponentKind::Select,
            ElementBody::Select(descriptor.clone()),
            None,
        )
    }

    /// Opaque wrapper around any descriptor.
    pub fn generic(descriptor: ComponentDescriptor) -> Self {
        Self::from_body(descriptor.kind(), ElementBody::Generic(descriptor), None)
    }

    pub fn from_descriptor(descriptor: &ComponentDescriptor) -> Self {
        match descriptor {
            ComponentDescriptor::Button(button) => Self::reconstruct_button(button),
            ComponentDescriptor::SelectMenu(select) => Self::reconstruct_select(select),
            other => Self::generic(other.clone()),
        }
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn custom_id(&self) -> Option<String> {
        self.body.read().custom_id().map(str::to_string)
    }

    /// Interactive kind with a custom id; only these enter the registry.
    pub fn is_dispatchable(&self) -> bool {
        self.kind.is_interactive() && self.body.read().custom_id().is_some()
    }

    pub fn dispatch_key(&self) -> Option<DispatchKey> {
        if !self.kind.is_interactive() {
            return None;
        }
        self.custom_id()
            .map(|custom_id| DispatchKey::new(self.kind, custom_id))
    }

    pub fn set_custom_id(&self, custom_id: impl Into<String>) -> Result<()> {
        let custom_id = custom_id.into();
        validate_custom_id(&custom_id)?;

        match &mut *self.body.write() {
            ElementBody::Button(button) if button.url.is_some() => Err(FormError::invalid_field(
                "custom_id",
                "link buttons cannot carry a custom id",
            )),
            ElementBody::Button(button) => {
                button.custom_id = Some(custom_id);
                Ok(())
            }
            ElementBody::Select(select) => {
                select.custom_id = custom_id;
                Ok(())
            }
            ElementBody::Generic(_) => Err(FormError::invalid_field(
                "custom_id",
                format!("{} elements have no custom id", self.kind),
            )),
        }
    }

    pub fn group(&self) -> Option<u8> {
        *self.group.read()
    }

    pub fn set_group(&self, group: Option<u8>) -> Result<()> {
        validate_group(group)?;
        *self.group.write() = group;
        Ok(())
    }

    pub fn label(&self) -> Option<String> {
        match &*self.body.read() {
            ElementBody::Button(button) => button.label.clone(),
            _ => None,
        }
    }

    pub fn set_label(&self, label: Option<String>) -> Result<()> {
        if let Some(label) = &label {
            validate_len("label", label, limits::BUTTON_LABEL_MAX_LEN)?;
        }
        self.with_button("label", |button| button.label = label)
    }

    pub fn set_disabled(&self, disabled: bool) -> Result<()> {
        self.with_button("disabled", |button| button.disabled = disabled)
    }

    pub fn is_disabled(&self) -> bool {
        matches!(&*self.body.read(), ElementBody::Button(button) if button.disabled)
    }

    pub fn set_style(&self, style: ButtonStyle) -> Result<()> {
        if style == ButtonStyle::Link {
            return Err(FormError::invalid_field(
                "style",
                "construct link buttons with ButtonSpec::link",
            ));
        }
        let mut body = self.body.write();
        match &mut *body {
            ElementBody::Button(button) if button.url.is_none() => {
                button.style = style;
                Ok(())
            }
            ElementBody::Button(_) => Err(FormError::invalid_field(
                "style",
                "link buttons keep the link style",
            )),
            _ => Err(self.wrong_kind("style", ComponentKind::Button)),
        }
    }

    pub fn placeholder(&self) -> Option<String> {
        match &*self.body.read() {
            ElementBody::Select(select) => select.placeholder.clone(),
            _ => None,
        }
    }

    pub fn set_placeholder(&self, placeholder: Option<String>) -> Result<()> {
        if let Some(placeholder) = &placeholder {
            validate_len("placeholder", placeholder, limits::PLACEHOLDER_MAX_LEN)?;
        }
        self.with_select("placeholder", |select| {
            select.placeholder = placeholder;
            Ok(())
        })
    }

    /// Stored as given; range checks belong to the encoding layer.
    pub fn set_min_values(&self, min_values: i32) -> Result<()> {
        self.with_select("min_values", |select| {
            select.min_values = min_values;
            Ok(())
        })
    }

    pub fn set_max_values(&self, max_values: i32) -> Result<()> {
        self.with_select("max_values", |select| {
            select.max_values = max_values;
            Ok(())
        })
    }

    pub fn options(&self) -> Vec<SelectOption> {
        match &*self.body.read() {
            ElementBody::Select(select) => select.options.clone(),
            _ => Vec::new(),
        }
    }

    pub fn add_option(&self, label: impl Into<String>, value: impl Into<String>) -> Result<()> {
        self.append_option(SelectOption::new(label, value))
    }

    /// Fails once the menu already holds the maximum number of options,
    /// leaving the existing options untouched.
    pub fn append_option(&self, option: SelectOption) -> Result<()> {
        validate_len("option.label", &option.label, limits::OPTION_LABEL_MAX_LEN)?;
        validate_len("option.value", &option.value, limits::OPTION_VALUE_MAX_LEN)?;
        self.with_select("options", |select| {
            if select.options.len() >= MAX_SELECT_OPTIONS {
                return Err(FormError::TooManyOptions {
                    limit: MAX_SELECT_OPTIONS,
                });
            }
            select.options.push(option);
            Ok(())
        })
    }

    /// Values chosen in the most recent interaction.
    pub fn values(&self) -> Vec<String> {
        self.selection.read().values.clone()
    }

    pub fn selection(&self) -> SelectionState {
        self.selection.read().clone()
    }

    /// Overwrite the selection state from an incoming interaction.
    pub fn refresh_state(&self, interaction: &Interaction) {
        *self.selection.write() = SelectionState {
            values: interaction.data().values.clone(),
        };
    }

    /// Replace the element's descriptor in place, keeping identity, handler,
    /// group and selection state.
    pub fn refresh_component(&self, descriptor: &ComponentDescriptor) {
        if descriptor.kind() != self.kind {
            warn!(
                element_kind = %self.kind,
                descriptor_kind = %descriptor.kind(),
                "Ignoring component refresh with mismatched kind"
            );
            return;
        }

        let mut body = self.body.write();
        let next = match (&*body, descriptor) {
            (ElementBody::Button(_), ComponentDescriptor::Button(button)) => {
                ElementBody::Button(button.clone())
            }
            (ElementBody::Select(_), ComponentDescriptor::SelectMenu(select)) => {
                ElementBody::Select(select.clone())
            }
            (_, other) => ElementBody::Generic(other.clone()),
        };
        *body = next;
    }

    pub fn to_descriptor(&self) -> ComponentDescriptor {
        self.body.read().to_descriptor()
    }

    pub fn handler(&self) -> Option<HandlerRef> {
        self.handler.read().clone()
    }

    pub fn set_handler(&self, handler: HandlerRef) {
        *self.handler.write() = Some(handler);
    }

    /// Run the attached handler, if any. Elements without one do nothing.
    pub async fn invoke(self: &Arc<Self>, form: Arc<Form>, interaction: Interaction) -> anyhow::Result<()> {
        match self.handler() {
            Some(handler) => handler.call(form, Arc::clone(self), interaction).await,
            None => Ok(()),
        }
    }

    fn with_button(&self, field: &str, apply: impl FnOnce(&mut ButtonDescriptor)) -> Result<()> {
        match &mut *self.body.write() {
            ElementBody::Button(button) => {
                apply(button);
                Ok(())
            }
            _ => Err(self.wrong_kind(field, ComponentKind::Button)),
        }
    }

    fn with_select(
        &self,
        field: &str,
        apply: impl FnOnce(&mut SelectMenuDescriptor) -> Result<()>,
    ) -> Result<()> {
        match &mut *self.body.write() {
            ElementBody::Select(select) => apply(select),
            _ => Err(self.wrong_kind(field, ComponentKind::Select)),
        }
    }

    fn wrong_kind(&self, field: &str, expected: ComponentKind) -> FormError {
        FormError::invalid_field(
            field,
            format!("only {expected} elements have this field, not {}", self.kind),
        )
    }
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("kind", &self.kind)
            .field("custom_id", &self.custom_id())
            .field("group", &self.group())
            .field("selection", &*self.selection.read())
            .field("has_handler", &self.handler.read().is_some())
            .finish()
    }
}

fn validate_custom_id(custom_id: &str) -> Result<()> {
    if custom_id.is_empty() {
        return Err(FormError::invalid_field("custom_id", "must not be empty"));
    }
    validate_len("custom_id", custom_id, limits::CUSTOM_ID_MAX_LEN)
}

fn validate_len(field: &str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        return Err(FormError::invalid_field(
            field,
            format!("length {len} exceeds {max} characters"),
        ));
    }
    Ok(())
}

fn validate_group(group: Option<u8>) -> Result<()> {
    match group {
        Some(group) if group > MAX_GROUP_INDEX => Err(FormError::invalid_field(
            "group",
            format!("{group} is outside 0..={MAX_GROUP_INDEX}"),
        )),
        _ => Ok(()),
    }
}
