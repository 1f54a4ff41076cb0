//! # Component Descriptors
//!
//! Immutable, already-decoded descriptions of interactive elements as the
//! platform sends and receives them. Payloads are tagged by an integer `type`
//! field, so decoding dispatches on that field by hand and each concrete
//! descriptor derives serde for its own body.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::emoji::PartialEmoji;
use super::key::DispatchKey;
use super::kind::{ButtonStyle, ComponentKind};
use crate::error::{FormError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ButtonDescriptor {
    #[serde(default)]
    pub style: ButtonStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<PartialEmoji>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<PartialEmoji>,
    #[serde(default)]
    pub default: bool,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            description: None,
            emoji: None,
            default: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_emoji(mut self, emoji: PartialEmoji) -> Self {
        self.emoji = Some(emoji);
        self
    }

    pub fn selected_by_default(mut self) -> Self {
        self.default = true;
        self
    }
}

fn one() -> i32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectMenuDescriptor {
    pub custom_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Expected to lie in 1..=25; the encoding layer enforces it, not us.
    #[serde(default = "one")]
    pub min_values: i32,
    #[serde(default = "one")]
    pub max_values: i32,
    #[serde(default)]
    pub options: Vec<SelectOption>,
}

impl SelectMenuDescriptor {
    pub fn new(custom_id: impl Into<String>) -> Self {
        Self {
            custom_id: custom_id.into(),
            placeholder: None,
            min_values: 1,
            max_values: 1,
            options: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComponentDescriptor {
    ActionRow { children: Vec<ComponentDescriptor> },
    Button(ButtonDescriptor),
    SelectMenu(SelectMenuDescriptor),
    /// A structural or not-yet-modelled component, kept verbatim.
    Unknown { kind: ComponentKind, raw: Value },
}

impl ComponentDescriptor {
    /// Decode one component payload by its integer `type` field.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| FormError::descriptor("component payload must be an object"))?;

        let raw_kind = object
            .get("type")
            .and_then(Value::as_u64)
            .ok_or_else(|| FormError::descriptor("component payload is missing `type`"))?;
        let kind = u8::try_from(raw_kind)
            .map(ComponentKind::from)
            .map_err(|_| FormError::descriptor(format!("component type {raw_kind} out of range")))?;

        match kind {
            ComponentKind::ActionRow => {
                let children = match object.get("components") {
                    Some(Value::Array(items)) => items
                        .iter()
                        .map(Self::from_value)
                        .collect::<Result<Vec<_>>>()?,
                    Some(_) => {
                        return Err(FormError::descriptor(
                            "action row `components` must be an array",
                        ))
                    }
                    None => Vec::new(),
                };
                Ok(Self::ActionRow { children })
            }
            ComponentKind::Button => Ok(Self::Button(serde_json::from_value(value.clone())?)),
            ComponentKind::Select => Ok(Self::SelectMenu(serde_json::from_value(value.clone())?)),
            ComponentKind::Unknown(_) => Ok(Self::Unknown {
                kind,
                raw: value.clone(),
            }),
        }
    }

    /// Decode a list of top-level component payloads.
    pub fn from_payloads(payloads: &[Value]) -> Result<Vec<Self>> {
        payloads.iter().map(Self::from_value).collect()
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::ActionRow { children } => serde_json::json!({
                "type": ComponentKind::ActionRow.value(),
                "components": children.iter().map(Self::to_value).collect::<Vec<_>>(),
            }),
            Self::Button(button) => tagged(ComponentKind::Button, button),
            Self::SelectMenu(select) => tagged(ComponentKind::Select, select),
            Self::Unknown { raw, .. } => raw.clone(),
        }
    }

    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::ActionRow { .. } => ComponentKind::ActionRow,
            Self::Button(_) => ComponentKind::Button,
            Self::SelectMenu(_) => ComponentKind::Select,
            Self::Unknown { kind, .. } => *kind,
        }
    }

    pub fn custom_id(&self) -> Option<&str> {
        match self {
            Self::Button(button) => button.custom_id.as_deref(),
            Self::SelectMenu(select) => Some(select.custom_id.as_str()),
            _ => None,
        }
    }

    /// Routing key, present only for interactive descriptors with a custom id.
    pub fn dispatch_key(&self) -> Option<DispatchKey> {
        let kind = self.kind();
        if !kind.is_interactive() {
            return None;
        }
        self.custom_id()
            .map(|custom_id| DispatchKey::new(kind, custom_id))
    }
}

fn tagged(kind: ComponentKind, body: &impl Serialize) -> Value {
    let mut map = match serde_json::to_value(body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    map.insert("type".to_string(), Value::from(kind.value()));
    Value::Object(map)
}

/// Flatten grouping descriptors into their children, in document order.
pub fn walk_components(components: &[ComponentDescriptor]) -> Vec<ComponentDescriptor> {
    let mut flat = Vec::with_capacity(components.len());
    for component in components {
        match component {
            ComponentDescriptor::ActionRow { children } => {
                flat.extend(walk_components(children));
            }
            other => flat.push(other.clone()),
        }
    }
    flat
}
