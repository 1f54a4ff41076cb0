use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Emoji attached to a button or select option.
///
/// Custom emoji carry an id; unicode emoji only a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialEmoji {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub animated: bool,
}

impl PartialEmoji {
    pub fn unicode(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            id: None,
            animated: false,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.id.is_some()
    }
}

impl FromStr for PartialEmoji {
    type Err = std::convert::Infallible;

    /// Accepts `<a:name:id>`, `<:name:id>`, `name:id`, or a bare unicode emoji.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
            .unwrap_or(trimmed);

        let (animated, body) = match inner.strip_prefix("a:") {
            Some(rest) => (true, rest),
            None => (false, inner.strip_prefix(':').unwrap_or(inner)),
        };

        if let Some((name, id)) = body.rsplit_once(':') {
            if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
                return Ok(Self {
                    name: Some(name.to_string()),
                    id: Some(id.to_string()),
                    animated,
                });
            }
        }

        Ok(Self::unicode(trimmed))
    }
}
