use std::fmt;

use serde::{Deserialize, Serialize};

use super::SelectOption;
use crate::utils::{null_as_default, string_or_number};

/// A unique identifier for a tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagId(#[serde(deserialize_with = "string_or_number")] pub String);

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TagId {
    fn from(id: &str) -> Self {
        TagId(id.to_string())
    }
}

/// Represents a tag that can be associated with articles
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    /// The unique identifier of the tag
    pub id: TagId,

    /// The name of the tag
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Display color for the tag (in hex format)
    #[serde(default, deserialize_with = "null_as_default")]
    pub color: String,
}

impl Tag {
    pub fn apply(&mut self, patch: TagPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
    }

    pub fn to_option(&self) -> SelectOption {
        SelectOption {
            label: self.name.clone(),
            value: self.name.clone(),
            color: self.color.clone(),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagForm {
    pub name: String,
    pub color: String,
}

impl TagForm {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TagId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl TagPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}
