use std::fmt;

use serde::{Deserialize, Serialize};

use super::SelectOption;
use crate::utils::{null_as_default, string_or_number};

/// Unique identifier for a category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId(#[serde(deserialize_with = "string_or_number")] pub String);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(id: &str) -> Self {
        CategoryId(id.to_string())
    }
}

/// Category used to group articles
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,
    /// Category name, unique by convention only
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Display color (hex format, e.g. "#409EFF")
    #[serde(default, deserialize_with = "null_as_default")]
    pub color: String,
    /// Number of articles in the category; denormalized and not kept in sync
    /// by this crate
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
}

impl Category {
    /// Merges a server echo into the category
    pub fn apply(&mut self, patch: CategoryPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(count) = patch.count {
            self.count = count;
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

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Fields submitted when creating a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryForm {
    pub name: String,
    pub color: String,
}

impl CategoryForm {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Body posted when creating a category; the article count starts at zero
#[derive(Debug, Serialize)]
pub(crate) struct NewCategory<'a> {
    #[serde(flatten)]
    pub form: &'a CategoryForm,
    pub count: u64,
}

/// Partial category for PATCH requests and server echoes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

impl CategoryPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_apply() {
        let mut category = Category {
            id: CategoryId::from("1"),
            name: "Tech".to_string(),
            color: "#409EFF".to_string(),
            count: 3,
        };

        category.apply(CategoryPatch::default().name("Technology"));

        assert_eq!(category.name, "Technology");
        assert_eq!(category.color, "#409EFF");
        assert_eq!(category.count, 3);
    }

    #[test]
    fn test_new_category_body() {
        let form = CategoryForm::new("Life", "#67C23A");
        let body = serde_json::to_value(NewCategory { form: &form, count: 0 }).unwrap();
        assert_eq!(body, json!({ "name": "Life", "color": "#67C23A", "count": 0 }));
    }

    #[test]
    fn test_extra_server_fields_are_ignored() {
        let category: Category = serde_json::from_value(json!({
            "id": "9",
            "name": "Notes",
            "color": "#E6A23C",
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(category.count, 0);
        assert_eq!(category.to_string(), "Notes");
    }
}
