use serde::{Deserialize, Serialize};

use super::CategoryId;

/// A category that blog posts can be filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    /// Display name, unique case-insensitively.
    pub name: String,
    pub description: Option<String>,
}

/// A category together with the number of posts filed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: Category,
    pub blog_count: i64,
}

/// Fields accepted when creating or updating a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CategoryInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}
