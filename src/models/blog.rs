use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use super::{BlogId, CategoryId};

/// A published blog post, joined with its category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    /// Unique identifier from the database.
    pub id: BlogId,
    pub title: String,
    pub content: String,
    /// Category the post is filed under, if any.
    pub category_id: Option<CategoryId>,
    pub author: String,
    /// When this post was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When this post was last updated.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// Name of the linked category, resolved at query time.
    pub category_name: Option<String>,
}

/// Fields accepted when creating a blog post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewBlog {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "category_id_from_form")]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub author: String,
}

impl NewBlog {
    /// Returns the name of the first required field that is blank.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.title.trim().is_empty() {
            Some("title")
        } else if self.content.trim().is_empty() {
            Some("content")
        } else if self.author.trim().is_empty() {
            Some("author")
        } else {
            None
        }
    }
}

/// Fields accepted when updating a blog post.
///
/// The author is fixed at creation time and cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BlogUpdate {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "category_id_from_form")]
    pub category_id: Option<CategoryId>,
}

impl BlogUpdate {
    /// Returns `true` when both title and content are present.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }
}

/// Accepts a category ID as a number, a numeric string (HTML `<select>`
/// values), or `""`/null for no category.
fn category_id_from_form<'de, D>(deserializer: D) -> Result<Option<CategoryId>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FormValue {
        Number(i64),
        Text(String),
    }

    match Option::<FormValue>::deserialize(deserializer)? {
        None => Ok(None),
        Some(FormValue::Number(id)) => Ok(Some(CategoryId::new(id))),
        Some(FormValue::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(FormValue::Text(text)) => text
            .trim()
            .parse()
            .map(|id| Some(CategoryId::new(id)))
            .map_err(|_| D::Error::custom(format!("invalid category_id: {text:?}"))),
    }
}
