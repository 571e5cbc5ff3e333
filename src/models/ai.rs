use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The transformation a user asks the assistant to apply to blog content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnhancementType {
    Improve,
    Expand,
    Summarize,
    Rewrite,
    Continue,
    /// Any unrecognized or missing type name.
    Other,
}

impl EnhancementType {
    /// The five named intents, in the order the editor offers them.
    pub const ALL: [EnhancementType; 5] = [
        EnhancementType::Improve,
        EnhancementType::Expand,
        EnhancementType::Summarize,
        EnhancementType::Rewrite,
        EnhancementType::Continue,
    ];

    /// Returns the wire name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            EnhancementType::Improve => "improve",
            EnhancementType::Expand => "expand",
            EnhancementType::Summarize => "summarize",
            EnhancementType::Rewrite => "rewrite",
            EnhancementType::Continue => "continue",
            EnhancementType::Other => "other",
        }
    }
}

impl From<&str> for EnhancementType {
    fn from(name: &str) -> Self {
        match name {
            "improve" => EnhancementType::Improve,
            "expand" => EnhancementType::Expand,
            "summarize" => EnhancementType::Summarize,
            "rewrite" => EnhancementType::Rewrite,
            "continue" => EnhancementType::Continue,
            _ => EnhancementType::Other,
        }
    }
}

impl From<Option<&str>> for EnhancementType {
    fn from(name: Option<&str>) -> Self {
        name.map(EnhancementType::from)
            .unwrap_or(EnhancementType::Other)
    }
}

impl fmt::Display for EnhancementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of an `enhance-content` request.
///
/// The raw type name is kept so the response can echo back exactly what the
/// client sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancementRequest {
    #[serde(default)]
    pub current_content: String,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub enhancement_type: Option<String>,
}

impl EnhancementRequest {
    /// Resolves the requested enhancement type, defaulting to `Other`.
    pub fn kind(&self) -> EnhancementType {
        EnhancementType::from(self.enhancement_type.as_deref())
    }

    /// User instructions, or an empty string when none were given.
    pub fn instructions(&self) -> &str {
        self.prompt.as_deref().unwrap_or("")
    }

    /// Returns `true` when neither content nor instructions were supplied.
    pub fn is_empty(&self) -> bool {
        self.current_content.is_empty() && self.instructions().is_empty()
    }
}

/// Body of a `generate-ideas` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl IdeaRequest {
    /// Topic with blanks treated as absent.
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref().filter(|t| !t.is_empty())
    }

    /// Category with blanks treated as absent.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }
}

/// A suggested blog post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub brief_description: String,
}

/// Assessment of how well a piece of content fits a startup-focused blog.
///
/// Fields the provider returns beyond the three known ones are kept in
/// `extra` and serialized alongside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceReport {
    /// Score from 1 (off-topic) to 10 (highly relevant).
    pub relevance_score: u8,
    pub feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enhancement_type_parses_known_names() {
        for kind in EnhancementType::ALL {
            assert_eq!(EnhancementType::from(kind.as_str()), kind);
        }
    }

    #[test]
    fn unknown_or_missing_enhancement_type_is_other() {
        assert_eq!(EnhancementType::from("polish"), EnhancementType::Other);
        assert_eq!(EnhancementType::from("Improve"), EnhancementType::Other);
        assert_eq!(EnhancementType::from(None), EnhancementType::Other);
    }

    #[test]
    fn enhancement_request_uses_camel_case_fields() {
        let request: EnhancementRequest = serde_json::from_str(
            r#"{"currentContent": "draft", "prompt": "tighten", "enhancementType": "summarize"}"#,
        )
        .unwrap();

        assert_eq!(request.current_content, "draft");
        assert_eq!(request.instructions(), "tighten");
        assert_eq!(request.kind(), EnhancementType::Summarize);
        assert!(!request.is_empty());
    }

    #[test]
    fn enhancement_request_without_content_or_prompt_is_empty() {
        let request: EnhancementRequest = serde_json::from_str("{}").unwrap();
        assert!(request.is_empty());

        let request = EnhancementRequest {
            prompt: Some(String::new()),
            ..Default::default()
        };
        assert!(request.is_empty());
    }

    #[test]
    fn idea_request_treats_blank_topic_as_absent() {
        let request = IdeaRequest {
            topic: Some(String::new()),
            category: Some("fintech".to_string()),
        };
        assert_eq!(request.topic(), None);
        assert_eq!(request.category(), Some("fintech"));
    }

    #[test]
    fn relevance_report_omits_missing_suggestions_and_flattens_extra() {
        let mut extra = Map::new();
        extra.insert("tone".to_string(), Value::from("upbeat"));
        let report = RelevanceReport {
            relevance_score: 9,
            feedback: "ok".to_string(),
            suggestions: None,
            extra,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["relevance_score"], 9);
        assert_eq!(json["tone"], "upbeat");
        assert!(json.get("suggestions").is_none());
    }
}
