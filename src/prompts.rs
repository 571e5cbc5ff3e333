//! Prompt templates for the content assistant.
//!
//! User-supplied text is never spliced into instruction prose. It is placed in
//! labeled, delimited sections and capped in length first, so the surrounding
//! instructions stay intact whatever the content says.

use std::borrow::Cow;

use crate::models::EnhancementType;

/// Maximum number of characters of blog content embedded in a prompt.
pub const MAX_CONTENT_CHARS: usize = 20_000;

/// Maximum number of characters of user instructions embedded in a prompt.
pub const MAX_INSTRUCTION_CHARS: usize = 2_000;

/// Maximum number of characters of a topic or category name.
const MAX_LABEL_CHARS: usize = 200;

/// Wording for one named enhancement intent.
struct Template {
    intro: &'static str,
    instructions_label: &'static str,
    default_instructions: &'static str,
    closing: &'static str,
}

fn template(kind: EnhancementType) -> Option<Template> {
    let template = match kind {
        EnhancementType::Improve => Template {
            intro: "Please improve and enhance the following blog content while maintaining its core message and focus on startups. Make it more engaging, clear, and well-structured.",
            instructions_label: "Additional instructions",
            default_instructions: "Make it more professional and engaging",
            closing: "Please return only the enhanced content without any explanations or meta-commentary.",
        },
        EnhancementType::Expand => Template {
            intro: "Please expand the following blog content with more details, examples, and insights related to startups. Keep the same tone and style.",
            instructions_label: "Focus on",
            default_instructions: "Adding more practical examples and insights",
            closing: "Please return only the expanded content without any explanations or meta-commentary.",
        },
        EnhancementType::Summarize => Template {
            intro: "Please create a concise summary of the following blog content while keeping the key points about startups.",
            instructions_label: "Style preference",
            default_instructions: "Professional and clear summary",
            closing: "Please return only the summarized content without any explanations or meta-commentary.",
        },
        EnhancementType::Rewrite => Template {
            intro: "Please rewrite the following blog content according to the rewrite instructions, while keeping it focused on startups.",
            instructions_label: "Rewrite instructions",
            default_instructions: "Improve clarity and flow",
            closing: "Please return only the rewritten content without any explanations or meta-commentary.",
        },
        EnhancementType::Continue => Template {
            intro: "Please continue writing the following blog content about startups, maintaining the same tone and style.",
            instructions_label: "Direction to continue",
            default_instructions: "Continue with relevant startup insights",
            closing: "Please return only the continuation without any explanations or meta-commentary.",
        },
        EnhancementType::Other => return None,
    };
    Some(template)
}

/// Renders the prompt for an enhancement request.
///
/// Every named type embeds `content` (verbatim when under
/// [`MAX_CONTENT_CHARS`]) and `instructions`, or that type's default phrase
/// when `instructions` is empty. [`EnhancementType::Other`] uses a generic
/// template built from both inputs.
///
/// # Examples
///
/// ```
/// use startup_blog::models::EnhancementType;
/// use startup_blog::prompts::build_enhancement_prompt;
///
/// let prompt = build_enhancement_prompt(EnhancementType::Summarize, "Our MVP shipped.", "");
/// assert!(prompt.contains("Our MVP shipped."));
/// assert!(prompt.contains("Professional and clear summary"));
/// ```
pub fn build_enhancement_prompt(kind: EnhancementType, content: &str, instructions: &str) -> String {
    let content = cap(content, MAX_CONTENT_CHARS);
    let instructions = cap(instructions, MAX_INSTRUCTION_CHARS);

    let Some(template) = template(kind) else {
        return format!(
            "{instructions_section}\n\n{content_section}\n\nPlease provide a response that can be used to enhance this startup blog content. Return only the content without explanations.",
            instructions_section = section("Instructions", "INSTRUCTIONS", &instructions),
            content_section = section("Context/Current content", "CONTENT", &content),
        );
    };

    let instructions = if instructions.is_empty() {
        Cow::Borrowed(template.default_instructions)
    } else {
        instructions
    };

    format!(
        "{intro}\n\n{content_section}\n\n{instructions_section}\n\n{closing}",
        intro = template.intro,
        content_section = section("Current content", "CONTENT", &content),
        instructions_section = section(template.instructions_label, "INSTRUCTIONS", &instructions),
        closing = template.closing,
    )
}

/// Renders the idea-generation prompt.
///
/// Missing topic and category default to "startups" and "general startup".
pub fn ideas_prompt(topic: Option<&str>, category: Option<&str>) -> String {
    let topic = cap(topic.unwrap_or("startups"), MAX_LABEL_CHARS);
    let category = cap(category.unwrap_or("general startup"), MAX_LABEL_CHARS);

    format!(
        r#"Generate 5 engaging blog post ideas about the topic below, in the category below.

{topic_section}

{category_section}

Please format the response as a JSON array with objects containing 'title' and 'brief_description' fields.

Example format:
[
    {{
        "title": "Blog Title Here",
        "brief_description": "Brief description of what the blog would cover"
    }}
]

Focus on practical, actionable content that would be valuable for entrepreneurs and startup enthusiasts. Return only the JSON array, no additional text."#,
        topic_section = section("Topic", "TOPIC", &topic),
        category_section = section("Category", "CATEGORY", &category),
    )
}

/// Renders the relevance-scoring prompt for `content`.
pub fn relevance_prompt(content: &str) -> String {
    let content = cap(content, MAX_CONTENT_CHARS);

    format!(
        r#"Analyze the following content and determine if it's relevant and appropriate for a startup-focused blog. Provide a score from 1-10 (10 being highly relevant) and brief feedback.

{content_section}

Please respond in JSON format only:
{{
    "relevance_score": number,
    "feedback": "brief feedback about the content's relevance to startups",
    "suggestions": "suggestions to make it more relevant if needed"
}}

Return only the JSON object, no additional text."#,
        content_section = section("Content", "CONTENT", &content),
    )
}

/// Frames user text between labeled opening and closing markers.
fn section(label: &str, marker: &str, body: &str) -> String {
    format!("{label}:\n<<<{marker}\n{body}\n{marker}>>>")
}

/// Truncates `text` to at most `max_chars` characters on a char boundary.
fn cap(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => Cow::Owned(text[..byte_index].to_string()),
        None => Cow::Borrowed(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT: &str = "We bootstrapped to $1M ARR.\n\n\"Quotes\" and {braces} stay put.";

    #[test]
    fn every_named_type_embeds_content_verbatim() {
        for kind in EnhancementType::ALL {
            let prompt = build_enhancement_prompt(kind, CONTENT, "make it punchy");
            assert!(prompt.contains(CONTENT), "{kind} prompt lost the content");
            assert!(prompt.contains("make it punchy"), "{kind} prompt lost the instructions");
        }
    }

    #[test]
    fn empty_instructions_fall_back_to_per_type_default() {
        let cases = [
            (EnhancementType::Improve, "Make it more professional and engaging"),
            (EnhancementType::Expand, "Adding more practical examples and insights"),
            (EnhancementType::Summarize, "Professional and clear summary"),
            (EnhancementType::Rewrite, "Improve clarity and flow"),
            (EnhancementType::Continue, "Continue with relevant startup insights"),
        ];

        for (kind, default) in cases {
            let prompt = build_enhancement_prompt(kind, CONTENT, "");
            assert!(prompt.contains(default), "{kind} prompt missing default phrase");
        }
    }

    #[test]
    fn templates_are_distinct_per_type() {
        let prompts: std::collections::HashSet<String> = EnhancementType::ALL
            .into_iter()
            .map(|kind| build_enhancement_prompt(kind, CONTENT, ""))
            .collect();
        assert_eq!(prompts.len(), 5);
    }

    #[test]
    fn other_type_uses_generic_template_with_both_inputs() {
        let prompt = build_enhancement_prompt(EnhancementType::Other, CONTENT, "Write a tagline");

        assert!(prompt.contains("Write a tagline"));
        assert!(prompt.contains(CONTENT));
        assert!(prompt.contains("Context/Current content"));
        assert!(prompt.find("Write a tagline") < prompt.find(CONTENT));
    }

    #[test]
    fn content_is_framed_between_markers() {
        let prompt = build_enhancement_prompt(EnhancementType::Improve, "draft", "");
        assert!(prompt.contains("<<<CONTENT\ndraft\nCONTENT>>>"));
        assert!(prompt.contains("<<<INSTRUCTIONS\nMake it more professional and engaging\nINSTRUCTIONS>>>"));
    }

    #[test]
    fn overlong_content_is_capped() {
        let content = "é".repeat(MAX_CONTENT_CHARS + 50);
        let prompt = build_enhancement_prompt(EnhancementType::Expand, &content, "");

        let embedded = "é".repeat(MAX_CONTENT_CHARS);
        assert!(prompt.contains(&format!("<<<CONTENT\n{embedded}\nCONTENT>>>")));
    }

    #[test]
    fn cap_respects_char_boundaries() {
        assert_eq!(cap("héllo", 2), "hé");
        assert_eq!(cap("hi", 10), "hi");
        assert!(matches!(cap("hi", 2), Cow::Borrowed(_)));
    }

    #[test]
    fn ideas_prompt_defaults_topic_and_category() {
        let prompt = ideas_prompt(None, None);
        assert!(prompt.contains("<<<TOPIC\nstartups\nTOPIC>>>"));
        assert!(prompt.contains("<<<CATEGORY\ngeneral startup\nCATEGORY>>>"));
        assert!(prompt.contains("\"brief_description\""));
    }

    #[test]
    fn relevance_prompt_embeds_content_and_schema() {
        let prompt = relevance_prompt(CONTENT);
        assert!(prompt.contains(CONTENT));
        assert!(prompt.contains("\"relevance_score\": number"));
    }
}
