//! Recovery of structured data from freeform model output.
//!
//! Providers wrap JSON in markdown fences, surround it with prose, or return
//! something else entirely. The functions here never fail: when the output
//! cannot be parsed they substitute a well-formed fallback and say so through
//! [`Normalized::Fallback`].

use serde_json::{Map, Value};

use crate::models::{Idea, RelevanceReport};

/// Score used when the provider omits or garbles the relevance score.
pub const DEFAULT_RELEVANCE_SCORE: u8 = 7;

/// Suggestion text used when the relevance response cannot be parsed.
pub const FALLBACK_SUGGESTIONS: &str =
    "Consider adding more specific startup examples and actionable insights.";

const FALLBACK_DESCRIPTION_CHARS: usize = 200;
const FALLBACK_FEEDBACK_CHARS: usize = 500;

/// Outcome of normalizing provider output.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized<T> {
    /// The output parsed and validated.
    Parsed(T),
    /// The output was unusable; this is a synthesized default.
    Fallback(T),
}

impl<T> Normalized<T> {
    /// Returns `true` if the value was synthesized.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Normalized::Fallback(_))
    }

    /// Borrows the contained value.
    pub fn value(&self) -> &T {
        match self {
            Normalized::Parsed(value) | Normalized::Fallback(value) => value,
        }
    }

    /// Unwraps the contained value regardless of origin.
    pub fn into_inner(self) -> T {
        match self {
            Normalized::Parsed(value) | Normalized::Fallback(value) => value,
        }
    }
}

/// Turns an idea-generation completion into a list of ideas.
///
/// Fences are stripped, then the first `[` through the last `]` is parsed as
/// a JSON array of ideas (or the whole text, if it has no brackets). An empty
/// array, a non-array, or any item that is not an object yields a single
/// fallback idea titled after `topic`.
///
/// # Examples
///
/// ```
/// use startup_blog::normalizer::normalize_ideas;
///
/// let raw = "```json\n[{\"title\": \"A\", \"brief_description\": \"B\"}]\n```";
/// let ideas = normalize_ideas(raw, None).into_inner();
/// assert_eq!(ideas[0].title, "A");
///
/// let ideas = normalize_ideas("not json at all", Some("SaaS"));
/// assert!(ideas.is_fallback());
/// assert_eq!(ideas.value()[0].title, "Blog Ideas for SaaS");
/// ```
pub fn normalize_ideas(raw: &str, topic: Option<&str>) -> Normalized<Vec<Idea>> {
    let cleaned = strip_code_fences(raw.trim());
    let candidate = extract_array(&cleaned).unwrap_or(cleaned.as_str());

    match serde_json::from_str::<Vec<Idea>>(candidate) {
        Ok(ideas) if !ideas.is_empty() => Normalized::Parsed(ideas),
        Ok(_) => {
            tracing::warn!("provider returned an empty idea list, using fallback");
            Normalized::Fallback(vec![fallback_idea(raw, topic)])
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not parse ideas from provider output, using fallback");
            Normalized::Fallback(vec![fallback_idea(raw, topic)])
        }
    }
}

/// Turns a relevance-check completion into a report.
///
/// The fence-stripped text must be a JSON object. A non-numeric or missing
/// `relevance_score` becomes [`DEFAULT_RELEVANCE_SCORE`]; numeric scores are
/// rounded and clamped to 1-10. Unknown fields are kept. Anything that does
/// not parse becomes a fallback report quoting the raw text.
///
/// # Examples
///
/// ```
/// use startup_blog::normalizer::normalize_relevance;
///
/// let report = normalize_relevance(r#"{"relevance_score": "high", "feedback": "ok"}"#);
/// assert_eq!(report.value().relevance_score, 7);
/// assert!(!report.is_fallback());
/// ```
pub fn normalize_relevance(raw: &str) -> Normalized<RelevanceReport> {
    let cleaned = strip_code_fences(raw.trim());

    let mut fields = match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Object(fields)) => fields,
        Ok(other) => {
            tracing::warn!(kind = json_kind(&other), "relevance output is not an object, using fallback");
            return Normalized::Fallback(fallback_report(raw));
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not parse relevance output, using fallback");
            return Normalized::Fallback(fallback_report(raw));
        }
    };

    let relevance_score = fields
        .remove("relevance_score")
        .and_then(|score| score.as_f64())
        .map(clamp_score)
        .unwrap_or(DEFAULT_RELEVANCE_SCORE);
    let feedback = fields.remove("feedback").map(text_of).unwrap_or_default();
    let suggestions = fields
        .remove("suggestions")
        .filter(|s| !s.is_null())
        .map(text_of);

    Normalized::Parsed(RelevanceReport {
        relevance_score,
        feedback,
        suggestions,
        extra: fields,
    })
}

/// Removes markdown code fences anywhere in `text`.
///
/// An opening fence loses its language tag (```` ```json ````), any spaces
/// or tabs after it and one line break, whether or not the JSON starts on
/// the next line. A closing fence loses only the line break that follows it.
/// The result is trimmed.
///
/// A fence opens a block when it is the first of a pair, or when it is the
/// last fence and only whitespace precedes it (output cut off before the
/// closing fence).
///
/// # Examples
///
/// ```
/// use startup_blog::normalizer::strip_code_fences;
///
/// assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
/// assert_eq!(strip_code_fences("```json {\"a\": 1}```"), "{\"a\": 1}");
/// ```
pub fn strip_code_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut fences_seen = 0usize;

    while let Some(pos) = rest.find("```") {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 3..];

        let paired = rest.contains("```");
        let opens = fences_seen % 2 == 0 && (paired || out.trim().is_empty());
        fences_seen += 1;

        if opens {
            rest = &rest[language_tag_len(rest)..];
            rest = rest.trim_start_matches([' ', '\t']);
        }

        rest = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .unwrap_or(rest);
    }

    out.push_str(rest);
    out.trim().to_string()
}

/// Length of a fence language tag such as `json` or `objective-c`.
fn language_tag_len(text: &str) -> usize {
    if !text.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return 0;
    }
    text.find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '_')))
        .unwrap_or(text.len())
}

/// Returns the span from the first `[` to the last `]`, if both exist in order.
fn extract_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;

    if start <= end {
        Some(&text[start..=end])
    } else {
        None
    }
}

fn fallback_idea(raw: &str, topic: Option<&str>) -> Idea {
    let description: String = raw
        .chars()
        .take(FALLBACK_DESCRIPTION_CHARS)
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    Idea {
        title: format!("Blog Ideas for {}", topic.unwrap_or("Startups")),
        brief_description: format!("{}...", description.trim()),
    }
}

fn fallback_report(raw: &str) -> RelevanceReport {
    let feedback = match raw.char_indices().nth(FALLBACK_FEEDBACK_CHARS) {
        Some((byte_index, _)) => format!("{}...", &raw[..byte_index]),
        None => raw.to_string(),
    };

    RelevanceReport {
        relevance_score: DEFAULT_RELEVANCE_SCORE,
        feedback,
        suggestions: Some(FALLBACK_SUGGESTIONS.to_string()),
        extra: Map::new(),
    }
}

fn clamp_score(score: f64) -> u8 {
    score.round().clamp(1.0, 10.0) as u8
}

/// Strings pass through as-is; any other JSON value is rendered as JSON.
fn text_of(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_IDEA: &str = r#"[{"title":"A","brief_description":"B"}]"#;

    fn idea(title: &str, description: &str) -> Idea {
        Idea {
            title: title.to_string(),
            brief_description: description.to_string(),
        }
    }

    #[test]
    fn plain_json_array_parses() {
        let ideas = normalize_ideas(ONE_IDEA, None);
        assert_eq!(ideas, Normalized::Parsed(vec![idea("A", "B")]));
    }

    #[test]
    fn fenced_array_matches_unfenced_result() {
        let fenced = format!("```json\n{ONE_IDEA}\n```");
        assert_eq!(normalize_ideas(&fenced, None), normalize_ideas(ONE_IDEA, None));
    }

    #[test]
    fn array_surrounded_by_prose_is_extracted() {
        let raw = format!("Here are some ideas for you:\n\n{ONE_IDEA}\n\nGood luck with the launch!");
        assert_eq!(normalize_ideas(&raw, None).into_inner(), vec![idea("A", "B")]);
    }

    #[test]
    fn five_ideas_keep_their_order() {
        let raw = (1..=5)
            .map(|i| format!(r#"{{"title": "T{i}", "brief_description": "D{i}"}}"#))
            .collect::<Vec<_>>()
            .join(",");
        let ideas = normalize_ideas(&format!("[{raw}]"), None).into_inner();

        let titles: Vec<&str> = ideas.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["T1", "T2", "T3", "T4", "T5"]);
    }

    #[test]
    fn missing_idea_fields_default_to_empty() {
        let ideas = normalize_ideas(r#"[{"title": "Only a title"}]"#, None);
        assert_eq!(ideas, Normalized::Parsed(vec![idea("Only a title", "")]));
    }

    #[test]
    fn non_json_falls_back_to_single_idea() {
        let ideas = normalize_ideas("not json at all", None);

        assert!(ideas.is_fallback());
        assert_eq!(
            ideas.into_inner(),
            vec![idea("Blog Ideas for Startups", "not json at all...")]
        );
    }

    #[test]
    fn empty_array_falls_back() {
        let ideas = normalize_ideas("[]", Some("Fintech"));
        assert!(ideas.is_fallback());
        assert_eq!(ideas.value()[0].title, "Blog Ideas for Fintech");
        assert_eq!(ideas.value().len(), 1);
    }

    #[test]
    fn array_of_non_objects_falls_back() {
        assert!(normalize_ideas(r#"["one", "two"]"#, None).is_fallback());
    }

    #[test]
    fn object_instead_of_array_falls_back() {
        assert!(normalize_ideas(r#"{"title": "A", "brief_description": "B"}"#, None).is_fallback());
    }

    #[test]
    fn fallback_description_replaces_punctuation_and_truncates() {
        let raw = format!("Idea: \"Scale\" fast! {}", "x".repeat(300));
        let ideas = normalize_ideas(&raw, None).into_inner();
        let description = &ideas[0].brief_description;

        assert!(description.starts_with("Idea   Scale  fast  xxx"));
        assert!(description.ends_with("..."));
        assert_eq!(description.chars().count(), 200 + 3);
    }

    #[test]
    fn fallback_description_keeps_non_ascii_letters() {
        let ideas = normalize_ideas("Café für Gründer: 創業", Some("Europe")).into_inner();

        assert_eq!(ideas[0].brief_description, "Café für Gründer  創業...");
    }

    #[test]
    fn relevance_object_parses() {
        let report = normalize_relevance(r#"{"relevance_score":9,"feedback":"ok"}"#);

        assert!(!report.is_fallback());
        let report = report.into_inner();
        assert_eq!(report.relevance_score, 9);
        assert_eq!(report.feedback, "ok");
        assert_eq!(report.suggestions, None);
        assert!(report.extra.is_empty());
    }

    #[test]
    fn non_numeric_score_is_coerced_to_default() {
        let report = normalize_relevance(r#"{"relevance_score":"high","feedback":"ok"}"#);
        assert_eq!(report.value().relevance_score, DEFAULT_RELEVANCE_SCORE);
        assert_eq!(report.value().feedback, "ok");
    }

    #[test]
    fn numeric_scores_are_rounded_and_clamped() {
        let score = |raw: &str| normalize_relevance(raw).into_inner().relevance_score;
        assert_eq!(score(r#"{"relevance_score": 8.6}"#), 9);
        assert_eq!(score(r#"{"relevance_score": 42}"#), 10);
        assert_eq!(score(r#"{"relevance_score": -3}"#), 1);
        assert_eq!(score(r#"{"feedback": "no score"}"#), 7);
    }

    #[test]
    fn fenced_relevance_object_parses_with_extra_fields() {
        let raw = "```json\n{\"relevance_score\": 6, \"feedback\": \"meh\", \"suggestions\": \"add data\", \"tone\": \"dry\"}\n```";
        let report = normalize_relevance(raw).into_inner();

        assert_eq!(report.relevance_score, 6);
        assert_eq!(report.suggestions.as_deref(), Some("add data"));
        assert_eq!(report.extra.get("tone"), Some(&Value::from("dry")));
    }

    #[test]
    fn garbage_relevance_output_falls_back() {
        let report = normalize_relevance("garbage");

        assert!(report.is_fallback());
        assert_eq!(
            report.into_inner(),
            RelevanceReport {
                relevance_score: 7,
                feedback: "garbage".to_string(),
                suggestions: Some(FALLBACK_SUGGESTIONS.to_string()),
                extra: Map::new(),
            }
        );
    }

    #[test]
    fn fallback_feedback_is_truncated_to_500_chars() {
        let raw = "ü".repeat(600);
        let report = normalize_relevance(&raw).into_inner();

        assert!(report.feedback.ends_with("..."));
        assert_eq!(report.feedback.chars().count(), 503);
    }

    #[test]
    fn non_object_relevance_json_falls_back() {
        assert!(normalize_relevance("8").is_fallback());
        assert!(normalize_relevance("[1, 2]").is_fallback());
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in [ONE_IDEA, "not json", "```\n[]\n```", "[{\"title\": 1}]"] {
            assert_eq!(normalize_ideas(raw, Some("AI")), normalize_ideas(raw, Some("AI")));
        }
        for raw in ["garbage", r#"{"relevance_score": 3}"#] {
            assert_eq!(normalize_relevance(raw), normalize_relevance(raw));
        }
    }

    #[test]
    fn strip_code_fences_handles_bare_and_tagged_fences() {
        assert_eq!(strip_code_fences("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("```json\r\n[1]\r\n```"), "[1]");
        assert_eq!(strip_code_fences("before ```json\n[1]``` after"), "before [1] after");
        assert_eq!(strip_code_fences("no fences here"), "no fences here");
    }

    #[test]
    fn strip_code_fences_removes_tag_without_a_line_break() {
        assert_eq!(strip_code_fences("```json {\"a\": 1}```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```json{\"a\": 1}```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```json \n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```json\t\r\n[1]"), "[1]");
    }

    #[test]
    fn strip_code_fences_keeps_numbers_after_a_bare_fence() {
        assert_eq!(strip_code_fences("```12```"), "12");
    }

    #[test]
    fn relevance_inside_inline_fences_parses() {
        for raw in [
            "```json {\"relevance_score\": 9, \"feedback\": \"ok\"}```",
            "```json{\"relevance_score\": 9, \"feedback\": \"ok\"}```",
            "```json \n{\"relevance_score\": 9, \"feedback\": \"ok\"}\n```",
        ] {
            let report = normalize_relevance(raw);
            assert!(!report.is_fallback(), "{raw:?} should parse");
            assert_eq!(report.value().relevance_score, 9);
            assert_eq!(report.value().feedback, "ok");
        }
    }

    #[test]
    fn strip_code_fences_keeps_text_glued_to_a_closing_fence() {
        assert_eq!(strip_code_fences("[1]\n```done"), "[1]\ndone");
    }

    #[test]
    fn extract_array_spans_first_open_to_last_close() {
        assert_eq!(extract_array("x [1] y [2] z"), Some("[1] y [2]"));
        assert_eq!(extract_array("] before ["), None);
        assert_eq!(extract_array("no brackets"), None);
    }
}
