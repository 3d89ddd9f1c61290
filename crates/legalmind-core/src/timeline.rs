//! Key dates extracted by asking the Q&A endpoint a fixed question.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ParseError;

/// Question sent to the Q&A endpoint to obtain a timeline.
pub const TIMELINE_PROMPT: &str = "Extract key dates and events from the document. \
Present them as a JSON array of objects, where each object has 'date', 'title', and \
'description' keys. Also, identify potential risks and add an 'isRisk' boolean key to \
the corresponding objects. The response should be only the JSON array, without any \
introductory text or markdown formatting.";

/// Greedy: first `[` to last `]`, across lines.
static JSON_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("valid regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    #[serde(default, deserialize_with = "loose_text")]
    pub date: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub title: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub description: String,
    #[serde(default, rename = "isRisk", deserialize_with = "truthy")]
    pub is_risk: bool,
}

/// Extract timeline entries from the answer to [`TIMELINE_PROMPT`].
///
/// Returns an empty list on any parse failure.
pub fn extract_timeline(answer: &str) -> Vec<TimelineEntry> {
    match parse_timeline(answer) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "failed to parse timeline from answer");
            Vec::new()
        }
    }
}

fn parse_timeline(answer: &str) -> Result<Vec<TimelineEntry>, ParseError> {
    let json = JSON_ARRAY
        .find(answer)
        .map_or(answer, |m| m.as_str());

    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(ParseError::Shape("timeline is not a JSON array".to_string()));
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match TimelineEntry::deserialize(&item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(error = %e, "skipping timeline item");
                None
            }
        })
        .collect())
}

/// Strings as-is, numbers and booleans as text, null as empty.
fn loose_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!("expected text, got {other}"))),
    }
}

/// The answer is model output; accept anything a loosely typed reader would
/// treat as true.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_array() {
        let answer = r#"[{"date":"2024-01-01","title":"Signed","description":"Contract executed","isRisk":false},
                         {"date":"2024-06-30","title":"Renewal","description":"Auto-renews unless notice","isRisk":true}]"#;
        let entries = extract_timeline(answer);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].title, "Renewal");
        assert!(entries[1].is_risk);
    }

    #[test]
    fn array_wrapped_in_prose_and_fence() {
        let answer = "Here you go:\n```json\n[{\"date\":\"2024-01-01\",\"title\":\"Signed\",\"description\":\"Contract executed\"}]\n```";
        assert_eq!(
            extract_timeline(answer),
            vec![TimelineEntry {
                date: "2024-01-01".into(),
                title: "Signed".into(),
                description: "Contract executed".into(),
                is_risk: false,
            }]
        );
    }

    #[test]
    fn greedy_match_swallows_trailing_brackets() {
        // First `[` to last `]` is not valid JSON here; the result resets to empty.
        let answer = r#"[{"date":"2024","title":"A","description":"a"}] see [note]"#;
        assert!(extract_timeline(answer).is_empty());
    }

    #[test]
    fn no_brackets_parses_whole_text() {
        assert!(extract_timeline("No dates were found in this document.").is_empty());
        assert!(extract_timeline(r#"{"date": "2024"}"#).is_empty());
    }

    #[test]
    fn loose_field_types() {
        let answer = r#"[{"date": 2024, "title": "Start", "isRisk": "yes"}, {"title": null, "isRisk": 0}]"#;
        let entries = extract_timeline(answer);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].date, "2024");
        assert_eq!(entries[0].description, "");
        assert!(entries[0].is_risk);
        assert_eq!(entries[1].title, "");
        assert!(!entries[1].is_risk);
    }

    #[test]
    fn non_object_items_are_skipped() {
        let answer = r#"["2024-01-01", {"date": "2024-02-01", "title": "B", "description": "b"}]"#;
        let entries = extract_timeline(answer);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "B");
    }

    #[test]
    fn empty_array() {
        assert!(extract_timeline("[]").is_empty());
    }

    #[test]
    fn prompt_asks_for_is_risk() {
        assert!(TIMELINE_PROMPT.contains("'isRisk' boolean"));
    }
}
