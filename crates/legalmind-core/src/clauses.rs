//! Clause explanations from the clause-explanation agent.
//!
//! The agent is asked for `{"clauses": [{"clause", "explanation"}]}` but
//! often wraps it in prose, or ignores the request and answers with a
//! markdown bullet list:
//!
//! ```text
//! * **Termination**: Either party may terminate with 30 days notice.
//! * **Liability**: Capped at fees paid.
//! ```
//!
//! The JSON object is tried first (first `{` to last `}`), the bullet list
//! second.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::ParseError;

/// Bullet header: `* **<name>**:` plus trailing whitespace.
static BULLET_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\*\s*\*\*(.*?)\*\*:\s*").expect("valid regex"));

/// Start of the next bullet; ends the current explanation.
static BULLET_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\s*\*\*").expect("valid regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedClause {
    #[serde(default)]
    pub clause: String,
    #[serde(default)]
    pub explanation: String,
}

/// Extract clause/explanation pairs from free-form agent output. Never fails.
pub fn extract_clauses(text: &str) -> Vec<NormalizedClause> {
    if text.is_empty() {
        return Vec::new();
    }
    match parse_clause_json(text) {
        Ok(clauses) => clauses,
        Err(e) => {
            debug!(error = %e, "clause explanation is not JSON, trying bullet list");
            parse_clause_bullets(text)
        }
    }
}

/// Parse the span from the first `{` to the last `}` as a JSON object.
///
/// A valid object without a `clauses` array yields an empty list rather
/// than an error; only unparseable text falls through to the bullet parser.
fn parse_clause_json(text: &str) -> Result<Vec<NormalizedClause>, ParseError> {
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(ParseError::NotFound("JSON object"));
    };
    if end < start {
        return Err(ParseError::NotFound("JSON object"));
    }

    let value: Value = serde_json::from_str(&text[start..=end])?;
    let Some(Value::Array(items)) = value.get("clauses") else {
        return Ok(Vec::new());
    };
    Ok(items
        .iter()
        .filter_map(|item| NormalizedClause::deserialize(item).ok())
        .collect())
}

/// Parse `* **<name>**: <explanation>` bullets.
///
/// Each explanation runs to the next bullet marker or the end of the text.
/// Bullets with an empty name or explanation are skipped.
fn parse_clause_bullets(text: &str) -> Vec<NormalizedClause> {
    let mut clauses = Vec::new();
    let mut pos = 0;

    while let Some(caps) = BULLET_HEADER.captures_at(text, pos) {
        let Some(header) = caps.get(0) else { break };
        let body_start = header.end();
        let body_end = BULLET_MARKER
            .find_at(text, body_start)
            .map_or(text.len(), |m| m.start());

        let clause = caps.get(1).map_or("", |m| m.as_str()).trim();
        let explanation = text[body_start..body_end].trim();
        if !clause.is_empty() && !explanation.is_empty() {
            clauses.push(NormalizedClause {
                clause: clause.to_string(),
                explanation: explanation.to_string(),
            });
        }
        pos = body_end;
    }

    clauses
}

/// Render clauses in the bullet format understood by [`extract_clauses`].
pub fn render_clause_bullets(clauses: &[NormalizedClause]) -> String {
    clauses
        .iter()
        .map(|c| format!("* **{}**: {}", c.clause, c.explanation))
        .collect::<Vec<_>>()
        .join("\n")
}
