//! Analysis records as returned by the backend.
//!
//! Every field is untrusted: the AI pipeline behind the API produces
//! strings, JSON-in-strings or objects depending on the document and the
//! model's mood. Deserialization never fails on a wrong-shaped field; the
//! field falls back to its default instead.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::score::RiskScore;

/// One uploaded document and everything the backend derived from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub doc_id: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// ISO 8601 timestamp string.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub document_analysis: Option<DocumentAnalysis>,
    #[serde(default, deserialize_with = "lenient")]
    pub risks: Vec<RawRisk>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Highlights>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub highlighted_doc_url: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub qa_response: Option<QaPayload>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub clause_explanation: Option<String>,
}

/// The `document_analysis` block produced by the classification agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<RiskScore>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Field name → extracted value, in server order.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Map<String, Value>>,
}

/// A raw entry of the `risks` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRisk {
    /// Plain prose or a JSON-encoded object.
    Text(String),
    Structured(Map<String, Value>),
    Other(Value),
}

/// Top-level highlights: either a list or a mapping, contents heterogeneous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Highlights {
    List(Vec<Value>),
    Map(Map<String, Value>),
}

impl Highlights {
    pub fn len(&self) -> usize {
        match self {
            Self::List(items) => items.len(),
            Self::Map(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The `qa_response` block: pre-generated common questions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QaPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub questions: Vec<QaEntry>,
}

/// A raw question entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QaEntry {
    /// `"question: answer"` on one line.
    Text(String),
    Pair { question: String, answer: String },
    Other(Value),
}

/// Body of `GET /history`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryPage {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub history: Vec<AnalysisRecord>,
}

impl AnalysisRecord {
    /// Build the record carried by the final progress frame.
    ///
    /// Only the fields the stream is known to deliver are kept; file name,
    /// status and timestamp are left for the history endpoint to fill in.
    pub fn from_stream_payload(payload: &Value) -> Result<Self, serde_json::Error> {
        let full = AnalysisRecord::deserialize(payload)?;
        Ok(Self {
            filename: None,
            status: None,
            timestamp: None,
            ..full
        })
    }

    pub fn classification(&self) -> Option<&str> {
        self.document_analysis
            .as_ref()
            .and_then(|a| a.classification.as_deref())
    }

    pub fn risk_score(&self) -> Option<RiskScore> {
        self.document_analysis.as_ref().and_then(|a| a.risk_score)
    }

    pub fn summary(&self) -> Option<&str> {
        self.document_analysis
            .as_ref()
            .and_then(|a| a.summary.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// File name if known, otherwise the document id.
    pub fn display_name(&self) -> &str {
        self.filename
            .as_deref()
            .filter(|f| !f.is_empty())
            .unwrap_or(&self.doc_id)
    }
}

/// Find a record in a history listing by document id.
pub fn find_record<'a>(history: &'a [AnalysisRecord], doc_id: &str) -> Option<&'a AnalysisRecord> {
    history.iter().find(|r| r.doc_id == doc_id)
}

// ── Lenient field deserializers ──

/// Deserialize `T`, falling back to `T::default()` if the value has the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Deserialize a sequence, dropping elements that do not fit `T`.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| T::deserialize(item).ok())
        .collect())
}

/// Document ids are opaque strings; numeric ids are kept as their decimal text.
fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_history_record() {
        let json = r#"{
            "doc_id": "doc-1",
            "filename": "nda.pdf",
            "status": "completed",
            "timestamp": "2025-03-01T10:00:00Z",
            "document_analysis": {
                "classification": "Non-Disclosure Agreements (NDAs)",
                "risk_score": "68",
                "summary": "Mutual NDA between Acme and Globex.",
                "highlights": {"disclosing_party": "Acme", "receiving_party": "Globex"}
            },
            "risks": ["{\"explanation\":\"High financial penalty\"}", {"clause": "Term"}],
            "highlighted_doc_url": "https://storage.example/nda.pdf",
            "qa_response": {"questions": ["Who signs?: Both parties"]},
            "clause_explanation": "* **Term**: two years"
        }"#;
        let record: AnalysisRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.doc_id, "doc-1");
        assert_eq!(record.display_name(), "nda.pdf");
        assert_eq!(record.classification(), Some("Non-Disclosure Agreements (NDAs)"));
        assert_eq!(record.risk_score().map(|s| s.value()), Some(68.0));
        assert_eq!(record.summary(), Some("Mutual NDA between Acme and Globex."));
        assert_eq!(record.risks.len(), 2);
        assert!(matches!(record.risks[0], RawRisk::Text(_)));
        assert!(matches!(record.risks[1], RawRisk::Structured(_)));
        assert_eq!(record.qa_response.unwrap().questions.len(), 1);
    }

    #[test]
    fn wrong_shapes_fall_back_to_defaults() {
        let json = r#"{
            "doc_id": 42,
            "filename": ["not", "a", "string"],
            "document_analysis": "oops",
            "risks": null,
            "highlights": 7,
            "qa_response": {"questions": "nope"},
            "clause_explanation": {"clauses": []}
        }"#;
        let record: AnalysisRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.doc_id, "42");
        assert!(record.filename.is_none());
        assert!(record.document_analysis.is_none());
        assert!(record.risks.is_empty());
        assert!(record.highlights.is_none());
        assert!(record.qa_response.unwrap().questions.is_empty());
        assert!(record.clause_explanation.is_none());
    }

    #[test]
    fn empty_object_is_a_record() {
        let record: AnalysisRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, AnalysisRecord::default());
        assert_eq!(record.display_name(), "");
    }

    #[test]
    fn highlights_accept_list_or_map() {
        let list: AnalysisRecord =
            serde_json::from_value(json!({"highlights": ["a", 1, null]})).unwrap();
        assert!(matches!(list.highlights, Some(Highlights::List(ref v)) if v.len() == 3));

        let map: AnalysisRecord =
            serde_json::from_value(json!({"highlights": {"page_1": ["x"]}})).unwrap();
        assert_eq!(map.highlights.map(|h| h.len()), Some(1));
    }

    #[test]
    fn analysis_highlights_keep_server_order() {
        let analysis: DocumentAnalysis = serde_json::from_str(
            r#"{"highlights": {"zeta": "1", "alpha": "2", "mid": "3"}}"#,
        )
        .unwrap();
        let keys: Vec<&String> = analysis.highlights.as_ref().unwrap().keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn qa_entries_by_shape() {
        let payload: QaPayload = serde_json::from_value(json!({
            "questions": [
                "Term?: 12 months",
                {"question": "Who?", "answer": "Acme"},
                {"question": "Missing answer"},
                5
            ]
        }))
        .unwrap();
        assert!(matches!(payload.questions[0], QaEntry::Text(_)));
        assert!(matches!(payload.questions[1], QaEntry::Pair { .. }));
        assert!(matches!(payload.questions[2], QaEntry::Other(_)));
        assert!(matches!(payload.questions[3], QaEntry::Other(_)));
    }

    #[test]
    fn stream_payload_keeps_only_delivered_fields() {
        let payload = json!({
            "doc_id": "abc",
            "filename": "ignored.pdf",
            "risks": ["Delay in delivery"],
            "clause_explanation": "text"
        });
        let record = AnalysisRecord::from_stream_payload(&payload).unwrap();
        assert_eq!(record.doc_id, "abc");
        assert!(record.filename.is_none());
        assert_eq!(record.risks, vec![RawRisk::Text("Delay in delivery".into())]);
        assert_eq!(record.clause_explanation.as_deref(), Some("text"));
    }

    #[test]
    fn stream_payload_must_be_an_object() {
        assert!(AnalysisRecord::from_stream_payload(&json!("done")).is_err());
    }

    #[test]
    fn history_page_drops_malformed_entries() {
        let page: HistoryPage = serde_json::from_str(
            r#"{"history": [{"doc_id": "a"}, "garbage", {"doc_id": "b"}]}"#,
        )
        .unwrap();
        assert_eq!(page.history.len(), 2);
        assert_eq!(find_record(&page.history, "b").map(|r| r.doc_id.as_str()), Some("b"));
        assert!(find_record(&page.history, "zzz").is_none());
    }

    #[test]
    fn history_page_without_key_is_empty() {
        let page: HistoryPage = serde_json::from_str("{}").unwrap();
        assert!(page.history.is_empty());
    }
}
