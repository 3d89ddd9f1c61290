use serde::Serialize;

use crate::classification::extract_entities;
use crate::clauses::{NormalizedClause, extract_clauses};
use crate::qa::{QaPair, extract_qa};
use crate::record::AnalysisRecord;
use crate::risks::{RiskAssessment, categorize_risks};
use crate::score::RiskScore;

/// Everything the dashboard shows for one record, normalized in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentInsights {
    pub doc_id: String,
    pub name: String,
    pub classification: Option<String>,
    pub risk_score: Option<RiskScore>,
    pub summary: Option<String>,
    pub entities: Vec<String>,
    pub risks: RiskAssessment,
    pub clauses: Vec<NormalizedClause>,
    pub qa: Vec<QaPair>,
}

impl DocumentInsights {
    pub fn from_record(record: &AnalysisRecord) -> Self {
        Self {
            doc_id: record.doc_id.clone(),
            name: record.display_name().to_string(),
            classification: record.classification().map(str::to_string),
            risk_score: record.risk_score(),
            summary: record.summary().map(str::to_string),
            entities: record
                .document_analysis
                .as_ref()
                .map(extract_entities)
                .unwrap_or_default(),
            risks: categorize_risks(&record.risks),
            clauses: record
                .clause_explanation
                .as_deref()
                .map(extract_clauses)
                .unwrap_or_default(),
            qa: record
                .qa_response
                .as_ref()
                .map(|qa| extract_qa(&qa.questions))
                .unwrap_or_default(),
        }
    }
}
