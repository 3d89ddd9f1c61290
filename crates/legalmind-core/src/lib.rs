pub mod classification;
pub mod clauses;
pub mod error;
pub mod format;
pub mod insights;
pub mod qa;
pub mod record;
pub mod risks;
pub mod score;
pub mod timeline;

pub use classification::{DocumentType, extract_entities};
pub use clauses::{NormalizedClause, extract_clauses, render_clause_bullets};
pub use error::ParseError;
pub use format::{ResponseBlock, format_response};
pub use insights::DocumentInsights;
pub use qa::{QaPair, extract_qa};
pub use record::{
    AnalysisRecord, DocumentAnalysis, Highlights, HistoryPage, QaEntry, QaPayload, RawRisk,
    find_record,
};
pub use risks::{CategorizedRisk, RiskAssessment, RiskCategory, RiskLevel, categorize_risks};
pub use score::{RiskBand, RiskScore, display_score};
pub use timeline::{TIMELINE_PROMPT, TimelineEntry, extract_timeline};
