//! Keyword classification of raw risk entries into the four dashboard categories.
//!
//! The risk agent returns a list whose entries may be prose, JSON-encoded
//! objects or objects. Each entry is resolved to a JSON value, reduced to a
//! display string, then bucketed by case-insensitive keyword match:
//!
//! - severity: "strong"/"high" → Strong, else "no risk" → No risks, else Medium
//! - category: "financial", then "compliance", then "timeline"/"delay", else other
//!
//! The first matching category wins. A later entry for the same named
//! category replaces the earlier one; the other bucket accumulates.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::record::RawRisk;

/// Severity shown on a risk card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskLevel {
    #[serde(rename = "No risks")]
    NoRisks,
    Medium,
    Strong,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoRisks => "No risks",
            Self::Medium => "Medium",
            Self::Strong => "Strong",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Financial,
    Compliance,
    Timeline,
    Other,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 4] = [
        Self::Financial,
        Self::Compliance,
        Self::Timeline,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Financial => "financial",
            Self::Compliance => "compliance",
            Self::Timeline => "timeline",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorizedRisk {
    pub level: RiskLevel,
    pub description: String,
}

impl CategorizedRisk {
    fn none_identified(category: RiskCategory) -> Self {
        Self {
            level: RiskLevel::NoRisks,
            description: format!("No {} risks identified.", category.as_str()),
        }
    }
}

/// The four risk cards of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub financial: CategorizedRisk,
    pub compliance: CategorizedRisk,
    pub timeline: CategorizedRisk,
    pub other: CategorizedRisk,
}

impl Default for RiskAssessment {
    fn default() -> Self {
        Self {
            financial: CategorizedRisk::none_identified(RiskCategory::Financial),
            compliance: CategorizedRisk::none_identified(RiskCategory::Compliance),
            timeline: CategorizedRisk::none_identified(RiskCategory::Timeline),
            other: CategorizedRisk::none_identified(RiskCategory::Other),
        }
    }
}

impl RiskAssessment {
    pub fn get(&self, category: RiskCategory) -> &CategorizedRisk {
        match category {
            RiskCategory::Financial => &self.financial,
            RiskCategory::Compliance => &self.compliance,
            RiskCategory::Timeline => &self.timeline,
            RiskCategory::Other => &self.other,
        }
    }

    /// Cards in display order.
    pub fn iter(&self) -> impl Iterator<Item = (RiskCategory, &CategorizedRisk)> {
        RiskCategory::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

/// Resolve a raw entry to a JSON value.
///
/// Strings that are not valid JSON become `{"explanation": <string>}`.
pub fn resolve_risk(raw: &RawRisk) -> Value {
    match raw {
        RawRisk::Text(text) => match serde_json::from_str::<Value>(text) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "risk entry is not JSON, using it as the explanation");
                let mut map = Map::new();
                map.insert("explanation".to_string(), Value::String(text.clone()));
                Value::Object(map)
            }
        },
        RawRisk::Structured(map) => Value::Object(map.clone()),
        RawRisk::Other(value) => value.clone(),
    }
}

/// The text shown for a resolved entry: its `explanation`, else the compact JSON.
pub fn risk_text(resolved: &Value) -> String {
    match resolved.get("explanation") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => resolved.to_string(),
    }
}

pub fn risk_level(text: &str) -> RiskLevel {
    let lower = text.to_lowercase();
    if lower.contains("strong") || lower.contains("high") {
        RiskLevel::Strong
    } else if lower.contains("no risk") {
        RiskLevel::NoRisks
    } else {
        RiskLevel::Medium
    }
}

pub fn risk_category(text: &str) -> RiskCategory {
    let lower = text.to_lowercase();
    if lower.contains("financial") {
        RiskCategory::Financial
    } else if lower.contains("compliance") {
        RiskCategory::Compliance
    } else if lower.contains("timeline") || lower.contains("delay") {
        RiskCategory::Timeline
    } else {
        RiskCategory::Other
    }
}

/// Bucket raw risk entries into the four categories.
pub fn categorize_risks(risks: &[RawRisk]) -> RiskAssessment {
    let mut assessment = RiskAssessment::default();
    let mut others: Vec<CategorizedRisk> = Vec::new();

    for raw in risks {
        let description = risk_text(&resolve_risk(raw));
        let risk = CategorizedRisk {
            level: risk_level(&description),
            description: description.clone(),
        };
        match risk_category(&description) {
            RiskCategory::Financial => assessment.financial = risk,
            RiskCategory::Compliance => assessment.compliance = risk,
            RiskCategory::Timeline => assessment.timeline = risk,
            RiskCategory::Other => others.push(risk),
        }
    }

    if !others.is_empty() {
        assessment.other = CategorizedRisk {
            level: others
                .iter()
                .map(|r| r.level)
                .max()
                .unwrap_or(RiskLevel::NoRisks),
            description: others
                .iter()
                .map(|r| r.description.as_str())
                .collect::<Vec<_>>()
                .join("\n\n"),
        };
    }

    assessment
}
