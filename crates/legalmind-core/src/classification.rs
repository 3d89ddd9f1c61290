//! Document classification labels and the party entities they imply.
//!
//! The classification agent labels every upload with one of a fixed set of
//! document types. Each type has its own highlight schema, so the parties
//! worth showing live under different highlight keys per type.

use serde_json::{Map, Value};

use crate::record::DocumentAnalysis;

/// Document types the classification agent can assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    NonDisclosure,
    Employment,
    RentalLease,
    TermsOfService,
    GeneralBusiness,
    GeneralLegal,
    Sales,
    Service,
    Unsupported,
}

impl DocumentType {
    pub const ALL: [DocumentType; 9] = [
        Self::NonDisclosure,
        Self::Employment,
        Self::RentalLease,
        Self::TermsOfService,
        Self::GeneralBusiness,
        Self::GeneralLegal,
        Self::Sales,
        Self::Service,
        Self::Unsupported,
    ];

    /// The label string exactly as the backend emits it.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NonDisclosure => "Non-Disclosure Agreements (NDAs)",
            Self::Employment => "Employment Contracts",
            Self::RentalLease => "Rental & Lease Agreements",
            Self::TermsOfService => "Terms of Service",
            Self::GeneralBusiness => "General Business Contracts",
            Self::GeneralLegal => "General Legal Document",
            Self::Sales => "Sales Agreements",
            Self::Service => "Service Contracts",
            Self::Unsupported => "Unsupported Document Type",
        }
    }

    /// Exact-match lookup; labels are case-sensitive on the wire.
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }

    /// Highlight keys naming the parties, in display order.
    ///
    /// Empty for types without a party schema.
    pub fn entity_keys(&self) -> &'static [&'static str] {
        match self {
            Self::NonDisclosure => &["disclosing_party", "receiving_party"],
            Self::Employment => &["employee_name", "employer_name"],
            Self::RentalLease => &["landlord_name", "tenant_name"],
            Self::TermsOfService => &["company_name"],
            Self::GeneralBusiness | Self::GeneralLegal => &["party_a", "party_b"],
            Self::Sales => &["seller_name", "buyer_name"],
            Self::Service => &["service_provider_name", "client_name"],
            Self::Unsupported => &[],
        }
    }
}

/// Extract the parties named in a document's highlights.
///
/// Known document types pick their party keys from the highlights. Unknown
/// labels fall back to the first two highlight values in server order.
/// Missing or empty values are dropped.
pub fn extract_entities(analysis: &DocumentAnalysis) -> Vec<String> {
    let (Some(classification), Some(highlights)) =
        (analysis.classification.as_deref(), analysis.highlights.as_ref())
    else {
        return Vec::new();
    };
    if classification.is_empty() {
        return Vec::new();
    }

    match DocumentType::parse(classification).filter(|t| !t.entity_keys().is_empty()) {
        Some(doc_type) => doc_type
            .entity_keys()
            .iter()
            .filter_map(|key| highlights.get(*key).and_then(entity_text))
            .collect(),
        None => first_two_values(highlights),
    }
}

fn first_two_values(highlights: &Map<String, Value>) -> Vec<String> {
    highlights.values().take(2).filter_map(entity_text).collect()
}

/// Render a highlight value as entity text. Empty and falsy values yield `None`.
fn entity_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn analysis(classification: Option<&str>, highlights: Value) -> DocumentAnalysis {
        DocumentAnalysis {
            classification: classification.map(str::to_string),
            highlights: highlights.as_object().cloned(),
            ..Default::default()
        }
    }

    #[test]
    fn labels_round_trip() {
        for t in DocumentType::ALL {
            assert_eq!(DocumentType::parse(t.label()), Some(t));
        }
        assert_eq!(DocumentType::parse("employment contracts"), None);
    }

    #[test]
    fn nda_parties_in_table_order() {
        let a = analysis(
            Some("Non-Disclosure Agreements (NDAs)"),
            json!({"receiving_party": "Globex", "term": "2y", "disclosing_party": "Acme"}),
        );
        assert_eq!(extract_entities(&a), vec!["Acme", "Globex"]);
    }

    #[test]
    fn lease_drops_missing_tenant() {
        let a = analysis(
            Some("Rental & Lease Agreements"),
            json!({"landlord_name": "Jane Doe", "tenant_name": ""}),
        );
        assert_eq!(extract_entities(&a), vec!["Jane Doe"]);
    }

    #[test]
    fn general_types_share_keys() {
        let h = json!({"party_a": "A Ltd", "party_b": "B plc"});
        for label in ["General Business Contracts", "General Legal Document"] {
            assert_eq!(extract_entities(&analysis(Some(label), h.clone())), vec!["A Ltd", "B plc"]);
        }
    }

    #[test]
    fn terms_of_service_single_entity() {
        let a = analysis(Some("Terms of Service"), json!({"company_name": "Initech"}));
        assert_eq!(extract_entities(&a), vec!["Initech"]);
    }

    #[test]
    fn unknown_label_takes_first_two_values() {
        let a = analysis(
            Some("Privacy Policy"),
            json!({"controller": "DataCo", "processor": "", "dpo": "Ann"}),
        );
        // Only the first two values are considered; the empty one is dropped.
        assert_eq!(extract_entities(&a), vec!["DataCo"]);
    }

    #[test]
    fn requires_classification_and_highlights() {
        assert!(extract_entities(&analysis(None, json!({"party_a": "x"}))).is_empty());
        assert!(extract_entities(&analysis(Some("Sales Agreements"), json!(null))).is_empty());
        assert!(extract_entities(&analysis(Some(""), json!({"party_a": "x"}))).is_empty());
    }

    #[test]
    fn non_string_values_are_rendered() {
        let a = analysis(Some("Other"), json!({"amount": 5000, "flag": false}));
        assert_eq!(extract_entities(&a), vec!["5000"]);
    }
}
