//! Overall document risk score.
//!
//! The backend reports `risk_score` as a number on some documents and as a
//! numeric string on others. Both forms land in [`RiskScore`].

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A 0-100 risk score as reported by the analysis backend.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct RiskScore(f64);

/// Coarse bucket used when colouring a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl RiskScore {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Parse a score from a number or a numeric string. Anything else is `None`.
    pub fn parse(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Self),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()).map(Self),
            _ => None,
        }
    }

    /// Above 75 is high, above 50 is medium, everything else is low.
    pub fn band(&self) -> RiskBand {
        if self.0 > 75.0 {
            RiskBand::High
        } else if self.0 > 50.0 {
            RiskBand::Medium
        } else {
            RiskBand::Low
        }
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl<'de> Deserialize<'de> for RiskScore {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::parse(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("not a risk score: {value}")))
    }
}

/// Render an optional score the way the dashboard does: `N/A` when absent.
pub fn display_score(score: Option<RiskScore>) -> String {
    score.map_or_else(|| "N/A".to_string(), |s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_number_and_numeric_string() {
        assert_eq!(RiskScore::parse(&json!(42)), Some(RiskScore(42.0)));
        assert_eq!(RiskScore::parse(&json!("67.5")), Some(RiskScore(67.5)));
        assert_eq!(RiskScore::parse(&json!(" 80 ")), Some(RiskScore(80.0)));
    }

    #[test]
    fn rejects_non_numeric() {
        assert_eq!(RiskScore::parse(&json!("high")), None);
        assert_eq!(RiskScore::parse(&json!(null)), None);
        assert_eq!(RiskScore::parse(&json!({"score": 3})), None);
    }

    #[test]
    fn band_thresholds() {
        assert_eq!(RiskScore(10.0).band(), RiskBand::Low);
        assert_eq!(RiskScore(50.0).band(), RiskBand::Low);
        assert_eq!(RiskScore(50.5).band(), RiskBand::Medium);
        assert_eq!(RiskScore(75.0).band(), RiskBand::Medium);
        assert_eq!(RiskScore(76.0).band(), RiskBand::High);
    }

    #[test]
    fn display_drops_trailing_zero() {
        assert_eq!(RiskScore(72.0).to_string(), "72");
        assert_eq!(RiskScore(72.5).to_string(), "72.5");
        assert_eq!(display_score(None), "N/A");
    }

    #[test]
    fn deserializes_from_string() {
        let score: RiskScore = serde_json::from_str("\"55\"").unwrap();
        assert_eq!(score.value(), 55.0);
        assert!(serde_json::from_str::<RiskScore>("true").is_err());
    }
}
