use std::fmt;
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Urgency of the advice as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Colour glyph shown in front of the summary
    pub fn glyph(&self) -> &'static str {
        match self {
            Priority::Low => "🟩",
            Priority::Medium => "🟨",
            Priority::High => "🟥",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "Low"),
            Priority::Medium => write!(f, "Medium"),
            Priority::High => write!(f, "High"),
        }
    }
}

/// Estimated 10-year diabetes risk as a percentage, 0.0–70.0 at one decimal
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(from = "f64", into = "f64")]
pub struct RiskScore(f64);

impl From<f64> for RiskScore {
    fn from(value: f64) -> Self {
        RiskScore::new(value)
    }
}

impl From<RiskScore> for f64 {
    fn from(score: RiskScore) -> Self {
        score.0
    }
}

impl RiskScore {
    /// Upper bound of any score
    pub const MAX: f64 = 70.0;

    /// Wrap a raw percentage, clamping to the valid range and rounding to one decimal
    pub fn new(value: f64) -> Self {
        let clamped = value.clamp(0.0, Self::MAX);
        Self((clamped * 10.0).round() / 10.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Report tier for this score
    pub fn level(&self) -> RiskLevel {
        if self.0 < 5.0 {
            RiskLevel::Low
        } else if self.0 < 10.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// Risk tier printed on reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Moderate => write!(f, "Moderate"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

/// Structured advice produced for one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct AdviceResult {
    pub priority: Priority,

    /// Banner line, e.g. "🟥 URGENT: Likely diabetes (HbA1c ≥48) | 10-yr risk: 29.2%"
    pub summary: String,

    /// Ordered most urgent first
    pub recommendations: Vec<String>,

    /// Set if any rule asked for a referral
    pub referral_required: bool,
}

/// Score and advice evaluated together for one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Assessment {
    pub risk_score: RiskScore,
    pub risk_level: RiskLevel,
    pub advice: AdviceResult,

    /// Version of the rule set that produced this assessment
    pub rules_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_score_rounds_and_clamps() {
        assert_eq!(RiskScore::new(29.16).value(), 29.2);
        assert_eq!(RiskScore::new(0.25).value(), 0.3);
        assert_eq!(RiskScore::new(95.0).value(), 70.0);
        assert_eq!(RiskScore::new(-1.0).value(), 0.0);
    }

    #[test]
    fn test_risk_score_display_has_one_decimal() {
        assert_eq!(RiskScore::new(29.16).to_string(), "29.2");
        assert_eq!(RiskScore::new(10.0).to_string(), "10.0");
    }

    #[test]
    fn test_risk_level_boundaries() {
        assert_eq!(RiskScore::new(4.9).level(), RiskLevel::Low);
        assert_eq!(RiskScore::new(5.0).level(), RiskLevel::Moderate);
        assert_eq!(RiskScore::new(9.9).level(), RiskLevel::Moderate);
        assert_eq!(RiskScore::new(10.0).level(), RiskLevel::High);
    }

    #[test]
    fn test_risk_score_serializes_as_number() {
        let json = serde_json::to_string(&RiskScore::new(29.2)).unwrap();
        assert_eq!(json, "29.2");
    }

    #[test]
    fn test_deserialized_scores_are_clamped_and_rounded() {
        let score: RiskScore = serde_json::from_str("93.0").unwrap();
        assert_eq!(score.value(), RiskScore::MAX);

        let score: RiskScore = serde_json::from_str("-4").unwrap();
        assert_eq!(score.value(), 0.0);

        let score: RiskScore = serde_json::from_str("12.345").unwrap();
        assert_eq!(score.value(), 12.3);
    }
}
