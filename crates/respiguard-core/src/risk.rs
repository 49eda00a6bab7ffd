use serde::{Deserialize, Serialize};
use std::fmt;

/// Respiratory risk severity. Variant order is the severity order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Moderate,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }

    /// Case-insensitive mapping of a level name. Anything unrecognised is `Low`.
    pub fn parse_lenient(raw: &str) -> Self {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(raw))
            .unwrap_or(RiskLevel::Low)
    }

    pub fn is_elevated(self) -> bool {
        self >= RiskLevel::High
    }

    /// Numeric rank 0..=3, for gauges.
    pub fn rank(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classification outcome. Field names follow the remote wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub risk_level: RiskLevel,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub weather_context: String,
}

impl AssessmentResult {
    pub fn new(
        risk_level: RiskLevel,
        summary: impl Into<String>,
        recommendations: Vec<String>,
        weather_context: impl Into<String>,
    ) -> Self {
        Self {
            risk_level,
            summary: summary.into(),
            recommendations,
            weather_context: weather_context.into(),
        }
    }
}
