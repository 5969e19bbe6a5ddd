//! Risk assessment types.

use serde::{Deserialize, Serialize};
use strum::Display;

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Severity of a risk.
///
/// Deserialization also accepts the Chinese labels the risk prompt asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
    #[serde(alias = "高", alias = "High", alias = "HIGH")]
    High,
    #[serde(alias = "中", alias = "Medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "低", alias = "Low", alias = "LOW")]
    Low,
}

/// One risk identified in a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskItem {
    #[serde(default = "new_id")]
    pub id: String,
    pub risk_type: String,
    pub description: String,
    pub level: RiskLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl RiskItem {
    /// Create a risk item.
    pub fn new(
        risk_type: impl Into<String>,
        description: impl Into<String>,
        level: RiskLevel,
    ) -> Self {
        Self {
            id: new_id(),
            risk_type: risk_type.into(),
            description: description.into(),
            level,
            recommendation: None,
        }
    }

    /// Set the recommendation.
    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }
}

/// Risk analysis of one contract record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub record_id: String,
    pub summary: String,
    pub overall_level: RiskLevel,
    /// Date of analysis, `YYYY-MM-DD`.
    pub analysis_date: String,
    pub risks: Vec<RiskItem>,
}

impl RiskAssessment {
    /// Count of risks at the given level.
    pub fn count(&self, level: RiskLevel) -> usize {
        self.risks.iter().filter(|r| r.level == level).count()
    }
}

/// Requested analysis depth. Recorded in logs; every depth runs the same analysis.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AnalysisDepth {
    #[default]
    Basic,
    Comprehensive,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_level_aliases() {
        let high: RiskLevel = serde_json::from_value(json!("高")).unwrap();
        let medium: RiskLevel = serde_json::from_value(json!("medium")).unwrap();
        let low: RiskLevel = serde_json::from_value(json!("Low")).unwrap();
        assert_eq!(high, RiskLevel::High);
        assert_eq!(medium, RiskLevel::Medium);
        assert_eq!(low, RiskLevel::Low);
        assert!(serde_json::from_value::<RiskLevel>(json!("critical")).is_err());
    }

    #[test]
    fn test_risk_item_requires_level() {
        let item: Result<RiskItem, _> =
            serde_json::from_value(json!({"risk_type": "payment", "description": "late"}));
        assert!(item.is_err());
    }

    #[test]
    fn test_level_serializes_lowercase() {
        assert_eq!(serde_json::to_value(RiskLevel::High).unwrap(), json!("high"));
        assert_eq!(RiskLevel::Medium.to_string(), "medium");
    }
}
