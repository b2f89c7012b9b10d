//! Risk factor records produced by the qualitative side of the pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::TrendDirection;

/// Risk classification bucket. Declaration order is the tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Market,
    Operational,
    Financial,
    Regulatory,
    General,
}

impl RiskCategory {
    /// The four pattern-scored categories, in tie-break order.
    pub const SCORED: [RiskCategory; 4] = [
        RiskCategory::Market,
        RiskCategory::Operational,
        RiskCategory::Financial,
        RiskCategory::Regulatory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Market => "market",
            RiskCategory::Operational => "operational",
            RiskCategory::Financial => "financial",
            RiskCategory::Regulatory => "regulatory",
            RiskCategory::General => "general",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RiskCategory::Market => {
                "Risks related to economic conditions, market demand, competition, and external factors"
            }
            RiskCategory::Operational => {
                "Risks related to business operations, technology, and organizational capabilities"
            }
            RiskCategory::Financial => {
                "Risks related to financial performance, liquidity, and capital structure"
            }
            RiskCategory::Regulatory => "Risks related to legal, regulatory, and compliance matters",
            RiskCategory::General => "General business risks not fitting specific categories",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative severity bucket driving the base impact score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    pub fn base_impact(&self) -> f64 {
        match self {
            Severity::Low => 1.0,
            Severity::Medium => 3.0,
            Severity::High => 5.0,
        }
    }
}

/// Overall risk level of a filing, from the mean per-risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// The per-risk maximum is 5.0 x 0.8 = 4.0, so `High` needs a near-maximal
    /// mean.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 4.0 => RiskLevel::High,
            s if s >= 2.5 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonitoringPriority {
    Low,
    Medium,
    High,
}

impl MonitoringPriority {
    pub fn from_category(average_score: f64, risk_count: usize) -> Self {
        if average_score >= 4.0 || risk_count >= 5 {
            MonitoringPriority::High
        } else if average_score >= 2.5 || risk_count >= 3 {
            MonitoringPriority::Medium
        } else {
            MonitoringPriority::Low
        }
    }
}

/// A candidate risk factor. Category and severity fields are filled in as the
/// factor moves through classification and scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub text: String,
    pub source_section: String,
    pub extraction_confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<RiskCategory>,
    #[serde(default)]
    pub category_confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// 0 to 5
    #[serde(default)]
    pub impact_score: f64,
    /// 0 to 1
    #[serde(default)]
    pub likelihood: f64,
    /// impact_score x likelihood
    #[serde(default)]
    pub overall_risk_score: f64,
}

impl RiskFactor {
    pub fn extracted(text: String, source_section: &str, extraction_confidence: f64) -> Self {
        Self {
            text,
            source_section: source_section.to_string(),
            extraction_confidence,
            category: None,
            category_confidence: 0.0,
            severity: None,
            impact_score: 0.0,
            likelihood: 0.0,
            overall_risk_score: 0.0,
        }
    }

    /// Category used for aggregation; unclassified factors count as general.
    pub fn category_or_general(&self) -> RiskCategory {
        self.category.unwrap_or(RiskCategory::General)
    }

    /// Severity used for aggregation; unscored factors count as medium.
    pub fn severity_or_medium(&self) -> Severity {
        self.severity.unwrap_or(Severity::Medium)
    }
}

/// Classified factors plus the same factors grouped by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRisks {
    pub factors: Vec<RiskFactor>,
    pub by_category: BTreeMap<RiskCategory, Vec<RiskFactor>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub average_score: f64,
    pub max_score: f64,
    pub risk_count: usize,
    pub severity_distribution: BTreeMap<Severity, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub individual_risks: Vec<RiskFactor>,
    pub category_scores: BTreeMap<RiskCategory, CategoryScore>,
    /// Mean over all risks; 0 when there are none.
    pub overall_risk_score: f64,
    pub risk_distribution: BTreeMap<Severity, usize>,
    pub top_risks: Vec<RiskFactor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub company: String,
    pub assessment_date: String,
    pub overall_risk_level: RiskLevel,
    pub overall_risk_score: f64,
    pub total_risks_identified: usize,
    pub highest_risk_categories: Vec<RiskCategory>,
    pub key_risks: Vec<String>,
    pub risk_mitigation_status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub risk_count: usize,
    pub average_score: f64,
    pub max_score: f64,
    pub severity_breakdown: BTreeMap<Severity, usize>,
    pub description: String,
    pub monitoring_priority: MonitoringPriority,
}

/// Filing-over-filing risk movement. Only a single filing is ever analysed,
/// so this is always the stable placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskTrends {
    pub trend_direction: TrendDirection,
    pub new_risks_identified: usize,
    pub risks_resolved: usize,
    pub risk_evolution: String,
}

impl Default for RiskTrends {
    fn default() -> Self {
        Self {
            trend_direction: TrendDirection::Stable,
            new_risks_identified: 0,
            risks_resolved: 0,
            risk_evolution: "No significant changes detected".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub executive_summary: ExecutiveSummary,
    pub risk_categories: BTreeMap<RiskCategory, CategorySummary>,
    pub mitigation_strategies: BTreeMap<RiskCategory, Vec<String>>,
    pub risk_trends: RiskTrends,
    pub recommendations: Vec<String>,
}
