//! Risk Summarizer: turns an assessment into the executive-facing report.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use filing_core::{
    CategorySummary, ExecutiveSummary, MonitoringPriority, RiskAssessment, RiskCategory,
    RiskLevel, RiskSummary, RiskTrends,
};

use crate::patterns::CompiledPatterns;

pub const KEY_RISK_COUNT: usize = 3;
pub const MITIGATION_STATUS: &str = "Mitigation measures under review";
pub const IMMEDIATE_ACTION: &str = "IMMEDIATE ACTION REQUIRED: Implement additional controls";
const FOCUS_THRESHOLD: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryOptions {
    /// Characters of each key risk shown in the executive summary.
    pub preview_chars: usize,
    /// How many categories are listed as highest risk.
    pub highlighted_categories: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            preview_chars: 100,
            highlighted_categories: 3,
        }
    }
}

pub fn generate_risk_summary(
    assessment: &RiskAssessment,
    company_name: &str,
    assessment_date: NaiveDate,
    options: &SummaryOptions,
    patterns: &CompiledPatterns,
) -> RiskSummary {
    RiskSummary {
        executive_summary: executive_summary(assessment, company_name, assessment_date, options),
        risk_categories: category_summaries(assessment),
        mitigation_strategies: mitigation_strategies(assessment, patterns),
        risk_trends: RiskTrends::default(),
        recommendations: recommendations(assessment),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

/// Categories by descending average score; equal averages keep category order.
pub fn highest_risk_categories(assessment: &RiskAssessment, n: usize) -> Vec<RiskCategory> {
    let mut ranked: Vec<(RiskCategory, f64)> = assessment
        .category_scores
        .iter()
        .map(|(category, score)| (*category, score.average_score))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked.into_iter().take(n).map(|(category, _)| category).collect()
}

fn executive_summary(
    assessment: &RiskAssessment,
    company_name: &str,
    assessment_date: NaiveDate,
    options: &SummaryOptions,
) -> ExecutiveSummary {
    ExecutiveSummary {
        company: company_name.to_string(),
        assessment_date: assessment_date.format("%Y-%m-%d").to_string(),
        overall_risk_level: RiskLevel::from_score(assessment.overall_risk_score),
        overall_risk_score: round2(assessment.overall_risk_score),
        total_risks_identified: assessment.individual_risks.len(),
        highest_risk_categories: highest_risk_categories(assessment, options.highlighted_categories),
        key_risks: assessment
            .top_risks
            .iter()
            .take(KEY_RISK_COUNT)
            .map(|risk| preview(&risk.text, options.preview_chars))
            .collect(),
        risk_mitigation_status: MITIGATION_STATUS.to_string(),
    }
}

fn category_summaries(assessment: &RiskAssessment) -> BTreeMap<RiskCategory, CategorySummary> {
    assessment
        .category_scores
        .iter()
        .map(|(category, score)| {
            let summary = CategorySummary {
                risk_count: score.risk_count,
                average_score: round2(score.average_score),
                max_score: round2(score.max_score),
                severity_breakdown: score.severity_distribution.clone(),
                description: category.description().to_string(),
                monitoring_priority: MonitoringPriority::from_category(
                    score.average_score,
                    score.risk_count,
                ),
            };
            (*category, summary)
        })
        .collect()
}

fn mitigation_strategies(
    assessment: &RiskAssessment,
    patterns: &CompiledPatterns,
) -> BTreeMap<RiskCategory, Vec<String>> {
    assessment
        .category_scores
        .iter()
        .map(|(category, score)| {
            let mut strategies = patterns
                .mitigation_strategies
                .get(category)
                .or_else(|| patterns.mitigation_strategies.get(&RiskCategory::General))
                .cloned()
                .unwrap_or_default();
            if RiskLevel::from_score(score.average_score) == RiskLevel::High {
                strategies.insert(0, IMMEDIATE_ACTION.to_string());
            }
            (*category, strategies)
        })
        .collect()
}

fn recommendations(assessment: &RiskAssessment) -> Vec<String> {
    let mut recs = match RiskLevel::from_score(assessment.overall_risk_score) {
        RiskLevel::High => vec![
            "HIGH RISK: Consider reducing exposure or implementing additional risk mitigation measures".to_string(),
            "Review risk management policies and procedures".to_string(),
        ],
        RiskLevel::Medium => vec![
            "MEDIUM RISK: Monitor risk factors closely and review mitigation strategies".to_string(),
        ],
        RiskLevel::Low => vec!["LOW RISK: Maintain current monitoring practices".to_string()],
    };

    for (category, score) in &assessment.category_scores {
        if score.average_score > FOCUS_THRESHOLD {
            recs.push(format!("Focus on {} risk management", category));
        }
    }

    recs
}
