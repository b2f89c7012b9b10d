use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use filing_core::{AnalysisError, ClassifiedRisks, RiskAnalyzer, RiskAssessment, RiskFactor, RiskSummary};

pub mod classifier;
pub mod extractor;
pub mod patterns;
pub mod severity;
pub mod summary;
#[cfg(test)]
mod tests;

pub use classifier::{classify_category, classify_risks};
pub use extractor::{clean_risk_text, extract_risk_factors};
pub use patterns::{CompiledPatterns, RiskPatternConfig};
pub use severity::{assess_risk_severity, top_risks, DEFAULT_TOP_RISKS};
pub use summary::{generate_risk_summary, SummaryOptions};

/// Tunables for the risk pipeline that are not pattern tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskEngineSettings {
    pub top_risks: usize,
    pub summary: SummaryOptions,
}

impl Default for RiskEngineSettings {
    fn default() -> Self {
        Self {
            top_risks: DEFAULT_TOP_RISKS,
            summary: SummaryOptions::default(),
        }
    }
}

/// Extracts, classifies, scores and summarizes risk factors from filing text.
///
/// Patterns are compiled once at construction; the engine holds no per-call
/// state, so one instance can serve any number of filings concurrently.
#[derive(Debug, Clone)]
pub struct RiskAssessmentEngine {
    patterns: CompiledPatterns,
    settings: RiskEngineSettings,
}

impl RiskAssessmentEngine {
    pub fn new() -> Result<Self, AnalysisError> {
        Self::with_config(&RiskPatternConfig::default(), RiskEngineSettings::default())
    }

    pub fn with_config(
        config: &RiskPatternConfig,
        settings: RiskEngineSettings,
    ) -> Result<Self, AnalysisError> {
        Ok(Self {
            patterns: CompiledPatterns::compile(config)?,
            settings,
        })
    }

    pub fn settings(&self) -> &RiskEngineSettings {
        &self.settings
    }

    pub fn extract_risk_factors(&self, filing_text: &str) -> Vec<RiskFactor> {
        extract_risk_factors(filing_text, &self.patterns)
    }

    pub fn classify_risks(&self, factors: &[RiskFactor]) -> ClassifiedRisks {
        classify_risks(factors, &self.patterns)
    }

    pub fn assess_risk_severity(&self, factors: &[RiskFactor]) -> RiskAssessment {
        assess_risk_severity(factors, &self.patterns, self.settings.top_risks)
    }

    /// Summary dated today (UTC).
    pub fn generate_risk_summary(&self, assessment: &RiskAssessment, company_name: &str) -> RiskSummary {
        self.generate_risk_summary_on(assessment, company_name, Utc::now().date_naive())
    }

    pub fn generate_risk_summary_on(
        &self,
        assessment: &RiskAssessment,
        company_name: &str,
        assessment_date: NaiveDate,
    ) -> RiskSummary {
        generate_risk_summary(
            assessment,
            company_name,
            assessment_date,
            &self.settings.summary,
            &self.patterns,
        )
    }

    /// Full pipeline: extract, classify, then score.
    pub fn assess_filing(&self, filing_text: &str) -> RiskAssessment {
        let extracted = self.extract_risk_factors(filing_text);
        let classified = self.classify_risks(&extracted);
        let assessment = self.assess_risk_severity(&classified.factors);

        info!(
            risks = assessment.individual_risks.len(),
            categories = classified.by_category.len(),
            overall = assessment.overall_risk_score,
            "Risk assessment complete"
        );
        assessment
    }
}

impl RiskAnalyzer for RiskAssessmentEngine {
    fn assess(&self, filing_text: &str) -> RiskAssessment {
        self.assess_filing(filing_text)
    }

    fn summarize(&self, assessment: &RiskAssessment, company_name: &str) -> RiskSummary {
        self.generate_risk_summary(assessment, company_name)
    }
}
