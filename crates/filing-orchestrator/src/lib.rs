use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use filing_core::{
    AnalysisError, BenchmarkComparison, FinancialAnalysis, FinancialAnalyzer, RiskAnalyzer,
    RiskAssessment, RiskSummary, StatementSet,
};
use fundamental_analysis::FinancialAnalysisEngine;
use risk_assessment::{RiskAssessmentEngine, RiskPatternConfig};

pub mod config;
pub use config::FilingConfig;

/// Everything produced for one filing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilingAnalysis {
    pub company: String,
    pub financial: FinancialAnalysis,
    /// Present only when industry benchmarks were supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmarks: Option<BTreeMap<String, BenchmarkComparison>>,
    pub risk_assessment: RiskAssessment,
    pub risk_summary: RiskSummary,
}

/// Runs the financial and risk pipelines over a single filing.
pub struct FilingOrchestrator {
    financial_analyzer: Box<dyn FinancialAnalyzer>,
    risk_analyzer: Box<dyn RiskAnalyzer>,
    config: FilingConfig,
}

impl FilingOrchestrator {
    /// Built-in engines configured from `config`.
    pub fn new(config: FilingConfig) -> Result<Self, AnalysisError> {
        let risk_engine =
            RiskAssessmentEngine::with_config(&RiskPatternConfig::default(), config.risk_settings())?;

        Ok(Self::with_analyzers(
            Box::new(FinancialAnalysisEngine::new()),
            Box::new(risk_engine),
            config,
        ))
    }

    pub fn with_analyzers(
        financial_analyzer: Box<dyn FinancialAnalyzer>,
        risk_analyzer: Box<dyn RiskAnalyzer>,
        config: FilingConfig,
    ) -> Self {
        Self {
            financial_analyzer,
            risk_analyzer,
            config,
        }
    }

    pub fn config(&self) -> &FilingConfig {
        &self.config
    }

    /// Analyses statements in the nested JSON form handed over by extraction.
    pub fn analyze_json(
        &self,
        statements: &serde_json::Value,
        filing_text: &str,
        industry_benchmarks: Option<&BTreeMap<String, f64>>,
    ) -> Result<FilingAnalysis, AnalysisError> {
        let statements = StatementSet::from_json(statements)?;
        Ok(self.analyze(&statements, filing_text, industry_benchmarks))
    }

    pub fn analyze(
        &self,
        statements: &StatementSet,
        filing_text: &str,
        industry_benchmarks: Option<&BTreeMap<String, f64>>,
    ) -> FilingAnalysis {
        let company = self.config.company_name.clone();
        info!(company = %company, "Analyzing filing");

        let financial = self.financial_analyzer.analyze(statements);
        let benchmarks = industry_benchmarks.map(|industry| {
            self.financial_analyzer
                .benchmark(&financial.ratios.latest_values(), industry)
        });

        let risk_assessment = self.risk_analyzer.assess(filing_text);
        let risk_summary = self.risk_analyzer.summarize(&risk_assessment, &company);

        info!(
            company = %company,
            health_score = financial.financial_health.score,
            risk_level = risk_summary.executive_summary.overall_risk_level.as_str(),
            "Filing analysis complete"
        );

        FilingAnalysis {
            company,
            financial,
            benchmarks,
            risk_assessment,
            risk_summary,
        }
    }
}
