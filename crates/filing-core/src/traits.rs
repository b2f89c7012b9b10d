use std::collections::BTreeMap;

use crate::{BenchmarkComparison, FinancialAnalysis, RiskAssessment, RiskSummary, StatementSet};

/// Trait for statement analysis engines
pub trait FinancialAnalyzer: Send + Sync {
    fn analyze(&self, statements: &StatementSet) -> FinancialAnalysis;

    fn benchmark(
        &self,
        company_ratios: &BTreeMap<String, f64>,
        industry_benchmarks: &BTreeMap<String, f64>,
    ) -> BTreeMap<String, BenchmarkComparison>;
}

/// Trait for qualitative risk engines
pub trait RiskAnalyzer: Send + Sync {
    fn assess(&self, filing_text: &str) -> RiskAssessment;

    fn summarize(&self, assessment: &RiskAssessment, company_name: &str) -> RiskSummary;
}
