//! Statement analysis engine: ratios, trends, growth, health and benchmarking
//! over a normalized [`StatementSet`].

use std::collections::BTreeMap;

use filing_core::{
    AnalysisError, BenchmarkComparison, FinancialAnalysis, FinancialAnalyzer, StatementSet,
};

pub mod benchmark;
pub mod health;
pub mod ratios;
pub mod trends;

pub use benchmark::{assess_performance, benchmark_ratios};
pub use health::{assess_financial_health, HealthThresholds, Threshold};
pub use ratios::calculate_ratios;
pub use trends::{analyze_trend, calculate_growth_rates, identify_trends};

/// Stateless; one instance can serve any number of concurrent analyses.
#[derive(Debug, Clone, Default)]
pub struct FinancialAnalysisEngine {
    thresholds: HealthThresholds,
}

impl FinancialAnalysisEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: HealthThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &HealthThresholds {
        &self.thresholds
    }

    /// Full statement analysis. Missing data and bad periods degrade the
    /// result instead of failing it.
    pub fn analyze_statements(&self, statements: &StatementSet) -> FinancialAnalysis {
        tracing::info!(
            "Analyzing statements ({} income, {} balance, {} cash flow periods)",
            statements.income_statement.len(),
            statements.balance_sheet.len(),
            statements.cash_flow.len()
        );

        let ratios = calculate_ratios(statements);
        for (family, period, reason) in ratios.skipped() {
            tracing::warn!("{:?} ratios skipped for {}: {}", family, period, reason);
        }

        let trends = identify_trends(statements, &ratios);
        let growth_rates = calculate_growth_rates(statements);
        let financial_health = assess_financial_health(&ratios, &self.thresholds);

        tracing::info!(
            "Financial health {:.1} ({}), {} trends, {} growth metrics",
            financial_health.score,
            financial_health.level.as_str(),
            trends.len(),
            growth_rates.len()
        );

        FinancialAnalysis {
            ratios,
            trends,
            growth_rates,
            financial_health,
        }
    }

    /// Analysis straight from the extraction stage's JSON. Only a malformed
    /// container is an error.
    pub fn analyze_json(&self, statements: &serde_json::Value) -> Result<FinancialAnalysis, AnalysisError> {
        let statements = StatementSet::from_json(statements)?;
        Ok(self.analyze_statements(&statements))
    }
}

impl FinancialAnalyzer for FinancialAnalysisEngine {
    fn analyze(&self, statements: &StatementSet) -> FinancialAnalysis {
        self.analyze_statements(statements)
    }

    fn benchmark(
        &self,
        company_ratios: &BTreeMap<String, f64>,
        industry_benchmarks: &BTreeMap<String, f64>,
    ) -> BTreeMap<String, BenchmarkComparison> {
        benchmark_ratios(company_ratios, industry_benchmarks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filing_core::{HealthLevel, TrendDirection};
    use serde_json::json;

    fn sample_json() -> serde_json::Value {
        json!({
            "income_statement": {
                "2022": {
                    "revenue": 800000,
                    "cost_of_goods_sold": 480000,
                    "gross_profit": 320000,
                    "operating_income": 160000,
                    "net_income": 120000
                },
                "2023": {
                    "revenue": 1000000,
                    "cost_of_goods_sold": 600000,
                    "gross_profit": 400000,
                    "operating_income": 200000,
                    "net_income": 150000
                }
            },
            "balance_sheet": {
                "2022": {
                    "total_current_assets": 450000,
                    "cash_and_cash_equivalents": 90000,
                    "inventory": 140000,
                    "total_assets": 1100000,
                    "total_current_liabilities": 220000,
                    "total_liabilities": 550000,
                    "total_equity": 550000
                },
                "2023": {
                    "total_current_assets": 500000,
                    "cash_and_cash_equivalents": 100000,
                    "inventory": 150000,
                    "total_assets": 1200000,
                    "total_current_liabilities": 250000,
                    "total_liabilities": 600000,
                    "total_equity": 600000
                }
            },
            "cash_flow": {}
        })
    }

    #[test]
    fn test_full_pipeline_all_good_is_excellent() {
        let engine = FinancialAnalysisEngine::new();
        let analysis = engine.analyze_json(&sample_json()).unwrap();

        // current 2.0, net margin 0.15, D/E 1.0, asset turnover 0.83
        assert_eq!(analysis.financial_health.score, 100.0);
        assert_eq!(analysis.financial_health.level, HealthLevel::Excellent);
        assert!(analysis.financial_health.issues.is_empty());

        assert_eq!(analysis.ratios.keyed().get("current_ratio_2023"), Some(&Some(2.0)));
        let revenue_growth = &analysis.growth_rates["revenue"];
        assert!((revenue_growth.growth_rate - 25.0).abs() < 1e-9);
        assert_eq!(analysis.trends["revenue"].direction, TrendDirection::StrongUp);
        assert!(analysis.trends.contains_key("balance_total_assets"));
        assert!(analysis.trends.contains_key("ratio_current_ratio"));
    }

    #[test]
    fn test_bad_shape_is_an_error() {
        let engine = FinancialAnalysisEngine::new();
        let err = engine.analyze_json(&json!("not a statement set")).unwrap_err();
        assert!(matches!(err, AnalysisError::InputShape(_)));
    }

    #[test]
    fn test_empty_statements_still_produce_an_analysis() {
        let analysis = FinancialAnalysisEngine::new().analyze(&StatementSet::default());
        assert!(analysis.ratios.periods.is_empty());
        assert!(analysis.trends.is_empty());
        assert_eq!(analysis.financial_health.score, 0.0);
    }

    #[test]
    fn test_benchmark_through_trait() {
        let engine = FinancialAnalysisEngine::new();
        let analysis = engine.analyze_json(&sample_json()).unwrap();
        let industry = BTreeMap::from([
            ("current_ratio".to_string(), 1.5),
            ("debt_to_equity".to_string(), 0.5),
        ]);
        let rows = engine.benchmark(&analysis.ratios.latest_values(), &industry);
        assert_eq!(rows["current_ratio"].performance, filing_core::BenchmarkPerformance::Above);
        assert_eq!(rows["debt_to_equity"].performance, filing_core::BenchmarkPerformance::Below);
    }
}
