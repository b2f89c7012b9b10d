//! Benchmarker: company ratios against caller-supplied industry values.

use std::collections::BTreeMap;

use filing_core::{BenchmarkComparison, BenchmarkPerformance, RatioName};

/// Compares every company ratio that has an industry counterpart.
pub fn benchmark_ratios(
    company_ratios: &BTreeMap<String, f64>,
    industry_benchmarks: &BTreeMap<String, f64>,
) -> BTreeMap<String, BenchmarkComparison> {
    company_ratios
        .iter()
        .filter_map(|(name, &company_value)| {
            let &industry_value = industry_benchmarks.get(name)?;
            let difference = company_value - industry_value;
            let percentage_difference = if industry_value != 0.0 {
                difference / industry_value * 100.0
            } else {
                0.0
            };
            Some((
                name.clone(),
                BenchmarkComparison {
                    company_value,
                    industry_value,
                    difference,
                    percentage_difference,
                    performance: assess_performance(company_value, industry_value, name),
                },
            ))
        })
        .collect()
}

/// `Above` when the company beats the industry. Debt ratios are lower-is-better;
/// anything unrecognised is treated as higher-is-better. Ties are `Below`.
pub fn assess_performance(company_value: f64, industry_value: f64, ratio_name: &str) -> BenchmarkPerformance {
    let higher_is_better = ratio_name
        .parse::<RatioName>()
        .map(|r| r.higher_is_better())
        .unwrap_or(true);
    let beats = if higher_is_better {
        company_value > industry_value
    } else {
        company_value < industry_value
    };
    if beats {
        BenchmarkPerformance::Above
    } else {
        BenchmarkPerformance::Below
    }
}
