//! Trend/Growth Engine
//!
//! Trends classify a whole series by its first-to-last percentage change and
//! fit an OLS line over the period index. Growth only compares the two
//! lexicographically-latest income-statement periods.

use std::collections::BTreeMap;

use filing_core::stats::{index_correlation, linear_slope, percentage_change};
use filing_core::{GrowthRecord, RatioName, RatioReport, StatementSet, TrendDirection, TrendRecord};

/// Metrics growth is reported for. Each is looked up in the income statement
/// first, then in the balance sheet.
pub const GROWTH_METRICS: [&str; 4] = ["revenue", "net_income", "total_assets", "total_equity"];

pub fn analyze_trend(values: &[f64]) -> TrendRecord {
    if values.len() < 2 {
        return TrendRecord::insufficient(values);
    }

    let pct_change = percentage_change(values[0], values[values.len() - 1]);

    TrendRecord {
        direction: TrendDirection::from_percentage_change(pct_change),
        percentage_change: pct_change,
        slope: linear_slope(values),
        correlation: index_correlation(values).map(f64::abs).unwrap_or(0.0),
        values: values.to_vec(),
    }
}

/// Every line item and ratio as a series in period-insertion order.
///
/// Income-statement items keep their name, balance-sheet items are prefixed
/// `balance_`, cash-flow items `cash_flow_` and ratios `ratio_`. Null values
/// are dropped rather than read as zero.
pub fn extract_time_series(statements: &StatementSet, ratios: &RatioReport) -> BTreeMap<String, Vec<f64>> {
    let mut series: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    let sources = [
        ("", &statements.income_statement),
        ("balance_", &statements.balance_sheet),
        ("cash_flow_", &statements.cash_flow),
    ];
    for (prefix, statement) in sources {
        for period in statement.periods() {
            for (name, value) in &period.items {
                let entry = series.entry(format!("{}{}", prefix, name)).or_default();
                if let Some(v) = value.filter(|v| v.is_finite()) {
                    entry.push(v);
                }
            }
        }
    }

    for name in RatioName::ALL {
        let values: Vec<f64> = ratios.series(name).into_iter().filter_map(|(_, v)| v).collect();
        if !values.is_empty() {
            series.insert(format!("ratio_{}", name), values);
        }
    }

    series
}

/// Trend records for every series with at least two points.
pub fn identify_trends(statements: &StatementSet, ratios: &RatioReport) -> BTreeMap<String, TrendRecord> {
    extract_time_series(statements, ratios)
        .into_iter()
        .filter(|(_, values)| values.len() >= 2)
        .map(|(metric, values)| {
            let record = analyze_trend(&values);
            (metric, record)
        })
        .collect()
}

/// Growth between the two latest income-statement periods for
/// [`GROWTH_METRICS`]. Metrics without both values, or with a zero previous
/// value, are omitted.
pub fn calculate_growth_rates(statements: &StatementSet) -> BTreeMap<String, GrowthRecord> {
    let periods = statements.income_statement.sorted_labels();
    if periods.len() < 2 {
        return BTreeMap::new();
    }
    let previous = periods[periods.len() - 2];
    let current = periods[periods.len() - 1];

    GROWTH_METRICS
        .iter()
        .filter_map(|metric| {
            metric_growth(statements, metric, previous, current).map(|g| (metric.to_string(), g))
        })
        .collect()
}

/// Growth of one metric from `previous` to `current`.
pub fn metric_growth(
    statements: &StatementSet,
    metric: &str,
    previous: &str,
    current: &str,
) -> Option<GrowthRecord> {
    let lookup = |label: &str| {
        statements
            .income_statement
            .period(label)
            .and_then(|p| p.get(metric))
            .or_else(|| statements.balance_sheet.period(label).and_then(|p| p.get(metric)))
    };

    let (Some(current_value), Some(previous_value)) = (lookup(current), lookup(previous)) else {
        tracing::debug!("Missing data for {} growth ({} to {})", metric, previous, current);
        return None;
    };
    if previous_value == 0.0 {
        tracing::debug!("Zero base for {} growth in {}", metric, previous);
        return None;
    }

    Some(GrowthRecord {
        period: format!("{} to {}", previous, current),
        growth_rate: percentage_change(previous_value, current_value),
        current_value,
        previous_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use filing_core::{Statement, StatementPeriod};

    #[test]
    fn test_flat_series_is_stable() {
        let trend = analyze_trend(&[100.0, 100.0]);
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.percentage_change, 0.0);
        assert_eq!(trend.correlation, 0.0);
        assert_eq!(trend.slope, 0.0);
    }

    #[test]
    fn test_ten_percent_rise_is_strong_up() {
        let trend = analyze_trend(&[100.0, 110.0]);
        assert_relative_eq!(trend.percentage_change, 10.0, epsilon = 1e-12);
        assert_eq!(trend.direction, TrendDirection::StrongUp);
        assert_relative_eq!(trend.slope, 10.0, epsilon = 1e-12);
        assert_relative_eq!(trend.correlation, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_short_series_is_insufficient() {
        let empty = analyze_trend(&[]);
        assert_eq!(empty.direction, TrendDirection::InsufficientData);
        assert_eq!(empty.strength(), 0.0);
        let single = analyze_trend(&[42.0]);
        assert_eq!(single.direction, TrendDirection::InsufficientData);
        assert_eq!(single.values, vec![42.0]);
    }

    #[test]
    fn test_zero_first_value_means_no_change() {
        let trend = analyze_trend(&[0.0, 50.0, 100.0]);
        assert_eq!(trend.percentage_change, 0.0);
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_relative_eq!(trend.slope, 50.0, epsilon = 1e-12);
    }

    #[test]
    fn test_declining_series_reports_absolute_correlation() {
        let trend = analyze_trend(&[100.0, 97.0, 90.0]);
        assert_eq!(trend.direction, TrendDirection::StrongDown);
        assert!(trend.slope < 0.0);
        assert!(trend.correlation > 0.9 && trend.correlation <= 1.0);
    }

    fn two_year_set() -> StatementSet {
        StatementSet {
            income_statement: Statement::new()
                .with_period(
                    StatementPeriod::new("2023")
                        .with_item("revenue", 1_000_000.0)
                        .with_item("net_income", 150_000.0),
                )
                .with_period(
                    StatementPeriod::new("2022")
                        .with_item("revenue", 800_000.0)
                        .with_item("net_income", 0.0),
                ),
            balance_sheet: Statement::new()
                .with_period(StatementPeriod::new("2023").with_item("total_assets", 1_200_000.0))
                .with_period(StatementPeriod::new("2022").with_item("total_assets", 1_100_000.0)),
            cash_flow: Statement::new(),
        }
    }

    #[test]
    fn test_growth_rate_between_latest_periods() {
        let growth = calculate_growth_rates(&two_year_set());
        let revenue = &growth["revenue"];
        assert_relative_eq!(revenue.growth_rate, 25.0, epsilon = 1e-12);
        assert_eq!(revenue.period, "2022 to 2023");
        assert_eq!(revenue.current_value, 1_000_000.0);
        assert_eq!(revenue.previous_value, 800_000.0);
        // falls back to the balance sheet
        assert!(growth.contains_key("total_assets"));
        // zero base and missing metric are omitted
        assert!(!growth.contains_key("net_income"));
        assert!(!growth.contains_key("total_equity"));
    }

    #[test]
    fn test_growth_needs_two_periods() {
        let set = StatementSet {
            income_statement: Statement::new()
                .with_period(StatementPeriod::new("2023").with_item("revenue", 1.0)),
            ..StatementSet::default()
        };
        assert!(calculate_growth_rates(&set).is_empty());
    }

    #[test]
    fn test_time_series_prefixes_and_drops_nulls() {
        let mut set = two_year_set();
        set.cash_flow = Statement::new()
            .with_period(StatementPeriod::new("2023").with_item("operating_cash_flow", 5.0))
            .with_period(StatementPeriod::new("2022").with_null("operating_cash_flow"));
        let series = extract_time_series(&set, &RatioReport::default());
        // insertion order, not sorted order
        assert_eq!(series["revenue"], vec![1_000_000.0, 800_000.0]);
        assert_eq!(series["balance_total_assets"], vec![1_200_000.0, 1_100_000.0]);
        assert_eq!(series["cash_flow_operating_cash_flow"], vec![5.0]);

        let trends = identify_trends(&set, &RatioReport::default());
        assert!(trends.contains_key("revenue"));
        assert!(!trends.contains_key("cash_flow_operating_cash_flow"));
        assert_eq!(trends["revenue"].direction, TrendDirection::StrongDown);
    }
}
