use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Ratio group a named ratio belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioFamily {
    Liquidity,
    Profitability,
    Efficiency,
    Leverage,
}

/// Every ratio the calculator produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioName {
    CurrentRatio,
    QuickRatio,
    CashRatio,
    GrossMargin,
    OperatingMargin,
    NetMargin,
    Roa,
    Roe,
    AssetTurnover,
    InventoryTurnover,
    ReceivablesTurnover,
    DebtToEquity,
    DebtToAssets,
    InterestCoverage,
}

impl RatioName {
    pub const ALL: [RatioName; 14] = [
        RatioName::CurrentRatio,
        RatioName::QuickRatio,
        RatioName::CashRatio,
        RatioName::GrossMargin,
        RatioName::OperatingMargin,
        RatioName::NetMargin,
        RatioName::Roa,
        RatioName::Roe,
        RatioName::AssetTurnover,
        RatioName::InventoryTurnover,
        RatioName::ReceivablesTurnover,
        RatioName::DebtToEquity,
        RatioName::DebtToAssets,
        RatioName::InterestCoverage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RatioName::CurrentRatio => "current_ratio",
            RatioName::QuickRatio => "quick_ratio",
            RatioName::CashRatio => "cash_ratio",
            RatioName::GrossMargin => "gross_margin",
            RatioName::OperatingMargin => "operating_margin",
            RatioName::NetMargin => "net_margin",
            RatioName::Roa => "roa",
            RatioName::Roe => "roe",
            RatioName::AssetTurnover => "asset_turnover",
            RatioName::InventoryTurnover => "inventory_turnover",
            RatioName::ReceivablesTurnover => "receivables_turnover",
            RatioName::DebtToEquity => "debt_to_equity",
            RatioName::DebtToAssets => "debt_to_assets",
            RatioName::InterestCoverage => "interest_coverage",
        }
    }

    pub fn family(&self) -> RatioFamily {
        match self {
            RatioName::CurrentRatio | RatioName::QuickRatio | RatioName::CashRatio => {
                RatioFamily::Liquidity
            }
            RatioName::GrossMargin
            | RatioName::OperatingMargin
            | RatioName::NetMargin
            | RatioName::Roa
            | RatioName::Roe => RatioFamily::Profitability,
            RatioName::AssetTurnover
            | RatioName::InventoryTurnover
            | RatioName::ReceivablesTurnover => RatioFamily::Efficiency,
            RatioName::DebtToEquity | RatioName::DebtToAssets | RatioName::InterestCoverage => {
                RatioFamily::Leverage
            }
        }
    }

    /// Debt ratios are the only ones where a lower value is the better one.
    /// Interest coverage sits in the leverage family but reads higher-is-better.
    pub fn higher_is_better(&self) -> bool {
        !matches!(self, RatioName::DebtToEquity | RatioName::DebtToAssets)
    }
}

impl fmt::Display for RatioName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RatioName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RatioName::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown ratio: {}", s))
    }
}

/// One named ratio for one period. `None` when an input was missing or a
/// denominator was zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ratio {
    pub name: RatioName,
    pub period: String,
    pub value: Option<f64>,
}

impl Ratio {
    /// Report key in the `{ratio_name}_{period}` form.
    pub fn key(&self) -> String {
        format!("{}_{}", self.name, self.period)
    }
}

/// Result of computing one ratio family for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PeriodOutcome {
    Computed { ratios: Vec<Ratio> },
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodResult {
    pub family: RatioFamily,
    pub period: String,
    pub outcome: PeriodOutcome,
}

/// All per-period ratio results, in computation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioReport {
    pub periods: Vec<PeriodResult>,
}

impl RatioReport {
    pub fn push(&mut self, family: RatioFamily, period: &str, outcome: PeriodOutcome) {
        self.periods.push(PeriodResult {
            family,
            period: period.to_string(),
            outcome,
        });
    }

    /// Every computed ratio, in computation order.
    pub fn ratios(&self) -> impl Iterator<Item = &Ratio> {
        self.periods
            .iter()
            .filter_map(|p| match &p.outcome {
                PeriodOutcome::Computed { ratios } => Some(ratios),
                PeriodOutcome::Skipped { .. } => None,
            })
            .flatten()
    }

    pub fn family(&self, family: RatioFamily) -> impl Iterator<Item = &Ratio> {
        self.ratios().filter(move |r| r.name.family() == family)
    }

    /// `(family, period, reason)` for every skipped period.
    pub fn skipped(&self) -> Vec<(RatioFamily, &str, &str)> {
        self.periods
            .iter()
            .filter_map(|p| match &p.outcome {
                PeriodOutcome::Skipped { reason } => {
                    Some((p.family, p.period.as_str(), reason.as_str()))
                }
                PeriodOutcome::Computed { .. } => None,
            })
            .collect()
    }

    pub fn value(&self, name: RatioName, period: &str) -> Option<f64> {
        self.ratios()
            .find(|r| r.name == name && r.period == period)
            .and_then(|r| r.value)
    }

    /// `(period, value)` pairs for one ratio in computation order.
    pub fn series(&self, name: RatioName) -> Vec<(&str, Option<f64>)> {
        self.ratios()
            .filter(|r| r.name == name)
            .map(|r| (r.period.as_str(), r.value))
            .collect()
    }

    /// Value for the lexicographically greatest period that has one.
    /// Computation order is not relied upon.
    pub fn latest(&self, name: RatioName) -> Option<f64> {
        self.ratios()
            .filter(|r| r.name == name)
            .filter_map(|r| r.value.map(|v| (r.period.as_str(), v)))
            .max_by(|a, b| a.0.cmp(b.0))
            .map(|(_, v)| v)
    }

    /// Latest value of every ratio that has one, keyed by ratio name.
    pub fn latest_values(&self) -> BTreeMap<String, f64> {
        RatioName::ALL
            .iter()
            .filter_map(|name| self.latest(*name).map(|v| (name.to_string(), v)))
            .collect()
    }

    /// Flat `{ratio_name}_{period}` mapping for report generators.
    pub fn keyed(&self) -> BTreeMap<String, Option<f64>> {
        self.ratios().map(|r| (r.key(), r.value)).collect()
    }
}

/// Trend classification of a series by first-to-last percentage change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    StrongUp,
    ModerateUp,
    Stable,
    ModerateDown,
    StrongDown,
    InsufficientData,
}

impl TrendDirection {
    pub fn from_percentage_change(pct: f64) -> Self {
        match pct {
            p if p > 5.0 => TrendDirection::StrongUp,
            p if p > 1.0 => TrendDirection::ModerateUp,
            p if p > -1.0 => TrendDirection::Stable,
            p if p > -5.0 => TrendDirection::ModerateDown,
            _ => TrendDirection::StrongDown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::StrongUp => "strong_up",
            TrendDirection::ModerateUp => "moderate_up",
            TrendDirection::Stable => "stable",
            TrendDirection::ModerateDown => "moderate_down",
            TrendDirection::StrongDown => "strong_down",
            TrendDirection::InsufficientData => "insufficient_data",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRecord {
    pub direction: TrendDirection,
    pub percentage_change: f64,
    pub slope: f64,
    /// Absolute Pearson correlation against the period index, 0..=1.
    pub correlation: f64,
    pub values: Vec<f64>,
}

impl TrendRecord {
    pub fn insufficient(values: &[f64]) -> Self {
        Self {
            direction: TrendDirection::InsufficientData,
            percentage_change: 0.0,
            slope: 0.0,
            correlation: 0.0,
            values: values.to_vec(),
        }
    }

    /// Trend strength; zero for insufficient data.
    pub fn strength(&self) -> f64 {
        self.correlation
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRecord {
    /// "A to B"
    pub period: String,
    pub growth_rate: f64,
    pub current_value: f64,
    pub previous_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthLevel {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl HealthLevel {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 80.0 => HealthLevel::Excellent,
            s if s >= 60.0 => HealthLevel::Good,
            s if s >= 40.0 => HealthLevel::Fair,
            _ => HealthLevel::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthLevel::Poor => "Poor",
            HealthLevel::Fair => "Fair",
            HealthLevel::Good => "Good",
            HealthLevel::Excellent => "Excellent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthAssessment {
    /// 0 to 100
    pub score: f64,
    pub level: HealthLevel,
    pub issues: Vec<String>,
    pub max_score: f64,
    pub current_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BenchmarkPerformance {
    Above,
    Below,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub company_value: f64,
    pub industry_value: f64,
    pub difference: f64,
    pub percentage_difference: f64,
    pub performance: BenchmarkPerformance,
}

/// Everything the statement side of the pipeline produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialAnalysis {
    pub ratios: RatioReport,
    pub trends: BTreeMap<String, TrendRecord>,
    pub growth_rates: BTreeMap<String, GrowthRecord>,
    pub financial_health: HealthAssessment,
}
