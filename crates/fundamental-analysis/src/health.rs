//! Health Scorer: a 0-100 rubric over four ratio checks worth 25 points each.

use serde::{Deserialize, Serialize};

use filing_core::{HealthAssessment, HealthLevel, RatioName, RatioReport};

pub const POINTS_PER_CHECK: f64 = 25.0;

/// `good` earns full points, `acceptable` half. For lower-is-better ratios
/// the comparison is inverted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub good: f64,
    pub acceptable: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthThresholds {
    pub current_ratio: Threshold,
    pub net_margin: Threshold,
    pub debt_to_equity: Threshold,
    pub asset_turnover: Threshold,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            current_ratio: Threshold { good: 1.5, acceptable: 1.0 },
            net_margin: Threshold { good: 0.10, acceptable: 0.05 },
            debt_to_equity: Threshold { good: 1.0, acceptable: 2.0 },
            asset_turnover: Threshold { good: 0.5, acceptable: 0.25 },
        }
    }
}

impl HealthThresholds {
    fn checks(&self) -> [(RatioName, Threshold); 4] {
        [
            (RatioName::CurrentRatio, self.current_ratio),
            (RatioName::NetMargin, self.net_margin),
            (RatioName::DebtToEquity, self.debt_to_equity),
            (RatioName::AssetTurnover, self.asset_turnover),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grade {
    Pass,
    Marginal,
    Fail,
}

fn grade(value: f64, threshold: Threshold, higher_is_better: bool) -> Grade {
    let clears = |bound: f64| if higher_is_better { value >= bound } else { value <= bound };
    if clears(threshold.good) {
        Grade::Pass
    } else if clears(threshold.acceptable) {
        Grade::Marginal
    } else {
        Grade::Fail
    }
}

fn issue(name: RatioName, value: f64) -> String {
    match name {
        RatioName::CurrentRatio => format!("Low current ratio: {:.2}", value),
        RatioName::NetMargin => format!("Low net margin: {:.2}%", value * 100.0),
        RatioName::DebtToEquity => format!("High debt-to-equity ratio: {:.2}", value),
        RatioName::AssetTurnover => format!("Low asset turnover: {:.2}", value),
        other => format!("Weak {}: {:.2}", other, value),
    }
}

/// Scores the latest value of each checked ratio. Ratios with no value are
/// left out of both the earned and the maximum score.
pub fn assess_financial_health(ratios: &RatioReport, thresholds: &HealthThresholds) -> HealthAssessment {
    let mut current_score = 0.0;
    let mut max_score = 0.0;
    let mut issues = Vec::new();

    for (name, threshold) in thresholds.checks() {
        let Some(value) = ratios.latest(name) else {
            tracing::warn!("No {} available for health assessment", name);
            continue;
        };
        max_score += POINTS_PER_CHECK;
        match grade(value, threshold, name.higher_is_better()) {
            Grade::Pass => current_score += POINTS_PER_CHECK,
            Grade::Marginal => current_score += POINTS_PER_CHECK / 2.0,
            Grade::Fail => issues.push(issue(name, value)),
        }
    }

    let score = if max_score > 0.0 {
        (current_score / max_score * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    HealthAssessment {
        score,
        level: HealthLevel::from_score(score),
        issues,
        max_score,
        current_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filing_core::{PeriodOutcome, Ratio};

    fn report(values: &[(RatioName, &str, f64)]) -> RatioReport {
        let mut report = RatioReport::default();
        for (name, period, value) in values {
            report.push(
                name.family(),
                period,
                PeriodOutcome::Computed {
                    ratios: vec![Ratio {
                        name: *name,
                        period: period.to_string(),
                        value: Some(*value),
                    }],
                },
            );
        }
        report
    }

    #[test]
    fn test_no_ratios_scores_zero() {
        let health = assess_financial_health(&RatioReport::default(), &HealthThresholds::default());
        assert_eq!(health.score, 0.0);
        assert_eq!(health.max_score, 0.0);
        assert_eq!(health.level, HealthLevel::Poor);
        assert!(health.issues.is_empty());
    }

    #[test]
    fn test_current_ratio_alone_contributes_full_points() {
        let health = assess_financial_health(
            &report(&[(RatioName::CurrentRatio, "2023", 2.0)]),
            &HealthThresholds::default(),
        );
        assert_eq!(health.current_score, 25.0);
        assert_eq!(health.max_score, 25.0);
        assert_eq!(health.score, 100.0);
    }

    #[test]
    fn test_all_good_is_excellent() {
        let health = assess_financial_health(
            &report(&[
                (RatioName::CurrentRatio, "2023", 2.0),
                (RatioName::NetMargin, "2023", 0.15),
                (RatioName::DebtToEquity, "2023", 0.8),
                (RatioName::AssetTurnover, "2023", 0.9),
            ]),
            &HealthThresholds::default(),
        );
        assert_eq!(health.score, 100.0);
        assert_eq!(health.level, HealthLevel::Excellent);
    }

    #[test]
    fn test_marginal_and_failing_checks() {
        let health = assess_financial_health(
            &report(&[
                (RatioName::CurrentRatio, "2023", 1.2),
                (RatioName::NetMargin, "2023", 0.02),
                (RatioName::DebtToEquity, "2023", 1.5),
                (RatioName::AssetTurnover, "2023", 0.1),
            ]),
            &HealthThresholds::default(),
        );
        assert_eq!(health.current_score, 25.0);
        assert_eq!(health.max_score, 100.0);
        assert_eq!(health.score, 25.0);
        assert_eq!(health.level, HealthLevel::Poor);
        assert_eq!(
            health.issues,
            vec!["Low net margin: 2.00%".to_string(), "Low asset turnover: 0.10".to_string()]
        );
    }

    #[test]
    fn test_debt_to_equity_is_inverted() {
        let high_debt = assess_financial_health(
            &report(&[(RatioName::DebtToEquity, "2023", 2.5)]),
            &HealthThresholds::default(),
        );
        assert_eq!(high_debt.current_score, 0.0);
        assert_eq!(high_debt.issues, vec!["High debt-to-equity ratio: 2.50".to_string()]);

        let boundary = assess_financial_health(
            &report(&[(RatioName::DebtToEquity, "2023", 2.0)]),
            &HealthThresholds::default(),
        );
        assert_eq!(boundary.current_score, 12.5);
    }

    #[test]
    fn test_latest_period_is_scored() {
        let health = assess_financial_health(
            &report(&[
                (RatioName::CurrentRatio, "2023", 0.5),
                (RatioName::CurrentRatio, "2022", 3.0),
            ]),
            &HealthThresholds::default(),
        );
        assert_eq!(health.current_score, 0.0);
        assert_eq!(health.issues, vec!["Low current ratio: 0.50".to_string()]);
    }
}
