//! Severity Scorer: severity, impact and likelihood per factor, then the
//! category and portfolio-level aggregates.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::debug;

use filing_core::stats::mean;
use filing_core::{CategoryScore, RiskAssessment, RiskCategory, RiskFactor, Severity};

use crate::patterns::CompiledPatterns;

pub const DEFAULT_TOP_RISKS: usize = 5;
pub const MAX_IMPACT: f64 = 5.0;
const AMPLIFIED: f64 = 1.5;
const DAMPENED: f64 = 0.7;
const DEFAULT_LIKELIHOOD: f64 = 0.5;

/// First severity tier with a matching pattern; medium when nothing matches.
pub fn severity_level(text: &str, patterns: &CompiledPatterns) -> Severity {
    patterns
        .severities
        .iter()
        .find(|(_, regexes)| regexes.iter().any(|r| r.is_match(text)))
        .map(|(severity, _)| *severity)
        .unwrap_or(Severity::Medium)
}

/// Base impact for the severity, amplified or dampened by wording, capped at 5.
pub fn impact_score(text: &str, severity: Severity, patterns: &CompiledPatterns) -> f64 {
    let lower = text.to_lowercase();
    let base = severity.base_impact();

    let adjusted = if contains_any(&lower, &patterns.amplifying_terms) {
        base * AMPLIFIED
    } else if contains_any(&lower, &patterns.dampening_terms) {
        base * DAMPENED
    } else {
        base
    };

    adjusted.min(MAX_IMPACT)
}

pub fn likelihood(text: &str, patterns: &CompiledPatterns) -> f64 {
    let lower = text.to_lowercase();
    patterns
        .likelihood_cues
        .iter()
        .find(|cue| contains_any(&lower, &cue.keywords))
        .map(|cue| cue.likelihood)
        .unwrap_or(DEFAULT_LIKELIHOOD)
}

fn contains_any(lower: &str, terms: &[String]) -> bool {
    terms.iter().any(|t| lower.contains(t.as_str()))
}

pub fn score_factor(factor: &RiskFactor, patterns: &CompiledPatterns) -> RiskFactor {
    let severity = severity_level(&factor.text, patterns);
    let impact = impact_score(&factor.text, severity, patterns);
    let likelihood = likelihood(&factor.text, patterns);

    RiskFactor {
        severity: Some(severity),
        impact_score: impact,
        likelihood,
        overall_risk_score: impact * likelihood,
        ..factor.clone()
    }
}

/// Scores every factor and builds the aggregate assessment. Unclassified
/// factors are aggregated under `General`.
pub fn assess_risk_severity(
    factors: &[RiskFactor],
    patterns: &CompiledPatterns,
    top_n: usize,
) -> RiskAssessment {
    let scored: Vec<RiskFactor> = factors.iter().map(|f| score_factor(f, patterns)).collect();
    let scores: Vec<f64> = scored.iter().map(|f| f.overall_risk_score).collect();

    let assessment = RiskAssessment {
        category_scores: category_scores(&scored),
        overall_risk_score: mean(&scores),
        risk_distribution: severity_distribution(&scored),
        top_risks: top_risks(&scored, top_n),
        individual_risks: scored,
    };

    debug!(
        risks = assessment.individual_risks.len(),
        overall = assessment.overall_risk_score,
        "Risk severity assessed"
    );
    assessment
}

pub fn category_scores(factors: &[RiskFactor]) -> BTreeMap<RiskCategory, CategoryScore> {
    let mut grouped: BTreeMap<RiskCategory, Vec<&RiskFactor>> = BTreeMap::new();
    for factor in factors {
        grouped.entry(factor.category_or_general()).or_default().push(factor);
    }

    grouped
        .into_iter()
        .map(|(category, members)| {
            let scores: Vec<f64> = members.iter().map(|f| f.overall_risk_score).collect();
            let score = CategoryScore {
                average_score: mean(&scores),
                max_score: scores.iter().cloned().fold(0.0, f64::max),
                risk_count: members.len(),
                severity_distribution: severity_distribution(members.iter().copied()),
            };
            (category, score)
        })
        .collect()
}

pub fn severity_distribution<'a>(
    factors: impl IntoIterator<Item = &'a RiskFactor>,
) -> BTreeMap<Severity, usize> {
    let mut distribution = BTreeMap::new();
    for factor in factors {
        *distribution.entry(factor.severity_or_medium()).or_insert(0) += 1;
    }
    distribution
}

/// The `n` highest-scoring factors. Equal scores keep their input order.
pub fn top_risks(factors: &[RiskFactor], n: usize) -> Vec<RiskFactor> {
    let mut sorted = factors.to_vec();
    sorted.sort_by(|a, b| {
        b.overall_risk_score
            .partial_cmp(&a.overall_risk_score)
            .unwrap_or(Ordering::Equal)
    });
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::RiskPatternConfig;
    use approx::assert_relative_eq;

    fn patterns() -> CompiledPatterns {
        CompiledPatterns::compile(&RiskPatternConfig::default()).unwrap()
    }

    fn factor(text: &str, category: RiskCategory) -> RiskFactor {
        let mut f = RiskFactor::extracted(text.to_string(), "risk_factors", 0.8);
        f.category = Some(category);
        f
    }

    #[test]
    fn test_severity_tiers() {
        let p = patterns();
        assert_eq!(severity_level("This could be materially adverse to us", &p), Severity::High);
        assert_eq!(severity_level("Tariffs could negatively affect sales", &p), Severity::Medium);
        assert_eq!(severity_level("A routine matter before the court", &p), Severity::Low);
        assert_eq!(severity_level("Plain statement", &p), Severity::Medium);
    }

    #[test]
    fn test_impact_adjustments() {
        let p = patterns();
        // 5 x 1.5 is capped
        assert_relative_eq!(impact_score("a material loss", Severity::High, &p), 5.0);
        assert_relative_eq!(impact_score("a routine loss", Severity::Low, &p), 0.7);
        assert_relative_eq!(impact_score("a loss", Severity::Medium, &p), 3.0);
        assert_relative_eq!(impact_score("significant loss", Severity::Medium, &p), 4.5);
    }

    #[test]
    fn test_likelihood_cues() {
        let p = patterns();
        assert_relative_eq!(likelihood("This is likely to recur", &p), 0.8);
        assert_relative_eq!(likelihood("Costs could rise", &p), 0.5);
        assert_relative_eq!(likelihood("A remote possibility", &p), 0.2);
        assert_relative_eq!(likelihood("Costs rise", &p), 0.5);
    }

    #[test]
    fn test_materially_adverse_scores_high() {
        let scored = score_factor(
            &factor("Competition could be materially adverse to results", RiskCategory::Market),
            &patterns(),
        );
        assert_eq!(scored.severity, Some(Severity::High));
        assert_relative_eq!(scored.impact_score, 5.0);
        assert_relative_eq!(scored.likelihood, 0.5);
        assert_relative_eq!(scored.overall_risk_score, 2.5);
    }

    #[test]
    fn test_aggregates() {
        let factors = vec![
            factor("Competition could be materially adverse to results", RiskCategory::Market),
            factor("Pricing pressure is a routine matter", RiskCategory::Market),
            factor("Liquidity risk is remote", RiskCategory::Financial),
        ];
        let assessment = assess_risk_severity(&factors, &patterns(), DEFAULT_TOP_RISKS);

        // 2.5, 0.7 x 0.5 = 0.35, 3.0 x 0.2 = 0.6
        assert_relative_eq!(assessment.overall_risk_score, (2.5 + 0.35 + 0.6) / 3.0);
        let market = &assessment.category_scores[&RiskCategory::Market];
        assert_eq!(market.risk_count, 2);
        assert_relative_eq!(market.average_score, (2.5 + 0.35) / 2.0);
        assert_relative_eq!(market.max_score, 2.5);
        assert_eq!(market.severity_distribution[&Severity::High], 1);
        assert_eq!(market.severity_distribution[&Severity::Low], 1);

        assert_eq!(assessment.risk_distribution[&Severity::Medium], 1);
        assert_eq!(assessment.top_risks[0].text, factors[0].text);
        assert_eq!(assessment.top_risks[1].text, factors[2].text);
    }

    #[test]
    fn test_top_risks_truncates_and_keeps_ties_in_order() {
        let mut a = factor("a", RiskCategory::Market);
        a.overall_risk_score = 1.0;
        let mut b = factor("b", RiskCategory::Market);
        b.overall_risk_score = 2.0;
        let mut c = factor("c", RiskCategory::Market);
        c.overall_risk_score = 1.0;

        let top = top_risks(&[a, b, c], 2);
        let texts: Vec<&str> = top.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "a"]);
    }

    #[test]
    fn test_empty_assessment() {
        let assessment = assess_risk_severity(&[], &patterns(), DEFAULT_TOP_RISKS);
        assert_eq!(assessment.overall_risk_score, 0.0);
        assert!(assessment.category_scores.is_empty());
        assert!(assessment.top_risks.is_empty());
    }
}
