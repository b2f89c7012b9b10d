//! Risk Classifier: assigns each factor to a scored category by pattern hits.

use std::collections::BTreeMap;

use filing_core::{ClassifiedRisks, RiskCategory, RiskFactor};

use crate::patterns::CompiledPatterns;

const SCORE_PER_MATCH: f64 = 0.5;
const CONFIDENCE_PER_MATCH: f64 = 0.2;

/// Category with the highest match score, and its confidence. Ties go to the
/// category listed first; no matches at all is `General` at zero confidence.
pub fn classify_category(text: &str, patterns: &CompiledPatterns) -> (RiskCategory, f64) {
    let mut best: Option<(RiskCategory, usize, f64)> = None;

    for (category, regexes) in &patterns.categories {
        let matches: usize = regexes.iter().map(|r| r.find_iter(text).count()).sum();
        if matches == 0 {
            continue;
        }
        let score = matches as f64 * SCORE_PER_MATCH;
        if best.map_or(true, |(_, _, top)| score > top) {
            best = Some((*category, matches, score));
        }
    }

    match best {
        Some((category, matches, _)) => {
            (category, (CONFIDENCE_PER_MATCH * matches as f64).min(1.0))
        }
        None => (RiskCategory::General, 0.0),
    }
}

/// Classifies every factor and groups them by category. Input order is kept
/// both in `factors` and within each group.
pub fn classify_risks(factors: &[RiskFactor], patterns: &CompiledPatterns) -> ClassifiedRisks {
    let mut classified = Vec::with_capacity(factors.len());
    let mut by_category: BTreeMap<RiskCategory, Vec<RiskFactor>> = BTreeMap::new();

    for factor in factors {
        let (category, confidence) = classify_category(&factor.text, patterns);
        let mut factor = factor.clone();
        factor.category = Some(category);
        factor.category_confidence = confidence;

        by_category.entry(category).or_default().push(factor.clone());
        classified.push(factor);
    }

    ClassifiedRisks {
        factors: classified,
        by_category,
    }
}
