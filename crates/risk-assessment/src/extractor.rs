//! Risk Extractor: pulls candidate risk factors out of raw filing text.

use tracing::debug;

use filing_core::RiskFactor;

use crate::patterns::{CompiledPatterns, CompiledSection};

/// Items at or below this many characters (after trimming) are headings or
/// noise, not risk factors.
pub const MIN_ITEM_CHARS: usize = 50;
pub const SECTION_CONFIDENCE: f64 = 0.8;
pub const FALLBACK_CONFIDENCE: f64 = 0.3;
pub const FALLBACK_SOURCE: &str = "general_text";

/// Section-based extraction first; if no section yields an item, every
/// sentence mentioning a risk keyword is taken at low confidence.
pub fn extract_risk_factors(text: &str, patterns: &CompiledPatterns) -> Vec<RiskFactor> {
    let mut factors = Vec::new();

    for section in &patterns.sections {
        for body in section_bodies(text, section) {
            factors.extend(parse_section(body, &section.name, patterns));
        }
    }

    if factors.is_empty() {
        debug!("No risk sections found, scanning full text");
        factors = search_general_risks(text, patterns);
    }

    debug!(count = factors.len(), "Extracted risk factors");
    factors
}

/// Every non-overlapping span that opens with the section's start marker and
/// runs up to (not including) the next end marker.
fn section_bodies<'a>(text: &'a str, section: &CompiledSection) -> Vec<&'a str> {
    let mut bodies = Vec::new();
    let mut cursor = 0;

    while let Some(start) = section.start.find_at(text, cursor) {
        let end = match section.end.find_at(text, start.end()) {
            Some(end) => end,
            None => break,
        };
        bodies.push(&text[start.start()..end.start()]);

        // step past this match's start even if it was empty
        match next_char_boundary(text, start.start()) {
            Some(step) => cursor = end.start().max(start.end()).max(step),
            None => break,
        }
    }

    bodies
}

fn next_char_boundary(text: &str, at: usize) -> Option<usize> {
    text[at..].chars().next().map(|c| at + c.len_utf8())
}

fn parse_section(body: &str, source: &str, patterns: &CompiledPatterns) -> Vec<RiskFactor> {
    patterns
        .item_split
        .split(body)
        .map(str::trim)
        .filter(|item| item.chars().count() > MIN_ITEM_CHARS)
        .map(|item| RiskFactor::extracted(clean_risk_text(item), source, SECTION_CONFIDENCE))
        .collect()
}

fn search_general_risks(text: &str, patterns: &CompiledPatterns) -> Vec<RiskFactor> {
    patterns
        .sentence_split
        .split(text)
        .map(str::trim)
        .filter(|sentence| {
            let lower = sentence.to_lowercase();
            patterns.fallback_keywords.iter().any(|k| lower.contains(k.as_str()))
        })
        .map(|sentence| {
            RiskFactor::extracted(clean_risk_text(sentence), FALLBACK_SOURCE, FALLBACK_CONFIDENCE)
        })
        .collect()
}

/// Collapses whitespace runs to single spaces and strips leading and
/// trailing punctuation.
pub fn clean_risk_text(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| !(c.is_alphanumeric() || c == '_' || c.is_whitespace()))
        .trim()
        .to_string()
}
