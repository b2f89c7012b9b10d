//! Pattern tables driving extraction, classification and severity scoring.
//!
//! [`RiskPatternConfig`] is plain data (serde-friendly, replaceable in tests);
//! [`CompiledPatterns`] is what the engine actually runs and is built once.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use filing_core::{AnalysisError, RiskCategory, Severity};

/// A filing section: it starts at `start` and runs until the first `end`
/// match after it. A start with no following end is not a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionPattern {
    pub name: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPatterns {
    pub category: RiskCategory,
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityPatterns {
    pub severity: Severity,
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikelihoodCue {
    pub likelihood: f64,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPatternConfig {
    pub sections: Vec<SectionPattern>,
    /// Splits a section into items on numbered-list or ALL-CAPS heading lines.
    /// Case-sensitive.
    pub item_split: String,
    pub sentence_split: String,
    /// Any of these (substring, lowercase) marks a sentence as a risk in the
    /// whole-text fallback.
    pub fallback_keywords: Vec<String>,
    /// Scored in order; earlier categories win ties.
    pub categories: Vec<CategoryPatterns>,
    /// Checked in order; the first severity with a match wins.
    pub severities: Vec<SeverityPatterns>,
    pub amplifying_terms: Vec<String>,
    pub dampening_terms: Vec<String>,
    /// Checked in order; the first cue with a keyword present wins.
    pub likelihood_cues: Vec<LikelihoodCue>,
    pub mitigation_strategies: BTreeMap<RiskCategory, Vec<String>>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for RiskPatternConfig {
    fn default() -> Self {
        let item_boundary = r"item\s*\d+[a-z]?\.";
        let forward_looking = r"forward[\s-]*looking";
        let quantitative = r"quantitative\s+and\s+qualitative";
        let mdna = r"management(?:'s|’s)?\s+discussion";

        Self {
            sections: vec![
                SectionPattern {
                    name: "risk_factors".to_string(),
                    start: r"risk\s+factors?".to_string(),
                    end: format!("{}|{}|{}|{}", item_boundary, mdna, quantitative, forward_looking),
                },
                SectionPattern {
                    name: "risk_disclosure".to_string(),
                    start: r"risk\s+disclosures?".to_string(),
                    end: format!("{}|{}|{}|{}", item_boundary, mdna, quantitative, forward_looking),
                },
                SectionPattern {
                    name: "management_discussion".to_string(),
                    start: format!(r"{}\s+and\s+analysis", mdna),
                    end: format!("{}|{}|{}", item_boundary, quantitative, forward_looking),
                },
            ],
            item_split: r"\n\s*\d+\.\s+|\n\s*[A-Z][A-Z\s]+\s*\n".to_string(),
            sentence_split: r"[.!?]+".to_string(),
            fallback_keywords: strings(&[
                "risk", "adverse", "uncertainty", "challenge", "threat", "exposure",
                "vulnerability", "liability", "obligation", "commitment",
            ]),
            categories: vec![
                CategoryPatterns {
                    category: RiskCategory::Market,
                    patterns: strings(&[
                        r"economic.*conditions?",
                        r"market.*demand",
                        r"competition",
                        r"customer.*concentration",
                        r"pricing.*pressure",
                        r"supply.*chain",
                        r"commodity.*price",
                        r"foreign.*exchange",
                        r"interest.*rate",
                    ]),
                },
                CategoryPatterns {
                    category: RiskCategory::Operational,
                    patterns: strings(&[
                        r"operational.*efficiency",
                        r"technology.*disruption",
                        r"cyber.*security",
                        r"data.*breach",
                        r"system.*failure",
                        r"vendor.*reliance",
                        r"intellectual.*property",
                        r"talent.*acquisition",
                        r"workforce.*issues",
                    ]),
                },
                CategoryPatterns {
                    category: RiskCategory::Financial,
                    patterns: strings(&[
                        r"liquidity.*risk",
                        r"credit.*risk",
                        r"debt.*obligation",
                        r"capital.*requirement",
                        r"financial.*covenant",
                        r"rating.*agency",
                        r"cost.*structure",
                        r"cash.*flow.*risk",
                    ]),
                },
                CategoryPatterns {
                    category: RiskCategory::Regulatory,
                    patterns: strings(&[
                        r"regulatory.*change",
                        r"legal.*proceeding",
                        r"compliance.*cost",
                        r"environmental.*regulation",
                        r"tax.*policy",
                        r"trade.*policy",
                        r"antitrust",
                        r"data.*privacy",
                    ]),
                },
            ],
            severities: vec![
                SeverityPatterns {
                    severity: Severity::High,
                    patterns: strings(&[
                        r"(materially|significantly|substantially).*adverse",
                        r"could.*result.*in.*significant",
                        r"may.*have.*material.*impact",
                        r"substantial.*risk",
                        r"critical.*dependence",
                    ]),
                },
                SeverityPatterns {
                    severity: Severity::Medium,
                    patterns: strings(&[
                        r"could.*negatively.*affect",
                        r"may.*impact",
                        r"potential.*risk",
                        r"challenges.*faced",
                        r"uncertainties.*exist",
                    ]),
                },
                SeverityPatterns {
                    severity: Severity::Low,
                    patterns: strings(&[
                        r"minor.*impact",
                        r"routine.*matter",
                        r"standard.*practice",
                        r"expected.*fluctuation",
                    ]),
                },
            ],
            amplifying_terms: strings(&["material", "significant", "substantial"]),
            dampening_terms: strings(&["minor", "routine", "standard"]),
            likelihood_cues: vec![
                LikelihoodCue {
                    likelihood: 0.8,
                    keywords: strings(&["will", "expected", "likely", "probable"]),
                },
                LikelihoodCue {
                    likelihood: 0.5,
                    keywords: strings(&["may", "could", "possible", "potential"]),
                },
                LikelihoodCue {
                    likelihood: 0.2,
                    keywords: strings(&["unlikely", "remote", "minimal"]),
                },
            ],
            mitigation_strategies: BTreeMap::from([
                (
                    RiskCategory::Market,
                    strings(&[
                        "Diversify customer base and geographic exposure",
                        "Implement hedging strategies for currency and commodity risks",
                        "Monitor competitive landscape and market trends",
                    ]),
                ),
                (
                    RiskCategory::Operational,
                    strings(&[
                        "Invest in cybersecurity infrastructure",
                        "Develop business continuity plans",
                        "Strengthen vendor management processes",
                    ]),
                ),
                (
                    RiskCategory::Financial,
                    strings(&[
                        "Maintain adequate liquidity reserves",
                        "Monitor debt covenants and credit ratings",
                        "Implement robust financial controls",
                    ]),
                ),
                (
                    RiskCategory::Regulatory,
                    strings(&[
                        "Establish compliance monitoring systems",
                        "Maintain relationships with regulatory bodies",
                        "Implement regular legal reviews",
                    ]),
                ),
                (
                    RiskCategory::General,
                    strings(&["Review general risk management practices"]),
                ),
            ]),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledSection {
    pub name: String,
    pub start: Regex,
    pub end: Regex,
}

/// Compiled, immutable form of a [`RiskPatternConfig`].
#[derive(Debug, Clone)]
pub struct CompiledPatterns {
    pub(crate) sections: Vec<CompiledSection>,
    pub(crate) item_split: Regex,
    pub(crate) sentence_split: Regex,
    pub(crate) fallback_keywords: Vec<String>,
    pub(crate) categories: Vec<(RiskCategory, Vec<Regex>)>,
    pub(crate) severities: Vec<(Severity, Vec<Regex>)>,
    pub(crate) amplifying_terms: Vec<String>,
    pub(crate) dampening_terms: Vec<String>,
    pub(crate) likelihood_cues: Vec<LikelihoodCue>,
    pub(crate) mitigation_strategies: BTreeMap<RiskCategory, Vec<String>>,
}

impl CompiledPatterns {
    pub fn compile(config: &RiskPatternConfig) -> Result<Self, AnalysisError> {
        let sections = config
            .sections
            .iter()
            .map(|s| {
                let start = section_regex(&s.start)?;
                if start.is_match("") {
                    return Err(AnalysisError::InvalidPattern(format!(
                        "{}: section start must not match empty text",
                        s.start
                    )));
                }
                Ok(CompiledSection {
                    name: s.name.clone(),
                    start,
                    end: section_regex(&s.end)?,
                })
            })
            .collect::<Result<Vec<_>, AnalysisError>>()?;

        let categories = config
            .categories
            .iter()
            .map(|c| Ok((c.category, text_regexes(&c.patterns)?)))
            .collect::<Result<Vec<_>, AnalysisError>>()?;

        let severities = config
            .severities
            .iter()
            .map(|s| Ok((s.severity, text_regexes(&s.patterns)?)))
            .collect::<Result<Vec<_>, AnalysisError>>()?;

        Ok(Self {
            sections,
            item_split: plain_regex(&config.item_split)?,
            sentence_split: plain_regex(&config.sentence_split)?,
            fallback_keywords: lowercase(&config.fallback_keywords),
            categories,
            severities,
            amplifying_terms: lowercase(&config.amplifying_terms),
            dampening_terms: lowercase(&config.dampening_terms),
            likelihood_cues: config
                .likelihood_cues
                .iter()
                .map(|cue| LikelihoodCue {
                    likelihood: cue.likelihood,
                    keywords: lowercase(&cue.keywords),
                })
                .collect(),
            mitigation_strategies: config.mitigation_strategies.clone(),
        })
    }
}

fn lowercase(terms: &[String]) -> Vec<String> {
    terms.iter().map(|t| t.to_lowercase()).collect()
}

fn build(pattern: &str, case_insensitive: bool, dot_all: bool) -> Result<Regex, AnalysisError> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .dot_matches_new_line(dot_all)
        .build()
        .map_err(|e| AnalysisError::InvalidPattern(format!("{}: {}", pattern, e)))
}

fn section_regex(pattern: &str) -> Result<Regex, AnalysisError> {
    build(pattern, true, true)
}

fn plain_regex(pattern: &str) -> Result<Regex, AnalysisError> {
    build(pattern, false, false)
}

fn text_regexes(patterns: &[String]) -> Result<Vec<Regex>, AnalysisError> {
    patterns.iter().map(|p| build(p, true, false)).collect()
}
