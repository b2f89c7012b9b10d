use anyhow::{Context, Result};
use risk_assessment::{RiskEngineSettings, SummaryOptions};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilingConfig {
    pub top_risks: usize,               // 5
    pub key_risk_preview_chars: usize,  // 100
    pub summary_categories: usize,      // 3
    pub company_name: String,           // "Company"
}

impl Default for FilingConfig {
    fn default() -> Self {
        Self {
            top_risks: 5,
            key_risk_preview_chars: 100,
            summary_categories: 3,
            company_name: "Company".to_string(),
        }
    }
}

impl FilingConfig {
    /// Reads `FILING_*` variables, loading `.env` first when one exists.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            top_risks: parse_or(&lookup, "FILING_TOP_RISKS", defaults.top_risks)?,
            key_risk_preview_chars: parse_or(
                &lookup,
                "FILING_KEY_RISK_PREVIEW_CHARS",
                defaults.key_risk_preview_chars,
            )?,
            summary_categories: parse_or(
                &lookup,
                "FILING_SUMMARY_CATEGORIES",
                defaults.summary_categories,
            )?,
            company_name: lookup("FILING_COMPANY_NAME").unwrap_or(defaults.company_name),
        })
    }

    pub fn risk_settings(&self) -> RiskEngineSettings {
        RiskEngineSettings {
            top_risks: self.top_risks,
            summary: SummaryOptions {
                preview_chars: self.key_risk_preview_chars,
                highlighted_categories: self.summary_categories,
            },
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a non-negative integer, got {:?}", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = FilingConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, FilingConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = FilingConfig::from_lookup(lookup(&[
            ("FILING_TOP_RISKS", "10"),
            ("FILING_KEY_RISK_PREVIEW_CHARS", " 80 "),
            ("FILING_COMPANY_NAME", "Acme Corp"),
        ]))
        .unwrap();
        assert_eq!(config.top_risks, 10);
        assert_eq!(config.key_risk_preview_chars, 80);
        assert_eq!(config.summary_categories, 3);
        assert_eq!(config.company_name, "Acme Corp");

        let settings = config.risk_settings();
        assert_eq!(settings.top_risks, 10);
        assert_eq!(settings.summary.preview_chars, 80);
    }

    #[test]
    fn test_bad_number_names_the_variable() {
        let err = FilingConfig::from_lookup(lookup(&[("FILING_TOP_RISKS", "five")])).unwrap_err();
        assert!(err.to_string().contains("FILING_TOP_RISKS"));
    }
}
