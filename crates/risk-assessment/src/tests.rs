#[cfg(test)]
mod risk_pipeline_tests {
    use crate::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use filing_core::{RiskAnalyzer, RiskCategory, RiskLevel, Severity};

    const FILING: &str = "PART I\n\
        Item 1A. Risk Factors\n\
        1. Intense competition and pricing pressure could be materially adverse to our operating results.\n\
        2. A cyber security incident or data breach may impact our reputation and customer relationships.\n\
        3. Changes in tax policy and trade policy could negatively affect the cost of imported components.\n\
        4. Weather.\n\
        Item 1B. Unresolved Staff Comments\n\
        None.";

    fn engine() -> RiskAssessmentEngine {
        RiskAssessmentEngine::new().unwrap()
    }

    #[test]
    fn test_pipeline_extracts_classifies_and_scores() {
        let assessment = engine().assess_filing(FILING);

        assert_eq!(assessment.individual_risks.len(), 3);
        let categories: Vec<RiskCategory> = assessment
            .individual_risks
            .iter()
            .map(|r| r.category_or_general())
            .collect();
        assert_eq!(
            categories,
            vec![RiskCategory::Market, RiskCategory::Operational, RiskCategory::Regulatory]
        );

        let first = &assessment.individual_risks[0];
        assert_eq!(first.severity, Some(Severity::High));
        assert_relative_eq!(first.impact_score, 5.0);
        assert_relative_eq!(first.overall_risk_score, 2.5);
        assert_eq!(assessment.top_risks[0].text, first.text);
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let engine = engine();
        assert_eq!(engine.assess_filing(FILING), engine.assess_filing(FILING));
    }

    #[test]
    fn test_empty_filing() {
        let engine = engine();
        let assessment = engine.assess_filing("");
        assert!(assessment.individual_risks.is_empty());
        assert_eq!(assessment.overall_risk_score, 0.0);

        let summary = engine.summarize(&assessment, "Acme");
        assert_eq!(summary.executive_summary.overall_risk_level, RiskLevel::Low);
        assert_eq!(summary.executive_summary.total_risks_identified, 0);
        assert!(summary.executive_summary.key_risks.is_empty());
    }

    #[test]
    fn test_top_risk_count_is_configurable() {
        let settings = RiskEngineSettings {
            top_risks: 1,
            ..RiskEngineSettings::default()
        };
        let engine = RiskAssessmentEngine::with_config(&RiskPatternConfig::default(), settings).unwrap();
        assert_eq!(engine.assess_filing(FILING).top_risks.len(), 1);
    }

    #[test]
    fn test_custom_patterns_replace_defaults() {
        let mut config = RiskPatternConfig::default();
        config.categories.retain(|c| c.category == RiskCategory::Financial);
        let engine = RiskAssessmentEngine::with_config(&config, RiskEngineSettings::default()).unwrap();

        let assessment = engine.assess_filing(FILING);
        assert!(assessment
            .individual_risks
            .iter()
            .all(|r| r.category == Some(RiskCategory::General)));
    }

    #[test]
    fn test_summary_through_trait() {
        let engine = engine();
        let analyzer: &dyn RiskAnalyzer = &engine;
        let assessment = analyzer.assess(FILING);
        let date = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let summary = engine.generate_risk_summary_on(&assessment, "Acme", date);

        assert_eq!(summary.executive_summary.assessment_date, "2024-06-30");
        assert_eq!(summary.executive_summary.key_risks.len(), 3);
        assert_eq!(summary.risk_categories.len(), 3);
        assert_eq!(summary.executive_summary.highest_risk_categories[0], RiskCategory::Market);
    }
}
