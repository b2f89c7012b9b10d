use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// A required line item or ratio is absent. Normally carried as a value
    /// (a null ratio or a skipped period) rather than returned.
    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Computation failure: {0}")]
    ComputationFailure(String),

    /// The extraction stage handed over a container of the wrong shape.
    #[error("Input shape error: {0}")]
    InputShape(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_detail() {
        assert_eq!(
            AnalysisError::MissingData("net_margin in 2023".to_string()).to_string(),
            "Missing data: net_margin in 2023"
        );
        assert_eq!(
            AnalysisError::ComputationFailure("non-finite line items: revenue".to_string()).to_string(),
            "Computation failure: non-finite line items: revenue"
        );
    }
}
