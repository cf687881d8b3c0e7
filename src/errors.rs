/// Domain-specific error types for the strike calculator.
/// Every variant is terminal for the request that raised it:
/// - Validation errors abort before any market data is fetched
/// - Data errors abort before any strike is computed
#[derive(Debug, thiserror::Error)]
pub enum CondorError {
    #[error("invalid wing width {width}: must be one of {allowed:?}")]
    InvalidWingWidth { width: i64, allowed: Vec<u32> },

    #[error("invalid horizon '{0}': must be one of daily, weekly, monthly, yearly")]
    InvalidHorizon(String),

    #[error("invalid target date: {0}")]
    InvalidDateWindow(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("market data unavailable: {0}")]
    DataUnavailable(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("config error: {0}")]
    Config(String),
}

impl CondorError {
    /// True for errors the caller can fix by correcting the request.
    #[inline]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CondorError::InvalidWingWidth { .. }
                | CondorError::InvalidHorizon(_)
                | CondorError::InvalidDateWindow(_)
                | CondorError::InvalidInput(_)
        )
    }
}

impl From<reqwest::Error> for CondorError {
    fn from(e: reqwest::Error) -> Self {
        CondorError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for CondorError {
    fn from(e: serde_json::Error) -> Self {
        CondorError::Parse(e.to_string())
    }
}

pub type CondorResult<T> = Result<T, CondorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wing_error_lists_allowed_set() {
        let e = CondorError::InvalidWingWidth { width: 30, allowed: vec![10, 15, 20, 25] };
        assert_eq!(e.to_string(), "invalid wing width 30: must be one of [10, 15, 20, 25]");
        assert!(e.is_validation());
    }

    #[test]
    fn test_data_errors_are_not_validation() {
        assert!(!CondorError::DataUnavailable("timeout".into()).is_validation());
        assert!(!CondorError::Network("reset".into()).is_validation());
    }
}
