//! Error types for stock analysis operations

use thiserror::Error;

/// Stock analysis specific errors
#[derive(Debug, Error)]
pub enum StockError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider does not know the symbol
    #[error("Symbol not found: {symbol}")]
    NotFound { symbol: String },

    /// The provider answered with something we could not read
    #[error("Parse error: {0}")]
    Parse(String),

    /// The provider did not answer in time
    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Any other failure reported by the data provider
    #[error("Provider error: {0}")]
    Provider(String),

    /// The provider returned an empty price history
    #[error("No data available for {symbol}")]
    NoData { symbol: String },

    /// Invalid stock symbol provided
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Symbol is already in the working set
    #[error("{0} already in list")]
    DuplicateSymbol(String),

    /// Unknown history period
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chart rendering error
    #[error("Chart error: {0}")]
    Chart(String),

    /// Terminal or sink I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StockError {
    /// Whether the error came from fetching data, as opposed to local
    /// validation, configuration or I/O.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Network(_)
                | Self::NotFound { .. }
                | Self::Parse(_)
                | Self::Timeout { .. }
                | Self::Provider(_)
                | Self::NoData { .. }
        )
    }
}

/// JSON parsing errors only come from provider payloads
impl From<serde_json::Error> for StockError {
    fn from(err: serde_json::Error) -> Self {
        StockError::Parse(err.to_string())
    }
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StockError::InvalidSymbol("TOOLONGSYM".to_string());
        assert_eq!(err.to_string(), "Invalid symbol: TOOLONGSYM");

        let err = StockError::NoData {
            symbol: "AAPL".to_string(),
        };
        assert_eq!(err.to_string(), "No data available for AAPL");

        let err = StockError::DuplicateSymbol("MSFT".to_string());
        assert_eq!(err.to_string(), "MSFT already in list");
    }

    #[test]
    fn test_fetch_failure_classification() {
        assert!(StockError::NoData { symbol: "X".into() }.is_fetch_failure());
        assert!(StockError::NotFound { symbol: "X".into() }.is_fetch_failure());
        assert!(StockError::Provider("boom".into()).is_fetch_failure());
        assert!(!StockError::InvalidSymbol("X".into()).is_fetch_failure());
        assert!(!StockError::Config("bad".into()).is_fetch_failure());
    }

    #[test]
    fn test_json_error_becomes_parse() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: StockError = json_err.into();
        assert!(matches!(err, StockError::Parse(_)));
    }
}
