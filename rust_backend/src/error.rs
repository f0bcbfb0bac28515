//! Error types for time map construction.

/// Result type for time map operations
pub type TimeMapResult<T> = Result<T, TimeMapError>;

/// Error type for time map operations
#[derive(Debug, thiserror::Error)]
pub enum TimeMapError {
    #[error("Insufficient data: {count} timestamps supplied, at least 3 are required")]
    InsufficientData { count: usize },

    #[error("Invalid timestamp in record {record_id}: '{value}' ({reason})")]
    InvalidTimestamp {
        record_id: i64,
        value: String,
        reason: String,
    },

    #[error("Separation must be strictly positive and finite, got {0}")]
    NonPositiveSeparation(f64),

    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for TimeMapError {
    fn from(e: serde_json::Error) -> Self {
        TimeMapError::Parse(e.to_string())
    }
}

impl From<toml::de::Error> for TimeMapError {
    fn from(e: toml::de::Error) -> Self {
        TimeMapError::InvalidConfig(format!("Failed to parse config: {}", e))
    }
}
