use thiserror::Error;

/// tourstats error types
#[derive(Error, Debug)]
pub enum StatError {
    /// Requested year range or granularity is invalid
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// A metric spec references a metric no tour carries
    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    /// Tour record source failed (persistence layer)
    #[error("source error: {0}")]
    Source(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse tour record input
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type alias for tourstats
pub type Result<T> = std::result::Result<T, StatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StatError::InvalidRange("year count is 0".into());
        assert_eq!(err.to_string(), "invalid range: year count is 0");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: StatError = io_err.into();
        assert!(err.to_string().contains("io error"));
    }
}
