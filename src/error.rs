//! Error types for ARINC 429 encoding and transmission

use thiserror::Error;

/// Result type for ARINC 429 operations
pub type Result<T> = std::result::Result<T, TxError>;

/// Error types encountered during ARINC 429 word construction and transmission
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TxError {
    /// A protocol field value is out of range for its bit width
    #[error("Invalid field: {0}")]
    InvalidField(String),

    /// Parity check failed
    #[error("Parity error: {0}")]
    ParityError(String),

    /// Invalid sign/status matrix value
    #[error("Invalid SSM: {0}")]
    InvalidSsm(String),

    /// Invalid clock configuration
    #[error("Invalid clock configuration: {0}")]
    InvalidClock(String),

    /// A bounded transmit wait exhausted its poll budget
    #[error("Transmit timeout: {0}")]
    Timeout(String),
}

impl TxError {
    /// Create a new InvalidField error
    pub fn invalid_field(msg: impl Into<String>) -> Self {
        TxError::InvalidField(msg.into())
    }

    /// Create a new ParityError
    pub fn parity_error(msg: impl Into<String>) -> Self {
        TxError::ParityError(msg.into())
    }

    /// Create a new InvalidSsm error
    pub fn invalid_ssm(msg: impl Into<String>) -> Self {
        TxError::InvalidSsm(msg.into())
    }

    /// Create a new InvalidClock error
    pub fn invalid_clock(msg: impl Into<String>) -> Self {
        TxError::InvalidClock(msg.into())
    }

    /// Create a new Timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        TxError::Timeout(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TxError::invalid_field("test");
        assert!(err.to_string().contains("Invalid field"));
    }
}
