//! Economics error types

use thiserror::Error;

/// Market and parameter errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EconomicsError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Requested amount {requested} exceeds block limit {limit}")]
    LimitExceeded { requested: u64, limit: u64 },

    #[error("Requested amount {requested} exceeds available supply {supply}")]
    InsufficientSupply { requested: u64, supply: u64 },

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Arithmetic overflow: {0}")]
    ArithmeticOverflow(&'static str),
}

impl EconomicsError {
    /// True for errors that indicate lost precision rather than a bad request
    pub fn is_overflow(&self) -> bool {
        matches!(self, EconomicsError::ArithmeticOverflow(_))
    }
}

pub type Result<T> = std::result::Result<T, EconomicsError>;
