//! Errors returned by resource system entry points

use credits::CreditError;
use economics::{EconomicsError, ResourceKind};
use rc_storage::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Economics error: {0}")]
    Economics(#[from] EconomicsError),

    #[error("Credit error: {0}")]
    Credit(#[from] CreditError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("{resource} consumption {consumed} exceeds block limit {limit}")]
    BlockLimitExceeded {
        resource: ResourceKind,
        consumed: u64,
        limit: u64,
    },

    #[error("Clock regression: now {now} is before last settlement {last_settlement_ms}")]
    ClockRegression { last_settlement_ms: u64, now: u64 },
}

/// Coarse failure category reported to the dispatch layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidRequest,
    InsufficientMana,
    Unauthorized,
    ArithmeticOverflow,
    ClockRegression,
    Storage,
    Configuration,
}

impl ResourceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResourceError::Economics(e) if e.is_overflow() => ErrorKind::ArithmeticOverflow,
            ResourceError::Economics(_) => ErrorKind::InvalidRequest,
            ResourceError::Credit(CreditError::InsufficientMana { .. }) => ErrorKind::InsufficientMana,
            ResourceError::Credit(CreditError::ClockRegression { .. }) => ErrorKind::ClockRegression,
            ResourceError::Credit(CreditError::ConfiguredUnlimited(_)) => ErrorKind::InvalidRequest,
            ResourceError::Credit(CreditError::InvalidRegenWindow(_)) => ErrorKind::Configuration,
            ResourceError::Credit(CreditError::Storage(_)) => ErrorKind::Storage,
            ResourceError::Storage(_) => ErrorKind::Storage,
            ResourceError::Config(_) => ErrorKind::Configuration,
            ResourceError::Unauthorized(_) => ErrorKind::Unauthorized,
            ResourceError::BlockLimitExceeded { .. } => ErrorKind::InvalidRequest,
            ResourceError::ClockRegression { .. } => ErrorKind::ClockRegression,
        }
    }
}

pub type Result<T> = std::result::Result<T, ResourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let overflow = ResourceError::from(EconomicsError::ArithmeticOverflow("price"));
        assert_eq!(overflow.kind(), ErrorKind::ArithmeticOverflow);

        let over_limit = ResourceError::from(EconomicsError::LimitExceeded {
            requested: 500,
            limit: 400,
        });
        assert_eq!(over_limit.kind(), ErrorKind::InvalidRequest);

        let broke = ResourceError::from(CreditError::InsufficientMana {
            required: 2,
            available: 1,
        });
        assert_eq!(broke.kind(), ErrorKind::InsufficientMana);

        let regression = ResourceError::from(CreditError::ClockRegression {
            last_update_time: 2,
            now: 1,
        });
        assert_eq!(regression.kind(), ErrorKind::ClockRegression);

        assert_eq!(
            ResourceError::Unauthorized("x".to_string()).kind(),
            ErrorKind::Unauthorized
        );
    }

    #[test]
    fn test_block_limit_message() {
        let err = ResourceError::BlockLimitExceeded {
            resource: ResourceKind::NetworkBandwidth,
            consumed: 10,
            limit: 5,
        };
        assert_eq!(
            err.to_string(),
            "network_bandwidth consumption 10 exceeds block limit 5"
        );
    }
}
