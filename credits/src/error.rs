//! Resource credit error types

use rc_storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CreditError {
    #[error("Insufficient mana: required {required}, available {available}")]
    InsufficientMana { required: u64, available: u64 },

    #[error("Clock regression: now {now} is before last update {last_update_time}")]
    ClockRegression { last_update_time: u64, now: u64 },

    #[error("Account {0} is configured unlimited")]
    ConfiguredUnlimited(String),

    #[error("Invalid regeneration window: {0}")]
    InvalidRegenWindow(u64),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, CreditError>;
