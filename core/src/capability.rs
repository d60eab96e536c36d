//! Caller capabilities
//!
//! The host resolves who is calling once, before dispatch, and hands the
//! result in as a [`Capability`]. Entry points only compare values.

use credits::AccountId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ResourceError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Block producer context: settlement and balance notifications
    Kernel,
    /// Governance: parameters, market budgets, unlimited accounts
    SystemAuthority,
    /// An ordinary signed account
    Account(AccountId),
}

impl Capability {
    pub fn require_kernel(&self, operation: &str) -> Result<()> {
        match self {
            Capability::Kernel => Ok(()),
            _ => Err(self.deny(operation, "kernel")),
        }
    }

    pub fn require_system_authority(&self, operation: &str) -> Result<()> {
        match self {
            Capability::SystemAuthority => Ok(()),
            _ => Err(self.deny(operation, "system authority")),
        }
    }

    /// Kernel may spend for anyone; an account only for itself
    pub fn require_spender(&self, account: &str, operation: &str) -> Result<()> {
        match self {
            Capability::Kernel => Ok(()),
            Capability::Account(id) if id == account => Ok(()),
            _ => Err(self.deny(operation, &format!("kernel or account {}", account))),
        }
    }

    fn deny(&self, operation: &str, required: &str) -> ResourceError {
        log::warn!("{} denied to {}: requires {}", operation, self, required);
        ResourceError::Unauthorized(format!(
            "{} requires {}, caller is {}",
            operation, required, self
        ))
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Kernel => write!(f, "kernel"),
            Capability::SystemAuthority => write!(f, "system authority"),
            Capability::Account(id) => write!(f, "account {}", id),
        }
    }
}
