//! Resource Credits
//!
//! Per-account mana that regenerates linearly toward the account's token
//! balance. Charges for consumed resources are paid out of it.

pub mod account;
pub mod error;
pub mod ledger;

pub use account::{regenerate, AccountResourceCredit};
pub use error::{CreditError, Result};
pub use ledger::{BalanceOracle, CreditLedger};

/// Account identifier as issued by the host
pub type AccountId = String;
