//! Resource Credit System
//!
//! Entry points of the resource economy: per-account regenerating resource
//! credits paying for three continuously supplied markets (disk storage,
//! network bandwidth, compute) that are settled once per block.
//!
//! The host supplies the object store, the clock, the token balance oracle and
//! the caller's [`Capability`]; everything else lives here.

pub mod capability;
pub mod config;
pub mod error;
pub mod host;
pub mod markets;
pub mod settlement;
pub mod system;

pub use capability::Capability;
pub use config::{ConfigError, StorageLayout, SystemConfig};
pub use error::{ErrorKind, ResourceError, Result};
pub use host::{BalanceOracle, Clock, FixedBalances, ManualClock, SystemClock};
pub use markets::{
    BlockConsumption, MarketParameters, MarketsParameters, ResourceLimits, ResourceMarkets,
};
pub use system::{ChargeReceipt, ResourceSystem};

pub use credits::{AccountId, AccountResourceCredit};
pub use economics::{DecayConstant, MarketLimit, ResourceKind, ResourceMarket, SystemResourceParameters};
