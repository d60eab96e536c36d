//! Resource Market Economics
//!
//! Implements the pricing side of the resource credit economy:
//! - Fixed-point supply decay
//! - Governance-tunable system parameters
//! - Per-resource bonding-curve markets (disk, network, compute)

pub mod error;
pub mod fixed_point;
pub mod market;
pub mod params;

pub use error::{EconomicsError, Result};
pub use fixed_point::{decay, DecayConstant};
pub use market::{MarketLimit, ResourceKind, ResourceMarket};
pub use params::SystemResourceParameters;

/// Economic constants
pub mod constants {
    /// Fixed-point one, the base of every decay constant (2^64)
    pub const FIXED_POINT_ONE: u128 = 1 << 64;

    /// Target block interval (10 seconds)
    pub const BLOCK_INTERVAL_MS: u64 = 10_000;

    /// Blocks per week at the target interval (60,480)
    pub const TARGET_BLOCKS_PER_WEEK: u64 = 7 * 86_400_000 / BLOCK_INTERVAL_MS;

    /// Mana regeneration window (5 days)
    pub const RC_REGEN_MS: u64 = 5 * 86_400_000;

    /// Per-block decay for a one week half life: exp(-ln(2) / blocks_per_week) * 2^64
    pub const DECAY_CONSTANT: u128 = 18_446_532_661_087_609_961;

    /// Print rate premium over budget (1 + ln 2).
    ///
    /// With this premium a market consuming exactly its budget every block
    /// settles at `block_budget * TARGET_BLOCKS_PER_WEEK` supply.
    pub const PRINT_RATE_PREMIUM: u64 = 16_931;

    /// Precision of [`PRINT_RATE_PREMIUM`]
    pub const PRINT_RATE_PRECISION: u64 = 10_000;

    /// Supply ceiling, in blocks of budget (two weeks)
    pub const SUPPLY_CEILING_BLOCKS: u64 = 2 * TARGET_BLOCKS_PER_WEEK;

    /// RC cost of consuming exactly one block budget at genesis (10 tokens)
    pub const BUDGET_REFERENCE_COST: u64 = 1_000_000_000;

    /// Disk budget per block (10G per month)
    pub const DISK_BUDGET_PER_BLOCK: u64 = 39_600;

    /// Disk limit per block (200k)
    pub const MAX_DISK_PER_BLOCK: u64 = 200 << 10;

    /// Network budget per block (256k)
    pub const NETWORK_BUDGET_PER_BLOCK: u64 = 1 << 18;

    /// Network limit per block (1M)
    pub const MAX_NETWORK_PER_BLOCK: u64 = 1 << 20;

    /// Compute budget per block (~0.1s)
    pub const COMPUTE_BUDGET_PER_BLOCK: u64 = 230_000_000;

    /// Compute limit per block (~0.5s)
    pub const MAX_COMPUTE_PER_BLOCK: u64 = 1_150_000_000;
}
