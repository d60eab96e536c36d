//! Resource markets
//!
//! Each resource kind is sold from its own continuously supplied market. A
//! market prices requests on a constant-product bonding curve between its
//! `resource_supply` and an RC reserve, and is replenished once per block.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{EconomicsError, Result};
use crate::fixed_point::{ceil_div, checked_mul, decay, to_u64};
use crate::params::SystemResourceParameters;

/// Supply never drops below this, keeping the price curve defined
pub const MIN_RESOURCE_SUPPLY: u64 = 1;

/// The three independently priced resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    DiskStorage,
    NetworkBandwidth,
    ComputeBandwidth,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::DiskStorage,
        ResourceKind::NetworkBandwidth,
        ResourceKind::ComputeBandwidth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::DiskStorage => "disk_storage",
            ResourceKind::NetworkBandwidth => "network_bandwidth",
            ResourceKind::ComputeBandwidth => "compute_bandwidth",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "disk" | "disk_storage" => Ok(ResourceKind::DiskStorage),
            "network" | "network_bandwidth" => Ok(ResourceKind::NetworkBandwidth),
            "compute" | "compute_bandwidth" => Ok(ResourceKind::ComputeBandwidth),
            other => Err(format!(
                "unknown resource '{}', expected disk, network or compute",
                other
            )),
        }
    }
}

/// Largest request a market accepts this block and its per-unit RC cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketLimit {
    pub limit: u64,
    pub cost: u64,
}

/// One resource market.
///
/// Invariants: `resource_supply >= 1` and `block_budget <= block_limit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMarket {
    resource_supply: u64,
    rc_reserve: u64,
    block_budget: u64,
    block_limit: u64,
}

impl ResourceMarket {
    /// Create a market whose pool constant makes one full block budget cost
    /// `reference_cost` RC: `rc_reserve = ceil(reference_cost * (supply - budget) / budget)`.
    pub fn genesis(
        initial_supply: u64,
        block_budget: u64,
        block_limit: u64,
        reference_cost: u64,
    ) -> Result<Self> {
        if block_budget == 0 {
            return Err(EconomicsError::InvalidParameters(
                "block_budget must be positive".to_string(),
            ));
        }
        if block_budget > block_limit {
            return Err(EconomicsError::InvalidParameters(format!(
                "block_budget {} exceeds block_limit {}",
                block_budget, block_limit
            )));
        }
        if initial_supply <= block_budget {
            return Err(EconomicsError::InvalidParameters(format!(
                "initial supply {} must exceed block_budget {}",
                initial_supply, block_budget
            )));
        }

        let headroom = u128::from(initial_supply - block_budget);
        let scaled = checked_mul(u128::from(reference_cost), headroom, "genesis reserve")?;
        let reserve = ceil_div(scaled, u128::from(block_budget))
            .ok_or(EconomicsError::ArithmeticOverflow("genesis reserve"))?;

        let market = Self {
            resource_supply: initial_supply,
            rc_reserve: to_u64(reserve, "genesis reserve exceeds u64")?,
            block_budget,
            block_limit,
        };
        market.validate()?;
        Ok(market)
    }

    pub fn resource_supply(&self) -> u64 {
        self.resource_supply
    }

    pub fn rc_reserve(&self) -> u64 {
        self.rc_reserve
    }

    pub fn block_budget(&self) -> u64 {
        self.block_budget
    }

    pub fn block_limit(&self) -> u64 {
        self.block_limit
    }

    /// Constant-product pool factor `k = supply * reserve`
    pub fn pool_constant(&self) -> u128 {
        u128::from(self.resource_supply) * u128::from(self.rc_reserve)
    }

    /// Check a stored record
    pub fn validate(&self) -> Result<()> {
        if self.resource_supply < MIN_RESOURCE_SUPPLY {
            return Err(EconomicsError::InvalidParameters(
                "resource_supply must be positive".to_string(),
            ));
        }
        if self.block_budget > self.block_limit {
            return Err(EconomicsError::InvalidParameters(format!(
                "block_budget {} exceeds block_limit {}",
                self.block_budget, self.block_limit
            )));
        }
        Ok(())
    }

    /// RC cost of `requested` units:
    /// `ceil(k * requested / (supply * (supply - requested)))`.
    ///
    /// Strictly increasing in `requested` whenever `rc_reserve >= resource_supply`,
    /// non-decreasing otherwise.
    pub fn price(&self, requested: u64) -> Result<u64> {
        if requested > self.block_limit {
            return Err(EconomicsError::LimitExceeded {
                requested,
                limit: self.block_limit,
            });
        }
        if requested >= self.resource_supply {
            return Err(EconomicsError::InsufficientSupply {
                requested,
                supply: self.resource_supply,
            });
        }

        // k / supply == rc_reserve, so the supply factor cancels
        let consumed_rc = checked_mul(
            u128::from(self.rc_reserve),
            u128::from(requested),
            "price numerator",
        )?;
        let remaining = u128::from(self.resource_supply - requested);
        let cost = ceil_div(consumed_rc, remaining)
            .ok_or(EconomicsError::ArithmeticOverflow("price denominator"))?;
        to_u64(cost, "price exceeds u64")
    }

    /// Largest request admissible this block and the rounded-up cost per unit
    pub fn limit_quote(&self) -> Result<MarketLimit> {
        let limit = self
            .resource_supply
            .saturating_sub(1)
            .min(self.block_limit);
        if limit == 0 {
            return Ok(MarketLimit { limit, cost: 0 });
        }
        let total = self.price(limit)?;
        let cost = ceil_div(u128::from(total), u128::from(limit))
            .ok_or(EconomicsError::ArithmeticOverflow("limit cost"))?;
        Ok(MarketLimit {
            limit,
            cost: to_u64(cost, "limit cost exceeds u64")?,
        })
    }

    /// Reject block consumption above the hard limit
    pub fn check_consumption(&self, consumed: u64) -> Result<()> {
        if consumed > self.block_limit {
            return Err(EconomicsError::LimitExceeded {
                requested: consumed,
                limit: self.block_limit,
            });
        }
        Ok(())
    }

    /// Compute the market after a block that consumed `consumed` units.
    ///
    /// `new_supply = decay(supply) + print_rate - consumed`, never below 1. The
    /// ceiling `block_budget * supply_ceiling_blocks` only bounds growth: a
    /// market already above it (after governance lowered the budget) just
    /// decays toward it. The reserve is then reset to `ceil(k / new_supply)`,
    /// saturating at `u64::MAX` once the supply is too drained to carry `k`.
    pub fn next_block(&self, consumed: u64, params: &SystemResourceParameters) -> Result<Self> {
        self.check_consumption(consumed)?;

        let decayed = decay(self.resource_supply, params.decay_constant());
        let print_rate = params.print_rate(self.block_budget)?;
        let ceiling = params
            .supply_ceiling(self.block_budget)
            .unwrap_or(u64::MAX)
            .max(decayed)
            .max(MIN_RESOURCE_SUPPLY);

        let replenished = u128::from(decayed) + u128::from(print_rate);
        let new_supply = replenished
            .saturating_sub(u128::from(consumed))
            .clamp(u128::from(MIN_RESOURCE_SUPPLY), u128::from(ceiling));
        let new_supply = to_u64(new_supply, "resource supply exceeds u64")?;

        let reserve = ceil_div(self.pool_constant(), u128::from(new_supply))
            .ok_or(EconomicsError::ArithmeticOverflow("reserve denominator"))?;
        let rc_reserve = u64::try_from(reserve).unwrap_or_else(|_| {
            log::warn!(
                "rc reserve saturated at supply {} (pool constant {})",
                new_supply,
                self.pool_constant()
            );
            u64::MAX
        });

        log::debug!(
            "market advanced: supply {} -> {} (decayed {}, printed {}, consumed {})",
            self.resource_supply,
            new_supply,
            decayed,
            print_rate,
            consumed
        );

        Ok(Self {
            resource_supply: new_supply,
            rc_reserve,
            block_budget: self.block_budget,
            block_limit: self.block_limit,
        })
    }

    /// Advance in place; the market is untouched on failure
    pub fn advance_block(&mut self, consumed: u64, params: &SystemResourceParameters) -> Result<()> {
        *self = self.next_block(consumed, params)?;
        Ok(())
    }

    /// Replace budget and limit together, leaving supply alone
    pub fn set_parameters(&mut self, block_budget: u64, block_limit: u64) -> Result<()> {
        if block_budget > block_limit {
            return Err(EconomicsError::InvalidRequest(format!(
                "block_budget {} exceeds block_limit {}",
                block_budget, block_limit
            )));
        }
        self.block_budget = block_budget;
        self.block_limit = block_limit;
        Ok(())
    }
}
