//! System resource parameters
//!
//! A single governance-controlled record read by every market update.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{EconomicsError, Result};
use crate::fixed_point::{checked_mul, to_u64, DecayConstant};

/// Global parameters of the resource economy.
///
/// The decay constant and its 2^64 complement are private so they can only
/// change together through [`SystemResourceParameters::set_decay_constant`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemResourceParameters {
    /// Target block interval
    pub block_interval_ms: u64,

    /// Time for mana to regenerate from empty to full
    pub rc_regen_ms: u64,

    decay_constant: DecayConstant,

    one_minus_decay_constant: u128,

    /// Mint per block is `block_budget * print_rate_premium / print_rate_precision`
    pub print_rate_premium: u64,

    pub print_rate_precision: u64,

    /// Supply never grows above `block_budget * supply_ceiling_blocks`
    pub supply_ceiling_blocks: u64,
}

impl SystemResourceParameters {
    pub fn new(
        block_interval_ms: u64,
        rc_regen_ms: u64,
        decay_constant: DecayConstant,
        print_rate_premium: u64,
        print_rate_precision: u64,
        supply_ceiling_blocks: u64,
    ) -> Result<Self> {
        let params = Self {
            block_interval_ms,
            rc_regen_ms,
            decay_constant,
            one_minus_decay_constant: decay_constant.complement(),
            print_rate_premium,
            print_rate_precision,
            supply_ceiling_blocks,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn decay_constant(&self) -> DecayConstant {
        self.decay_constant
    }

    pub fn one_minus_decay_constant(&self) -> u128 {
        self.one_minus_decay_constant
    }

    /// Replace the decay constant, recomputing its complement
    pub fn set_decay_constant(&mut self, decay_constant: DecayConstant) {
        self.decay_constant = decay_constant;
        self.one_minus_decay_constant = decay_constant.complement();
    }

    /// Check every field, including records that arrived through deserialization
    pub fn validate(&self) -> Result<()> {
        if self.one_minus_decay_constant != self.decay_constant.complement() {
            return Err(EconomicsError::InvalidParameters(format!(
                "one_minus_decay_constant {} is not the complement of {}",
                self.one_minus_decay_constant, self.decay_constant
            )));
        }
        if self.block_interval_ms == 0 {
            return Err(EconomicsError::InvalidParameters(
                "block_interval_ms must be positive".to_string(),
            ));
        }
        if self.rc_regen_ms == 0 {
            return Err(EconomicsError::InvalidParameters(
                "rc_regen_ms must be positive".to_string(),
            ));
        }
        if self.print_rate_precision == 0 {
            return Err(EconomicsError::InvalidParameters(
                "print_rate_precision must be positive".to_string(),
            ));
        }
        if self.supply_ceiling_blocks == 0 {
            return Err(EconomicsError::InvalidParameters(
                "supply_ceiling_blocks must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Supply minted into a market each block
    pub fn print_rate(&self, block_budget: u64) -> Result<u64> {
        if self.print_rate_precision == 0 {
            return Err(EconomicsError::InvalidParameters(
                "print_rate_precision must be positive".to_string(),
            ));
        }
        let scaled = u128::from(block_budget) * u128::from(self.print_rate_premium);
        to_u64(
            scaled / u128::from(self.print_rate_precision),
            "print rate exceeds u64",
        )
    }

    /// Upper bound on a market's supply
    pub fn supply_ceiling(&self, block_budget: u64) -> Result<u64> {
        let ceiling = checked_mul(
            u128::from(block_budget),
            u128::from(self.supply_ceiling_blocks),
            "supply ceiling",
        )?;
        to_u64(ceiling, "supply ceiling exceeds u64")
    }
}

impl Default for SystemResourceParameters {
    fn default() -> Self {
        let decay_constant = DecayConstant::default();
        Self {
            block_interval_ms: constants::BLOCK_INTERVAL_MS,
            rc_regen_ms: constants::RC_REGEN_MS,
            decay_constant,
            one_minus_decay_constant: decay_constant.complement(),
            print_rate_premium: constants::PRINT_RATE_PREMIUM,
            print_rate_precision: constants::PRINT_RATE_PRECISION,
            supply_ceiling_blocks: constants::SUPPLY_CEILING_BLOCKS,
        }
    }
}
