//! Fixed-point decay math
//!
//! Decay constants are fractions in base 2^64. All products of supply, rate
//! and time quantities are formed in 128 bits and range-checked before they are
//! narrowed back to `u64`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::FIXED_POINT_ONE;
use crate::error::{EconomicsError, Result};

/// Per-block multiplicative decay, a fraction of [`FIXED_POINT_ONE`].
///
/// Always `<= 2^64`, so applying it never grows a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u128", into = "u128")]
pub struct DecayConstant(u128);

impl DecayConstant {
    /// No decay at all (2^64)
    pub const NONE: DecayConstant = DecayConstant(FIXED_POINT_ONE);

    pub fn new(raw: u128) -> Result<Self> {
        if raw > FIXED_POINT_ONE {
            return Err(EconomicsError::InvalidParameters(format!(
                "decay constant {} exceeds 2^64",
                raw
            )));
        }
        Ok(Self(raw))
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    /// The 2^64 complement, `2^64 - self`
    pub fn complement(&self) -> u128 {
        FIXED_POINT_ONE - self.0
    }
}

impl Default for DecayConstant {
    fn default() -> Self {
        Self(crate::constants::DECAY_CONSTANT)
    }
}

impl TryFrom<u128> for DecayConstant {
    type Error = EconomicsError;

    fn try_from(raw: u128) -> Result<Self> {
        Self::new(raw)
    }
}

impl From<DecayConstant> for u128 {
    fn from(constant: DecayConstant) -> u128 {
        constant.0
    }
}

impl fmt::Display for DecayConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Apply one block of decay: `(old_supply * decay_constant) >> 64`.
///
/// `u64::MAX * 2^64` still fits in 128 bits, so the product cannot overflow
/// and the result never exceeds `old_supply`.
pub fn decay(old_supply: u64, decay_constant: DecayConstant) -> u64 {
    let decayed = (u128::from(old_supply) * decay_constant.raw()) >> 64;
    decayed as u64
}

/// `ceil(numerator / denominator)`, `None` on a zero denominator
pub fn ceil_div(numerator: u128, denominator: u128) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let quotient = numerator / denominator;
    if numerator % denominator == 0 {
        Some(quotient)
    } else {
        Some(quotient + 1)
    }
}

/// Narrow a 128-bit intermediate, failing instead of truncating
pub fn to_u64(value: u128, context: &'static str) -> Result<u64> {
    u64::try_from(value).map_err(|_| EconomicsError::ArithmeticOverflow(context))
}

/// `a * b` in 128 bits, failing on overflow
pub fn checked_mul(a: u128, b: u128, context: &'static str) -> Result<u128> {
    a.checked_mul(b)
        .ok_or(EconomicsError::ArithmeticOverflow(context))
}
