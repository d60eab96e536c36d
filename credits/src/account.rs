//! Per-account resource credit records

use serde::{Deserialize, Serialize};

use crate::error::{CreditError, Result};

/// Linear regeneration of mana toward the balance ceiling.
///
/// `new_mana = min(mana + balance * elapsed / rc_regen_ms, balance)`, with the
/// product formed in 128 bits. `now < last_update_time` is a clock regression
/// and is reported rather than treated as zero elapsed time.
pub fn regenerate(
    balance: u64,
    mana: u64,
    last_update_time: u64,
    now: u64,
    rc_regen_ms: u64,
) -> Result<u64> {
    check_clock(last_update_time, now)?;
    if rc_regen_ms == 0 {
        return Err(CreditError::InvalidRegenWindow(rc_regen_ms));
    }

    let elapsed = now - last_update_time;
    if elapsed == 0 {
        return Ok(mana);
    }

    let regen = u128::from(balance) * u128::from(elapsed) / u128::from(rc_regen_ms);
    let regenerated = (u128::from(mana) + regen).min(u128::from(balance));
    Ok(regenerated as u64)
}

fn check_clock(last_update_time: u64, now: u64) -> Result<()> {
    if now < last_update_time {
        log::error!(
            "clock regression: now {} is before last update {}",
            now,
            last_update_time
        );
        return Err(CreditError::ClockRegression {
            last_update_time,
            now,
        });
    }
    Ok(())
}

/// Spendable capacity of one account.
///
/// Invariant: `mana <= token_balance` unless `unlimited` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResourceCredit {
    pub token_balance: u64,
    pub mana: u64,
    pub last_update_time: u64,
    /// Governance and system accounts bypass regeneration and the balance ceiling
    pub unlimited: bool,
}

impl AccountResourceCredit {
    /// A freshly touched account starts with full mana
    pub fn new(token_balance: u64, now: u64) -> Self {
        Self {
            token_balance,
            mana: token_balance,
            last_update_time: now,
            unlimited: false,
        }
    }

    pub fn unlimited(token_balance: u64, now: u64) -> Self {
        Self {
            unlimited: true,
            ..Self::new(token_balance, now)
        }
    }

    /// Mana available to spend
    pub fn available(&self) -> u64 {
        if self.unlimited {
            u64::MAX
        } else {
            self.mana
        }
    }

    /// Bring the record forward to `now`
    pub fn regenerate_to(&mut self, now: u64, rc_regen_ms: u64) -> Result<()> {
        check_clock(self.last_update_time, now)?;
        if !self.unlimited {
            self.mana = regenerate(
                self.token_balance,
                self.mana,
                self.last_update_time,
                now,
                rc_regen_ms,
            )?;
        }
        self.last_update_time = now;
        Ok(())
    }

    /// Spend `amount`; the record is untouched on failure
    pub fn debit(&mut self, amount: u64) -> Result<()> {
        if self.unlimited {
            return Ok(());
        }
        if self.mana < amount {
            return Err(CreditError::InsufficientMana {
                required: amount,
                available: self.mana,
            });
        }
        self.mana -= amount;
        Ok(())
    }

    /// Mirror a new token balance. Lowers mana to the new ceiling but never
    /// raises it; capacity only fills through regeneration.
    pub fn set_balance(&mut self, new_balance: u64) {
        self.token_balance = new_balance;
        if !self.unlimited {
            self.mana = self.mana.min(new_balance);
        }
    }

    /// Set or clear the unlimited flag, re-clamping mana when cleared
    pub fn set_unlimited(&mut self, unlimited: bool) {
        self.unlimited = unlimited;
        if !unlimited {
            self.mana = self.mana.min(self.token_balance);
        }
    }
}
