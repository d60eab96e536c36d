//! Host-provided collaborators: the clock and the token balance oracle

use chrono::Utc;
use credits::AccountId;
use std::cell::Cell;
use std::collections::BTreeMap;

pub use credits::BalanceOracle;

pub trait Clock {
    /// Milliseconds, non-decreasing across calls within a chain of blocks
    fn current_time_ms(&self) -> u64;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn current_time_ms(&self) -> u64 {
        (**self).current_time_ms()
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_time_ms(&self) -> u64 {
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// Clock driven by the caller, for simulation and tests
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(now: u64) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn set(&self, now: u64) {
        self.now.set(now);
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }
}

impl Clock for ManualClock {
    fn current_time_ms(&self) -> u64 {
        self.now.get()
    }
}

/// In-memory balance table; unknown accounts hold nothing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedBalances {
    balances: BTreeMap<AccountId, u64>,
}

impl FixedBalances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, account: impl Into<AccountId>, balance: u64) -> Self {
        self.set(account, balance);
        self
    }

    pub fn set(&mut self, account: impl Into<AccountId>, balance: u64) {
        self.balances.insert(account.into(), balance);
    }
}

impl BalanceOracle for FixedBalances {
    fn balance_of(&self, account: &str) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }
}
