//! Resource credit ledger
//!
//! Reads account records from the object store and stages their updates into a
//! [`WriteBatch`], so a caller can commit a debit together with other writes.
//! Regeneration is always applied before any check. Reads recompute it without
//! writing; the record at rest is brought forward on the next mutation.

use std::collections::BTreeSet;

use rc_storage::{ObjectSpace, ObjectStore, WriteBatch};

use crate::account::AccountResourceCredit;
use crate::error::{CreditError, Result};
use crate::AccountId;

/// Source of the token balance an account's mana is bounded by
pub trait BalanceOracle {
    fn balance_of(&self, account: &str) -> u64;
}

impl<T: BalanceOracle + ?Sized> BalanceOracle for &T {
    fn balance_of(&self, account: &str) -> u64 {
        (**self).balance_of(account)
    }
}

pub struct CreditLedger<'a, S, B> {
    store: &'a S,
    balances: &'a B,
    space: &'a ObjectSpace,
    rc_regen_ms: u64,
    unlimited_accounts: Option<&'a BTreeSet<AccountId>>,
}

impl<'a, S: ObjectStore, B: BalanceOracle> CreditLedger<'a, S, B> {
    pub fn new(store: &'a S, balances: &'a B, space: &'a ObjectSpace, rc_regen_ms: u64) -> Self {
        Self {
            store,
            balances,
            space,
            rc_regen_ms,
            unlimited_accounts: None,
        }
    }

    /// Accounts that are always unlimited, whether or not already stored
    pub fn with_unlimited_accounts(mut self, accounts: &'a BTreeSet<AccountId>) -> Self {
        self.unlimited_accounts = Some(accounts);
        self
    }

    /// The stored record, as of its last mutation
    pub fn load(&self, account: &str) -> Result<Option<AccountResourceCredit>> {
        Ok(self.store.get_object(self.space, account.as_bytes())?)
    }

    fn configured_unlimited(&self, account: &str) -> bool {
        self.unlimited_accounts
            .map_or(false, |accounts| accounts.contains(account))
    }

    fn open(&self, account: &str, now: u64) -> AccountResourceCredit {
        let balance = self.balances.balance_of(account);

        log::debug!("opening resource credit for {} with balance {}", account, balance);
        if self.configured_unlimited(account) {
            AccountResourceCredit::unlimited(balance, now)
        } else {
            AccountResourceCredit::new(balance, now)
        }
    }

    /// The record regenerated to `now`, created if the account was never touched.
    /// Configured unlimited accounts are unlimited even if stored before they
    /// were configured.
    pub fn current(&self, account: &str, now: u64) -> Result<AccountResourceCredit> {
        match self.load(account)? {
            Some(mut credit) => {
                credit.regenerate_to(now, self.rc_regen_ms)?;
                if !credit.unlimited && self.configured_unlimited(account) {
                    log::debug!("{} is configured unlimited, lifting stored limit", account);
                    credit.set_unlimited(true);
                }
                Ok(credit)
            }
            None => Ok(self.open(account, now)),
        }
    }

    /// Current spendable mana
    pub fn get_rc(&self, account: &str, now: u64) -> Result<u64> {
        Ok(self.current(account, now)?.available())
    }

    /// Regenerate, then debit `amount`. Nothing is staged on failure.
    pub fn consume(
        &self,
        batch: &mut WriteBatch,
        account: &str,
        amount: u64,
        now: u64,
    ) -> Result<AccountResourceCredit> {
        let mut credit = self.current(account, now)?;
        credit.debit(amount)?;
        self.stage(batch, account, &credit)?;

        log::debug!("consumed {} rc from {}, {} remaining", amount, account, credit.mana);
        Ok(credit)
    }

    /// Regenerate under the old balance, then mirror `new_balance`
    pub fn on_balance_changed(
        &self,
        batch: &mut WriteBatch,
        account: &str,
        new_balance: u64,
        now: u64,
    ) -> Result<AccountResourceCredit> {
        let mut credit = self.current(account, now)?;
        credit.set_balance(new_balance);
        self.stage(batch, account, &credit)?;
        Ok(credit)
    }

    pub fn set_unlimited(
        &self,
        batch: &mut WriteBatch,
        account: &str,
        unlimited: bool,
        now: u64,
    ) -> Result<AccountResourceCredit> {
        if !unlimited && self.configured_unlimited(account) {
            return Err(CreditError::ConfiguredUnlimited(account.to_string()));
        }
        let mut credit = self.current(account, now)?;
        credit.set_unlimited(unlimited);
        self.stage(batch, account, &credit)?;
        Ok(credit)
    }

    fn stage(&self, batch: &mut WriteBatch, account: &str, credit: &AccountResourceCredit) -> Result<()> {
        batch.put_object(self.space, account.as_bytes(), credit)?;
        Ok(())
    }
}
