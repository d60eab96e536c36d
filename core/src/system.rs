//! Resource system entry points
//!
//! [`ResourceSystem`] owns the object store, clock and balance oracle handed in
//! by the host. Each mutating entry point checks the caller's capability, stages
//! every write into one [`WriteBatch`] and commits it once, so a failed call
//! leaves storage untouched. Market and parameter records that were never
//! written read as their configured genesis values.

use credits::{AccountId, AccountResourceCredit, CreditLedger};
use economics::{EconomicsError, ResourceKind, ResourceMarket, SystemResourceParameters};
use rc_storage::{ObjectStore, WriteBatch};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::capability::Capability;
use crate::config::{StorageLayout, SystemConfig, MARKETS_KEY, PARAMETERS_KEY};
use crate::error::{ResourceError, Result};
use crate::host::{BalanceOracle, Clock};
use crate::markets::{BlockConsumption, MarketsParameters, ResourceLimits, ResourceMarkets};
use crate::settlement;

/// Outcome of a successful charge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeReceipt {
    pub account: AccountId,
    pub resource: ResourceKind,
    pub amount: u64,
    /// RC debited for `amount`
    pub cost: u64,
    pub credit: AccountResourceCredit,
    /// Pending consumption of `resource` after this charge
    pub pending: u64,
}

pub struct ResourceSystem<S, C, B> {
    store: S,
    clock: C,
    balances: B,
    layout: StorageLayout,
    genesis_parameters: SystemResourceParameters,
    genesis_markets: ResourceMarkets,
    unlimited_accounts: BTreeSet<AccountId>,
}

impl<S: ObjectStore, C: Clock, B: BalanceOracle> ResourceSystem<S, C, B> {
    pub fn new(config: &SystemConfig, store: S, clock: C, balances: B) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            clock,
            balances,
            layout: config.storage_layout(),
            genesis_parameters: config.resource_parameters()?,
            genesis_markets: config.genesis_markets()?,
            unlimited_accounts: config.unlimited_set(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn balances(&self) -> &B {
        &self.balances
    }

    pub fn balances_mut(&mut self) -> &mut B {
        &mut self.balances
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // Parameters

    pub fn resource_parameters(&self) -> Result<SystemResourceParameters> {
        match self
            .store
            .get_object::<SystemResourceParameters>(&self.layout.parameters, PARAMETERS_KEY)?
        {
            Some(params) => {
                params.validate()?;
                Ok(params)
            }
            None => Ok(self.genesis_parameters.clone()),
        }
    }

    /// Replace the global parameters wholesale
    pub fn set_resource_parameters(
        &mut self,
        capability: &Capability,
        params: SystemResourceParameters,
    ) -> Result<()> {
        capability.require_system_authority("set_resource_parameters")?;
        params.validate()?;

        let mut batch = WriteBatch::new();
        batch.put_object(&self.layout.parameters, PARAMETERS_KEY, &params)?;
        self.store.commit(batch)?;

        log::info!(
            "resource parameters updated: regen {} ms, decay {}, premium {}/{}",
            params.rc_regen_ms,
            params.decay_constant(),
            params.print_rate_premium,
            params.print_rate_precision
        );
        Ok(())
    }

    // Markets

    pub fn resource_markets(&self) -> Result<ResourceMarkets> {
        match self
            .store
            .get_object::<ResourceMarkets>(&self.layout.markets, MARKETS_KEY)?
        {
            Some(markets) => {
                markets.validate()?;
                Ok(markets)
            }
            None => Ok(self.genesis_markets.clone()),
        }
    }

    pub fn market(&self, kind: ResourceKind) -> Result<ResourceMarket> {
        Ok(self.resource_markets()?.get(kind).clone())
    }

    pub fn resource_limits(&self) -> Result<ResourceLimits> {
        Ok(self.resource_markets()?.limits()?)
    }

    pub fn pending_consumption(&self) -> Result<BlockConsumption> {
        Ok(self.resource_markets()?.pending)
    }

    /// Replace budget and limit of the named markets; supply is never touched
    pub fn set_resource_markets_parameters(
        &mut self,
        capability: &Capability,
        update: MarketsParameters,
    ) -> Result<ResourceMarkets> {
        capability.require_system_authority("set_resource_markets_parameters")?;
        let params = self.resource_parameters()?;
        let markets = update.apply(&self.resource_markets()?)?;

        // An accepted budget must leave the market able to settle
        for kind in ResourceKind::ALL {
            if let Some(parameters) = update.get(kind) {
                markets.get(kind).next_block(0, &params).map_err(|e| {
                    EconomicsError::InvalidRequest(format!(
                        "{} budget {} cannot be settled: {}",
                        kind, parameters.block_budget, e
                    ))
                })?;
            }
        }

        let mut batch = WriteBatch::new();
        batch.put_object(&self.layout.markets, MARKETS_KEY, &markets)?;
        self.store.commit(batch)?;

        for kind in ResourceKind::ALL {
            if let Some(parameters) = update.get(kind) {
                log::info!(
                    "{} market: budget {}, limit {}",
                    kind,
                    parameters.block_budget,
                    parameters.block_limit
                );
            }
        }
        Ok(markets)
    }

    // Resource credits

    fn ledger(&self, params: &SystemResourceParameters) -> CreditLedger<'_, S, B> {
        CreditLedger::new(
            &self.store,
            &self.balances,
            &self.layout.credits,
            params.rc_regen_ms,
        )
        .with_unlimited_accounts(&self.unlimited_accounts)
    }

    /// Spendable RC as of now
    pub fn account_rc(&self, account: &str) -> Result<u64> {
        let params = self.resource_parameters()?;
        Ok(self.ledger(&params).get_rc(account, self.clock.current_time_ms())?)
    }

    /// The account's credit record regenerated to now
    pub fn account_credit(&self, account: &str) -> Result<AccountResourceCredit> {
        let params = self.resource_parameters()?;
        Ok(self.ledger(&params).current(account, self.clock.current_time_ms())?)
    }

    /// Debit RC directly, without touching any market
    pub fn consume_account_rc(
        &mut self,
        capability: &Capability,
        account: &str,
        amount: u64,
    ) -> Result<AccountResourceCredit> {
        capability.require_spender(account, "consume_account_rc")?;
        let params = self.resource_parameters()?;
        let now = self.clock.current_time_ms();

        let mut batch = WriteBatch::new();
        let credit = self.ledger(&params).consume(&mut batch, account, amount, now)?;
        self.store.commit(batch)?;
        Ok(credit)
    }

    /// Price `amount` of `kind`, pay for it from the account's RC and record it
    /// against the open block
    pub fn charge(
        &mut self,
        capability: &Capability,
        account: &str,
        kind: ResourceKind,
        amount: u64,
    ) -> Result<ChargeReceipt> {
        capability.require_spender(account, "charge")?;
        let params = self.resource_parameters()?;
        let mut markets = self.resource_markets()?;
        let now = self.clock.current_time_ms();

        let market = markets.get(kind);
        let pending = markets
            .pending
            .get(kind)
            .checked_add(amount)
            .ok_or(EconomicsError::ArithmeticOverflow("pending consumption"))?;
        if pending > market.block_limit() {
            log::warn!(
                "rejecting charge to {}: {} pending {} over block limit {}",
                account,
                kind,
                pending,
                market.block_limit()
            );
            return Err(ResourceError::BlockLimitExceeded {
                resource: kind,
                consumed: pending,
                limit: market.block_limit(),
            });
        }
        let cost = market.price(amount)?;

        let mut batch = WriteBatch::new();
        let credit = self.ledger(&params).consume(&mut batch, account, cost, now)?;
        *markets.pending.get_mut(kind) = pending;
        batch.put_object(&self.layout.markets, MARKETS_KEY, &markets)?;
        self.store.commit(batch)?;

        log::debug!(
            "charged {} {} rc for {} {} ({} pending)",
            account,
            cost,
            amount,
            kind,
            pending
        );
        Ok(ChargeReceipt {
            account: account.to_string(),
            resource: kind,
            amount,
            cost,
            credit,
            pending,
        })
    }

    /// Mirror an external token balance change into the account's credit record
    pub fn on_balance_changed(
        &mut self,
        capability: &Capability,
        account: &str,
        new_balance: u64,
    ) -> Result<AccountResourceCredit> {
        capability.require_kernel("on_balance_changed")?;
        let params = self.resource_parameters()?;
        let now = self.clock.current_time_ms();

        let mut batch = WriteBatch::new();
        let credit = self
            .ledger(&params)
            .on_balance_changed(&mut batch, account, new_balance, now)?;
        self.store.commit(batch)?;
        Ok(credit)
    }

    pub fn set_account_unlimited(
        &mut self,
        capability: &Capability,
        account: &str,
        unlimited: bool,
    ) -> Result<AccountResourceCredit> {
        capability.require_system_authority("set_account_unlimited")?;
        let params = self.resource_parameters()?;
        let now = self.clock.current_time_ms();

        let mut batch = WriteBatch::new();
        let credit = self
            .ledger(&params)
            .set_unlimited(&mut batch, account, unlimited, now)?;
        self.store.commit(batch)?;

        log::info!("{} unlimited mana: {}", account, unlimited);
        Ok(credit)
    }

    // Settlement

    /// Advance all three markets by one block, or none of them
    pub fn settle_block(
        &mut self,
        capability: &Capability,
        consumption: BlockConsumption,
    ) -> Result<ResourceMarkets> {
        capability.require_kernel("settle_block")?;
        let params = self.resource_parameters()?;
        let markets = self.resource_markets()?;
        let now = self.clock.current_time_ms();

        let settled = settlement::settle(&markets, &consumption, &params, now)?;

        let mut batch = WriteBatch::new();
        batch.put_object(&self.layout.markets, MARKETS_KEY, &settled)?;
        self.store.commit(batch)?;

        log::info!(
            "settled block at {}: disk {}, network {}, compute {}",
            now,
            consumption.disk_storage,
            consumption.network_bandwidth,
            consumption.compute_bandwidth
        );
        Ok(settled)
    }

    /// Settle whatever `charge` recorded since the last settlement
    pub fn settle_pending_block(&mut self, capability: &Capability) -> Result<ResourceMarkets> {
        capability.require_kernel("settle_pending_block")?;
        let pending = self.pending_consumption()?;
        self.settle_block(capability, pending)
    }
}
