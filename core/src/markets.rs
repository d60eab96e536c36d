//! The three markets as one stored record
//!
//! Disk, network and compute markets are persisted together with the open
//! block's pending consumption, so settlement replaces a single record and
//! cannot leave one market advanced without the others.

use economics::{EconomicsError, MarketLimit, ResourceKind, ResourceMarket};
use serde::{Deserialize, Serialize};

/// Per-resource consumption totals for one block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockConsumption {
    pub disk_storage: u64,
    pub network_bandwidth: u64,
    pub compute_bandwidth: u64,
}

impl BlockConsumption {
    pub fn new(disk_storage: u64, network_bandwidth: u64, compute_bandwidth: u64) -> Self {
        Self {
            disk_storage,
            network_bandwidth,
            compute_bandwidth,
        }
    }

    pub fn get(&self, kind: ResourceKind) -> u64 {
        match kind {
            ResourceKind::DiskStorage => self.disk_storage,
            ResourceKind::NetworkBandwidth => self.network_bandwidth,
            ResourceKind::ComputeBandwidth => self.compute_bandwidth,
        }
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut u64 {
        match kind {
            ResourceKind::DiskStorage => &mut self.disk_storage,
            ResourceKind::NetworkBandwidth => &mut self.network_bandwidth,
            ResourceKind::ComputeBandwidth => &mut self.compute_bandwidth,
        }
    }

    pub fn is_empty(&self) -> bool {
        ResourceKind::ALL.iter().all(|kind| self.get(*kind) == 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMarkets {
    pub disk_storage: ResourceMarket,
    pub network_bandwidth: ResourceMarket,
    pub compute_bandwidth: ResourceMarket,

    /// Consumption charged since the last settlement
    pub pending: BlockConsumption,

    /// Clock reading at the last settlement
    pub last_settlement_ms: u64,
}

impl ResourceMarkets {
    pub fn new(
        disk_storage: ResourceMarket,
        network_bandwidth: ResourceMarket,
        compute_bandwidth: ResourceMarket,
    ) -> Self {
        Self {
            disk_storage,
            network_bandwidth,
            compute_bandwidth,
            pending: BlockConsumption::default(),
            last_settlement_ms: 0,
        }
    }

    pub fn get(&self, kind: ResourceKind) -> &ResourceMarket {
        match kind {
            ResourceKind::DiskStorage => &self.disk_storage,
            ResourceKind::NetworkBandwidth => &self.network_bandwidth,
            ResourceKind::ComputeBandwidth => &self.compute_bandwidth,
        }
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut ResourceMarket {
        match kind {
            ResourceKind::DiskStorage => &mut self.disk_storage,
            ResourceKind::NetworkBandwidth => &mut self.network_bandwidth,
            ResourceKind::ComputeBandwidth => &mut self.compute_bandwidth,
        }
    }

    pub fn validate(&self) -> Result<(), EconomicsError> {
        for kind in ResourceKind::ALL {
            self.get(kind).validate()?;
        }
        Ok(())
    }

    /// Per-market admission limits and unit costs for the open block
    pub fn limits(&self) -> Result<ResourceLimits, EconomicsError> {
        Ok(ResourceLimits {
            disk_storage: self.disk_storage.limit_quote()?,
            network_bandwidth: self.network_bandwidth.limit_quote()?,
            compute_bandwidth: self.compute_bandwidth.limit_quote()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLimits {
    pub disk_storage: MarketLimit,
    pub network_bandwidth: MarketLimit,
    pub compute_bandwidth: MarketLimit,
}

impl ResourceLimits {
    pub fn get(&self, kind: ResourceKind) -> MarketLimit {
        match kind {
            ResourceKind::DiskStorage => self.disk_storage,
            ResourceKind::NetworkBandwidth => self.network_bandwidth,
            ResourceKind::ComputeBandwidth => self.compute_bandwidth,
        }
    }
}

/// Governance update of one market's budget and limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketParameters {
    pub block_budget: u64,
    pub block_limit: u64,
}

/// Governance update of any subset of the markets, applied together
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketsParameters {
    pub disk_storage: Option<MarketParameters>,
    pub network_bandwidth: Option<MarketParameters>,
    pub compute_bandwidth: Option<MarketParameters>,
}

impl MarketsParameters {
    pub fn single(kind: ResourceKind, parameters: MarketParameters) -> Self {
        let mut update = Self::default();
        match kind {
            ResourceKind::DiskStorage => update.disk_storage = Some(parameters),
            ResourceKind::NetworkBandwidth => update.network_bandwidth = Some(parameters),
            ResourceKind::ComputeBandwidth => update.compute_bandwidth = Some(parameters),
        }
        update
    }

    pub fn get(&self, kind: ResourceKind) -> Option<MarketParameters> {
        match kind {
            ResourceKind::DiskStorage => self.disk_storage,
            ResourceKind::NetworkBandwidth => self.network_bandwidth,
            ResourceKind::ComputeBandwidth => self.compute_bandwidth,
        }
    }

    /// Apply to a copy of `markets`; nothing changes unless every entry is valid
    pub fn apply(&self, markets: &ResourceMarkets) -> Result<ResourceMarkets, EconomicsError> {
        let mut updated = markets.clone();
        for kind in ResourceKind::ALL {
            if let Some(parameters) = self.get(kind) {
                updated
                    .get_mut(kind)
                    .set_parameters(parameters.block_budget, parameters.block_limit)?;
            }
        }
        Ok(updated)
    }
}
