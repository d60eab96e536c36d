//! Block settlement
//!
//! Every market is validated against its limit before any is advanced, and the
//! advanced markets are returned as a new record. The caller persists that
//! record in one write, so a failure anywhere leaves all three markets as they
//! were.

use economics::{ResourceKind, SystemResourceParameters};

use crate::error::{ResourceError, Result};
use crate::markets::{BlockConsumption, ResourceMarkets};

/// Reject consumption above any market's block limit, naming the first offender
pub fn check_block_limits(markets: &ResourceMarkets, consumption: &BlockConsumption) -> Result<()> {
    for kind in ResourceKind::ALL {
        let consumed = consumption.get(kind);
        let limit = markets.get(kind).block_limit();
        if consumed > limit {
            log::warn!(
                "rejecting settlement: {} consumed {} over block limit {}",
                kind,
                consumed,
                limit
            );
            return Err(ResourceError::BlockLimitExceeded {
                resource: kind,
                consumed,
                limit,
            });
        }
    }
    Ok(())
}

/// Markets after settling `consumption` at `now`, with pending totals cleared
pub fn settle(
    markets: &ResourceMarkets,
    consumption: &BlockConsumption,
    params: &SystemResourceParameters,
    now: u64,
) -> Result<ResourceMarkets> {
    if now < markets.last_settlement_ms {
        log::error!(
            "clock regression: settlement at {} before previous settlement at {}",
            now,
            markets.last_settlement_ms
        );
        return Err(ResourceError::ClockRegression {
            last_settlement_ms: markets.last_settlement_ms,
            now,
        });
    }
    check_block_limits(markets, consumption)?;

    let mut settled = markets.clone();
    for kind in ResourceKind::ALL {
        *settled.get_mut(kind) = markets.get(kind).next_block(consumption.get(kind), params)?;
    }
    settled.pending = BlockConsumption::default();
    settled.last_settlement_ms = now;
    Ok(settled)
}
