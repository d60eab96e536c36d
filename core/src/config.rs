//! Resource system configuration (TOML)
//!
//! Every field defaults to the genesis constants, so an empty file is a valid
//! configuration:
//!
//! ```toml
//! contract_id = "resources"
//! unlimited_accounts = ["governance"]
//!
//! [parameters]
//! rc_regen_ms = 432000000
//! decay_constant = "18446532661087609961"
//!
//! [markets.network_bandwidth]
//! block_budget = 262144
//! block_limit = 1048576
//! ```

use credits::AccountId;
use economics::constants::*;
use economics::{DecayConstant, ResourceKind, ResourceMarket, SystemResourceParameters};
use rc_storage::ObjectSpace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::markets::ResourceMarkets;

/// Key of the markets record inside its space
pub const MARKETS_KEY: &[u8] = b"markets";

/// Key of the parameters record inside its space
pub const PARAMETERS_KEY: &[u8] = b"parameters";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    fn invalid(field: impl Into<String>, message: impl ToString) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Zone of every object space the system writes
    pub contract_id: String,

    /// Accounts whose credit records carry the unlimited flag from first touch
    pub unlimited_accounts: Vec<AccountId>,

    pub parameters: ParametersConfig,

    pub markets: MarketsConfig,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            contract_id: "resources".to_string(),
            unlimited_accounts: Vec::new(),
            parameters: ParametersConfig::default(),
            markets: MarketsConfig::default(),
        }
    }
}

impl SystemConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: SystemConfig =
            toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.contract_id.trim().is_empty() {
            return Err(ConfigError::invalid("contract_id", "must not be empty"));
        }
        self.resource_parameters()?;
        self.genesis_markets()?;
        Ok(())
    }

    pub fn resource_parameters(&self) -> Result<SystemResourceParameters, ConfigError> {
        self.parameters.build()
    }

    /// Markets as they stand before the first block
    pub fn genesis_markets(&self) -> Result<ResourceMarkets, ConfigError> {
        Ok(ResourceMarkets::new(
            self.markets.disk_storage.build(ResourceKind::DiskStorage)?,
            self.markets.network_bandwidth.build(ResourceKind::NetworkBandwidth)?,
            self.markets.compute_bandwidth.build(ResourceKind::ComputeBandwidth)?,
        ))
    }

    pub fn storage_layout(&self) -> StorageLayout {
        StorageLayout::new(&self.contract_id)
    }

    pub fn unlimited_set(&self) -> BTreeSet<AccountId> {
        self.unlimited_accounts.iter().cloned().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParametersConfig {
    pub block_interval_ms: u64,
    pub rc_regen_ms: u64,
    /// Decimal string; TOML integers stop at i64
    pub decay_constant: String,
    pub print_rate_premium: u64,
    pub print_rate_precision: u64,
    pub supply_ceiling_blocks: u64,
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            block_interval_ms: BLOCK_INTERVAL_MS,
            rc_regen_ms: RC_REGEN_MS,
            decay_constant: DECAY_CONSTANT.to_string(),
            print_rate_premium: PRINT_RATE_PREMIUM,
            print_rate_precision: PRINT_RATE_PRECISION,
            supply_ceiling_blocks: SUPPLY_CEILING_BLOCKS,
        }
    }
}

impl ParametersConfig {
    fn build(&self) -> Result<SystemResourceParameters, ConfigError> {
        let raw: u128 = self
            .decay_constant
            .trim()
            .parse()
            .map_err(|e| ConfigError::invalid("parameters.decay_constant", e))?;
        let decay_constant = DecayConstant::new(raw)
            .map_err(|e| ConfigError::invalid("parameters.decay_constant", e))?;

        SystemResourceParameters::new(
            self.block_interval_ms,
            self.rc_regen_ms,
            decay_constant,
            self.print_rate_premium,
            self.print_rate_precision,
            self.supply_ceiling_blocks,
        )
        .map_err(|e| ConfigError::invalid("parameters", e))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketsConfig {
    pub disk_storage: MarketConfig,
    pub network_bandwidth: MarketConfig,
    pub compute_bandwidth: MarketConfig,
}

/// Overrides for one market; unset fields take that market's genesis default
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_supply: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_budget: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_cost: Option<u64>,
}

fn default_budget_and_limit(kind: ResourceKind) -> (u64, u64) {
    match kind {
        ResourceKind::DiskStorage => (DISK_BUDGET_PER_BLOCK, MAX_DISK_PER_BLOCK),
        ResourceKind::NetworkBandwidth => (NETWORK_BUDGET_PER_BLOCK, MAX_NETWORK_PER_BLOCK),
        ResourceKind::ComputeBandwidth => (COMPUTE_BUDGET_PER_BLOCK, MAX_COMPUTE_PER_BLOCK),
    }
}

impl MarketConfig {
    pub fn build(&self, kind: ResourceKind) -> Result<ResourceMarket, ConfigError> {
        let field = format!("markets.{}", kind);
        let (default_budget, default_limit) = default_budget_and_limit(kind);
        let block_budget = self.block_budget.unwrap_or(default_budget);
        let block_limit = self.block_limit.unwrap_or(default_limit);

        let initial_supply = match self.initial_supply {
            Some(supply) => supply,
            None => block_budget
                .checked_mul(TARGET_BLOCKS_PER_WEEK)
                .ok_or_else(|| ConfigError::invalid(&field, "default initial supply overflows"))?,
        };

        ResourceMarket::genesis(
            initial_supply,
            block_budget,
            block_limit,
            self.reference_cost.unwrap_or(BUDGET_REFERENCE_COST),
        )
        .map_err(|e| ConfigError::invalid(field, e))
    }
}

/// Object spaces the system persists into, derived once from the contract id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    pub markets: ObjectSpace,
    pub parameters: ObjectSpace,
    pub credits: ObjectSpace,
}

impl StorageLayout {
    pub fn new(contract_id: &str) -> Self {
        Self {
            markets: ObjectSpace::system(contract_id, 0),
            parameters: ObjectSpace::system(contract_id, 1),
            credits: ObjectSpace::system(contract_id, 2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = SystemConfig::from_toml_str("").unwrap();
        assert_eq!(config, SystemConfig::default());
        assert_eq!(
            config.resource_parameters().unwrap(),
            SystemResourceParameters::default()
        );

        let markets = config.genesis_markets().unwrap();
        assert_eq!(
            markets.compute_bandwidth.resource_supply(),
            COMPUTE_BUDGET_PER_BLOCK * TARGET_BLOCKS_PER_WEEK
        );
        assert_eq!(markets.disk_storage.block_limit(), MAX_DISK_PER_BLOCK);
        assert_eq!(
            markets.network_bandwidth.price(NETWORK_BUDGET_PER_BLOCK).unwrap(),
            BUDGET_REFERENCE_COST
        );
    }

    #[test]
    fn test_partial_market_override() {
        let config = SystemConfig::from_toml_str(
            r#"
            contract_id = "rc"
            unlimited_accounts = ["governance"]

            [parameters]
            rc_regen_ms = 1000
            decay_constant = "18446744073709551616"

            [markets.network_bandwidth]
            block_budget = 100
            block_limit = 500
            "#,
        )
        .unwrap();

        let params = config.resource_parameters().unwrap();
        assert_eq!(params.rc_regen_ms, 1_000);
        assert_eq!(params.decay_constant(), DecayConstant::NONE);
        assert_eq!(params.print_rate_premium, PRINT_RATE_PREMIUM);

        let markets = config.genesis_markets().unwrap();
        assert_eq!(markets.network_bandwidth.block_budget(), 100);
        assert_eq!(
            markets.network_bandwidth.resource_supply(),
            100 * TARGET_BLOCKS_PER_WEEK
        );
        assert_eq!(markets.disk_storage.block_budget(), DISK_BUDGET_PER_BLOCK);

        assert!(config.unlimited_set().contains("governance"));
        assert_eq!(config.storage_layout().credits, ObjectSpace::system("rc", 2));
    }

    #[test]
    fn test_invalid_values() {
        let too_large = SystemConfig::from_toml_str(
            "[parameters]\ndecay_constant = \"18446744073709551617\"",
        );
        assert!(matches!(too_large, Err(ConfigError::InvalidValue { .. })));

        let not_a_number = SystemConfig::from_toml_str("[parameters]\ndecay_constant = \"half\"");
        assert!(matches!(not_a_number, Err(ConfigError::InvalidValue { .. })));

        let budget_over_limit = SystemConfig::from_toml_str(
            "[markets.disk_storage]\nblock_budget = 10\nblock_limit = 5",
        );
        assert!(matches!(
            budget_over_limit,
            Err(ConfigError::InvalidValue { .. })
        ));

        let empty_zone = SystemConfig::from_toml_str("contract_id = \"\"");
        assert!(matches!(empty_zone, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_parse_error() {
        let result = SystemConfig::from_toml_str("contract_id = [");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));

        let wrong_type = SystemConfig::from_toml_str("[parameters]\nrc_regen_ms = \"soon\"");
        assert!(matches!(wrong_type, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = SystemConfig::load("/nonexistent/resources.toml");
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
