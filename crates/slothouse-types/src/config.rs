//! Engine configuration.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    AccountId, AuctionError, ContractAddress, Currency, DepositPolicy, ExtensionPolicy, Result,
    constants,
};

/// Configuration for one auction house instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// May set the platform fee, list currencies, and withdraw the royalty reserve.
    pub platform_owner: AccountId,
    #[serde(default = "default_max_slots")]
    pub max_slots: u32,
    #[serde(default = "default_max_items_per_slot")]
    pub max_items_per_slot: usize,
    #[serde(default = "default_max_items_per_call")]
    pub max_items_per_call: usize,
    #[serde(default)]
    pub platform_fee_bps: u32,
    /// Fungible tokens accepted as auction currency. Native is always accepted.
    #[serde(default)]
    pub supported_tokens: BTreeSet<ContractAddress>,
    #[serde(default)]
    pub extension_policy: ExtensionPolicy,
    #[serde(default)]
    pub default_deposit_policy: DepositPolicy,
}

fn default_max_slots() -> u32 {
    constants::DEFAULT_MAX_SLOTS
}

fn default_max_items_per_slot() -> usize {
    constants::DEFAULT_MAX_ITEMS_PER_SLOT
}

fn default_max_items_per_call() -> usize {
    constants::DEFAULT_MAX_ITEMS_PER_CALL
}

impl EngineConfig {
    /// Defaults owned by `platform_owner`.
    #[must_use]
    pub fn new(platform_owner: AccountId) -> Self {
        Self {
            platform_owner,
            max_slots: constants::DEFAULT_MAX_SLOTS,
            max_items_per_slot: constants::DEFAULT_MAX_ITEMS_PER_SLOT,
            max_items_per_call: constants::DEFAULT_MAX_ITEMS_PER_CALL,
            platform_fee_bps: constants::DEFAULT_PLATFORM_FEE_BPS,
            supported_tokens: BTreeSet::new(),
            extension_policy: ExtensionPolicy::default(),
            default_deposit_policy: DepositPolicy::default(),
        }
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| AuctionError::Configuration(format!("invalid config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_slots == 0 {
            return Err(AuctionError::Configuration("max_slots must be positive".into()));
        }
        if self.max_items_per_slot == 0 {
            return Err(AuctionError::Configuration(
                "max_items_per_slot must be positive".into(),
            ));
        }
        if self.max_items_per_call == 0 {
            return Err(AuctionError::Configuration(
                "max_items_per_call must be positive".into(),
            ));
        }
        if self.platform_fee_bps >= constants::MAX_PLATFORM_FEE_BPS {
            return Err(AuctionError::Configuration(format!(
                "platform_fee_bps {} must be below {}",
                self.platform_fee_bps,
                constants::MAX_PLATFORM_FEE_BPS
            )));
        }
        if self.supported_tokens.iter().any(ContractAddress::is_zero) {
            return Err(AuctionError::Configuration(
                "zero address cannot be a supported token".into(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn supports(&self, currency: Currency) -> bool {
        match currency {
            Currency::Native => true,
            Currency::Token(addr) => self.supported_tokens.contains(&addr),
        }
    }
}
