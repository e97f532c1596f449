//! Auction and slot records.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    AccountId, AuctionError, AuctionId, AuctionPhase, AuctionWindow, Currency, DepositPolicy,
    Result, RoyaltyReceiver,
};

/// Creation parameters for a new auction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionParams {
    pub window: AuctionWindow,
    pub slot_count: u32,
    pub currency: Currency,
    /// Enables the depositor whitelist even when `whitelist` is empty.
    pub whitelist_enabled: bool,
    /// Initial whitelist. Non-empty implies whitelisting is enabled.
    pub whitelist: Vec<AccountId>,
    /// Per-slot minimum reserve. Empty means zero for every slot.
    pub reserves: Vec<Decimal>,
    /// Auction-level payment splits applied to the residual revenue.
    pub payment_splits: Vec<RoyaltyReceiver>,
    /// Falls back to the engine default when `None`.
    pub deposit_policy: Option<DepositPolicy>,
}

impl AuctionParams {
    #[must_use]
    pub fn new(window: AuctionWindow, slot_count: u32, currency: Currency) -> Self {
        Self {
            window,
            slot_count,
            currency,
            whitelist_enabled: false,
            whitelist: Vec::new(),
            reserves: Vec::new(),
            payment_splits: Vec::new(),
            deposit_policy: None,
        }
    }

    #[must_use]
    pub fn with_whitelist(mut self, whitelist: Vec<AccountId>) -> Self {
        self.whitelist_enabled = true;
        self.whitelist = whitelist;
        self
    }

    #[must_use]
    pub fn with_reserves(mut self, reserves: Vec<Decimal>) -> Self {
        self.reserves = reserves;
        self
    }

    #[must_use]
    pub fn with_payment_splits(mut self, splits: Vec<RoyaltyReceiver>) -> Self {
        self.payment_splits = splits;
        self
    }

    #[must_use]
    pub fn with_deposit_policy(mut self, policy: DepositPolicy) -> Self {
        self.deposit_policy = Some(policy);
        self
    }

    /// Whether the created auction should gate deposits by whitelist.
    #[must_use]
    pub fn whitelisting(&self) -> bool {
        self.whitelist_enabled || !self.whitelist.is_empty()
    }
}

/// One ranked position within an auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// 1-based.
    pub index: u32,
    pub reserve: Decimal,
    /// Set once at finalization.
    pub winner: Option<AccountId>,
    /// Winner's cumulative balance at finalization.
    pub winning_bid: Decimal,
}

impl Slot {
    #[must_use]
    pub fn new(index: u32, reserve: Decimal) -> Self {
        Self {
            index,
            reserve,
            winner: None,
            winning_bid: Decimal::ZERO,
        }
    }

    /// A slot is winning when it has a winner whose bid reached the reserve.
    #[must_use]
    pub fn reserve_met(&self) -> bool {
        self.winner.is_some() && self.winning_bid >= self.reserve
    }

    #[must_use]
    pub fn is_won_by(&self, who: AccountId) -> bool {
        self.winner == Some(who)
    }
}

/// Persisted state of a single auction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Auction {
    pub id: AuctionId,
    pub creator: AccountId,
    pub window: AuctionWindow,
    pub currency: Currency,
    /// `None` when whitelisting is disabled.
    pub whitelist: Option<BTreeSet<AccountId>>,
    pub payment_splits: Vec<RoyaltyReceiver>,
    pub deposit_policy: DepositPolicy,
    pub slots: Vec<Slot>,
    pub canceled: bool,
    pub finalized: bool,
    pub revenue_distributed: bool,
    /// SHA-256 commitment to the winner assignment, set at finalization.
    pub ranking_root: Option<[u8; 32]>,
    pub created_at: DateTime<Utc>,
}

impl Auction {
    #[must_use]
    pub fn slot_count(&self) -> u32 {
        u32::try_from(self.slots.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn phase(&self, now: DateTime<Utc>) -> AuctionPhase {
        AuctionPhase::at(&self.window, now, self.canceled, self.finalized)
    }

    /// Slot by 1-based index.
    pub fn slot(&self, index: u32) -> Result<&Slot> {
        let count = self.slot_count();
        index
            .checked_sub(1)
            .and_then(|i| self.slots.get(i as usize))
            .ok_or(AuctionError::InvalidSlot {
                slot: index,
                slot_count: count,
            })
    }

    pub fn slot_mut(&mut self, index: u32) -> Result<&mut Slot> {
        let count = self.slot_count();
        index
            .checked_sub(1)
            .and_then(|i| self.slots.get_mut(i as usize))
            .ok_or(AuctionError::InvalidSlot {
                slot: index,
                slot_count: count,
            })
    }

    /// Whether `who` may deposit. Always true without a whitelist.
    #[must_use]
    pub fn is_whitelisted(&self, who: AccountId) -> bool {
        self.whitelist.as_ref().is_none_or(|set| set.contains(&who))
    }

    /// Slots with a recorded winner, in slot order.
    pub fn assigned_slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|s| s.winner.is_some())
    }

    /// Slots whose winner reached the reserve.
    pub fn winning_slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|s| s.reserve_met())
    }

    /// The winning slot held by `who`, if any.
    #[must_use]
    pub fn winning_slot_of(&self, who: AccountId) -> Option<&Slot> {
        self.winning_slots().find(|s| s.is_won_by(who))
    }

    pub fn ensure_owner(&self, caller: AccountId) -> Result<()> {
        if caller == self.creator {
            Ok(())
        } else {
            Err(AuctionError::NotOwner { caller })
        }
    }
}
