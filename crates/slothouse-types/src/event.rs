//! Observable events emitted by the auction house.
//!
//! Events are appended to the engine's log in the order their state changes
//! commit. A rejected operation emits nothing.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, AuctionId, Currency, ItemRef};

/// Tier that produced a royalty payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoyaltyTier {
    Item,
    Collection,
    PaymentSplit,
}

impl fmt::Display for RoyaltyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item => write!(f, "ITEM"),
            Self::Collection => write!(f, "COLLECTION"),
            Self::PaymentSplit => write!(f, "PAYMENT_SPLIT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuctionEvent {
    AuctionCreated {
        auction: AuctionId,
        creator: AccountId,
        slot_count: u32,
        currency: Currency,
    },
    AuctionCanceled {
        auction: AuctionId,
    },
    AddressesWhitelisted {
        auction: AuctionId,
        addresses: Vec<AccountId>,
    },
    ReservesUpdated {
        auction: AuctionId,
        reserves: Vec<Decimal>,
    },
    ItemDeposited {
        auction: AuctionId,
        slot: u32,
        depositor: AccountId,
        item: ItemRef,
    },
    ItemWithdrawn {
        auction: AuctionId,
        slot: u32,
        depositor: AccountId,
        item: ItemRef,
    },
    BidSubmitted {
        auction: AuctionId,
        bidder: AccountId,
        amount: Decimal,
    },
    AuctionExtended {
        auction: AuctionId,
        bidder: AccountId,
        amount: Decimal,
        new_end: DateTime<Utc>,
    },
    AuctionFinalized {
        auction: AuctionId,
        winners: Vec<(u32, AccountId)>,
    },
    SlotRevenueCaptured {
        auction: AuctionId,
        slot: u32,
        amount: Decimal,
    },
    RoyaltyPaid {
        auction: AuctionId,
        tier: RoyaltyTier,
        recipient: AccountId,
        amount: Decimal,
    },
    RevenueWithdrawn {
        auction: AuctionId,
        recipient: AccountId,
        amount: Decimal,
    },
    RoyaltiesWithdrawn {
        currency: Currency,
        recipient: AccountId,
        amount: Decimal,
    },
    ItemRewardClaimed {
        auction: AuctionId,
        slot: u32,
        winner: AccountId,
        item: ItemRef,
    },
    BidWithdrawn {
        auction: AuctionId,
        bidder: AccountId,
        amount: Decimal,
    },
    PlatformFeeUpdated {
        bps: u32,
    },
}

impl AuctionEvent {
    /// Auction the event belongs to, when it belongs to one.
    #[must_use]
    pub fn auction(&self) -> Option<AuctionId> {
        match self {
            Self::AuctionCreated { auction, .. }
            | Self::AuctionCanceled { auction }
            | Self::AddressesWhitelisted { auction, .. }
            | Self::ReservesUpdated { auction, .. }
            | Self::ItemDeposited { auction, .. }
            | Self::ItemWithdrawn { auction, .. }
            | Self::BidSubmitted { auction, .. }
            | Self::AuctionExtended { auction, .. }
            | Self::AuctionFinalized { auction, .. }
            | Self::SlotRevenueCaptured { auction, .. }
            | Self::RoyaltyPaid { auction, .. }
            | Self::RevenueWithdrawn { auction, .. }
            | Self::ItemRewardClaimed { auction, .. }
            | Self::BidWithdrawn { auction, .. } => Some(*auction),
            Self::RoyaltiesWithdrawn { .. } | Self::PlatformFeeUpdated { .. } => None,
        }
    }
}

impl fmt::Display for AuctionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AuctionCreated { .. } => "AUCTION_CREATED",
            Self::AuctionCanceled { .. } => "AUCTION_CANCELED",
            Self::AddressesWhitelisted { .. } => "ADDRESSES_WHITELISTED",
            Self::ReservesUpdated { .. } => "RESERVES_UPDATED",
            Self::ItemDeposited { .. } => "ITEM_DEPOSITED",
            Self::ItemWithdrawn { .. } => "ITEM_WITHDRAWN",
            Self::BidSubmitted { .. } => "BID_SUBMITTED",
            Self::AuctionExtended { .. } => "AUCTION_EXTENDED",
            Self::AuctionFinalized { .. } => "AUCTION_FINALIZED",
            Self::SlotRevenueCaptured { .. } => "SLOT_REVENUE_CAPTURED",
            Self::RoyaltyPaid { .. } => "ROYALTY_PAID",
            Self::RevenueWithdrawn { .. } => "REVENUE_WITHDRAWN",
            Self::RoyaltiesWithdrawn { .. } => "ROYALTIES_WITHDRAWN",
            Self::ItemRewardClaimed { .. } => "ITEM_REWARD_CLAIMED",
            Self::BidWithdrawn { .. } => "BID_WITHDRAWN",
            Self::PlatformFeeUpdated { .. } => "PLATFORM_FEE_UPDATED",
        };
        f.write_str(name)
    }
}
