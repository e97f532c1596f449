//! Royalty waterfall planning.
//!
//! Pure functions: given a base amount and the receivers of each tier, they
//! compute who gets what. Nothing here moves funds.
//!
//! ## Item tier
//!
//! Every item of a slot gets `floor(captured / items)` as its base. Item-level
//! receivers are paid first, then collection-level receivers, each
//! `floor(base * bps / 10000)` of the same base. A payout never exceeds what
//! is left of the base, so rates summing past 100% cannot overdraw.
//!
//! ## Auction tier
//!
//! On the residual: payment splits, then the platform fee (clamped to what
//! remains), then the creator takes the rest.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use slothouse_types::{
    AccountId, AuctionError, Result, RoyaltyReceiver, RoyaltyTier, bps_of,
};

/// A single planned transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub recipient: AccountId,
    pub amount: Decimal,
    pub tier: RoyaltyTier,
}

/// Royalty payouts for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRoyaltyPlan {
    pub base: Decimal,
    pub payouts: Vec<Payout>,
    /// Sum of `payouts`; comes out of the slot's residual pool.
    pub paid: Decimal,
}

/// Distribution of an auction's residual revenue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionRevenuePlan {
    pub residual: Decimal,
    pub split_payouts: Vec<Payout>,
    /// Credited to the royalty reserve, not paid out.
    pub platform_fee: Decimal,
    pub creator: AccountId,
    pub creator_amount: Decimal,
}

impl AuctionRevenuePlan {
    /// Transfers that leave custody: splits then creator, zero amounts dropped.
    #[must_use]
    pub fn transfers(&self) -> Vec<(AccountId, Decimal)> {
        self.split_payouts
            .iter()
            .map(|p| (p.recipient, p.amount))
            .chain(std::iter::once((self.creator, self.creator_amount)))
            .filter(|(_, amount)| *amount > Decimal::ZERO)
            .collect()
    }
}

/// `floor(captured / item_count)`. A slot without items has no per-item base.
pub fn per_item_base(captured: Decimal, item_count: usize) -> Result<Decimal> {
    if item_count == 0 {
        return Ok(Decimal::ZERO);
    }
    let divisor = Decimal::from(item_count);
    captured
        .checked_div(divisor)
        .map(|d| d.floor())
        .ok_or(AuctionError::ArithmeticOverflow)
}

fn pay_tier(
    receivers: &[RoyaltyReceiver],
    base: Decimal,
    tier: RoyaltyTier,
    remaining: &mut Decimal,
    payouts: &mut Vec<Payout>,
) -> Result<()> {
    for receiver in receivers {
        let amount = receiver.share_of(base)?.min(*remaining);
        if amount <= Decimal::ZERO {
            continue;
        }
        *remaining -= amount;
        payouts.push(Payout {
            recipient: receiver.recipient,
            amount,
            tier,
        });
    }
    Ok(())
}

/// Plan the royalty payouts of one item from its per-item `base`.
pub fn plan_item_royalties(
    base: Decimal,
    item_tier: &[RoyaltyReceiver],
    collection_tier: &[RoyaltyReceiver],
) -> Result<ItemRoyaltyPlan> {
    let mut remaining = base;
    let mut payouts = Vec::with_capacity(item_tier.len() + collection_tier.len());
    pay_tier(item_tier, base, RoyaltyTier::Item, &mut remaining, &mut payouts)?;
    pay_tier(
        collection_tier,
        base,
        RoyaltyTier::Collection,
        &mut remaining,
        &mut payouts,
    )?;
    Ok(ItemRoyaltyPlan {
        base,
        payouts,
        paid: base - remaining,
    })
}

/// Plan the distribution of an auction's `residual`.
pub fn plan_auction_revenue(
    residual: Decimal,
    splits: &[RoyaltyReceiver],
    platform_fee_bps: u32,
    creator: AccountId,
) -> Result<AuctionRevenuePlan> {
    let mut remaining = residual;
    let mut split_payouts = Vec::with_capacity(splits.len());
    pay_tier(
        splits,
        residual,
        RoyaltyTier::PaymentSplit,
        &mut remaining,
        &mut split_payouts,
    )?;
    let platform_fee = bps_of(residual, platform_fee_bps)?.min(remaining);
    remaining -= platform_fee;
    Ok(AuctionRevenuePlan {
        residual,
        split_payouts,
        platform_fee,
        creator,
        creator_amount: remaining,
    })
}
