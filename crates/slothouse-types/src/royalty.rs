//! Royalty receivers and basis-point arithmetic.
//!
//! All percentage math floors to whole base units. Whatever is not paid out
//! stays with the payer, so rounding never creates value.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, AuctionError, Result, constants::BPS_DENOMINATOR};

/// A (recipient, basis points) pair at any distribution tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoyaltyReceiver {
    pub recipient: AccountId,
    pub bps: u32,
}

impl RoyaltyReceiver {
    #[must_use]
    pub fn new(recipient: AccountId, bps: u32) -> Self {
        Self { recipient, bps }
    }

    /// This receiver's share of `base`, floored to whole units.
    pub fn share_of(&self, base: Decimal) -> Result<Decimal> {
        bps_of(base, self.bps)
    }
}

/// `floor(base * bps / 10000)`.
pub fn bps_of(base: Decimal, bps: u32) -> Result<Decimal> {
    let scaled = base
        .checked_mul(Decimal::from(bps))
        .ok_or(AuctionError::ArithmeticOverflow)?;
    let share = scaled
        .checked_div(Decimal::from(BPS_DENOMINATOR))
        .ok_or(AuctionError::ArithmeticOverflow)?;
    Ok(share.floor())
}

/// Sum of basis points across a tier.
#[must_use]
pub fn total_bps(receivers: &[RoyaltyReceiver]) -> u64 {
    receivers.iter().map(|r| u64::from(r.bps)).sum()
}

/// Reject a tier whose basis points exceed 100%.
pub fn validate_split_total(receivers: &[RoyaltyReceiver]) -> Result<()> {
    let total = total_bps(receivers);
    if total > u64::from(BPS_DENOMINATOR) {
        return Err(AuctionError::InvalidSplitTotal {
            total_bps: u32::try_from(total).unwrap_or(u32::MAX),
        });
    }
    Ok(())
}
