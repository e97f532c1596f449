//! Cumulative bid balances.
//!
//! A bidder's balance in an auction only grows while bidding is open. It is
//! zeroed once, by a guarded withdrawal after finalization.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::AccountId;

/// Cumulative contribution of one bidder to one auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidBalance {
    pub amount: Decimal,
    /// Engine-wide sequence number of this bidder's first bid here.
    /// Earlier wins ties at finalization.
    pub first_bid_seq: u64,
    pub bid_count: u32,
}

impl BidBalance {
    #[must_use]
    pub fn new(first_bid_seq: u64) -> Self {
        Self {
            amount: Decimal::ZERO,
            first_bid_seq,
            bid_count: 0,
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

/// A bidder's position as input to ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidderStanding {
    pub bidder: AccountId,
    pub balance: Decimal,
    pub first_bid_seq: u64,
}

impl BidderStanding {
    #[must_use]
    pub fn new(bidder: AccountId, balance: Decimal, first_bid_seq: u64) -> Self {
        Self {
            bidder,
            balance,
            first_bid_seq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_balance_is_zero() {
        let b = BidBalance::new(7);
        assert!(b.is_zero());
        assert_eq!(b.first_bid_seq, 7);
        assert_eq!(b.bid_count, 0);
    }

    #[test]
    fn standing_serde_roundtrip() {
        let s = BidderStanding::new(AccountId::new(), Decimal::new(300, 0), 2);
        let json = serde_json::to_string(&s).unwrap();
        let back: BidderStanding = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
