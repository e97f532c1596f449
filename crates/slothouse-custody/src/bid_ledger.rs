//! Cumulative bid balances per (auction, bidder).
//!
//! Balances only grow through [`BidLedger::credit`]. The single way down is
//! [`BidLedger::take_balance`], which zeroes the entry and hands the amount
//! to the caller for payout.

use std::collections::HashMap;

use rust_decimal::Decimal;
use slothouse_types::{AccountId, AuctionError, AuctionId, BidBalance, BidderStanding, Result};

/// Source of truth for bid balances, indexed by auction.
pub struct BidLedger {
    balances: HashMap<AuctionId, HashMap<AccountId, BidBalance>>,
    /// Engine-wide bid sequence, used as the ranking tie-break.
    next_seq: u64,
}

impl BidLedger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Add `amount` to the bidder's cumulative balance.
    ///
    /// Returns the entry as it was before the credit (`None` for a first bid)
    /// so the caller can [`restore`](Self::restore) it if a later step fails.
    ///
    /// # Errors
    /// `ZeroAmount` for non-positive amounts, `ArithmeticOverflow` on overflow.
    /// Nothing is written on error.
    pub fn credit(
        &mut self,
        auction: AuctionId,
        bidder: AccountId,
        amount: Decimal,
    ) -> Result<Option<BidBalance>> {
        if amount <= Decimal::ZERO {
            return Err(AuctionError::ZeroAmount);
        }
        let previous = self.get(auction, bidder).cloned();
        let mut entry = previous
            .clone()
            .unwrap_or_else(|| BidBalance::new(self.next_seq));
        entry.amount = entry
            .amount
            .checked_add(amount)
            .ok_or(AuctionError::ArithmeticOverflow)?;
        entry.bid_count = entry.bid_count.saturating_add(1);
        if previous.is_none() {
            self.next_seq += 1;
        }
        self.balances.entry(auction).or_default().insert(bidder, entry);
        Ok(previous)
    }

    /// Put an entry back to the state returned by [`credit`](Self::credit).
    pub fn restore(&mut self, auction: AuctionId, bidder: AccountId, previous: Option<BidBalance>) {
        match previous {
            Some(entry) => {
                self.balances.entry(auction).or_default().insert(bidder, entry);
            }
            None => {
                if let Some(bidders) = self.balances.get_mut(&auction) {
                    bidders.remove(&bidder);
                }
            }
        }
    }

    /// Zero the bidder's balance and return what it held.
    ///
    /// The entry keeps its first-bid sequence so a re-credit cannot jump the
    /// tie-break queue.
    ///
    /// # Errors
    /// `ZeroBalance` if there is nothing to take.
    pub fn take_balance(&mut self, auction: AuctionId, bidder: AccountId) -> Result<Decimal> {
        let entry = self
            .balances
            .get_mut(&auction)
            .and_then(|bidders| bidders.get_mut(&bidder))
            .filter(|e| !e.is_zero())
            .ok_or(AuctionError::ZeroBalance)?;
        let amount = entry.amount;
        entry.amount = Decimal::ZERO;
        Ok(amount)
    }

    /// Undo a [`take_balance`](Self::take_balance) whose payout failed.
    pub fn restore_balance(&mut self, auction: AuctionId, bidder: AccountId, amount: Decimal) {
        if let Some(entry) = self
            .balances
            .get_mut(&auction)
            .and_then(|bidders| bidders.get_mut(&bidder))
        {
            entry.amount = amount;
        }
    }

    #[must_use]
    pub fn balance(&self, auction: AuctionId, bidder: AccountId) -> Decimal {
        self.get(auction, bidder).map_or(Decimal::ZERO, |e| e.amount)
    }

    /// Every bidder with a positive balance in `auction`, unordered.
    #[must_use]
    pub fn standings(&self, auction: AuctionId) -> Vec<BidderStanding> {
        self.balances
            .get(&auction)
            .into_iter()
            .flatten()
            .filter(|(_, e)| !e.is_zero())
            .map(|(bidder, e)| BidderStanding::new(*bidder, e.amount, e.first_bid_seq))
            .collect()
    }

    /// Sum of all balances still held for `auction`.
    ///
    /// # Errors
    /// `ArithmeticOverflow` if the balances do not fit one `Decimal`.
    pub fn outstanding(&self, auction: AuctionId) -> Result<Decimal> {
        self.balances
            .get(&auction)
            .into_iter()
            .flat_map(HashMap::values)
            .try_fold(Decimal::ZERO, |acc, e| {
                acc.checked_add(e.amount)
                    .ok_or(AuctionError::ArithmeticOverflow)
            })
    }

    fn get(&self, auction: AuctionId, bidder: AccountId) -> Option<&BidBalance> {
        self.balances.get(&auction)?.get(&bidder)
    }
}

impl Default for BidLedger {
    fn default() -> Self {
        Self::new()
    }
}
