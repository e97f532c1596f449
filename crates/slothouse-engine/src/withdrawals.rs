//! Winner claims and losing-bid refunds.
//!
//! Both follow the same order: guard check, internal record updated to its
//! post-withdrawal state, then the external transfer. A balance is zero
//! before the refund leaves custody, so a second call sees `ZeroBalance`.

use rust_decimal::Decimal;
use slothouse_custody::{FundsCustody, ItemCustody};
use slothouse_settlement::{RoyaltyRegistry, WithdrawalGuard};
use slothouse_types::{AccountId, AuctionError, AuctionEvent, AuctionId, ItemRef, Result};

use crate::{AuctionHouse, clock::Clock};

impl<E, R, C> AuctionHouse<E, R, C>
where
    E: FundsCustody + ItemCustody,
    R: RoyaltyRegistry,
    C: Clock,
{
    /// Release up to `max_count` unclaimed items of a won slot to its winner.
    /// `max_count` is clamped to the per-call cap; call again for the rest.
    ///
    /// # Errors
    /// `NotFinalized`, `NotWinner`, `ReserveNotMet`, `AlreadyClaimed` once
    /// every item has been released.
    pub fn claim_won_items(
        &mut self,
        caller: AccountId,
        id: AuctionId,
        slot: u32,
        max_count: usize,
    ) -> Result<Vec<ItemRef>> {
        let auction = self.registry.get(id)?;
        if let Err(e) = WithdrawalGuard::check_claim(auction, slot, caller) {
            tracing::warn!(auction = %id, slot, caller = %caller, error = %e, "claim refused");
            return Err(e);
        }
        let limit = max_count.min(self.gate.max_items_per_call());
        self.gate.check_batch(limit)?;

        let released = self.vault.release_to_winner(id, slot, limit);
        if released.is_empty() {
            return Err(AuctionError::AlreadyClaimed { auction: id, slot });
        }
        if let Err(e) = self.release_batch(&released, caller) {
            self.vault.unrelease(id, slot, &released);
            return Err(e);
        }

        tracing::info!(
            auction = %id,
            slot,
            winner = %caller,
            count = released.len(),
            remaining = self.vault.unreleased(id, slot),
            "won items claimed"
        );
        for item in &released {
            self.emit(AuctionEvent::ItemRewardClaimed {
                auction: id,
                slot,
                winner: caller,
                item: *item,
            });
        }
        Ok(released)
    }

    /// Refund the caller's whole bid balance after finalization. Not
    /// available to winners of slots whose reserve was met.
    ///
    /// # Errors
    /// `NotFinalized`, `IsWinner`, `ZeroBalance`, or a custody failure (the
    /// balance is restored).
    pub fn withdraw_losing_bid_balance(
        &mut self,
        caller: AccountId,
        id: AuctionId,
    ) -> Result<Decimal> {
        let auction = self.registry.get(id)?;
        let currency = auction.currency;
        if let Err(e) = WithdrawalGuard::check_bid_withdrawal(auction, caller) {
            tracing::warn!(auction = %id, bidder = %caller, error = %e, "bid withdrawal refused");
            return Err(e);
        }

        let amount = self.ledger.take_balance(id, caller)?;
        if let Err(e) = self.conservation.record_outflow(currency, amount) {
            self.ledger.restore_balance(id, caller, amount);
            return Err(e);
        }
        if let Err(e) = self.custody.push(currency, caller, amount) {
            self.conservation.revert_outflow(currency, amount);
            self.ledger.restore_balance(id, caller, amount);
            tracing::warn!(auction = %id, bidder = %caller, %amount, error = %e, "refund reverted");
            return Err(e);
        }

        tracing::info!(auction = %id, bidder = %caller, %amount, "bid balance withdrawn");
        self.emit(AuctionEvent::BidWithdrawn {
            auction: id,
            bidder: caller,
            amount,
        });
        Ok(amount)
    }
}
