//! Phase-aware withdrawal guard.
//!
//! Decides, from auction state alone, whether a caller may take items or
//! funds back. Callers must zero or mark their own records before moving
//! anything out of custody.
//!
//! | Withdrawal | Allowed when |
//! |------------|--------------|
//! | deposited items | canceled, before start, or finalized with no winner in the slot |
//! | items of a non-winning slot | finalized and the slot's reserve was not met |
//! | won items | finalized, caller won the slot, reserve met |
//! | bid balance | finalized and caller holds no winning slot |

use chrono::{DateTime, Utc};
use slothouse_types::{AccountId, Auction, AuctionError, AuctionPhase, Result};

pub struct WithdrawalGuard;

impl WithdrawalGuard {
    /// Depositor takes back items from a slot that cannot be won.
    pub fn check_deposit_withdrawal(
        auction: &Auction,
        slot: u32,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let s = auction.slot(slot)?;
        let unlocked = match auction.phase(now) {
            AuctionPhase::Canceled | AuctionPhase::Pending => true,
            AuctionPhase::Finalized => s.winner.is_none(),
            AuctionPhase::Bidding | AuctionPhase::Ended => false,
        };
        if unlocked {
            Ok(())
        } else {
            Err(AuctionError::SlotLocked {
                auction: auction.id,
                slot,
            })
        }
    }

    /// Depositor takes back items from a slot whose reserve was not met.
    pub fn check_non_winning_withdrawal(auction: &Auction, slot: u32) -> Result<()> {
        let s = auction.slot(slot)?;
        if !auction.finalized {
            return Err(AuctionError::NotFinalized(auction.id));
        }
        if s.reserve_met() {
            return Err(AuctionError::ReserveMet {
                auction: auction.id,
                slot,
            });
        }
        Ok(())
    }

    /// Winner claims the items of their slot.
    pub fn check_claim(auction: &Auction, slot: u32, caller: AccountId) -> Result<()> {
        let s = auction.slot(slot)?;
        if !auction.finalized {
            return Err(AuctionError::NotFinalized(auction.id));
        }
        if !s.is_won_by(caller) {
            return Err(AuctionError::NotWinner(caller));
        }
        if !s.reserve_met() {
            return Err(AuctionError::ReserveNotMet {
                auction: auction.id,
                slot,
            });
        }
        Ok(())
    }

    /// Bidder takes back a balance that did not win a slot.
    pub fn check_bid_withdrawal(auction: &Auction, caller: AccountId) -> Result<()> {
        if !auction.finalized {
            return Err(AuctionError::NotFinalized(auction.id));
        }
        if auction.winning_slot_of(caller).is_some() {
            return Err(AuctionError::IsWinner(caller));
        }
        Ok(())
    }
}
