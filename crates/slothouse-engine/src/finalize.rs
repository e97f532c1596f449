//! Finalization: fix the winners of an ended auction.
//!
//! Two entry points share one ranking. [`AuctionHouse::finalize_auction`]
//! computes it; [`AuctionHouse::finalize_auction_with_order`] checks a
//! caller-supplied order against it. Either way the recorded assignment is
//! rank k → slot k, and is immutable afterwards.

use chrono::{DateTime, Utc};
use slothouse_custody::{FundsCustody, ItemCustody};
use slothouse_ranking::{Ranking, rank_bidders, verify_supplied_order};
use slothouse_settlement::RoyaltyRegistry;
use slothouse_types::{AccountId, Auction, AuctionError, AuctionEvent, AuctionId, Result};

use crate::{AuctionHouse, clock::Clock};

fn ensure_finalizable(auction: &Auction, now: DateTime<Utc>) -> Result<()> {
    if auction.canceled {
        return Err(AuctionError::AuctionCanceled(auction.id));
    }
    if auction.finalized {
        return Err(AuctionError::AlreadyFinalized(auction.id));
    }
    if !auction.window.has_ended(now) {
        return Err(AuctionError::NotEnded(auction.id));
    }
    Ok(())
}

impl<E, R, C> AuctionHouse<E, R, C>
where
    E: FundsCustody + ItemCustody,
    R: RoyaltyRegistry,
    C: Clock,
{
    /// Rank the bidders of an ended auction and record the winners.
    /// Permissionless.
    ///
    /// # Errors
    /// `AuctionCanceled`, `AlreadyFinalized`, `NotEnded`.
    pub fn finalize_auction(&mut self, id: AuctionId) -> Result<Ranking> {
        let now = self.clock.now();
        let auction = self.registry.get(id)?;
        ensure_finalizable(auction, now)?;
        let ranking = rank_bidders(id, &self.ledger.standings(id), auction.slot_count());
        self.apply_ranking(ranking)
    }

    /// Finalize with a caller-proposed winner list in slot order.
    ///
    /// The list is accepted only if it equals the canonical ranking.
    ///
    /// # Errors
    /// As [`finalize_auction`](Self::finalize_auction), plus
    /// `WrongWinnerCount` and `WinnersNotSorted`.
    pub fn finalize_auction_with_order(
        &mut self,
        id: AuctionId,
        winners: &[AccountId],
    ) -> Result<Ranking> {
        let now = self.clock.now();
        let auction = self.registry.get(id)?;
        ensure_finalizable(auction, now)?;
        let ranking =
            verify_supplied_order(id, &self.ledger.standings(id), auction.slot_count(), winners)
                .inspect_err(|e| {
                    tracing::warn!(auction = %id, error = %e, "supplied winner order rejected");
                })?;
        self.apply_ranking(ranking)
    }

    fn apply_ranking(&mut self, ranking: Ranking) -> Result<Ranking> {
        let id = ranking.auction;
        let auction = self.registry.get_mut(id)?;
        // Validate every slot before touching any of them.
        for a in &ranking.assignments {
            auction.slot(a.slot)?;
        }
        for a in &ranking.assignments {
            let slot = auction.slot_mut(a.slot)?;
            slot.winner = Some(a.bidder);
            slot.winning_bid = a.balance;
        }
        auction.finalized = true;
        auction.ranking_root = Some(ranking.ranking_root);

        tracing::info!(
            auction = %id,
            winners = ranking.assignments.len(),
            losers = ranking.losers.len(),
            root = %hex::encode(ranking.ranking_root),
            "auction finalized"
        );
        self.emit(AuctionEvent::AuctionFinalized {
            auction: id,
            winners: ranking.winners(),
        });
        Ok(ranking)
    }
}
