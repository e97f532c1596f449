//! Revenue capture and the royalty waterfall.
//!
//! ```text
//! capture_slot_revenue ──▶ distribute_item_royalties (per item) ──▶ distribute_auction_revenue
//!      snapshot                item tier, collection tier              splits, fee, creator
//! ```

use rust_decimal::Decimal;
use slothouse_custody::{FundsCustody, ItemCustody, payout_total};
use slothouse_ranking::verify_recorded_ranking;
use slothouse_settlement::{
    AuctionRevenuePlan, DistributionKey, ItemRoyaltyPlan, RoyaltyRegistry, plan_auction_revenue,
    plan_item_royalties,
};
use slothouse_types::{
    AccountId, AuctionError, AuctionEvent, AuctionId, Currency, Result, RoyaltyTier, constants,
};

use crate::{AuctionHouse, clock::Clock};

impl<E, R, C> AuctionHouse<E, R, C>
where
    E: FundsCustody + ItemCustody,
    R: RoyaltyRegistry,
    C: Clock,
{
    /// Snapshot the winning bid of a slot as its captured revenue. Once per
    /// slot; permissionless.
    ///
    /// # Errors
    /// `NotFinalized`, `NoWinner`, `ReserveNotMet`, `AlreadyCaptured`.
    /// `Internal` if the recorded winners no longer match the ranking root.
    pub fn capture_slot_revenue(&mut self, id: AuctionId, slot: u32) -> Result<Decimal> {
        let auction = self.registry.get(id)?;
        if !auction.finalized {
            return Err(AuctionError::NotFinalized(id));
        }
        verify_recorded_ranking(auction)?;
        let s = auction.slot(slot)?;
        if s.winner.is_none() {
            return Err(AuctionError::NoWinner { auction: id, slot });
        }
        if !s.reserve_met() {
            return Err(AuctionError::ReserveNotMet { auction: id, slot });
        }
        let amount = s.winning_bid;
        let items = self.vault.item_count(id, slot);
        self.revenue.capture(id, slot, amount, items)?;

        tracing::info!(auction = %id, slot, %amount, items, "slot revenue captured");
        self.emit(AuctionEvent::SlotRevenueCaptured {
            auction: id,
            slot,
            amount,
        });
        Ok(amount)
    }

    /// Pay item-tier and collection-tier royalties for one item of a captured
    /// slot. `item_index` is 1-based. Succeeds once per item.
    ///
    /// Receivers are looked up in the registry now, not at deposit time.
    ///
    /// # Errors
    /// `NotFinalized`, `NotCaptured`, `InvalidItemIndex`, `AlreadyDistributed`,
    /// or a custody failure (nothing is recorded in that case).
    pub fn distribute_item_royalties(
        &mut self,
        id: AuctionId,
        slot: u32,
        item_index: usize,
    ) -> Result<ItemRoyaltyPlan> {
        let auction = self.registry.get(id)?;
        if !auction.finalized {
            return Err(AuctionError::NotFinalized(id));
        }
        auction.slot(slot)?;
        let currency = auction.currency;
        let count = self.revenue.captured_items(id, slot)?;
        if item_index == 0 || item_index > count {
            return Err(AuctionError::InvalidItemIndex {
                index: item_index,
                count,
            });
        }
        let key = DistributionKey::ItemRoyalties {
            auction: id,
            slot,
            item: item_index,
        };
        if self.distributions.is_distributed(&key) {
            return Err(AuctionError::AlreadyDistributed {
                what: key.to_string(),
            });
        }
        let item = self.vault.item_at(id, slot, item_index)?.item;
        let base = self.revenue.per_item_base(id, slot)?;
        let item_tier = self.royalties.royalties_for_item(&item)?;
        let collection_tier = self.royalties.royalties_for_collection(item.collection)?;
        let plan = plan_item_royalties(base, &item_tier, &collection_tier)?;

        self.distributions.mark_distributed(key)?;
        if let Err(e) = self.revenue.record_item_royalties(id, slot, plan.paid) {
            self.distributions.unmark(&key);
            return Err(e);
        }
        if let Err(e) = self.conservation.record_outflow(currency, plan.paid) {
            self.revenue.revert_item_royalties(id, slot, plan.paid);
            self.distributions.unmark(&key);
            return Err(e);
        }
        let transfers: Vec<(AccountId, Decimal)> =
            plan.payouts.iter().map(|p| (p.recipient, p.amount)).collect();
        if let Err(e) = self.custody.push_all(currency, &transfers) {
            self.conservation.revert_outflow(currency, plan.paid);
            self.revenue.revert_item_royalties(id, slot, plan.paid);
            self.distributions.unmark(&key);
            tracing::warn!(
                auction = %id,
                slot,
                item = item_index,
                error = %e,
                "royalty payout reverted"
            );
            return Err(e);
        }

        tracing::info!(
            auction = %id,
            slot,
            item = item_index,
            %base,
            paid = %plan.paid,
            recipients = plan.payouts.len(),
            "item royalties distributed"
        );
        for payout in &plan.payouts {
            self.emit(AuctionEvent::RoyaltyPaid {
                auction: id,
                tier: payout.tier,
                recipient: payout.recipient,
                amount: payout.amount,
            });
        }
        Ok(plan)
    }

    /// Distribute the residual of every winning slot: payment splits, then
    /// the platform fee into the royalty reserve, then the creator.
    ///
    /// # Errors
    /// `NotFinalized`, `AlreadyDistributed`, `NotCaptured` for a winning slot
    /// never captured, `RoyaltiesPending` while an item's royalties are unpaid.
    pub fn distribute_auction_revenue(&mut self, id: AuctionId) -> Result<AuctionRevenuePlan> {
        let auction = self.registry.get(id)?;
        if !auction.finalized {
            return Err(AuctionError::NotFinalized(id));
        }
        let key = DistributionKey::AuctionRevenue(id);
        if self.distributions.is_distributed(&key) {
            return Err(AuctionError::AlreadyDistributed {
                what: key.to_string(),
            });
        }
        let slots: Vec<u32> = auction.winning_slots().map(|s| s.index).collect();
        let mut residual = Decimal::ZERO;
        for slot in &slots {
            let slot = *slot;
            if !self.revenue.is_captured(id, slot) {
                return Err(AuctionError::NotCaptured { auction: id, slot });
            }
            if !self.revenue.royalties_complete(id, slot) {
                return Err(AuctionError::RoyaltiesPending { auction: id, slot });
            }
            residual = residual
                .checked_add(self.revenue.residual(id, slot))
                .ok_or(AuctionError::ArithmeticOverflow)?;
        }
        let currency = auction.currency;
        let plan = plan_auction_revenue(
            residual,
            &auction.payment_splits,
            self.config.platform_fee_bps,
            auction.creator,
        )?;

        self.distributions.mark_distributed(key)?;
        if let Err(e) = self.revenue.sweep(id, &slots) {
            self.distributions.unmark(&key);
            return Err(e);
        }
        if let Err(e) = self.reserve.credit(currency, plan.platform_fee) {
            self.revenue.unsweep(id, &slots);
            self.distributions.unmark(&key);
            return Err(e);
        }
        let transfers = plan.transfers();
        let recorded = payout_total(&transfers).and_then(|total| {
            self.conservation.record_outflow(currency, total)?;
            Ok(total)
        });
        let paid_out = match recorded {
            Ok(total) => total,
            Err(e) => {
                self.reserve.debit(currency, plan.platform_fee);
                self.revenue.unsweep(id, &slots);
                self.distributions.unmark(&key);
                return Err(e);
            }
        };
        if let Err(e) = self.custody.push_all(currency, &transfers) {
            self.conservation.revert_outflow(currency, paid_out);
            self.reserve.debit(currency, plan.platform_fee);
            self.revenue.unsweep(id, &slots);
            self.distributions.unmark(&key);
            tracing::warn!(auction = %id, error = %e, "auction revenue payout reverted");
            return Err(e);
        }
        self.registry.get_mut(id)?.revenue_distributed = true;

        tracing::info!(
            auction = %id,
            %residual,
            platform_fee = %plan.platform_fee,
            creator_amount = %plan.creator_amount,
            "auction revenue distributed"
        );
        for payout in &plan.split_payouts {
            self.emit(AuctionEvent::RoyaltyPaid {
                auction: id,
                tier: RoyaltyTier::PaymentSplit,
                recipient: payout.recipient,
                amount: payout.amount,
            });
        }
        self.emit(AuctionEvent::RevenueWithdrawn {
            auction: id,
            recipient: plan.creator,
            amount: plan.creator_amount,
        });
        Ok(plan)
    }

    /// Pay out the whole royalty reserve for `currency`. Platform owner only.
    ///
    /// # Errors
    /// `NotOwner`, `ZeroAmount` on an empty reserve, or a custody failure
    /// (the reserve is restored).
    pub fn withdraw_royalties(
        &mut self,
        caller: AccountId,
        currency: Currency,
        recipient: AccountId,
    ) -> Result<Decimal> {
        self.ensure_platform_owner(caller)?;
        let amount = self.reserve.drain(currency)?;
        if let Err(e) = self.conservation.record_outflow(currency, amount) {
            self.reserve.credit(currency, amount)?;
            return Err(e);
        }
        if let Err(e) = self.custody.push(currency, recipient, amount) {
            self.conservation.revert_outflow(currency, amount);
            self.reserve.credit(currency, amount)?;
            tracing::warn!(
                currency = %currency,
                recipient = %recipient,
                error = %e,
                "royalty withdrawal reverted"
            );
            return Err(e);
        }

        tracing::info!(
            currency = %currency,
            recipient = %recipient,
            %amount,
            "royalties withdrawn"
        );
        self.emit(AuctionEvent::RoyaltiesWithdrawn {
            currency,
            recipient,
            amount,
        });
        Ok(amount)
    }

    /// Set the platform fee applied to auction residuals. Platform owner only.
    ///
    /// # Errors
    /// `NotOwner`, `FeeTooHigh` for 1000 bps (10%) or more.
    pub fn set_platform_fee_bps(&mut self, caller: AccountId, bps: u32) -> Result<()> {
        self.ensure_platform_owner(caller)?;
        if bps >= constants::MAX_PLATFORM_FEE_BPS {
            return Err(AuctionError::FeeTooHigh {
                bps,
                max_exclusive: constants::MAX_PLATFORM_FEE_BPS,
            });
        }
        let previous = self.config.platform_fee_bps;
        self.config.platform_fee_bps = bps;

        tracing::info!(previous, bps, "platform fee updated");
        self.emit(AuctionEvent::PlatformFeeUpdated { bps });
        Ok(())
    }
}
