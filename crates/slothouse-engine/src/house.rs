//! The auction house: single-writer facade over every component.
//!
//! Each state-changing method takes `&mut self`, so operations are totally
//! ordered and a custody adapter cannot call back in mid-operation. Every
//! method validates first, then mutates internal state, and only then moves
//! funds or items. When the external move fails the internal change is
//! reverted before the error is returned.

use rust_decimal::Decimal;
use slothouse_custody::{
    BidLedger, CustodiedItem, DepositGate, FundsCustody, ItemCustody, ItemVault,
};
use slothouse_settlement::{
    DistributionGuard, FundsConservation, RevenueBook, RevenueState, RoyaltyRegistry,
    RoyaltyReserve,
};
use slothouse_types::{
    AccountId, Auction, AuctionError, AuctionEvent, AuctionId, AuctionPhase, Currency,
    EngineConfig, ItemRef, Result,
};

use crate::{clock::Clock, registry::AuctionRegistry};

pub struct AuctionHouse<E, R, C> {
    pub(crate) config: EngineConfig,
    pub(crate) registry: AuctionRegistry,
    pub(crate) ledger: BidLedger,
    pub(crate) vault: ItemVault,
    pub(crate) gate: DepositGate,
    pub(crate) revenue: RevenueBook,
    pub(crate) distributions: DistributionGuard,
    pub(crate) reserve: RoyaltyReserve,
    pub(crate) conservation: FundsConservation,
    pub(crate) events: Vec<AuctionEvent>,
    pub(crate) custody: E,
    pub(crate) royalties: R,
    pub(crate) clock: C,
}

impl<E, R, C> AuctionHouse<E, R, C>
where
    E: FundsCustody + ItemCustody,
    R: RoyaltyRegistry,
    C: Clock,
{
    /// Build a house from a validated configuration and its collaborators.
    ///
    /// # Errors
    /// `Configuration` if `config` does not validate.
    pub fn new(config: EngineConfig, custody: E, royalties: R, clock: C) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            platform_owner = %config.platform_owner,
            max_slots = config.max_slots,
            max_items_per_slot = config.max_items_per_slot,
            platform_fee_bps = config.platform_fee_bps,
            "auction house started"
        );
        Ok(Self {
            ledger: BidLedger::new(),
            vault: ItemVault::new(config.max_items_per_slot),
            gate: DepositGate::new(config.max_items_per_call),
            registry: AuctionRegistry::new(),
            revenue: RevenueBook::new(),
            distributions: DistributionGuard::new(),
            reserve: RoyaltyReserve::new(),
            conservation: FundsConservation::new(),
            events: Vec::new(),
            config,
            custody,
            royalties,
            clock,
        })
    }

    // -----------------------------------------------------------------------
    // Collaborators
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn custody(&self) -> &E {
        &self.custody
    }

    /// Direct access to the custody adapter, for funding wallets and the like.
    pub fn custody_mut(&mut self) -> &mut E {
        &mut self.custody
    }

    #[must_use]
    pub fn royalty_registry(&self) -> &R {
        &self.royalties
    }

    pub fn royalty_registry_mut(&mut self) -> &mut R {
        &mut self.royalties
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    pub(crate) fn emit(&mut self, event: AuctionEvent) {
        tracing::trace!(event = %event, auction = ?event.auction(), "event");
        self.events.push(event);
    }

    /// Events not yet drained, oldest first.
    #[must_use]
    pub fn events(&self) -> &[AuctionEvent] {
        &self.events
    }

    /// Take every pending event, oldest first.
    pub fn drain_events(&mut self) -> Vec<AuctionEvent> {
        std::mem::take(&mut self.events)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn auction(&self, id: AuctionId) -> Result<&Auction> {
        self.registry.get(id)
    }

    pub fn phase(&self, id: AuctionId) -> Result<AuctionPhase> {
        Ok(self.registry.get(id)?.phase(self.clock.now()))
    }

    pub fn slot_winner(&self, id: AuctionId, slot: u32) -> Result<Option<AccountId>> {
        Ok(self.registry.get(id)?.slot(slot)?.winner)
    }

    pub fn slot_reserve(&self, id: AuctionId, slot: u32) -> Result<Decimal> {
        Ok(self.registry.get(id)?.slot(slot)?.reserve)
    }

    /// Items of a slot in deposit order, including ones already claimed.
    pub fn slot_items(&self, id: AuctionId, slot: u32) -> Result<&[CustodiedItem]> {
        self.registry.get(id)?.slot(slot)?;
        Ok(self.vault.items(id, slot))
    }

    /// `(auction, slot)` currently holding `item`, if it is in custody.
    #[must_use]
    pub fn item_location(&self, item: &ItemRef) -> Option<(AuctionId, u32)> {
        self.vault.location_of(item)
    }

    #[must_use]
    pub fn bid_balance(&self, id: AuctionId, bidder: AccountId) -> Decimal {
        self.ledger.balance(id, bidder)
    }

    pub fn revenue_state(&self, id: AuctionId, slot: u32) -> Result<RevenueState> {
        self.registry.get(id)?.slot(slot)?;
        Ok(self.revenue.state(id, slot))
    }

    #[must_use]
    pub fn royalty_reserve(&self, currency: Currency) -> Decimal {
        self.reserve.balance(currency)
    }

    #[must_use]
    pub fn platform_fee_bps(&self) -> u32 {
        self.config.platform_fee_bps
    }

    #[must_use]
    pub fn auction_count(&self) -> usize {
        self.registry.len()
    }

    // -----------------------------------------------------------------------
    // Shared internals
    // -----------------------------------------------------------------------

    pub(crate) fn ensure_platform_owner(&self, caller: AccountId) -> Result<()> {
        if caller == self.config.platform_owner {
            Ok(())
        } else {
            Err(AuctionError::NotOwner { caller })
        }
    }

    /// Release `items` to `to`, all or nothing.
    ///
    /// On a failed release the items already handed over are taken back into
    /// custody before the error is returned.
    pub(crate) fn release_batch(&mut self, items: &[ItemRef], to: AccountId) -> Result<()> {
        for (i, item) in items.iter().enumerate() {
            if let Err(e) = self.custody.release_item(*item, to) {
                for released in &items[..i] {
                    if let Err(undo) = self.custody.hold_item(*released, to) {
                        tracing::error!(
                            item = %released,
                            recipient = %to,
                            error = %undo,
                            "could not re-hold item after failed release"
                        );
                    }
                }
                tracing::warn!(
                    item = %item,
                    recipient = %to,
                    error = %e,
                    "item release failed, batch reverted"
                );
                return Err(e);
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Funds conservation
    // -----------------------------------------------------------------------

    /// What the house still owes in `currency`: open bid balances (captured
    /// winners excluded), undistributed residual pools, and the royalty reserve.
    ///
    /// Visits only auctions in `currency`, costing one pass over each one's
    /// bidders and slots.
    pub fn liabilities(&self, currency: Currency) -> Result<Decimal> {
        let overflow = || AuctionError::ArithmeticOverflow;
        let mut total = self.reserve.balance(currency);
        for auction in self.registry.in_currency(currency) {
            total = total
                .checked_add(self.ledger.outstanding(auction.id)?)
                .ok_or_else(overflow)?;
            for slot in &auction.slots {
                let captured_winner = slot
                    .winner
                    .filter(|_| self.revenue.is_captured(auction.id, slot.index));
                if let Some(winner) = captured_winner {
                    total = total
                        .checked_sub(self.ledger.balance(auction.id, winner))
                        .ok_or_else(overflow)?;
                }
                total = total
                    .checked_add(self.revenue.residual(auction.id, slot.index))
                    .ok_or_else(overflow)?;
            }
        }
        Ok(total)
    }

    /// Check that recorded inflows minus outflows equal both the liabilities
    /// and what custody actually holds.
    ///
    /// # Errors
    /// `ConservationViolation` on any mismatch.
    pub fn verify_funds_conservation(&self, currency: Currency) -> Result<()> {
        self.conservation.verify(currency, self.liabilities(currency)?)?;
        let expected = self.conservation.expected_held(currency);
        let held = self.custody.held(currency);
        if held != expected {
            tracing::error!(currency = %currency, %held, %expected, "custody balance drifted");
            return Err(AuctionError::ConservationViolation {
                reason: format!("{currency}: custody holds {held}, books say {expected}"),
            });
        }
        Ok(())
    }

    /// [`verify_funds_conservation`](Self::verify_funds_conservation) for every
    /// currency that has moved.
    pub fn verify_all_funds(&self) -> Result<()> {
        for currency in self.conservation.tracked_currencies() {
            self.verify_funds_conservation(currency)?;
        }
        Ok(())
    }
}
