//! Auction registry: creation, cancellation, whitelist and reserve edits.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rust_decimal::Decimal;
use slothouse_custody::{FundsCustody, ItemCustody};
use slothouse_settlement::RoyaltyRegistry;
use slothouse_types::{
    AccountId, Auction, AuctionError, AuctionEvent, AuctionId, AuctionParams, Currency, Result,
    Slot, validate_split_total,
};

use crate::{AuctionHouse, clock::Clock};

/// Owner of every [`Auction`] record, keyed by id.
pub struct AuctionRegistry {
    auctions: BTreeMap<AuctionId, Auction>,
    /// Auction ids per payment currency, in creation order.
    by_currency: HashMap<Currency, Vec<AuctionId>>,
    last_id: AuctionId,
}

impl AuctionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            auctions: BTreeMap::new(),
            by_currency: HashMap::new(),
            last_id: AuctionId(0),
        }
    }

    /// Id the next inserted auction will receive.
    #[must_use]
    pub fn next_id(&self) -> AuctionId {
        self.last_id.next()
    }

    pub(crate) fn insert(&mut self, auction: Auction) -> AuctionId {
        let id = auction.id;
        self.last_id = id;
        self.by_currency.entry(auction.currency).or_default().push(id);
        self.auctions.insert(id, auction);
        id
    }

    pub fn get(&self, id: AuctionId) -> Result<&Auction> {
        self.auctions.get(&id).ok_or(AuctionError::AuctionNotFound(id))
    }

    pub(crate) fn get_mut(&mut self, id: AuctionId) -> Result<&mut Auction> {
        self.auctions
            .get_mut(&id)
            .ok_or(AuctionError::AuctionNotFound(id))
    }

    /// Auctions paid in `currency`, oldest first.
    pub fn in_currency(&self, currency: Currency) -> impl Iterator<Item = &Auction> {
        self.by_currency
            .get(&currency)
            .into_iter()
            .flatten()
            .filter_map(|id| self.auctions.get(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.auctions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.auctions.is_empty()
    }
}

impl Default for AuctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Reserves must be whole, non-negative base units.
fn validate_reserves(reserves: &[Decimal]) -> Result<()> {
    match reserves
        .iter()
        .find(|r| r.is_sign_negative() || !r.fract().is_zero())
    {
        Some(bad) => Err(AuctionError::InvalidAmount(*bad)),
        None => Ok(()),
    }
}

/// Rejects edits once an auction is canceled or has started.
fn ensure_editable(auction: &Auction, now: chrono::DateTime<chrono::Utc>) -> Result<()> {
    if auction.canceled {
        return Err(AuctionError::AuctionCanceled(auction.id));
    }
    if auction.window.has_started(now) {
        return Err(AuctionError::AlreadyStarted(auction.id));
    }
    Ok(())
}

impl<E, R, C> AuctionHouse<E, R, C>
where
    E: FundsCustody + ItemCustody,
    R: RoyaltyRegistry,
    C: Clock,
{
    /// Create an auction owned by `creator`.
    ///
    /// # Errors
    /// - `InvalidWindow` for a past start, `end <= start`, or zero extension
    /// - `InvalidSlotCount` outside `1..=max_slots`
    /// - `InvalidReserveArity` unless there are 0 or `slot_count` reserves
    /// - `InvalidSplitTotal` if payment splits exceed 10000 bps
    /// - `UnsupportedCurrency` for tokens the house does not accept
    pub fn create_auction(
        &mut self,
        creator: AccountId,
        params: AuctionParams,
    ) -> Result<AuctionId> {
        let now = self.clock.now();
        params.window.validate(now)?;
        if params.slot_count == 0 || params.slot_count > self.config.max_slots {
            return Err(AuctionError::InvalidSlotCount {
                count: params.slot_count,
                max: self.config.max_slots,
            });
        }
        if !params.reserves.is_empty() && params.reserves.len() != params.slot_count as usize {
            return Err(AuctionError::InvalidReserveArity {
                expected: params.slot_count,
                got: params.reserves.len(),
            });
        }
        validate_reserves(&params.reserves)?;
        validate_split_total(&params.payment_splits)?;
        if !self.config.supports(params.currency) {
            return Err(AuctionError::UnsupportedCurrency(params.currency.to_string()));
        }

        let whitelist = params
            .whitelisting()
            .then(|| params.whitelist.iter().copied().collect::<BTreeSet<_>>());
        let slots = (1..=params.slot_count)
            .map(|index| {
                let reserve = params
                    .reserves
                    .get(index as usize - 1)
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                Slot::new(index, reserve)
            })
            .collect();
        let id = self.registry.next_id();
        let auction = Auction {
            id,
            creator,
            window: params.window,
            currency: params.currency,
            whitelist,
            payment_splits: params.payment_splits,
            deposit_policy: params
                .deposit_policy
                .unwrap_or(self.config.default_deposit_policy),
            slots,
            canceled: false,
            finalized: false,
            revenue_distributed: false,
            ranking_root: None,
            created_at: now,
        };
        self.registry.insert(auction);

        tracing::info!(
            auction = %id,
            creator = %creator,
            slots = params.slot_count,
            currency = %params.currency,
            "auction created"
        );
        self.emit(AuctionEvent::AuctionCreated {
            auction: id,
            creator,
            slot_count: params.slot_count,
            currency: params.currency,
        });
        Ok(id)
    }

    /// Cancel an auction before it starts. Irreversible; every deposited
    /// item becomes withdrawable.
    pub fn cancel_auction(&mut self, caller: AccountId, id: AuctionId) -> Result<()> {
        let now = self.clock.now();
        let auction = self.registry.get_mut(id)?;
        auction.ensure_owner(caller)?;
        ensure_editable(auction, now)?;
        auction.canceled = true;

        tracing::info!(auction = %id, "auction canceled");
        self.emit(AuctionEvent::AuctionCanceled { auction: id });
        Ok(())
    }

    /// Add depositors to an auction's whitelist.
    ///
    /// # Errors
    /// `NotOwner`, `AuctionCanceled`, `AlreadyStarted`, or
    /// `WhitelistNotSupported` when the auction was created without one.
    pub fn whitelist_addresses(
        &mut self,
        caller: AccountId,
        id: AuctionId,
        addresses: &[AccountId],
    ) -> Result<()> {
        let now = self.clock.now();
        let auction = self.registry.get_mut(id)?;
        auction.ensure_owner(caller)?;
        ensure_editable(auction, now)?;
        let Some(whitelist) = auction.whitelist.as_mut() else {
            return Err(AuctionError::WhitelistNotSupported(id));
        };
        whitelist.extend(addresses.iter().copied());

        tracing::debug!(auction = %id, added = addresses.len(), "whitelist extended");
        self.emit(AuctionEvent::AddressesWhitelisted {
            auction: id,
            addresses: addresses.to_vec(),
        });
        Ok(())
    }

    /// Replace every slot's minimum reserve.
    pub fn set_minimum_reserves(
        &mut self,
        caller: AccountId,
        id: AuctionId,
        reserves: &[Decimal],
    ) -> Result<()> {
        let now = self.clock.now();
        let auction = self.registry.get_mut(id)?;
        auction.ensure_owner(caller)?;
        ensure_editable(auction, now)?;
        if reserves.len() != auction.slots.len() {
            return Err(AuctionError::InvalidReserveArity {
                expected: auction.slot_count(),
                got: reserves.len(),
            });
        }
        validate_reserves(reserves)?;
        for (slot, reserve) in auction.slots.iter_mut().zip(reserves) {
            slot.reserve = *reserve;
        }

        tracing::debug!(auction = %id, "reserves updated");
        self.emit(AuctionEvent::ReservesUpdated {
            auction: id,
            reserves: reserves.to_vec(),
        });
        Ok(())
    }

    /// List or delist a fungible token as auction currency. Platform owner only.
    ///
    /// Delisting does not affect auctions already created in that token.
    pub fn set_supported_currency(
        &mut self,
        caller: AccountId,
        currency: Currency,
        supported: bool,
    ) -> Result<()> {
        self.ensure_platform_owner(caller)?;
        match currency {
            Currency::Native if supported => Ok(()),
            Currency::Native => Err(AuctionError::Configuration(
                "native currency cannot be delisted".into(),
            )),
            Currency::Token(token) if token.is_zero() => {
                Err(AuctionError::UnsupportedCurrency(currency.to_string()))
            }
            Currency::Token(token) => {
                if supported {
                    self.config.supported_tokens.insert(token);
                } else {
                    self.config.supported_tokens.remove(&token);
                }
                tracing::info!(currency = %currency, supported, "currency support changed");
                Ok(())
            }
        }
    }
}
