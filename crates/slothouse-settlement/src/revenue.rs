//! Per-slot revenue capture and residual pools.
//!
//! A capture is an immutable snapshot of the winning balance, taken once.
//! Item royalties are paid out of the slot's residual pool; whatever is left
//! is swept into the auction-level distribution.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use slothouse_types::{AuctionError, AuctionId, Result};

use crate::waterfall::per_item_base;

/// Revenue state of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevenueState {
    NotCaptured,
    /// Captured; residual not yet swept into the auction distribution.
    Captured { amount: Decimal },
    /// Residual swept and paid out.
    Distributed { amount: Decimal },
}

#[derive(Debug, Clone)]
struct SlotRevenue {
    captured: Decimal,
    item_count: usize,
    residual: Decimal,
    items_distributed: usize,
    swept: bool,
}

pub struct RevenueBook {
    slots: HashMap<(AuctionId, u32), SlotRevenue>,
}

impl RevenueBook {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Snapshot `amount` as the slot's captured revenue.
    ///
    /// `item_count` is frozen with it: the per-item base never changes after
    /// capture.
    ///
    /// # Errors
    /// `AlreadyCaptured` on a second capture.
    pub fn capture(
        &mut self,
        auction: AuctionId,
        slot: u32,
        amount: Decimal,
        item_count: usize,
    ) -> Result<()> {
        if self.slots.contains_key(&(auction, slot)) {
            return Err(AuctionError::AlreadyCaptured { auction, slot });
        }
        self.slots.insert(
            (auction, slot),
            SlotRevenue {
                captured: amount,
                item_count,
                residual: amount,
                items_distributed: 0,
                swept: false,
            },
        );
        Ok(())
    }

    fn get(&self, auction: AuctionId, slot: u32) -> Result<&SlotRevenue> {
        self.slots
            .get(&(auction, slot))
            .ok_or(AuctionError::NotCaptured { auction, slot })
    }

    fn get_mut(&mut self, auction: AuctionId, slot: u32) -> Result<&mut SlotRevenue> {
        self.slots
            .get_mut(&(auction, slot))
            .ok_or(AuctionError::NotCaptured { auction, slot })
    }

    #[must_use]
    pub fn is_captured(&self, auction: AuctionId, slot: u32) -> bool {
        self.slots.contains_key(&(auction, slot))
    }

    #[must_use]
    pub fn state(&self, auction: AuctionId, slot: u32) -> RevenueState {
        match self.slots.get(&(auction, slot)) {
            None => RevenueState::NotCaptured,
            Some(s) if s.swept => RevenueState::Distributed { amount: s.captured },
            Some(s) => RevenueState::Captured { amount: s.captured },
        }
    }

    /// Items the capture was split across.
    pub fn captured_items(&self, auction: AuctionId, slot: u32) -> Result<usize> {
        Ok(self.get(auction, slot)?.item_count)
    }

    /// `floor(captured / items)` for the slot.
    pub fn per_item_base(&self, auction: AuctionId, slot: u32) -> Result<Decimal> {
        let s = self.get(auction, slot)?;
        per_item_base(s.captured, s.item_count)
    }

    /// Take an item's royalty payouts out of the residual pool.
    pub fn record_item_royalties(
        &mut self,
        auction: AuctionId,
        slot: u32,
        paid: Decimal,
    ) -> Result<()> {
        let s = self.get_mut(auction, slot)?;
        if paid > s.residual {
            return Err(AuctionError::Internal(format!(
                "royalties {paid} exceed residual {} of slot {slot} of {auction}",
                s.residual
            )));
        }
        s.residual -= paid;
        s.items_distributed += 1;
        Ok(())
    }

    /// Undo [`record_item_royalties`](Self::record_item_royalties).
    pub fn revert_item_royalties(&mut self, auction: AuctionId, slot: u32, paid: Decimal) {
        if let Some(s) = self.slots.get_mut(&(auction, slot)) {
            // Restores a value the pool held before, capped at the capture.
            s.residual = s.residual.saturating_add(paid).min(s.captured);
            s.items_distributed = s.items_distributed.saturating_sub(1);
        }
    }

    /// Whether every item of the slot has had its royalties distributed.
    #[must_use]
    pub fn royalties_complete(&self, auction: AuctionId, slot: u32) -> bool {
        self.slots
            .get(&(auction, slot))
            .is_some_and(|s| s.items_distributed >= s.item_count)
    }

    #[must_use]
    pub fn residual(&self, auction: AuctionId, slot: u32) -> Decimal {
        self.slots
            .get(&(auction, slot))
            .filter(|s| !s.swept)
            .map_or(Decimal::ZERO, |s| s.residual)
    }

    /// Sweep the residual pools of `slots` to zero and return their sum.
    pub fn sweep(&mut self, auction: AuctionId, slots: &[u32]) -> Result<Decimal> {
        let mut total = Decimal::ZERO;
        for slot in slots {
            total = total
                .checked_add(self.residual(auction, *slot))
                .ok_or(AuctionError::ArithmeticOverflow)?;
        }
        for slot in slots {
            self.get_mut(auction, *slot)?.swept = true;
        }
        Ok(total)
    }

    /// Undo [`sweep`](Self::sweep).
    pub fn unsweep(&mut self, auction: AuctionId, slots: &[u32]) {
        for slot in slots {
            if let Some(s) = self.slots.get_mut(&(auction, *slot)) {
                s.swept = false;
            }
        }
    }
}

impl Default for RevenueBook {
    fn default() -> Self {
        Self::new()
    }
}
