//! Items held per (auction, slot).
//!
//! An item belongs to exactly one slot of one auction while it is in the
//! vault. Depositor withdrawals remove items outright; winner claims mark
//! them released so per-item royalty indices stay stable.

use std::collections::{HashMap, HashSet};

use slothouse_types::{AccountId, AuctionError, AuctionId, ItemRef, Result};

/// One item in custody.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustodiedItem {
    pub item: ItemRef,
    pub depositor: AccountId,
    /// Released to the slot winner.
    pub released: bool,
}

pub struct ItemVault {
    slots: HashMap<(AuctionId, u32), Vec<CustodiedItem>>,
    /// Where each unreleased item currently sits.
    locations: HashMap<ItemRef, (AuctionId, u32)>,
    max_items_per_slot: usize,
}

impl ItemVault {
    #[must_use]
    pub fn new(max_items_per_slot: usize) -> Self {
        Self {
            slots: HashMap::new(),
            locations: HashMap::new(),
            max_items_per_slot,
        }
    }

    /// Place `items` into the slot. All or nothing.
    ///
    /// # Errors
    /// - `SlotCapacityExceeded` if the slot would exceed its item limit
    /// - `ItemAlreadyDeposited` if any item is already in custody
    pub fn deposit(
        &mut self,
        auction: AuctionId,
        slot: u32,
        depositor: AccountId,
        items: &[ItemRef],
    ) -> Result<()> {
        let held = self.item_count(auction, slot);
        if held + items.len() > self.max_items_per_slot {
            tracing::warn!(
                auction = %auction,
                slot,
                held,
                adding = items.len(),
                "slot item capacity exceeded"
            );
            return Err(AuctionError::SlotCapacityExceeded {
                held,
                adding: items.len(),
                max: self.max_items_per_slot,
            });
        }
        if let Some(dup) = items.iter().find(|i| self.locations.contains_key(*i)) {
            return Err(AuctionError::ItemAlreadyDeposited(*dup));
        }

        let list = self.slots.entry((auction, slot)).or_default();
        for item in items {
            list.push(CustodiedItem {
                item: *item,
                depositor,
                released: false,
            });
            self.locations.insert(*item, (auction, slot));
        }
        Ok(())
    }

    /// Take back the depositor's `count` most recently deposited items.
    ///
    /// # Errors
    /// - `NotDepositor` if the caller holds nothing in the slot
    /// - `InsufficientItems` if `count` exceeds what the caller holds
    pub fn remove_deposited(
        &mut self,
        auction: AuctionId,
        slot: u32,
        depositor: AccountId,
        count: usize,
    ) -> Result<Vec<ItemRef>> {
        let available = self.held_by(auction, slot, depositor);
        if available == 0 {
            return Err(AuctionError::NotDepositor(depositor));
        }
        if count > available {
            return Err(AuctionError::InsufficientItems {
                requested: count,
                available,
            });
        }
        let Some(list) = self.slots.get_mut(&(auction, slot)) else {
            return Err(AuctionError::NotDepositor(depositor));
        };

        let mut removed = Vec::with_capacity(count);
        let mut idx = list.len();
        while removed.len() < count && idx > 0 {
            idx -= 1;
            if list[idx].depositor == depositor && !list[idx].released {
                let entry = list.remove(idx);
                self.locations.remove(&entry.item);
                removed.push(entry.item);
            }
        }
        removed.reverse();
        Ok(removed)
    }

    /// Put items back after a failed external release.
    pub fn restore_deposited(
        &mut self,
        auction: AuctionId,
        slot: u32,
        depositor: AccountId,
        items: &[ItemRef],
    ) {
        let list = self.slots.entry((auction, slot)).or_default();
        for item in items {
            list.push(CustodiedItem {
                item: *item,
                depositor,
                released: false,
            });
            self.locations.insert(*item, (auction, slot));
        }
    }

    /// Mark up to `max_count` unreleased items as released to the winner,
    /// in deposit order. Returns an empty list when nothing is left.
    pub fn release_to_winner(
        &mut self,
        auction: AuctionId,
        slot: u32,
        max_count: usize,
    ) -> Vec<ItemRef> {
        let Some(list) = self.slots.get_mut(&(auction, slot)) else {
            return Vec::new();
        };
        let mut released = Vec::new();
        for entry in list.iter_mut().filter(|e| !e.released).take(max_count) {
            entry.released = true;
            self.locations.remove(&entry.item);
            released.push(entry.item);
        }
        released
    }

    /// Undo [`release_to_winner`](Self::release_to_winner) for `items`.
    pub fn unrelease(&mut self, auction: AuctionId, slot: u32, items: &[ItemRef]) {
        let wanted: HashSet<&ItemRef> = items.iter().collect();
        if let Some(list) = self.slots.get_mut(&(auction, slot)) {
            for entry in list.iter_mut().filter(|e| wanted.contains(&e.item)) {
                entry.released = false;
                self.locations.insert(entry.item, (auction, slot));
            }
        }
    }

    /// Items in the slot, in deposit order, including released ones.
    #[must_use]
    pub fn items(&self, auction: AuctionId, slot: u32) -> &[CustodiedItem] {
        self.slots
            .get(&(auction, slot))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn item_count(&self, auction: AuctionId, slot: u32) -> usize {
        self.items(auction, slot).len()
    }

    /// Item at a 1-based index.
    pub fn item_at(&self, auction: AuctionId, slot: u32, index: usize) -> Result<&CustodiedItem> {
        let items = self.items(auction, slot);
        index
            .checked_sub(1)
            .and_then(|i| items.get(i))
            .ok_or(AuctionError::InvalidItemIndex {
                index,
                count: items.len(),
            })
    }

    /// Unreleased items deposited by `depositor` in the slot.
    #[must_use]
    pub fn held_by(&self, auction: AuctionId, slot: u32, depositor: AccountId) -> usize {
        self.items(auction, slot)
            .iter()
            .filter(|e| e.depositor == depositor && !e.released)
            .count()
    }

    #[must_use]
    pub fn unreleased(&self, auction: AuctionId, slot: u32) -> usize {
        self.items(auction, slot)
            .iter()
            .filter(|e| !e.released)
            .count()
    }

    /// `(auction, slot)` currently holding `item`.
    #[must_use]
    pub fn location_of(&self, item: &ItemRef) -> Option<(AuctionId, u32)> {
        self.locations.get(item).copied()
    }
}
