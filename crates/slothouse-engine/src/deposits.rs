//! Item deposits and depositor withdrawals.

use slothouse_custody::{FundsCustody, ItemCustody};
use slothouse_settlement::{RoyaltyRegistry, WithdrawalGuard};
use slothouse_types::{AccountId, AuctionEvent, AuctionId, ItemRef, Result};

use crate::{AuctionHouse, clock::Clock};

impl<E, R, C> AuctionHouse<E, R, C>
where
    E: FundsCustody + ItemCustody,
    R: RoyaltyRegistry,
    C: Clock,
{
    /// Place `items` into `slot`, taking them into custody. All or nothing.
    ///
    /// # Errors
    /// Everything [`DepositGate::check`](slothouse_custody::DepositGate::check)
    /// rejects, `SlotCapacityExceeded` and `ItemAlreadyDeposited` from the
    /// vault, and `ItemNotOwned` or `CustodyFailed` from the custody adapter.
    pub fn deposit_items(
        &mut self,
        caller: AccountId,
        id: AuctionId,
        slot: u32,
        items: &[ItemRef],
    ) -> Result<()> {
        let now = self.clock.now();
        let auction = self.registry.get(id)?;
        self.gate.check(auction, slot, caller, items, now)?;
        self.vault.deposit(id, slot, caller, items)?;

        for (i, item) in items.iter().enumerate() {
            if let Err(e) = self.custody.hold_item(*item, caller) {
                for held in &items[..i] {
                    if let Err(undo) = self.custody.release_item(*held, caller) {
                        tracing::error!(
                            auction = %id,
                            item = %held,
                            error = %undo,
                            "could not return item after failed deposit"
                        );
                    }
                }
                self.vault.remove_deposited(id, slot, caller, items.len())?;
                tracing::warn!(auction = %id, slot, item = %item, error = %e, "deposit reverted");
                return Err(e);
            }
        }

        tracing::info!(
            auction = %id,
            slot,
            depositor = %caller,
            count = items.len(),
            "items deposited"
        );
        for item in items {
            self.emit(AuctionEvent::ItemDeposited {
                auction: id,
                slot,
                depositor: caller,
                item: *item,
            });
        }
        Ok(())
    }

    /// Take back the caller's `count` most recent deposits from a slot that
    /// is not locked: before start, after cancellation, or after finalization
    /// left the slot without a winner.
    pub fn withdraw_deposited_items(
        &mut self,
        caller: AccountId,
        id: AuctionId,
        slot: u32,
        count: usize,
    ) -> Result<Vec<ItemRef>> {
        let now = self.clock.now();
        let auction = self.registry.get(id)?;
        if let Err(e) = WithdrawalGuard::check_deposit_withdrawal(auction, slot, now) {
            tracing::warn!(
                auction = %id,
                slot,
                depositor = %caller,
                error = %e,
                "deposit withdrawal refused"
            );
            return Err(e);
        }
        self.return_items(caller, id, slot, count)
    }

    /// Take back items from a finalized slot whose reserve was not met.
    pub fn withdraw_from_non_winning_slot(
        &mut self,
        caller: AccountId,
        id: AuctionId,
        slot: u32,
        count: usize,
    ) -> Result<Vec<ItemRef>> {
        let auction = self.registry.get(id)?;
        if let Err(e) = WithdrawalGuard::check_non_winning_withdrawal(auction, slot) {
            tracing::warn!(
                auction = %id,
                slot,
                depositor = %caller,
                error = %e,
                "non-winning withdrawal refused"
            );
            return Err(e);
        }
        self.return_items(caller, id, slot, count)
    }

    fn return_items(
        &mut self,
        caller: AccountId,
        id: AuctionId,
        slot: u32,
        count: usize,
    ) -> Result<Vec<ItemRef>> {
        self.gate.check_batch(count)?;
        let removed = self.vault.remove_deposited(id, slot, caller, count)?;
        if let Err(e) = self.release_batch(&removed, caller) {
            self.vault.restore_deposited(id, slot, caller, &removed);
            return Err(e);
        }

        tracing::info!(
            auction = %id,
            slot,
            depositor = %caller,
            count = removed.len(),
            "items returned to depositor"
        );
        for item in &removed {
            self.emit(AuctionEvent::ItemWithdrawn {
                auction: id,
                slot,
                depositor: caller,
                item: *item,
            });
        }
        Ok(removed)
    }
}
