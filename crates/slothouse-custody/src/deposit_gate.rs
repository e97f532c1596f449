//! Deposit gate: validates an item deposit before any state changes.
//!
//! - **Fail-closed**: the first failing check rejects the whole batch
//! - **No bypass**: every deposit path goes through [`DepositGate::check`]
//! - **Bounded work**: batches larger than the per-call cap are refused

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use slothouse_types::{AccountId, Auction, AuctionError, ItemRef, Result};

pub struct DepositGate {
    max_items_per_call: usize,
}

impl DepositGate {
    #[must_use]
    pub fn new(max_items_per_call: usize) -> Self {
        Self { max_items_per_call }
    }

    #[must_use]
    pub fn max_items_per_call(&self) -> usize {
        self.max_items_per_call
    }

    /// Validate a deposit of `items` into `slot` by `depositor` at `now`.
    ///
    /// Capacity and custody-level duplicates are checked by the vault.
    pub fn check(
        &self,
        auction: &Auction,
        slot: u32,
        depositor: AccountId,
        items: &[ItemRef],
        now: DateTime<Utc>,
    ) -> Result<()> {
        // 1. Lifecycle
        if auction.canceled {
            return Err(AuctionError::AuctionCanceled(auction.id));
        }
        if auction.finalized || !auction.deposit_policy.accepts(&auction.window, now) {
            return Err(AuctionError::DepositsClosed(auction.id));
        }

        // 2. Slot
        auction.slot(slot)?;

        // 3. Batch shape
        self.check_batch(items.len())?;
        if items.iter().any(|i| i.collection.is_zero()) {
            return Err(AuctionError::ZeroCollectionAddress);
        }
        let mut seen = HashSet::with_capacity(items.len());
        if let Some(dup) = items.iter().find(|i| !seen.insert(**i)) {
            return Err(AuctionError::InvalidDeposit {
                reason: format!("item {dup} appears twice in the batch"),
            });
        }

        // 4. Whitelist
        if !auction.is_whitelisted(depositor) {
            return Err(AuctionError::NotWhitelisted(depositor));
        }
        Ok(())
    }

    /// Reject empty batches and batches over the per-call cap.
    pub fn check_batch(&self, count: usize) -> Result<()> {
        if count == 0 {
            return Err(AuctionError::InvalidDeposit {
                reason: "batch is empty".into(),
            });
        }
        if count > self.max_items_per_call {
            return Err(AuctionError::BatchTooLarge {
                got: count,
                max: self.max_items_per_call,
            });
        }
        Ok(())
    }
}
