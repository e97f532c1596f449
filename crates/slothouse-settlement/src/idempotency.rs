//! Distribution idempotency guard: prevents double-payment.
//!
//! Each item's royalties and each auction's residual revenue can be
//! distributed once. A second attempt returns
//! [`AuctionError::AlreadyDistributed`] and moves nothing.
//!
//! Entries are never evicted: forgetting a key would reopen it for payment.

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};
use slothouse_types::{AuctionError, AuctionId, Result};

/// What has been distributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistributionKey {
    /// Royalties of one item, 1-based `item` index within its slot.
    ItemRoyalties { auction: AuctionId, slot: u32, item: usize },
    /// Residual revenue of a whole auction.
    AuctionRevenue(AuctionId),
}

impl fmt::Display for DistributionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ItemRoyalties {
                auction,
                slot,
                item,
            } => write!(f, "royalties of item {item} in slot {slot} of {auction}"),
            Self::AuctionRevenue(auction) => write!(f, "revenue of {auction}"),
        }
    }
}

pub struct DistributionGuard {
    distributed: HashSet<DistributionKey>,
}

impl DistributionGuard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            distributed: HashSet::new(),
        }
    }

    /// Mark `key` as distributed.
    ///
    /// # Errors
    /// [`AuctionError::AlreadyDistributed`] if it already was.
    pub fn mark_distributed(&mut self, key: DistributionKey) -> Result<()> {
        if !self.distributed.insert(key) {
            return Err(AuctionError::AlreadyDistributed {
                what: key.to_string(),
            });
        }
        Ok(())
    }

    /// Reopen `key` after the payout it guarded failed.
    pub fn unmark(&mut self, key: &DistributionKey) {
        self.distributed.remove(key);
    }

    #[must_use]
    pub fn is_distributed(&self, key: &DistributionKey) -> bool {
        self.distributed.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.distributed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distributed.is_empty()
    }
}

impl Default for DistributionGuard {
    fn default() -> Self {
        Self::new()
    }
}
