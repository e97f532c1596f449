//! Ranking root: a SHA-256 commitment to a slot assignment.
//!
//! Re-running finalization on the same standings must yield the same root.
//! Recording it on the auction lets any observer check the assignment
//! without replaying every bid.

use sha2::{Digest, Sha256};
use slothouse_types::{Auction, AuctionError, AuctionId, Result, constants::RANKING_ROOT_DOMAIN};

use crate::SlotAssignment;

/// Compute the ranking root over assignments in slot order.
#[must_use]
pub fn compute_ranking_root(auction: AuctionId, assignments: &[SlotAssignment]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(RANKING_ROOT_DOMAIN);
    hasher.update(auction.0.to_le_bytes());
    hasher.update((assignments.len() as u64).to_le_bytes());

    for a in assignments {
        hasher.update(a.slot.to_le_bytes());
        hasher.update(a.bidder.0.as_bytes());
        hasher.update(a.balance.normalize().to_string().as_bytes());
    }

    let result = hasher.finalize();
    let mut root = [0u8; 32];
    root.copy_from_slice(&result);
    root
}

/// Recompute the root and compare with `expected_root`.
#[must_use]
pub fn verify_ranking_root(
    auction: AuctionId,
    assignments: &[SlotAssignment],
    expected_root: &[u8; 32],
) -> bool {
    compute_ranking_root(auction, assignments) == *expected_root
}

/// Rebuild the assignment from the winners recorded on a finalized auction.
#[must_use]
pub fn recorded_assignments(auction: &Auction) -> Vec<SlotAssignment> {
    auction
        .slots
        .iter()
        .filter_map(|s| {
            s.winner.map(|bidder| SlotAssignment {
                slot: s.index,
                bidder,
                balance: s.winning_bid,
            })
        })
        .collect()
}

/// Check the recorded winners of a finalized auction against its root.
///
/// # Errors
/// `NotFinalized` without a recorded root, `Internal` on a mismatch.
pub fn verify_recorded_ranking(auction: &Auction) -> Result<()> {
    let root = auction
        .ranking_root
        .ok_or(AuctionError::NotFinalized(auction.id))?;
    if verify_ranking_root(auction.id, &recorded_assignments(auction), &root) {
        return Ok(());
    }
    tracing::error!(
        auction = %auction.id,
        root = %hex::encode(root),
        "recorded winners diverge from ranking root"
    );
    Err(AuctionError::Internal(format!(
        "recorded winners of {} do not match ranking root {}",
        auction.id,
        hex::encode(root)
    )))
}
