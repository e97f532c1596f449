//! Canonical ranking of bidders and slot assignment.
//!
//! ```text
//! rank_bidders(auction, standings, slot_count) -> Ranking
//! ```
//!
//! ## Algorithm
//!
//! 1. Drop standings with a zero balance
//! 2. Sort by balance descending, then first-bid sequence ascending, then
//!    account id ascending
//! 3. Take the top `min(slot_count, bidders)`
//! 4. Assign rank k to slot k
//! 5. Commit to the assignment with a SHA-256 ranking root

use std::cmp::Ordering;

use rust_decimal::Decimal;
use slothouse_types::{AccountId, AuctionId, BidderStanding};

use crate::determinism::compute_ranking_root;

/// One winner placed into one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAssignment {
    /// 1-based slot index, equal to the winner's rank.
    pub slot: u32,
    pub bidder: AccountId,
    pub balance: Decimal,
}

/// Result of ranking an ended auction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranking {
    pub auction: AuctionId,
    /// Winners in slot order.
    pub assignments: Vec<SlotAssignment>,
    /// Bidders with a positive balance that did not get a slot, in rank order.
    pub losers: Vec<BidderStanding>,
    pub ranking_root: [u8; 32],
}

impl Ranking {
    #[must_use]
    pub fn winner_of(&self, slot: u32) -> Option<AccountId> {
        self.assignments
            .iter()
            .find(|a| a.slot == slot)
            .map(|a| a.bidder)
    }

    #[must_use]
    pub fn is_winner(&self, bidder: AccountId) -> bool {
        self.assignments.iter().any(|a| a.bidder == bidder)
    }

    /// `(slot, winner)` pairs in slot order.
    #[must_use]
    pub fn winners(&self) -> Vec<(u32, AccountId)> {
        self.assignments.iter().map(|a| (a.slot, a.bidder)).collect()
    }
}

/// Total order used for ranking. `Less` means `a` ranks ahead of `b`.
#[must_use]
pub fn compare_standings(a: &BidderStanding, b: &BidderStanding) -> Ordering {
    b.balance
        .cmp(&a.balance)
        .then_with(|| a.first_bid_seq.cmp(&b.first_bid_seq))
        .then_with(|| a.bidder.cmp(&b.bidder))
}

/// All positive standings in canonical rank order.
#[must_use]
pub fn canonical_order(standings: &[BidderStanding]) -> Vec<BidderStanding> {
    let mut ranked: Vec<BidderStanding> = standings
        .iter()
        .filter(|s| s.balance > Decimal::ZERO)
        .copied()
        .collect();
    ranked.sort_by(compare_standings);
    ranked
}

/// Rank bidders and assign the top `slot_count` to slots 1..=k.
#[must_use]
pub fn rank_bidders(auction: AuctionId, standings: &[BidderStanding], slot_count: u32) -> Ranking {
    let ranked = canonical_order(standings);
    let winners = ranked.len().min(slot_count as usize);

    let assignments: Vec<SlotAssignment> = ranked[..winners]
        .iter()
        .zip(1u32..)
        .map(|(s, slot)| SlotAssignment {
            slot,
            bidder: s.bidder,
            balance: s.balance,
        })
        .collect();
    let losers = ranked[winners..].to_vec();
    let ranking_root = compute_ranking_root(auction, &assignments);

    tracing::debug!(
        auction = %auction,
        bidders = ranked.len(),
        winners = assignments.len(),
        root = %hex::encode(&ranking_root[..8]),
        "ranked bidders"
    );

    Ranking {
        auction,
        assignments,
        losers,
        ranking_root,
    }
}

#[cfg(test)]
mod tests {
    use rand::seq::SliceRandom;

    use super::*;

    fn standing(balance: i64, seq: u64) -> BidderStanding {
        BidderStanding::new(AccountId::new(), Decimal::new(balance, 0), seq)
    }

    #[test]
    fn two_slots_three_bidders() {
        let a = standing(100, 0);
        let b = standing(200, 1);
        let c = standing(300, 2);
        let ranking = rank_bidders(AuctionId(1), &[a, b, c], 2);

        assert_eq!(ranking.assignments.len(), 2);
        assert_eq!(ranking.winner_of(1), Some(c.bidder));
        assert_eq!(ranking.winner_of(2), Some(b.bidder));
        assert!(!ranking.is_winner(a.bidder));
        assert_eq!(ranking.losers, vec![a]);
    }

    #[test]
    fn fewer_bidders_than_slots() {
        let a = standing(5, 0);
        let ranking = rank_bidders(AuctionId(1), &[a], 4);
        assert_eq!(ranking.winners(), vec![(1, a.bidder)]);
        assert!(ranking.losers.is_empty());
        assert_eq!(ranking.winner_of(2), None);
    }

    #[test]
    fn zero_balances_are_ignored() {
        let zero = standing(0, 0);
        let a = standing(10, 1);
        let ranking = rank_bidders(AuctionId(1), &[zero, a], 2);
        assert_eq!(ranking.assignments.len(), 1);
        assert!(!ranking.is_winner(zero.bidder));
        assert!(ranking.losers.is_empty());
    }

    #[test]
    fn no_bidders() {
        let ranking = rank_bidders(AuctionId(1), &[], 3);
        assert!(ranking.assignments.is_empty());
        assert!(ranking.losers.is_empty());
    }

    #[test]
    fn ties_go_to_earliest_first_bid() {
        let late = standing(50, 9);
        let early = standing(50, 3);
        let ranking = rank_bidders(AuctionId(1), &[late, early], 1);
        assert_eq!(ranking.winner_of(1), Some(early.bidder));
        assert_eq!(ranking.losers, vec![late]);
    }

    #[test]
    fn input_order_does_not_matter() {
        let mut standings: Vec<BidderStanding> =
            (0u32..25).map(|i| standing(i64::from(i % 7) + 1, u64::from(i))).collect();
        let expected = rank_bidders(AuctionId(3), &standings, 10);

        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            standings.shuffle(&mut rng);
            let again = rank_bidders(AuctionId(3), &standings, 10);
            assert_eq!(again, expected);
        }
    }

    #[test]
    fn winners_are_the_top_balances() {
        let standings: Vec<BidderStanding> =
            (0u32..40).map(|i| standing(i64::from(i) * 3 + 1, u64::from(i))).collect();
        let ranking = rank_bidders(AuctionId(1), &standings, 5);
        let min_winner = ranking
            .assignments
            .iter()
            .map(|a| a.balance)
            .min()
            .unwrap();
        assert!(ranking.losers.iter().all(|l| l.balance <= min_winner));
        for pair in ranking.assignments.windows(2) {
            assert!(pair[0].balance >= pair[1].balance);
            assert_eq!(pair[0].slot + 1, pair[1].slot);
        }
    }
}
