//! Validation of a caller-supplied winner order.
//!
//! The caller proposes the winners in slot order; the engine only checks
//! that the proposal is the canonical descending top-N. Any order accepted
//! here is identical to what [`rank_bidders`] would compute.

use std::{cmp::Ordering, collections::HashMap, collections::HashSet};

use rust_decimal::Decimal;
use slothouse_types::{AccountId, AuctionError, AuctionId, BidderStanding, Result};

use crate::{Ranking, canonical_order, compare_standings, rank_bidders};

fn not_sorted(reason: String) -> AuctionError {
    AuctionError::WinnersNotSorted { reason }
}

/// Validate `supplied` against the standings and return the ranking it encodes.
///
/// Rejects with [`AuctionError::WrongWinnerCount`] when the list length is not
/// `min(slot_count, bidders)`, and with [`AuctionError::WinnersNotSorted`] when:
/// - an entry has no positive balance, or appears twice
/// - the first entry is not the highest balance
/// - a balance increases from one entry to the next
/// - two equal balances are ordered against the first-bid sequence
/// - a bidder left out of the list outranks the last entry
pub fn verify_supplied_order(
    auction: AuctionId,
    standings: &[BidderStanding],
    slot_count: u32,
    supplied: &[AccountId],
) -> Result<Ranking> {
    let ranked = canonical_order(standings);
    let expected = ranked.len().min(slot_count as usize);
    if supplied.len() != expected {
        return Err(AuctionError::WrongWinnerCount {
            expected,
            got: supplied.len(),
        });
    }

    let by_bidder: HashMap<AccountId, &BidderStanding> =
        ranked.iter().map(|s| (s.bidder, s)).collect();
    let mut seen: HashSet<AccountId> = HashSet::with_capacity(supplied.len());
    let mut previous: Option<&BidderStanding> = None;

    for (i, bidder) in supplied.iter().enumerate() {
        let Some(current) = by_bidder.get(bidder).copied() else {
            return Err(not_sorted(format!("entry {i} ({bidder}) has no balance")));
        };
        if !seen.insert(*bidder) {
            return Err(not_sorted(format!("entry {i} ({bidder}) is a duplicate")));
        }
        match previous {
            None => {
                let highest = ranked.first().map_or(Decimal::ZERO, |s| s.balance);
                if current.balance != highest {
                    return Err(not_sorted(format!(
                        "first entry balance {} is not the highest {highest}",
                        current.balance
                    )));
                }
            }
            Some(prev) => {
                if current.balance > prev.balance {
                    return Err(not_sorted(format!(
                        "entry {i} balance {} exceeds previous {}",
                        current.balance, prev.balance
                    )));
                }
                if compare_standings(prev, current) == Ordering::Greater {
                    return Err(not_sorted(format!(
                        "entry {i} tie at {} is ordered against first-bid order",
                        current.balance
                    )));
                }
            }
        }
        previous = Some(current);
    }

    if let Some(last) = previous {
        if let Some(outsider) = ranked
            .iter()
            .filter(|s| !seen.contains(&s.bidder))
            .find(|s| compare_standings(s, last) == Ordering::Less)
        {
            return Err(not_sorted(format!(
                "excluded bidder {} with balance {} outranks last entry",
                outsider.bidder, outsider.balance
            )));
        }
    }

    let ranking = rank_bidders(auction, standings, slot_count);
    let matches = ranking
        .assignments
        .iter()
        .map(|a| a.bidder)
        .eq(supplied.iter().copied());
    if !matches {
        return Err(AuctionError::Internal(
            "validated winner order differs from canonical ranking".into(),
        ));
    }
    Ok(ranking)
}
