//! Integration test: deterministic ranking
//!
//! The same bids always produce the same winners and the same ranking root,
//! whatever order they arrive in. A caller-supplied winner list is accepted
//! only when it is exactly the canonical ranking.

mod common;

use common::*;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use rust_decimal::Decimal;
use slothouse_types::*;

fn three_bidders(f: &mut Fixture, id: AuctionId) -> [AccountId; 3] {
    let (high, mid, low) = (AccountId::new(), AccountId::new(), AccountId::new());
    f.at(START);
    f.bid(mid, id, dec(50));
    f.bid(high, id, dec(90));
    f.bid(low, id, dec(10));
    f.at(END);
    [high, mid, low]
}

#[test]
fn supplied_canonical_order_is_accepted() {
    let mut f = Fixture::new();
    let id = f.native_auction(2);
    let [high, mid, _] = three_bidders(&mut f, id);

    let ranking = f.house.finalize_auction_with_order(id, &[high, mid]).unwrap();
    assert_eq!(ranking.winners(), vec![(1, high), (2, mid)]);
    let auction = f.house.auction(id).unwrap();
    assert!(auction.finalized);
    assert_eq!(auction.ranking_root, Some(ranking.ranking_root));
}

#[test]
fn supplied_order_must_match_exactly() {
    let mut f = Fixture::new();
    let id = f.native_auction(2);
    let [high, mid, low] = three_bidders(&mut f, id);

    assert!(matches!(
        f.house.finalize_auction_with_order(id, &[high]).unwrap_err(),
        AuctionError::WrongWinnerCount {
            expected: 2,
            got: 1
        }
    ));
    for bad in [[mid, high], [high, low], [high, high], [high, AccountId::new()]] {
        assert!(matches!(
            f.house.finalize_auction_with_order(id, &bad).unwrap_err(),
            AuctionError::WinnersNotSorted { .. }
        ));
    }
    let auction = f.house.auction(id).unwrap();
    assert!(!auction.finalized);
    assert!(auction.ranking_root.is_none());
    assert_eq!(f.house.slot_winner(id, 1).unwrap(), None);

    // A rejected list leaves the auction open to a correct one.
    f.house.finalize_auction_with_order(id, &[high, mid]).unwrap();
    assert_eq!(f.house.slot_winner(id, 2).unwrap(), Some(mid));
}

#[test]
fn ties_go_to_the_earlier_first_bid() {
    let mut f = Fixture::new();
    let id = f.native_auction(1);
    let early = AccountId::new();
    let late = AccountId::new();
    f.at(START);
    f.bid(early, id, dec(40));
    f.bid(late, id, dec(60));
    f.bid(early, id, dec(20));
    f.at(END);

    assert!(matches!(
        f.house.finalize_auction_with_order(id, &[late]).unwrap_err(),
        AuctionError::WinnersNotSorted { .. }
    ));
    let ranking = f.house.finalize_auction(id).unwrap();
    assert_eq!(ranking.winner_of(1), Some(early));
    let losers: Vec<AccountId> = ranking.losers.iter().map(|s| s.bidder).collect();
    assert_eq!(losers, vec![late]);
}

#[test]
fn fewer_bidders_than_slots() {
    let mut f = Fixture::new();
    let id = f.native_auction(4);
    let [high, mid, low] = three_bidders(&mut f, id);

    assert!(matches!(
        f.house
            .finalize_auction_with_order(id, &[high, mid, low, AccountId::new()])
            .unwrap_err(),
        AuctionError::WrongWinnerCount {
            expected: 3,
            got: 4
        }
    ));
    let ranking = f.house.finalize_auction_with_order(id, &[high, mid, low]).unwrap();
    assert_eq!(ranking.winner_of(3), Some(low));
    assert_eq!(ranking.winner_of(4), None);
}

#[test]
fn arrival_order_does_not_change_the_outcome() {
    const BIDDERS: i64 = 24;
    const SLOTS: u32 = 5;

    let mut rng = StdRng::seed_from_u64(0x5107);
    let bids: Vec<(AccountId, Decimal)> = (1..=BIDDERS)
        .map(|i| (AccountId::new(), dec(i * 1_000 + rng.gen_range(0..1_000))))
        .collect();
    let mut shuffled = bids.clone();
    shuffled.shuffle(&mut rng);

    let mut outcomes = Vec::new();
    for order in [&bids, &shuffled] {
        let mut f = Fixture::new();
        let id = f.native_auction(SLOTS);
        f.at(START);
        for (bidder, amount) in order {
            f.bid(*bidder, id, *amount);
        }
        f.at(END);
        let ranking = f.house.finalize_auction(id).unwrap();
        f.house.verify_funds_conservation(Currency::Native).unwrap();
        outcomes.push(ranking);
    }

    let [first, second] = [&outcomes[0], &outcomes[1]];
    assert_eq!(first.winners(), second.winners());
    assert_eq!(first.ranking_root, second.ranking_root);
    assert_eq!(first.losers.len(), (BIDDERS as usize) - SLOTS as usize);

    let mut expected = bids.clone();
    expected.sort_by(|a, b| b.1.cmp(&a.1));
    for (slot, (bidder, amount)) in (1..=SLOTS).zip(expected.iter()) {
        let assignment = &first.assignments[(slot - 1) as usize];
        assert_eq!(assignment.slot, slot);
        assert_eq!(assignment.bidder, *bidder);
        assert_eq!(assignment.balance, *amount);
    }
}
